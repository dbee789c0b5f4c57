use crate::change_id::{RequestPath, encode_path, normalize, resolve_change_input};
use crate::diff::{FileDiff, build_file_diff};
use crate::executor::RequestExecutor;
use crate::transport::{HttpMethod, HttpTransport, ReqwestTransport};
use crate::types::{CommentInput, CommitMessage, ReviewInput};
use gerrit_review_core::config::{Config, Credentials};
use gerrit_review_core::constants::{
    CODE_REVIEW_LABEL, COMMIT_MSG_PSEUDO_FILE, CURRENT_REVISION, DRAFTS_PUBLISH,
    FILE_LEVEL_COMMENT_LINE,
};
use gerrit_review_core::endpoint::Endpoint;
use gerrit_review_core::error::GerritError;
use serde_json::{Value, json};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// One operation per supported Gerrit tool. Cheap to clone; clones share
/// the same pooled transport.
#[derive(Clone)]
pub struct GerritClient {
    executor: RequestExecutor,
    base_url: String,
    unauthenticated: Vec<Endpoint>,
    allowed_labels: Vec<i64>,
    request_timeout: Duration,
    auth_timeout: Duration,
}

impl std::fmt::Debug for GerritClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GerritClient")
            .field("base_url", &self.base_url)
            .field("request_timeout", &self.request_timeout)
            .finish_non_exhaustive()
    }
}

impl GerritClient {
    /// Build the production client with a pooled reqwest session.
    pub fn new(credentials: &Credentials, config: &Config) -> Result<Self, GerritError> {
        let transport =
            ReqwestTransport::new(credentials, &config.http).map_err(GerritError::transport)?;
        Ok(Self::with_transport(
            &credentials.base_url,
            config,
            Arc::new(transport),
        ))
    }

    pub fn with_transport(
        base_url: &str,
        config: &Config,
        transport: Arc<dyn HttpTransport>,
    ) -> Self {
        Self {
            executor: RequestExecutor::new(transport),
            base_url: base_url.trim_end_matches('/').to_string(),
            unauthenticated: Endpoint::ALL
                .into_iter()
                .filter(|e| !config.requires_auth(*e))
                .collect(),
            allowed_labels: config
                .review
                .allowed_code_review_labels
                .iter()
                .map(|l| i64::from(*l))
                .collect(),
            request_timeout: config.http.request_timeout(),
            auth_timeout: config.http.auth_timeout(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn auth_timeout(&self) -> Duration {
        self.auth_timeout
    }

    pub fn get_commit_info(&self, change_id: &str) -> Result<Value, GerritError> {
        let path = self.change_path(Endpoint::CommitInfo, change_id, &revision("commit"))?;
        self.get(&path)
    }

    pub fn get_change_detail(&self, change_id: &str) -> Result<Value, GerritError> {
        let path = self.change_path(Endpoint::ChangeDetail, change_id, "detail")?;
        self.get(&path)
    }

    pub fn get_commit_message(&self, change_id: &str) -> Result<CommitMessage, GerritError> {
        let path = self.change_path(Endpoint::CommitMessage, change_id, &revision("commit"))?;
        let commit = self.get(&path)?;
        Ok(CommitMessage {
            subject: string_field(&commit, "subject"),
            message: string_field(&commit, "message"),
        })
    }

    pub fn get_related_changes(&self, change_id: &str) -> Result<Value, GerritError> {
        let path = self.change_path(Endpoint::RelatedChanges, change_id, &revision("related"))?;
        self.get(&path)
    }

    /// Files touched by the current revision, without the commit-message pseudo-file.
    pub fn get_file_list(&self, change_id: &str) -> Result<Value, GerritError> {
        let path = self.change_path(Endpoint::FileList, change_id, &revision("files"))?;
        let mut files = self.get(&path)?;
        if !files.is_object() {
            return Err(GerritError::decode(
                "expected a JSON object of files",
                files.to_string(),
            ));
        }
        if let Some(map) = files.as_object_mut() {
            map.remove(COMMIT_MSG_PSEUDO_FILE);
        }
        Ok(json!({ "files": files }))
    }

    pub fn get_file_diff(&self, change_id: &str, file_path: &str) -> Result<FileDiff, GerritError> {
        require_non_empty("file_path", file_path)?;
        let suffix = revision(&format!("files/{}/diff", encode_path(file_path)));
        let path = self.change_path(Endpoint::FileDiff, change_id, &suffix)?;
        let raw = self.get(&path)?;
        build_file_diff(file_path, raw)
    }

    /// Create an unresolved draft. `line == -1` makes it a file-level comment.
    pub fn create_draft_comment(
        &self,
        change_id: &str,
        file_path: &str,
        message: &str,
        line: i64,
    ) -> Result<Value, GerritError> {
        require_non_empty("file_path", file_path)?;
        require_non_empty("message", message)?;
        if line < FILE_LEVEL_COMMENT_LINE {
            return Err(GerritError::invalid_argument(format!(
                "line must be -1 (file-level) or a line number, got {line}"
            )));
        }
        let path = self.change_path(Endpoint::CreateDraftComment, change_id, &revision("drafts"))?;

        let input = CommentInput {
            path: file_path.to_string(),
            message: message.to_string(),
            unresolved: true,
            line: (line != FILE_LEVEL_COMMENT_LINE).then_some(line),
        };
        let body = serde_json::to_value(&input)
            .map_err(|e| GerritError::invalid_argument(e.to_string()))?;
        self.executor
            .execute(&path, HttpMethod::Put, Some(&body), self.request_timeout)
    }

    /// Publish all drafts on the current revision and vote Code-Review.
    pub fn set_review(
        &self,
        change_id: &str,
        code_review_label: i64,
        message: Option<&str>,
    ) -> Result<Value, GerritError> {
        if !self.allowed_labels.contains(&code_review_label) {
            return Err(GerritError::invalid_argument(format!(
                "invalid Code-Review label {code_review_label}, allowed values: {}",
                self.allowed_labels
                    .iter()
                    .map(i64::to_string)
                    .collect::<Vec<_>>()
                    .join(", ")
            )));
        }
        let path = self.change_path(Endpoint::SetReview, change_id, &revision("review"))?;

        let input = ReviewInput {
            drafts: DRAFTS_PUBLISH.to_string(),
            labels: BTreeMap::from([(CODE_REVIEW_LABEL.to_string(), code_review_label)]),
            message: message
                .filter(|m| !m.trim().is_empty())
                .map(str::to_string),
        };
        let body = serde_json::to_value(&input)
            .map_err(|e| GerritError::invalid_argument(e.to_string()))?;
        info!(change_id, label = code_review_label, "publishing review");
        self.executor
            .execute(&path, HttpMethod::Post, Some(&body), self.request_timeout)
    }

    /// `GET /a/accounts/self`, always authenticated.
    pub fn get_account_self(&self, timeout: Duration) -> Result<Value, GerritError> {
        let path = RequestPath::resource(&self.base_url, "accounts/self", true);
        self.executor.execute(&path, HttpMethod::Get, None, timeout)
    }

    fn change_path(
        &self,
        endpoint: Endpoint,
        change_id: &str,
        suffix: &str,
    ) -> Result<RequestPath, GerritError> {
        let change_id = resolve_change_input(change_id)?;
        let needs_auth = !self.unauthenticated.contains(&endpoint);
        debug!(endpoint = %endpoint, authenticated = needs_auth, "resolving change path");
        normalize(&self.base_url, &change_id, suffix, needs_auth)
    }

    fn get(&self, path: &RequestPath) -> Result<Value, GerritError> {
        self.executor
            .execute(path, HttpMethod::Get, None, self.request_timeout)
    }
}

fn revision(rest: &str) -> String {
    format!("revisions/{CURRENT_REVISION}/{rest}")
}

fn require_non_empty(field: &str, value: &str) -> Result<(), GerritError> {
    if value.trim().is_empty() {
        return Err(GerritError::invalid_argument(format!("{field} is required")));
    }
    Ok(())
}

fn string_field(value: &Value, key: &str) -> String {
    value
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::tests::SpyTransport;
    use crate::transport::TransportResponse;

    const BASE: &str = "https://review.example.com";

    fn client_with(spy: Arc<SpyTransport>) -> GerritClient {
        GerritClient::with_transport(BASE, &Config::default(), spy)
    }

    #[test]
    fn disallowed_label_fails_before_any_request() {
        let spy = Arc::new(SpyTransport::ok(200, "{}"));
        let client = client_with(spy.clone());

        for label in [0, 1, 2, -3] {
            let err = client.set_review("12345", label, Some("lgtm")).unwrap_err();
            assert_eq!(err.class_name(), "InvalidArgument");
        }
        assert!(spy.recorded().is_empty());
    }

    #[test]
    fn set_review_publishes_drafts_with_label() {
        let spy = Arc::new(SpyTransport::ok(200, ")]}'\n{\"labels\":{\"Code-Review\":-1}}"));
        let client = client_with(spy.clone());

        client.set_review("proj~7", -1, Some("needs work")).unwrap();

        let requests = spy.recorded();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, HttpMethod::Post);
        assert_eq!(
            requests[0].url,
            "https://review.example.com/a/changes/proj~7/revisions/current/review"
        );
        assert_eq!(
            requests[0].body,
            Some(json!({
                "drafts": "PUBLISH",
                "labels": {"Code-Review": -1},
                "message": "needs work"
            }))
        );
    }

    #[test]
    fn set_review_drops_blank_message() {
        let spy = Arc::new(SpyTransport::ok(200, "{}"));
        let client = client_with(spy.clone());
        client.set_review("1", -2, Some("")).unwrap();
        let body = spy.recorded()[0].body.clone().unwrap();
        assert!(body.get("message").is_none());
    }

    #[test]
    fn file_level_draft_omits_line() {
        let spy = Arc::new(SpyTransport::ok(201, "{}"));
        let client = client_with(spy.clone());

        client
            .create_draft_comment("12345", "src/main.rs", "consider a test", -1)
            .unwrap();

        let request = &spy.recorded()[0];
        assert_eq!(request.method, HttpMethod::Put);
        assert_eq!(
            request.body,
            Some(json!({"path": "src/main.rs", "message": "consider a test", "unresolved": true}))
        );
    }

    #[test]
    fn line_draft_includes_line() {
        let spy = Arc::new(SpyTransport::ok(201, "{}"));
        let client = client_with(spy.clone());

        client
            .create_draft_comment("12345", "src/main.rs", "off by one", 7)
            .unwrap();

        let body = spy.recorded()[0].body.clone().unwrap();
        assert_eq!(body["line"], json!(7));
        assert_eq!(body["unresolved"], json!(true));
    }

    #[test]
    fn draft_argument_errors_skip_the_network() {
        let spy = Arc::new(SpyTransport::ok(201, "{}"));
        let client = client_with(spy.clone());

        assert!(client.create_draft_comment("1", "", "msg", 3).is_err());
        assert!(client.create_draft_comment("1", "a.rs", "  ", 3).is_err());
        assert!(client.create_draft_comment("1", "a.rs", "msg", -5).is_err());
        assert!(client.create_draft_comment("", "a.rs", "msg", 3).is_err());
        assert!(spy.recorded().is_empty());
    }

    #[test]
    fn commit_message_skips_auth_segment() {
        let spy = Arc::new(SpyTransport::ok(
            200,
            ")]}'\n{\"subject\":\"Fix parser\",\"message\":\"Fix parser\\n\\nChange-Id: I1\\n\"}",
        ));
        let client = client_with(spy.clone());

        let commit = client.get_commit_message("12345").unwrap();
        assert_eq!(commit.subject, "Fix parser");
        assert!(commit.message.contains("Change-Id: I1"));
        assert_eq!(
            spy.recorded()[0].url,
            "https://review.example.com/changes/12345/revisions/current/commit"
        );
    }

    #[test]
    fn commit_info_uses_auth_segment() {
        let spy = Arc::new(SpyTransport::ok(200, "{\"commit\":\"abc\"}"));
        let client = client_with(spy.clone());
        let info = client.get_commit_info("12345").unwrap();
        assert_eq!(info["commit"], "abc");
        assert_eq!(
            spy.recorded()[0].url,
            "https://review.example.com/a/changes/12345/revisions/current/commit"
        );
    }

    #[test]
    fn file_list_drops_commit_msg() {
        let spy = Arc::new(SpyTransport::ok(
            200,
            ")]}'\n{\"/COMMIT_MSG\":{\"status\":\"A\"},\"src/lib.rs\":{\"lines_inserted\":3}}",
        ));
        let client = client_with(spy);

        let listed = client.get_file_list("12345").unwrap();
        let files = listed["files"].as_object().unwrap();
        assert_eq!(files.len(), 1);
        assert!(files.contains_key("src/lib.rs"));
    }

    #[test]
    fn file_diff_encodes_path_and_change_id() {
        let spy = Arc::new(SpyTransport::ok(
            200,
            ")]}'\n{\"change_type\":\"MODIFIED\",\"content\":[{\"ab\":[\"x\"]},{\"b\":[\"y\"]}]}",
        ));
        let client = client_with(spy.clone());

        let diff = client
            .get_file_diff("platform/build~42", "src/main.rs")
            .unwrap();
        assert_eq!(diff.line_changes.len(), 2);
        assert_eq!(
            spy.recorded()[0].url,
            "https://review.example.com/a/changes/platform%2Fbuild~42/revisions/current/files/src%2Fmain.rs/diff"
        );
    }

    #[test]
    fn file_diff_keeps_literal_percent_in_path() {
        let spy = Arc::new(SpyTransport::ok(200, "{\"content\":[]}"));
        let client = client_with(spy.clone());

        client.get_file_diff("1", "docs/a%20b.md").unwrap();
        assert_eq!(
            spy.recorded()[0].url,
            "https://review.example.com/a/changes/1/revisions/current/files/docs%2Fa%2520b.md/diff"
        );
    }

    #[test]
    fn web_url_change_reference_is_resolved() {
        let spy = Arc::new(SpyTransport::ok(200, "{}"));
        let client = client_with(spy.clone());
        client
            .get_change_detail("https://review.example.com/c/platform/build/+/4242/2")
            .unwrap();
        assert_eq!(
            spy.recorded()[0].url,
            "https://review.example.com/a/changes/4242/detail"
        );
    }

    #[test]
    fn unauthenticated_endpoints_follow_config() {
        let mut config = Config::default();
        config.gerrit.unauthenticated_endpoints = vec![];
        let spy = Arc::new(SpyTransport::new(vec![Ok(TransportResponse {
            status: 200,
            body: "{\"subject\":\"s\",\"message\":\"m\"}".into(),
        })]));
        let client = GerritClient::with_transport(BASE, &config, spy.clone());

        client.get_commit_message("1").unwrap();
        assert_eq!(
            spy.recorded()[0].url,
            "https://review.example.com/a/changes/1/revisions/current/commit"
        );
    }

    #[test]
    fn account_self_always_authenticates() {
        let spy = Arc::new(SpyTransport::ok(200, "{\"_account_id\":1000}"));
        let client = client_with(spy.clone());
        let account = client.get_account_self(Duration::from_secs(1)).unwrap();
        assert_eq!(account["_account_id"], 1000);
        assert_eq!(
            spy.recorded()[0].url,
            "https://review.example.com/a/accounts/self"
        );
    }
}
