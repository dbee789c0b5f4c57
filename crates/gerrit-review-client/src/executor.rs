use crate::change_id::RequestPath;
use crate::transport::{HttpMethod, HttpTransport, TransportFailure, TransportRequest};
use gerrit_review_core::constants::GERRIT_MAGIC_PREFIX;
use gerrit_review_core::error::GerritError;
use serde_json::Value;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Issues one HTTP request per call and turns the outcome into JSON or a
/// classified [`GerritError`]. Holds no per-request state.
#[derive(Clone)]
pub struct RequestExecutor {
    transport: Arc<dyn HttpTransport>,
}

impl RequestExecutor {
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        Self { transport }
    }

    pub fn execute(
        &self,
        path: &RequestPath,
        method: HttpMethod,
        body: Option<&Value>,
        timeout: Duration,
    ) -> Result<Value, GerritError> {
        let started = Instant::now();
        if let Some(body) = body {
            debug!(method = method.as_str(), url = %path, body = %body, "sending Gerrit request");
        }
        let request = TransportRequest {
            method,
            url: path.as_str(),
            body,
            timeout,
        };

        let response = self.transport.send(&request).map_err(|failure| {
            warn!(method = method.as_str(), url = %path, error = %failure, "Gerrit request failed");
            match failure {
                TransportFailure::Timeout(_) => {
                    GerritError::timeout(path.as_str(), timeout.as_millis() as u64)
                }
                TransportFailure::Connect(reason) | TransportFailure::Other(reason) => {
                    GerritError::transport(reason)
                }
            }
        })?;

        debug!(
            method = method.as_str(),
            url = %path,
            status = response.status,
            elapsed_ms = started.elapsed().as_millis() as u64,
            body = body_preview(&response.body),
            "Gerrit request completed"
        );

        if response.status == 404 {
            return Err(GerritError::not_found(path.as_str()));
        }
        if response.status >= 400 {
            return Err(GerritError::api(response.status, response.body));
        }
        parse_gerrit_response(&response.body)
    }
}

const LOG_PREVIEW_CHARS: usize = 200;

fn body_preview(body: &str) -> &str {
    match body.char_indices().nth(LOG_PREVIEW_CHARS) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}

/// Drop the anti-XSSI prefix and the line break that follows it.
pub fn strip_magic_prefix(body: &str) -> &str {
    match body.strip_prefix(GERRIT_MAGIC_PREFIX) {
        Some(rest) => rest.trim_start_matches(['\r', '\n']),
        None => body,
    }
}

/// An empty or non-JSON success body is a `DecodeError`.
pub fn parse_gerrit_response(body: &str) -> Result<Value, GerritError> {
    let payload = strip_magic_prefix(body);
    if payload.trim().is_empty() {
        return Err(GerritError::decode("empty response body", body));
    }
    serde_json::from_str(payload).map_err(|e| GerritError::decode(e.to_string(), body))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::transport::TransportResponse;
    use serde_json::json;
    use std::sync::Mutex;

    /// Recorded request, owned so it outlives the borrowed [`TransportRequest`].
    #[derive(Debug, Clone, PartialEq)]
    pub(crate) struct RecordedRequest {
        pub method: HttpMethod,
        pub url: String,
        pub body: Option<Value>,
    }

    /// Replays canned responses in order and records every request it sees.
    pub(crate) struct SpyTransport {
        responses: Mutex<Vec<Result<TransportResponse, TransportFailure>>>,
        pub requests: Mutex<Vec<RecordedRequest>>,
    }

    impl SpyTransport {
        pub(crate) fn new(responses: Vec<Result<TransportResponse, TransportFailure>>) -> Self {
            Self {
                responses: Mutex::new(responses.into_iter().rev().collect()),
                requests: Mutex::new(Vec::new()),
            }
        }

        pub(crate) fn ok(status: u16, body: &str) -> Self {
            Self::new(vec![Ok(TransportResponse {
                status,
                body: body.to_string(),
            })])
        }

        pub(crate) fn recorded(&self) -> Vec<RecordedRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    impl HttpTransport for SpyTransport {
        fn send(
            &self,
            request: &TransportRequest<'_>,
        ) -> Result<TransportResponse, TransportFailure> {
            self.requests.lock().unwrap().push(RecordedRequest {
                method: request.method,
                url: request.url.to_string(),
                body: request.body.cloned(),
            });
            self.responses
                .lock()
                .unwrap()
                .pop()
                .unwrap_or_else(|| Err(TransportFailure::Other("no canned response".into())))
        }
    }

    fn run(transport: SpyTransport) -> Result<Value, GerritError> {
        let executor = RequestExecutor::new(Arc::new(transport));
        let path = crate::change_id::normalize("https://g.example", "1", "detail", true).unwrap();
        executor.execute(&path, HttpMethod::Get, None, Duration::from_secs(30))
    }

    #[test]
    fn strips_prefix_and_parses_json() {
        let value = run(SpyTransport::ok(200, ")]}'\n{\"ok\":true}")).unwrap();
        assert_eq!(value, json!({"ok": true}));
    }

    #[test]
    fn unprefixed_bodies_parse_too() {
        let value = run(SpyTransport::ok(200, "[1,2]")).unwrap();
        assert_eq!(value, json!([1, 2]));
    }

    #[test]
    fn not_found_carries_the_path() {
        let err = run(SpyTransport::ok(404, "Not found: 1")).unwrap_err();
        assert_eq!(
            err,
            GerritError::not_found("https://g.example/a/changes/1/detail")
        );
    }

    #[test]
    fn other_errors_carry_status_and_body() {
        let err = run(SpyTransport::ok(500, "boom")).unwrap_err();
        assert_eq!(err, GerritError::api(500, "boom"));
        assert_eq!(err.to_tool_message(), "ApiError: Gerrit API error (500): boom");
    }

    #[test]
    fn empty_success_body_is_decode_error() {
        let err = run(SpyTransport::ok(200, ")]}'\n")).unwrap_err();
        assert_eq!(err.class_name(), "DecodeError");
    }

    #[test]
    fn html_success_body_is_decode_error() {
        let err = run(SpyTransport::ok(200, "<html>login</html>")).unwrap_err();
        assert!(matches!(err, GerritError::Decode { .. }));
    }

    #[test]
    fn transport_failures_are_classified() {
        let err = run(SpyTransport::new(vec![Err(TransportFailure::Timeout(
            "deadline".into(),
        ))]))
        .unwrap_err();
        assert_eq!(
            err,
            GerritError::timeout("https://g.example/a/changes/1/detail", 30_000)
        );

        let err = run(SpyTransport::new(vec![Err(TransportFailure::Connect(
            "refused".into(),
        ))]))
        .unwrap_err();
        assert_eq!(err, GerritError::transport("refused"));
        assert!(err.is_retryable());
    }

    #[test]
    fn body_preview_truncates_on_char_boundaries() {
        let long = "é".repeat(300);
        assert_eq!(body_preview(&long).chars().count(), 200);
        assert_eq!(body_preview("short"), "short");
    }

    #[test]
    fn strip_magic_prefix_leaves_plain_bodies_alone() {
        assert_eq!(strip_magic_prefix(")]}'\r\n{}"), "{}");
        assert_eq!(strip_magic_prefix("{}"), "{}");
    }
}
