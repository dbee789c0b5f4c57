//! Change identifier parsing and request path construction.
//!
//! Gerrit accepts a change as a bare number, `project~number`, or
//! `project~branch~Change-Id`. Project and branch names may contain `/`, so
//! every non-numeric component is percent-encoded before it is placed in a
//! path segment.

use gerrit_review_core::constants::{AUTH_SEGMENT, CHANGES_SEGMENT};
use gerrit_review_core::error::GerritError;
use std::borrow::Cow;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeIdShape {
    /// Legacy numeric id, e.g. `12345`.
    Numeric,
    /// `project~number`
    ProjectNumber,
    /// `project~branch~I0123abcd...`
    ProjectBranchChangeId,
    /// Anything else (bare Change-Id, commit sha). Encoded as a single component.
    Opaque,
}

/// A caller-supplied change identifier. Never mutated, only re-encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeIdentifier {
    raw: String,
}

impl ChangeIdentifier {
    pub fn parse(raw: &str) -> Result<Self, GerritError> {
        if raw.trim().is_empty() {
            return Err(GerritError::invalid_argument("change_id is required"));
        }
        Ok(Self {
            raw: raw.to_string(),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn shape(&self) -> ChangeIdShape {
        match self.raw.matches('~').count() {
            0 if is_numeric(&self.raw) => ChangeIdShape::Numeric,
            0 => ChangeIdShape::Opaque,
            1 => ChangeIdShape::ProjectNumber,
            _ => ChangeIdShape::ProjectBranchChangeId,
        }
    }

    /// Path-segment form of the identifier.
    pub fn encoded(&self) -> String {
        match self.shape() {
            ChangeIdShape::Numeric => self.raw.clone(),
            ChangeIdShape::ProjectNumber => {
                let (project, number) = self.raw.split_once('~').unwrap_or((self.raw.as_str(), ""));
                format!("{}~{}", encode_component(project), number)
            }
            ChangeIdShape::ProjectBranchChangeId => self
                .raw
                .split('~')
                .map(encode_component)
                .collect::<Vec<_>>()
                .join("~"),
            ChangeIdShape::Opaque => encode_component(&self.raw),
        }
    }
}

/// A fully qualified Gerrit REST URL. Built fresh for every call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestPath(String);

/// Components recovered from a rendered change URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedChangePath {
    pub authenticated: bool,
    /// Decoded change identifier.
    pub change_id: String,
    /// Remainder after the identifier, exactly as it appeared in the URL.
    pub suffix: String,
}

impl RequestPath {
    /// Path for a resource that is not scoped to a change, e.g. `accounts/self`.
    pub fn resource(base_url: &str, suffix: &str, needs_auth_prefix: bool) -> Self {
        let mut url = base_url.trim_end_matches('/').to_string();
        url.push('/');
        if needs_auth_prefix {
            url.push_str(AUTH_SEGMENT);
            url.push('/');
        }
        url.push_str(suffix.trim_matches('/'));
        Self(url)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Split a change URL built against `base_url` back into its components.
    pub fn parse(base_url: &str, url: &str) -> Result<ParsedChangePath, GerritError> {
        let base = base_url.trim_end_matches('/');
        let relative = url.strip_prefix(base).ok_or_else(|| {
            GerritError::invalid_argument(format!(
                "URL {url} does not start with expected Gerrit base URL {base}"
            ))
        })?;

        let mut segments = relative.trim_start_matches('/').split('/');
        let mut head = segments.next();
        let authenticated = head == Some(AUTH_SEGMENT);
        if authenticated {
            head = segments.next();
        }
        if head != Some(CHANGES_SEGMENT) {
            return Err(GerritError::invalid_argument(format!(
                "'changes' segment not found in URL path: {url}"
            )));
        }
        let encoded_id = segments.next().filter(|s| !s.is_empty()).ok_or_else(|| {
            GerritError::invalid_argument(format!("no change id in URL path: {url}"))
        })?;

        Ok(ParsedChangePath {
            authenticated,
            change_id: decode_component(encoded_id),
            suffix: segments.collect::<Vec<_>>().join("/"),
        })
    }
}

impl std::fmt::Display for RequestPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Build `{base}/{a/}changes/{encoded_id}/{suffix}`.
///
/// Fails with `InvalidArgument` for an empty identifier, before any I/O.
pub fn normalize(
    base_url: &str,
    raw_change_id: &str,
    suffix: &str,
    needs_auth_prefix: bool,
) -> Result<RequestPath, GerritError> {
    let change_id = ChangeIdentifier::parse(raw_change_id)?;

    let mut url = base_url.trim_end_matches('/').to_string();
    url.push('/');
    if needs_auth_prefix {
        url.push_str(AUTH_SEGMENT);
        url.push('/');
    }
    url.push_str(CHANGES_SEGMENT);
    url.push('/');
    url.push_str(&change_id.encoded());

    let suffix = suffix.trim_matches('/');
    if !suffix.is_empty() {
        url.push('/');
        url.push_str(suffix);
    }
    Ok(RequestPath(url))
}

/// Normalize an already-built change URL. Stable under repetition: the auth
/// segment is never duplicated and the identifier never double-encoded.
pub fn renormalize(base_url: &str, url: &str) -> Result<RequestPath, GerritError> {
    let parsed = RequestPath::parse(base_url, url)?;
    normalize(
        base_url,
        &parsed.change_id,
        &parsed.suffix,
        parsed.authenticated,
    )
}

/// Accept either a change identifier or a Gerrit web URL pointing at a change.
pub fn resolve_change_input(input: &str) -> Result<String, GerritError> {
    let trimmed = input.trim();
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        return extract_change_id(trimmed).ok_or_else(|| {
            GerritError::invalid_argument(format!(
                "could not extract a change number from URL: {trimmed}"
            ))
        });
    }
    Ok(input.to_string())
}

/// Extract the change number from a Gerrit web URL such as
/// `https://host/c/project/+/12345` or `https://host/c/project/+/12345/3`,
/// falling back to an `id=` query parameter.
pub fn extract_change_id(web_url: &str) -> Option<String> {
    let parsed = reqwest::Url::parse(web_url).ok()?;

    if let Some(segments) = parsed.path_segments() {
        let segments: Vec<&str> = segments.filter(|s| !s.is_empty()).collect();
        if let Some(plus) = segments.iter().rposition(|s| *s == "+") {
            match &segments[plus + 1..] {
                [number] if is_numeric(number) => return Some((*number).to_string()),
                [number, patchset] if is_numeric(number) && is_numeric(patchset) => {
                    return Some((*number).to_string());
                }
                _ => {}
            }
        }
    }

    parsed
        .query_pairs()
        .find(|(key, _)| key == "id")
        .map(|(_, value)| value.into_owned())
}

/// Percent-encode a path component with no safe characters beyond the
/// RFC 3986 unreserved set. Already-encoded input is canonicalized first.
pub fn encode_component(part: &str) -> String {
    let canonical = decode_component(part);
    urlencoding::encode(&canonical).into_owned()
}

/// Percent-encode a file path verbatim, `/` and `%` included. Paths are
/// never decoded first: `%` may be a literal character in a file name.
pub fn encode_path(path: &str) -> String {
    urlencoding::encode(path).into_owned()
}

pub fn decode_component(part: &str) -> String {
    urlencoding::decode(part)
        .map(Cow::into_owned)
        .unwrap_or_else(|_| part.to_string())
}

fn is_numeric(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_paths_encode_percent_literally() {
        assert_eq!(encode_path("docs/a%20b.md"), "docs%2Fa%2520b.md");
        assert_eq!(encode_path("src/main.rs"), "src%2Fmain.rs");
    }

    const BASE: &str = "https://gerrit.example.com";

    fn id_segment(url: &RequestPath) -> String {
        RequestPath::parse(BASE, url.as_str()).unwrap().change_id
    }

    #[test]
    fn numeric_id_is_left_untouched() {
        let path = normalize(BASE, "12345", "detail", true).unwrap();
        assert_eq!(path.as_str(), "https://gerrit.example.com/a/changes/12345/detail");
    }

    #[test]
    fn project_number_encodes_project_only() {
        let path = normalize(BASE, "platform/build~42", "revisions/current/commit", true).unwrap();
        assert_eq!(
            path.as_str(),
            "https://gerrit.example.com/a/changes/platform%2Fbuild~42/revisions/current/commit"
        );
    }

    #[test]
    fn triplet_encodes_every_component() {
        let path = normalize(
            BASE,
            "tools/repo~release/1.0~I8473b95934b5732ac55d26311a706c9c2bde9940",
            "detail",
            true,
        )
        .unwrap();
        assert_eq!(
            path.as_str(),
            "https://gerrit.example.com/a/changes/tools%2Frepo~release%2F1.0~I8473b95934b5732ac55d26311a706c9c2bde9940/detail"
        );
    }

    #[test]
    fn opaque_id_is_encoded_whole() {
        let change = ChangeIdentifier::parse("I8473b9 5934").unwrap();
        assert_eq!(change.shape(), ChangeIdShape::Opaque);
        assert_eq!(change.encoded(), "I8473b9%205934");
    }

    #[test]
    fn auth_segment_is_caller_controlled() {
        let path = normalize(BASE, "7", "revisions/current/commit", false).unwrap();
        assert_eq!(
            path.as_str(),
            "https://gerrit.example.com/changes/7/revisions/current/commit"
        );
    }

    #[test]
    fn trailing_base_slash_and_suffix_slashes_are_collapsed() {
        let path = normalize("https://gerrit.example.com/", "7", "/detail/", true).unwrap();
        assert_eq!(path.as_str(), "https://gerrit.example.com/a/changes/7/detail");
    }

    #[test]
    fn empty_change_id_is_invalid_argument() {
        for raw in ["", "   "] {
            let err = normalize(BASE, raw, "detail", true).unwrap_err();
            assert_eq!(err.class_name(), "InvalidArgument");
        }
    }

    #[test]
    fn decoding_the_id_segment_recovers_every_shape() {
        for raw in [
            "12345",
            "platform/build~42",
            "tools/repo~release/1.0~I8473b95934b5732ac55d26311a706c9c2bde9940",
            "I8473b95934b5732ac55d26311a706c9c2bde9940",
            "my project~9",
        ] {
            let path = normalize(BASE, raw, "detail", true).unwrap();
            assert_eq!(id_segment(&path), raw, "round trip failed for {raw}");
        }
    }

    #[test]
    fn renormalize_is_idempotent() {
        for (raw, auth) in [("platform/build~42", true), ("12345", false)] {
            let once = normalize(BASE, raw, "revisions/current/files/src%2Flib.rs/diff", auth)
                .unwrap();
            let twice = renormalize(BASE, once.as_str()).unwrap();
            let thrice = renormalize(BASE, twice.as_str()).unwrap();
            assert_eq!(once, twice);
            assert_eq!(twice, thrice);
            assert!(thrice.as_str().matches("/a/").count() <= 1);
        }
    }

    #[test]
    fn already_encoded_identifier_is_not_double_encoded() {
        let path = normalize(BASE, "platform%2Fbuild~42", "detail", true).unwrap();
        assert_eq!(
            path.as_str(),
            "https://gerrit.example.com/a/changes/platform%2Fbuild~42/detail"
        );
    }

    #[test]
    fn parse_rejects_foreign_urls() {
        assert!(RequestPath::parse(BASE, "https://other.example.com/a/changes/1").is_err());
        assert!(RequestPath::parse(BASE, "https://gerrit.example.com/a/accounts/self").is_err());
    }

    #[test]
    fn resource_paths_share_the_auth_rule() {
        let path = RequestPath::resource(BASE, "accounts/self", true);
        assert_eq!(path.as_str(), "https://gerrit.example.com/a/accounts/self");
    }

    #[test]
    fn extract_change_id_handles_web_urls() {
        assert_eq!(
            extract_change_id("https://gerrit.example.com/c/platform/build/+/12345").as_deref(),
            Some("12345")
        );
        assert_eq!(
            extract_change_id("https://gerrit.example.com/c/platform/build/+/12345/3").as_deref(),
            Some("12345")
        );
        assert_eq!(
            extract_change_id("https://gerrit.example.com/q/status:open?id=I8473b9").as_deref(),
            Some("I8473b9")
        );
        assert_eq!(extract_change_id("https://gerrit.example.com/dashboard/self"), None);
        assert_eq!(extract_change_id("not a url"), None);
    }

    #[test]
    fn resolve_change_input_passes_identifiers_through() {
        assert_eq!(resolve_change_input("proj~1").unwrap(), "proj~1");
        assert_eq!(
            resolve_change_input("https://gerrit.example.com/c/proj/+/77").unwrap(),
            "77"
        );
        assert!(resolve_change_input("https://gerrit.example.com/dashboard").is_err());
    }
}
