use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Gerrit `CommentInput` for a draft on the current revision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommentInput {
    pub path: String,
    pub message: String,
    pub unresolved: bool,
    /// Absent for file-level comments.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<i64>,
}

/// Gerrit `ReviewInput` that publishes drafts and votes Code-Review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewInput {
    pub drafts: String,
    pub labels: BTreeMap<String, i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitMessage {
    pub subject: String,
    pub message: String,
}
