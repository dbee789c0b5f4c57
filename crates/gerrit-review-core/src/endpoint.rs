use serde::{Deserialize, Serialize};

/// Gerrit REST operations exposed as tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Endpoint {
    CommitInfo,
    ChangeDetail,
    CommitMessage,
    RelatedChanges,
    FileList,
    FileDiff,
    CreateDraftComment,
    SetReview,
}

impl Endpoint {
    pub const ALL: [Endpoint; 8] = [
        Self::CommitInfo,
        Self::ChangeDetail,
        Self::CommitMessage,
        Self::RelatedChanges,
        Self::FileList,
        Self::FileDiff,
        Self::CreateDraftComment,
        Self::SetReview,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CommitInfo => "commit_info",
            Self::ChangeDetail => "change_detail",
            Self::CommitMessage => "commit_message",
            Self::RelatedChanges => "related_changes",
            Self::FileList => "file_list",
            Self::FileDiff => "file_diff",
            Self::CreateDraftComment => "create_draft_comment",
            Self::SetReview => "set_review",
        }
    }

    /// Endpoints outside this set are documented as reachable without the
    /// authenticated `a/` segment. Overridable through configuration.
    pub const fn default_requires_auth(self) -> bool {
        !matches!(self, Self::CommitMessage)
    }
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
