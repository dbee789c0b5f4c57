use super::{ToolDefinition, change_only_schema};

pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: "get_commit_info".into(),
        description: "Fetch commit information (author, committer, parents, subject, message) for the current revision of a change.".into(),
        input_schema: change_only_schema(),
    }
}
