use super::{ToolDefinition, change_only_schema};

pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: "get_commit_message".into(),
        description: "Get the subject and full commit message of the current revision of a change.".into(),
        input_schema: change_only_schema(),
    }
}
