use super::{ToolDefinition, change_only_schema};

pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: "get_change_detail".into(),
        description: "Get detailed information about a change, including labels, reviewers and messages.".into(),
        input_schema: change_only_schema(),
    }
}
