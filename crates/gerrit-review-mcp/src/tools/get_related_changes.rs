use super::{ToolDefinition, change_only_schema};

pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: "get_related_changes".into(),
        description: "List changes related to the current revision of a change (ancestors and descendants).".into(),
        input_schema: change_only_schema(),
    }
}
