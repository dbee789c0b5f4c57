use super::{ToolDefinition, change_only_schema};

pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: "get_file_list".into(),
        description: "List the files modified in the current revision of a change, excluding the commit message pseudo-file.".into(),
        input_schema: change_only_schema(),
    }
}
