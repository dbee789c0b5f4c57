use super::{ToolDefinition, change_id_property};
use serde_json::json;

pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: "get_file_diff".into(),
        description: "Get the line-by-line diff of one file in the current revision of a change. \
            Common and added lines are numbered against the new file, removed lines against the old file."
            .into(),
        input_schema: json!({
            "type": "object",
            "properties": {
                "change_id": change_id_property(),
                "file_path": {
                    "type": "string",
                    "description": "Repository-relative path of the file, as listed by get_file_list"
                }
            },
            "required": ["change_id", "file_path"]
        }),
    }
}
