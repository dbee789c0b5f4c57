use super::{ToolDefinition, change_id_property};
use serde_json::json;

pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: "create_draft_comment".into(),
        description: "Create an unresolved draft comment on a file in the current revision of a change. \
            Use line -1 for a file-level comment."
            .into(),
        input_schema: json!({
            "type": "object",
            "properties": {
                "change_id": change_id_property(),
                "file_path": {
                    "type": "string",
                    "description": "Path of the file to comment on"
                },
                "message": {
                    "type": "string",
                    "description": "Comment text"
                },
                "line": {
                    "type": "integer",
                    "minimum": -1,
                    "description": "Line number in the new file, or -1 for a file-level comment"
                }
            },
            "required": ["change_id", "file_path", "message", "line"]
        }),
    }
}
