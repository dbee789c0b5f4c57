use super::{ToolDefinition, change_id_property};
use serde_json::json;

pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: "set_review".into(),
        description: "Publish all draft comments on the current revision of a change and vote Code-Review. \
            Only negative votes (-1 or -2) are accepted by default."
            .into(),
        input_schema: json!({
            "type": "object",
            "properties": {
                "change_id": change_id_property(),
                "code_review_label": {
                    "type": "integer",
                    "description": "Code-Review vote, -1 or -2"
                },
                "message": {
                    "type": "string",
                    "description": "Optional cover message for the review"
                }
            },
            "required": ["change_id", "code_review_label"]
        }),
    }
}
