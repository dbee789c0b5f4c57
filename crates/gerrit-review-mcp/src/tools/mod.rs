pub mod create_draft_comment;
pub mod get_change_detail;
pub mod get_commit_info;
pub mod get_commit_message;
pub mod get_file_diff;
pub mod get_file_list;
pub mod get_related_changes;
pub mod set_review;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Prefix of the tool names older clients still send.
pub const LEGACY_TOOL_PREFIX: &str = "gerrit_";

/// MCP tool definition for tools/list response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

/// Return all tool definitions.
pub fn list_tools() -> Vec<ToolDefinition> {
    vec![
        get_commit_info::definition(),
        get_change_detail::definition(),
        get_commit_message::definition(),
        get_related_changes::definition(),
        get_file_list::definition(),
        get_file_diff::definition(),
        create_draft_comment::definition(),
        set_review::definition(),
    ]
}

/// Strip the legacy `gerrit_` prefix when the remainder names a known tool.
pub fn canonical_tool_name(name: &str) -> &str {
    match name.strip_prefix(LEGACY_TOOL_PREFIX) {
        Some(rest) if list_tools().iter().any(|t| t.name == rest) => rest,
        _ => name,
    }
}

pub(crate) fn change_id_property() -> Value {
    json!({
        "type": "string",
        "description": "Change number, project~number, project~branch~Change-Id, or a Gerrit web URL of the change."
    })
}

/// Schema for tools whose only argument is the change.
pub(crate) fn change_only_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "change_id": change_id_property()
        },
        "required": ["change_id"]
    })
}
