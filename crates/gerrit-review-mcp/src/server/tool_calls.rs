use super::*;
use gerrit_review_core::error::GerritError;
use std::time::Instant;
use tracing::warn;

pub(super) struct ToolCallParams<'a> {
    pub id: Option<Value>,
    pub tool_name: &'a str,
    pub arguments: &'a Value,
    pub client: Option<&'a GerritClient>,
}

mod changes;
mod files;
mod review;
mod shared;
use shared::*;

type ToolHandler = fn(&GerritClient, &Value) -> Result<Value, GerritError>;

fn resolve_handler(tool_name: &str) -> Option<ToolHandler> {
    let handler: ToolHandler = match tool_name {
        "get_commit_info" => changes::handle_get_commit_info,
        "get_change_detail" => changes::handle_get_change_detail,
        "get_commit_message" => changes::handle_get_commit_message,
        "get_related_changes" => changes::handle_get_related_changes,
        "get_file_list" => files::handle_get_file_list,
        "get_file_diff" => files::handle_get_file_diff,
        "create_draft_comment" => review::handle_create_draft_comment,
        "set_review" => review::handle_set_review,
        _ => return None,
    };
    Some(handler)
}

pub(super) fn handle_tool_call(params: ToolCallParams<'_>) -> JsonRpcResponse {
    let ToolCallParams {
        id,
        tool_name,
        arguments,
        client,
    } = params;

    let tool_name = tools::canonical_tool_name(tool_name);
    let Some(handler) = resolve_handler(tool_name) else {
        return JsonRpcResponse::error(id, METHOD_NOT_FOUND, format!("Unknown tool: {}", tool_name));
    };
    let Some(client) = client else {
        warn!(tool = tool_name, "tool called without a Gerrit session");
        return tool_error_response(id, SESSION_UNAVAILABLE);
    };

    let started = Instant::now();
    let result = handler(client, arguments);
    let elapsed_ms = started.elapsed().as_millis() as u64;
    match &result {
        Ok(_) => info!(tool = tool_name, elapsed_ms, "tool call completed"),
        Err(e) => warn!(
            tool = tool_name,
            elapsed_ms,
            error_class = e.class_name(),
            retryable = e.is_retryable(),
            "tool call failed: {}",
            e
        ),
    }
    tool_result_response(id, result)
}

pub(crate) fn tool_text_response(id: Option<Value>, payload: Value) -> JsonRpcResponse {
    JsonRpcResponse::success(
        id,
        json!({
            "content": [{
                "type": "text",
                "text": serde_json::to_string(&payload).unwrap_or_default()
            }]
        }),
    )
}
