use crate::protocol::{
    INVALID_PARAMS, JsonRpcRequest, JsonRpcResponse, METHOD_NOT_FOUND, PARSE_ERROR,
};
use crate::{prompts, resources, tools};
use gerrit_review_client::GerritClient;
use gerrit_review_core::config::Config;
use gerrit_review_core::constants;
use gerrit_review_core::error::McpError;
use serde_json::{Value, json};
use std::io::{self, BufRead, Write};
use tracing::{debug, error, info};

use self::tool_calls::{ToolCallParams, handle_tool_call};

mod tool_calls;


/// Everything a request handler may touch. Borrowed for the duration of one request.
pub struct RequestContext<'a> {
    pub config: &'a Config,
    /// `None` when the server runs without a validated Gerrit session.
    pub client: Option<&'a GerritClient>,
}

/// Run the MCP server loop on stdin/stdout until stdin closes.
pub fn run_server(config: &Config, client: Option<&GerritClient>) -> Result<(), McpError> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    info!(session = client.is_some(), "MCP server started on stdio");
    serve_lines(stdin.lock(), &mut stdout, &RequestContext { config, client })?;
    info!("stdin closed, MCP server stopping");
    Ok(())
}

/// Newline-delimited JSON-RPC over any reader/writer pair.
pub fn serve_lines<R: BufRead, W: Write>(
    reader: R,
    writer: &mut W,
    ctx: &RequestContext<'_>,
) -> Result<(), McpError> {
    for line in reader.lines() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                error!("stdin read error: {}", e);
                break;
            }
        };

        if line.trim().is_empty() {
            continue;
        }

        let request: JsonRpcRequest = match serde_json::from_str(&line) {
            Ok(r) => r,
            Err(e) => {
                let resp = JsonRpcResponse::error(None, PARSE_ERROR, format!("Parse error: {}", e));
                write_response(writer, &resp)?;
                continue;
            }
        };

        if let Some(response) = handle_request(&request, ctx) {
            write_response(writer, &response)?;
        }
    }
    Ok(())
}

fn write_response<W: Write>(writer: &mut W, response: &JsonRpcResponse) -> Result<(), McpError> {
    let serialized =
        serde_json::to_string(response).map_err(|e| McpError::Internal(e.to_string()))?;
    writeln!(writer, "{}", serialized)?;
    writer.flush()?;
    Ok(())
}

/// Dispatch one request. Returns `None` for notifications.
pub fn handle_request(request: &JsonRpcRequest, ctx: &RequestContext<'_>) -> Option<JsonRpcResponse> {
    if request.is_notification() {
        debug!(method = %request.method, "notification received");
        return None;
    }

    let id = request.id.clone();
    let response = match request.method.as_str() {
        "initialize" => JsonRpcResponse::success(
            id,
            json!({
                "protocolVersion": constants::MCP_PROTOCOL_VERSION,
                "capabilities": {
                    "tools": {},
                    "resources": {},
                    "prompts": {}
                },
                "serverInfo": {
                    "name": constants::SERVER_NAME,
                    "version": env!("CARGO_PKG_VERSION")
                }
            }),
        ),
        "ping" => JsonRpcResponse::success(id, json!({})),
        "tools/list" => {
            let tools = tools::list_tools();
            JsonRpcResponse::success(id, json!({ "tools": tools }))
        }
        "tools/call" => {
            let tool_name = request
                .params
                .get("name")
                .and_then(|v| v.as_str())
                .unwrap_or("");
            let arguments = request
                .params
                .get("arguments")
                .cloned()
                .unwrap_or(json!({}));

            handle_tool_call(ToolCallParams {
                id,
                tool_name,
                arguments: &arguments,
                client: ctx.client,
            })
        }
        "resources/list" => JsonRpcResponse::success(
            id,
            json!({ "resources": resources::list_resources() }),
        ),
        "resources/read" => {
            let uri = param_str(&request.params, "uri");
            match resources::read_resource(uri, base_url(ctx)) {
                Some(contents) => JsonRpcResponse::success(id, contents),
                None => JsonRpcResponse::error(
                    id,
                    INVALID_PARAMS,
                    format!("Unknown resource: {}", uri),
                ),
            }
        }
        "prompts/list" => {
            JsonRpcResponse::success(id, json!({ "prompts": prompts::list_prompts() }))
        }
        "prompts/get" => {
            let name = param_str(&request.params, "name");
            match prompts::get_prompt(name) {
                Some(prompt) => JsonRpcResponse::success(id, prompt),
                None => {
                    JsonRpcResponse::error(id, INVALID_PARAMS, format!("Unknown prompt: {}", name))
                }
            }
        }
        _ => JsonRpcResponse::error(
            id,
            METHOD_NOT_FOUND,
            format!("Method not found: {}", request.method),
        ),
    };
    Some(response)
}

fn param_str<'a>(params: &'a Value, key: &str) -> &'a str {
    params.get(key).and_then(|v| v.as_str()).unwrap_or("")
}

fn base_url<'a>(ctx: &RequestContext<'a>) -> Option<&'a str> {
    ctx.client
        .map(GerritClient::base_url)
        .or(ctx.config.gerrit.url.as_deref())
}
