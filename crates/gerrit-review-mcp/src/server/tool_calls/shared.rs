use super::*;
use serde::Serialize;

pub(super) const SESSION_UNAVAILABLE: &str = "Gerrit session not available";

/// The one place where tool outcomes become MCP results. Failures are
/// reported in-band as `{"error": "<Class>: <message>"}` with `isError` set.
pub(super) fn tool_result_response(
    id: Option<Value>,
    result: Result<Value, GerritError>,
) -> JsonRpcResponse {
    match result {
        Ok(payload) => tool_text_response(id, payload),
        Err(e) => tool_error_response(id, &e.to_tool_message()),
    }
}

pub(super) fn tool_error_response(id: Option<Value>, message: &str) -> JsonRpcResponse {
    let payload = json!({ "error": message });
    JsonRpcResponse::success(
        id,
        json!({
            "content": [{
                "type": "text",
                "text": payload.to_string()
            }],
            "isError": true
        }),
    )
}

pub(super) fn required_str<'a>(arguments: &'a Value, key: &str) -> Result<&'a str, GerritError> {
    arguments
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| GerritError::invalid_argument(format!("{key} is required")))
}

/// Change numbers are often sent unquoted, so JSON integers are accepted too.
pub(super) fn change_id_arg(arguments: &Value) -> Result<String, GerritError> {
    match arguments.get("change_id") {
        Some(Value::Number(n)) if n.is_u64() => Ok(n.to_string()),
        Some(Value::Number(n)) => Err(GerritError::invalid_argument(format!(
            "change_id must be a string or positive integer, got {n}"
        ))),
        _ => required_str(arguments, "change_id").map(str::to_string),
    }
}

pub(super) fn optional_str<'a>(arguments: &'a Value, key: &str) -> Option<&'a str> {
    arguments.get(key).and_then(Value::as_str)
}

/// Integers may arrive as JSON numbers or numeric strings.
pub(super) fn required_i64(arguments: &Value, key: &str) -> Result<i64, GerritError> {
    let value = arguments
        .get(key)
        .ok_or_else(|| GerritError::invalid_argument(format!("{key} is required")))?;
    value
        .as_i64()
        .or_else(|| value.as_str().and_then(|s| s.trim().parse().ok()))
        .ok_or_else(|| GerritError::invalid_argument(format!("{key} must be an integer")))
}

pub(super) fn to_payload<T: Serialize>(value: &T) -> Result<Value, GerritError> {
    serde_json::to_value(value).map_err(|e| GerritError::decode(e.to_string(), ""))
}
