use gerrit_review_core::constants::CONFIG_RESOURCE_URI;
use serde::Serialize;
use serde_json::{Value, json};

const CAPABILITIES: [&str; 2] = ["code-review", "submit"];

#[derive(Debug, Clone, Serialize)]
pub struct ResourceDefinition {
    pub uri: String,
    pub name: String,
    pub description: String,
    #[serde(rename = "mimeType")]
    pub mime_type: String,
}

pub fn list_resources() -> Vec<ResourceDefinition> {
    vec![ResourceDefinition {
        uri: CONFIG_RESOURCE_URI.into(),
        name: "Gerrit configuration".into(),
        description: "Gerrit server this instance talks to, with its version and capabilities."
            .into(),
        mime_type: "application/json".into(),
    }]
}

/// Contents of a resource in `resources/read` shape, or `None` for an unknown URI.
pub fn read_resource(uri: &str, base_url: Option<&str>) -> Option<Value> {
    if uri != CONFIG_RESOURCE_URI {
        return None;
    }
    let config = json!({
        "base_url": base_url,
        "version": env!("CARGO_PKG_VERSION"),
        "capabilities": CAPABILITIES,
    });
    Some(json!({
        "contents": [{
            "uri": uri,
            "mimeType": "application/json",
            "text": config.to_string(),
        }]
    }))
}
