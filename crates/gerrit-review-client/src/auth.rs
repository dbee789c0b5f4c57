use crate::client::GerritClient;
use gerrit_review_core::error::GerritError;
use serde::Deserialize;
use tracing::{info, warn};

/// The subset of Gerrit's `AccountInfo` reported after a credential check.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AccountInfo {
    #[serde(rename = "_account_id", default)]
    pub account_id: Option<u64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
}

impl AccountInfo {
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .or(self.username.as_deref())
            .or(self.email.as_deref())
            .unwrap_or("<unknown>")
    }
}

/// Confirm the configured credentials against `GET /a/accounts/self`,
/// bounded by the client's auth timeout.
pub fn validate_auth(client: &GerritClient) -> Result<AccountInfo, GerritError> {
    let raw = client
        .get_account_self(client.auth_timeout())
        .inspect_err(|e| warn!(base_url = client.base_url(), error = %e, "Gerrit authentication check failed"))?;
    let account: AccountInfo = serde_json::from_value(raw.clone())
        .map_err(|e| GerritError::decode(e.to_string(), raw.to_string()))?;
    info!(
        base_url = client.base_url(),
        account = account.display_name(),
        "authenticated with Gerrit"
    );
    Ok(account)
}
