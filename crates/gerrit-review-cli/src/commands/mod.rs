pub mod check_auth;
pub mod serve_mcp;

use anyhow::{Context, Result};
use gerrit_review_client::GerritClient;
use gerrit_review_client::auth::validate_auth;
use gerrit_review_core::config::Config;
use tracing::info;

/// Build the pooled Gerrit session and, unless told otherwise, prove the
/// credentials work before anything is served.
pub(crate) fn connect(config: &Config, validate: bool) -> Result<GerritClient> {
    let credentials = config
        .credentials()
        .context("Gerrit connection settings are incomplete")?;
    let client =
        GerritClient::new(&credentials, config).context("Failed to create Gerrit session")?;

    if validate {
        let account = validate_auth(&client).context("Gerrit authentication failed")?;
        info!(
            base_url = client.base_url(),
            account = account.display_name(),
            "Gerrit session ready"
        );
    } else {
        info!(base_url = client.base_url(), "Gerrit session ready (auth check skipped)");
    }
    Ok(client)
}
