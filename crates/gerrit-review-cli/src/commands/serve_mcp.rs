use anyhow::{Context, Result};
use gerrit_review_core::config::Config;
use gerrit_review_mcp::http::{HttpState, run_http_server};
use std::sync::Arc;
use std::time::Instant;

pub fn run(config: &Config, skip_auth_check: bool) -> Result<()> {
    let client = super::connect(config, config.gerrit.validate_on_startup && !skip_auth_check)?;
    gerrit_review_mcp::server::run_server(config, Some(&client)).context("MCP server error")
}

/// Start the MCP server in HTTP transport mode.
pub fn run_http(config: Config, skip_auth_check: bool, bind_addr: &str, port: u16) -> Result<()> {
    // The blocking client must be built, and finally dropped, outside the runtime.
    let client = super::connect(&config, config.gerrit.validate_on_startup && !skip_auth_check)?;
    let state = Arc::new(HttpState {
        config,
        client: Some(client.clone()),
        server_start: Instant::now(),
    });

    let rt = tokio::runtime::Runtime::new().context("Failed to create tokio runtime")?;
    let served = rt.block_on(run_http_server(state, bind_addr, port));
    drop(rt);
    drop(client);
    served.context("MCP HTTP server error")
}
