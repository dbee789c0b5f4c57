mod commands;

use clap::{Args, Parser, Subcommand, ValueEnum};
use gerrit_review_core::config::{Config, CredentialOverrides};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "gerrit-review",
    version,
    about = "Gerrit code review tools for AI agents over MCP",
    long_about = "gerrit-review exposes Gerrit's REST API as MCP tools so an agent can read\n\
        a change, inspect per-file diffs, leave draft comments and publish a review.\n\n\
        Credentials come from --gerrit-url/--username/--api-token, the GERRIT_URL,\n\
        GERRIT_USERNAME and GERRIT_API_TOKEN environment variables, or\n\
        ~/.gerrit-review/config.toml.\n\n\
        Quick start:\n  \
        gerrit-review check-auth\n  \
        gerrit-review serve-mcp"
)]
struct Cli {
    /// Enable verbose logging (set log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (default: ~/.gerrit-review/config.toml)
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug, Default)]
struct CredentialArgs {
    /// Base URL of the Gerrit server, e.g. https://review.example.com
    #[arg(long)]
    gerrit_url: Option<String>,

    /// Gerrit username for HTTP Basic authentication
    #[arg(long)]
    username: Option<String>,

    /// Gerrit HTTP password / API token
    #[arg(long)]
    api_token: Option<String>,
}

impl From<CredentialArgs> for CredentialOverrides {
    fn from(args: CredentialArgs) -> Self {
        Self {
            url: args.gerrit_url,
            username: args.username,
            api_token: args.api_token,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Transport {
    Stdio,
    Http,
}

#[derive(Subcommand)]
enum Commands {
    /// Start MCP server (stdio or HTTP JSON-RPC transport)
    ///
    /// Exposes get_commit_info, get_change_detail, get_commit_message,
    /// get_related_changes, get_file_list, get_file_diff, create_draft_comment
    /// and set_review to AI agents via the Model Context Protocol.
    ///
    /// Examples:
    ///   gerrit-review serve-mcp
    ///   gerrit-review serve-mcp --transport http --port 9100
    ServeMcp {
        #[command(flatten)]
        credentials: CredentialArgs,

        /// Transport mode
        #[arg(long, value_enum, default_value = "stdio")]
        transport: Transport,

        /// HTTP server port (only used with --transport http)
        #[arg(long, default_value = "9100")]
        port: u16,

        /// HTTP server bind address (only used with --transport http)
        #[arg(long, default_value = "127.0.0.1")]
        bind: String,

        /// Do not call /a/accounts/self before serving
        #[arg(long)]
        skip_auth_check: bool,
    },
    /// Verify Gerrit credentials and print the authenticated account
    ///
    /// Example: gerrit-review check-auth --gerrit-url https://review.example.com
    CheckAuth {
        #[command(flatten)]
        credentials: CredentialArgs,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config_file = cli.config.as_deref().map(std::path::Path::new);
    let mut config = Config::load_with_file(config_file)?;

    // Logs go to stderr: stdout carries the stdio JSON-RPC stream.
    let filter = if cli.verbose {
        "debug".to_string()
    } else {
        config.logging.level.clone()
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    match cli.command {
        Commands::ServeMcp {
            credentials,
            transport,
            port,
            bind,
            skip_auth_check,
        } => {
            config.apply_overrides(credentials.into());
            match transport {
                Transport::Http => {
                    commands::serve_mcp::run_http(config, skip_auth_check, &bind, port)?;
                }
                Transport::Stdio => {
                    commands::serve_mcp::run(&config, skip_auth_check)?;
                }
            }
        }
        Commands::CheckAuth { credentials } => {
            config.apply_overrides(credentials.into());
            commands::check_auth::run(&config)?;
        }
    }

    Ok(())
}
