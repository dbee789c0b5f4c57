/// Anti-XSSI prefix Gerrit prepends to every JSON response body.
pub const GERRIT_MAGIC_PREFIX: &str = ")]}'";

/// Path segment that routes a request through Gerrit's authenticated REST surface.
pub const AUTH_SEGMENT: &str = "a";

pub const CHANGES_SEGMENT: &str = "changes";
pub const CURRENT_REVISION: &str = "current";

/// Pseudo-file Gerrit lists alongside real files in a revision.
pub const COMMIT_MSG_PSEUDO_FILE: &str = "/COMMIT_MSG";

pub const CODE_REVIEW_LABEL: &str = "Code-Review";
pub const DRAFTS_PUBLISH: &str = "PUBLISH";

/// Sentinel `line` value that turns a draft into a file-level comment.
pub const FILE_LEVEL_COMMENT_LINE: i64 = -1;

pub const DEFAULT_DATA_DIR: &str = ".gerrit-review";
pub const CONFIG_FILE: &str = "config.toml";

pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_AUTH_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_POOL_MAX_IDLE_PER_HOST: usize = 5;

pub const ENV_GERRIT_URL: &str = "GERRIT_URL";
pub const ENV_GERRIT_USERNAME: &str = "GERRIT_USERNAME";
pub const ENV_GERRIT_API_TOKEN: &str = "GERRIT_API_TOKEN";

pub const MCP_PROTOCOL_VERSION: &str = "2024-11-05";
pub const SERVER_NAME: &str = "Gerrit Review Server";
pub const CONFIG_RESOURCE_URI: &str = "gerrit://config";
