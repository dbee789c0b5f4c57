use thiserror::Error;

/// Failures of a single Gerrit REST interaction.
///
/// `Transport` and `Timeout` are transient and safe to retry. Every other
/// variant is final for the given input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GerritError {
    #[error("{0}")]
    InvalidArgument(String),

    #[error("resource not found: {path}")]
    NotFound { path: String },

    #[error("Gerrit API error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("connection error: {0}")]
    Transport(String),

    #[error("request timed out after {timeout_ms} ms: {path}")]
    Timeout { path: String, timeout_ms: u64 },

    #[error("invalid JSON response: {reason}")]
    Decode { reason: String, body: String },
}

impl GerritError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    pub fn not_found(path: impl Into<String>) -> Self {
        Self::NotFound { path: path.into() }
    }

    pub fn api(status: u16, body: impl Into<String>) -> Self {
        Self::Api {
            status,
            body: body.into(),
        }
    }

    /// Convenience constructor for transport errors, use with `.map_err(GerritError::transport)`.
    pub fn transport<E: std::fmt::Display>(e: E) -> Self {
        Self::Transport(e.to_string())
    }

    pub fn timeout(path: impl Into<String>, timeout_ms: u64) -> Self {
        Self::Timeout {
            path: path.into(),
            timeout_ms,
        }
    }

    pub fn decode(reason: impl Into<String>, body: impl Into<String>) -> Self {
        Self::Decode {
            reason: reason.into(),
            body: body.into(),
        }
    }

    /// Stable class label used as the prefix of tool error payloads.
    pub const fn class_name(&self) -> &'static str {
        match self {
            Self::InvalidArgument(_) => "InvalidArgument",
            Self::NotFound { .. } => "NotFound",
            Self::Api { .. } => "ApiError",
            Self::Transport(_) => "TransportError",
            Self::Timeout { .. } => "Timeout",
            Self::Decode { .. } => "DecodeError",
        }
    }

    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Timeout { .. })
    }

    /// `<class>: <message>`, the uniform text handed back to tool callers.
    pub fn to_tool_message(&self) -> String {
        format!("{}: {}", self.class_name(), self)
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    NotFound { path: String },

    #[error("failed to parse config: {0}")]
    ParseError(String),

    #[error("invalid config value: {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error(
        "missing required settings: {} (pass them as arguments or environment variables)",
        .missing.join(", ")
    )]
    MissingCredentials { missing: Vec<&'static str> },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failures of the MCP transport itself, as opposed to tool failures, which
/// are reported in-band.
#[derive(Error, Debug)]
pub enum McpError {
    #[error("internal error: {0}")]
    Internal(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
