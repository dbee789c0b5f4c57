use crate::constants;
use crate::endpoint::Endpoint;
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub gerrit: GerritConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub review: ReviewConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct GerritConfig {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub api_token: Option<String>,
    #[serde(default = "default_validate_on_startup")]
    pub validate_on_startup: bool,
    /// Endpoints addressed without the authenticated `a/` path segment.
    #[serde(default = "default_unauthenticated_endpoints")]
    pub unauthenticated_endpoints: Vec<Endpoint>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_auth_timeout")]
    pub auth_timeout_secs: u64,
    #[serde(default = "default_pool_max_idle_per_host")]
    pub pool_max_idle_per_host: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewConfig {
    #[serde(default = "default_allowed_labels")]
    pub allowed_code_review_labels: Vec<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_validate_on_startup() -> bool {
    true
}
fn default_unauthenticated_endpoints() -> Vec<Endpoint> {
    Endpoint::ALL
        .into_iter()
        .filter(|e| !e.default_requires_auth())
        .collect()
}
fn default_request_timeout() -> u64 {
    constants::DEFAULT_REQUEST_TIMEOUT_SECS
}
fn default_connect_timeout() -> u64 {
    constants::DEFAULT_CONNECT_TIMEOUT_SECS
}
fn default_auth_timeout() -> u64 {
    constants::DEFAULT_AUTH_TIMEOUT_SECS
}
fn default_pool_max_idle_per_host() -> usize {
    constants::DEFAULT_POOL_MAX_IDLE_PER_HOST
}
fn default_allowed_labels() -> Vec<i32> {
    vec![-2, -1]
}
fn default_log_level() -> String {
    "info".into()
}

impl Default for GerritConfig {
    fn default() -> Self {
        Self {
            url: None,
            username: None,
            api_token: None,
            validate_on_startup: default_validate_on_startup(),
            unauthenticated_endpoints: default_unauthenticated_endpoints(),
        }
    }
}

impl std::fmt::Debug for GerritConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GerritConfig")
            .field("url", &self.url)
            .field("username", &self.username)
            .field("api_token", &self.api_token.as_ref().map(|_| "<redacted>"))
            .field("validate_on_startup", &self.validate_on_startup)
            .field("unauthenticated_endpoints", &self.unauthenticated_endpoints)
            .finish()
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: default_request_timeout(),
            connect_timeout_secs: default_connect_timeout(),
            auth_timeout_secs: default_auth_timeout(),
            pool_max_idle_per_host: default_pool_max_idle_per_host(),
        }
    }
}

impl HttpConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn auth_timeout(&self) -> Duration {
        Duration::from_secs(self.auth_timeout_secs)
    }
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            allowed_code_review_labels: default_allowed_labels(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Values supplied on the command line. They override every other layer.
#[derive(Debug, Clone, Default)]
pub struct CredentialOverrides {
    pub url: Option<String>,
    pub username: Option<String>,
    pub api_token: Option<String>,
}

/// Validated connection settings for one Gerrit server.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Base URL without a trailing slash.
    pub base_url: String,
    pub username: String,
    pub api_token: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .field("api_token", &"<redacted>")
            .finish()
    }
}

impl Config {
    /// Load configuration with layered precedence:
    /// 1. Environment variables (highest priority)
    /// 2. Explicit config file (from `--config` flag)
    /// 3. Global config: `~/.gerrit-review/config.toml`
    /// 4. Built-in defaults (lowest priority)
    ///
    /// Command-line credential flags are applied afterwards with
    /// [`Config::apply_overrides`].
    pub fn load_with_file(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        let mut merged = toml::Value::Table(toml::map::Map::new());

        if let Some(home) = dirs::home_dir() {
            let global_path = home
                .join(constants::DEFAULT_DATA_DIR)
                .join(constants::CONFIG_FILE);
            if global_path.exists() {
                debug!(path = %global_path.display(), "loading global config");
                let raw = load_toml_value(&global_path)?;
                merge_toml_values(&mut merged, &raw);
            }
        }

        if let Some(cf) = config_file {
            if !cf.exists() {
                return Err(ConfigError::NotFound {
                    path: cf.display().to_string(),
                });
            }
            debug!(path = %cf.display(), "loading config file");
            let raw = load_toml_value(cf)?;
            merge_toml_values(&mut merged, &raw);
        }

        let mut config = Self::from_toml_value(merged)?;
        config.apply_env_overrides_from(|key| std::env::var(key).ok());
        Ok(config)
    }

    fn from_toml_value(value: toml::Value) -> Result<Self, ConfigError> {
        let config_str =
            toml::to_string(&value).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        toml::from_str(&config_str).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Apply environment overrides using an injectable lookup.
    /// Convention: `GERRIT_URL`, `GERRIT_USERNAME`, `GERRIT_API_TOKEN`, and
    /// `GERRIT_REVIEW_<SECTION>_<KEY>` in UPPER_SNAKE_CASE for everything else.
    pub fn apply_env_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup(constants::ENV_GERRIT_URL).filter(|v| !v.is_empty()) {
            self.gerrit.url = Some(v);
        }
        if let Some(v) = lookup(constants::ENV_GERRIT_USERNAME).filter(|v| !v.is_empty()) {
            self.gerrit.username = Some(v);
        }
        if let Some(v) = lookup(constants::ENV_GERRIT_API_TOKEN).filter(|v| !v.is_empty()) {
            self.gerrit.api_token = Some(v);
        }
        if let Some(v) = lookup("GERRIT_REVIEW_GERRIT_VALIDATE_ON_STARTUP") {
            self.gerrit.validate_on_startup = v == "true" || v == "1";
        }
        if let Some(v) = lookup("GERRIT_REVIEW_HTTP_REQUEST_TIMEOUT_SECS")
            && let Ok(n) = v.parse()
        {
            self.http.request_timeout_secs = n;
        }
        if let Some(v) = lookup("GERRIT_REVIEW_HTTP_CONNECT_TIMEOUT_SECS")
            && let Ok(n) = v.parse()
        {
            self.http.connect_timeout_secs = n;
        }
        if let Some(v) = lookup("GERRIT_REVIEW_HTTP_AUTH_TIMEOUT_SECS")
            && let Ok(n) = v.parse()
        {
            self.http.auth_timeout_secs = n;
        }
        if let Some(v) = lookup("GERRIT_REVIEW_LOGGING_LEVEL") {
            self.logging.level = v;
        }
    }

    pub fn apply_overrides(&mut self, overrides: CredentialOverrides) {
        if let Some(url) = overrides.url {
            self.gerrit.url = Some(url);
        }
        if let Some(username) = overrides.username {
            self.gerrit.username = Some(username);
        }
        if let Some(token) = overrides.api_token {
            self.gerrit.api_token = Some(token);
        }
    }

    /// Validate that url, username and token are all present.
    pub fn credentials(&self) -> Result<Credentials, ConfigError> {
        let url = present(&self.gerrit.url);
        let username = present(&self.gerrit.username);
        let api_token = present(&self.gerrit.api_token);

        let mut missing = Vec::new();
        if url.is_none() {
            missing.push(constants::ENV_GERRIT_URL);
        }
        if username.is_none() {
            missing.push(constants::ENV_GERRIT_USERNAME);
        }
        if api_token.is_none() {
            missing.push(constants::ENV_GERRIT_API_TOKEN);
        }

        match (url, username, api_token) {
            (Some(url), Some(username), Some(api_token)) => {
                if !(url.starts_with("http://") || url.starts_with("https://")) {
                    return Err(ConfigError::InvalidValue {
                        field: "gerrit.url".into(),
                        reason: format!("expected an http(s) URL, got {url:?}"),
                    });
                }
                Ok(Credentials {
                    base_url: url.trim_end_matches('/').to_string(),
                    username: username.to_string(),
                    api_token: api_token.to_string(),
                })
            }
            _ => Err(ConfigError::MissingCredentials { missing }),
        }
    }

    pub fn requires_auth(&self, endpoint: Endpoint) -> bool {
        !self.gerrit.unauthenticated_endpoints.contains(&endpoint)
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn load_toml_value(path: &Path) -> Result<toml::Value, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    content
        .parse::<toml::Value>()
        .map_err(|e| ConfigError::ParseError(e.to_string()))
}

/// Deep-merge `overlay` into `base`. Only keys present in `overlay` are written.
fn merge_toml_values(base: &mut toml::Value, overlay: &toml::Value) {
    if let (toml::Value::Table(base_map), toml::Value::Table(overlay_map)) = (base, overlay) {
        for (key, overlay_val) in overlay_map {
            if let Some(base_val) = base_map.get_mut(key) {
                if base_val.is_table() && overlay_val.is_table() {
                    merge_toml_values(base_val, overlay_val);
                } else {
                    *base_val = overlay_val.clone();
                }
            } else {
                base_map.insert(key.clone(), overlay_val.clone());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn complete_config() -> Config {
        let mut config = Config::default();
        config.gerrit.url = Some("https://gerrit.example.com/".into());
        config.gerrit.username = Some("bot".into());
        config.gerrit.api_token = Some("s3cret".into());
        config
    }

    #[test]
    fn defaults_match_documented_values() {
        let config = Config::default();
        assert_eq!(config.http.request_timeout_secs, 30);
        assert_eq!(config.http.connect_timeout_secs, 10);
        assert!(config.gerrit.validate_on_startup);
        assert_eq!(config.review.allowed_code_review_labels, vec![-2, -1]);
        assert!(config.requires_auth(Endpoint::CommitInfo));
        assert!(!config.requires_auth(Endpoint::CommitMessage));
    }

    #[test]
    fn credentials_trim_trailing_slash() {
        let creds = complete_config().credentials().unwrap();
        assert_eq!(creds.base_url, "https://gerrit.example.com");
        assert_eq!(creds.username, "bot");
    }

    #[test]
    fn credentials_report_every_missing_setting() {
        let mut config = Config::default();
        config.gerrit.username = Some("bot".into());
        config.gerrit.api_token = Some("   ".into());
        match config.credentials() {
            Err(ConfigError::MissingCredentials { missing }) => {
                assert_eq!(missing, vec!["GERRIT_URL", "GERRIT_API_TOKEN"]);
            }
            other => panic!("expected MissingCredentials, got {other:?}"),
        }
    }

    #[test]
    fn credentials_reject_non_http_url() {
        let mut config = complete_config();
        config.gerrit.url = Some("gerrit.example.com".into());
        assert!(matches!(
            config.credentials(),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn credentials_debug_redacts_token() {
        let creds = complete_config().credentials().unwrap();
        let rendered = format!("{creds:?}");
        assert!(!rendered.contains("s3cret"));
        assert!(rendered.contains("<redacted>"));
        assert!(!format!("{:?}", complete_config().gerrit).contains("s3cret"));
    }

    #[test]
    fn env_overrides_apply_from_lookup() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("GERRIT_URL", "https://review.example.org"),
            ("GERRIT_USERNAME", "alice"),
            ("GERRIT_API_TOKEN", "tok"),
            ("GERRIT_REVIEW_HTTP_REQUEST_TIMEOUT_SECS", "5"),
            ("GERRIT_REVIEW_GERRIT_VALIDATE_ON_STARTUP", "0"),
            ("GERRIT_REVIEW_LOGGING_LEVEL", "debug"),
        ]);
        let mut config = Config::default();
        config.apply_env_overrides_from(|k| env.get(k).map(|v| v.to_string()));

        assert_eq!(config.gerrit.url.as_deref(), Some("https://review.example.org"));
        assert_eq!(config.gerrit.username.as_deref(), Some("alice"));
        assert_eq!(config.http.request_timeout_secs, 5);
        assert!(!config.gerrit.validate_on_startup);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn cli_overrides_win_over_env() {
        let mut config = Config::default();
        config.apply_env_overrides_from(|k| {
            (k == "GERRIT_USERNAME").then(|| "from-env".to_string())
        });
        config.apply_overrides(CredentialOverrides {
            username: Some("from-cli".into()),
            ..Default::default()
        });
        assert_eq!(config.gerrit.username.as_deref(), Some("from-cli"));
    }

    #[test]
    fn config_file_layer_only_overrides_explicit_keys() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
            [gerrit]
            url = "https://gerrit.internal"
            unauthenticated_endpoints = []

            [http]
            request_timeout_secs = 12
            "#,
        )
        .unwrap();

        let mut merged = toml::Value::Table(toml::map::Map::new());
        merge_toml_values(&mut merged, &load_toml_value(&path).unwrap());
        let config = Config::from_toml_value(merged).unwrap();

        assert_eq!(config.gerrit.url.as_deref(), Some("https://gerrit.internal"));
        assert_eq!(config.http.request_timeout_secs, 12);
        assert_eq!(config.http.connect_timeout_secs, 10);
        assert!(config.requires_auth(Endpoint::CommitMessage));
    }

    #[test]
    fn missing_explicit_config_file_is_reported() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("nope.toml");
        assert!(matches!(
            Config::load_with_file(Some(&missing)),
            Err(ConfigError::NotFound { .. })
        ));
    }
}
