//! # Configuration
//!
//! `gitlod.toml`, environment overrides, and the values the CLI and server
//! are built from.
//!
//! ## Precedence (lowest to highest)
//!
//! 1. Built-in defaults
//! 2. The config file (`--config`, or `./gitlod.toml` when present)
//! 3. Environment: `GITLOD_GITHUB_TOKEN`, `GITLOD_RATE_LIMIT`, `GITLOD_CORS_ORIGINS`
//! 4. Command-line flags
//!
//! Every field is optional; an absent file is the same as an empty one.

use gitlod_core::primitives::DEFAULT_REMOTE_TIMEOUT_MS;
use gitlod_core::{FailurePolicy, GitlodError, Traversal};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// File looked up in the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "gitlod.toml";

/// Public GitHub REST endpoint.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Default rate limit: 100 requests per second.
pub const DEFAULT_RATE_LIMIT: u32 = 100;

// =============================================================================
// SECTIONS
// =============================================================================

/// Where records come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// The live GitHub REST API.
    #[default]
    Github,
    /// A JSON fixture loaded into memory.
    Fixture,
}

/// `[source]`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SourceConfig {
    pub kind: SourceKind,
    pub api_url: String,
    pub timeout_ms: u64,
    pub token: Option<String>,
    pub fixture: Option<PathBuf>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            kind: SourceKind::default(),
            api_url: DEFAULT_API_URL.to_string(),
            timeout_ms: DEFAULT_REMOTE_TIMEOUT_MS,
            token: None,
            fixture: None,
        }
    }
}

impl SourceConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// `[server]`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Requests per second; 0 disables limiting.
    pub rate_limit: u32,
    /// Comma-separated origins, or `*`. Unset means localhost only.
    pub cors_origins: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            rate_limit: DEFAULT_RATE_LIMIT,
            cors_origins: None,
        }
    }
}

impl ServerConfig {
    /// `host:port` for binding.
    #[must_use]
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Failure policy as spelled in the config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OnFailure {
    #[default]
    Abort,
    Skip,
}

impl From<OnFailure> for FailurePolicy {
    fn from(value: OnFailure) -> Self {
        match value {
            OnFailure::Abort => FailurePolicy::Abort,
            OnFailure::Skip => FailurePolicy::Skip,
        }
    }
}

/// `[traversal]`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TraversalConfig {
    pub on_failure: OnFailure,
}

// =============================================================================
// CONFIG
// =============================================================================

/// Complete application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub source: SourceConfig,
    pub server: ServerConfig,
    pub traversal: TraversalConfig,
}

impl Config {
    /// Parse a TOML document.
    pub fn parse(text: &str) -> Result<Self, GitlodError> {
        let config: Self =
            toml::from_str(text).map_err(|e| GitlodError::ConfigError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that parse but cannot work.
    ///
    /// A zero timeout would fail every remote call.
    pub fn validate(&self) -> Result<(), GitlodError> {
        if self.source.timeout_ms == 0 {
            return Err(GitlodError::ConfigError(
                "source.timeout_ms must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Read and parse a config file.
    pub fn load(path: &Path) -> Result<Self, GitlodError> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            GitlodError::ConfigError(format!("Cannot read {}: {}", path.display(), e))
        })?;
        let config = Self::parse(&text)?;
        tracing::debug!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    /// Load `path`, or `./gitlod.toml` if it exists, or the defaults.
    pub fn discover(path: Option<&Path>) -> Result<Self, GitlodError> {
        match path {
            Some(path) => Self::load(path),
            None => {
                let default = Path::new(DEFAULT_CONFIG_FILE);
                if default.is_file() {
                    Self::load(default)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Apply overrides from the process environment.
    pub fn with_env(self) -> Result<Self, GitlodError> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from `lookup`, which maps a variable name to its value.
    pub fn with_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, GitlodError> {
        if let Some(token) = lookup("GITLOD_GITHUB_TOKEN").filter(|t| !t.is_empty()) {
            self.source.token = Some(token);
        }
        if let Some(limit) = lookup("GITLOD_RATE_LIMIT") {
            self.server.rate_limit = limit.trim().parse().map_err(|_| {
                GitlodError::ConfigError(format!("GITLOD_RATE_LIMIT is not a number: {}", limit))
            })?;
        }
        if let Some(origins) = lookup("GITLOD_CORS_ORIGINS") {
            self.server.cors_origins = Some(origins);
        }
        Ok(self)
    }

    /// Switch to a fixture source at `path`.
    pub fn use_fixture(&mut self, path: PathBuf) {
        self.source.kind = SourceKind::Fixture;
        self.source.fixture = Some(path);
    }

    /// The traversal every emission runs with.
    #[must_use]
    pub fn traversal(&self) -> Traversal {
        Traversal::new().on_failure(self.traversal.on_failure.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn empty_document_is_default() {
        assert_eq!(Config::parse("").expect("parse"), Config::default());
    }

    #[test]
    fn full_document_parses() {
        let config = Config::parse(
            r#"
            [source]
            kind = "fixture"
            fixture = "records.json"
            timeout_ms = 2500

            [server]
            host = "0.0.0.0"
            port = 9000
            rate_limit = 0

            [traversal]
            on_failure = "skip"
            "#,
        )
        .expect("parse");

        assert_eq!(config.source.kind, SourceKind::Fixture);
        assert_eq!(config.source.fixture, Some(PathBuf::from("records.json")));
        assert_eq!(config.source.timeout(), Duration::from_millis(2500));
        assert_eq!(config.source.api_url, DEFAULT_API_URL);
        assert_eq!(config.server.addr(), "0.0.0.0:9000");
        assert_eq!(config.server.rate_limit, 0);
        assert_eq!(config.traversal().policy(), FailurePolicy::Skip);
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let result = Config::parse("[source]\ntimeout_ms = 0\n");
        assert!(matches!(result, Err(GitlodError::ConfigError(_))));
        assert!(Config::parse("[source]\ntimeout_ms = 1\n").is_ok());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let result = Config::parse("[server]\nprot = 80\n");
        assert!(matches!(result, Err(GitlodError::ConfigError(_))));
    }

    #[test]
    fn unknown_policy_is_rejected() {
        let result = Config::parse("[traversal]\non_failure = \"retry\"\n");
        assert!(matches!(result, Err(GitlodError::ConfigError(_))));
    }

    #[test]
    fn environment_overrides_file() {
        let env: BTreeMap<&str, &str> = [
            ("GITLOD_GITHUB_TOKEN", "secret"),
            ("GITLOD_RATE_LIMIT", " 7 "),
            ("GITLOD_CORS_ORIGINS", "*"),
        ]
        .into_iter()
        .collect();

        let config = Config::parse("[server]\nrate_limit = 50\n")
            .expect("parse")
            .with_overrides(|k| env.get(k).map(|v| v.to_string()))
            .expect("overrides");

        assert_eq!(config.source.token.as_deref(), Some("secret"));
        assert_eq!(config.server.rate_limit, 7);
        assert_eq!(config.server.cors_origins.as_deref(), Some("*"));
    }

    #[test]
    fn empty_token_does_not_override() {
        let config = Config::parse("[source]\ntoken = \"file\"\n")
            .expect("parse")
            .with_overrides(|k| (k == "GITLOD_GITHUB_TOKEN").then(String::new))
            .expect("overrides");
        assert_eq!(config.source.token.as_deref(), Some("file"));
    }

    #[test]
    fn bad_rate_limit_is_config_error() {
        let result = Config::default()
            .with_overrides(|k| (k == "GITLOD_RATE_LIMIT").then(|| "fast".to_string()));
        assert!(matches!(result, Err(GitlodError::ConfigError(_))));
    }

    #[test]
    fn use_fixture_switches_kind() {
        let mut config = Config::default();
        config.use_fixture(PathBuf::from("x.json"));
        assert_eq!(config.source.kind, SourceKind::Fixture);
        assert_eq!(config.traversal().policy(), FailurePolicy::Abort);
    }
}
