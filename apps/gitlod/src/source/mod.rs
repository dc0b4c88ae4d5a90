//! # Sources
//!
//! Builds the `SharedSource` the server and CLI run against.
//!
//! - `github`: [`GitHubSource`], the live REST API over a local record store
//! - `fixture`: the core's `MemorySource` loaded from a JSON file

mod github;

pub use github::GitHubSource;

use crate::config::{SourceConfig, SourceKind};
use gitlod_core::{GitlodError, MemorySource, SharedSource};
use std::sync::Arc;

// =============================================================================
// NAME CHECKS
// =============================================================================
//
// Logins and repository names end up as URL path segments; anything outside
// GitHub's alphabet is rejected before a URL is built.

/// A login is ASCII alphanumerics and hyphens.
pub fn checked_login(login: &str) -> Result<&str, GitlodError> {
    if !login.is_empty() && login.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
        Ok(login)
    } else {
        Err(GitlodError::RecordNotFound(format!("user {:?}", login)))
    }
}

/// A repository name is ASCII alphanumerics, `.`, `_` and `-`, but never a
/// bare `.` or `..`.
pub fn checked_repo_name<'a>(owner: &str, name: &'a str) -> Result<&'a str, GitlodError> {
    let allowed = name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'));
    if allowed && !name.is_empty() && name != "." && name != ".." {
        Ok(name)
    } else {
        Err(GitlodError::RecordNotFound(format!(
            "repo {}/{:?}",
            owner, name
        )))
    }
}

// =============================================================================
// OPEN
// =============================================================================

/// Open the source described by `config`.
///
/// Builds a blocking HTTP client for `github`; call it off the async runtime.
pub fn open(config: &SourceConfig) -> Result<SharedSource, GitlodError> {
    match config.kind {
        SourceKind::Fixture => {
            let path = config.fixture.as_ref().ok_or_else(|| {
                GitlodError::ConfigError("source.kind = \"fixture\" needs source.fixture".into())
            })?;
            let source = MemorySource::from_path(path)?;
            tracing::info!(path = %path.display(), "serving records from fixture");
            Ok(Arc::new(source))
        }
        SourceKind::Github => {
            let source =
                GitHubSource::new(&config.api_url, config.timeout(), config.token.clone())?;
            tracing::info!(
                api = %config.api_url,
                authenticated = config.token.is_some(),
                "serving records from GitHub"
            );
            Ok(Arc::new(source))
        }
    }
}
