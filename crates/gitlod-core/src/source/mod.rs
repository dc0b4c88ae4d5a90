//! # Record Sources
//!
//! The narrow interface between the engine and whatever mirrors the remote
//! API. Entities never talk to the network themselves; they hold a
//! [`SharedSource`] and call through [`RecordSource`].
//!
//! ## Contract
//!
//! - `user` / `repo` look a single record up, failing with `RecordNotFound`
//! - `list` returns what is loaded locally for an association (possibly empty)
//! - `fetch_*` refreshes a record in place and loads the requested
//!   associations, failing with `RemoteFetchError`
//!
//! Implementations must be `Send + Sync` so independent entities can be
//! traversed on different threads. Every remote call must be time-bounded.

mod memory;

pub use memory::{Fixture, MemorySource};

use crate::GitlodError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

// =============================================================================
// RECORDS
// =============================================================================

/// Mirror of a remote user.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UserRecord {
    pub login: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub blog: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// Set once the record's own fields were fetched from upstream.
    #[serde(default)]
    pub populated: bool,
}

impl UserRecord {
    /// An unpopulated stub carrying only a login.
    #[must_use]
    pub fn stub(login: impl Into<String>) -> Self {
        Self {
            login: login.into(),
            ..Self::default()
        }
    }
}

/// Mirror of a remote repository.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RepoRecord {
    pub owner: UserRecord,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub homepage: Option<String>,
    /// Browsable URL of the repository.
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub has_wiki: bool,
    #[serde(default)]
    pub has_issues: bool,
    #[serde(default)]
    pub populated: bool,
}

/// Any record an association can contain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Record {
    User(UserRecord),
    Repo(RepoRecord),
}

impl Record {
    /// Kind name for diagnostics.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::User(_) => "user",
            Self::Repo(_) => "repo",
        }
    }
}

impl From<UserRecord> for Record {
    fn from(r: UserRecord) -> Self {
        Self::User(r)
    }
}

impl From<RepoRecord> for Record {
    fn from(r: RepoRecord) -> Self {
        Self::Repo(r)
    }
}

// =============================================================================
// ASSOCIATIONS
// =============================================================================

/// What a fetch can load for a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Association {
    /// The record's own fields.
    Profile,
    Followers,
    Followings,
    Repos,
}

impl Association {
    /// Stable name, also used as the association-cache key.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Profile => "profile",
            Self::Followers => "followers",
            Self::Followings => "followings",
            Self::Repos => "repos",
        }
    }
}

// =============================================================================
// RECORD SOURCE TRAIT
// =============================================================================

/// Supplies raw records and their associations.
pub trait RecordSource: Send + Sync {
    /// Look up a user by login.
    fn user(&self, login: &str) -> Result<UserRecord, GitlodError>;

    /// Look up a repository by owner login and name.
    fn repo(&self, owner: &str, name: &str) -> Result<RepoRecord, GitlodError>;

    /// Every user loaded so far.
    fn users(&self) -> Result<Vec<UserRecord>, GitlodError>;

    /// Every repository loaded so far.
    fn repos(&self) -> Result<Vec<RepoRecord>, GitlodError>;

    /// Records loaded for `association` of the user `login`.
    ///
    /// Returns an empty list when nothing has been loaded yet.
    fn list(&self, login: &str, association: Association) -> Result<Vec<Record>, GitlodError>;

    /// Refresh `record` in place and load the requested associations.
    fn fetch_user(
        &self,
        record: &mut UserRecord,
        associations: &[Association],
    ) -> Result<(), GitlodError>;

    /// Refresh `record` in place.
    fn fetch_repo(&self, record: &mut RepoRecord) -> Result<(), GitlodError>;
}

/// Source handle shared by every entity built from it.
pub type SharedSource = Arc<dyn RecordSource>;
