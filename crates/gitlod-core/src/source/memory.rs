//! # In-Memory Source
//!
//! A `RecordSource` backed by `BTreeMap`s.
//!
//! Serves three roles:
//! - offline source loaded from a JSON fixture
//! - local record store underneath networked sources
//! - instrumented source for tests (call counters, unreachable logins)

use super::{Association, Record, RecordSource, RepoRecord, UserRecord};
use crate::GitlodError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

// =============================================================================
// FIXTURE FORMAT
// =============================================================================

/// JSON document describing a set of records and their relations.
///
/// Follower and following lists are keyed by login and hold logins.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Fixture {
    #[serde(default)]
    pub users: Vec<UserRecord>,
    #[serde(default)]
    pub repos: Vec<RepoRecord>,
    #[serde(default)]
    pub followers: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub followings: BTreeMap<String, Vec<String>>,
}

// =============================================================================
// STATE
// =============================================================================

#[derive(Debug, Default)]
struct MemoryState {
    users: BTreeMap<String, UserRecord>,
    /// Keyed by (owner login, repo name).
    repos: BTreeMap<(String, String), RepoRecord>,
    followers: BTreeMap<String, Vec<String>>,
    followings: BTreeMap<String, Vec<String>>,
    unreachable: BTreeSet<String>,
}

impl MemoryState {
    fn user_or_stub(&self, login: &str) -> UserRecord {
        self.users
            .get(login)
            .cloned()
            .unwrap_or_else(|| UserRecord::stub(login))
    }

    fn check_reachable(&self, login: &str) -> Result<(), GitlodError> {
        if self.unreachable.contains(login) {
            return Err(GitlodError::RemoteFetchError(format!(
                "{} is unreachable",
                login
            )));
        }
        Ok(())
    }
}

/// In-memory record source.
#[derive(Debug, Default)]
pub struct MemorySource {
    state: RwLock<MemoryState>,
    list_calls: AtomicUsize,
    fetch_calls: AtomicUsize,
}

impl MemorySource {
    /// Create an empty source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a source from a parsed fixture.
    #[must_use]
    pub fn from_fixture(fixture: Fixture) -> Self {
        let source = Self::new();
        if let Ok(mut state) = source.state.write() {
            for user in fixture.users {
                state.users.insert(user.login.clone(), user);
            }
            for repo in fixture.repos {
                state
                    .repos
                    .insert((repo.owner.login.clone(), repo.name.clone()), repo);
            }
            state.followers = fixture.followers;
            state.followings = fixture.followings;
        }
        source
    }

    /// Parse a fixture from JSON bytes.
    pub fn from_json(bytes: &[u8]) -> Result<Self, GitlodError> {
        let fixture: Fixture = serde_json::from_slice(bytes)
            .map_err(|e| GitlodError::SerializationError(format!("Fixture: {}", e)))?;
        Ok(Self::from_fixture(fixture))
    }

    /// Load a fixture file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, GitlodError> {
        let bytes = std::fs::read(path.as_ref()).map_err(|e| {
            GitlodError::IoError(format!("Read {}: {}", path.as_ref().display(), e))
        })?;
        Self::from_json(&bytes)
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, MemoryState>, GitlodError> {
        self.state
            .read()
            .map_err(|_| GitlodError::IoError("memory source lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, MemoryState>, GitlodError> {
        self.state
            .write()
            .map_err(|_| GitlodError::IoError("memory source lock poisoned".to_string()))
    }

    // =========================================================================
    // MUTATORS
    // =========================================================================

    /// Insert or replace a user.
    pub fn insert_user(&self, user: UserRecord) -> Result<(), GitlodError> {
        self.write()?.users.insert(user.login.clone(), user);
        Ok(())
    }

    /// Insert a user unless a populated record with that login already exists.
    pub fn merge_user(&self, user: UserRecord) -> Result<(), GitlodError> {
        let mut state = self.write()?;
        let keep_existing = state
            .users
            .get(&user.login)
            .is_some_and(|existing| existing.populated && !user.populated);
        if !keep_existing {
            state.users.insert(user.login.clone(), user);
        }
        Ok(())
    }

    /// Insert or replace a repository.
    pub fn insert_repo(&self, repo: RepoRecord) -> Result<(), GitlodError> {
        self.write()?
            .repos
            .insert((repo.owner.login.clone(), repo.name.clone()), repo);
        Ok(())
    }

    /// Replace the follower logins of `login`.
    pub fn set_followers(&self, login: &str, followers: Vec<String>) -> Result<(), GitlodError> {
        self.write()?.followers.insert(login.to_string(), followers);
        Ok(())
    }

    /// Replace the logins `login` follows.
    pub fn set_followings(&self, login: &str, followings: Vec<String>) -> Result<(), GitlodError> {
        self.write()?.followings.insert(login.to_string(), followings);
        Ok(())
    }

    /// Make every call touching `login` fail with `RemoteFetchError`.
    pub fn set_unreachable(&self, login: &str, unreachable: bool) -> Result<(), GitlodError> {
        let mut state = self.write()?;
        if unreachable {
            state.unreachable.insert(login.to_string());
        } else {
            state.unreachable.remove(login);
        }
        Ok(())
    }

    /// Number of `list` calls served so far.
    #[must_use]
    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::Relaxed)
    }

    /// Number of `fetch_*` calls served so far.
    #[must_use]
    pub fn fetch_calls(&self) -> usize {
        self.fetch_calls.load(Ordering::Relaxed)
    }
}

// =============================================================================
// RECORD SOURCE
// =============================================================================

impl RecordSource for MemorySource {
    fn user(&self, login: &str) -> Result<UserRecord, GitlodError> {
        self.read()?
            .users
            .get(login)
            .cloned()
            .ok_or_else(|| GitlodError::RecordNotFound(format!("user {}", login)))
    }

    fn repo(&self, owner: &str, name: &str) -> Result<RepoRecord, GitlodError> {
        self.read()?
            .repos
            .get(&(owner.to_string(), name.to_string()))
            .cloned()
            .ok_or_else(|| GitlodError::RecordNotFound(format!("repo {}/{}", owner, name)))
    }

    fn users(&self) -> Result<Vec<UserRecord>, GitlodError> {
        Ok(self.read()?.users.values().cloned().collect())
    }

    fn repos(&self) -> Result<Vec<RepoRecord>, GitlodError> {
        Ok(self.read()?.repos.values().cloned().collect())
    }

    fn list(&self, login: &str, association: Association) -> Result<Vec<Record>, GitlodError> {
        self.list_calls.fetch_add(1, Ordering::Relaxed);
        let state = self.read()?;
        state.check_reachable(login)?;

        let logins = match association {
            Association::Followers => state.followers.get(login),
            Association::Followings => state.followings.get(login),
            Association::Repos => {
                return Ok(state
                    .repos
                    .values()
                    .filter(|r| r.owner.login == login)
                    .cloned()
                    .map(Record::Repo)
                    .collect());
            }
            Association::Profile => {
                return Err(GitlodError::SchemaResolutionError(
                    "profile is not a listable association".to_string(),
                ));
            }
        };

        Ok(logins
            .into_iter()
            .flatten()
            .map(|l| Record::User(state.user_or_stub(l)))
            .collect())
    }

    fn fetch_user(
        &self,
        record: &mut UserRecord,
        associations: &[Association],
    ) -> Result<(), GitlodError> {
        self.fetch_calls.fetch_add(1, Ordering::Relaxed);
        let mut state = self.write()?;
        state.check_reachable(&record.login)?;

        // Associations are already local; only the profile needs refreshing.
        if associations.contains(&Association::Profile) {
            let stored = state
                .users
                .get_mut(&record.login)
                .ok_or_else(|| GitlodError::RecordNotFound(format!("user {}", record.login)))?;
            stored.populated = true;
            *record = stored.clone();
        }
        Ok(())
    }

    fn fetch_repo(&self, record: &mut RepoRecord) -> Result<(), GitlodError> {
        self.fetch_calls.fetch_add(1, Ordering::Relaxed);
        let mut state = self.write()?;
        state.check_reachable(&record.owner.login)?;

        let key = (record.owner.login.clone(), record.name.clone());
        let stored = state.repos.get_mut(&key).ok_or_else(|| {
            GitlodError::RecordNotFound(format!("repo {}/{}", key.0, key.1))
        })?;
        stored.populated = true;
        *record = stored.clone();
        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> MemorySource {
        let json = br#"{
            "users": [
                {"login": "alice", "name": "Alice"},
                {"login": "bob", "name": "Bob"}
            ],
            "repos": [
                {"owner": {"login": "alice"}, "name": "rdf", "url": "https://github.com/alice/rdf"}
            ],
            "followers": {"alice": ["bob", "carol"]},
            "followings": {"bob": ["alice"]}
        }"#;
        MemorySource::from_json(json).expect("fixture")
    }

    #[test]
    fn lookup_missing_user_is_not_found() {
        let source = fixture();
        assert!(matches!(
            source.user("nobody"),
            Err(GitlodError::RecordNotFound(_))
        ));
    }

    #[test]
    fn followers_resolve_known_and_stub_users() {
        let source = fixture();
        let followers = source.list("alice", Association::Followers).expect("list");
        assert_eq!(followers.len(), 2);
        assert!(matches!(
            &followers[1],
            Record::User(u) if u.login == "carol" && u.name.is_none()
        ));
        assert_eq!(source.list_calls(), 1);
    }

    #[test]
    fn repos_are_listed_by_owner() {
        let source = fixture();
        assert_eq!(source.list("alice", Association::Repos).expect("list").len(), 1);
        assert!(source.list("bob", Association::Repos).expect("list").is_empty());
    }

    #[test]
    fn fetch_profile_marks_populated() {
        let source = fixture();
        let mut record = UserRecord::stub("alice");
        source
            .fetch_user(&mut record, &[Association::Profile])
            .expect("fetch");
        assert!(record.populated);
        assert_eq!(record.name.as_deref(), Some("Alice"));
    }

    #[test]
    fn unreachable_login_fails_remote_calls() {
        let source = fixture();
        source.set_unreachable("alice", true).expect("set");
        assert!(matches!(
            source.list("alice", Association::Followers),
            Err(GitlodError::RemoteFetchError(_))
        ));
        source.set_unreachable("alice", false).expect("set");
        assert!(source.list("alice", Association::Followers).is_ok());
    }

    #[test]
    fn merge_keeps_populated_record() {
        let source = fixture();
        let mut full = UserRecord::stub("dave");
        full.name = Some("Dave".to_string());
        full.populated = true;
        source.insert_user(full).expect("insert");
        source.merge_user(UserRecord::stub("dave")).expect("merge");
        assert_eq!(
            source.user("dave").expect("user").name.as_deref(),
            Some("Dave")
        );
    }
}
