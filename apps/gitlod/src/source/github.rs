//! # GitHub Source
//!
//! `RecordSource` over the GitHub REST API (v3).
//!
//! Records are mirrored into a local [`MemorySource`]: lookups and `list`
//! read the mirror, `fetch_*` refreshes it from upstream. A lookup that
//! misses the mirror goes upstream once and stores the result.
//!
//! Logins and repository names pass [`checked_login`] and
//! [`checked_repo_name`] before they reach a URL, so a path segment can never
//! climb out of its endpoint.
//!
//! Every request carries the configured timeout. A 404 becomes
//! `RecordNotFound`; any other failure (transport, status, body) becomes
//! `RemoteFetchError`.

use super::{checked_login, checked_repo_name};
use gitlod_core::{
    Association, GitlodError, MemorySource, Record, RecordSource, RepoRecord, UserRecord,
};
use reqwest::StatusCode;
use reqwest::blocking::Client;
use reqwest::header::ACCEPT;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Page size requested for list endpoints (the API maximum).
const PER_PAGE: usize = 100;

/// Upper bound on pages read for one list.
const MAX_PAGES: usize = 10;

const USER_AGENT: &str = concat!("gitlod/", env!("CARGO_PKG_VERSION"));

// =============================================================================
// WIRE TYPES
// =============================================================================

#[derive(Debug, Deserialize)]
struct LoginWire {
    login: String,
}

/// Repository as returned by `/repos/{owner}/{name}` and `/users/{login}/repos`.
#[derive(Debug, Deserialize)]
struct RepoWire {
    owner: UserRecord,
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    language: Option<String>,
    #[serde(default)]
    homepage: Option<String>,
    #[serde(default)]
    html_url: Option<String>,
    #[serde(default)]
    has_wiki: bool,
    #[serde(default)]
    has_issues: bool,
}

impl RepoWire {
    /// Convert, preferring `owner` over the partial owner in the payload.
    fn into_record(self, owner: Option<&UserRecord>) -> RepoRecord {
        RepoRecord {
            owner: owner.cloned().unwrap_or(self.owner),
            name: self.name,
            description: self.description,
            language: self.language,
            homepage: self.homepage,
            url: self.html_url,
            has_wiki: self.has_wiki,
            has_issues: self.has_issues,
            populated: true,
        }
    }
}

// =============================================================================
// SOURCE
// =============================================================================

/// Live GitHub source with a local mirror.
#[derive(Debug)]
pub struct GitHubSource {
    http: Client,
    api_url: String,
    token: Option<String>,
    store: MemorySource,
}

impl GitHubSource {
    /// Build a source for `api_url` whose requests time out after `timeout`.
    pub fn new(
        api_url: &str,
        timeout: Duration,
        token: Option<String>,
    ) -> Result<Self, GitlodError> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| GitlodError::ConfigError(format!("HTTP client: {}", e)))?;

        Ok(Self {
            http,
            api_url: api_url.trim_end_matches('/').to_string(),
            token,
            store: MemorySource::new(),
        })
    }

    /// The local mirror.
    #[must_use]
    pub fn store(&self) -> &MemorySource {
        &self.store
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }

    fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, GitlodError> {
        let url = self.url(path);
        let mut request = self
            .http
            .get(&url)
            .header(ACCEPT, "application/vnd.github+json");
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .map_err(|e| GitlodError::RemoteFetchError(format!("GET {}: {}", url, e)))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(GitlodError::RecordNotFound(path.to_string()));
        }
        if !status.is_success() {
            return Err(GitlodError::RemoteFetchError(format!(
                "GET {}: {}",
                url, status
            )));
        }

        tracing::debug!(%url, "fetched");
        response
            .json()
            .map_err(|e| GitlodError::RemoteFetchError(format!("GET {}: {}", url, e)))
    }

    /// Read a paginated list, stopping at the first short page.
    fn get_pages<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>, GitlodError> {
        let mut all = Vec::new();
        for page in 1..=MAX_PAGES {
            let batch: Vec<T> =
                self.get(&format!("{}?per_page={}&page={}", path, PER_PAGE, page))?;
            let last = batch.len() < PER_PAGE;
            all.extend(batch);
            if last {
                return Ok(all);
            }
        }
        tracing::warn!(path, pages = MAX_PAGES, "list truncated");
        Ok(all)
    }

    fn remote_user(&self, login: &str) -> Result<UserRecord, GitlodError> {
        let login = checked_login(login)?;
        let mut user: UserRecord = self.get(&format!("/users/{}", login))?;
        user.populated = true;
        Ok(user)
    }

    fn remote_repo(
        &self,
        owner: &str,
        name: &str,
        known_owner: Option<&UserRecord>,
    ) -> Result<RepoRecord, GitlodError> {
        let owner = checked_login(owner)?;
        let name = checked_repo_name(owner, name)?;
        let wire: RepoWire = self.get(&format!("/repos/{}/{}", owner, name))?;
        Ok(wire.into_record(known_owner))
    }

    fn remote_logins(&self, path: &str) -> Result<Vec<String>, GitlodError> {
        Ok(self
            .get_pages::<LoginWire>(path)?
            .into_iter()
            .map(|w| w.login)
            .collect())
    }
}

impl RecordSource for GitHubSource {
    fn user(&self, login: &str) -> Result<UserRecord, GitlodError> {
        match self.store.user(login) {
            Err(GitlodError::RecordNotFound(_)) => {
                let user = self.remote_user(login)?;
                self.store.merge_user(user.clone())?;
                Ok(user)
            }
            found => found,
        }
    }

    fn repo(&self, owner: &str, name: &str) -> Result<RepoRecord, GitlodError> {
        match self.store.repo(owner, name) {
            Err(GitlodError::RecordNotFound(_)) => {
                let known = self.store.user(owner).ok();
                let repo = self.remote_repo(owner, name, known.as_ref())?;
                self.store.insert_repo(repo.clone())?;
                Ok(repo)
            }
            found => found,
        }
    }

    fn users(&self) -> Result<Vec<UserRecord>, GitlodError> {
        self.store.users()
    }

    fn repos(&self) -> Result<Vec<RepoRecord>, GitlodError> {
        self.store.repos()
    }

    fn list(&self, login: &str, association: Association) -> Result<Vec<Record>, GitlodError> {
        self.store.list(login, association)
    }

    fn fetch_user(
        &self,
        record: &mut UserRecord,
        associations: &[Association],
    ) -> Result<(), GitlodError> {
        checked_login(&record.login)?;
        for association in associations {
            let login = record.login.clone();
            match association {
                Association::Profile => {
                    let fresh = self.remote_user(&login)?;
                    self.store.insert_user(fresh.clone())?;
                    *record = fresh;
                }
                Association::Followers => {
                    let logins = self.remote_logins(&format!("/users/{}/followers", login))?;
                    self.store.set_followers(&login, logins)?;
                }
                Association::Followings => {
                    let logins = self.remote_logins(&format!("/users/{}/following", login))?;
                    self.store.set_followings(&login, logins)?;
                }
                Association::Repos => {
                    let repos: Vec<RepoWire> =
                        self.get_pages(&format!("/users/{}/repos", login))?;
                    for wire in repos {
                        self.store.insert_repo(wire.into_record(Some(&*record)))?;
                    }
                }
            }
        }
        tracing::debug!(
            login = %record.login,
            associations = associations.len(),
            "user refreshed from GitHub"
        );
        Ok(())
    }

    fn fetch_repo(&self, record: &mut RepoRecord) -> Result<(), GitlodError> {
        let fresh = self.remote_repo(&record.owner.login, &record.name, Some(&record.owner))?;
        self.store.insert_repo(fresh.clone())?;
        *record = fresh;
        Ok(())
    }
}
