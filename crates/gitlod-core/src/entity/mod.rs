//! # Entities
//!
//! Typed wrappers around remote records.
//!
//! Every entity:
//! - exclusively owns one record and a handle to the source it came from
//! - computes its subject once, at construction, without I/O
//! - resolves the accessors its schema names and nothing else
//! - memoizes its associations until the next `sync()`
//!
//! | Type | Subject |
//! |------|---------|
//! | [`Person`] | `_:user-{login}` |
//! | [`Account`] | `<http://github.com/{login}>` |
//! | [`Project`] | `_:proj-{owner}-{name}` |
//! | [`Repository`] | `<{url}>`, undefined without a url |

mod account;
mod person;
mod project;
mod repository;

pub use account::{Account, AccountProperty, AccountReference};
pub use person::{Person, PersonProperty, PersonReference};
pub use project::{Project, ProjectProperty, ProjectReference};
pub use repository::{Repository, RepositoryProperty, RepositoryReference};

use crate::schema::{Accessor, Schema};
use crate::source::{Association, Record, RecordSource, RepoRecord, UserRecord};
use crate::traversal::EdgeTarget;
use crate::{GitlodError, SubjectId, Term};

// =============================================================================
// ENTITY TRAIT
// =============================================================================

/// Callback receiving each target of a reference.
pub type Visit<'a> = dyn FnMut(&dyn EdgeTarget) -> Result<(), GitlodError> + 'a;

/// A record projected through a static schema.
pub trait Entity {
    /// Accessors resolvable as property values.
    type Property: Accessor;
    /// Accessors resolvable as references.
    type Reference: Accessor;

    /// The type's schema, built on first use.
    fn schema() -> Result<&'static Schema<Self::Property, Self::Reference>, GitlodError>
    where
        Self: Sized;

    /// Subject of this entity, `None` when it has none.
    fn subject(&self) -> Option<&SubjectId>;

    /// Resolve one property value. `Ok(None)` for absent values.
    fn property(&self, accessor: Self::Property) -> Result<Option<Term>, GitlodError>;

    /// Resolve one reference and hand every target to `visit`, in order.
    ///
    /// Collection references load through the association cache; a load
    /// failure is returned before any target is visited.
    fn visit_reference(
        &mut self,
        accessor: Self::Reference,
        visit: &mut Visit<'_>,
    ) -> Result<(), GitlodError>;

    /// Sync if the record has never been populated.
    fn fetch(&mut self) -> Result<&mut Self, GitlodError>
    where
        Self: Sized;

    /// Refresh the record and its eager associations, then clear the cache.
    fn sync(&mut self) -> Result<&mut Self, GitlodError>
    where
        Self: Sized;
}

// =============================================================================
// SHARED HELPERS
// =============================================================================

/// Associations refreshed by a user-backed entity's `sync()`.
pub(crate) const USER_EAGER: [Association; 4] = [
    Association::Profile,
    Association::Followers,
    Association::Followings,
    Association::Repos,
];

/// Lists checked by a user-backed entity's `fetch()`.
pub(crate) const USER_LISTS: [Association; 3] = [
    Association::Followers,
    Association::Followings,
    Association::Repos,
];

/// Plain literal for a non-empty string.
pub(crate) fn text(value: Option<&str>) -> Option<Term> {
    value.filter(|v| !v.is_empty()).map(Term::literal)
}

/// IRI term for a non-empty string.
pub(crate) fn link(value: Option<&str>) -> Option<Term> {
    value.filter(|v| !v.is_empty()).map(Term::iri)
}

/// List an association of `record`, asking the source to fetch it when it
/// comes back empty.
pub(crate) fn list_or_fetch(
    source: &dyn RecordSource,
    record: &mut UserRecord,
    association: Association,
) -> Result<Vec<Record>, GitlodError> {
    let records = source.list(&record.login, association)?;
    if !records.is_empty() {
        return Ok(records);
    }
    source.fetch_user(record, &[association])?;
    source.list(&record.login, association)
}

/// Keep the user records of `records`; anything else is a schema mismatch.
pub(crate) fn users_of(
    records: Vec<Record>,
    association: Association,
) -> Result<Vec<UserRecord>, GitlodError> {
    records
        .into_iter()
        .map(|record| match record {
            Record::User(user) => Ok(user),
            other => Err(GitlodError::SchemaResolutionError(format!(
                "{} association yielded a {} record",
                association.name(),
                other.kind()
            ))),
        })
        .collect()
}

/// Keep the repository records of `records`.
pub(crate) fn repos_of(records: Vec<Record>) -> Result<Vec<RepoRecord>, GitlodError> {
    records
        .into_iter()
        .map(|record| match record {
            Record::Repo(repo) => Ok(repo),
            other => Err(GitlodError::SchemaResolutionError(format!(
                "repos association yielded a {} record",
                other.kind()
            ))),
        })
        .collect()
}

/// Ask the source for every user list that is still empty locally.
///
/// Returns whether a fetch happened, in which case the caller must drop its
/// cached associations.
pub(crate) fn fetch_missing_lists(
    source: &dyn RecordSource,
    record: &mut UserRecord,
) -> Result<bool, GitlodError> {
    let mut missing = Vec::new();
    for association in USER_LISTS {
        if source.list(&record.login, association)?.is_empty() {
            missing.push(association);
        }
    }
    if missing.is_empty() {
        return Ok(false);
    }
    tracing::debug!(login = %record.login, missing = missing.len(), "fetching empty associations");
    source.fetch_user(record, &missing)?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::MemorySource;

    #[test]
    fn text_and_link_drop_empty_values() {
        assert_eq!(text(Some("")), None);
        assert_eq!(text(None), None);
        assert_eq!(text(Some("a")), Some(Term::literal("a")));
        assert_eq!(link(Some("")), None);
        assert_eq!(link(Some("http://a")), Some(Term::iri("http://a")));
    }

    #[test]
    fn users_of_rejects_repo_records() {
        let records = vec![Record::Repo(RepoRecord::default())];
        assert!(matches!(
            users_of(records, Association::Followers),
            Err(GitlodError::SchemaResolutionError(_))
        ));
    }

    #[test]
    fn empty_list_triggers_one_fetch() {
        let source = MemorySource::new();
        let mut record = UserRecord::stub("nobody");
        let listed = list_or_fetch(&source, &mut record, Association::Followers).expect("list");
        assert!(listed.is_empty());
        assert_eq!(source.fetch_calls(), 1);
        assert_eq!(source.list_calls(), 2);
    }
}
