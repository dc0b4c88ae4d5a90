//! # Repository
//!
//! The browsable side of a GitHub repository, as a `doap:GitRepository`
//! named by its url. A record without a url has no subject and never
//! appears in output.

use super::{Entity, Project, Visit, text};
use crate::schema::{Accessor, PropertyDescriptor, ReferenceDescriptor, Schema};
use crate::source::{RepoRecord, SharedSource};
use crate::vocab::{dc, doap, rdf};
use crate::{GitlodError, SubjectId, Term};
use std::fmt;
use std::sync::LazyLock;

/// Property accessors of [`Repository`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepositoryProperty {
    Name,
    Browse,
}

impl Accessor for RepositoryProperty {
    fn name(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Browse => "browse",
        }
    }
}

/// Reference accessors of [`Repository`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepositoryReference {
    Project,
}

impl Accessor for RepositoryReference {
    fn name(&self) -> &'static str {
        match self {
            Self::Project => "project",
        }
    }
}

type RepositorySchema = Schema<RepositoryProperty, RepositoryReference>;

static SCHEMA: LazyLock<Result<RepositorySchema, GitlodError>> = LazyLock::new(|| {
    Schema::builder("repository")
        .declare_property(
            PropertyDescriptor::constant(Term::iri(doap::GIT_REPOSITORY), rdf::TYPE).summary(),
        )
        .declare_property(PropertyDescriptor::accessor(RepositoryProperty::Name, dc::TITLE).summary())
        .declare_property(
            PropertyDescriptor::accessor(RepositoryProperty::Browse, doap::BROWSE).summary(),
        )
        .declare_reference(
            ReferenceDescriptor::new(RepositoryReference::Project, doap::REPOSITORY)
                .reverse()
                .summary(),
        )
        .build()
});

/// A browsable git repository.
#[derive(Clone)]
pub struct Repository {
    subject: Option<SubjectId>,
    record: RepoRecord,
    source: SharedSource,
}

impl Repository {
    /// Wrap a repository record. Performs no I/O.
    #[must_use]
    pub fn new(source: SharedSource, record: RepoRecord) -> Self {
        let subject = record
            .url
            .as_deref()
            .filter(|u| !u.is_empty())
            .map(SubjectId::iri);
        Self {
            subject,
            record,
            source,
        }
    }

    /// Look `owner/name` up at the source and wrap it.
    pub fn get(source: SharedSource, owner: &str, name: &str) -> Result<Self, GitlodError> {
        let record = source.repo(owner, name)?;
        Ok(Self::new(source, record))
    }

    /// Every loaded repository that has a url.
    pub fn all(source: &SharedSource) -> Result<Vec<Self>, GitlodError> {
        Ok(source
            .repos()?
            .into_iter()
            .filter(|r| r.url.as_deref().is_some_and(|u| !u.is_empty()))
            .map(|r| Self::new(source.clone(), r))
            .collect())
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.record.name
    }

    #[must_use]
    pub fn record(&self) -> &RepoRecord {
        &self.record
    }

    /// The project this repository hosts.
    #[must_use]
    pub fn project(&self) -> Project {
        Project::new(self.source.clone(), self.record.clone())
    }
}

impl fmt::Debug for Repository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Repository")
            .field("subject", &self.subject)
            .field("name", &self.record.name)
            .finish_non_exhaustive()
    }
}

impl Entity for Repository {
    type Property = RepositoryProperty;
    type Reference = RepositoryReference;

    fn schema() -> Result<&'static RepositorySchema, GitlodError> {
        SCHEMA.as_ref().map_err(Clone::clone)
    }

    fn subject(&self) -> Option<&SubjectId> {
        self.subject.as_ref()
    }

    fn property(&self, accessor: RepositoryProperty) -> Result<Option<Term>, GitlodError> {
        Ok(match accessor {
            RepositoryProperty::Name => text(Some(self.record.name.as_str())),
            RepositoryProperty::Browse => self.subject.clone().map(Term::from),
        })
    }

    fn visit_reference(
        &mut self,
        accessor: RepositoryReference,
        visit: &mut Visit<'_>,
    ) -> Result<(), GitlodError> {
        match accessor {
            RepositoryReference::Project => visit(&self.project()),
        }
    }

    fn fetch(&mut self) -> Result<&mut Self, GitlodError> {
        if self.record.populated {
            return Ok(self);
        }
        self.sync()
    }

    fn sync(&mut self) -> Result<&mut Self, GitlodError> {
        // The subject stays as constructed even if the refresh brings a url.
        self.source.fetch_repo(&mut self.record)?;
        tracing::debug!(name = %self.record.name, "repository synced");
        Ok(self)
    }
}
