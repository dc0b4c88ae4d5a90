//! # Project
//!
//! A GitHub repository seen as a `doap:Project`, named by a blank node.
//! The browsable repository itself is a separate [`Repository`].

use super::{Entity, Person, Repository, Visit, link, text};
use crate::primitives::PROJECT_NODE_PREFIX;
use crate::schema::{Accessor, PropertyDescriptor, ReferenceDescriptor, Schema};
use crate::source::{RepoRecord, SharedSource};
use crate::vocab::{dc, doap, rdf};
use crate::{GitlodError, SubjectId, Term};
use std::fmt;
use std::sync::LazyLock;

/// Property accessors of [`Project`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectProperty {
    Name,
    Description,
    Language,
    Homepage,
    Wiki,
    Issues,
}

impl Accessor for ProjectProperty {
    fn name(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Description => "description",
            Self::Language => "language",
            Self::Homepage => "homepage",
            Self::Wiki => "wiki",
            Self::Issues => "issues",
        }
    }
}

/// Reference accessors of [`Project`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectReference {
    Owner,
    Repo,
}

impl Accessor for ProjectReference {
    fn name(&self) -> &'static str {
        match self {
            Self::Owner => "owner",
            Self::Repo => "repo",
        }
    }
}

type ProjectSchema = Schema<ProjectProperty, ProjectReference>;

static SCHEMA: LazyLock<Result<ProjectSchema, GitlodError>> = LazyLock::new(|| {
    use ProjectProperty as P;
    use ProjectReference as R;

    Schema::builder("project")
        .declare_property(PropertyDescriptor::constant(Term::iri(doap::PROJECT), rdf::TYPE).summary())
        .declare_property(PropertyDescriptor::accessor(P::Name, doap::NAME).summary())
        .declare_property(PropertyDescriptor::accessor(P::Description, doap::DESCRIPTION))
        .declare_property(PropertyDescriptor::accessor(P::Language, doap::PROGRAMMING_LANGUAGE))
        .declare_property(PropertyDescriptor::accessor(P::Homepage, doap::HOMEPAGE))
        .declare_property(PropertyDescriptor::accessor(P::Wiki, doap::WIKI))
        .declare_property(PropertyDescriptor::accessor(P::Issues, doap::BUG_DATABASE))
        .declare_reference(ReferenceDescriptor::new(R::Owner, dc::CREATOR))
        .declare_reference(ReferenceDescriptor::new(R::Repo, doap::REPOSITORY).summary())
        .build()
});

/// A repository projected with DOAP.
#[derive(Clone)]
pub struct Project {
    subject: Option<SubjectId>,
    record: RepoRecord,
    source: SharedSource,
}

impl Project {
    /// Wrap a repository record. Performs no I/O.
    #[must_use]
    pub fn new(source: SharedSource, record: RepoRecord) -> Self {
        let subject = (!record.name.is_empty()).then(|| {
            SubjectId::blank(&format!(
                "{}{}-{}",
                PROJECT_NODE_PREFIX, record.owner.login, record.name
            ))
        });
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

    /// The owner as a person.
    #[must_use]
    pub fn owner(&self) -> Person {
        Person::new(self.source.clone(), self.record.owner.clone())
    }

    /// The browsable repository of this project.
    #[must_use]
    pub fn repository(&self) -> Repository {
        Repository::new(self.source.clone(), self.record.clone())
    }

    /// `{url}/wiki` when the wiki is enabled.
    #[must_use]
    pub fn wiki(&self) -> Option<String> {
        self.url_with(self.record.has_wiki, "wiki")
    }

    /// `{url}/issues` when issues are enabled.
    #[must_use]
    pub fn issues(&self) -> Option<String> {
        self.url_with(self.record.has_issues, "issues")
    }

    fn url_with(&self, enabled: bool, suffix: &str) -> Option<String> {
        let url = self.record.url.as_deref().filter(|u| !u.is_empty())?;
        enabled.then(|| format!("{}/{}", url.trim_end_matches('/'), suffix))
    }
}

impl fmt::Debug for Project {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Project")
            .field("owner", &self.record.owner.login)
            .field("name", &self.record.name)
            .finish_non_exhaustive()
    }
}

impl Entity for Project {
    type Property = ProjectProperty;
    type Reference = ProjectReference;

    fn schema() -> Result<&'static ProjectSchema, GitlodError> {
        SCHEMA.as_ref().map_err(Clone::clone)
    }

    fn subject(&self) -> Option<&SubjectId> {
        self.subject.as_ref()
    }

    fn property(&self, accessor: ProjectProperty) -> Result<Option<Term>, GitlodError> {
        let r = &self.record;
        Ok(match accessor {
            ProjectProperty::Name => text(Some(r.name.as_str())),
            ProjectProperty::Description => text(r.description.as_deref()),
            ProjectProperty::Language => text(r.language.as_deref()),
            ProjectProperty::Homepage => link(r.homepage.as_deref()),
            ProjectProperty::Wiki => link(self.wiki().as_deref()),
            ProjectProperty::Issues => link(self.issues().as_deref()),
        })
    }

    fn visit_reference(
        &mut self,
        accessor: ProjectReference,
        visit: &mut Visit<'_>,
    ) -> Result<(), GitlodError> {
        match accessor {
            ProjectReference::Owner => visit(&self.owner()),
            ProjectReference::Repo => visit(&self.repository()),
        }
    }

    fn fetch(&mut self) -> Result<&mut Self, GitlodError> {
        if self.record.populated {
            return Ok(self);
        }
        self.sync()
    }

    fn sync(&mut self) -> Result<&mut Self, GitlodError> {
        self.source.fetch_repo(&mut self.record)?;
        tracing::debug!(owner = %self.record.owner.login, name = %self.record.name, "project synced");
        Ok(self)
    }
}
