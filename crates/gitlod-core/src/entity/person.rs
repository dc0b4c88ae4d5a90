//! # Person
//!
//! A GitHub user as a `foaf:Person`, named by a blank node.
//!
//! A GitHub account does not denote the human behind it; the person links
//! to its [`Account`] through `foaf:account` instead.

use super::{
    Account, Entity, Project, USER_EAGER, Visit, fetch_missing_lists, link, list_or_fetch,
    repos_of, text, users_of,
};
use crate::cache::AssociationCache;
use crate::primitives::{GRAVATAR_BASE, PERSON_NODE_PREFIX};
use crate::schema::{Accessor, PropertyDescriptor, ReferenceDescriptor, Schema};
use crate::source::{Association, SharedSource, UserRecord};
use crate::vocab::{foaf, rdf};
use crate::{GitlodError, SubjectId, Term};
use md5::Md5;
use sha1::{Digest, Sha1};
use std::fmt;
use std::sync::LazyLock;

// =============================================================================
// ACCESSORS
// =============================================================================

/// Property accessors of [`Person`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersonProperty {
    Name,
    Login,
    Location,
    Blog,
    Mbox,
    MboxSha1sum,
    Depiction,
}

impl Accessor for PersonProperty {
    fn name(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Login => "login",
            Self::Location => "location",
            Self::Blog => "blog",
            Self::Mbox => "mbox",
            Self::MboxSha1sum => "mbox_sha1sum",
            Self::Depiction => "depiction",
        }
    }
}

/// Reference accessors of [`Person`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersonReference {
    Account,
    Followings,
    Followers,
    Projects,
}

impl Accessor for PersonReference {
    fn name(&self) -> &'static str {
        match self {
            Self::Account => "account",
            Self::Followings => "followings",
            Self::Followers => "followers",
            Self::Projects => "projects",
        }
    }
}

// =============================================================================
// SCHEMA
// =============================================================================

type PersonSchema = Schema<PersonProperty, PersonReference>;

static SCHEMA: LazyLock<Result<PersonSchema, GitlodError>> = LazyLock::new(|| {
    use PersonProperty as P;
    use PersonReference as R;

    Schema::builder("person")
        .declare_property(PropertyDescriptor::constant(Term::iri(foaf::PERSON), rdf::TYPE).summary())
        .declare_property(PropertyDescriptor::accessor(P::Name, foaf::NAME).summary())
        .declare_property(PropertyDescriptor::accessor(P::Login, foaf::NICK).summary())
        .declare_property(PropertyDescriptor::accessor(P::Location, foaf::BASED_NEAR))
        .declare_property(PropertyDescriptor::accessor(P::Blog, foaf::WEBLOG))
        .declare_property(PropertyDescriptor::accessor(P::Mbox, foaf::MBOX))
        .declare_property(PropertyDescriptor::accessor(P::MboxSha1sum, foaf::MBOX_SHA1SUM).summary())
        .declare_property(PropertyDescriptor::accessor(P::Depiction, foaf::DEPICTION))
        .declare_reference(ReferenceDescriptor::new(R::Account, foaf::ACCOUNT).summary())
        .declare_reference(ReferenceDescriptor::new(R::Followings, foaf::KNOWS))
        .declare_reference(ReferenceDescriptor::new(R::Followers, foaf::KNOWS).reverse())
        .declare_reference(ReferenceDescriptor::new(R::Projects, foaf::DEVELOPER))
        .build()
});

// =============================================================================
// PERSON
// =============================================================================

/// A user projected with FOAF.
#[derive(Clone)]
pub struct Person {
    subject: Option<SubjectId>,
    record: UserRecord,
    source: SharedSource,
    people: AssociationCache<Person>,
    projects: AssociationCache<Project>,
}

impl Person {
    /// Wrap a user record. Performs no I/O.
    #[must_use]
    pub fn new(source: SharedSource, record: UserRecord) -> Self {
        let subject = (!record.login.is_empty())
            .then(|| SubjectId::blank(&format!("{}{}", PERSON_NODE_PREFIX, record.login)));
        Self {
            subject,
            record,
            source,
            people: AssociationCache::new(),
            projects: AssociationCache::new(),
        }
    }

    /// Look `login` up at the source and wrap it.
    pub fn get(source: SharedSource, login: &str) -> Result<Self, GitlodError> {
        let record = source.user(login)?;
        Ok(Self::new(source, record))
    }

    /// Every loaded user that has a name.
    pub fn all(source: &SharedSource) -> Result<Vec<Self>, GitlodError> {
        Ok(source
            .users()?
            .into_iter()
            .filter(|u| u.name.as_deref().is_some_and(|n| !n.is_empty()))
            .map(|u| Self::new(source.clone(), u))
            .collect())
    }

    // =========================================================================
    // FIELDS
    // =========================================================================

    #[must_use]
    pub fn login(&self) -> &str {
        &self.record.login
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.record.name.as_deref()
    }

    /// The wrapped record.
    #[must_use]
    pub fn record(&self) -> &UserRecord {
        &self.record
    }

    /// `mailto:` IRI of the user's email.
    #[must_use]
    pub fn mbox(&self) -> Option<String> {
        self.record
            .email
            .as_deref()
            .filter(|e| !e.is_empty())
            .map(|e| format!("mailto:{}", e))
    }

    /// SHA-1 hex digest of [`mbox`](Self::mbox).
    #[must_use]
    pub fn mbox_sha1sum(&self) -> Option<String> {
        self.mbox()
            .map(|mbox| hex::encode(Sha1::digest(mbox.as_bytes())))
    }

    /// Gravatar image IRI derived from the email.
    #[must_use]
    pub fn depiction(&self) -> Option<String> {
        let email = self.record.email.as_deref()?.trim();
        if email.is_empty() {
            return None;
        }
        let digest = Md5::digest(email.to_lowercase().as_bytes());
        Some(format!("{}{}", GRAVATAR_BASE, hex::encode(digest)))
    }

    /// The user's account. Shares this person's record.
    #[must_use]
    pub fn account(&self) -> Account {
        Account::new(self.source.clone(), self.record.clone())
    }

    // =========================================================================
    // ASSOCIATIONS
    // =========================================================================

    /// Users following this person.
    pub fn followers(&mut self) -> Result<&[Person], GitlodError> {
        self.load_people(Association::Followers)
    }

    /// Users this person follows.
    pub fn followings(&mut self) -> Result<&[Person], GitlodError> {
        self.load_people(Association::Followings)
    }

    /// Projects owned by this person.
    pub fn projects(&mut self) -> Result<&[Project], GitlodError> {
        let source = &self.source;
        let record = &mut self.record;
        self.projects.get_or_load(Association::Repos.name(), || {
            let records = list_or_fetch(source.as_ref(), record, Association::Repos)?;
            Ok(repos_of(records)?
                .into_iter()
                .map(|r| Project::new(source.clone(), r))
                .collect())
        })
    }

    fn load_people(&mut self, association: Association) -> Result<&[Person], GitlodError> {
        let source = &self.source;
        let record = &mut self.record;
        self.people.get_or_load(association.name(), || {
            let records = list_or_fetch(source.as_ref(), record, association)?;
            Ok(users_of(records, association)?
                .into_iter()
                .map(|u| Person::new(source.clone(), u))
                .collect())
        })
    }

    fn invalidate(&mut self) {
        self.people.invalidate_all();
        self.projects.invalidate_all();
    }
}

impl fmt::Debug for Person {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Person")
            .field("subject", &self.subject)
            .field("login", &self.record.login)
            .field("populated", &self.record.populated)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// ENTITY
// =============================================================================

impl Entity for Person {
    type Property = PersonProperty;
    type Reference = PersonReference;

    fn schema() -> Result<&'static PersonSchema, GitlodError> {
        SCHEMA.as_ref().map_err(Clone::clone)
    }

    fn subject(&self) -> Option<&SubjectId> {
        self.subject.as_ref()
    }

    fn property(&self, accessor: PersonProperty) -> Result<Option<Term>, GitlodError> {
        let r = &self.record;
        Ok(match accessor {
            PersonProperty::Name => text(r.name.as_deref()),
            PersonProperty::Login => text(Some(r.login.as_str())),
            PersonProperty::Location => text(r.location.as_deref()),
            PersonProperty::Blog => link(r.blog.as_deref()),
            PersonProperty::Mbox => link(self.mbox().as_deref()),
            PersonProperty::MboxSha1sum => text(self.mbox_sha1sum().as_deref()),
            PersonProperty::Depiction => link(self.depiction().as_deref()),
        })
    }

    fn visit_reference(
        &mut self,
        accessor: PersonReference,
        visit: &mut Visit<'_>,
    ) -> Result<(), GitlodError> {
        match accessor {
            PersonReference::Account => visit(&self.account()),
            PersonReference::Followings => self.followings()?.iter().try_for_each(|p| visit(p)),
            PersonReference::Followers => self.followers()?.iter().try_for_each(|p| visit(p)),
            PersonReference::Projects => self.projects()?.iter().try_for_each(|p| visit(p)),
        }
    }

    fn fetch(&mut self) -> Result<&mut Self, GitlodError> {
        if !self.record.populated {
            return self.sync();
        }
        if fetch_missing_lists(self.source.as_ref(), &mut self.record)? {
            self.invalidate();
        }
        Ok(self)
    }

    fn sync(&mut self) -> Result<&mut Self, GitlodError> {
        self.source.fetch_user(&mut self.record, &USER_EAGER)?;
        self.invalidate();
        tracing::debug!(login = %self.record.login, "person synced");
        Ok(self)
    }
}

// =============================================================================
// TESTS
// =============================================================================
