//! # Account
//!
//! A GitHub user's account as a `foaf:OnlineAccount`, named by its profile
//! IRI. Links back to its [`Person`] with a reverse `foaf:account` edge.

use super::{
    Entity, Person, Repository, USER_EAGER, Visit, fetch_missing_lists, list_or_fetch, repos_of,
    text,
};
use crate::cache::AssociationCache;
use crate::primitives::GITHUB_HOME;
use crate::schema::{Accessor, PropertyDescriptor, ReferenceDescriptor, Schema};
use crate::source::{Association, SharedSource, UserRecord};
use crate::vocab::{dc, doap, foaf, rdf, xsd};
use crate::{GitlodError, Iri, Literal, SubjectId, Term};
use chrono::SecondsFormat;
use std::fmt;
use std::sync::LazyLock;

/// Property accessors of [`Account`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountProperty {
    Page,
    Homepage,
    Login,
    CreatedAt,
}

impl Accessor for AccountProperty {
    fn name(&self) -> &'static str {
        match self {
            Self::Page => "page",
            Self::Homepage => "homepage",
            Self::Login => "login",
            Self::CreatedAt => "created_at",
        }
    }
}

/// Reference accessors of [`Account`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountReference {
    Person,
}

impl Accessor for AccountReference {
    fn name(&self) -> &'static str {
        match self {
            Self::Person => "person",
        }
    }
}

type AccountSchema = Schema<AccountProperty, AccountReference>;

static SCHEMA: LazyLock<Result<AccountSchema, GitlodError>> = LazyLock::new(|| {
    use AccountProperty as P;

    Schema::builder("account")
        .declare_property(
            PropertyDescriptor::constant(Term::iri(foaf::ONLINE_ACCOUNT), rdf::TYPE).summary(),
        )
        .declare_property(PropertyDescriptor::constant(
            Term::iri(GITHUB_HOME),
            foaf::ACCOUNT_SERVICE_HOMEPAGE,
        ))
        .declare_property(PropertyDescriptor::constant(Term::literal("GitHub"), foaf::NAME).summary())
        .declare_property(PropertyDescriptor::accessor(P::Page, foaf::PAGE))
        .declare_property(PropertyDescriptor::accessor(P::Homepage, doap::HOMEPAGE))
        .declare_property(PropertyDescriptor::accessor(P::Login, foaf::ACCOUNT_NAME).summary())
        .declare_property(PropertyDescriptor::accessor(P::CreatedAt, dc::CREATED))
        .declare_reference(
            ReferenceDescriptor::new(AccountReference::Person, foaf::ACCOUNT)
                .reverse()
                .summary(),
        )
        .build()
});

/// A user's online account.
#[derive(Clone)]
pub struct Account {
    subject: Option<SubjectId>,
    record: UserRecord,
    source: SharedSource,
    repositories: AssociationCache<Repository>,
}

impl Account {
    /// Wrap a user record. Performs no I/O.
    #[must_use]
    pub fn new(source: SharedSource, record: UserRecord) -> Self {
        let subject = (!record.login.is_empty())
            .then(|| SubjectId::iri(format!("{}{}", GITHUB_HOME, record.login)));
        Self {
            subject,
            record,
            source,
            repositories: AssociationCache::new(),
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

    #[must_use]
    pub fn login(&self) -> &str {
        &self.record.login
    }

    #[must_use]
    pub fn record(&self) -> &UserRecord {
        &self.record
    }

    /// The person behind this account. Shares this account's record.
    #[must_use]
    pub fn person(&self) -> Person {
        Person::new(self.source.clone(), self.record.clone())
    }

    /// Repositories owned by this account.
    pub fn repositories(&mut self) -> Result<&[Repository], GitlodError> {
        let source = &self.source;
        let record = &mut self.record;
        self.repositories.get_or_load(Association::Repos.name(), || {
            let records = list_or_fetch(source.as_ref(), record, Association::Repos)?;
            Ok(repos_of(records)?
                .into_iter()
                .map(|r| Repository::new(source.clone(), r))
                .collect())
        })
    }

    /// The owned repository called `name`, if any.
    pub fn repository(&mut self, name: &str) -> Result<Option<&Repository>, GitlodError> {
        Ok(self.repositories()?.iter().find(|r| r.name() == name))
    }

    /// `created_at` as an `xsd:dateTime` literal.
    fn created(&self) -> Option<Term> {
        self.record.created_at.map(|at| {
            Term::from(Literal::typed(
                at.to_rfc3339_opts(SecondsFormat::Secs, true),
                Iri::new(xsd::DATE_TIME),
            ))
        })
    }
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Account")
            .field("subject", &self.subject)
            .field("repositories", &self.repositories.get(Association::Repos.name()).map(<[_]>::len))
            .finish_non_exhaustive()
    }
}

impl Entity for Account {
    type Property = AccountProperty;
    type Reference = AccountReference;

    fn schema() -> Result<&'static AccountSchema, GitlodError> {
        SCHEMA.as_ref().map_err(Clone::clone)
    }

    fn subject(&self) -> Option<&SubjectId> {
        self.subject.as_ref()
    }

    fn property(&self, accessor: AccountProperty) -> Result<Option<Term>, GitlodError> {
        Ok(match accessor {
            // The profile page is the account itself.
            AccountProperty::Page | AccountProperty::Homepage => {
                self.subject.clone().map(Term::from)
            }
            AccountProperty::Login => text(Some(self.record.login.as_str())),
            AccountProperty::CreatedAt => self.created(),
        })
    }

    fn visit_reference(
        &mut self,
        accessor: AccountReference,
        visit: &mut Visit<'_>,
    ) -> Result<(), GitlodError> {
        match accessor {
            AccountReference::Person => visit(&self.person()),
        }
    }

    fn fetch(&mut self) -> Result<&mut Self, GitlodError> {
        if !self.record.populated {
            return self.sync();
        }
        if fetch_missing_lists(self.source.as_ref(), &mut self.record)? {
            self.repositories.invalidate_all();
        }
        Ok(self)
    }

    fn sync(&mut self) -> Result<&mut Self, GitlodError> {
        self.source.fetch_user(&mut self.record, &USER_EAGER)?;
        self.repositories.invalidate_all();
        tracing::debug!(login = %self.record.login, "account synced");
        Ok(self)
    }
}
