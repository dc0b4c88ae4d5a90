//! # Type Registry
//!
//! The explicit list of entity kinds known to the engine, and the union view
//! that emits every loaded entity of every kind.
//!
//! Kinds are registered by value at startup; nothing registers itself. The
//! registry validates each kind's schema when it is assembled, so a
//! misconfigured schema fails before the first request.

use crate::entity::{Account, Entity, Person, Project, Repository};
use crate::source::SharedSource;
use crate::traversal::{EmitReport, Mode, Traversal, TripleSink};
use crate::{GitlodError, SubjectId};
use std::collections::BTreeSet;

// =============================================================================
// ENTITY KIND
// =============================================================================

/// One registered entity type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EntityKind {
    Person,
    Account,
    Project,
    Repository,
}

impl EntityKind {
    /// Every kind, in standard emission order.
    pub const ALL: [EntityKind; 4] = [
        EntityKind::Person,
        EntityKind::Account,
        EntityKind::Project,
        EntityKind::Repository,
    ];

    /// Schema entity name of this kind.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Person => "person",
            Self::Account => "account",
            Self::Project => "project",
            Self::Repository => "repository",
        }
    }

    /// Force the kind's schema to build.
    pub fn validate(&self) -> Result<(), GitlodError> {
        match self {
            Self::Person => Person::schema().map(|_| ()),
            Self::Account => Account::schema().map(|_| ()),
            Self::Project => Project::schema().map(|_| ()),
            Self::Repository => Repository::schema().map(|_| ()),
        }
    }

    /// Every loaded entity of this kind.
    pub fn load(&self, source: &SharedSource) -> Result<Vec<AnyEntity>, GitlodError> {
        Ok(match self {
            Self::Person => Person::all(source)?
                .into_iter()
                .map(AnyEntity::Person)
                .collect(),
            Self::Account => Account::all(source)?
                .into_iter()
                .map(AnyEntity::Account)
                .collect(),
            Self::Project => Project::all(source)?
                .into_iter()
                .map(AnyEntity::Project)
                .collect(),
            Self::Repository => Repository::all(source)?
                .into_iter()
                .map(AnyEntity::Repository)
                .collect(),
        })
    }
}

// =============================================================================
// ANY ENTITY
// =============================================================================

/// An entity of any registered kind.
#[derive(Debug, Clone)]
pub enum AnyEntity {
    Person(Person),
    Account(Account),
    Project(Project),
    Repository(Repository),
}

impl AnyEntity {
    #[must_use]
    pub fn kind(&self) -> EntityKind {
        match self {
            Self::Person(_) => EntityKind::Person,
            Self::Account(_) => EntityKind::Account,
            Self::Project(_) => EntityKind::Project,
            Self::Repository(_) => EntityKind::Repository,
        }
    }

    #[must_use]
    pub fn subject(&self) -> Option<&SubjectId> {
        match self {
            Self::Person(e) => e.subject(),
            Self::Account(e) => e.subject(),
            Self::Project(e) => e.subject(),
            Self::Repository(e) => e.subject(),
        }
    }

    /// Emit through `traversal`.
    pub fn emit(
        &mut self,
        traversal: &Traversal,
        mode: Mode,
        sink: &mut dyn TripleSink,
    ) -> Result<EmitReport, GitlodError> {
        match self {
            Self::Person(e) => traversal.emit(e, mode, sink),
            Self::Account(e) => traversal.emit(e, mode, sink),
            Self::Project(e) => traversal.emit(e, mode, sink),
            Self::Repository(e) => traversal.emit(e, mode, sink),
        }
    }
}

// =============================================================================
// REGISTRY
// =============================================================================

/// Ordered, validated set of entity kinds.
#[derive(Debug, Clone)]
pub struct TypeRegistry {
    kinds: Vec<EntityKind>,
}

impl TypeRegistry {
    /// Register `kinds` in order, validating every schema.
    ///
    /// A kind listed twice is rejected, since the union view would emit it
    /// twice.
    pub fn new(kinds: Vec<EntityKind>) -> Result<Self, GitlodError> {
        let mut seen = BTreeSet::new();
        for kind in &kinds {
            if !seen.insert(*kind) {
                return Err(GitlodError::ConfigError(format!(
                    "entity kind '{}' registered twice",
                    kind.name()
                )));
            }
            kind.validate()?;
        }
        tracing::debug!(kinds = kinds.len(), "type registry assembled");
        Ok(Self { kinds })
    }

    /// Person, Account, Project, Repository.
    pub fn standard() -> Result<Self, GitlodError> {
        Self::new(EntityKind::ALL.to_vec())
    }

    #[must_use]
    pub fn kinds(&self) -> &[EntityKind] {
        &self.kinds
    }

    /// Every loaded entity, kind by kind.
    pub fn all_entities(&self, source: &SharedSource) -> Result<Vec<AnyEntity>, GitlodError> {
        let mut all = Vec::new();
        for kind in &self.kinds {
            all.extend(kind.load(source)?);
        }
        Ok(all)
    }

    /// Traversal-only view over every loaded entity.
    #[must_use]
    pub fn union_view(&self, source: SharedSource) -> UnionView<'_> {
        UnionView {
            registry: self,
            source,
            traversal: Traversal::new(),
        }
    }
}

// =============================================================================
// UNION VIEW
// =============================================================================

/// Emits every loaded entity of every registered kind.
///
/// Entities are loaded one kind at a time; the kinds are never combined
/// into one collection.
#[derive(Clone)]
pub struct UnionView<'a> {
    registry: &'a TypeRegistry,
    source: SharedSource,
    traversal: Traversal,
}

impl UnionView<'_> {
    /// Use `traversal` (and its failure policy) for every entity.
    #[must_use]
    pub fn with_traversal(mut self, traversal: Traversal) -> Self {
        self.traversal = traversal;
        self
    }

    /// Emit every entity in `mode`.
    pub fn emit(&self, mode: Mode, sink: &mut dyn TripleSink) -> Result<EmitReport, GitlodError> {
        let mut report = EmitReport::default();
        for kind in self.registry.kinds() {
            for mut entity in kind.load(&self.source)? {
                report.merge(entity.emit(&self.traversal, mode, sink)?);
            }
        }
        Ok(report)
    }
}
