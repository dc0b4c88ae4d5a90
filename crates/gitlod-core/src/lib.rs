//! # gitlod-core
//!
//! The entity-to-triple projection engine for gitlod.
//!
//! GitHub users and repositories are wrapped in typed entities and projected
//! into RDF triples (FOAF, DOAP, Dublin Core) according to a static,
//! per-type schema.
//!
//! ## Pipeline
//!
//! ```text
//! RecordSource ──> Entity (record + subject + cache) ──> Traversal ──> TripleSink
//!                        ▲                                   │
//!                        └──────── Schema (static) ──────────┘
//! ```
//!
//! ## Architectural Constraints
//!
//! - Synchronous: no async; I/O only happens inside an injected `RecordSource`
//! - Deterministic: declaration order is emission order, blank nodes come
//!   from sanitized seeds
//! - Bounded: a full traversal follows references exactly one hop and only
//!   asks the targets for their summary
//! - Closed: the set of entity kinds is an explicit list, not a plugin point

// =============================================================================
// MODULES
// =============================================================================

pub mod cache;
pub mod entity;
pub mod formats;
pub mod primitives;
pub mod registry;
pub mod schema;
pub mod source;
pub mod traversal;
pub mod types;
pub mod vocab;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{BlankNode, GitlodError, Iri, Literal, SubjectId, Term, Triple, sanitize};

// =============================================================================
// RE-EXPORTS: Engine
// =============================================================================

pub use cache::AssociationCache;
pub use entity::{
    Account, AccountProperty, AccountReference, Entity, Person, PersonProperty, PersonReference,
    Project, ProjectProperty, ProjectReference, Repository, RepositoryProperty,
    RepositoryReference,
};
pub use registry::{AnyEntity, EntityKind, TypeRegistry, UnionView};
pub use schema::{Accessor, PropertyDescriptor, PropertySource, ReferenceDescriptor, Schema};
pub use traversal::{
    EdgeTarget, EmitReport, FailedEdge, FailurePolicy, Mode, Traversal, TripleSink, collect, emit,
    summarize, yield_attr,
};

// =============================================================================
// RE-EXPORTS: Sources & Formats
// =============================================================================

pub use formats::{Format, NTriplesWriter, TurtleWriter, Writer, to_bytes};
pub use source::{
    Association, Fixture, MemorySource, Record, RecordSource, RepoRecord, SharedSource,
    UserRecord,
};
