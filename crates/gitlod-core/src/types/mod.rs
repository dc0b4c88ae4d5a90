//! # Core Type Definitions
//!
//! This module contains the value types every other module speaks:
//! - Graph terms (`Iri`, `BlankNode`, `Literal`, `Term`)
//! - Subjects and statements (`SubjectId`, `Triple`)
//! - Error types (`GitlodError`)
//!
//! ## Determinism Guarantees
//!
//! All terms implement `Ord`, so collections of triples sort the same way
//! on every run. Blank-node identifiers are derived from a seed string and
//! never from counters or randomness.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

// =============================================================================
// IRI
// =============================================================================

/// An absolute IRI naming a resource or a predicate.
///
/// The engine does not validate IRIs; vocabulary terms are trusted input.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Iri(String);

impl Iri {
    /// Create an IRI from any string.
    #[must_use]
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the IRI as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Iri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// BLANK NODE
// =============================================================================

/// A blank node with a deterministic, sanitized identifier.
///
/// Every character of the seed outside `[A-Za-z0-9_-]` is replaced with `_`,
/// so two nodes built from seeds that sanitize identically are equal.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BlankNode(String);

impl BlankNode {
    /// Create a blank node from a seed string.
    #[must_use]
    pub fn new(seed: &str) -> Self {
        Self(sanitize(seed))
    }

    /// Get the sanitized identifier (without the `_:` prefix).
    #[must_use]
    pub fn id(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BlankNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "_:{}", self.0)
    }
}

/// Replace every character outside `[A-Za-z0-9_-]` with `_`.
#[must_use]
pub fn sanitize(seed: &str) -> String {
    seed.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

// =============================================================================
// LITERAL
// =============================================================================

/// A literal value with an optional datatype IRI.
///
/// Plain literals (`datatype == None`) are `xsd:string` by RDF 1.1 rules.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Literal {
    lexical: String,
    datatype: Option<Iri>,
}

impl Literal {
    /// Create a plain string literal.
    #[must_use]
    pub fn new(lexical: impl Into<String>) -> Self {
        Self {
            lexical: lexical.into(),
            datatype: None,
        }
    }

    /// Create a literal with an explicit datatype.
    #[must_use]
    pub fn typed(lexical: impl Into<String>, datatype: Iri) -> Self {
        Self {
            lexical: lexical.into(),
            datatype: Some(datatype),
        }
    }

    /// The lexical form.
    #[must_use]
    pub fn lexical(&self) -> &str {
        &self.lexical
    }

    /// The datatype, if any.
    #[must_use]
    pub fn datatype(&self) -> Option<&Iri> {
        self.datatype.as_ref()
    }
}

// =============================================================================
// SUBJECT
// =============================================================================

/// Identifier of an entity within the produced graph.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SubjectId {
    /// A publicly addressable resource.
    Iri(Iri),
    /// An internal resource named by a deterministic blank node.
    Blank(BlankNode),
}

impl SubjectId {
    /// Subject for a public IRI.
    #[must_use]
    pub fn iri(s: impl Into<String>) -> Self {
        Self::Iri(Iri::new(s))
    }

    /// Subject for a blank node built from `seed`.
    #[must_use]
    pub fn blank(seed: &str) -> Self {
        Self::Blank(BlankNode::new(seed))
    }
}

impl fmt::Display for SubjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Iri(iri) => write!(f, "<{}>", iri),
            Self::Blank(node) => node.fmt(f),
        }
    }
}

// =============================================================================
// TERM
// =============================================================================

/// Any value that can occupy the object position of a triple.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Term {
    Iri(Iri),
    Blank(BlankNode),
    Literal(Literal),
}

impl Term {
    /// IRI term helper.
    #[must_use]
    pub fn iri(s: impl Into<String>) -> Self {
        Self::Iri(Iri::new(s))
    }

    /// Plain literal helper.
    #[must_use]
    pub fn literal(s: impl Into<String>) -> Self {
        Self::Literal(Literal::new(s))
    }

    /// A term is empty when its textual content is empty.
    ///
    /// Empty values never produce a triple.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Iri(iri) => iri.as_str().is_empty(),
            Self::Blank(node) => node.id().is_empty(),
            Self::Literal(lit) => lit.lexical().is_empty(),
        }
    }

    /// Convert into a subject, if this term can name one.
    #[must_use]
    pub fn into_subject(self) -> Option<SubjectId> {
        match self {
            Self::Iri(iri) => Some(SubjectId::Iri(iri)),
            Self::Blank(node) => Some(SubjectId::Blank(node)),
            Self::Literal(_) => None,
        }
    }
}

impl From<SubjectId> for Term {
    fn from(subject: SubjectId) -> Self {
        match subject {
            SubjectId::Iri(iri) => Self::Iri(iri),
            SubjectId::Blank(node) => Self::Blank(node),
        }
    }
}

impl From<Literal> for Term {
    fn from(lit: Literal) -> Self {
        Self::Literal(lit)
    }
}

impl From<Iri> for Term {
    fn from(iri: Iri) -> Self {
        Self::Iri(iri)
    }
}

// =============================================================================
// TRIPLE
// =============================================================================

/// A single `(subject, predicate, object)` statement.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Triple {
    pub subject: SubjectId,
    pub predicate: Iri,
    pub object: Term,
}

impl Triple {
    /// Create a new triple.
    #[must_use]
    pub fn new(subject: SubjectId, predicate: Iri, object: impl Into<Term>) -> Self {
        Self {
            subject,
            predicate,
            object: object.into(),
        }
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur in gitlod.
///
/// - No silent failures
/// - Use `Result<T, GitlodError>` for fallible operations
/// - The engine never catches or retries; errors bubble to the caller
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GitlodError {
    /// A remote call failed (network, upstream status, timeout).
    #[error("Remote fetch failed: {0}")]
    RemoteFetchError(String),

    /// A schema or accessor is misconfigured. This is a programmer error.
    #[error("Schema resolution error: {0}")]
    SchemaResolutionError(String),

    /// The requested identifier does not exist upstream.
    #[error("Record not found: {0}")]
    RecordNotFound(String),

    /// A serialization or deserialization error occurred.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    IoError(String),

    /// Configuration could not be loaded or is invalid.
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl From<std::io::Error> for GitlodError {
    fn from(e: std::io::Error) -> Self {
        Self::IoError(e.to_string())
    }
}

// =============================================================================
// TESTS
// =============================================================================
