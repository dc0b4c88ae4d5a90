//! # Schema Registry
//!
//! Declarative description of how an entity type projects into triples.
//!
//! Each entity type owns exactly one [`Schema`], built once through
//! [`SchemaBuilder`] and stored in a `static LazyLock`. Declaration order is
//! emission order. Schemas are never merged: a type that needs another
//! type's fields declares them again.
//!
//! Accessors are per-type enums implementing [`Accessor`], so a descriptor can
//! only name a field its entity type actually resolves.

use crate::{GitlodError, Iri, Term};
use std::collections::BTreeSet;
use std::fmt;

// =============================================================================
// ACCESSOR TRAIT
// =============================================================================

/// A named field or edge of one entity type.
///
/// Implemented by small `Copy` enums (`PersonProperty`, `PersonReference`, ...).
/// The name is only used for diagnostics and for collision checks at build
/// time; resolution always goes through the enum value.
pub trait Accessor: Copy + fmt::Debug + Send + Sync + 'static {
    /// Stable, lowercase accessor name.
    fn name(&self) -> &'static str;
}

// =============================================================================
// DESCRIPTORS
// =============================================================================

/// Where a property's value comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertySource<P> {
    /// The same value for every instance of the type.
    Constant(Term),
    /// A field resolved on the instance.
    Accessor(P),
}

/// A single-valued field projected as one triple from the entity's subject.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyDescriptor<P> {
    pub source: PropertySource<P>,
    pub predicate: Iri,
    pub summary: bool,
}

impl<P: Accessor> PropertyDescriptor<P> {
    /// Descriptor for a constant value.
    #[must_use]
    pub fn constant(value: Term, predicate: &str) -> Self {
        Self {
            source: PropertySource::Constant(value),
            predicate: Iri::new(predicate),
            summary: false,
        }
    }

    /// Descriptor for a value resolved through `accessor`.
    #[must_use]
    pub fn accessor(accessor: P, predicate: &str) -> Self {
        Self {
            source: PropertySource::Accessor(accessor),
            predicate: Iri::new(predicate),
            summary: false,
        }
    }

    /// Include this property in summary traversals.
    #[must_use]
    pub fn summary(mut self) -> Self {
        self.summary = true;
        self
    }

    /// Accessor name, if the value is not a constant.
    #[must_use]
    pub fn accessor_name(&self) -> Option<&'static str> {
        match &self.source {
            PropertySource::Constant(_) => None,
            PropertySource::Accessor(a) => Some(a.name()),
        }
    }
}

/// An edge from the entity to one or many other entities.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceDescriptor<R> {
    pub accessor: R,
    pub predicate: Iri,
    pub reverse: bool,
    pub summary: bool,
}

impl<R: Accessor> ReferenceDescriptor<R> {
    /// Forward edge `(self, predicate, target)`.
    #[must_use]
    pub fn new(accessor: R, predicate: &str) -> Self {
        Self {
            accessor,
            predicate: Iri::new(predicate),
            reverse: false,
            summary: false,
        }
    }

    /// Emit the edge as `(target, predicate, self)` instead.
    #[must_use]
    pub fn reverse(mut self) -> Self {
        self.reverse = true;
        self
    }

    /// Mark the reference as part of the type's summary description.
    ///
    /// Summary traversals still never follow references; the flag documents
    /// which edges a consumer may treat as identifying.
    #[must_use]
    pub fn summary(mut self) -> Self {
        self.summary = true;
        self
    }
}

// =============================================================================
// SCHEMA
// =============================================================================

/// The immutable projection table of one entity type.
#[derive(Debug, Clone)]
pub struct Schema<P, R> {
    entity: &'static str,
    properties: Vec<PropertyDescriptor<P>>,
    references: Vec<ReferenceDescriptor<R>>,
}

impl<P: Accessor, R: Accessor> Schema<P, R> {
    /// Start declaring the schema of `entity`.
    #[must_use]
    pub fn builder(entity: &'static str) -> SchemaBuilder<P, R> {
        SchemaBuilder {
            entity,
            properties: Vec::new(),
            references: Vec::new(),
        }
    }

    /// Name of the entity type this schema belongs to.
    #[must_use]
    pub fn entity(&self) -> &'static str {
        self.entity
    }

    /// Property descriptors in declaration order.
    #[must_use]
    pub fn properties(&self) -> &[PropertyDescriptor<P>] {
        &self.properties
    }

    /// Reference descriptors in declaration order.
    #[must_use]
    pub fn references(&self) -> &[ReferenceDescriptor<R>] {
        &self.references
    }

    /// Properties emitted in summary mode.
    pub fn summary_properties(&self) -> impl Iterator<Item = &PropertyDescriptor<P>> {
        self.properties.iter().filter(|p| p.summary)
    }
}

// =============================================================================
// BUILDER
// =============================================================================

/// Collects descriptors and validates them once, at type initialization.
#[derive(Debug)]
pub struct SchemaBuilder<P, R> {
    entity: &'static str,
    properties: Vec<PropertyDescriptor<P>>,
    references: Vec<ReferenceDescriptor<R>>,
}

impl<P: Accessor, R: Accessor> SchemaBuilder<P, R> {
    /// Append a property descriptor.
    #[must_use]
    pub fn declare_property(mut self, descriptor: PropertyDescriptor<P>) -> Self {
        self.properties.push(descriptor);
        self
    }

    /// Append a reference descriptor.
    #[must_use]
    pub fn declare_reference(mut self, descriptor: ReferenceDescriptor<R>) -> Self {
        self.references.push(descriptor);
        self
    }

    /// Validate and freeze the schema.
    ///
    /// Returns `GitlodError::SchemaResolutionError` if:
    /// - a predicate IRI is empty
    /// - an accessor name is used both as a property and as a reference
    pub fn build(self) -> Result<Schema<P, R>, GitlodError> {
        let entity = self.entity;

        let empty_predicate = self
            .properties
            .iter()
            .map(|p| &p.predicate)
            .chain(self.references.iter().map(|r| &r.predicate))
            .any(|p| p.as_str().is_empty());
        if empty_predicate {
            return Err(GitlodError::SchemaResolutionError(format!(
                "{}: descriptor with empty predicate",
                entity
            )));
        }

        let property_names: BTreeSet<&'static str> = self
            .properties
            .iter()
            .filter_map(PropertyDescriptor::accessor_name)
            .collect();
        if let Some(clash) = self
            .references
            .iter()
            .map(|r| r.accessor.name())
            .find(|name| property_names.contains(name))
        {
            return Err(GitlodError::SchemaResolutionError(format!(
                "{}: accessor '{}' declared as both property and reference",
                entity, clash
            )));
        }

        Ok(Schema {
            entity,
            properties: self.properties,
            references: self.references,
        })
    }
}

// =============================================================================
// TESTS
// =============================================================================
