//! # Traversal Engine
//!
//! Projects an entity into triples according to its schema.
//!
//! ## Modes
//!
//! - `Summary`: summary properties only, references are never followed
//! - `Full`: every property, then every reference as an edge followed by the
//!   target's summary
//!
//! Full traversal only ever asks targets for their summary, so recursion is
//! bounded to one hop regardless of cycles in the reference graph. The bound
//! is also carried by the types: summary emission takes `&E`, while reference
//! resolution needs `&mut E`.
//!
//! ## Output
//!
//! Triples are pushed into a [`TripleSink`] in declaration order. A traversal
//! is single-pass; materialize into a `Vec<Triple>` to replay it.

use crate::entity::Entity;
use crate::schema::{Accessor, PropertySource};
use crate::{GitlodError, Iri, SubjectId, Term, Triple};

// =============================================================================
// SINK
// =============================================================================

/// Consumer of emitted triples.
pub trait TripleSink {
    /// Accept one triple.
    fn push(&mut self, triple: Triple) -> Result<(), GitlodError>;
}

impl TripleSink for Vec<Triple> {
    fn push(&mut self, triple: Triple) -> Result<(), GitlodError> {
        Vec::push(self, triple);
        Ok(())
    }
}

/// Counts triples on their way to an inner sink.
struct Counting<'a> {
    inner: &'a mut dyn TripleSink,
    count: usize,
}

impl TripleSink for Counting<'_> {
    fn push(&mut self, triple: Triple) -> Result<(), GitlodError> {
        self.inner.push(triple)?;
        self.count = self.count.saturating_add(1);
        Ok(())
    }
}

// =============================================================================
// EDGE TARGETS
// =============================================================================

/// Object-safe view of an entity reached through a reference.
///
/// Only summary emission is available through this view.
pub trait EdgeTarget {
    /// Subject of the target, `None` if it has none.
    fn target_subject(&self) -> Option<&SubjectId>;

    /// Emit the target's summary triples.
    fn emit_summary(&self, sink: &mut dyn TripleSink) -> Result<(), GitlodError>;
}

impl<E: Entity> EdgeTarget for E {
    fn target_subject(&self) -> Option<&SubjectId> {
        self.subject()
    }

    fn emit_summary(&self, sink: &mut dyn TripleSink) -> Result<(), GitlodError> {
        summarize(self, sink)
    }
}

// =============================================================================
// MODE & POLICY
// =============================================================================

/// How much of an entity a traversal emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    Summary,
    #[default]
    Full,
}

/// What a full traversal does when resolving a reference fails remotely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Propagate the first `RemoteFetchError`.
    #[default]
    Abort,
    /// Drop the failed reference, record it, and keep going.
    Skip,
}

/// A reference that could not be resolved under `FailurePolicy::Skip`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedEdge {
    pub entity: &'static str,
    pub reference: &'static str,
    pub predicate: Iri,
    pub error: GitlodError,
}

/// Outcome of one traversal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmitReport {
    /// Number of triples pushed into the sink.
    pub triples: usize,
    /// References dropped under `FailurePolicy::Skip`.
    pub failed: Vec<FailedEdge>,
}

impl EmitReport {
    /// True when nothing was skipped.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    /// Fold another report into this one.
    pub fn merge(&mut self, other: EmitReport) {
        self.triples = self.triples.saturating_add(other.triples);
        self.failed.extend(other.failed);
    }
}

// =============================================================================
// FIELD PROJECTOR
// =============================================================================

/// Project one resolved value into a triple.
///
/// Returns `Ok(None)` for absent or empty values. With `reverse`, the value
/// becomes the subject; a literal cannot, which is a schema error.
pub fn yield_attr(
    subject: &SubjectId,
    predicate: &Iri,
    value: Option<Term>,
    reverse: bool,
) -> Result<Option<Triple>, GitlodError> {
    let Some(value) = value.filter(|v| !v.is_empty()) else {
        return Ok(None);
    };

    if !reverse {
        return Ok(Some(Triple::new(subject.clone(), predicate.clone(), value)));
    }

    let object = value.into_subject().ok_or_else(|| {
        GitlodError::SchemaResolutionError(format!(
            "literal cannot be the subject of reverse edge {}",
            predicate
        ))
    })?;
    Ok(Some(Triple::new(object, predicate.clone(), subject.clone())))
}

/// Emit every property of `entity` that passes the mode filter.
fn emit_properties<E: Entity>(
    entity: &E,
    subject: &SubjectId,
    mode: Mode,
    sink: &mut dyn TripleSink,
) -> Result<(), GitlodError> {
    let schema = E::schema()?;
    for descriptor in schema.properties() {
        if mode == Mode::Summary && !descriptor.summary {
            continue;
        }
        let value = match &descriptor.source {
            PropertySource::Constant(term) => Some(term.clone()),
            PropertySource::Accessor(accessor) => entity.property(*accessor)?,
        };
        if let Some(triple) = yield_attr(subject, &descriptor.predicate, value, false)? {
            sink.push(triple)?;
        }
    }
    Ok(())
}

/// Emit the summary of `entity`. Never resolves references.
pub fn summarize<E: Entity>(entity: &E, sink: &mut dyn TripleSink) -> Result<(), GitlodError> {
    let Some(subject) = entity.subject() else {
        return Ok(());
    };
    emit_properties(entity, subject, Mode::Summary, sink)
}

// =============================================================================
// TRAVERSAL
// =============================================================================

/// Configured traversal.
///
/// Stateless apart from its failure policy; one value can drive any number of
/// emissions.
#[derive(Debug, Clone, Copy, Default)]
pub struct Traversal {
    policy: FailurePolicy,
}

impl Traversal {
    /// A traversal that aborts on the first remote failure.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the failure policy.
    #[must_use]
    pub fn on_failure(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// The failure policy in effect.
    #[must_use]
    pub fn policy(&self) -> FailurePolicy {
        self.policy
    }

    /// Emit `entity` in `mode` into `sink`.
    pub fn emit<E: Entity>(
        &self,
        entity: &mut E,
        mode: Mode,
        sink: &mut dyn TripleSink,
    ) -> Result<EmitReport, GitlodError> {
        let mut counting = Counting {
            inner: sink,
            count: 0,
        };
        let mut report = EmitReport::default();

        let Some(subject) = entity.subject().cloned() else {
            return Ok(report);
        };

        emit_properties(entity, &subject, mode, &mut counting)?;

        if mode == Mode::Full {
            self.emit_references(entity, &subject, &mut counting, &mut report)?;
        }

        report.triples = counting.count;
        Ok(report)
    }

    fn emit_references<E: Entity>(
        &self,
        entity: &mut E,
        subject: &SubjectId,
        sink: &mut dyn TripleSink,
        report: &mut EmitReport,
    ) -> Result<(), GitlodError> {
        let schema = E::schema()?;
        for descriptor in schema.references() {
            let mut visit = |target: &dyn EdgeTarget| -> Result<(), GitlodError> {
                let Some(target_subject) = target.target_subject() else {
                    return Ok(());
                };
                let value = Some(Term::from(target_subject.clone()));
                if let Some(edge) =
                    yield_attr(subject, &descriptor.predicate, value, descriptor.reverse)?
                {
                    sink.push(edge)?;
                }
                target.emit_summary(&mut *sink)
            };

            match entity.visit_reference(descriptor.accessor, &mut visit) {
                Ok(()) => {}
                Err(error @ GitlodError::RemoteFetchError(_))
                    if self.policy == FailurePolicy::Skip =>
                {
                    tracing::warn!(
                        entity = schema.entity(),
                        reference = descriptor.accessor.name(),
                        error = %error,
                        "skipping unresolved reference"
                    );
                    report.failed.push(FailedEdge {
                        entity: schema.entity(),
                        reference: descriptor.accessor.name(),
                        predicate: descriptor.predicate.clone(),
                        error,
                    });
                }
                Err(error) => return Err(error),
            }
        }
        Ok(())
    }

    /// Resolve every reference of `entity` without emitting anything.
    ///
    /// After a successful warm-up, emission is served from the association
    /// caches and performs no I/O.
    pub fn warm<E: Entity>(&self, entity: &mut E) -> Result<EmitReport, GitlodError> {
        let mut discard = Discard;
        self.emit(entity, Mode::Full, &mut discard)
            .map(|report| EmitReport {
                triples: 0,
                failed: report.failed,
            })
    }
}

/// Sink that drops everything.
struct Discard;

impl TripleSink for Discard {
    fn push(&mut self, _triple: Triple) -> Result<(), GitlodError> {
        Ok(())
    }
}

/// Emit `entity` in `mode`, aborting on the first failure.
pub fn emit<E: Entity>(
    entity: &mut E,
    mode: Mode,
    sink: &mut dyn TripleSink,
) -> Result<(), GitlodError> {
    Traversal::new().emit(entity, mode, sink).map(|_| ())
}

/// Emit `entity` in `mode` and collect the triples.
pub fn collect<E: Entity>(entity: &mut E, mode: Mode) -> Result<Vec<Triple>, GitlodError> {
    let mut triples: Vec<Triple> = Vec::new();
    emit(entity, mode, &mut triples)?;
    Ok(triples)
}

// =============================================================================
// TESTS
// =============================================================================
