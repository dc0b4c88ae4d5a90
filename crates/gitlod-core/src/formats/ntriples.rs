//! N-Triples writer: one statement per line, no abbreviations.

use super::{escape_iri, escape_literal};
use crate::traversal::TripleSink;
use crate::{GitlodError, Iri, SubjectId, Term, Triple};
use std::io::Write;

/// Streams triples as N-Triples.
#[derive(Debug)]
pub struct NTriplesWriter<W: Write> {
    out: W,
    line: String,
}

impl<W: Write> NTriplesWriter<W> {
    #[must_use]
    pub fn new(out: W) -> Self {
        Self {
            out,
            line: String::new(),
        }
    }

    /// Flush and return the inner writer.
    pub fn finish(mut self) -> Result<W, GitlodError> {
        self.out.flush()?;
        Ok(self.out)
    }
}

impl<W: Write> TripleSink for NTriplesWriter<W> {
    fn push(&mut self, triple: Triple) -> Result<(), GitlodError> {
        self.line.clear();
        write_subject(&triple.subject, &mut self.line);
        self.line.push(' ');
        write_iri(&triple.predicate, &mut self.line);
        self.line.push(' ');
        write_term(&triple.object, &mut self.line);
        self.line.push_str(" .\n");
        self.out.write_all(self.line.as_bytes())?;
        Ok(())
    }
}

pub(super) fn write_iri(iri: &Iri, out: &mut String) {
    out.push('<');
    escape_iri(iri.as_str(), out);
    out.push('>');
}

fn write_subject(subject: &SubjectId, out: &mut String) {
    match subject {
        SubjectId::Iri(iri) => write_iri(iri, out),
        SubjectId::Blank(node) => {
            out.push_str("_:");
            out.push_str(node.id());
        }
    }
}

fn write_term(term: &Term, out: &mut String) {
    match term {
        Term::Iri(iri) => write_iri(iri, out),
        Term::Blank(node) => {
            out.push_str("_:");
            out.push_str(node.id());
        }
        Term::Literal(lit) => {
            out.push('"');
            escape_literal(lit.lexical(), out);
            out.push('"');
            if let Some(datatype) = lit.datatype() {
                out.push_str("^^");
                write_iri(datatype, out);
            }
        }
    }
}
