//! Turtle writer.
//!
//! Writes the standard prefixes once, abbreviates IRIs inside those
//! namespaces, uses `a` for `rdf:type`, and groups consecutive triples that
//! share a subject with `;`. Triples are never reordered, so a subject that
//! reappears later starts a new block.

use super::escape_literal;
use super::ntriples::write_iri;
use crate::traversal::TripleSink;
use crate::vocab::{STANDARD_PREFIXES, rdf};
use crate::{GitlodError, Iri, SubjectId, Term, Triple};
use std::io::Write;

/// Streams triples as Turtle.
#[derive(Debug)]
pub struct TurtleWriter<W: Write> {
    out: W,
    started: bool,
    current: Option<SubjectId>,
    buf: String,
}

impl<W: Write> TurtleWriter<W> {
    #[must_use]
    pub fn new(out: W) -> Self {
        Self {
            out,
            started: false,
            current: None,
            buf: String::new(),
        }
    }

    /// Terminate the last block, flush and return the inner writer.
    pub fn finish(mut self) -> Result<W, GitlodError> {
        self.buf.clear();
        self.start();
        if self.current.take().is_some() {
            self.buf.push_str(" .\n");
        }
        self.out.write_all(self.buf.as_bytes())?;
        self.out.flush()?;
        Ok(self.out)
    }

    fn start(&mut self) {
        if self.started {
            return;
        }
        for (prefix, ns) in STANDARD_PREFIXES {
            self.buf.push_str("@prefix ");
            self.buf.push_str(prefix);
            self.buf.push_str(": <");
            self.buf.push_str(ns);
            self.buf.push_str("> .\n");
        }
        self.buf.push('\n');
        self.started = true;
    }
}

impl<W: Write> TripleSink for TurtleWriter<W> {
    fn push(&mut self, triple: Triple) -> Result<(), GitlodError> {
        self.buf.clear();
        self.start();

        if self.current.as_ref() == Some(&triple.subject) {
            self.buf.push_str(" ;\n    ");
        } else {
            if self.current.is_some() {
                self.buf.push_str(" .\n\n");
            }
            write_subject(&triple.subject, &mut self.buf);
            self.buf.push(' ');
            self.current = Some(triple.subject);
        }

        if triple.predicate.as_str() == rdf::TYPE {
            self.buf.push('a');
        } else {
            write_name(&triple.predicate, &mut self.buf);
        }
        self.buf.push(' ');
        write_term(&triple.object, &mut self.buf);

        self.out.write_all(self.buf.as_bytes())?;
        Ok(())
    }
}

/// `prefix:local` when `iri` sits in a standard namespace and the local part
/// needs no escaping.
fn compact(iri: &str) -> Option<String> {
    STANDARD_PREFIXES.iter().find_map(|(prefix, ns)| {
        let local = iri.strip_prefix(ns)?;
        let mut chars = local.chars();
        let first = chars.next()?;
        let valid = (first.is_ascii_alphanumeric() || first == '_')
            && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        valid.then(|| format!("{}:{}", prefix, local))
    })
}

fn write_name(iri: &Iri, out: &mut String) {
    match compact(iri.as_str()) {
        Some(name) => out.push_str(&name),
        None => write_iri(iri, out),
    }
}

fn write_subject(subject: &SubjectId, out: &mut String) {
    match subject {
        SubjectId::Iri(iri) => write_name(iri, out),
        SubjectId::Blank(node) => {
            out.push_str("_:");
            out.push_str(node.id());
        }
    }
}

fn write_term(term: &Term, out: &mut String) {
    match term {
        Term::Iri(iri) => write_name(iri, out),
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
                write_name(datatype, out);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vocab::foaf;

    fn render(triples: Vec<Triple>) -> String {
        let mut writer = TurtleWriter::new(Vec::new());
        for t in triples {
            writer.push(t).expect("push");
        }
        String::from_utf8(writer.finish().expect("finish")).expect("utf8")
    }

    #[test]
    fn compaction_rules() {
        assert_eq!(compact(foaf::NICK).as_deref(), Some("foaf:nick"));
        assert_eq!(
            compact("http://usefulinc.com/ns/doap#bug-database").as_deref(),
            Some("doap:bug-database")
        );
        assert_eq!(compact("http://github.com/alice"), None);
        assert_eq!(compact(foaf::NS), None);
    }

    #[test]
    fn same_subject_is_grouped() {
        let alice = SubjectId::blank("user-alice");
        let out = render(vec![
            Triple::new(alice.clone(), Iri::new(rdf::TYPE), Term::iri(foaf::PERSON)),
            Triple::new(alice, Iri::new(foaf::NICK), Term::literal("alice")),
            Triple::new(
                SubjectId::iri("http://github.com/alice"),
                Iri::new(foaf::ACCOUNT_NAME),
                Term::literal("alice"),
            ),
        ]);

        let body = out.split("\n\n").skip(1).collect::<Vec<_>>().join("\n\n");
        assert_eq!(
            body,
            "_:user-alice a foaf:Person ;\n    foaf:nick \"alice\" .\n\n\
             <http://github.com/alice> foaf:accountName \"alice\" .\n"
        );
    }

    #[test]
    fn empty_output_has_only_prefixes() {
        let out = render(Vec::new());
        assert_eq!(out.lines().filter(|l| l.starts_with("@prefix")).count(), 5);
        assert_eq!(out.lines().count(), 6);
    }
}
