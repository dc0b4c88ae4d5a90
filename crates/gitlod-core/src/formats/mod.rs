//! # Output Formats
//!
//! Streaming writers turning the triple sequence into bytes.
//!
//! | Format | Media type | Extension |
//! |--------|------------|-----------|
//! | N-Triples | `application/n-triples` (also `text/plain`) | `nt` |
//! | Turtle | `text/turtle` | `ttl` |
//!
//! Both writers implement [`TripleSink`], so a traversal can write straight
//! into them. Neither reorders triples; output order is emission order.

mod ntriples;
mod turtle;

pub use ntriples::NTriplesWriter;
pub use turtle::TurtleWriter;

use crate::traversal::TripleSink;
use crate::{GitlodError, Triple};
use std::fmt;
use std::io::Write;
use std::str::FromStr;

// =============================================================================
// FORMAT
// =============================================================================

/// A supported serialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    NTriples,
    #[default]
    Turtle,
}

impl Format {
    /// Canonical media type.
    #[must_use]
    pub fn media_type(&self) -> &'static str {
        match self {
            Self::NTriples => "application/n-triples",
            Self::Turtle => "text/turtle",
        }
    }

    /// File extension.
    #[must_use]
    pub fn extension(&self) -> &'static str {
        match self {
            Self::NTriples => "nt",
            Self::Turtle => "ttl",
        }
    }

    /// Format for a single media type, ignoring parameters.
    #[must_use]
    pub fn from_media_type(media_type: &str) -> Option<Self> {
        let essence = media_type.split(';').next().unwrap_or_default().trim();
        match essence.to_ascii_lowercase().as_str() {
            "application/n-triples" | "text/plain" => Some(Self::NTriples),
            "text/turtle" | "application/x-turtle" => Some(Self::Turtle),
            _ => None,
        }
    }

    /// Build a writer for this format around `out`.
    pub fn writer<W: Write>(self, out: W) -> Writer<W> {
        match self {
            Self::NTriples => Writer::NTriples(NTriplesWriter::new(out)),
            Self::Turtle => Writer::Turtle(TurtleWriter::new(out)),
        }
    }
}

impl FromStr for Format {
    type Err = GitlodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "nt" | "ntriples" | "n-triples" => Ok(Self::NTriples),
            "ttl" | "turtle" => Ok(Self::Turtle),
            other => Self::from_media_type(other).ok_or_else(|| {
                GitlodError::SerializationError(format!("Unknown format: {}", s))
            }),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

// =============================================================================
// WRITER
// =============================================================================

/// A writer of either format.
#[derive(Debug)]
pub enum Writer<W: Write> {
    NTriples(NTriplesWriter<W>),
    Turtle(TurtleWriter<W>),
}

impl<W: Write> Writer<W> {
    /// Flush pending output and return the inner writer.
    pub fn finish(self) -> Result<W, GitlodError> {
        match self {
            Self::NTriples(w) => w.finish(),
            Self::Turtle(w) => w.finish(),
        }
    }
}

impl<W: Write> TripleSink for Writer<W> {
    fn push(&mut self, triple: Triple) -> Result<(), GitlodError> {
        match self {
            Self::NTriples(w) => w.push(triple),
            Self::Turtle(w) => w.push(triple),
        }
    }
}

/// Serialize `triples` into a byte buffer.
pub fn to_bytes(format: Format, triples: &[Triple]) -> Result<Vec<u8>, GitlodError> {
    let mut writer = format.writer(Vec::new());
    for triple in triples {
        writer.push(triple.clone())?;
    }
    writer.finish()
}

// =============================================================================
// ESCAPING
// =============================================================================

/// Escape a string for a quoted literal.
pub(crate) fn escape_literal(s: &str, out: &mut String) {
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => out.push_str(&format!("\\u{:04X}", c as u32)),
            c => out.push(c),
        }
    }
}

/// Escape an IRI for `<...>`.
///
/// Characters forbidden inside an IRI reference become `\u` escapes.
pub(crate) fn escape_iri(s: &str, out: &mut String) {
    for c in s.chars() {
        match c {
            '<' | '>' | '"' | '{' | '}' | '|' | '^' | '`' | '\\' => {
                out.push_str(&format!("\\u{:04X}", c as u32));
            }
            c if c <= ' ' => out.push_str(&format!("\\u{:04X}", c as u32)),
            c => out.push(c),
        }
    }
}
