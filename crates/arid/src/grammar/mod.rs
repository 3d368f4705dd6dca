//! Parsing: one production engine, three grammars
//!
//! - **expression**: a single value, inner whitespace kept as text
//! - **template**: literal text interleaved with `$` actions
//! - **command**: entries of blank-separated words ending at a line end
//!
//! Parsing is total: input the grammar cannot consume is a [`ParseError`].

mod engine;
mod scalar;
mod unparse;

pub use scalar::{detect_scalar, LeafDetector};
pub use unparse::{unparse, unparse_template};

pub(crate) use unparse::unparse_nodes;

use crate::entry::Entry;
use crate::error::ParseError;
use crate::value::Value;
use engine::Cursor;

/// Characters that end an entry in the expression and command grammars.
pub const LINE_ENDS: &str = "\n\r";

/// Grammar configuration: the boundary character set and the leaf detector.
#[derive(Debug, Clone)]
pub struct Parser {
    boundaries: String,
    detector: LeafDetector,
}

impl Default for Parser {
    fn default() -> Self {
        Self {
            boundaries: LINE_ENDS.to_string(),
            detector: detect_scalar,
        }
    }
}

impl Parser {
    /// Parser with line-end boundaries and the default leaf detector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the leaf detector.
    pub fn with_detector(mut self, detector: LeafDetector) -> Self {
        self.detector = detector;
        self
    }

    /// Replace the boundary character set. Only whitespace characters can
    /// act as boundaries.
    pub fn with_boundaries(mut self, boundaries: impl Into<String>) -> Self {
        self.boundaries = boundaries.into();
        self
    }

    pub(crate) fn is_boundary(&self, c: char) -> bool {
        self.boundaries.contains(c)
    }

    /// Parse one value; see [`expression`].
    pub fn expression(&self, text: &str) -> Result<Value, ParseError> {
        Cursor::new(text, self).expression()
    }

    /// Parse template text; see [`template`].
    pub fn template(&self, text: &str) -> Result<Value, ParseError> {
        Cursor::new(text, self).template()
    }

    /// Parse a single entry; see [`command`].
    pub fn command(&self, text: &str) -> Result<Entry, ParseError> {
        Cursor::new(text, self).command()
    }

    /// Parse a document of entries; see [`commands`].
    pub fn commands(&self, text: &str) -> Result<Vec<Entry>, ParseError> {
        Cursor::new(text, self).commands()
    }
}

/// Parse `text` as one value.
///
/// Leading and trailing whitespace is dropped, whitespace between words
/// becomes text and the words are smart-concatenated, so a lone word keeps
/// its kind:
///
/// ```
/// use arid::{grammar, Value};
///
/// assert_eq!(grammar::expression("  42 ").unwrap(), Value::int(42));
/// ```
pub fn expression(text: &str) -> Result<Value, ParseError> {
    Parser::default().expression(text)
}

/// Parse `text` as a template: a strict concatenation of literal text and
/// `$` actions. Whitespace and brackets outside actions are plain text.
pub fn template(text: &str) -> Result<Value, ParseError> {
    Parser::default().template(text)
}

/// Parse one logical line as a single entry.
///
/// A trailing line end is kept as a `Boundary`; anything after it is an
/// error.
pub fn command(text: &str) -> Result<Entry, ParseError> {
    Parser::default().command(text)
}

/// Parse a document into entries, each ending after its line end.
pub fn commands(text: &str) -> Result<Vec<Entry>, ParseError> {
    Parser::default().commands(text)
}
