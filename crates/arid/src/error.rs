//! Error types for parsing, resolution and the line driver

use thiserror::Error;

use crate::value::Value;

/// The grammar could not consume its input.
///
/// `offset` is the byte position in the parsed text where the failure was
/// detected. The line driver treats any `ParseError` as "need more input".
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Parse error at offset {offset}: {message}")]
pub struct ParseError {
    /// Human-readable error message
    pub message: String,

    /// Byte offset into the source text
    pub offset: usize,
}

impl ParseError {
    /// Create a new parse error.
    pub fn new(message: impl Into<String>, offset: usize) -> Self {
        Self {
            message: message.into(),
            offset,
        }
    }
}

/// Errors raised while resolving values or executing entries.
#[derive(Error, Debug)]
pub enum EvalError {
    /// Source text could not be parsed
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Resolution missed in every scope of the chain
    #[error("Path not found: {path}")]
    NotFound {
        /// Dotted rendering of the path
        path: String,
    },

    /// A path is already being resolved further up the stack
    #[error("Resolution cycle at {path} in scope {scope}")]
    Cycle {
        /// Dotted rendering of the path
        path: String,
        /// Label of the scope the cycle re-entered
        scope: String,
    },

    /// Strict resolution found the path only through the parent chain
    #[error("Path {path} is not local to scope {scope}")]
    ForeignScope {
        /// Dotted rendering of the path
        path: String,
        /// Label of the scope strict resolution started from
        scope: String,
    },

    /// `cat()` called on a value with no textual form
    #[error("Cannot concatenate {kind}")]
    NotConcatenable {
        /// Kind of the offending value
        kind: &'static str,
    },

    /// A value of the wrong kind was supplied
    #[error("Type error: expected {expected}, got {got}")]
    TypeError {
        /// Expected kind
        expected: &'static str,
        /// Actual kind received
        got: &'static str,
    },

    /// A native function was called with the wrong number of arguments
    #[error("Function {name} takes {expected} argument(s), got {got}")]
    Arity {
        /// Function name
        name: String,
        /// Declared arity
        expected: usize,
        /// Number of arguments supplied
        got: usize,
    },

    /// No directive in the table matched the entry
    #[error("No directive matches: {entry}")]
    NoSuchDirective {
        /// The entry's source text
        entry: String,
    },

    /// Writing to a stream sink failed
    #[error("Stream error: {0}")]
    Io(#[from] std::io::Error),

    /// Failure reported by an embedder-supplied function or directive
    #[error(transparent)]
    Host(#[from] anyhow::Error),
}

impl EvalError {
    /// Build a `NotFound` error from path components.
    pub fn not_found<T: std::fmt::Display>(path: &[T]) -> Self {
        EvalError::NotFound {
            path: dotted(path),
        }
    }

    /// Build a type error against the kind of `got`.
    pub fn type_error(expected: &'static str, got: &Value) -> Self {
        EvalError::TypeError {
            expected,
            got: type_name(got),
        }
    }

    /// Whether this is a resolution miss or a cycle.
    ///
    /// These are the conditions a fallback combinator may recover from.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, EvalError::NotFound { .. } | EvalError::Cycle { .. })
    }
}

/// Errors raised by the incremental line driver.
#[derive(Error, Debug)]
pub enum ReplError {
    /// The input ended inside an unterminated construct
    #[error("Unterminated input at end of stream: {text:?}")]
    DanglingInput {
        /// The buffered text that never parsed
        text: String,
    },

    /// A line dedented to an indentation that was never opened
    #[error("Dedent to unknown indentation level {indent:?}")]
    UnknownIndent {
        /// The offending indentation
        indent: String,
    },

    /// Old and new indentation do not extend one another
    #[error("Inconsistent indentation: {old:?} then {new:?}")]
    InconsistentIndent {
        /// Indentation of the previous command
        old: String,
        /// Indentation of the new line
        new: String,
    },

    /// A fired command failed
    #[error(transparent)]
    Eval(#[from] EvalError),
}

/// Result type alias for resolution and execution.
pub type Result<T> = std::result::Result<T, EvalError>;

/// Get a human-readable name for a value kind.
pub fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Text(_) => "text",
        Value::Number(_) => "number",
        Value::Boolean(_) => "boolean",
        Value::Binary(_) => "binary",
        Value::Scalar(_) => "scalar",
        Value::Blank(_) => "blank",
        Value::Boundary(_) => "boundary",
        Value::Concat(_) => "concat",
        Value::Call(_) => "call",
        Value::Function(_) => "function",
        Value::Stream(_) => "stream",
        Value::Directive(_) => "directive",
        Value::Scope(scope) if scope.is_list() => "list",
        Value::Scope(_) => "scope",
    }
}

pub(crate) fn dotted<T: std::fmt::Display>(path: &[T]) -> String {
    path.iter()
        .map(|key| key.to_string())
        .collect::<Vec<_>>()
        .join(".")
}
