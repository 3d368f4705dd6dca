//! # arid
//!
//! The core of a small embeddable templating and configuration language.
//!
//! Source text is parsed into [`Value`] nodes, bound lazily into a tree of
//! [`Scope`]s, and resolved on demand. Commands are dispatched through a
//! [`DirectiveTable`] the embedder supplies, and documents are read line by
//! line by the indentation-aware [`Repl`] driver.
//!
//! ## Architecture
//!
//! - **Value model**: one enum for every parsed node and every result
//! - **Grammar**: expression, template and command configurations of one
//!   recursive-descent engine
//! - **Scope chain**: lazy resolution with parent fallback and cycle
//!   detection
//! - **Driver**: buffers incomplete input and tracks indentation levels
//!
//! ## Example
//!
//! ```
//! use arid::{grammar, Scope, Value};
//!
//! let scope = Scope::standard();
//! scope.load("name := world\ngreeting := hello $name").unwrap();
//!
//! let value = grammar::expression("$greeting").unwrap();
//! assert_eq!(value.resolve(&scope).unwrap(), Value::text("hello world"));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod directive;
pub mod entry;
pub mod error;
pub mod grammar;
pub mod repl;
pub mod scope;
pub mod value;

// Re-export main types
pub use config::ReplConfig;
pub use directive::{BlockDirective, BlockFn, DirectiveTable};
pub use entry::Entry;
pub use error::{type_name, EvalError, ParseError, ReplError, Result};
pub use grammar::Parser;
pub use repl::Repl;
pub use scope::{Key, Scope, STREAM_KEY};
pub use value::{
    ArgGroup, ArgMode, Bracket, Call, Concat, Directive, DirectiveFn, FunctionValue, HostValue,
    NativeFn, Number, Stream, Value,
};

/// arid version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_exists() {
        assert!(!VERSION.is_empty());
    }
}
