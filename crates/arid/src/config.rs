//! Line driver configuration

use crate::grammar::Parser;

/// Source name used when none is given.
pub const DEFAULT_SOURCE: &str = "<input>";

/// Configuration for a [`Repl`](crate::Repl).
#[derive(Debug, Clone)]
pub struct ReplConfig {
    /// Keep going after a command fails, logging and recording the error
    pub interactive: bool,

    /// Name of the input, for log fields
    pub source: String,

    /// Grammar used to read lines
    pub parser: Parser,
}

impl Default for ReplConfig {
    fn default() -> Self {
        Self {
            interactive: false,
            source: DEFAULT_SOURCE.to_string(),
            parser: Parser::default(),
        }
    }
}

impl ReplConfig {
    /// Create a config with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// A config for interactive sessions.
    pub fn interactive() -> Self {
        Self {
            interactive: true,
            ..Default::default()
        }
    }

    /// Set whether command failures are tolerated.
    pub fn with_interactive(mut self, interactive: bool) -> Self {
        self.interactive = interactive;
        self
    }

    /// Name the input.
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    /// Read lines with a custom grammar configuration.
    pub fn with_parser(mut self, parser: Parser) -> Self {
        self.parser = parser;
        self
    }
}
