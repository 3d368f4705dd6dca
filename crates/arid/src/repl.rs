//! Incremental, indentation-aware line driver
//!
//! Lines are fed one at a time. Input that does not parse yet (an open
//! bracket, say) is buffered until it does. An indented line continues the
//! command above it: `a:` followed by `  b = 1` fires as `a:  b = 1`, and
//! each further line at the same depth fires as `a:` plus that line.

use std::io::BufRead;

use indexmap::IndexMap;

use crate::config::ReplConfig;
use crate::entry::Entry;
use crate::error::{EvalError, ReplError};
use crate::scope::Scope;

/// Feeds lines into a scope as commands.
///
/// # Example
///
/// ```
/// use arid::{Key, Repl, ReplConfig, Scope, Value};
///
/// let scope = Scope::standard();
/// let mut repl = Repl::new(scope.clone(), ReplConfig::default());
/// repl.feed("server:").unwrap();
/// repl.feed("    port = 8080").unwrap();
/// repl.close().unwrap();
///
/// let port = scope.resolved(&Key::dotted("server.port")).unwrap();
/// assert_eq!(port, Value::int(8080));
/// ```
pub struct Repl {
    scope: Scope,
    config: ReplConfig,

    /// Raw lines that have not parsed yet
    buffer: Vec<String>,

    /// Indentation of the current command
    indent: String,

    /// The command waiting to fire
    command: Entry,

    /// Node index in `command` where the newest line begins
    fresh: usize,

    /// Command prefix for each open indentation level
    partials: IndexMap<String, Entry>,

    /// Failures swallowed in interactive mode
    errors: Vec<EvalError>,

    lineno: usize,
}

impl Repl {
    /// Create a driver executing into `scope`.
    pub fn new(scope: Scope, config: ReplConfig) -> Self {
        let mut partials = IndexMap::new();
        partials.insert(String::new(), Entry::default());
        Self {
            scope,
            config,
            buffer: Vec::new(),
            indent: String::new(),
            command: Entry::default(),
            fresh: 0,
            partials,
            errors: Vec::new(),
            lineno: 0,
        }
    }

    /// The scope commands execute in.
    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    /// Errors recorded by an interactive session, oldest first.
    pub fn errors(&self) -> &[EvalError] {
        &self.errors
    }

    /// Whether incomplete input is buffered.
    pub fn is_pending(&self) -> bool {
        !self.buffer.is_empty()
    }

    /// Consume one line.
    pub fn feed(&mut self, line: &str) -> Result<(), ReplError> {
        self.lineno += 1;
        let text = if self.buffer.is_empty() {
            line.to_string()
        } else {
            format!("{}\n{}", self.buffer.join("\n"), line)
        };

        let entries = match self.config.parser.commands(&text) {
            Ok(entries) => entries,
            Err(err) => {
                tracing::trace!(
                    source = %self.config.source,
                    line = self.lineno,
                    reason = %err,
                    "buffering incomplete input"
                );
                self.buffer.push(line.to_string());
                return Ok(());
            }
        };
        self.buffer.clear();

        for entry in entries.into_iter().filter(Entry::has_words) {
            self.accept(entry.without_boundary())?;
        }
        Ok(())
    }

    /// Finish the input, firing the last command.
    pub fn close(&mut self) -> Result<(), ReplError> {
        if !self.buffer.is_empty() {
            return Err(ReplError::DanglingInput {
                text: std::mem::take(&mut self.buffer).join("\n"),
            });
        }
        self.fire()?;
        self.command = Entry::default();
        self.fresh = 0;
        Ok(())
    }

    /// Feed every line of `reader`, then close.
    pub fn run(&mut self, reader: impl BufRead) -> Result<(), ReplError> {
        for line in reader.lines() {
            let line = line.map_err(EvalError::from)?;
            self.feed(&line)?;
        }
        self.close()
    }

    fn accept(&mut self, suffix: Entry) -> Result<(), ReplError> {
        let indent = suffix.indent();
        if !indent.starts_with(&self.indent) && !self.indent.starts_with(&indent) {
            return Err(ReplError::InconsistentIndent {
                old: self.indent.clone(),
                new: indent,
            });
        }

        if indent.len() <= self.indent.len() {
            self.fire()?;
        } else {
            tracing::trace!(
                source = %self.config.source,
                line = self.lineno,
                depth = indent.len(),
                "opening indentation level"
            );
            self.partials.insert(indent.clone(), self.command.clone());
        }
        self.partials.retain(|level, _| level.len() <= indent.len());

        let partial = self
            .partials
            .get(&indent)
            .ok_or_else(|| ReplError::UnknownIndent {
                indent: indent.clone(),
            })?;
        self.fresh = partial.size();
        self.command = partial.chain(&suffix);
        self.indent = indent;
        Ok(())
    }

    /// Execute the current command if its newest line added any words.
    fn fire(&mut self) -> Result<(), ReplError> {
        let added = self.command.subentry(self.fresh..self.command.size());
        if !added.has_words() {
            return Ok(());
        }
        tracing::debug!(
            source = %self.config.source,
            line = self.lineno,
            command = %self.command,
            "firing command"
        );
        match self.scope.execute(&self.command) {
            Ok(()) => Ok(()),
            Err(err) if self.config.interactive => {
                tracing::warn!(
                    source = %self.config.source,
                    line = self.lineno,
                    error = %err,
                    "command failed"
                );
                self.errors.push(err);
                Ok(())
            }
            Err(err) => Err(err.into()),
        }
    }
}
