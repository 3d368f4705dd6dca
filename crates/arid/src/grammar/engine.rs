//! Production engine shared by the three grammars
//!
//! A recursive-descent parser over a byte cursor. Every production either
//! consumes input and returns a node or leaves the cursor untouched; a
//! committed production that cannot finish (an open bracket with no close)
//! is a `ParseError`.

use super::Parser;
use crate::entry::Entry;
use crate::error::ParseError;
use crate::value::{ArgGroup, Bracket, Call, Concat, Value};

/// How a `$` escape form treats its bracket contents.
#[derive(Clone, Copy)]
enum Escape {
    /// `$lit(…)` / `$'(…)`: verbatim text
    Literal,
    /// `$.(…)`: template contents, strict concatenation
    Strict,
    /// `$pass(…)`: template contents, smart concatenation
    Pass,
}

const ESCAPES: [(&str, Escape); 4] = [
    ("lit", Escape::Literal),
    ("'", Escape::Literal),
    (".", Escape::Strict),
    ("pass", Escape::Pass),
];

pub(crate) fn is_bracket(c: char) -> bool {
    matches!(c, '(' | ')' | '[' | ']')
}

pub(crate) struct Cursor<'a> {
    src: &'a str,
    pos: usize,
    parser: &'a Parser,
}

impl<'a> Cursor<'a> {
    pub(crate) fn new(src: &'a str, parser: &'a Parser) -> Self {
        Self { src, pos: 0, parser }
    }

    // ═══════════════════════════════════════════════════════════════════
    // Cursor
    // ═══════════════════════════════════════════════════════════════════

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn error(&self, message: impl Into<String>) -> ParseError {
        ParseError::new(message, self.pos)
    }

    // ═══════════════════════════════════════════════════════════════════
    // Configurations
    // ═══════════════════════════════════════════════════════════════════

    /// Expression grammar: one value; inner whitespace is kept as text.
    pub(crate) fn expression(mut self) -> Result<Value, ParseError> {
        Ok(Entry::new(self.line()?).phrase())
    }

    /// Command grammar restricted to a single entry.
    pub(crate) fn command(mut self) -> Result<Entry, ParseError> {
        Ok(Entry::new(self.line()?))
    }

    /// Words and whitespace of one logical line; nothing may follow its
    /// boundary except more whitespace.
    fn line(&mut self) -> Result<Vec<Value>, ParseError> {
        let mut nodes = Vec::new();
        let mut ended = false;
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                let node = self.whitespace();
                ended |= node.is_boundary();
                nodes.push(node);
            } else if ended {
                return Err(self.error("unexpected input after line end"));
            } else {
                nodes.push(self.word(None)?);
            }
        }
        Ok(nodes)
    }

    /// Template grammar: literal text interleaved with `$` actions.
    pub(crate) fn template(mut self) -> Result<Value, ParseError> {
        let start = self.pos;
        let parts = self.template_body(None, start)?;
        Ok(Concat::strict(parts))
    }

    /// Command grammar: entries separated by boundaries.
    pub(crate) fn commands(mut self) -> Result<Vec<Entry>, ParseError> {
        let mut entries = Vec::new();
        let mut nodes = Vec::new();
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                let node = self.whitespace();
                let ends_entry = node.is_boundary();
                nodes.push(node);
                if ends_entry {
                    entries.push(Entry::new(std::mem::take(&mut nodes)));
                }
            } else {
                nodes.push(self.word(None)?);
            }
        }
        if !nodes.is_empty() {
            entries.push(Entry::new(nodes));
        }
        Ok(entries)
    }

    // ═══════════════════════════════════════════════════════════════════
    // Productions
    // ═══════════════════════════════════════════════════════════════════

    /// Maximal whitespace run, classified by the boundary set.
    ///
    /// Boundary and non-boundary characters never share a run, so the
    /// indentation after a line end stays a separate `Blank`.
    fn whitespace(&mut self) -> Value {
        let start = self.pos;
        let boundary = self.peek().is_some_and(|c| self.parser.is_boundary(c));
        while let Some(c) = self.peek() {
            if !c.is_whitespace() || self.parser.is_boundary(c) != boundary {
                break;
            }
            self.bump();
        }
        let run = &self.src[start..self.pos];
        if boundary {
            Value::boundary(run)
        } else {
            Value::blank(run)
        }
    }

    /// Whitespace inside brackets, where boundaries do not apply.
    fn blank(&mut self) -> Value {
        let start = self.pos;
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
        Value::blank(&self.src[start..self.pos])
    }

    /// A run of scalar and action spans up to whitespace, end of input or
    /// `close`, joined by smart concatenation.
    fn word(&mut self, close: Option<char>) -> Result<Value, ParseError> {
        let mut spans = Vec::new();
        while let Some(c) = self.peek() {
            if c.is_whitespace() || Some(c) == close {
                break;
            }
            if c == '$' {
                spans.push(self.action()?);
            } else if is_bracket(c) {
                return Err(self.error(format!("unexpected '{}'", c)));
            } else {
                spans.push(self.scalar());
            }
        }
        Ok(Concat::smart(spans))
    }

    /// Bracket- and `$`-free run, classified by the leaf detector.
    fn scalar(&mut self) -> Value {
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|c| !c.is_whitespace() && !is_bracket(c) && c != '$')
        {
            self.bump();
        }
        (self.parser.detector)(&self.src[start..self.pos])
    }

    /// Non-whitespace, non-bracket run; embedded `$` chains name segments.
    fn identifier(&mut self) -> &'a str {
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|c| !c.is_whitespace() && !is_bracket(c))
        {
            self.bump();
        }
        &self.src[start..self.pos]
    }

    /// Everything introduced by `$`.
    fn action(&mut self) -> Result<Value, ParseError> {
        let start = self.pos;
        self.bump();

        for (prefix, escape) in ESCAPES {
            let Some(after) = self.rest().strip_prefix(prefix) else {
                continue;
            };
            let Some(bracket) = after.chars().next().and_then(Bracket::from_open) else {
                continue;
            };
            self.pos += prefix.len() + 1;
            return match escape {
                Escape::Literal => self.literal(bracket, start),
                Escape::Strict => Ok(Concat::strict(self.template_body(Some(bracket), start)?)),
                Escape::Pass => Ok(Concat::smart(self.template_body(Some(bracket), start)?)),
            };
        }

        let name = self.identifier();
        let mut groups = Vec::new();
        while let Some(bracket) = self.peek().and_then(Bracket::from_open) {
            self.bump();
            groups.push(self.group(bracket, start)?);
        }
        if name.is_empty() && groups.is_empty() {
            // A `$` that introduces nothing is literal
            return Ok(Value::text("$"));
        }
        Ok(Value::call(Call::new(name, groups)))
    }

    /// Blank-separated arguments up to the matching close bracket.
    fn group(&mut self, bracket: Bracket, start: usize) -> Result<ArgGroup, ParseError> {
        let mut args = Vec::new();
        loop {
            match self.peek() {
                None => return Err(ParseError::new("unterminated call", start)),
                Some(c) if c == bracket.close() => {
                    self.bump();
                    return Ok(ArgGroup::new(bracket, args));
                }
                Some(c) if c.is_whitespace() => args.push(self.blank()),
                Some(_) => args.push(self.word(Some(bracket.close()))?),
            }
        }
    }

    /// Verbatim contents of a balanced bracket pair.
    fn literal(&mut self, bracket: Bracket, start: usize) -> Result<Value, ParseError> {
        let content_start = self.pos;
        let mut depth = 0usize;
        loop {
            match self.bump() {
                None => return Err(ParseError::new("unterminated literal", start)),
                Some(c) if c == bracket.open() => depth += 1,
                Some(c) if c == bracket.close() => {
                    if depth == 0 {
                        let content_end = self.pos - c.len_utf8();
                        return Ok(Value::text(&self.src[content_start..content_end]));
                    }
                    depth -= 1;
                }
                Some(_) => {}
            }
        }
    }

    /// Template text and actions up to `close` (or end of input).
    ///
    /// Brackets of the closing kind nest inside the text; text is never
    /// run through the leaf detector.
    fn template_body(
        &mut self,
        close: Option<Bracket>,
        start: usize,
    ) -> Result<Vec<Value>, ParseError> {
        let mut parts = Vec::new();
        let mut text_start = self.pos;
        let mut depth = 0usize;
        loop {
            let Some(c) = self.peek() else {
                if close.is_some() {
                    return Err(ParseError::new("unterminated template", start));
                }
                self.flush_text(&mut parts, text_start);
                return Ok(parts);
            };
            match close {
                Some(bracket) if c == bracket.open() => depth += 1,
                Some(bracket) if c == bracket.close() => {
                    if depth == 0 {
                        self.flush_text(&mut parts, text_start);
                        self.bump();
                        return Ok(parts);
                    }
                    depth -= 1;
                }
                _ => {}
            }
            if c == '$' {
                self.flush_text(&mut parts, text_start);
                parts.push(self.action()?);
                text_start = self.pos;
            } else {
                self.bump();
            }
        }
    }

    fn flush_text(&self, parts: &mut Vec<Value>, text_start: usize) {
        if self.pos > text_start {
            parts.push(Value::text(&self.src[text_start..self.pos]));
        }
    }
}
