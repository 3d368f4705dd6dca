//! One parsed logical command

use std::ops::Range;

use crate::error::Result;
use crate::scope::{Key, Scope};
use crate::value::{Concat, Value};

/// Path component that stands for a fresh list slot.
const FRESH_SLOT: &str = "*";

/// An ordered list of nodes making up one command.
///
/// Whitespace is kept as `Blank`/`Boundary` nodes, so an entry knows its
/// indentation and renders back exactly. The non-ignorable nodes are the
/// entry's *words*.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Entry {
    nodes: Vec<Value>,
}

impl Entry {
    /// Create an entry from parsed nodes.
    pub fn new(nodes: Vec<Value>) -> Self {
        Self { nodes }
    }

    /// All nodes, whitespace included.
    pub fn nodes(&self) -> &[Value] {
        &self.nodes
    }

    /// Number of nodes, whitespace included.
    pub fn size(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the entry has no nodes at all.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The non-ignorable nodes, in order.
    pub fn words(&self) -> Vec<&Value> {
        self.nodes.iter().filter(|node| !node.is_ignorable()).collect()
    }

    /// Whether any node is a word.
    pub fn has_words(&self) -> bool {
        self.nodes.iter().any(|node| !node.is_ignorable())
    }

    /// The nodes in `range` (node indices) as a new entry.
    pub fn subentry(&self, range: Range<usize>) -> Entry {
        let end = range.end.min(self.nodes.len());
        let start = range.start.min(end);
        Entry::new(self.nodes[start..end].to_vec())
    }

    /// Split around the word with index `word`: the nodes before it and the
    /// nodes after it. `None` if there are not that many words.
    pub fn split_at_word(&self, word: usize) -> Option<(Entry, Entry)> {
        let index = self
            .nodes
            .iter()
            .enumerate()
            .filter(|(_, node)| !node.is_ignorable())
            .nth(word)
            .map(|(i, _)| i)?;
        Some((
            self.subentry(0..index),
            self.subentry(index + 1..self.nodes.len()),
        ))
    }

    /// This entry followed by the nodes of `other`.
    pub fn chain(&self, other: &Entry) -> Entry {
        let mut nodes = self.nodes.clone();
        nodes.extend(other.nodes.iter().cloned());
        Entry::new(nodes)
    }

    /// This entry without a trailing `Boundary`.
    pub fn without_boundary(&self) -> Entry {
        match self.nodes.last() {
            Some(last) if last.is_boundary() => self.subentry(0..self.nodes.len() - 1),
            _ => self.clone(),
        }
    }

    /// The leading whitespace before the first word or line end.
    pub fn indent(&self) -> String {
        self.nodes
            .iter()
            .map_while(|node| match node {
                Value::Blank(s) => Some(s.as_ref()),
                _ => None,
            })
            .collect()
    }

    /// The words as a path.
    ///
    /// Each word is resolved in `scope` and split on `.`; a `*` component
    /// becomes a fresh opaque key.
    pub fn path(&self, scope: &Scope) -> Result<Vec<Key>> {
        let mut path = Vec::new();
        for word in self.words() {
            let text = word.resolve(scope)?.cat()?;
            for component in text.split('.').filter(|c| !c.is_empty()) {
                if component == FRESH_SLOT {
                    path.push(Key::gensym());
                } else {
                    path.push(Key::from(component));
                }
            }
        }
        Ok(path)
    }

    /// The entry as a single value.
    ///
    /// Outer whitespace is dropped and inner whitespace becomes text; the
    /// result is smart-concatenated, so a single word keeps its kind.
    pub fn phrase(&self) -> Value {
        let Some(first) = self.nodes.iter().position(|node| !node.is_ignorable()) else {
            return Concat::smart(Vec::new());
        };
        let last = self
            .nodes
            .iter()
            .rposition(|node| !node.is_ignorable())
            .unwrap_or(first);
        let parts = self.nodes[first..=last]
            .iter()
            .map(|node| match node {
                Value::Blank(s) | Value::Boundary(s) => Value::Text(s.clone()),
                other => other.clone(),
            })
            .collect();
        Concat::smart(parts)
    }

    /// The words joined without whitespace.
    pub fn concat(&self) -> Value {
        Concat::smart(self.words().into_iter().cloned().collect())
    }

    /// Render back to command source.
    pub fn unparse(&self) -> String {
        crate::grammar::unparse_nodes(&self.nodes)
    }
}

impl std::fmt::Display for Entry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.unparse())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::command;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_words_skip_whitespace() {
        let entry = command("  a  b\n").unwrap();
        assert_eq!(entry.words(), vec![&Value::text("a"), &Value::text("b")]);
        assert_eq!(entry.size(), 5);
    }

    #[test]
    fn test_indent() {
        assert_eq!(command("\t  x = 1").unwrap().indent(), "\t  ");
        assert_eq!(command("x = 1").unwrap().indent(), "");
    }

    #[test]
    fn test_split_at_word() {
        let entry = command("a b = c d").unwrap();
        let (prefix, suffix) = entry.split_at_word(2).unwrap();
        assert_eq!(prefix.words(), vec![&Value::text("a"), &Value::text("b")]);
        assert_eq!(suffix.words(), vec![&Value::text("c"), &Value::text("d")]);
        assert!(entry.split_at_word(4).is_none());
    }

    #[test]
    fn test_phrase_keeps_inner_whitespace() {
        let entry = command("  x  y \n").unwrap();
        assert_eq!(
            entry.phrase(),
            Concat::smart(vec![Value::text("x"), Value::text("  "), Value::text("y")])
        );
    }

    #[test]
    fn test_phrase_of_single_word_keeps_kind() {
        assert_eq!(command(" 7 ").unwrap().phrase(), Value::int(7));
    }

    #[test]
    fn test_without_boundary() {
        let entry = command("a\n").unwrap();
        assert_eq!(entry.without_boundary().size(), 1);
        assert_eq!(entry.without_boundary().without_boundary().size(), 1);
    }

    #[test]
    fn test_path_splits_dots() {
        let scope = Scope::standard();
        let entry = command("a.b c").unwrap();
        assert_eq!(
            entry.path(&scope).unwrap(),
            vec![Key::from("a"), Key::from("b"), Key::from("c")]
        );
    }

    #[test]
    fn test_star_is_fresh_key() {
        let scope = Scope::standard();
        let path = command("xs *").unwrap().path(&scope).unwrap();
        assert_eq!(path.len(), 2);
        assert!(path[1].is_opaque());
    }

    #[test]
    fn test_unparse_is_exact() {
        let source = "  a $f(x  y) b\n";
        assert_eq!(command(source).unwrap().unparse(), source);
    }
}
