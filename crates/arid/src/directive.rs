//! Directive table: how command entries are dispatched
//!
//! The embedder builds a [`DirectiveTable`] once and hands it to
//! [`Scope::root`]; every scope of that tree dispatches through it.

use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;

use crate::entry::Entry;
use crate::error::Result;
use crate::scope::Scope;
use crate::value::Directive;

/// Handler type for block directives: `(rest of entry, scope)`.
pub type BlockFn = Rc<dyn Fn(&Entry, &Scope) -> Result<()>>;

/// A directive triggered by a leading `name:` word.
#[derive(Clone)]
pub struct BlockDirective {
    /// The block name, without the colon
    pub name: String,

    /// The handler
    pub func: BlockFn,
}

impl BlockDirective {
    /// Create a block directive.
    pub fn new(
        name: impl Into<String>,
        func: impl Fn(&Entry, &Scope) -> Result<()> + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            func: Rc::new(func),
        }
    }

    /// Invoke the handler.
    pub fn invoke(&self, rest: &Entry, scope: &Scope) -> Result<()> {
        (self.func)(rest, scope)
    }
}

impl fmt::Debug for BlockDirective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BlockDirective({})", self.name)
    }
}

/// Generic and block directives.
///
/// Generic directives are tried in insertion order, so earlier entries take
/// precedence when a command contains more than one directive word.
#[derive(Clone, Debug, Default)]
pub struct DirectiveTable {
    generic: IndexMap<String, Directive>,
    blocks: IndexMap<String, BlockDirective>,
}

impl DirectiveTable {
    /// An empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// The assignment directives: `:=` (lazy) then `=` (eager).
    pub fn standard() -> Self {
        Self::new()
            .with(Directive::new(":=", assign_lazy))
            .with(Directive::new("=", assign_eager))
    }

    /// Add a generic directive with the lowest precedence so far.
    pub fn with(mut self, directive: Directive) -> Self {
        self.insert(directive);
        self
    }

    /// Add a block directive.
    pub fn with_block(mut self, block: BlockDirective) -> Self {
        self.insert_block(block);
        self
    }

    /// Add or replace a generic directive. A replaced directive keeps its
    /// precedence.
    pub fn insert(&mut self, directive: Directive) {
        self.generic.insert(directive.name.clone(), directive);
    }

    /// Add or replace a block directive.
    pub fn insert_block(&mut self, block: BlockDirective) {
        self.blocks.insert(block.name.clone(), block);
    }

    /// Generic directives in precedence order.
    pub fn generic(&self) -> impl Iterator<Item = &Directive> {
        self.generic.values()
    }

    /// The block directive called `name`.
    pub fn block(&self, name: &str) -> Option<&BlockDirective> {
        self.blocks.get(name)
    }
}

/// `path := phrase`: bind the phrase unresolved.
fn assign_lazy(prefix: &Entry, suffix: &Entry, scope: &Scope) -> Result<()> {
    let path = prefix.path(scope)?;
    scope.set(&path, suffix.phrase())
}

/// `path = phrase`: resolve the phrase now and bind the result.
fn assign_eager(prefix: &Entry, suffix: &Entry, scope: &Scope) -> Result<()> {
    let path = prefix.path(scope)?;
    let value = suffix.phrase().resolve(scope)?;
    scope.set(&path, value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::command;
    use crate::scope::Key;
    use crate::value::{Call, Value};
    use crate::EvalError;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_standard_order() {
        let names: Vec<_> = DirectiveTable::standard()
            .generic()
            .map(|d| d.name.clone())
            .collect();
        assert_eq!(names, vec![":=", "="]);
    }

    #[test]
    fn test_lazy_assignment_stores_node() {
        let scope = Scope::standard();
        scope.execute(&command("x := $y").unwrap()).unwrap();
        assert_eq!(
            scope.get_local(&Key::from("x")),
            Some(Value::call(Call::reference("y")))
        );
    }

    #[test]
    fn test_eager_assignment_resolves() {
        let scope = Scope::standard();
        scope.execute(&command("y = 1").unwrap()).unwrap();
        scope.execute(&command("x = $y").unwrap()).unwrap();
        assert_eq!(scope.get_local(&Key::from("x")), Some(Value::int(1)));
    }

    #[test]
    fn test_first_directive_in_table_wins() {
        let scope = Scope::standard();
        scope.execute(&command("x := a = b").unwrap()).unwrap();
        assert_eq!(
            scope.resolved(&[Key::from("x")]).unwrap(),
            Value::text("a = b")
        );
    }

    #[test]
    fn test_block_directive() {
        let table = DirectiveTable::standard().with_block(BlockDirective::new(
            "count",
            |rest, scope| {
                let n = rest.words().len() as i64;
                scope.bind(Key::from("count"), Value::int(n));
                Ok(())
            },
        ));
        let scope = Scope::root(table);
        scope.execute(&command("count: a b c").unwrap()).unwrap();
        assert_eq!(scope.get_local(&Key::from("count")), Some(Value::int(3)));
    }

    #[test]
    fn test_no_directive() {
        let scope = Scope::root(DirectiveTable::new());
        let err = scope.execute(&command("x = 1").unwrap()).unwrap_err();
        assert!(matches!(err, EvalError::NoSuchDirective { entry } if entry == "x = 1"));
    }

    #[test]
    fn test_host_directive_error() {
        let table = DirectiveTable::new().with(Directive::new("!", |_, _, _| {
            Err(anyhow::anyhow!("refused").into())
        }));
        let scope = Scope::root(table);
        let err = scope.execute(&command("do ! it").unwrap()).unwrap_err();
        assert!(matches!(err, EvalError::Host(_)));
        assert_eq!(err.to_string(), "refused");
    }
}
