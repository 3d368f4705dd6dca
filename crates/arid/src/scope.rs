//! Scope chain: namespaces, lazy resolution and command execution

mod guard;
mod key;
mod prelude;

pub use key::Key;

use std::cell::RefCell;
use std::collections::HashSet;
use std::fmt;
use std::rc::{Rc, Weak};

use indexmap::IndexMap;

use crate::config::ReplConfig;
use crate::directive::DirectiveTable;
use crate::entry::Entry;
use crate::error::{dotted, EvalError, ReplError, Result};
use crate::grammar;
use crate::repl::Repl;
use crate::value::Value;
use guard::ResolutionGuard;

/// Binding under which [`Scope::flush_template`] finds its output stream.
pub const STREAM_KEY: &str = "stdout";

const ROOT_LABEL: &str = "root";

/// State shared by every scope of one tree.
pub(crate) struct Runtime {
    directives: DirectiveTable,

    /// Built-in functions, consulted after the whole scope chain misses
    prelude: RefCell<IndexMap<Key, Value>>,

    /// `(scope identity, path)` pairs currently being resolved
    resolving: RefCell<HashSet<(usize, Vec<Key>)>>,
}

struct ScopeData {
    bindings: RefCell<IndexMap<Key, Value>>,
    parent: Option<Weak<ScopeData>>,
    label: String,
    is_list: bool,
    runtime: Rc<Runtime>,
}

/// A namespace of lazily resolved bindings.
///
/// `Scope` is a cheap handle: clones share the same bindings. A scope
/// holds only a weak link to its parent, so children never keep their
/// ancestors alive; a scope whose parent is gone behaves as a root.
///
/// # Example
///
/// ```
/// use arid::{Key, Scope, Value};
///
/// let root = Scope::standard();
/// root.load("greeting := hello $name\nname = world").unwrap();
///
/// let child = root.create_child(false);
/// child.load("name = there").unwrap();
///
/// let greeting = [Key::from("greeting")];
/// assert_eq!(root.resolved(&greeting).unwrap(), Value::text("hello world"));
/// assert_eq!(child.resolved(&greeting).unwrap(), Value::text("hello there"));
/// ```
#[derive(Clone)]
pub struct Scope {
    inner: Rc<ScopeData>,
}

impl Runtime {
    pub(crate) fn install(&self, key: Key, value: Value) {
        self.prelude.borrow_mut().insert(key, value);
    }

    fn builtin(&self, path: &[Key]) -> Option<Value> {
        match path {
            [key] => self.prelude.borrow().get(key).cloned(),
            _ => None,
        }
    }
}

impl Scope {
    /// Create a root scope that dispatches commands through `directives`.
    pub fn root(directives: DirectiveTable) -> Self {
        let runtime = Rc::new(Runtime {
            directives,
            prelude: RefCell::new(IndexMap::new()),
            resolving: RefCell::new(HashSet::new()),
        });
        Self::with_parts(None, ROOT_LABEL.to_string(), false, runtime)
    }

    /// Root scope with the standard directives and prelude.
    pub fn standard() -> Self {
        Self::with_prelude(DirectiveTable::standard())
    }

    fn with_parts(
        parent: Option<Weak<ScopeData>>,
        label: String,
        is_list: bool,
        runtime: Rc<Runtime>,
    ) -> Self {
        Self {
            inner: Rc::new(ScopeData {
                bindings: RefCell::new(IndexMap::new()),
                parent,
                label,
                is_list,
                runtime,
            }),
        }
    }

    /// A new empty scope whose parent is `self`.
    pub fn create_child(&self, is_list: bool) -> Scope {
        self.child(format!("{}.*", self.inner.label), is_list)
    }

    fn child(&self, label: String, is_list: bool) -> Scope {
        Self::with_parts(
            Some(Rc::downgrade(&self.inner)),
            label,
            is_list,
            self.inner.runtime.clone(),
        )
    }

    // ═══════════════════════════════════════════════════════════════════
    // Inspection
    // ═══════════════════════════════════════════════════════════════════

    /// The parent scope, if it is still alive.
    pub fn parent(&self) -> Option<Scope> {
        self.inner
            .parent
            .as_ref()
            .and_then(Weak::upgrade)
            .map(|inner| Scope { inner })
    }

    /// Whether this scope is a list.
    pub fn is_list(&self) -> bool {
        self.inner.is_list
    }

    /// Dotted name of this scope for messages.
    pub fn label(&self) -> &str {
        &self.inner.label
    }

    /// Number of local bindings.
    pub fn len(&self) -> usize {
        self.inner.bindings.borrow().len()
    }

    /// Whether there are no local bindings.
    pub fn is_empty(&self) -> bool {
        self.inner.bindings.borrow().is_empty()
    }

    /// Local keys in insertion order. Built-in functions are not local.
    pub fn keys(&self) -> Vec<Key> {
        self.inner.bindings.borrow().keys().cloned().collect()
    }

    /// Local binding values, unresolved, in insertion order.
    pub fn list_values(&self) -> Vec<Value> {
        self.inner.bindings.borrow().values().cloned().collect()
    }

    /// The local binding for `key`, unresolved.
    pub fn get_local(&self, key: &Key) -> Option<Value> {
        self.inner.bindings.borrow().get(key).cloned()
    }

    pub(crate) fn id(&self) -> usize {
        Rc::as_ptr(&self.inner) as usize
    }

    pub(crate) fn runtime(&self) -> Rc<Runtime> {
        self.inner.runtime.clone()
    }

    // ═══════════════════════════════════════════════════════════════════
    // Resolution
    // ═══════════════════════════════════════════════════════════════════

    /// Resolve `path`, falling back through the parent chain and then the
    /// built-in functions.
    ///
    /// A one-component hit is resolved here even when it was found in an
    /// ancestor, so bindings in this scope take part in what an inherited
    /// binding refers to. A hit inside a nested subscope is resolved in
    /// that subscope.
    pub fn resolved(&self, path: &[Key]) -> Result<Value> {
        let _guard = ResolutionGuard::enter(self, path)?;
        let mut current = Some(self.clone());
        while let Some(scope) = current {
            if let Some((owner, value)) = scope.find_local(path)? {
                return value.resolve(self.context_for(path, &owner));
            }
            current = scope.parent();
        }
        self.resolved_builtin(path)
    }

    /// Like [`Scope::resolved`], but a hit only reachable through the
    /// parent chain is a [`EvalError::ForeignScope`]. Built-ins are still found.
    pub fn resolved_strict(&self, path: &[Key]) -> Result<Value> {
        let _guard = ResolutionGuard::enter(self, path)?;
        if let Some((owner, value)) = self.find_local(path)? {
            return value.resolve(self.context_for(path, &owner));
        }
        let mut ancestor = self.parent();
        while let Some(scope) = ancestor {
            if scope.find_local(path)?.is_some() {
                return Err(EvalError::ForeignScope {
                    path: dotted(path),
                    scope: self.label().to_string(),
                });
            }
            ancestor = scope.parent();
        }
        self.resolved_builtin(path)
    }

    fn resolved_builtin(&self, path: &[Key]) -> Result<Value> {
        match self.inner.runtime.builtin(path) {
            Some(value) => value.resolve(self),
            None => Err(EvalError::not_found(path)),
        }
    }

    /// Resolve `path` to a scope; `None` on a miss or a non-scope result.
    pub fn resolved_scope_or_none(&self, path: &[Key]) -> Result<Option<Scope>> {
        match self.resolved(path) {
            Ok(Value::Scope(scope)) => Ok(Some(scope)),
            Ok(_) | Err(EvalError::NotFound { .. }) => Ok(None),
            Err(err) => Err(err),
        }
    }

    fn context_for<'a>(&'a self, path: &[Key], owner: &'a Scope) -> &'a Scope {
        if path.len() == 1 {
            self
        } else {
            owner
        }
    }

    /// Look `path` up in this scope only, descending through subscopes.
    ///
    /// Returns the scope holding the final binding and its raw value.
    fn find_local(&self, path: &[Key]) -> Result<Option<(Scope, Value)>> {
        let Some((first, rest)) = path.split_first() else {
            return Ok(None);
        };
        let Some(value) = self.get_local(first) else {
            return Ok(None);
        };
        if rest.is_empty() {
            return Ok(Some((self.clone(), value)));
        }
        let subscope = match value {
            Value::Scope(subscope) => subscope,
            other => match other.resolve(self)? {
                Value::Scope(subscope) => subscope,
                _ => return Ok(None),
            },
        };
        subscope.find_local(rest)
    }

    // ═══════════════════════════════════════════════════════════════════
    // Assignment
    // ═══════════════════════════════════════════════════════════════════

    /// Bind `value` at `path`, creating intermediate subscopes as needed.
    ///
    /// A component followed by an opaque key is created as a list.
    pub fn set(&self, path: &[Key], value: Value) -> Result<()> {
        let Some((last, init)) = path.split_last() else {
            return Err(EvalError::not_found(path));
        };
        let mut scope = self.clone();
        for (i, key) in init.iter().enumerate() {
            let is_list = path[i + 1].is_opaque();
            scope = scope.local_subscope(key, is_list)?;
        }
        scope.bind(last.clone(), value);
        Ok(())
    }

    /// The local subscope at `path`, created where missing.
    pub fn get_or_create_subscope(&self, path: &[Key]) -> Result<Scope> {
        let mut scope = self.clone();
        for key in path {
            scope = scope.local_subscope(key, false)?;
        }
        Ok(scope)
    }

    /// Bind `value` under a single local key, replacing any previous binding.
    pub fn bind(&self, key: Key, value: Value) {
        self.inner.bindings.borrow_mut().insert(key, value);
    }

    fn local_subscope(&self, key: &Key, is_list: bool) -> Result<Scope> {
        match self.get_local(key) {
            Some(Value::Scope(subscope)) => Ok(subscope),
            Some(other) => Err(EvalError::type_error("scope", &other)),
            None => {
                let subscope = self.child(format!("{}.{}", self.inner.label, key), is_list);
                self.bind(key.clone(), Value::Scope(subscope.clone()));
                Ok(subscope)
            }
        }
    }

    // ═══════════════════════════════════════════════════════════════════
    // Commands
    // ═══════════════════════════════════════════════════════════════════

    /// Execute one command entry.
    ///
    /// A first word `name:` opens a colon block: a registered block
    /// directive of that name receives the rest of the entry, otherwise the
    /// rest executes in subscope `name`. Any other entry goes to the first
    /// generic directive, in table order, whose word it contains.
    pub fn execute(&self, entry: &Entry) -> Result<()> {
        let words = entry.words();
        let Some(first) = words.first() else {
            return Ok(());
        };

        let block_name = first
            .as_str()
            .and_then(|word| word.strip_suffix(':'))
            .filter(|name| !name.is_empty());
        if let Some(name) = block_name {
            let rest = entry
                .split_at_word(0)
                .map(|(_, rest)| rest)
                .unwrap_or_default();
            if let Some(block) = self.inner.runtime.directives.block(name) {
                return block.invoke(&rest, self);
            }
            return self.get_or_create_subscope(&Key::dotted(name))?.execute(&rest);
        }

        for directive in self.inner.runtime.directives.generic() {
            let position = words
                .iter()
                .position(|word| word.as_str() == Some(directive.name.as_str()));
            if let Some((prefix, suffix)) = position.and_then(|i| entry.split_at_word(i)) {
                return directive.invoke(&prefix, &suffix, self);
            }
        }

        Err(EvalError::NoSuchDirective {
            entry: entry.without_boundary().unparse().trim().to_string(),
        })
    }

    /// Execute a document, line by line, through a non-interactive driver.
    pub fn load(&self, text: &str) -> std::result::Result<(), ReplError> {
        let mut repl = Repl::new(self.clone(), ReplConfig::default());
        for line in text.lines() {
            repl.feed(line)?;
        }
        repl.close()
    }

    /// Render a template into the stream bound at [`STREAM_KEY`], piece by
    /// piece as each is resolved.
    pub fn flush_template(&self, text: &str) -> Result<()> {
        let template = grammar::template(text)?;
        let stream = match self.resolved(&[Key::from(STREAM_KEY)])? {
            Value::Stream(stream) => stream,
            other => return Err(EvalError::type_error("stream", &other)),
        };
        template.resolve_monitored(self, &mut |piece| stream.flush(piece))?;
        Ok(())
    }

    /// Convert to plain data: lists become arrays, other scopes objects.
    ///
    /// Every binding is resolved in this scope first.
    pub fn unravel(&self) -> Result<serde_json::Value> {
        if self.is_list() {
            let items = self
                .keys()
                .into_iter()
                .map(|key| self.resolved(&[key])?.unravel())
                .collect::<Result<Vec<_>>>()?;
            return Ok(serde_json::Value::Array(items));
        }
        let mut object = serde_json::Map::new();
        for key in self.keys() {
            let value = self.resolved(std::slice::from_ref(&key))?.unravel()?;
            object.insert(key.to_string(), value);
        }
        Ok(serde_json::Value::Object(object))
    }
}

impl PartialEq for Scope {
    fn eq(&self, other: &Self) -> bool {
        if Rc::ptr_eq(&self.inner, &other.inner) {
            return true;
        }
        if self.is_list() != other.is_list() {
            return false;
        }
        let a = self.inner.bindings.borrow();
        let b = other.inner.bindings.borrow();
        if self.is_list() {
            a.len() == b.len() && a.values().eq(b.values())
        } else {
            *a == *b
        }
    }
}

impl fmt::Debug for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bindings = self.inner.bindings.borrow();
        if self.is_list() {
            f.debug_list().entries(bindings.values()).finish()
        } else {
            write!(f, "Scope({}) ", self.label())?;
            f.debug_map()
                .entries(bindings.iter().map(|(key, value)| (key.to_string(), value)))
                .finish()
        }
    }
}
