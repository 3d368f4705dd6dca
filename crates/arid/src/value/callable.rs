//! Host-facing value types: native functions, directive markers, streams and opaque scalars

use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::io::Write;
use std::rc::Rc;

use super::Value;
use crate::entry::Entry;
use crate::error::{EvalError, Result};
use crate::scope::Scope;

/// Type alias for native function pointers.
pub type NativeFn = Rc<dyn Fn(&Scope, &[Value]) -> Result<Value>>;

/// How a native function receives its arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgMode {
    /// Arguments are resolved in the calling scope before the call
    Resolved,

    /// Arguments are passed as parsed nodes; the function resolves them
    Unresolved,
}

/// A native function callable as `$name(...)`.
#[derive(Clone)]
pub struct FunctionValue {
    /// Function name (for display/debugging)
    pub name: String,

    /// Fixed arity, or `None` for variadic
    pub arity: Option<usize>,

    /// Whether the core resolves arguments before calling
    pub mode: ArgMode,

    /// The function pointer
    pub func: NativeFn,
}

impl FunctionValue {
    /// Create a variadic function receiving resolved arguments.
    pub fn new(
        name: impl Into<String>,
        func: impl Fn(&Scope, &[Value]) -> Result<Value> + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            arity: None,
            mode: ArgMode::Resolved,
            func: Rc::new(func),
        }
    }

    /// Create a variadic function receiving unresolved argument nodes.
    pub fn lazy(
        name: impl Into<String>,
        func: impl Fn(&Scope, &[Value]) -> Result<Value> + 'static,
    ) -> Self {
        Self {
            mode: ArgMode::Unresolved,
            ..Self::new(name, func)
        }
    }

    /// Fix the number of arguments this function accepts.
    pub fn with_arity(mut self, arity: usize) -> Self {
        self.arity = Some(arity);
        self
    }

    /// Apply the function to non-ignorable argument nodes.
    pub fn call(&self, scope: &Scope, args: &[Value]) -> Result<Value> {
        if let Some(expected) = self.arity {
            if args.len() != expected {
                return Err(EvalError::Arity {
                    name: self.name.clone(),
                    expected,
                    got: args.len(),
                });
            }
        }
        match self.mode {
            ArgMode::Unresolved => (self.func)(scope, args),
            ArgMode::Resolved => {
                let resolved = args
                    .iter()
                    .map(|arg| arg.resolve(scope))
                    .collect::<Result<Vec<_>>>()?;
                (self.func)(scope, &resolved)
            }
        }
    }
}

impl fmt::Debug for FunctionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Function({})", self.name)
    }
}

/// Handler type for generic directives: `(prefix, suffix, scope)`.
pub type DirectiveFn = Rc<dyn Fn(&Entry, &Entry, &Scope) -> Result<()>>;

/// A named directive handler.
///
/// Directives are looked up by [`Scope::execute`]; this type is also the
/// payload of [`Value::Directive`] so handlers can be bound like any other
/// value.
#[derive(Clone)]
pub struct Directive {
    /// The word that triggers the directive
    pub name: String,

    /// The handler
    pub func: DirectiveFn,
}

impl Directive {
    /// Create a directive.
    pub fn new(
        name: impl Into<String>,
        func: impl Fn(&Entry, &Entry, &Scope) -> Result<()> + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            func: Rc::new(func),
        }
    }

    /// Invoke the handler.
    pub fn invoke(&self, prefix: &Entry, suffix: &Entry, scope: &Scope) -> Result<()> {
        (self.func)(prefix, suffix, scope)
    }
}

impl fmt::Debug for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Directive({})", self.name)
    }
}

/// A writable sink.
///
/// The sink itself belongs to whoever installed the stream; the core only
/// ever writes text into it.
#[derive(Clone)]
pub struct Stream {
    sink: Rc<RefCell<dyn Write>>,
}

impl Stream {
    /// Wrap a sink the stream will own.
    pub fn new(sink: impl Write + 'static) -> Self {
        Self {
            sink: Rc::new(RefCell::new(sink)),
        }
    }

    /// Wrap a sink shared with the caller.
    pub fn shared(sink: Rc<RefCell<dyn Write>>) -> Self {
        Self { sink }
    }

    /// Write `text` to the sink.
    pub fn flush(&self, text: &str) -> Result<()> {
        let mut sink = self.sink.borrow_mut();
        sink.write_all(text.as_bytes())?;
        sink.flush()?;
        Ok(())
    }

    pub(crate) fn same(&self, other: &Stream) -> bool {
        Rc::ptr_eq(&self.sink, &other.sink)
    }
}

impl fmt::Debug for Stream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Stream(<sink>)")
    }
}

/// An opaque host value carried through resolution untouched.
#[derive(Clone)]
pub struct HostValue(Rc<dyn Any>);

impl HostValue {
    /// Wrap a host value.
    pub fn new<T: Any>(value: T) -> Self {
        Self(Rc::new(value))
    }

    /// Borrow the wrapped value if it has type `T`.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.downcast_ref()
    }

    pub(crate) fn same(&self, other: &HostValue) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for HostValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Scalar(<host>)")
    }
}
