//! Standard prelude with built-in functions

use super::{Key, Scope};
use crate::directive::DirectiveTable;
use crate::error::{EvalError, Result};
use crate::value::{FunctionValue, Value};

impl Scope {
    /// Create a root scope with the standard built-in functions.
    pub fn with_prelude(directives: DirectiveTable) -> Self {
        let scope = Self::root(directives);
        scope.load_prelude();
        scope
    }

    /// Install the standard prelude for every scope of this tree.
    ///
    /// Built-ins sit behind the whole scope chain: any binding of the same
    /// name shadows them, and they never appear among a scope's own keys.
    pub fn load_prelude(&self) {
        // List building
        self.define_builtin(FunctionValue::new(",", builtin_list));

        // Fallback
        self.define_builtin(FunctionValue::lazy("or", builtin_or));

        // Child scopes
        self.define_builtin(FunctionValue::new("fork", builtin_fork).with_arity(0));
    }

    /// Bind a native function under its own name in this scope.
    pub fn define_function(&self, function: FunctionValue) {
        self.bind(Key::from(function.name.as_str()), Value::Function(function));
    }

    /// Install a native function behind the scope chain of this tree.
    pub fn define_builtin(&self, function: FunctionValue) {
        self.runtime()
            .install(Key::from(function.name.as_str()), Value::Function(function));
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Built-in Function Implementations
// ═══════════════════════════════════════════════════════════════════════

fn builtin_list(scope: &Scope, args: &[Value]) -> Result<Value> {
    let list = scope.create_child(true);
    for arg in args {
        list.bind(Key::gensym(), arg.clone());
    }
    Ok(Value::Scope(list))
}

fn builtin_or(scope: &Scope, args: &[Value]) -> Result<Value> {
    let mut last = EvalError::Arity {
        name: "or".to_string(),
        expected: 1,
        got: 0,
    };
    for arg in args {
        match arg.resolve(scope) {
            Ok(value) => return Ok(value),
            Err(err) if err.is_recoverable() => last = err,
            Err(err) => return Err(err),
        }
    }
    Err(last)
}

fn builtin_fork(scope: &Scope, _args: &[Value]) -> Result<Value> {
    Ok(Value::Scope(scope.create_child(false)))
}
