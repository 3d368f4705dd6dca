//! Resolution and conversions: resolve, cat, totext, truth, unravel

use super::*;
use crate::error::{type_name, EvalError, Result};
use crate::scope::Key;

impl Value {
    /// Resolve this node in `scope`.
    ///
    /// Leaves resolve to themselves. A `Concat` resolves to `Text`; a `Call`
    /// resolves to whatever its function (or referenced binding) yields.
    pub fn resolve(&self, scope: &Scope) -> Result<Value> {
        match self {
            Value::Concat(concat) => concat.resolve(scope, &mut |_| Ok(())),
            Value::Call(call) => call.resolve(scope),
            other => Ok(other.clone()),
        }
    }

    /// Resolve, passing each textual piece to `monitor` as it is produced.
    ///
    /// Used to flush template output incrementally. Non-concatenation
    /// values are resolved whole and must have a textual form.
    pub fn resolve_monitored(
        &self,
        scope: &Scope,
        monitor: &mut dyn FnMut(&str) -> Result<()>,
    ) -> Result<Value> {
        match self {
            Value::Concat(concat) => concat.resolve(scope, monitor),
            other => {
                let value = other.resolve(scope)?;
                monitor(&value.cat()?)?;
                Ok(value)
            }
        }
    }

    /// Textual form of a resolved value.
    pub fn cat(&self) -> Result<String> {
        match self {
            Value::Text(s) => Ok(s.to_string()),
            Value::Number(n) => Ok(n.to_string()),
            Value::Boolean(b) => Ok(b.to_string()),
            Value::Blank(s) | Value::Boundary(s) => Ok(s.to_string()),
            other => Err(EvalError::NotConcatenable {
                kind: type_name(other),
            }),
        }
    }

    /// Convert to a `Text` value.
    pub fn totext(&self) -> Result<Value> {
        match self {
            Value::Text(_) => Ok(self.clone()),
            other => Ok(Value::text(other.cat()?)),
        }
    }

    /// Truth of a boolean value.
    pub fn truth(&self) -> Result<bool> {
        match self {
            Value::Boolean(b) => Ok(*b),
            other => Err(EvalError::type_error("boolean", other)),
        }
    }

    /// Convert a resolved value into plain data.
    ///
    /// Lists become arrays and named scopes become objects; their bindings
    /// are resolved on the way.
    pub fn unravel(&self) -> Result<serde_json::Value> {
        use serde_json::Value as Json;

        match self {
            Value::Text(s) | Value::Blank(s) | Value::Boundary(s) => Ok(Json::from(s.as_ref())),
            Value::Number(Number::Int(n)) => Ok(Json::from(*n)),
            Value::Number(Number::Float(n)) => serde_json::Number::from_f64(*n)
                .map(Json::Number)
                .ok_or_else(|| EvalError::type_error("finite number", self)),
            Value::Boolean(b) => Ok(Json::Bool(*b)),
            Value::Binary(bytes) => Ok(Json::from(bytes.as_slice())),
            Value::Scope(scope) => scope.unravel(),
            other => Err(EvalError::type_error("data", other)),
        }
    }
}

impl Concat {
    pub(crate) fn resolve(
        &self,
        scope: &Scope,
        monitor: &mut dyn FnMut(&str) -> Result<()>,
    ) -> Result<Value> {
        let mut text = String::new();
        for part in self.parts.iter().filter(|part| !part.is_ignorable()) {
            let piece = part.resolve(scope)?.cat()?;
            monitor(&piece)?;
            text.push_str(&piece);
        }
        Ok(Value::text(text))
    }
}

impl Call {
    pub(crate) fn resolve(&self, scope: &Scope) -> Result<Value> {
        // Innermost segment first: `$a$b(x)` is `a(b(x))`.
        let mut segments = self.name.rsplit('$');
        let innermost = segments.next().unwrap_or_default();

        let mut value = if self.is_reference() {
            let path = Key::dotted(innermost);
            if path.is_empty() {
                return Err(EvalError::not_found(&[innermost]));
            }
            scope.resolved(&path)?
        } else {
            let args: Vec<Value> = self.args().cloned().collect();
            apply(innermost, scope, &args)?
        };

        for segment in segments {
            value = apply(segment, scope, &[value])?;
        }
        Ok(value)
    }
}

/// Apply the function named by `segment`; the empty name is path lookup.
fn apply(segment: &str, scope: &Scope, args: &[Value]) -> Result<Value> {
    if segment.is_empty() {
        return lookup(scope, args);
    }
    match scope.resolved(&Key::dotted(segment))? {
        Value::Function(function) => function.call(scope, args),
        other => Err(EvalError::type_error("function", &other)),
    }
}

/// `$(a.b)` and `$(a b)`: resolve the arguments and look up the path they spell.
fn lookup(scope: &Scope, args: &[Value]) -> Result<Value> {
    let mut path = Vec::new();
    for arg in args {
        path.extend(Key::dotted(&arg.resolve(scope)?.cat()?));
    }
    if path.is_empty() {
        return Err(EvalError::not_found::<&str>(&[]));
    }
    scope.resolved(&path)
}
