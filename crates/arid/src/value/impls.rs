//! Value trait implementations: constructors, predicates, extractors, From traits, PartialEq

use std::rc::Rc;

use super::*;

// ═══════════════════════════════════════════════════════════════════
// Convenience Constructors
// ═══════════════════════════════════════════════════════════════════

impl Value {
    /// Create a text value
    pub fn text(s: impl AsRef<str>) -> Self {
        Value::Text(Rc::from(s.as_ref()))
    }

    /// Create an integer value
    pub fn int(n: i64) -> Self {
        Value::Number(Number::Int(n))
    }

    /// Create a decimal value
    pub fn float(n: f64) -> Self {
        Value::Number(Number::Float(n))
    }

    /// Create a binary value
    pub fn bytes(b: impl Into<Vec<u8>>) -> Self {
        Value::Binary(Rc::new(b.into()))
    }

    /// Wrap an opaque host value
    pub fn scalar<T: std::any::Any>(value: T) -> Self {
        Value::Scalar(HostValue::new(value))
    }

    /// Create an ignorable blank
    pub fn blank(s: impl AsRef<str>) -> Self {
        Value::Blank(Rc::from(s.as_ref()))
    }

    /// Create an ignorable boundary
    pub fn boundary(s: impl AsRef<str>) -> Self {
        Value::Boundary(Rc::from(s.as_ref()))
    }

    /// Create a call node
    pub fn call(call: Call) -> Self {
        Value::Call(Rc::new(call))
    }

    // ═══════════════════════════════════════════════════════════════════
    // Type Predicates
    // ═══════════════════════════════════════════════════════════════════

    /// Whether this node is whitespace the grammar kept for rendering only
    pub fn is_ignorable(&self) -> bool {
        matches!(self, Value::Blank(_) | Value::Boundary(_))
    }

    /// Whether this node marks the end of an entry
    pub fn is_boundary(&self) -> bool {
        matches!(self, Value::Boundary(_))
    }

    /// Whether this is a text value
    pub fn is_text(&self) -> bool {
        matches!(self, Value::Text(_))
    }

    /// Whether this value is a scope or list
    pub fn is_scope(&self) -> bool {
        matches!(self, Value::Scope(_))
    }

    /// Whether resolving this node may do work
    pub fn is_deferred(&self) -> bool {
        matches!(self, Value::Concat(_) | Value::Call(_))
    }

    // ═══════════════════════════════════════════════════════════════════
    // Extractors (return Option for safe access)
    // ═══════════════════════════════════════════════════════════════════

    /// Extract text slice
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Extract an integer
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Number(Number::Int(n)) => Some(*n),
            _ => None,
        }
    }

    /// Extract a number as f64 (integers convert)
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(Number::Int(n)) => Some(*n as f64),
            Value::Number(Number::Float(n)) => Some(*n),
            _ => None,
        }
    }

    /// Extract a boolean
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Extract a scope handle
    pub fn as_scope(&self) -> Option<&Scope> {
        match self {
            Value::Scope(scope) => Some(scope),
            _ => None,
        }
    }

    /// Extract a function
    pub fn as_function(&self) -> Option<&FunctionValue> {
        match self {
            Value::Function(function) => Some(function),
            _ => None,
        }
    }

    /// Extract a stream
    pub fn as_stream(&self) -> Option<&Stream> {
        match self {
            Value::Stream(stream) => Some(stream),
            _ => None,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════
// PartialEq Implementation
// ═══════════════════════════════════════════════════════════════════

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Text(a), Value::Text(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Binary(a), Value::Binary(b)) => a == b,
            (Value::Blank(a), Value::Blank(b)) => a == b,
            (Value::Boundary(a), Value::Boundary(b)) => a == b,

            // Deferred nodes compare by structure
            (Value::Concat(a), Value::Concat(b)) => a == b,
            (Value::Call(a), Value::Call(b)) => a == b,

            // Host objects have no structure to compare
            (Value::Scalar(a), Value::Scalar(b)) => a.same(b),
            (Value::Function(a), Value::Function(b)) => {
                a.name == b.name && Rc::ptr_eq(&a.func, &b.func)
            }
            (Value::Stream(a), Value::Stream(b)) => a.same(b),
            (Value::Directive(a), Value::Directive(b)) => {
                a.name == b.name && Rc::ptr_eq(&a.func, &b.func)
            }

            (Value::Scope(a), Value::Scope(b)) => a == b,

            // Different variants are never equal
            _ => false,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════
// From Trait Implementations
// ═══════════════════════════════════════════════════════════════════

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::int(n)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::float(n)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::text(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::text(s)
    }
}

impl From<Vec<u8>> for Value {
    fn from(b: Vec<u8>) -> Self {
        Value::bytes(b)
    }
}

impl From<Call> for Value {
    fn from(call: Call) -> Self {
        Value::call(call)
    }
}

impl From<FunctionValue> for Value {
    fn from(function: FunctionValue) -> Self {
        Value::Function(function)
    }
}

impl From<Directive> for Value {
    fn from(directive: Directive) -> Self {
        Value::Directive(directive)
    }
}

impl From<Stream> for Value {
    fn from(stream: Stream) -> Self {
        Value::Stream(stream)
    }
}

impl From<Scope> for Value {
    fn from(scope: Scope) -> Self {
        Value::Scope(scope)
    }
}
