//! Value representation: every parsed node and every resolution result

mod call;
mod callable;
mod display;
mod impls;
mod resolve;

pub use call::{ArgGroup, Bracket, Call, Concat};
pub use callable::{ArgMode, Directive, DirectiveFn, FunctionValue, HostValue, NativeFn, Stream};

use std::rc::Rc;

use crate::scope::Scope;

/// A number literal.
///
/// Integers and decimals are kept apart so that `2` and `2.0` render back
/// the way they were written.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    /// Whole number
    Int(i64),
    /// Decimal number
    Float(f64),
}

/// Node and value representation for arid.
///
/// There is no separate AST: a parsed node is a `Value`, and resolving a
/// node against a [`Scope`] yields another `Value`. Variants fall into
/// three groups:
/// - Leaves, which resolve to themselves
/// - Ignorable whitespace markers kept so entries can be re-rendered verbatim
/// - Deferred nodes (`Concat`, `Call`) that do the work on `resolve`
#[derive(Clone)]
pub enum Value {
    // ═══════════════════════════════════════════════════════════════════
    // Leaves
    // ═══════════════════════════════════════════════════════════════════
    /// Text
    Text(Rc<str>),

    /// Integer or decimal
    Number(Number),

    /// `true` or `false`
    Boolean(bool),

    /// Raw bytes
    Binary(Rc<Vec<u8>>),

    /// Opaque value owned by the host program
    Scalar(HostValue),

    // ═══════════════════════════════════════════════════════════════════
    // Ignorable whitespace
    // ═══════════════════════════════════════════════════════════════════
    /// Insignificant whitespace between words
    Blank(Rc<str>),

    /// Whitespace that ends an entry (line ends, for the command grammar)
    Boundary(Rc<str>),

    // ═══════════════════════════════════════════════════════════════════
    // Deferred
    // ═══════════════════════════════════════════════════════════════════
    /// Parts joined as text on resolution
    Concat(Rc<Concat>),

    /// `$name(args)` or a bare `$name` reference
    Call(Rc<Call>),

    // ═══════════════════════════════════════════════════════════════════
    // Host-facing objects
    // ═══════════════════════════════════════════════════════════════════
    /// Native function
    Function(FunctionValue),

    /// Writable sink used by template output
    Stream(Stream),

    /// Directive handler bound as a value
    Directive(Directive),

    /// Namespace or list
    Scope(Scope),
}
