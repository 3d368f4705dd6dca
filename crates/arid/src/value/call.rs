//! Deferred nodes: concatenations and calls

use super::Value;

/// Bracket pair delimiting a call's argument group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bracket {
    /// `( … )`
    Round,
    /// `[ … ]`
    Square,
}

impl Bracket {
    /// Bracket opened by `c`, if any.
    pub fn from_open(c: char) -> Option<Self> {
        match c {
            '(' => Some(Bracket::Round),
            '[' => Some(Bracket::Square),
            _ => None,
        }
    }

    /// Opening character
    pub fn open(self) -> char {
        match self {
            Bracket::Round => '(',
            Bracket::Square => '[',
        }
    }

    /// Closing character
    pub fn close(self) -> char {
        match self {
            Bracket::Round => ')',
            Bracket::Square => ']',
        }
    }
}

/// One bracketed argument list of a call.
///
/// `args` keeps the `Blank` separators so the group renders back exactly.
#[derive(Debug, Clone, PartialEq)]
pub struct ArgGroup {
    /// Which brackets delimit the group
    pub bracket: Bracket,

    /// Arguments interleaved with whitespace
    pub args: Vec<Value>,
}

impl ArgGroup {
    /// Create an argument group.
    pub fn new(bracket: Bracket, args: Vec<Value>) -> Self {
        Self { bracket, args }
    }
}

/// A `$name(...)` call or bare `$name` reference.
///
/// `name` may chain several segments with `$`: `$a$b(x)` applies `b` to
/// `x` and `a` to the result.
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    /// Name segments joined by `$`
    pub name: String,

    /// Bracket groups, in source order; empty for a bare reference
    pub groups: Vec<ArgGroup>,
}

impl Call {
    /// Create a call with argument groups.
    pub fn new(name: impl Into<String>, groups: Vec<ArgGroup>) -> Self {
        Self {
            name: name.into(),
            groups,
        }
    }

    /// Create a bare `$name` reference.
    pub fn reference(name: impl Into<String>) -> Self {
        Self::new(name, Vec::new())
    }

    /// Whether this is a bare reference with no brackets.
    pub fn is_reference(&self) -> bool {
        self.groups.is_empty()
    }

    /// Non-ignorable arguments across all groups, in order.
    pub fn args(&self) -> impl Iterator<Item = &Value> {
        self.groups
            .iter()
            .flat_map(|group| group.args.iter())
            .filter(|arg| !arg.is_ignorable())
    }
}

/// Parts joined into one text on resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct Concat {
    /// Parts in order; ignorable parts are skipped on resolution
    pub parts: Vec<Value>,
}

impl Concat {
    /// Concatenate, collapsing to the part itself when only one part counts.
    ///
    /// With no non-ignorable part at all the result is empty text.
    pub fn smart(parts: Vec<Value>) -> Value {
        let mut significant = parts.iter().filter(|part| !part.is_ignorable());
        match (significant.next(), significant.next()) {
            (None, _) => Value::text(""),
            (Some(only), None) => only.clone(),
            _ => Value::Concat(std::rc::Rc::new(Concat { parts })),
        }
    }

    /// Concatenate without collapsing, so the result always resolves to text.
    pub fn strict(parts: Vec<Value>) -> Value {
        Value::Concat(std::rc::Rc::new(Concat { parts }))
    }
}
