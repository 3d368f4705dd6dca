//! Display and Debug implementations for Value

use std::fmt;

use super::*;

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Int(n) => write!(f, "{}", n),
            // Debug keeps the fraction on whole floats: `2.0`, not `2`
            Number::Float(n) => write!(f, "{:?}", n),
        }
    }
}

impl Value {
    /// Render this node back to source text.
    ///
    /// Parsing the result with the grammar that produced the node yields an
    /// equal node. Host objects have no source form and render as a
    /// descriptive placeholder.
    pub fn unparse(&self) -> String {
        crate::grammar::unparse(self)
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(s) => write!(f, "Text({:?})", s.as_ref()),
            Value::Number(n) => write!(f, "Number({})", n),
            Value::Boolean(b) => write!(f, "Boolean({})", b),
            Value::Binary(b) => write!(f, "Binary({:?})", b.as_ref()),
            Value::Scalar(h) => write!(f, "{:?}", h),
            Value::Blank(s) => write!(f, "Blank({:?})", s.as_ref()),
            Value::Boundary(s) => write!(f, "Boundary({:?})", s.as_ref()),

            Value::Concat(c) => {
                write!(f, "Concat[")?;
                for (i, part) in c.parts.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{:?}", part)?;
                }
                write!(f, "]")
            }

            Value::Call(c) => {
                write!(f, "Call(${}", c.name)?;
                for group in &c.groups {
                    write!(f, "{}", group.bracket.open())?;
                    let args = group.args.iter().filter(|a| !a.is_ignorable());
                    for (i, arg) in args.enumerate() {
                        if i > 0 {
                            write!(f, ", ")?;
                        }
                        write!(f, "{:?}", arg)?;
                    }
                    write!(f, "{}", group.bracket.close())?;
                }
                write!(f, ")")
            }

            Value::Function(func) => write!(f, "{:?}", func),
            Value::Stream(s) => write!(f, "{:?}", s),
            Value::Directive(d) => write!(f, "{:?}", d),
            Value::Scope(s) => write!(f, "{:?}", s),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.unparse())
    }
}
