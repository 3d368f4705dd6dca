//! Rendering nodes back to source text
//!
//! Parsing the rendering of a parsed node with the grammar that produced
//! it yields an equal node. Text is written raw wherever the grammar would
//! read it back unchanged and as a `$'(…)` literal everywhere else.

use super::engine::is_bracket;
use super::scalar::detect_scalar;
use crate::value::{Bracket, Call, Concat, Value};

/// Where a node is being rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Context {
    /// Top level of an expression, where whitespace between words is text
    Phrase,
    /// Inside a word or a call argument
    Word,
}

/// Render a node as expression source.
pub fn unparse(value: &Value) -> String {
    let mut out = String::new();
    render(value, Context::Phrase, None, None, &mut out);
    out
}

/// Render a node as template source.
pub fn unparse_template(value: &Value) -> String {
    let mut out = String::new();
    match value {
        Value::Concat(concat) => render_template(&concat.parts, None, &mut out),
        other => render_template(std::slice::from_ref(other), None, &mut out),
    }
    out
}

/// Render the nodes of a command entry.
pub(crate) fn unparse_nodes(nodes: &[Value]) -> String {
    let mut out = String::new();
    render_seq(nodes, Context::Word, &mut out);
    out
}

fn render_seq(nodes: &[Value], ctx: Context, out: &mut String) {
    let mut pending = None;
    for (i, node) in nodes.iter().enumerate() {
        let prev = i.checked_sub(1).and_then(|j| nodes.get(j));
        let ctx = if matches!(node, Value::Concat(_)) {
            Context::Word
        } else {
            ctx
        };
        let start = out.len();
        render(node, ctx, prev, nodes.get(i + 1), out);
        seal_call(pending.take(), start, out);
        pending = open_call(node, start);
    }
}

fn render(
    value: &Value,
    ctx: Context,
    prev: Option<&Value>,
    next: Option<&Value>,
    out: &mut String,
) {
    match value {
        Value::Text(s) => render_text(s, ctx, prev, next, out),
        Value::Number(n) => out.push_str(&n.to_string()),
        Value::Boolean(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Blank(s) | Value::Boundary(s) => out.push_str(s),
        Value::Concat(concat) => render_concat(concat, ctx, prev, next, out),
        Value::Call(call) => render_call(call, out),
        Value::Scope(scope) if scope.is_list() => {
            let mut args = Vec::new();
            for (i, item) in scope.list_values().into_iter().enumerate() {
                if i > 0 {
                    args.push(Value::blank(" "));
                }
                args.push(item);
            }
            out.push_str("$,(");
            render_seq(&args, Context::Word, out);
            out.push(')');
        }
        Value::Binary(bytes) => {
            render_literal(&format!("<binary {} bytes>", bytes.len()), out)
        }
        Value::Scalar(_) => render_literal("<scalar>", out),
        Value::Function(function) => {
            render_literal(&format!("<function {}>", function.name), out)
        }
        Value::Stream(_) => render_literal("<stream>", out),
        Value::Directive(directive) => {
            render_literal(&format!("<directive {}>", directive.name), out)
        }
        Value::Scope(scope) => render_literal(&format!("<scope {}>", scope.label()), out),
    }
}

fn render_text(
    s: &str,
    ctx: Context,
    prev: Option<&Value>,
    next: Option<&Value>,
    out: &mut String,
) {
    let raw = if is_spacing_text(s) {
        ctx == Context::Phrase
            && prev.is_some_and(is_solid)
            && next.is_some_and(is_solid)
            && !s.contains(['\n', '\r'])
    } else {
        is_plain(s) && !prev.is_some_and(ends_word) && !next.is_some_and(starts_word)
    };
    if raw {
        out.push_str(s);
    } else {
        render_literal(s, out);
    }
}

fn render_concat(
    concat: &Concat,
    ctx: Context,
    prev: Option<&Value>,
    next: Option<&Value>,
    out: &mut String,
) {
    let parts = &concat.parts;
    if parts.len() <= 1 {
        // Only the strict form keeps a lone part from collapsing
        out.push_str("$.(");
        render_template(parts, Some(Bracket::Round), out);
        out.push(')');
    } else if prev.map_or(true, is_spacing) && next.map_or(true, is_spacing) {
        render_seq(parts, ctx, out);
    } else {
        out.push_str("$pass(");
        render_template(parts, Some(Bracket::Round), out);
        out.push(')');
    }
}

fn render_call(call: &Call, out: &mut String) {
    out.push('$');
    out.push_str(&call.name);
    for group in &call.groups {
        out.push(group.bracket.open());
        render_seq(&group.args, Context::Word, out);
        out.push(group.bracket.close());
    }
}

/// A call rendered at `start` that the next node's text could extend.
fn open_call(node: &Value, start: usize) -> Option<(usize, bool)> {
    match node {
        Value::Call(call) => Some((start, call.is_reference())),
        _ => None,
    }
}

/// Wrap the call rendered at `out[at..end]` in `$pass(…)` when the text
/// after it would otherwise read as more of its name or another bracket
/// group.
fn seal_call(call: Option<(usize, bool)>, end: usize, out: &mut String) {
    let Some((at, bare)) = call else {
        return;
    };
    let glued = out[end..].starts_with(|c: char| {
        if bare {
            !c.is_whitespace()
        } else {
            is_bracket(c)
        }
    });
    if glued {
        out.insert(end, ')');
        out.insert_str(at, "$pass(");
    }
}

/// Template parts up to an optional closing bracket.
fn render_template(parts: &[Value], close: Option<Bracket>, out: &mut String) {
    let mut pending = None;
    for (i, part) in parts.iter().enumerate() {
        let start = out.len();
        let after_text = i
            .checked_sub(1)
            .and_then(|j| parts.get(j))
            .is_some_and(Value::is_text);
        match part {
            Value::Text(s) => {
                let raw = !s.is_empty()
                    && !s.contains('$')
                    && !after_text
                    && close.map_or(true, |bracket| balanced(s, bracket));
                if raw {
                    out.push_str(s);
                } else {
                    render_literal(s, out);
                }
            }
            Value::Concat(inner) => {
                out.push_str("$.(");
                render_template(&inner.parts, Some(Bracket::Round), out);
                out.push(')');
            }
            Value::Call(call) => render_call(call, out),
            other => render(other, Context::Word, None, None, out),
        }
        seal_call(pending.take(), start, out);
        pending = open_call(part, start);
    }
}

/// `$'(…)`, or `$'[…]` when the text does not balance in parentheses.
fn render_literal(s: &str, out: &mut String) {
    let bracket = if balanced(s, Bracket::Round) || !balanced(s, Bracket::Square) {
        Bracket::Round
    } else {
        Bracket::Square
    };
    out.push_str("$'");
    out.push(bracket.open());
    out.push_str(s);
    out.push(bracket.close());
}

fn balanced(s: &str, bracket: Bracket) -> bool {
    let mut depth = 0usize;
    for c in s.chars() {
        if c == bracket.open() {
            depth += 1;
        } else if c == bracket.close() {
            match depth.checked_sub(1) {
                Some(d) => depth = d,
                None => return false,
            }
        }
    }
    depth == 0
}

/// Text the scalar production reads back as the same text.
fn is_plain(s: &str) -> bool {
    !s.is_empty()
        && !s.chars().any(|c| c.is_whitespace() || is_bracket(c) || c == '$')
        && detect_scalar(s).is_text()
}

fn is_spacing_text(s: &str) -> bool {
    !s.is_empty() && s.chars().all(char::is_whitespace)
}

fn is_spacing(value: &Value) -> bool {
    match value {
        Value::Text(s) => is_spacing_text(s),
        other => other.is_ignorable(),
    }
}

fn is_solid(value: &Value) -> bool {
    !is_spacing(value)
}

fn starts_word(value: &Value) -> bool {
    match value {
        Value::Text(s) => !s.is_empty() && !is_spacing_text(s),
        Value::Number(_) | Value::Boolean(_) => true,
        _ => false,
    }
}

fn ends_word(value: &Value) -> bool {
    match value {
        Value::Call(call) => call.is_reference(),
        other => starts_word(other),
    }
}
