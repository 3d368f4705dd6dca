//! Value resolution tests

use std::cell::RefCell;
use std::io::Write;
use std::rc::Rc;

use arid::*;
use pretty_assertions::assert_eq;

fn eval(scope: &Scope, source: &str) -> Result<Value> {
    grammar::expression(source)?.resolve(scope)
}

// ═══════════════════════════════════════════════════════════════════════
// Leaves and Concatenation
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_leaves_resolve_to_themselves() {
    let scope = Scope::standard();
    for value in [
        Value::text("a"),
        Value::int(1),
        Value::float(0.5),
        Value::Boolean(true),
        Value::bytes(vec![0, 1]),
        Value::blank(" "),
    ] {
        assert_eq!(value.resolve(&scope).unwrap(), value);
    }
}

#[test]
fn test_concat_resolves_to_text() {
    let scope = Scope::standard();
    let value = Concat::strict(vec![
        Value::int(1),
        Value::blank("  "),
        Value::text("-"),
        Value::Boolean(false),
    ]);
    assert_eq!(value.resolve(&scope).unwrap(), Value::text("1-false"));
}

#[test]
fn test_phrase_keeps_spacing() {
    let scope = Scope::standard();
    assert_eq!(eval(&scope, "  a   b ").unwrap(), Value::text("a   b"));
}

#[test]
fn test_singleton_keeps_kind() {
    let scope = Scope::standard();
    assert_eq!(eval(&scope, "12").unwrap(), Value::int(12));
    assert_eq!(eval(&scope, "$.(12)").unwrap(), Value::text("12"));
}

#[test]
fn test_concat_of_scope_fails() {
    let scope = Scope::standard();
    let err = eval(&scope, "x$fork()").unwrap_err();
    assert!(matches!(err, EvalError::NotConcatenable { kind: "scope" }));
}

// ═══════════════════════════════════════════════════════════════════════
// Calls
// ═══════════════════════════════════════════════════════════════════════

fn with_text_functions() -> Scope {
    let scope = Scope::standard();
    scope.define_function(FunctionValue::new("wrap", |_, args| {
        Ok(Value::text(format!("[{}]", args[0].cat()?)))
    }));
    scope.define_function(
        FunctionValue::new("len", |_, args| {
            Ok(Value::int(args[0].cat()?.chars().count() as i64))
        })
        .with_arity(1),
    );
    scope
}

#[test]
fn test_chained_segments_apply_innermost_first() {
    let scope = with_text_functions();
    assert_eq!(eval(&scope, "$len$wrap(ab)").unwrap(), Value::int(4));
    assert_eq!(eval(&scope, "$wrap$len(ab)").unwrap(), Value::text("[2]"));
}

#[test]
fn test_call_with_square_brackets() {
    let scope = with_text_functions();
    assert!(matches!(eval(&scope, "$wrap[a(b]").unwrap_err(), EvalError::Parse(_)));
    assert_eq!(eval(&scope, "$wrap[$'[a(b]]").unwrap(), Value::text("[a(b]"));
}

#[test]
fn test_argument_groups_append() {
    let scope = Scope::standard();
    let list = eval(&scope, "$,(a b)[c]").unwrap();
    assert_eq!(
        list.as_scope().unwrap().list_values(),
        vec![Value::text("a"), Value::text("b"), Value::text("c")]
    );
}

#[test]
fn test_arguments_resolve_in_calling_scope() {
    let scope = with_text_functions();
    scope.load("x = inner").unwrap();
    assert_eq!(eval(&scope, "$wrap($x)").unwrap(), Value::text("[inner]"));
}

#[test]
fn test_unresolved_mode_receives_nodes() {
    let scope = Scope::standard();
    scope.define_function(FunctionValue::lazy("quote", |_, args| {
        Ok(Value::text(args[0].unparse()))
    }));
    assert_eq!(eval(&scope, "$quote($missing)").unwrap(), Value::text("$missing"));
}

#[test]
fn test_arity_error() {
    let scope = with_text_functions();
    let err = eval(&scope, "$len(a b)").unwrap_err();
    assert!(matches!(
        err,
        EvalError::Arity { name, expected: 1, got: 2 } if name == "len"
    ));
}

#[test]
fn test_calling_a_non_function() {
    let scope = Scope::standard();
    scope.load("x = 1").unwrap();
    let err = eval(&scope, "$x(a)").unwrap_err();
    assert!(matches!(err, EvalError::TypeError { expected: "function", got: "number" }));
}

#[test]
fn test_unknown_function() {
    let scope = Scope::standard();
    let err = eval(&scope, "$nope(a)").unwrap_err();
    assert!(matches!(err, EvalError::NotFound { path } if path == "nope"));
}

#[test]
fn test_lookup_function() {
    let scope = Scope::standard();
    scope.load("a.b = deep\nkey = b").unwrap();
    assert_eq!(eval(&scope, "$(a.b)").unwrap(), Value::text("deep"));
    assert_eq!(eval(&scope, "$(a $key)").unwrap(), Value::text("deep"));
}

#[test]
fn test_host_function_error() {
    let scope = Scope::standard();
    scope.define_function(FunctionValue::new("fail", |_, _| {
        Err(anyhow::anyhow!("backend unavailable").into())
    }));
    let err = eval(&scope, "$fail()").unwrap_err();
    assert!(matches!(err, EvalError::Host(_)));
}

// ═══════════════════════════════════════════════════════════════════════
// Conversions
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_cat_of_float_keeps_fraction() {
    assert_eq!(Value::float(3.0).cat().unwrap(), "3.0");
    assert_eq!(Value::float(-0.25).cat().unwrap(), "-0.25");
}

#[test]
fn test_totext_and_truth() {
    assert_eq!(Value::Boolean(true).totext().unwrap(), Value::text("true"));
    assert!(!Value::Boolean(false).truth().unwrap());
    let err = Value::int(1).truth().unwrap_err();
    assert!(matches!(err, EvalError::TypeError { expected: "boolean", got: "number" }));
}

#[test]
fn test_unravel_nested() {
    let scope = Scope::standard();
    scope
        .load("server.host = localhost\nserver.port = 8080\nserver.tags = $,(web edge)")
        .unwrap();
    let server = eval(&scope, "$server").unwrap();
    assert_eq!(
        server.unravel().unwrap(),
        serde_json::json!({
            "host": "localhost",
            "port": 8080,
            "tags": ["web", "edge"],
        })
    );
}

#[test]
fn test_unravel_rejects_functions() {
    let scope = Scope::standard();
    let function = eval(&scope, "$fork").unwrap();
    assert!(function.unravel().is_err());
}

// ═══════════════════════════════════════════════════════════════════════
// Equality
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_number_kinds_differ() {
    assert_ne!(Value::int(2), Value::float(2.0));
    assert_ne!(Value::text("2"), Value::int(2));
}

#[test]
fn test_host_scalars_compare_by_identity() {
    let a = Value::scalar(5u8);
    let b = Value::scalar(5u8);
    assert_eq!(a, a.clone());
    assert_ne!(a, b);
    match &a {
        Value::Scalar(host) => assert_eq!(host.downcast_ref::<u8>(), Some(&5)),
        other => panic!("expected scalar, got {:?}", other),
    }
}

#[test]
fn test_lists_compare_by_content() {
    let scope = Scope::standard();
    let a = eval(&scope, "$,(x y)").unwrap();
    let b = eval(&scope, "$,(x)(y)").unwrap();
    let c = eval(&scope, "$,(y x)").unwrap();
    assert_eq!(a, b);
    assert_ne!(a, c);
}

// ═══════════════════════════════════════════════════════════════════════
// Monitored Resolution
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_monitor_sees_each_piece() {
    let scope = Scope::standard();
    scope.load("x = mid").unwrap();
    let template = grammar::template("a $x b").unwrap();
    let mut pieces = Vec::new();
    let value = template
        .resolve_monitored(&scope, &mut |piece| {
            pieces.push(piece.to_string());
            Ok(())
        })
        .unwrap();
    assert_eq!(pieces, vec!["a ", "mid", " b"]);
    assert_eq!(value, Value::text("a mid b"));
}

#[test]
fn test_stream_writes_to_shared_sink() {
    let buffer = Rc::new(RefCell::new(Vec::<u8>::new()));
    let sink: Rc<RefCell<dyn Write>> = buffer.clone();
    let stream = Stream::shared(sink);
    stream.flush("one ").unwrap();
    stream.flush("two").unwrap();
    assert_eq!(String::from_utf8(buffer.borrow().clone()).unwrap(), "one two");
}
