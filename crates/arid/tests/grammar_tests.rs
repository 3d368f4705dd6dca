//! Grammar tests: the three configurations and unparse round-trips

use arid::grammar::{command, commands, expression, template, unparse, unparse_template};
use arid::*;
use pretty_assertions::assert_eq;

fn call(name: &str, groups: Vec<(Bracket, Vec<Value>)>) -> Value {
    Value::call(Call::new(
        name,
        groups
            .into_iter()
            .map(|(bracket, args)| ArgGroup::new(bracket, args))
            .collect(),
    ))
}

// ═══════════════════════════════════════════════════════════════════════
// Expression Grammar
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_expression_single_word_collapses() {
    assert_eq!(expression("x").unwrap(), Value::text("x"));
    assert_eq!(expression("-3").unwrap(), Value::int(-3));
    assert_eq!(expression(" false\n").unwrap(), Value::Boolean(false));
}

#[test]
fn test_expression_empty_is_empty_text() {
    assert_eq!(expression("").unwrap(), Value::text(""));
    assert_eq!(expression("   ").unwrap(), Value::text(""));
}

#[test]
fn test_expression_word_of_spans() {
    assert_eq!(
        expression("pre$x.y").unwrap(),
        Concat::smart(vec![
            Value::text("pre"),
            Value::call(Call::reference("x.y")),
        ])
    );
}

#[test]
fn test_call_groups_keep_blanks() {
    assert_eq!(
        expression("$f( a  b )").unwrap(),
        call(
            "f",
            vec![(
                Bracket::Round,
                vec![
                    Value::blank(" "),
                    Value::text("a"),
                    Value::blank("  "),
                    Value::text("b"),
                    Value::blank(" "),
                ]
            )]
        )
    );
}

#[test]
fn test_newlines_inside_brackets_are_blank() {
    assert_eq!(
        expression("$f(a\n  b)").unwrap(),
        call(
            "f",
            vec![(
                Bracket::Round,
                vec![Value::text("a"), Value::blank("\n  "), Value::text("b")]
            )]
        )
    );
}

#[test]
fn test_chained_name() {
    assert_eq!(
        expression("$a$b(x)").unwrap(),
        call("a$b", vec![(Bracket::Round, vec![Value::text("x")])])
    );
}

#[test]
fn test_empty_name_lookup() {
    assert_eq!(
        expression("$(a.b)").unwrap(),
        call("", vec![(Bracket::Round, vec![Value::text("a.b")])])
    );
}

#[test]
fn test_literal_forms() {
    assert_eq!(expression("$lit($x (y))").unwrap(), Value::text("$x (y)"));
    assert_eq!(expression("$'[a b]").unwrap(), Value::text("a b"));
    assert_eq!(expression("$'()").unwrap(), Value::text(""));
}

#[test]
fn test_strict_and_pass_templates() {
    assert_eq!(
        expression("$.(a b)").unwrap(),
        Concat::strict(vec![Value::text("a b")])
    );
    assert_eq!(expression("$pass(a b)").unwrap(), Value::text("a b"));
    assert_eq!(
        expression("$pass($x)").unwrap(),
        Value::call(Call::reference("x"))
    );
}

#[test]
fn test_template_text_is_not_detected() {
    assert_eq!(expression("$pass(5)").unwrap(), Value::text("5"));
}

#[test]
fn test_expression_errors() {
    for source in ["a\nb", "(", "a)", "$f(x", "$f[x)", "$lit(x", "$.(x"] {
        assert!(expression(source).is_err(), "{:?} should not parse", source);
    }
}

#[test]
fn test_error_offsets() {
    assert_eq!(command("a ) b").unwrap_err().offset, 2);
    assert_eq!(command("x = $f(a").unwrap_err().offset, 4);
}

// ═══════════════════════════════════════════════════════════════════════
// Template Grammar
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_template_keeps_everything() {
    assert_eq!(
        template("  f(x)\n  = $x ").unwrap(),
        Concat::strict(vec![
            Value::text("  f(x)\n  = "),
            Value::call(Call::reference("x")),
            Value::text(" "),
        ])
    );
}

#[test]
fn test_empty_template() {
    assert_eq!(template("").unwrap(), Concat::strict(vec![]));
}

#[test]
fn test_template_resolves_to_text() {
    let scope = Scope::standard();
    scope.load("n = 3").unwrap();
    let value = template("$n").unwrap().resolve(&scope).unwrap();
    assert_eq!(value, Value::text("3"));
}

// ═══════════════════════════════════════════════════════════════════════
// Command Grammar
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_command_nodes() {
    let entry = command("  x := $y\n").unwrap();
    assert_eq!(
        entry.nodes(),
        &[
            Value::blank("  "),
            Value::text("x"),
            Value::blank(" "),
            Value::text(":="),
            Value::blank(" "),
            Value::call(Call::reference("y")),
            Value::boundary("\n"),
        ]
    );
    assert_eq!(entry.indent(), "  ");
}

#[test]
fn test_boundary_and_indent_are_separate() {
    let entries = commands("a\n  b").unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].nodes().last(), Some(&Value::boundary("\n")));
    assert_eq!(entries[1].indent(), "  ");
}

#[test]
fn test_empty_entries_allowed() {
    let entries = commands("\n\n").unwrap();
    assert_eq!(entries.len(), 1);
    assert!(!entries[0].has_words());
}

#[test]
fn test_single_command_rejects_second_line() {
    assert!(command("a\nb").is_err());
    assert!(command("a\n   ").is_ok());
}

#[test]
fn test_custom_boundaries() {
    assert!(command("a\rb").is_err());
    let parser = Parser::new().with_boundaries("\n");
    let entry = parser.command("a\rb").unwrap();
    assert_eq!(entry.words().len(), 2);
}

// ═══════════════════════════════════════════════════════════════════════
// Round-trips
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_expression_round_trips() {
    let sources = [
        "plain",
        "42",
        "1.5e3",
        "true",
        "a   b",
        "$'(42)",
        "$'(true)",
        "$'( )",
        "$'(a b)",
        "$'[(]",
        "$'(a)$'(b)",
        "x$y.z",
        "$f",
        "$f()",
        "$f(a  $b  c)[d]",
        "$,(a)(b)(c)",
        "$(a b)",
        "$a$b$c(x)",
        "$.(x)",
        "$.()",
        "$.($x)",
        "$pass(a $b)",
        "$pass(a $b)c",
        "c$pass(a $b)",
        "1$'(x)",
        "$'(x)1",
        "$f(x)y z",
        "$",
        "a$",
        "$pass($a b)",
        "$pass($a)b",
        "$pass($a).b",
    ];
    for source in sources {
        let value = expression(source).unwrap();
        let rendered = unparse(&value);
        assert_eq!(
            expression(&rendered).unwrap(),
            value,
            "{:?} rendered as {:?}",
            source,
            rendered
        );
    }
}

#[test]
fn test_template_round_trips() {
    let sources = [
        "",
        "text only",
        "with (brackets] and\nnewlines",
        "$x$y",
        "a$'(b)",
        "$f(x y) after",
        "$.(nested $x)",
        "cost: $$price",
        "$pass[a ] b]",
        "$pass($x).y",
        "$pass($x)(y)",
        "$pass($f(a))[b]",
        "$x y",
    ];
    for source in sources {
        let value = template(source).unwrap();
        let rendered = unparse_template(&value);
        assert_eq!(
            template(&rendered).unwrap(),
            value,
            "{:?} rendered as {:?}",
            source,
            rendered
        );
    }
}

#[test]
fn test_command_unparse_is_verbatim() {
    for source in [
        "x = 1\n",
        "\t a.b  :=  $f( x )[y]  \n",
        "list * = $'(a b)",
        "block: k = v",
    ] {
        let entry = command(source).unwrap();
        assert_eq!(entry.unparse(), source);
        assert_eq!(command(&entry.unparse()).unwrap(), entry);
    }
}
