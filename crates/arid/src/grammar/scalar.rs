//! Leaf-type detection for bare scalar runs

use crate::value::Value;

/// Signature of a leaf detector: classify a whitespace-, bracket- and
/// `$`-free run of source text.
pub type LeafDetector = fn(&str) -> Value;

/// Default leaf detector.
///
/// `true`/`false` become booleans, optionally signed digit runs become
/// integers, decimals (with a fraction or exponent) become floats, and
/// everything else is text.
pub fn detect_scalar(run: &str) -> Value {
    match run {
        "true" => return Value::Boolean(true),
        "false" => return Value::Boolean(false),
        _ => {}
    }
    if looks_integral(run) {
        if let Ok(n) = run.parse::<i64>() {
            return Value::int(n);
        }
    }
    if looks_decimal(run) {
        if let Ok(n) = run.parse::<f64>() {
            if n.is_finite() {
                return Value::float(n);
            }
        }
    }
    Value::text(run)
}

fn looks_integral(run: &str) -> bool {
    let digits = run.strip_prefix(['+', '-']).unwrap_or(run);
    !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
}

fn looks_decimal(run: &str) -> bool {
    let body = run.strip_prefix(['+', '-']).unwrap_or(run);
    body.chars().next().is_some_and(|c| c.is_ascii_digit() || c == '.')
        && body.chars().any(|c| c.is_ascii_digit())
        && body
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-'))
}
