//! Lenient scalar coercion for raw JSON request values.
//!
//! Clients send `is_late` as `0`, `"1"`, `true` and so on, and string
//! fields occasionally arrive as numbers. These helpers give every JSON
//! value a string form and a numeric form so the validator can compare
//! them loosely instead of by JSON type.
use serde_json::Value;

/// String form of a value. Absent and `null` values are empty.
pub fn text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => match n.as_f64() {
            Some(f) if n.is_f64() => render(f),
            _ => n.to_string(),
        },
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| text(Some(item)))
            .collect::<Vec<_>>()
            .join(","),
        Some(Value::Object(_)) => String::from("[object Object]"),
    }
}

/// Numeric form of a value, as used when comparing against a number.
///
/// `null` and absent values never compare equal to a number, so they map to
/// `None`, as does any string that is not numeric.
pub fn number(value: Option<&Value>) -> Option<f64> {
    match value {
        None | Some(Value::Null) | Some(Value::Object(_)) => None,
        Some(Value::Bool(b)) => Some(if *b { 1.0 } else { 0.0 }),
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => numeric(s),
        Some(array @ Value::Array(_)) => numeric(&text(Some(array))),
    }
}

/// Whether a value loosely equals the given number.
pub fn equals(value: Option<&Value>, target: f64) -> bool {
    number(value).is_some_and(|n| n == target)
}

/// JSON form of a coerced number. Integral values stay integers;
/// non-finite values have no JSON form.
pub fn figure(n: f64) -> Value {
    match n {
        n if !n.is_finite() => Value::Null,
        n if n.fract() == 0.0 && n.abs() < 9_007_199_254_740_992.0 => Value::from(n as i64),
        n => Value::from(n),
    }
}

fn numeric(s: &str) -> Option<f64> {
    let s = s.trim();
    if s.is_empty() {
        return Some(0.0);
    }
    let radix = |prefix: [&str; 2], radix: u32| {
        prefix
            .iter()
            .find_map(|p| s.strip_prefix(*p))
            .map(|digits| u64::from_str_radix(digits, radix).ok().map(|n| n as f64))
    };
    if let Some(parsed) = radix(["0x", "0X"], 16)
        .or_else(|| radix(["0o", "0O"], 8))
        .or_else(|| radix(["0b", "0B"], 2))
    {
        return parsed;
    }
    match s.trim_start_matches(['+', '-']) {
        "Infinity" => Some(if s.starts_with('-') {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        }),
        unsigned if unsigned.chars().all(|c| c.is_ascii_digit() || "eE.+-".contains(c)) => {
            s.parse().ok()
        }
        _ => None,
    }
}

fn render(f: f64) -> String {
    if f.fract() == 0.0 && f.abs() < 1e21 {
        format!("{}", f as i64)
    } else {
        f.to_string()
    }
}
