use itertools::Itertools;

use crate::value::Value;

/// Renders a value the way it appears in template output.
///
/// Sequences concatenate their elements; mappings and records fall back to
/// compact JSON. Mapping keys are sorted; record fields keep their order.
pub fn str_value(v: &Value) -> String {
    match v {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Int(i) => i.to_string(),
        Value::Float(f) => format_float(*f),
        Value::Str(s) => s.clone(),
        Value::Seq(items) => items.iter().map(str_value).join(""),
        Value::Map(_) | Value::Record(_) => serde_json::to_string(&v.to_json()).unwrap_or_default(),
    }
}

fn format_float(f: f64) -> String {
    if f.is_infinite() {
        return if f > 0.0 { "+Inf" } else { "-Inf" }.to_string();
    }
    // `{}` on f64 never uses an exponent and drops a trailing `.0`.
    format!("{f}")
}

/// Coerced equality: both sides are compared by their output text, so `1`
/// and `"1"` are equal.
pub fn loose_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Str(sa), Value::Str(sb)) => sa == sb,
        _ => str_value(a) == str_value(b),
    }
}
