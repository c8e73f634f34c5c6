use crate::value::Value;

/// Canonical truthiness used by every branching helper.
///
/// Falsy: absent, `false`, numeric zero, the empty string, and empty
/// sequences, mappings and records. A record with at least one visible field
/// is truthy whatever its field values are.
pub fn is_truthy(v: &Value) -> bool {
    match v {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Int(i) => *i != 0,
        Value::Float(f) => *f != 0.0,
        Value::Str(s) => !s.is_empty(),
        Value::Seq(items) => !items.is_empty(),
        Value::Map(m) => !m.is_empty(),
        Value::Record(r) => !r.is_empty(),
    }
}

/// True for a numeric zero; drives the `includeZero` opt-in of `if`/`unless`.
pub fn is_zero(v: &Value) -> bool {
    match v {
        Value::Int(i) => *i == 0,
        Value::Float(f) => *f == 0.0,
        _ => false,
    }
}
