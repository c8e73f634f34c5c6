use std::collections::HashMap;
use std::fmt;

use itertools::Itertools;
use serde::Serialize;
use serde_json::Value as Json;

use crate::errors::Result;

/// Data handed to a render.
///
/// `Null` doubles as the absent sentinel: missing fields, missing map keys
/// and out-of-range indices all project to it.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Seq(Vec<Value>),
    /// Unordered mapping; iteration order is whatever `HashMap` yields.
    Map(HashMap<String, Value>),
    Record(Record),
}

/// A structured value with named fields in declaration order.
///
/// Only visible fields are stored, so everything that walks a record sees
/// exactly the fields a template may touch.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    name: String,
    fields: Vec<(String, Value)>,
}

impl Record {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Appends a field. Re-declaring a name replaces its value in place.
    pub fn field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name.into(), value.into());
        self
    }

    pub(crate) fn insert(&mut self, name: String, value: Value) {
        match self.fields.iter_mut().find(|(k, _)| *k == name) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((name, value)),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fields(&self) -> &[(String, Value)] {
        &self.fields
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.iter().find(|(k, _)| k == name).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Value {
    /// Builds a value from any serializable type.
    ///
    /// Structs become [`Record`]s at every depth, with fields in declaration
    /// order; fields marked `#[serde(skip)]` are not visible. Maps become
    /// unordered mappings.
    pub fn from_serialize<T: Serialize>(value: &T) -> Result<Value> {
        value.serialize(crate::ser::ValueSerializer)
    }

    /// Projects a single named field out of `self`.
    ///
    /// Mappings are keyed, records are looked up by field name and sequences
    /// accept a decimal index.
    pub fn field(&self, name: &str) -> Option<&Value> {
        match self {
            Value::Map(m) => m.get(name),
            Value::Record(r) => r.get(name),
            Value::Seq(items) => name.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        }
    }

    pub fn to_json(&self) -> Json {
        match self {
            Value::Null => Json::Null,
            Value::Bool(b) => Json::Bool(*b),
            Value::Int(i) => Json::from(*i),
            Value::Float(f) => serde_json::Number::from_f64(*f)
                .map(Json::Number)
                .unwrap_or(Json::Null),
            Value::Str(s) => Json::String(s.clone()),
            Value::Seq(items) => Json::Array(items.iter().map(Value::to_json).collect()),
            // Sorted so equal mappings always print the same.
            Value::Map(m) => Json::Object(
                m.iter()
                    .sorted_by_key(|(k, _)| *k)
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
            Value::Record(r) => Json::Object(
                r.fields()
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::coercion::str_value(self))
    }
}

impl From<Json> for Value {
    fn from(v: Json) -> Self {
        match v {
            Json::Null => Value::Null,
            Json::Bool(b) => Value::Bool(b),
            Json::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            Json::String(s) => Value::Str(s),
            Json::Array(a) => Value::Seq(a.into_iter().map(Value::from).collect()),
            Json::Object(o) => Value::Map(o.into_iter().map(|(k, v)| (k, Value::from(v))).collect()),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<usize> for Value {
    fn from(i: usize) -> Self {
        i64::try_from(i).map(Value::Int).unwrap_or(Value::Float(i as f64))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<Record> for Value {
    fn from(r: Record) -> Self {
        Value::Record(r)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::Seq(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Value {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Value::Map(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[derive(Serialize)]
    #[allow(non_snake_case)]
    struct Author {
        FirstName: String,
        #[serde(skip)]
        _secret: u8,
        LastName: String,
    }

    #[test]
    fn serializable_struct_becomes_ordered_record() {
        let v = Value::from_serialize(&Author {
            FirstName: "Alan".into(),
            _secret: 7,
            LastName: "Johnson".into(),
        })
        .unwrap();
        let Value::Record(r) = v else {
            panic!("expected a record");
        };
        assert_eq!(r.name(), "Author");
        let keys: Vec<&str> = r.fields().iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["FirstName", "LastName"]);
    }

    #[test]
    fn json_numbers_keep_integer_kind() {
        assert_eq!(Value::from(json!(1)), Value::Int(1));
        assert_eq!(Value::from(json!(1.5)), Value::Float(1.5));
    }

    #[test]
    fn field_projection() {
        let v = Value::from(json!({"a": {"b": [10, 20]}}));
        let b = v.field("a").and_then(|a| a.field("b")).unwrap();
        assert_eq!(b.field("1"), Some(&Value::Int(20)));
        assert_eq!(b.field("2"), None);
        assert_eq!(b.field("x"), None);
        assert_eq!(Value::Int(3).field("a"), None);
    }

    #[test]
    fn record_redeclared_field_keeps_position() {
        let r = Record::new("P").field("a", 1).field("b", 2).field("a", 3);
        assert_eq!(r.fields(), &[("a".to_string(), Value::Int(3)), ("b".to_string(), Value::Int(2))]);
    }
}
