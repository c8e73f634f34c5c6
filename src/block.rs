use crate::errors::Result;
use crate::sink::DiagnosticSink;
use crate::value::Value;

/// Per-iteration metadata pushed by `each` for the duration of one body
/// render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub length: usize,
    pub index: usize,
    /// String key for mappings and records, `None` for sequences.
    pub key: Option<String>,
}

impl Frame {
    pub fn new(length: usize, index: usize, key: Option<&str>) -> Self {
        Self {
            length,
            index,
            key: key.map(str::to_string),
        }
    }

    pub fn first(&self) -> bool {
        self.index == 0
    }

    pub fn last(&self) -> bool {
        self.index + 1 == self.length
    }

    /// Looks up a data variable (`@index`, `@key`, ...) by its bare name.
    pub fn data(&self, name: &str) -> Value {
        match name {
            "index" => Value::from(self.index),
            "key" => Value::from(self.key.clone()),
            "first" => Value::Bool(self.first()),
            "last" => Value::Bool(self.last()),
            "length" => Value::from(self.length),
            _ => Value::Null,
        }
    }
}

/// Text that the output stage must not escape.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SafeString(pub String);

impl From<String> for SafeString {
    fn from(s: String) -> Self {
        SafeString(s)
    }
}

/// What a helper hands back to the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Output {
    Text(String),
    Safe(SafeString),
}

impl Output {
    pub fn as_str(&self) -> &str {
        match self {
            Output::Text(s) | Output::Safe(SafeString(s)) => s,
        }
    }

    pub fn into_string(self) -> String {
        match self {
            Output::Text(s) | Output::Safe(SafeString(s)) => s,
        }
    }
}

impl From<String> for Output {
    fn from(s: String) -> Self {
        Output::Text(s)
    }
}

impl From<SafeString> for Output {
    fn from(s: SafeString) -> Self {
        Output::Safe(s)
    }
}

/// Execution handle the engine gives a helper for one directive invocation.
///
/// Render calls never alter [`BlockHandle::current_context`]: a replaced
/// context or a pushed frame is only visible inside the call that received
/// it.
pub trait BlockHandle {
    /// Main body against the current context.
    fn render_primary(&mut self) -> Result<String>;

    /// `else` body against the current context; empty when none was declared.
    fn render_inverse(&mut self) -> Result<String>;

    /// Main body against `ctx`.
    fn render_primary_with(&mut self, ctx: &Value) -> Result<String>;

    /// Main body against `ctx` with `frame` visible to data lookups.
    fn render_primary_iterated(&mut self, ctx: &Value, frame: &Frame) -> Result<String>;

    fn current_context(&self) -> &Value;

    /// Projects one named field out of `obj`, absent when missing.
    fn resolve_field(&self, obj: &Value, name: &str) -> Value {
        obj.field(name).cloned().unwrap_or_default()
    }

    /// Whether a numeric zero counts as truthy for `if`/`unless`.
    fn include_zero(&self) -> bool {
        false
    }

    fn diagnostics(&self) -> &dyn DiagnosticSink;
}
