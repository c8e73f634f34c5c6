use serde::Deserialize;

/// Engine-wide rendering knobs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RenderConfig {
    /// Treat a numeric zero condition as truthy in `if` / `unless`.
    /// A block can also opt in on its own with `includeZero=true`.
    pub include_zero: bool,
}

impl RenderConfig {
    pub fn from_json(s: &str) -> crate::errors::Result<Self> {
        Ok(serde_json::from_str(s)?)
    }
}
