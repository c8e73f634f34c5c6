use thiserror::Error;

/// Failures surfaced by the rendering engine.
///
/// The built-in helpers never produce one of these themselves; they only
/// forward what a nested body render reported.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("parse error: {0}")]
    Parse(String),

    #[error("unknown helper: {0}")]
    UnknownHelper(String),

    #[error("helper `{helper}` expects {expected} argument(s), got {got}")]
    Arity {
        helper: String,
        expected: String,
        got: usize,
    },

    #[error("invalid data: {0}")]
    Data(#[from] serde_json::Error),

    #[error("cannot convert data: {0}")]
    Convert(String),
}

impl serde::ser::Error for RenderError {
    fn custom<T: std::fmt::Display>(msg: T) -> Self {
        RenderError::Convert(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, RenderError>;
