//! Control-flow and iteration helpers for Handlebars-style templates.
//!
//! The helpers (`if`, `unless`, `with`, `each`, `equal`, `lookup`, `log`)
//! only talk to the surrounding engine through [`block::BlockHandle`]. A
//! small reference [`Engine`] is included to drive them from template text.
//!
//! ```
//! use block_helpers::{render, Value};
//!
//! let data: Value = [("foo", "bar")].into_iter().collect();
//! let out = render(r#"{{#equal foo "bar"}}M{{/equal}}"#, &data).unwrap();
//! assert_eq!(out, "M");
//! ```

pub mod errors;
pub mod config;
pub mod value;
pub mod truth;
pub mod coercion;
pub mod container;
pub mod block;
pub mod sink;
pub mod helpers;
pub mod engine;
mod parser;
mod template;
mod render;
mod ser;

pub use block::{BlockHandle, Frame, Output, SafeString};
pub use coercion::{loose_eq, str_value};
pub use config::RenderConfig;
pub use engine::{render, render_or_empty, Engine};
pub use errors::{RenderError, Result};
pub use helpers::{Helper, Registry};
pub use template::Template;
pub use truth::is_truthy;
pub use value::{Record, Value};
