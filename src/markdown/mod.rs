//! Markdown front and back end.
//!
//! - [`convert`] - Markdown → token stream via `pulldown-cmark`
//! - [`render`] - token stream → HTML

pub mod convert;
pub mod render;

pub use convert::tokenize;
pub use render::render;
