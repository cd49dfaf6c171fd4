//! # sgen-renderer
//!
//! Turns one [`Record`] into one output line.
//!
//! Two implementations ship with sgen:
//!
//! - [`JsonRenderer`] — structural encoder, used when a source configures no
//!   `default` template.
//! - [`TemplateRenderer`] — tera template whose identity is its literal text.
//!
//! ## Usage
//!
//! ```rust
//! use sgen_core::Record;
//! use sgen_renderer::{Renderer, TemplateRenderer};
//!
//! let renderer = TemplateRenderer::new("- {{ name }}").unwrap();
//! let mut record = Record::new();
//! record.insert("name".into(), "bob".into());
//! assert_eq!(renderer.render(&record).unwrap(), "- bob");
//! ```

pub mod engine;
pub mod error;
pub mod json;

use sgen_core::Record;

pub use engine::TemplateRenderer;
pub use error::RenderError;
pub use json::{JsonRenderer, JSON_RENDERER_ID};

/// Converts a record into a single output line.
///
/// Rendered output is cached under [`id`](Renderer::id), so two renderers
/// reporting the same id must produce byte-identical lines for the same record.
pub trait Renderer: Send + Sync {
    /// Stable identity string.
    fn id(&self) -> &str;

    /// Render one record. The returned line carries no trailing newline.
    fn render(&self, record: &Record) -> Result<String, RenderError>;
}
