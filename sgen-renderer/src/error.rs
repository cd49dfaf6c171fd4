//! Error types for sgen-renderer.

use thiserror::Error;

/// All errors that can arise from rendering a record.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The template text failed to compile.
    #[error("invalid template {template:?}: {source}")]
    Template {
        template: String,
        #[source]
        source: tera::Error,
    },

    /// The compiled template failed on a particular record.
    #[error("rendering template {template:?}: {source}")]
    Render {
        template: String,
        #[source]
        source: tera::Error,
    },

    /// JSON serialization error (structural renderer, tera context).
    #[error("rendering json: {0}")]
    Json(#[from] serde_json::Error),
}
