//! Error types for sgen-sync.

use std::path::PathBuf;

use thiserror::Error;

use sgen_core::ConfigError;
use sgen_renderer::RenderError;
use sgen_source::SourceError;

/// All errors that can arise from generate and sync operations.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Configuration problem found while assembling sources.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A configured template failed to compile.
    #[error("{source_name}: template '{name}': {source}")]
    InvalidTemplate {
        source_name: String,
        name: String,
        #[source]
        source: RenderError,
    },

    /// An error from a source (fetch failure, source cache I/O).
    #[error(transparent)]
    Source(#[from] SourceError),

    /// Generate was asked for a cache-requiring source that was never synced.
    #[error(
        "generation requested for source '{source_name}' without cached data, re-run with --sync to load data"
    )]
    NeedsSync { source_name: String },

    /// A record failed to render. `record` is its JSON encoding.
    #[error("{source_name}: render failure with data {record}: {source}")]
    Render {
        source_name: String,
        record: String,
        #[source]
        source: RenderError,
    },

    /// An I/O error on the template cache, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The caller's cancellation token fired between sources.
    #[error("cancelled")]
    Cancelled,

    /// Writing to the caller's output failed.
    #[error("writing output: {0}")]
    Output(#[source] std::io::Error),
}

/// Convenience constructor for [`SyncError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> SyncError {
    SyncError::Io {
        path: path.into(),
        source,
    }
}
