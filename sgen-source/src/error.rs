//! Error types for sgen-source.

use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

/// Errors raised by a [`Supplier`](crate::Supplier) while building or fetching.
#[derive(Debug, Error)]
pub enum SupplyError {
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot determine encoding for file {path} because there is no extension")]
    NoExtension { path: PathBuf },

    #[error("unsupported file extension '{extension}' for {path}")]
    UnsupportedExtension { path: PathBuf, extension: String },

    #[error("decoding {path}: {source}")]
    DecodeJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("decoding {path}: {source}")]
    DecodeYaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("no command given")]
    EmptyCommand,

    #[error("failed to run '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("'{program}' exited with {status}: {stderr}")]
    CommandFailed {
        program: String,
        status: ExitStatus,
        stderr: String,
    },

    #[error("decoding output of '{program}': {source}")]
    DecodeOutput {
        program: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("fetch cancelled")]
    Cancelled,
}

/// Errors raised by [`Source`](crate::Source) and [`SourceCache`](crate::SourceCache).
#[derive(Debug, Error)]
pub enum SourceError {
    /// The supplier for a source could not be constructed.
    #[error("{source_name}: {source}")]
    Invalid {
        source_name: String,
        #[source]
        source: SupplyError,
    },

    /// A supplier fetch failed. The source cache is left untouched.
    #[error("fetching {source_name}: {source}")]
    Fetch {
        source_name: String,
        #[source]
        source: SupplyError,
    },

    /// No cached records exist for a cache-requiring source.
    #[error("no cached data for '{source_name}' at {path}")]
    NotCached { source_name: String, path: PathBuf },

    /// The cache file exists but does not decode.
    #[error("corrupt source cache at {path}: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// I/O failure on the cache tree, with annotated path.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Encoding records for the cache failed.
    #[error("source cache JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration problem detected while assembling a supplier.
    #[error(transparent)]
    Config(#[from] sgen_core::ConfigError),
}

impl SourceError {
    /// True when the error means "this source has never been synced".
    pub fn is_not_cached(&self) -> bool {
        matches!(self, SourceError::NotCached { .. })
    }

    /// Whether the fetch stopped because the cancel token fired.
    pub fn is_cancelled(&self) -> bool {
        matches!(
            self,
            SourceError::Fetch {
                source: SupplyError::Cancelled,
                ..
            }
        )
    }
}

/// Convenience constructor for [`SourceError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> SourceError {
    SourceError::Io {
        path: path.into(),
        source,
    }
}
