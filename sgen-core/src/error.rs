//! Error types for sgen-core.

use std::path::PathBuf;

use thiserror::Error;

/// Configuration errors. All of them are fatal and reported before any fetch
/// or render work starts.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Underlying I/O failure while reading the config file.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The config file did not exist at the expected path.
    #[error("config not found at {path}")]
    NotFound { path: PathBuf },

    /// YAML parse error — includes file path and line context from serde_yaml.
    #[error("failed to parse config at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// Two source blocks share a name.
    #[error("source '{name}' is defined more than once")]
    DuplicateSource { name: String },

    /// Source names double as cache file and directory names.
    #[error("invalid source name '{name}': must be non-empty and contain no path separators")]
    InvalidSourceName { name: String },

    /// A source name was requested that the config does not define.
    #[error("source '{name}' not configured")]
    UnknownSource { name: String },

    /// The `type` tag of a source does not match any known supplier.
    #[error("{source_name}: invalid source type '{kind}', valid types are [{}]", .valid.join(","))]
    UnknownSupplierType {
        source_name: String,
        kind: String,
        valid: Vec<&'static str>,
    },

    /// A supplier-specific parameter is missing from the source block.
    #[error("{source_name}: {kind} sources must define {parameter}")]
    MissingParameter {
        source_name: String,
        kind: &'static str,
        parameter: &'static str,
    },

    /// `dirs::home_dir()` returned `None` — cannot locate `~/.config/sgen/`.
    #[error("cannot determine home directory; set $HOME or SGEN_CONFIG_DIR")]
    HomeNotFound,

    /// `dirs::cache_dir()` returned `None` and `SGEN_CACHE_DIR` is unset.
    #[error("cannot determine cache directory; set SGEN_CACHE_DIR")]
    CacheDirNotFound,
}

/// Convenience constructor for [`ConfigError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> ConfigError {
    ConfigError::Io {
        path: path.into(),
        source,
    }
}
