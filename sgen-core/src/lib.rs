//! sgen core library — shared types, configuration, paths, errors.
//!
//! - [`types`] — [`Record`], [`SourceName`]
//! - [`config`] — YAML source configuration
//! - [`paths`] — config file and cache root resolution
//! - [`cancel`] — [`CancelToken`]
//! - [`error`] — [`ConfigError`]

pub mod cancel;
pub mod config;
pub mod error;
pub mod paths;
pub mod types;

pub use cancel::CancelToken;
pub use config::{Config, FileConfig, SourceConfig};
pub use error::ConfigError;
pub use types::{Record, SourceName, DEFAULT_RENDERER};
