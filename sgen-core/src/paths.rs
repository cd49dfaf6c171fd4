//! Config and cache location resolution.
//!
//! # Layout
//!
//! ```text
//! $SGEN_CONFIG_DIR/config.yaml        (else ~/.config/sgen/config.yaml)
//! $SGEN_CACHE_DIR/                    (else <os cache dir>/sgen)
//!   sources/by-name/<source>.json
//!   templates/by-source/<source>/<sha256>/out
//! ```
//!
//! The binary resolves both roots once and hands concrete paths to every cache
//! component. The `_from` forms take the environment values explicitly so tests
//! never consult the real process environment.

use std::path::{Path, PathBuf};

use crate::error::ConfigError;

pub const CONFIG_DIR_ENV: &str = "SGEN_CONFIG_DIR";
pub const CACHE_DIR_ENV: &str = "SGEN_CACHE_DIR";
pub const CONFIG_FILE: &str = "config.yaml";

/// `<config_dir>/config.yaml`, where `config_dir` is `override_dir` if set,
/// else `<home>/.config/sgen`.
pub fn config_file_from(
    override_dir: Option<PathBuf>,
    home: Option<PathBuf>,
) -> Result<PathBuf, ConfigError> {
    let dir = match override_dir {
        Some(dir) => dir,
        None => home.ok_or(ConfigError::HomeNotFound)?.join(".config").join("sgen"),
    };
    Ok(dir.join(CONFIG_FILE))
}

/// Config file path (convenience — reads `SGEN_CONFIG_DIR` and `dirs::home_dir()`).
pub fn config_file() -> Result<PathBuf, ConfigError> {
    config_file_from(env_path(CONFIG_DIR_ENV), dirs::home_dir())
}

/// Cache root: `override_dir` if set, else `<os_cache_dir>/sgen`.
pub fn cache_root_from(
    override_dir: Option<PathBuf>,
    os_cache_dir: Option<PathBuf>,
) -> Result<PathBuf, ConfigError> {
    match override_dir {
        Some(dir) => Ok(dir),
        None => Ok(os_cache_dir.ok_or(ConfigError::CacheDirNotFound)?.join("sgen")),
    }
}

/// Cache root (convenience — reads `SGEN_CACHE_DIR` and `dirs::cache_dir()`).
pub fn cache_root() -> Result<PathBuf, ConfigError> {
    cache_root_from(env_path(CACHE_DIR_ENV), dirs::cache_dir())
}

/// `<root>/sources/by-name`
pub fn source_cache_dir(root: &Path) -> PathBuf {
    root.join("sources").join("by-name")
}

/// `<root>/templates/by-source`
pub fn template_cache_dir(root: &Path) -> PathBuf {
    root.join("templates").join("by-source")
}

fn env_path(key: &str) -> Option<PathBuf> {
    std::env::var_os(key)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}
