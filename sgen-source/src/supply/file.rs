//! `file` supplier: a JSON or YAML array of records on local disk.

use std::path::{Path, PathBuf};

use sgen_core::{CancelToken, Record};

use crate::error::SupplyError;
use crate::Supplier;

/// Reads records from a `.json`, `.yaml` or `.yml` file.
///
/// Never cached: reading the file again costs the same as reading a cached
/// copy of it.
#[derive(Debug, Clone)]
pub struct FileSupplier {
    path: PathBuf,
}

impl FileSupplier {
    /// Fails with [`SupplyError::FileNotFound`] if `path` does not exist.
    pub fn new(path: impl Into<PathBuf>) -> Result<Self, SupplyError> {
        let path = path.into();
        if !path.exists() {
            return Err(SupplyError::FileNotFound { path });
        }
        Ok(FileSupplier { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Supplier for FileSupplier {
    fn should_cache(&self) -> bool {
        false
    }

    fn supply(&self, cancel: &CancelToken) -> Result<Vec<Record>, SupplyError> {
        if cancel.is_cancelled() {
            return Err(SupplyError::Cancelled);
        }
        let path = self.path.as_path();
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            return Err(SupplyError::NoExtension {
                path: path.to_path_buf(),
            });
        };
        let contents = std::fs::read(path).map_err(|source| SupplyError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let records: Vec<Record> = match ext {
            "json" => serde_json::from_slice(&contents).map_err(|source| {
                SupplyError::DecodeJson {
                    path: path.to_path_buf(),
                    source,
                }
            })?,
            "yml" | "yaml" => serde_yaml::from_slice(&contents).map_err(|source| {
                SupplyError::DecodeYaml {
                    path: path.to_path_buf(),
                    source,
                }
            })?,
            other => {
                return Err(SupplyError::UnsupportedExtension {
                    path: path.to_path_buf(),
                    extension: other.to_string(),
                })
            }
        };
        tracing::debug!("read {} records from {}", records.len(), path.display());
        Ok(records)
    }
}
