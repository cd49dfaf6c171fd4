//! Source cache — the last successfully fetched records of each source.
//!
//! Persists one JSON array per source at
//! `<cache_root>/sources/by-name/<source>.json`. Presence of the file means the
//! source has been synced at least once. Writes use the `.tmp` + rename
//! pattern, so a crash mid-store never leaves a half-written array behind.

use std::path::{Path, PathBuf};

use sgen_core::{paths, Record, SourceName};

use crate::error::{io_err, SourceError};

/// Filesystem-backed store of fetched records, keyed by source name.
#[derive(Debug, Clone)]
pub struct SourceCache {
    dir: PathBuf,
}

impl SourceCache {
    /// Cache rooted at `cache_root` (the sgen cache root, not the subdirectory).
    pub fn new(cache_root: &Path) -> Self {
        SourceCache {
            dir: paths::source_cache_dir(cache_root),
        }
    }

    /// `<dir>/<name>.json` — pure, no I/O.
    pub fn path_for(&self, name: &SourceName) -> PathBuf {
        self.dir.join(format!("{}.json", name.0))
    }

    /// Persist `records` for `name`, replacing whatever was there.
    pub fn store(&self, name: &SourceName, records: &[Record]) -> Result<(), SourceError> {
        std::fs::create_dir_all(&self.dir).map_err(|e| io_err(&self.dir, e))?;

        let path = self.path_for(name);
        let tmp = path.with_extension("json.tmp");
        let json = serde_json::to_vec(records)?;
        std::fs::write(&tmp, json).map_err(|e| io_err(&tmp, e))?;
        if let Err(e) = std::fs::rename(&tmp, &path) {
            let _ = std::fs::remove_file(&tmp);
            return Err(io_err(&path, e));
        }
        tracing::debug!("stored {} records for '{}'", records.len(), name);
        Ok(())
    }

    /// Read back the records stored for `name`.
    ///
    /// Returns `SourceError::NotCached` if nothing was ever stored and
    /// `SourceError::Corrupt` if the file does not decode.
    pub fn load(&self, name: &SourceName) -> Result<Vec<Record>, SourceError> {
        let path = self.path_for(name);
        let contents = match std::fs::read(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(SourceError::NotCached {
                    source_name: name.0.clone(),
                    path,
                })
            }
            Err(e) => return Err(io_err(&path, e)),
        };
        serde_json::from_slice(&contents).map_err(|source| SourceError::Corrupt { path, source })
    }
}
