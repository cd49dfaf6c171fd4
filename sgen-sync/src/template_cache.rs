//! Template cache — content-addressed store of fully rendered output.
//!
//! One blob per `(source, renderer identity)` at
//! `<cache_root>/templates/by-source/<source>/<sha256(identity)>/out`.
//! Every source owns one directory so `sync` can drop all of its entries at
//! once.
//!
//! Writers go through [`CacheSink`]: bytes land in a sibling `.tmp` file that
//! only becomes `out` on [`CacheSink::commit`]. A render that fails half-way
//! therefore never leaves a readable entry behind, and `get` only ever sees
//! complete output.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use sgen_core::{paths, SourceName};

use crate::error::{io_err, SyncError};

const ENTRY_FILE: &str = "out";

/// SHA-256 hex digest of a renderer identity. Unsalted and stable across runs.
pub fn renderer_key(renderer_id: &str) -> String {
    let mut h = Sha256::new();
    h.update(renderer_id.as_bytes());
    hex::encode(h.finalize())
}

/// Filesystem-backed rendered-output cache.
#[derive(Debug, Clone)]
pub struct TemplateCache {
    dir: PathBuf,
}

impl TemplateCache {
    /// Cache rooted at `cache_root` (the sgen cache root, not the subdirectory).
    pub fn new(cache_root: &Path) -> Self {
        TemplateCache {
            dir: paths::template_cache_dir(cache_root),
        }
    }

    /// `<dir>/<source>/` — pure, no I/O.
    pub fn source_dir(&self, source: &SourceName) -> PathBuf {
        self.dir.join(&source.0)
    }

    /// `<dir>/<source>/<sha256>/out` — pure, no I/O.
    pub fn entry_path(&self, source: &SourceName, renderer_id: &str) -> PathBuf {
        self.source_dir(source)
            .join(renderer_key(renderer_id))
            .join(ENTRY_FILE)
    }

    /// Delete every entry for `source`. Missing directories are fine.
    pub fn clear(&self, source: &SourceName) -> Result<(), SyncError> {
        let dir = self.source_dir(source);
        match std::fs::remove_dir_all(&dir) {
            Ok(()) => {
                tracing::debug!("cleared template cache for '{}'", source);
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_err(dir, e)),
        }
    }

    /// Stored bytes for `(source, renderer_id)`, or `None` on a miss.
    pub fn get(&self, source: &SourceName, renderer_id: &str) -> Result<Option<Vec<u8>>, SyncError> {
        let path = self.entry_path(source, renderer_id);
        match std::fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_err(path, e)),
        }
    }

    /// Start writing the entry for `(source, renderer_id)`, creating parent
    /// directories as needed. Nothing is visible to [`get`](Self::get) until
    /// the returned sink is committed.
    pub fn open(&self, source: &SourceName, renderer_id: &str) -> Result<CacheSink, SyncError> {
        let path = self.entry_path(source, renderer_id);
        let Some(dir) = path.parent() else {
            return Err(io_err(
                path,
                std::io::Error::other("invalid template cache path"),
            ));
        };
        std::fs::create_dir_all(dir).map_err(|e| io_err(dir, e))?;

        let tmp = dir.join(format!("{ENTRY_FILE}.{}.tmp", std::process::id()));
        let file = File::create(&tmp).map_err(|e| io_err(&tmp, e))?;
        Ok(CacheSink {
            writer: Some(BufWriter::new(file)),
            tmp,
            path,
        })
    }
}

/// Pending cache entry. Dropping it without [`commit`](Self::commit) discards
/// everything written so far.
#[derive(Debug)]
pub struct CacheSink {
    writer: Option<BufWriter<File>>,
    tmp: PathBuf,
    path: PathBuf,
}

impl CacheSink {
    /// Final location of the entry.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Flush and atomically publish the entry.
    pub fn commit(mut self) -> Result<(), SyncError> {
        if let Some(writer) = self.writer.take() {
            let file = writer
                .into_inner()
                .map_err(|e| io_err(&self.tmp, e.into_error()))?;
            file.sync_all().map_err(|e| io_err(&self.tmp, e))?;
        }
        std::fs::rename(&self.tmp, &self.path).map_err(|e| io_err(&self.path, e))?;
        tracing::debug!("wrote: {}", self.path.display());
        Ok(())
    }
}

impl Write for CacheSink {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        match self.writer.as_mut() {
            Some(w) => w.write(buf),
            None => Err(std::io::Error::other("cache sink already committed")),
        }
    }

    fn flush(&mut self) -> std::io::Result<()> {
        match self.writer.as_mut() {
            Some(w) => w.flush(),
            None => Ok(()),
        }
    }
}

impl Drop for CacheSink {
    fn drop(&mut self) {
        // Close the handle before unlinking.
        drop(self.writer.take());
        match std::fs::remove_file(&self.tmp) {
            Ok(()) => tracing::debug!("discarded partial entry: {}", self.tmp.display()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!("could not remove {}: {e}", self.tmp.display()),
        }
    }
}
