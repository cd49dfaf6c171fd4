//! [`Source`] — a named origin bound to a supplier and its renderers.
//!
//! | Supplier caches? | `load`                         | `sync`                           |
//! |------------------|--------------------------------|----------------------------------|
//! | no               | fresh `supply` on every call   | no-op                            |
//! | yes              | read source cache, never fetch | `supply`, then overwrite cache   |

use std::collections::BTreeMap;

use sgen_core::{CancelToken, Record, SourceName, DEFAULT_RENDERER};
use sgen_renderer::{JsonRenderer, Renderer};

use crate::cache::SourceCache;
use crate::error::SourceError;
use crate::supply::Supplier;

/// What a call to [`Source::sync`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The supplier is not cached; nothing was fetched.
    Skipped,
    /// Records were fetched and stored.
    Stored { records: usize },
}

pub struct Source {
    name: SourceName,
    supplier: Box<dyn Supplier>,
    renderers: BTreeMap<String, Box<dyn Renderer>>,
}

impl Source {
    /// Bind `supplier` and `renderers` under `name`. A [`JsonRenderer`] is
    /// registered as `default` when `renderers` has none.
    pub fn new(
        name: SourceName,
        supplier: Box<dyn Supplier>,
        mut renderers: BTreeMap<String, Box<dyn Renderer>>,
    ) -> Self {
        renderers
            .entry(DEFAULT_RENDERER.to_string())
            .or_insert_with(|| Box::new(JsonRenderer));
        Source {
            name,
            supplier,
            renderers,
        }
    }

    pub fn name(&self) -> &SourceName {
        &self.name
    }

    pub fn should_cache(&self) -> bool {
        self.supplier.should_cache()
    }

    /// The `default` renderer; always present.
    pub fn default_renderer(&self) -> &dyn Renderer {
        self.renderers
            .get(DEFAULT_RENDERER)
            .map(|r| &**r)
            .unwrap_or(&JsonRenderer)
    }

    /// The renderer registered as `name`, falling back to `default`.
    pub fn renderer(&self, name: &str) -> &dyn Renderer {
        match self.renderers.get(name) {
            Some(renderer) => &**renderer,
            None => {
                tracing::debug!("{}: no renderer named '{}', using default", self.name, name);
                self.default_renderer()
            }
        }
    }

    /// Names of every registered renderer, sorted.
    pub fn renderer_names(&self) -> impl Iterator<Item = &str> {
        self.renderers.keys().map(String::as_str)
    }

    /// Records for rendering. Never fetches implicitly for cached suppliers:
    /// a source that was never synced yields `SourceError::NotCached`.
    pub fn load(
        &self,
        cache: &SourceCache,
        cancel: &CancelToken,
    ) -> Result<Vec<Record>, SourceError> {
        if !self.supplier.should_cache() {
            return self.fetch(cancel);
        }
        cache.load(&self.name)
    }

    /// Refetch and overwrite the cached records. A failed fetch leaves the
    /// previous cache contents in place.
    pub fn sync(
        &self,
        cache: &SourceCache,
        cancel: &CancelToken,
    ) -> Result<SyncOutcome, SourceError> {
        if !self.supplier.should_cache() {
            return Ok(SyncOutcome::Skipped);
        }
        let records = self.fetch(cancel)?;
        cache.store(&self.name, &records)?;
        tracing::info!("synced '{}' ({} records)", self.name, records.len());
        Ok(SyncOutcome::Stored {
            records: records.len(),
        })
    }

    fn fetch(&self, cancel: &CancelToken) -> Result<Vec<Record>, SourceError> {
        self.supplier
            .supply(cancel)
            .map_err(|source| SourceError::Fetch {
                source_name: self.name.0.clone(),
                source,
            })
    }
}

impl std::fmt::Debug for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Source")
            .field("name", &self.name)
            .field("should_cache", &self.should_cache())
            .field("renderers", &self.renderers.keys().collect::<Vec<_>>())
            .finish()
    }
}
