//! Generate and sync orchestration over a batch of sources.
//!
//! ## `generate` per source
//!
//! 1. Resolve the renderer ([`RendererSelection::resolve`]).
//! 2. Template cache hit → copy bytes to the output verbatim, next source.
//! 3. Miss → `Source::load`; a never-synced cached source is [`SyncError::NeedsSync`].
//! 4. Render every record, writing each line to the output and the cache sink.
//! 5. Commit the sink once every record rendered.
//!
//! Sources whose supplier is not cached skip steps 2 and 5: they are loaded
//! and rendered straight to the output on every call, so an edit to the
//! underlying data shows up immediately.
//!
//! Any failure aborts the whole call. Output already written stays written;
//! the cache entry is only published by step 5.
//!
//! ## `sync` per source
//!
//! Clear the template cache for the source, then `Source::sync`. The first
//! failure aborts the batch; earlier sources keep their fresh caches.

use std::io::Write;

use sgen_core::{CancelToken, Record, SourceName};
use sgen_renderer::Renderer;
use sgen_source::{Source, SourceCache, SyncOutcome};

use crate::error::{io_err, SyncError};
use crate::template_cache::{CacheSink, TemplateCache};

/// Placeholder used when a failing record cannot itself be encoded.
const UNENCODABLE_RECORD: &str = "<encoding JSON failure>";

// ---------------------------------------------------------------------------
// Renderer selection
// ---------------------------------------------------------------------------

/// Which renderer `generate` uses for every source in the batch.
pub enum RendererSelection {
    /// Each source's `default` renderer.
    Default,
    /// The renderer registered under this name, else the source's `default`.
    Named(String),
    /// One renderer applied to every source, e.g. a template given on the
    /// command line.
    AdHoc(Box<dyn Renderer>),
}

impl RendererSelection {
    /// Effective renderer for `source`.
    pub fn resolve<'a>(&'a self, source: &'a Source) -> &'a dyn Renderer {
        match self {
            RendererSelection::AdHoc(renderer) => &**renderer,
            RendererSelection::Named(name) => source.renderer(name),
            RendererSelection::Default => source.default_renderer(),
        }
    }
}

impl std::fmt::Debug for RendererSelection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RendererSelection::Default => f.write_str("Default"),
            RendererSelection::Named(name) => f.debug_tuple("Named").field(name).finish(),
            RendererSelection::AdHoc(r) => f.debug_tuple("AdHoc").field(&r.id()).finish(),
        }
    }
}

// ---------------------------------------------------------------------------
// Reports
// ---------------------------------------------------------------------------

/// How one source's output was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Replayed from the template cache; no load, no render.
    CacheHit,
    /// Loaded and rendered; `lines` lines were emitted and cached.
    Rendered { lines: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceReport {
    pub source: SourceName,
    pub renderer_id: String,
    pub outcome: Outcome,
}

/// Per-source results of one `generate` call, in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerateReport {
    pub sources: Vec<SourceReport>,
}

impl GenerateReport {
    pub fn cache_hits(&self) -> usize {
        self.sources
            .iter()
            .filter(|s| s.outcome == Outcome::CacheHit)
            .count()
    }
}

// ---------------------------------------------------------------------------
// Generator
// ---------------------------------------------------------------------------

/// A batch of sources plus the two caches they read and write.
#[derive(Debug)]
pub struct Generator {
    sources: Vec<Source>,
    template_cache: TemplateCache,
    source_cache: SourceCache,
}

impl Generator {
    pub fn new(sources: Vec<Source>, template_cache: TemplateCache, source_cache: SourceCache) -> Self {
        Generator {
            sources,
            template_cache,
            source_cache,
        }
    }

    pub fn sources(&self) -> &[Source] {
        &self.sources
    }

    /// Refetch every cached source in order, invalidating its rendered output
    /// first.
    pub fn sync(&self, cancel: &CancelToken) -> Result<Vec<(SourceName, SyncOutcome)>, SyncError> {
        let mut results = Vec::with_capacity(self.sources.len());
        for source in &self.sources {
            if cancel.is_cancelled() {
                return Err(SyncError::Cancelled);
            }
            self.template_cache.clear(source.name())?;
            let outcome = source
                .sync(&self.source_cache, cancel)
                .map_err(|e| if e.is_cancelled() { SyncError::Cancelled } else { e.into() })?;
            results.push((source.name().clone(), outcome));
        }
        Ok(results)
    }

    /// Write every source's rendered output to `out`, preferring cached output.
    pub fn generate<W: Write>(
        &self,
        out: &mut W,
        selection: &RendererSelection,
        cancel: &CancelToken,
    ) -> Result<GenerateReport, SyncError> {
        let mut report = GenerateReport::default();
        for source in &self.sources {
            if cancel.is_cancelled() {
                return Err(SyncError::Cancelled);
            }
            let renderer = selection.resolve(source);
            let outcome = self.generate_source(out, source, renderer, cancel)?;
            report.sources.push(SourceReport {
                source: source.name().clone(),
                renderer_id: renderer.id().to_string(),
                outcome,
            });
        }
        Ok(report)
    }

    fn generate_source<W: Write>(
        &self,
        out: &mut W,
        source: &Source,
        renderer: &dyn Renderer,
        cancel: &CancelToken,
    ) -> Result<Outcome, SyncError> {
        let name = source.name();

        if !source.should_cache() {
            let records = self.load(source, cancel)?;
            for record in &records {
                let line = render(name, renderer, record)?;
                writeln!(out, "{line}").map_err(SyncError::Output)?;
            }
            tracing::debug!("rendered '{}' fresh ({} lines)", name, records.len());
            return Ok(Outcome::Rendered {
                lines: records.len(),
            });
        }

        if let Some(cached) = self.template_cache.get(name, renderer.id())? {
            tracing::debug!("cache hit: '{}' ({} bytes)", name, cached.len());
            out.write_all(&cached).map_err(SyncError::Output)?;
            return Ok(Outcome::CacheHit);
        }
        tracing::debug!("cache miss: '{}' with {:?}", name, renderer.id());

        let records = self.load(source, cancel)?;
        let mut tee = Tee {
            out,
            sink: self.template_cache.open(name, renderer.id())?,
        };
        for record in &records {
            let line = render(name, renderer, record)?;
            tee.write_line(&line)?;
        }
        tee.sink.commit()?;

        tracing::info!("rendered '{}' ({} lines)", name, records.len());
        Ok(Outcome::Rendered {
            lines: records.len(),
        })
    }

    fn load(&self, source: &Source, cancel: &CancelToken) -> Result<Vec<Record>, SyncError> {
        source.load(&self.source_cache, cancel).map_err(|e| {
            if e.is_not_cached() {
                SyncError::NeedsSync {
                    source_name: source.name().0.clone(),
                }
            } else if e.is_cancelled() {
                SyncError::Cancelled
            } else {
                SyncError::Source(e)
            }
        })
    }
}

fn render(name: &SourceName, renderer: &dyn Renderer, record: &Record) -> Result<String, SyncError> {
    renderer.render(record).map_err(|source| SyncError::Render {
        source_name: name.0.clone(),
        record: diagnostic(record),
        source,
    })
}

/// Best-effort JSON encoding of a record for error messages.
fn diagnostic(record: &Record) -> String {
    serde_json::to_string(record).unwrap_or_else(|_| UNENCODABLE_RECORD.to_string())
}

/// Writes each line to the caller's output, then to the cache sink. A failure
/// on either side aborts before the next line.
struct Tee<'a, W: Write> {
    out: &'a mut W,
    sink: CacheSink,
}

impl<W: Write> Tee<'_, W> {
    fn write_line(&mut self, line: &str) -> Result<(), SyncError> {
        writeln!(self.out, "{line}").map_err(SyncError::Output)?;
        writeln!(self.sink, "{line}").map_err(|e| io_err(self.sink.path(), e))?;
        Ok(())
    }
}
