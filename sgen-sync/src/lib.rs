//! # sgen-sync
//!
//! Rendered-output cache and the generate/sync orchestration on top of it.
//!
//! - [`TemplateCache`] — rendered output keyed by source and renderer identity.
//! - [`Generator`] — runs `sync` and `generate` over a batch of sources.
//! - [`pipeline`] — assembles a [`Generator`] from configuration.

pub mod error;
pub mod generator;
pub mod pipeline;
pub mod template_cache;

pub use error::SyncError;
pub use generator::{GenerateReport, Generator, Outcome, RendererSelection, SourceReport};
pub use pipeline::{assemble_sources, build_source, Scope};
pub use template_cache::{renderer_key, CacheSink, TemplateCache};
