//! # sgen-source
//!
//! Where records come from.
//!
//! - [`Supplier`] — capability that fetches records from one origin, with the
//!   [`FileSupplier`] and [`CommandSupplier`] implementations.
//! - [`registry`] — resolves a config `type` tag to a supplier.
//! - [`SourceCache`] — last fetched records per source, on disk.
//! - [`Source`] — name + supplier + renderers, with `load` / `sync`.

pub mod cache;
pub mod error;
pub mod registry;
pub mod source;
pub mod supply;

pub use cache::SourceCache;
pub use error::{SourceError, SupplyError};
pub use registry::{build_supplier, SupplierKind};
pub use source::{Source, SyncOutcome};
pub use supply::{CommandSupplier, FileSupplier, Supplier};
