//! The [`Supplier`] capability and its built-in implementations.

mod command;
mod file;

pub use command::CommandSupplier;
pub use file::FileSupplier;

use sgen_core::{CancelToken, Record};

use crate::error::SupplyError;

/// Fetches raw records from one origin.
pub trait Supplier {
    /// Whether fetched records must be cached by `sync` and read back by
    /// `load`. Suppliers that are cheap to re-read return `false` and are
    /// fetched fresh on every load.
    fn should_cache(&self) -> bool;

    /// Fetch every record. Long-running fetches must abort with
    /// [`SupplyError::Cancelled`] once `cancel` fires.
    fn supply(&self, cancel: &CancelToken) -> Result<Vec<Record>, SupplyError>;
}
