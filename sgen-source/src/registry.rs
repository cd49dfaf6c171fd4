//! Supplier registry — maps a config `type` tag to a supplier constructor.
//!
//! | Tag       | Supplier             | Required parameter |
//! |-----------|----------------------|--------------------|
//! | `file`    | [`FileSupplier`]     | `file.path`        |
//! | `command` | [`CommandSupplier`]  | `command`          |

use sgen_core::{ConfigError, SourceConfig};

use crate::error::SourceError;
use crate::supply::{CommandSupplier, FileSupplier, Supplier};

/// Every supplier type sgen can build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SupplierKind {
    File,
    Command,
}

impl SupplierKind {
    /// All supplier variants in a stable order.
    pub fn all() -> &'static [SupplierKind] {
        &[SupplierKind::File, SupplierKind::Command]
    }

    /// The config `type` tag for this kind.
    pub fn tag(&self) -> &'static str {
        match self {
            SupplierKind::File => "file",
            SupplierKind::Command => "command",
        }
    }

    /// Resolve a config tag; `None` for unknown tags.
    pub fn from_tag(tag: &str) -> Option<SupplierKind> {
        Self::all().iter().copied().find(|k| k.tag() == tag)
    }

    /// Construct the supplier described by `config`.
    pub fn build(&self, config: &SourceConfig) -> Result<Box<dyn Supplier>, SourceError> {
        let source_name = config.name.0.clone();
        match self {
            SupplierKind::File => {
                let file = config.file.as_ref().ok_or(ConfigError::MissingParameter {
                    source_name,
                    kind: self.tag(),
                    parameter: "a path",
                })?;
                let supplier = FileSupplier::new(&file.path).map_err(|source| {
                    SourceError::Invalid {
                        source_name: config.name.0.clone(),
                        source,
                    }
                })?;
                Ok(Box::new(supplier))
            }
            SupplierKind::Command => {
                let command = config.command.as_deref().ok_or(ConfigError::MissingParameter {
                    source_name,
                    kind: self.tag(),
                    parameter: "a command",
                })?;
                let supplier = CommandSupplier::new(command).map_err(|source| {
                    SourceError::Invalid {
                        source_name: config.name.0.clone(),
                        source,
                    }
                })?;
                Ok(Box::new(supplier))
            }
        }
    }
}

/// Resolve the `type` tag of `config` and build its supplier.
pub fn build_supplier(config: &SourceConfig) -> Result<Box<dyn Supplier>, SourceError> {
    let kind = SupplierKind::from_tag(&config.kind).ok_or_else(|| {
        ConfigError::UnknownSupplierType {
            source_name: config.name.0.clone(),
            kind: config.kind.clone(),
            valid: SupplierKind::all().iter().map(|k| k.tag()).collect(),
        }
    })?;
    kind.build(config)
}
