//! Structural renderer: one compact JSON object per record.

use sgen_core::Record;

use crate::error::RenderError;
use crate::Renderer;

/// Identity shared by every [`JsonRenderer`].
pub const JSON_RENDERER_ID: &str = "<JSON>";

/// Encodes each record as a single-line JSON object with sorted keys.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonRenderer;

impl Renderer for JsonRenderer {
    fn id(&self) -> &str {
        JSON_RENDERER_ID
    }

    fn render(&self, record: &Record) -> Result<String, RenderError> {
        Ok(serde_json::to_string(record)?)
    }
}
