//! Tera template renderer — [`TemplateRenderer`] and its engine setup.
//!
//! Each renderer compiles exactly one template, eagerly, so a syntax error
//! surfaces before any source is fetched. The renderer's identity is the
//! literal template text: two renderers built from the same text produce the
//! same bytes for the same record.
//!
//! # Filters
//!
//! On top of tera's built-ins:
//!
//! | Filter              | Example                            | Output      |
//! |---------------------|------------------------------------|-------------|
//! | `repeat(count=N)`   | `{{ name \| repeat(count=3) }}`    | `bobbobbob` |

use std::collections::HashMap;

use tera::{Context, Tera, Value};

use sgen_core::Record;

use crate::error::RenderError;
use crate::Renderer;

/// Name under which the single template is registered in its private [`Tera`].
const LINE_TEMPLATE: &str = "line";

// ---------------------------------------------------------------------------
// Filters
// ---------------------------------------------------------------------------

fn repeat_filter(value: &Value, args: &HashMap<String, Value>) -> tera::Result<Value> {
    let s = tera::try_get_value!("repeat", "value", String, value);
    let count = match args.get("count") {
        Some(v) => tera::try_get_value!("repeat", "count", usize, v),
        None => {
            return Err(tera::Error::msg(
                "filter `repeat` expected an arg called `count`",
            ))
        }
    };
    Ok(Value::String(s.repeat(count)))
}

fn build_tera(text: &str) -> Result<Tera, tera::Error> {
    let mut tera = Tera::default();
    tera.register_filter("repeat", repeat_filter);
    tera.add_raw_template(LINE_TEMPLATE, text)?;
    Ok(tera)
}

// ---------------------------------------------------------------------------
// TemplateRenderer
// ---------------------------------------------------------------------------

/// Renders each record through one user-supplied tera template.
///
/// Record fields are exposed as top-level template variables, so a record
/// `{"name": "bob"}` renders `{{ name }}` as `bob`. Referencing a field the
/// record lacks is a render failure.
pub struct TemplateRenderer {
    text: String,
    tera: Tera,
}

impl TemplateRenderer {
    /// Compile `text`. Returns [`RenderError::Template`] on a syntax error.
    pub fn new(text: impl Into<String>) -> Result<Self, RenderError> {
        let text = text.into();
        let tera = build_tera(&text).map_err(|source| RenderError::Template {
            template: text.clone(),
            source,
        })?;
        Ok(TemplateRenderer { text, tera })
    }

    /// The literal template text.
    pub fn text(&self) -> &str {
        &self.text
    }
}

impl std::fmt::Debug for TemplateRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TemplateRenderer")
            .field("text", &self.text)
            .finish_non_exhaustive()
    }
}

impl Renderer for TemplateRenderer {
    fn id(&self) -> &str {
        &self.text
    }

    fn render(&self, record: &Record) -> Result<String, RenderError> {
        let ctx = Context::from_serialize(record).map_err(|source| RenderError::Render {
            template: self.text.clone(),
            source,
        })?;
        self.tera
            .render(LINE_TEMPLATE, &ctx)
            .map_err(|source| RenderError::Render {
                template: self.text.clone(),
                source,
            })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
