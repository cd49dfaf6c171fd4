//! Builds a [`Generator`] from configuration, shared by every entrypoint.
//!
//! All suppliers and templates are constructed up front, so a bad source
//! type, a missing parameter or a template that does not compile fails the
//! run before anything is fetched or rendered.

use std::collections::BTreeMap;
use std::path::Path;

use sgen_core::{Config, SourceConfig};
use sgen_renderer::{Renderer, TemplateRenderer};
use sgen_source::{build_supplier, Source, SourceCache};

use crate::error::SyncError;
use crate::generator::Generator;
use crate::template_cache::TemplateCache;

/// Which configured sources a run covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    /// Every configured source, in file order.
    All,
    /// The named sources, in the order given.
    Sources(Vec<String>),
}

/// Build the [`Source`] described by one config block.
pub fn build_source(config: &SourceConfig) -> Result<Source, SyncError> {
    let supplier = build_supplier(config)?;

    let mut renderers: BTreeMap<String, Box<dyn Renderer>> = BTreeMap::new();
    for (name, text) in &config.templates {
        let renderer = TemplateRenderer::new(text).map_err(|source| SyncError::InvalidTemplate {
            source_name: config.name.0.clone(),
            name: name.clone(),
            source,
        })?;
        renderers.insert(name.clone(), Box::new(renderer));
    }
    Ok(Source::new(config.name.clone(), supplier, renderers))
}

/// Resolve `names` against `config` and build each source, failing on the
/// first unknown name or invalid block.
pub fn assemble_sources<S: AsRef<str>>(config: &Config, names: &[S]) -> Result<Vec<Source>, SyncError> {
    config
        .select(names)?
        .into_iter()
        .map(build_source)
        .collect()
}

/// Assemble the sources in `scope` into a generator over the caches under
/// `cache_root`.
pub fn generator(config: &Config, scope: &Scope, cache_root: &Path) -> Result<Generator, SyncError> {
    let sources = match scope {
        Scope::All => config
            .sources
            .iter()
            .map(build_source)
            .collect::<Result<Vec<_>, _>>()?,
        Scope::Sources(names) => assemble_sources(config, names)?,
    };
    tracing::debug!(
        "assembled {} source(s) under {}",
        sources.len(),
        cache_root.display()
    );
    Ok(Generator::new(
        sources,
        TemplateCache::new(cache_root),
        SourceCache::new(cache_root),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sgen_core::ConfigError;
    use tempfile::TempDir;

    fn config(yaml: &str) -> Config {
        Config::parse(Path::new("config.yaml"), yaml).expect("config")
    }

    const TWO_SOURCES: &str = r#"
sources:
  - name: repos
    type: command
    command: "!echo []"
    templates:
      default: "{{ name }}"
      url: "https://github.com/{{ name }}"
  - name: hosts
    type: command
    command: "!echo []"
"#;

    #[test]
    fn templates_become_renderers() {
        let sources = assemble_sources(&config(TWO_SOURCES), &["repos"]).unwrap();
        let repos = &sources[0];
        assert_eq!(repos.default_renderer().id(), "{{ name }}");
        assert_eq!(repos.renderer("url").id(), "https://github.com/{{ name }}");
    }

    #[test]
    fn missing_default_template_is_json() {
        let sources = assemble_sources(&config(TWO_SOURCES), &["hosts"]).unwrap();
        assert_eq!(sources[0].default_renderer().id(), "<JSON>");
    }

    #[test]
    fn requested_order_is_kept() {
        let sources = assemble_sources(&config(TWO_SOURCES), &["hosts", "repos"]).unwrap();
        let names: Vec<_> = sources.iter().map(|s| s.name().as_str()).collect();
        assert_eq!(names, ["hosts", "repos"]);
    }

    #[test]
    fn unknown_source_is_a_config_error() {
        let err = assemble_sources(&config(TWO_SOURCES), &["nope"]).unwrap_err();
        assert!(matches!(err, SyncError::Config(ConfigError::UnknownSource { .. })));
        assert_eq!(err.to_string(), "source 'nope' not configured");
    }

    #[test]
    fn broken_template_fails_before_any_fetch() {
        let cfg = config(
            r#"
sources:
  - name: repos
    type: command
    command: "!echo []"
    templates:
      default: "{{ name"
"#,
        );
        let err = assemble_sources(&cfg, &["repos"]).unwrap_err();
        assert!(matches!(err, SyncError::InvalidTemplate { .. }), "got: {err}");
    }

    #[test]
    fn scope_all_covers_every_source_in_file_order() {
        let root = TempDir::new().unwrap();
        let generator = generator(&config(TWO_SOURCES), &Scope::All, root.path()).unwrap();
        let names: Vec<_> = generator.sources().iter().map(|s| s.name().as_str()).collect();
        assert_eq!(names, ["repos", "hosts"]);
    }
}
