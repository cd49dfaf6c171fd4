//! YAML configuration: the list of sources sgen knows about.
//!
//! # File format
//!
//! ```yaml
//! sources:
//!   - name: names
//!     type: command
//!     command: "!cat names.json"
//!     templates:
//!       default: "{{ name }}"
//!       bulleted: "- {{ name }}"
//!   - name: people
//!     type: file
//!     file:
//!       path: /data/people.yaml
//! ```
//!
//! The `type` tag is kept as a plain string here; resolving it to a supplier
//! happens in `sgen-source`, which owns the registry of valid tags.

use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{io_err, ConfigError};
use crate::types::SourceName;

/// Root of the YAML config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub sources: Vec<SourceConfig>,
}

/// One `sources:` entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceConfig {
    pub name: SourceName,
    /// Supplier type tag (`file`, `command`).
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<FileConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    /// Named template texts. A `default` entry overrides the JSON renderer.
    #[serde(default)]
    pub templates: BTreeMap<String, String>,
}

/// Parameters of a `file` source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileConfig {
    pub path: PathBuf,
}

impl Config {
    /// Load and validate the config at `path`.
    ///
    /// Returns `ConfigError::NotFound` if absent,
    /// `ConfigError::Parse` (with path + line context) if malformed YAML.
    pub fn load_at(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound {
                path: path.to_path_buf(),
            });
        }
        let contents = std::fs::read_to_string(path).map_err(|e| io_err(path, e))?;
        Self::parse(path, &contents)
    }

    /// Parse config text; `path` is only used for error context.
    pub fn parse(path: &Path, contents: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(contents).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for source in &self.sources {
            if !is_valid_source_name(source.name.as_str()) {
                return Err(ConfigError::InvalidSourceName {
                    name: source.name.0.clone(),
                });
            }
            if !seen.insert(source.name.as_str()) {
                return Err(ConfigError::DuplicateSource {
                    name: source.name.0.clone(),
                });
            }
        }
        Ok(())
    }

    /// Look up a source block by name.
    pub fn source(&self, name: &str) -> Option<&SourceConfig> {
        self.sources.iter().find(|s| s.name.as_str() == name)
    }

    /// All configured source names, in file order.
    pub fn source_names(&self) -> Vec<SourceName> {
        self.sources.iter().map(|s| s.name.clone()).collect()
    }

    /// Resolve every requested name, failing on the first unknown one.
    pub fn select<S: AsRef<str>>(&self, names: &[S]) -> Result<Vec<&SourceConfig>, ConfigError> {
        names
            .iter()
            .map(|name| {
                let name = name.as_ref();
                self.source(name).ok_or_else(|| ConfigError::UnknownSource {
                    name: name.to_owned(),
                })
            })
            .collect()
    }
}

fn is_valid_source_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\'])
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const BASIC: &str = r#"
sources:
  - name: gh
    type: command
    command: gh repo list --json nameWithOwner
  - name: gh_w_template
    type: command
    command: gh repo list --json nameWithOwner
    templates:
      default: "{{ nameWithOwner }}"
  - name: static
    type: file
    file:
      path: /data.json
"#;

    fn parse(text: &str) -> Result<Config, ConfigError> {
        Config::parse(Path::new("config.yaml"), text)
    }

    #[test]
    fn parses_sources_in_file_order() {
        let config = parse(BASIC).expect("parse");
        let names: Vec<_> = config.source_names().into_iter().map(|n| n.0).collect();
        assert_eq!(names, ["gh", "gh_w_template", "static"]);
    }

    #[test]
    fn missing_templates_is_empty_map() {
        let config = parse(BASIC).expect("parse");
        assert!(config.source("gh").unwrap().templates.is_empty());
        assert_eq!(
            config.source("gh_w_template").unwrap().templates.get("default"),
            Some(&"{{ nameWithOwner }}".to_string())
        );
    }

    #[test]
    fn file_parameters_are_decoded() {
        let config = parse(BASIC).expect("parse");
        let file = config.source("static").unwrap().file.as_ref().expect("file block");
        assert_eq!(file.path, PathBuf::from("/data.json"));
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let text = "sources:\n  - {name: a, type: file}\n  - {name: a, type: command}\n";
        let err = parse(text).unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateSource { ref name } if name == "a"));
    }

    #[test]
    fn path_like_names_are_rejected() {
        for bad in ["", "..", "a/b"] {
            let text = format!("sources:\n  - {{name: '{bad}', type: file}}\n");
            let err = parse(&text).unwrap_err();
            assert!(matches!(err, ConfigError::InvalidSourceName { .. }), "{bad:?}: {err}");
        }
    }

    #[test]
    fn select_reports_unknown_source() {
        let config = parse(BASIC).expect("parse");
        let err = config.select(&["gh", "nope"]).unwrap_err();
        assert_eq!(err.to_string(), "source 'nope' not configured");
    }

    #[test]
    fn empty_document_has_no_sources() {
        let config = parse("{}").expect("parse");
        assert!(config.sources.is_empty());
    }
}
