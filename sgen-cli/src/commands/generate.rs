//! Root `sgen` command: optional sync, then generate to stdout.

use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Args, CommandFactory};
use signal_hook::consts::{SIGINT, SIGTERM};

use sgen_core::{paths, CancelToken, Config};
use sgen_renderer::TemplateRenderer;
use sgen_sync::{
    pipeline::{self, Scope},
    RendererSelection,
};

/// Arguments for `sgen`.
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Sources to render, in output order.
    #[arg(value_name = "SOURCE")]
    pub sources: Vec<String>,

    /// Refetch sources before rendering. Alone, syncs every configured source.
    #[arg(short = 'S', long)]
    pub sync: bool,

    /// Template for rendering each record, e.g. '{{ name }}'.
    #[arg(short, long, value_name = "TEXT")]
    pub template: Option<String>,

    /// Name of a template defined on the source in config.yaml.
    #[arg(short = 'n', long, value_name = "NAME")]
    pub template_name: Option<String>,
}

impl GenerateArgs {
    pub fn run(self) -> Result<()> {
        if !self.sync && self.sources.is_empty() {
            crate::Cli::command()
                .print_help()
                .context("printing usage")?;
            return Ok(());
        }

        let selection = self.selection()?;

        let config_path: PathBuf = paths::config_file().context("locating config file")?;
        let config = Config::load_at(&config_path)
            .with_context(|| format!("loading {}", config_path.display()))?;
        let cache_root = paths::cache_root().context("locating cache directory")?;
        tracing::debug!("config: {}", config_path.display());
        tracing::debug!("cache root: {}", cache_root.display());

        let cancel = cancel_on_signal()?;

        if self.sources.is_empty() {
            let generator = pipeline::generator(&config, &Scope::All, &cache_root)?;
            generator.sync(&cancel).context("sync failed")?;
            return Ok(());
        }

        let scope = Scope::Sources(self.sources.clone());
        let generator = pipeline::generator(&config, &scope, &cache_root)?;
        if self.sync {
            generator.sync(&cancel).context("sync failed")?;
        }

        let stdout = io::stdout();
        let mut out = BufWriter::new(stdout.lock());
        let result = generator.generate(&mut out, &selection, &cancel);
        // Lines emitted before a failure are still flushed.
        let flushed = out.flush();
        let report = result?;
        flushed.context("writing output")?;

        tracing::debug!(
            "generated {} source(s), {} from cache",
            report.sources.len(),
            report.cache_hits()
        );
        Ok(())
    }

    /// Ad-hoc template, named template or each source's default. Blank
    /// values count as unset.
    fn selection(&self) -> Result<RendererSelection> {
        let template = non_blank(self.template.as_deref());
        let template_name = non_blank(self.template_name.as_deref());
        match (template, template_name) {
            (Some(_), Some(_)) => bail!("--template and --template-name are mutually exclusive"),
            (Some(text), None) => {
                let renderer = TemplateRenderer::new(text).context("invalid --template")?;
                Ok(RendererSelection::AdHoc(Box::new(renderer)))
            }
            (None, Some(name)) => Ok(RendererSelection::Named(name.to_string())),
            (None, None) => Ok(RendererSelection::Default),
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Token that fires on SIGINT or SIGTERM. A second signal terminates the
/// process immediately.
fn cancel_on_signal() -> Result<CancelToken> {
    let token = CancelToken::new();
    for signal in [SIGINT, SIGTERM] {
        signal_hook::flag::register_conditional_shutdown(signal, 1, token.flag())
            .context("installing signal handler")?;
        signal_hook::flag::register(signal, token.flag())
            .context("installing signal handler")?;
    }
    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(template: Option<&str>, template_name: Option<&str>) -> GenerateArgs {
        GenerateArgs {
            sources: vec!["names".into()],
            sync: false,
            template: template.map(String::from),
            template_name: template_name.map(String::from),
        }
    }

    #[test]
    fn no_flags_selects_default() {
        let selection = args(None, None).selection().unwrap();
        assert!(matches!(selection, RendererSelection::Default));
    }

    #[test]
    fn template_is_trimmed() {
        let selection = args(Some("  {{ name }}\n"), None).selection().unwrap();
        match selection {
            RendererSelection::AdHoc(r) => assert_eq!(r.id(), "{{ name }}"),
            other => panic!("unexpected selection: {other:?}"),
        }
    }

    #[test]
    fn blank_values_are_ignored() {
        let selection = args(Some("   "), Some("url")).selection().unwrap();
        assert!(matches!(selection, RendererSelection::Named(ref n) if n == "url"));
    }

    #[test]
    fn template_and_name_conflict() {
        let err = args(Some("{{ name }}"), Some("url")).selection().unwrap_err();
        assert_eq!(
            err.to_string(),
            "--template and --template-name are mutually exclusive"
        );
    }
}
