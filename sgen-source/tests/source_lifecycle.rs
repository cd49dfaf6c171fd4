//! Config → supplier → source → cache, end to end.

use std::collections::BTreeMap;
use std::path::Path;

use sgen_core::{CancelToken, Config};
use sgen_source::{build_supplier, Source, SourceCache, SourceError, SyncOutcome};
use tempfile::TempDir;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn source_from(config: &Config, name: &str) -> Source {
    let cfg = config.source(name).expect("configured");
    let supplier = build_supplier(cfg).expect("supplier");
    Source::new(cfg.name.clone(), supplier, BTreeMap::new())
}

fn config(text: &str) -> Config {
    Config::parse(Path::new("config.yaml"), text).expect("config")
}

#[test]
fn file_source_is_read_fresh_every_load() {
    init_logging();
    let data = TempDir::new().unwrap();
    let cache_root = TempDir::new().unwrap();
    let people = data.path().join("people.yaml");
    std::fs::write(&people, "- name: bob\n").unwrap();

    let config = config(&format!(
        "sources:\n  - name: people\n    type: file\n    file:\n      path: {}\n",
        people.display()
    ));
    let source = source_from(&config, "people");
    let cache = SourceCache::new(cache_root.path());
    let cancel = CancelToken::new();

    assert_eq!(source.sync(&cache, &cancel).unwrap(), SyncOutcome::Skipped);
    assert_eq!(source.load(&cache, &cancel).unwrap().len(), 1);

    std::fs::write(&people, "- name: bob\n- name: alice\n").unwrap();
    assert_eq!(source.load(&cache, &cancel).unwrap().len(), 2);
}

#[cfg(unix)]
#[test]
fn command_source_serves_snapshot_until_resynced() {
    init_logging();
    let data = TempDir::new().unwrap();
    let cache_root = TempDir::new().unwrap();
    let feed = data.path().join("feed.json");
    std::fs::write(&feed, r#"[{"name":"bob"}]"#).unwrap();

    let config = config(&format!(
        "sources:\n  - name: names\n    type: command\n    command: cat {}\n",
        feed.display()
    ));
    let source = source_from(&config, "names");
    let cache = SourceCache::new(cache_root.path());
    let cancel = CancelToken::new();

    let err = source.load(&cache, &cancel).unwrap_err();
    assert!(matches!(err, SourceError::NotCached { .. }), "got: {err}");

    source.sync(&cache, &cancel).unwrap();
    std::fs::write(&feed, r#"[{"name":"bob"},{"name":"alice"}]"#).unwrap();
    assert_eq!(source.load(&cache, &cancel).unwrap().len(), 1, "stale snapshot expected");

    source.sync(&cache, &cancel).unwrap();
    assert_eq!(source.load(&cache, &cancel).unwrap().len(), 2);
}

#[cfg(unix)]
#[test]
fn cancelled_sync_leaves_cache_untouched() {
    init_logging();
    let cache_root = TempDir::new().unwrap();
    let config = config("sources:\n  - name: slow\n    type: command\n    command: sleep 30\n");
    let source = source_from(&config, "slow");
    let cache = SourceCache::new(cache_root.path());

    let cancel = CancelToken::new();
    cancel.cancel();
    let err = source.sync(&cache, &cancel).unwrap_err();
    assert!(matches!(err, SourceError::Fetch { .. }), "got: {err}");
    assert!(!cache.path_for(source.name()).exists());
}
