//! Integration tests for the config watcher.
//!
//! These tests run a watcher with short timings against a temporary config
//! file and verify reload on change, coalescing of rapid edits, manual
//! reloads and that nothing is applied after the watcher stops.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use scopelog::{
    ConfigLoader, ConfigWatcher, LevelRegistry, WatchBaseline, WatchHandle, WatchOptions,
};
use serde_json::json;
use test_support::{ConfigDir, wait_until};

const TIMEOUT: Duration = Duration::from_secs(5);

fn fast_options() -> WatchOptions {
    WatchOptions::default()
        .with_poll_interval(Duration::from_millis(10))
        .with_debounce(Duration::from_millis(30))
}

fn start(dir: &ConfigDir, registry: &Arc<LevelRegistry>) -> WatchHandle {
    ConfigWatcher::start_with(
        ConfigLoader::new(dir.config_path()),
        Arc::clone(registry),
        fast_options(),
    )
    .expect("start watcher")
}

// ============================================================================
// Reloading
// ============================================================================

/// Verifies an edit to the file is picked up.
#[test]
fn change_triggers_reload() {
    let dir = ConfigDir::with_json(&json!({ "a.rs": "warn" })).expect("config dir");
    let registry = Arc::new(LevelRegistry::new());
    let handle = start(&dir, &registry);

    dir.write_json(&json!({ "globalLevel": "dev", "a.rs": "creator" }))
        .expect("write");

    assert!(wait_until(TIMEOUT, || registry.get("a.rs").as_deref() == Some("creator")));
    assert_eq!(&*registry.global_level(), "dev");
    assert!(handle.reload_count() >= 1);
    handle.stop();
}

/// Verifies a file created after the watcher started is loaded.
#[test]
fn created_file_is_loaded() {
    let dir = ConfigDir::new().expect("config dir");
    let registry = Arc::new(LevelRegistry::new());
    let handle = start(&dir, &registry);

    dir.write_json(&json!({ "late.rs": "dev" })).expect("write");
    assert!(wait_until(TIMEOUT, || registry.get("late.rs").is_some()));
    handle.stop();
}

/// Verifies broken content leaves the last good table in place.
#[test]
fn broken_edit_keeps_previous_table() {
    let dir = ConfigDir::with_json(&json!({ "a.rs": "warn" })).expect("config dir");
    let registry = Arc::new(LevelRegistry::new());
    let handle = start(&dir, &registry);

    dir.write_json(&json!({ "a.rs": "dev" })).expect("write");
    assert!(wait_until(TIMEOUT, || registry.get("a.rs").as_deref() == Some("dev")));
    let reloads = handle.reload_count();

    dir.write_raw("{ broken").expect("write");
    assert!(wait_until(TIMEOUT, || handle.reload_count() > reloads));
    assert_eq!(registry.get("a.rs").as_deref(), Some("dev"));
    assert!(handle.is_running());
    handle.stop();
}

/// Verifies two rapid edits end in exactly one of the two documents.
#[test]
fn rapid_edits_apply_one_whole_document() {
    let dir = ConfigDir::with_json(&json!({ "base.rs": "admin" })).expect("config dir");
    let registry = Arc::new(LevelRegistry::new());
    let handle = start(&dir, &registry);

    let first = json!({ "globalLevel": "warn", "one.rs": "dev", "shared.rs": "error" });
    let second = json!({ "globalLevel": "creator", "two.rs": "dev", "shared.rs": "creator" });
    dir.write_json(&first).expect("write first");
    dir.write_json(&second).expect("write second");

    assert!(wait_until(TIMEOUT, || registry.get("base.rs").is_none()));
    thread::sleep(Duration::from_millis(150));

    let table = registry.overrides();
    let has_one = table.contains_key("one.rs");
    let has_two = table.contains_key("two.rs");
    assert!(has_one ^ has_two, "mixed table: {table:?}");
    let expected = if has_one { "error" } else { "creator" };
    assert_eq!(table.get("shared.rs").map(String::as_str), Some(expected));
    assert_eq!(table.len(), 2);
    handle.stop();
}

/// Verifies an edit landing between the initial load and the watcher start
/// is reloaded without waiting for a poll.
#[test]
fn edit_before_watch_start_is_reloaded() {
    let dir = ConfigDir::with_json(&json!({ "a.rs": "warn" })).expect("config dir");
    let registry = Arc::new(LevelRegistry::new());
    let loader = ConfigLoader::new(dir.config_path());

    let baseline = WatchBaseline::capture(loader.path());
    loader.load(&registry).expect("initial load");
    assert_eq!(registry.get("a.rs").as_deref(), Some("warn"));

    dir.write_json(&json!({ "a.rs": "dev" })).expect("write");
    let handle = ConfigWatcher::start_from(
        loader,
        Arc::clone(&registry),
        WatchOptions::default().with_poll_interval(Duration::from_secs(60)),
        baseline,
    )
    .expect("start watcher");

    assert!(wait_until(TIMEOUT, || registry.get("a.rs").as_deref() == Some("dev")));
    assert!(wait_until(TIMEOUT, || handle.reload_count() == 1));
    handle.stop();
}

/// Verifies an unchanged file queues nothing when the watcher starts.
#[test]
fn unchanged_baseline_queues_nothing() {
    let dir = ConfigDir::with_json(&json!({ "a.rs": "warn" })).expect("config dir");
    let registry = Arc::new(LevelRegistry::new());
    let loader = ConfigLoader::new(dir.config_path());

    let baseline = WatchBaseline::capture(loader.path());
    let handle = ConfigWatcher::start_from(
        loader,
        Arc::clone(&registry),
        WatchOptions::default().with_poll_interval(Duration::from_secs(60)),
        baseline,
    )
    .expect("start watcher");

    thread::sleep(Duration::from_millis(100));
    assert_eq!(handle.reload_count(), 0);
    assert!(registry.get("a.rs").is_none());
    handle.stop();
}

/// Verifies a manual reload goes through the same worker.
#[test]
fn manual_reload() {
    let dir = ConfigDir::with_json(&json!({ "m.rs": "dev" })).expect("config dir");
    let registry = Arc::new(LevelRegistry::new());
    let handle = ConfigWatcher::start_with(
        ConfigLoader::new(dir.config_path()),
        Arc::clone(&registry),
        WatchOptions::default().with_poll_interval(Duration::from_secs(60)),
    )
    .expect("start watcher");

    assert!(registry.get("m.rs").is_none());
    assert!(handle.reload_now());
    assert!(wait_until(TIMEOUT, || registry.get("m.rs").is_some()));
    handle.stop();
}

// ============================================================================
// Stopping
// ============================================================================

/// Verifies edits after stop never reach the registry.
#[test]
fn no_reload_after_stop() {
    let dir = ConfigDir::with_json(&json!({ "a.rs": "warn" })).expect("config dir");
    let registry = Arc::new(LevelRegistry::new());
    let handle = start(&dir, &registry);

    dir.write_json(&json!({ "a.rs": "dev" })).expect("write");
    assert!(wait_until(TIMEOUT, || registry.get("a.rs").as_deref() == Some("dev")));
    handle.stop();

    let before = registry.overrides();
    dir.write_json(&json!({ "a.rs": "creator", "b.rs": "dev" }))
        .expect("write");
    thread::sleep(Duration::from_millis(200));
    assert_eq!(registry.overrides(), before);
}

/// Verifies dropping the handle stops the watcher too.
#[test]
fn drop_stops_watcher() {
    let dir = ConfigDir::with_json(&json!({ "a.rs": "warn" })).expect("config dir");
    let registry = Arc::new(LevelRegistry::new());
    drop(start(&dir, &registry));

    dir.write_json(&json!({ "a.rs": "dev" })).expect("write");
    thread::sleep(Duration::from_millis(200));
    assert!(registry.get("a.rs").is_none());
}
