//! crates/scopelog/src/global.rs
//! Process-wide configuration and the global watcher.
//!
//! Loggers created without an explicit registry share
//! [`LevelRegistry::global`]. The helpers here load `loglevels.json` into that
//! registry and manage the single watcher that keeps it current.

use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::{Mutex, const_mutex};

use crate::config::{ConfigLoader, LoadReport};
use crate::registry::LevelRegistry;
use crate::watch::{ConfigWatcher, WatchBaseline, WatchError, WatchHandle, WatchOptions};

static GLOBAL_WATCHER: Mutex<Option<WatchHandle>> = const_mutex(None);

/// Outcome of [`bootstrap`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Bootstrap {
    /// Report of the initial load, or `None` if nothing was installed.
    pub report: Option<LoadReport>,
    /// Whether a watcher is now keeping the global registry current.
    pub watching: bool,
}

/// Loads `loglevels.json` from the working directory into the global
/// registry and, if the file exists, starts watching it.
///
/// Never fails: a missing or broken file leaves the defaults in place, and a
/// watcher that cannot be started only disables live reload.
pub fn bootstrap() -> Bootstrap {
    bootstrap_with(ConfigLoader::from_current_dir(), WatchOptions::default())
}

/// [`bootstrap`] with an explicit loader and watcher timing.
pub fn bootstrap_with(loader: ConfigLoader, options: WatchOptions) -> Bootstrap {
    let baseline = WatchBaseline::capture(loader.path());
    let report = loader.load_logged(LevelRegistry::global());
    let watching = if loader.path().exists() {
        match install_global_watcher(loader, options, baseline) {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!(target: "scopelog::watch", "live reload disabled: {err}");
                false
            }
        }
    } else {
        false
    };
    Bootstrap { report, watching }
}

/// Starts watching `path` for the global registry, replacing any previous
/// global watcher.
pub fn watch_global(path: impl Into<PathBuf>) -> Result<(), WatchError> {
    watch_global_with(ConfigLoader::new(path), WatchOptions::default())
}

/// [`watch_global`] with an explicit loader and timing.
pub fn watch_global_with(loader: ConfigLoader, options: WatchOptions) -> Result<(), WatchError> {
    let baseline = WatchBaseline::capture(loader.path());
    install_global_watcher(loader, options, baseline)
}

fn install_global_watcher(
    loader: ConfigLoader,
    options: WatchOptions,
    baseline: WatchBaseline,
) -> Result<(), WatchError> {
    let mut slot = GLOBAL_WATCHER.lock();
    if let Some(previous) = slot.take() {
        previous.stop();
    }
    let handle = ConfigWatcher::start_from(
        loader,
        Arc::clone(LevelRegistry::global()),
        options,
        baseline,
    )?;
    *slot = Some(handle);
    Ok(())
}

/// Stops the global watcher. Returns `false` if none was running.
pub fn stop_global_watcher() -> bool {
    let handle = GLOBAL_WATCHER.lock().take();
    handle.is_some_and(|handle| {
        handle.stop();
        true
    })
}

/// Whether a global watcher is running.
#[must_use]
pub fn global_watcher_running() -> bool {
    GLOBAL_WATCHER
        .lock()
        .as_ref()
        .is_some_and(WatchHandle::is_running)
}

/// Queues a reload on the global watcher. Returns `false` if none is running.
pub fn reload_global() -> bool {
    GLOBAL_WATCHER
        .lock()
        .as_ref()
        .is_some_and(WatchHandle::reload_now)
}
