//! crates/scopelog/src/watch.rs
//! Live reload of the level configuration.
//!
//! # Thread Protocol
//!
//! ```text
//! Watch thread                          Reload worker
//! ────────────                          ─────────────
//! tick: fingerprint file
//! changed, stable for `debounce`
//! try_send(Changed)  ──────────────▶    load + install
//! tick ...                              (one load at a time)
//! stop: channel closed ─────────────▶   queue drained, thread exits
//! ```
//!
//! The watcher compares against a [`WatchBaseline`] taken before the caller's
//! initial load. If the file already differs from it when the watcher starts,
//! one reload is queued right away, so an edit landing between that load and
//! the first poll is not lost.
//!
//! The request queue holds a single entry. While a reload is running, further
//! change notifications collapse into that one pending request, so bursts of
//! edits never produce overlapping loads and the table always reflects one
//! complete document.

use std::collections::hash_map::DefaultHasher;
use std::fs;
use std::hash::{Hash, Hasher};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant, SystemTime};

use crossbeam_channel::{Receiver, Sender, TrySendError, bounded, select, tick};
use thiserror::Error;

use crate::config::ConfigLoader;
use crate::registry::LevelRegistry;

/// Default interval between two looks at the config file.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Default quiet period a change must survive before it is reloaded.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(100);

/// Timing knobs for [`ConfigWatcher`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct WatchOptions {
    poll_interval: Duration,
    debounce: Duration,
}

impl WatchOptions {
    /// Sets how often the file is checked.
    #[must_use]
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval.max(Duration::from_millis(1));
        self
    }

    /// Sets how long a change must stay unchanged before it is reloaded.
    #[must_use]
    pub const fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    /// Interval between checks.
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Quiet period before reloading.
    #[must_use]
    pub const fn debounce(&self) -> Duration {
        self.debounce
    }
}

impl Default for WatchOptions {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            debounce: DEFAULT_DEBOUNCE,
        }
    }
}

/// Errors raised when starting a watcher.
#[derive(Debug, Error)]
pub enum WatchError {
    /// A background thread could not be created.
    #[error("failed to spawn config watch thread: {0}")]
    Spawn(#[from] io::Error),
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum ReloadRequest {
    Changed,
    Manual,
}

/// What the watcher last saw at the config path.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Fingerprint {
    Missing,
    Unreadable,
    Present {
        len: u64,
        modified: Option<SystemTime>,
        digest: u64,
    },
}

impl Fingerprint {
    fn capture(path: &Path) -> Self {
        let modified = fs::metadata(path).and_then(|meta| meta.modified()).ok();
        match fs::read(path) {
            Ok(bytes) => {
                let mut hasher = DefaultHasher::new();
                bytes.hash(&mut hasher);
                Self::Present {
                    len: bytes.len() as u64,
                    modified,
                    digest: hasher.finish(),
                }
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => Self::Missing,
            Err(_) => Self::Unreadable,
        }
    }
}

/// Fingerprint of the config file taken before an initial load.
///
/// Pass it to [`ConfigWatcher::start_from`] so that edits made between the
/// load and the watcher start are reloaded.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct WatchBaseline(Fingerprint);

impl WatchBaseline {
    /// Captures the current state of the file at `path`.
    #[must_use]
    pub fn capture(path: impl AsRef<Path>) -> Self {
        Self(Fingerprint::capture(path.as_ref()))
    }
}

#[derive(Debug)]
struct Shared {
    path: PathBuf,
    stopped: AtomicBool,
    reloads: AtomicU64,
}

/// Starts background reloading of a config file.
#[derive(Debug)]
pub struct ConfigWatcher;

impl ConfigWatcher {
    /// Watches `loader`'s file with default timing and reloads it into
    /// `registry` on change.
    pub fn start(loader: ConfigLoader, registry: Arc<LevelRegistry>) -> Result<WatchHandle, WatchError> {
        Self::start_with(loader, registry, WatchOptions::default())
    }

    /// Like [`start`](Self::start) with explicit timing.
    pub fn start_with(
        loader: ConfigLoader,
        registry: Arc<LevelRegistry>,
        options: WatchOptions,
    ) -> Result<WatchHandle, WatchError> {
        let baseline = WatchBaseline::capture(loader.path());
        Self::start_from(loader, registry, options, baseline)
    }

    /// Like [`start_with`](Self::start_with), comparing against `baseline`
    /// instead of the file as it is now.
    ///
    /// Capture the baseline before loading the file; if the file has changed
    /// since, one reload is queued immediately.
    pub fn start_from(
        loader: ConfigLoader,
        registry: Arc<LevelRegistry>,
        options: WatchOptions,
        baseline: WatchBaseline,
    ) -> Result<WatchHandle, WatchError> {
        let shared = Arc::new(Shared {
            path: loader.path().to_path_buf(),
            stopped: AtomicBool::new(false),
            reloads: AtomicU64::new(0),
        });
        let (request_tx, request_rx) = bounded::<ReloadRequest>(1);
        let (stop_tx, stop_rx) = bounded::<()>(1);

        let reload_thread = {
            let shared = Arc::clone(&shared);
            thread::Builder::new()
                .name("scopelog-reload".into())
                .spawn(move || reload_loop(&loader, &registry, &request_rx, &shared))?
        };

        let current = Fingerprint::capture(&shared.path);
        if current != baseline.0 {
            tracing::info!(
                target: "scopelog::watch",
                path = %shared.path.display(),
                "log level config changed before watching started, re-reading content"
            );
            // The queue is empty here, so the request always fits.
            let _ = request_tx.try_send(ReloadRequest::Changed);
        }

        let watch_thread = {
            let shared = Arc::clone(&shared);
            let request_tx = request_tx.clone();
            thread::Builder::new()
                .name("scopelog-watch".into())
                .spawn(move || watch_loop(options, current, &stop_rx, &request_tx, &shared))
        };
        let watch_thread = match watch_thread {
            Ok(handle) => handle,
            Err(err) => {
                shared.stopped.store(true, Ordering::SeqCst);
                drop(request_tx);
                join_logged(reload_thread, &shared.path);
                return Err(WatchError::Spawn(err));
            }
        };

        tracing::info!(
            target: "scopelog::watch",
            path = %shared.path.display(),
            "installed file watcher for log level config"
        );

        Ok(WatchHandle {
            shared,
            stop_tx: Some(stop_tx),
            request_tx: Some(request_tx),
            watch_thread: Some(watch_thread),
            reload_thread: Some(reload_thread),
        })
    }
}

fn watch_loop(
    options: WatchOptions,
    mut applied: Fingerprint,
    stop_rx: &Receiver<()>,
    request_tx: &Sender<ReloadRequest>,
    shared: &Shared,
) {
    let ticker = tick(options.poll_interval);
    let mut pending: Option<(Fingerprint, Instant)> = None;

    loop {
        select! {
            recv(stop_rx) -> _ => break,
            recv(ticker) -> _ => {}
        }
        if shared.stopped.load(Ordering::SeqCst) {
            break;
        }

        let current = Fingerprint::capture(&shared.path);
        if current == applied {
            pending = None;
            continue;
        }
        match pending {
            Some((candidate, since)) if candidate == current => {
                if since.elapsed() < options.debounce {
                    continue;
                }
            }
            _ => {
                pending = Some((current, Instant::now()));
                if !options.debounce.is_zero() {
                    continue;
                }
            }
        }

        applied = current;
        pending = None;
        tracing::info!(
            target: "scopelog::watch",
            path = %shared.path.display(),
            "log level config changed, re-reading content"
        );
        match request_tx.try_send(ReloadRequest::Changed) {
            Ok(()) | Err(TrySendError::Full(_)) => {}
            Err(TrySendError::Disconnected(_)) => break,
        }
    }
}

fn reload_loop(
    loader: &ConfigLoader,
    registry: &LevelRegistry,
    request_rx: &Receiver<ReloadRequest>,
    shared: &Shared,
) {
    for request in request_rx {
        if shared.stopped.load(Ordering::SeqCst) {
            break;
        }
        tracing::debug!(target: "scopelog::watch", ?request, "reloading log level config");
        loader.load_logged(registry);
        shared.reloads.fetch_add(1, Ordering::SeqCst);
    }
}

/// Running watcher. Stops on [`stop`](Self::stop) or when dropped.
#[derive(Debug)]
pub struct WatchHandle {
    shared: Arc<Shared>,
    stop_tx: Option<Sender<()>>,
    request_tx: Option<Sender<ReloadRequest>>,
    watch_thread: Option<JoinHandle<()>>,
    reload_thread: Option<JoinHandle<()>>,
}

impl WatchHandle {
    /// Watched path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.shared.path
    }

    /// Whether the watcher still reacts to changes.
    #[must_use]
    pub fn is_running(&self) -> bool {
        !self.shared.stopped.load(Ordering::SeqCst)
    }

    /// Number of reloads performed so far, successful or not.
    #[must_use]
    pub fn reload_count(&self) -> u64 {
        self.shared.reloads.load(Ordering::SeqCst)
    }

    /// Queues a reload on the same worker used for change events.
    ///
    /// Returns `false` once the watcher has stopped. A request made while
    /// another is already queued is merged into it.
    pub fn reload_now(&self) -> bool {
        if !self.is_running() {
            return false;
        }
        self.request_tx
            .as_ref()
            .is_some_and(|tx| match tx.try_send(ReloadRequest::Manual) {
                Ok(()) | Err(TrySendError::Full(_)) => true,
                Err(TrySendError::Disconnected(_)) => false,
            })
    }

    /// Stops watching and waits for both threads to exit.
    ///
    /// A reload already running is allowed to finish; queued reloads are
    /// discarded and no load starts after this returns.
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        let was_running = !self.shared.stopped.swap(true, Ordering::SeqCst);
        self.stop_tx.take();
        self.request_tx.take();
        if let Some(handle) = self.watch_thread.take() {
            join_logged(handle, &self.shared.path);
        }
        if let Some(handle) = self.reload_thread.take() {
            join_logged(handle, &self.shared.path);
        }
        if was_running {
            tracing::info!(
                target: "scopelog::watch",
                path = %self.shared.path.display(),
                "stopped watcher for log level config"
            );
        }
    }
}

impl Drop for WatchHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Joins a watcher thread, reporting a panic on the operator channel.
///
/// Returns the panic message, if the thread panicked.
fn join_logged(handle: JoinHandle<()>, path: &Path) -> Option<String> {
    let thread = handle.thread().name().unwrap_or("unnamed").to_owned();
    let payload = handle.join().err()?;
    let message = payload
        .downcast_ref::<&str>()
        .map(|text| (*text).to_owned())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "non-string panic payload".to_owned());
    tracing::warn!(
        target: "scopelog::watch",
        thread = %thread,
        path = %path.display(),
        panic = %message,
        "log level config watcher thread panicked"
    );
    Some(message)
}
