#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `scopelog` is a scoped, hierarchical logger. Every [`Logger`] carries an
//! identity made of a source name (usually the file it lives in) plus an
//! optional class, function and method. Before emitting a line the logger
//! resolves its level by walking a fixed chain of scope keys against a shared
//! override table, falling back to a global default when nothing matches.
//!
//! # Design
//!
//! - [`Level`] is the severity vocabulary with a total order; unknown names
//!   rank at [`UNKNOWN_RANK`] and never emit.
//! - [`LevelRegistry`] holds the override table as a copy-on-write snapshot
//!   together with the global default. Loggers read one snapshot per query.
//! - [`SCOPE_RULES`] lists the key builders from most to least specific;
//!   [`resolve_level`] returns the first hit.
//! - [`ConfigLoader`] reads `loglevels.json`, drops falsy entries and installs
//!   the rest in one swap. Missing, unreadable and malformed files leave the
//!   registry untouched.
//! - [`ConfigWatcher`] polls the file and funnels reloads through a single
//!   worker so bursts of edits never race each other.
//! - Output goes through a [`LineSink`] from `scopelog-sink`; errors and
//!   warnings are addressed to stderr, everything else to stdout.
//!
//! # Invariants
//!
//! - Logging calls never fail and never panic. A disabled level performs no
//!   formatting work.
//! - An explicit instance level bypasses the registry entirely.
//! - Resolution is repeated on every call, so registry changes take effect
//!   immediately for existing loggers.
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//! use scopelog::{LevelRegistry, Logger, MemorySink, Palette, Stream};
//!
//! let registry = Arc::new(LevelRegistry::with_global_level("warn"));
//! let sink = Arc::new(MemorySink::new());
//! let log = Logger::builder("server.rs")
//!     .registry(Arc::clone(&registry))
//!     .shared_sink(sink.clone())
//!     .palette(Palette::plain())
//!     .build();
//!
//! log.error("bind failed");
//! log.admin("listening");
//!
//! registry.set_override("server.rs", "admin");
//! log.admin("listening");
//!
//! let lines = sink.drain();
//! assert_eq!(lines.len(), 2);
//! assert_eq!(lines[0].stream, Stream::Stderr);
//! assert_eq!(lines[1].line, "server.rs listening");
//! ```

mod macros;

mod color;
mod config;
mod global;
mod levels;
mod logger;
mod registry;
mod scope;
#[cfg(feature = "subscriber")]
mod tracing_bridge;
mod watch;

pub use color::{ColorMode, Palette, color_code, resolve_colors};
pub use config::{
    CONFIG_FILE_NAME, ConfigError, ConfigErrorKind, ConfigLoader, DocumentError, GLOBAL_LEVEL_KEY,
    LevelDocument, LoadReport, config_file_path, parse_level_document,
};
pub use global::{
    Bootstrap, bootstrap, bootstrap_with, global_watcher_running, reload_global,
    stop_global_watcher, watch_global, watch_global_with,
};
pub use levels::{Level, ParseLevelError, UNKNOWN_RANK, rank};
pub use logger::{DEFAULT_LOCATION_SEPARATOR, Extras, Logger, LoggerBuilder, stream_for};
pub use registry::{DEFAULT_GLOBAL_LEVEL, LevelRegistry, OverrideMap};
pub use scope::{SCOPE_RULES, SOURCE_SEPARATOR, ScopeIdentity, ScopeRule, resolve_level};
#[cfg(feature = "subscriber")]
pub use tracing_bridge::{ScopeLayer, init_operator_logging, init_scope_bridge};
pub use watch::{
    ConfigWatcher, DEFAULT_DEBOUNCE, DEFAULT_POLL_INTERVAL, WatchBaseline, WatchError, WatchHandle,
    WatchOptions,
};

pub use scopelog_sink::{
    CapturedLine, ConsoleSink, LineMode, LineSink, MemorySink, Routing, Stream, WriterSink,
};
