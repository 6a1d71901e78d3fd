//! crates/scopelog/src/logger/mod.rs
//! Scoped logger instances.
//!
//! A [`Logger`] carries a [`ScopeIdentity`] and decides on every call whether
//! a message is emitted by resolving that identity against the shared
//! [`LevelRegistry`]. Loggers are cheap to clone; derived loggers narrow the
//! identity as execution descends into classes, functions and methods:
//!
//! ```
//! use std::sync::Arc;
//! use scopelog::{LevelRegistry, Logger, MemorySink, Palette};
//!
//! let registry = Arc::new(LevelRegistry::new());
//! registry.set_override("Worker.run", "dev");
//! let sink = Arc::new(MemorySink::new());
//!
//! let log = Logger::builder("worker.rs")
//!     .registry(Arc::clone(&registry))
//!     .shared_sink(sink.clone())
//!     .palette(Palette::plain())
//!     .build();
//!
//! let run = log.class("Worker", Some("run"));
//! run.dev("polling");
//! log.dev("not at dev here");
//!
//! let lines: Vec<_> = sink.drain().into_iter().map(|l| l.line).collect();
//! assert_eq!(lines, vec!["worker.rs > Worker.run polling"]);
//! ```

mod emit;
mod format;

pub use emit::{Extras, stream_for};

use std::fmt;
use std::sync::Arc;

use scopelog_sink::{ConsoleSink, LineSink};

use crate::color::{ColorMode, Palette};
use crate::levels::{Level, rank};
use crate::registry::LevelRegistry;
use crate::scope::{ScopeIdentity, resolve_level};

/// Separator placed between location tags unless configured otherwise.
pub const DEFAULT_LOCATION_SEPARATOR: &str = ", ";

/// Logger bound to one scope identity.
#[derive(Clone)]
pub struct Logger {
    identity: ScopeIdentity,
    level: Option<String>,
    location: Vec<String>,
    location_separator: String,
    registry: Arc<LevelRegistry>,
    sink: Arc<dyn LineSink>,
    palette: Palette,
}

impl Logger {
    /// Logger for `source_name` using the process-wide registry and the
    /// console.
    pub fn new(source_name: impl Into<String>) -> Self {
        Self::builder(source_name).build()
    }

    /// Like [`new`](Self::new) with an explicit instance level.
    pub fn with_level(source_name: impl Into<String>, level: impl AsRef<str>) -> Self {
        Self::builder(source_name).level(level).build()
    }

    /// Starts a [`LoggerBuilder`].
    pub fn builder(source_name: impl Into<String>) -> LoggerBuilder {
        LoggerBuilder::new(source_name)
    }

    /// Identity this logger resolves its level for.
    #[must_use]
    pub const fn identity(&self) -> &ScopeIdentity {
        &self.identity
    }

    /// Registry consulted on every level query.
    #[must_use]
    pub const fn registry(&self) -> &Arc<LevelRegistry> {
        &self.registry
    }

    /// Palette used for rendering.
    #[must_use]
    pub const fn palette(&self) -> Palette {
        self.palette
    }

    /// Explicit instance level, if one is set.
    #[must_use]
    pub fn explicit_level(&self) -> Option<&str> {
        self.level.as_deref()
    }

    /// Location tags appended to the prefix.
    #[must_use]
    pub fn location(&self) -> &[String] {
        &self.location
    }

    /// Separator between location tags.
    #[must_use]
    pub fn location_separator(&self) -> &str {
        &self.location_separator
    }

    /// Sets the explicit class name.
    pub fn set_class_name(&mut self, class_name: impl Into<String>) {
        self.identity.set_class_name(Some(class_name.into()));
    }

    /// Sets the function name.
    pub fn set_function_name(&mut self, function_name: impl Into<String>) {
        self.identity.set_function_name(Some(function_name.into()));
    }

    /// Sets the method name.
    pub fn set_method_name(&mut self, method_name: impl Into<String>) {
        self.identity.set_method_name(Some(method_name.into()));
    }

    /// Pins this logger to `level`, bypassing the registry.
    ///
    /// Any name is accepted; names outside the level vocabulary silence the
    /// logger.
    pub fn set_level(&mut self, level: impl AsRef<str>) {
        self.level = Some(level.as_ref().to_owned());
    }

    /// Returns to registry-based resolution.
    pub fn clear_level(&mut self) {
        self.level = None;
    }

    /// Replaces the location tags.
    pub fn set_location<I, S>(&mut self, tags: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.location = tags.into_iter().map(Into::into).collect();
    }

    /// Appends one location tag.
    pub fn push_location(&mut self, tag: impl Into<String>) {
        self.location.push(tag.into());
    }

    /// Sets the separator placed between location tags.
    pub fn set_location_separator(&mut self, separator: impl Into<String>) {
        self.location_separator = separator.into();
    }

    /// Level name currently in effect.
    ///
    /// The explicit instance level wins; otherwise the registry is consulted
    /// through one snapshot, so a concurrent reload is seen either entirely
    /// or not at all.
    #[must_use]
    pub fn level(&self) -> String {
        if let Some(level) = &self.level {
            return level.clone();
        }
        let overrides = self.registry.snapshot();
        let global_level = self.registry.global_level();
        resolve_level(&self.identity, &overrides, &global_level).to_owned()
    }

    /// Rank of [`level`](Self::level).
    #[must_use]
    pub fn level_rank(&self) -> i32 {
        if let Some(level) = &self.level {
            return rank(level);
        }
        let overrides = self.registry.snapshot();
        let global_level = self.registry.global_level();
        rank(resolve_level(&self.identity, &overrides, &global_level))
    }

    /// Whether a message at `level` would be emitted right now.
    #[must_use]
    pub fn is_enabled(&self, level: Level) -> bool {
        level != Level::Silent && self.level_rank() >= level.rank()
    }

    /// Derives a logger for class `class_name`, optionally entering a method.
    ///
    /// When a method is given, an "Entering" line is emitted at
    /// [`Level::Dev`] through `self` before the child is returned.
    #[must_use]
    pub fn class(&self, class_name: impl Into<String>, method_name: Option<&str>) -> Self {
        let mut child = self.clone();
        if let Some(method) = method_name {
            self.entering(method);
            child.identity.set_method_name(Some(method.to_owned()));
        }
        child.identity.set_class_name(Some(class_name.into()));
        child
    }

    /// Derives a logger for function `function_name`.
    #[must_use]
    pub fn function(&self, function_name: &str) -> Self {
        self.derive_function(function_name, None)
    }

    /// Derives a logger for function `function_name` pinned to `level`.
    #[must_use]
    pub fn function_with_level(&self, function_name: &str, level: impl AsRef<str>) -> Self {
        self.derive_function(function_name, Some(level.as_ref()))
    }

    /// Derives a logger for method `method_name`.
    #[must_use]
    pub fn method(&self, method_name: &str) -> Self {
        self.derive_method(method_name, None)
    }

    /// Derives a logger for method `method_name` pinned to `level`.
    #[must_use]
    pub fn method_with_level(&self, method_name: &str, level: impl AsRef<str>) -> Self {
        self.derive_method(method_name, Some(level.as_ref()))
    }

    fn derive_function(&self, function_name: &str, level: Option<&str>) -> Self {
        self.entering(function_name);
        let mut child = self.clone();
        if let Some(level) = level {
            child.set_level(level);
        }
        child.set_function_name(function_name);
        child
    }

    fn derive_method(&self, method_name: &str, level: Option<&str>) -> Self {
        self.entering(method_name);
        let mut child = self.clone();
        if let Some(level) = level {
            child.set_level(level);
        }
        child.set_method_name(method_name);
        child
    }

    fn entering(&self, name: &str) {
        if self.is_enabled(Level::Dev) {
            let message = format!("{}Entering '{name}'", self.palette.code("bright"));
            self.write(Level::Dev, &message, &[]);
        }
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("identity", &self.identity)
            .field("level", &self.level)
            .field("location", &self.location)
            .field("location_separator", &self.location_separator)
            .field("palette", &self.palette)
            .finish_non_exhaustive()
    }
}

/// Builder for [`Logger`] with injectable registry, sink and palette.
#[must_use]
pub struct LoggerBuilder {
    identity: ScopeIdentity,
    level: Option<String>,
    location: Vec<String>,
    location_separator: String,
    registry: Option<Arc<LevelRegistry>>,
    sink: Option<Arc<dyn LineSink>>,
    palette: Option<Palette>,
}

impl LoggerBuilder {
    fn new(source_name: impl Into<String>) -> Self {
        Self {
            identity: ScopeIdentity::new(source_name),
            level: None,
            location: Vec::new(),
            location_separator: DEFAULT_LOCATION_SEPARATOR.to_owned(),
            registry: None,
            sink: None,
            palette: None,
        }
    }

    /// Resolves levels against `registry` instead of the process-wide one.
    pub fn registry(mut self, registry: Arc<LevelRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Writes lines to `sink` instead of the console.
    pub fn sink(mut self, sink: impl LineSink + 'static) -> Self {
        self.sink = Some(Arc::new(sink));
        self
    }

    /// Writes lines to a sink shared with other loggers.
    pub fn shared_sink(mut self, sink: Arc<dyn LineSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Renders with `palette`.
    pub fn palette(mut self, palette: Palette) -> Self {
        self.palette = Some(palette);
        self
    }

    /// Resolves `mode` now and uses the resulting palette.
    pub fn color_mode(mut self, mode: ColorMode) -> Self {
        self.palette = Some(Palette::from_mode(mode));
        self
    }

    /// Pins the logger to `level`.
    pub fn level(mut self, level: impl AsRef<str>) -> Self {
        self.level = Some(level.as_ref().to_owned());
        self
    }

    /// Sets the explicit class name.
    pub fn class_name(mut self, class_name: impl Into<String>) -> Self {
        self.identity.set_class_name(Some(class_name.into()));
        self
    }

    /// Sets the function name.
    pub fn function_name(mut self, function_name: impl Into<String>) -> Self {
        self.identity.set_function_name(Some(function_name.into()));
        self
    }

    /// Sets the method name.
    pub fn method_name(mut self, method_name: impl Into<String>) -> Self {
        self.identity.set_method_name(Some(method_name.into()));
        self
    }

    /// Sets the location tags.
    pub fn location<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.location = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the separator placed between location tags.
    pub fn location_separator(mut self, separator: impl Into<String>) -> Self {
        self.location_separator = separator.into();
        self
    }

    #[must_use]
    /// Finishes the logger, defaulting to the process-wide registry, the
    /// console and the default palette.
    pub fn build(self) -> Logger {
        Logger {
            identity: self.identity,
            level: self.level,
            location: self.location,
            location_separator: self.location_separator,
            registry: self
                .registry
                .unwrap_or_else(|| Arc::clone(LevelRegistry::global())),
            sink: self.sink.unwrap_or_else(|| Arc::new(ConsoleSink::new())),
            palette: self.palette.unwrap_or_default(),
        }
    }
}

impl fmt::Debug for LoggerBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoggerBuilder")
            .field("identity", &self.identity)
            .field("level", &self.level)
            .field("location", &self.location)
            .finish_non_exhaustive()
    }
}
