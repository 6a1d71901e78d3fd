//! crates/scopelog/src/logger/emit.rs
//! Severity methods and the level-gated write path.

use std::fmt;

use scopelog_sink::Stream;

use crate::levels::Level;

use super::Logger;

/// Extra values attached to a log call.
pub type Extras<'a> = &'a [&'a dyn fmt::Debug];

/// Stream a message at `level` is addressed to.
///
/// Errors and warnings go to stderr, everything else to stdout.
#[must_use]
pub const fn stream_for(level: Level) -> Stream {
    match level {
        Level::Error | Level::Warn => Stream::Stderr,
        _ => Stream::Stdout,
    }
}

impl Logger {
    /// Emits `message` at `level` if the logger is enabled for it.
    ///
    /// Nothing is formatted when the level check fails.
    pub fn log(&self, level: Level, message: &str) {
        self.log_with(level, message, &[]);
    }

    /// Emits `message` with extra values at `level`.
    ///
    /// Extras are passed to the sink untouched; they are not rendered into the
    /// prefix.
    pub fn log_with(&self, level: Level, message: &str, extras: Extras<'_>) {
        if self.is_enabled(level) {
            self.write(level, message, extras);
        }
    }

    /// Emits pre-captured format arguments, formatting them only when `level`
    /// is enabled. The `log_*!` macros expand to this.
    pub fn log_fmt(&self, level: Level, args: fmt::Arguments<'_>) {
        if self.is_enabled(level) {
            let message = args.as_str().map_or_else(|| args.to_string(), str::to_owned);
            self.write(level, &message, &[]);
        }
    }

    pub(crate) fn write(&self, level: Level, message: &str, extras: Extras<'_>) {
        let line = self.format_line(level, message, extras.len());
        self.sink.write_line(stream_for(level), &line, extras);
    }

    /// Logs at [`Level::Error`].
    pub fn error(&self, message: &str) {
        self.log(Level::Error, message);
    }

    /// Logs at [`Level::Error`] with extra values.
    pub fn error_with(&self, message: &str, extras: Extras<'_>) {
        self.log_with(Level::Error, message, extras);
    }

    /// Logs at [`Level::Warn`].
    pub fn warn(&self, message: &str) {
        self.log(Level::Warn, message);
    }

    /// Logs at [`Level::Warn`] with extra values.
    pub fn warn_with(&self, message: &str, extras: Extras<'_>) {
        self.log_with(Level::Warn, message, extras);
    }

    /// Logs at [`Level::Admin`].
    pub fn admin(&self, message: &str) {
        self.log(Level::Admin, message);
    }

    /// Logs at [`Level::Admin`] with extra values.
    pub fn admin_with(&self, message: &str, extras: Extras<'_>) {
        self.log_with(Level::Admin, message, extras);
    }

    /// Logs at [`Level::LibUser`].
    pub fn lib_user(&self, message: &str) {
        self.log(Level::LibUser, message);
    }

    /// Logs at [`Level::LibUser`] with extra values.
    pub fn lib_user_with(&self, message: &str, extras: Extras<'_>) {
        self.log_with(Level::LibUser, message, extras);
    }

    /// Logs at [`Level::Dev`].
    pub fn dev(&self, message: &str) {
        self.log(Level::Dev, message);
    }

    /// Logs at [`Level::Dev`] with extra values.
    pub fn dev_with(&self, message: &str, extras: Extras<'_>) {
        self.log_with(Level::Dev, message, extras);
    }

    /// Logs at [`Level::Creator`].
    pub fn creator(&self, message: &str) {
        self.log(Level::Creator, message);
    }

    /// Logs at [`Level::Creator`] with extra values.
    pub fn creator_with(&self, message: &str, extras: Extras<'_>) {
        self.log_with(Level::Creator, message, extras);
    }

    /// Logs a parameter value at [`Level::LibUser`].
    pub fn param(&self, name: &str, value: &dyn fmt::Debug) {
        if self.is_enabled(Level::LibUser) {
            let message = format!("{}parameter: {name}", self.palette.code("dim"));
            self.write(Level::LibUser, &message, &[value]);
        }
    }

    /// Logs an outgoing call at [`Level::LibUser`].
    pub fn calling(&self, message: &str, extras: Extras<'_>) {
        self.bright(message, extras);
    }

    /// Logs a completed call at [`Level::LibUser`].
    pub fn called(&self, message: &str, extras: Extras<'_>) {
        self.bright(message, extras);
    }

    /// Logs a return value at [`Level::LibUser`].
    pub fn returning(&self, message: &str, extras: Extras<'_>) {
        self.bright(message, extras);
    }

    fn bright(&self, message: &str, extras: Extras<'_>) {
        if self.is_enabled(Level::LibUser) {
            let message = format!("{}{message}", self.palette.code("bright"));
            self.write(Level::LibUser, &message, extras);
        }
    }

    /// Flushes the underlying sink.
    pub fn flush(&self) {
        self.sink.flush();
    }
}
