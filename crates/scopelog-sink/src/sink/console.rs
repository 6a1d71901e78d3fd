use std::fmt;
use std::io::{self, Write};

use super::{LineSink, Stream, render_line};
use crate::line_mode::LineMode;

/// How a [`ConsoleSink`] maps [`Stream`] selections onto process streams.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Routing {
    /// Honour the requested stream: errors and warnings on stderr.
    #[default]
    BySeverity,
    /// Send every line to stdout regardless of the requested stream.
    StdoutOnly,
}

/// Sink that writes to the process's standard output and error streams.
#[derive(Clone, Copy, Debug, Default)]
pub struct ConsoleSink {
    routing: Routing,
    line_mode: LineMode,
}

impl ConsoleSink {
    /// Creates a console sink that routes by severity and appends newlines.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            routing: Routing::BySeverity,
            line_mode: LineMode::WithNewline,
        }
    }

    /// Creates a console sink that sends everything to stdout.
    #[must_use]
    pub const fn stdout_only() -> Self {
        Self {
            routing: Routing::StdoutOnly,
            line_mode: LineMode::WithNewline,
        }
    }

    /// Returns a copy using the provided [`LineMode`].
    #[must_use]
    pub const fn with_line_mode(mut self, line_mode: LineMode) -> Self {
        self.line_mode = line_mode;
        self
    }

    /// Returns the routing policy.
    #[must_use]
    pub const fn routing(&self) -> Routing {
        self.routing
    }

    /// Returns the current [`LineMode`].
    #[must_use]
    pub const fn line_mode(&self) -> LineMode {
        self.line_mode
    }

    const fn target(&self, stream: Stream) -> Stream {
        match self.routing {
            Routing::BySeverity => stream,
            Routing::StdoutOnly => Stream::Stdout,
        }
    }
}

impl LineSink for ConsoleSink {
    fn write_line(&self, stream: Stream, line: &str, extras: &[&dyn fmt::Debug]) {
        let rendered = render_line(line, extras, self.line_mode);
        // A closed pipe or full disk must not take the program down with it.
        let _ = match self.target(stream) {
            Stream::Stdout => io::stdout().lock().write_all(rendered.as_bytes()),
            Stream::Stderr => io::stderr().lock().write_all(rendered.as_bytes()),
        };
    }

    fn flush(&self) {
        let _ = io::stdout().flush();
        let _ = io::stderr().flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_routes_by_severity() {
        let sink = ConsoleSink::default();
        assert_eq!(sink.routing(), Routing::BySeverity);
        assert_eq!(sink.target(Stream::Stderr), Stream::Stderr);
        assert_eq!(sink.target(Stream::Stdout), Stream::Stdout);
    }

    #[test]
    fn stdout_only_redirects_stderr() {
        let sink = ConsoleSink::stdout_only();
        assert_eq!(sink.target(Stream::Stderr), Stream::Stdout);
    }

    #[test]
    fn with_line_mode_overrides_default() {
        let sink = ConsoleSink::new().with_line_mode(LineMode::WithoutNewline);
        assert_eq!(sink.line_mode(), LineMode::WithoutNewline);
    }
}
