//! crates/scopelog-sink/src/sink/mod.rs
//! The [`LineSink`] trait and the rendering helper shared by every sink.

mod console;
mod memory;
mod writer;

use std::fmt::{self, Write as _};
use std::sync::Arc;

use crate::line_mode::LineMode;

pub use console::{ConsoleSink, Routing};
pub use memory::{CapturedLine, MemorySink};
pub use writer::WriterSink;

/// Standard stream a line is addressed to.
///
/// The logger picks the stream from the severity of the message; sinks that
/// have a single destination are free to ignore it.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Stream {
    /// Regular diagnostics.
    Stdout,
    /// Errors and warnings.
    Stderr,
}

/// Destination for formatted log lines.
///
/// `line` is the fully formatted text (prefix, colour codes and message).
/// `extras` are the additional values the caller attached to the log call;
/// they are handed over as-is and rendered by the sink.
pub trait LineSink: Send + Sync {
    /// Writes one line. Must not panic and must not report I/O failures.
    fn write_line(&self, stream: Stream, line: &str, extras: &[&dyn fmt::Debug]);

    /// Flushes buffered output, if the sink buffers at all.
    fn flush(&self) {}
}

impl<S> LineSink for Arc<S>
where
    S: LineSink + ?Sized,
{
    fn write_line(&self, stream: Stream, line: &str, extras: &[&dyn fmt::Debug]) {
        (**self).write_line(stream, line, extras);
    }

    fn flush(&self) {
        (**self).flush();
    }
}

/// Renders `line` followed by each extra value, separated by single spaces.
///
/// Extras use their [`Debug`](fmt::Debug) representation, matching how a
/// console prints additional arguments after the message.
///
/// ```
/// use scopelog_sink::{LineMode, render_line};
///
/// let rendered = render_line("value:", &[&42, &"x"], LineMode::WithNewline);
/// assert_eq!(rendered, "value: 42 \"x\"\n");
/// ```
#[must_use]
pub fn render_line(line: &str, extras: &[&dyn fmt::Debug], line_mode: LineMode) -> String {
    let mut rendered = String::with_capacity(line.len() + extras.len() * 8 + 1);
    rendered.push_str(line);
    for extra in extras {
        // Writing into a String cannot fail.
        let _ = write!(rendered, " {extra:?}");
    }
    if line_mode.append_newline() {
        rendered.push('\n');
    }
    rendered
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_line_without_extras_is_the_line() {
        assert_eq!(render_line("plain", &[], LineMode::WithoutNewline), "plain");
        assert_eq!(render_line("plain", &[], LineMode::WithNewline), "plain\n");
    }

    #[test]
    fn render_line_appends_debug_extras() {
        let values = vec![1, 2];
        let rendered = render_line("list", &[&values, &None::<u8>], LineMode::WithoutNewline);
        assert_eq!(rendered, "list [1, 2] None");
    }

    #[test]
    fn arc_sink_forwards_to_inner() {
        let inner = Arc::new(MemorySink::new());
        let shared: Arc<dyn LineSink> = inner.clone();
        shared.write_line(Stream::Stderr, "through arc", &[]);
        assert_eq!(inner.len(), 1);
    }
}
