use std::fmt;
use std::io::Write;

use parking_lot::Mutex;

use super::{LineSink, Stream, render_line};
use crate::line_mode::LineMode;

/// Sink that renders lines into an arbitrary [`Write`] implementor.
///
/// The writer sits behind a mutex so one destination (a log file, a socket,
/// an in-memory buffer) can be shared by every logger in the process. The
/// [`Stream`] selection is ignored; all lines land in the same writer.
///
/// # Examples
///
/// ```
/// use scopelog_sink::{LineMode, LineSink, Stream, WriterSink};
///
/// let sink = WriterSink::new(Vec::new());
/// sink.write_line(Stream::Stderr, "vanished", &[]);
/// sink.write_line(Stream::Stdout, "count", &[&3]);
///
/// let output = String::from_utf8(sink.into_inner()).unwrap();
/// assert_eq!(output, "vanished\ncount 3\n");
///
/// let sink = WriterSink::with_line_mode(Vec::new(), LineMode::WithoutNewline);
/// sink.write_line(Stream::Stdout, "ready", &[]);
/// assert_eq!(sink.into_inner(), b"ready".to_vec());
/// ```
#[derive(Debug)]
pub struct WriterSink<W> {
    writer: Mutex<W>,
    line_mode: LineMode,
}

impl<W> WriterSink<W> {
    /// Creates a sink that appends a newline after each line.
    #[must_use]
    pub fn new(writer: W) -> Self {
        Self::with_line_mode(writer, LineMode::WithNewline)
    }

    /// Creates a sink with the provided [`LineMode`].
    #[must_use]
    pub fn with_line_mode(writer: W, line_mode: LineMode) -> Self {
        Self {
            writer: Mutex::new(writer),
            line_mode,
        }
    }

    /// Returns the current [`LineMode`].
    #[must_use]
    pub const fn line_mode(&self) -> LineMode {
        self.line_mode
    }

    /// Runs `f` with exclusive access to the wrapped writer.
    pub fn with_writer<R>(&self, f: impl FnOnce(&mut W) -> R) -> R {
        f(&mut self.writer.lock())
    }

    /// Consumes the sink and returns the wrapped writer.
    #[must_use]
    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }
}

impl<W> LineSink for WriterSink<W>
where
    W: Write + Send,
{
    fn write_line(&self, _stream: Stream, line: &str, extras: &[&dyn fmt::Debug]) {
        let rendered = render_line(line, extras, self.line_mode);
        let _ = self.writer.lock().write_all(rendered.as_bytes());
    }

    fn flush(&self) {
        let _ = self.writer.lock().flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    struct FailingWriter;

    impl Write for FailingWriter {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }
    }

    #[test]
    fn appends_newlines_by_default() {
        let sink = WriterSink::new(Vec::new());
        sink.write_line(Stream::Stdout, "first", &[]);
        sink.write_line(Stream::Stderr, "second", &[]);

        let output = String::from_utf8(sink.into_inner()).expect("utf-8");
        let mut lines = output.lines();
        assert_eq!(lines.next(), Some("first"));
        assert_eq!(lines.next(), Some("second"));
        assert!(lines.next().is_none());
    }

    #[test]
    fn write_errors_are_swallowed() {
        let sink = WriterSink::new(FailingWriter);
        sink.write_line(Stream::Stdout, "lost", &[]);
        sink.flush();
    }

    #[test]
    fn with_writer_exposes_buffer() {
        let sink = WriterSink::new(Vec::new());
        sink.write_line(Stream::Stdout, "abc", &[]);
        let len = sink.with_writer(|buffer| buffer.len());
        assert_eq!(len, 4);
    }
}
