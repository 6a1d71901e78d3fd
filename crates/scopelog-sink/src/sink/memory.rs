use std::fmt;

use parking_lot::Mutex;

use super::{LineSink, Stream};

/// A line recorded by [`MemorySink`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CapturedLine {
    /// Stream the logger addressed the line to.
    pub stream: Stream,
    /// Formatted line exactly as the logger produced it.
    pub line: String,
    /// Debug rendering of each extra value, in call order.
    pub extras: Vec<String>,
}

/// Sink that keeps every line in memory until drained.
#[derive(Debug, Default)]
pub struct MemorySink {
    lines: Mutex<Vec<CapturedLine>>,
}

impl MemorySink {
    /// Creates an empty capture buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes and returns every captured line.
    pub fn drain(&self) -> Vec<CapturedLine> {
        std::mem::take(&mut *self.lines.lock())
    }

    /// Returns a copy of the captured lines without clearing them.
    #[must_use]
    pub fn lines(&self) -> Vec<CapturedLine> {
        self.lines.lock().clone()
    }

    /// Number of captured lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.lock().len()
    }

    /// Whether nothing has been captured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.lock().is_empty()
    }
}

impl LineSink for MemorySink {
    fn write_line(&self, stream: Stream, line: &str, extras: &[&dyn fmt::Debug]) {
        let captured = CapturedLine {
            stream,
            line: line.to_owned(),
            extras: extras.iter().map(|extra| format!("{extra:?}")).collect(),
        };
        self.lines.lock().push(captured);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drain_clears_buffer() {
        let sink = MemorySink::new();
        sink.write_line(Stream::Stdout, "one", &[]);

        assert_eq!(sink.drain().len(), 1);
        assert!(sink.drain().is_empty());
        assert!(sink.is_empty());
    }

    #[test]
    fn lines_are_kept_in_order() {
        let sink = MemorySink::new();
        sink.write_line(Stream::Stdout, "first", &[]);
        sink.write_line(Stream::Stderr, "second", &[&"x"]);
        sink.write_line(Stream::Stdout, "third", &[&1, &2]);

        let lines = sink.lines();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].line, "first");
        assert_eq!(lines[1].stream, Stream::Stderr);
        assert_eq!(lines[1].extras, vec!["\"x\"".to_string()]);
        assert_eq!(lines[2].extras, vec!["1".to_string(), "2".to_string()]);
        assert_eq!(sink.len(), 3);
    }
}
