#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! crates/scopelog-sink/src/lib.rs
//!
//! # Overview
//!
//! `scopelog-sink` provides the output side of the scoped logger: a
//! [`LineSink`] receives one already-formatted line together with any number
//! of opaque extra values and writes them somewhere. The logger never renders
//! the extras into its prefix; they travel to the sink untouched and the sink
//! decides how to print them.
//!
//! # Design
//!
//! Three sinks cover the common destinations:
//!
//! - [`ConsoleSink`] writes to the process's standard streams, honouring the
//!   [`Stream`] the logger selected for each severity (or forcing stdout).
//! - [`WriterSink`] wraps any [`std::io::Write`] implementor behind a lock so
//!   a single writer can be shared by many loggers.
//! - [`MemorySink`] records every line so tests and embedders can inspect
//!   what would have been printed.
//!
//! Callers control whether rendered lines end with a newline by selecting a
//! [`LineMode`].
//!
//! # Invariants
//!
//! - Writing never fails from the caller's point of view. I/O errors raised by
//!   the destination are swallowed so logging cannot crash the program.
//! - Each call to [`LineSink::write_line`] is rendered and written while the
//!   destination lock is held, so lines from concurrent loggers never
//!   interleave mid-line.
//!
//! # Examples
//!
//! Capture two lines in memory and inspect them:
//!
//! ```
//! use scopelog_sink::{LineSink, MemorySink, Stream};
//!
//! let sink = MemorySink::new();
//! sink.write_line(Stream::Stdout, "ready", &[]);
//! sink.write_line(Stream::Stderr, "partial transfer", &[&23]);
//!
//! let lines = sink.drain();
//! assert_eq!(lines.len(), 2);
//! assert_eq!(lines[1].extras, vec!["23".to_string()]);
//! assert!(sink.is_empty());
//! ```

mod line_mode;
mod sink;

pub use line_mode::LineMode;
pub use sink::{
    CapturedLine, ConsoleSink, LineSink, MemorySink, Routing, Stream, WriterSink, render_line,
};
