//! Integration tests for sharing sinks across threads.
//!
//! Loggers hand the same sink to many call sites. These tests verify that
//! concurrent writers never split a line and that console output never
//! surfaces an error to the caller.

use std::sync::Arc;
use std::thread;

use scopelog_sink::{ConsoleSink, LineMode, LineSink, MemorySink, Stream, WriterSink};

// ============================================================================
// Concurrent Writes
// ============================================================================

/// Verifies lines written from several threads stay intact.
#[test]
fn concurrent_writes_keep_lines_whole() {
    let sink = Arc::new(WriterSink::new(Vec::new()));

    let handles: Vec<_> = (0..4)
        .map(|worker| {
            let sink = Arc::clone(&sink);
            thread::spawn(move || {
                for n in 0..50 {
                    sink.write_line(Stream::Stdout, &format!("worker-{worker} line-{n}"), &[&n]);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("writer thread");
    }

    let sink = Arc::try_unwrap(sink).expect("sole owner");
    let output = String::from_utf8(sink.into_inner()).expect("utf-8");
    assert_eq!(output.lines().count(), 200);
    for line in output.lines() {
        let mut parts = line.split(' ');
        let worker = parts.next().expect("worker part");
        let label = parts.next().expect("line part");
        let extra = parts.next().expect("extra part");
        assert!(worker.starts_with("worker-"));
        assert_eq!(label.trim_start_matches("line-"), extra);
        assert!(parts.next().is_none());
    }
}

/// Verifies the memory sink records concurrent writes without loss.
#[test]
fn memory_sink_counts_concurrent_writes() {
    let sink = Arc::new(MemorySink::new());

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let sink = Arc::clone(&sink);
            thread::spawn(move || {
                for _ in 0..25 {
                    sink.write_line(Stream::Stderr, "tick", &[]);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("writer thread");
    }

    assert_eq!(sink.len(), 200);
}

// ============================================================================
// Console Output
// ============================================================================

/// Verifies console writes on both streams complete without panicking.
#[test]
fn console_sink_writes_both_streams() {
    let sink = ConsoleSink::new().with_line_mode(LineMode::WithNewline);
    sink.write_line(Stream::Stdout, "console stdout check", &[&"extra"]);
    sink.write_line(Stream::Stderr, "console stderr check", &[]);
    sink.flush();

    let stdout_only = ConsoleSink::stdout_only();
    stdout_only.write_line(Stream::Stderr, "redirected to stdout", &[]);
}
