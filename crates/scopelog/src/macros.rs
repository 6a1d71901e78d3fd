//! crates/scopelog/src/macros.rs
//! Formatting macros for [`Logger`](crate::Logger).
//!
//! Each macro takes a logger expression followed by `format!` arguments and
//! only renders the message when the logger is enabled for the level.

/// Log at [`Level::Error`](crate::Level::Error).
///
/// # Example
/// ```ignore
/// log_error!(log, "could not open {}", path.display());
/// ```
#[macro_export]
macro_rules! log_error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::Logger::log_fmt(&$logger, $crate::Level::Error, ::std::format_args!($($arg)+))
    };
}

/// Log at [`Level::Warn`](crate::Level::Warn).
///
/// # Example
/// ```ignore
/// log_warn!(log, "retrying in {}ms", delay);
/// ```
#[macro_export]
macro_rules! log_warn {
    ($logger:expr, $($arg:tt)+) => {
        $crate::Logger::log_fmt(&$logger, $crate::Level::Warn, ::std::format_args!($($arg)+))
    };
}

/// Log at [`Level::Admin`](crate::Level::Admin).
///
/// # Example
/// ```ignore
/// log_admin!(log, "listening on {}", addr);
/// ```
#[macro_export]
macro_rules! log_admin {
    ($logger:expr, $($arg:tt)+) => {
        $crate::Logger::log_fmt(&$logger, $crate::Level::Admin, ::std::format_args!($($arg)+))
    };
}

/// Log at [`Level::LibUser`](crate::Level::LibUser).
///
/// # Example
/// ```ignore
/// log_lib_user!(log, "calling {} with {} items", name, items.len());
/// ```
#[macro_export]
macro_rules! log_lib_user {
    ($logger:expr, $($arg:tt)+) => {
        $crate::Logger::log_fmt(&$logger, $crate::Level::LibUser, ::std::format_args!($($arg)+))
    };
}

/// Log at [`Level::Dev`](crate::Level::Dev).
///
/// # Example
/// ```ignore
/// log_dev!(log, "cache state: {:?}", cache);
/// ```
#[macro_export]
macro_rules! log_dev {
    ($logger:expr, $($arg:tt)+) => {
        $crate::Logger::log_fmt(&$logger, $crate::Level::Dev, ::std::format_args!($($arg)+))
    };
}

/// Log at [`Level::Creator`](crate::Level::Creator).
///
/// # Example
/// ```ignore
/// log_creator!(log, "raw frame: {:02x?}", bytes);
/// ```
#[macro_export]
macro_rules! log_creator {
    ($logger:expr, $($arg:tt)+) => {
        $crate::Logger::log_fmt(&$logger, $crate::Level::Creator, ::std::format_args!($($arg)+))
    };
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use scopelog_sink::MemorySink;

    use crate::{LevelRegistry, Logger, Palette};

    fn capture(global: &str) -> (Logger, Arc<MemorySink>) {
        let sink = Arc::new(MemorySink::new());
        let log = Logger::builder("m.rs")
            .registry(Arc::new(LevelRegistry::with_global_level(global)))
            .shared_sink(sink.clone())
            .palette(Palette::plain())
            .build();
        (log, sink)
    }

    #[test]
    fn macros_format_enabled_levels() {
        let (log, sink) = capture("admin");
        let count = 3;
        log_error!(log, "failed {count} times");
        log_warn!(log, "{}", "careful");
        log_admin!(log, "plain");
        log_lib_user!(log, "hidden {}", 1);
        log_dev!(log, "hidden");
        log_creator!(log, "hidden");

        let lines: Vec<_> = sink.drain().into_iter().map(|l| l.line).collect();
        assert_eq!(lines, vec!["m.rs failed 3 times", "m.rs careful", "m.rs plain"]);
    }

    #[test]
    fn macros_accept_references() {
        let (log, sink) = capture("creator");
        let borrowed = &log;
        log_dev!(borrowed, "via ref");
        log_creator!(*borrowed, "via deref");
        assert_eq!(sink.len(), 2);
    }
}
