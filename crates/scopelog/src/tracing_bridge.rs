//! crates/scopelog/src/tracing_bridge.rs
//! Bridge between the tracing crate and scoped loggers.
//!
//! Two entry points are provided:
//!
//! - [`init_operator_logging`] installs a plain `fmt` subscriber so the
//!   library's own diagnostics (targets `scopelog::config` and
//!   `scopelog::watch`) become visible.
//! - [`ScopeLayer`] is a tracing-subscriber layer that routes events through
//!   the level registry. The event target is used as the source name, so
//!   `loglevels.json` entries such as `"my_crate::db": "dev"` control which
//!   tracing events are printed.
//!
//! # Usage
//!
//! ```rust,ignore
//! use scopelog::{ScopeLayer, init_scope_bridge};
//!
//! init_scope_bridge("info");
//! tracing::warn!(target: "server", port = 8080, "bind failed");
//! ```

use std::fmt;
use std::sync::Arc;

use scopelog_sink::{ConsoleSink, LineSink};
use tracing::Subscriber;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::registry::LookupSpan;

use crate::color::Palette;
use crate::levels::Level;
use crate::logger::Logger;
use crate::registry::LevelRegistry;

/// Filter used when the requested directive does not parse.
const FALLBACK_FILTER: &str = "info";

/// Tracing layer that emits events through scoped loggers.
pub struct ScopeLayer {
    registry: Arc<LevelRegistry>,
    sink: Arc<dyn LineSink>,
    palette: Palette,
}

impl ScopeLayer {
    /// Layer resolving against `registry` and writing to `sink`.
    pub fn new(registry: Arc<LevelRegistry>, sink: Arc<dyn LineSink>) -> Self {
        Self {
            registry,
            sink,
            palette: Palette::default(),
        }
    }

    /// Layer using the process-wide registry and the console.
    #[must_use]
    pub fn console() -> Self {
        Self::new(Arc::clone(LevelRegistry::global()), Arc::new(ConsoleSink::new()))
    }

    /// Renders with `palette`.
    #[must_use]
    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }

    /// Map a tracing level to a logger level.
    const fn map_level(level: &tracing::Level) -> Level {
        match *level {
            tracing::Level::ERROR => Level::Error,
            tracing::Level::WARN => Level::Warn,
            tracing::Level::INFO => Level::Admin,
            tracing::Level::DEBUG => Level::Dev,
            tracing::Level::TRACE => Level::Creator,
        }
    }

    fn logger_for(&self, target: &str) -> Logger {
        Logger::builder(target)
            .registry(Arc::clone(&self.registry))
            .shared_sink(Arc::clone(&self.sink))
            .palette(self.palette)
            .build()
    }
}

impl fmt::Debug for ScopeLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScopeLayer")
            .field("palette", &self.palette)
            .finish_non_exhaustive()
    }
}

impl<S> Layer<S> for ScopeLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        let level = Self::map_level(metadata.level());
        let logger = self.logger_for(metadata.target());
        if !logger.is_enabled(level) {
            return;
        }

        let mut visitor = FieldVisitor::default();
        event.record(&mut visitor);
        let extras: Vec<&dyn fmt::Debug> = visitor
            .fields
            .iter()
            .map(|field| field as &dyn fmt::Debug)
            .collect();
        logger.write(level, visitor.message.as_deref().unwrap_or_default(), &extras);
    }
}

/// A non-message event field, printed as `name=value`.
struct EventField {
    name: &'static str,
    value: String,
}

impl fmt::Debug for EventField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.name, self.value)
    }
}

/// Visitor splitting the message from the other event fields.
#[derive(Default)]
struct FieldVisitor {
    message: Option<String>,
    fields: Vec<EventField>,
}

impl tracing::field::Visit for FieldVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn fmt::Debug) {
        let rendered = format!("{value:?}");
        self.push(field, rendered);
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        self.push(field, value.to_owned());
    }
}

impl FieldVisitor {
    fn push(&mut self, field: &tracing::field::Field, value: String) {
        if field.name() == "message" {
            self.message = Some(value);
        } else {
            self.fields.push(EventField {
                name: field.name(),
                value,
            });
        }
    }
}

fn env_filter(directives: &str) -> EnvFilter {
    EnvFilter::try_new(directives).unwrap_or_else(|_| EnvFilter::new(FALLBACK_FILTER))
}

/// Installs a `fmt` subscriber for the library's own diagnostics.
///
/// `filter` uses `EnvFilter` directive syntax, e.g. `"scopelog=info"`;
/// invalid directives fall back to `info`. Returns `false` when a global
/// subscriber was already installed, in which case nothing changes.
pub fn init_operator_logging(filter: &str) -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(filter))
        .with_target(true)
        .try_init()
        .is_ok()
}

/// Installs [`ScopeLayer::console`] as the global subscriber behind `filter`.
///
/// Returns `false` when a global subscriber was already installed.
pub fn init_scope_bridge(filter: &str) -> bool {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    tracing_subscriber::registry()
        .with(env_filter(filter))
        .with(ScopeLayer::console())
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use scopelog_sink::{MemorySink, Stream};
    use tracing_subscriber::layer::SubscriberExt;

    fn layer(global: &str) -> (ScopeLayer, Arc<MemorySink>, Arc<LevelRegistry>) {
        let registry = Arc::new(LevelRegistry::with_global_level(global));
        let sink = Arc::new(MemorySink::new());
        let layer = ScopeLayer::new(Arc::clone(&registry), sink.clone()).with_palette(Palette::plain());
        (layer, sink, registry)
    }

    #[test]
    fn test_map_level() {
        assert_eq!(ScopeLayer::map_level(&tracing::Level::ERROR), Level::Error);
        assert_eq!(ScopeLayer::map_level(&tracing::Level::WARN), Level::Warn);
        assert_eq!(ScopeLayer::map_level(&tracing::Level::INFO), Level::Admin);
        assert_eq!(ScopeLayer::map_level(&tracing::Level::DEBUG), Level::Dev);
        assert_eq!(ScopeLayer::map_level(&tracing::Level::TRACE), Level::Creator);
    }

    #[test]
    fn events_are_gated_by_registry() {
        let (layer, sink, registry) = layer("warn");
        let subscriber = tracing_subscriber::registry().with(layer);

        tracing::subscriber::with_default(subscriber, || {
            tracing::warn!(target: "server", port = 8080, "bind failed");
            tracing::info!(target: "server", "hidden");
            registry.set_override("server", "admin");
            tracing::info!(target: "server", "shown");
        });

        let lines = sink.drain();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].stream, Stream::Stderr);
        assert_eq!(lines[0].line, "server bind failed");
        assert_eq!(lines[0].extras, vec!["port=8080".to_string()]);
        assert_eq!(lines[1].line, "server shown");
    }
}
