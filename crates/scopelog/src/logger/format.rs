//! crates/scopelog/src/logger/format.rs
//! Prefix and line rendering.

use crate::levels::Level;
use crate::scope::SOURCE_SEPARATOR;

use super::Logger;

impl Logger {
    /// Scope prefix without colour codes.
    ///
    /// With a method name the prefix is `<class>.<method>`, qualified by the
    /// source name only when the class was set explicitly. Otherwise it is
    /// `<source> > <function>` or just `<source>`.
    ///
    /// ```
    /// use scopelog::{LevelRegistry, Logger, MemorySink};
    /// use std::sync::Arc;
    ///
    /// let base = Logger::builder("Filename.ts")
    ///     .registry(Arc::new(LevelRegistry::new()))
    ///     .sink(MemorySink::new())
    ///     .build();
    ///
    /// assert_eq!(base.prefix(), "Filename.ts");
    /// assert_eq!(base.method("m").prefix(), "Filename.m");
    /// assert_eq!(base.class("Class", None).method("m").prefix(), "Filename.ts > Class.m");
    /// assert_eq!(base.function("f").prefix(), "Filename.ts > f");
    /// ```
    #[must_use]
    pub fn prefix(&self) -> String {
        let identity = &self.identity;
        if let Some(method) = identity.method_name() {
            match identity.explicit_class_name() {
                Some(class) => format!(
                    "{}{SOURCE_SEPARATOR}{class}.{method}",
                    identity.source_name()
                ),
                None => format!("{}.{method}", identity.base_name()),
            }
        } else if let Some(function) = identity.function_name() {
            format!("{}{SOURCE_SEPARATOR}{function}", identity.source_name())
        } else {
            identity.source_name().to_owned()
        }
    }

    /// Renders one line as it would be handed to the sink.
    ///
    /// The prefix is wrapped in the colour of `level`; location tags follow as
    /// ` ( t1<sep>t2 ) `, or a single space when there are none. The message
    /// is dimmed when `extra_count` is non-zero.
    #[must_use]
    pub fn format_line(&self, level: Level, message: &str, extra_count: usize) -> String {
        let palette = self.palette;
        let reset = palette.code("reset");

        let mut line = String::with_capacity(message.len() + 64);
        line.push_str(palette.code(level.color_name()));
        line.push_str(&self.prefix());
        line.push_str(reset);
        if self.location.is_empty() {
            line.push(' ');
        } else {
            line.push_str(" ( ");
            line.push_str(&self.location.join(&self.location_separator));
            line.push_str(" ) ");
        }
        if !message.is_empty() && extra_count > 0 {
            line.push_str(palette.code("dim"));
        }
        line.push_str(message);
        line.push_str(reset);
        line
    }
}
