//! crates/scopelog/src/levels.rs
//! Severity vocabulary and its total order.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Rank assigned to any name outside the level vocabulary.
///
/// It sits below [`Level::Silent`], so a logger resolving to an unknown name
/// never emits anything.
pub const UNKNOWN_RANK: i32 = -1;

/// Severity levels ordered from quietest to most verbose.
///
/// A logger configured at level `L` emits every message whose level ranks at
/// or below `L`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    /// Emits nothing.
    Silent = 0,
    /// Failures the operator must act on.
    Error = 1,
    /// Suspicious conditions that did not fail.
    Warn = 2,
    /// Operational information for administrators (alias `info`).
    #[serde(alias = "info")]
    Admin = 3,
    /// Call tracing useful to users of a library (alias `libuser`).
    #[serde(rename = "lib_user", alias = "libuser")]
    LibUser = 4,
    /// Developer diagnostics (alias `debug`).
    #[serde(alias = "debug")]
    Dev = 5,
    /// Everything, including the chattiest internals (alias `trace`).
    #[serde(alias = "trace")]
    Creator = 6,
}

impl Level {
    /// Every level from quietest to most verbose.
    pub const ALL: [Self; 7] = [
        Self::Silent,
        Self::Error,
        Self::Warn,
        Self::Admin,
        Self::LibUser,
        Self::Dev,
        Self::Creator,
    ];

    /// Canonical lowercase name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Silent => "silent",
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Admin => "admin",
            Self::LibUser => "lib_user",
            Self::Dev => "dev",
            Self::Creator => "creator",
        }
    }

    /// Numeric rank; larger is more verbose.
    #[must_use]
    pub const fn rank(self) -> i32 {
        self as i32
    }

    /// Looks up a level by name, accepting aliases and any ASCII case.
    ///
    /// ```
    /// use scopelog::Level;
    ///
    /// assert_eq!(Level::from_name("INFO"), Some(Level::Admin));
    /// assert_eq!(Level::from_name(" debug "), Some(Level::Dev));
    /// assert_eq!(Level::from_name("insane"), None);
    /// ```
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        let level = match name.to_ascii_lowercase().as_str() {
            "silent" => Self::Silent,
            "error" => Self::Error,
            "warn" | "warning" => Self::Warn,
            "admin" | "info" => Self::Admin,
            "libuser" | "lib_user" => Self::LibUser,
            "dev" | "debug" => Self::Dev,
            "creator" | "trace" => Self::Creator,
            _ => return None,
        };
        Some(level)
    }

    /// Colour used for the prefix of lines emitted at this level.
    #[must_use]
    pub const fn color_name(self) -> &'static str {
        match self {
            Self::Silent => "reset",
            Self::Error => "red",
            Self::Warn => "yellow",
            Self::Admin => "white",
            Self::LibUser | Self::Dev => "cyan",
            Self::Creator => "magenta",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl AsRef<str> for Level {
    fn as_ref(&self) -> &str {
        self.name()
    }
}

/// Error returned when a string names no level.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
#[error("unknown log level: {name:?}")]
pub struct ParseLevelError {
    name: String,
}

impl ParseLevelError {
    /// The rejected input.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl FromStr for Level {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| ParseLevelError { name: s.to_owned() })
    }
}

/// Rank of a level name; unknown names get [`UNKNOWN_RANK`].
///
/// ```
/// use scopelog::{Level, UNKNOWN_RANK, rank};
///
/// assert_eq!(rank("warn"), Level::Warn.rank());
/// assert_eq!(rank("bogus"), UNKNOWN_RANK);
/// assert!(rank("bogus") < rank("silent"));
/// ```
#[must_use]
pub fn rank(name: &str) -> i32 {
    Level::from_name(name).map_or(UNKNOWN_RANK, Level::rank)
}
