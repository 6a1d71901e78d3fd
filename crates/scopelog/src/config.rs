//! crates/scopelog/src/config.rs
//! Loading level overrides from a JSON document on disk.
//!
//! The document is a flat JSON object. One reserved key (`globalLevel` by
//! default) carries the global default level; every other key is a scope key
//! bound to a level name:
//!
//! ```json
//! {
//!   "globalLevel": "warn",
//!   "server.rs": "dev",
//!   "Connection.handshake": "creator",
//!   "retry": ""
//! }
//! ```
//!
//! Entries whose value is falsy (`""`, `false`, `0`, `null`) are dropped, so
//! `"retry"` above is not installed. The reserved key follows the same rule:
//! when it is absent or falsy the global level falls back to
//! [`DEFAULT_GLOBAL_LEVEL`], so the registry always reflects the current
//! document and never an earlier one. Missing, unreadable and malformed files
//! leave the registry untouched.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde_json::Value;
use thiserror::Error;

use crate::registry::{DEFAULT_GLOBAL_LEVEL, LevelRegistry, OverrideMap};

/// Name of the config file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "loglevels.json";

/// Reserved key carrying the global default level.
pub const GLOBAL_LEVEL_KEY: &str = "globalLevel";

/// Location of the config file in the current working directory.
///
/// Falls back to the bare file name when the working directory cannot be
/// determined, which resolves relative to wherever the process ends up.
#[must_use]
pub fn config_file_path() -> PathBuf {
    std::env::current_dir()
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .unwrap_or_else(|_| PathBuf::from(CONFIG_FILE_NAME))
}

/// Why a document could not be turned into a [`LevelDocument`].
#[derive(Debug, Error)]
pub enum DocumentError {
    /// The text is not valid JSON.
    #[error("invalid JSON: {0}")]
    Syntax(#[from] serde_json::Error),
    /// Valid JSON, but not an object.
    #[error("expected a JSON object, found {found}")]
    NotAnObject {
        /// JSON type that was found instead.
        found: &'static str,
    },
}

/// Failure classification for [`ConfigError`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ConfigErrorKind {
    /// The file does not exist.
    NotFound,
    /// The file exists but could not be read.
    Read,
    /// The contents are not a JSON object.
    Parse,
}

/// Errors raised while loading the level configuration.
///
/// None of them is fatal: the registry keeps its previous state.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file does not exist.
    #[error("could not find log level config file: {}", path.display())]
    NotFound {
        /// Path that was looked up.
        path: PathBuf,
    },
    /// The config file exists but reading it failed.
    #[error("could not read content of log level config file {}: {source}", path.display())]
    Read {
        /// Path that was read.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },
    /// The config file is not a valid level document.
    #[error("could not parse log level config file {}: {source}", path.display())]
    Parse {
        /// Path that was parsed.
        path: PathBuf,
        /// What was wrong with the contents.
        source: DocumentError,
    },
}

impl ConfigError {
    /// Classification of the failure.
    #[must_use]
    pub const fn kind(&self) -> ConfigErrorKind {
        match self {
            Self::NotFound { .. } => ConfigErrorKind::NotFound,
            Self::Read { .. } => ConfigErrorKind::Read,
            Self::Parse { .. } => ConfigErrorKind::Parse,
        }
    }

    /// Path of the config file involved.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::NotFound { path } | Self::Read { path, .. } | Self::Parse { path, .. } => path,
        }
    }

    /// Whether the file simply does not exist.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Parsed contents of a level document, ready to install.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LevelDocument {
    /// Truthy value of the reserved key, if present.
    pub global_level: Option<String>,
    /// Every other truthy entry.
    pub overrides: OverrideMap,
    /// Keys dropped because their value was falsy, sorted.
    pub dropped: Vec<String>,
}

impl LevelDocument {
    /// Global level this document puts in effect.
    #[must_use]
    pub fn effective_global_level(&self) -> &str {
        self.global_level
            .as_deref()
            .unwrap_or_else(|| DEFAULT_GLOBAL_LEVEL.name())
    }

    /// Applies the document: global default first, then the whole override
    /// table in one swap.
    pub fn install(self, registry: &LevelRegistry) {
        registry.set_global_level(self.effective_global_level());
        registry.replace_overrides(self.overrides);
    }
}

/// Level-name form of a JSON value, or `None` when the value is falsy.
///
/// Non-string truthy values keep their JSON text; they rank as unknown
/// levels and therefore silence the scope they are bound to.
#[allow(clippy::float_cmp)]
fn truthy_level(value: &Value) -> Option<String> {
    match value {
        Value::Null | Value::Bool(false) => None,
        Value::String(text) if text.is_empty() => None,
        Value::String(text) => Some(text.clone()),
        Value::Number(number) if number.as_f64() == Some(0.0) => None,
        other => Some(other.to_string()),
    }
}

const fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Parses a level document, splitting out `global_key` and dropping falsy
/// entries.
///
/// ```
/// use scopelog::parse_level_document;
///
/// let doc = parse_level_document(
///     r#"{ "globalLevel": "silent", "a": "warn", "b": "debug", "c": false }"#,
///     "globalLevel",
/// )
/// .unwrap();
///
/// assert_eq!(doc.global_level.as_deref(), Some("silent"));
/// assert_eq!(doc.overrides.len(), 2);
/// assert_eq!(doc.dropped, vec!["c".to_string()]);
/// ```
pub fn parse_level_document(text: &str, global_key: &str) -> Result<LevelDocument, DocumentError> {
    let value: Value = serde_json::from_str(text)?;
    let mut entries = match value {
        Value::Object(entries) => entries,
        other => {
            return Err(DocumentError::NotAnObject {
                found: json_type_name(&other),
            });
        }
    };

    let global_level = entries
        .remove(global_key)
        .as_ref()
        .and_then(truthy_level);

    let mut document = LevelDocument {
        global_level,
        ..LevelDocument::default()
    };
    for (key, value) in entries {
        match truthy_level(&value) {
            Some(level) => {
                document.overrides.insert(key, level);
            }
            None => document.dropped.push(key),
        }
    }
    document.dropped.sort();
    Ok(document)
}

/// Summary of a successful load.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadReport {
    /// File that was loaded.
    pub path: PathBuf,
    /// Truthy value of the reserved key, if the document carried one.
    pub global_level: Option<String>,
    /// Global level in effect after this load.
    pub effective_global_level: String,
    /// Number of overrides now in the table.
    pub installed: usize,
    /// Keys dropped because their value was falsy.
    pub dropped: Vec<String>,
}

/// Reads the level document from a path and installs it into a registry.
#[derive(Clone, Debug)]
pub struct ConfigLoader {
    path: PathBuf,
    global_key: String,
}

impl ConfigLoader {
    /// Loader for the file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            global_key: GLOBAL_LEVEL_KEY.to_owned(),
        }
    }

    /// Loader for [`CONFIG_FILE_NAME`] in the current working directory.
    #[must_use]
    pub fn from_current_dir() -> Self {
        Self::new(config_file_path())
    }

    /// Uses `key` instead of [`GLOBAL_LEVEL_KEY`] as the reserved key.
    #[must_use]
    pub fn with_global_key(mut self, key: impl Into<String>) -> Self {
        self.global_key = key.into();
        self
    }

    /// Config file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reserved key carrying the global default.
    #[must_use]
    pub fn global_key(&self) -> &str {
        &self.global_key
    }

    /// Reads the raw document.
    pub fn read(&self) -> Result<String, ConfigError> {
        fs::read_to_string(&self.path).map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                ConfigError::NotFound {
                    path: self.path.clone(),
                }
            } else {
                ConfigError::Read {
                    path: self.path.clone(),
                    source,
                }
            }
        })
    }

    /// Parses `text` with this loader's reserved key.
    pub fn parse(&self, text: &str) -> Result<LevelDocument, ConfigError> {
        parse_level_document(text, &self.global_key).map_err(|source| ConfigError::Parse {
            path: self.path.clone(),
            source,
        })
    }

    /// Reads, parses and installs the document.
    ///
    /// On any error the registry is left exactly as it was.
    pub fn load(&self, registry: &LevelRegistry) -> Result<LoadReport, ConfigError> {
        let text = self.read()?;
        tracing::info!(
            target: "scopelog::config",
            path = %self.path.display(),
            "found log level config file"
        );
        let document = self.parse(&text)?;

        let report = LoadReport {
            path: self.path.clone(),
            global_level: document.global_level.clone(),
            effective_global_level: document.effective_global_level().to_owned(),
            installed: document.overrides.len(),
            dropped: document.dropped.clone(),
        };
        tracing::info!(
            target: "scopelog::config",
            global_level = document.effective_global_level(),
            overrides = ?document.overrides,
            dropped = ?document.dropped,
            "setting levels"
        );
        document.install(registry);
        Ok(report)
    }

    /// Like [`load`](Self::load) but reports failures on the operator channel
    /// instead of returning them.
    pub fn load_logged(&self, registry: &LevelRegistry) -> Option<LoadReport> {
        match self.load(registry) {
            Ok(report) => Some(report),
            Err(err) if err.is_not_found() => {
                tracing::info!(target: "scopelog::config", "{err}");
                None
            }
            Err(err) => {
                tracing::warn!(target: "scopelog::config", "{err}");
                None
            }
        }
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::from_current_dir()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod truthiness_tests {
        use super::*;
        use serde_json::json;

        #[test]
        fn falsy_values_are_dropped() {
            for value in [json!(null), json!(false), json!(0), json!(0.0), json!("")] {
                assert_eq!(truthy_level(&value), None, "{value}");
            }
        }

        #[test]
        fn strings_are_kept_verbatim() {
            assert_eq!(truthy_level(&json!("warn")).as_deref(), Some("warn"));
            assert_eq!(truthy_level(&json!(" ")).as_deref(), Some(" "));
        }

        #[test]
        fn other_truthy_values_keep_json_text() {
            assert_eq!(truthy_level(&json!(true)).as_deref(), Some("true"));
            assert_eq!(truthy_level(&json!(3)).as_deref(), Some("3"));
            assert_eq!(truthy_level(&json!([])).as_deref(), Some("[]"));
        }
    }

    mod document_tests {
        use super::*;

        #[test]
        fn reserved_key_is_split_out() {
            let doc = parse_level_document(r#"{"globalLevel":"silent","a":"warn"}"#, GLOBAL_LEVEL_KEY)
                .expect("valid");
            assert_eq!(doc.global_level.as_deref(), Some("silent"));
            assert!(!doc.overrides.contains_key(GLOBAL_LEVEL_KEY));
            assert_eq!(doc.overrides.get("a").map(String::as_str), Some("warn"));
        }

        #[test]
        fn falsy_reserved_key_is_ignored_and_not_installed() {
            let doc = parse_level_document(r#"{"globalLevel":"","a":"warn"}"#, GLOBAL_LEVEL_KEY)
                .expect("valid");
            assert_eq!(doc.global_level, None);
            assert!(!doc.overrides.contains_key(GLOBAL_LEVEL_KEY));
            assert!(doc.dropped.is_empty());
        }

        #[test]
        fn custom_reserved_key() {
            let doc = parse_level_document(r#"{"default":"dev","globalLevel":"warn"}"#, "default")
                .expect("valid");
            assert_eq!(doc.global_level.as_deref(), Some("dev"));
            assert_eq!(
                doc.overrides.get(GLOBAL_LEVEL_KEY).map(String::as_str),
                Some("warn")
            );
        }

        #[test]
        fn non_object_documents_are_rejected() {
            let err = parse_level_document("[1, 2]", GLOBAL_LEVEL_KEY).expect_err("array");
            assert!(matches!(err, DocumentError::NotAnObject { found: "an array" }));
            assert_eq!(err.to_string(), "expected a JSON object, found an array");
        }

        #[test]
        fn syntax_errors_are_reported() {
            let err = parse_level_document("{ nope", GLOBAL_LEVEL_KEY).expect_err("broken");
            assert!(matches!(err, DocumentError::Syntax(_)));
        }

        #[test]
        fn install_restores_default_when_document_has_none() {
            let registry = LevelRegistry::with_global_level("warn");
            let doc = parse_level_document(r#"{"a":"dev"}"#, GLOBAL_LEVEL_KEY).expect("valid");
            assert_eq!(doc.effective_global_level(), DEFAULT_GLOBAL_LEVEL.name());
            doc.install(&registry);
            assert_eq!(&*registry.global_level(), DEFAULT_GLOBAL_LEVEL.name());
            assert_eq!(registry.get("a").as_deref(), Some("dev"));
        }

        #[test]
        fn install_uses_document_level_when_present() {
            let registry = LevelRegistry::new();
            let doc = parse_level_document(r#"{"globalLevel":"creator"}"#, GLOBAL_LEVEL_KEY)
                .expect("valid");
            assert_eq!(doc.effective_global_level(), "creator");
            doc.install(&registry);
            assert_eq!(&*registry.global_level(), "creator");
        }
    }

    mod error_tests {
        use super::*;

        #[test]
        fn kinds_and_paths() {
            let path = PathBuf::from("/nowhere/loglevels.json");
            let err = ConfigError::NotFound { path: path.clone() };
            assert_eq!(err.kind(), ConfigErrorKind::NotFound);
            assert_eq!(err.path(), path.as_path());
            assert!(err.is_not_found());

            let err = ConfigError::Read {
                path: path.clone(),
                source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
            };
            assert_eq!(err.kind(), ConfigErrorKind::Read);
            assert!(err.to_string().contains("denied"));
            assert!(std::error::Error::source(&err).is_some());
        }

        #[test]
        fn default_loader_targets_working_directory() {
            let loader = ConfigLoader::default();
            assert!(loader.path().ends_with(CONFIG_FILE_NAME));
            assert_eq!(loader.global_key(), GLOBAL_LEVEL_KEY);
        }
    }
}
