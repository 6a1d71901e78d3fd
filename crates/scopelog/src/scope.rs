//! crates/scopelog/src/scope.rs
//! Logger identity and the ordered scope-key rules used to resolve levels.
//!
//! Resolution walks [`SCOPE_RULES`] from the most to the least specific rule
//! and stops at the first key present in the override table:
//!
//! | # | Rule                    | Example key                    |
//! |---|-------------------------|--------------------------------|
//! | 1 | source > class.method   | `Filename.ts > Class.method`   |
//! | 2 | source > class          | `Filename.ts > Class`          |
//! | 3 | source > function       | `Filename.ts > function`       |
//! | 4 | source                  | `Filename.ts`                  |
//! | 5 | class.method            | `Class.method`                 |
//! | 6 | class                   | `Class`                        |
//! | 7 | function                | `function`                     |
//!
//! When nothing matches, the global default applies. File-qualified keys are
//! also accepted in compact form without spaces (`Filename.ts>Class.method`).
//! The class is the explicit class name when one was set, otherwise the
//! source name up to its first `.`.

use std::collections::HashMap;

/// Separator between the source name and the rest of a file-qualified key.
pub const SOURCE_SEPARATOR: &str = " > ";

const COMPACT_SOURCE_SEPARATOR: &str = ">";

/// Identity fields a logger is scoped by.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct ScopeIdentity {
    source_name: String,
    class_name: Option<String>,
    function_name: Option<String>,
    method_name: Option<String>,
}

impl ScopeIdentity {
    /// Identity with only a source name.
    pub fn new(source_name: impl Into<String>) -> Self {
        Self {
            source_name: source_name.into(),
            ..Self::default()
        }
    }

    /// Originating file or module name.
    #[must_use]
    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    /// Source name with everything from the first `.` removed.
    ///
    /// ```
    /// use scopelog::ScopeIdentity;
    ///
    /// assert_eq!(ScopeIdentity::new("Filename.ts").base_name(), "Filename");
    /// assert_eq!(ScopeIdentity::new("archive.tar.gz").base_name(), "archive");
    /// assert_eq!(ScopeIdentity::new("Makefile").base_name(), "Makefile");
    /// ```
    #[must_use]
    pub fn base_name(&self) -> &str {
        self.source_name
            .split_once('.')
            .map_or(self.source_name.as_str(), |(base, _)| base)
    }

    /// Class name explicitly set on the identity, if any.
    #[must_use]
    pub fn explicit_class_name(&self) -> Option<&str> {
        self.class_name.as_deref()
    }

    /// Class name used for keys and prefixes: explicit or derived.
    #[must_use]
    pub fn class_name(&self) -> &str {
        self.class_name.as_deref().unwrap_or_else(|| self.base_name())
    }

    /// Function name, if set.
    #[must_use]
    pub fn function_name(&self) -> Option<&str> {
        self.function_name.as_deref()
    }

    /// Method name, if set.
    #[must_use]
    pub fn method_name(&self) -> Option<&str> {
        self.method_name.as_deref()
    }

    /// Sets or clears the explicit class name.
    pub fn set_class_name(&mut self, class_name: Option<String>) {
        self.class_name = class_name;
    }

    /// Sets or clears the function name.
    pub fn set_function_name(&mut self, function_name: Option<String>) {
        self.function_name = function_name;
    }

    /// Sets or clears the method name.
    pub fn set_method_name(&mut self, method_name: Option<String>) {
        self.method_name = method_name;
    }

    /// Candidate keys of every rule, most specific first.
    ///
    /// Mostly useful for diagnostics: it shows which table entries would
    /// affect a logger with this identity.
    #[must_use]
    pub fn scope_keys(&self) -> Vec<String> {
        SCOPE_RULES
            .iter()
            .flat_map(|rule| rule.candidates(self))
            .collect()
    }
}

/// One step of the precedence chain.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ScopeRule {
    /// `source > class.method`
    SourceClassMethod,
    /// `source > class`
    SourceClass,
    /// `source > function`
    SourceFunction,
    /// `source`
    Source,
    /// `class.method`
    ClassMethod,
    /// `class`
    Class,
    /// `function`
    Function,
}

/// Precedence order, most specific first.
pub const SCOPE_RULES: [ScopeRule; 7] = [
    ScopeRule::SourceClassMethod,
    ScopeRule::SourceClass,
    ScopeRule::SourceFunction,
    ScopeRule::Source,
    ScopeRule::ClassMethod,
    ScopeRule::Class,
    ScopeRule::Function,
];

impl ScopeRule {
    /// Unqualified part of the key, or `None` if the identity lacks a field
    /// the rule needs.
    fn scoped_part(self, identity: &ScopeIdentity) -> Option<String> {
        match self {
            Self::SourceClassMethod | Self::ClassMethod => identity
                .method_name()
                .map(|method| format!("{}.{method}", identity.class_name())),
            Self::SourceClass | Self::Class => Some(identity.class_name().to_owned()),
            Self::SourceFunction | Self::Function => identity.function_name().map(str::to_owned),
            Self::Source => Some(identity.source_name().to_owned()),
        }
    }

    const fn is_source_qualified(self) -> bool {
        matches!(
            self,
            Self::SourceClassMethod | Self::SourceClass | Self::SourceFunction
        )
    }

    /// Keys this rule looks up, in lookup order.
    #[must_use]
    pub fn candidates(self, identity: &ScopeIdentity) -> Vec<String> {
        let Some(part) = self.scoped_part(identity) else {
            return Vec::new();
        };
        if self.is_source_qualified() {
            let source = identity.source_name();
            vec![
                format!("{source}{SOURCE_SEPARATOR}{part}"),
                format!("{source}{COMPACT_SOURCE_SEPARATOR}{part}"),
            ]
        } else {
            vec![part]
        }
    }
}

/// Resolves the level name for `identity` against one snapshot of the table.
///
/// Returns the value of the first key found, walking [`SCOPE_RULES`] in
/// order, or `global_level` when no rule matches.
///
/// ```
/// use std::collections::HashMap;
/// use scopelog::{ScopeIdentity, resolve_level};
///
/// let table: HashMap<String, String> = [
///     ("Filename.ts > Class.method", "X"),
///     ("Class.method", "Y"),
///     ("Filename.ts", "Z"),
/// ]
/// .into_iter()
/// .map(|(k, v)| (k.to_owned(), v.to_owned()))
/// .collect();
///
/// let mut identity = ScopeIdentity::new("Filename.ts");
/// identity.set_class_name(Some("Class".into()));
/// identity.set_method_name(Some("method".into()));
///
/// assert_eq!(resolve_level(&identity, &table, "error"), "X");
/// ```
#[must_use]
pub fn resolve_level<'a>(
    identity: &ScopeIdentity,
    overrides: &'a HashMap<String, String>,
    global_level: &'a str,
) -> &'a str {
    SCOPE_RULES
        .iter()
        .flat_map(|rule| rule.candidates(identity))
        .find_map(|key| overrides.get(&key))
        .map_or(global_level, String::as_str)
}
