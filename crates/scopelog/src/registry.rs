//! crates/scopelog/src/registry.rs
//! Shared override table consulted by every logger.
//!
//! The table is kept as an [`Arc`] snapshot behind a lock that is held only
//! long enough to clone or swap the pointer. Writers build a complete new map
//! and install it in one step; readers take one snapshot per resolution and
//! walk it without holding any lock, so a reader never sees keys from two
//! generations at once.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use parking_lot::RwLock;

use crate::levels::Level;

/// Scope-key to level-name mapping.
pub type OverrideMap = HashMap<String, String>;

/// Global default used until a configuration says otherwise.
pub const DEFAULT_GLOBAL_LEVEL: Level = Level::Admin;

/// Override table plus global default level.
#[derive(Debug)]
pub struct LevelRegistry {
    overrides: RwLock<Arc<OverrideMap>>,
    global_level: RwLock<Arc<str>>,
}

impl LevelRegistry {
    /// Empty table with [`DEFAULT_GLOBAL_LEVEL`] as the default.
    #[must_use]
    pub fn new() -> Self {
        Self::with_global_level(DEFAULT_GLOBAL_LEVEL.name())
    }

    /// Empty table with the given global default.
    #[must_use]
    pub fn with_global_level(level: &str) -> Self {
        Self {
            overrides: RwLock::new(Arc::new(OverrideMap::new())),
            global_level: RwLock::new(Arc::from(level)),
        }
    }

    /// Process-wide registry shared by loggers that were not given one.
    pub fn global() -> &'static Arc<Self> {
        static GLOBAL: OnceLock<Arc<LevelRegistry>> = OnceLock::new();
        GLOBAL.get_or_init(|| Arc::new(Self::new()))
    }

    /// Current override map. The returned snapshot never changes.
    #[must_use]
    pub fn snapshot(&self) -> Arc<OverrideMap> {
        Arc::clone(&self.overrides.read())
    }

    /// Owned copy of the override map.
    #[must_use]
    pub fn overrides(&self) -> OverrideMap {
        self.snapshot().as_ref().clone()
    }

    /// Level bound to `key`, if any.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        self.overrides.read().get(key).cloned()
    }

    /// Current global default level name.
    #[must_use]
    pub fn global_level(&self) -> Arc<str> {
        Arc::clone(&self.global_level.read())
    }

    /// Replaces the global default level name.
    pub fn set_global_level(&self, level: &str) {
        *self.global_level.write() = Arc::from(level);
    }

    /// Installs `overrides` as the whole table in one step.
    pub fn replace_overrides(&self, overrides: OverrideMap) {
        *self.overrides.write() = Arc::new(overrides);
    }

    /// Binds one key, leaving the rest of the table intact.
    pub fn set_override(&self, key: impl Into<String>, level: impl Into<String>) {
        let mut guard = self.overrides.write();
        Arc::make_mut(&mut guard).insert(key.into(), level.into());
    }

    /// Unbinds one key and returns its previous level.
    pub fn remove_override(&self, key: &str) -> Option<String> {
        let mut guard = self.overrides.write();
        if !guard.contains_key(key) {
            return None;
        }
        Arc::make_mut(&mut guard).remove(key)
    }

    /// Drops every override and restores [`DEFAULT_GLOBAL_LEVEL`].
    pub fn clear(&self) {
        self.replace_overrides(OverrideMap::new());
        self.set_global_level(DEFAULT_GLOBAL_LEVEL.name());
    }
}

impl Default for LevelRegistry {
    fn default() -> Self {
        Self::new()
    }
}
