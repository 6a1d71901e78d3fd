//! Shared fixtures for scopelog integration tests.
//!
//! [`ConfigDir`] owns a temporary directory holding a `loglevels.json` file
//! that tests rewrite, corrupt or delete while a loader or watcher points at
//! it. [`wait_until`] polls a condition for background-thread assertions.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};

use tempfile::TempDir;

/// File name the loader looks for in the working directory.
pub const CONFIG_FILE_NAME: &str = "loglevels.json";

/// Temporary directory with a level configuration file inside it.
#[derive(Debug)]
pub struct ConfigDir {
    dir: TempDir,
}

impl ConfigDir {
    /// Creates an empty directory; the config file does not exist yet.
    pub fn new() -> io::Result<Self> {
        Ok(Self {
            dir: TempDir::new()?,
        })
    }

    /// Creates a directory whose config file holds `value`.
    pub fn with_json(value: &serde_json::Value) -> io::Result<Self> {
        let dir = Self::new()?;
        dir.write_json(value)?;
        Ok(dir)
    }

    /// Directory root.
    #[must_use]
    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Full path of the config file, whether or not it exists.
    #[must_use]
    pub fn config_path(&self) -> PathBuf {
        self.dir.path().join(CONFIG_FILE_NAME)
    }

    /// Replaces the config file with the pretty-printed JSON `value`.
    pub fn write_json(&self, value: &serde_json::Value) -> io::Result<()> {
        let text = serde_json::to_string_pretty(value).map_err(io::Error::other)?;
        self.write_raw(&text)
    }

    /// Replaces the config file with arbitrary text.
    ///
    /// The text is written to a sibling file and renamed into place so a
    /// concurrent reader never sees a half-written document.
    pub fn write_raw(&self, text: &str) -> io::Result<()> {
        let staging = self.dir.path().join(".loglevels.json.tmp");
        fs::write(&staging, text)?;
        fs::rename(staging, self.config_path())
    }

    /// Deletes the config file. Missing files are not an error.
    pub fn remove(&self) -> io::Result<()> {
        match fs::remove_file(self.config_path()) {
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            other => other,
        }
    }

    /// Replaces the config file with a directory of the same name so that
    /// reading it fails even though the path exists.
    pub fn make_unreadable(&self) -> io::Result<()> {
        self.remove()?;
        fs::create_dir(self.config_path())
    }
}

/// Polls `condition` every 10 ms until it holds or `timeout` elapses.
///
/// Returns whether the condition was eventually observed.
pub fn wait_until(timeout: Duration, mut condition: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    loop {
        if condition() {
            return true;
        }
        if Instant::now() >= deadline {
            return false;
        }
        thread::sleep(Duration::from_millis(10));
    }
}
