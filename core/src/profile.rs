//! Operator profile storage.
//!
//! One JSON file per key under the profile directory. The footprint is a
//! handful of small keys (credential, read state, theme), so plain files
//! stand in for an embedded database.

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

use crate::Result;

/// Well-known profile keys.
pub mod keys {
    pub const ADMIN_TOKEN: &str = "admin_token";
    pub const ADMIN_USER: &str = "admin_user";
    pub const READ_ANNOUNCEMENTS: &str = "read_announcements";
    pub const READ_FEEDBACKS: &str = "read_feedbacks";
    pub const THEME_PRIMARY: &str = "theme_primary";
    pub const THEME_SIDER: &str = "theme_sider";
    pub const THEME_CONTENT: &str = "theme_content";
    pub const THEME_LOCALE: &str = "theme_locale";
}

pub struct ProfileStore {
    dir: PathBuf,
}

impl ProfileStore {
    pub fn new(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    /// Serializes and writes a value under the given key.
    pub fn put<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(value)?;
        fs::write(self.path_for(key), bytes)?;
        Ok(())
    }

    /// Reads the value under the given key.
    ///
    /// A missing file is `Ok(None)`; a file that fails to decode is an error.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let path = self.path_for(key);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_slice(&bytes)?))
    }

    /// Like [`get`](Self::get) but treats a missing or corrupt value as the
    /// type's default. A corrupt value is logged and left on disk untouched.
    pub fn get_or_default<T: DeserializeOwned + Default>(&self, key: &str) -> T {
        match self.get(key) {
            Ok(Some(value)) => value,
            Ok(None) => T::default(),
            Err(e) => {
                warn!(key, error = %e, "profile value unreadable, using default");
                T::default()
            }
        }
    }

    /// Removes the value under the given key. Removing an absent key is a no-op.
    pub fn delete(&self, key: &str) -> Result<()> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.path_for(key).exists()
    }
}
