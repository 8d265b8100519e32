//! Theme stores: in memory, a JSON file, and a browser cookie

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use super::{Theme, ThemeStore};
use crate::error::StoreError;

/// One year, in seconds
const COOKIE_MAX_AGE: u32 = 31_536_000;

/// Preference held in memory, as its persisted string form
#[derive(Debug, Clone, Default)]
pub struct MemoryThemeStore {
    value: Option<String>,
}

impl MemoryThemeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(theme: Theme) -> Self {
        Self {
            value: Some(theme.stored_value().to_string()),
        }
    }

    /// The stored string, if any
    pub fn raw(&self) -> Option<&str> {
        self.value.as_deref()
    }
}

impl ThemeStore for MemoryThemeStore {
    fn get(&self) -> Option<Theme> {
        self.value.as_deref().and_then(Theme::from_stored)
    }

    fn set(&mut self, theme: Theme) -> Result<(), StoreError> {
        self.value = Some(theme.stored_value().to_string());
        Ok(())
    }
}

/// A key/value JSON file, one of whose keys holds the preference
#[derive(Debug, Clone)]
pub struct FileThemeStore {
    path: PathBuf,
    key: String,
}

impl FileThemeStore {
    pub fn new<P: AsRef<Path>>(path: P, key: &str) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            key: key.to_string(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<BTreeMap<String, String>, StoreError> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

impl ThemeStore for FileThemeStore {
    fn get(&self) -> Option<Theme> {
        match self.read() {
            Ok(entries) => entries.get(&self.key).and_then(|v| Theme::from_stored(v)),
            Err(e) => {
                tracing::warn!("Failed to read theme store {:?}: {}", self.path, e);
                None
            }
        }
    }

    fn set(&mut self, theme: Theme) -> Result<(), StoreError> {
        // an unreadable file is replaced rather than blocking the toggle
        let mut entries = self.read().unwrap_or_default();
        entries.insert(self.key.clone(), theme.stored_value().to_string());

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(&entries)?)?;
        Ok(())
    }
}

/// Preference carried by a request cookie; writes become a `Set-Cookie` value
#[derive(Debug, Clone)]
pub struct CookieThemeStore {
    key: String,
    value: Option<String>,
    changed: bool,
}

impl CookieThemeStore {
    /// Pick `key` out of a `Cookie` request header
    pub fn from_header(header: Option<&str>, key: &str) -> Self {
        let value = header.and_then(|header| {
            header.split(';').find_map(|pair| {
                let (name, value) = pair.trim().split_once('=')?;
                (name == key).then(|| value.trim().to_string())
            })
        });

        Self {
            key: key.to_string(),
            value,
            changed: false,
        }
    }

    /// `Set-Cookie` value for the response, once the preference was written
    pub fn set_cookie(&self) -> Option<String> {
        if !self.changed {
            return None;
        }
        let value = self.value.as_deref()?;
        Some(format!(
            "{}={}; Path=/; Max-Age={}; SameSite=Lax",
            self.key, value, COOKIE_MAX_AGE
        ))
    }
}

impl ThemeStore for CookieThemeStore {
    fn get(&self) -> Option<Theme> {
        self.value.as_deref().and_then(Theme::from_stored)
    }

    fn set(&mut self, theme: Theme) -> Result<(), StoreError> {
        self.value = Some(theme.stored_value().to_string());
        self.changed = true;
        Ok(())
    }
}
