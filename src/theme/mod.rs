//! Light/dark theme preference
//!
//! The preference lives in a [`ThemeStore`] as a boolean-as-string under a
//! single key (`"true"` means dark). When nothing is stored the ambient
//! color-scheme signal decides. The active theme is mirrored onto the display
//! surface as an attribute (`data-theme` by default).

mod store;

pub use store::{CookieThemeStore, FileThemeStore, MemoryThemeStore};

use std::fmt;

use crate::error::StoreError;
use crate::view::Surface;

/// Display theme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn is_dark(self) -> bool {
        self == Theme::Dark
    }

    /// Decode a persisted dark-mode flag
    pub fn from_stored(value: &str) -> Option<Self> {
        match serde_json::from_str::<bool>(value.trim()) {
            Ok(true) => Some(Theme::Dark),
            Ok(false) => Some(Theme::Light),
            Err(_) => {
                tracing::warn!("Ignoring unreadable theme preference {:?}", value);
                None
            }
        }
    }

    /// Encode as a persisted dark-mode flag
    pub fn stored_value(self) -> &'static str {
        if self.is_dark() {
            "true"
        } else {
            "false"
        }
    }

    /// Read the `Sec-CH-Prefers-Color-Scheme` client hint
    pub fn from_client_hint(hint: Option<&str>) -> Self {
        match hint.map(|h| h.trim().trim_matches('"')) {
            Some(h) if h.eq_ignore_ascii_case("dark") => Theme::Dark,
            _ => Theme::Light,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Durable home of the theme preference
pub trait ThemeStore {
    fn get(&self) -> Option<Theme>;
    fn set(&mut self, theme: Theme) -> Result<(), StoreError>;
}

/// Keeps the persisted preference and the surface attribute in step
pub struct ThemeController<S> {
    store: S,
    attribute: String,
    theme: Theme,
}

impl<S: ThemeStore> ThemeController<S> {
    /// Pick the initial theme and apply it to `surface`
    pub fn load(store: S, ambient: Theme, attribute: &str, surface: &mut Surface) -> Self {
        let theme = store.get().unwrap_or(ambient);
        tracing::debug!("Initial theme: {}", theme);
        surface.set_attribute(attribute, theme.as_str());
        Self {
            store,
            attribute: attribute.to_string(),
            theme,
        }
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Flip the theme, persisting it before it is applied
    ///
    /// On a store failure neither the state nor the surface changes.
    pub fn toggle(&mut self, surface: &mut Surface) -> Result<Theme, StoreError> {
        let next = self.theme.toggled();
        self.store.set(next)?;
        surface.set_attribute(&self.attribute, next.as_str());
        self.theme = next;
        Ok(next)
    }
}
