//! Operator theme and locale preferences.

use crate::profile::{keys, ProfileStore};
use crate::Result;

pub const DEFAULT_PRIMARY: &str = "#6C63FF";
pub const DEFAULT_SIDER: &str = "#111827";
pub const DEFAULT_CONTENT: &str = "#ffffff";
pub const DEFAULT_LOCALE: &str = "vi";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemePrefs {
    pub primary: String,
    pub sider: String,
    pub content: String,
    pub locale: String,
}

impl Default for ThemePrefs {
    fn default() -> Self {
        Self {
            primary: DEFAULT_PRIMARY.to_string(),
            sider: DEFAULT_SIDER.to_string(),
            content: DEFAULT_CONTENT.to_string(),
            locale: DEFAULT_LOCALE.to_string(),
        }
    }
}

impl ThemePrefs {
    /// Loads stored preferences, filling gaps with the defaults.
    pub fn load(profile: &ProfileStore) -> Self {
        let defaults = Self::default();
        Self {
            primary: profile
                .get_or_default::<Option<String>>(keys::THEME_PRIMARY)
                .unwrap_or(defaults.primary),
            sider: profile
                .get_or_default::<Option<String>>(keys::THEME_SIDER)
                .unwrap_or(defaults.sider),
            content: profile
                .get_or_default::<Option<String>>(keys::THEME_CONTENT)
                .unwrap_or(defaults.content),
            locale: profile
                .get_or_default::<Option<String>>(keys::THEME_LOCALE)
                .unwrap_or(defaults.locale),
        }
    }

    /// Persists all four entries.
    pub fn save(&self, profile: &ProfileStore) -> Result<()> {
        profile.put(keys::THEME_PRIMARY, &self.primary)?;
        profile.put(keys::THEME_SIDER, &self.sider)?;
        profile.put(keys::THEME_CONTENT, &self.content)?;
        profile.put(keys::THEME_LOCALE, &self.locale)?;
        Ok(())
    }
}
