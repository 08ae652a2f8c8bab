//! Light/dark display theme with a persisted preference.
//!
//! [`ThemeManager`] picks the initial theme (stored preference, then the
//! system colour scheme, then light), applies it to a [`ThemeTarget`], and
//! flips it on demand. The three collaborators are traits so the manager
//! works against a browser-like document, a config file, or test doubles.

pub mod document;
pub mod store;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use document::{Document, Element};
pub use store::{EnvAppearance, FixedAppearance, JsonFileStore, MemoryStore};

/// Storage key the preference is persisted under
pub const THEME_STORAGE_KEY: &str = "pdm-theme";

/// Root attribute holding the active theme
pub const THEME_ATTRIBUTE: &str = "data-theme";

/// Element id of the optional toggle button
pub const TOGGLE_ELEMENT_ID: &str = "theme-toggle";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
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

    /// Icon shown on the toggle: the theme a click switches to
    pub fn toggle_icon(self) -> &'static str {
        match self {
            Theme::Light => "🌙",
            Theme::Dark => "☀️",
        }
    }

    pub fn toggle_label(self) -> &'static str {
        match self {
            Theme::Light => "Switch to dark mode",
            Theme::Dark => "Switch to light mode",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown theme '{0}'")]
pub struct UnknownTheme(pub String);

impl FromStr for Theme {
    type Err = UnknownTheme;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(UnknownTheme(other.to_string())),
        }
    }
}

/// Key/value persistence for the preference (the browser's local storage)
pub trait PreferenceStore {
    fn get(&self, key: &str) -> Option<String>;

    /// Persist a value. Failures are logged by the implementation, not returned.
    fn set(&self, key: &str, value: &str);
}

/// No storage available: nothing is read, writes are dropped
impl<S: PreferenceStore> PreferenceStore for Option<S> {
    fn get(&self, key: &str) -> Option<String> {
        self.as_ref().and_then(|store| store.get(key))
    }

    fn set(&self, key: &str, value: &str) {
        if let Some(store) = self {
            store.set(key, value);
        }
    }
}

/// The operating system's colour scheme preference
pub trait SystemAppearance {
    /// `Some(true)` for dark, `Some(false)` for light, `None` when unknown
    fn prefers_dark(&self) -> Option<bool>;
}

/// Where the active theme is rendered
pub trait ThemeTarget {
    fn root_attribute(&self, name: &str) -> Option<String>;

    fn set_root_attribute(&mut self, name: &str, value: &str);

    /// Update the toggle control's icon and accessible label. No-op when
    /// there is no control.
    fn update_toggle(&mut self, icon: &str, label: &str);
}

#[derive(Debug)]
pub struct ThemeManager<S, A, T> {
    store: S,
    appearance: A,
    target: T,
}

impl<S, A, T> ThemeManager<S, A, T>
where
    S: PreferenceStore,
    A: SystemAppearance,
    T: ThemeTarget,
{
    /// Build the manager and apply the initial theme to `target`
    pub fn new(store: S, appearance: A, target: T) -> Self {
        let mut manager = Self {
            store,
            appearance,
            target,
        };
        let theme = manager.get_initial_theme();
        manager.apply_theme(theme);
        manager
    }

    /// Stored preference wins, then the system preference, then light
    pub fn get_initial_theme(&self) -> Theme {
        if let Some(stored) = self.store.get(THEME_STORAGE_KEY) {
            match stored.parse::<Theme>() {
                Ok(theme) => return theme,
                Err(e) => tracing::debug!("Ignoring stored theme: {}", e),
            }
        }

        match self.appearance.prefers_dark() {
            Some(true) => Theme::Dark,
            Some(false) | None => Theme::Light,
        }
    }

    pub fn apply_theme(&mut self, theme: Theme) {
        self.target.set_root_attribute(THEME_ATTRIBUTE, theme.as_str());
        self.target
            .update_toggle(theme.toggle_icon(), theme.toggle_label());
    }

    /// Theme currently rendered on the target
    pub fn current_theme(&self) -> Option<Theme> {
        self.target
            .root_attribute(THEME_ATTRIBUTE)
            .and_then(|value| value.parse().ok())
    }

    /// Flip the rendered theme, persist it, and return the new theme.
    ///
    /// Anything other than `dark` on the target counts as light, so an
    /// unset attribute toggles to dark.
    pub fn toggle_theme(&mut self) -> Theme {
        let next = self.current_theme().unwrap_or_default().toggled();

        self.store.set(THEME_STORAGE_KEY, next.as_str());
        self.apply_theme(next);
        tracing::debug!("Theme switched to {}", next);
        next
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn target(&self) -> &T {
        &self.target
    }

    pub fn target_mut(&mut self) -> &mut T {
        &mut self.target
    }
}
