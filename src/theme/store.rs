//! Preference stores and system appearance sources.

use std::collections::{BTreeMap, HashMap};
use std::env;
use std::path::{Path, PathBuf};

use parking_lot::RwLock;

use super::{PreferenceStore, SystemAppearance};

/// Process-local store, shared through `&self`
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.read().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.values
            .write()
            .insert(key.to_string(), value.to_string());
    }
}

/// Preferences persisted as a flat JSON object on disk.
///
/// An unreadable or corrupt file reads as empty; write failures are logged.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> BTreeMap<String, String> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return BTreeMap::new(),
            Err(e) => {
                tracing::warn!("Failed to read preferences {}: {}", self.path.display(), e);
                return BTreeMap::new();
            }
        };

        serde_json::from_str(&contents).unwrap_or_else(|e| {
            tracing::warn!("Failed to parse preferences {}: {}", self.path.display(), e);
            BTreeMap::new()
        })
    }

    fn save(&self, values: &BTreeMap<String, String>) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(values)?;
        std::fs::write(&self.path, json)
    }
}

impl PreferenceStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.load().remove(key)
    }

    fn set(&self, key: &str, value: &str) {
        let mut values = self.load();
        values.insert(key.to_string(), value.to_string());
        if let Err(e) = self.save(&values) {
            tracing::warn!("Failed to save preferences {}: {}", self.path.display(), e);
        }
    }
}

/// A fixed answer, for hosts that know the scheme up front
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedAppearance(pub Option<bool>);

impl SystemAppearance for FixedAppearance {
    fn prefers_dark(&self) -> Option<bool> {
        self.0
    }
}

/// Reads `PDM_COLOR_SCHEME` (`dark` or `light`)
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvAppearance;

impl EnvAppearance {
    pub const VAR: &'static str = "PDM_COLOR_SCHEME";

    fn parse(value: &str) -> Option<bool> {
        match value.trim().to_lowercase().as_str() {
            "dark" => Some(true),
            "light" => Some(false),
            _ => None,
        }
    }
}

impl SystemAppearance for EnvAppearance {
    fn prefers_dark(&self) -> Option<bool> {
        env::var(Self::VAR).ok().and_then(|v| Self::parse(&v))
    }
}
