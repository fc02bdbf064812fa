use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// A product configuration to watch, identified by the vendor part number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartConfig {
    /// Human-readable label used in notifications, e.g. `"Cosmic Orange 256GB"`.
    #[serde(default)]
    pub name: Option<String>,
    pub part_number: String,
}

impl PartConfig {
    /// Label shown in rendered snapshots: the configured name, or the part
    /// number when no name is set.
    #[must_use]
    pub fn label(&self) -> &str {
        self.name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or(&self.part_number)
    }
}

/// The parts and pickup stores checked on every run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchList {
    pub parts: Vec<PartConfig>,
    pub stores: Vec<String>,
}

impl WatchList {
    /// Looks up the display label for a part number, falling back to the
    /// part number itself for parts the watch list does not know.
    #[must_use]
    pub fn label_for<'a>(&'a self, part_number: &'a str) -> &'a str {
        self.parts
            .iter()
            .find(|p| p.part_number == part_number)
            .map_or(part_number, PartConfig::label)
    }
}

/// Load and validate the watch list from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_watchlist(path: &Path) -> Result<WatchList, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::WatchListIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let watchlist: WatchList = serde_yaml::from_str(&content)?;

    validate_watchlist(&watchlist)?;

    Ok(watchlist)
}

fn validate_watchlist(watchlist: &WatchList) -> Result<(), ConfigError> {
    if watchlist.parts.is_empty() {
        return Err(ConfigError::Validation(
            "watch list must name at least one part".to_string(),
        ));
    }
    if watchlist.stores.is_empty() {
        return Err(ConfigError::Validation(
            "watch list must name at least one store".to_string(),
        ));
    }

    let mut seen_parts = HashSet::new();
    for part in &watchlist.parts {
        let number = part.part_number.trim();
        if number.is_empty() {
            return Err(ConfigError::Validation(
                "part number must be non-empty".to_string(),
            ));
        }
        if number != part.part_number {
            return Err(ConfigError::Validation(format!(
                "part number '{}' has leading or trailing whitespace",
                part.part_number
            )));
        }
        if !seen_parts.insert(number.to_uppercase()) {
            return Err(ConfigError::Validation(format!(
                "duplicate part number: '{number}'"
            )));
        }
    }

    let mut seen_stores = HashSet::new();
    for store in &watchlist.stores {
        let id = store.trim();
        if id.is_empty() {
            return Err(ConfigError::Validation(
                "store identifier must be non-empty".to_string(),
            ));
        }
        if id != store {
            return Err(ConfigError::Validation(format!(
                "store identifier '{store}' has leading or trailing whitespace"
            )));
        }
        if !seen_stores.insert(id.to_uppercase()) {
            return Err(ConfigError::Validation(format!(
                "duplicate store identifier: '{id}'"
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "watchlist_test.rs"]
mod tests;
