//! CLI settings (`~/.config/verdant/settings.toml`).
//!
//! Every field has a default, so a missing file and an empty file behave the
//! same. The file is only ever written whole, through a temp file and rename.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::CliError;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct Settings {
    pub catalog: CatalogSettings,
    pub import: ImportSettings,
    pub moderation: ModerationSettings,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct CatalogSettings {
    /// Database file; unset means the platform data directory.
    pub db_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct ImportSettings {
    /// Files or directories imported when `verdant import` gets no arguments.
    pub sources: Vec<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct ModerationSettings {
    /// User ids allowed to moderate.
    pub admins: Vec<String>,
}

/// Canonical path to the settings file: `~/.config/verdant/settings.toml`.
pub(crate) fn settings_path() -> PathBuf {
    let config = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    config.join("verdant").join("settings.toml")
}

/// Default database location: `<data dir>/verdant/catalog.db`.
pub(crate) fn default_db_path() -> PathBuf {
    let data = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
    data.join("verdant").join("catalog.db")
}

impl Settings {
    pub(crate) fn load() -> Result<Self, CliError> {
        Self::load_from(&settings_path())
    }

    /// Read settings from `path`. A missing file yields the defaults.
    pub(crate) fn load_from(path: &Path) -> Result<Self, CliError> {
        let contents = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => {
                return Err(CliError::config(format!(
                    "Cannot read {}: {}",
                    path.display(),
                    e
                )));
            }
        };
        toml::from_str(&contents)
            .map_err(|e| CliError::config(format!("Invalid {}: {}", path.display(), e)))
    }

    /// Write settings to `path` atomically.
    pub(crate) fn save_to(&self, path: &Path) -> Result<(), CliError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let serialized = toml::to_string_pretty(self)
            .map_err(|e| CliError::config(format!("Cannot serialize settings: {}", e)))?;
        let tmp = path.with_extension("toml.tmp");
        std::fs::write(&tmp, &serialized)?;
        std::fs::rename(&tmp, path)?;
        Ok(())
    }

    /// Resolve the database path using a priority chain:
    ///
    /// 1. CLI override (if `Some`)
    /// 2. `catalog.db_path` in `settings.toml`
    /// 3. The platform data directory
    pub(crate) fn resolve_db_path(&self, cli_override: Option<PathBuf>) -> PathBuf {
        cli_override
            .or_else(|| self.catalog.db_path.clone())
            .unwrap_or_else(default_db_path)
    }

    pub(crate) fn is_admin(&self, user_id: &str) -> bool {
        self.moderation.admins.iter().any(|a| a == user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let tmp = tempfile::TempDir::new().unwrap();
        let settings = Settings::load_from(&tmp.path().join("nope.toml")).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn partial_file_fills_defaults() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("settings.toml");
        std::fs::write(&path, "[moderation]\nadmins = [\"root\", \"gardener\"]\n").unwrap();

        let settings = Settings::load_from(&path).unwrap();
        assert!(settings.is_admin("gardener"));
        assert!(!settings.is_admin("visitor"));
        assert!(settings.catalog.db_path.is_none());
        assert!(settings.import.sources.is_empty());
    }

    #[test]
    fn invalid_file_is_config_error() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("settings.toml");
        std::fs::write(&path, "[moderation\nadmins = 3").unwrap();
        assert!(matches!(Settings::load_from(&path), Err(CliError::Config(_))));
    }

    #[test]
    fn save_then_load() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("nested").join("settings.toml");
        let mut settings = Settings::default();
        settings.catalog.db_path = Some(PathBuf::from("/srv/verdant/catalog.db"));
        settings.import.sources = vec![PathBuf::from("data/plants")];

        settings.save_to(&path).unwrap();
        assert!(!path.with_extension("toml.tmp").exists());
        assert_eq!(Settings::load_from(&path).unwrap(), settings);
    }

    #[test]
    fn db_path_priority() {
        let mut settings = Settings::default();
        assert_eq!(settings.resolve_db_path(None), default_db_path());

        settings.catalog.db_path = Some(PathBuf::from("from-settings.db"));
        assert_eq!(
            settings.resolve_db_path(None),
            PathBuf::from("from-settings.db")
        );
        assert_eq!(
            settings.resolve_db_path(Some(PathBuf::from("flag.db"))),
            PathBuf::from("flag.db")
        );
    }
}
