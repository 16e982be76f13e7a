//! Configuration management for career lens

use crate::error::{CareerLensError, Result};
use crate::processing::RoleCatalog;
use log::info;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub history: HistoryConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Role catalog file (.json or .toml); the built-in catalog when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryConfig {
    pub enabled: bool,
    pub path: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub detailed: bool,
    pub color_output: bool,
    pub pretty_json: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    Console,
    Json,
    Markdown,
    Html,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        let path = dirs::data_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("career-lens")
            .join("history.jsonl");

        Self { enabled: true, path }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Console,
            detailed: false,
            color_output: true,
            pretty_json: true,
        }
    }
}

impl Config {
    /// Load from `path`, or the default location; a missing file is created with defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = path.map(Path::to_path_buf).unwrap_or_else(Self::config_path);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = toml::from_str(&content)
                .map_err(|e| CareerLensError::Configuration(format!("Failed to parse config: {}", e)))?;
            Ok(config)
        } else {
            let config = Self::default();
            config.save_to(&config_path)?;
            info!("Wrote default configuration to {}", config_path.display());
            Ok(config)
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| CareerLensError::Configuration(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("career-lens")
            .join("config.toml")
    }

    /// Resolve the role catalog: an explicit override wins over the configured path
    pub fn load_catalog(&self, override_path: Option<&Path>) -> Result<RoleCatalog> {
        match override_path.or(self.catalog.path.as_deref()) {
            Some(path) => {
                info!("Loading role catalog from {}", path.display());
                RoleCatalog::load(path)
            }
            None => RoleCatalog::builtin(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_load_creates_default_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let config = Config::load(Some(&path)).unwrap();
        assert!(path.exists());
        assert!(config.history.enabled);
        assert_eq!(config.output.format, OutputFormat::Console);
        assert!(config.catalog.path.is_none());
    }

    #[test]
    fn test_round_trips_through_toml() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = Config::default();
        config.catalog.path = Some(PathBuf::from("/tmp/roles.json"));
        config.output.format = OutputFormat::Markdown;
        config.history.enabled = false;
        config.save_to(&path).unwrap();

        let loaded = Config::load(Some(&path)).unwrap();
        assert_eq!(loaded.catalog.path, Some(PathBuf::from("/tmp/roles.json")));
        assert_eq!(loaded.output.format, OutputFormat::Markdown);
        assert!(!loaded.history.enabled);
    }

    #[test]
    fn test_missing_sections_fall_back_to_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[output]\nformat = \"Json\"\ndetailed = true\ncolor_output = false\npretty_json = false\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.output.format, OutputFormat::Json);
        assert!(config.history.enabled);
        assert_eq!(config.history.path, HistoryConfig::default().path);
        assert!(config.catalog.path.is_none());

        std::fs::write(&path, "").unwrap();
        let empty = Config::load(Some(&path)).unwrap();
        assert_eq!(empty.output.format, OutputFormat::Console);
    }

    #[test]
    fn test_invalid_config_is_reported() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "catalog = 42").unwrap();

        let err = Config::load(Some(&path)).unwrap_err();
        assert!(matches!(err, CareerLensError::Configuration(_)));
    }

    #[test]
    fn test_catalog_override_wins() {
        let dir = tempdir().unwrap();
        let catalog_path = dir.path().join("roles.json");
        std::fs::write(&catalog_path, r#"{"Tester": ["selenium"]}"#).unwrap();

        let config = Config::default();
        let catalog = config.load_catalog(Some(&catalog_path)).unwrap();
        assert_eq!(catalog.role_names().collect::<Vec<_>>(), vec!["Tester"]);

        let builtin = config.load_catalog(None).unwrap();
        assert!(builtin.len() > 1);
    }
}
