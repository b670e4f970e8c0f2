//! Application configuration.
//!
//! Settings come from a TOML file; every field has a default, so the file
//! and any of its sections may be omitted.

use crate::analysis::DEFAULT_TOP_N;
use crate::data::DataSources;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "PRENOMS_CONFIG";

/// Config file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "prenoms.toml";

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub data: DataSettings,
    pub dashboard: DashboardSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DataSettings {
    pub names_path: PathBuf,
    pub geo_path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DashboardSettings {
    pub top_n: usize,
    pub default_year: i32,
    pub default_name: String,
    /// Map color scheme id, e.g. "blues".
    pub palette: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: String,
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            names_path: PathBuf::from("dpt2020.csv"),
            geo_path: PathBuf::from("departements-version-simplifiee.geojson"),
        }
    }
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
            default_year: 2000,
            default_name: "Sacha".to_string(),
            palette: "blues".to_string(),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl AppConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Resolve the configuration for this process.
    ///
    /// Order: explicit path (command line), then `PRENOMS_CONFIG`, then
    /// `prenoms.toml` in the working directory, then built-in defaults.
    pub fn discover(explicit: Option<PathBuf>) -> Result<Self> {
        let candidate = explicit.or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from));
        if let Some(path) = candidate {
            return Self::from_file(path);
        }

        let local = Path::new(DEFAULT_CONFIG_FILE);
        if local.is_file() {
            return Self::from_file(local);
        }

        Ok(Self::default())
    }

    pub fn sources(&self) -> DataSources {
        DataSources {
            names_path: self.data.names_path.clone(),
            geo_path: self.data.geo_path.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.dashboard.top_n, 15);
        assert_eq!(config.dashboard.default_year, 2000);
        assert_eq!(config.data.names_path, PathBuf::from("dpt2020.csv"));
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = AppConfig::from_toml_str(
            r#"
            [data]
            names_path = "/srv/insee/dpt2020.csv"

            [dashboard]
            top_n = 10
            "#,
        )
        .unwrap();

        assert_eq!(config.data.names_path, PathBuf::from("/srv/insee/dpt2020.csv"));
        assert_eq!(
            config.data.geo_path,
            PathBuf::from("departements-version-simplifiee.geojson")
        );
        assert_eq!(config.dashboard.top_n, 10);
        assert_eq!(config.dashboard.default_name, "Sacha");
    }

    #[test]
    fn test_explicit_path_wins() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("custom.toml");
        fs::write(&path, "[logging]\nlevel = \"debug\"\n").unwrap();

        let config = AppConfig::discover(Some(path)).unwrap();

        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_invalid_file_is_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.toml");
        fs::write(&path, "[dashboard]\ntop_n = \"many\"\n").unwrap();

        let err = AppConfig::from_file(&path).unwrap_err();

        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn test_sources() {
        let config = AppConfig::default();
        let sources = config.sources();
        assert_eq!(sources.names_path, config.data.names_path);
        assert_eq!(sources.geo_path, config.data.geo_path);
    }
}
