//! Dashboard Configuration
//! Defaults, optional JSON file, then command-line overrides.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Conventional name of the sales workbook.
pub const DEFAULT_DATA_FILE: &str = "vendedores.xlsx";

/// Config file picked up from the working directory when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "dashboard.json";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Runtime settings for the dashboard window and data source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Workbook (or CSV export) holding the representative records
    pub data_path: PathBuf,
    /// Worksheet to read; first sheet when unset
    pub sheet: Option<String>,
    /// Initial window size in logical pixels
    pub window_size: [f32; 2],
    /// Pixel size of exported chart images
    pub chart_size: [u32; 2],
    /// Directory the export dialog starts in
    pub export_dir: Option<PathBuf>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_FILE),
            sheet: None,
            window_size: [1400.0, 900.0],
            chart_size: [1000, 700],
            export_dir: None,
        }
    }
}

/// Values supplied on the command line; `None` keeps the file/default value.
#[derive(Debug, Default, Clone)]
pub struct ConfigOverrides {
    pub data_path: Option<PathBuf>,
    pub sheet: Option<String>,
}

impl DashboardConfig {
    /// Parse a JSON config file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Resolve the effective configuration.
    ///
    /// An explicit `config_path` must exist. Without one, `dashboard.json` in
    /// the working directory is used if present, otherwise the defaults.
    pub fn resolve(
        config_path: Option<&Path>,
        overrides: ConfigOverrides,
    ) -> Result<Self, ConfigError> {
        let mut config = match config_path {
            Some(path) => {
                info!("Loading config from {}", path.display());
                Self::from_file(path)?
            }
            None if Path::new(DEFAULT_CONFIG_FILE).is_file() => {
                info!("Loading config from {}", DEFAULT_CONFIG_FILE);
                Self::from_file(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => {
                debug!("No config file, using defaults");
                Self::default()
            }
        };

        config.apply(overrides);
        Ok(config)
    }

    /// Apply command-line overrides on top of the loaded values.
    pub fn apply(&mut self, overrides: ConfigOverrides) {
        if let Some(path) = overrides.data_path {
            self.data_path = path;
        }
        if overrides.sheet.is_some() {
            self.sheet = overrides.sheet;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_conventional_workbook() {
        let config = DashboardConfig::default();
        assert_eq!(config.data_path, PathBuf::from("vendedores.xlsx"));
        assert!(config.sheet.is_none());
    }

    #[test]
    fn partial_json_keeps_remaining_defaults() {
        let config: DashboardConfig =
            serde_json::from_str(r#"{ "data_path": "datos/ventas.xlsx", "sheet": "Q1" }"#)
                .unwrap();
        assert_eq!(config.data_path, PathBuf::from("datos/ventas.xlsx"));
        assert_eq!(config.sheet.as_deref(), Some("Q1"));
        assert_eq!(config.chart_size, DashboardConfig::default().chart_size);
    }

    #[test]
    fn overrides_replace_only_given_values() {
        let mut config = DashboardConfig {
            sheet: Some("Q1".to_string()),
            ..Default::default()
        };
        config.apply(ConfigOverrides {
            data_path: Some(PathBuf::from("otro.xlsx")),
            sheet: None,
        });
        assert_eq!(config.data_path, PathBuf::from("otro.xlsx"));
        assert_eq!(config.sheet.as_deref(), Some("Q1"));
    }

    #[test]
    fn explicit_missing_config_is_an_error() {
        let result = DashboardConfig::resolve(
            Some(Path::new("no/such/dir/dashboard.json")),
            ConfigOverrides::default(),
        );
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }
}
