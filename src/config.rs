/// Run configuration for the surf buoy service.
///
/// Loaded from `surfbuoy.toml` (or the path given with `--config`); every
/// section and key is optional and falls back to the defaults below. A
/// `.env` file is honoured for `SURFBUOY_API_BASE_URL`, which overrides
/// `api.base_url`. Command-line flags are applied on top by `main`.
///
/// ```toml
/// [api]
/// base_url = "https://api.surfbuoys.com/wavedata/stationId"
///
/// [waves]
/// num_readings = 15
/// input = "buoydata.json"
/// output = "parsed_buoydata.json"
///
/// [wind]
/// num_readings = 6
/// input = "klih1_input.json"
/// output = "kahului_wind.json"
///
/// [report]
/// output = "surf_report.json"
///
/// [logging]
/// level = "info"
/// file = "surfbuoy.log"
/// ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::ingest::surfbuoys::SURFBUOYS_BASE_URL;
use crate::logging::LogLevel;
use crate::model::BuoyError;
use crate::normalize::waves::DEFAULT_WAVE_READINGS;
use crate::normalize::wind::DEFAULT_WIND_READINGS;
use crate::stations::WIND_STATION_ID;

/// Config file read when no `--config` is given.
pub const DEFAULT_CONFIG_PATH: &str = "surfbuoy.toml";

/// Environment variable overriding `api.base_url`.
pub const BASE_URL_ENV: &str = "SURFBUOY_API_BASE_URL";

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub api: ApiConfig,
    pub waves: WavesConfig,
    pub wind: WindConfig,
    pub report: ReportConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ApiConfig {
    pub base_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: SURFBUOYS_BASE_URL.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WavesConfig {
    pub num_readings: usize,
    pub input: PathBuf,
    pub output: PathBuf,
}

impl Default for WavesConfig {
    fn default() -> Self {
        Self {
            num_readings: DEFAULT_WAVE_READINGS,
            input: PathBuf::from("buoydata.json"),
            output: PathBuf::from("parsed_buoydata.json"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WindConfig {
    pub num_readings: usize,
    pub input: PathBuf,
    pub output: PathBuf,
    pub station_id: String,
}

impl Default for WindConfig {
    fn default() -> Self {
        Self {
            num_readings: DEFAULT_WIND_READINGS,
            input: PathBuf::from("klih1_input.json"),
            output: PathBuf::from("kahului_wind.json"),
            station_id: WIND_STATION_ID.to_string(),
        }
    }
}

/// Combined wave + wind document written by `surfbuoy report`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReportConfig {
    pub output: PathBuf,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output: PathBuf::from("surf_report.json"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    pub level: String,
    pub file: Option<String>,
    /// Full timestamped lines on the console instead of the compact form.
    pub timestamps: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
            timestamps: false,
        }
    }
}

impl Config {
    /// Loads configuration.
    ///
    /// With `path == None` the default file is read if it exists, otherwise
    /// built-in defaults are used. An explicitly given path must exist.
    /// Callers apply their own overrides and then call `validate`.
    pub fn load(path: Option<&Path>) -> Result<Self, BuoyError> {
        let mut config = match path {
            Some(p) => Self::from_file(p)?,
            None if Path::new(DEFAULT_CONFIG_PATH).exists() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_PATH))?
            }
            None => Self::default(),
        };

        dotenv::dotenv().ok();
        config.apply_env_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, BuoyError> {
        let content = fs::read_to_string(path).map_err(|e| {
            BuoyError::Config(format!("Failed to read config file '{}': {}", path.display(), e))
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, BuoyError> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }

    /// Applies environment overrides using `lookup` to read variables.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(BASE_URL_ENV).filter(|u| !u.trim().is_empty()) {
            self.api.base_url = url.trim().to_string();
        }
    }

    pub fn validate(&self) -> Result<(), BuoyError> {
        if self.waves.num_readings == 0 {
            return Err(BuoyError::Config("waves.num_readings must be at least 1".into()));
        }
        if self.wind.num_readings == 0 {
            return Err(BuoyError::Config("wind.num_readings must be at least 1".into()));
        }
        if self.api.base_url.trim().is_empty() {
            return Err(BuoyError::Config("api.base_url must not be empty".into()));
        }
        if self.wind.station_id.trim().is_empty() {
            return Err(BuoyError::Config("wind.station_id must not be empty".into()));
        }
        self.log_level()?;
        Ok(())
    }

    pub fn log_level(&self) -> Result<LogLevel, BuoyError> {
        self.logging.level.parse().map_err(BuoyError::Config)
    }
}
