//! Geocoder configuration.
//!
//! Settings are fixed when the geocoder is constructed; there is no way to
//! change them on a live instance.
use serde::de::Error;
use std::path::PathBuf;

/// Default file name of the reference dataset.
pub const DEFAULT_DATA_FILE: &str = "rg_cities1000.csv";

/// Geocoder configuration
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Log load progress, skipped rows and rejected queries at info/warn
    /// level instead of debug.
    #[serde(default)]
    pub verbose: bool,

    /// CSV dataset read when no other source is supplied
    #[serde(default = "Config::default_data_path")]
    pub data_path: PathBuf,
}

impl Config {
    fn default_data_path() -> PathBuf {
        PathBuf::from(DEFAULT_DATA_FILE)
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn with_data_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.data_path = path.into();
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.data_path.as_os_str().is_empty() {
            return Err("Data path must not be empty".to_string());
        }
        Ok(())
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let config: Config = serde_json::from_str(json)?;
        if let Err(e) = config.validate() {
            return Err(Error::custom(e));
        }
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    #[cfg(feature = "toml")]
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        let config: Config = toml::from_str(toml_str)?;
        if let Err(e) = config.validate() {
            return Err(toml::de::Error::custom(e));
        }
        Ok(config)
    }

    #[cfg(feature = "toml")]
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            verbose: false,
            data_path: Self::default_data_path(),
        }
    }
}
