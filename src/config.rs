use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::calendar::Horizon;
use crate::error::Result;

const CONFIG_PATH_ENV_VAR: &str = "NATALIS_CONFIG_FILE";

pub(crate) fn find_configfile_locations() -> Vec<PathBuf> {
    let mut locations = Vec::new();

    if let Ok(path) = env::var(CONFIG_PATH_ENV_VAR) {
        locations.push(PathBuf::from(path));
    }

    if let Some(dir) = dirs::config_dir() {
        locations.push(dir.join("natalis").join("config.toml"));
    }

    if let Some(home) = dirs::home_dir() {
        locations.push(home.join(".natalis.toml"));
    }

    locations
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub store_path: Option<PathBuf>,
    pub horizon_years: u32,
    pub headsup_days: i64,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            store_path: None,
            horizon_years: 2,
            headsup_days: 7,
        }
    }
}

impl Config {
    pub fn horizon(&self) -> Horizon {
        Horizon::years(self.horizon_years)
    }

    pub fn store_path(&self) -> PathBuf {
        self.store_path
            .clone()
            .unwrap_or_else(default_store_path)
    }
}

pub fn default_store_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("natalis")
        .join("contacts.json")
}

fn load(path: &Path) -> Result<Config> {
    let raw = fs::read_to_string(path)?;
    Ok(toml::from_str(&raw)?)
}

/// Loads the explicitly given config file, or the first one found in the
/// usual locations, or the defaults when none exists.
pub fn load_suitable_config(path: Option<&Path>) -> Result<Config> {
    if let Some(path) = path {
        return load(path);
    }

    for location in find_configfile_locations() {
        if location.exists() {
            log::debug!("using config file {}", location.display());
            return load(&location);
        }
    }

    Ok(Config::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.horizon_years, 2);
        assert_eq!(config.headsup_days, 7);
        assert!(config.store_path.is_none());
    }

    #[test]
    fn parses_full_config() {
        let config: Config = toml::from_str(
            "store_path = \"/tmp/contacts.json\"\nhorizon_years = 1\nheadsup_days = 3\n",
        )
        .unwrap();
        assert_eq!(config.store_path, Some(PathBuf::from("/tmp/contacts.json")));
        assert_eq!(config.horizon_years, 1);
        assert_eq!(config.headsup_days, 3);
    }

    #[test]
    fn missing_keys_fall_back_to_defaults() {
        let config: Config = toml::from_str("headsup_days = 14\n").unwrap();
        assert_eq!(config.headsup_days, 14);
        assert_eq!(config.horizon_years, 2);
        assert_eq!(config.store_path(), default_store_path());
    }
}
