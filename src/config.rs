use chrono::Datelike;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::calendar::{self, WeekStart};
use crate::error::{Error, Result};
use crate::locale::Translation;
use crate::source::RemoteSource;

const CONFIG_PATH_ENV_VAR: &str = "GRIDCAL_CONFIG_FILE";

pub fn find_configfile_locations() -> Vec<PathBuf> {
    let mut locations = Vec::new();

    if let Ok(path) = env::var(CONFIG_PATH_ENV_VAR) {
        locations.push(PathBuf::from(path));
    }

    if let Some(dir) = dirs::config_dir() {
        locations.push(dir.join("gridcal").join("config.toml"));
    }

    if let Some(home) = dirs::home_dir() {
        locations.push(home.join(".gridcal.toml"));
    }

    locations
}

/// Loads `path` if given, otherwise the first existing default location.
/// Falls back to the default configuration when no file exists.
pub fn load_suitable_config(path: Option<&Path>) -> Result<Config> {
    if let Some(path) = path {
        return Config::from_file(path);
    }

    for location in find_configfile_locations() {
        if location.is_file() {
            log::info!("Using configuration '{}'", location.display());
            return Config::from_file(&location);
        }
    }

    log::debug!("No configuration file found, using defaults");
    Ok(Config::default())
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct NavigationMarkup {
    #[serde(default)]
    pub prev: Option<String>,
    #[serde(default)]
    pub next: Option<String>,
}

impl Default for NavigationMarkup {
    fn default() -> Self {
        NavigationMarkup {
            prev: Some("&#9668;".to_owned()),
            next: Some("&#9658;".to_owned()),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub year: Option<i32>,
    pub month: Option<i32>,
    pub language: String,
    pub translation: Option<Translation>,
    pub week_starts: WeekStart,
    pub show_days: bool,
    pub classname: Option<String>,
    pub header_format: String,
    pub date_format: String,
    pub navigation_prev: bool,
    pub navigation_next: bool,
    pub navigation_markup: NavigationMarkup,
    pub today_markup: Option<String>,
    pub events: Option<Vec<serde_json::Value>>,
    pub ajax: Option<RemoteSource>,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            year: None,
            month: None,
            language: "en".to_owned(),
            translation: None,
            week_starts: WeekStart::default(),
            show_days: true,
            classname: None,
            header_format: "[month] [year]".to_owned(),
            date_format: "y-m-d".to_owned(),
            navigation_prev: true,
            navigation_next: true,
            navigation_markup: NavigationMarkup::default(),
            today_markup: None,
            events: None,
            ajax: None,
        }
    }
}

impl Config {
    pub fn from_file(path: &Path) -> Result<Config> {
        let content = fs::read_to_string(path).map_err(|e| {
            Error::from(e).with_msg(&format!("could not read '{}'", path.display()))
        })?;
        content.parse()
    }

    /// Year and month to show first, defaulting to the current month. Not
    /// validated here.
    pub fn initial_view(&self) -> (i32, i32) {
        let today = calendar::today();
        (
            self.year.unwrap_or_else(|| today.year()),
            self.month.unwrap_or_else(|| today.month() as i32),
        )
    }

    pub fn navigation_enabled(&self) -> bool {
        self.navigation_prev || self.navigation_next
    }
}

impl std::str::FromStr for Config {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }
}
