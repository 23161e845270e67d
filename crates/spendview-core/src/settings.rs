use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{info, warn};

use crate::ReportResult;
use crate::error::ReportError;
use crate::quotes::http::DEFAULT_TARGET_CURRENCY;
use crate::report::ReportConfig;
use crate::table::ColumnMap;

pub const HOME_ENV: &str = "SPENDVIEW_HOME";
pub const SETTINGS_FILE_NAME: &str = "user_settings.json";

/// Contents of `user_settings.json`. Every key is optional.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct UserSettings {
    pub user_currencies: Vec<String>,
    pub user_stocks: Vec<String>,
    pub target_currency: String,
    pub columns: ColumnMap,
    pub report: ReportConfig,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            user_currencies: Vec::new(),
            user_stocks: Vec::new(),
            target_currency: DEFAULT_TARGET_CURRENCY.to_string(),
            columns: ColumnMap::default(),
            report: ReportConfig::default(),
        }
    }
}

pub fn resolve_home(home_override: Option<&Path>) -> ReportResult<PathBuf> {
    let candidate = match home_override {
        Some(path) => path.to_path_buf(),
        None => {
            if let Some(override_path) = std::env::var_os(HOME_ENV) {
                PathBuf::from(override_path)
            } else if let Some(home_path) = home::home_dir() {
                home_path.join(".spendview")
            } else {
                return Err(ReportError::new(
                    "internal_home_unresolved",
                    "Could not resolve a home directory for spendview.",
                    vec![format!("Set {HOME_ENV} to a writable directory.")],
                ));
            }
        }
    };

    absolutize(&candidate)
}

pub fn settings_path(home: &Path) -> PathBuf {
    home.join(SETTINGS_FILE_NAME)
}

pub fn logs_dir(home: &Path) -> PathBuf {
    home.join("logs")
}

/// Reads settings, falling back to defaults when the file is absent or malformed.
pub fn load_settings(path: &Path) -> UserSettings {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
            info!(path = %path.display(), "no settings file; using defaults");
            return UserSettings::default();
        }
        Err(error) => {
            warn!(path = %path.display(), %error, "could not read settings; using defaults");
            return UserSettings::default();
        }
    };

    match serde_json::from_str::<UserSettings>(&raw) {
        Ok(settings) => {
            info!(
                path = %path.display(),
                currencies = settings.user_currencies.len(),
                stocks = settings.user_stocks.len(),
                "loaded settings"
            );
            settings
        }
        Err(error) => {
            warn!(path = %path.display(), %error, "malformed settings; using defaults");
            UserSettings::default()
        }
    }
}

fn absolutize(path: &Path) -> ReportResult<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }

    std::env::current_dir()
        .map(|cwd| cwd.join(path))
        .map_err(|error| {
            ReportError::new(
                "internal_home_unresolved",
                &format!("Could not resolve `{}`: {error}", path.display()),
                Vec::new(),
            )
        })
}
