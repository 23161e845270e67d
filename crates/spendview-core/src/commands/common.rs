use std::fs;
use std::path::Path;

use serde::Serialize;
use tracing::info;

use crate::ReportResult;
use crate::error::ReportError;
use crate::settings::{UserSettings, load_settings, resolve_home, settings_path};
use crate::table::{TransactionTable, load_table};

/// `--settings` wins; otherwise `<home>/user_settings.json`.
pub(crate) fn resolve_settings(
    home_override: Option<&Path>,
    settings_override: Option<&Path>,
) -> ReportResult<UserSettings> {
    let path = match settings_override {
        Some(path) => path.to_path_buf(),
        None => settings_path(&resolve_home(home_override)?),
    };
    Ok(load_settings(&path))
}

pub(crate) fn load_transactions(
    path: &Path,
    settings: &UserSettings,
) -> ReportResult<TransactionTable> {
    load_table(path, &settings.columns)
}

/// Pretty JSON, non-ASCII kept as-is.
pub(crate) fn write_report<T>(path: &Path, report: &T) -> ReportResult<()>
where
    T: Serialize,
{
    let body = serde_json::to_string_pretty(report)
        .map_err(|error| ReportError::internal_serialization(&error.to_string()))?;
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .map_err(|error| ReportError::report_write_failed(path, &error.to_string()))?;
    }
    fs::write(path, body)
        .map_err(|error| ReportError::report_write_failed(path, &error.to_string()))?;
    info!(path = %path.display(), "saved report");
    Ok(())
}
