use std::path::Path;

use serde_json::{Value, json};
use thiserror::Error;

pub(crate) const LOAD_ERROR: &str = "load_error";
pub(crate) const INVALID_DATE_FORMAT: &str = "invalid_date_format";
pub(crate) const MISSING_COLUMN: &str = "missing_column";
pub(crate) const INVALID_ROUNDING_STEP: &str = "invalid_rounding_step";
pub(crate) const INVALID_ARGUMENT: &str = "invalid_argument";

#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct ReportError {
    pub code: String,
    pub message: String,
    pub recovery_steps: Vec<String>,
    pub data: Option<Value>,
}

impl ReportError {
    pub fn new(code: &str, message: &str, recovery_steps: Vec<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.to_string(),
            recovery_steps,
            data: None,
        }
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn invalid_argument_for_command(message: &str, command: Option<&str>) -> Self {
        let help_hint = match command {
            Some(cmd) => format!("Run `spendview {cmd} --help` for usage."),
            None => "Run `spendview --help` for usage.".to_string(),
        };
        let error = Self::new(INVALID_ARGUMENT, message, vec![help_hint]);
        if let Some(cmd) = command {
            return error.with_data(json!({
                "command_hint": cmd,
            }));
        }
        error
    }

    pub fn load_failed(path: &Path, detail: &str) -> Self {
        let location = path.display().to_string();
        Self::new(
            LOAD_ERROR,
            &format!("Could not load transactions from `{location}`: {detail}"),
            vec![
                "Verify the path exists and is readable.".to_string(),
                "Export the statement as .xlsx, .csv or a JSON array of row objects.".to_string(),
            ],
        )
        .with_data(json!({
            "path": location,
        }))
    }

    pub fn empty_source(path: &Path) -> Self {
        Self::load_failed(path, "the source has no header row")
    }

    pub fn invalid_date_format(field_name: &str, received: &str, expected: &str) -> Self {
        Self::new(
            INVALID_DATE_FORMAT,
            &format!("`{field_name}` must use {expected} format; got \"{received}\"."),
            vec![format!("Pass `{field_name}` as {expected}.")],
        )
        .with_data(json!({
            "field": field_name,
            "expected": expected,
            "received": received,
        }))
    }

    pub fn missing_column(column: &str, actual_headers: Vec<String>) -> Self {
        Self::new(
            MISSING_COLUMN,
            &format!("The transaction table has no `{column}` column."),
            vec![
                "Check that the export still uses the expected header names.".to_string(),
                "Map renamed headers with the `columns` section of user_settings.json."
                    .to_string(),
            ],
        )
        .with_data(json!({
            "missing_column": column,
            "actual_headers": actual_headers,
        }))
    }

    pub fn invalid_rounding_step(step: i64) -> Self {
        Self::new(
            INVALID_ROUNDING_STEP,
            &format!("Rounding step must be a positive integer; got {step}."),
            vec!["Pass a step such as 10, 50 or 100.".to_string()],
        )
        .with_data(json!({
            "rounding_step": step,
        }))
    }

    pub fn internal_serialization(message: &str) -> Self {
        Self::new("internal_serialization_error", message, Vec::new())
    }

    pub fn report_write_failed(path: &Path, detail: &str) -> Self {
        let location = path.display().to_string();
        Self::new(
            "internal_report_write_failed",
            &format!("Could not write report to `{location}`: {detail}"),
            vec![format!("Grant write access to `{location}` or choose another path.")],
        )
    }
}

pub type ReportResult<T> = Result<T, ReportError>;

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::ReportError;

    #[test]
    fn missing_column_carries_headers_in_data() {
        let error = ReportError::missing_column("Номер карты", vec!["Дата операции".to_string()]);
        assert_eq!(error.code, "missing_column");
        assert!(error.message.contains("Номер карты"));
        let data = error.data.unwrap_or_default();
        assert_eq!(data["actual_headers"][0], "Дата операции");
    }

    #[test]
    fn load_error_names_the_path() {
        let error = ReportError::load_failed(Path::new("/tmp/operations.xlsx"), "not found");
        assert_eq!(error.code, "load_error");
        assert!(error.message.contains("/tmp/operations.xlsx"));
        assert!(!error.recovery_steps.is_empty());
    }
}
