use std::collections::HashMap;
use std::fs;
use std::path::Path;

use calamine::{Data, Reader, open_workbook_auto};
use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use serde_json::Value;
use tracing::info;

use crate::table::{ColumnMap, TransactionTable, build_table};
use crate::{ReportError, ReportResult};

const EXPORT_DATETIME_FORMAT: &str = "%d.%m.%Y %H:%M:%S";
const WORKBOOK_EXTENSIONS: [&str; 4] = ["xlsx", "xlsm", "xlsb", "xls"];

/// Header row plus untyped cells, before any field mapping.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
enum SourceFormat {
    Workbook,
    Json,
    Csv,
}

impl SourceFormat {
    fn from_path(path: &Path) -> Self {
        let extension = path
            .extension()
            .and_then(|value| value.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        if WORKBOOK_EXTENSIONS.contains(&extension.as_str()) {
            return Self::Workbook;
        }
        if extension == "json" {
            return Self::Json;
        }
        Self::Csv
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::Workbook => "workbook",
            Self::Json => "json",
            Self::Csv => "csv",
        }
    }
}

pub fn load_table(path: &Path, columns: &ColumnMap) -> ReportResult<TransactionTable> {
    let raw = read_source(path)?;
    build_table(&raw, columns)
}

pub fn read_source(path: &Path) -> ReportResult<RawTable> {
    let format = SourceFormat::from_path(path);
    let raw = match format {
        SourceFormat::Workbook => read_workbook(path)?,
        SourceFormat::Json => {
            let content = read_text(path)?;
            parse_json_rows(path, &content)?
        }
        SourceFormat::Csv => {
            let content = read_text(path)?;
            parse_csv_rows(path, &content)?
        }
    };

    info!(
        path = %path.display(),
        format = format.as_str(),
        rows = raw.rows.len(),
        "loaded transaction source"
    );
    Ok(raw)
}

fn read_text(path: &Path) -> ReportResult<String> {
    let content =
        fs::read_to_string(path).map_err(|error| ReportError::load_failed(path, &error.to_string()))?;
    Ok(content.trim_start_matches('\u{feff}').to_string())
}

fn read_workbook(path: &Path) -> ReportResult<RawTable> {
    let mut workbook =
        open_workbook_auto(path).map_err(|error| ReportError::load_failed(path, &error.to_string()))?;

    let Some(sheet_name) = workbook.sheet_names().first().cloned() else {
        return Err(ReportError::load_failed(path, "the workbook has no sheets"));
    };

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|error| ReportError::load_failed(path, &error.to_string()))?;

    let mut rows = range.rows();
    let Some(header_row) = rows.next() else {
        return Err(ReportError::empty_source(path));
    };

    let headers = header_row
        .iter()
        .map(|cell| cell_text(cell).unwrap_or_default().trim().to_string())
        .collect::<Vec<String>>();
    if headers.iter().all(String::is_empty) {
        return Err(ReportError::empty_source(path));
    }

    let body = rows
        .map(|row| row.iter().map(cell_text).collect::<Vec<Option<String>>>())
        .filter(|cells| cells.iter().any(Option::is_some))
        .collect();

    Ok(RawTable {
        headers,
        rows: body,
    })
}

fn cell_text(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty => None,
        Data::String(value) => Some(value.clone()),
        Data::Float(value) => Some(value.to_string()),
        Data::Int(value) => Some(value.to_string()),
        Data::Bool(value) => Some(value.to_string()),
        Data::DateTime(value) => excel_serial_to_datetime(value.as_f64())
            .map(|datetime| datetime.format(EXPORT_DATETIME_FORMAT).to_string()),
        Data::DateTimeIso(value) | Data::DurationIso(value) => Some(value.clone()),
        Data::Error(_) => None,
    }
}

/// Excel serial dates count days from 1899-12-30; the fraction is the time of day.
///
/// Serials outside chrono's date range give `None`, so the cell reads as empty.
fn excel_serial_to_datetime(serial: f64) -> Option<NaiveDateTime> {
    if !serial.is_finite() {
        return None;
    }
    let base = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
    let days = TimeDelta::try_days(serial.floor() as i64)?;
    let seconds = TimeDelta::try_seconds(((serial - serial.floor()) * 86_400.0).round() as i64)?;
    base.checked_add_signed(days)?.checked_add_signed(seconds)
}

pub(crate) fn parse_csv_rows(path: &Path, content: &str) -> ReportResult<RawTable> {
    let Some(first_line) = content.lines().find(|line| !line.trim().is_empty()) else {
        return Err(ReportError::empty_source(path));
    };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .delimiter(sniff_delimiter(first_line))
        .from_reader(content.as_bytes());

    let headers = reader
        .headers()
        .map_err(|_| ReportError::load_failed(path, "CSV header row is missing or unreadable"))?
        .iter()
        .map(|value| value.trim().to_string())
        .collect::<Vec<String>>();

    let mut rows = Vec::new();
    for result_row in reader.records() {
        let record = result_row
            .map_err(|_| ReportError::load_failed(path, "CSV rows are malformed or not UTF-8"))?;
        rows.push(
            record
                .iter()
                .map(|value| {
                    if value.trim().is_empty() {
                        None
                    } else {
                        Some(value.to_string())
                    }
                })
                .collect(),
        );
    }

    Ok(RawTable { headers, rows })
}

fn sniff_delimiter(header_line: &str) -> u8 {
    let semicolons = header_line.matches(';').count();
    let commas = header_line.matches(',').count();
    if semicolons > commas { b';' } else { b',' }
}

pub(crate) fn parse_json_rows(path: &Path, content: &str) -> ReportResult<RawTable> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Err(ReportError::empty_source(path));
    }

    let parsed = serde_json::from_str::<Value>(trimmed)
        .map_err(|error| ReportError::load_failed(path, &format!("invalid JSON: {error}")))?;
    let Some(items) = parsed.as_array() else {
        return Err(ReportError::load_failed(
            path,
            "JSON input must be a top-level array of row objects",
        ));
    };

    let mut headers: Vec<String> = Vec::new();
    let mut index_by_name: HashMap<String, usize> = HashMap::new();
    for item in items {
        let Some(object) = item.as_object() else {
            return Err(ReportError::load_failed(
                path,
                "JSON array entries must all be objects",
            ));
        };
        for key in object.keys() {
            if !index_by_name.contains_key(key) {
                index_by_name.insert(key.clone(), headers.len());
                headers.push(key.clone());
            }
        }
    }

    let rows = items
        .iter()
        .filter_map(Value::as_object)
        .map(|object| {
            headers
                .iter()
                .map(|header| read_optional_string(object.get(header)))
                .collect()
        })
        .collect();

    Ok(RawTable { headers, rows })
}

fn read_optional_string(value: Option<&Value>) -> Option<String> {
    let current = value?;

    if current.is_null() {
        return None;
    }

    if let Some(string_value) = current.as_str() {
        if string_value.trim().is_empty() {
            return None;
        }
        return Some(string_value.to_string());
    }

    if let Some(number_value) = current.as_f64() {
        return Some(number_value.to_string());
    }

    Some(current.to_string())
}
