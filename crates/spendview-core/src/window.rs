use chrono::{Datelike, Months, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::table::{Field, TransactionRecord, TransactionTable};
use crate::{ReportError, ReportResult};

pub const REFERENCE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const RECORD_DATETIME_FORMATS: [&str; 4] = [
    "%d.%m.%Y %H:%M:%S",
    "%d.%m.%Y %H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
];
const RECORD_DATE_FORMATS: [&str; 2] = ["%d.%m.%Y", "%Y-%m-%d"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowKind {
    MonthToDate,
    TrailingMonths(u32),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateField {
    #[default]
    Operation,
    Payment,
}

impl DateField {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Operation => "operation",
            Self::Payment => "payment",
        }
    }

    pub(crate) const fn column(self) -> Field {
        match self {
            Self::Operation => Field::OperationDate,
            Self::Payment => Field::PaymentDate,
        }
    }

    pub fn value(self, record: &TransactionRecord) -> Option<&str> {
        match self {
            Self::Operation => Some(record.operation_date.as_str()),
            Self::Payment => record.payment_date.as_deref(),
        }
    }
}

/// Closed interval `[start, end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl ReportWindow {
    pub fn new(kind: WindowKind, reference: NaiveDateTime) -> Self {
        let start = match kind {
            WindowKind::MonthToDate => start_of_month(reference),
            WindowKind::TrailingMonths(months) => trailing_start(reference, months),
        };
        Self {
            start,
            end: reference,
        }
    }

    pub fn contains(&self, instant: NaiveDateTime) -> bool {
        self.start <= instant && instant <= self.end
    }
}

pub fn parse_reference_instant(value: &str) -> ReportResult<NaiveDateTime> {
    let trimmed = value.trim();
    if let Ok(parsed) = NaiveDateTime::parse_from_str(trimmed, REFERENCE_FORMAT) {
        return Ok(parsed);
    }
    if let Ok(parsed) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(parsed.and_time(NaiveTime::MIN));
    }
    Err(ReportError::invalid_date_format(
        "reference",
        value,
        "YYYY-MM-DD HH:MM:SS",
    ))
}

/// Parses the export's `DD.MM.YYYY[ HH:MM:SS]` dates (and their ISO equivalents).
pub fn parse_record_date(value: &str) -> Option<NaiveDateTime> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    for format in RECORD_DATETIME_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(parsed);
        }
    }
    for format in RECORD_DATE_FORMATS {
        if let Ok(parsed) = NaiveDate::parse_from_str(trimmed, format) {
            return Some(parsed.and_time(NaiveTime::MIN));
        }
    }
    None
}

/// `16.02.2018` -> `2018-02-16`; unparseable input comes back unchanged.
pub fn format_display_date(value: &str) -> String {
    match parse_record_date(value) {
        Some(parsed) => format_iso_date(&parsed.date()),
        None => value.to_string(),
    }
}

pub fn format_iso_date(date: &NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub fn format_reference(instant: &NaiveDateTime) -> String {
    instant.format(REFERENCE_FORMAT).to_string()
}

pub fn start_of_month(instant: NaiveDateTime) -> NaiveDateTime {
    let date = instant.date();
    NaiveDate::from_ymd_opt(date.year(), date.month(), 1)
        .unwrap_or(date)
        .and_time(NaiveTime::MIN)
}

/// `months` calendar months before `reference`, day clamped to the target month.
///
/// Ranges reaching past the earliest representable date start at `NaiveDateTime::MIN`.
pub fn trailing_start(reference: NaiveDateTime, months: u32) -> NaiveDateTime {
    reference
        .checked_sub_months(Months::new(months))
        .unwrap_or(NaiveDateTime::MIN)
}

/// Borrows the rows whose `date_field` falls inside the window; the table is untouched.
pub fn filter<'a>(
    table: &'a TransactionTable,
    reference: NaiveDateTime,
    kind: WindowKind,
    date_field: DateField,
) -> ReportResult<Vec<&'a TransactionRecord>> {
    table.require_column(date_field.column())?;
    Ok(filter_window(
        table,
        &ReportWindow::new(kind, reference),
        date_field,
    ))
}

pub fn filter_window<'a>(
    table: &'a TransactionTable,
    window: &ReportWindow,
    date_field: DateField,
) -> Vec<&'a TransactionRecord> {
    let mut skipped = 0usize;
    let kept = table
        .records()
        .iter()
        .filter(|record| {
            let parsed = date_field.value(record).and_then(parse_record_date);
            match parsed {
                Some(instant) => window.contains(instant),
                None => {
                    debug!(
                        row = record.row,
                        date_field = date_field.as_str(),
                        "excluding row with unparseable date"
                    );
                    skipped += 1;
                    false
                }
            }
        })
        .collect::<Vec<&TransactionRecord>>();

    debug!(
        start = %format_reference(&window.start),
        end = %format_reference(&window.end),
        kept = kept.len(),
        skipped,
        "applied date window"
    );
    kept
}
