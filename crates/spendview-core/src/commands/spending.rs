use std::path::Path;

use crate::commands::common::{load_transactions, resolve_settings, write_report};
use crate::contracts::envelope::{SuccessEnvelope, success};
use crate::report::spending_report;
use crate::window::{DateField, parse_reference_instant};
use crate::{ReportError, ReportResult};

pub struct SpendingOptions<'a> {
    pub path: &'a Path,
    pub category: &'a str,
    pub at: &'a str,
    pub months: Option<u32>,
    pub date_field: Option<DateField>,
    pub save: Option<&'a Path>,
    pub settings_override: Option<&'a Path>,
    pub home_override: Option<&'a Path>,
}

pub fn run_with_options(options: SpendingOptions<'_>) -> ReportResult<SuccessEnvelope> {
    let category = options.category.trim();
    if category.is_empty() {
        return Err(ReportError::invalid_argument_for_command(
            "`--category` must not be empty.",
            Some("spending"),
        ));
    }
    let reference = parse_reference_instant(options.at)?;
    let settings = resolve_settings(options.home_override, options.settings_override)?;
    let table = load_transactions(options.path, &settings)?;

    let mut config = settings.report.clone();
    if let Some(months) = options.months {
        config.category_window_months = months;
    }
    if let Some(date_field) = options.date_field {
        config.category_date_field = date_field;
    }

    let report = spending_report(&table, category, reference, &config)?;
    if let Some(save_path) = options.save {
        write_report(save_path, &report)?;
    }
    success("spending", report)
}
