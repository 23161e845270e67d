use std::path::Path;

use crate::ReportResult;
use crate::commands::common::{load_transactions, resolve_settings};
use crate::contracts::envelope::{SuccessEnvelope, success};
use crate::report::cashback_categories_report;

pub struct CashbackOptions<'a> {
    pub path: &'a Path,
    pub year: i32,
    pub month: u32,
    pub settings_override: Option<&'a Path>,
    pub home_override: Option<&'a Path>,
}

pub fn run_with_options(options: CashbackOptions<'_>) -> ReportResult<SuccessEnvelope> {
    let settings = resolve_settings(options.home_override, options.settings_override)?;
    let table = load_transactions(options.path, &settings)?;
    let report = cashback_categories_report(&table, options.year, options.month)?;
    success("cashback", report)
}
