use std::path::Path;

use crate::ReportResult;
use crate::commands::common::{load_transactions, resolve_settings};
use crate::contracts::envelope::{SuccessEnvelope, success};
use crate::invest::{invest, investment_transactions};
use crate::table::AmountField;
use crate::window::DateField;

pub struct InvestOptions<'a> {
    pub path: &'a Path,
    pub month: &'a str,
    pub rounding_step: i64,
    pub settings_override: Option<&'a Path>,
    pub home_override: Option<&'a Path>,
}

pub fn run_with_options(options: InvestOptions<'_>) -> ReportResult<SuccessEnvelope> {
    let settings = resolve_settings(options.home_override, options.settings_override)?;
    let table = load_transactions(options.path, &settings)?;
    let transactions =
        investment_transactions(&table, DateField::Payment, AmountField::PaymentAmount);
    let report = invest(options.month, &transactions, options.rounding_step)?;
    success("invest", report)
}
