use std::path::Path;

use tracing::warn;

use crate::ReportResult;
use crate::commands::common::{load_transactions, resolve_settings};
use crate::contracts::envelope::{SuccessEnvelope, success};
use crate::quotes::{HttpQuoteSource, OfflineQuotes, QuoteEndpoints, QuoteSource, fetch_snapshot};
use crate::report::assemble;
use crate::window::parse_reference_instant;

pub struct OverviewOptions<'a> {
    pub path: &'a Path,
    pub at: &'a str,
    pub offline: bool,
    pub settings_override: Option<&'a Path>,
    pub home_override: Option<&'a Path>,
    pub quotes_override: Option<&'a dyn QuoteSource>,
}

pub fn run_with_options(options: OverviewOptions<'_>) -> ReportResult<SuccessEnvelope> {
    let reference = parse_reference_instant(options.at)?;
    let settings = resolve_settings(options.home_override, options.settings_override)?;
    let table = load_transactions(options.path, &settings)?;

    let http_source;
    let source: &dyn QuoteSource = match options.quotes_override {
        Some(source) => source,
        None if options.offline => &OfflineQuotes,
        None => match HttpQuoteSource::new(QuoteEndpoints::from_env(&settings.target_currency)) {
            Ok(source) => {
                http_source = source;
                &http_source
            }
            Err(error) => {
                warn!(code = error.code.as_str(), %error, "quotes unavailable; continuing offline");
                &OfflineQuotes
            }
        },
    };
    let snapshot = fetch_snapshot(source, &settings.user_currencies, &settings.user_stocks);

    let report = assemble(reference, &table, &settings.report, snapshot)?;
    success("overview", report)
}
