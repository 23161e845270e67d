use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::aggregate::{
    DEFAULT_CASHBACK_DIVISOR, card_summaries, category_rows, category_total,
    spending_by_category_in_month,
};
use crate::contracts::types::{
    CashbackCategoriesReport, CategorySpendingReport, MainReport, QuoteSnapshot, ReportPeriod,
    TopTransaction,
};
use crate::greeting::{GreetingLabels, greeting};
use crate::rank::{DEFAULT_TOP_LIMIT, project, top_n};
use crate::table::{AmountField, Field, TransactionRecord, TransactionTable};
use crate::window::{DateField, ReportWindow, WindowKind, filter, format_reference};
use crate::ReportResult;

pub const DEFAULT_CATEGORY_WINDOW_MONTHS: u32 = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub top_limit: usize,
    pub main_window: WindowKind,
    pub main_date_field: DateField,
    pub rank_key: AmountField,
    pub category_window_months: u32,
    pub category_date_field: DateField,
    pub category_amount_field: AmountField,
    pub cashback_divisor: f64,
    pub greetings: GreetingLabels,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            top_limit: DEFAULT_TOP_LIMIT,
            main_window: WindowKind::MonthToDate,
            main_date_field: DateField::Operation,
            rank_key: AmountField::RoundedAmount,
            category_window_months: DEFAULT_CATEGORY_WINDOW_MONTHS,
            category_date_field: DateField::Payment,
            category_amount_field: AmountField::PaymentAmount,
            cashback_divisor: DEFAULT_CASHBACK_DIVISOR,
            greetings: GreetingLabels::default(),
        }
    }
}

pub fn assemble(
    reference: NaiveDateTime,
    table: &TransactionTable,
    config: &ReportConfig,
    quotes: QuoteSnapshot,
) -> ReportResult<MainReport> {
    table.require_column(Field::CardNumber)?;
    let rows = filter(table, reference, config.main_window, config.main_date_field)?;

    let cards = card_summaries(&rows, config.cashback_divisor);
    let top_transactions = top_n(&rows, config.top_limit, config.rank_key);

    info!(
        reference = %format_reference(&reference),
        rows = rows.len(),
        cards = cards.len(),
        top = top_transactions.len(),
        "assembled main report"
    );

    Ok(MainReport {
        greeting: greeting(&reference, &config.greetings),
        cards,
        top_transactions,
        currency_rates: quotes.currency_rates,
        stock_prices: quotes.stock_prices,
    })
}

pub fn spending_report(
    table: &TransactionTable,
    category: &str,
    reference: NaiveDateTime,
    config: &ReportConfig,
) -> ReportResult<CategorySpendingReport> {
    let window = ReportWindow::new(
        WindowKind::TrailingMonths(config.category_window_months),
        reference,
    );
    let amount_field = config.category_amount_field;
    let rows = category_rows(
        table,
        category,
        &window,
        config.category_date_field,
        amount_field,
    )?;

    Ok(CategorySpendingReport {
        category: category.to_string(),
        period: ReportPeriod {
            from: format_reference(&window.start),
            to: format_reference(&window.end),
        },
        total_amount: category_total(&rows, amount_field),
        transactions: matched_transactions(&rows, amount_field),
    })
}

pub fn cashback_categories_report(
    table: &TransactionTable,
    year: i32,
    month: u32,
) -> ReportResult<CashbackCategoriesReport> {
    let categories = spending_by_category_in_month(table, year, month, AmountField::Amount)?;
    Ok(CashbackCategoriesReport {
        year,
        month,
        categories,
    })
}

fn matched_transactions(
    rows: &[&TransactionRecord],
    amount_field: AmountField,
) -> Vec<TopTransaction> {
    rows.iter()
        .filter_map(|record| {
            amount_field
                .value(record)
                .map(|amount| project(record, amount))
        })
        .collect()
}
