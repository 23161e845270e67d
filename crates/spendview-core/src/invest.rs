use serde::{Deserialize, Serialize};
use tracing::info;

use crate::contracts::types::InvestmentReport;
use crate::table::{AmountField, Field, TransactionTable, build::round_to};
use crate::window::{DateField, format_display_date};
use crate::{ReportError, ReportResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvestTransaction {
    pub date: String,
    pub amount: f64,
}

/// Spare change for one spend: `step - (|amount| mod step)`, in `(0, step]`.
pub fn contribution(amount: f64, rounding_step: i64) -> f64 {
    let step = rounding_step as f64;
    step - amount.abs() % step
}

/// Round-up total over transactions whose `date` contains `month`.
pub fn invest(
    month: &str,
    transactions: &[InvestTransaction],
    rounding_step: i64,
) -> ReportResult<InvestmentReport> {
    if rounding_step <= 0 {
        return Err(ReportError::invalid_rounding_step(rounding_step));
    }

    let mut total_amount = 0.0;
    let mut matched = 0usize;
    for transaction in transactions
        .iter()
        .filter(|transaction| transaction.date.contains(month))
    {
        total_amount = round_to(
            total_amount + contribution(transaction.amount, rounding_step),
            2,
        );
        matched += 1;
    }

    info!(month, rounding_step, matched, total_amount, "computed round-up");
    Ok(InvestmentReport {
        month: month.to_string(),
        rounding_step,
        total_amount,
    })
}

/// Adapts table rows into round-up input with ISO dates.
///
/// Payment columns fall back to their operation counterparts when the export lacks them.
pub fn investment_transactions(
    table: &TransactionTable,
    date_field: DateField,
    amount_field: AmountField,
) -> Vec<InvestTransaction> {
    let date_field = if date_field == DateField::Payment && !table.has_column(Field::PaymentDate)
    {
        DateField::Operation
    } else {
        date_field
    };
    let amount_field =
        if amount_field == AmountField::PaymentAmount && !table.has_column(Field::PaymentAmount) {
            AmountField::Amount
        } else {
            amount_field
        };

    table
        .records()
        .iter()
        .filter_map(|record| {
            let date = date_field.value(record)?;
            let amount = amount_field.value(record)?;
            Some(InvestTransaction {
                date: format_display_date(date),
                amount,
            })
        })
        .collect()
}
