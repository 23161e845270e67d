use std::collections::{BTreeSet, HashMap};

use tracing::{debug, info};

use crate::table::{ColumnMap, Field, RawTable, TransactionRecord, TransactionTable};
use crate::{ReportError, ReportResult};

/// Maps raw cells onto logical fields, dropping rows that lack a required value.
pub fn build_table(raw: &RawTable, columns: &ColumnMap) -> ReportResult<TransactionTable> {
    let index_by_name = raw
        .headers
        .iter()
        .enumerate()
        .map(|(index, name)| (name.trim().to_string(), index))
        .collect::<HashMap<String, usize>>();

    let mut indexes: HashMap<Field, usize> = HashMap::new();
    for field in Field::ALL {
        let header = columns.header(field);
        match index_by_name.get(header) {
            Some(index) => {
                indexes.insert(field, *index);
            }
            None if field.is_required() => {
                return Err(ReportError::missing_column(header, raw.headers.clone()));
            }
            None => {}
        }
    }

    let cell = |cells: &[Option<String>], field: Field| -> Option<String> {
        let index = indexes.get(&field)?;
        let value = cells.get(*index)?.as_deref()?.trim();
        if value.is_empty() {
            None
        } else {
            Some(value.to_string())
        }
    };

    let mut records = Vec::with_capacity(raw.rows.len());
    let mut dropped = 0usize;
    for (row_index, cells) in raw.rows.iter().enumerate() {
        let row = row_index + 1;

        let Some(operation_date) = cell(cells, Field::OperationDate) else {
            debug!(row, "dropping row without operation date");
            dropped += 1;
            continue;
        };
        let Some(amount) = cell(cells, Field::Amount).as_deref().and_then(parse_amount) else {
            debug!(row, "dropping row without a numeric amount");
            dropped += 1;
            continue;
        };

        let rounded_amount = cell(cells, Field::RoundedAmount)
            .as_deref()
            .and_then(parse_amount)
            .unwrap_or_else(|| round_to(amount.abs(), 2));

        records.push(TransactionRecord {
            row,
            operation_date,
            payment_date: cell(cells, Field::PaymentDate),
            card_number: cell(cells, Field::CardNumber),
            amount,
            payment_amount: cell(cells, Field::PaymentAmount)
                .as_deref()
                .and_then(parse_amount),
            rounded_amount,
            category: cell(cells, Field::Category),
            description: cell(cells, Field::Description).unwrap_or_default(),
        });
    }

    info!(
        rows_read = raw.rows.len(),
        rows_kept = records.len(),
        rows_dropped = dropped,
        "built transaction table"
    );

    let present = indexes.keys().copied().collect::<BTreeSet<Field>>();
    Ok(TransactionTable::new(
        records,
        present,
        columns.clone(),
        raw.headers.clone(),
    ))
}

/// Accepts `-160.89`, `-160,89` and values with thousands spaces such as `1 000,50`.
pub(crate) fn parse_amount(value: &str) -> Option<f64> {
    let compact = value
        .chars()
        .filter(|ch| !ch.is_whitespace() && *ch != '\u{a0}')
        .collect::<String>();
    if compact.is_empty() {
        return None;
    }

    let normalized = if compact.contains('.') {
        compact.replace(',', "")
    } else {
        compact.replace(',', ".")
    };

    let parsed = normalized.parse::<f64>().ok()?;
    if parsed.is_finite() { Some(parsed) } else { None }
}

pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10_f64.powi(decimals);
    (value * factor).round() / factor
}
