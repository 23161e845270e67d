use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDateTime};
use tracing::info;

use crate::contracts::types::CardSummary;
use crate::table::{AmountField, Field, TransactionRecord, TransactionTable, build::round_to};
use crate::window::{DateField, ReportWindow, filter_window, parse_record_date};
use crate::{ReportError, ReportResult};

pub const DEFAULT_CASHBACK_DIVISOR: f64 = 100.0;

const CARD_SUFFIX_LEN: usize = 4;

/// Per-card `rounded_amount` totals, ordered by full card number.
pub fn aggregate_by_card(
    table: &TransactionTable,
    rows: &[&TransactionRecord],
) -> ReportResult<Vec<CardSummary>> {
    table.require_column(Field::CardNumber)?;
    Ok(card_summaries(rows, DEFAULT_CASHBACK_DIVISOR))
}

pub fn card_summaries(rows: &[&TransactionRecord], cashback_divisor: f64) -> Vec<CardSummary> {
    let mut totals: BTreeMap<&str, f64> = BTreeMap::new();
    for record in rows {
        let Some(card_number) = record.card_number.as_deref() else {
            continue;
        };
        *totals.entry(card_number).or_insert(0.0) += record.rounded_amount;
    }

    totals
        .into_iter()
        .map(|(card_number, total)| {
            let total_spent = round_to(total, 2);
            CardSummary {
                last_four_digits: last_four_digits(card_number),
                total_spent,
                cashback: cashback_points(total_spent, cashback_divisor),
            }
        })
        .collect()
}

/// Integer points per `divisor` units spent; floor, never round.
pub fn cashback_points(total_spent: f64, divisor: f64) -> i64 {
    if divisor <= 0.0 {
        return 0;
    }
    (total_spent / divisor).floor() as i64
}

/// Last four characters of the identifier, whatever they are.
pub fn last_four_digits(card_number: &str) -> String {
    let chars = card_number.chars().collect::<Vec<char>>();
    let start = chars.len().saturating_sub(CARD_SUFFIX_LEN);
    chars[start..].iter().collect()
}

/// Absolute spend for one category inside `window`.
pub fn aggregate_by_category(
    table: &TransactionTable,
    category: &str,
    window: &ReportWindow,
    date_field: DateField,
    amount_field: AmountField,
) -> ReportResult<f64> {
    let rows = category_rows(table, category, window, date_field, amount_field)?;
    Ok(category_total(&rows, amount_field))
}

pub(crate) fn category_rows<'a>(
    table: &'a TransactionTable,
    category: &str,
    window: &ReportWindow,
    date_field: DateField,
    amount_field: AmountField,
) -> ReportResult<Vec<&'a TransactionRecord>> {
    table.require_column(Field::Category)?;
    table.require_column(date_field.column())?;
    table.require_amount(amount_field)?;

    let rows = filter_window(table, window, date_field)
        .into_iter()
        .filter(|record| record.category.as_deref() == Some(category))
        .collect::<Vec<&TransactionRecord>>();

    info!(
        category,
        matched = rows.len(),
        "filtered operations for category"
    );
    Ok(rows)
}

pub(crate) fn category_total(rows: &[&TransactionRecord], amount_field: AmountField) -> f64 {
    let signed = rows
        .iter()
        .filter_map(|record| amount_field.value(record))
        .sum::<f64>();
    round_to(signed.abs(), 2)
}

/// Per-category totals for one calendar month of operation dates.
pub fn spending_by_category_in_month(
    table: &TransactionTable,
    year: i32,
    month: u32,
    amount_field: AmountField,
) -> ReportResult<BTreeMap<String, f64>> {
    if !(1..=12).contains(&month) {
        return Err(ReportError::invalid_argument_for_command(
            &format!("`month` must be between 1 and 12; got {month}."),
            Some("cashback"),
        ));
    }
    table.require_column(Field::Category)?;
    table.require_amount(amount_field)?;

    let mut totals: BTreeMap<String, f64> = BTreeMap::new();
    for record in table.records() {
        let Some(operation_date) = parse_record_date(&record.operation_date) else {
            continue;
        };
        if !in_month(&operation_date, year, month) {
            continue;
        }
        let (Some(category), Some(amount)) =
            (record.category.as_ref(), amount_field.value(record))
        else {
            continue;
        };
        *totals.entry(category.clone()).or_insert(0.0) += amount;
    }

    for total in totals.values_mut() {
        *total = round_to(*total, 2);
    }

    info!(year, month, categories = totals.len(), "summarized monthly categories");
    Ok(totals)
}

fn in_month(instant: &NaiveDateTime, year: i32, month: u32) -> bool {
    instant.year() == year && instant.month() == month
}

#[cfg(test)]
mod tests {
    use super::{aggregate_by_card, cashback_points, card_summaries, last_four_digits};
    use crate::table::{TransactionRecord, TransactionTable};

    fn card_row(row: usize, card: Option<&str>, rounded: f64) -> TransactionRecord {
        TransactionRecord {
            row,
            operation_date: "15.12.2021 10:00:00".to_string(),
            payment_date: Some("16.12.2021".to_string()),
            card_number: card.map(str::to_string),
            amount: -rounded,
            payment_amount: Some(-rounded),
            rounded_amount: rounded,
            category: Some("Супермаркеты".to_string()),
            description: "Магнит".to_string(),
        }
    }

    #[test]
    fn cashback_floors_instead_of_rounding() {
        assert_eq!(cashback_points(9115.3, 100.0), 91);
        assert_eq!(cashback_points(99.99, 100.0), 0);
        assert_eq!(cashback_points(100.0, 100.0), 1);
        assert_eq!(cashback_points(-50.0, 100.0), -1);
    }

    #[test]
    fn suffix_is_character_based() {
        assert_eq!(last_four_digits("*7197"), "7197");
        assert_eq!(last_four_digits("5441 **** **** 1234"), "1234");
        assert_eq!(last_four_digits("12"), "12");
    }

    #[test]
    fn cards_group_by_full_number_and_skip_rows_without_card() {
        let records = vec![
            card_row(1, Some("*7197"), 100.0),
            card_row(2, Some("*4556"), 9000.0),
            card_row(3, None, 5000.0),
            card_row(4, Some("*4556"), 115.3),
        ];
        let refs = records.iter().collect::<Vec<&TransactionRecord>>();
        let cards = card_summaries(&refs, 100.0);
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[0].last_four_digits, "4556");
        assert_eq!(cards[0].total_spent, 9115.3);
        assert_eq!(cards[0].cashback, 91);
        assert_eq!(cards[1].last_four_digits, "7197");
        assert_eq!(cards[1].cashback, 1);
    }

    #[test]
    fn cashback_uses_the_rounded_total() {
        let records = (1..=1000)
            .map(|row| card_row(row, Some("*7197"), 0.1))
            .collect::<Vec<TransactionRecord>>();
        let refs = records.iter().collect::<Vec<&TransactionRecord>>();
        let cards = card_summaries(&refs, 100.0);
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].total_spent, 100.0);
        assert_eq!(cards[0].cashback, 1);

        let thirds = [33.33, 33.33, 33.34]
            .iter()
            .enumerate()
            .map(|(index, amount)| card_row(index + 1, Some("*4556"), *amount))
            .collect::<Vec<TransactionRecord>>();
        let refs = thirds.iter().collect::<Vec<&TransactionRecord>>();
        let cards = card_summaries(&refs, 100.0);
        assert_eq!(cards[0].total_spent, 100.0);
        assert_eq!(cards[0].cashback, 1);
    }

    #[test]
    fn empty_rows_give_no_cards() {
        let table = TransactionTable::from_records(Vec::new());
        let cards = aggregate_by_card(&table, &[]);
        assert!(cards.is_ok());
        if let Ok(value) = cards {
            assert!(value.is_empty());
        }
    }
}
