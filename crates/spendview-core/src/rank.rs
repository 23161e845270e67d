use crate::contracts::types::TopTransaction;
use crate::table::{AmountField, TransactionRecord};

pub const DEFAULT_TOP_LIMIT: usize = 5;

/// Largest `n` rows by `key`, descending. Equal keys keep input order.
pub fn top_n(rows: &[&TransactionRecord], n: usize, key: AmountField) -> Vec<TopTransaction> {
    if n == 0 {
        return Vec::new();
    }

    let mut keyed = rows
        .iter()
        .filter_map(|record| key.value(record).map(|value| (value, *record)))
        .collect::<Vec<(f64, &TransactionRecord)>>();
    keyed.sort_by(|left, right| right.0.total_cmp(&left.0));

    keyed
        .into_iter()
        .take(n)
        .map(|(value, record)| project(record, value))
        .collect()
}

pub(crate) fn project(record: &TransactionRecord, amount: f64) -> TopTransaction {
    TopTransaction {
        date: record.operation_date.clone(),
        amount,
        category: record.category.clone(),
        description: record.description.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::top_n;
    use crate::table::{AmountField, TransactionRecord};

    fn row(row: usize, description: &str, rounded: f64, payment: Option<f64>) -> TransactionRecord {
        TransactionRecord {
            row,
            operation_date: format!("{row:02}.12.2021 10:00:00"),
            payment_date: None,
            card_number: None,
            amount: -rounded,
            payment_amount: payment,
            rounded_amount: rounded,
            category: None,
            description: description.to_string(),
        }
    }

    #[test]
    fn ties_keep_input_order() {
        let records = vec![
            row(1, "first", 50.0, None),
            row(2, "big", 900.0, None),
            row(3, "second", 50.0, None),
            row(4, "third", 50.0, None),
        ];
        let refs = records.iter().collect::<Vec<&TransactionRecord>>();
        let top = top_n(&refs, 3, AmountField::RoundedAmount);
        let descriptions = top
            .iter()
            .map(|item| item.description.as_str())
            .collect::<Vec<&str>>();
        assert_eq!(descriptions, vec!["big", "first", "second"]);
    }

    #[test]
    fn zero_limit_and_short_input() {
        let records = vec![row(1, "only", 10.0, None)];
        let refs = records.iter().collect::<Vec<&TransactionRecord>>();
        assert!(top_n(&refs, 0, AmountField::RoundedAmount).is_empty());
        assert_eq!(top_n(&refs, 5, AmountField::RoundedAmount).len(), 1);
    }

    #[test]
    fn rows_without_the_key_are_skipped() {
        let records = vec![
            row(1, "settled", 10.0, Some(-10.0)),
            row(2, "pending", 99.0, None),
        ];
        let refs = records.iter().collect::<Vec<&TransactionRecord>>();
        let top = top_n(&refs, 5, AmountField::PaymentAmount);
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].description, "settled");
        assert_eq!(top[0].amount, -10.0);
    }
}
