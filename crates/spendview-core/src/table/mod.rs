pub(crate) mod build;
pub mod source;

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::{ReportError, ReportResult};

pub use build::build_table;
pub use source::{RawTable, load_table, read_source};

/// Logical columns of a transaction export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    OperationDate,
    PaymentDate,
    CardNumber,
    Amount,
    PaymentAmount,
    Category,
    Description,
    RoundedAmount,
}

impl Field {
    pub const ALL: [Field; 8] = [
        Field::OperationDate,
        Field::PaymentDate,
        Field::CardNumber,
        Field::Amount,
        Field::PaymentAmount,
        Field::Category,
        Field::Description,
        Field::RoundedAmount,
    ];

    pub const fn is_required(self) -> bool {
        matches!(self, Self::OperationDate | Self::Amount)
    }
}

/// Numeric columns a report can sum or rank by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AmountField {
    Amount,
    PaymentAmount,
    #[default]
    RoundedAmount,
}

impl AmountField {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Amount => "amount",
            Self::PaymentAmount => "payment_amount",
            Self::RoundedAmount => "rounded_amount",
        }
    }

    pub(crate) const fn column(self) -> Field {
        match self {
            Self::Amount => Field::Amount,
            Self::PaymentAmount => Field::PaymentAmount,
            Self::RoundedAmount => Field::RoundedAmount,
        }
    }

    /// `rounded_amount` is always populated at load, even when the column is absent.
    pub(crate) const fn always_available(self) -> bool {
        matches!(self, Self::Amount | Self::RoundedAmount)
    }

    pub fn value(self, record: &TransactionRecord) -> Option<f64> {
        match self {
            Self::Amount => Some(record.amount),
            Self::PaymentAmount => record.payment_amount,
            Self::RoundedAmount => Some(record.rounded_amount),
        }
    }
}

/// Header names used by the export for each logical field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnMap {
    pub operation_date: String,
    pub payment_date: String,
    pub card_number: String,
    pub amount: String,
    pub payment_amount: String,
    pub category: String,
    pub description: String,
    pub rounded_amount: String,
}

impl Default for ColumnMap {
    fn default() -> Self {
        Self {
            operation_date: "Дата операции".to_string(),
            payment_date: "Дата платежа".to_string(),
            card_number: "Номер карты".to_string(),
            amount: "Сумма операции".to_string(),
            payment_amount: "Сумма платежа".to_string(),
            category: "Категория".to_string(),
            description: "Описание".to_string(),
            rounded_amount: "Сумма операции с округлением".to_string(),
        }
    }
}

impl ColumnMap {
    pub fn header(&self, field: Field) -> &str {
        match field {
            Field::OperationDate => &self.operation_date,
            Field::PaymentDate => &self.payment_date,
            Field::CardNumber => &self.card_number,
            Field::Amount => &self.amount,
            Field::PaymentAmount => &self.payment_amount,
            Field::Category => &self.category,
            Field::Description => &self.description,
            Field::RoundedAmount => &self.rounded_amount,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TransactionRecord {
    pub row: usize,
    pub operation_date: String,
    pub payment_date: Option<String>,
    pub card_number: Option<String>,
    pub amount: f64,
    pub payment_amount: Option<f64>,
    pub rounded_amount: f64,
    pub category: Option<String>,
    pub description: String,
}

/// Rows of one export, plus the set of columns its header actually carried.
#[derive(Debug, Clone, Default)]
pub struct TransactionTable {
    records: Vec<TransactionRecord>,
    present: BTreeSet<Field>,
    columns: ColumnMap,
    headers: Vec<String>,
}

impl TransactionTable {
    pub fn new(
        records: Vec<TransactionRecord>,
        present: BTreeSet<Field>,
        columns: ColumnMap,
        headers: Vec<String>,
    ) -> Self {
        Self {
            records,
            present,
            columns,
            headers,
        }
    }

    /// Builds a table from already-shaped records; every field counts as present.
    pub fn from_records(records: Vec<TransactionRecord>) -> Self {
        let columns = ColumnMap::default();
        let headers = Field::ALL
            .iter()
            .map(|field| columns.header(*field).to_string())
            .collect();
        Self {
            records,
            present: Field::ALL.into_iter().collect(),
            columns,
            headers,
        }
    }

    pub fn records(&self) -> &[TransactionRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn has_column(&self, field: Field) -> bool {
        self.present.contains(&field)
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn require_amount(&self, field: AmountField) -> ReportResult<()> {
        if field.always_available() {
            return Ok(());
        }
        self.require_column(field.column())
    }

    /// Fails with `missing_column` when the source header did not carry `field`.
    pub fn require_column(&self, field: Field) -> ReportResult<()> {
        if self.has_column(field) {
            return Ok(());
        }
        Err(ReportError::missing_column(
            self.columns.header(field),
            self.headers.clone(),
        ))
    }
}
