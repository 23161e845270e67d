use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use spendview_core::window::DateField;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YearMonth(pub String);

impl YearMonth {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

pub fn parse_year_month(value: &str) -> Result<YearMonth, String> {
    let bytes = value.as_bytes();
    if bytes.len() != 7 || bytes[4] != b'-' {
        return Err("month must use YYYY-MM format".to_string());
    }
    for index in [0usize, 1, 2, 3, 5, 6] {
        if !bytes[index].is_ascii_digit() {
            return Err("month must use YYYY-MM format".to_string());
        }
    }

    if NaiveDate::parse_from_str(&format!("{value}-01"), "%Y-%m-%d").is_err() {
        return Err("month must use valid calendar values".to_string());
    }

    Ok(YearMonth(value.to_string()))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DateFieldArg {
    Operation,
    Payment,
}

impl From<DateFieldArg> for DateField {
    fn from(value: DateFieldArg) -> Self {
        match value {
            DateFieldArg::Operation => DateField::Operation,
            DateFieldArg::Payment => DateField::Payment,
        }
    }
}

pub const OVERVIEW_AFTER_HELP: &str = "\
Input:
  <path> is a bank export: .xlsx/.xls workbook (first sheet), .csv with a header
  row (`,` or `;`), or .json with one top-level array of row objects.

Settings (optional, <home>/user_settings.json or --settings):
  {
    \"user_currencies\": [\"USD\", \"EUR\"],
    \"user_stocks\": [\"AAPL\", \"AMZN\", \"GOOGL\"]
  }

Quotes:
  Currency rates need SPENDVIEW_CURRENCY_API_KEY, stock prices need
  SPENDVIEW_STOCK_API_KEY. Missing keys or failed lookups leave those lists empty.
";

#[derive(Debug, Parser)]
#[command(
    name = "spendview",
    version,
    about = "transaction export reports",
    disable_help_subcommand = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Greeting, per-card totals, top transactions and market quotes
    #[command(after_help = OVERVIEW_AFTER_HELP)]
    Overview {
        /// Path to the transaction export
        path: PathBuf,
        /// Reference time (YYYY-MM-DD HH:MM:SS); defaults to now
        #[arg(long)]
        at: Option<String>,
        /// Settings file to use instead of <home>/user_settings.json
        #[arg(long)]
        settings: Option<PathBuf>,
        /// Skip currency and stock lookups
        #[arg(long)]
        offline: bool,
        #[arg(long)]
        json: bool,
    },
    /// Spending in one category over a trailing window
    Spending {
        /// Path to the transaction export
        path: PathBuf,
        /// Category label, matched exactly
        #[arg(long)]
        category: String,
        /// Reference time (YYYY-MM-DD HH:MM:SS); defaults to now
        #[arg(long)]
        at: Option<String>,
        /// Window length in months
        #[arg(long)]
        months: Option<u32>,
        /// Which date column bounds the window
        #[arg(long, value_enum)]
        date_field: Option<DateFieldArg>,
        /// Also write the JSON report to this file
        #[arg(long)]
        save: Option<PathBuf>,
        #[arg(long)]
        settings: Option<PathBuf>,
        #[arg(long)]
        json: bool,
    },
    /// Round-up savings for one month
    Invest {
        /// Path to the transaction export
        path: PathBuf,
        /// Month to total (YYYY-MM)
        #[arg(long, value_parser = parse_year_month)]
        month: YearMonth,
        /// Round each spend up to a multiple of this step
        #[arg(long, allow_negative_numbers = true)]
        step: i64,
        #[arg(long)]
        settings: Option<PathBuf>,
        #[arg(long)]
        json: bool,
    },
    /// Per-category totals for one calendar month
    Cashback {
        /// Path to the transaction export
        path: PathBuf,
        #[arg(long)]
        year: i32,
        /// Month number (1-12)
        #[arg(long)]
        month: u32,
        #[arg(long)]
        settings: Option<PathBuf>,
        #[arg(long)]
        json: bool,
    },
}

impl Commands {
    pub fn json(&self) -> bool {
        match self {
            Self::Overview { json, .. }
            | Self::Spending { json, .. }
            | Self::Invest { json, .. }
            | Self::Cashback { json, .. } => *json,
        }
    }
}

#[cfg(test)]
pub fn parse_from<I, T>(itr: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::try_parse_from(itr)
}
