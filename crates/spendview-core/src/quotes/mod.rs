pub mod http;

use tracing::info;

use crate::contracts::types::{CurrencyRate, QuoteSnapshot, StockPrice};

pub use http::{HttpQuoteSource, QuoteEndpoints};

/// Market data lookups the main report embeds verbatim.
///
/// Implementations absorb their own failures and return whatever entries they could resolve.
pub trait QuoteSource {
    fn currency_rates(&self, currencies: &[String]) -> Vec<CurrencyRate>;
    fn stock_prices(&self, symbols: &[String]) -> Vec<StockPrice>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineQuotes;

impl QuoteSource for OfflineQuotes {
    fn currency_rates(&self, _currencies: &[String]) -> Vec<CurrencyRate> {
        Vec::new()
    }

    fn stock_prices(&self, _symbols: &[String]) -> Vec<StockPrice> {
        Vec::new()
    }
}

/// Fixed quotes filtered to the requested codes, in request order.
#[derive(Debug, Clone, Default)]
pub struct StaticQuotes {
    pub currency_rates: Vec<CurrencyRate>,
    pub stock_prices: Vec<StockPrice>,
}

impl QuoteSource for StaticQuotes {
    fn currency_rates(&self, currencies: &[String]) -> Vec<CurrencyRate> {
        currencies
            .iter()
            .filter_map(|code| {
                self.currency_rates
                    .iter()
                    .find(|rate| &rate.currency == code)
                    .cloned()
            })
            .collect()
    }

    fn stock_prices(&self, symbols: &[String]) -> Vec<StockPrice> {
        symbols
            .iter()
            .filter_map(|symbol| {
                self.stock_prices
                    .iter()
                    .find(|price| &price.stock == symbol)
                    .cloned()
            })
            .collect()
    }
}

pub fn fetch_snapshot(
    source: &dyn QuoteSource,
    currencies: &[String],
    stocks: &[String],
) -> QuoteSnapshot {
    let snapshot = QuoteSnapshot {
        currency_rates: source.currency_rates(currencies),
        stock_prices: source.stock_prices(stocks),
    };
    info!(
        requested_currencies = currencies.len(),
        currency_rates = snapshot.currency_rates.len(),
        requested_stocks = stocks.len(),
        stock_prices = snapshot.stock_prices.len(),
        "resolved quotes"
    );
    snapshot
}
