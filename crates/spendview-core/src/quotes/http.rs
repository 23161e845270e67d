use std::env;
use std::time::Duration;

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use super::QuoteSource;
use crate::contracts::types::{CurrencyRate, StockPrice};
use crate::table::build::round_to;
use crate::{ReportError, ReportResult};

pub const CURRENCY_API_KEY_ENV: &str = "SPENDVIEW_CURRENCY_API_KEY";
pub const STOCK_API_KEY_ENV: &str = "SPENDVIEW_STOCK_API_KEY";
pub const CURRENCY_API_URL_ENV: &str = "SPENDVIEW_CURRENCY_API_URL";
pub const STOCK_API_URL_ENV: &str = "SPENDVIEW_STOCK_API_URL";

pub const DEFAULT_CURRENCY_API_URL: &str = "https://v6.exchangerate-api.com/v6";
pub const DEFAULT_STOCK_API_URL: &str = "https://api.marketstack.com/v1/eod/latest";
pub const DEFAULT_TARGET_CURRENCY: &str = "RUB";

const REQUEST_TIMEOUT_SECS: u64 = 10;
const USER_AGENT: &str = concat!("spendview/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteEndpoints {
    pub currency_url: String,
    pub stock_url: String,
    pub currency_api_key: Option<String>,
    pub stock_api_key: Option<String>,
    pub target_currency: String,
}

impl QuoteEndpoints {
    pub fn from_env(target_currency: &str) -> Self {
        Self {
            currency_url: env_or(CURRENCY_API_URL_ENV, DEFAULT_CURRENCY_API_URL),
            stock_url: env_or(STOCK_API_URL_ENV, DEFAULT_STOCK_API_URL),
            currency_api_key: non_empty_env(CURRENCY_API_KEY_ENV),
            stock_api_key: non_empty_env(STOCK_API_KEY_ENV),
            target_currency: target_currency.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct StockResponse {
    #[serde(default)]
    data: Vec<StockRow>,
}

#[derive(Debug, Deserialize)]
struct StockRow {
    symbol: String,
    close: f64,
}

/// Blocking client for the exchange-rate and end-of-day stock APIs.
pub struct HttpQuoteSource {
    http: reqwest::blocking::Client,
    endpoints: QuoteEndpoints,
}

impl HttpQuoteSource {
    pub fn new(endpoints: QuoteEndpoints) -> ReportResult<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|err| {
                ReportError::new(
                    "internal_http_client_error",
                    &format!("Could not build HTTP client: {err}"),
                    Vec::new(),
                )
            })?;
        Ok(Self { http, endpoints })
    }

    fn currency_rate(&self, api_key: &str, currency: &str) -> Result<f64, String> {
        let url = format!(
            "{}/{}/latest/{}",
            self.endpoints.currency_url.trim_end_matches('/'),
            api_key,
            currency
        );
        let body = self.get_json(self.http.get(url))?;
        body.get("conversion_rates")
            .and_then(|rates| rates.get(&self.endpoints.target_currency))
            .and_then(Value::as_f64)
            .map(|rate| round_to(rate, 2))
            .ok_or_else(|| {
                format!(
                    "response has no `conversion_rates.{}`",
                    self.endpoints.target_currency
                )
            })
    }

    fn stock_rows(&self, api_key: &str, symbols: &[String]) -> Result<Vec<StockRow>, String> {
        let joined = symbols.join(",");
        let request = self.http.get(&self.endpoints.stock_url).query(&[
            ("access_key", api_key),
            ("symbols", joined.as_str()),
        ]);
        let body = self.get_json(request)?;
        serde_json::from_value::<StockResponse>(body)
            .map(|response| response.data)
            .map_err(|err| format!("unexpected stock payload: {err}"))
    }

    fn get_json(&self, request: reqwest::blocking::RequestBuilder) -> Result<Value, String> {
        let response = request.send().map_err(|err| err.to_string())?;
        let status = response.status();
        if !status.is_success() {
            return Err(format!("HTTP {}", status.as_u16()));
        }
        response.json::<Value>().map_err(|err| err.to_string())
    }
}

impl QuoteSource for HttpQuoteSource {
    fn currency_rates(&self, currencies: &[String]) -> Vec<CurrencyRate> {
        if currencies.is_empty() {
            return Vec::new();
        }
        let Some(api_key) = self.endpoints.currency_api_key.as_deref() else {
            warn!(
                env = CURRENCY_API_KEY_ENV,
                "currency API key not set; skipping currency rates"
            );
            return Vec::new();
        };

        let mut rates = Vec::with_capacity(currencies.len());
        for currency in currencies {
            match self.currency_rate(api_key, currency) {
                Ok(rate) => {
                    debug!(currency = currency.as_str(), rate, "resolved currency rate");
                    rates.push(CurrencyRate {
                        currency: currency.clone(),
                        rate,
                    });
                }
                Err(error) => {
                    warn!(currency = currency.as_str(), %error, "currency rate lookup failed");
                }
            }
        }
        rates
    }

    fn stock_prices(&self, symbols: &[String]) -> Vec<StockPrice> {
        if symbols.is_empty() {
            return Vec::new();
        }
        let Some(api_key) = self.endpoints.stock_api_key.as_deref() else {
            warn!(
                env = STOCK_API_KEY_ENV,
                "stock API key not set; skipping stock prices"
            );
            return Vec::new();
        };

        match self.stock_rows(api_key, symbols) {
            Ok(rows) => rows
                .into_iter()
                .map(|row| StockPrice {
                    stock: row.symbol,
                    price: row.close,
                })
                .collect(),
            Err(error) => {
                warn!(symbols = symbols.len(), %error, "stock price lookup failed");
                Vec::new()
            }
        }
    }
}

fn env_or(name: &str, default: &str) -> String {
    non_empty_env(name).unwrap_or_else(|| default.to_string())
}

fn non_empty_env(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
