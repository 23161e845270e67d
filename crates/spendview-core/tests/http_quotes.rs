use httpmock::prelude::*;
use serde_json::json;
use spendview_core::quotes::{HttpQuoteSource, QuoteEndpoints, QuoteSource, fetch_snapshot};

fn endpoints(server: &MockServer) -> QuoteEndpoints {
    QuoteEndpoints {
        currency_url: server.url("/v6"),
        stock_url: server.url("/v1/eod/latest"),
        currency_api_key: Some("currency-key".to_string()),
        stock_api_key: Some("stock-key".to_string()),
        target_currency: "RUB".to_string(),
    }
}

fn codes(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| (*value).to_string()).collect()
}

#[test]
fn currency_rates_read_target_conversion_and_round() {
    let server = MockServer::start();
    let usd = server.mock(|when, then| {
        when.method(GET).path("/v6/currency-key/latest/USD");
        then.status(200)
            .header("content-type", "application/json")
            .json_body(json!({
                "result": "success",
                "base_code": "USD",
                "conversion_rates": {"USD": 1, "RUB": 73.2149, "EUR": 0.88}
            }));
    });
    let eur = server.mock(|when, then| {
        when.method(GET).path("/v6/currency-key/latest/EUR");
        then.status(200)
            .header("content-type", "application/json")
            .json_body(json!({
                "conversion_rates": {"RUB": 87.0762}
            }));
    });

    let source = HttpQuoteSource::new(endpoints(&server));
    assert!(source.is_ok());
    if let Ok(source) = source {
        let rates = source.currency_rates(&codes(&["USD", "EUR"]));
        usd.assert();
        eur.assert();
        assert_eq!(rates.len(), 2);
        assert_eq!(rates[0].currency, "USD");
        assert_eq!(rates[0].rate, 73.21);
        assert_eq!(rates[1].rate, 87.08);
    }
}

#[test]
fn failed_currency_lookup_is_skipped() {
    let server = MockServer::start();
    let _ok = server.mock(|when, then| {
        when.method(GET).path("/v6/currency-key/latest/USD");
        then.status(200)
            .json_body(json!({"conversion_rates": {"RUB": 73.0}}));
    });
    let _broken = server.mock(|when, then| {
        when.method(GET).path("/v6/currency-key/latest/XXX");
        then.status(404)
            .json_body(json!({"result": "error", "error-type": "unsupported-code"}));
    });

    let source = HttpQuoteSource::new(endpoints(&server));
    assert!(source.is_ok());
    if let Ok(source) = source {
        let rates = source.currency_rates(&codes(&["XXX", "USD"]));
        assert_eq!(rates.len(), 1);
        assert_eq!(rates[0].currency, "USD");
    }
}

#[test]
fn stock_prices_join_symbols_in_one_request() {
    let server = MockServer::start();
    let stocks = server.mock(|when, then| {
        when.method(GET)
            .path("/v1/eod/latest")
            .query_param("access_key", "stock-key")
            .query_param("symbols", "AAPL,AMZN");
        then.status(200)
            .header("content-type", "application/json")
            .json_body(json!({
                "pagination": {"count": 2},
                "data": [
                    {"symbol": "AAPL", "close": 150.12, "open": 149.0},
                    {"symbol": "AMZN", "close": 3173.18}
                ]
            }));
    });

    let source = HttpQuoteSource::new(endpoints(&server));
    assert!(source.is_ok());
    if let Ok(source) = source {
        let prices = source.stock_prices(&codes(&["AAPL", "AMZN"]));
        stocks.assert();
        assert_eq!(prices.len(), 2);
        assert_eq!(prices[1].stock, "AMZN");
        assert_eq!(prices[1].price, 3173.18);
    }
}

#[test]
fn stock_server_error_yields_no_prices() {
    let server = MockServer::start();
    let _stocks = server.mock(|when, then| {
        when.method(GET).path("/v1/eod/latest");
        then.status(500).body("upstream down");
    });

    let source = HttpQuoteSource::new(endpoints(&server));
    assert!(source.is_ok());
    if let Ok(source) = source {
        assert!(source.stock_prices(&codes(&["AAPL"])).is_empty());
    }
}

#[test]
fn missing_keys_skip_the_network() {
    let server = MockServer::start();
    let any = server.mock(|when, then| {
        when.method(GET);
        then.status(200).json_body(json!({}));
    });

    let mut config = endpoints(&server);
    config.currency_api_key = None;
    config.stock_api_key = None;
    let source = HttpQuoteSource::new(config);
    assert!(source.is_ok());
    if let Ok(source) = source {
        let snapshot = fetch_snapshot(&source, &codes(&["USD"]), &codes(&["AAPL"]));
        assert!(snapshot.currency_rates.is_empty());
        assert!(snapshot.stock_prices.is_empty());
        any.assert_calls(0);
    }
}
