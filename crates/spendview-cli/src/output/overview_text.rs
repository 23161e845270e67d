use std::io;

use serde_json::Value;
use spendview_core::contracts::types::{CardSummary, CurrencyRate, StockPrice, TopTransaction};

use super::format::{Align, Column, format_amount, render_table_or_blocks, terminal_width};

pub fn render_overview(data: &Value) -> io::Result<String> {
    let greeting = data.get("greeting").and_then(Value::as_str).unwrap_or("");
    let cards = list::<CardSummary>(data, "cards")?;
    let top = list::<TopTransaction>(data, "top_transactions")?;
    let rates = list::<CurrencyRate>(data, "currency_rates")?;
    let prices = list::<StockPrice>(data, "stock_prices")?;
    let width = terminal_width();

    let mut lines = vec![greeting.to_string(), String::new()];

    lines.push("Cards".to_string());
    if cards.is_empty() {
        lines.push("  No card spending in this period.".to_string());
    } else {
        let rows = cards
            .iter()
            .map(|card| {
                vec![
                    format!("*{}", card.last_four_digits),
                    format_amount(card.total_spent),
                    card.cashback.to_string(),
                ]
            })
            .collect::<Vec<Vec<String>>>();
        lines.extend(render_table_or_blocks(
            &[
                Column {
                    name: "Card",
                    align: Align::Left,
                },
                Column {
                    name: "Spent",
                    align: Align::Right,
                },
                Column {
                    name: "Cashback",
                    align: Align::Right,
                },
            ],
            &rows,
            width,
            "Card",
        ));
    }

    lines.push(String::new());
    lines.push("Top transactions".to_string());
    if top.is_empty() {
        lines.push("  No transactions in this period.".to_string());
    } else {
        let rows = top
            .iter()
            .map(|item| {
                vec![
                    item.date.clone(),
                    format_amount(item.amount),
                    item.category.clone().unwrap_or_default(),
                    item.description.clone(),
                ]
            })
            .collect::<Vec<Vec<String>>>();
        lines.extend(render_table_or_blocks(
            &[
                Column {
                    name: "Date",
                    align: Align::Left,
                },
                Column {
                    name: "Amount",
                    align: Align::Right,
                },
                Column {
                    name: "Category",
                    align: Align::Left,
                },
                Column {
                    name: "Description",
                    align: Align::Left,
                },
            ],
            &rows,
            width,
            "Transaction",
        ));
    }

    if !rates.is_empty() {
        lines.push(String::new());
        lines.push("Currency rates".to_string());
        lines.extend(
            rates
                .iter()
                .map(|rate| format!("  {}  {:.2}", rate.currency, rate.rate)),
        );
    }

    if !prices.is_empty() {
        lines.push(String::new());
        lines.push("Stock prices".to_string());
        lines.extend(
            prices
                .iter()
                .map(|price| format!("  {}  {:.2}", price.stock, price.price)),
        );
    }

    Ok(lines.join("\n"))
}

pub(super) fn list<T>(data: &Value, key: &str) -> io::Result<Vec<T>>
where
    T: serde::de::DeserializeOwned,
{
    match data.get(key) {
        Some(value) => serde_json::from_value::<Vec<T>>(value.clone()).map_err(io::Error::other),
        None => Ok(Vec::new()),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::render_overview;

    #[test]
    fn renders_sections_and_skips_empty_quotes() {
        let data = json!({
            "greeting": "Добрый вечер",
            "cards": [
                {"last_four_digits": "4556", "total_spent": 9115.3, "cashback": 91}
            ],
            "top_transactions": [
                {"date": "03.12.2021 12:35:05", "amount": 9000.0, "category": "Переводы", "description": "Константин Л."}
            ],
            "currency_rates": [],
            "stock_prices": [{"stock": "AAPL", "price": 150.12}]
        });

        let rendered = render_overview(&data);
        assert!(rendered.is_ok());
        if let Ok(text) = rendered {
            assert!(text.starts_with("Добрый вечер"));
            assert!(text.contains("*4556"));
            assert!(text.contains("9 115.30"));
            assert!(text.contains("Константин Л."));
            assert!(!text.contains("Currency rates"));
            assert!(text.contains("  AAPL  150.12"));
        }
    }

    #[test]
    fn empty_period_has_placeholders() {
        let data = json!({
            "greeting": "Доброе утро",
            "cards": [],
            "top_transactions": [],
            "currency_rates": [],
            "stock_prices": []
        });
        let rendered = render_overview(&data);
        assert!(rendered.is_ok());
        if let Ok(text) = rendered {
            assert!(text.contains("No card spending in this period."));
            assert!(text.contains("No transactions in this period."));
        }
    }
}
