use std::collections::BTreeMap;
use std::io;

use serde_json::Value;
use spendview_core::contracts::types::TopTransaction;

use super::format::{
    Align, Column, format_amount, key_value_rows, render_table_or_blocks, terminal_width,
};
use super::overview_text::list;

pub fn render_spending(data: &Value) -> io::Result<String> {
    let category = text_field(data, "category");
    let from = data
        .get("period")
        .and_then(|period| period.get("from"))
        .and_then(Value::as_str)
        .unwrap_or("");
    let to = data
        .get("period")
        .and_then(|period| period.get("to"))
        .and_then(Value::as_str)
        .unwrap_or("");
    let total = number_field(data, "total_amount");
    let transactions = list::<TopTransaction>(data, "transactions")?;

    let mut lines = vec![format!("Spending in {category}"), String::new()];
    lines.extend(key_value_rows(
        &[
            ("From:", from.to_string()),
            ("To:", to.to_string()),
            ("Total:", format_amount(total)),
            ("Transactions:", transactions.len().to_string()),
        ],
        2,
    ));

    if !transactions.is_empty() {
        let rows = transactions
            .iter()
            .map(|item| {
                vec![
                    item.date.clone(),
                    format_amount(item.amount),
                    item.description.clone(),
                ]
            })
            .collect::<Vec<Vec<String>>>();
        lines.push(String::new());
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
                    name: "Description",
                    align: Align::Left,
                },
            ],
            &rows,
            terminal_width(),
            "Transaction",
        ));
    }

    Ok(lines.join("\n"))
}

pub fn render_invest(data: &Value) -> io::Result<String> {
    let month = text_field(data, "month");
    let step = data
        .get("rounding_step")
        .and_then(Value::as_i64)
        .unwrap_or(0);
    let total = number_field(data, "total_amount");

    let mut lines = vec![format!("Investment bank for {month}"), String::new()];
    lines.extend(key_value_rows(
        &[
            ("Rounding step:", step.to_string()),
            ("Set aside:", format_amount(total)),
        ],
        2,
    ));
    Ok(lines.join("\n"))
}

pub fn render_cashback(data: &Value) -> io::Result<String> {
    let year = data.get("year").and_then(Value::as_i64).unwrap_or(0);
    let month = data.get("month").and_then(Value::as_u64).unwrap_or(0);
    let categories = match data.get("categories") {
        Some(value) => {
            serde_json::from_value::<BTreeMap<String, f64>>(value.clone())
                .map_err(io::Error::other)?
        }
        None => BTreeMap::new(),
    };

    let mut lines = vec![format!("Spending by category for {year}-{month:02}"), String::new()];
    if categories.is_empty() {
        lines.push("  No transactions in this month.".to_string());
        return Ok(lines.join("\n"));
    }

    let rows = categories
        .iter()
        .map(|(name, amount)| vec![name.clone(), format_amount(*amount)])
        .collect::<Vec<Vec<String>>>();
    lines.extend(render_table_or_blocks(
        &[
            Column {
                name: "Category",
                align: Align::Left,
            },
            Column {
                name: "Amount",
                align: Align::Right,
            },
        ],
        &rows,
        terminal_width(),
        "Category",
    ));
    Ok(lines.join("\n"))
}

fn text_field<'a>(data: &'a Value, key: &str) -> &'a str {
    data.get(key).and_then(Value::as_str).unwrap_or("")
}

fn number_field(data: &Value, key: &str) -> f64 {
    data.get(key).and_then(Value::as_f64).unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{render_cashback, render_invest, render_spending};

    #[test]
    fn spending_lists_period_and_rows() {
        let data = json!({
            "category": "Супермаркеты",
            "period": {"from": "2021-09-30 16:44:00", "to": "2021-12-30 16:44:00"},
            "total_amount": 1725.89,
            "transactions": [
                {"date": "30.12.2021 16:44:00", "amount": -160.89, "category": "Супермаркеты", "description": "Колхоз"}
            ]
        });
        let rendered = render_spending(&data);
        assert!(rendered.is_ok());
        if let Ok(text) = rendered {
            assert!(text.starts_with("Spending in Супермаркеты"));
            assert!(text.contains("1 725.89"));
            assert!(text.contains("Колхоз"));
            assert!(text.contains("2021-09-30 16:44:00"));
        }
    }

    #[test]
    fn invest_shows_step_and_total() {
        let data = json!({"month": "2021-12", "rounding_step": 50, "total_amount": 308.81});
        let rendered = render_invest(&data);
        assert!(rendered.is_ok());
        if let Ok(text) = rendered {
            assert!(text.contains("Investment bank for 2021-12"));
            assert!(text.contains("50"));
            assert!(text.contains("308.81"));
        }
    }

    #[test]
    fn cashback_handles_empty_month() {
        let data = json!({"year": 2021, "month": 2, "categories": {}});
        let rendered = render_cashback(&data);
        assert!(rendered.is_ok());
        if let Ok(text) = rendered {
            assert!(text.starts_with("Spending by category for 2021-02"));
            assert!(text.contains("No transactions in this month."));
        }
    }

    #[test]
    fn cashback_tabulates_categories() {
        let data = json!({"year": 2021, "month": 12, "categories": {"Переводы": -9000.0}});
        let rendered = render_cashback(&data);
        assert!(rendered.is_ok());
        if let Ok(text) = rendered {
            assert!(text.contains("Переводы"));
            assert!(text.contains("-9 000.00"));
        }
    }
}
