use spendview_core::ReportError;

pub fn render_error(error: &ReportError) -> String {
    let mut lines = vec![
        "The report could not be built.".to_string(),
        String::new(),
        format!("  Error:    {}", error.code),
        format!("  Details:  {}", error.message),
    ];

    if let Some(headers) = error
        .data
        .as_ref()
        .and_then(|data| data.get("actual_headers"))
        .and_then(|value| value.as_array())
    {
        let names = headers
            .iter()
            .filter_map(|value| value.as_str())
            .collect::<Vec<&str>>();
        lines.push(format!("  Headers:  {}", names.join(", ")));
    }

    lines.push(String::new());
    lines.push("What to do next:".to_string());
    if error.recovery_steps.is_empty() {
        lines.push("  1. Retry the command.".to_string());
    } else {
        for (index, step) in error.recovery_steps.iter().enumerate() {
            lines.push(format!("  {}. {step}", index + 1));
        }
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use spendview_core::ReportError;

    use super::render_error;

    #[test]
    fn renders_standard_error_layout() {
        let error = ReportError::invalid_argument_for_command("bad input", Some("invest"));

        let rendered = render_error(&error);
        assert!(rendered.starts_with("The report could not be built."));
        assert!(rendered.contains("  Error:    invalid_argument"));
        assert!(rendered.contains("  Details:  bad input"));
        assert!(rendered.contains("What to do next:"));
        assert!(rendered.contains("  1. Run `spendview invest --help` for usage."));
        assert!(!rendered.contains("Headers:"));
    }

    #[test]
    fn missing_column_lists_headers_seen() {
        let error = ReportError::missing_column(
            "Номер карты",
            vec!["Дата операции".to_string(), "Сумма операции".to_string()],
        );
        let rendered = render_error(&error);
        assert!(rendered.contains("  Headers:  Дата операции, Сумма операции"));
    }
}
