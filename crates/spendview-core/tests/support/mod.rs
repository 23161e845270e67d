#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use spendview_core::{ReportResult, SuccessEnvelope};
use tempfile::{Builder, TempDir};

pub const EXPORT_HEADER: &str = "Дата операции;Дата платежа;Номер карты;Статус;Сумма операции;Валюта операции;Сумма платежа;Валюта платежа;Категория;Описание;Сумма операции с округлением";

/// `(operation_date, payment_date, card, amount, category, description, rounded)`
pub type ExportRow<'a> = (&'a str, &'a str, &'a str, &'a str, &'a str, &'a str, &'a str);

pub const DECEMBER_ROWS: [ExportRow<'static>; 7] = [
    ("30.11.2021 18:00:00", "01.12.2021", "*7197", "-1500,00", "Супермаркеты", "Перекресток", "1500,00"),
    ("01.12.2021 00:00:00", "02.12.2021", "*7197", "-160,89", "Супермаркеты", "Колхоз", "160,89"),
    ("03.12.2021 12:35:05", "03.12.2021", "*4556", "-9000,00", "Переводы", "Константин Л.", "9000,00"),
    ("05.12.2021 09:10:00", "06.12.2021", "*4556", "-115,30", "Фастфуд", "Mouse Tail", "115,30"),
    ("10.12.2021 20:15:00", "10.12.2021", "", "5000,00", "Пополнения", "Пополнение через Газпромбанк", "5000,00"),
    ("12.12.2021 14:00:00", "13.12.2021", "*7197", "-64,00", "Супермаркеты", "Колхоз", "64,00"),
    ("bad date", "13.12.2021", "*7197", "-1,00", "Супермаркеты", "Колхоз", "1,00"),
];

pub fn temp_dir(prefix: &str) -> std::io::Result<TempDir> {
    Builder::new().prefix(prefix).tempdir()
}

pub fn export_csv(rows: &[ExportRow<'_>]) -> String {
    let mut body = String::from(EXPORT_HEADER);
    body.push('\n');
    for (operation, payment, card, amount, category, description, rounded) in rows {
        body.push_str(&format!(
            "{operation};{payment};{card};OK;{amount};RUB;{amount};RUB;{category};{description};{rounded}\n"
        ));
    }
    body
}

pub fn write_file(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    let result = fs::write(&path, body);
    assert!(result.is_ok());
    path
}

pub fn write_export(dir: &Path, rows: &[ExportRow<'_>]) -> PathBuf {
    write_file(dir, "operations.csv", &export_csv(rows))
}

pub fn payload(result: ReportResult<SuccessEnvelope>) -> Value {
    assert!(result.is_ok(), "command failed: {:?}", result.as_ref().err());
    if let Ok(success) = result {
        let value = serde_json::to_value(success);
        assert!(value.is_ok());
        if let Ok(value) = value {
            return value;
        }
    }
    Value::Null
}
