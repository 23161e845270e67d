use chrono::Local;
use spendview_core::commands::cashback::{self, CashbackOptions};
use spendview_core::commands::invest::{self, InvestOptions};
use spendview_core::commands::overview::{self, OverviewOptions};
use spendview_core::commands::spending::{self, SpendingOptions};
use spendview_core::window::REFERENCE_FORMAT;
use spendview_core::{ReportResult, SuccessEnvelope};

use crate::cli::{Cli, Commands};

pub fn dispatch(cli: &Cli) -> ReportResult<SuccessEnvelope> {
    match &cli.command {
        Commands::Overview {
            path,
            at,
            settings,
            offline,
            json: _,
        } => {
            let at = reference_or_now(at.as_deref());
            overview::run_with_options(OverviewOptions {
                path,
                at: &at,
                offline: *offline,
                settings_override: settings.as_deref(),
                home_override: None,
                quotes_override: None,
            })
        }
        Commands::Spending {
            path,
            category,
            at,
            months,
            date_field,
            save,
            settings,
            json: _,
        } => {
            let at = reference_or_now(at.as_deref());
            spending::run_with_options(SpendingOptions {
                path,
                category,
                at: &at,
                months: *months,
                date_field: date_field.map(Into::into),
                save: save.as_deref(),
                settings_override: settings.as_deref(),
                home_override: None,
            })
        }
        Commands::Invest {
            path,
            month,
            step,
            settings,
            json: _,
        } => invest::run_with_options(InvestOptions {
            path,
            month: month.as_str(),
            rounding_step: *step,
            settings_override: settings.as_deref(),
            home_override: None,
        }),
        Commands::Cashback {
            path,
            year,
            month,
            settings,
            json: _,
        } => cashback::run_with_options(CashbackOptions {
            path,
            year: *year,
            month: *month,
            settings_override: settings.as_deref(),
            home_override: None,
        }),
    }
}

fn reference_or_now(at: Option<&str>) -> String {
    match at {
        Some(value) => value.to_string(),
        None => Local::now().naive_local().format(REFERENCE_FORMAT).to_string(),
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::{dispatch, reference_or_now};
    use crate::cli::parse_from;
    use spendview_core::window::parse_reference_instant;

    #[test]
    fn default_reference_is_parseable() {
        assert!(parse_reference_instant(&reference_or_now(None)).is_ok());
        assert_eq!(reference_or_now(Some("2021-12-31 16:44:00")), "2021-12-31 16:44:00");
    }

    #[test]
    fn dispatches_to_expected_command_names() {
        let dir = tempfile::tempdir();
        assert!(dir.is_ok());
        if let Ok(dir) = dir {
            let export = dir.path().join("rows.csv");
            let settings = dir.path().join("settings.json");
            assert!(
                fs::write(
                    &export,
                    "Дата операции,Дата платежа,Номер карты,Сумма операции,Сумма платежа,Категория,Описание\n\
                     15.12.2021 10:00:00,16.12.2021,*7197,-120.00,-120.00,Фастфуд,Mouse Tail\n",
                )
                .is_ok()
            );
            assert!(fs::write(&settings, "{}").is_ok());
            let export_arg = export.display().to_string();
            let settings_arg = settings.display().to_string();

            let cases: [(Vec<&str>, &str); 4] = [
                (
                    vec![
                        "spendview",
                        "overview",
                        export_arg.as_str(),
                        "--at",
                        "2021-12-20 10:00:00",
                        "--offline",
                        "--settings",
                        settings_arg.as_str(),
                    ],
                    "overview",
                ),
                (
                    vec![
                        "spendview",
                        "spending",
                        export_arg.as_str(),
                        "--category",
                        "Фастфуд",
                        "--at",
                        "2021-12-20 10:00:00",
                        "--settings",
                        settings_arg.as_str(),
                    ],
                    "spending",
                ),
                (
                    vec![
                        "spendview",
                        "invest",
                        export_arg.as_str(),
                        "--month",
                        "2021-12",
                        "--step",
                        "50",
                        "--settings",
                        settings_arg.as_str(),
                    ],
                    "invest",
                ),
                (
                    vec![
                        "spendview",
                        "cashback",
                        export_arg.as_str(),
                        "--year",
                        "2021",
                        "--month",
                        "12",
                        "--settings",
                        settings_arg.as_str(),
                    ],
                    "cashback",
                ),
            ];

            for (args, expected_command) in cases {
                let parsed = parse_from(args);
                assert!(parsed.is_ok());
                if let Ok(cli) = parsed {
                    let response = dispatch(&cli);
                    assert!(response.is_ok(), "{expected_command}: {:?}", response.as_ref().err());
                    if let Ok(success) = response {
                        assert_eq!(success.command, expected_command);
                    }
                }
            }
        }
    }
}
