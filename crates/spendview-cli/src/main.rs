mod cli;
mod dispatch;
mod logging;
mod output;
mod stdout_io;

use std::process::ExitCode;

use clap::{Parser, error::ErrorKind};
use spendview_core::ReportError;
use stdout_io::write_stdout_text;

const ROOT_HELP: &str = "spendview - reports over bank transaction exports

Usage:
  spendview <command> <path>

Start here:
  spendview overview operations.xlsx
  spendview --help
";

const TOP_LEVEL_HELP: &str = "spendview - reports over bank transaction exports

USAGE: spendview <command> <path> [options]

Reports:
  spendview overview <path>                               Greeting, card totals, top 5 and quotes
  spendview spending <path> --category <name>             One category over the last 3 months
  spendview invest <path> --month YYYY-MM --step <n>      Round-up savings for a month
  spendview cashback <path> --year <y> --month <m>        Per-category totals for a month

Common options:
  --at \"YYYY-MM-DD HH:MM:SS\"                              Reference time (overview, spending)
  --settings <file>                                       Use another user_settings.json
  --json                                                  Print the report as JSON

Files:
  $SPENDVIEW_HOME (default ~/.spendview) holds user_settings.json and logs/.
  Run `spendview <command> --help` for command usage.
";

fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    match run() {
        Ok(code) => code,
        Err(code) => code,
    }
}

fn run() -> Result<ExitCode, ExitCode> {
    let raw_args = std::env::args().collect::<Vec<String>>();
    if raw_args.len() == 1 {
        if write_stdout_text(ROOT_HELP).is_err() {
            return Err(ExitCode::from(2));
        }
        return Ok(ExitCode::SUCCESS);
    }
    let parsed = cli::Cli::try_parse();
    let cli = match parsed {
        Ok(value) => value,
        Err(err) => {
            if matches!(
                err.kind(),
                ErrorKind::DisplayHelp
                    | ErrorKind::DisplayVersion
                    | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
            ) {
                let text = if is_top_level_help_request(&raw_args) {
                    TOP_LEVEL_HELP.to_string()
                } else {
                    err.to_string()
                };
                if write_stdout_text(&text).is_err() {
                    return Err(ExitCode::from(2));
                }
                return Ok(ExitCode::SUCCESS);
            }
            let command_hint = if matches!(
                err.kind(),
                ErrorKind::MissingRequiredArgument
                    | ErrorKind::InvalidValue
                    | ErrorKind::ValueValidation
                    | ErrorKind::WrongNumberOfValues
                    | ErrorKind::UnknownArgument
                    | ErrorKind::InvalidSubcommand
            ) {
                command_path_from_args(&raw_args)
            } else {
                None
            };
            let clean_message = strip_clap_boilerplate(&err.to_string());
            let parse_error =
                ReportError::invalid_argument_for_command(&clean_message, command_hint.as_deref());
            let mode = infer_requested_output_mode(&raw_args);
            if output::print_failure(&parse_error, mode).is_err() {
                return Err(ExitCode::from(2));
            }
            return Err(ExitCode::from(1));
        }
    };
    let mode = output::mode_for_command(&cli.command);

    let dispatched = logging::with_command_log(|| {
        tracing::info!(command = command_name(&cli.command), "running report");
        let result = dispatch::dispatch(&cli);
        if let Err(error) = &result {
            tracing::warn!(code = %error.code, message = %error.message, "report failed");
        }
        result
    });
    match dispatched {
        Ok(success) => {
            if output::print_success(&success, mode).is_err() {
                return Err(ExitCode::from(2));
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(error) => {
            if output::print_failure(&error, mode).is_err() {
                return Err(ExitCode::from(2));
            }
            Err(exit_code_for_error(&error))
        }
    }
}

fn is_top_level_help_request(raw_args: &[String]) -> bool {
    raw_args.len() == 2 && matches!(raw_args[1].as_str(), "--help" | "-h")
}

/// Strips clap's trailing Usage line and "For more information" hint.
fn strip_clap_boilerplate(message: &str) -> String {
    let trimmed = if let Some(pos) = message.find("\n\nUsage:") {
        &message[..pos]
    } else if let Some(pos) = message.find("\nFor more information") {
        &message[..pos]
    } else {
        message
    };
    trimmed
        .trim_start_matches("error: ")
        .trim_end()
        .to_string()
}

fn command_path_from_args(raw_args: &[String]) -> Option<String> {
    let first = raw_args
        .iter()
        .skip(1)
        .find(|value| !value.starts_with('-'))?;
    match first.as_str() {
        "overview" | "spending" | "invest" | "cashback" => Some(first.clone()),
        _ => None,
    }
}

fn command_name(command: &cli::Commands) -> &'static str {
    match command {
        cli::Commands::Overview { .. } => "overview",
        cli::Commands::Spending { .. } => "spending",
        cli::Commands::Invest { .. } => "invest",
        cli::Commands::Cashback { .. } => "cashback",
    }
}

fn exit_code_for_error(error: &ReportError) -> ExitCode {
    if error.code.starts_with("internal_") {
        ExitCode::from(2)
    } else {
        ExitCode::from(1)
    }
}

fn infer_requested_output_mode(raw_args: &[String]) -> output::OutputMode {
    if raw_args.iter().skip(1).any(|value| value == "--json") {
        return output::OutputMode::Json;
    }
    output::OutputMode::Text
}

#[cfg(test)]
mod tests {
    use super::{command_path_from_args, strip_clap_boilerplate};

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn strips_usage_and_hint() {
        let message = "error: the following required arguments were not provided:\n  --category <CATEGORY>\n\nUsage: spendview spending --category <CATEGORY> <PATH>\n\nFor more information, try '--help'.\n";
        assert_eq!(
            strip_clap_boilerplate(message),
            "the following required arguments were not provided:\n  --category <CATEGORY>"
        );
    }

    #[test]
    fn command_hint_only_names_known_reports() {
        assert_eq!(
            command_path_from_args(&args(&["spendview", "--json", "invest", "rows.csv"])),
            Some("invest".to_string())
        );
        assert_eq!(command_path_from_args(&args(&["spendview", "dash"])), None);
        assert_eq!(command_path_from_args(&args(&["spendview", "--json"])), None);
    }
}
