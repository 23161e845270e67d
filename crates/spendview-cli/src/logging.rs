use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use spendview_core::settings::{logs_dir, resolve_home};
use tracing_subscriber::EnvFilter;

pub const LOG_FILE_NAME: &str = "spendview.log";
const DEFAULT_FILTER: &str = "info";

/// Runs `command` with a file subscriber installed for its duration only.
///
/// The log file is closed when the subscriber drops at the end of the call. When no log
/// file can be opened the command still runs, without a subscriber.
pub fn with_command_log<T>(command: impl FnOnce() -> T) -> T {
    let Some(file) = resolve_home(None)
        .ok()
        .and_then(|home| open_log_file(&logs_dir(&home)))
    else {
        return command();
    };

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .finish();

    tracing::subscriber::with_default(subscriber, command)
}

pub fn log_file_path(logs: &Path) -> PathBuf {
    logs.join(LOG_FILE_NAME)
}

fn open_log_file(logs: &Path) -> Option<File> {
    fs::create_dir_all(logs).ok()?;
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file_path(logs))
        .ok()
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::{log_file_path, open_log_file};

    #[test]
    fn log_file_is_created_under_logs_dir() {
        let dir = tempfile::tempdir();
        assert!(dir.is_ok());
        if let Ok(dir) = dir {
            let logs = dir.path().join("logs");
            assert!(open_log_file(&logs).is_some());
            assert!(fs::metadata(log_file_path(&logs)).is_ok());
        }
    }
}
