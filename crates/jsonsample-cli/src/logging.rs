use std::fs::{File, OpenOptions};
use std::io;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::prelude::*;

use crate::settings::LogSettings;

pub const LOG_FILE: &str = "jsonsample.log";

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("failed to open log file: {0}")]
    Io(#[from] io::Error),
    #[error("invalid log filter: {0}")]
    Filter(String),
    #[error("failed to install subscriber: {0}")]
    Install(String),
}

/// Installs the global subscriber: JSON lines appended to `<dir>/jsonsample.log`
/// when a log directory is configured, plain text on stderr otherwise.
pub fn init_logging(settings: &LogSettings) -> Result<(), LoggingError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&settings.level)
            .map_err(|err| LoggingError::Filter(err.to_string()))?,
    };

    match &settings.dir {
        Some(dir) => {
            let layer = tracing_subscriber::fmt::layer()
                .json()
                .with_timer(UtcTime::rfc_3339())
                .with_writer(file_writer(dir)?);
            tracing_subscriber::registry()
                .with(filter)
                .with(layer)
                .try_init()
                .map_err(|err| LoggingError::Install(err.to_string()))
        }
        None => {
            let layer = tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(io::stderr);
            tracing_subscriber::registry()
                .with(filter)
                .with(layer)
                .try_init()
                .map_err(|err| LoggingError::Install(err.to_string()))
        }
    }
}

/// Log file handle; tracing-subscriber serializes writers through the lock.
pub(crate) fn file_writer(dir: &Path) -> Result<Mutex<File>, LoggingError> {
    std::fs::create_dir_all(dir)?;
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join(LOG_FILE))?;
    Ok(Mutex::new(file))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn scratch_dir() -> std::path::PathBuf {
        std::env::temp_dir().join(format!("jsonsample-log-{}", uuid::Uuid::new_v4()))
    }

    #[test]
    fn file_writer_creates_directory_and_appends() {
        let dir = scratch_dir().join("nested");
        {
            let writer = file_writer(&dir).expect("first open");
            writeln!(writer.lock().expect("lock"), "one").expect("write");
        }
        {
            let writer = file_writer(&dir).expect("second open");
            writeln!(writer.lock().expect("lock"), "two").expect("write");
        }
        let log = std::fs::read_to_string(dir.join(LOG_FILE)).expect("read log");
        assert_eq!(log, "one\ntwo\n");
        std::fs::remove_dir_all(dir.parent().expect("parent")).ok();
    }

    #[test]
    fn unusable_log_directory_is_an_io_error() {
        let dir = scratch_dir();
        std::fs::create_dir_all(&dir).expect("dir");
        let blocker = dir.join("file");
        std::fs::write(&blocker, "x").expect("blocker");
        let err = file_writer(&blocker).expect_err("not a directory");
        assert!(matches!(err, LoggingError::Io(_)));
        std::fs::remove_dir_all(&dir).ok();
    }
}
