//! Logging for the fxconv terminal front end.
//!
//! stdout belongs to the converter display, so the console sink writes
//! warnings and errors to stderr only. `fxconv.log` in the log directory
//! receives every record at the build's level, with source positions.

use crate::error::FxconvError;

use common::ErrorLocation;

use std::io::stderr;
use std::panic::Location;
use std::path::Path;
use std::sync::Once;
use std::time::SystemTime;

use fern::Dispatch;
use fern::colors::Color::{Blue, Green, Magenta, Red, Yellow};
use fern::colors::ColoredLevelConfig;
use humantime::format_rfc3339;
use log::{LevelFilter, info, warn};

static INSTALL_ONCE: Once = Once::new();

const LOG_FILE_NAME: &str = "fxconv.log";

const CONSOLE_LEVEL: LevelFilter = LevelFilter::Warn;

#[cfg(debug_assertions)]
const FILE_LEVEL: LevelFilter = LevelFilter::Debug;

#[cfg(not(debug_assertions))]
const FILE_LEVEL: LevelFilter = LevelFilter::Info;

/// Install the global logger writing to stderr and `log_dir/fxconv.log`.
///
/// Only the first call installs anything. Later calls warn and return Ok.
///
/// # Errors
///
/// Returns [`FxconvError::Fxconv`] if the log file cannot be opened or a
/// global logger is already installed by someone else.
pub fn initialize(log_dir: &Path) -> Result<(), FxconvError> {
    let mut result = None;
    // Concurrent callers block here until the first install has finished
    INSTALL_ONCE.call_once(|| {
        result = Some(install(log_dir));
    });

    let Some(result) = result else {
        warn!("Logger already initialized, keeping the existing one");
        return Ok(());
    };

    if result.is_ok() {
        info!("Logging to {} at {FILE_LEVEL:?}", log_dir.join(LOG_FILE_NAME).display());
    }
    result
}

/// Whether a global logger is installed and accepting records.
///
/// Before that, fatal errors have nowhere to go but a plain `eprintln!`.
pub fn is_active() -> bool {
    log::max_level() != LevelFilter::Off
}

fn install(log_dir: &Path) -> Result<(), FxconvError> {
    let file_sink = fern::log_file(log_dir.join(LOG_FILE_NAME))
        .map_err(|e| logger_error(format!("Cannot open log file: {e}")))?;

    Dispatch::new()
        .level(FILE_LEVEL)
        // Connection pool chatter drowns out the session at debug level
        .level_for("hyper_util", LevelFilter::Warn)
        .level_for("reqwest", LevelFilter::Info)
        .chain(console_dispatch())
        .chain(file_dispatch().chain(file_sink))
        .apply()
        .map_err(|e| logger_error(format!("Cannot install logger: {e}")))
}

fn console_dispatch() -> Dispatch {
    let colors = ColoredLevelConfig::new()
        .trace(Magenta)
        .debug(Blue)
        .info(Green)
        .warn(Yellow)
        .error(Red);

    Dispatch::new()
        .level(CONSOLE_LEVEL)
        .format(move |out, message, record| {
            out.finish(format_args!(
                "[{} - {}] {message}",
                format_rfc3339(SystemTime::now()),
                colors.color(record.level()),
            ))
        })
        .chain(stderr())
}

fn file_dispatch() -> Dispatch {
    Dispatch::new().format(|out, message, record| {
        out.finish(format_args!(
            "[{} - {}] {message} [{}:{}]",
            format_rfc3339(SystemTime::now()),
            record.level(),
            record.file().unwrap_or("unknown"),
            record.line().unwrap_or(0),
        ))
    })
}

#[track_caller]
fn logger_error(message: String) -> FxconvError {
    FxconvError::Fxconv {
        message,
        location: ErrorLocation::from(Location::caller()),
    }
}
