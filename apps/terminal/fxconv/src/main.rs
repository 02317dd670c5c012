use fxconv::error::FxconvError;
use fxconv::logger::{initialize as LoggerInitialize, is_active as logger_is_active};
use fxconv::terminal::run_terminal;

use common::ErrorLocation;
use converter_core::config::{ConverterConfig, load_dotenv, resolve_config_dir};
use converter_core::session::start_session;

use std::fs::create_dir_all;
use std::panic::Location;
use std::process::ExitCode;
use std::time::Duration;

use log::{error, info};
use tokio::io::{BufReader, stdin, stdout};

const LOG_DIR_NAME: &str = "logs";
const SETTLE_GRACE: Duration = Duration::from_secs(1);

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // The logger's console sink already writes errors to stderr
            if logger_is_active() {
                error!("{e}");
            } else {
                eprintln!("{e}");
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), FxconvError> {
    let config_dir = resolve_config_dir()?;
    let log_dir = config_dir.join(LOG_DIR_NAME);

    create_dir_all(&log_dir).map_err(|e| FxconvError::Fxconv {
        message: format!("Failed to create log directory: {e}"),
        location: ErrorLocation::from(Location::caller()),
    })?;

    // Initialize logger FIRST
    LoggerInitialize(&log_dir)?;

    info!("fxconv starting");
    info!("Config directory: {}", config_dir.display());

    load_dotenv();
    let config = ConverterConfig::load_or_create(&config_dir)?.apply_env_overrides()?;
    info!("Rate feed: {}", config.api_base);

    let client = config.rates_client()?;
    let handle = start_session(client);

    let mut output = stdout();
    run_terminal(
        &handle,
        BufReader::new(stdin()),
        &mut output,
        config.request_timeout() + SETTLE_GRACE,
    )
    .await?;

    info!("fxconv exiting");
    Ok(())
}
