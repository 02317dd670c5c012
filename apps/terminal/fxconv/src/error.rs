use common::ErrorLocation;

use converter_core::error::CoreError;
use converter_core::error::config::ConfigError;
use converter_core::error::rates_client::RatesClientError;
use converter_core::error::session::SessionError;

use thiserror::Error;

/// Errors surfaced by the terminal front end.
#[derive(Debug, Error)]
pub enum FxconvError {
    /// Error from this app (logger, terminal I/O)
    #[error("Fxconv Error: {message} {location}")]
    Fxconv {
        message: String,
        location: ErrorLocation,
    },

    /// Line typed at the prompt could not be understood
    #[error("Input Error: {message} {location}")]
    Input {
        message: String,
        location: ErrorLocation,
    },

    #[error(transparent)]
    Core(#[from] CoreError),
}

impl From<ConfigError> for FxconvError {
    fn from(error: ConfigError) -> Self {
        FxconvError::Core(CoreError::Config(error))
    }
}

impl From<SessionError> for FxconvError {
    fn from(error: SessionError) -> Self {
        FxconvError::Core(CoreError::Session(error))
    }
}

impl From<RatesClientError> for FxconvError {
    fn from(error: RatesClientError) -> Self {
        FxconvError::Core(CoreError::RatesClient(error))
    }
}
