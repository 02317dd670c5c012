pub mod config;
pub mod fetch;
pub mod rates_client;
pub mod session;

pub use fetch::FetchError;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    RatesClient(#[from] rates_client::RatesClientError),

    #[error(transparent)]
    Session(#[from] session::SessionError),

    #[error(transparent)]
    Config(#[from] config::ConfigError),
}
