use crate::ErrorLocation;

use thiserror::Error as ThisError;

#[derive(Debug, Clone, ThisError)]
pub enum CurrencyCodeError {
    #[error("Empty Currency Code Error: {location}")]
    Empty { location: ErrorLocation },

    #[error("Invalid Currency Code Error: '{code}' {location}")]
    InvalidCharacters {
        code: String,
        location: ErrorLocation,
    },
}
