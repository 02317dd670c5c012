use common::{CurrencyCode, ErrorLocation, HttpStatusCode};

use std::panic::Location;

use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum RatesClientError {
    #[error("HTTP Error: {message} {location}")]
    Http {
        message: String,
        location: ErrorLocation,
    },

    #[error("JSON Error: {message} {location}")]
    Json {
        message: String,
        location: ErrorLocation,
    },

    #[error("URL Parse Error: {message} {location}")]
    UrlParse {
        message: String,
        location: ErrorLocation,
    },

    #[error("Server Error: HTTP {status} - {message} {location}")]
    Server {
        status: HttpStatusCode,
        message: String,
        location: ErrorLocation,
    },

    /// Response parsed but had no object under the requested base key.
    #[error("Missing Base Error: snapshot has no '{base}' table {location}")]
    MissingBase {
        base: CurrencyCode,
        location: ErrorLocation,
    },
}

impl From<url::ParseError> for RatesClientError {
    #[track_caller]
    fn from(error: url::ParseError) -> Self {
        RatesClientError::UrlParse {
            message: error.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<reqwest::Error> for RatesClientError {
    #[track_caller]
    fn from(error: reqwest::Error) -> Self {
        RatesClientError::Http {
            message: error.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<serde_json::Error> for RatesClientError {
    #[track_caller]
    fn from(error: serde_json::Error) -> Self {
        RatesClientError::Json {
            message: error.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}
