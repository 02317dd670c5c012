//! Failures of the two session fetches, as surfaced to the user.

use common::{CurrencyCode, ErrorLocation};

use thiserror::Error as ThisError;

pub const CURRENCY_LIST_FAILED_MESSAGE: &str = "Failed to fetch currencies list";
pub const RATES_FAILED_MESSAGE: &str = "Failed to fetch rates";
pub const RATE_NOT_AVAILABLE_MESSAGE: &str = "Rate not available";

/// A catalog load or rate refresh that did not produce a usable value.
///
/// `Display` carries the diagnostic detail for logs. The text placed in the
/// session's `error` field comes from [`FetchError::user_message`] and is one
/// of three fixed strings.
#[derive(Debug, Clone, ThisError)]
pub enum FetchError {
    #[error("Currency List Error: {reason} {location}")]
    CurrencyList {
        reason: String,
        location: ErrorLocation,
    },

    #[error("Rates Error: {base}: {reason} {location}")]
    Rates {
        base: CurrencyCode,
        reason: String,
        location: ErrorLocation,
    },

    #[error("Rate Unavailable Error: {from} -> {to} {location}")]
    RateUnavailable {
        from: CurrencyCode,
        to: CurrencyCode,
        location: ErrorLocation,
    },
}

impl FetchError {
    pub fn user_message(&self) -> &'static str {
        match self {
            FetchError::CurrencyList { .. } => CURRENCY_LIST_FAILED_MESSAGE,
            FetchError::Rates { .. } => RATES_FAILED_MESSAGE,
            FetchError::RateUnavailable { .. } => RATE_NOT_AVAILABLE_MESSAGE,
        }
    }
}
