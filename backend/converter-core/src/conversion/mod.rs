//! Conversion math and the per-session conversion state.
//!
//! Everything here except [`fetch_rate`] is synchronous and pure. The
//! session actor owns a [`ConversionState`] and calls into these functions
//! when user input or a fetch completion arrives.

mod state;

pub use state::ConversionState;

use crate::error::FetchError;
use crate::error::rates_client::RatesClientError;
use crate::rates_client::RatesClient;

use common::{CurrencyCode, ErrorLocation};

use std::fmt::{Display, Formatter, Result as FormatResult};
use std::panic::Location;

use log::{debug, warn};

const DISPLAY_DECIMALS_SCALE: f64 = 1_000_000.0;
// f64 spacing exceeds 1e-6 well below this, so rounding would be a no-op
const DISPLAY_ROUNDING_LIMIT: f64 = 1e15;
pub const LOADING_RATE_TEXT: &str = "Loading rate...";
pub const RATE_UNAVAILABLE_TEXT: &str = "N/A";

/// Which amount input `ConversionState::amount` was typed into.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EditedSide {
    #[default]
    From,
    To,
}

/// Source and target currency a single rate applies to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CurrencyPair {
    pub from: CurrencyCode,
    pub to: CurrencyCode,
}

impl CurrencyPair {
    pub fn new(from: CurrencyCode, to: CurrencyCode) -> Self {
        Self { from, to }
    }

    pub fn swapped(&self) -> Self {
        Self {
            from: self.to.clone(),
            to: self.from.clone(),
        }
    }
}

impl Display for CurrencyPair {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> FormatResult {
        write!(formatter, "{}/{}", self.from, self.to)
    }
}

/// Both input values as they should be displayed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConvertedAmounts {
    pub from_amount: f64,
    pub to_amount: f64,
}

/// Round to six decimal places for display.
///
/// Magnitudes of 1e15 and above are returned unchanged; scaling them could
/// overflow to infinity.
pub fn round6(value: f64) -> f64 {
    if !value.is_finite() || value.abs() >= DISPLAY_ROUNDING_LIMIT {
        return value;
    }

    (value * DISPLAY_DECIMALS_SCALE).round() / DISPLAY_DECIMALS_SCALE
}

/// Interpret raw input text as an amount.
///
/// Anything that is not a finite, non-negative number reads as 0. Input is
/// never rejected.
pub fn parse_amount(raw: &str) -> f64 {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return 0.0;
    }

    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() && value > 0.0 => value,
        Ok(_) => 0.0,
        Err(_) => {
            debug!("Amount input {trimmed:?} is not a number, using 0");
            0.0
        }
    }
}

fn usable_rate(rate: f64) -> Option<f64> {
    (rate.is_finite() && rate > 0.0).then_some(rate)
}

/// Derive both displayed amounts from the stored amount and rate.
///
/// The edited side is shown as typed; the other side is converted through
/// the rate, or 0 when the rate is not positive. Both are rounded for display
/// and nothing is written back to `state`.
pub fn compute_amounts(state: &ConversionState) -> ConvertedAmounts {
    let amount = state.amount;
    let rate = usable_rate(state.exchange_rate);

    let (from_amount, to_amount) = match state.edited_side {
        EditedSide::From => (amount, rate.map_or(0.0, |r| amount * r)),
        EditedSide::To => (rate.map_or(0.0, |r| amount / r), amount),
    };

    ConvertedAmounts {
        from_amount: round6(from_amount),
        to_amount: round6(to_amount),
    }
}

/// "1 USD = 0.920000 EUR", or the loading text while a fetch is pending.
pub fn rate_summary(state: &ConversionState) -> String {
    if state.loading {
        return LOADING_RATE_TEXT.to_string();
    }

    let label = |code: &Option<CurrencyCode>| {
        code.as_ref()
            .map(CurrencyCode::display_label)
            .unwrap_or_default()
    };

    let rate_text = usable_rate(state.exchange_rate)
        .map(|rate| format!("{rate:.6}"))
        .unwrap_or_else(|| RATE_UNAVAILABLE_TEXT.to_string());

    format!(
        "1 {} = {} {}",
        label(&state.from_currency),
        rate_text,
        label(&state.to_currency)
    )
}

/// Fetch the current rate for `pair` from the source currency's snapshot.
///
/// # Errors
///
/// - [`FetchError::Rates`] if the request or response body fails
/// - [`FetchError::RateUnavailable`] if the snapshot has no usable entry for
///   the target currency
pub async fn fetch_rate(client: &RatesClient, pair: &CurrencyPair) -> Result<f64, FetchError> {
    let snapshot = match client.fetch_snapshot(&pair.from).await {
        Ok(snapshot) => snapshot,
        Err(RatesClientError::MissingBase { .. }) => {
            return Err(FetchError::RateUnavailable {
                from: pair.from.clone(),
                to: pair.to.clone(),
                location: ErrorLocation::from(Location::caller()),
            });
        }
        Err(e) => {
            warn!("Rate request for {pair} failed: {e}");
            return Err(FetchError::Rates {
                base: pair.from.clone(),
                reason: e.to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }
    };

    snapshot
        .rate_for(&pair.to)
        .ok_or_else(|| FetchError::RateUnavailable {
            from: pair.from.clone(),
            to: pair.to.clone(),
            location: ErrorLocation::from(Location::caller()),
        })
}
