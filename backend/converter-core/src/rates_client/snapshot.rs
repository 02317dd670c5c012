use crate::error::rates_client::RatesClientError;

use common::{CurrencyCode, ErrorLocation};

use std::panic::Location;

use log::debug;
use serde_json::{Map, Value};

/// Rates published for one base currency, in document order.
#[derive(Debug, Clone, PartialEq)]
pub struct RateSnapshot {
    base: CurrencyCode,
    rates: Map<String, Value>,
}

impl RateSnapshot {
    /// Extract the table stored under `base` from a feed document.
    ///
    /// Sibling keys such as `date` are ignored.
    #[track_caller]
    pub fn from_document(base: CurrencyCode, document: Value) -> Result<Self, RatesClientError> {
        let location = ErrorLocation::from(Location::caller());

        let Value::Object(mut root) = document else {
            return Err(RatesClientError::MissingBase { base, location });
        };

        match root.remove(base.as_str()) {
            Some(Value::Object(rates)) => Ok(Self { base, rates }),
            _ => Err(RatesClientError::MissingBase { base, location }),
        }
    }

    pub fn base(&self) -> &CurrencyCode {
        &self.base
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    /// Currency codes listed in the table, in the order the feed wrote them.
    ///
    /// Keys that are not valid codes are skipped.
    pub fn currencies(&self) -> Vec<CurrencyCode> {
        self.rates
            .keys()
            .filter_map(|key| match CurrencyCode::parse(key) {
                Ok(code) => Some(code),
                Err(e) => {
                    debug!("Skipping snapshot key {key:?}: {e}");
                    None
                }
            })
            .collect()
    }

    /// Units of `target` per one unit of the base.
    ///
    /// Returns `None` when the entry is absent, not a number, or not a
    /// positive finite value.
    pub fn rate_for(&self, target: &CurrencyCode) -> Option<f64> {
        self.rates
            .get(target.as_str())
            .and_then(Value::as_f64)
            .filter(|rate| rate.is_finite() && *rate > 0.0)
    }
}
