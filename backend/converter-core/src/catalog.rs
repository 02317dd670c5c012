//! Supported currency list and the default pair derived from it.

use crate::CATALOG_BASE_CURRENCY;
use crate::conversion::CurrencyPair;
use crate::error::FetchError;
use crate::rates_client::RatesClient;

use common::{CurrencyCode, ErrorLocation};

use std::panic::Location;

use log::{info, warn};

/// Ordered set of currency codes the feed publishes.
///
/// Empty until the session's one catalog load succeeds, then fixed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CurrencyCatalog {
    codes: Vec<CurrencyCode>,
}

impl CurrencyCatalog {
    pub fn new(codes: Vec<CurrencyCode>) -> Self {
        Self { codes }
    }

    pub fn codes(&self) -> &[CurrencyCode] {
        &self.codes
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    pub fn contains(&self, code: &CurrencyCode) -> bool {
        self.codes.contains(code)
    }

    /// `(usd, first entry that is not usd)`, falling back to the first entry
    /// when usd is the only member.
    ///
    /// Returns `None` for an empty catalog.
    pub fn default_pair(&self) -> Option<CurrencyPair> {
        let base = base_currency()?;
        let target = self
            .codes
            .iter()
            .find(|code| **code != base)
            .or_else(|| self.codes.first())?
            .clone();

        Some(CurrencyPair::new(base, target))
    }
}

fn base_currency() -> Option<CurrencyCode> {
    CurrencyCode::parse(CATALOG_BASE_CURRENCY).ok()
}

/// Fetch the catalog from the base currency's snapshot.
///
/// # Errors
///
/// Returns [`FetchError::CurrencyList`] for any request, status or body
/// failure, and for a snapshot that lists no currencies.
pub async fn load_catalog(client: &RatesClient) -> Result<CurrencyCatalog, FetchError> {
    let base = base_currency().ok_or_else(|| FetchError::CurrencyList {
        reason: format!("invalid base currency '{CATALOG_BASE_CURRENCY}'"),
        location: ErrorLocation::from(Location::caller()),
    })?;

    let snapshot = client.fetch_snapshot(&base).await.map_err(|e| {
        warn!("Currency list request failed: {e}");
        FetchError::CurrencyList {
            reason: e.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    })?;

    let catalog = CurrencyCatalog::new(snapshot.currencies());
    if catalog.is_empty() {
        return Err(FetchError::CurrencyList {
            reason: format!("snapshot for '{base}' lists no currencies"),
            location: ErrorLocation::from(Location::caller()),
        });
    }

    info!("Loaded {} currencies", catalog.len());
    Ok(catalog)
}
