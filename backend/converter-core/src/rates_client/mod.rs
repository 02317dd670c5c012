//! HTTP access to the currency snapshot feed.
//!
//! The feed publishes one JSON document per base currency at
//! `{api_base}/{code}.json`, shaped as `{"date": "...", "<code>": {"<other>": rate}}`.

mod snapshot;

pub use snapshot::RateSnapshot;

use crate::error::rates_client::RatesClientError;

use common::{CurrencyCode, ErrorLocation, HttpStatusCode};

use std::panic::Location;
use std::time::Duration;

use log::{debug, warn};
use reqwest::Client;
use serde_json::Value;
use url::Url;

pub const DEFAULT_TIMEOUT_DURATION: Duration = Duration::from_secs(30);
const SNAPSHOT_FILE_EXTENSION: &str = "json";

#[derive(Debug, Clone)]
pub struct RatesClient {
    base_url: Url,
    client: Client,
}

impl RatesClient {
    /// Build a client for the feed rooted at `api_base`.
    ///
    /// # Errors
    ///
    /// Returns [`RatesClientError::UrlParse`] for a malformed base, or
    /// [`RatesClientError::Http`] if the HTTP client cannot be constructed.
    pub fn new(api_base: &str, timeout: Duration) -> Result<Self, RatesClientError> {
        // Url::join replaces the last segment unless the base ends in '/'
        let normalized = if api_base.ends_with('/') {
            api_base.to_string()
        } else {
            format!("{api_base}/")
        };

        let base_url = Url::parse(&normalized)?;
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self { base_url, client })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// URL of the snapshot document for `base`.
    pub fn snapshot_url(&self, base: &CurrencyCode) -> Result<Url, RatesClientError> {
        Ok(self
            .base_url
            .join(&format!("{}.{SNAPSHOT_FILE_EXTENSION}", base.as_str()))?)
    }

    /// Fetch the rate table published for `base`.
    ///
    /// # Errors
    ///
    /// - [`RatesClientError::Http`] on transport failure or timeout
    /// - [`RatesClientError::Server`] on a non-2xx status
    /// - [`RatesClientError::Json`] if the body is not JSON
    /// - [`RatesClientError::MissingBase`] if the document has no table for `base`
    pub async fn fetch_snapshot(
        &self,
        base: &CurrencyCode,
    ) -> Result<RateSnapshot, RatesClientError> {
        let url = self.snapshot_url(base)?;
        debug!("Fetching rate snapshot: {url}");

        let response = self.client.get(url).send().await?;

        let status = HttpStatusCode::from(response.status().as_u16());
        if !status.is_success() {
            if status.is_not_found() {
                warn!("Feed has no snapshot for base '{base}'");
            } else if status.is_server_error() {
                warn!("Feed server error {status} for base '{base}'");
            }
            return Err(RatesClientError::Server {
                status,
                message: response.text().await.unwrap_or_default(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let body = response.text().await?;
        let json: Value = serde_json::from_str(&body)?;

        RateSnapshot::from_document(base.clone(), json)
    }
}
