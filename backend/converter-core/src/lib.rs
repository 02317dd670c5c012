pub mod catalog;
pub mod config;
pub mod conversion;
pub mod error;
pub mod rates_client;
pub mod session;

#[cfg(test)]
mod tests;

pub const CURRENCY_FEED_HOST: &str = "https://cdn.jsdelivr.net";
pub const CURRENCY_FEED_PATH: &str = "/npm/@fawazahmed0/currency-api@2024-03-06/v1/currencies";
pub const DEFAULT_API_BASE: &str = const_format::concatcp!(CURRENCY_FEED_HOST, CURRENCY_FEED_PATH);

/// Base currency whose snapshot defines the catalog and the default source side.
pub const CATALOG_BASE_CURRENCY: &str = "usd";
