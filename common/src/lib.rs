//! Shared primitives for fxconv.
//!
//! This crate holds the small value types that every other crate in the
//! workspace passes around. They carry no I/O and no async code.
//!
//! ## Architecture
//!
//! - **common** (this crate): Value types and error location tracking
//! - **converter-core**: Rate fetching, catalog, conversion session
//! - **fxconv**: Terminal front end wiring everything together

pub mod currency_code;
pub mod error;
pub mod http_status;


pub use currency_code::CurrencyCode;
pub use error::currency_code::CurrencyCodeError;
pub use error::error_location::ErrorLocation;
pub use http_status::HttpStatusCode;
