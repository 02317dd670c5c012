pub mod currency_code;
pub mod error_location;
