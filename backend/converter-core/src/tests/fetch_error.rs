// Unit tests for FetchError user-facing messages and diagnostics

use crate::error::FetchError;

use common::{CurrencyCode, ErrorLocation};

/// **VALUE**: Verifies each variant maps to its fixed user-facing message.
///
/// **WHY THIS MATTERS**: These strings are what the presentation layer shows.
///
/// **BUG THIS CATCHES**: Would catch the diagnostic `Display` text (with file
/// locations) leaking into the session's error field.
#[test]
fn given_each_fetch_error_when_user_message_then_returns_fixed_text() {
    let location = ErrorLocation::caller();
    let usd = CurrencyCode::parse("usd").unwrap();
    let eur = CurrencyCode::parse("eur").unwrap();

    let list = FetchError::CurrencyList {
        reason: "HTTP 500".to_string(),
        location,
    };
    let rates = FetchError::Rates {
        base: usd.clone(),
        reason: "timeout".to_string(),
        location,
    };
    let unavailable = FetchError::RateUnavailable {
        from: usd,
        to: eur,
        location,
    };

    assert_eq!(list.user_message(), "Failed to fetch currencies list");
    assert_eq!(rates.user_message(), "Failed to fetch rates");
    assert_eq!(unavailable.user_message(), "Rate not available");
}

/// **VALUE**: Verifies the log form of the error carries its source location.
#[test]
fn given_fetch_error_when_displayed_then_includes_location_and_detail() {
    let err = FetchError::Rates {
        base: CurrencyCode::parse("eur").unwrap(),
        reason: "HTTP 503".to_string(),
        location: ErrorLocation::caller(),
    };

    let text = err.to_string();

    assert!(text.contains("Rates Error"));
    assert!(text.contains("eur"));
    assert!(text.contains("HTTP 503"));
    assert!(text.contains("fetch_error.rs"));
}
