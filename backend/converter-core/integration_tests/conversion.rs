use crate::helpers::{client_for, code, mount_snapshot, snapshot_body, snapshot_path};

use converter_core::conversion::{CurrencyPair, fetch_rate};
use converter_core::error::FetchError;

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn usd_eur() -> CurrencyPair {
    CurrencyPair::new(code("usd"), code("eur"))
}

#[tokio::test]
async fn given_pair_in_snapshot_when_rate_fetched_then_returns_rate() {
    let server = MockServer::start().await;
    mount_snapshot(&server, "usd", snapshot_body("usd", &[("eur", 0.92)])).await;

    let rate = fetch_rate(&client_for(&server), &usd_eur()).await.unwrap();

    assert_eq!(rate, 0.92);
}

/// **VALUE**: Verifies a target missing from the snapshot is "Rate not available".
#[tokio::test]
async fn given_target_missing_when_rate_fetched_then_rate_unavailable() {
    let server = MockServer::start().await;
    mount_snapshot(&server, "usd", snapshot_body("usd", &[("jpy", 151.5)])).await;

    let result = fetch_rate(&client_for(&server), &usd_eur()).await;

    match result {
        Err(err @ FetchError::RateUnavailable { .. }) => {
            assert_eq!(err.user_message(), "Rate not available");
        }
        other => panic!("Expected RateUnavailable, got {other:?}"),
    }
}

/// **VALUE**: Verifies a zero rate is treated as unavailable.
///
/// **BUG THIS CATCHES**: Would catch a zero rate being installed in the session.
#[tokio::test]
async fn given_zero_rate_when_rate_fetched_then_rate_unavailable() {
    let server = MockServer::start().await;
    mount_snapshot(&server, "usd", snapshot_body("usd", &[("eur", 0.0)])).await;

    let result = fetch_rate(&client_for(&server), &usd_eur()).await;

    assert!(matches!(result, Err(FetchError::RateUnavailable { .. })));
}

#[tokio::test]
async fn given_feed_error_when_rate_fetched_then_rates_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(snapshot_path("usd")))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let result = fetch_rate(&client_for(&server), &usd_eur()).await;

    match result {
        Err(err @ FetchError::Rates { .. }) => {
            assert_eq!(err.user_message(), "Failed to fetch rates");
        }
        other => panic!("Expected Rates error, got {other:?}"),
    }
}
