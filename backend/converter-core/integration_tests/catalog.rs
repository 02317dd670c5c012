use crate::helpers::{client_for, code, mount_snapshot, snapshot_body, snapshot_path};

use converter_core::catalog::load_catalog;
use converter_core::error::FetchError;

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// **VALUE**: Verifies the catalog is the usd table's key set in feed order.
///
/// **WHY THIS MATTERS**: The catalog is the option list shown for both
/// currency selectors.
#[tokio::test]
async fn given_usd_snapshot_when_catalog_loaded_then_codes_in_feed_order() {
    // GIVEN: A usd snapshot with three currencies
    let server = MockServer::start().await;
    mount_snapshot(
        &server,
        "usd",
        snapshot_body("usd", &[("usd", 1.0), ("eur", 0.92), ("jpy", 151.5)]),
    )
    .await;

    // WHEN: Loading the catalog
    let catalog = load_catalog(&client_for(&server)).await.unwrap();

    // THEN: Codes match the snapshot keys and the default pair is usd/eur
    assert_eq!(catalog.codes(), &[code("usd"), code("eur"), code("jpy")]);
    let pair = catalog.default_pair().unwrap();
    assert_eq!(pair.from, code("usd"));
    assert_eq!(pair.to, code("eur"));
}

/// **VALUE**: Verifies server failures map to the currency-list error.
///
/// **BUG THIS CATCHES**: Would catch the catalog failure being reported with
/// the rate-fetch message.
#[tokio::test]
async fn given_feed_error_when_catalog_loaded_then_currency_list_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(snapshot_path("usd")))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let result = load_catalog(&client_for(&server)).await;

    match result {
        Err(err @ FetchError::CurrencyList { .. }) => {
            assert_eq!(err.user_message(), "Failed to fetch currencies list");
        }
        other => panic!("Expected CurrencyList error, got {other:?}"),
    }
}

/// **VALUE**: Verifies an empty table is a failed load, not an empty catalog.
///
/// **BUG THIS CATCHES**: Would catch a "successful" load leaving the session
/// with no pair and no error message.
#[tokio::test]
async fn given_empty_usd_table_when_catalog_loaded_then_currency_list_error() {
    let server = MockServer::start().await;
    mount_snapshot(&server, "usd", snapshot_body("usd", &[])).await;

    let result = load_catalog(&client_for(&server)).await;

    assert!(matches!(result, Err(FetchError::CurrencyList { .. })));
}
