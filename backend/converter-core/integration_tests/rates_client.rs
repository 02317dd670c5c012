use crate::helpers::{
    TEST_REQUEST_TIMEOUT, api_base, client_for, code, mount_snapshot, snapshot_body,
    snapshot_path,
};

use converter_core::error::rates_client::RatesClientError;
use converter_core::rates_client::RatesClient;

use std::time::Duration;

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ============================================================================
// RatesClient against a mocked feed
// ============================================================================

/// **VALUE**: Verifies a snapshot is fetched from `{api_base}/{code}.json`.
///
/// **WHY THIS MATTERS**: Every catalog load and rate refresh goes through this call.
///
/// **BUG THIS CATCHES**: Would catch the URL join dropping the last path
/// segment of the base (`.../currencies` + `usd.json` → `.../usd.json`).
#[tokio::test]
async fn given_feed_with_usd_snapshot_when_fetched_then_returns_rates() {
    // GIVEN: A feed serving usd.json under a nested base path
    let server = MockServer::start().await;
    mount_snapshot(&server, "usd", snapshot_body("usd", &[("eur", 0.92), ("jpy", 151.5)])).await;
    let client = client_for(&server);

    // WHEN: Fetching the usd snapshot
    let snapshot = client.fetch_snapshot(&code("usd")).await.unwrap();

    // THEN: Rates are available by target code
    assert_eq!(snapshot.rate_for(&code("eur")), Some(0.92));
    assert_eq!(snapshot.rate_for(&code("jpy")), Some(151.5));
    assert_eq!(snapshot.len(), 2);
}

/// **VALUE**: Verifies a trailing slash on the base makes no difference.
#[tokio::test]
async fn given_base_with_trailing_slash_when_snapshot_url_built_then_same_as_without() {
    let server = MockServer::start().await;
    let without = RatesClient::new(&api_base(&server), TEST_REQUEST_TIMEOUT).unwrap();
    let with = RatesClient::new(&format!("{}/", api_base(&server)), TEST_REQUEST_TIMEOUT).unwrap();

    let eur = code("eur");

    assert_eq!(
        without.snapshot_url(&eur).unwrap(),
        with.snapshot_url(&eur).unwrap()
    );
    assert!(
        without
            .snapshot_url(&eur)
            .unwrap()
            .as_str()
            .ends_with("/v1/currencies/eur.json")
    );
}

#[test]
fn given_malformed_base_when_client_created_then_returns_url_parse_error() {
    let result = RatesClient::new("not a url", TEST_REQUEST_TIMEOUT);

    assert!(matches!(result, Err(RatesClientError::UrlParse { .. })));
}

/// **VALUE**: Verifies non-2xx responses become `Server` errors with the status.
///
/// **BUG THIS CATCHES**: Would catch an error page body being parsed as JSON
/// and reported as a confusing JSON error.
#[tokio::test]
async fn given_feed_returns_404_when_fetched_then_returns_server_error_with_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(snapshot_path("xyz")))
        .respond_with(ResponseTemplate::new(404).set_body_string("Not Found"))
        .mount(&server)
        .await;

    let result = client_for(&server).fetch_snapshot(&code("xyz")).await;

    match result {
        Err(RatesClientError::Server {
            status, message, ..
        }) => {
            assert_eq!(status.0, 404);
            assert!(status.is_not_found());
            assert_eq!(message, "Not Found");
        }
        other => panic!("Expected Server error, got {other:?}"),
    }
}

#[tokio::test]
async fn given_feed_returns_invalid_json_when_fetched_then_returns_json_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(snapshot_path("usd")))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let result = client_for(&server).fetch_snapshot(&code("usd")).await;

    assert!(matches!(result, Err(RatesClientError::Json { .. })));
}

#[tokio::test]
async fn given_document_for_other_base_when_fetched_then_returns_missing_base_error() {
    let server = MockServer::start().await;
    mount_snapshot(&server, "usd", snapshot_body("eur", &[("usd", 1.08)])).await;

    let result = client_for(&server).fetch_snapshot(&code("usd")).await;

    assert!(matches!(result, Err(RatesClientError::MissingBase { .. })));
}

/// **VALUE**: Verifies the configured request timeout is enforced.
///
/// **WHY THIS MATTERS**: A hung feed would otherwise keep the session in the
/// loading state forever.
#[tokio::test]
async fn given_slow_feed_when_fetched_then_times_out_with_http_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(snapshot_path("usd")))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(snapshot_body("usd", &[("eur", 0.92)]))
                .set_delay(Duration::from_millis(800)),
        )
        .mount(&server)
        .await;
    let client = RatesClient::new(&api_base(&server), Duration::from_millis(100)).unwrap();

    let result = client.fetch_snapshot(&code("usd")).await;

    assert!(matches!(result, Err(RatesClientError::Http { .. })));
}
