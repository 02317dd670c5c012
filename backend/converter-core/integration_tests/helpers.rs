//! Test helpers for integration tests against a mocked currency feed.
//!
//! - Building feed documents
//! - Mounting snapshot responses on a wiremock server
//! - Waiting for session state to settle

use converter_core::conversion::ConversionState;
use converter_core::rates_client::RatesClient;
use converter_core::session::ConverterHandle;

use common::CurrencyCode;

use std::time::Duration;

use serde_json::{Map, Value, json};
use tokio::time::timeout;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const FEED_PATH: &str = "/v1/currencies";
pub const WAIT_TIMEOUT: Duration = Duration::from_secs(5);
pub const TEST_REQUEST_TIMEOUT: Duration = Duration::from_secs(2);

pub fn code(raw: &str) -> CurrencyCode {
    CurrencyCode::parse(raw).expect("valid test currency code")
}

/// Feed document `{"date": ..., "<base>": {<rates>}}` with rates in the given order.
pub fn snapshot_body(base: &str, rates: &[(&str, f64)]) -> Value {
    let mut table = Map::new();
    for (target, rate) in rates {
        table.insert((*target).to_string(), json!(rate));
    }

    let mut document = Map::new();
    document.insert("date".to_string(), json!("2024-03-06"));
    document.insert(base.to_string(), Value::Object(table));
    Value::Object(document)
}

pub fn snapshot_path(base: &str) -> String {
    format!("{FEED_PATH}/{base}.json")
}

pub fn api_base(server: &MockServer) -> String {
    format!("{}{FEED_PATH}", server.uri())
}

pub fn client_for(server: &MockServer) -> RatesClient {
    RatesClient::new(&api_base(server), TEST_REQUEST_TIMEOUT).expect("valid mock server URL")
}

/// Mount a 200 response for `{base}.json`.
pub async fn mount_snapshot(server: &MockServer, base: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path(snapshot_path(base)))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

/// Mount a response for `{base}.json` that answers at most `times` requests.
pub async fn mount_snapshot_times(
    server: &MockServer,
    base: &str,
    response: ResponseTemplate,
    times: u64,
) {
    Mock::given(method("GET"))
        .and(path(snapshot_path(base)))
        .respond_with(response)
        .up_to_n_times(times)
        .mount(server)
        .await;
}

/// Wait until the session publishes a state matching `predicate`.
pub async fn wait_for_state<F>(handle: &ConverterHandle, predicate: F) -> ConversionState
where
    F: FnMut(&ConversionState) -> bool,
{
    let mut state_rx = handle.subscribe();
    timeout(WAIT_TIMEOUT, state_rx.wait_for(predicate))
        .await
        .expect("Timed out waiting for session state")
        .expect("Session actor stopped")
        .clone()
}

/// Wait until the session has a pair and no fetch is in flight.
pub async fn wait_for_idle(handle: &ConverterHandle) -> ConversionState {
    wait_for_state(handle, |state| !state.loading).await
}
