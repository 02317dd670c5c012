use crate::helpers::{
    client_for, code, mount_snapshot, mount_snapshot_times, snapshot_body, snapshot_path,
    wait_for_idle, wait_for_state,
};

use converter_core::conversion::EditedSide;
use converter_core::session::{SessionCommand, start_session};

use std::time::Duration;

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn usd_body() -> serde_json::Value {
    snapshot_body("usd", &[("usd", 1.0), ("eur", 0.92), ("jpy", 151.5)])
}

fn eur_body() -> serde_json::Value {
    snapshot_body("eur", &[("eur", 1.0), ("usd", 1.087), ("jpy", 164.6)])
}

// ============================================================================
// Session lifecycle: catalog load, default pair, first rate
// ============================================================================

/// **VALUE**: Verifies session start loads the catalog, picks usd/eur and
/// fetches the usd→eur rate, then converts typed amounts with it.
///
/// **WHY THIS MATTERS**: This is the full start-up path every user sees.
///
/// **BUG THIS CATCHES**: Would catch the catalog defaulting not triggering a
/// rate refresh (rate stuck at 1), or the amount not being converted.
#[tokio::test]
async fn given_feed_when_session_started_then_defaults_loaded_and_amount_converted() {
    // GIVEN: A feed whose usd snapshot serves both the catalog and the first rate
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(snapshot_path("usd")))
        .respond_with(ResponseTemplate::new(200).set_body_json(usd_body()))
        .expect(2)
        .mount(&server)
        .await;

    // WHEN: Starting a session and waiting for it to settle
    let handle = start_session(client_for(&server));
    let state = wait_for_idle(&handle).await;

    // THEN: Default pair and rate are in place
    assert_eq!(state.from_currency, Some(code("usd")));
    assert_eq!(state.to_currency, Some(code("eur")));
    assert_eq!(state.exchange_rate, 0.92);
    assert!(state.error.is_none());
    assert_eq!(
        state.currency_options(),
        &[code("usd"), code("eur"), code("jpy")]
    );
    assert_eq!(handle.view().summary, "1 USD = 0.920000 EUR");

    // WHEN: Typing 10 into the source amount
    handle.set_from_amount("10").await.unwrap();
    wait_for_state(&handle, |s| s.amount == 10.0).await;

    // THEN: The target shows 9.2
    let view = handle.view();
    assert_eq!(view.from_amount, 10.0);
    assert_eq!(view.to_amount, 9.2);
}

/// **VALUE**: Verifies a typed target amount is converted back to the source.
#[tokio::test]
async fn given_loaded_session_when_to_amount_set_then_from_amount_derived() {
    let server = MockServer::start().await;
    mount_snapshot(&server, "usd", usd_body()).await;
    let handle = start_session(client_for(&server));
    wait_for_idle(&handle).await;

    handle.set_to_amount("9.2").await.unwrap();
    let state = wait_for_state(&handle, |s| s.edited_side == EditedSide::To).await;

    assert_eq!(state.amount, 9.2);
    let view = handle.view();
    assert_eq!(view.to_amount, 9.2);
    assert_eq!(view.from_amount, 10.0);
}

/// **VALUE**: Verifies non-numeric input reads as 0 without raising an error.
#[tokio::test]
async fn given_loaded_session_when_non_numeric_amount_set_then_amount_zero_without_error() {
    let server = MockServer::start().await;
    mount_snapshot(&server, "usd", usd_body()).await;
    let handle = start_session(client_for(&server));
    wait_for_idle(&handle).await;
    handle.set_from_amount("5").await.unwrap();
    wait_for_state(&handle, |s| s.amount == 5.0).await;

    handle.set_from_amount("five").await.unwrap();
    let state = wait_for_state(&handle, |s| s.amount == 0.0).await;

    assert!(state.error.is_none());
    assert_eq!(handle.view().to_amount, 0.0);
}

// ============================================================================
// Swap and pair changes
// ============================================================================

/// **VALUE**: Verifies swap exchanges the pair, keeps the typed amount, and
/// issues exactly one request for the swapped pair.
///
/// **WHY THIS MATTERS**: The reverse rate is fetched, not derived as 1/rate,
/// because the feed does not guarantee the two are exact inverses.
///
/// **BUG THIS CATCHES**: Would catch swap computing 1/rate locally, issuing
/// duplicate refreshes, or resetting the amount.
#[tokio::test]
async fn given_loaded_session_when_swapped_then_pair_reversed_and_one_refresh_issued() {
    // GIVEN: A settled usd/eur session with an amount typed
    let server = MockServer::start().await;
    mount_snapshot(&server, "usd", usd_body()).await;
    Mock::given(method("GET"))
        .and(path(snapshot_path("eur")))
        .respond_with(ResponseTemplate::new(200).set_body_json(eur_body()))
        .expect(1)
        .mount(&server)
        .await;

    let handle = start_session(client_for(&server));
    wait_for_idle(&handle).await;
    handle.set_from_amount("100").await.unwrap();
    wait_for_state(&handle, |s| s.amount == 100.0).await;

    // WHEN: Swapping
    handle.swap().await.unwrap();
    let state = wait_for_state(&handle, |s| {
        s.from_currency == Some(code("eur")) && !s.loading
    })
    .await;

    // THEN: Pair reversed, eur rate installed, input unchanged
    assert_eq!(state.to_currency, Some(code("usd")));
    assert_eq!(state.exchange_rate, 1.087);
    assert_eq!(state.amount, 100.0);
    assert_eq!(state.edited_side, EditedSide::From);
    assert_eq!(handle.view().to_amount, 108.7);
}

#[tokio::test]
async fn given_loaded_session_when_target_changed_then_rate_refreshed_for_new_pair() {
    let server = MockServer::start().await;
    mount_snapshot(&server, "usd", usd_body()).await;
    let handle = start_session(client_for(&server));
    wait_for_idle(&handle).await;

    handle
        .update(SessionCommand::SetToCurrency(code("jpy")))
        .await
        .unwrap();
    let state = wait_for_state(&handle, |s| s.exchange_rate == 151.5 && !s.loading).await;

    assert_eq!(state.to_currency, Some(code("jpy")));
    assert_eq!(handle.view().summary, "1 USD = 151.500000 JPY");
}

/// **VALUE**: Verifies a slow response for a superseded pair cannot overwrite
/// the rate of the pair selected afterwards.
///
/// **WHY THIS MATTERS**: Requests can complete out of order. Without request
/// tagging the display would show the usd→eur rate labelled as eur→usd.
///
/// **BUG THIS CATCHES**: Would catch removal of the generation check.
#[tokio::test]
async fn given_slow_stale_request_when_pair_changes_then_latest_rate_wins() {
    // GIVEN: The catalog answers fast, the usd/eur rate answers slowly,
    // and the eur/usd rate answers fast
    let server = MockServer::start().await;
    mount_snapshot_times(
        &server,
        "usd",
        ResponseTemplate::new(200).set_body_json(usd_body()),
        1,
    )
    .await;
    Mock::given(method("GET"))
        .and(path(snapshot_path("usd")))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(snapshot_body("usd", &[("eur", 0.5)]))
                .set_delay(Duration::from_millis(600)),
        )
        .mount(&server)
        .await;
    mount_snapshot(&server, "eur", eur_body()).await;

    let handle = start_session(client_for(&server));
    wait_for_state(&handle, |s| s.pair().is_some()).await;

    // WHEN: Swapping while the usd/eur request is still in flight
    handle.swap().await.unwrap();
    wait_for_state(&handle, |s| s.exchange_rate == 1.087 && !s.loading).await;
    tokio::time::sleep(Duration::from_millis(900)).await;

    // THEN: The eur/usd rate is still in place
    let state = handle.state();
    assert_eq!(state.from_currency, Some(code("eur")));
    assert_eq!(state.exchange_rate, 1.087);
    assert!(!state.loading);
}

// ============================================================================
// Failures
// ============================================================================

/// **VALUE**: Verifies a missing rate keeps the previous rate and reports
/// "Rate not available", and that a later successful refresh clears it.
#[tokio::test]
async fn given_target_missing_from_snapshot_when_swapped_then_error_and_rate_unchanged() {
    // GIVEN: eur snapshot that has no usd entry
    let server = MockServer::start().await;
    mount_snapshot(&server, "usd", usd_body()).await;
    mount_snapshot(&server, "eur", snapshot_body("eur", &[("jpy", 164.6)])).await;
    let handle = start_session(client_for(&server));
    wait_for_idle(&handle).await;

    // WHEN: Swapping to eur/usd
    handle.swap().await.unwrap();
    let state = wait_for_state(&handle, |s| s.error.is_some()).await;

    // THEN: Error reported, stale rate kept
    assert_eq!(state.error.as_deref(), Some("Rate not available"));
    assert_eq!(state.exchange_rate, 0.92);

    // WHEN: Picking a target the eur snapshot does have
    handle.set_to_currency(code("jpy")).await.unwrap();
    let state = wait_for_state(&handle, |s| s.exchange_rate == 164.6).await;

    // THEN: Error cleared
    assert!(state.error.is_none());
}

/// **VALUE**: Verifies a failed catalog load leaves the session usable but empty.
///
/// **BUG THIS CATCHES**: Would catch the session staying in the loading state
/// or panicking after a catalog failure.
#[tokio::test]
async fn given_catalog_request_fails_when_session_started_then_error_and_no_pair() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(snapshot_path("usd")))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let handle = start_session(client_for(&server));
    let state = wait_for_idle(&handle).await;

    assert_eq!(
        state.error.as_deref(),
        Some("Failed to fetch currencies list")
    );
    assert!(state.from_currency.is_none());
    assert!(state.to_currency.is_none());
    assert!(state.currency_options().is_empty());
    assert_eq!(state.exchange_rate, 1.0);
}

#[tokio::test]
async fn given_rate_request_fails_when_session_started_then_rates_error_and_default_rate() {
    let server = MockServer::start().await;
    mount_snapshot_times(
        &server,
        "usd",
        ResponseTemplate::new(200).set_body_json(usd_body()),
        1,
    )
    .await;
    Mock::given(method("GET"))
        .and(path(snapshot_path("usd")))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let handle = start_session(client_for(&server));
    let state = wait_for_idle(&handle).await;

    assert_eq!(state.error.as_deref(), Some("Failed to fetch rates"));
    assert_eq!(state.exchange_rate, 1.0);
    assert_eq!(state.to_currency, Some(code("eur")));
}

// ============================================================================
// Loading flag and command acknowledgement
// ============================================================================

/// **VALUE**: Verifies `loading` and the "Loading rate..." summary are shown
/// for the whole duration of a rate request, and cleared when it lands.
///
/// **WHY THIS MATTERS**: The summary is the only feedback the user gets while
/// a slow rate request is outstanding. Showing the stale "1 USD = ..." line
/// instead would present the old rate as current.
///
/// **BUG THIS CATCHES**: Would catch `loading` only covering the catalog load,
/// being cleared when the request is issued rather than when it completes, or
/// staying set after the rate arrives.
#[tokio::test]
async fn given_slow_rate_response_when_pending_then_loading_until_rate_lands() {
    // GIVEN: A fast catalog response and a slow first rate response
    let server = MockServer::start().await;
    mount_snapshot_times(
        &server,
        "usd",
        ResponseTemplate::new(200).set_body_json(usd_body()),
        1,
    )
    .await;
    mount_snapshot_times(
        &server,
        "usd",
        ResponseTemplate::new(200)
            .set_body_json(usd_body())
            .set_delay(Duration::from_millis(500)),
        1,
    )
    .await;

    // WHEN: The catalog has loaded and the first rate request is in flight
    let handle = start_session(client_for(&server));
    let state = wait_for_state(&handle, |s| s.pair().is_some()).await;

    // THEN: The session reports loading and the summary says so
    assert!(state.loading);
    assert_eq!(state.exchange_rate, 1.0);
    let view = handle.view();
    assert!(view.loading);
    assert_eq!(view.summary, "Loading rate...");

    // WHEN: The rate response lands
    let state = wait_for_idle(&handle).await;

    // THEN: Loading is cleared and the rate is shown
    assert!(!state.loading);
    assert_eq!(state.exchange_rate, 0.92);
    assert_eq!(handle.view().summary, "1 USD = 0.920000 EUR");
}

/// **VALUE**: Verifies a command is applied by the time `update` returns.
///
/// **WHY THIS MATTERS**: The terminal renders the view straight after each
/// command. If the returned future resolved on delivery only, the render
/// could show the state from before the command.
///
/// **BUG THIS CATCHES**: Would catch `update` returning before the actor has
/// applied and published the command.
#[tokio::test]
async fn given_loaded_session_when_update_returns_then_state_already_reflects_command() {
    // GIVEN: A settled session
    let server = MockServer::start().await;
    mount_snapshot(&server, "usd", usd_body()).await;
    let handle = start_session(client_for(&server));
    wait_for_idle(&handle).await;

    // WHEN: Setting amounts through the handle
    handle.set_from_amount("10").await.unwrap();

    // THEN: The very next read sees the new amount
    let view = handle.view();
    assert_eq!(view.from_amount, 10.0);
    assert_eq!(view.to_amount, 9.2);

    handle
        .update(SessionCommand::SetToAmount("abc".to_string()))
        .await
        .unwrap();
    let state = handle.state();
    assert_eq!(state.amount, 0.0);
    assert_eq!(state.edited_side, EditedSide::To);
    assert!(state.error.is_none());
}
