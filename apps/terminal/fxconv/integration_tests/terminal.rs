use fxconv::terminal::run_terminal;

use converter_core::rates_client::RatesClient;
use converter_core::session::start_session;

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SETTLE_TIMEOUT: Duration = Duration::from_secs(5);

async fn mock_feed() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/currencies/usd.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "date": "2024-03-06",
            "usd": { "usd": 1, "eur": 0.92, "jpy": 151.5 }
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/currencies/eur.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "date": "2024-03-06",
            "eur": { "eur": 1, "usd": 1.087, "jpy": 164.6 }
        })))
        .mount(&server)
        .await;
    server
}

/// **VALUE**: Drives the terminal front end end-to-end against a mocked feed.
///
/// **WHY THIS MATTERS**: Verifies that commands reach the session and the
/// printed view reflects fetch results, not the state before the fetch.
///
/// **BUG THIS CATCHES**: Would catch the view being printed before the rate
/// refresh triggered by swap has completed.
#[tokio::test]
async fn given_scripted_input_when_terminal_runs_then_prints_converted_views() {
    // GIVEN: A session against the mock feed and a scripted input
    let server = mock_feed().await;
    let client = RatesClient::new(
        &format!("{}/v1/currencies", server.uri()),
        Duration::from_secs(2),
    )
    .unwrap();
    let handle = start_session(client);
    let input: &[u8] = b"from 10\nswap\nbogus\nlist\nquit\nfrom 99\n";
    let mut output: Vec<u8> = Vec::new();

    // WHEN: Running the terminal loop
    run_terminal(&handle, input, &mut output, SETTLE_TIMEOUT)
        .await
        .unwrap();

    // THEN: Output shows the conversion before and after swap
    let text = String::from_utf8(output).unwrap();
    assert!(text.contains("1 USD = 0.920000 EUR"), "{text}");
    assert!(text.contains("9.2 EUR"), "{text}");
    assert!(text.contains("1 EUR = 1.087000 USD"), "{text}");
    assert!(text.contains("10.87 USD"), "{text}");
    assert!(text.contains("unknown command 'bogus'"), "{text}");
    assert!(text.contains("USD EUR JPY"), "{text}");
    // Input after quit is not processed
    assert!(!text.contains("99"), "{text}");
}

/// **VALUE**: Verifies the view printed after a command reflects that command
/// even while fetches are still outstanding.
///
/// **WHY THIS MATTERS**: With a slow feed the settle wait times out, so the
/// only guarantee left is that the command itself was applied before the
/// view is printed.
///
/// **BUG THIS CATCHES**: Would catch the terminal rendering on the first state
/// change it sees, which can be a fetch completion queued ahead of the command.
#[tokio::test]
async fn given_slow_feed_when_amount_entered_then_printed_view_shows_amount() {
    // GIVEN: A feed slower than the settle timeout
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/currencies/usd.json"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "usd": { "usd": 1, "eur": 0.92 } }))
                .set_delay(Duration::from_millis(400)),
        )
        .mount(&server)
        .await;
    let client = RatesClient::new(
        &format!("{}/v1/currencies", server.uri()),
        Duration::from_secs(2),
    )
    .unwrap();
    let handle = start_session(client);
    let input: &[u8] = b"from 42\nquit\n";
    let mut output: Vec<u8> = Vec::new();

    // WHEN: Entering an amount before anything has loaded
    run_terminal(&handle, input, &mut output, Duration::from_millis(50))
        .await
        .unwrap();

    // THEN: The view printed after the command carries the amount
    let text = String::from_utf8(output).unwrap();
    let after_command = text.split("> ").nth(1).unwrap();
    assert!(after_command.starts_with("  42 "), "{text}");
}
