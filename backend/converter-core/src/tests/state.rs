// Unit tests for ConversionState mutators and the pair-change rule

use crate::catalog::CurrencyCatalog;
use crate::conversion::{ConversionState, CurrencyPair, EditedSide};
use crate::error::FetchError;

use common::{CurrencyCode, ErrorLocation};

fn code(raw: &str) -> CurrencyCode {
    CurrencyCode::parse(raw).unwrap()
}

fn catalog(codes: &[&str]) -> CurrencyCatalog {
    CurrencyCatalog::new(codes.iter().map(|c| code(c)).collect())
}

fn loaded_state() -> ConversionState {
    let mut state = ConversionState::new();
    state.apply_catalog(catalog(&["usd", "eur", "jpy"]));
    state
}

/// **VALUE**: Verifies the initial session state.
#[test]
fn given_new_session_when_created_then_starts_with_zero_amount_and_unit_rate() {
    let state = ConversionState::new();

    assert_eq!(state.amount, 0.0);
    assert_eq!(state.edited_side, EditedSide::From);
    assert_eq!(state.exchange_rate, 1.0);
    assert!(!state.loading);
    assert!(state.error.is_none());
    assert!(state.pair().is_none());
    assert!(state.currency_options().is_empty());
}

/// **VALUE**: Verifies catalog load establishes usd plus the first other entry.
///
/// **WHY THIS MATTERS**: The first rate refresh of every session depends on
/// this default pair.
///
/// **BUG THIS CATCHES**: Would catch picking usd on both sides, or not
/// reporting the change so no refresh is issued.
#[test]
fn given_catalog_when_applied_then_defaults_to_usd_and_first_other_currency() {
    // GIVEN: A fresh state
    let mut state = ConversionState::new();

    // WHEN: Applying the catalog
    let refresh = state.apply_catalog(catalog(&["usd", "eur", "jpy"]));

    // THEN: Pair is usd/eur and a refresh is requested for it
    assert_eq!(state.from_currency, Some(code("usd")));
    assert_eq!(state.to_currency, Some(code("eur")));
    assert_eq!(refresh, Some(CurrencyPair::new(code("usd"), code("eur"))));
    assert_eq!(state.currency_options().len(), 3);
}

/// **VALUE**: Verifies swap exchanges the pair and leaves the amount alone.
///
/// **BUG THIS CATCHES**: Would catch swap also flipping the edited side, which
/// would make the typed value jump to the other input.
#[test]
fn given_loaded_pair_when_swapped_then_currencies_exchange_and_amount_kept() {
    // GIVEN: usd/eur with an amount typed on the TO side
    let mut state = loaded_state();
    state.set_to_amount("42");

    // WHEN: Swapping
    let refresh = state.swap();

    // THEN: Pair is reversed, one refresh for the new pair, input untouched
    assert_eq!(state.from_currency, Some(code("eur")));
    assert_eq!(state.to_currency, Some(code("usd")));
    assert_eq!(refresh, Some(CurrencyPair::new(code("eur"), code("usd"))));
    assert_eq!(state.amount, 42.0);
    assert_eq!(state.edited_side, EditedSide::To);
}

/// **VALUE**: Verifies selecting the already-selected currency is not a change.
///
/// **BUG THIS CATCHES**: Would catch a redundant network request on every
/// re-selection of the same option.
#[test]
fn given_same_currency_when_set_then_no_refresh_requested() {
    let mut state = loaded_state();

    assert_eq!(state.set_from_currency(code("usd")), None);
    assert_eq!(state.set_to_currency(code("eur")), None);
}

#[test]
fn given_new_target_when_set_then_refresh_requested_for_new_pair() {
    let mut state = loaded_state();

    let refresh = state.set_to_currency(code("jpy"));

    assert_eq!(refresh, Some(CurrencyPair::new(code("usd"), code("jpy"))));
}

/// **VALUE**: Verifies codes outside the loaded catalog are ignored.
///
/// **WHY THIS MATTERS**: Once loaded, the catalog defines the valid codes.
/// An unknown code would only produce a failed request.
///
/// **BUG THIS CATCHES**: Would catch the membership check being skipped.
#[test]
fn given_loaded_catalog_when_unknown_currency_set_then_ignored() {
    let mut state = loaded_state();

    let refresh = state.set_from_currency(code("xyz"));

    assert_eq!(refresh, None);
    assert_eq!(state.from_currency, Some(code("usd")));
}

/// **VALUE**: Verifies currencies can be set before the catalog arrives, but
/// no refresh is requested until both sides are set.
#[test]
fn given_no_catalog_when_one_currency_set_then_no_refresh_until_pair_complete() {
    let mut state = ConversionState::new();

    assert_eq!(state.set_from_currency(code("gbp")), None);
    assert_eq!(
        state.set_to_currency(code("chf")),
        Some(CurrencyPair::new(code("gbp"), code("chf")))
    );
}

/// **VALUE**: Verifies text input updates amount and edited side without error.
#[test]
fn given_non_numeric_input_when_set_from_amount_then_amount_zero_and_no_error() {
    let mut state = loaded_state();
    state.set_to_amount("7");

    state.set_from_amount("not a number");

    assert_eq!(state.amount, 0.0);
    assert_eq!(state.edited_side, EditedSide::From);
    assert!(state.error.is_none());
}

/// **VALUE**: Verifies a failure keeps the stale rate and a later success
/// clears the error.
///
/// **BUG THIS CATCHES**: Would catch record_error resetting the rate, or a
/// recovered session still showing the old error banner.
#[test]
fn given_failed_then_successful_fetch_when_applied_then_error_cleared_and_rate_updated() {
    let mut state = loaded_state();
    state.apply_rate(0.92);

    // WHEN: A fetch fails
    state.record_error(&FetchError::RateUnavailable {
        from: code("usd"),
        to: code("eur"),
        location: ErrorLocation::caller(),
    });

    // THEN: Error is recorded and the previous rate is kept
    assert_eq!(state.error.as_deref(), Some("Rate not available"));
    assert_eq!(state.exchange_rate, 0.92);

    // WHEN: The next fetch succeeds
    state.apply_rate(0.95);

    // THEN: Error is cleared
    assert!(state.error.is_none());
    assert_eq!(state.exchange_rate, 0.95);
}
