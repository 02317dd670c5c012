// Unit tests for conversion math: derivation, parsing, rounding and summary text

use crate::conversion::{
    ConversionState, EditedSide, LOADING_RATE_TEXT, compute_amounts, parse_amount, rate_summary,
    round6,
};

use common::CurrencyCode;

fn state_with(amount: f64, edited_side: EditedSide, exchange_rate: f64) -> ConversionState {
    ConversionState {
        amount,
        edited_side,
        exchange_rate,
        ..ConversionState::default()
    }
}

// ============================================
// compute_amounts
// ============================================

/// **VALUE**: Verifies forward conversion when the source amount was edited.
///
/// **WHY THIS MATTERS**: This is the main path: the user types into the top
/// input and reads the converted value underneath.
///
/// **BUG THIS CATCHES**: Would catch a swapped multiply/divide or a missing rounding step.
#[test]
fn given_from_side_edited_when_computed_then_to_amount_is_rounded_product() {
    let cases = [(10.0, 0.92), (1.0, 151.337_204), (2.5, 0.000_013_7), (123.456, 1.0)];

    for (amount, rate) in cases {
        // GIVEN: An amount typed on the FROM side
        let state = state_with(amount, EditedSide::From, rate);

        // WHEN: Deriving display amounts
        let amounts = compute_amounts(&state);

        // THEN: FROM is the amount, TO is amount * rate at 6 decimals
        assert_eq!(amounts.from_amount, amount);
        assert_eq!(amounts.to_amount, round6(amount * rate));
    }
}

/// **VALUE**: Verifies reverse conversion when the target amount was edited.
///
/// **BUG THIS CATCHES**: Would catch the TO branch multiplying instead of dividing.
#[test]
fn given_to_side_edited_when_computed_then_from_amount_is_rounded_quotient() {
    let cases = [(9.2, 0.92), (100.0, 151.337_204), (1.0, 3.0)];

    for (amount, rate) in cases {
        let state = state_with(amount, EditedSide::To, rate);

        let amounts = compute_amounts(&state);

        assert_eq!(amounts.to_amount, amount);
        assert_eq!(amounts.from_amount, round6(amount / rate));
    }
}

/// **VALUE**: Verifies a zero rate never produces infinity or NaN.
///
/// **WHY THIS MATTERS**: Dividing by a zero rate on the TO branch would display
/// "inf" in the source field.
///
/// **BUG THIS CATCHES**: Would catch removal of the positive-rate guard.
#[test]
fn given_zero_rate_when_computed_then_derived_side_is_zero() {
    let from_edited = compute_amounts(&state_with(10.0, EditedSide::From, 0.0));
    assert_eq!(from_edited.from_amount, 10.0);
    assert_eq!(from_edited.to_amount, 0.0);

    let to_edited = compute_amounts(&state_with(10.0, EditedSide::To, 0.0));
    assert_eq!(to_edited.to_amount, 10.0);
    assert_eq!(to_edited.from_amount, 0.0);
}

/// **VALUE**: Verifies rounding is display-only.
///
/// **WHY THIS MATTERS**: If the rounded value were written back, repeated
/// edits would accumulate rounding error.
///
/// **BUG THIS CATCHES**: Would catch compute_amounts mutating or rounding the stored amount.
#[test]
fn given_high_precision_amount_when_computed_then_stored_amount_keeps_precision() {
    // GIVEN: An amount with more than 6 decimals
    let state = state_with(1.123_456_789, EditedSide::From, 2.0);

    // WHEN: Deriving display amounts
    let amounts = compute_amounts(&state);

    // THEN: Displayed values are rounded, stored amount is not
    assert_eq!(amounts.from_amount, 1.123_457);
    assert_eq!(amounts.to_amount, 2.246_914);
    assert_eq!(state.amount, 1.123_456_789);
}

/// **VALUE**: Verifies the scenario 10 USD at 0.92 shows exactly 9.2 EUR.
///
/// **BUG THIS CATCHES**: 10 * 0.92 is 9.200000000000001 in binary floating point;
/// without rounding the display would show the tail.
#[test]
fn given_ten_at_rate_0_92_when_computed_then_to_amount_is_9_2() {
    let amounts = compute_amounts(&state_with(10.0, EditedSide::From, 0.92));

    assert_eq!(amounts.from_amount, 10.0);
    assert_eq!(amounts.to_amount, 9.2);
}

// ============================================
// parse_amount
// ============================================

/// **VALUE**: Verifies invalid text is read as 0 rather than rejected.
///
/// **WHY THIS MATTERS**: The input field must never surface a parse error.
///
/// **BUG THIS CATCHES**: Would catch NaN or infinity leaking into the state.
#[test]
fn given_non_numeric_text_when_parsed_then_returns_zero() {
    for raw in ["abc", "", "   ", "12abc", "NaN", "inf", "-infinity", "1,5"] {
        assert_eq!(parse_amount(raw), 0.0, "input {raw:?}");
    }
}

#[test]
fn given_numeric_text_when_parsed_then_returns_value() {
    assert_eq!(parse_amount("10"), 10.0);
    assert_eq!(parse_amount(" 2.5 "), 2.5);
    assert_eq!(parse_amount(".5"), 0.5);
    assert_eq!(parse_amount("1e3"), 1000.0);
}

/// **VALUE**: Verifies the stored amount is never negative.
///
/// **BUG THIS CATCHES**: Would catch negative input (or "-0") being stored as-is.
#[test]
fn given_negative_text_when_parsed_then_returns_zero() {
    assert_eq!(parse_amount("-5"), 0.0);
    assert!(parse_amount("-0").is_sign_positive());
}

// ============================================
// rate_summary
// ============================================

#[test]
fn given_loaded_rate_when_summarized_then_shows_uppercase_pair_and_six_decimals() {
    let state = ConversionState {
        from_currency: Some(CurrencyCode::parse("usd").unwrap()),
        to_currency: Some(CurrencyCode::parse("eur").unwrap()),
        exchange_rate: 0.92,
        ..ConversionState::default()
    };

    assert_eq!(rate_summary(&state), "1 USD = 0.920000 EUR");
}

/// **VALUE**: Verifies the summary switches to the loading text during a fetch.
#[test]
fn given_loading_state_when_summarized_then_shows_loading_text() {
    let state = ConversionState {
        loading: true,
        ..ConversionState::default()
    };

    assert_eq!(rate_summary(&state), LOADING_RATE_TEXT);
    assert_eq!(rate_summary(&state), "Loading rate...");
}

/// **VALUE**: Verifies an unusable rate is displayed as N/A.
#[test]
fn given_zero_rate_when_summarized_then_shows_not_available() {
    let state = ConversionState {
        from_currency: Some(CurrencyCode::parse("usd").unwrap()),
        to_currency: Some(CurrencyCode::parse("jpy").unwrap()),
        exchange_rate: 0.0,
        ..ConversionState::default()
    };

    assert_eq!(rate_summary(&state), "1 USD = N/A JPY");
}

/// **VALUE**: Verifies very large typed amounts are displayed as typed.
///
/// **WHY THIS MATTERS**: `parse_amount` accepts anything finite, so "1e303"
/// is a legal input. Scaling it by 1e6 for rounding overflows.
///
/// **BUG THIS CATCHES**: Would catch the edited side displaying `inf` for a
/// finite input.
#[test]
fn given_huge_amount_when_computed_then_display_stays_finite() {
    // GIVEN: An amount parsed from scientific notation near f64::MAX
    let amount = parse_amount("1e303");
    assert_eq!(amount, 1e303);

    // WHEN: Deriving display amounts in both directions
    let from_edited = compute_amounts(&state_with(amount, EditedSide::From, 1.0));
    let to_edited = compute_amounts(&state_with(amount, EditedSide::To, 2.0));

    // THEN: Values are finite and unchanged by rounding
    assert_eq!(from_edited.from_amount, 1e303);
    assert_eq!(from_edited.to_amount, 1e303);
    assert_eq!(to_edited.to_amount, 1e303);
    assert_eq!(to_edited.from_amount, 5e302);
}

#[test]
fn given_values_around_rounding_limit_when_rounded_then_small_values_still_rounded() {
    assert_eq!(round6(0.123_456_789), 0.123_457);
    assert_eq!(round6(1e15), 1e15);
    assert_eq!(round6(-1e300), -1e300);
    assert_eq!(round6(f64::MAX), f64::MAX);
}
