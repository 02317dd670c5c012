// Unit tests for CurrencyCatalog default pair selection

use crate::catalog::CurrencyCatalog;
use crate::conversion::CurrencyPair;

use common::CurrencyCode;

fn catalog(codes: &[&str]) -> CurrencyCatalog {
    CurrencyCatalog::new(
        codes
            .iter()
            .map(|c| CurrencyCode::parse(c).unwrap())
            .collect(),
    )
}

fn pair(from: &str, to: &str) -> CurrencyPair {
    CurrencyPair::new(
        CurrencyCode::parse(from).unwrap(),
        CurrencyCode::parse(to).unwrap(),
    )
}

#[test]
fn given_usd_first_when_default_pair_then_target_is_next_entry() {
    assert_eq!(
        catalog(&["usd", "eur", "jpy"]).default_pair(),
        Some(pair("usd", "eur"))
    );
}

/// **VALUE**: Verifies the target is the first non-usd entry in feed order,
/// not the first alphabetically.
///
/// **BUG THIS CATCHES**: Would catch the catalog being sorted before selection.
#[test]
fn given_usd_not_first_when_default_pair_then_target_is_first_entry() {
    assert_eq!(
        catalog(&["jpy", "usd", "eur"]).default_pair(),
        Some(pair("usd", "jpy"))
    );
}

/// **VALUE**: Verifies the single-member fallback.
///
/// **BUG THIS CATCHES**: Would catch a `None` (and so no rate refresh) when
/// the catalog holds only usd.
#[test]
fn given_only_usd_when_default_pair_then_both_sides_usd() {
    assert_eq!(catalog(&["usd"]).default_pair(), Some(pair("usd", "usd")));
}

#[test]
fn given_empty_catalog_when_default_pair_then_none() {
    assert_eq!(CurrencyCatalog::default().default_pair(), None);
}
