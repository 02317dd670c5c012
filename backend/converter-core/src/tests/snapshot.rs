// Unit tests for RateSnapshot document extraction and rate lookup

use crate::error::rates_client::RatesClientError;
use crate::rates_client::RateSnapshot;

use common::CurrencyCode;

use serde_json::json;

fn code(raw: &str) -> CurrencyCode {
    CurrencyCode::parse(raw).unwrap()
}

/// **VALUE**: Verifies the inner table is extracted and its key order kept.
///
/// **WHY THIS MATTERS**: Catalog order is the feed's document order, and the
/// default target is the first non-usd key in that order.
///
/// **BUG THIS CATCHES**: Would catch losing `preserve_order` on serde_json,
/// which would sort keys alphabetically.
#[test]
fn given_feed_document_when_extracted_then_currencies_in_document_order() {
    // GIVEN: A document with a date sibling and unsorted keys
    let document = json!({
        "date": "2024-03-06",
        "usd": { "zar": 18.9, "eur": 0.92, "usd": 1, "1inch": 2.1 }
    });

    // WHEN: Extracting the usd table
    let snapshot = RateSnapshot::from_document(code("usd"), document).unwrap();

    // THEN: Keys come back in document order
    let codes: Vec<String> = snapshot.currencies().into_iter().map(String::from).collect();
    assert_eq!(codes, vec!["zar", "eur", "usd", "1inch"]);
    assert_eq!(snapshot.base(), &code("usd"));
    assert_eq!(snapshot.len(), 4);
}

#[test]
fn given_document_without_base_key_when_extracted_then_missing_base_error() {
    let document = json!({ "date": "2024-03-06", "eur": { "usd": 1.08 } });

    let result = RateSnapshot::from_document(code("usd"), document);

    assert!(matches!(result, Err(RatesClientError::MissingBase { .. })));
}

#[test]
fn given_non_object_document_when_extracted_then_missing_base_error() {
    let result = RateSnapshot::from_document(code("usd"), json!([1, 2, 3]));

    assert!(matches!(result, Err(RatesClientError::MissingBase { .. })));
}

/// **VALUE**: Verifies only positive finite numbers count as rates.
///
/// **WHY THIS MATTERS**: A zero, negative or non-numeric rate must surface as
/// "Rate not available" rather than be installed.
///
/// **BUG THIS CATCHES**: Would catch a zero rate being accepted and then
/// displayed as N/A with every conversion reading 0.
#[test]
fn given_snapshot_entries_when_rate_looked_up_then_only_positive_numbers_returned() {
    let document = json!({
        "usd": {
            "eur": 0.92,
            "jpy": 151,
            "zero": 0,
            "neg": -1.5,
            "text": "0.5",
            "none": null
        }
    });
    let snapshot = RateSnapshot::from_document(code("usd"), document).unwrap();

    assert_eq!(snapshot.rate_for(&code("eur")), Some(0.92));
    assert_eq!(snapshot.rate_for(&code("jpy")), Some(151.0));
    assert_eq!(snapshot.rate_for(&code("zero")), None);
    assert_eq!(snapshot.rate_for(&code("neg")), None);
    assert_eq!(snapshot.rate_for(&code("text")), None);
    assert_eq!(snapshot.rate_for(&code("none")), None);
    assert_eq!(snapshot.rate_for(&code("gbp")), None);
}
