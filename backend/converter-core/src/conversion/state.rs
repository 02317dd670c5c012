use super::{ConvertedAmounts, CurrencyPair, EditedSide, compute_amounts, parse_amount, rate_summary};
use crate::catalog::CurrencyCatalog;
use crate::error::FetchError;

use common::CurrencyCode;

use log::{info, warn};

const INITIAL_EXCHANGE_RATE: f64 = 1.0;

/// Mutable state of one conversion session.
///
/// Currency mutators return the pair a rate refresh must be issued for, or
/// `None` when the pair did not change or is not yet complete. The caller is
/// responsible for issuing exactly one refresh per returned pair.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionState {
    pub from_currency: Option<CurrencyCode>,
    pub to_currency: Option<CurrencyCode>,
    /// Last typed value at full precision, in `edited_side`'s currency.
    pub amount: f64,
    pub edited_side: EditedSide,
    pub exchange_rate: f64,
    pub loading: bool,
    pub error: Option<String>,
    pub catalog: CurrencyCatalog,
}

impl Default for ConversionState {
    fn default() -> Self {
        Self {
            from_currency: None,
            to_currency: None,
            amount: 0.0,
            edited_side: EditedSide::From,
            exchange_rate: INITIAL_EXCHANGE_RATE,
            loading: false,
            error: None,
            catalog: CurrencyCatalog::default(),
        }
    }
}

impl ConversionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current pair, if both sides are set.
    pub fn pair(&self) -> Option<CurrencyPair> {
        match (&self.from_currency, &self.to_currency) {
            (Some(from), Some(to)) => Some(CurrencyPair::new(from.clone(), to.clone())),
            _ => None,
        }
    }

    pub fn currency_options(&self) -> &[CurrencyCode] {
        self.catalog.codes()
    }

    pub fn amounts(&self) -> ConvertedAmounts {
        compute_amounts(self)
    }

    pub fn summary(&self) -> String {
        rate_summary(self)
    }

    pub fn set_from_amount(&mut self, raw: &str) {
        self.amount = parse_amount(raw);
        self.edited_side = EditedSide::From;
    }

    pub fn set_to_amount(&mut self, raw: &str) {
        self.amount = parse_amount(raw);
        self.edited_side = EditedSide::To;
    }

    pub fn set_from_currency(&mut self, code: CurrencyCode) -> Option<CurrencyPair> {
        if !self.accepts(&code) || self.from_currency.as_ref() == Some(&code) {
            return None;
        }

        self.from_currency = Some(code);
        self.pair()
    }

    pub fn set_to_currency(&mut self, code: CurrencyCode) -> Option<CurrencyPair> {
        if !self.accepts(&code) || self.to_currency.as_ref() == Some(&code) {
            return None;
        }

        self.to_currency = Some(code);
        self.pair()
    }

    /// Exchange source and target. Amount and edited side are untouched.
    pub fn swap(&mut self) -> Option<CurrencyPair> {
        if self.from_currency == self.to_currency {
            return None;
        }

        std::mem::swap(&mut self.from_currency, &mut self.to_currency);
        self.pair()
    }

    /// Install a freshly loaded catalog and move to its default pair.
    pub fn apply_catalog(&mut self, catalog: CurrencyCatalog) -> Option<CurrencyPair> {
        let previous = self.pair();
        let defaults = catalog.default_pair();
        self.catalog = catalog;
        self.error = None;

        let defaults = defaults?;
        info!("Default pair: {defaults}");
        self.from_currency = Some(defaults.from.clone());
        self.to_currency = Some(defaults.to.clone());

        (previous.as_ref() != Some(&defaults)).then_some(defaults)
    }

    pub fn apply_rate(&mut self, rate: f64) {
        self.exchange_rate = rate;
        self.error = None;
    }

    /// Record a failed fetch. Previously loaded data stays in place.
    pub fn record_error(&mut self, error: &FetchError) {
        self.error = Some(error.user_message().to_string());
    }

    fn accepts(&self, code: &CurrencyCode) -> bool {
        if self.catalog.is_empty() || self.catalog.contains(code) {
            return true;
        }

        warn!("Ignoring currency '{code}': not in catalog");
        false
    }
}
