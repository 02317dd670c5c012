//! Currency code token as used by the rate snapshot feed.

use crate::{CurrencyCodeError, ErrorLocation};

use std::fmt::{Display, Formatter, Result as FormatResult};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Lowercase currency identifier, e.g. `usd` or `eur`.
///
/// The snapshot feed also lists crypto assets whose codes contain digits
/// (`1inch`), so any ASCII alphanumeric token is accepted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CurrencyCode(String);

impl CurrencyCode {
    /// Parse and normalize a code. Surrounding whitespace is trimmed and the
    /// result is lowercased.
    ///
    /// # Errors
    ///
    /// Returns [`CurrencyCodeError`] if the trimmed input is empty or contains
    /// anything other than ASCII letters and digits.
    #[track_caller]
    pub fn parse(raw: &str) -> Result<Self, CurrencyCodeError> {
        let trimmed = raw.trim();

        if trimmed.is_empty() {
            return Err(CurrencyCodeError::Empty {
                location: ErrorLocation::caller(),
            });
        }

        if !trimmed.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(CurrencyCodeError::InvalidCharacters {
                code: trimmed.to_string(),
                location: ErrorLocation::caller(),
            });
        }

        Ok(Self(trimmed.to_ascii_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Upper-cased form shown to users ("USD").
    pub fn display_label(&self) -> String {
        self.0.to_ascii_uppercase()
    }
}

impl Display for CurrencyCode {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> FormatResult {
        formatter.write_str(&self.0)
    }
}

impl AsRef<str> for CurrencyCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for CurrencyCode {
    type Err = CurrencyCodeError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Self::parse(raw)
    }
}

impl TryFrom<String> for CurrencyCode {
    type Error = CurrencyCodeError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Self::parse(&raw)
    }
}

impl From<CurrencyCode> for String {
    fn from(code: CurrencyCode) -> Self {
        code.0
    }
}

impl PartialEq<str> for CurrencyCode {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for CurrencyCode {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}
