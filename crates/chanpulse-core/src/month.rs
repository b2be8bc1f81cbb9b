use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MonthError {
    #[error("invalid month format: {0} (expected YYYY-MM)")]
    InvalidFormat(String),
}

/// A calendar month token in `YYYY-MM` form.
///
/// The inner string is validated on construction, so any `Month` in the system
/// is well-formed. Lexicographic ordering of the token equals chronological
/// ordering, which is what "latest month" selection relies on.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Month(String);

impl Month {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` if `value` has the `YYYY-MM` shape with a month in 01..=12.
    #[must_use]
    pub fn is_valid(value: &str) -> bool {
        let bytes = value.as_bytes();
        if bytes.len() != 7 || bytes[4] != b'-' {
            return false;
        }
        if !bytes[..4].iter().all(u8::is_ascii_digit)
            || !bytes[5..].iter().all(u8::is_ascii_digit)
        {
            return false;
        }
        matches!(&value[5..], "01" | "02" | "03" | "04" | "05" | "06" | "07" | "08" | "09" | "10" | "11" | "12")
    }
}

impl FromStr for Month {
    type Err = MonthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if Month::is_valid(s) {
            Ok(Month(s.to_string()))
        } else {
            Err(MonthError::InvalidFormat(s.to_string()))
        }
    }
}

impl TryFrom<String> for Month {
    type Error = MonthError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Month> for String {
    fn from(month: Month) -> Self {
        month.0
    }
}

impl std::fmt::Display for Month {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
