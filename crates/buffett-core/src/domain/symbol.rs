use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::ValidationError;

const MAX_SYMBOL_LEN: usize = 15;

/// Normalized ticker symbol, optionally carrying a regional exchange suffix
/// (`2330.TW`, `BRK-B`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Symbol(String);

impl Symbol {
    /// Parse and normalize a symbol to uppercase.
    ///
    /// Numeric listings are common on Asian exchanges, so the first character
    /// may be a digit as well as a letter.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptySymbol);
        }

        let normalized = trimmed.to_ascii_uppercase();
        let len = normalized.chars().count();
        if len > MAX_SYMBOL_LEN {
            return Err(ValidationError::SymbolTooLong {
                len,
                max: MAX_SYMBOL_LEN,
            });
        }

        if let Some(first) = normalized.chars().next() {
            if !first.is_ascii_alphanumeric() {
                return Err(ValidationError::SymbolInvalidStart { ch: first });
            }
        }

        for (index, ch) in normalized.chars().enumerate() {
            let valid = ch.is_ascii_alphanumeric() || ch == '.' || ch == '-';
            if !valid {
                return Err(ValidationError::SymbolInvalidChar { ch, index });
            }
        }

        Ok(Self(normalized))
    }

    /// Append a regional exchange suffix (`TW` turns `2330` into `2330.TW`).
    ///
    /// An empty suffix, or a symbol that already ends with it, is returned
    /// unchanged.
    pub fn with_exchange_suffix(&self, suffix: &str) -> Result<Self, ValidationError> {
        let suffix = suffix.trim().trim_start_matches('.');
        if suffix.is_empty() {
            return Ok(self.clone());
        }
        if !suffix.chars().all(|ch| ch.is_ascii_alphabetic()) {
            return Err(ValidationError::InvalidExchangeSuffix {
                value: suffix.to_owned(),
            });
        }

        let suffix = suffix.to_ascii_uppercase();
        if self.0.ends_with(&format!(".{suffix}")) {
            return Ok(self.clone());
        }

        Self::parse(&format!("{}.{suffix}", self.0))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for Symbol {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl TryFrom<&str> for Symbol {
    type Error = ValidationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<Symbol> for String {
    fn from(value: Symbol) -> Self {
        value.0
    }
}
