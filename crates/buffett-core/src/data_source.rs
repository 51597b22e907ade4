//! Financial facts source contract.
//!
//! A [`FactsSource`] turns one ticker into [`FinancialFacts`]: a profile, the
//! quarterly and annual statement tables and the income-statement history.
//! It does not decide whether the facts are sufficient; that happens in
//! [`crate::input::fetched`].
//!
//! ```rust,ignore
//! use buffett_core::{FactsSource, Symbol, YahooAdapter};
//!
//! async fn peek(adapter: &YahooAdapter) -> Result<(), buffett_core::SourceError> {
//!     let facts = adapter.financial_facts(&Symbol::parse("2330.TW")?).await?;
//!     println!("price: {:?}", facts.profile.price);
//!     Ok(())
//! }
//! ```

use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

use crate::{FinancialFacts, Symbol, ValidationError};

/// Where the figures of a run came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderId {
    Yahoo,
    /// Typed in at the terminal.
    Manual,
    /// Canned facts held in memory.
    Fixture,
}

impl ProviderId {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Yahoo => "yahoo",
            Self::Manual => "manual",
            Self::Fixture => "fixture",
        }
    }
}

impl Display for ProviderId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Adapter-level error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceErrorKind {
    Unavailable,
    RateLimited,
    NotFound,
    InvalidRequest,
    Internal,
}

/// Structured source error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceError {
    kind: SourceErrorKind,
    message: String,
    retryable: bool,
}

impl SourceError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Unavailable,
            message: message.into(),
            retryable: true,
        }
    }

    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::RateLimited,
            message: message.into(),
            retryable: true,
        }
    }

    pub fn not_found(symbol: &Symbol) -> Self {
        Self {
            kind: SourceErrorKind::NotFound,
            message: format!("no data for symbol '{symbol}'"),
            retryable: false,
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::InvalidRequest,
            message: message.into(),
            retryable: false,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Internal,
            message: message.into(),
            retryable: false,
        }
    }

    pub const fn kind(&self) -> SourceErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn retryable(&self) -> bool {
        self.retryable
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            SourceErrorKind::Unavailable => "source.unavailable",
            SourceErrorKind::RateLimited => "source.rate_limited",
            SourceErrorKind::NotFound => "source.not_found",
            SourceErrorKind::InvalidRequest => "source.invalid_request",
            SourceErrorKind::Internal => "source.internal",
        }
    }
}

impl Display for SourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code())
    }
}

impl std::error::Error for SourceError {}

impl From<ValidationError> for SourceError {
    fn from(error: ValidationError) -> Self {
        Self::invalid_request(error.to_string())
    }
}

/// Source adapter contract.
///
/// Implementations must be `Send + Sync`; the boxed-future signature keeps the
/// trait object-safe so callers can hold a `&dyn FactsSource`.
pub trait FactsSource: Send + Sync {
    fn id(&self) -> ProviderId;

    /// Fetches every fact the screen needs for `symbol`.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] when the provider cannot be reached, refuses the
    /// request, knows nothing about the symbol, or answers with a payload that
    /// cannot be parsed. Missing individual fields are not errors; they come
    /// back as `None` or short rows.
    fn financial_facts<'a>(
        &'a self,
        symbol: &'a Symbol,
    ) -> Pin<Box<dyn Future<Output = Result<FinancialFacts, SourceError>> + Send + 'a>>;
}

/// Source that answers every request with the same facts.
///
/// Useful for offline runs and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticFactsSource {
    facts: FinancialFacts,
}

impl StaticFactsSource {
    pub fn new(facts: FinancialFacts) -> Self {
        Self { facts }
    }
}

impl FactsSource for StaticFactsSource {
    fn id(&self) -> ProviderId {
        ProviderId::Fixture
    }

    fn financial_facts<'a>(
        &'a self,
        _symbol: &'a Symbol,
    ) -> Pin<Box<dyn Future<Output = Result<FinancialFacts, SourceError>> + Send + 'a>> {
        let facts = self.facts.clone();
        Box::pin(async move { Ok(facts) })
    }
}
