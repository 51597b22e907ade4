//! # Buffett Core
//!
//! Five-criteria value screen for a single stock.
//!
//! ## Overview
//!
//! A run gathers a [`FinancialSnapshot`] for one ticker, derives price-to-book,
//! checks five fixed thresholds and reports a verdict:
//!
//! - **Input providers**: typed in at a terminal ([`input::Prompter`]) or
//!   fetched from a [`FactsSource`] with fallback chains for missing detail
//!   ([`input::fetch_snapshot`])
//! - **Indicator**: price-to-book ([`indicators::price_to_book`])
//! - **Criteria**: EPS, revenue per share, price-to-book, ROE and gross margin
//!   ([`criteria::evaluate`])
//! - **Reporting**: [`ScreeningReport`], rendered as a table or wrapped in an
//!   [`Envelope`]
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`adapters`] | Yahoo Finance facts source |
//! | [`criteria`] | The five screening predicates and the verdict |
//! | [`data_source`] | Facts source trait and errors |
//! | [`domain`] | Snapshot, series, symbol and timestamp types |
//! | [`envelope`] | JSON output envelope |
//! | [`error`] | Validation errors |
//! | [`facts`] | Provider-neutral profile and statement tables |
//! | [`fallback`] | Ordered fallback chains for history series |
//! | [`http_client`] | HTTP transport abstraction |
//! | [`indicators`] | Derived ratios |
//! | [`input`] | Interactive and fetched snapshot providers |
//! | [`report`] | Screening report and table rendering |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use buffett_core::{input, ReqwestHttpClient, ScreeningReport, Symbol, Windows, YahooAdapter};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let adapter = YahooAdapter::new(Arc::new(ReqwestHttpClient::new()?));
//!     let symbol = Symbol::parse("2330")?.with_exchange_suffix("TW")?;
//!
//!     let snapshot = input::fetch_snapshot(&adapter, &symbol, Windows::default()).await?;
//!     let report = ScreeningReport::new(symbol, adapter.id(), snapshot);
//!     println!("{}", report.verdict_line());
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! ```rust
//! use buffett_core::input::FetchError;
//! use buffett_core::SourceErrorKind;
//!
//! fn describe(error: &FetchError) -> &'static str {
//!     match error {
//!         FetchError::Source(source) if source.kind() == SourceErrorKind::NotFound => {
//!             "unknown ticker"
//!         }
//!         FetchError::Source(_) => "provider unavailable",
//!         _ => "insufficient data",
//!     }
//! }
//! ```

pub mod adapters;
pub mod criteria;
pub mod data_source;
pub mod domain;
pub mod envelope;
pub mod error;
pub mod facts;
pub mod fallback;
pub mod http_client;
pub mod indicators;
pub mod input;
pub mod report;

// Adapter implementations
pub use adapters::{YahooAdapter, YahooAuthManager};

// Criteria
pub use criteria::{CriteriaResult, Criterion, CriterionOutcome, Verdict};

// Facts source trait and errors
pub use data_source::{FactsSource, ProviderId, SourceError, SourceErrorKind, StaticFactsSource};

// Domain models
pub use domain::{
    DerivedMetrics, FinancialSnapshot, Series, SeriesField, SeriesOrigin, Symbol, UtcDateTime,
    Windows, DEFAULT_QUARTERS, DEFAULT_YEARS,
};

// Envelope types
pub use envelope::{Envelope, EnvelopeMeta, SCHEMA_VERSION};

// Error types
pub use error::ValidationError;

// Provider-neutral facts
pub use facts::{CompanyProfile, FinancialFacts, IncomeRecord, StatementTable};

// HTTP client types
pub use http_client::{HttpAuth, HttpClient, HttpError, HttpRequest, HttpResponse, ReqwestHttpClient};

// Reporting
pub use report::ScreeningReport;
