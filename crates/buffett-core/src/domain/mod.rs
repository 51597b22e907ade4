//! # Domain Models
//!
//! Strongly-typed inputs of a single screening run.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`FinancialSnapshot`] | Every figure the five criteria need for one ticker |
//! | [`DerivedMetrics`] | Snapshot plus price-to-book |
//! | [`Series`] | Ordered history figures with their [`SeriesOrigin`] |
//! | [`Windows`] | Year/quarter window sizes |
//! | [`Symbol`] | Validated ticker symbol |
//! | [`UtcDateTime`] | UTC timestamp |
//!
//! A [`FinancialSnapshot`] can only be built through
//! [`FinancialSnapshot::new`], which enforces the window lengths and a nonzero
//! book value.

mod snapshot;
mod symbol;
mod timestamp;

pub use snapshot::{
    DerivedMetrics, FinancialSnapshot, Series, SeriesField, SeriesOrigin, Windows,
    DEFAULT_QUARTERS, DEFAULT_YEARS,
};
pub use symbol::Symbol;
pub use timestamp::UtcDateTime;
