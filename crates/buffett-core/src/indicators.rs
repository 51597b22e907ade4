//! Indicators derived from raw snapshot figures.

/// Market price divided by book value per share.
///
/// Full precision is kept; rounding is a display concern. Callers guarantee a
/// nonzero book value (see [`crate::FinancialSnapshot::new`]).
pub fn price_to_book(price: f64, book_value_per_share: f64) -> f64 {
    price / book_value_per_share
}
