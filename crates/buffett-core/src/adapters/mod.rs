//! Concrete [`crate::FactsSource`] implementations.

pub mod yahoo;

pub use yahoo::{YahooAdapter, YahooAuthManager};
