//! Input providers.
//!
//! Both strategies end in the same place: a valid [`crate::FinancialSnapshot`]
//! or an error. [`interactive`] asks a human; [`fetched`] asks a
//! [`crate::FactsSource`] and fills gaps from fallback figures.

pub mod fetched;
pub mod interactive;

pub use fetched::{fetch_snapshot, resolve_snapshot, FetchError};
pub use interactive::{parse_list, InputError, ListError, Prompter};
