//! Provider-neutral financial facts, as returned by a [`crate::FactsSource`].
//!
//! Every field is optional or possibly short: deciding what is usable, and
//! what to substitute, is the job of [`crate::input::fetched`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub const TOTAL_REVENUE: &str = "Total Revenue";
pub const NET_INCOME: &str = "Net Income";
pub const GROSS_PROFIT: &str = "Gross Profit";

/// Point-in-time company profile.
///
/// Ratios are in percentage units (`12.3` means 12.3%).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompanyProfile {
    pub price: Option<f64>,
    pub book_value_per_share: Option<f64>,
    pub trailing_eps: Option<f64>,
    pub shares_outstanding: Option<f64>,
    /// Trailing-twelve-month ROE. Yahoo publishes no such field, so only
    /// canned facts ([`crate::StaticFactsSource`]) fill it; fetched ROE falls
    /// back to `return_on_equity` instead.
    pub trailing_roe: Option<f64>,
    pub return_on_equity: Option<f64>,
    pub total_stockholder_equity: Option<f64>,
}

/// Statement rows keyed by label, each ordered most recent period first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatementTable {
    rows: BTreeMap<String, Vec<f64>>,
}

impl StatementTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_row(mut self, label: impl Into<String>, values: Vec<f64>) -> Self {
        self.insert_row(label, values);
        self
    }

    pub fn insert_row(&mut self, label: impl Into<String>, values: Vec<f64>) {
        self.rows.insert(label.into(), values);
    }

    pub fn row(&self, label: &str) -> Option<&[f64]> {
        self.rows.get(label).map(Vec::as_slice)
    }

    /// The `periods` most recent figures of a row, or fewer when the row is
    /// shorter.
    pub fn recent(&self, label: &str, periods: usize) -> Option<&[f64]> {
        self.row(label)
            .map(|values| &values[..values.len().min(periods)])
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.rows.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// One period of the income-statement history.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct IncomeRecord {
    pub net_income: Option<f64>,
}

/// Everything a source knows about one ticker.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FinancialFacts {
    pub profile: CompanyProfile,
    pub quarterly: StatementTable,
    pub annual: StatementTable,
    /// Annual income statements, most recent first.
    pub income_history: Vec<IncomeRecord>,
}
