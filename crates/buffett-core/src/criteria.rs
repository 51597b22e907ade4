//! The five fixed screening criteria.
//!
//! Each criterion reads a disjoint part of [`DerivedMetrics`] and is evaluated
//! independently of the others. The outcome keeps the fixed criterion order
//! because the report prints it in that order.

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::DerivedMetrics;

pub const MIN_EPS: f64 = 1.0;
pub const MIN_REVENUE_PER_SHARE: f64 = 1.5;
pub const MAX_PRICE_TO_BOOK: f64 = 1.5;
pub const MIN_ROE_PERCENT: f64 = 5.0;
pub const MIN_GROSS_MARGIN_PERCENT: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Criterion {
    EpsAboveOne,
    RevenuePerShareAbove,
    PriceToBookBelow,
    RoeAbove,
    GrossMarginAbove,
}

impl Criterion {
    pub const ALL: [Criterion; 5] = [
        Criterion::EpsAboveOne,
        Criterion::RevenuePerShareAbove,
        Criterion::PriceToBookBelow,
        Criterion::RoeAbove,
        Criterion::GrossMarginAbove,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::EpsAboveOne => "1. EPS > 1 in every recent year",
            Self::RevenuePerShareAbove => "2. Revenue per share > 1.5 in every recent quarter",
            Self::PriceToBookBelow => "3. Price-to-book < 1.5",
            Self::RoeAbove => "4. ROE > 5% in every recent quarter",
            Self::GrossMarginAbove => "5. Gross margin > 10% in every recent year",
        }
    }

    pub fn is_met(self, metrics: &DerivedMetrics) -> bool {
        let snapshot = &metrics.snapshot;
        match self {
            Self::EpsAboveOne => snapshot.eps_history().all_above(MIN_EPS),
            Self::RevenuePerShareAbove => snapshot
                .revenue_per_share_history()
                .all_above(MIN_REVENUE_PER_SHARE),
            Self::PriceToBookBelow => metrics.price_to_book < MAX_PRICE_TO_BOOK,
            Self::RoeAbove => snapshot.roe_history().all_above(MIN_ROE_PERCENT),
            Self::GrossMarginAbove => snapshot
                .gross_margin_history()
                .all_above(MIN_GROSS_MARGIN_PERCENT),
        }
    }
}

impl Display for Criterion {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CriterionOutcome {
    pub criterion: Criterion,
    pub label: &'static str,
    pub passed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Recommended,
    NotRecommended,
}

impl Verdict {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Recommended => "recommended",
            Self::NotRecommended => "not recommended",
        }
    }
}

impl Display for Verdict {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcomes of all five criteria, in their fixed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CriteriaResult(Vec<CriterionOutcome>);

impl CriteriaResult {
    pub fn outcomes(&self) -> &[CriterionOutcome] {
        &self.0
    }

    pub fn passed(&self, criterion: Criterion) -> bool {
        self.0
            .iter()
            .any(|outcome| outcome.criterion == criterion && outcome.passed)
    }

    pub fn all_passed(&self) -> bool {
        self.0.iter().all(|outcome| outcome.passed)
    }

    pub fn verdict(&self) -> Verdict {
        if self.all_passed() {
            Verdict::Recommended
        } else {
            Verdict::NotRecommended
        }
    }
}

pub fn evaluate(metrics: &DerivedMetrics) -> CriteriaResult {
    CriteriaResult(
        Criterion::ALL
            .into_iter()
            .map(|criterion| CriterionOutcome {
                criterion,
                label: criterion.label(),
                passed: criterion.is_met(metrics),
            })
            .collect(),
    )
}
