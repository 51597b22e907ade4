//! Screening report and its human-readable rendering.

use std::io::{self, Write};

use serde::Serialize;

use crate::criteria::{self, CriteriaResult, Verdict};
use crate::data_source::ProviderId;
use crate::{DerivedMetrics, FinancialSnapshot, Series, SeriesField};

/// Outcome of one screening run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScreeningReport {
    /// Ticker for fetched runs, free-text label for manual ones.
    pub symbol: String,
    pub source: ProviderId,
    pub metrics: DerivedMetrics,
    pub criteria: CriteriaResult,
    pub verdict: Verdict,
    /// One line per series that was filled from a fallback figure.
    pub notes: Vec<String>,
}

impl ScreeningReport {
    /// Derives the indicators, evaluates the criteria and collects fallback
    /// notes for `snapshot`.
    pub fn new(symbol: impl Into<String>, source: ProviderId, snapshot: FinancialSnapshot) -> Self {
        let symbol = symbol.into();
        let notes = snapshot
            .fallback_fields()
            .into_iter()
            .map(|(field, basis)| fallback_note(field, basis))
            .collect();
        let metrics = DerivedMetrics::from_snapshot(snapshot);
        let criteria = criteria::evaluate(&metrics);
        let verdict = criteria.verdict();

        tracing::debug!(%symbol, %verdict, "screening complete");

        Self {
            symbol,
            source,
            metrics,
            criteria,
            verdict,
            notes,
        }
    }

    pub fn is_recommended(&self) -> bool {
        self.verdict == Verdict::Recommended
    }

    /// Closing line naming the stock.
    pub fn verdict_line(&self) -> String {
        match self.verdict {
            Verdict::Recommended => format!(
                "Stock {} meets all five Buffett criteria: {}.",
                self.symbol, self.verdict
            ),
            Verdict::NotRecommended => format!(
                "Stock {} does not meet the Buffett criteria: {}.",
                self.symbol, self.verdict
            ),
        }
    }
}

fn fallback_note(field: SeriesField, basis: &str) -> String {
    format!("{field} was estimated from {basis}; treat this verdict with less confidence")
}

/// Writes the inputs summary, the five criterion lines, any fallback notes
/// and the verdict.
pub fn render_table<W: Write>(writer: &mut W, report: &ScreeningReport) -> io::Result<()> {
    let snapshot = &report.metrics.snapshot;
    let windows = snapshot.windows();

    writeln!(writer, "stock         : {} ({})", report.symbol, report.source)?;
    writeln!(
        writer,
        "eps ({}y)      : {}",
        windows.years,
        format_series(snapshot.eps_history())
    )?;
    writeln!(
        writer,
        "revenue/sh ({}q): {}",
        windows.quarters,
        format_series(snapshot.revenue_per_share_history())
    )?;
    writeln!(
        writer,
        "roe % ({}q)    : {}",
        windows.quarters,
        format_series(snapshot.roe_history())
    )?;
    writeln!(
        writer,
        "gross % ({}y)  : {}",
        windows.years,
        format_series(snapshot.gross_margin_history())
    )?;
    writeln!(writer, "price         : {:.2}", snapshot.price())?;
    writeln!(writer, "book value/sh : {:.2}", snapshot.book_value_per_share())?;
    writeln!(writer, "price-to-book : {:.2}", report.metrics.price_to_book)?;

    writeln!(writer)?;
    writeln!(writer, "=== Screening result ===")?;
    for outcome in report.criteria.outcomes() {
        let marker = if outcome.passed { "PASS" } else { "FAIL" };
        writeln!(writer, "[{marker}] {}", outcome.label)?;
    }

    if !report.notes.is_empty() {
        writeln!(writer)?;
        for note in &report.notes {
            writeln!(writer, "note: {note}")?;
        }
    }

    writeln!(writer)?;
    writeln!(writer, "{}", report.verdict_line())
}

fn format_series(series: &Series) -> String {
    let values = series
        .values
        .iter()
        .map(|value| format!("{value:.2}"))
        .collect::<Vec<_>>()
        .join(", ");
    if series.origin.is_fallback() {
        format!("{values} (estimated)")
    } else {
        values
    }
}
