//! Snapshot from a [`FactsSource`], with fallbacks for sparse data.
//!
//! | Series | Preferred | Substitute |
//! |--------|-----------|------------|
//! | EPS | income-statement net income / shares outstanding | trailing EPS, repeated |
//! | Revenue per share | quarterly "Total Revenue", as reported | none |
//! | ROE | quarterly "Net Income" / stockholder equity × 100 | trailing ROE, then return on equity, repeated |
//! | Gross margin | annual "Gross Profit" / "Total Revenue" × 100 | none |
//!
//! Price and book value per share have no substitute.

use thiserror::Error;

use crate::facts::{FinancialFacts, GROSS_PROFIT, NET_INCOME, TOTAL_REVENUE};
use crate::fallback::{SeriesChain, Unresolved};
use crate::{
    FactsSource, FinancialSnapshot, Series, SeriesField, SourceError, Symbol, ValidationError,
    Windows,
};

#[derive(Debug, Error)]
pub enum FetchError {
    #[error(transparent)]
    Source(#[from] SourceError),

    #[error("current price is not available")]
    MissingPrice,

    #[error("book value per share is not available")]
    MissingBookValue,

    #[error(transparent)]
    Unresolved(#[from] Unresolved),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Fetches facts for `symbol` and resolves them into a snapshot.
pub async fn fetch_snapshot(
    source: &dyn FactsSource,
    symbol: &Symbol,
    windows: Windows,
) -> Result<FinancialSnapshot, FetchError> {
    tracing::info!(%symbol, source = %source.id(), "fetching financial facts");
    let facts = source.financial_facts(symbol).await?;
    resolve_snapshot(&facts, windows)
}

/// Applies the extraction rules to already fetched facts.
///
/// Either every series resolves and a complete snapshot comes back, or the
/// first failure is returned; there is no partial result.
pub fn resolve_snapshot(
    facts: &FinancialFacts,
    windows: Windows,
) -> Result<FinancialSnapshot, FetchError> {
    let windows = Windows::new(windows.years, windows.quarters)?;
    let profile = &facts.profile;

    let price = profile.price.ok_or(FetchError::MissingPrice)?;
    let book_value_per_share = profile
        .book_value_per_share
        .ok_or(FetchError::MissingBookValue)?;

    let eps = resolve_eps(facts, windows.years)?;
    let revenue = resolve_revenue_per_share(facts, windows.quarters)?;
    let roe = resolve_roe(facts, windows.quarters)?;
    let gross_margin = resolve_gross_margin(facts, windows.years)?;

    Ok(FinancialSnapshot::new(
        windows,
        eps,
        revenue,
        roe,
        gross_margin,
        price,
        book_value_per_share,
    )?)
}

fn shares_outstanding(facts: &FinancialFacts) -> Option<f64> {
    facts
        .profile
        .shares_outstanding
        .filter(|shares| *shares != 0.0)
}

fn resolve_eps(facts: &FinancialFacts, years: usize) -> Result<Series, Unresolved> {
    SeriesChain::new(SeriesField::Eps, years)
        .step("income statements", || {
            let shares = shares_outstanding(facts)
                .ok_or_else(|| String::from("shares outstanding not reported"))?;
            let eps = facts
                .income_history
                .iter()
                .take(years)
                .filter_map(|record| record.net_income)
                .map(|net_income| net_income / shares)
                .collect();
            Ok(Series::reported(eps))
        })
        .step("trailing EPS", || {
            facts
                .profile
                .trailing_eps
                .map(|eps| Series::repeated(eps, years, "trailing EPS"))
                .ok_or_else(|| String::from("trailing EPS not reported"))
        })
        .resolve()
}

fn resolve_revenue_per_share(facts: &FinancialFacts, quarters: usize) -> Result<Series, Unresolved> {
    SeriesChain::new(SeriesField::RevenuePerShare, quarters)
        .step("quarterly statements", || {
            facts
                .quarterly
                .recent(TOTAL_REVENUE, quarters)
                .map(|totals| Series::reported(totals.to_vec()))
                .ok_or_else(|| format!("row '{TOTAL_REVENUE}' missing from quarterly statements"))
        })
        .resolve()
}

fn resolve_roe(facts: &FinancialFacts, quarters: usize) -> Result<Series, Unresolved> {
    SeriesChain::new(SeriesField::Roe, quarters)
        .step("quarterly statements", || {
            let equity = facts
                .profile
                .total_stockholder_equity
                .filter(|equity| *equity != 0.0)
                .ok_or_else(|| String::from("total stockholder equity not reported"))?;
            let net_income = facts
                .quarterly
                .recent(NET_INCOME, quarters)
                .ok_or_else(|| format!("row '{NET_INCOME}' missing from quarterly statements"))?;
            Ok(Series::reported(
                net_income
                    .iter()
                    .map(|income| income / equity * 100.0)
                    .collect(),
            ))
        })
        .step("trailing ROE", || {
            facts
                .profile
                .trailing_roe
                .map(|roe| Series::repeated(roe, quarters, "trailing ROE"))
                .ok_or_else(|| String::from("trailing ROE not reported"))
        })
        .step("return on equity", || {
            facts
                .profile
                .return_on_equity
                .map(|roe| Series::repeated(roe, quarters, "return on equity"))
                .ok_or_else(|| String::from("return on equity not reported"))
        })
        .resolve()
}

fn resolve_gross_margin(facts: &FinancialFacts, years: usize) -> Result<Series, Unresolved> {
    SeriesChain::new(SeriesField::GrossMargin, years)
        .step("annual statements", || {
            let gross_profit = facts
                .annual
                .recent(GROSS_PROFIT, years)
                .ok_or_else(|| format!("row '{GROSS_PROFIT}' missing from annual statements"))?;
            let revenue = facts
                .annual
                .recent(TOTAL_REVENUE, years)
                .ok_or_else(|| format!("row '{TOTAL_REVENUE}' missing from annual statements"))?;

            let covered = gross_profit.len().min(revenue.len());
            if covered < years {
                return Err(format!("annual statements cover {covered} of {years} years"));
            }
            if revenue.iter().any(|total| *total == 0.0) {
                return Err(format!("row '{TOTAL_REVENUE}' contains a zero year"));
            }

            Ok(Series::reported(
                gross_profit
                    .iter()
                    .zip(revenue)
                    .map(|(profit, total)| profit / total * 100.0)
                    .collect(),
            ))
        })
        .resolve()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facts::{CompanyProfile, IncomeRecord, StatementTable};
    use crate::SeriesOrigin;

    fn complete_facts() -> FinancialFacts {
        FinancialFacts {
            profile: CompanyProfile {
                price: Some(50.0),
                book_value_per_share: Some(40.0),
                trailing_eps: Some(9.9),
                shares_outstanding: Some(100.0),
                trailing_roe: None,
                return_on_equity: Some(20.0),
                total_stockholder_equity: Some(1_000.0),
            },
            quarterly: StatementTable::new()
                .with_row(TOTAL_REVENUE, vec![400.0, 380.0, 360.0, 340.0, 320.0])
                .with_row(NET_INCOME, vec![80.0, 60.0, 50.0, 40.0]),
            annual: StatementTable::new()
                .with_row(GROSS_PROFIT, vec![500.0, 450.0, 400.0, 350.0, 300.0])
                .with_row(TOTAL_REVENUE, vec![1_000.0; 5]),
            income_history: vec![
                IncomeRecord { net_income: Some(300.0) },
                IncomeRecord { net_income: Some(250.0) },
                IncomeRecord { net_income: Some(200.0) },
                IncomeRecord { net_income: Some(150.0) },
                IncomeRecord { net_income: Some(120.0) },
            ],
        }
    }

    #[test]
    fn resolves_every_series_from_reported_figures() {
        let snapshot =
            resolve_snapshot(&complete_facts(), Windows::default()).expect("complete facts");

        assert_eq!(snapshot.eps_history().values, vec![3.0, 2.5, 2.0, 1.5, 1.2]);
        assert_eq!(
            snapshot.revenue_per_share_history().values,
            vec![400.0, 380.0, 360.0, 340.0]
        );
        assert_eq!(snapshot.roe_history().values, vec![8.0, 6.0, 5.0, 4.0]);
        assert_eq!(
            snapshot.gross_margin_history().values,
            vec![50.0, 45.0, 40.0, 35.0, 30.0]
        );
        assert!(snapshot.fallback_fields().is_empty());
    }

    #[test]
    fn missing_price_fails_before_anything_else() {
        let mut facts = complete_facts();
        facts.profile.price = None;
        facts.annual = StatementTable::new();

        let err = resolve_snapshot(&facts, Windows::default()).expect_err("must fail");
        assert!(matches!(err, FetchError::MissingPrice));
    }

    #[test]
    fn missing_book_value_fails() {
        let mut facts = complete_facts();
        facts.profile.book_value_per_share = None;

        let err = resolve_snapshot(&facts, Windows::default()).expect_err("must fail");
        assert!(matches!(err, FetchError::MissingBookValue));
    }

    #[test]
    fn zero_book_value_is_rejected() {
        let mut facts = complete_facts();
        facts.profile.book_value_per_share = Some(0.0);

        let err = resolve_snapshot(&facts, Windows::default()).expect_err("must fail");
        assert!(matches!(
            err,
            FetchError::Validation(ValidationError::ZeroBookValue)
        ));
    }

    #[test]
    fn eps_window_is_taken_from_the_most_recent_records() {
        let snapshot =
            resolve_snapshot(&complete_facts(), Windows::new(3, 4).expect("valid"))
                .expect("complete facts");
        assert_eq!(snapshot.eps_history().values, vec![3.0, 2.5, 2.0]);
    }

    #[test]
    fn short_revenue_row_has_no_fallback() {
        let mut facts = complete_facts();
        facts.quarterly.insert_row(TOTAL_REVENUE, vec![400.0, 380.0]);

        let err = resolve_snapshot(&facts, Windows::default()).expect_err("must fail");
        match err {
            FetchError::Unresolved(unresolved) => {
                assert_eq!(unresolved.field, SeriesField::RevenuePerShare);
                assert_eq!(unresolved.rejections[0].reason, "expected 4 values, found 2");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn revenue_row_is_read_as_reported() {
        let mut facts = complete_facts();
        facts.quarterly.insert_row(TOTAL_REVENUE, vec![120.0; 4]);

        let snapshot = resolve_snapshot(&facts, Windows::default()).expect("resolves");
        assert_eq!(
            snapshot.revenue_per_share_history(),
            &Series::reported(vec![120.0; 4])
        );
    }

    #[test]
    fn revenue_ignores_missing_shares_outstanding() {
        let mut facts = complete_facts();
        facts.profile.shares_outstanding = None;

        let snapshot = resolve_snapshot(&facts, Windows::default()).expect("resolves");
        let revenue = snapshot.revenue_per_share_history();
        assert_eq!(revenue.values, vec![400.0, 380.0, 360.0, 340.0]);
        assert!(!revenue.origin.is_fallback());
        assert!(!snapshot
            .fallback_fields()
            .iter()
            .any(|(field, _)| *field == SeriesField::RevenuePerShare));
    }

    #[test]
    fn roe_prefers_trailing_figure_over_return_on_equity() {
        let mut facts = complete_facts();
        facts.profile.total_stockholder_equity = None;
        facts.profile.trailing_roe = Some(14.0);

        let snapshot = resolve_snapshot(&facts, Windows::default()).expect("resolves");
        assert_eq!(snapshot.roe_history().values, vec![14.0; 4]);
    }

    #[test]
    fn short_net_income_row_uses_roe_fallback() {
        let mut facts = complete_facts();
        facts.quarterly.insert_row(NET_INCOME, vec![80.0, 60.0, 50.0]);

        let snapshot = resolve_snapshot(&facts, Windows::default()).expect("resolves");
        assert_eq!(snapshot.roe_history().values, vec![20.0; 4]);
        assert_eq!(
            snapshot.roe_history().origin,
            SeriesOrigin::fallback("return on equity")
        );
    }

    #[test]
    fn zero_annual_revenue_fails_gross_margin() {
        let mut facts = complete_facts();
        facts
            .annual
            .insert_row(TOTAL_REVENUE, vec![1_000.0, 0.0, 1_000.0, 1_000.0, 1_000.0]);

        let err = resolve_snapshot(&facts, Windows::default()).expect_err("must fail");
        assert!(err.to_string().contains("zero year"));
    }
}
