use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::indicators;
use crate::ValidationError;

pub const DEFAULT_YEARS: usize = 5;
pub const DEFAULT_QUARTERS: usize = 4;

/// History window sizes: `years` for EPS and gross margin, `quarters` for
/// revenue per share and ROE.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Windows {
    pub years: usize,
    pub quarters: usize,
}

impl Windows {
    pub fn new(years: usize, quarters: usize) -> Result<Self, ValidationError> {
        if years == 0 {
            return Err(ValidationError::EmptyWindow { name: "years" });
        }
        if quarters == 0 {
            return Err(ValidationError::EmptyWindow { name: "quarters" });
        }
        Ok(Self { years, quarters })
    }

    pub const fn len_of(self, field: SeriesField) -> usize {
        match field {
            SeriesField::Eps | SeriesField::GrossMargin => self.years,
            SeriesField::RevenuePerShare | SeriesField::Roe => self.quarters,
        }
    }
}

impl Default for Windows {
    fn default() -> Self {
        Self {
            years: DEFAULT_YEARS,
            quarters: DEFAULT_QUARTERS,
        }
    }
}

/// The four history series a snapshot carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeriesField {
    Eps,
    RevenuePerShare,
    Roe,
    GrossMargin,
}

impl SeriesField {
    pub const ALL: [SeriesField; 4] = [
        SeriesField::Eps,
        SeriesField::RevenuePerShare,
        SeriesField::Roe,
        SeriesField::GrossMargin,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Eps => "EPS history",
            Self::RevenuePerShare => "revenue per share history",
            Self::Roe => "ROE history",
            Self::GrossMargin => "gross margin history",
        }
    }
}

impl Display for SeriesField {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where the figures of a series came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SeriesOrigin {
    /// Period-by-period figures as reported.
    Reported,
    /// Approximate figures substituted because the preferred detail was
    /// missing; `basis` names what was used instead.
    Fallback { basis: String },
}

impl SeriesOrigin {
    pub fn fallback(basis: impl Into<String>) -> Self {
        Self::Fallback {
            basis: basis.into(),
        }
    }

    pub const fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback { .. })
    }
}

/// Ordered figures, most recent period first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub values: Vec<f64>,
    pub origin: SeriesOrigin,
}

impl Series {
    pub fn reported(values: Vec<f64>) -> Self {
        Self {
            values,
            origin: SeriesOrigin::Reported,
        }
    }

    /// A single figure repeated across the whole window.
    pub fn repeated(value: f64, len: usize, basis: impl Into<String>) -> Self {
        Self {
            values: vec![value; len],
            origin: SeriesOrigin::fallback(basis),
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn all_above(&self, threshold: f64) -> bool {
        self.values.iter().all(|value| *value > threshold)
    }
}

/// Every figure the five criteria need for one ticker.
///
/// Construction checks every series against its window, rejects non-finite
/// figures and a zero book value, so an existing snapshot is always safe to
/// evaluate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinancialSnapshot {
    windows: Windows,
    eps_history: Series,
    revenue_per_share_history: Series,
    roe_history: Series,
    gross_margin_history: Series,
    price: f64,
    book_value_per_share: f64,
}

impl FinancialSnapshot {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        windows: Windows,
        eps_history: Series,
        revenue_per_share_history: Series,
        roe_history: Series,
        gross_margin_history: Series,
        price: f64,
        book_value_per_share: f64,
    ) -> Result<Self, ValidationError> {
        Windows::new(windows.years, windows.quarters)?;

        validate_series(windows, SeriesField::Eps, &eps_history)?;
        validate_series(
            windows,
            SeriesField::RevenuePerShare,
            &revenue_per_share_history,
        )?;
        validate_series(windows, SeriesField::Roe, &roe_history)?;
        validate_series(windows, SeriesField::GrossMargin, &gross_margin_history)?;

        validate_finite("price", price)?;
        validate_finite("book_value_per_share", book_value_per_share)?;
        if book_value_per_share == 0.0 {
            return Err(ValidationError::ZeroBookValue);
        }

        Ok(Self {
            windows,
            eps_history,
            revenue_per_share_history,
            roe_history,
            gross_margin_history,
            price,
            book_value_per_share,
        })
    }

    pub const fn windows(&self) -> Windows {
        self.windows
    }

    pub fn series(&self, field: SeriesField) -> &Series {
        match field {
            SeriesField::Eps => &self.eps_history,
            SeriesField::RevenuePerShare => &self.revenue_per_share_history,
            SeriesField::Roe => &self.roe_history,
            SeriesField::GrossMargin => &self.gross_margin_history,
        }
    }

    pub fn eps_history(&self) -> &Series {
        &self.eps_history
    }

    pub fn revenue_per_share_history(&self) -> &Series {
        &self.revenue_per_share_history
    }

    pub fn roe_history(&self) -> &Series {
        &self.roe_history
    }

    pub fn gross_margin_history(&self) -> &Series {
        &self.gross_margin_history
    }

    pub const fn price(&self) -> f64 {
        self.price
    }

    pub const fn book_value_per_share(&self) -> f64 {
        self.book_value_per_share
    }

    /// Series that were filled from a fallback figure, in display order.
    pub fn fallback_fields(&self) -> Vec<(SeriesField, &str)> {
        SeriesField::ALL
            .into_iter()
            .filter_map(|field| match &self.series(field).origin {
                SeriesOrigin::Fallback { basis } => Some((field, basis.as_str())),
                SeriesOrigin::Reported => None,
            })
            .collect()
    }
}

/// A snapshot together with the indicators derived from it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DerivedMetrics {
    pub snapshot: FinancialSnapshot,
    pub price_to_book: f64,
}

impl DerivedMetrics {
    pub fn from_snapshot(snapshot: FinancialSnapshot) -> Self {
        let price_to_book =
            indicators::price_to_book(snapshot.price(), snapshot.book_value_per_share());
        Self {
            snapshot,
            price_to_book,
        }
    }
}

fn validate_series(
    windows: Windows,
    field: SeriesField,
    series: &Series,
) -> Result<(), ValidationError> {
    let expected = windows.len_of(field);
    if series.len() != expected {
        return Err(ValidationError::WindowMismatch {
            field,
            expected,
            actual: series.len(),
        });
    }

    if series.values.iter().any(|value| !value.is_finite()) {
        return Err(ValidationError::NonFiniteValue {
            field: field.as_str(),
        });
    }

    Ok(())
}

fn validate_finite(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NonFiniteValue { field });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot_with(eps: Vec<f64>, book_value: f64) -> Result<FinancialSnapshot, ValidationError> {
        FinancialSnapshot::new(
            Windows::default(),
            Series::reported(eps),
            Series::reported(vec![2.0; 4]),
            Series::reported(vec![12.0; 4]),
            Series::reported(vec![30.0; 5]),
            100.0,
            book_value,
        )
    }

    #[test]
    fn accepts_series_matching_default_windows() {
        let snapshot = snapshot_with(vec![2.0; 5], 80.0).expect("valid snapshot");
        assert_eq!(snapshot.windows(), Windows::new(5, 4).expect("valid"));
        assert!(snapshot.fallback_fields().is_empty());
    }

    #[test]
    fn rejects_length_mismatch() {
        let err = snapshot_with(vec![2.0; 3], 80.0).expect_err("must fail");
        assert_eq!(
            err,
            ValidationError::WindowMismatch {
                field: SeriesField::Eps,
                expected: 5,
                actual: 3,
            }
        );
    }

    #[test]
    fn rejects_zero_book_value() {
        let err = snapshot_with(vec![2.0; 5], 0.0).expect_err("must fail");
        assert_eq!(err, ValidationError::ZeroBookValue);
    }

    #[test]
    fn rejects_non_finite_history() {
        let err = snapshot_with(vec![2.0, 2.0, f64::NAN, 2.0, 2.0], 80.0).expect_err("must fail");
        assert!(matches!(err, ValidationError::NonFiniteValue { .. }));
    }

    #[test]
    fn rejects_zero_windows() {
        assert!(matches!(
            Windows::new(0, 4),
            Err(ValidationError::EmptyWindow { name: "years" })
        ));
        assert!(matches!(
            Windows::new(5, 0),
            Err(ValidationError::EmptyWindow { name: "quarters" })
        ));
    }

    #[test]
    fn reports_fallback_series_in_display_order() {
        let snapshot = FinancialSnapshot::new(
            Windows::default(),
            Series::repeated(4.5, 5, "trailing EPS"),
            Series::reported(vec![2.0; 4]),
            Series::repeated(12.3, 4, "return on equity"),
            Series::reported(vec![30.0; 5]),
            100.0,
            80.0,
        )
        .expect("valid snapshot");

        assert_eq!(
            snapshot.fallback_fields(),
            vec![
                (SeriesField::Eps, "trailing EPS"),
                (SeriesField::Roe, "return on equity"),
            ]
        );
    }
}
