//! Ordered resolution of a history series from several candidate sources.
//!
//! A [`SeriesChain`] holds steps in priority order. Each step either produces
//! a [`Series`] or explains why it could not; a produced series is accepted
//! only when it fills the window exactly. The first accepted series wins and
//! the remaining steps are never run. When every step is rejected the chain
//! fails with all the reasons, in order.

use std::fmt::{Display, Formatter};

use crate::domain::{Series, SeriesField};

type Attempt<'a> = Box<dyn FnOnce() -> Result<Series, String> + 'a>;

/// Why a single step did not yield the series.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    pub step: &'static str,
    pub reason: String,
}

impl Display for Rejection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.step, self.reason)
    }
}

/// Every step of a chain was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unresolved {
    pub field: SeriesField,
    pub rejections: Vec<Rejection>,
}

impl Display for Unresolved {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "could not resolve {}", self.field)?;
        for (index, rejection) in self.rejections.iter().enumerate() {
            let separator = if index == 0 { ": " } else { "; " };
            write!(f, "{separator}{rejection}")?;
        }
        Ok(())
    }
}

impl std::error::Error for Unresolved {}

pub struct SeriesChain<'a> {
    field: SeriesField,
    expected_len: usize,
    steps: Vec<(&'static str, Attempt<'a>)>,
}

impl<'a> SeriesChain<'a> {
    pub fn new(field: SeriesField, expected_len: usize) -> Self {
        Self {
            field,
            expected_len,
            steps: Vec::new(),
        }
    }

    pub fn step(
        mut self,
        name: &'static str,
        attempt: impl FnOnce() -> Result<Series, String> + 'a,
    ) -> Self {
        self.steps.push((name, Box::new(attempt)));
        self
    }

    pub fn resolve(self) -> Result<Series, Unresolved> {
        let mut rejections = Vec::with_capacity(self.steps.len());

        for (step, attempt) in self.steps {
            let reason = match attempt() {
                Ok(series) if series.len() == self.expected_len => {
                    if series.origin.is_fallback() {
                        tracing::info!(
                            field = %self.field,
                            step,
                            "substituting approximate figures"
                        );
                    } else {
                        tracing::debug!(field = %self.field, step, "resolved from reported figures");
                    }
                    return Ok(series);
                }
                Ok(series) => format!(
                    "expected {} values, found {}",
                    self.expected_len,
                    series.len()
                ),
                Err(reason) => reason,
            };

            tracing::debug!(field = %self.field, step, %reason, "step rejected");
            rejections.push(Rejection { step, reason });
        }

        Err(Unresolved {
            field: self.field,
            rejections,
        })
    }
}
