use buffett_core::{ValidationError, Windows};

use crate::cli::{ManualArgs, ScreenArgs, WindowArgs};

pub const DEFAULT_EXCHANGE_SUFFIX: &str = "TW";
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Settings of one screening run, resolved from the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenConfig {
    pub windows: Windows,
    pub exchange_suffix: String,
    pub timeout_ms: u64,
    pub max_attempts: Option<u32>,
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            windows: Windows::default(),
            exchange_suffix: String::from(DEFAULT_EXCHANGE_SUFFIX),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            max_attempts: None,
        }
    }
}

impl ScreenConfig {
    pub fn from_screen_args(args: &ScreenArgs) -> Result<Self, ValidationError> {
        Ok(Self {
            windows: windows(&args.windows)?,
            exchange_suffix: args.exchange_suffix.trim().to_owned(),
            timeout_ms: args.timeout_ms,
            ..Self::default()
        })
    }

    pub fn from_manual_args(args: &ManualArgs) -> Result<Self, ValidationError> {
        Ok(Self {
            windows: windows(&args.windows)?,
            max_attempts: args.max_attempts,
            ..Self::default()
        })
    }

    /// Years of statements to request, enough for both the annual and the
    /// quarterly window. One spare year covers a period not yet filed.
    pub fn lookback_years(&self) -> u32 {
        let years = self.windows.years.max(self.windows.quarters.div_ceil(4));
        u32::try_from(years).unwrap_or(u32::MAX).saturating_add(1)
    }
}

fn windows(args: &WindowArgs) -> Result<Windows, ValidationError> {
    Windows::new(args.years_eps, args.quarters_rev)
}
