//! CLI argument definitions for `buffett`.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `screen` | Fetch figures from Yahoo Finance and screen one stock |
//! | `manual` | Type the figures in and screen one stock |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--format` | `table` | Output format (table, json) |
//! | `--pretty` | `false` | Pretty-print JSON output |
//!
//! # Examples
//!
//! ```bash
//! # Screen TSMC on the Taiwan exchange
//! buffett screen 2330
//!
//! # US ticker, no exchange suffix, JSON envelope
//! buffett screen AAPL --exchange-suffix "" --format json --pretty
//!
//! # Enter the figures by hand, three tries per field
//! buffett manual 2330 --max-attempts 3
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};

use buffett_core::{DEFAULT_QUARTERS, DEFAULT_YEARS};

use crate::config::{DEFAULT_EXCHANGE_SUFFIX, DEFAULT_TIMEOUT_MS};

/// Buffett five-criteria stock screen.
///
/// Checks EPS, revenue per share, price-to-book, ROE and gross margin against
/// fixed thresholds and prints whether the stock is recommended.
#[derive(Debug, Parser)]
#[command(name = "buffett", author, version, about = "Buffett five-criteria stock screen")]
pub struct Cli {
    /// Output format for the report.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch the figures from Yahoo Finance.
    Screen(ScreenArgs),
    /// Enter the figures at the terminal.
    Manual(ManualArgs),
}

#[derive(Debug, Clone, Args)]
pub struct WindowArgs {
    /// Number of recent years for EPS and gross margin.
    #[arg(long, default_value_t = DEFAULT_YEARS)]
    pub years_eps: usize,

    /// Number of recent quarters for revenue per share and ROE.
    #[arg(long, default_value_t = DEFAULT_QUARTERS)]
    pub quarters_rev: usize,
}

#[derive(Debug, Clone, Args)]
pub struct ScreenArgs {
    /// Stock id; prompted for when omitted.
    pub stock_id: Option<String>,

    #[command(flatten)]
    pub windows: WindowArgs,

    /// Exchange suffix appended to the stock id; empty to disable.
    #[arg(long, default_value = DEFAULT_EXCHANGE_SUFFIX)]
    pub exchange_suffix: String,

    /// Request timeout in milliseconds.
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_MS)]
    pub timeout_ms: u64,
}

#[derive(Debug, Clone, Args)]
pub struct ManualArgs {
    /// Stock label, any text; prompted for when omitted.
    pub stock_id: Option<String>,

    #[command(flatten)]
    pub windows: WindowArgs,

    /// Give up on a field after this many invalid answers.
    #[arg(long)]
    pub max_attempts: Option<u32>,
}
