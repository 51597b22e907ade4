use buffett_core::{ProviderId, ScreeningReport};

use crate::config::ScreenConfig;
use crate::error::CliError;

use super::{stock_label, terminal_prompter};

pub fn run(raw_stock_id: Option<&str>, config: &ScreenConfig) -> Result<ScreeningReport, CliError> {
    let mut prompter = terminal_prompter(config);
    let label = stock_label(raw_stock_id, &mut prompter)?;
    let snapshot = prompter.collect_snapshot(config.windows)?;

    Ok(ScreeningReport::new(label, ProviderId::Manual, snapshot))
}
