use std::sync::Arc;

use buffett_core::{input, FactsSource, ReqwestHttpClient, ScreeningReport, YahooAdapter};

use crate::config::ScreenConfig;
use crate::error::CliError;

use super::{stock_id, terminal_prompter};

pub async fn run(
    raw_stock_id: Option<&str>,
    config: &ScreenConfig,
) -> Result<ScreeningReport, CliError> {
    let symbol = {
        let mut prompter = terminal_prompter(config);
        stock_id(raw_stock_id, &mut prompter)?
    }
    .with_exchange_suffix(&config.exchange_suffix)?;

    let adapter = YahooAdapter::new(Arc::new(ReqwestHttpClient::new()?))
        .with_timeout_ms(config.timeout_ms)
        .with_lookback_years(config.lookback_years());

    let snapshot = input::fetch_snapshot(&adapter, &symbol, config.windows).await?;
    Ok(ScreeningReport::new(symbol, adapter.id(), snapshot))
}
