mod manual;
mod screen;

use std::io::{self, BufRead, Write};

use buffett_core::input::Prompter;
use buffett_core::{ScreeningReport, Symbol, ValidationError};

use crate::cli::{Cli, Command};
use crate::config::ScreenConfig;
use crate::error::CliError;

pub async fn run(cli: &Cli) -> Result<ScreeningReport, CliError> {
    match &cli.command {
        Command::Screen(args) => {
            let config = ScreenConfig::from_screen_args(args)?;
            screen::run(args.stock_id.as_deref(), &config).await
        }
        Command::Manual(args) => {
            let config = ScreenConfig::from_manual_args(args)?;
            manual::run(args.stock_id.as_deref(), &config)
        }
    }
}

/// Prompts read stdin and write to stderr, keeping stdout for the report.
fn terminal_prompter(config: &ScreenConfig) -> Prompter<io::StdinLock<'static>, io::Stderr> {
    Prompter::new(io::stdin().lock(), io::stderr()).with_max_attempts(config.max_attempts)
}

/// Parses the stock id given on the command line, or asks for one.
fn stock_id<R: BufRead, W: Write>(
    raw: Option<&str>,
    prompter: &mut Prompter<R, W>,
) -> Result<Symbol, CliError> {
    match raw {
        Some(raw) => Ok(Symbol::parse(raw)?),
        None => Ok(prompter.prompt_symbol()?),
    }
}

/// Takes the stock label as given, or asks for one. Manual runs only display
/// it, so any non-blank text is accepted.
fn stock_label<R: BufRead, W: Write>(
    raw: Option<&str>,
    prompter: &mut Prompter<R, W>,
) -> Result<String, CliError> {
    match raw.map(str::trim) {
        Some("") => Err(ValidationError::EmptySymbol.into()),
        Some(label) => Ok(label.to_owned()),
        None => Ok(prompter.prompt_label()?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn prompter(input: &str) -> Prompter<Cursor<Vec<u8>>, Vec<u8>> {
        Prompter::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    #[test]
    fn manual_label_accepts_free_text() {
        let label = stock_label(Some(" Taiwan Semiconductor Mfg. Co. "), &mut prompter(""))
            .expect("any text is a label");
        assert_eq!(label, "Taiwan Semiconductor Mfg. Co.");
    }

    #[test]
    fn manual_label_is_prompted_until_not_blank() {
        let mut prompter = prompter("\n台積電\n");
        let label = stock_label(None, &mut prompter).expect("second answer is valid");
        assert_eq!(label, "台積電");
    }

    #[test]
    fn blank_manual_label_is_rejected() {
        let err = stock_label(Some("  "), &mut prompter("")).expect_err("blank label");
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn screen_stock_id_must_be_a_ticker() {
        let err = stock_id(Some("Taiwan Semiconductor"), &mut prompter(""))
            .expect_err("spaces are not allowed in tickers");
        assert!(matches!(err, CliError::Validation(_)));
    }
}
