//! Snapshot typed in at a terminal.
//!
//! History fields are re-prompted until they parse (or until `max_attempts`
//! runs out, when set). Price and book value are asked once; a malformed
//! answer aborts the run.

use std::fmt::{Display, Formatter};
use std::io::{BufRead, Write};

use thiserror::Error;

use crate::{FinancialSnapshot, Series, SeriesField, Symbol, ValidationError, Windows};

#[derive(Debug, Error)]
pub enum InputError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("input ended while waiting for {field}")]
    EndOfInput { field: String },

    #[error("{field} must be a number, got '{value}'")]
    InvalidScalar { field: &'static str, value: String },

    #[error("gave up on {field} after {attempts} invalid attempts")]
    AttemptsExhausted { field: String, attempts: u32 },

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Why a comma-separated answer was not accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListError {
    InvalidNumber { item: String },
    WrongCount { expected: usize, actual: usize },
}

impl Display for ListError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidNumber { item } => write!(f, "'{item}' is not a number"),
            Self::WrongCount { expected, actual } => {
                write!(f, "expected {expected} values, got {actual}")
            }
        }
    }
}

impl std::error::Error for ListError {}

/// Parses `"1, 2.5,3"` into exactly `count` finite numbers.
pub fn parse_list(input: &str, count: usize) -> Result<Vec<f64>, ListError> {
    let values = input
        .split(',')
        .map(|item| parse_number(item).ok_or_else(|| ListError::InvalidNumber {
            item: item.trim().to_owned(),
        }))
        .collect::<Result<Vec<_>, _>>()?;

    if values.len() != count {
        return Err(ListError::WrongCount {
            expected: count,
            actual: values.len(),
        });
    }

    Ok(values)
}

fn parse_number(item: &str) -> Option<f64> {
    item.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

/// Line-oriented prompter over any reader/writer pair.
pub struct Prompter<R, W> {
    reader: R,
    writer: W,
    max_attempts: Option<u32>,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            reader,
            writer,
            max_attempts: None,
        }
    }

    /// Bound the re-prompt loop; `None` retries until the answer is valid.
    pub fn with_max_attempts(mut self, max_attempts: Option<u32>) -> Self {
        self.max_attempts = max_attempts.filter(|attempts| *attempts > 0);
        self
    }

    pub fn into_writer(self) -> W {
        self.writer
    }

    fn read_answer(&mut self, prompt: &str, field: &str) -> Result<String, InputError> {
        write!(self.writer, "{prompt}: ")?;
        self.writer.flush()?;

        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Err(InputError::EndOfInput {
                field: field.to_owned(),
            });
        }
        Ok(line.trim().to_owned())
    }

    fn retry<T>(
        &mut self,
        field: &str,
        prompt: &str,
        mut parse: impl FnMut(&str) -> Result<T, String>,
    ) -> Result<T, InputError> {
        let mut attempts = 0_u32;
        loop {
            let answer = self.read_answer(prompt, field)?;
            match parse(&answer) {
                Ok(value) => return Ok(value),
                Err(reason) => {
                    attempts = attempts.saturating_add(1);
                    tracing::debug!(field, attempts, %reason, "rejected interactive answer");
                    writeln!(self.writer, "Invalid input ({reason}), please try again.")?;

                    if self.max_attempts.is_some_and(|max| attempts >= max) {
                        return Err(InputError::AttemptsExhausted {
                            field: field.to_owned(),
                            attempts,
                        });
                    }
                }
            }
        }
    }

    pub fn prompt_symbol(&mut self) -> Result<Symbol, InputError> {
        self.retry("stock id", "Stock id", |answer| {
            Symbol::parse(answer).map_err(|error| error.to_string())
        })
    }

    /// Asks for a free-text stock label, re-prompting while it is blank.
    pub fn prompt_label(&mut self) -> Result<String, InputError> {
        self.retry("stock id", "Stock id", |answer| {
            if answer.is_empty() {
                Err(String::from("stock id cannot be empty"))
            } else {
                Ok(answer.to_owned())
            }
        })
    }

    /// Asks for `count` comma-separated values, re-prompting on bad input.
    pub fn prompt_list(&mut self, field: &str, count: usize) -> Result<Vec<f64>, InputError> {
        let prompt = format!("{field} (comma-separated, {count} values)");
        self.retry(field, &prompt, |answer| {
            parse_list(answer, count).map_err(|error| error.to_string())
        })
    }

    /// Asks once for a single number.
    pub fn prompt_scalar(&mut self, field: &'static str) -> Result<f64, InputError> {
        let answer = self.read_answer(field, field)?;
        parse_number(&answer).ok_or(InputError::InvalidScalar {
            field,
            value: answer,
        })
    }

    /// Walks through every field of a snapshot in display order.
    pub fn collect_snapshot(&mut self, windows: Windows) -> Result<FinancialSnapshot, InputError> {
        let windows = Windows::new(windows.years, windows.quarters)?;

        let eps = self.prompt_list(&field_prompt(SeriesField::Eps, windows), windows.years)?;
        let revenue = self.prompt_list(
            &field_prompt(SeriesField::RevenuePerShare, windows),
            windows.quarters,
        )?;
        let roe = self.prompt_list(&field_prompt(SeriesField::Roe, windows), windows.quarters)?;
        let gross_margin = self.prompt_list(
            &field_prompt(SeriesField::GrossMargin, windows),
            windows.years,
        )?;

        let price = self.prompt_scalar("Current price")?;
        let book_value_per_share = self.prompt_scalar("Book value per share")?;

        Ok(FinancialSnapshot::new(
            windows,
            Series::reported(eps),
            Series::reported(revenue),
            Series::reported(roe),
            Series::reported(gross_margin),
            price,
            book_value_per_share,
        )?)
    }
}

fn field_prompt(field: SeriesField, windows: Windows) -> String {
    match field {
        SeriesField::Eps => format!("EPS for the last {} years", windows.years),
        SeriesField::RevenuePerShare => {
            format!("Revenue per share for the last {} quarters", windows.quarters)
        }
        SeriesField::Roe => format!("ROE (%) for the last {} quarters", windows.quarters),
        SeriesField::GrossMargin => {
            format!("Gross margin (%) for the last {} years", windows.years)
        }
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
    fn parses_comma_separated_values() {
        assert_eq!(
            parse_list("1,2,3,4,5", 5),
            Ok(vec![1.0, 2.0, 3.0, 4.0, 5.0])
        );
        assert_eq!(parse_list(" 1.5 , -2 ", 2), Ok(vec![1.5, -2.0]));
    }

    #[test]
    fn rejects_wrong_count() {
        assert_eq!(
            parse_list("1,2,3", 5),
            Err(ListError::WrongCount {
                expected: 5,
                actual: 3
            })
        );
    }

    #[test]
    fn rejects_non_numbers_and_non_finite_values() {
        assert!(matches!(
            parse_list("a,b,c,d,e", 5),
            Err(ListError::InvalidNumber { .. })
        ));
        assert!(matches!(
            parse_list("1,NaN", 2),
            Err(ListError::InvalidNumber { .. })
        ));
        assert!(matches!(parse_list("", 1), Err(ListError::InvalidNumber { .. })));
    }

    #[test]
    fn re_prompts_until_list_is_valid() {
        let mut prompter = prompter("1,2,3\na,b,c,d,e\n1,2,3,4,5\n");
        let values = prompter.prompt_list("EPS", 5).expect("third answer is valid");
        assert_eq!(values, vec![1.0, 2.0, 3.0, 4.0, 5.0]);

        let output = String::from_utf8(prompter.into_writer()).expect("utf8");
        assert_eq!(output.matches("Invalid input").count(), 2);
        assert_eq!(output.matches("EPS (comma-separated, 5 values): ").count(), 3);
    }

    #[test]
    fn end_of_input_stops_the_retry_loop() {
        let mut prompter = prompter("1,2\n");
        let err = prompter.prompt_list("EPS", 5).expect_err("input runs out");
        assert!(matches!(err, InputError::EndOfInput { .. }));
    }

    #[test]
    fn max_attempts_bounds_the_retry_loop() {
        let mut prompter = prompter("x\nx\nx\n1\n").with_max_attempts(Some(2));
        let err = prompter.prompt_list("ROE", 1).expect_err("two bad answers");
        assert!(matches!(
            err,
            InputError::AttemptsExhausted { attempts: 2, .. }
        ));
    }

    #[test]
    fn malformed_scalar_aborts_without_retry() {
        let mut prompter = prompter("abc\n100\n");
        let err = prompter.prompt_scalar("Current price").expect_err("must fail");
        assert!(matches!(
            err,
            InputError::InvalidScalar { field: "Current price", ref value } if value == "abc"
        ));
    }
}
