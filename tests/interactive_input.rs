//! Behavior-driven tests for interactive input
//!
//! These tests drive the prompter with scripted answers and check what the
//! user sees and which snapshot comes out.

use std::io::Cursor;

use buffett_core::input::{parse_list, InputError, ListError, Prompter};
use buffett_core::{criteria, DerivedMetrics, SeriesOrigin, Verdict, Windows};

fn prompter(answers: &str) -> Prompter<Cursor<Vec<u8>>, Vec<u8>> {
    Prompter::new(Cursor::new(answers.as_bytes().to_vec()), Vec::new())
}

const VALID_SESSION: &str = "\
3,2.5,2,1.5,1.2
4,3.8,3.6,3.4
8,6,7,9
50,45,40,35,30
60
50
";

#[test]
fn a_complete_session_yields_a_reported_snapshot() {
    // Given: Valid answers for every field
    let mut prompter = prompter(VALID_SESSION);

    // When: The snapshot is collected
    let snapshot = prompter
        .collect_snapshot(Windows::default())
        .expect("every answer is valid");

    // Then: Values keep the entered order and nothing is marked as estimated
    assert_eq!(snapshot.eps_history().values, vec![3.0, 2.5, 2.0, 1.5, 1.2]);
    assert_eq!(snapshot.roe_history().values, vec![8.0, 6.0, 7.0, 9.0]);
    assert_eq!(snapshot.price(), 60.0);
    assert_eq!(snapshot.book_value_per_share(), 50.0);
    assert_eq!(snapshot.eps_history().origin, SeriesOrigin::Reported);
    assert!(snapshot.fallback_fields().is_empty());

    let result = criteria::evaluate(&DerivedMetrics::from_snapshot(snapshot));
    assert_eq!(result.verdict(), Verdict::Recommended);
}

#[test]
fn prompts_follow_the_field_order() {
    let mut prompter = prompter(VALID_SESSION);
    prompter
        .collect_snapshot(Windows::default())
        .expect("every answer is valid");

    let transcript = String::from_utf8(prompter.into_writer()).expect("utf8");
    let positions = [
        "EPS for the last 5 years",
        "Revenue per share for the last 4 quarters",
        "ROE (%) for the last 4 quarters",
        "Gross margin (%) for the last 5 years",
        "Current price",
        "Book value per share",
    ]
    .map(|prompt| transcript.find(prompt).expect("prompt was shown"));

    assert!(positions.windows(2).all(|pair| pair[0] < pair[1]));
}

#[test]
fn bad_list_answers_are_re_prompted() {
    // Given: A short list, then letters, then a valid EPS answer
    let answers = format!("1,2,3\na,b,c,d,e\n{VALID_SESSION}");
    let mut prompter = prompter(&answers);

    // When: The snapshot is collected
    let snapshot = prompter
        .collect_snapshot(Windows::default())
        .expect("the third EPS answer is valid");

    // Then: Two retry messages were shown and the session continued
    assert_eq!(snapshot.eps_history().values, vec![3.0, 2.5, 2.0, 1.5, 1.2]);
    let transcript = String::from_utf8(prompter.into_writer()).expect("utf8");
    assert_eq!(transcript.matches("please try again").count(), 2);
    assert!(transcript.contains("expected 5 values, got 3"));
    assert!(transcript.contains("'a' is not a number"));
}

#[test]
fn a_malformed_price_aborts_the_session() {
    // Given: Valid histories but a price that is not a number
    let answers = "3,2.5,2,1.5,1.2\n4,3.8,3.6,3.4\n8,6,7,9\n50,45,40,35,30\nsixty\n50\n";
    let mut prompter = prompter(answers);

    // When/Then: Collection stops with an error naming the field
    let err = prompter
        .collect_snapshot(Windows::default())
        .expect_err("price must be numeric");
    assert_eq!(err.to_string(), "Current price must be a number, got 'sixty'");
}

#[test]
fn a_zero_book_value_is_refused() {
    let answers = "3,2.5,2,1.5,1.2\n4,3.8,3.6,3.4\n8,6,7,9\n50,45,40,35,30\n60\n0\n";
    let err = prompter(answers)
        .collect_snapshot(Windows::default())
        .expect_err("book value cannot be zero");
    assert!(matches!(err, InputError::Validation(_)));
}

#[test]
fn custom_windows_change_the_expected_counts() {
    let answers = "2,2,2\n3,3\n9,9\n30,30,30\n10\n10\n";
    let snapshot = prompter(answers)
        .collect_snapshot(Windows::new(3, 2).expect("valid windows"))
        .expect("counts match the windows");

    assert_eq!(snapshot.eps_history().len(), 3);
    assert_eq!(snapshot.roe_history().len(), 2);
}

#[test]
fn stock_id_is_normalised_and_re_prompted() {
    let mut prompter = prompter("\n2330\n");
    let symbol = prompter.prompt_symbol().expect("second answer is valid");
    assert_eq!(symbol.as_str(), "2330");

    let transcript = String::from_utf8(prompter.into_writer()).expect("utf8");
    assert_eq!(transcript.matches("Stock id: ").count(), 2);
}

#[test]
fn list_parsing_matches_the_documented_examples() {
    assert_eq!(
        parse_list("1,2,3,4,5", 5),
        Ok(vec![1.0, 2.0, 3.0, 4.0, 5.0])
    );
    assert_eq!(
        parse_list("1,2,3", 5),
        Err(ListError::WrongCount {
            expected: 5,
            actual: 3
        })
    );
    assert_eq!(
        parse_list("a,b,c,d,e", 5),
        Err(ListError::InvalidNumber {
            item: String::from("a")
        })
    );
}
