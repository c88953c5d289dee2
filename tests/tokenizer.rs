use cssfront::testing::{fixture_from_filename, Test};
use serde_json::Value;
use test_case::test_case;

#[test_case("basic.json")]
#[test_case("broken.json")]
#[test_case("metadata.json")]
#[test_case("positions.json")]
fn tokenization(filename: &str) {
    let root = fixture_from_filename(filename).unwrap();
    assert!(!root.tests.is_empty(), "no tests found in {filename}");

    for test in root.tests {
        assert_tokenization(&test);
    }
}

fn assert_tokenization(test: &Test) {
    let outcome = test
        .tokenize()
        .unwrap_or_else(|err| panic!("{}: could not set up the tokenizer: {err}", test.description));

    let have: Value = serde_json::to_value(&outcome.tokens).unwrap();
    assert_eq!(
        have, test.output,
        "{}: incorrect tokens for {:?}",
        test.description, test.input
    );

    if let Some(expected) = test.warnings {
        assert_eq!(
            outcome.warnings.len(),
            expected,
            "{}: incorrect number of warnings: {:?}",
            test.description,
            outcome.warnings.to_vec()
        );
    }
}
