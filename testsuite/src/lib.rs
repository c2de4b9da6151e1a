//! Acceptance tests of the LaDeRR pipeline.
//!
//! Each test case is a `.toml` document inside a folder, all documents of a folder share the same
//! [`Expectation`].

pub mod evaluator;
pub mod report;

use crate::evaluator::TestEvaluator;
use anyhow::Result;
use std::path::Path;

pub use crate::evaluator::{test_cases, Expectation, TestCase};

/// Runs every document of `folder` and fails with the list of documents not meeting `expectation`.
#[allow(clippy::panic_in_result_fn)]
pub fn check_folder(folder: impl AsRef<Path>, expectation: Expectation) -> Result<()> {
    let evaluator = TestEvaluator::new()?;
    let cases = test_cases(folder.as_ref(), expectation)?;
    assert!(
        !cases.is_empty(),
        "no test case in {}",
        folder.as_ref().display()
    );
    let results = evaluator.evaluate(cases);
    let test_count = results.len();

    let mut errors = Vec::default();
    for result in results {
        if let Err(error) = &result.outcome {
            errors.push(format!("{}: failed with error {error:#}", result.test.display()))
        }
    }

    assert!(
        errors.is_empty(),
        "{} tests failing from {} tests:\n{}\n",
        errors.len(),
        test_count,
        errors.join("\n")
    );
    Ok(())
}
