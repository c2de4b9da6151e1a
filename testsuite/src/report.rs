use anyhow::Result;
use std::fmt::Write;
use std::path::PathBuf;

#[derive(Debug)]
pub struct TestResult {
    pub test: PathBuf,
    pub outcome: Result<()>,
}

/// A plain text summary of `results`, one line per test followed by the totals.
pub fn build_report(results: impl IntoIterator<Item = TestResult>) -> String {
    let mut report = String::new();
    let mut passed = 0;
    let mut failed = 0;
    for result in results {
        match &result.outcome {
            Ok(()) => {
                passed += 1;
                let _ = writeln!(report, "PASS {}", result.test.display());
            }
            Err(error) => {
                failed += 1;
                let _ = writeln!(report, "FAIL {}: {error:#}", result.test.display());
            }
        }
    }
    let _ = writeln!(report, "{passed} passed, {failed} failed");
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    #[test]
    fn report_counts_outcomes() {
        let report = build_report([
            TestResult {
                test: PathBuf::from("a.toml"),
                outcome: Ok(()),
            },
            TestResult {
                test: PathBuf::from("b.toml"),
                outcome: Err(anyhow!("boom")),
            },
        ]);
        assert_eq!(report, "PASS a.toml\nFAIL b.toml: boom\n1 passed, 1 failed\n");
    }
}
