#![allow(clippy::print_stdout)]
use anyhow::Result;
use clap::Parser;
use laderr_testsuite::evaluator::{test_cases, Expectation, TestEvaluator};
use laderr_testsuite::report::build_report;
use std::path::PathBuf;

#[derive(Parser)]
/// LaDeRR testsuite runner
struct Args {
    /// What the documents of the folders are expected to end with
    #[arg(long, value_enum)]
    expect: Expectation,
    /// Folders of `.toml` documents to run
    #[arg(required = true)]
    folders: Vec<PathBuf>,
}

fn main() -> Result<()> {
    let matches = Args::parse();

    let evaluator = TestEvaluator::new()?;
    let mut cases = Vec::new();
    for folder in &matches.folders {
        cases.extend(test_cases(folder, matches.expect)?);
    }
    print!("{}", build_report(evaluator.evaluate(cases)));
    Ok(())
}
