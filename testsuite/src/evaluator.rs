use crate::report::TestResult;
use anyhow::{bail, Context, Result};
use assert_fs::TempDir;
use clap::ValueEnum;
use laderr::{DocumentError, LaderrConfig, LaderrError, Pipeline};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// What running a document is expected to end with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Expectation {
    /// The document is valid.
    Conforms,
    /// The document is mapped but breaks at least one shape.
    Violates,
    /// The document is not TOML.
    SyntaxError,
    /// The document is TOML but not shaped like a LaDeRR specification.
    StructureError,
}

impl fmt::Display for Expectation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Conforms => "a conforming document",
            Self::Violates => "a non-conforming document",
            Self::SyntaxError => "a TOML syntax error",
            Self::StructureError => "a structure error",
        })
    }
}

#[derive(Debug, Clone)]
pub struct TestCase {
    pub path: PathBuf,
    pub expectation: Expectation,
}

/// The `.toml` documents of `folder`, sorted by file name.
pub fn test_cases(folder: &Path, expectation: Expectation) -> Result<Vec<TestCase>> {
    let mut paths = Vec::new();
    for entry in fs::read_dir(folder)
        .with_context(|| format!("Could not read test folder {}", folder.display()))?
    {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|extension| extension == "toml") {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths
        .into_iter()
        .map(|path| TestCase { path, expectation })
        .collect())
}

/// Runs test cases through a [`Pipeline`] with the bundled schema and shapes.
///
/// The graphs are written to a temporary directory removed with the evaluator.
#[derive(Debug)]
pub struct TestEvaluator {
    pipeline: Pipeline,
    _output: TempDir,
}

impl TestEvaluator {
    pub fn new() -> Result<Self> {
        let output = TempDir::new().context("Could not create the output directory")?;
        let pipeline = Pipeline::new(LaderrConfig {
            output_path: output.path().join("result.ttl"),
            ..LaderrConfig::default()
        });
        Ok(Self {
            pipeline,
            _output: output,
        })
    }

    pub fn evaluate(&self, cases: impl IntoIterator<Item = TestCase>) -> Vec<TestResult> {
        cases
            .into_iter()
            .map(|case| TestResult {
                outcome: self.evaluate_case(&case),
                test: case.path,
            })
            .collect()
    }

    fn evaluate_case(&self, case: &TestCase) -> Result<()> {
        match (case.expectation, self.pipeline.validate(&case.path)) {
            (Expectation::Conforms, Ok(true))
            | (Expectation::Violates, Ok(false))
            | (
                Expectation::SyntaxError,
                Err(LaderrError::Document(DocumentError::Syntax(_))),
            ) => Ok(()),
            (Expectation::StructureError, Err(error)) if error.as_structure_error().is_some() => {
                Ok(())
            }
            (expectation, Ok(conforms)) => bail!(
                "expected {expectation}, the document {}",
                if conforms {
                    "conforms"
                } else {
                    "does not conform"
                }
            ),
            (expectation, Err(error)) => {
                Err(anyhow::Error::new(error).context(format!("expected {expectation}")))
            }
        }
    }
}
