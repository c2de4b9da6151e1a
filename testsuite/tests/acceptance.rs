#![cfg(test)]

use anyhow::Result;
use laderr_testsuite::{check_folder, Expectation};

fn folder(path: &str) -> String {
    format!("{}/test_files/{path}", env!("CARGO_MANIFEST_DIR"))
}

#[test]
fn valid_documents_conform() -> Result<()> {
    check_folder(folder("valid"), Expectation::Conforms)
}

#[test]
fn toml_syntax_errors_are_reported() -> Result<()> {
    check_folder(folder("invalid/syntax"), Expectation::SyntaxError)
}

#[test]
fn malformed_structures_are_rejected() -> Result<()> {
    check_folder(folder("invalid/structure"), Expectation::StructureError)
}

#[test]
fn metadata_datatype_violations() -> Result<()> {
    check_folder(folder("invalid/metadata/datatype"), Expectation::Violates)
}

#[test]
fn metadata_multiplicity_violations() -> Result<()> {
    check_folder(folder("invalid/metadata/multiplicity"), Expectation::Violates)
}

#[test]
fn undefined_metadata_keys() -> Result<()> {
    check_folder(folder("invalid/metadata/undefined"), Expectation::Violates)
}

#[test]
fn combined_metadata_violations() -> Result<()> {
    check_folder(folder("invalid/metadata/combined"), Expectation::Violates)
}
