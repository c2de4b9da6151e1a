//! The Document Reader: turns a LaDeRR TOML file into its metadata and its data sections.

use crate::error::DocumentError;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use toml::{Table, Value};
use tracing::info;

/// The property holding the identifier of an instance.
pub const ID: &str = "id";
/// The metadata key listing the authors of a specification.
pub const CREATED_BY: &str = "createdBy";

/// A parsed LaDeRR document.
///
/// Top-level entries holding a table are data sections, keyed by the class of their instances.
/// All other top-level entries are metadata.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    pub metadata: Table,
    pub sections: Table,
}

impl Document {
    /// Reads and parses the document at `path`.
    ///
    /// ```no_run
    /// use laderr::Document;
    ///
    /// let document = Document::read("my_spec.toml")?;
    /// println!("{} data sections", document.sections.len());
    /// # Result::<_, laderr::DocumentError>::Ok(())
    /// ```
    pub fn read(path: impl AsRef<Path>) -> Result<Self, DocumentError> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(DocumentError::NotFound(path.to_owned()));
        }
        let document = fs::read_to_string(path)?.parse::<Self>()?;
        info!(
            path = %path.display(),
            "LaDeRR specification's syntax successfully validated"
        );
        Ok(document)
    }

    /// Splits a parsed TOML table into metadata and data sections and normalizes both.
    pub fn from_table(table: Table) -> Self {
        let (sections, metadata): (Table, Table) = table
            .into_iter()
            .partition(|(_, value)| value.is_table());
        Self {
            metadata: normalize_created_by(metadata),
            sections: with_default_ids(sections),
        }
    }
}

impl FromStr for Document {
    type Err = DocumentError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_table(text.parse::<Table>()?))
    }
}

/// Wraps a single `createdBy` string into a one-element array.
pub fn normalize_created_by(mut metadata: Table) -> Table {
    if let Some(author @ Value::String(_)) = metadata.get(CREATED_BY) {
        let authors = Value::Array(vec![author.clone()]);
        metadata.insert(CREATED_BY.to_owned(), authors);
    }
    metadata
}

/// Gives every instance without an explicit `id` its key as `id`.
///
/// Instances that already have an `id` are left untouched, so applying this twice is the same as
/// applying it once. Entries that are not tables are kept as they are, they are rejected when the
/// data graph is built.
pub fn with_default_ids(sections: Table) -> Table {
    sections
        .into_iter()
        .map(|(class, section)| {
            let section = match section {
                Value::Table(instances) => Value::Table(
                    instances
                        .into_iter()
                        .map(|(key, instance)| {
                            let instance = match instance {
                                Value::Table(mut properties) => {
                                    if !properties.contains_key(ID) {
                                        properties.insert(ID.to_owned(), Value::String(key.clone()));
                                    }
                                    Value::Table(properties)
                                }
                                other => other,
                            };
                            (key, instance)
                        })
                        .collect(),
                ),
                other => other,
            };
            (class, section)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_metadata_and_sections() -> Result<(), DocumentError> {
        let document: Document = r#"
            title = "T"
            version = "1.0"
            createdBy = ["A", "B"]

            [Widget.W1]
            label = "first"
        "#
        .parse()?;
        assert_eq!(document.metadata.len(), 3);
        assert_eq!(
            document.sections.keys().collect::<Vec<_>>(),
            ["Widget"]
        );
        Ok(())
    }

    #[test]
    fn created_by_is_always_an_array() -> Result<(), DocumentError> {
        let single: Document = r#"createdBy = "A""#.parse()?;
        let list: Document = r#"createdBy = ["A"]"#.parse()?;
        assert_eq!(single.metadata, list.metadata);
        Ok(())
    }

    #[test]
    fn instances_default_to_their_key_as_id() -> Result<(), DocumentError> {
        let document: Document = r#"
            [Widget.W1]
            label = "first"
            [Widget.W2]
            id = "explicit"
        "#
        .parse()?;
        let widgets = document.sections["Widget"].as_table().unwrap();
        assert_eq!(widgets["W1"]["id"].as_str(), Some("W1"));
        assert_eq!(widgets["W2"]["id"].as_str(), Some("explicit"));

        assert_eq!(with_default_ids(document.sections.clone()), document.sections);
        Ok(())
    }

    #[test]
    fn syntax_errors_carry_diagnostics() {
        let error = "title = ".parse::<Document>().unwrap_err();
        assert!(matches!(error, DocumentError::Syntax(_)));
        assert!(error.to_string().contains("line 1"));
    }
}
