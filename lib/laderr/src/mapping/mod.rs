//! Mapping of a [`Document`](crate::Document) to RDF.
//!
//! Both builders mint the specification node at `<base>LaderrSpecification`, so the union of their
//! graphs describes a single specification.

mod data;
mod metadata;

pub use data::build_data_graph;
pub use metadata::{build_metadata_graph, metadata_datatype, RECOGNIZED_METADATA};

use crate::base_uri::BaseUri;
use crate::error::{GraphBuildError, StructureError};
use laderr_model::vocab::laderr;
use laderr_model::NamedNode;
use toml::Value;

/// The local name of the specification node inside the base namespace.
pub const SPECIFICATION: &str = "LaderrSpecification";

/// Returns the node describing the specification itself.
pub fn specification_node(base: &BaseUri) -> Result<NamedNode, GraphBuildError> {
    named_node(base.join(SPECIFICATION))
}

fn named_node(iri: String) -> Result<NamedNode, GraphBuildError> {
    NamedNode::new(iri.as_str()).map_err(|error| GraphBuildError::InvalidIri { iri, error })
}

/// Returns the term named `local` in the LaDeRR vocabulary.
fn vocabulary_term(local: &str) -> Result<NamedNode, GraphBuildError> {
    named_node(format!("{}{local}", laderr::NAMESPACE))
}

/// The lexical form of a scalar TOML value.
///
/// Strings are taken verbatim, other scalars use their TOML representation (datetimes are
/// RFC 3339). Arrays and tables have none.
fn lexical_form(value: &Value) -> Option<String> {
    match value {
        Value::String(value) => Some(value.clone()),
        Value::Datetime(datetime) => Some(datetime.to_string()),
        Value::Array(_) | Value::Table(_) => None,
        Value::Integer(_) | Value::Float(_) | Value::Boolean(_) => Some(value.to_string()),
    }
}

/// The lexical forms of a scalar or of each element of an array of scalars.
///
/// `location` builds the error for values that are neither.
fn scalars(
    value: &Value,
    location: impl Fn(&'static str) -> StructureError,
) -> Result<Vec<String>, StructureError> {
    let values = match value {
        Value::Array(values) => values.iter().collect(),
        value => vec![value],
    };
    values
        .into_iter()
        .map(|value| lexical_form(value).ok_or_else(|| location(kind(value))))
        .collect()
}

/// A human readable name of the kind of a TOML value.
pub(crate) fn kind(value: &Value) -> &'static str {
    match value {
        Value::String(_) => "a string",
        Value::Integer(_) => "an integer",
        Value::Float(_) => "a float",
        Value::Boolean(_) => "a boolean",
        Value::Datetime(_) => "a datetime",
        Value::Array(_) => "an array",
        Value::Table(_) => "a table",
    }
}

const SCALARS: &str = "a scalar or an array of scalars";

#[cfg(test)]
mod tests {
    use super::*;
    use toml::value::Datetime;

    #[test]
    fn lexical_forms() {
        assert_eq!(lexical_form(&"T".into()), Some("T".to_owned()));
        assert_eq!(lexical_form(&Value::Integer(3)), Some("3".to_owned()));
        assert_eq!(lexical_form(&Value::Float(1.0)), Some("1.0".to_owned()));
        assert_eq!(lexical_form(&Value::Boolean(true)), Some("true".to_owned()));
        let datetime: Datetime = "2024-01-15T10:00:00Z".parse().unwrap();
        assert_eq!(
            lexical_form(&Value::Datetime(datetime)),
            Some("2024-01-15T10:00:00Z".to_owned())
        );
        let local: Datetime = "2024-01-15T10:00:00".parse().unwrap();
        assert_eq!(
            lexical_form(&Value::Datetime(local)),
            Some("2024-01-15T10:00:00".to_owned())
        );
        assert_eq!(lexical_form(&Value::Array(Vec::new())), None);
    }

    #[test]
    fn nested_arrays_are_no_scalars() {
        let value = Value::Array(vec![Value::Array(Vec::new())]);
        let error = scalars(&value, |found| StructureError {
            section: "title".to_owned(),
            instance: None,
            property: None,
            expected: SCALARS,
            found,
        })
        .unwrap_err();
        assert_eq!(error.found, "an array");
    }
}
