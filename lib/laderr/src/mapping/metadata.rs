use super::{scalars, specification_node, vocabulary_term, SCALARS};
use crate::base_uri::BaseUri;
use crate::error::{GraphBuildError, StructureError};
use laderr_model::vocab::{laderr, rdf, xsd};
use laderr_model::{Graph, LiteralRef, NamedNodeRef, TripleRef};
use toml::Table;

/// The metadata keys of the LaDeRR vocabulary and the datatype of their literals.
pub const RECOGNIZED_METADATA: [(&str, NamedNodeRef<'static>); 7] = [
    ("title", xsd::STRING),
    ("description", xsd::STRING),
    ("version", xsd::STRING),
    ("createdBy", xsd::STRING),
    ("createdOn", xsd::DATE_TIME),
    ("modifiedOn", xsd::DATE_TIME),
    ("baseUri", xsd::ANY_URI),
];

/// The datatype of the literals of a metadata key, `xsd:string` for keys outside of
/// [`RECOGNIZED_METADATA`].
pub fn metadata_datatype(key: &str) -> NamedNodeRef<'static> {
    RECOGNIZED_METADATA
        .iter()
        .find(|(name, _)| *name == key)
        .map_or(xsd::STRING, |(_, datatype)| *datatype)
}

/// Maps the metadata of a document to triples about its specification node.
///
/// Every value becomes a literal typed after [`metadata_datatype`], arrays fan out into one triple
/// per element. Unknown keys are mapped too, rejecting them is up to the shapes.
pub fn build_metadata_graph(metadata: &Table, base: &BaseUri) -> Result<Graph, GraphBuildError> {
    let specification = specification_node(base)?;
    let mut graph = Graph::new();
    graph.insert(TripleRef::new(
        &specification,
        rdf::TYPE,
        laderr::LADERR_SPECIFICATION,
    ));
    for (key, value) in metadata {
        let property = vocabulary_term(key)?;
        let datatype = metadata_datatype(key);
        let values = scalars(value, |found| StructureError {
            section: key.clone(),
            instance: None,
            property: None,
            expected: SCALARS,
            found,
        })?;
        for value in &values {
            graph.insert(TripleRef::new(
                &specification,
                &property,
                LiteralRef::new_typed_literal(value, datatype),
            ));
        }
    }
    Ok(graph)
}
