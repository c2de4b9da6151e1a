//! The Result Serializer.

use crate::base_uri::BaseUri;
use crate::error::SerializerError;
use laderr_model::vocab::laderr;
use laderr_model::Graph;
use oxrdfio::{RdfFormat, RdfSerializer};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

pub use oxrdfio::RdfFormat as GraphFormat;

const RDF_NAMESPACE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
const RDFS_NAMESPACE: &str = "http://www.w3.org/2000/01/rdf-schema#";
const XSD_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema#";

/// Looks up a serialization format by name, media type or file extension.
///
/// ```
/// use laderr::io::{parse_format, GraphFormat};
///
/// assert_eq!(parse_format("turtle")?, GraphFormat::Turtle);
/// assert_eq!(parse_format("nt")?, GraphFormat::NTriples);
/// assert_eq!(parse_format("application/rdf+xml")?, GraphFormat::RdfXml);
/// # Result::<_, laderr::SerializerError>::Ok(())
/// ```
pub fn parse_format(name: &str) -> Result<RdfFormat, SerializerError> {
    let format = match name.to_ascii_lowercase().as_str() {
        "turtle" => Some(RdfFormat::Turtle),
        "ntriples" | "n-triples" => Some(RdfFormat::NTriples),
        "nquads" | "n-quads" => Some(RdfFormat::NQuads),
        "trig" => Some(RdfFormat::TriG),
        "n3" => Some(RdfFormat::N3),
        "xml" | "rdfxml" | "rdf/xml" => Some(RdfFormat::RdfXml),
        other => RdfFormat::from_media_type(other).or_else(|| RdfFormat::from_extension(other)),
    };
    format.ok_or_else(|| SerializerError::UnsupportedFormat(name.to_owned()))
}

/// Guesses the format of `path` from its extension, defaulting to Turtle.
pub fn format_for_path(path: &Path) -> RdfFormat {
    path.extension()
        .and_then(|extension| extension.to_str())
        .and_then(RdfFormat::from_extension)
        .unwrap_or(RdfFormat::Turtle)
}

/// Writes `graph` to `writer`, declaring the document base namespace as the empty prefix.
pub fn serialize_graph<W: Write>(
    graph: &Graph,
    base: &BaseUri,
    format: RdfFormat,
    writer: W,
) -> Result<W, SerializerError> {
    let mut serializer = RdfSerializer::from_format(format);
    for (name, namespace) in [
        ("", base.as_str()),
        ("laderr", laderr::NAMESPACE),
        ("rdf", RDF_NAMESPACE),
        ("rdfs", RDFS_NAMESPACE),
        ("xsd", XSD_NAMESPACE),
    ] {
        serializer = serializer
            .with_prefix(name, namespace)
            .map_err(|error| SerializerError::InvalidPrefix {
                namespace: namespace.to_owned(),
                error,
            })?;
    }
    let mut serializer = serializer.for_writer(writer);
    for triple in graph {
        serializer.serialize_triple(triple)?;
    }
    Ok(serializer.finish()?)
}

/// Writes `graph` to the file at `path`, creating its parent directories if needed.
pub fn save_graph(
    graph: &Graph,
    base: &BaseUri,
    format: RdfFormat,
    path: &Path,
) -> Result<(), SerializerError> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let writer = serialize_graph(graph, base, format, BufWriter::new(File::create(path)?))?;
    writer.into_inner().map_err(|error| error.into_error())?.sync_all()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::prelude::*;
    use assert_fs::TempDir;
    use laderr_model::vocab::{rdf, rdfs, xsd};
    use laderr_model::{LiteralRef, NamedNode, TripleRef};
    use oxrdfio::RdfParser;

    fn graph() -> Graph {
        let spec = NamedNode::new_unchecked("https://laderr.laderr#LaderrSpecification");
        let mut graph = Graph::new();
        graph.insert(TripleRef::new(&spec, rdf::TYPE, laderr::LADERR_SPECIFICATION));
        graph.insert(TripleRef::new(
            &spec,
            laderr::CREATED_ON,
            LiteralRef::new_typed_literal("2024-01-15T10:00:00Z", xsd::DATE_TIME),
        ));
        graph.insert(TripleRef::new(
            &spec,
            rdfs::LABEL,
            LiteralRef::new_simple_literal("spec"),
        ));
        graph
    }

    #[test]
    fn turtle_uses_prefixes() -> Result<(), SerializerError> {
        let turtle = serialize_graph(&graph(), &BaseUri::default(), RdfFormat::Turtle, Vec::new())?;
        let turtle = String::from_utf8(turtle).unwrap();
        assert!(turtle.contains("@prefix : <https://laderr.laderr#> ."));
        assert!(turtle.contains("@prefix laderr: <https://w3id.org/pedropaulofb/laderr#> ."));
        assert!(turtle.contains(":LaderrSpecification"));
        Ok(())
    }

    #[test]
    fn save_creates_missing_directories() -> Result<(), SerializerError> {
        let dir = TempDir::new().unwrap();
        let path = dir.child("results").child("result.nt");
        save_graph(&graph(), &BaseUri::default(), format_for_path(path.path()), path.path())?;
        path.assert(predicates::str::contains("<https://laderr.laderr#LaderrSpecification>"));

        let triples = RdfParser::from_format(RdfFormat::NTriples)
            .for_reader(std::fs::File::open(path.path())?)
            .map(|quad| quad.map(laderr_model::Triple::from))
            .collect::<Result<Vec<_>, _>>()
            .unwrap();
        assert_eq!(triples.iter().collect::<Graph>(), graph());
        Ok(())
    }

    #[test]
    fn format_names() {
        assert_eq!(parse_format("Turtle").unwrap(), RdfFormat::Turtle);
        assert_eq!(parse_format("ttl").unwrap(), RdfFormat::Turtle);
        assert!(matches!(
            parse_format("yaml"),
            Err(SerializerError::UnsupportedFormat(_))
        ));
        assert_eq!(format_for_path(Path::new("out/result")), RdfFormat::Turtle);
    }
}
