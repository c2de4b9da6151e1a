//! The Schema Loader and the Shape Set Loader.

use crate::error::ResourceError;
use laderr_model::{Graph, Triple};
use oxrdfio::{RdfFormat, RdfParseError, RdfParser};
use std::cell::OnceCell;
use std::fs::{self, File};
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// File name of the bundled LaDeRR schema.
pub const SCHEMA_FILE_NAME: &str = "laderr-schema-v0.1.0.ttl";
/// File name of the bundled shape set.
pub const SHAPES_FILE_NAME: &str = "laderr-shape-laderrspecification-v0.3.1.shacl";

const BUNDLED_SCHEMA: &str = include_str!("../resources/laderr-schema-v0.1.0.ttl");
const BUNDLED_SHAPES: &str =
    include_str!("../resources/shapes/laderr-shape-laderrspecification-v0.3.1.shacl");

/// Where the schema graph is read from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SchemaSource {
    /// The schema shipped with this crate.
    #[default]
    Bundled,
    /// An RDF file, its format is guessed from the extension and defaults to Turtle.
    File(PathBuf),
}

/// Loads the schema graph once and hands out the cached graph afterwards.
#[derive(Debug, Default)]
pub struct SchemaLoader {
    source: SchemaSource,
    schema: OnceCell<Graph>,
}

impl SchemaLoader {
    pub fn new(source: SchemaSource) -> Self {
        Self {
            source,
            schema: OnceCell::new(),
        }
    }

    pub fn source(&self) -> &SchemaSource {
        &self.source
    }

    /// Returns the schema graph, parsing it on first use.
    pub fn load(&self) -> Result<&Graph, ResourceError> {
        if let Some(schema) = self.schema.get() {
            return Ok(schema);
        }
        let schema = match &self.source {
            SchemaSource::Bundled => parse(RdfFormat::Turtle, BUNDLED_SCHEMA.as_bytes())?,
            SchemaSource::File(path) => {
                if !path.is_file() {
                    return Err(ResourceError::SchemaNotFound(path.clone()));
                }
                let format = path
                    .extension()
                    .and_then(|extension| extension.to_str())
                    .and_then(RdfFormat::from_extension)
                    .unwrap_or(RdfFormat::Turtle);
                parse(format, BufReader::new(File::open(path)?))?
            }
        };
        debug!(triples = schema.len(), "LaDeRR schema loaded");
        Ok(self.schema.get_or_init(|| schema))
    }
}

/// Returns the shape set shipped with this crate.
pub fn bundled_shapes() -> Result<Graph, ResourceError> {
    parse(RdfFormat::Turtle, BUNDLED_SHAPES.as_bytes()).map_err(ResourceError::BundledShapes)
}

/// Reads every Turtle file of `directory` into one shapes graph.
///
/// Files are visited in lexicographic order. Entries that are not files are ignored, files that
/// don't parse are logged and skipped as a whole.
pub fn load_shapes(directory: impl AsRef<Path>) -> Result<Graph, ResourceError> {
    let directory = directory.as_ref();
    if !directory.is_dir() {
        return Err(ResourceError::ShapesNotFound(directory.to_owned()));
    }
    let mut files = fs::read_dir(directory)?
        .map(|entry| entry.map(|entry| entry.path()))
        .collect::<Result<Vec<_>, _>>()?;
    files.sort();

    let mut shapes = Graph::new();
    for file in files.iter().filter(|file| file.is_file()) {
        match File::open(file)
            .map_err(RdfParseError::from)
            .and_then(|content| parse(RdfFormat::Turtle, BufReader::new(content)))
        {
            Ok(graph) => {
                debug!(path = %file.display(), triples = graph.len(), "Shape file loaded");
                shapes.extend(graph.iter());
            }
            Err(error) => warn!(
                path = %file.display(),
                %error,
                "Skipping shape file that could not be parsed"
            ),
        }
    }
    if shapes.is_empty() {
        return Err(ResourceError::EmptyShapeSet(directory.to_owned()));
    }
    Ok(shapes)
}

fn parse(format: RdfFormat, reader: impl Read) -> Result<Graph, RdfParseError> {
    let mut graph = Graph::new();
    for quad in RdfParser::from_format(format).for_reader(reader) {
        graph.insert(&Triple::from(quad?));
    }
    Ok(graph)
}
