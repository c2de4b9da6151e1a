use laderr_model::IriParseError;
use laderr_shacl::ShaclError;
use oxrdfio::RdfParseError;
use std::io;
use std::path::PathBuf;

/// An error raised while reading a LaDeRR document.
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    /// The path does not resolve to a readable file.
    #[error("The LaDeRR document '{}' does not exist or is not a file", .0.display())]
    NotFound(PathBuf),
    /// The document is not valid TOML.
    #[error("Syntactical error, the LaDeRR document is not valid TOML: {0}")]
    Syntax(#[from] toml::de::Error),
    /// An error raised while reading the file.
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl From<DocumentError> for io::Error {
    #[inline]
    fn from(error: DocumentError) -> Self {
        match error {
            DocumentError::Io(error) => error,
            DocumentError::NotFound(_) => Self::new(io::ErrorKind::NotFound, error.to_string()),
            DocumentError::Syntax(_) => Self::new(io::ErrorKind::InvalidData, error.to_string()),
        }
    }
}

/// A document entry that doesn't have the shape a LaDeRR document requires, e.g. a data section
/// instance that is not a table.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error(
    "Invalid LaDeRR structure at '{}': {expected} expected, {found} found",
    self.location()
)]
pub struct StructureError {
    /// The top-level key the entry belongs to.
    pub section: String,
    /// The instance key inside the section, if the error is inside an instance.
    pub instance: Option<String>,
    /// The property of the instance, if the error is inside a property value.
    pub property: Option<String>,
    /// What was expected at this location.
    pub expected: &'static str,
    /// The kind of value found instead.
    pub found: &'static str,
}

impl StructureError {
    /// The dotted location of the offending entry, e.g. `Widget.W1.label`.
    pub fn location(&self) -> String {
        [
            Some(self.section.as_str()),
            self.instance.as_deref(),
            self.property.as_deref(),
        ]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(".")
    }
}

/// An error raised while mapping a document to RDF.
#[derive(Debug, thiserror::Error)]
pub enum GraphBuildError {
    #[error(transparent)]
    Structure(#[from] StructureError),
    /// An instance id, a property name or a class name does not form a valid IRI.
    #[error("Invalid IRI '{iri}': {error}")]
    InvalidIri {
        /// The IRI itself.
        iri: String,
        /// The parsing error.
        #[source]
        error: IriParseError,
    },
}

/// An error raised while loading the schema or the shape set.
#[derive(Debug, thiserror::Error)]
pub enum ResourceError {
    #[error("The LaDeRR schema '{}' does not exist", .0.display())]
    SchemaNotFound(PathBuf),
    #[error("The shapes directory '{}' does not exist", .0.display())]
    ShapesNotFound(PathBuf),
    /// The schema is not a valid RDF file.
    #[error("Failed to parse the LaDeRR schema: {0}")]
    SchemaLoad(#[from] RdfParseError),
    /// The bundled shape set is not valid Turtle.
    #[error("Failed to parse the bundled LaDeRR shapes: {0}")]
    BundledShapes(#[source] RdfParseError),
    /// None of the files of the shapes directory contained a single triple.
    #[error("No shapes could be loaded from '{}'", .0.display())]
    EmptyShapeSet(PathBuf),
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// An error raised while writing a graph.
#[derive(Debug, thiserror::Error)]
pub enum SerializerError {
    /// An error raised while writing the content.
    #[error(transparent)]
    Io(#[from] io::Error),
    /// The requested serialization format is not known.
    #[error("The serialization format '{0}' is not supported")]
    UnsupportedFormat(String),
    /// A namespace can't be declared as a prefix.
    #[error("Invalid prefix namespace '{namespace}': {error}")]
    InvalidPrefix {
        /// The namespace IRI.
        namespace: String,
        /// The parsing error.
        #[source]
        error: IriParseError,
    },
}

impl From<SerializerError> for io::Error {
    #[inline]
    fn from(error: SerializerError) -> Self {
        match error {
            SerializerError::Io(error) => error,
            SerializerError::UnsupportedFormat(_) | SerializerError::InvalidPrefix { .. } => {
                Self::new(io::ErrorKind::InvalidInput, error.to_string())
            }
        }
    }
}

/// An error raised while reading a LaDeRR configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("Invalid LaDeRR configuration: {0}")]
    Syntax(#[from] toml::de::Error),
}

/// Any error that aborts a LaDeRR pipeline run.
///
/// A specification that doesn't conform to its shapes is not an error.
#[derive(Debug, thiserror::Error)]
pub enum LaderrError {
    #[error(transparent)]
    Document(#[from] DocumentError),
    #[error(transparent)]
    GraphBuild(#[from] GraphBuildError),
    #[error(transparent)]
    Resource(#[from] ResourceError),
    #[error(transparent)]
    Shacl(#[from] ShaclError),
    #[error(transparent)]
    Serializer(#[from] SerializerError),
}

impl From<StructureError> for LaderrError {
    #[inline]
    fn from(error: StructureError) -> Self {
        Self::GraphBuild(error.into())
    }
}

impl LaderrError {
    /// Returns the [`StructureError`] that caused this error, if any.
    pub fn as_structure_error(&self) -> Option<&StructureError> {
        match self {
            Self::GraphBuild(GraphBuildError::Structure(error)) => Some(error),
            _ => None,
        }
    }
}
