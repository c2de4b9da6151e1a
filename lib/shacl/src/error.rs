use laderr_model::{NamedNode, Term};

/// An error raised while reading a shapes graph.
///
/// A non-conforming data graph is never an error; it is reported through
/// [`ValidationReport::conforms`](crate::ValidationReport::conforms).
#[derive(Debug, thiserror::Error)]
pub enum ShaclError {
    /// A shape parameter has a value of the wrong kind.
    #[error("The value {found} of {parameter} on shape {shape} is invalid, {expected} was expected")]
    InvalidParameter {
        /// The shape carrying the parameter.
        shape: Term,
        /// The parameter predicate.
        parameter: NamedNode,
        /// A description of the expected value.
        expected: &'static str,
        /// The offending value.
        found: Term,
    },
    /// A `sh:pattern` is not a valid regular expression.
    #[error("Invalid pattern '{pattern}' on shape {shape}: {error}")]
    InvalidPattern {
        /// The shape carrying the pattern.
        shape: Term,
        /// The pattern itself.
        pattern: String,
        /// The regex compilation error.
        #[source]
        error: regex::Error,
    },
    /// A property shape has no `sh:path`.
    #[error("The property shape {0} has no sh:path")]
    MissingPath(Term),
    /// A `sh:path` value is not a SHACL property path.
    #[error("Unsupported property path {path} on shape {shape}")]
    UnsupportedPath {
        /// The shape carrying the path.
        shape: Term,
        /// The path node.
        path: Term,
    },
    /// An RDF collection is not terminated by `rdf:nil` or has missing links.
    #[error("Malformed RDF list starting at {0}")]
    MalformedList(Term),
    /// Shape references are nested too deeply, most likely because of a cycle.
    #[error("Shape {0} is nested too deeply, shapes must not reference themselves")]
    RecursionLimit(Term),
}
