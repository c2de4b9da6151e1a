//! Resolution of the namespace the nodes of a document are minted in.

use laderr_model::Iri;
use std::fmt;
use toml::{Table, Value};
use tracing::warn;

/// The metadata key holding the base URI.
pub const BASE_URI: &str = "baseUri";
/// The namespace used when a document has no usable base URI.
pub const DEFAULT_BASE_URI: &str = "https://laderr.laderr#";

/// Why the [default base URI](DEFAULT_BASE_URI) was used instead of the document's.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fallback {
    /// The document has no `baseUri`.
    Absent,
    /// `baseUri` is not a string.
    NotAString(&'static str),
    /// `baseUri` is not an absolute URI with a scheme and an authority.
    Invalid(String),
}

impl fmt::Display for Fallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Absent => f.write_str("no base URI provided"),
            Self::NotAString(kind) => write!(f, "the base URI is {kind}, not a string"),
            Self::Invalid(uri) => write!(f, "invalid base URI '{uri}' provided"),
        }
    }
}

/// The resolved base namespace of a document.
///
/// Local names are appended verbatim, no separator is inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseUri {
    namespace: String,
    fallback: Option<Fallback>,
}

impl BaseUri {
    /// Resolves the base URI from the `baseUri` metadata entry.
    ///
    /// Never fails: an absent or invalid value is logged and replaced by [`DEFAULT_BASE_URI`].
    pub fn resolve(metadata: &Table) -> Self {
        let candidate = match metadata.get(BASE_URI) {
            None => Err(Fallback::Absent),
            Some(Value::String(uri)) if is_valid(uri) => Ok(uri.clone()),
            Some(Value::String(uri)) => Err(Fallback::Invalid(uri.clone())),
            Some(other) => Err(Fallback::NotAString(crate::mapping::kind(other))),
        };
        match candidate {
            Ok(namespace) => Self {
                namespace,
                fallback: None,
            },
            Err(fallback) => {
                warn!(
                    reason = %fallback,
                    "Using the default base URI '{DEFAULT_BASE_URI}'"
                );
                Self {
                    namespace: DEFAULT_BASE_URI.to_owned(),
                    fallback: Some(fallback),
                }
            }
        }
    }

    pub fn as_str(&self) -> &str {
        &self.namespace
    }

    /// The reason the default was used, [`None`] if the document's base URI was valid.
    pub fn fallback(&self) -> Option<&Fallback> {
        self.fallback.as_ref()
    }

    /// Appends `local` to the namespace.
    pub fn join(&self, local: &str) -> String {
        format!("{}{local}", self.namespace)
    }
}

impl Default for BaseUri {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_BASE_URI.to_owned(),
            fallback: Some(Fallback::Absent),
        }
    }
}

impl fmt::Display for BaseUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.namespace)
    }
}

/// A base URI needs a non-empty scheme and a non-empty authority.
fn is_valid(uri: &str) -> bool {
    Iri::parse(uri).is_ok_and(|iri| {
        !iri.scheme().is_empty() && iri.authority().is_some_and(|authority| !authority.is_empty())
    })
}
