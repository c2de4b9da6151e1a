use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// The entailment applied to the data graph before it is validated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Inference {
    /// Validate the data graph as is.
    #[default]
    None,
    /// RDFS entailment: `rdfs:subClassOf`, `rdfs:subPropertyOf`, `rdfs:domain` and `rdfs:range`.
    Rdfs,
    /// The RDFS rules plus the OWL-RL rules for equivalent classes and properties, inverse,
    /// symmetric and transitive properties.
    #[serde(alias = "owl-rl")]
    OwlRl,
    /// Both RDFS and OWL-RL entailment.
    Both,
}

impl Inference {
    pub fn includes_rdfs(self) -> bool {
        !matches!(self, Self::None)
    }

    pub fn includes_owl_rl(self) -> bool {
        matches!(self, Self::OwlRl | Self::Both)
    }
}

impl fmt::Display for Inference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::None => "none",
            Self::Rdfs => "rdfs",
            Self::OwlRl => "owlrl",
            Self::Both => "both",
        })
    }
}

/// The inference mode name is unknown.
#[derive(Debug, Clone, thiserror::Error)]
#[error("Unknown inference mode '{0}', expected one of none, rdfs, owlrl or both")]
pub struct ParseInferenceError(String);

impl FromStr for Inference {
    type Err = ParseInferenceError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name.to_ascii_lowercase().as_str() {
            "none" => Ok(Self::None),
            "rdfs" => Ok(Self::Rdfs),
            "owlrl" | "owl-rl" => Ok(Self::OwlRl),
            "both" => Ok(Self::Both),
            _ => Err(ParseInferenceError(name.to_owned())),
        }
    }
}

/// Options of a validation run.
///
/// The defaults follow the SHACL recommendation: no inference, and any result, whatever its
/// severity, makes the data graph non-conforming.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidationOptions {
    inference: Inference,
    allow_warnings: bool,
    allow_infos: bool,
}

impl ValidationOptions {
    #[must_use]
    pub fn with_inference(mut self, inference: Inference) -> Self {
        self.inference = inference;
        self
    }

    /// Results with `sh:Warning` severity no longer make the data graph non-conforming.
    #[must_use]
    pub fn allow_warnings(mut self, allow: bool) -> Self {
        self.allow_warnings = allow;
        self
    }

    /// Results with `sh:Info` severity no longer make the data graph non-conforming.
    #[must_use]
    pub fn allow_infos(mut self, allow: bool) -> Self {
        self.allow_infos = allow;
        self
    }

    pub fn inference(&self) -> Inference {
        self.inference
    }

    pub fn warnings_allowed(&self) -> bool {
        self.allow_warnings
    }

    pub fn infos_allowed(&self) -> bool {
        self.allow_infos
    }
}
