use crate::error::{ConfigError, SerializerError};
use crate::io::{format_for_path, parse_format};
use crate::resources::SchemaSource;
use laderr_shacl::{Inference, ValidationOptions};
use oxrdfio::RdfFormat;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Settings of a [`Pipeline`](crate::Pipeline).
///
/// Can be read from a TOML file, all keys are optional:
///
/// ```
/// use laderr::LaderrConfig;
/// use laderr::shacl::Inference;
///
/// let config: LaderrConfig = r#"
///     shapes_dir = "shapes"
///     output_path = "out/spec.nt"
///     inference = "rdfs"
///     allow_warnings = false
/// "#
/// .parse()?;
/// assert_eq!(config.inference, Inference::Rdfs);
/// assert!(config.allow_infos);
/// # Result::<_, laderr::ConfigError>::Ok(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LaderrConfig {
    /// The schema graph file, the bundled schema if unset.
    pub schema_path: Option<PathBuf>,
    /// The directory holding the shape files, the bundled shapes if unset.
    pub shapes_dir: Option<PathBuf>,
    /// Where the specification graph is written.
    pub output_path: PathBuf,
    /// The serialization format of the output, guessed from `output_path` if unset.
    pub output_format: Option<String>,
    pub inference: Inference,
    /// Whether `sh:Warning` results still conform.
    pub allow_warnings: bool,
    /// Whether `sh:Info` results still conform.
    pub allow_infos: bool,
}

impl Default for LaderrConfig {
    fn default() -> Self {
        Self {
            schema_path: None,
            shapes_dir: None,
            output_path: PathBuf::from("results/result.ttl"),
            output_format: None,
            inference: Inference::Both,
            allow_warnings: true,
            allow_infos: true,
        }
    }
}

impl LaderrConfig {
    /// Reads a configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Ok(fs::read_to_string(path)?.parse()?)
    }

    pub fn validation_options(&self) -> ValidationOptions {
        ValidationOptions::default()
            .with_inference(self.inference)
            .allow_warnings(self.allow_warnings)
            .allow_infos(self.allow_infos)
    }

    pub fn schema_source(&self) -> SchemaSource {
        self.schema_path
            .clone()
            .map_or(SchemaSource::Bundled, SchemaSource::File)
    }

    /// The serialization format of the output graph.
    pub fn output_format(&self) -> Result<RdfFormat, SerializerError> {
        match &self.output_format {
            Some(name) => parse_format(name),
            None => Ok(format_for_path(&self.output_path)),
        }
    }
}

impl FromStr for LaderrConfig {
    type Err = ConfigError;

    fn from_str(config: &str) -> Result<Self, Self::Err> {
        Ok(toml::from_str(config)?)
    }
}
