//! The Validation Orchestrator.

use crate::base_uri::BaseUri;
use crate::config::LaderrConfig;
use crate::document::Document;
use crate::error::LaderrError;
use crate::io::save_graph;
use crate::mapping::{build_data_graph, build_metadata_graph};
use crate::report::report_validation_result;
use crate::resources::{bundled_shapes, load_shapes, SchemaLoader};
use laderr_model::{union, Graph};
use laderr_shacl::{CoreValidator, ShapeValidator, ValidationReport};
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// The RDF graph of a LaDeRR document.
#[derive(Debug, Clone)]
pub struct SpecificationGraph {
    /// The union of the metadata and the data graphs.
    pub graph: Graph,
    /// The namespace the document's nodes are minted in.
    pub base: BaseUri,
}

/// The outcome of a validation run.
#[derive(Debug, Clone)]
pub struct Validation {
    pub specification: SpecificationGraph,
    pub report: ValidationReport,
    /// Where the specification graph has been written.
    pub output_path: PathBuf,
}

impl Validation {
    pub fn conforms(&self) -> bool {
        self.report.conforms()
    }
}

/// Reads LaDeRR documents, maps them to RDF and validates them.
///
/// The schema is loaded once per pipeline, documents and shapes are read again on each run.
#[derive(Debug)]
pub struct Pipeline<V = CoreValidator> {
    config: LaderrConfig,
    schema: SchemaLoader,
    validator: V,
}

impl Pipeline {
    pub fn new(config: LaderrConfig) -> Self {
        Self::with_validator(config, CoreValidator::new())
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(LaderrConfig::default())
    }
}

impl<V: ShapeValidator> Pipeline<V> {
    /// Builds a pipeline validating with another [`ShapeValidator`].
    pub fn with_validator(config: LaderrConfig, validator: V) -> Self {
        Self {
            schema: SchemaLoader::new(config.schema_source()),
            config,
            validator,
        }
    }

    pub fn config(&self) -> &LaderrConfig {
        &self.config
    }

    /// Reads the document at `path` and maps it to RDF without validating it.
    pub fn build_graph(&self, path: impl AsRef<Path>) -> Result<SpecificationGraph, LaderrError> {
        let path = path.as_ref();
        Self::read_and_map(path).inspect_err(|e| log_failure(path, e))
    }

    /// Validates the document at `path` and writes its graph to the configured output.
    ///
    /// A non-conforming document is not an error: its graph is written all the same and
    /// [`Validation::conforms`] is `false`.
    pub fn run(&self, path: impl AsRef<Path>) -> Result<Validation, LaderrError> {
        let path = path.as_ref();
        self.try_run(path).inspect_err(|e| log_failure(path, e))
    }

    /// Same as [`run`](Self::run), only returning the conformance.
    pub fn validate(&self, path: impl AsRef<Path>) -> Result<bool, LaderrError> {
        Ok(self.run(path)?.conforms())
    }

    fn try_run(&self, path: &Path) -> Result<Validation, LaderrError> {
        let format = self.config.output_format()?;
        let specification = Self::read_and_map(path)?;

        let schema = self.schema.load()?;
        let shapes = match &self.config.shapes_dir {
            Some(directory) => load_shapes(directory)?,
            None => bundled_shapes()?,
        };
        let validation_graph = union([&specification.graph, schema]);
        let report =
            self.validator
                .validate(&validation_graph, &shapes, &self.config.validation_options())?;
        report_validation_result(path, &report);

        let output_path = self.config.output_path.clone();
        save_graph(&specification.graph, &specification.base, format, &output_path)?;
        info!(
            path = %output_path.display(),
            triples = specification.graph.len(),
            "LaDeRR graph saved"
        );
        Ok(Validation {
            specification,
            report,
            output_path,
        })
    }

    fn read_and_map(path: &Path) -> Result<SpecificationGraph, LaderrError> {
        let document = Document::read(path)?;
        let base = BaseUri::resolve(&document.metadata);
        let metadata = build_metadata_graph(&document.metadata, &base)?;
        let data = build_data_graph(&document.sections, &base)?;
        Ok(SpecificationGraph {
            graph: union([&metadata, &data]),
            base,
        })
    }
}

fn log_failure(path: &Path, error: &LaderrError) {
    error!(path = %path.display(), %error, "LaDeRR pipeline failed");
}
