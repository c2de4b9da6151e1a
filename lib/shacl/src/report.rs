use crate::options::ValidationOptions;
use crate::path::Path;
use laderr_model::vocab::{rdf, sh, xsd};
use laderr_model::{BlankNode, Graph, Literal, NamedNode, NamedNodeRef, Term, Triple};
use std::fmt;

/// The severity of a [`ValidationResult`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Violation,
    Warning,
    Info,
}

impl Severity {
    /// Maps a `sh:severity` value to a [`Severity`].
    ///
    /// SHACL allows custom severities; they are treated as violations.
    pub fn from_node(node: NamedNodeRef<'_>) -> Self {
        if node == sh::WARNING {
            Self::Warning
        } else if node == sh::INFO {
            Self::Info
        } else {
            Self::Violation
        }
    }

    pub fn node(self) -> NamedNodeRef<'static> {
        match self {
            Self::Violation => sh::VIOLATION,
            Self::Warning => sh::WARNING,
            Self::Info => sh::INFO,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Violation => "sh:Violation",
            Self::Warning => "sh:Warning",
            Self::Info => "sh:Info",
        })
    }
}

/// A single constraint failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    pub focus_node: Term,
    pub result_path: Option<Path>,
    pub value: Option<Term>,
    pub source_shape: Term,
    pub source_constraint_component: NamedNode,
    pub severity: Severity,
    pub message: String,
}

impl ValidationResult {
    /// The local name of the constraint component, e.g. `MinCountConstraintComponent`.
    pub fn component_name(&self) -> &str {
        self.source_constraint_component
            .as_str()
            .strip_prefix(sh::NAMESPACE)
            .unwrap_or(self.source_constraint_component.as_str())
    }
}

/// The outcome of validating a data graph against a shapes graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    conforms: bool,
    results: Vec<ValidationResult>,
}

impl ValidationReport {
    /// Builds a report, deciding conformance from the result severities the options tolerate.
    pub fn new(results: Vec<ValidationResult>, options: &ValidationOptions) -> Self {
        let conforms = results.iter().all(|result| match result.severity {
            Severity::Violation => false,
            Severity::Warning => options.warnings_allowed(),
            Severity::Info => options.infos_allowed(),
        });
        Self { conforms, results }
    }

    pub fn conforms(&self) -> bool {
        self.conforms
    }

    pub fn results(&self) -> &[ValidationResult] {
        &self.results
    }

    /// Returns the report as a `sh:ValidationReport` graph.
    pub fn to_graph(&self) -> Graph {
        let mut graph = Graph::new();
        let report = BlankNode::default();
        graph.insert(&Triple::new(report.clone(), rdf::TYPE, sh::VALIDATION_REPORT));
        graph.insert(&Triple::new(
            report.clone(),
            sh::CONFORMS,
            Literal::new_typed_literal(self.conforms.to_string(), xsd::BOOLEAN),
        ));
        for result in &self.results {
            let node = BlankNode::default();
            graph.insert(&Triple::new(report.clone(), sh::RESULT, node.clone()));
            graph.insert(&Triple::new(node.clone(), rdf::TYPE, sh::VALIDATION_RESULT));
            graph.insert(&Triple::new(
                node.clone(),
                sh::FOCUS_NODE,
                result.focus_node.clone(),
            ));
            if let Some(path) = &result.result_path {
                let path = path.write(&mut graph);
                graph.insert(&Triple::new(node.clone(), sh::RESULT_PATH, path));
            }
            if let Some(value) = &result.value {
                graph.insert(&Triple::new(node.clone(), sh::VALUE, value.clone()));
            }
            graph.insert(&Triple::new(
                node.clone(),
                sh::SOURCE_SHAPE,
                result.source_shape.clone(),
            ));
            graph.insert(&Triple::new(
                node.clone(),
                sh::SOURCE_CONSTRAINT_COMPONENT,
                result.source_constraint_component.clone(),
            ));
            graph.insert(&Triple::new(
                node.clone(),
                sh::RESULT_SEVERITY,
                result.severity.node(),
            ));
            graph.insert(&Triple::new(
                node,
                sh::RESULT_MESSAGE,
                Literal::new_simple_literal(&result.message),
            ));
        }
        graph
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Validation Report")?;
        writeln!(f, "Conforms: {}", if self.conforms { "True" } else { "False" })?;
        if self.results.is_empty() {
            return Ok(());
        }
        writeln!(f, "Results ({}):", self.results.len())?;
        for result in &self.results {
            let kind = match result.severity {
                Severity::Violation => "Violation",
                Severity::Warning => "Warning",
                Severity::Info => "Info",
            };
            writeln!(
                f,
                "Constraint {kind} in {} ({}):",
                result.component_name(),
                result.source_constraint_component.as_str()
            )?;
            writeln!(f, "\tSeverity: {}", result.severity)?;
            writeln!(f, "\tSource Shape: {}", result.source_shape)?;
            writeln!(f, "\tFocus Node: {}", result.focus_node)?;
            if let Some(value) = &result.value {
                writeln!(f, "\tValue Node: {value}")?;
            }
            if let Some(path) = &result.result_path {
                writeln!(f, "\tResult Path: {path}")?;
            }
            writeln!(f, "\tMessage: {}", result.message)?;
        }
        Ok(())
    }
}
