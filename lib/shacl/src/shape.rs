//! Reading of a shapes graph into [`Shape`]s.

use crate::error::ShaclError;
use crate::graph::{object, objects, read_list};
use crate::path::Path;
use crate::report::Severity;
use laderr_model::vocab::{owl, rdf, rdfs, sh, xsd};
use laderr_model::{Graph, NamedNode, NamedNodeRef, Term, TermRef};
use regex::{Regex, RegexBuilder};
use std::collections::{HashMap, HashSet};

/// Index of a [`Shape`] inside its [`ShapesGraph`].
pub(crate) type ShapeRef = usize;

#[derive(Debug, Clone)]
pub(crate) enum Target {
    Class(Term),
    Node(Term),
    SubjectsOf(NamedNode),
    ObjectsOf(NamedNode),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NodeKind {
    Iri,
    BlankNode,
    Literal,
    BlankNodeOrIri,
    BlankNodeOrLiteral,
    IriOrLiteral,
}

impl NodeKind {
    fn from_node(node: NamedNodeRef<'_>) -> Option<Self> {
        [
            Self::Iri,
            Self::BlankNode,
            Self::Literal,
            Self::BlankNodeOrIri,
            Self::BlankNodeOrLiteral,
            Self::IriOrLiteral,
        ]
        .into_iter()
        .find(|kind| kind.node() == node)
    }

    pub(crate) fn node(self) -> NamedNodeRef<'static> {
        match self {
            Self::Iri => sh::IRI,
            Self::BlankNode => sh::BLANK_NODE,
            Self::Literal => sh::LITERAL,
            Self::BlankNodeOrIri => sh::BLANK_NODE_OR_IRI,
            Self::BlankNodeOrLiteral => sh::BLANK_NODE_OR_LITERAL,
            Self::IriOrLiteral => sh::IRI_OR_LITERAL,
        }
    }

    pub(crate) fn matches(self, term: TermRef<'_>) -> bool {
        let (iri, blank_node, literal) = match term {
            TermRef::NamedNode(_) => (true, false, false),
            TermRef::BlankNode(_) => (false, true, false),
            TermRef::Literal(_) => (false, false, true),
            #[allow(unreachable_patterns)]
            _ => (false, false, false),
        };
        match self {
            Self::Iri => iri,
            Self::BlankNode => blank_node,
            Self::Literal => literal,
            Self::BlankNodeOrIri => blank_node || iri,
            Self::BlankNodeOrLiteral => blank_node || literal,
            Self::IriOrLiteral => iri || literal,
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) enum Constraint {
    Class(Term),
    Datatype(NamedNode),
    NodeKind(NodeKind),
    MinCount(usize),
    MaxCount(usize),
    MinLength(usize),
    MaxLength(usize),
    Pattern { regex: Regex, source: String },
    In(Vec<Term>),
    HasValue(Term),
    Node(ShapeRef),
    Property(ShapeRef),
    Not(ShapeRef),
    And(Vec<ShapeRef>),
    Or(Vec<ShapeRef>),
    Xone(Vec<ShapeRef>),
    Closed { allowed: HashSet<NamedNode> },
}

impl Constraint {
    /// The local name of the SHACL constraint component, without the `ConstraintComponent`
    /// suffix.
    pub(crate) fn component(&self) -> &'static str {
        match self {
            Self::Class(_) => "Class",
            Self::Datatype(_) => "Datatype",
            Self::NodeKind(_) => "NodeKind",
            Self::MinCount(_) => "MinCount",
            Self::MaxCount(_) => "MaxCount",
            Self::MinLength(_) => "MinLength",
            Self::MaxLength(_) => "MaxLength",
            Self::Pattern { .. } => "Pattern",
            Self::In(_) => "In",
            Self::HasValue(_) => "HasValue",
            Self::Node(_) => "Node",
            Self::Property(_) => "Property",
            Self::Not(_) => "Not",
            Self::And(_) => "And",
            Self::Or(_) => "Or",
            Self::Xone(_) => "Xone",
            Self::Closed { .. } => "Closed",
        }
    }
}

#[derive(Debug)]
pub(crate) struct Shape {
    pub id: Term,
    /// Only property shapes have a path.
    pub path: Option<Path>,
    pub targets: Vec<Target>,
    pub constraints: Vec<Constraint>,
    pub severity: Severity,
    pub message: Option<String>,
    pub deactivated: bool,
}

impl Shape {
    fn placeholder(id: Term) -> Self {
        Self {
            id,
            path: None,
            targets: Vec::new(),
            constraints: Vec::new(),
            severity: Severity::Violation,
            message: None,
            deactivated: false,
        }
    }
}

/// All shapes of a shapes graph, including the ones only reachable through other shapes.
#[derive(Debug)]
pub(crate) struct ShapesGraph {
    shapes: Vec<Shape>,
}

impl ShapesGraph {
    pub(crate) fn parse(graph: &Graph) -> Result<Self, ShaclError> {
        let mut parser = ShapesParser {
            graph,
            shapes: Vec::new(),
            index: HashMap::new(),
        };
        for root in root_shapes(graph) {
            parser.shape(root.as_ref())?;
        }
        Ok(Self {
            shapes: parser.shapes,
        })
    }

    pub(crate) fn get(&self, shape: ShapeRef) -> &Shape {
        &self.shapes[shape]
    }

    /// Shapes with at least one target.
    pub(crate) fn targeted(&self) -> impl Iterator<Item = ShapeRef> + '_ {
        self.shapes
            .iter()
            .enumerate()
            .filter(|(_, shape)| !shape.targets.is_empty())
            .map(|(i, _)| i)
    }

    pub(crate) fn len(&self) -> usize {
        self.shapes.len()
    }
}

fn root_shapes(graph: &Graph) -> Vec<Term> {
    let mut seen = HashSet::new();
    let mut roots = Vec::new();
    let typed = [sh::NODE_SHAPE, sh::PROPERTY_SHAPE].into_iter().flat_map(|class| {
        graph
            .subjects_for_predicate_object(rdf::TYPE, class)
            .map(|subject| Term::from(subject.into_owned()))
    });
    let with_target = [
        sh::TARGET_CLASS,
        sh::TARGET_NODE,
        sh::TARGET_SUBJECTS_OF,
        sh::TARGET_OBJECTS_OF,
    ]
    .into_iter()
    .flat_map(|predicate| {
        graph
            .triples_for_predicate(predicate)
            .map(|triple| Term::from(triple.subject.into_owned()))
    });
    for shape in typed.chain(with_target) {
        if seen.insert(shape.clone()) {
            roots.push(shape);
        }
    }
    roots
}

struct ShapesParser<'a> {
    graph: &'a Graph,
    shapes: Vec<Shape>,
    index: HashMap<Term, ShapeRef>,
}

impl ShapesParser<'_> {
    fn shape(&mut self, node: TermRef<'_>) -> Result<ShapeRef, ShaclError> {
        if let Some(shape) = self.index.get(&node.into_owned()) {
            return Ok(*shape);
        }
        // Registered before parsing so that cyclic references resolve to the same index.
        let index = self.shapes.len();
        self.shapes.push(Shape::placeholder(node.into_owned()));
        self.index.insert(node.into_owned(), index);
        let shape = self.parse_shape(node)?;
        self.shapes[index] = shape;
        Ok(index)
    }

    fn parse_shape(&mut self, node: TermRef<'_>) -> Result<Shape, ShaclError> {
        let graph = self.graph;
        let path = object(graph, node, sh::PATH)
            .map(|path| Path::parse(graph, node, path))
            .transpose()?;
        let severity = match object(graph, node, sh::SEVERITY) {
            None => Severity::Violation,
            Some(TermRef::NamedNode(severity)) => Severity::from_node(severity),
            Some(other) => return Err(invalid(node, sh::SEVERITY, "an IRI", other)),
        };
        let message = objects(graph, node, sh::MESSAGE)
            .into_iter()
            .find_map(|message| match message {
                TermRef::Literal(literal) => Some(literal.value().to_owned()),
                _ => None,
            });
        Ok(Shape {
            id: node.into_owned(),
            path,
            targets: self.targets(node)?,
            constraints: self.constraints(node)?,
            severity,
            message,
            deactivated: self.boolean(node, sh::DEACTIVATED)?.unwrap_or(false),
        })
    }

    fn targets(&self, node: TermRef<'_>) -> Result<Vec<Target>, ShaclError> {
        let graph = self.graph;
        let mut targets = Vec::new();
        for class in objects(graph, node, sh::TARGET_CLASS) {
            targets.push(Target::Class(class.into_owned()));
        }
        for focus in objects(graph, node, sh::TARGET_NODE) {
            targets.push(Target::Node(focus.into_owned()));
        }
        for predicate in objects(graph, node, sh::TARGET_SUBJECTS_OF) {
            targets.push(Target::SubjectsOf(self.iri(node, sh::TARGET_SUBJECTS_OF, predicate)?));
        }
        for predicate in objects(graph, node, sh::TARGET_OBJECTS_OF) {
            targets.push(Target::ObjectsOf(self.iri(node, sh::TARGET_OBJECTS_OF, predicate)?));
        }
        // Implicit class target
        let is_class = objects(graph, node, rdf::TYPE)
            .into_iter()
            .any(|ty| ty == TermRef::from(rdfs::CLASS) || ty == TermRef::from(owl::CLASS));
        if is_class {
            targets.push(Target::Class(node.into_owned()));
        }
        Ok(targets)
    }

    fn constraints(&mut self, node: TermRef<'_>) -> Result<Vec<Constraint>, ShaclError> {
        let graph = self.graph;
        let mut constraints = Vec::new();

        for class in objects(graph, node, sh::CLASS) {
            constraints.push(Constraint::Class(class.into_owned()));
        }
        for datatype in objects(graph, node, sh::DATATYPE) {
            constraints.push(Constraint::Datatype(self.iri(node, sh::DATATYPE, datatype)?));
        }
        for kind in objects(graph, node, sh::NODE_KIND) {
            let kind = match kind {
                TermRef::NamedNode(kind) => NodeKind::from_node(kind),
                _ => None,
            }
            .ok_or_else(|| invalid(node, sh::NODE_KIND, "a SHACL node kind", kind))?;
            constraints.push(Constraint::NodeKind(kind));
        }
        if let Some(count) = self.count(node, sh::MIN_COUNT)? {
            constraints.push(Constraint::MinCount(count));
        }
        if let Some(count) = self.count(node, sh::MAX_COUNT)? {
            constraints.push(Constraint::MaxCount(count));
        }
        if let Some(length) = self.count(node, sh::MIN_LENGTH)? {
            constraints.push(Constraint::MinLength(length));
        }
        if let Some(length) = self.count(node, sh::MAX_LENGTH)? {
            constraints.push(Constraint::MaxLength(length));
        }
        if let Some(pattern) = object(graph, node, sh::PATTERN) {
            constraints.push(self.pattern(node, pattern)?);
        }
        if let Some(list) = object(graph, node, sh::IN) {
            constraints.push(Constraint::In(read_list(graph, list)?));
        }
        for value in objects(graph, node, sh::HAS_VALUE) {
            constraints.push(Constraint::HasValue(value.into_owned()));
        }
        for shape in objects(graph, node, sh::NODE) {
            constraints.push(Constraint::Node(self.shape(shape)?));
        }
        for shape in objects(graph, node, sh::PROPERTY) {
            if object(graph, shape, sh::PATH).is_none() {
                return Err(ShaclError::MissingPath(shape.into_owned()));
            }
            constraints.push(Constraint::Property(self.shape(shape)?));
        }
        for shape in objects(graph, node, sh::NOT) {
            constraints.push(Constraint::Not(self.shape(shape)?));
        }
        for list in objects(graph, node, sh::AND) {
            constraints.push(Constraint::And(self.shape_list(list)?));
        }
        for list in objects(graph, node, sh::OR) {
            constraints.push(Constraint::Or(self.shape_list(list)?));
        }
        for list in objects(graph, node, sh::XONE) {
            constraints.push(Constraint::Xone(self.shape_list(list)?));
        }
        if self.boolean(node, sh::CLOSED)? == Some(true) {
            constraints.push(self.closed(node)?);
        }

        Ok(constraints)
    }

    fn shape_list(&mut self, list: TermRef<'_>) -> Result<Vec<ShapeRef>, ShaclError> {
        read_list(self.graph, list)?
            .iter()
            .map(|member| self.shape(member.as_ref()))
            .collect()
    }

    fn closed(&self, node: TermRef<'_>) -> Result<Constraint, ShaclError> {
        let graph = self.graph;
        let mut allowed = HashSet::new();
        for property in objects(graph, node, sh::PROPERTY) {
            if let Some(TermRef::NamedNode(predicate)) = object(graph, property, sh::PATH) {
                allowed.insert(predicate.into_owned());
            }
        }
        if let Some(list) = object(graph, node, sh::IGNORED_PROPERTIES) {
            for ignored in read_list(graph, list)? {
                allowed.insert(self.iri(node, sh::IGNORED_PROPERTIES, ignored.as_ref())?);
            }
        }
        Ok(Constraint::Closed { allowed })
    }

    fn pattern(&self, node: TermRef<'_>, pattern: TermRef<'_>) -> Result<Constraint, ShaclError> {
        let TermRef::Literal(pattern) = pattern else {
            return Err(invalid(node, sh::PATTERN, "a string literal", pattern));
        };
        let flags = match object(self.graph, node, sh::FLAGS) {
            Some(TermRef::Literal(flags)) => flags.value().to_owned(),
            Some(other) => return Err(invalid(node, sh::FLAGS, "a string literal", other)),
            None => String::new(),
        };
        let source = pattern.value().to_owned();
        let expression = if flags.contains('q') {
            regex::escape(&source)
        } else {
            source.clone()
        };
        let regex = RegexBuilder::new(&expression)
            .case_insensitive(flags.contains('i'))
            .multi_line(flags.contains('m'))
            .dot_matches_new_line(flags.contains('s'))
            .ignore_whitespace(flags.contains('x'))
            .build()
            .map_err(|error| ShaclError::InvalidPattern {
                shape: node.into_owned(),
                pattern: source.clone(),
                error,
            })?;
        Ok(Constraint::Pattern { regex, source })
    }

    fn count(&self, node: TermRef<'_>, parameter: NamedNodeRef<'_>) -> Result<Option<usize>, ShaclError> {
        let Some(value) = object(self.graph, node, parameter) else {
            return Ok(None);
        };
        match value {
            TermRef::Literal(literal) => literal.value().trim().parse().map(Some).ok(),
            _ => None,
        }
        .ok_or_else(|| invalid(node, parameter, "a non-negative integer", value))
    }

    fn boolean(&self, node: TermRef<'_>, parameter: NamedNodeRef<'_>) -> Result<Option<bool>, ShaclError> {
        let Some(value) = object(self.graph, node, parameter) else {
            return Ok(None);
        };
        match value {
            TermRef::Literal(literal) if literal.datatype() == xsd::BOOLEAN => {
                match literal.value() {
                    "true" | "1" => Some(Some(true)),
                    "false" | "0" => Some(Some(false)),
                    _ => None,
                }
            }
            _ => None,
        }
        .ok_or_else(|| invalid(node, parameter, "a boolean", value))
    }

    fn iri(
        &self,
        node: TermRef<'_>,
        parameter: NamedNodeRef<'_>,
        value: TermRef<'_>,
    ) -> Result<NamedNode, ShaclError> {
        match value {
            TermRef::NamedNode(iri) => Ok(iri.into_owned()),
            _ => Err(invalid(node, parameter, "an IRI", value)),
        }
    }
}

fn invalid(
    shape: TermRef<'_>,
    parameter: NamedNodeRef<'_>,
    expected: &'static str,
    found: TermRef<'_>,
) -> ShaclError {
    ShaclError::InvalidParameter {
        shape: shape.into_owned(),
        parameter: parameter.into_owned(),
        expected,
        found: found.into_owned(),
    }
}
