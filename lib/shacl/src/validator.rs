use crate::error::ShaclError;
use crate::graph::{instances_of, is_instance_of};
use crate::inference;
use crate::options::ValidationOptions;
use crate::path::Path;
use crate::report::{ValidationReport, ValidationResult};
use crate::shape::{Constraint, Shape, ShapeRef, ShapesGraph, Target};
use laderr_model::vocab::{rdf, sh, xsd};
use laderr_model::{term_as_subject, Graph, LiteralRef, NamedNode, NamedNodeRef, Term, TermRef};
use oxsdatatypes::{
    Boolean, Date, DateTime, Decimal, Double, Duration, Float, GDay, GMonth, GMonthDay, GYear,
    GYearMonth, Integer, Time,
};
use std::collections::HashSet;
use std::str::FromStr;
use tracing::debug;

/// Shapes may reference each other through `sh:node`, `sh:property` and the logical
/// constraints. Deeper nesting than this is treated as a cycle.
const MAX_DEPTH: usize = 64;

/// Validates a data graph against a shapes graph.
pub trait ShapeValidator {
    /// Validates `data` against the shapes in `shapes`.
    ///
    /// Returns an error only if the shapes graph itself can't be interpreted.
    fn validate(
        &self,
        data: &Graph,
        shapes: &Graph,
        options: &ValidationOptions,
    ) -> Result<ValidationReport, ShaclError>;
}

/// A [`ShapeValidator`] implementing SHACL Core.
///
/// The data graph is expanded with the inference rules selected in the [`ValidationOptions`]
/// before any shape is evaluated.
#[derive(Debug, Default, Clone, Copy)]
pub struct CoreValidator;

impl CoreValidator {
    pub fn new() -> Self {
        Self
    }
}

impl ShapeValidator for CoreValidator {
    fn validate(
        &self,
        data: &Graph,
        shapes: &Graph,
        options: &ValidationOptions,
    ) -> Result<ValidationReport, ShaclError> {
        let shapes = ShapesGraph::parse(shapes)?;
        let data = inference::expand(data, options.inference());
        let engine = Engine {
            data: data.as_ref(),
            shapes: &shapes,
        };

        let mut results = Vec::new();
        for shape in shapes.targeted() {
            if shapes.get(shape).deactivated {
                continue;
            }
            for focus in engine.focus_nodes(shapes.get(shape)) {
                engine.validate_shape(shape, &focus, 0, &mut results)?;
            }
        }
        debug!(
            shapes = shapes.len(),
            triples = data.len(),
            results = results.len(),
            "SHACL validation finished"
        );
        Ok(ValidationReport::new(results, options))
    }
}

struct Engine<'a> {
    data: &'a Graph,
    shapes: &'a ShapesGraph,
}

impl Engine<'_> {
    fn focus_nodes(&self, shape: &Shape) -> Vec<Term> {
        let mut seen = HashSet::new();
        let mut nodes = Vec::new();
        for target in &shape.targets {
            let candidates: Vec<Term> = match target {
                Target::Class(class) => instances_of(self.data, class.as_ref()),
                Target::Node(node) => vec![node.clone()],
                Target::SubjectsOf(predicate) => self
                    .data
                    .triples_for_predicate(predicate)
                    .map(|triple| triple.subject.into_owned().into())
                    .collect(),
                Target::ObjectsOf(predicate) => self
                    .data
                    .triples_for_predicate(predicate)
                    .map(|triple| triple.object.into_owned())
                    .collect(),
            };
            for node in candidates {
                if seen.insert(node.clone()) {
                    nodes.push(node);
                }
            }
        }
        nodes
    }

    fn validate_shape(
        &self,
        shape: ShapeRef,
        focus: &Term,
        depth: usize,
        results: &mut Vec<ValidationResult>,
    ) -> Result<(), ShaclError> {
        let shape = self.shapes.get(shape);
        if depth > MAX_DEPTH {
            return Err(ShaclError::RecursionLimit(shape.id.clone()));
        }
        if shape.deactivated {
            return Ok(());
        }
        let values = match &shape.path {
            Some(path) => path.values(self.data, focus),
            None => vec![focus.clone()],
        };
        for constraint in &shape.constraints {
            self.evaluate(shape, constraint, focus, &values, depth, results)?;
        }
        Ok(())
    }

    fn conforms(&self, shape: ShapeRef, node: &Term, depth: usize) -> Result<bool, ShaclError> {
        let mut results = Vec::new();
        self.validate_shape(shape, node, depth + 1, &mut results)?;
        Ok(results.is_empty())
    }

    fn evaluate(
        &self,
        shape: &Shape,
        constraint: &Constraint,
        focus: &Term,
        values: &[Term],
        depth: usize,
        results: &mut Vec<ValidationResult>,
    ) -> Result<(), ShaclError> {
        let report = |value: Option<&Term>, message: String| ValidationResult {
            focus_node: focus.clone(),
            result_path: shape.path.clone(),
            value: value.cloned(),
            source_shape: shape.id.clone(),
            source_constraint_component: component(constraint),
            severity: shape.severity,
            message: shape.message.clone().unwrap_or(message),
        };
        let path = shape
            .path
            .as_ref()
            .map_or_else(String::new, |path| format!("->{path}"));

        match constraint {
            Constraint::MinCount(min) => {
                if values.len() < *min {
                    results.push(report(None, format!("Less than {min} values on {focus}{path}")));
                }
            }
            Constraint::MaxCount(max) => {
                if values.len() > *max {
                    results.push(report(None, format!("More than {max} values on {focus}{path}")));
                }
            }
            Constraint::HasValue(expected) => {
                if !values.contains(expected) {
                    results.push(report(
                        None,
                        format!("Node {focus}{path} does not contain Value {expected}"),
                    ));
                }
            }
            Constraint::Property(property) => {
                for value in values {
                    self.validate_shape(*property, value, depth + 1, results)?;
                }
            }
            Constraint::Closed { allowed } => {
                for value in values {
                    let Some(subject) = term_as_subject(value.as_ref()) else {
                        continue;
                    };
                    for triple in self.data.triples_for_subject(subject) {
                        if allowed.contains(&triple.predicate.into_owned()) {
                            continue;
                        }
                        let object = triple.object.into_owned();
                        results.push(ValidationResult {
                            result_path: Some(Path::Predicate(triple.predicate.into_owned())),
                            ..report(
                                Some(&object),
                                format!("Node {value} is closed. It cannot have value: {object}"),
                            )
                        });
                    }
                }
            }
            _ => {
                for value in values {
                    if let Some(message) = self.check_value(constraint, value, depth)? {
                        results.push(report(Some(value), message));
                    }
                }
            }
        }
        Ok(())
    }

    /// Evaluates a constraint that looks at each value node on its own.
    ///
    /// Returns the default message of the result if `value` doesn't satisfy the constraint.
    fn check_value(
        &self,
        constraint: &Constraint,
        value: &Term,
        depth: usize,
    ) -> Result<Option<String>, ShaclError> {
        let failure = match constraint {
            Constraint::Class(class) => (!is_instance_of(self.data, value.as_ref(), class.as_ref()))
                .then(|| format!("Value does not have class {class}")),
            Constraint::Datatype(datatype) => (!has_datatype(value.as_ref(), datatype.as_ref()))
                .then(|| format!("Value is not Literal with datatype {datatype}")),
            Constraint::NodeKind(kind) => (!kind.matches(value.as_ref()))
                .then(|| format!("Value is not of Node Kind {}", kind.node())),
            Constraint::MinLength(min) => (!lexical_form(value).is_some_and(|s| s.chars().count() >= *min))
                .then(|| format!("String length not >= {min}")),
            Constraint::MaxLength(max) => (!lexical_form(value).is_some_and(|s| s.chars().count() <= *max))
                .then(|| format!("String length not <= {max}")),
            Constraint::Pattern { regex, source } => (!lexical_form(value).is_some_and(|s| regex.is_match(s)))
                .then(|| format!("Value does not match pattern '{source}'")),
            Constraint::In(members) => (!members.contains(value)).then(|| {
                let members = members
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("Value {value} not in list [{members}]")
            }),
            Constraint::Node(node) => (!self.conforms(*node, value, depth)?).then(|| {
                format!(
                    "Value does not conform to Shape {}",
                    self.shapes.get(*node).id
                )
            }),
            Constraint::Not(negated) => self.conforms(*negated, value, depth)?.then(|| {
                format!(
                    "Node {value} conforms to shape {}",
                    self.shapes.get(*negated).id
                )
            }),
            Constraint::And(members) => {
                let conforming = self.conforming(members, value, depth)?;
                (conforming < members.len())
                    .then(|| format!("Node {value} does not conform to all shapes in the list"))
            }
            Constraint::Or(members) => {
                let conforming = self.conforming(members, value, depth)?;
                (conforming == 0)
                    .then(|| format!("Node {value} does not conform to one or more shapes in the list"))
            }
            Constraint::Xone(members) => {
                let conforming = self.conforming(members, value, depth)?;
                (conforming != 1)
                    .then(|| format!("Node {value} does not conform to exactly one shape in the list"))
            }
            Constraint::MinCount(_)
            | Constraint::MaxCount(_)
            | Constraint::HasValue(_)
            | Constraint::Property(_)
            | Constraint::Closed { .. } => None,
        };
        Ok(failure)
    }

    fn conforming(&self, shapes: &[ShapeRef], value: &Term, depth: usize) -> Result<usize, ShaclError> {
        let mut count = 0;
        for shape in shapes {
            if self.conforms(*shape, value, depth)? {
                count += 1;
            }
        }
        Ok(count)
    }
}

fn component(constraint: &Constraint) -> NamedNode {
    NamedNode::new_unchecked(format!(
        "{}{}ConstraintComponent",
        sh::NAMESPACE,
        constraint.component()
    ))
}

/// The string used by the length and pattern constraints. Blank nodes have none.
fn lexical_form(term: &Term) -> Option<&str> {
    match term {
        Term::NamedNode(node) => Some(node.as_str()),
        Term::Literal(literal) => Some(literal.value()),
        _ => None,
    }
}

fn has_datatype(value: TermRef<'_>, datatype: NamedNodeRef<'_>) -> bool {
    match value {
        TermRef::Literal(literal) => literal.datatype() == datatype && is_well_formed(literal),
        _ => false,
    }
}

fn parses<T: FromStr>(value: &str) -> bool {
    value.parse::<T>().is_ok()
}

/// Checks that the lexical form of `literal` is valid for its datatype.
///
/// Datatypes without a known lexical space are always considered well formed.
fn is_well_formed(literal: LiteralRef<'_>) -> bool {
    let datatype = literal.datatype();
    if datatype == rdf::LANG_STRING {
        return literal.language().is_some();
    }
    let checks: [(NamedNodeRef<'_>, fn(&str) -> bool); 27] = [
        (xsd::BOOLEAN, parses::<Boolean>),
        (xsd::DECIMAL, parses::<Decimal>),
        (xsd::DOUBLE, parses::<Double>),
        (xsd::FLOAT, parses::<Float>),
        (xsd::INTEGER, parses::<Integer>),
        (xsd::LONG, parses::<Integer>),
        (xsd::INT, parses::<Integer>),
        (xsd::SHORT, parses::<Integer>),
        (xsd::BYTE, parses::<Integer>),
        (xsd::NON_NEGATIVE_INTEGER, |v| is_integer_where(v, |i| i >= 0)),
        (xsd::POSITIVE_INTEGER, |v| is_integer_where(v, |i| i > 0)),
        (xsd::NON_POSITIVE_INTEGER, |v| is_integer_where(v, |i| i <= 0)),
        (xsd::NEGATIVE_INTEGER, |v| is_integer_where(v, |i| i < 0)),
        (xsd::UNSIGNED_LONG, |v| is_integer_where(v, |i| i >= 0)),
        (xsd::UNSIGNED_INT, |v| is_integer_where(v, |i| i >= 0)),
        (xsd::UNSIGNED_SHORT, |v| is_integer_where(v, |i| i >= 0)),
        (xsd::UNSIGNED_BYTE, |v| is_integer_where(v, |i| i >= 0)),
        (xsd::DATE_TIME, parses::<DateTime>),
        (xsd::DATE_TIME_STAMP, parses::<DateTime>),
        (xsd::DATE, parses::<Date>),
        (xsd::TIME, parses::<Time>),
        (xsd::DURATION, parses::<Duration>),
        (xsd::G_YEAR, parses::<GYear>),
        (xsd::G_YEAR_MONTH, parses::<GYearMonth>),
        (xsd::G_MONTH, parses::<GMonth>),
        (xsd::G_MONTH_DAY, parses::<GMonthDay>),
        (xsd::G_DAY, parses::<GDay>),
    ];
    checks
        .iter()
        .find(|(candidate, _)| *candidate == datatype)
        .map_or(true, |(_, check)| check(literal.value()))
}

fn is_integer_where(value: &str, predicate: fn(i64) -> bool) -> bool {
    value
        .trim_start_matches('+')
        .parse::<i64>()
        .is_ok_and(predicate)
        && parses::<Integer>(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use laderr_model::Literal;

    #[test]
    fn datatype_requires_a_well_formed_literal() {
        let date = Term::from(Literal::new_typed_literal("2024-01-15", xsd::DATE));
        assert!(has_datatype(date.as_ref(), xsd::DATE));
        assert!(!has_datatype(date.as_ref(), xsd::DATE_TIME));

        let not_a_date = Term::from(Literal::new_typed_literal("yesterday", xsd::DATE));
        assert!(!has_datatype(not_a_date.as_ref(), xsd::DATE));

        let negative = Term::from(Literal::new_typed_literal("-1", xsd::NON_NEGATIVE_INTEGER));
        assert!(!has_datatype(negative.as_ref(), xsd::NON_NEGATIVE_INTEGER));

        let iri = Term::from(NamedNode::new_unchecked("http://example.com/a"));
        assert!(!has_datatype(iri.as_ref(), xsd::STRING));
    }

    #[test]
    fn simple_literals_are_strings() {
        let simple = Term::from(Literal::new_simple_literal("A widget"));
        assert!(has_datatype(simple.as_ref(), xsd::STRING));
    }

    #[test]
    fn lexical_forms() {
        assert_eq!(
            lexical_form(&NamedNode::new_unchecked("http://example.com/a").into()),
            Some("http://example.com/a")
        );
        assert_eq!(
            lexical_form(&Literal::new_simple_literal("abc").into()),
            Some("abc")
        );
        assert_eq!(
            lexical_form(&laderr_model::BlankNode::default().into()),
            None
        );
    }
}
