//! Small lookup helpers over [`Graph`] shared by the shape parser, the inference rules and the
//! validator.

use crate::error::ShaclError;
use laderr_model::vocab::{rdf, rdfs};
use laderr_model::{term_as_subject, Graph, NamedNodeRef, SubjectRef, Term, TermRef};
use std::collections::HashSet;

pub(crate) fn objects<'a>(
    graph: &'a Graph,
    node: TermRef<'_>,
    predicate: NamedNodeRef<'_>,
) -> Vec<TermRef<'a>> {
    match term_as_subject(node) {
        Some(subject) => graph
            .objects_for_subject_predicate(subject, predicate)
            .collect(),
        None => Vec::new(),
    }
}

pub(crate) fn object<'a>(
    graph: &'a Graph,
    node: TermRef<'_>,
    predicate: NamedNodeRef<'_>,
) -> Option<TermRef<'a>> {
    term_as_subject(node).and_then(|subject| graph.object_for_subject_predicate(subject, predicate))
}

pub(crate) fn subjects<'a>(
    graph: &'a Graph,
    predicate: NamedNodeRef<'_>,
    object: TermRef<'_>,
) -> Vec<SubjectRef<'a>> {
    graph
        .subjects_for_predicate_object(predicate, object)
        .collect()
}

/// Reads the members of the RDF collection starting at `head`.
pub(crate) fn read_list(graph: &Graph, head: TermRef<'_>) -> Result<Vec<Term>, ShaclError> {
    let mut members = Vec::new();
    let mut current = head;
    while current != TermRef::from(rdf::NIL) {
        // A well-formed list can't be longer than the graph itself.
        if members.len() > graph.len() {
            return Err(ShaclError::MalformedList(head.into_owned()));
        }
        let first = object(graph, current, rdf::FIRST)
            .ok_or_else(|| ShaclError::MalformedList(head.into_owned()))?;
        members.push(first.into_owned());
        current = object(graph, current, rdf::REST)
            .ok_or_else(|| ShaclError::MalformedList(head.into_owned()))?;
    }
    Ok(members)
}

/// Returns `class` and all its transitive `rdfs:subClassOf` super classes.
pub(crate) fn super_classes(graph: &Graph, class: TermRef<'_>) -> HashSet<Term> {
    closure(graph, class, |graph, node| objects(graph, node, rdfs::SUB_CLASS_OF))
}

/// Returns `class` and all its transitive `rdfs:subClassOf` sub classes.
pub(crate) fn sub_classes(graph: &Graph, class: TermRef<'_>) -> HashSet<Term> {
    closure(graph, class, |graph, node| {
        subjects(graph, rdfs::SUB_CLASS_OF, node)
            .into_iter()
            .map(TermRef::from)
            .collect()
    })
}

fn closure<'a>(
    graph: &'a Graph,
    start: TermRef<'_>,
    step: impl Fn(&'a Graph, TermRef<'_>) -> Vec<TermRef<'a>>,
) -> HashSet<Term> {
    let mut seen = HashSet::from([start.into_owned()]);
    let mut stack = vec![start.into_owned()];
    while let Some(node) = stack.pop() {
        for next in step(graph, node.as_ref()) {
            if seen.insert(next.into_owned()) {
                stack.push(next.into_owned());
            }
        }
    }
    seen
}

/// Checks if `node` is a SHACL instance of `class`, i.e. has a `rdf:type` that is `class` or one
/// of its sub classes.
pub(crate) fn is_instance_of(graph: &Graph, node: TermRef<'_>, class: TermRef<'_>) -> bool {
    let class = class.into_owned();
    objects(graph, node, rdf::TYPE)
        .into_iter()
        .any(|ty| super_classes(graph, ty).contains(&class))
}

/// Returns all SHACL instances of `class` in a deterministic order.
pub(crate) fn instances_of(graph: &Graph, class: TermRef<'_>) -> Vec<Term> {
    let classes = sub_classes(graph, class);
    let mut seen = HashSet::new();
    let mut instances = Vec::new();
    for triple in graph.triples_for_predicate(rdf::TYPE) {
        if classes.contains(&triple.object.into_owned()) {
            let instance = Term::from(triple.subject.into_owned());
            if seen.insert(instance.clone()) {
                instances.push(instance);
            }
        }
    }
    instances
}
