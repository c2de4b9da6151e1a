//! Forward chaining of the RDFS and OWL-RL rules supported by [`Inference`].
//!
//! Rules are applied naively until a fixpoint is reached. Documents mapped from LaDeRR are small,
//! so there is no need for a semi-naive evaluation.

use crate::graph::objects;
use crate::options::Inference;
use laderr_model::vocab::{owl, rdf, rdfs};
use laderr_model::{Graph, NamedNode, Subject, Term, TermRef, Triple};
use std::borrow::Cow;

/// Returns `graph` extended with all triples entailed under `inference`.
pub fn expand(graph: &Graph, inference: Inference) -> Cow<'_, Graph> {
    if !inference.includes_rdfs() {
        return Cow::Borrowed(graph);
    }

    let mut expanded = graph.clone();
    let mut rounds = 0_usize;
    loop {
        rounds += 1;
        let mut entailed = rdfs_rules(&expanded);
        if inference.includes_owl_rl() {
            entailed.extend(owl_rl_rules(&expanded));
        }
        let before = expanded.len();
        expanded.extend(entailed);
        if expanded.len() == before {
            break;
        }
    }
    tracing::debug!(
        %inference,
        rounds,
        entailed = expanded.len() - graph.len(),
        "inference reached its fixpoint"
    );
    Cow::Owned(expanded)
}

fn rdfs_rules(graph: &Graph) -> Vec<Triple> {
    let mut entailed = Vec::new();

    // rdfs9 and rdfs11
    for axiom in graph.triples_for_predicate(rdfs::SUB_CLASS_OF) {
        let sub_class = TermRef::from(axiom.subject);
        for instance in graph.subjects_for_predicate_object(rdf::TYPE, sub_class) {
            entailed.push(Triple::new(instance.into_owned(), rdf::TYPE, axiom.object.into_owned()));
        }
        for super_class in objects(graph, axiom.object, rdfs::SUB_CLASS_OF) {
            entailed.push(Triple::new(
                axiom.subject.into_owned(),
                rdfs::SUB_CLASS_OF,
                super_class.into_owned(),
            ));
        }
    }

    // rdfs5 and rdfs7
    for axiom in graph.triples_for_predicate(rdfs::SUB_PROPERTY_OF) {
        let (Some(sub_property), Some(super_property)) =
            (subject_property(axiom.subject.into_owned()), term_property(axiom.object))
        else {
            continue;
        };
        for triple in graph.triples_for_predicate(&sub_property) {
            entailed.push(Triple::new(
                triple.subject.into_owned(),
                super_property.clone(),
                triple.object.into_owned(),
            ));
        }
        for transitive in objects(graph, axiom.object, rdfs::SUB_PROPERTY_OF) {
            entailed.push(Triple::new(
                sub_property.clone(),
                rdfs::SUB_PROPERTY_OF,
                transitive.into_owned(),
            ));
        }
    }

    // rdfs2
    for axiom in graph.triples_for_predicate(rdfs::DOMAIN) {
        let Some(property) = subject_property(axiom.subject.into_owned()) else {
            continue;
        };
        for triple in graph.triples_for_predicate(&property) {
            entailed.push(Triple::new(
                triple.subject.into_owned(),
                rdf::TYPE,
                axiom.object.into_owned(),
            ));
        }
    }

    // rdfs3, literals can't be typed
    for axiom in graph.triples_for_predicate(rdfs::RANGE) {
        let Some(property) = subject_property(axiom.subject.into_owned()) else {
            continue;
        };
        for triple in graph.triples_for_predicate(&property) {
            if let Some(value) = term_subject(triple.object) {
                entailed.push(Triple::new(value, rdf::TYPE, axiom.object.into_owned()));
            }
        }
    }

    entailed
}

fn owl_rl_rules(graph: &Graph) -> Vec<Triple> {
    let mut entailed = Vec::new();

    // cax-eqc1 and cax-eqc2, expressed through rdfs:subClassOf
    for axiom in graph.triples_for_predicate(owl::EQUIVALENT_CLASS) {
        entailed.push(Triple::new(
            axiom.subject.into_owned(),
            rdfs::SUB_CLASS_OF,
            axiom.object.into_owned(),
        ));
        if let Some(other) = term_subject(axiom.object) {
            entailed.push(Triple::new(
                other,
                rdfs::SUB_CLASS_OF,
                Term::from(axiom.subject.into_owned()),
            ));
        }
    }

    // prp-eqp1 and prp-eqp2, expressed through rdfs:subPropertyOf
    for axiom in graph.triples_for_predicate(owl::EQUIVALENT_PROPERTY) {
        entailed.push(Triple::new(
            axiom.subject.into_owned(),
            rdfs::SUB_PROPERTY_OF,
            axiom.object.into_owned(),
        ));
        if let Some(other) = term_subject(axiom.object) {
            entailed.push(Triple::new(
                other,
                rdfs::SUB_PROPERTY_OF,
                Term::from(axiom.subject.into_owned()),
            ));
        }
    }

    // prp-inv1 and prp-inv2
    for axiom in graph.triples_for_predicate(owl::INVERSE_OF) {
        let (Some(first), Some(second)) =
            (subject_property(axiom.subject.into_owned()), term_property(axiom.object))
        else {
            continue;
        };
        entailed.extend(swapped(graph, &first, &second));
        entailed.extend(swapped(graph, &second, &first));
    }

    // prp-symp
    for property in graph.subjects_for_predicate_object(rdf::TYPE, owl::SYMMETRIC_PROPERTY) {
        if let Some(property) = subject_property(property.into_owned()) {
            entailed.extend(swapped(graph, &property, &property));
        }
    }

    // prp-trp
    for property in graph.subjects_for_predicate_object(rdf::TYPE, owl::TRANSITIVE_PROPERTY) {
        let Some(property) = subject_property(property.into_owned()) else {
            continue;
        };
        for first in graph.triples_for_predicate(&property) {
            for second in objects(graph, first.object, property.as_ref()) {
                entailed.push(Triple::new(
                    first.subject.into_owned(),
                    property.clone(),
                    second.into_owned(),
                ));
            }
        }
    }

    entailed
}

/// For each `s from o` returns `o to s`.
fn swapped(graph: &Graph, from: &NamedNode, to: &NamedNode) -> Vec<Triple> {
    graph
        .triples_for_predicate(from)
        .filter_map(|triple| {
            let subject = term_subject(triple.object)?;
            Some(Triple::new(
                subject,
                to.clone(),
                Term::from(triple.subject.into_owned()),
            ))
        })
        .collect()
}

fn subject_property(subject: Subject) -> Option<NamedNode> {
    match subject {
        Subject::NamedNode(node) => Some(node),
        _ => None,
    }
}

fn term_property(term: TermRef<'_>) -> Option<NamedNode> {
    match term {
        TermRef::NamedNode(node) => Some(node.into_owned()),
        _ => None,
    }
}

fn term_subject(term: TermRef<'_>) -> Option<Subject> {
    match term {
        TermRef::NamedNode(node) => Some(node.into_owned().into()),
        TermRef::BlankNode(node) => Some(node.into_owned().into()),
        _ => None,
    }
}
