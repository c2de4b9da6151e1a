pub mod vocab;

// Re-export some oxrdf types.
pub use oxiri::{Iri, IriParseError};
pub use oxrdf::{
    BlankNode, BlankNodeRef, Graph, Literal, LiteralRef, NamedNode, NamedNodeRef, Subject,
    SubjectRef, Term, TermRef, Triple, TripleRef,
};

/// Returns `term` as a triple subject if it can be one.
///
/// Literals can never appear in subject position, hence they are mapped to [`None`].
pub fn term_as_subject(term: TermRef<'_>) -> Option<SubjectRef<'_>> {
    match term {
        TermRef::NamedNode(node) => Some(node.into()),
        TermRef::BlankNode(node) => Some(node.into()),
        _ => None,
    }
}

/// Merges all triples of the given graphs into a new graph.
///
/// The result has set semantics, hence shared triples are only contained once.
pub fn union<'a>(graphs: impl IntoIterator<Item = &'a Graph>) -> Graph {
    let mut result = Graph::new();
    for graph in graphs {
        result.extend(graph.iter());
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vocab::{laderr, rdf};

    #[test]
    fn union_has_set_semantics() {
        let spec = NamedNode::new_unchecked("https://example.com#LaderrSpecification");
        let mut first = Graph::new();
        first.insert(TripleRef::new(&spec, rdf::TYPE, laderr::LADERR_SPECIFICATION));
        let mut second = first.clone();
        second.insert(TripleRef::new(
            &spec,
            laderr::TITLE,
            LiteralRef::new_simple_literal("T"),
        ));

        let merged = union([&first, &second]);
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn literals_are_no_subjects() {
        assert!(term_as_subject(LiteralRef::new_simple_literal("a").into()).is_none());
        assert!(term_as_subject(laderr::COMPOSED_OF.into()).is_some());
    }
}
