use crate::error::ShaclError;
use crate::graph::{object, objects, read_list, subjects};
use laderr_model::vocab::{rdf, sh};
use laderr_model::{BlankNode, Graph, NamedNode, NamedNodeRef, Term, TermRef, Triple};
use std::collections::HashSet;
use std::fmt;

/// A [SHACL property path](https://www.w3.org/TR/shacl/#property-paths).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Path {
    Predicate(NamedNode),
    Inverse(Box<Path>),
    Sequence(Vec<Path>),
    Alternative(Vec<Path>),
    ZeroOrMore(Box<Path>),
    OneOrMore(Box<Path>),
    ZeroOrOne(Box<Path>),
}

impl Path {
    /// Reads the path expression rooted at `node` in the shapes graph.
    pub(crate) fn parse(
        shapes: &Graph,
        shape: TermRef<'_>,
        node: TermRef<'_>,
    ) -> Result<Self, ShaclError> {
        let unsupported = || ShaclError::UnsupportedPath {
            shape: shape.into_owned(),
            path: node.into_owned(),
        };
        match node {
            TermRef::NamedNode(predicate) => return Ok(Self::Predicate(predicate.into_owned())),
            TermRef::BlankNode(_) => (),
            _ => return Err(unsupported()),
        }

        if object(shapes, node, rdf::FIRST).is_some() {
            return Ok(Self::Sequence(Self::parse_list(shapes, shape, node)?));
        }
        if let Some(inner) = object(shapes, node, sh::INVERSE_PATH) {
            return Ok(Self::Inverse(Box::new(Self::parse(shapes, shape, inner)?)));
        }
        if let Some(list) = object(shapes, node, sh::ALTERNATIVE_PATH) {
            return Ok(Self::Alternative(Self::parse_list(shapes, shape, list)?));
        }
        if let Some(inner) = object(shapes, node, sh::ZERO_OR_MORE_PATH) {
            return Ok(Self::ZeroOrMore(Box::new(Self::parse(shapes, shape, inner)?)));
        }
        if let Some(inner) = object(shapes, node, sh::ONE_OR_MORE_PATH) {
            return Ok(Self::OneOrMore(Box::new(Self::parse(shapes, shape, inner)?)));
        }
        if let Some(inner) = object(shapes, node, sh::ZERO_OR_ONE_PATH) {
            return Ok(Self::ZeroOrOne(Box::new(Self::parse(shapes, shape, inner)?)));
        }
        Err(unsupported())
    }

    fn parse_list(
        shapes: &Graph,
        shape: TermRef<'_>,
        head: TermRef<'_>,
    ) -> Result<Vec<Self>, ShaclError> {
        read_list(shapes, head)?
            .iter()
            .map(|member| Self::parse(shapes, shape, member.as_ref()))
            .collect()
    }

    /// Returns the predicate if this path is a plain predicate path.
    pub fn as_predicate(&self) -> Option<NamedNodeRef<'_>> {
        match self {
            Self::Predicate(predicate) => Some(predicate.as_ref()),
            _ => None,
        }
    }

    /// Returns the value nodes reachable from `focus` through this path, without duplicates.
    pub(crate) fn values(&self, data: &Graph, focus: &Term) -> Vec<Term> {
        let mut values = Vec::new();
        let mut seen = HashSet::new();
        for value in self.step(data, focus, false) {
            if seen.insert(value.clone()) {
                values.push(value);
            }
        }
        values
    }

    fn step(&self, data: &Graph, node: &Term, inverse: bool) -> Vec<Term> {
        match self {
            Self::Predicate(predicate) => {
                if inverse {
                    subjects(data, predicate.as_ref(), node.as_ref())
                        .into_iter()
                        .map(|subject| Term::from(subject.into_owned()))
                        .collect()
                } else {
                    objects(data, node.as_ref(), predicate.as_ref())
                        .into_iter()
                        .map(TermRef::into_owned)
                        .collect()
                }
            }
            Self::Inverse(inner) => inner.step(data, node, !inverse),
            Self::Sequence(elements) => {
                let mut current = vec![node.clone()];
                let ordered: Vec<&Path> = if inverse {
                    elements.iter().rev().collect()
                } else {
                    elements.iter().collect()
                };
                for element in ordered {
                    current = current
                        .iter()
                        .flat_map(|node| element.step(data, node, inverse))
                        .collect();
                }
                current
            }
            Self::Alternative(alternatives) => alternatives
                .iter()
                .flat_map(|alternative| alternative.step(data, node, inverse))
                .collect(),
            Self::ZeroOrMore(inner) => Self::reachable(inner, data, node, inverse, true),
            Self::OneOrMore(inner) => Self::reachable(inner, data, node, inverse, false),
            Self::ZeroOrOne(inner) => {
                let mut values = vec![node.clone()];
                values.extend(inner.step(data, node, inverse));
                values
            }
        }
    }

    fn reachable(
        inner: &Path,
        data: &Graph,
        start: &Term,
        inverse: bool,
        reflexive: bool,
    ) -> Vec<Term> {
        let mut seen = HashSet::new();
        let mut values = Vec::new();
        if reflexive {
            seen.insert(start.clone());
            values.push(start.clone());
        }
        let mut stack = vec![start.clone()];
        while let Some(node) = stack.pop() {
            for next in inner.step(data, &node, inverse) {
                if seen.insert(next.clone()) {
                    values.push(next.clone());
                    stack.push(next);
                }
            }
        }
        values
    }

    /// Writes this path as SHACL triples into `graph` and returns its root node.
    pub(crate) fn write(&self, graph: &mut Graph) -> Term {
        let (predicate, inner) = match self {
            Self::Predicate(predicate) => return predicate.clone().into(),
            Self::Sequence(elements) => {
                let members = elements.iter().map(|element| element.write(graph)).collect();
                return write_list(graph, members);
            }
            Self::Alternative(alternatives) => {
                let members = alternatives
                    .iter()
                    .map(|alternative| alternative.write(graph))
                    .collect();
                let node = BlankNode::default();
                let list = write_list(graph, members);
                graph.insert(&Triple::new(node.clone(), sh::ALTERNATIVE_PATH, list));
                return node.into();
            }
            Self::Inverse(inner) => (sh::INVERSE_PATH, inner),
            Self::ZeroOrMore(inner) => (sh::ZERO_OR_MORE_PATH, inner),
            Self::OneOrMore(inner) => (sh::ONE_OR_MORE_PATH, inner),
            Self::ZeroOrOne(inner) => (sh::ZERO_OR_ONE_PATH, inner),
        };
        let node = BlankNode::default();
        let value = inner.write(graph);
        graph.insert(&Triple::new(node.clone(), predicate, value));
        node.into()
    }
}

fn write_list(graph: &mut Graph, members: Vec<Term>) -> Term {
    let mut tail = Term::from(rdf::NIL.into_owned());
    for member in members.into_iter().rev() {
        let cell = BlankNode::default();
        graph.insert(&Triple::new(cell.clone(), rdf::FIRST, member));
        graph.insert(&Triple::new(cell.clone(), rdf::REST, tail));
        tail = cell.into();
    }
    tail
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Predicate(predicate) => write!(f, "{predicate}"),
            Self::Inverse(inner) => write!(f, "^{inner}"),
            Self::Sequence(elements) => write_joined(f, elements, " / "),
            Self::Alternative(alternatives) => write_joined(f, alternatives, " | "),
            Self::ZeroOrMore(inner) => write!(f, "{inner}*"),
            Self::OneOrMore(inner) => write!(f, "{inner}+"),
            Self::ZeroOrOne(inner) => write!(f, "{inner}?"),
        }
    }
}

fn write_joined(f: &mut fmt::Formatter<'_>, paths: &[Path], separator: &str) -> fmt::Result {
    f.write_str("(")?;
    for (i, path) in paths.iter().enumerate() {
        if i > 0 {
            f.write_str(separator)?;
        }
        write!(f, "{path}")?;
    }
    f.write_str(")")
}

#[cfg(test)]
mod tests {
    use super::*;
    use laderr_model::TripleRef;

    const A: NamedNodeRef<'_> = NamedNodeRef::new_unchecked("http://example.com/a");
    const B: NamedNodeRef<'_> = NamedNodeRef::new_unchecked("http://example.com/b");
    const C: NamedNodeRef<'_> = NamedNodeRef::new_unchecked("http://example.com/c");
    const NEXT: NamedNodeRef<'_> = NamedNodeRef::new_unchecked("http://example.com/next");

    fn chain() -> Graph {
        let mut graph = Graph::new();
        graph.insert(TripleRef::new(A, NEXT, B));
        graph.insert(TripleRef::new(B, NEXT, C));
        graph
    }

    fn next() -> Path {
        Path::Predicate(NEXT.into_owned())
    }

    #[test]
    fn predicate_and_inverse() {
        let graph = chain();
        assert_eq!(next().values(&graph, &A.into_owned().into()), vec![Term::from(B.into_owned())]);
        assert_eq!(
            Path::Inverse(Box::new(next())).values(&graph, &B.into_owned().into()),
            vec![Term::from(A.into_owned())]
        );
    }

    #[test]
    fn sequence_and_its_inverse() {
        let graph = chain();
        let twice = Path::Sequence(vec![next(), next()]);
        assert_eq!(twice.values(&graph, &A.into_owned().into()), vec![Term::from(C.into_owned())]);
        assert_eq!(
            Path::Inverse(Box::new(twice)).values(&graph, &C.into_owned().into()),
            vec![Term::from(A.into_owned())]
        );
    }

    #[test]
    fn transitive_closures() {
        let graph = chain();
        let start = Term::from(A.into_owned());
        assert_eq!(Path::ZeroOrMore(Box::new(next())).values(&graph, &start).len(), 3);
        assert_eq!(Path::OneOrMore(Box::new(next())).values(&graph, &start).len(), 2);
        assert_eq!(Path::ZeroOrOne(Box::new(next())).values(&graph, &start).len(), 2);
    }

    #[test]
    fn parse_written_path() -> Result<(), ShaclError> {
        let path = Path::Alternative(vec![
            Path::Inverse(Box::new(next())),
            Path::Sequence(vec![next(), Path::OneOrMore(Box::new(next()))]),
        ]);
        let mut graph = Graph::new();
        let root = path.write(&mut graph);
        assert_eq!(Path::parse(&graph, root.as_ref(), root.as_ref())?, path);
        Ok(())
    }

    #[test]
    fn display() {
        let path = Path::Sequence(vec![Path::Inverse(Box::new(next())), Path::ZeroOrMore(Box::new(next()))]);
        assert_eq!(
            path.to_string(),
            "(^<http://example.com/next> / <http://example.com/next>*)"
        );
    }
}
