use super::{kind, lexical_form, named_node, scalars, specification_node, vocabulary_term, SCALARS};
use crate::base_uri::BaseUri;
use crate::document::ID;
use crate::error::{GraphBuildError, StructureError};
use laderr_model::vocab::{laderr, rdf, rdfs};
use laderr_model::{Graph, LiteralRef, TripleRef};
use toml::{Table, Value};

/// The instance property mapped to `rdfs:label`.
const LABEL: &str = "label";

/// Maps the data sections of a document to RDF.
///
/// Each instance becomes a node `<base><id>` typed with the LaDeRR class named after its section
/// and linked from the specification node with `laderr:composedOf`. Its properties become plain
/// literals, `label` is mapped to `rdfs:label`.
///
/// Fails without returning a partial graph if a section or an instance is not a table, or if a
/// property value is neither a scalar nor an array of scalars.
pub fn build_data_graph(sections: &Table, base: &BaseUri) -> Result<Graph, GraphBuildError> {
    let specification = specification_node(base)?;
    let mut graph = Graph::new();
    graph.insert(TripleRef::new(
        &specification,
        rdf::TYPE,
        laderr::LADERR_SPECIFICATION,
    ));

    for (class_name, section) in sections {
        let Value::Table(instances) = section else {
            return Err(StructureError {
                section: class_name.clone(),
                instance: None,
                property: None,
                expected: "a table of instances",
                found: kind(section),
            }
            .into());
        };
        let class = vocabulary_term(class_name)?;
        for (key, instance) in instances {
            let error = |property: Option<&str>, expected: &'static str, found: &'static str| {
                StructureError {
                    section: class_name.clone(),
                    instance: Some(key.clone()),
                    property: property.map(str::to_owned),
                    expected,
                    found,
                }
            };
            let Value::Table(properties) = instance else {
                return Err(error(None, "a table of properties", kind(instance)).into());
            };
            let id = instance_id(key, properties)
                .map_err(|found| error(Some(ID), "a scalar", found))?;
            let node = named_node(base.join(&id))?;
            graph.insert(TripleRef::new(&node, rdf::TYPE, &class));
            graph.insert(TripleRef::new(&specification, laderr::COMPOSED_OF, &node));

            for (name, value) in properties {
                if name == ID {
                    continue;
                }
                let predicate = if name == LABEL {
                    rdfs::LABEL.into_owned()
                } else {
                    vocabulary_term(name)?
                };
                let values = scalars(value, |found| error(Some(name), SCALARS, found))?;
                for value in &values {
                    graph.insert(TripleRef::new(
                        &node,
                        &predicate,
                        LiteralRef::new_simple_literal(value),
                    ));
                }
            }
        }
    }
    Ok(graph)
}

/// The `id` of an instance, or its key if it has none.
///
/// Fails with the kind of the `id` value if it is not a scalar.
fn instance_id(key: &str, properties: &Table) -> Result<String, &'static str> {
    match properties.get(ID) {
        Some(id) => lexical_form(id).ok_or_else(|| kind(id)),
        None => Ok(key.to_owned()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Document;
    use laderr_model::{Literal, NamedNode, Term};

    fn build(document: &str) -> Result<Graph, GraphBuildError> {
        let document: Document = document.parse().unwrap();
        let base = BaseUri::resolve(&document.metadata);
        build_data_graph(&document.sections, &base)
    }

    fn node(local: &str) -> NamedNode {
        NamedNode::new_unchecked(format!("https://laderr.laderr#{local}"))
    }

    #[test]
    fn instances_are_typed_and_composed() -> Result<(), GraphBuildError> {
        let graph = build(
            r#"
            [Widget.W1]
            label = "first"
            [Widget.W2]
            label = "second"
            "#,
        )?;
        let widget = vocabulary_term("Widget")?;
        for id in ["W1", "W2"] {
            assert!(graph.contains(TripleRef::new(&node(id), rdf::TYPE, &widget)));
            assert!(graph.contains(TripleRef::new(
                &node("LaderrSpecification"),
                laderr::COMPOSED_OF,
                &node(id)
            )));
        }
        assert!(graph.contains(TripleRef::new(
            &node("W1"),
            rdfs::LABEL,
            LiteralRef::new_simple_literal("first")
        )));
        Ok(())
    }

    #[test]
    fn explicit_ids_win_over_keys() -> Result<(), GraphBuildError> {
        let graph = build(
            r#"
            [Capability.c1]
            id = "lift"
            [Capability.c2]
            id = 7
            "#,
        )?;
        let composed = graph
            .objects_for_subject_predicate(&node("LaderrSpecification"), laderr::COMPOSED_OF)
            .map(|term| term.into_owned())
            .collect::<Vec<_>>();
        assert_eq!(composed.len(), 2);
        assert!(composed.contains(&Term::from(node("lift"))));
        assert!(composed.contains(&Term::from(node("7"))));
        Ok(())
    }

    #[test]
    fn arrays_fan_out_into_plain_literals() -> Result<(), GraphBuildError> {
        let graph = build(
            r#"
            [Entity.e1]
            capabilities = ["lift", 2, true]
            "#,
        )?;
        let property = vocabulary_term("capabilities")?;
        let mut values = graph
            .objects_for_subject_predicate(&node("e1"), &property)
            .map(|term| term.into_owned())
            .collect::<Vec<_>>();
        values.sort_by_key(ToString::to_string);
        assert_eq!(
            values,
            [
                Term::from(Literal::new_simple_literal("2")),
                Literal::new_simple_literal("lift").into(),
                Literal::new_simple_literal("true").into(),
            ]
        );
        Ok(())
    }

    #[test]
    fn datetime_values_keep_their_rfc3339_form() -> Result<(), GraphBuildError> {
        let graph = build(
            r#"
            [Scenario.flood]
            startsOn = 2024-11-05T09:30:00Z
            "#,
        )?;
        let property = vocabulary_term("startsOn")?;
        assert_eq!(
            graph.object_for_subject_predicate(&node("flood"), &property),
            Some(LiteralRef::new_simple_literal("2024-11-05T09:30:00Z").into())
        );
        Ok(())
    }

    #[test]
    fn datetime_ids_name_their_node() -> Result<(), GraphBuildError> {
        let graph = build(
            r#"
            [Scenario.s1]
            id = 2024-03-01T12:00:00
            "#,
        )?;
        assert!(graph.contains(TripleRef::new(
            &node("LaderrSpecification"),
            laderr::COMPOSED_OF,
            &node("2024-03-01T12:00:00")
        )));
        Ok(())
    }

    #[test]
    fn non_table_instances_are_structure_errors() {
        let error = build("[Widget]\nW1 = 3").unwrap_err();
        let GraphBuildError::Structure(error) = error else {
            panic!("expected a structure error, found {error}");
        };
        assert_eq!(error.location(), "Widget.W1");
        assert_eq!(error.found, "an integer");
    }

    #[test]
    fn nested_tables_in_properties_are_structure_errors() {
        let error = build("[Widget.W1.part]\nname = \"p\"").unwrap_err();
        let GraphBuildError::Structure(error) = error else {
            panic!("expected a structure error, found {error}");
        };
        assert_eq!(error.location(), "Widget.W1.part");
    }

    #[test]
    fn ids_must_form_iris() {
        assert!(matches!(
            build("[Widget.W1]\nid = \"not an iri\""),
            Err(GraphBuildError::InvalidIri { .. })
        ));
    }
}
