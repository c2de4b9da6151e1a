use assert_fs::prelude::*;
use assert_fs::TempDir;
use laderr::model::vocab::{laderr as ns, owl, rdf, rdfs, xsd};
use laderr::model::{Graph, LiteralRef, NamedNode, TermRef, Triple, TripleRef};
use laderr::{
    BaseUri, Document, DocumentError, LaderrConfig, LaderrError, Pipeline, ResourceError,
    DEFAULT_BASE_URI,
};
use oxrdfio::{RdfFormat, RdfParser};
use predicates::prelude::*;
use std::fs::File;

const WIDGET_SHAPES: &str = r#"
@prefix laderr: <https://w3id.org/pedropaulofb/laderr#> .
@prefix sh: <http://www.w3.org/ns/shacl#> .
@prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .

laderr:SpecificationShape a sh:NodeShape ;
    sh:targetClass laderr:LaderrSpecification ;
    sh:property [ sh:path laderr:title ; sh:minCount 1 ] .

laderr:WidgetShape a sh:NodeShape ;
    sh:targetClass laderr:Widget ;
    sh:property [ sh:path rdfs:label ; sh:minCount 1 ] .
"#;

struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        dir.child("shapes/widget.shacl").write_str(WIDGET_SHAPES).unwrap();
        Self { dir }
    }

    fn document(&self, content: &str) -> std::path::PathBuf {
        let file = self.dir.child("spec.toml");
        file.write_str(content).unwrap();
        file.to_path_buf()
    }

    fn output(&self) -> assert_fs::fixture::ChildPath {
        self.dir.child("results/result.ttl")
    }

    fn pipeline(&self) -> Pipeline {
        Pipeline::new(LaderrConfig {
            shapes_dir: Some(self.dir.child("shapes").to_path_buf()),
            output_path: self.output().to_path_buf(),
            ..LaderrConfig::default()
        })
    }
}

fn node(local: &str) -> NamedNode {
    NamedNode::new_unchecked(format!("{DEFAULT_BASE_URI}{local}"))
}

fn parse_turtle(file: &std::path::Path) -> Graph {
    let triples = RdfParser::from_format(RdfFormat::Turtle)
        .for_reader(File::open(file).unwrap())
        .map(|quad| quad.map(Triple::from))
        .collect::<Result<Vec<_>, _>>()
        .unwrap();
    triples.iter().collect()
}

#[test]
fn widget_specification_conforms() -> Result<(), LaderrError> {
    let workspace = Workspace::new();
    let document = workspace.document(
        r#"
        title = "T"
        createdBy = "A"

        [Widget.W1]
        label = "first"
        "#,
    );
    let validation = workspace.pipeline().run(&document)?;
    assert!(validation.conforms());
    assert!(validation.report.results().is_empty());

    let graph = &validation.specification.graph;
    let spec = node("LaderrSpecification");
    let widget = node("W1");
    assert_eq!(
        graph
            .subjects_for_predicate_object(rdf::TYPE, ns::LADERR_SPECIFICATION)
            .count(),
        1
    );
    assert_eq!(
        graph
            .objects_for_subject_predicate(&spec, ns::CREATED_BY)
            .collect::<Vec<_>>(),
        [TermRef::from(LiteralRef::new_simple_literal("A"))]
    );
    assert!(graph.contains(TripleRef::new(
        &widget,
        rdf::TYPE,
        &NamedNode::new_unchecked(format!("{}Widget", ns::NAMESPACE))
    )));
    assert!(graph.contains(TripleRef::new(
        &widget,
        rdfs::LABEL,
        LiteralRef::new_simple_literal("first")
    )));
    assert_eq!(
        graph
            .objects_for_subject_predicate(&spec, ns::COMPOSED_OF)
            .collect::<Vec<_>>(),
        [TermRef::from(widget.as_ref())]
    );
    Ok(())
}

#[test]
fn widget_without_label_does_not_conform() -> Result<(), LaderrError> {
    let workspace = Workspace::new();
    let document = workspace.document("title = \"T\"\ncreatedBy = \"A\"\n\n[Widget.W1]\n");
    let validation = workspace.pipeline().run(&document)?;
    assert!(!validation.conforms());
    assert!(!validation.report.results().is_empty());
    assert!(validation.report.to_string().contains("Conforms: False"));

    // The graph is written even if it doesn't conform.
    workspace
        .output()
        .assert(predicate::str::contains(":W1"));
    Ok(())
}

#[test]
fn persisted_graph_round_trips_without_schema() -> Result<(), LaderrError> {
    let workspace = Workspace::new();
    let document = workspace.document(
        r#"
        title = "T"
        createdOn = 2024-01-15T10:00:00Z
        baseUri = "https://example.com/widgets#"

        [Widget.W1]
        label = "first"
        parts = ["p1", "p2"]
        "#,
    );
    let validation = workspace.pipeline().run(&document)?;
    let persisted = parse_turtle(validation.output_path.as_path());
    assert_eq!(persisted, validation.specification.graph);
    assert!(!persisted.contains(TripleRef::new(
        ns::LADERR_SPECIFICATION,
        rdf::TYPE,
        owl::CLASS
    )));
    workspace
        .output()
        .assert(predicate::str::contains("@prefix : <https://example.com/widgets#> ."));
    Ok(())
}

#[test]
fn instances_without_id_are_named_after_their_key() -> Result<(), LaderrError> {
    let workspace = Workspace::new();
    let document = workspace.document(
        r#"
        title = "T"
        [Widget.alpha]
        label = "a"
        [Widget.beta]
        label = "b"
        [Gadget.gamma]
        label = "c"
        "#,
    );
    let graph = workspace.pipeline().build_graph(&document)?.graph;
    for key in ["alpha", "beta", "gamma"] {
        assert!(graph.contains(TripleRef::new(
            &node("LaderrSpecification"),
            ns::COMPOSED_OF,
            &node(key)
        )));
    }
    Ok(())
}

#[test]
fn invalid_base_uri_falls_back_to_the_default() -> Result<(), LaderrError> {
    let workspace = Workspace::new();
    let document = workspace.document("title = \"T\"\nbaseUri = \"not a uri\"\n");
    let specification = workspace.pipeline().build_graph(&document)?;
    assert_eq!(specification.base.as_str(), DEFAULT_BASE_URI);
    assert!(specification.base.fallback().is_some());
    assert!(workspace.pipeline().validate(&document)?);
    Ok(())
}

#[test]
fn structure_errors_abort_before_writing() {
    let workspace = Workspace::new();
    let document = workspace.document("title = \"T\"\n[Widget]\nW1 = \"not a table\"\n");
    let error = workspace.pipeline().run(&document).unwrap_err();
    let structure = error.as_structure_error().unwrap();
    assert_eq!(structure.location(), "Widget.W1");
    workspace.output().assert(predicate::path::missing());
}

#[test]
fn syntax_and_missing_documents() {
    let workspace = Workspace::new();
    let document = workspace.document("title = \"T\n");
    assert!(matches!(
        workspace.pipeline().run(&document),
        Err(LaderrError::Document(DocumentError::Syntax(_)))
    ));
    assert!(matches!(
        workspace.pipeline().run(workspace.dir.path().join("missing.toml")),
        Err(LaderrError::Document(DocumentError::NotFound(_)))
    ));
    workspace.output().assert(predicate::path::missing());
}

#[test]
fn missing_shapes_directory() {
    let workspace = Workspace::new();
    let document = workspace.document("title = \"T\"\n");
    let pipeline = Pipeline::new(LaderrConfig {
        shapes_dir: Some(workspace.dir.path().join("nowhere")),
        output_path: workspace.output().to_path_buf(),
        ..LaderrConfig::default()
    });
    assert!(matches!(
        pipeline.run(&document),
        Err(LaderrError::Resource(ResourceError::ShapesNotFound(_)))
    ));
}

#[test]
fn bundled_shapes_check_metadata() -> Result<(), LaderrError> {
    let workspace = Workspace::new();
    let pipeline = Pipeline::new(LaderrConfig {
        output_path: workspace.output().to_path_buf(),
        ..LaderrConfig::default()
    });

    let valid = workspace.document(
        r#"
        title = "Widgets"
        description = "A specification of widgets"
        version = "1.0"
        createdBy = ["A", "B"]
        createdOn = 2024-01-15T10:00:00Z
        modifiedOn = 2024-02-01T08:30:00
        baseUri = "https://example.com/widgets#"

        [Widget.W1]
        label = "first"
        "#,
    );
    assert!(pipeline.validate(&valid)?);

    for invalid in [
        "description = \"no title\"",
        "title = [\"one\", \"two\"]",
        "title = \"T\"\ncreatedOn = \"yesterday\"",
        "title = \"T\"\nauthor = \"undefined key\"",
    ] {
        let document = workspace.document(invalid);
        assert!(!pipeline.validate(&document)?, "{invalid} should not conform");
    }
    Ok(())
}

#[test]
fn documents_are_reread_on_every_run() -> Result<(), LaderrError> {
    let workspace = Workspace::new();
    let pipeline = workspace.pipeline();
    let document = workspace.document("title = \"T\"\n[Widget.W1]\nlabel = \"first\"\n");
    assert!(pipeline.validate(&document)?);
    workspace.document("title = \"T\"\n[Widget.W1]\n");
    assert!(!pipeline.validate(&document)?);

    let parsed = Document::read(&document)?;
    assert_eq!(BaseUri::resolve(&parsed.metadata).as_str(), DEFAULT_BASE_URI);
    Ok(())
}

#[test]
fn dated_documents_conform_to_the_bundled_shapes() -> Result<(), LaderrError> {
    let workspace = Workspace::new();
    let pipeline = Pipeline::new(LaderrConfig {
        output_path: workspace.output().to_path_buf(),
        ..LaderrConfig::default()
    });

    for dates in [
        "createdOn = 2024-01-15T10:00:00Z",
        "createdOn = 2024-01-15T10:00:00+02:00\nmodifiedOn = 2024-02-01T08:30:00",
    ] {
        let document = workspace.document(&format!("title = \"T\"\n{dates}\n"));
        let validation = pipeline.run(&document)?;
        assert!(validation.conforms(), "{dates}\n{}", validation.report);
    }

    let spec = node("LaderrSpecification");
    let graph = parse_turtle(workspace.output().path());
    assert!(graph.contains(TripleRef::new(
        &spec,
        ns::CREATED_ON,
        LiteralRef::new_typed_literal("2024-01-15T10:00:00+02:00", xsd::DATE_TIME),
    )));
    Ok(())
}
