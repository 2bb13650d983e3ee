//! Integration tests for the public ProofViz API
//!
//! These tests drive a session through the event sequence a viewer
//! produces: an initial graph, analyzer refreshes, drags and selections.

use proofviz::{
    ProofViz, ProofVizError,
    config::AppConfig,
    geometry::Point,
    highlight::{Emphasis, Focus},
    identifier::Id,
};

const PROOF: &str = r#"{
    "nodes": [
        {"id": "A", "label": "Assume the premise", "type": "assumption"},
        {"id": "X", "label": "Apply the lemma", "type": "deduction"},
        {"id": "B", "label": "Conclude", "type": "conclusion"},
        {"id": "C", "label": "Side remark", "type": "deduction"}
    ],
    "edges": [
        {"source": "A", "target": "X"},
        {"source": "X", "target": "B"},
        {"source": "A", "target": "Z"}
    ],
    "key_concepts": [
        {"name": "The lemma", "description": "A known fact", "used_in": ["X", "C"]}
    ]
}"#;

const PROOF_CRITIQUED: &str = r#"{
    "nodes": [
        {"id": "A", "label": "Assume the premise", "type": "assumption", "valid": true},
        {"id": "X", "label": "Apply the lemma", "type": "deduction", "valid": false,
         "critique": "The lemma needs n > 2"},
        {"id": "B", "label": "Conclude", "type": "conclusion"},
        {"id": "C", "label": "Side remark", "type": "deduction"}
    ],
    "edges": [
        {"source": "A", "target": "X"},
        {"source": "X", "target": "B"}
    ]
}"#;

fn id(name: &str) -> Id {
    Id::new(name)
}

#[test]
fn test_parse_reports_dangling_edges() {
    let graph = ProofViz::default().parse(PROOF).expect("Failed to parse");

    assert_eq!(graph.node_count(), 4);
    assert_eq!(graph.edges().len(), 2);
    assert_eq!(graph.dangling_edges().collect::<Vec<_>>(), vec![(id("A"), id("Z"))]);
}

#[test]
fn test_refresh_keeps_layout_and_merges_metadata() {
    let proofviz = ProofViz::default();
    let mut session = proofviz.session().unwrap();

    let first = session
        .replace_graph(proofviz.parse(PROOF).unwrap())
        .unwrap();
    assert!(first.is_fresh_layout());

    session.move_node(id("C"), Point::new(900.0, 0.0)).unwrap();

    let second = session
        .replace_graph(proofviz.parse(PROOF_CRITIQUED).unwrap())
        .unwrap();
    assert!(!second.is_fresh_layout());

    for node in second.nodes() {
        let before = first.node(node.id()).unwrap();
        if node.id() == id("C") {
            assert_eq!(node.position(), Point::new(900.0, 0.0));
        } else {
            assert_eq!(node.position(), before.position());
        }
    }

    let x = second.node(id("X")).unwrap();
    assert_eq!(x.metadata().get("valid"), Some(&serde_json::json!(false)));
    assert!(x.metadata().contains_key("critique"));
}

#[test]
fn test_neighborhood_then_concept_selection() {
    let proofviz = ProofViz::default();
    let mut session = proofviz.session().unwrap();
    session
        .replace_graph(proofviz.parse(PROOF).unwrap())
        .unwrap();

    let scene = session.click_node(id("X")).unwrap();
    let dimmed: Vec<Id> = scene
        .nodes()
        .iter()
        .filter(|node| node.emphasis() == Emphasis::Dimmed)
        .map(|node| node.id())
        .collect();
    assert_eq!(dimmed, vec![id("C")]);

    let scene = session.select_concept("The lemma").unwrap();
    assert!(matches!(session.focus(), Focus::Group { .. }));
    // X and C share no edge
    assert!(
        scene
            .edges()
            .iter()
            .all(|edge| edge.emphasis() == Emphasis::Dimmed)
    );

    let scene = session.click_background();
    assert!(
        scene
            .nodes()
            .iter()
            .all(|node| node.emphasis() == Emphasis::Normal)
    );
}

#[test]
fn test_cyclic_graph_is_rejected() {
    let proofviz = ProofViz::default();
    let graph = proofviz
        .parse(
            r#"{"nodes": [{"id": "A"}, {"id": "B"}],
                "edges": [{"source": "A", "target": "B"}, {"source": "B", "target": "A"}]}"#,
        )
        .unwrap();

    let mut session = proofviz.session().unwrap();
    match session.replace_graph(graph) {
        Err(ProofVizError::Cycle(err)) => {
            assert_eq!(err.unassigned(), &[id("A"), id("B")]);
        }
        other => panic!("expected a cycle error, got {other:?}"),
    }
    assert!(session.view_state().is_none());
}

#[test]
fn test_render_outputs() {
    let proofviz = ProofViz::new(AppConfig::default());
    let mut session = proofviz.session().unwrap();
    let scene = session
        .replace_graph(proofviz.parse(PROOF).unwrap())
        .unwrap();

    let svg = proofviz.render_svg(&scene).expect("Failed to render");
    assert!(svg.contains("<svg"), "Output should contain SVG tag");
    assert!(svg.contains("</svg>"), "Output should be complete SVG");

    let json = proofviz.render_json(&scene).expect("Failed to serialize");
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["nodes"].as_array().map(Vec::len), Some(4));
    assert_eq!(value["fresh_layout"], serde_json::json!(true));
    assert_eq!(value["concepts"][0]["name"], serde_json::json!("The lemma"));
    assert_eq!(value["concepts"][0]["description"], serde_json::json!("A known fact"));
    assert_eq!(value["concepts"][0]["used_in"], serde_json::json!(["X", "C"]));
}
