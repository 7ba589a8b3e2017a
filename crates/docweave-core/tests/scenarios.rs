//! Worked scenarios: three documents, an empty set, clamped drag, and
//! last-write-wins analysis

use docweave_core::config::Config;
use docweave_core::domain::document::DocumentId;
use docweave_core::domain::graph::{
    CanvasBounds, EdgeStyle, GraphBuilder, GraphExport, GraphNode, KnowledgeGraph, NodeKind, NodePayload, Point,
};
use docweave_core::domain::interaction::GraphController;
use docweave_core::domain::synthesis::{RelationshipKind, Synthesizer};
use docweave_core::domain::{Document, DocumentSet};
use docweave_core::pipeline::{AnalysisPipeline, StaticSource};
use docweave_core::visualization::{EMPTY_STATE_MESSAGE, GraphOutline};

fn three_documents() -> DocumentSet {
    DocumentSet::from_json_str(
        r#"[
            {"id": 1, "name": "Budget", "category": "Finance"},
            {"id": 2, "name": "Forecast", "category": "Finance"},
            {"id": 3, "name": "Roadmap", "category": "Strategy"}
        ]"#,
    )
    .unwrap()
}

fn id(n: u64) -> DocumentId {
    DocumentId::from(n)
}

#[test]
fn test_three_document_synthesis() {
    let documents = three_documents();
    let result = Synthesizer::default().synthesize(&documents);

    let complementary: Vec<_> = result.relationships_of(RelationshipKind::Complementary).collect();
    assert!(complementary.iter().any(|r| r.involves(&id(1)) && r.involves(&id(2))));

    let supporting: Vec<_> = result.relationships_of(RelationshipKind::Supporting).collect();
    assert!(supporting.iter().any(|r| r.involves(&id(3)) && (r.involves(&id(1)) || r.involves(&id(2)))));

    assert!(!result.contradictions.is_empty());
    let (finance, strategy) = result.contradictions[0].primary_pair().unwrap();
    assert!(*finance == id(1) || *finance == id(2));
    assert_eq!(*strategy, id(3));

    for rel in &result.relationships {
        assert!(documents.contains(&rel.document_a));
        assert!(documents.contains(&rel.document_b));
    }
}

#[test]
fn test_three_document_graph() {
    let documents = three_documents();
    let synthesis = Synthesizer::default().synthesize(&documents);
    let graph = GraphBuilder::default().build(&documents, &synthesis);

    assert_eq!(graph.nodes_of(NodeKind::Document).count(), 3);

    let finance = graph.node("concept:finance").unwrap();
    match &finance.payload {
        NodePayload::Concept { document_ids, .. } => assert_eq!(document_ids, &vec![id(1), id(2)]),
        other => panic!("unexpected payload {:?}", other),
    }
    assert!(graph.node("concept:strategy").is_none());

    // Document-backed nodes only ever point at documents 1 to 3
    for node in graph.nodes() {
        for doc_id in node.payload.document_ids() {
            assert!(documents.contains(doc_id), "{} references {}", node.id, doc_id);
        }
    }
    for edge in graph.edges() {
        for end in [&edge.source_node_id, &edge.target_node_id] {
            if let Some(doc) = end.strip_prefix("doc:") {
                assert!(["1", "2", "3"].contains(&doc));
            }
        }
    }
}

#[test]
fn test_three_document_graph_shows_contradiction() {
    let documents = three_documents();
    let synthesis = Synthesizer::default().with_seed(1).synthesize(&documents);
    let graph = GraphBuilder::default().build(&documents, &synthesis);

    let contradiction = &synthesis.contradictions[0];
    let (finance, strategy) = contradiction.primary_pair().unwrap();
    assert!(*finance == id(1) || *finance == id(2));
    assert_eq!(*strategy, id(3));

    let edge = graph
        .edge_between(&format!("doc:{}", finance), "doc:3")
        .unwrap();
    assert_eq!(edge.style, EdgeStyle::Dotted);
    assert_eq!(edge.label.as_deref(), Some(contradiction.issue.as_str()));

    // Complementary still links the two Finance documents
    let finance = graph.edge_between("doc:1", "doc:2").unwrap();
    assert_eq!(finance.label.as_deref(), Some("complementary"));
}

#[test]
fn test_empty_set_produces_empty_everything() {
    let documents = DocumentSet::from_json_str("[]").unwrap();
    let synthesis = Synthesizer::default().synthesize(&documents);
    assert!(synthesis.insights.is_empty());
    assert!(synthesis.relationships.is_empty());
    assert!(synthesis.contradictions.is_empty());
    assert!(synthesis.timeline.is_empty());
    assert!(synthesis.gaps.is_empty());

    let graph = GraphBuilder::default().build(&documents, &synthesis);
    assert!(graph.nodes().is_empty());
    assert!(graph.edges().is_empty());

    let controller = GraphController::with_graph(graph, CanvasBounds::default());
    let snapshot = controller.snapshot();
    assert!(snapshot.is_empty());
    assert!(GraphOutline::new(&snapshot).render().contains(EMPTY_STATE_MESSAGE));

    let export: serde_json::Value = serde_json::from_str(&controller.export_json().unwrap()).unwrap();
    assert_eq!(export["nodes"], serde_json::json!([]));
    assert_eq!(export["edges"], serde_json::json!([]));
    assert_eq!(export["metadata"]["documentCount"], 0);
}

#[test]
fn test_invalid_document_sets_are_errors() {
    for input in ["null", "{}", "\"docs\"", "[{\"name\": 5}]", "not json"] {
        let err = DocumentSet::from_json_str(input).unwrap_err();
        assert_eq!(err.code(), "E100", "input {}", input);
    }
}

#[test]
fn test_duplicate_ids_keep_later_record() {
    let documents = DocumentSet::from_json_str(
        r#"[
            {"id": "a", "name": "Draft", "category": "Finance"},
            {"id": "b", "name": "Other", "category": "Legal"},
            {"id": "a", "name": "Final", "category": "Finance"}
        ]"#,
    )
    .unwrap();
    assert_eq!(documents.len(), 2);
    assert_eq!(documents.get(&DocumentId::new("a")).unwrap().name, "Final");
}

#[test]
fn test_drag_to_negative_coordinates_clamps_to_margin() {
    let node = GraphNode::new(
        "n",
        "N",
        Point::new(100.0, 100.0),
        NodePayload::Concept {
            term: "n".to_string(),
            document_ids: Vec::new(),
        },
    );
    let graph = KnowledgeGraph::from_parts(vec![node], Vec::new());
    let mut controller = GraphController::with_graph(graph, CanvasBounds::default());

    controller.press("n", Point::new(100.0, 100.0));
    controller.move_pointer(Point::new(40.0, 40.0));
    controller.move_pointer(Point::new(-50.0, -50.0));
    let frame = controller.release();

    assert_eq!(frame.node("n").unwrap().position, Point::new(20.0, 20.0));
    assert!(frame.view_state.dragged_node_id().is_none());
}

#[test]
fn test_export_round_trips_graph_without_mutation() {
    let documents = three_documents();
    let outcome = AnalysisPipeline::default().analyze_now(documents);
    let controller = GraphController::with_graph(outcome.graph.clone(), CanvasBounds::default());

    let json = controller.export_json().unwrap();
    let export = GraphExport::from_json(&json).unwrap();
    assert_eq!(export.metadata.document_count, 3);

    let restored = export.into_graph();
    assert_eq!(restored.nodes(), outcome.graph.nodes());
    assert_eq!(restored.edges(), outcome.graph.edges());
    assert_eq!(controller.graph().nodes(), outcome.graph.nodes());
}

#[test]
fn test_rebuild_keeps_view_intent_and_drops_stale_selection() {
    let pipeline = AnalysisPipeline::new(&Config::default());
    let first = pipeline.analyze_now(three_documents());
    let mut controller = GraphController::new(CanvasBounds::default());
    assert!(controller.apply_outcome(first));

    controller.zoom_in();
    controller.search("finance");
    controller.click("doc:3");

    let smaller = DocumentSet::new(vec![
        Document::new(1u64, "Budget", "Finance"),
        Document::new(2u64, "Forecast", "Finance"),
    ]);
    assert!(controller.apply_outcome(pipeline.analyze_now(smaller)));

    let state = controller.view_state();
    assert_eq!(state.zoom, 1.2);
    assert_eq!(state.search_term, "finance");
    assert!(state.selected_node_id.is_none());
    assert_eq!(controller.applied_generation(), Some(2));
}

#[tokio::test]
async fn test_newer_analysis_wins_over_stale_result() {
    let pipeline = AnalysisPipeline::default().with_yield_threshold(1);
    let stale = pipeline.analyze_now(three_documents());
    let fresh = pipeline.analyze_now(DocumentSet::new(vec![Document::new(7u64, "Memo", "Legal")]));

    let mut controller = GraphController::new(CanvasBounds::default());
    assert!(controller.apply_outcome(fresh));
    assert!(!controller.apply_outcome(stale));
    assert!(controller.graph().contains_node("doc:7"));
    assert!(!controller.graph().contains_node("doc:1"));

    // Overlapping cooperative runs: only the latest completes
    let older = StaticSource::new(three_documents());
    let newer = StaticSource::new(DocumentSet::new(vec![Document::new(8u64, "Note", "Research")]));
    let (a, b) = tokio::join!(pipeline.analyze_source(&older), pipeline.analyze_source(&newer));

    assert!(a.unwrap().is_superseded());
    let outcome = b.unwrap().into_outcome().unwrap();
    assert!(controller.apply_outcome(outcome));
    assert!(controller.graph().contains_node("doc:8"));
}
