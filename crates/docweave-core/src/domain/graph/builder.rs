//! Graph model builder
//!
//! Maps a document set and its synthesis into a [`KnowledgeGraph`]. Layout is
//! a pure function of document order, so rebuilding the same input yields the
//! same positions.
//!
//! Layout lanes:
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │  D   D   D   D                          T    │
//! │  D   D                                  T    │
//! │    C   C   C   C                        T    │
//! │    E   E   E                                 │
//! │  I        I        I                         │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! Documents fill a fixed-width grid, concepts and entities continue the grid
//! on the following rows, timeline nodes sit in a vertical lane on the right
//! and insights in a horizontal lane along the bottom.

use std::collections::{BTreeSet, HashMap};

use tracing::{debug, info, warn};

use crate::config::{Config, GraphConfig, MAX_INSIGHT_NODES};
use crate::domain::document::{DocumentId, DocumentSet, canonicalize};
use crate::domain::synthesis::{RelationshipKind, SynthesisResult};

use super::catalog::entity_catalog;
use super::edge::{EdgeStyle, GraphEdge};
use super::geometry::{CanvasBounds, Point};
use super::model::{EdgeRejection, KnowledgeGraph};
use super::node::{GraphNode, NodePayload};

/// Node id of a document
pub fn document_node_id(id: &DocumentId) -> String {
    format!("doc:{}", id)
}

/// A keyword or category referenced by documents
#[derive(Debug)]
struct ConceptTerm {
    key: String,
    label: String,
    documents: Vec<DocumentId>,
}

fn collect_concepts(documents: &DocumentSet) -> Vec<ConceptTerm> {
    let mut terms: Vec<ConceptTerm> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for doc in documents {
        let candidates = std::iter::once(&doc.category).chain(doc.keywords.iter());
        for raw in candidates {
            let key = canonicalize(raw);
            if key.is_empty() {
                continue;
            }
            let slot = *index.entry(key.clone()).or_insert_with(|| {
                terms.push(ConceptTerm {
                    key,
                    label: raw.trim().to_string(),
                    documents: Vec::new(),
                });
                terms.len() - 1
            });
            let term = &mut terms[slot];
            if !term.documents.contains(&doc.id) {
                term.documents.push(doc.id.clone());
            }
        }
    }

    // Single-document terms do not get a node
    terms.retain(|t| t.documents.len() >= 2);
    terms
}

fn jaccard(a: &[DocumentId], b: &[DocumentId]) -> f64 {
    let left: BTreeSet<&DocumentId> = a.iter().collect();
    let right: BTreeSet<&DocumentId> = b.iter().collect();
    let union = left.union(&right).count();
    if union == 0 {
        return 0.0;
    }
    left.intersection(&right).count() as f64 / union as f64
}

/// Lower wins when two kinds link the same pair of documents
fn relationship_precedence(kind: RelationshipKind) -> u8 {
    match kind {
        RelationshipKind::Contradictory => 0,
        RelationshipKind::Sequential => 1,
        RelationshipKind::Complementary => 2,
        RelationshipKind::Supporting => 3,
    }
}

fn relationship_style(kind: RelationshipKind) -> EdgeStyle {
    match kind {
        RelationshipKind::Complementary | RelationshipKind::Supporting => EdgeStyle::Solid,
        RelationshipKind::Sequential => EdgeStyle::Dashed,
        RelationshipKind::Contradictory => EdgeStyle::Dotted,
    }
}

#[derive(Debug, Default)]
struct EdgeTally {
    duplicates: usize,
}

impl EdgeTally {
    fn connect(&mut self, graph: &mut KnowledgeGraph, edge: GraphEdge) {
        match graph.add_edge(edge) {
            Ok(()) => {}
            Err(EdgeRejection::Duplicate) => self.duplicates += 1,
            Err(rejection) => debug!(?rejection, "Edge rejected"),
        }
    }
}

/// Builds knowledge graphs with a deterministic grid layout
#[derive(Debug, Clone)]
pub struct GraphBuilder {
    config: GraphConfig,
    bounds: CanvasBounds,
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self::new(GraphConfig::default(), CanvasBounds::default())
    }
}

impl GraphBuilder {
    pub fn new(config: GraphConfig, bounds: CanvasBounds) -> Self {
        Self { config, bounds }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.graph.clone(), config.canvas.bounds())
    }

    pub fn bounds(&self) -> CanvasBounds {
        self.bounds
    }

    fn columns(&self) -> usize {
        self.config.grid_columns.max(1)
    }

    /// Position of a grid slot, clamped to the canvas
    fn grid_position(&self, slot: usize, x_offset: f64) -> Point {
        let columns = self.columns();
        let column = (slot % columns) as f64;
        let row = (slot / columns) as f64;
        self.bounds.clamp(Point::new(
            self.config.grid_origin_x + x_offset + column * self.config.grid_spacing_x,
            self.config.grid_origin_y + row * self.config.grid_spacing_y,
        ))
    }

    fn rows_for(&self, count: usize) -> usize {
        count.div_ceil(self.columns())
    }

    fn timeline_position(&self, index: usize) -> Point {
        self.bounds.clamp(Point::new(
            self.bounds.max_x() - 60.0,
            self.config.grid_origin_y + index as f64 * self.config.grid_spacing_y / 2.0,
        ))
    }

    fn insight_position(&self, index: usize) -> Point {
        self.bounds.clamp(Point::new(
            self.config.grid_origin_x + index as f64 * self.config.grid_spacing_x * 1.5,
            self.bounds.max_y() - 40.0,
        ))
    }

    /// Build the graph
    ///
    /// An empty document set yields an empty graph. Synthesized records that
    /// reference unknown documents are dropped.
    pub fn build(&self, documents: &DocumentSet, synthesis: &SynthesisResult) -> KnowledgeGraph {
        let mut graph = KnowledgeGraph::new();
        if documents.is_empty() {
            debug!("No documents, returning empty graph");
            return graph;
        }

        let columns = self.columns();
        let mut tally = EdgeTally::default();

        // Documents
        for (i, doc) in documents.iter().enumerate() {
            graph.add_node(GraphNode::new(
                document_node_id(&doc.id),
                doc.name.clone(),
                self.grid_position(i, 0.0),
                NodePayload::Document {
                    document_id: doc.id.clone(),
                    category: doc.category.clone(),
                    keywords: doc.keywords.clone(),
                    word_count: doc.word_count,
                    confidence: doc.confidence_score,
                },
            ));
        }
        let mut next_slot = self.rows_for(documents.len()) * columns;

        // Concepts
        let concepts = collect_concepts(documents);
        let concept_ids: Vec<String> = concepts.iter().map(|c| format!("concept:{}", c.key)).collect();
        for (i, (concept, id)) in concepts.iter().zip(&concept_ids).enumerate() {
            graph.add_node(GraphNode::new(
                id.clone(),
                concept.label.clone(),
                self.grid_position(next_slot + i, self.config.grid_spacing_x / 2.0),
                NodePayload::Concept {
                    term: concept.key.clone(),
                    document_ids: concept.documents.clone(),
                },
            ));
        }
        next_slot += self.rows_for(concepts.len()) * columns;

        // Entities
        let entity_count = entity_catalog().len().min(documents.len());
        let entities = &entity_catalog()[..entity_count];
        for (i, entity) in entities.iter().enumerate() {
            graph.add_node(GraphNode::new(
                format!("entity:{}", entity.slug()),
                entity.name,
                self.grid_position(next_slot + i, self.config.grid_spacing_x / 2.0),
                NodePayload::Entity {
                    entity_kind: entity.kind,
                    description: entity.description.to_string(),
                },
            ));
        }

        // Timeline lane
        let dated: Vec<_> = documents.iter().filter(|d| d.created_date.is_some()).collect();
        for (i, doc) in dated.iter().enumerate() {
            if let Some(date) = doc.created_date {
                graph.add_node(GraphNode::new(
                    format!("timeline:{}", doc.id),
                    date.format("%Y-%m-%d").to_string(),
                    self.timeline_position(i),
                    NodePayload::Timeline {
                        document_id: doc.id.clone(),
                        date,
                    },
                ));
            }
        }

        // Insight lane
        let insight_count = if documents.len() > 1 {
            self.config
                .max_insight_nodes
                .min(MAX_INSIGHT_NODES)
                .min(documents.len() - 1)
                .min(synthesis.insights.len())
        } else {
            0
        };
        for (i, insight) in synthesis.insights.iter().take(insight_count).enumerate() {
            graph.add_node(GraphNode::new(
                format!("insight:{}", i + 1),
                format!("{} ({}%)", insight.category, insight.confidence),
                self.insight_position(i),
                NodePayload::Insight {
                    text: insight.text.clone(),
                    confidence: insight.confidence,
                    category: insight.category,
                },
            ));
        }

        // 1. document -> concept
        for (concept, id) in concepts.iter().zip(&concept_ids) {
            for doc_id in &concept.documents {
                tally.connect(
                    &mut graph,
                    GraphEdge::new(document_node_id(doc_id), id.clone(), EdgeStyle::Solid)
                        .with_label("mentions"),
                );
            }
        }

        // 2. concept chain, gated on shared documents
        for (i, pair) in concepts.windows(2).enumerate() {
            if jaccard(&pair[0].documents, &pair[1].documents) >= self.config.concept_link_threshold {
                tally.connect(
                    &mut graph,
                    GraphEdge::new(concept_ids[i].clone(), concept_ids[i + 1].clone(), EdgeStyle::Dotted)
                        .with_label("related"),
                );
            }
        }

        // 3. entity -> document, round robin
        let document_ids: Vec<&DocumentId> = documents.iter().map(|d| &d.id).collect();
        for (i, entity) in entities.iter().enumerate() {
            let doc_id = document_ids[i % document_ids.len()];
            tally.connect(
                &mut graph,
                GraphEdge::new(format!("entity:{}", entity.slug()), document_node_id(doc_id), EdgeStyle::Dashed)
                    .with_label(entity.kind.as_str()),
            );
        }

        // 4. contradictions claim their pair before softer relationships
        let mut dropped = 0usize;
        for contradiction in &synthesis.contradictions {
            let known = contradiction
                .document_ids
                .iter()
                .all(|id| graph.contains_node(&document_node_id(id)));
            let pair = contradiction.primary_pair().filter(|(a, b)| a != b);
            match pair {
                Some((a, b)) if known => tally.connect(
                    &mut graph,
                    GraphEdge::new(document_node_id(a), document_node_id(b), EdgeStyle::Dotted)
                        .with_label(contradiction.issue.clone()),
                ),
                _ => {
                    warn!(
                        contradiction_id = %contradiction.id,
                        "Dropping contradiction with unknown or missing documents"
                    );
                    dropped += 1;
                }
            }
        }

        // 5. synthesized relationships, by precedence
        let mut relationships: Vec<_> = synthesis.relationships.iter().collect();
        relationships.sort_by_key(|r| relationship_precedence(r.kind));
        for relationship in relationships {
            let a = document_node_id(&relationship.document_a);
            let b = document_node_id(&relationship.document_b);
            if !graph.contains_node(&a) || !graph.contains_node(&b) || a == b {
                warn!(
                    relationship_id = %relationship.id,
                    document_a = %relationship.document_a,
                    document_b = %relationship.document_b,
                    "Dropping relationship with unknown document"
                );
                dropped += 1;
                continue;
            }
            tally.connect(
                &mut graph,
                GraphEdge::new(a, b, relationship_style(relationship.kind))
                    .with_label(relationship.kind.as_str()),
            );
        }

        // 6. timeline -> document
        for doc in &dated {
            tally.connect(
                &mut graph,
                GraphEdge::new(format!("timeline:{}", doc.id), document_node_id(&doc.id), EdgeStyle::Dashed)
                    .with_label("created"),
            );
        }

        // 7. insight -> source documents
        for (i, insight) in synthesis.insights.iter().take(insight_count).enumerate() {
            for source in &insight.source_document_ids {
                let target = document_node_id(source);
                if graph.contains_node(&target) {
                    tally.connect(
                        &mut graph,
                        GraphEdge::new(format!("insight:{}", i + 1), target, EdgeStyle::Dotted)
                            .with_label("source"),
                    );
                }
            }
        }

        if tally.duplicates > 0 {
            debug!(duplicates = tally.duplicates, "Skipped duplicate edges");
        }

        info!(
            document_count = documents.len(),
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            dropped_records = dropped,
            "Graph built"
        );

        graph
    }
}
