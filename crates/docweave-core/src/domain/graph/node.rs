//! Graph nodes

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::document::DocumentId;
use crate::domain::synthesis::InsightCategory;

use super::catalog::EntityKind;
use super::geometry::Point;

/// Kind of graph node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Document,
    Concept,
    Entity,
    Timeline,
    Insight,
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Document => "document",
            Self::Concept => "concept",
            Self::Entity => "entity",
            Self::Timeline => "timeline",
            Self::Insight => "insight",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "document" | "documents" | "doc" => Some(Self::Document),
            "concept" | "concepts" => Some(Self::Concept),
            "entity" | "entities" => Some(Self::Entity),
            "timeline" => Some(Self::Timeline),
            "insight" | "insights" => Some(Self::Insight),
            _ => None,
        }
    }

    pub fn all() -> &'static [NodeKind] {
        &[
            Self::Document,
            Self::Concept,
            Self::Entity,
            Self::Timeline,
            Self::Insight,
        ]
    }

    /// Single-character marker used by text renderers
    pub fn icon(&self) -> char {
        match self {
            Self::Document => 'D',
            Self::Concept => 'C',
            Self::Entity => 'E',
            Self::Timeline => 'T',
            Self::Insight => 'I',
        }
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Kind-specific node data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodePayload {
    #[serde(rename_all = "camelCase")]
    Document {
        document_id: DocumentId,
        category: String,
        keywords: Vec<String>,
        word_count: u64,
        confidence: f64,
    },
    #[serde(rename_all = "camelCase")]
    Concept {
        term: String,
        document_ids: Vec<DocumentId>,
    },
    #[serde(rename_all = "camelCase")]
    Entity {
        entity_kind: EntityKind,
        description: String,
    },
    #[serde(rename_all = "camelCase")]
    Timeline {
        document_id: DocumentId,
        date: DateTime<Utc>,
    },
    #[serde(rename_all = "camelCase")]
    Insight {
        text: String,
        confidence: u8,
        category: InsightCategory,
    },
}

impl NodePayload {
    pub fn kind(&self) -> NodeKind {
        match self {
            Self::Document { .. } => NodeKind::Document,
            Self::Concept { .. } => NodeKind::Concept,
            Self::Entity { .. } => NodeKind::Entity,
            Self::Timeline { .. } => NodeKind::Timeline,
            Self::Insight { .. } => NodeKind::Insight,
        }
    }

    /// Descriptive text searched alongside the label
    pub fn text(&self) -> String {
        match self {
            Self::Document {
                category, keywords, ..
            } => {
                let mut parts = vec![category.clone()];
                parts.extend(keywords.iter().cloned());
                parts.join(" ")
            }
            Self::Concept { term, .. } => term.clone(),
            Self::Entity {
                entity_kind,
                description,
            } => format!("{} {}", entity_kind, description),
            Self::Timeline { date, .. } => date.format("%Y-%m-%d").to_string(),
            Self::Insight { text, category, .. } => format!("{} {}", category, text),
        }
    }

    /// Documents this payload refers to
    pub fn document_ids(&self) -> Vec<&DocumentId> {
        match self {
            Self::Document { document_id, .. } | Self::Timeline { document_id, .. } => {
                vec![document_id]
            }
            Self::Concept { document_ids, .. } => document_ids.iter().collect(),
            Self::Entity { .. } | Self::Insight { .. } => Vec::new(),
        }
    }
}

/// A node in the knowledge graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphNode {
    pub id: String,
    pub kind: NodeKind,
    pub label: String,
    pub position: Point,
    pub payload: NodePayload,
}

impl GraphNode {
    /// Create a node; its kind follows the payload
    pub fn new(id: impl Into<String>, label: impl Into<String>, position: Point, payload: NodePayload) -> Self {
        Self {
            id: id.into(),
            kind: payload.kind(),
            label: label.into(),
            position,
            payload,
        }
    }

    /// Case-insensitive match over label and payload text
    ///
    /// An empty term matches every node.
    pub fn matches(&self, term: &str) -> bool {
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            return true;
        }
        self.label.to_lowercase().contains(&term) || self.payload.text().to_lowercase().contains(&term)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn concept() -> GraphNode {
        GraphNode::new(
            "concept:revenue",
            "Revenue",
            Point::new(10.0, 10.0),
            NodePayload::Concept {
                term: "revenue growth".to_string(),
                document_ids: vec![DocumentId::from(1u64), DocumentId::from(2u64)],
            },
        )
    }

    #[test]
    fn test_kind_follows_payload() {
        assert_eq!(concept().kind, NodeKind::Concept);
    }

    #[test]
    fn test_matches_label_and_payload() {
        let node = concept();
        assert!(node.matches("REV"));
        assert!(node.matches("growth"));
        assert!(node.matches(""));
        assert!(node.matches("   "));
        assert!(!node.matches("legal"));
    }

    #[test]
    fn test_kind_parsing() {
        assert_eq!(NodeKind::parse("Entities"), Some(NodeKind::Entity));
        assert_eq!(NodeKind::parse("edge"), None);
        assert_eq!(NodeKind::all().len(), 5);
        for kind in NodeKind::all() {
            assert_eq!(NodeKind::parse(kind.as_str()), Some(*kind));
        }
    }

    #[test]
    fn test_serialized_shape() {
        let json = serde_json::to_value(concept()).unwrap();
        assert_eq!(json["kind"], "concept");
        assert_eq!(json["position"]["x"], 10.0);
        assert_eq!(json["payload"]["concept"]["documentIds"][1], "2");
    }
}
