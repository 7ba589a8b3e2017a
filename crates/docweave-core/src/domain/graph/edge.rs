//! Graph edges

use serde::{Deserialize, Serialize};

/// Line style of an edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeStyle {
    Solid,
    Dashed,
    Dotted,
}

impl EdgeStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Solid => "solid",
            Self::Dashed => "dashed",
            Self::Dotted => "dotted",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "solid" => Some(Self::Solid),
            "dashed" => Some(Self::Dashed),
            "dotted" => Some(Self::Dotted),
            _ => None,
        }
    }

    pub fn all() -> &'static [EdgeStyle] {
        &[Self::Solid, Self::Dashed, Self::Dotted]
    }
}

impl std::fmt::Display for EdgeStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An undirected connection between two nodes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphEdge {
    pub id: String,
    pub source_node_id: String,
    pub target_node_id: String,
    pub style: EdgeStyle,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl GraphEdge {
    pub fn new(source: impl Into<String>, target: impl Into<String>, style: EdgeStyle) -> Self {
        let source = source.into();
        let target = target.into();
        Self {
            id: format!("edge:{}|{}", source, target),
            source_node_id: source,
            target_node_id: target,
            style,
            label: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn key(&self) -> EdgeKey {
        EdgeKey::new(&self.source_node_id, &self.target_node_id)
    }

    pub fn is_self_loop(&self) -> bool {
        self.source_node_id == self.target_node_id
    }

    pub fn touches(&self, node_id: &str) -> bool {
        self.source_node_id == node_id || self.target_node_id == node_id
    }

    /// The endpoint opposite `node_id`, if the edge touches it
    pub fn other_end(&self, node_id: &str) -> Option<&str> {
        if self.source_node_id == node_id {
            Some(&self.target_node_id)
        } else if self.target_node_id == node_id {
            Some(&self.source_node_id)
        } else {
            None
        }
    }
}

/// Unordered node pair identifying an edge
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeKey(String, String);

impl EdgeKey {
    pub fn new(a: &str, b: &str) -> Self {
        if a <= b {
            Self(a.to_string(), b.to_string())
        } else {
            Self(b.to_string(), a.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_is_unordered() {
        let forward = GraphEdge::new("doc:1", "concept:tax", EdgeStyle::Solid);
        let backward = GraphEdge::new("concept:tax", "doc:1", EdgeStyle::Dashed);
        assert_eq!(forward.key(), backward.key());
        assert_ne!(forward.id, backward.id);
    }

    #[test]
    fn test_other_end() {
        let edge = GraphEdge::new("a", "b", EdgeStyle::Dotted).with_label("link");
        assert_eq!(edge.other_end("a"), Some("b"));
        assert_eq!(edge.other_end("b"), Some("a"));
        assert_eq!(edge.other_end("c"), None);
        assert!(!edge.is_self_loop());
        assert_eq!(edge.label.as_deref(), Some("link"));
    }

    #[test]
    fn test_label_omitted_when_absent() {
        let json = serde_json::to_value(GraphEdge::new("a", "b", EdgeStyle::Solid)).unwrap();
        assert_eq!(json["sourceNodeId"], "a");
        assert_eq!(json["style"], "solid");
        assert!(json.get("label").is_none());
    }
}
