//! Document relationships
//!
//! A relationship is a typed, strength-scored link between two documents.
//! Relationships are undirected; the pair is stored in a stable order so
//! `(A, B)` and `(B, A)` collapse into one record.

use std::collections::HashSet;

use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::document::{Document, DocumentId};

use super::contradiction::{Contradiction, Severity};
use super::{CategoryGroup, keyword_similarity, sample_score};

/// Strength floor for every synthesized relationship
const MIN_STRENGTH: u8 = 50;

/// A relationship between two documents
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Relationship {
    pub id: String,
    /// Lower of the two document ids
    pub document_a: DocumentId,
    /// Higher of the two document ids
    pub document_b: DocumentId,
    pub kind: RelationshipKind,
    /// Strength (0 to 100)
    pub strength: u8,
    pub description: String,
    pub evidence: Vec<String>,
}

impl Relationship {
    /// Create a new relationship between two documents
    pub fn new(first: DocumentId, second: DocumentId, kind: RelationshipKind) -> Self {
        let (document_a, document_b) = if first <= second {
            (first, second)
        } else {
            (second, first)
        };

        Self {
            id: Uuid::new_v4().to_string(),
            document_a,
            document_b,
            kind,
            strength: MIN_STRENGTH,
            description: String::new(),
            evidence: Vec::new(),
        }
    }

    /// Set the strength (clamped to 0-100)
    pub fn with_strength(mut self, strength: u8) -> Self {
        self.strength = strength.min(100);
        self
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the evidence
    pub fn with_evidence(mut self, evidence: Vec<String>) -> Self {
        self.evidence = evidence;
        self
    }

    /// Add a single piece of evidence
    pub fn add_evidence(&mut self, evidence: impl Into<String>) {
        self.evidence.push(evidence.into());
        // Corroboration strengthens the link
        self.strength = self.strength.saturating_add(5).min(100);
    }

    /// Check whether the relationship touches a document
    pub fn involves(&self, id: &DocumentId) -> bool {
        &self.document_a == id || &self.document_b == id
    }

    /// Unordered pair plus kind; unique within a synthesis
    pub fn key(&self) -> (DocumentId, DocumentId, RelationshipKind) {
        (self.document_a.clone(), self.document_b.clone(), self.kind)
    }
}

/// Types of relationships between documents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipKind {
    /// Documents cover the same area from different angles
    Complementary,
    /// Documents disagree
    Contradictory,
    /// One document follows the other in time
    Sequential,
    /// One document's evidence backs the other's findings
    Supporting,
}

impl RelationshipKind {
    /// Get the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Complementary => "complementary",
            Self::Contradictory => "contradictory",
            Self::Sequential => "sequential",
            Self::Supporting => "supporting",
        }
    }

    /// Parse from string
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "complementary" => Some(Self::Complementary),
            "contradictory" | "conflicting" => Some(Self::Contradictory),
            "sequential" => Some(Self::Sequential),
            "supporting" | "supports" => Some(Self::Supporting),
            _ => None,
        }
    }

    /// Get all relationship kinds
    pub fn all() -> &'static [RelationshipKind] {
        &[
            Self::Complementary,
            Self::Contradictory,
            Self::Sequential,
            Self::Supporting,
        ]
    }
}

impl std::fmt::Display for RelationshipKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Insertion-ordered relationship collection
///
/// Holds at most one relationship of each kind per unordered document pair.
#[derive(Debug, Clone, Default)]
pub struct RelationshipSet {
    relationships: Vec<Relationship>,
    keys: HashSet<(DocumentId, DocumentId, RelationshipKind)>,
}

impl RelationshipSet {
    /// Insert a relationship; returns false for self-links and duplicates
    pub fn insert(&mut self, relationship: Relationship) -> bool {
        if relationship.document_a == relationship.document_b {
            return false;
        }
        if !self.keys.insert(relationship.key()) {
            return false;
        }
        self.relationships.push(relationship);
        true
    }

    pub fn len(&self) -> usize {
        self.relationships.len()
    }

    pub fn is_empty(&self) -> bool {
        self.relationships.is_empty()
    }

    pub fn into_vec(self) -> Vec<Relationship> {
        self.relationships
    }
}

/// Most keyword-similar pair in a group; earliest pair wins ties
fn closest_pair<'a>(documents: &[&'a Document]) -> (&'a Document, &'a Document, f64) {
    let mut best = (documents[0], documents[1], keyword_similarity(documents[0], documents[1]));
    for i in 0..documents.len() {
        for j in (i + 1)..documents.len() {
            let similarity = keyword_similarity(documents[i], documents[j]);
            if similarity > best.2 {
                best = (documents[i], documents[j], similarity);
            }
        }
    }
    best
}

fn shared_keywords(a: &Document, b: &Document) -> Vec<String> {
    a.keywords
        .iter()
        .filter(|k| {
            b.keywords
                .iter()
                .any(|o| o.trim().to_lowercase() == k.trim().to_lowercase())
        })
        .cloned()
        .collect()
}

/// Complementary, supporting and sequential relationships
pub(crate) fn synthesize_relationships(
    groups: &[CategoryGroup<'_>],
    rng: &mut StdRng,
    out: &mut RelationshipSet,
) {
    // Complementary: one per category with at least two members
    for group in groups.iter().filter(|g| g.documents.len() >= 2) {
        let (a, b, similarity) = closest_pair(&group.documents);
        let mut evidence = vec![format!("Both documents are categorized as {}", group.label)];
        evidence.extend(
            shared_keywords(a, b)
                .into_iter()
                .map(|k| format!("Shared keyword: {}", k)),
        );

        out.insert(
            Relationship::new(a.id.clone(), b.id.clone(), RelationshipKind::Complementary)
                .with_strength(sample_score(rng, MIN_STRENGTH, similarity))
                .with_description(format!(
                    "'{}' and '{}' cover complementary aspects of {}",
                    a.name, b.name, group.label
                ))
                .with_evidence(evidence),
        );
    }

    // Supporting: one per pair of populated categories
    for (i, left) in groups.iter().enumerate() {
        for right in &groups[i + 1..] {
            let a = left.representative();
            let b = right.representative();
            let quality = (a.confidence_fraction() + b.confidence_fraction()) / 2.0;
            let mut evidence = vec![format!(
                "Highest-confidence {} and {} documents",
                left.label, right.label
            )];
            evidence.extend(
                shared_keywords(a, b)
                    .into_iter()
                    .map(|k| format!("Shared keyword: {}", k)),
            );

            out.insert(
                Relationship::new(a.id.clone(), b.id.clone(), RelationshipKind::Supporting)
                    .with_strength(sample_score(rng, MIN_STRENGTH, quality))
                    .with_description(format!(
                        "{} evidence in '{}' supports the {} findings in '{}'",
                        left.label, a.name, right.label, b.name
                    ))
                    .with_evidence(evidence),
            );
        }
    }

    // Sequential: consecutive dated documents inside a category
    for group in groups {
        let mut dated: Vec<&Document> = group
            .documents
            .iter()
            .copied()
            .filter(|d| d.created_date.is_some())
            .collect();
        dated.sort_by_key(|d| d.created_date);

        for pair in dated.windows(2) {
            let (earlier, later) = (pair[0], pair[1]);
            let (Some(from), Some(to)) = (earlier.created_date, later.created_date) else {
                continue;
            };
            let gap_days = (to - from).num_days().max(0) as f64;
            // Closer in time means a tighter sequence
            let closeness = 1.0 / (1.0 + gap_days / 30.0);

            out.insert(
                Relationship::new(earlier.id.clone(), later.id.clone(), RelationshipKind::Sequential)
                    .with_strength(sample_score(rng, MIN_STRENGTH, closeness))
                    .with_description(format!("'{}' precedes '{}'", earlier.name, later.name))
                    .with_evidence(vec![format!(
                        "Created {} and {} ({} days apart)",
                        from.format("%Y-%m-%d"),
                        to.format("%Y-%m-%d"),
                        gap_days
                    )]),
            );
        }
    }
}

/// One contradictory relationship per contradiction
pub(crate) fn contradictory_relationships(contradictions: &[Contradiction], out: &mut RelationshipSet) {
    for contradiction in contradictions {
        let Some((a, b)) = contradiction.primary_pair() else {
            continue;
        };
        let strength = match contradiction.severity {
            Severity::Critical => 90,
            Severity::Moderate => 70,
            Severity::Minor => 55,
        };

        out.insert(
            Relationship::new(a.clone(), b.clone(), RelationshipKind::Contradictory)
                .with_strength(strength)
                .with_description(contradiction.issue.clone())
                .with_evidence(vec![contradiction.description.clone()]),
        );
    }
}
