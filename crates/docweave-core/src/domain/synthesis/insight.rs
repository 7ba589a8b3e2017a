//! Synthesized insights
//!
//! An insight is a natural-language claim with a confidence score and the
//! documents it was drawn from.

use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::document::DocumentId;

use super::{CategoryGroup, sample_score};

/// A synthesized claim about the document set
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Insight {
    pub id: String,
    pub text: String,
    /// Confidence (0 to 100)
    pub confidence: u8,
    pub category: InsightCategory,
    pub source_document_ids: Vec<DocumentId>,
}

impl Insight {
    /// Create a new insight
    pub fn new(text: impl Into<String>, category: InsightCategory) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            text: text.into(),
            confidence: 0,
            category,
            source_document_ids: Vec::new(),
        }
    }

    /// Set confidence (clamped to 0-100)
    pub fn with_confidence(mut self, confidence: u8) -> Self {
        self.confidence = confidence.min(100);
        self
    }

    /// Set source documents
    pub fn with_sources(mut self, sources: Vec<DocumentId>) -> Self {
        self.source_document_ids = sources;
        self
    }
}

/// Kind of insight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightCategory {
    Trend,
    Finding,
    Recommendation,
    Risk,
}

impl InsightCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trend => "trend",
            Self::Finding => "finding",
            Self::Recommendation => "recommendation",
            Self::Risk => "risk",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "trend" => Some(Self::Trend),
            "finding" => Some(Self::Finding),
            "recommendation" => Some(Self::Recommendation),
            "risk" => Some(Self::Risk),
            _ => None,
        }
    }

    /// Insight kind that suits a document category
    fn for_category(canonical_category: &str) -> Self {
        match canonical_category {
            "finance" | "marketing" | "business intelligence" | "sales" => Self::Trend,
            "strategy" | "operations" => Self::Recommendation,
            "legal" | "compliance" | "risk" | "security" => Self::Risk,
            _ => Self::Finding,
        }
    }
}

impl std::fmt::Display for InsightCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

fn themes(keywords: &[String]) -> String {
    if keywords.is_empty() {
        "its core themes".to_string()
    } else {
        keywords.join(", ")
    }
}

fn category_text(group: &CategoryGroup<'_>, kind: InsightCategory) -> String {
    let count = group.documents.len();
    let noun = if count == 1 { "document" } else { "documents" };
    let topics = themes(&group.top_keywords(3));
    match kind {
        InsightCategory::Trend => format!(
            "{} {} {} show a consistent emphasis on {}",
            count, group.label, noun, topics
        ),
        InsightCategory::Recommendation => format!(
            "Prioritize {} when acting on the {} {} ({})",
            topics, group.label, noun, count
        ),
        InsightCategory::Risk => format!(
            "{} {} {} flag exposure around {} that needs review",
            count, group.label, noun, topics
        ),
        InsightCategory::Finding => format!(
            "{} {} {} converge on {}",
            count, group.label, noun, topics
        ),
    }
}

/// One insight per category, plus cross-category insights
pub(crate) fn synthesize_insights(
    groups: &[CategoryGroup<'_>],
    rng: &mut StdRng,
    min_confidence: u8,
) -> Vec<Insight> {
    let floor = min_confidence.clamp(60, 100);
    let mut insights = Vec::new();

    for group in groups {
        let kind = InsightCategory::for_category(&group.key);
        let confidence = sample_score(rng, floor, group.mean_confidence());
        insights.push(
            Insight::new(category_text(group, kind), kind)
                .with_confidence(confidence)
                .with_sources(group.documents.iter().map(|d| d.id.clone()).collect()),
        );
    }

    if groups.len() >= 2 {
        // Bridge the two largest categories; stable sort keeps input order on ties
        let mut ranked: Vec<&CategoryGroup<'_>> = groups.iter().collect();
        ranked.sort_by(|a, b| b.documents.len().cmp(&a.documents.len()));
        let (first, second) = (ranked[0], ranked[1]);

        let first_topics = first.top_keywords(5);
        let second_topics = second.top_keywords(5);
        let shared: Vec<String> = first_topics
            .iter()
            .filter(|k| {
                second_topics
                    .iter()
                    .any(|o| o.to_lowercase() == k.to_lowercase())
            })
            .cloned()
            .collect();

        let text = if shared.is_empty() {
            format!(
                "{} and {} documents offer complementary perspectives on the same initiative",
                first.label, second.label
            )
        } else {
            format!(
                "{} and {} documents are linked through shared themes: {}",
                first.label,
                second.label,
                shared.join(", ")
            )
        };

        let quality = (first.mean_confidence() + second.mean_confidence()) / 2.0;
        let sources = first
            .documents
            .iter()
            .chain(second.documents.iter())
            .map(|d| d.id.clone())
            .collect();
        insights.push(
            Insight::new(text, InsightCategory::Finding)
                .with_confidence(sample_score(rng, floor, quality))
                .with_sources(sources),
        );
    }

    if groups.len() >= 3 {
        let labels: Vec<&str> = groups.iter().map(|g| g.label.as_str()).collect();
        let quality = groups.iter().map(|g| g.mean_confidence()).sum::<f64>() / groups.len() as f64;
        let sources = groups
            .iter()
            .map(|g| g.representative().id.clone())
            .collect();
        insights.push(
            Insight::new(
                format!(
                    "Consolidate findings across {} categories ({}) into a single research brief",
                    groups.len(),
                    labels.join(", ")
                ),
                InsightCategory::Recommendation,
            )
            .with_confidence(sample_score(rng, floor, quality))
            .with_sources(sources),
        );
    }

    insights
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::document::{Document, DocumentSet};
    use crate::domain::synthesis::group_by_category;
    use rand::SeedableRng;

    fn set(categories: &[&str]) -> DocumentSet {
        DocumentSet::new(
            categories
                .iter()
                .enumerate()
                .map(|(i, c)| {
                    Document::new(i as u64 + 1, format!("Doc {}", i + 1), *c)
                        .with_keywords(["revenue"])
                        .with_confidence(75.0)
                })
                .collect::<Vec<_>>(),
        )
    }

    #[test]
    fn test_single_category_has_one_insight() {
        let docs = set(&["Finance", "Finance"]);
        let groups = group_by_category(&docs);
        let mut rng = StdRng::seed_from_u64(1);

        let insights = synthesize_insights(&groups, &mut rng, 60);
        assert_eq!(insights.len(), 1);
        assert_eq!(insights[0].category, InsightCategory::Trend);
        assert_eq!(insights[0].source_document_ids.len(), 2);
    }

    #[test]
    fn test_cross_category_insight() {
        let docs = set(&["Finance", "Strategy"]);
        let groups = group_by_category(&docs);
        let mut rng = StdRng::seed_from_u64(1);

        let insights = synthesize_insights(&groups, &mut rng, 60);
        assert_eq!(insights.len(), 3);
        let cross = &insights[2];
        assert_eq!(cross.category, InsightCategory::Finding);
        assert!(cross.text.contains("revenue"));
        assert_eq!(cross.source_document_ids.len(), 2);
    }

    #[test]
    fn test_three_categories_add_recommendation() {
        let docs = set(&["Finance", "Strategy", "Legal"]);
        let groups = group_by_category(&docs);
        let mut rng = StdRng::seed_from_u64(3);

        let insights = synthesize_insights(&groups, &mut rng, 60);
        assert_eq!(insights.len(), 5);
        assert_eq!(insights[2].category, InsightCategory::Risk);
        assert_eq!(insights[4].category, InsightCategory::Recommendation);
    }

    #[test]
    fn test_confidence_floor() {
        let docs = set(&["Finance", "Strategy", "Legal", "Research"]);
        let groups = group_by_category(&docs);
        let mut rng = StdRng::seed_from_u64(9);

        for insight in synthesize_insights(&groups, &mut rng, 10) {
            assert!((60..=100).contains(&insight.confidence));
        }
    }

    #[test]
    fn test_insight_category_parsing() {
        assert_eq!(InsightCategory::parse("RISK"), Some(InsightCategory::Risk));
        assert_eq!(InsightCategory::parse("unknown"), None);
    }
}
