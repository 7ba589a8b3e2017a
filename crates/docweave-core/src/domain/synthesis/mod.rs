//! Relationship synthesis across a document set
//!
//! Derives insights, pairwise relationships, contradictions, a timeline and
//! research gaps from analyzed documents. The heuristics are category-driven
//! placeholders for real language understanding:
//!
//! - **Insights**: one per populated category, one cross-category insight when
//!   two or more categories are present
//! - **Relationships**: `complementary` inside a category, `supporting` across
//!   categories, `sequential` between dated documents, `contradictory` per
//!   contradiction
//! - **Contradictions**: configurable category pairs likely to conflict
//! - **Timeline**: one event per dated document plus a synthesis milestone
//! - **Gaps**: absent catalog categories and one domain-specific follow-up
//!
//! Sampling is seeded, either explicitly or from a digest of the document
//! content, so the same input always produces the same synthesis.

mod contradiction;
mod gap;
mod insight;
mod relationship;
mod timeline;

pub use contradiction::{Contradiction, ContradictionRule, Severity};
pub use gap::{Gap, Priority};
pub use insight::{Insight, InsightCategory};
pub use relationship::{Relationship, RelationshipKind, RelationshipSet};
pub use timeline::{Importance, TimelineEvent, is_chronological};

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rand::prelude::*;
use rand_distr::{Beta, Distribution};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::SynthesisConfig;

use super::document::{Document, DocumentSet, canonicalize};

/// Everything synthesized from one document set
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SynthesisResult {
    pub insights: Vec<Insight>,
    pub relationships: Vec<Relationship>,
    pub contradictions: Vec<Contradiction>,
    pub timeline: Vec<TimelineEvent>,
    pub gaps: Vec<Gap>,
}

impl SynthesisResult {
    /// Check whether nothing was synthesized
    pub fn is_empty(&self) -> bool {
        self.insights.is_empty()
            && self.relationships.is_empty()
            && self.contradictions.is_empty()
            && self.timeline.is_empty()
            && self.gaps.is_empty()
    }

    /// Relationships of one kind
    pub fn relationships_of(&self, kind: RelationshipKind) -> impl Iterator<Item = &Relationship> {
        self.relationships.iter().filter(move |r| r.kind == kind)
    }
}

/// Documents grouped by canonical category, in first-appearance order
#[derive(Debug, Clone)]
pub(crate) struct CategoryGroup<'a> {
    /// Canonical category name
    pub key: String,
    /// Category as first spelled in the input
    pub label: String,
    pub documents: Vec<&'a Document>,
}

impl CategoryGroup<'_> {
    /// Highest-confidence member; earliest wins ties
    pub fn representative(&self) -> &Document {
        let mut best = self.documents[0];
        for doc in &self.documents[1..] {
            if doc.confidence_score > best.confidence_score {
                best = doc;
            }
        }
        best
    }

    /// Mean member confidence as a unit fraction
    pub fn mean_confidence(&self) -> f64 {
        let total: f64 = self.documents.iter().map(|d| d.confidence_fraction()).sum();
        total / self.documents.len() as f64
    }

    /// Most frequent keywords across members
    pub fn top_keywords(&self, limit: usize) -> Vec<String> {
        let mut counts: Vec<(String, String, usize)> = Vec::new();
        for doc in &self.documents {
            for keyword in &doc.keywords {
                let key = canonicalize(keyword);
                if key.is_empty() {
                    continue;
                }
                match counts.iter_mut().find(|(k, _, _)| *k == key) {
                    Some(entry) => entry.2 += 1,
                    None => counts.push((key, keyword.trim().to_string(), 1)),
                }
            }
        }
        // Stable sort keeps first-appearance order among equal counts
        counts.sort_by(|a, b| b.2.cmp(&a.2));
        counts.into_iter().take(limit).map(|(_, label, _)| label).collect()
    }
}

pub(crate) fn group_by_category(documents: &DocumentSet) -> Vec<CategoryGroup<'_>> {
    let mut groups: Vec<CategoryGroup<'_>> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for doc in documents {
        let key = doc.canonical_category();
        match index.get(&key) {
            Some(&i) => groups[i].documents.push(doc),
            None => {
                index.insert(key.clone(), groups.len());
                groups.push(CategoryGroup {
                    key,
                    label: doc.category.trim().to_string(),
                    documents: vec![doc],
                });
            }
        }
    }

    groups
}

/// Sample a score in `[floor, 100]`, skewed upward by `quality` (0.0 to 1.0)
pub(crate) fn sample_score(rng: &mut StdRng, floor: u8, quality: f64) -> u8 {
    let quality = quality.clamp(0.0, 1.0);
    let draw = match Beta::new(2.0 + 4.0 * quality, 2.0) {
        Ok(dist) => dist.sample(rng),
        Err(_) => 0.5,
    };
    let floor = f64::from(floor.min(100));
    let score = floor + (100.0 - floor) * draw;
    score.round().clamp(floor, 100.0) as u8
}

/// Keyword-set Jaccard similarity of two documents
pub(crate) fn keyword_similarity(a: &Document, b: &Document) -> f64 {
    let left: std::collections::HashSet<String> =
        a.keywords.iter().map(|k| canonicalize(k)).filter(|k| !k.is_empty()).collect();
    let right: std::collections::HashSet<String> =
        b.keywords.iter().map(|k| canonicalize(k)).filter(|k| !k.is_empty()).collect();
    let union = left.union(&right).count();
    if union == 0 {
        return 0.0;
    }
    left.intersection(&right).count() as f64 / union as f64
}

/// Relationship synthesizer
///
/// Stateless apart from its configuration; every call regenerates the full
/// synthesis from scratch.
#[derive(Debug, Clone)]
pub struct Synthesizer {
    config: SynthesisConfig,
    seed: Option<u64>,
    reference_time: Option<DateTime<Utc>>,
}

impl Default for Synthesizer {
    fn default() -> Self {
        Self::new(SynthesisConfig::default())
    }
}

impl Synthesizer {
    /// Create a synthesizer from configuration
    pub fn new(config: SynthesisConfig) -> Self {
        let seed = config.seed;
        Self {
            config,
            seed,
            reference_time: None,
        }
    }

    /// Use a fixed seed instead of one derived from document content
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Date the synthesis milestone at a fixed time
    pub fn with_reference_time(mut self, time: DateTime<Utc>) -> Self {
        self.reference_time = Some(time);
        self
    }

    pub fn config(&self) -> &SynthesisConfig {
        &self.config
    }

    /// Synthesize insights, relationships, contradictions, timeline and gaps
    ///
    /// An empty document set yields an empty result, never an error.
    pub fn synthesize(&self, documents: &DocumentSet) -> SynthesisResult {
        if documents.is_empty() {
            debug!("No documents to synthesize");
            return SynthesisResult::default();
        }

        let seed = self.seed.unwrap_or_else(|| documents.content_seed());
        let mut rng = StdRng::seed_from_u64(seed);
        let groups = group_by_category(documents);
        let now = self.reference_time.unwrap_or_else(Utc::now);

        let insights = insight::synthesize_insights(&groups, &mut rng, self.config.min_confidence);
        let contradictions =
            contradiction::detect_contradictions(&groups, &self.config.contradiction_rules);

        let mut relationships = RelationshipSet::default();
        relationship::synthesize_relationships(&groups, &mut rng, &mut relationships);
        relationship::contradictory_relationships(&contradictions, &mut relationships);

        let timeline = timeline::build_timeline(documents, now);
        let gaps = gap::identify_gaps(
            &groups,
            &self.config.expected_categories,
            self.config.max_absent_category_gaps,
        );

        let result = SynthesisResult {
            insights,
            relationships: relationships.into_vec(),
            contradictions,
            timeline,
            gaps,
        };

        info!(
            document_count = documents.len(),
            categories = groups.len(),
            insights = result.insights.len(),
            relationships = result.relationships.len(),
            contradictions = result.contradictions.len(),
            gaps = result.gaps.len(),
            "Synthesis complete"
        );

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::document::Document;

    fn sample_set() -> DocumentSet {
        DocumentSet::new(vec![
            Document::new(1u64, "Q3 Budget", "Finance")
                .with_keywords(["budget", "revenue"])
                .with_confidence(90.0),
            Document::new(2u64, "Cost Review", "finance")
                .with_keywords(["budget", "costs"])
                .with_confidence(70.0),
            Document::new(3u64, "Growth Plan", "Strategy")
                .with_keywords(["growth", "revenue"])
                .with_confidence(80.0),
        ])
    }

    #[test]
    fn test_empty_input_yields_empty_result() {
        let result = Synthesizer::default().synthesize(&DocumentSet::default());
        assert!(result.is_empty());
    }

    #[test]
    fn test_group_by_category_is_case_insensitive() {
        let set = sample_set();
        let groups = group_by_category(&set);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].label, "Finance");
        assert_eq!(groups[0].documents.len(), 2);
        assert_eq!(groups[0].representative().name, "Q3 Budget");
        assert_eq!(groups[0].top_keywords(1), vec!["budget"]);
    }

    #[test]
    fn test_sample_score_respects_floor() {
        let mut rng = StdRng::seed_from_u64(11);
        for quality in [0.0, 0.3, 0.7, 1.0] {
            for _ in 0..50 {
                let score = sample_score(&mut rng, 60, quality);
                assert!((60..=100).contains(&score));
            }
        }
    }

    #[test]
    fn test_same_input_same_synthesis() {
        let set = sample_set();
        let synthesizer = Synthesizer::default();
        let a = synthesizer.synthesize(&set);
        let b = synthesizer.synthesize(&set);

        let confidences = |r: &SynthesisResult| r.insights.iter().map(|i| i.confidence).collect::<Vec<_>>();
        let strengths = |r: &SynthesisResult| {
            r.relationships
                .iter()
                .map(|rel| (rel.document_a.clone(), rel.document_b.clone(), rel.kind, rel.strength))
                .collect::<Vec<_>>()
        };
        assert_eq!(confidences(&a), confidences(&b));
        assert_eq!(strengths(&a), strengths(&b));
    }

    #[test]
    fn test_keyword_similarity() {
        let a = Document::new(1u64, "A", "X").with_keywords(["Budget", "revenue"]);
        let b = Document::new(2u64, "B", "X").with_keywords(["budget", "growth"]);
        let similarity = keyword_similarity(&a, &b);
        assert!((similarity - 1.0 / 3.0).abs() < 1e-9);

        let empty = Document::new(3u64, "C", "X");
        assert_eq!(keyword_similarity(&empty, &empty), 0.0);
    }
}
