//! Contradiction detection between document categories
//!
//! Contradictions are flagged from configurable rules naming category pairs
//! that are likely to disagree. A rule fires when both of its categories are
//! present in the document set.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::document::{DocumentId, canonicalize};

use super::CategoryGroup;

/// A flagged conflict between documents that needs human reconciliation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contradiction {
    pub id: String,
    /// At least two documents; the first two are one from each side
    pub document_ids: Vec<DocumentId>,
    pub issue: String,
    pub severity: Severity,
    pub description: String,
    pub recommendation: String,
}

impl Contradiction {
    /// The representative document of each side
    pub fn primary_pair(&self) -> Option<(&DocumentId, &DocumentId)> {
        match self.document_ids.as_slice() {
            [a, b, ..] => Some((a, b)),
            _ => None,
        }
    }
}

/// How serious a contradiction is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Financial or quantitative disagreement
    Critical,
    #[default]
    Moderate,
    /// Stylistic or naming inconsistency
    Minor,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::Moderate => "moderate",
            Self::Minor => "minor",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "critical" => Some(Self::Critical),
            "moderate" => Some(Self::Moderate),
            "minor" => Some(Self::Minor),
            _ => None,
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A category pair that is likely to conflict
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContradictionRule {
    pub left: String,
    pub right: String,
    pub issue: String,
    #[serde(default)]
    pub severity: Severity,
    pub description: String,
    pub recommendation: String,
}

impl ContradictionRule {
    pub fn new(
        left: impl Into<String>,
        right: impl Into<String>,
        issue: impl Into<String>,
        severity: Severity,
    ) -> Self {
        Self {
            left: left.into(),
            right: right.into(),
            issue: issue.into(),
            severity,
            description: String::new(),
            recommendation: String::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_recommendation(mut self, recommendation: impl Into<String>) -> Self {
        self.recommendation = recommendation.into();
        self
    }

    /// Built-in rule catalog
    pub fn defaults() -> Vec<Self> {
        vec![
            Self::new("Finance", "Strategy", "Budget allocation vs. strategic priorities", Severity::Critical)
                .with_description("Financial projections and strategic targets rely on different spending assumptions")
                .with_recommendation("Reconcile the budget figures with the strategy owners before committing to targets"),
            Self::new("Finance", "Marketing", "Revenue projection mismatch", Severity::Critical)
                .with_description("Marketing growth estimates diverge from the financial revenue forecast")
                .with_recommendation("Align on a single revenue model and document its assumptions"),
            Self::new("Strategy", "Operations", "Execution timeline conflict", Severity::Moderate)
                .with_description("Strategic milestones assume delivery dates operations has not committed to")
                .with_recommendation("Review milestone dates jointly with operations leads"),
            Self::new("Marketing", "Strategy", "Target market definition", Severity::Moderate)
                .with_description("The documents describe different primary customer segments")
                .with_recommendation("Agree on a shared segment definition"),
            Self::new("Legal", "Marketing", "Compliance of public claims", Severity::Moderate)
                .with_description("Marketing messaging may exceed what legal review permits")
                .with_recommendation("Route public claims through legal review"),
            Self::new("Technology", "Operations", "Inconsistent system naming", Severity::Minor)
                .with_description("The same systems are referred to by different names")
                .with_recommendation("Adopt a shared glossary of system names"),
        ]
    }
}

/// Apply rules to the grouped documents
pub(crate) fn detect_contradictions(
    groups: &[CategoryGroup<'_>],
    rules: &[ContradictionRule],
) -> Vec<Contradiction> {
    let mut contradictions = Vec::new();

    for rule in rules {
        let left_key = canonicalize(&rule.left);
        let right_key = canonicalize(&rule.right);
        if left_key == right_key {
            continue;
        }

        let left = groups.iter().find(|g| g.key == left_key);
        let right = groups.iter().find(|g| g.key == right_key);
        let (Some(left), Some(right)) = (left, right) else {
            continue;
        };

        let left_rep = left.representative();
        let right_rep = right.representative();
        let mut document_ids = vec![left_rep.id.clone(), right_rep.id.clone()];
        document_ids.extend(
            left.documents
                .iter()
                .chain(right.documents.iter())
                .filter(|d| d.id != left_rep.id && d.id != right_rep.id)
                .map(|d| d.id.clone()),
        );

        let description = if rule.description.is_empty() {
            format!("{} and {} documents disagree", left.label, right.label)
        } else {
            rule.description.clone()
        };

        contradictions.push(Contradiction {
            id: Uuid::new_v4().to_string(),
            document_ids,
            issue: rule.issue.clone(),
            severity: rule.severity,
            description,
            recommendation: rule.recommendation.clone(),
        });
    }

    contradictions
}
