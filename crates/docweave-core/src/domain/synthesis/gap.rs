//! Research gap identification

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::document::canonicalize;

use super::CategoryGroup;

/// An area where more research material would help
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Gap {
    pub id: String,
    pub area: String,
    pub description: String,
    pub priority: Priority,
    pub suggested_sources: Vec<String>,
}

impl Gap {
    pub fn new(area: impl Into<String>, description: impl Into<String>, priority: Priority) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            area: area.into(),
            description: description.into(),
            priority,
            suggested_sources: Vec::new(),
        }
    }

    pub fn with_sources<I, S>(mut self, sources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.suggested_sources = sources.into_iter().map(Into::into).collect();
        self
    }
}

/// Gap priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "high" => Some(Self::High),
            "medium" => Some(Self::Medium),
            "low" => Some(Self::Low),
            _ => None,
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

fn sources_for(category: &str) -> Vec<&'static str> {
    match canonicalize(category).as_str() {
        "finance" => vec!["Annual reports", "Budget forecasts", "Audit findings"],
        "strategy" => vec!["Board presentations", "Strategic plans", "Competitor analyses"],
        "marketing" => vec!["Campaign reports", "Customer surveys", "Brand guidelines"],
        "operations" => vec!["Process documentation", "Capacity plans", "Vendor contracts"],
        "legal" => vec!["Contracts", "Regulatory filings", "Compliance reviews"],
        "technology" => vec!["Architecture documents", "System inventories", "Roadmaps"],
        "research" => vec!["Academic papers", "Market studies", "Interview notes"],
        _ => vec!["Internal reports", "Industry publications"],
    }
}

/// Follow-up gap suggested by an existing category
fn domain_gap(key: &str, label: &str) -> Option<Gap> {
    let gap = match key {
        "business intelligence" => Gap::new(
            "Customer Segmentation",
            format!("{} documents would benefit from deeper customer segmentation", label),
            Priority::Medium,
        )
        .with_sources(["CRM exports", "Cohort analyses", "Customer interviews"]),
        "finance" => Gap::new(
            "Risk Analysis",
            format!("{} documents lack a sensitivity or downside scenario analysis", label),
            Priority::Medium,
        )
        .with_sources(["Scenario models", "Risk registers"]),
        "marketing" => Gap::new(
            "Competitive Landscape",
            format!("{} documents do not benchmark against competitors", label),
            Priority::Low,
        )
        .with_sources(["Competitor analyses", "Analyst reports"]),
        "strategy" => Gap::new(
            "Implementation Metrics",
            format!("{} documents define goals without measurable milestones", label),
            Priority::Low,
        )
        .with_sources(["OKR trackers", "Project plans"]),
        _ => return None,
    };
    Some(gap)
}

/// Propose absent catalog categories and one domain-specific follow-up
pub(crate) fn identify_gaps(
    groups: &[CategoryGroup<'_>],
    expected: &[String],
    max_absent: usize,
) -> Vec<Gap> {
    if groups.is_empty() {
        return Vec::new();
    }

    let mut gaps: Vec<Gap> = expected
        .iter()
        .filter(|category| {
            let key = canonicalize(category);
            !key.is_empty() && !groups.iter().any(|g| g.key == key)
        })
        .take(max_absent)
        .enumerate()
        .map(|(i, category)| {
            let priority = if i == 0 { Priority::High } else { Priority::Medium };
            Gap::new(
                category.trim(),
                format!("No {} documents were provided for this research", category.trim()),
                priority,
            )
            .with_sources(sources_for(category))
        })
        .collect();

    if let Some(gap) = groups.iter().find_map(|g| domain_gap(&g.key, &g.label)) {
        gaps.push(gap);
    }

    gaps
}
