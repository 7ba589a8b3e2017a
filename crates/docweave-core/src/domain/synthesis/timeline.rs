//! Timeline of document events

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::document::{DocumentId, DocumentSet};

/// Documents needed before a synthesis milestone is recorded
const MILESTONE_MIN_DOCUMENTS: usize = 3;

/// A dated event on the research timeline
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineEvent {
    pub id: String,
    pub date: DateTime<Utc>,
    pub label: String,
    pub document_ids: Vec<DocumentId>,
    pub importance: Importance,
}

/// Importance of a timeline event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Importance {
    High,
    Medium,
    Low,
}

impl Importance {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }

    /// Importance derived from a 0-100 confidence score
    pub fn from_confidence(confidence: f64) -> Self {
        if confidence >= 85.0 {
            Self::High
        } else if confidence >= 70.0 {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

impl std::fmt::Display for Importance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Build the timeline, sorted ascending by date
///
/// Events with equal dates keep insertion order.
pub(crate) fn build_timeline(documents: &DocumentSet, now: DateTime<Utc>) -> Vec<TimelineEvent> {
    let mut events: Vec<TimelineEvent> = documents
        .iter()
        .filter_map(|doc| {
            let date = doc.created_date?;
            Some(TimelineEvent {
                id: Uuid::new_v4().to_string(),
                date,
                label: format!("{} created", doc.name),
                document_ids: vec![doc.id.clone()],
                importance: Importance::from_confidence(doc.confidence_score),
            })
        })
        .collect();

    if documents.len() >= MILESTONE_MIN_DOCUMENTS {
        events.push(TimelineEvent {
            id: Uuid::new_v4().to_string(),
            date: now,
            label: format!(
                "Research synthesis milestone: {} documents analyzed",
                documents.len()
            ),
            document_ids: documents.iter().map(|d| d.id.clone()).collect(),
            importance: Importance::High,
        });
    }

    // sort_by_key is stable
    events.sort_by_key(|e| e.date);
    events
}

/// Check that events are in ascending date order
pub fn is_chronological(events: &[TimelineEvent]) -> bool {
    events.windows(2).all(|pair| pair[0].date <= pair[1].date)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::document::Document;
    use chrono::TimeZone;

    fn date(month: u32, day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, month, day, 9, 0, 0).unwrap()
    }

    #[test]
    fn test_events_sorted_with_stable_ties() {
        let docs = DocumentSet::new(vec![
            Document::new(1u64, "March", "Finance").with_created_date(date(3, 1)),
            Document::new(2u64, "January", "Finance").with_created_date(date(1, 1)),
            Document::new(3u64, "Also March", "Finance").with_created_date(date(3, 1)),
        ]);

        let events = build_timeline(&docs, date(12, 31));
        assert!(is_chronological(&events));
        assert_eq!(events[0].label, "January created");
        assert_eq!(events[1].label, "March created");
        assert_eq!(events[2].label, "Also March created");
        assert!(events[3].label.starts_with("Research synthesis milestone"));
        assert_eq!(events[3].document_ids.len(), 3);
    }

    #[test]
    fn test_undated_documents_are_skipped() {
        let docs = DocumentSet::new(vec![
            Document::new(1u64, "Dated", "Finance").with_created_date(date(2, 2)),
            Document::new(2u64, "Undated", "Finance"),
        ]);

        let events = build_timeline(&docs, date(12, 31));
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn test_milestone_is_placed_by_date() {
        let docs = DocumentSet::new(vec![
            Document::new(1u64, "A", "Finance").with_created_date(date(5, 1)),
            Document::new(2u64, "B", "Finance"),
            Document::new(3u64, "C", "Finance"),
        ]);

        let events = build_timeline(&docs, date(1, 15));
        assert_eq!(events.len(), 2);
        assert!(events[0].label.starts_with("Research synthesis milestone"));
        assert!(is_chronological(&events));
    }

    #[test]
    fn test_importance_from_confidence() {
        assert_eq!(Importance::from_confidence(92.0), Importance::High);
        assert_eq!(Importance::from_confidence(70.0), Importance::Medium);
        assert_eq!(Importance::from_confidence(10.0), Importance::Low);
    }
}
