//! Analyzed documents supplied by the document record store
//!
//! Documents are the engine's only input. They are produced by an external
//! analysis step and never mutated here.

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::error::{Error, Result};

/// Identifier of a document
///
/// The record store hands out either numeric or string ids; both are
/// normalized to their string form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for DocumentId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<u64> for DocumentId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

impl<'de> Deserialize<'de> for DocumentId {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Number(u64),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(text) => Self(text),
            RawId::Number(number) => Self(number.to_string()),
        })
    }
}

/// An analyzed input record with extracted metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: DocumentId,
    pub name: String,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub word_count: u64,
    /// Extraction confidence (0 to 100)
    #[serde(default)]
    pub confidence_score: f64,
    #[serde(default)]
    pub created_date: Option<DateTime<Utc>>,
}

fn default_category() -> String {
    "Uncategorized".to_string()
}

impl Document {
    /// Create a new document with empty metadata
    pub fn new(id: impl Into<DocumentId>, name: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category: category.into(),
            keywords: Vec::new(),
            word_count: 0,
            confidence_score: 0.0,
            created_date: None,
        }
    }

    /// Set the keywords
    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    /// Set the word count
    pub fn with_word_count(mut self, word_count: u64) -> Self {
        self.word_count = word_count;
        self
    }

    /// Set the confidence score (clamped to 0-100)
    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence_score = confidence.clamp(0.0, 100.0);
        self
    }

    /// Set the creation date
    pub fn with_created_date(mut self, date: DateTime<Utc>) -> Self {
        self.created_date = Some(date);
        self
    }

    /// Canonical form of the category, used for grouping and rule matching
    pub fn canonical_category(&self) -> String {
        canonicalize(&self.category)
    }

    /// Confidence as a unit fraction
    pub fn confidence_fraction(&self) -> f64 {
        (self.confidence_score / 100.0).clamp(0.0, 1.0)
    }
}

/// Canonicalize a term for deduplication
///
/// Lowercases, drops punctuation and collapses whitespace.
pub fn canonicalize(term: &str) -> String {
    term.to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// An ordered set of documents with unique ids
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct DocumentSet {
    documents: Vec<Document>,
}

impl DocumentSet {
    /// Build a set from records in input order
    ///
    /// A repeated id replaces the earlier record's content but keeps the
    /// earlier record's position, so the layout order stays stable.
    pub fn new(records: impl IntoIterator<Item = Document>) -> Self {
        let mut documents: Vec<Document> = Vec::new();
        let mut positions: HashMap<DocumentId, usize> = HashMap::new();

        for mut record in records {
            record.confidence_score = if record.confidence_score.is_finite() {
                record.confidence_score.clamp(0.0, 100.0)
            } else {
                0.0
            };

            match positions.get(&record.id) {
                Some(&index) => {
                    debug!(document_id = %record.id, "Duplicate document id, keeping later record");
                    documents[index] = record;
                }
                None => {
                    positions.insert(record.id.clone(), documents.len());
                    documents.push(record);
                }
            }
        }

        Self { documents }
    }

    /// Parse a document set from JSON text
    pub fn from_json_str(json: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(json)
            .map_err(|e| Error::invalid_documents(format!("not valid JSON ({})", e)))?;
        Self::from_json_value(value)
    }

    /// Parse a document set from a JSON value
    ///
    /// Only an absent or type-invalid set is an error; an empty array is a
    /// valid, empty set.
    pub fn from_json_value(value: serde_json::Value) -> Result<Self> {
        match value {
            serde_json::Value::Null => Err(Error::invalid_documents("document set is missing")),
            serde_json::Value::Array(_) => {
                let records: Vec<Document> = serde_json::from_value(value)
                    .map_err(|e| Error::invalid_documents(e.to_string()))?;
                Ok(Self::new(records))
            }
            other => Err(Error::invalid_documents(format!(
                "expected an array, found {}",
                json_type_name(&other)
            ))),
        }
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Document> {
        self.documents.iter()
    }

    pub fn as_slice(&self) -> &[Document] {
        &self.documents
    }

    /// Find a document by id
    pub fn get(&self, id: &DocumentId) -> Option<&Document> {
        self.documents.iter().find(|d| &d.id == id)
    }

    pub fn contains(&self, id: &DocumentId) -> bool {
        self.get(id).is_some()
    }

    /// Seed derived from the set's content
    ///
    /// Hashes ids, names, categories and keywords in order, so the same set
    /// always yields the same seed.
    pub fn content_seed(&self) -> u64 {
        let mut hasher = Sha256::new();
        for doc in &self.documents {
            hasher.update(doc.id.as_str().as_bytes());
            hasher.update([0u8]);
            hasher.update(doc.name.as_bytes());
            hasher.update([0u8]);
            hasher.update(doc.category.as_bytes());
            for keyword in &doc.keywords {
                hasher.update([1u8]);
                hasher.update(keyword.as_bytes());
            }
            hasher.update([2u8]);
        }
        let digest = hasher.finalize();
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(&digest[..8]);
        u64::from_le_bytes(bytes)
    }
}

impl<'a> IntoIterator for &'a DocumentSet {
    type Item = &'a Document;
    type IntoIter = std::slice::Iter<'a, Document>;

    fn into_iter(self) -> Self::IntoIter {
        self.documents.iter()
    }
}

impl FromIterator<Document> for DocumentSet {
    fn from_iter<T: IntoIterator<Item = Document>>(iter: T) -> Self {
        Self::new(iter)
    }
}

fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_numeric_and_string_ids() {
        let json = r#"[
            {"id": 1, "name": "Q3 Budget", "category": "Finance", "wordCount": 1200, "confidenceScore": 88},
            {"id": "doc-b", "name": "Roadmap", "category": "Strategy", "keywords": ["growth"]}
        ]"#;

        let set = DocumentSet::from_json_str(json).unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.as_slice()[0].id.as_str(), "1");
        assert_eq!(set.as_slice()[0].word_count, 1200);
        assert_eq!(set.as_slice()[1].id.as_str(), "doc-b");
        assert_eq!(set.as_slice()[1].keywords, vec!["growth"]);
    }

    #[test]
    fn test_missing_or_wrong_type_is_error() {
        assert!(matches!(
            DocumentSet::from_json_str("null"),
            Err(Error::InvalidDocumentSet(_))
        ));
        assert!(matches!(
            DocumentSet::from_json_str(r#"{"id": 1}"#),
            Err(Error::InvalidDocumentSet(_))
        ));
        assert!(matches!(
            DocumentSet::from_json_str(r#"[{"id": 1, "name": 5}]"#),
            Err(Error::InvalidDocumentSet(_))
        ));
    }

    #[test]
    fn test_empty_array_is_valid() {
        let set = DocumentSet::from_json_str("[]").unwrap();
        assert!(set.is_empty());
    }

    #[test]
    fn test_duplicate_ids_later_record_wins() {
        let set = DocumentSet::new(vec![
            Document::new(1u64, "Draft", "Finance"),
            Document::new(2u64, "Plan", "Strategy"),
            Document::new(1u64, "Final", "Finance"),
        ]);

        assert_eq!(set.len(), 2);
        assert_eq!(set.as_slice()[0].name, "Final");
        assert_eq!(set.as_slice()[1].name, "Plan");
    }

    #[test]
    fn test_confidence_is_clamped() {
        let mut doc = Document::new(1u64, "A", "Finance");
        doc.confidence_score = 140.0;
        let set = DocumentSet::new(vec![doc]);
        assert_eq!(set.as_slice()[0].confidence_score, 100.0);
    }

    #[test]
    fn test_content_seed_is_stable() {
        let build = || {
            DocumentSet::new(vec![
                Document::new(1u64, "A", "Finance").with_keywords(["budget"]),
                Document::new(2u64, "B", "Strategy"),
            ])
        };
        assert_eq!(build().content_seed(), build().content_seed());

        let other = DocumentSet::new(vec![Document::new(1u64, "A", "Legal")]);
        assert_ne!(build().content_seed(), other.content_seed());
    }

    #[test]
    fn test_canonicalize() {
        assert_eq!(canonicalize("Business  Intelligence"), "business intelligence");
        assert_eq!(canonicalize("R&D"), "rd");
        assert_eq!(canonicalize("  Finance "), "finance");
    }
}
