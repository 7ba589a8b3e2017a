//! Reference catalog of named entities
//!
//! Entity nodes are drawn from this fixed catalog rather than extracted from
//! document text. Each entry demonstrates a different kind of relationship a
//! document can have with a person, organization or place.

use serde::{Deserialize, Serialize};

/// Kind of named entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Person,
    Organization,
    Location,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Person => "person",
            Self::Organization => "organization",
            Self::Location => "location",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A catalog entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogEntity {
    pub name: &'static str,
    pub kind: EntityKind,
    pub description: &'static str,
}

impl CatalogEntity {
    /// Node id slug, e.g. `acme-corporation`
    pub fn slug(&self) -> String {
        self.name
            .to_lowercase()
            .split(|c: char| !c.is_alphanumeric())
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join("-")
    }
}

const ENTITY_CATALOG: &[CatalogEntity] = &[
    CatalogEntity {
        name: "Sarah Chen",
        kind: EntityKind::Person,
        description: "Chief financial officer and author of budget reviews",
    },
    CatalogEntity {
        name: "Acme Corporation",
        kind: EntityKind::Organization,
        description: "Primary client referenced across engagements",
    },
    CatalogEntity {
        name: "New York",
        kind: EntityKind::Location,
        description: "Headquarters and main market",
    },
    CatalogEntity {
        name: "Marcus Webb",
        kind: EntityKind::Person,
        description: "Head of strategy and plan owner",
    },
    CatalogEntity {
        name: "Northwind Partners",
        kind: EntityKind::Organization,
        description: "Consulting partner cited in assessments",
    },
    CatalogEntity {
        name: "London",
        kind: EntityKind::Location,
        description: "European expansion target",
    },
    CatalogEntity {
        name: "Priya Raman",
        kind: EntityKind::Person,
        description: "Operations lead responsible for execution",
    },
    CatalogEntity {
        name: "Federal Trade Commission",
        kind: EntityKind::Organization,
        description: "Regulator named in compliance material",
    },
];

/// The full entity catalog
pub fn entity_catalog() -> &'static [CatalogEntity] {
    ENTITY_CATALOG
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_slugs_are_unique() {
        let slugs: HashSet<String> = entity_catalog().iter().map(|e| e.slug()).collect();
        assert_eq!(slugs.len(), entity_catalog().len());
        assert_eq!(entity_catalog()[7].slug(), "federal-trade-commission");
    }

    #[test]
    fn test_catalog_covers_every_kind() {
        for kind in [EntityKind::Person, EntityKind::Organization, EntityKind::Location] {
            assert!(entity_catalog().iter().any(|e| e.kind == kind));
        }
    }
}
