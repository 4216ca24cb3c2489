//! Entity and topology snapshots supplied by the host.
//!
//! The ledger never owns or mutates these: every catalog-dependent
//! computation (health, baseline, coverage) takes a snapshot as an explicit
//! parameter, so the caller controls consistency.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::link::EntityId;

/// One entity from the external catalog, as of the snapshot instant.
///
/// Only `id` and `current_version` matter to health and baseline;
/// `category`/`classification` are consulted by coverage analysis, and
/// `transient` excludes UI placeholder nodes from orphan reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityRecord {
    pub id: EntityId,
    pub current_version: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub classification: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub transient: bool,
}

impl EntityRecord {
    #[must_use]
    pub fn new(id: impl Into<EntityId>, current_version: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            current_version: current_version.into(),
            category: String::new(),
            classification: String::new(),
            transient: false,
        }
    }
}

/// A non-link structural connection from the host's topology store.
/// Consulted only by orphan detection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopologyEdge {
    pub source_id: EntityId,
    pub target_id: EntityId,
}

impl TopologyEdge {
    #[must_use]
    pub fn new(source_id: impl Into<EntityId>, target_id: impl Into<EntityId>) -> Self {
        Self {
            source_id: source_id.into(),
            target_id: target_id.into(),
        }
    }
}

/// Borrowed id → record index over an entity snapshot.
#[derive(Debug)]
pub struct EntityCatalog<'a> {
    by_id: HashMap<&'a EntityId, &'a EntityRecord>,
}

impl<'a> EntityCatalog<'a> {
    #[must_use]
    pub fn new(entities: &'a [EntityRecord]) -> Self {
        Self {
            by_id: entities.iter().map(|e| (&e.id, e)).collect(),
        }
    }

    #[must_use]
    pub fn get(&self, id: &EntityId) -> Option<&'a EntityRecord> {
        self.by_id.get(id).copied()
    }

    #[must_use]
    pub fn contains(&self, id: &EntityId) -> bool {
        self.by_id.contains_key(id)
    }

    /// Current version of the entity, if it still exists.
    #[must_use]
    pub fn current_version(&self, id: &EntityId) -> Option<&'a str> {
        self.get(id).map(|e| e.current_version.as_str())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_lookup_by_id() {
        let entities = vec![
            EntityRecord::new("n1", "1.0"),
            EntityRecord::new("n2", "2.3"),
        ];
        let catalog = EntityCatalog::new(&entities);

        assert_eq!(catalog.len(), 2);
        assert!(catalog.contains(&EntityId::from("n1")));
        assert!(!catalog.contains(&EntityId::from("n3")));
        assert_eq!(catalog.current_version(&EntityId::from("n2")), Some("2.3"));
        assert_eq!(catalog.current_version(&EntityId::from("n3")), None);
    }

    #[test]
    fn entity_record_defaults_from_minimal_json() {
        let json = r#"{"id": "n1", "current_version": "1.0"}"#;
        let entity: EntityRecord = serde_json::from_str(json).expect("deserialize");
        assert_eq!(entity.category, "");
        assert_eq!(entity.classification, "");
        assert!(!entity.transient);
    }

    #[test]
    fn transient_flag_roundtrips() {
        let mut entity = EntityRecord::new("conn-1", "1.0");
        entity.transient = true;
        let json = serde_json::to_string(&entity).expect("serialize");
        let back: EntityRecord = serde_json::from_str(&json).expect("deserialize");
        assert!(back.transient);
    }
}
