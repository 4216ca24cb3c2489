//! # reqtrace-ledger
//!
//! The link store: an in-memory, insertion-ordered collection of
//! [`LinkRecord`]s with CRUD, pin/unpin, the direction-aware query layer,
//! and the bulk baseline operation.
//!
//! The store is the single source of truth for links. It is single-writer
//! and synchronous: no interior locking, no I/O, no suspension points. A
//! host embedding it in a multi-threaded program wraps it in its own mutex
//! or gives it to one owning task.
//!
//! Mutators never panic on unknown ids and never throw; they return
//! [`Mutation`] so a host can distinguish "applied" from "nothing matched"
//! while every operation stays idempotent.

use chrono::Utc;
use tracing::debug;

use reqtrace_core::{
    EntityCatalog, EntityId, LinkEndpoint, LinkMetadata, LinkRecord, LinkSide, LinkStatus, LinkType,
};

/// Outcome of a mutating store operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use = "a NotFound result usually indicates a typo or a stale id"]
pub enum Mutation {
    /// The targeted record existed and the change was applied.
    Applied,
    /// No record matched; the store is unchanged.
    NotFound,
}

impl Mutation {
    #[must_use]
    pub fn is_applied(self) -> bool {
        matches!(self, Self::Applied)
    }
}

/// Input for [`LinkStore::add_link`]. Everything except the endpoints and
/// kind is optional provenance.
#[derive(Debug, Clone)]
pub struct LinkDraft {
    pub source: LinkEndpoint,
    pub target: LinkEndpoint,
    pub link_type: LinkType,
    pub notes: String,
    pub created_by: String,
}

impl LinkDraft {
    #[must_use]
    pub fn new(source: LinkEndpoint, target: LinkEndpoint, link_type: LinkType) -> Self {
        Self {
            source,
            target,
            link_type,
            notes: String::new(),
            created_by: String::new(),
        }
    }

    #[must_use]
    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    #[must_use]
    pub fn created_by(mut self, created_by: impl Into<String>) -> Self {
        self.created_by = created_by.into();
        self
    }
}

/// Partial update for [`LinkStore::update_link`]: `Some` fields are
/// shallow-merged into the record, `None` fields are left alone.
#[derive(Debug, Clone, Default)]
pub struct LinkPatch {
    pub link_type: Option<LinkType>,
    pub status: Option<LinkStatus>,
    pub notes: Option<String>,
    pub verified_at: Option<chrono::DateTime<Utc>>,
    pub verified_by: Option<String>,
    pub last_reviewed_at: Option<chrono::DateTime<Utc>>,
}

/// In-memory collection of link records.
#[derive(Debug, Default)]
pub struct LinkStore {
    records: Vec<LinkRecord>,
    /// Monotonic id sequence. Never rewinds, so removed ids are never reused.
    next_seq: u64,
}

impl LinkStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a store from a previously dumped record collection,
    /// resuming the id sequence past the highest sequence seen.
    #[must_use]
    pub fn from_records(records: Vec<LinkRecord>) -> Self {
        let next_seq = records
            .iter()
            .filter_map(|r| {
                r.id.strip_prefix('L')?
                    .split('-')
                    .next()?
                    .parse::<u64>()
                    .ok()
            })
            .max()
            .map_or(records.len() as u64, |max| max + 1);

        Self { records, next_seq }
    }

    /// The record collection, for host persistence. Records are plain data
    /// with no derived fields, so a dump/reload round-trips exactly.
    #[must_use]
    pub fn records(&self) -> &[LinkRecord] {
        &self.records
    }

    #[must_use]
    pub fn into_records(self) -> Vec<LinkRecord> {
        self.records
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LinkRecord> {
        self.records.iter()
    }

    #[must_use]
    pub fn get(&self, link_id: &str) -> Option<&LinkRecord> {
        self.records.iter().find(|r| r.id == link_id)
    }

    // === CRUD ===

    /// Append a new link. Always succeeds: endpoints are weak references and
    /// are not checked against any catalog here (that is the health check's
    /// job), and multiple links between the same pair are expected.
    pub fn add_link(&mut self, draft: LinkDraft) -> LinkRecord {
        let seq = self.next_seq;
        self.next_seq += 1;

        let record = LinkRecord {
            id: format!("L{seq:05}-{}", Utc::now().timestamp_millis()),
            source: draft.source,
            target: draft.target,
            link_type: draft.link_type,
            status: LinkStatus::default(),
            metadata: LinkMetadata::new(draft.created_by, draft.notes),
        };
        debug!(id = %record.id, link_type = %record.link_type, "link added");
        self.records.push(record.clone());
        record
    }

    /// Remove the record with the given id. Idempotent.
    pub fn remove_link(&mut self, link_id: &str) -> Mutation {
        let before = self.records.len();
        self.records.retain(|r| r.id != link_id);
        if self.records.len() == before {
            Mutation::NotFound
        } else {
            debug!(id = link_id, "link removed");
            Mutation::Applied
        }
    }

    /// Shallow-merge the patch into the matching record.
    pub fn update_link(&mut self, link_id: &str, patch: LinkPatch) -> Mutation {
        let Some(record) = self.find_mut(link_id) else {
            return Mutation::NotFound;
        };
        if let Some(link_type) = patch.link_type {
            record.link_type = link_type;
        }
        if let Some(status) = patch.status {
            record.status = status;
        }
        if let Some(notes) = patch.notes {
            record.metadata.notes = notes;
        }
        if let Some(verified_at) = patch.verified_at {
            record.metadata.verified_at = Some(verified_at);
        }
        if let Some(verified_by) = patch.verified_by {
            record.metadata.verified_by = Some(verified_by);
        }
        if let Some(last_reviewed_at) = patch.last_reviewed_at {
            record.metadata.last_reviewed_at = Some(last_reviewed_at);
        }
        Mutation::Applied
    }

    /// Set the curation status. This is the human-curated field; the health
    /// checks never write it.
    pub fn update_status(&mut self, link_id: &str, status: LinkStatus) -> Mutation {
        self.update_link(
            link_id,
            LinkPatch {
                status: Some(status),
                ..LinkPatch::default()
            },
        )
    }

    // === Pinning ===

    /// Freeze one side of a link to a version string. Only that side's
    /// `version` is touched; pinning over an existing pin overwrites it.
    pub fn pin_link(&mut self, link_id: &str, side: LinkSide, version: impl Into<String>) -> Mutation {
        let Some(record) = self.find_mut(link_id) else {
            return Mutation::NotFound;
        };
        record.endpoint_mut(side).version = Some(version.into());
        Mutation::Applied
    }

    /// Return one side of a link to floating.
    pub fn unpin_link(&mut self, link_id: &str, side: LinkSide) -> Mutation {
        let Some(record) = self.find_mut(link_id) else {
            return Mutation::NotFound;
        };
        record.endpoint_mut(side).version = None;
        Mutation::Applied
    }

    /// Convert every floating side whose entity resolves in the catalog to
    /// a pin at the catalog's current version. Sides referencing missing
    /// entities stay floating (no version is fabricated); already-pinned
    /// sides are untouched. Idempotent for an unchanged catalog.
    ///
    /// Returns the number of sides pinned.
    pub fn baseline(&mut self, catalog: &EntityCatalog<'_>) -> usize {
        let mut pinned = 0;
        for record in &mut self.records {
            for side in [LinkSide::Source, LinkSide::Target] {
                let endpoint = record.endpoint_mut(side);
                if endpoint.version.is_none() {
                    if let Some(version) = catalog.current_version(&endpoint.item_id) {
                        endpoint.version = Some(version.to_string());
                        pinned += 1;
                    }
                }
            }
        }
        debug!(pinned, "baseline applied");
        pinned
    }

    // === Query layer ===
    //
    // Pure filters over the collection, insertion order preserved.

    /// Links where the entity appears as source or target.
    #[must_use]
    pub fn links_for(&self, item_id: &EntityId) -> Vec<&LinkRecord> {
        self.records.iter().filter(|r| r.touches(item_id)).collect()
    }

    /// Links where the entity is the target.
    #[must_use]
    pub fn incoming(&self, item_id: &EntityId) -> Vec<&LinkRecord> {
        self.records
            .iter()
            .filter(|r| r.target.item_id == *item_id)
            .collect()
    }

    /// Links where the entity is the source.
    #[must_use]
    pub fn outgoing(&self, item_id: &EntityId) -> Vec<&LinkRecord> {
        self.records
            .iter()
            .filter(|r| r.source.item_id == *item_id)
            .collect()
    }

    fn find_mut(&mut self, link_id: &str) -> Option<&mut LinkRecord> {
        self.records.iter_mut().find(|r| r.id == link_id)
    }
}
