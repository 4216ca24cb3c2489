//! Link record — a typed, directional relationship between two entities
//! the ledger does not own.
//!
//! Each side of a link is a weak reference: an [`EntityId`] lookup key plus
//! an optional pinned version. `version = None` means the side is *floating*
//! and always tracks whatever the external catalog currently reports;
//! `Some(v)` means the side is *pinned* to the version observed when the
//! link was created or last baselined.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// A lookup key into the external entity catalog.
///
/// Never an owned reference: the entity behind an id may have been deleted,
/// which the health checks report but the ledger tolerates.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntityId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for EntityId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Semantic kind of a relationship, directional (source → target).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkType {
    Derives,
    Refines,
    Implements,
    Satisfies,
    Verifies,
    Relates,
}

impl LinkType {
    /// Kinds that form the requirement hierarchy. Only these participate in
    /// cycle detection; a loop of `relates` links is not a structural defect.
    #[must_use]
    pub fn is_hierarchical(self) -> bool {
        matches!(self, Self::Derives | Self::Refines | Self::Implements)
    }

    /// Kinds that count as covering a requirement downstream.
    #[must_use]
    pub fn is_satisfying(self) -> bool {
        matches!(self, Self::Satisfies | Self::Implements | Self::Derives)
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Derives => "derives",
            Self::Refines => "refines",
            Self::Implements => "implements",
            Self::Satisfies => "satisfies",
            Self::Verifies => "verifies",
            Self::Relates => "relates",
        }
    }
}

impl fmt::Display for LinkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LinkType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "derives" => Ok(Self::Derives),
            "refines" => Ok(Self::Refines),
            "implements" => Ok(Self::Implements),
            "satisfies" => Ok(Self::Satisfies),
            "verifies" => Ok(Self::Verifies),
            "relates" => Ok(Self::Relates),
            other => Err(CoreError::UnknownLinkType(other.to_string())),
        }
    }
}

/// Curation status of a link. Human-settable and never written by the
/// health checks: a link can be `Active` while health-checked as broken, or
/// marked `Broken` by a reviewer while structurally intact. Hosts that want
/// the two reconciled do so themselves.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LinkStatus {
    #[default]
    Active,
    NeedsReview,
    Proposed,
    Deprecated,
    Broken,
}

impl LinkStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::NeedsReview => "needsReview",
            Self::Proposed => "proposed",
            Self::Deprecated => "deprecated",
            Self::Broken => "broken",
        }
    }
}

impl fmt::Display for LinkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LinkStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "needsReview" => Ok(Self::NeedsReview),
            "proposed" => Ok(Self::Proposed),
            "deprecated" => Ok(Self::Deprecated),
            "broken" => Ok(Self::Broken),
            other => Err(CoreError::UnknownStatus(other.to_string())),
        }
    }
}

/// Which end of a link an operation addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkSide {
    Source,
    Target,
}

impl LinkSide {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Source => "source",
            Self::Target => "target",
        }
    }
}

impl fmt::Display for LinkSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LinkSide {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "source" => Ok(Self::Source),
            "target" => Ok(Self::Target),
            other => Err(CoreError::UnknownSide(other.to_string())),
        }
    }
}

/// One end of a link: a weak entity reference plus optional pinned version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkEndpoint {
    pub item_id: EntityId,

    /// `None` = floating (tracks the catalog's current version),
    /// `Some` = pinned to a historical version string.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl LinkEndpoint {
    /// An endpoint that tracks the entity's current version.
    #[must_use]
    pub fn floating(item_id: impl Into<EntityId>) -> Self {
        Self {
            item_id: item_id.into(),
            version: None,
        }
    }

    /// An endpoint frozen to a specific version string.
    #[must_use]
    pub fn pinned(item_id: impl Into<EntityId>, version: impl Into<String>) -> Self {
        Self {
            item_id: item_id.into(),
            version: Some(version.into()),
        }
    }

    #[must_use]
    pub fn is_pinned(&self) -> bool {
        self.version.is_some()
    }
}

/// Free-form provenance. Recorded and reported, never interpreted by the
/// analyzers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkMetadata {
    pub created_at: DateTime<Utc>,
    pub created_by: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub notes: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verified_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verified_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_reviewed_at: Option<DateTime<Utc>>,
}

impl LinkMetadata {
    /// Provenance for a freshly created link.
    #[must_use]
    pub fn new(created_by: impl Into<String>, notes: impl Into<String>) -> Self {
        Self {
            created_at: Utc::now(),
            created_by: created_by.into(),
            notes: notes.into(),
            verified_at: None,
            verified_by: None,
            last_reviewed_at: None,
        }
    }
}

/// The atomic unit stored by the ledger: a typed, directional relationship
/// between two entity references. Plain data with no derived fields, so a
/// full dump/reload round-trips exactly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkRecord {
    /// Unique, never reused after removal.
    pub id: String,
    pub source: LinkEndpoint,
    pub target: LinkEndpoint,
    pub link_type: LinkType,
    #[serde(default)]
    pub status: LinkStatus,
    pub metadata: LinkMetadata,
}

impl LinkRecord {
    /// Whether the given entity appears on either side.
    #[must_use]
    pub fn touches(&self, item_id: &EntityId) -> bool {
        self.source.item_id == *item_id || self.target.item_id == *item_id
    }

    #[must_use]
    pub fn endpoint(&self, side: LinkSide) -> &LinkEndpoint {
        match side {
            LinkSide::Source => &self.source,
            LinkSide::Target => &self.target,
        }
    }

    pub fn endpoint_mut(&mut self, side: LinkSide) -> &mut LinkEndpoint {
        match side {
            LinkSide::Source => &mut self.source,
            LinkSide::Target => &mut self.target,
        }
    }

    /// Source and target reference the same entity.
    #[must_use]
    pub fn is_self_link(&self) -> bool {
        self.source.item_id == self.target.item_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn record(source: &str, target: &str, link_type: LinkType) -> LinkRecord {
        LinkRecord {
            id: "L00001-0".to_string(),
            source: LinkEndpoint::floating(source),
            target: LinkEndpoint::pinned(target, "2.0"),
            link_type,
            status: LinkStatus::default(),
            metadata: LinkMetadata::new("tester", ""),
        }
    }

    // === Kind subsets ===

    #[test]
    fn hierarchical_subset_matches_glossary() {
        assert!(LinkType::Derives.is_hierarchical());
        assert!(LinkType::Refines.is_hierarchical());
        assert!(LinkType::Implements.is_hierarchical());
        assert!(!LinkType::Relates.is_hierarchical());
        assert!(!LinkType::Verifies.is_hierarchical());
        assert!(!LinkType::Satisfies.is_hierarchical());
    }

    #[test]
    fn satisfying_subset_matches_glossary() {
        assert!(LinkType::Satisfies.is_satisfying());
        assert!(LinkType::Implements.is_satisfying());
        assert!(LinkType::Derives.is_satisfying());
        assert!(!LinkType::Refines.is_satisfying());
        assert!(!LinkType::Verifies.is_satisfying());
        assert!(!LinkType::Relates.is_satisfying());
    }

    // === Record helpers ===

    #[test]
    fn touches_checks_both_sides() {
        let link = record("n1", "n2", LinkType::Relates);
        assert!(link.touches(&EntityId::from("n1")));
        assert!(link.touches(&EntityId::from("n2")));
        assert!(!link.touches(&EntityId::from("n3")));
    }

    #[test]
    fn self_link_detection() {
        assert!(record("n1", "n1", LinkType::Relates).is_self_link());
        assert!(!record("n1", "n2", LinkType::Relates).is_self_link());
    }

    #[test]
    fn endpoint_selection_by_side() {
        let link = record("n1", "n2", LinkType::Verifies);
        assert_eq!(link.endpoint(LinkSide::Source).item_id.as_str(), "n1");
        assert_eq!(link.endpoint(LinkSide::Target).item_id.as_str(), "n2");
        assert!(!link.endpoint(LinkSide::Source).is_pinned());
        assert!(link.endpoint(LinkSide::Target).is_pinned());
    }

    // === Serde shape ===

    #[test]
    fn status_serializes_camel_case() {
        let json = serde_json::to_string(&LinkStatus::NeedsReview).expect("serialize");
        assert_eq!(json, "\"needsReview\"");
    }

    #[test]
    fn floating_endpoint_omits_version_field() {
        let json = serde_json::to_string(&LinkEndpoint::floating("n1")).expect("serialize");
        assert!(!json.contains("version"));

        let json = serde_json::to_string(&LinkEndpoint::pinned("n1", "1.0")).expect("serialize");
        assert!(json.contains("\"version\":\"1.0\""));
    }

    #[test]
    fn record_roundtrips_field_for_field() {
        let link = record("n1", "n2", LinkType::Satisfies);
        let json = serde_json::to_string(&link).expect("serialize");
        let back: LinkRecord = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(link, back);
    }

    // === Display / FromStr ===

    proptest! {
        #[test]
        fn link_type_display_parse_roundtrip(
            t in prop::sample::select(vec![
                LinkType::Derives,
                LinkType::Refines,
                LinkType::Implements,
                LinkType::Satisfies,
                LinkType::Verifies,
                LinkType::Relates,
            ])
        ) {
            let back: LinkType = t.to_string().parse().expect("parse");
            prop_assert_eq!(back, t);
        }

        #[test]
        fn status_display_parse_roundtrip(
            s in prop::sample::select(vec![
                LinkStatus::Active,
                LinkStatus::NeedsReview,
                LinkStatus::Proposed,
                LinkStatus::Deprecated,
                LinkStatus::Broken,
            ])
        ) {
            let back: LinkStatus = s.to_string().parse().expect("parse");
            prop_assert_eq!(back, s);
        }
    }

    #[test]
    fn unknown_names_are_rejected() {
        assert!("owns".parse::<LinkType>().is_err());
        assert!("retired".parse::<LinkStatus>().is_err());
        assert!("middle".parse::<LinkSide>().is_err());
    }
}
