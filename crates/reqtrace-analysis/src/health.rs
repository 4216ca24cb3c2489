//! Per-link structural and semantic validation against an entity snapshot.
//!
//! Findings are advisory data, never errors: the ledger allows the graph to
//! pass through inconsistent states and surfaces them for a human or a
//! higher-level policy to resolve. Nothing here mutates the store or the
//! catalog, so it is safe to run on every poll.

use serde::{Deserialize, Serialize};

use reqtrace_core::{EntityCatalog, LinkRecord, LinkSide};

/// Severity of a health finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    Warning,
}

impl Severity {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::Warning => "warning",
        }
    }
}

/// What a health check found on a link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum IssueKind {
    /// An endpoint no longer resolves in the entity snapshot.
    Broken { side: LinkSide },
    /// A pinned endpoint's frozen version differs from the entity's current
    /// version (exact string comparison, no semver interpretation).
    VersionDrift {
        side: LinkSide,
        pinned: String,
        current: String,
    },
    /// Source and target reference the same entity.
    SelfLink,
}

impl IssueKind {
    #[must_use]
    pub fn severity(&self) -> Severity {
        match self {
            Self::Broken { .. } => Severity::Critical,
            Self::VersionDrift { .. } | Self::SelfLink => Severity::Warning,
        }
    }
}

/// One diagnostic finding about one link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthIssue {
    pub link_id: String,
    pub kind: IssueKind,
    pub severity: Severity,
    pub message: String,
}

impl HealthIssue {
    fn new(link_id: &str, kind: IssueKind, message: String) -> Self {
        Self {
            link_id: link_id.to_string(),
            severity: kind.severity(),
            kind,
            message,
        }
    }
}

/// Evaluate every link against the catalog snapshot. A single link may
/// yield zero, one, or several issues: missing source, missing target,
/// per-side version drift, and self-link are all checked independently.
#[must_use]
pub fn run_health_checks(links: &[LinkRecord], catalog: &EntityCatalog<'_>) -> Vec<HealthIssue> {
    let mut issues = Vec::new();

    for link in links {
        for side in [LinkSide::Source, LinkSide::Target] {
            let endpoint = link.endpoint(side);
            if !catalog.contains(&endpoint.item_id) {
                issues.push(HealthIssue::new(
                    &link.id,
                    IssueKind::Broken { side },
                    format!(
                        "{side} entity '{}' not found in the entity snapshot",
                        endpoint.item_id
                    ),
                ));
            }
        }

        for side in [LinkSide::Source, LinkSide::Target] {
            let endpoint = link.endpoint(side);
            if let (Some(pinned), Some(current)) = (
                endpoint.version.as_deref(),
                catalog.current_version(&endpoint.item_id),
            ) {
                if pinned != current {
                    issues.push(HealthIssue::new(
                        &link.id,
                        IssueKind::VersionDrift {
                            side,
                            pinned: pinned.to_string(),
                            current: current.to_string(),
                        },
                        format!(
                            "{side} '{}' pinned at {pinned} but the catalog reports {current}",
                            endpoint.item_id
                        ),
                    ));
                }
            }
        }

        if link.is_self_link() {
            issues.push(HealthIssue::new(
                &link.id,
                IssueKind::SelfLink,
                format!("link references '{}' on both sides", link.source.item_id),
            ));
        }
    }

    issues
}
