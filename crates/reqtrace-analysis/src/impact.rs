//! Impact analysis: what else is connected to an entity, and which link
//! sides would need re-pinning if its version changed.

use std::fmt;

use serde::{Deserialize, Serialize};

use reqtrace_core::{EntityId, LinkRecord, LinkType};

/// Direction of a link relative to the queried entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Incoming,
    Outgoing,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Incoming => "incoming",
            Self::Outgoing => "outgoing",
        })
    }
}

/// One link touching the queried entity. `is_pinned`/`pinned_version`
/// describe the side belonging to the queried entity, i.e. what would need
/// re-pinning if that entity's version changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImpactEntry {
    pub link_id: String,
    pub affected_node: EntityId,
    pub direction: Direction,
    pub is_pinned: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pinned_version: Option<String>,
    pub link_type: LinkType,
}

/// One entry per link touching `item_id`, in insertion order. Purely
/// informational; nothing is mutated.
#[must_use]
pub fn impact_of(item_id: &EntityId, links: &[LinkRecord]) -> Vec<ImpactEntry> {
    links
        .iter()
        .filter(|l| l.touches(item_id))
        .map(|l| {
            // Target side checked first, so a self-link reads as incoming.
            let (direction, own, other) = if l.target.item_id == *item_id {
                (Direction::Incoming, &l.target, &l.source)
            } else {
                (Direction::Outgoing, &l.source, &l.target)
            };
            ImpactEntry {
                link_id: l.id.clone(),
                affected_node: other.item_id.clone(),
                direction,
                is_pinned: own.is_pinned(),
                pinned_version: own.version.clone(),
                link_type: l.link_type,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqtrace_core::{LinkEndpoint, LinkMetadata, LinkStatus};

    fn link(id: &str, source: LinkEndpoint, target: LinkEndpoint, link_type: LinkType) -> LinkRecord {
        LinkRecord {
            id: id.to_string(),
            source,
            target,
            link_type,
            status: LinkStatus::default(),
            metadata: LinkMetadata::new("tester", ""),
        }
    }

    #[test]
    fn reports_both_directions_with_own_side_pin_state() {
        // n1 is the pinned target of L1 and the floating source of L2.
        let links = vec![
            link(
                "L1",
                LinkEndpoint::floating("n2"),
                LinkEndpoint::pinned("n1", "1.0"),
                LinkType::Derives,
            ),
            link(
                "L2",
                LinkEndpoint::floating("n1"),
                LinkEndpoint::pinned("n3", "2.0"),
                LinkType::Verifies,
            ),
        ];

        let entries = impact_of(&EntityId::from("n1"), &links);
        assert_eq!(entries.len(), 2);

        assert_eq!(entries[0].link_id, "L1");
        assert_eq!(entries[0].direction, Direction::Incoming);
        assert_eq!(entries[0].affected_node.as_str(), "n2");
        assert!(entries[0].is_pinned);
        assert_eq!(entries[0].pinned_version.as_deref(), Some("1.0"));

        assert_eq!(entries[1].link_id, "L2");
        assert_eq!(entries[1].direction, Direction::Outgoing);
        assert_eq!(entries[1].affected_node.as_str(), "n3");
        // Pin state is n1's own side, not the target's.
        assert!(!entries[1].is_pinned);
        assert_eq!(entries[1].pinned_version, None);
    }

    #[test]
    fn untouched_entity_has_no_entries() {
        let links = vec![link(
            "L1",
            LinkEndpoint::floating("n2"),
            LinkEndpoint::floating("n3"),
            LinkType::Relates,
        )];

        assert!(impact_of(&EntityId::from("n1"), &links).is_empty());
    }

    #[test]
    fn self_link_yields_one_incoming_entry() {
        let links = vec![link(
            "L1",
            LinkEndpoint::floating("n1"),
            LinkEndpoint::pinned("n1", "3.0"),
            LinkType::Relates,
        )];

        let entries = impact_of(&EntityId::from("n1"), &links);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].direction, Direction::Incoming);
        assert_eq!(entries[0].affected_node.as_str(), "n1");
        assert!(entries[0].is_pinned);
    }
}
