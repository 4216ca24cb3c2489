//! Orphan detection: entities touched by neither a link nor a topology edge.

use std::collections::HashSet;

use reqtrace_core::{EntityId, EntityRecord, LinkRecord, TopologyEdge};

/// Entities absent from the union of link endpoints and edge endpoints.
///
/// Transient placeholder entities are never reported. Pure set-difference,
/// O(entities + links + edges).
#[must_use]
pub fn find_orphans<'a>(
    entities: &'a [EntityRecord],
    links: &[LinkRecord],
    edges: &[TopologyEdge],
) -> Vec<&'a EntityRecord> {
    let mut touched: HashSet<&EntityId> = HashSet::new();
    for link in links {
        touched.insert(&link.source.item_id);
        touched.insert(&link.target.item_id);
    }
    for edge in edges {
        touched.insert(&edge.source_id);
        touched.insert(&edge.target_id);
    }

    entities
        .iter()
        .filter(|e| !e.transient && !touched.contains(&e.id))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqtrace_core::{LinkEndpoint, LinkMetadata, LinkStatus, LinkType};

    fn link(source: &str, target: &str) -> LinkRecord {
        LinkRecord {
            id: format!("L-{source}-{target}"),
            source: LinkEndpoint::floating(source),
            target: LinkEndpoint::floating(target),
            link_type: LinkType::Verifies,
            status: LinkStatus::default(),
            metadata: LinkMetadata::new("tester", ""),
        }
    }

    #[test]
    fn entity_with_no_links_or_edges_is_an_orphan() {
        let entities = vec![
            EntityRecord::new("n1", "1.0"),
            EntityRecord::new("n2", "1.0"),
            EntityRecord::new("n3", "1.0"),
        ];
        let links = vec![link("n1", "n2")];

        let orphans = find_orphans(&entities, &links, &[]);
        assert_eq!(orphans.len(), 1);
        assert_eq!(orphans[0].id.as_str(), "n3");
    }

    #[test]
    fn topology_edges_also_count_as_touched() {
        let entities = vec![
            EntityRecord::new("n1", "1.0"),
            EntityRecord::new("n2", "1.0"),
        ];
        let edges = vec![TopologyEdge::new("n1", "n2")];

        assert!(find_orphans(&entities, &[], &edges).is_empty());
    }

    #[test]
    fn transient_placeholders_are_never_reported() {
        let mut connector = EntityRecord::new("conn-1", "1.0");
        connector.transient = true;
        let entities = vec![EntityRecord::new("n1", "1.0"), connector];
        let links = vec![link("n1", "n9")];

        let orphans = find_orphans(&entities, &links, &[]);
        assert!(orphans.is_empty());
    }

    #[test]
    fn all_entities_orphaned_when_ledger_and_topology_are_empty() {
        let entities = vec![
            EntityRecord::new("n1", "1.0"),
            EntityRecord::new("n2", "1.0"),
        ];
        let orphans = find_orphans(&entities, &[], &[]);
        assert_eq!(orphans.len(), 2);
    }
}
