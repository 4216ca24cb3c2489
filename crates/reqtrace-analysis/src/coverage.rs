//! Coverage analysis: requirement-type entities lacking a satisfying
//! downstream link.

use reqtrace_core::{EntityRecord, LinkRecord};

/// Entity category treated as a requirement for coverage purposes.
pub const REQUIREMENT_CATEGORY: &str = "customer";

/// Entity classification treated as a need for coverage purposes.
pub const NEED_CLASSIFICATION: &str = "need";

/// Requirement entities (category `customer` or classification `need`) with
/// no outgoing link of a satisfying kind.
///
/// Coverage is strictly about `satisfies`/`implements`/`derives`: an entity
/// whose only outgoing link is `relates` is still uncovered.
#[must_use]
pub fn find_uncovered<'a>(
    entities: &'a [EntityRecord],
    links: &[LinkRecord],
) -> Vec<&'a EntityRecord> {
    entities
        .iter()
        .filter(|e| e.category == REQUIREMENT_CATEGORY || e.classification == NEED_CLASSIFICATION)
        .filter(|e| {
            !links
                .iter()
                .any(|l| l.source.item_id == e.id && l.link_type.is_satisfying())
        })
        .collect()
}
