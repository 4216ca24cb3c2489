//! Cycle detection over the hierarchical subset of link kinds.
//!
//! Only `derives`, `refines`, and `implements` links form the requirement
//! hierarchy; a loop of `relates` or `verifies` links is deliberately not a
//! finding. DFS with a global visited set and a per-path recursion stack,
//! roots and neighbors visited in insertion order so output is stable.

use std::collections::{HashMap, HashSet};

use reqtrace_core::{EntityId, LinkRecord};

/// Each cycle is the ordered path from the first occurrence of the repeated
/// node back to itself, with the repeated id closing the list
/// (e.g. `[A, B, C, A]`).
#[must_use]
pub fn find_cycles(links: &[LinkRecord]) -> Vec<Vec<EntityId>> {
    let mut adjacency: HashMap<&EntityId, Vec<&EntityId>> = HashMap::new();
    let mut roots: Vec<&EntityId> = Vec::new();
    let mut seen_roots: HashSet<&EntityId> = HashSet::new();

    for link in links.iter().filter(|l| l.link_type.is_hierarchical()) {
        adjacency
            .entry(&link.source.item_id)
            .or_default()
            .push(&link.target.item_id);
        if seen_roots.insert(&link.source.item_id) {
            roots.push(&link.source.item_id);
        }
    }

    let mut visited: HashSet<&EntityId> = HashSet::new();
    let mut cycles = Vec::new();

    for root in roots {
        if !visited.contains(root) {
            let mut stack = Vec::new();
            let mut on_stack = HashSet::new();
            visit(
                root,
                &adjacency,
                &mut visited,
                &mut stack,
                &mut on_stack,
                &mut cycles,
            );
        }
    }

    cycles
}

fn visit<'a>(
    node: &'a EntityId,
    adjacency: &HashMap<&'a EntityId, Vec<&'a EntityId>>,
    visited: &mut HashSet<&'a EntityId>,
    stack: &mut Vec<&'a EntityId>,
    on_stack: &mut HashSet<&'a EntityId>,
    cycles: &mut Vec<Vec<EntityId>>,
) {
    visited.insert(node);
    stack.push(node);
    on_stack.insert(node);

    if let Some(next_nodes) = adjacency.get(node) {
        for &next in next_nodes {
            if on_stack.contains(next) {
                // Back edge: the slice from `next`'s first occurrence through
                // `node` is one cycle.
                if let Some(pos) = stack.iter().position(|&n| n == next) {
                    let mut cycle: Vec<EntityId> =
                        stack[pos..].iter().map(|&n| n.clone()).collect();
                    cycle.push(next.clone());
                    cycles.push(cycle);
                }
            } else if !visited.contains(next) {
                visit(next, adjacency, visited, stack, on_stack, cycles);
            }
        }
    }

    stack.pop();
    on_stack.remove(node);
}
