//! Masked range traversal.

use crate::aabb::Aabb;
use crate::coord::Coord;
use crate::node_id::ROOT;
use crate::tree::Tree;

/// Continue/stop signal returned by every visitor in this crate: each
/// visitor exposes a single small method and returns this flag so
/// traversal can unwind as soon as the caller has what it needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Stop,
}

/// Caller-supplied range callback. Delivered once per object per leaf
/// cell it overlaps — an object spanning multiple leaves is visited
/// multiple times; the visitor deduplicates if it cares.
pub trait RangeVisitor<C: Coord, T> {
    fn on_visit(&mut self, payload: &T, bounds: &Aabb<C>, query: &Aabb<C>) -> Flow;
}

impl<C: Coord, T, F> RangeVisitor<C, T> for F
where
    F: FnMut(&T, &Aabb<C>, &Aabb<C>) -> Flow,
{
    fn on_visit(&mut self, payload: &T, bounds: &Aabb<C>, query: &Aabb<C>) -> Flow {
        self(payload, bounds, query)
    }
}

/// Enumerate every stored object whose *cell* (not necessarily its own
/// bounds) overlaps `query`, delivering each to `visitor`.
///
/// The core's overlap test is at node-cell granularity; if the caller
/// needs object-AABB-vs-query-AABB precision it must check `bounds`
/// against `query` itself inside the visitor.
pub fn range<C: Coord, T: Copy>(tree: &Tree<C, T>, query: &Aabb<C>, visitor: &mut impl RangeVisitor<C, T>) {
    descend(tree, ROOT, 0, tree.root_center, tree.root_quarter_size, query, visitor);
}

fn descend<C: Coord, T: Copy>(
    tree: &Tree<C, T>,
    node_id: crate::node_id::NodeId,
    depth: u32,
    center: C,
    quarter_size: C,
    query: &Aabb<C>,
    visitor: &mut impl RangeVisitor<C, T>,
) -> Flow {
    if depth > 0 {
        let count = tree.node_count(node_id);
        if count == 0 {
            return Flow::Continue;
        }
        if tree.is_leaf(count, depth) {
            for obj in tree.objects_at(node_id) {
                if visitor.on_visit(&obj.payload, &obj.bounds, query) == Flow::Stop {
                    return Flow::Stop;
                }
            }
            return Flow::Continue;
        }
    }

    let mask = query.mask_of(center);
    for child_idx in 0..C::num_children() {
        let child_mask = tree.child_masks[child_idx];
        if mask & child_mask != child_mask {
            continue;
        }
        let child_id = node_id.child(C::DIM, child_idx);
        if tree.node_count(child_id) == 0 {
            continue;
        }
        let (child_center, child_quarter) = tree.child_geometry(center, quarter_size, child_idx);
        if descend(tree, child_id, depth + 1, child_center, child_quarter, query, visitor) == Flow::Stop {
            return Flow::Stop;
        }
    }

    Flow::Continue
}

#[cfg(test)]
#[path = "range_tests.rs"]
mod tests;
