//! Best-first nearest-neighbor traversal.

use crate::aabb::Aabb;
use crate::coord::{self, Coord};
use crate::heap::MinHeap;
use crate::node_id::{NodeId, ROOT};
use crate::range::Flow;
use crate::tree::{StoredObject, Tree};

/// Caller-supplied emission callback: `(payload) -> continue?`. Called
/// in ascending order of cell-derived (then object-level) squared
/// distance.
pub trait NearestVisitor<T> {
    fn on_visit(&mut self, payload: T) -> Flow;
}

impl<T, F> NearestVisitor<T> for F
where
    F: FnMut(T) -> Flow,
{
    fn on_visit(&mut self, payload: T) -> Flow {
        self(payload)
    }
}

/// Caller-supplied exact distance metric, evaluated once per candidate
/// leaf object. Often just `bounds.distance_squared(point)`.
pub trait DistanceProvider<C: Coord, T> {
    fn distance_squared(&mut self, point: C, payload: &T, bounds: &Aabb<C>) -> f32;
}

impl<C: Coord, T, F> DistanceProvider<C, T> for F
where
    F: FnMut(C, &T, &Aabb<C>) -> f32,
{
    fn distance_squared(&mut self, point: C, payload: &T, bounds: &Aabb<C>) -> f32 {
        self(point, payload, bounds)
    }
}

#[derive(Clone, Copy)]
struct NodeScratch<C: Coord> {
    id: NodeId,
    depth: u32,
    center: C,
    quarter_size: C,
}

#[derive(Clone, Copy)]
enum Entry {
    Node(usize),
    Object(usize),
}

/// Reusable scratch storage for [`nearest_cached`]: two append-only
/// vectors and a min-heap, amortized across many queries on the same
/// tree.
pub struct QueryCache<C: Coord, T> {
    nodes: Vec<NodeScratch<C>>,
    objects: Vec<StoredObject<C, T>>,
    heap: MinHeap<Entry>,
}

impl<C: Coord, T> QueryCache<C, T> {
    pub fn new() -> Self {
        Self { nodes: Vec::new(), objects: Vec::new(), heap: MinHeap::new() }
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.objects.clear();
        self.heap.clear();
    }
}

impl<C: Coord, T> Default for QueryCache<C, T> {
    fn default() -> Self {
        Self::new()
    }
}

/// One-shot nearest-neighbor query: builds and discards its own
/// [`QueryCache`].
pub fn nearest<C: Coord, T: Copy>(
    tree: &Tree<C, T>,
    point: C,
    max_distance: f32,
    visitor: &mut impl NearestVisitor<T>,
    distance: &mut impl DistanceProvider<C, T>,
) {
    let mut cache = QueryCache::new();
    nearest_cached(tree, point, max_distance, visitor, distance, &mut cache);
}

/// Nearest-neighbor query using a caller-owned, reusable [`QueryCache`].
///
/// Emits stored objects in non-decreasing order of the distance
/// `distance` reports, up to `max_distance`. `visitor` may stop the
/// traversal early; the current invocation completes and recursion
/// unwinds.
pub fn nearest_cached<C: Coord, T: Copy>(
    tree: &Tree<C, T>,
    point: C,
    max_distance: f32,
    visitor: &mut impl NearestVisitor<T>,
    distance: &mut impl DistanceProvider<C, T>,
    cache: &mut QueryCache<C, T>,
) {
    cache.clear();
    let max_sq = max_distance * max_distance;

    for child_idx in 0..C::num_children() {
        let child_id = ROOT.child(C::DIM, child_idx);
        if tree.node_count(child_id) == 0 {
            continue;
        }
        let (center, quarter) = tree.child_geometry(tree.root_center, tree.root_quarter_size, child_idx);
        push_node(cache, child_id, 1, center, quarter, point, max_sq);
    }

    while let Some((_, entry)) = cache.heap.try_pop() {
        match entry {
            Entry::Object(idx) => {
                let obj = cache.objects[idx];
                if visitor.on_visit(obj.payload) == Flow::Stop {
                    break;
                }
            }
            Entry::Node(idx) => {
                let node = cache.nodes[idx];
                let count = tree.node_count(node.id);
                if tree.is_leaf(count, node.depth) {
                    for obj in tree.objects_at(node.id) {
                        let d = distance.distance_squared(point, &obj.payload, &obj.bounds);
                        if d <= max_sq {
                            let obj_idx = cache.objects.len();
                            cache.objects.push(*obj);
                            cache.heap.push(d, Entry::Object(obj_idx));
                        }
                    }
                } else {
                    for child_idx in 0..C::num_children() {
                        let child_id = node.id.child(C::DIM, child_idx);
                        if tree.node_count(child_id) == 0 {
                            continue;
                        }
                        let (child_center, child_quarter) =
                            tree.child_geometry(node.center, node.quarter_size, child_idx);
                        push_node(cache, child_id, node.depth + 1, child_center, child_quarter, point, max_sq);
                    }
                }
            }
        }
    }
}

fn push_node<C: Coord, T>(
    cache: &mut QueryCache<C, T>,
    id: NodeId,
    depth: u32,
    center: C,
    quarter_size: C,
    point: C,
    max_sq: f32,
) {
    let half = coord::from_fn::<C>(|i| quarter_size[i] * 2.0);
    let cell = Aabb::new(
        coord::from_fn::<C>(|i| center[i] - half[i]),
        coord::from_fn::<C>(|i| center[i] + half[i]),
    );
    let d = cell.distance_squared(point);
    if d <= max_sq {
        let idx = cache.nodes.len();
        cache.nodes.push(NodeScratch { id, depth, center, quarter_size });
        cache.heap.push(d, Entry::Node(idx));
    }
}

#[cfg(test)]
#[path = "nearest_tests.rs"]
mod tests;
