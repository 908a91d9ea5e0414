//! The tree instance: sparse node/object storage, insertion, and
//! subdivision.

use rustc_hash::FxHashMap;

use crate::aabb::{self, Aabb};
use crate::coord::Coord;
use crate::error::{Error, Result};
use crate::node_id::{self, NodeId, ROOT};

/// A stored `(payload, bounds)` pair, owned by the tree. The payload
/// is an opaque, copyable value type, copied by value at insert.
#[derive(Debug, Clone, Copy)]
pub struct StoredObject<C: Coord, T> {
    pub payload: T,
    pub bounds: Aabb<C>,
}

/// Sparse octree (`C` = `glam::Vec3`) / quadtree (`C` = `glam::Vec2`)
/// spatial index.
///
/// See the crate root docs for the high-level contract. Construction
/// validates `root_bounds`/`max_depth`/`objects_per_node`; insertion
/// and `clear` are infallible; `copy_from` validates that the source
/// has identical shape.
pub struct Tree<C: Coord, T> {
    pub(crate) root_bounds: Aabb<C>,
    pub(crate) root_center: C,
    pub(crate) root_half_size: C,
    pub(crate) root_quarter_size: C,
    pub(crate) objects_per_node: usize,
    pub(crate) max_depth: u32,
    pub(crate) child_masks: Vec<u32>,
    pub(crate) child_offsets: Vec<C>,
    pub(crate) nodes: FxHashMap<NodeId, usize>,
    pub(crate) objects: FxHashMap<NodeId, Vec<StoredObject<C, T>>>,
}

impl<C: Coord, T: Copy> Tree<C, T> {
    /// Create a new tree over `root_bounds`.
    ///
    /// Preconditions: `root_bounds` valid (`min <= max` per axis),
    /// `1 < max_depth <= floor(31 / K)`, `objects_per_node >= 1`.
    /// `initial_capacity` is a hint for the two sparse maps.
    pub fn new(
        root_bounds: Aabb<C>,
        objects_per_node: usize,
        max_depth: u32,
        initial_capacity: usize,
    ) -> Result<Self> {
        for i in 0..C::DIM {
            if root_bounds.min[i] > root_bounds.max[i] {
                return Err(Error::InvalidBounds);
            }
        }

        let limit = node_id::max_depth_for(C::DIM);
        if max_depth <= 1 || max_depth > limit {
            return Err(Error::InvalidMaxDepth { given: max_depth, limit });
        }

        if objects_per_node == 0 {
            return Err(Error::InvalidObjectsPerNode);
        }

        let root_center = root_bounds.center();
        let root_half_size = crate::coord::from_fn(|i| root_bounds.size()[i] * 0.5);
        let root_quarter_size = crate::coord::from_fn(|i| root_half_size[i] * 0.5);

        let mut nodes = FxHashMap::default();
        let mut objects = FxHashMap::default();
        nodes.reserve(initial_capacity);
        objects.reserve(initial_capacity);

        Ok(Self {
            root_bounds,
            root_center,
            root_half_size,
            root_quarter_size,
            objects_per_node,
            max_depth,
            child_masks: aabb::child_masks::<C>(),
            child_offsets: aabb::child_center_offsets::<C>(),
            nodes,
            objects,
        })
    }

    pub fn root_bounds(&self) -> Aabb<C> {
        self.root_bounds
    }

    pub fn objects_per_node(&self) -> usize {
        self.objects_per_node
    }

    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    /// Insert `payload` under `bounds`, replicating into every leaf
    /// whose cell overlaps `bounds`.
    pub fn insert(&mut self, payload: T, bounds: Aabb<C>) {
        self.insert_recursive(payload, &bounds, ROOT, 0, self.root_center, self.root_quarter_size);
    }

    /// Insert `payload` at a single point — the fast path for objects
    /// with no extent. Stored under a degenerate AABB
    /// (`min == max == point`).
    pub fn insert_point(&mut self, payload: T, point: C) {
        let bounds = Aabb::new(point, point);
        let mut node_id = ROOT;
        let mut center = self.root_center;
        let mut quarter = self.root_quarter_size;
        let mut depth = 0u32;

        loop {
            let child_idx = aabb::point_to_child_index::<C>(point, center);
            let child_id = node_id.child(C::DIM, child_idx);
            let (child_center, child_quarter) = self.child_geometry(center, quarter, child_idx);
            let child_depth = depth + 1;

            if self.try_insert(child_id, child_depth, child_center, child_quarter, payload, &bounds) {
                return;
            }

            node_id = child_id;
            center = child_center;
            quarter = child_quarter;
            depth = child_depth;
        }
    }

    /// Empty both sparse maps. Capacity is retained.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.objects.clear();
    }

    /// Replace this tree's contents with a copy of `other`'s, which
    /// must share identical `root_bounds`/`objects_per_node`/
    /// `max_depth`. On mismatch, `self` is left unchanged.
    pub fn copy_from(&mut self, other: &Tree<C, T>) -> Result<()> {
        if self.root_bounds != other.root_bounds
            || self.objects_per_node != other.objects_per_node
            || self.max_depth != other.max_depth
        {
            return Err(Error::ShapeMismatch);
        }

        self.nodes = other.nodes.clone();
        self.objects = other.objects.clone();
        Ok(())
    }

    fn insert_recursive(
        &mut self,
        payload: T,
        bounds: &Aabb<C>,
        node_id: NodeId,
        depth: u32,
        center: C,
        quarter_size: C,
    ) {
        let mask = bounds.mask_of(center);
        for child_idx in 0..C::num_children() {
            if mask & self.child_masks[child_idx] != self.child_masks[child_idx] {
                continue;
            }
            let child_id = node_id.child(C::DIM, child_idx);
            let (child_center, child_quarter) = self.child_geometry(center, quarter_size, child_idx);
            let child_depth = depth + 1;

            if !self.try_insert(child_id, child_depth, child_center, child_quarter, payload, bounds) {
                self.insert_recursive(payload, bounds, child_id, child_depth, child_center, child_quarter);
            }
        }
    }

    /// Attempt to admit `payload` as a leaf object at `node_id`.
    /// Returns `true` on success (possibly triggering a subdivision),
    /// `false` when the node is already subdivided and not at
    /// `max_depth`.
    fn try_insert(
        &mut self,
        node_id: NodeId,
        depth: u32,
        center: C,
        quarter_size: C,
        payload: T,
        bounds: &Aabb<C>,
    ) -> bool {
        let count = self.nodes.get(&node_id).copied().unwrap_or(0);
        if count > self.objects_per_node && depth < self.max_depth {
            return false;
        }

        self.objects
            .entry(node_id)
            .or_default()
            .push(StoredObject { payload, bounds: *bounds });
        let new_count = count + 1;
        self.nodes.insert(node_id, new_count);

        if new_count > self.objects_per_node && depth < self.max_depth {
            log::trace!("subdividing node at depth {depth} (count {new_count})");
            self.subdivide(node_id, depth, center, quarter_size);
        }

        true
    }

    /// Redistribute every object currently at `node_id` into its
    /// children, recursing into any child that is still over
    /// threshold. The node's own occupancy count is left above
    /// `objects_per_node` as the "no longer a leaf" marker.
    fn subdivide(&mut self, node_id: NodeId, depth: u32, center: C, quarter_size: C) {
        let snapshot = self.objects.remove(&node_id).unwrap_or_default();
        let num_children = C::num_children();
        let mut buckets: Vec<Vec<StoredObject<C, T>>> = vec![Vec::new(); num_children];

        for obj in snapshot {
            let mask = obj.bounds.mask_of(center);
            for child_idx in 0..num_children {
                if mask & self.child_masks[child_idx] == self.child_masks[child_idx] {
                    buckets[child_idx].push(obj);
                }
            }
        }

        for (child_idx, bucket) in buckets.into_iter().enumerate() {
            if bucket.is_empty() {
                continue;
            }
            let child_id = node_id.child(C::DIM, child_idx);
            let child_depth = depth + 1;
            let count = bucket.len();
            self.nodes.insert(child_id, count);
            self.objects.insert(child_id, bucket);

            if count > self.objects_per_node && child_depth < self.max_depth {
                let (child_center, child_quarter) = self.child_geometry(center, quarter_size, child_idx);
                self.subdivide(child_id, child_depth, child_center, child_quarter);
            }
        }
    }

    pub(crate) fn child_geometry(&self, center: C, quarter_size: C, child_idx: usize) -> (C, C) {
        let offset = self.child_offsets[child_idx];
        let child_center = crate::coord::from_fn(|i| center[i] + offset[i] * quarter_size[i]);
        let child_quarter = crate::coord::from_fn(|i| quarter_size[i] * 0.5);
        (child_center, child_quarter)
    }

    pub(crate) fn node_count(&self, node_id: NodeId) -> usize {
        self.nodes.get(&node_id).copied().unwrap_or(0)
    }

    pub(crate) fn is_leaf(&self, count: usize, depth: u32) -> bool {
        count <= self.objects_per_node || depth == self.max_depth
    }

    pub(crate) fn objects_at(&self, node_id: NodeId) -> &[StoredObject<C, T>] {
        self.objects.get(&node_id).map(Vec::as_slice).unwrap_or(&[])
    }
}

#[cfg(test)]
#[path = "tree_tests.rs"]
mod tests;
