//! Sparse spatial indices: a 3-D octree and a 2-D quadtree sharing one
//! generic implementation, parameterized over the dimension via
//! [`Coord`].
//!
//! Stored values are opaque, copyable payloads keyed by an axis-aligned
//! bounding box. Three query families are supported:
//!
//! - [`raycast::raycast`] — nearest object a ray intersects.
//! - [`range::range`] — every object whose cell overlaps a query AABB.
//! - [`nearest::nearest`] / [`nearest::nearest_cached`] — objects in
//!   ascending distance order from a point, up to a cutoff.
//!
//! Mutation is limited to [`Tree::insert`], [`Tree::insert_point`], and
//! [`Tree::clear`] — there is no removal, update, or rebalancing.

mod aabb;
mod coord;
mod error;
mod heap;
mod nearest;
mod node_id;
mod range;
mod ray;
mod raycast;
mod tree;

pub use aabb::Aabb;
pub use coord::Coord;
pub use error::{Error, Result};
pub use nearest::{nearest, nearest_cached, DistanceProvider, NearestVisitor, QueryCache};
pub use range::{range, Flow, RangeVisitor};
pub use ray::Ray;
pub use raycast::{raycast, Intersecter};
pub use tree::{StoredObject, Tree};

/// Sparse 3-D spatial index. `K = 3`, `8` children per internal node.
pub type Octree<T> = Tree<glam::Vec3, T>;

/// Sparse 2-D spatial index. `K = 2`, `4` children per internal node.
pub type Quadtree<T> = Tree<glam::Vec2, T>;
