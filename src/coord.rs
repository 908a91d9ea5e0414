//! Dimension abstraction shared by the octree and quadtree.
//!
//! [`Coord`] is the single knob the rest of the crate is parameterized
//! over: implementing it for `glam::Vec2` gives the quadtree (`K` = 2,
//! `C` = 4 children), implementing it for `glam::Vec3` gives the
//! octree (`K` = 3, `C` = 8 children). Every other module is generic
//! over `C: Coord` and never special-cases the dimension directly.

use glam::{Vec2, Vec3};
use std::ops::{Index, IndexMut};

/// A point/vector type usable as tree coordinates.
///
/// Implemented for `glam::Vec2` and `glam::Vec3`. `DIM` is the axis
/// count (2 for quadtree, 3 for octree); the number of children per
/// node is always `1 << DIM`.
pub trait Coord:
    Copy + Clone + PartialEq + std::fmt::Debug + Index<usize, Output = f32> + IndexMut<usize>
{
    /// Number of axes (2 or 3).
    const DIM: usize;

    /// All components equal to `v`.
    fn splat(v: f32) -> Self;

    /// Component-wise minimum.
    fn min(self, other: Self) -> Self;

    /// Component-wise maximum.
    fn max(self, other: Self) -> Self;

    /// Component-wise clamp of `self` into `[min, max]`.
    fn clamp(self, min: Self, max: Self) -> Self;

    /// Squared Euclidean distance between two points.
    fn distance_squared(self, other: Self) -> f32;

    /// Number of children a node has: `1 << DIM`.
    fn num_children() -> usize {
        1 << Self::DIM
    }
}

impl Coord for Vec3 {
    const DIM: usize = 3;

    fn splat(v: f32) -> Self {
        Vec3::splat(v)
    }

    fn min(self, other: Self) -> Self {
        Vec3::min(self, other)
    }

    fn max(self, other: Self) -> Self {
        Vec3::max(self, other)
    }

    fn clamp(self, min: Self, max: Self) -> Self {
        Vec3::clamp(self, min, max)
    }

    fn distance_squared(self, other: Self) -> f32 {
        Vec3::distance_squared(self, other)
    }
}

impl Coord for Vec2 {
    const DIM: usize = 2;

    fn splat(v: f32) -> Self {
        Vec2::splat(v)
    }

    fn min(self, other: Self) -> Self {
        Vec2::min(self, other)
    }

    fn max(self, other: Self) -> Self {
        Vec2::max(self, other)
    }

    fn clamp(self, min: Self, max: Self) -> Self {
        Vec2::clamp(self, min, max)
    }

    fn distance_squared(self, other: Self) -> f32 {
        Vec2::distance_squared(self, other)
    }
}

/// Build a `C` by evaluating `f(axis)` for each axis `0..C::DIM`.
pub(crate) fn from_fn<C: Coord>(mut f: impl FnMut(usize) -> f32) -> C {
    let mut out = C::splat(0.0);
    for axis in 0..C::DIM {
        out[axis] = f(axis);
    }
    out
}

#[cfg(test)]
#[path = "coord_tests.rs"]
mod tests;
