//! Precomputed ray and the slab-method ray/AABB test.

use crate::aabb::Aabb;
use crate::coord::Coord;

/// A ray bundled with its reciprocal direction, so the slab test (and
/// repeated re-origining during traversal) never recomputes `1/dir`.
///
/// `inv_dir[i]` may be `+/-inf` when `dir[i] == 0`; the slab method is
/// correct under IEEE-754 semantics for that case.
#[derive(Debug, Clone, Copy)]
pub struct Ray<C: Coord> {
    pub origin: C,
    pub dir: C,
    pub inv_dir: C,
}

impl<C: Coord> Ray<C> {
    /// Precompute a ray from an origin and (not necessarily
    /// normalized) direction.
    pub fn new(origin: C, dir: C) -> Self {
        let inv_dir = crate::coord::from_fn(|i| 1.0 / dir[i]);
        Self { origin, dir, inv_dir }
    }

    /// Same direction, re-originated at a new point. Used to cheaply
    /// transpose the ray as traversal descends.
    pub fn re_origin(&self, new_origin: C) -> Self {
        Self {
            origin: new_origin,
            dir: self.dir,
            inv_dir: self.inv_dir,
        }
    }

    /// The point reached by traveling `t` along the ray from its
    /// current origin.
    pub fn at(&self, t: f32) -> C {
        crate::coord::from_fn(|i| self.origin[i] + self.dir[i] * t)
    }

    /// Slab-method ray/AABB intersection test.
    ///
    /// Returns `Some(t_enter)` (clamped to `>= 0`) when the ray hits
    /// `aabb`, `None` otherwise. A component exactly on a face may
    /// report a false positive; accepted for performance, since the
    /// caller's object-level intersecter is the final authority.
    pub fn intersects_aabb(&self, aabb: &Aabb<C>) -> Option<f32> {
        let mut t_enter = 0.0f32;
        let mut t_exit = f32::INFINITY;

        for i in 0..C::DIM {
            let t1 = (aabb.min[i] - self.origin[i]) * self.inv_dir[i];
            let t2 = (aabb.max[i] - self.origin[i]) * self.inv_dir[i];
            let (t_min, t_max) = if t1 <= t2 { (t1, t2) } else { (t2, t1) };
            t_enter = t_enter.max(t_min);
            t_exit = t_exit.min(t_max);
        }

        if t_exit >= t_enter {
            Some(t_enter)
        } else {
            None
        }
    }
}

#[cfg(test)]
#[path = "ray_tests.rs"]
mod tests;
