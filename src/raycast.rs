//! Ray traversal: locate the nearest intersected object.

use crate::aabb::{self, Aabb};
use crate::coord::Coord;
use crate::node_id::ROOT;
use crate::ray::Ray;
use crate::tree::Tree;

/// Caller-supplied hit test. Given a ray and a candidate object,
/// return the ray parameter `t >= 0` at which it is considered hit
/// (often an AABB test followed by exact geometry), or `None`.
pub trait Intersecter<C: Coord, T> {
    fn intersect(&mut self, ray: &Ray<C>, payload: &T, bounds: &Aabb<C>) -> Option<f32>;
}

/// Blanket impl so a plain closure `FnMut(&Ray<C>, &T, &Aabb<C>) ->
/// Option<f32>` can be used directly as an intersecter.
impl<C: Coord, T, F> Intersecter<C, T> for F
where
    F: FnMut(&Ray<C>, &T, &Aabb<C>) -> Option<f32>,
{
    fn intersect(&mut self, ray: &Ray<C>, payload: &T, bounds: &Aabb<C>) -> Option<f32> {
        self(ray, payload, bounds)
    }
}

/// Cast `ray` against `tree`, returning the nearest hit's payload and
/// world-space hit point, or `None` if nothing is hit.
///
/// `max_distance`, when given, is a ray-parameter cutoff: entries
/// beyond it are pruned at root entry and at every leaf winner.
///
/// Leaves are visited in strict ray-entry order (Daeken-style plane
/// descent), so the first leaf hit found is the global nearest — no
/// further siblings can contain a closer object.
pub fn raycast<C: Coord, T: Copy>(
    tree: &Tree<C, T>,
    ray: &Ray<C>,
    intersecter: &mut impl Intersecter<C, T>,
    max_distance: Option<f32>,
) -> Option<(T, C)> {
    let t_enter = ray.intersects_aabb(&tree.root_bounds)?;
    if let Some(max) = max_distance {
        if t_enter > max {
            return None;
        }
    }

    let entry_ray = ray.re_origin(ray.at(t_enter));
    let remaining = max_distance.map(|m| m - t_enter);

    descend(
        tree,
        ROOT,
        0,
        tree.root_center,
        tree.root_quarter_size,
        &entry_ray,
        remaining,
        intersecter,
    )
}

fn descend<C: Coord, T: Copy>(
    tree: &Tree<C, T>,
    node_id: crate::node_id::NodeId,
    depth: u32,
    center: C,
    quarter_size: C,
    entry_ray: &Ray<C>,
    remaining_max: Option<f32>,
    intersecter: &mut impl Intersecter<C, T>,
) -> Option<(T, C)> {
    if let Some(rem) = remaining_max {
        if rem < 0.0 {
            return None;
        }
    }

    if depth > 0 {
        let count = tree.node_count(node_id);
        if count == 0 {
            return None;
        }
        if tree.is_leaf(count, depth) {
            return visit_leaf(tree, node_id, entry_ray, remaining_max, intersecter);
        }
    }

    // Internal node (or the root, which is always treated as internal
    // since it never holds its own object bucket).
    let half_size = crate::coord::from_fn::<C>(|i| quarter_size[i] * 2.0);
    let node_aabb = Aabb::new(
        crate::coord::from_fn::<C>(|i| center[i] - half_size[i]),
        crate::coord::from_fn::<C>(|i| center[i] + half_size[i]),
    );

    let mut current_child = aabb::point_to_child_index::<C>(entry_ray.origin, center);
    let plane_hits: Vec<f32> =
        (0..C::DIM).map(|i| (center[i] - entry_ray.origin[i]) * entry_ray.inv_dir[i]).collect();
    let mut consumed = vec![false; C::DIM];
    let mut current_ray = *entry_ray;
    let mut current_remaining = remaining_max;

    // A ray can enter at most K+1 children of any internal node.
    for _ in 0..=C::DIM {
        let child_id = node_id.child(C::DIM, current_child);
        if tree.node_count(child_id) > 0 {
            let (child_center, child_quarter) = tree.child_geometry(center, quarter_size, current_child);
            if let Some(hit) = descend(
                tree,
                child_id,
                depth + 1,
                child_center,
                child_quarter,
                &current_ray,
                current_remaining,
                intersecter,
            ) {
                return Some(hit);
            }
        }

        let mut next_axis = None;
        let mut next_t = f32::INFINITY;
        for axis in 0..C::DIM {
            if consumed[axis] {
                continue;
            }
            let pv = plane_hits[axis];
            if pv >= 0.0 && pv < next_t {
                next_t = pv;
                next_axis = Some(axis);
            }
        }

        let axis = match next_axis {
            Some(a) => a,
            None => break,
        };
        consumed[axis] = true;

        let crossing_point = entry_ray.at(next_t);
        if !node_aabb.contains_point(crossing_point) {
            break;
        }

        current_child ^= 1 << axis;
        current_ray = entry_ray.re_origin(crossing_point);
        current_remaining = remaining_max.map(|m| m - next_t);
    }

    None
}

fn visit_leaf<C: Coord, T: Copy>(
    tree: &Tree<C, T>,
    node_id: crate::node_id::NodeId,
    ray: &Ray<C>,
    remaining_max: Option<f32>,
    intersecter: &mut impl Intersecter<C, T>,
) -> Option<(T, C)> {
    let mut best: Option<(T, f32)> = None;
    for obj in tree.objects_at(node_id) {
        let Some(t) = intersecter.intersect(ray, &obj.payload, &obj.bounds) else {
            continue;
        };
        if t < 0.0 {
            continue;
        }
        if let Some(rem) = remaining_max {
            if t > rem {
                continue;
            }
        }
        let is_better = match best {
            Some((_, best_t)) => t < best_t,
            None => true,
        };
        if is_better {
            best = Some((obj.payload, t));
        }
    }
    best.map(|(payload, t)| (payload, ray.at(t)))
}

#[cfg(test)]
#[path = "raycast_tests.rs"]
mod tests;
