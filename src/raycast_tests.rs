//! Unit tests for raycast.rs

use super::*;
use crate::tree::Tree;
use glam::Vec3;

fn aabb_intersecter(ray: &Ray<Vec3>, _payload: &u32, bounds: &Aabb<Vec3>) -> Option<f32> {
    ray.intersects_aabb(bounds)
}

fn point_bounds(p: Vec3, half: f32) -> Aabb<Vec3> {
    Aabb::new(p - Vec3::splat(half), p + Vec3::splat(half))
}

#[test]
fn raycast_finds_nearest_of_three_points() {
    let root = Aabb::new(Vec3::splat(-1.0), Vec3::splat(1.0));
    let mut tree: Tree<Vec3, u32> = Tree::new(root, 2, 3, 0).unwrap();

    let points = [
        Vec3::new(0.1, 0.1, 0.1),
        Vec3::new(0.2, 0.2, 0.2),
        Vec3::new(0.3, 0.3, 0.3),
    ];
    for (i, p) in points.iter().enumerate() {
        tree.insert(i as u32, point_bounds(*p, 0.01));
    }

    let ray = Ray::new(Vec3::splat(-2.0), (Vec3::splat(1.0) - Vec3::splat(-2.0)).normalize());
    let hit = raycast(&tree, &ray, &mut aabb_intersecter, None);
    let (payload, _point) = hit.expect("ray should hit something");
    assert_eq!(payload, 0, "nearest point (0.1,0.1,0.1) should win");
}

#[test]
fn raycast_miss_invokes_no_intersecter_calls() {
    let root = Aabb::new(Vec3::splat(-1.0), Vec3::splat(1.0));
    let mut tree: Tree<Vec3, u32> = Tree::new(root, 2, 3, 0).unwrap();
    tree.insert_point(1, Vec3::new(0.1, 0.1, 0.1));

    let mut calls = 0u32;
    let mut counting = |ray: &Ray<Vec3>, payload: &u32, bounds: &Aabb<Vec3>| {
        calls += 1;
        aabb_intersecter(ray, payload, bounds)
    };

    // Ray starts outside root bounds, pointing further away.
    let ray = Ray::new(Vec3::splat(-5.0), Vec3::new(-1.0, -1.0, -1.0));
    let hit = raycast(&tree, &ray, &mut counting, None);
    assert!(hit.is_none());
    assert_eq!(calls, 0);
}

#[test]
fn raycast_respects_max_distance_cutoff() {
    let root = Aabb::new(Vec3::splat(-10.0), Vec3::splat(10.0));
    let mut tree: Tree<Vec3, u32> = Tree::new(root, 2, 4, 0).unwrap();
    tree.insert(1, point_bounds(Vec3::new(5.0, 0.0, 0.0), 0.1));

    let ray = Ray::new(Vec3::ZERO, Vec3::new(1.0, 0.0, 0.0));
    assert!(raycast(&tree, &ray, &mut aabb_intersecter, Some(1.0)).is_none());
    assert!(raycast(&tree, &ray, &mut aabb_intersecter, Some(10.0)).is_some());
}

#[test]
fn raycast_handles_zero_direction_component() {
    let root = Aabb::new(Vec3::splat(-1.0), Vec3::splat(1.0));
    let mut tree: Tree<Vec3, u32> = Tree::new(root, 2, 3, 0).unwrap();
    tree.insert(1, point_bounds(Vec3::ZERO, 0.1));

    let ray = Ray::new(Vec3::new(-5.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0));
    let hit = raycast(&tree, &ray, &mut aabb_intersecter, None);
    assert!(hit.is_some());
}
