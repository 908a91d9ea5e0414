//! End-to-end quadtree scenarios exercising range queries, boundary
//! placement, subdivision, and clear through the public API.

use galaxy_spatial_tree::{range, Aabb, Flow, Quadtree};
use glam::Vec2;

fn bounds(center: Vec2, half: f32) -> Aabb<Vec2> {
    Aabb::new(center - Vec2::splat(half), center + Vec2::splat(half))
}

#[test]
fn scenario_two_range_query_selects_two_of_five() {
    let root = Aabb::new(Vec2::splat(-10.0), Vec2::splat(10.0));
    let mut tree: Quadtree<usize> = Quadtree::new(root, 2, 4, 0).unwrap();

    let centers = [
        Vec2::new(0.0, 0.0),
        Vec2::new(3.0, 3.0),
        Vec2::new(-4.0, -4.0),
        Vec2::new(7.0, 1.0),
        Vec2::new(-8.0, 8.0),
    ];
    for (i, c) in centers.iter().enumerate() {
        tree.insert(i, bounds(*c, 0.5));
    }

    let query = Aabb::new(Vec2::new(-1.0, -1.0), Vec2::new(4.0, 4.0));
    let mut hits = Vec::new();
    let mut visitor = |payload: &usize, obj_bounds: &Aabb<Vec2>, q: &Aabb<Vec2>| {
        if obj_bounds.overlaps(q) {
            hits.push(*payload);
        }
        Flow::Continue
    };
    range(&tree, &query, &mut visitor);
    hits.sort_unstable();
    assert_eq!(hits, vec![0, 1]);
}

#[test]
fn boundary_point_on_center_goes_positive() {
    let root = Aabb::new(Vec2::splat(-1.0), Vec2::splat(1.0));
    let mut tree: Quadtree<u32> = Quadtree::new(root, 4, 3, 0).unwrap();
    tree.insert_point(1, Vec2::ZERO);

    let query = Aabb::new(Vec2::ZERO, Vec2::splat(1.0));
    let mut hits = 0u32;
    let mut visitor = |_: &u32, _: &Aabb<Vec2>, _: &Aabb<Vec2>| {
        hits += 1;
        Flow::Continue
    };
    range(&tree, &query, &mut visitor);
    assert_eq!(hits, 1);
}

#[test]
fn insert_exactly_objects_per_node_then_subdivide() {
    let root = Aabb::new(Vec2::splat(-1.0), Vec2::splat(1.0));
    let mut tree: Quadtree<u32> = Quadtree::new(root, 2, 5, 0).unwrap();
    tree.insert_point(1, Vec2::new(0.1, 0.1));
    tree.insert_point(2, Vec2::new(0.15, 0.15));

    let query = Aabb::new(Vec2::splat(0.0), Vec2::splat(1.0));
    let mut count = 0u32;
    let mut visitor = |_: &u32, _: &Aabb<Vec2>, _: &Aabb<Vec2>| {
        count += 1;
        Flow::Continue
    };
    range(&tree, &query, &mut visitor);
    assert_eq!(count, 2);

    tree.insert_point(3, Vec2::new(0.12, 0.12));
    let mut count_after = 0u32;
    let mut visitor2 = |_: &u32, _: &Aabb<Vec2>, _: &Aabb<Vec2>| {
        count_after += 1;
        Flow::Continue
    };
    range(&tree, &query, &mut visitor2);
    assert_eq!(count_after, 3);
}

#[test]
fn clear_idempotence_preserves_shape() {
    let root = Aabb::new(Vec2::splat(-5.0), Vec2::splat(5.0));
    let mut tree: Quadtree<u32> = Quadtree::new(root, 2, 5, 0).unwrap();
    tree.insert_point(1, Vec2::new(1.0, 1.0));
    tree.clear();
    tree.clear();
    assert_eq!(tree.root_bounds(), root);

    let query = root;
    let mut count = 0u32;
    let mut visitor = |_: &u32, _: &Aabb<Vec2>, _: &Aabb<Vec2>| {
        count += 1;
        Flow::Continue
    };
    range(&tree, &query, &mut visitor);
    assert_eq!(count, 0);
}
