//! Unit tests for error.rs

use super::*;

#[test]
fn invalid_bounds_display() {
    let err = Error::InvalidBounds;
    assert!(format!("{}", err).contains("min > max"));
}

#[test]
fn invalid_max_depth_display_includes_values() {
    let err = Error::InvalidMaxDepth { given: 20, limit: 10 };
    let msg = format!("{}", err);
    assert!(msg.contains("20"));
    assert!(msg.contains("10"));
}

#[test]
fn invalid_objects_per_node_display() {
    assert!(format!("{}", Error::InvalidObjectsPerNode).contains("at least 1"));
}

#[test]
fn shape_mismatch_display() {
    assert!(format!("{}", Error::ShapeMismatch).contains("bounds or shape"));
}

#[test]
fn errors_are_std_error() {
    fn assert_std_error<E: std::error::Error>() {}
    assert_std_error::<Error>();
}
