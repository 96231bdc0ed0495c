#![allow(clippy::float_cmp)]

use super::*;

// --- Point ---

#[test]
fn point_offset_moves_both_axes() {
    let p = Point::new(3.0, 4.0).offset(-1.0, 2.5);
    assert_eq!(p, Point::new(2.0, 6.5));
}

// --- Bounds construction ---

#[test]
fn from_corners_normalizes_reverse_drag() {
    let b = Bounds::from_corners(Point::new(120.0, 80.0), Point::new(20.0, 10.0));
    assert_eq!(b, Bounds::new(20.0, 10.0, 100.0, 70.0));
}

#[test]
fn normalized_flips_negative_extents() {
    let b = Bounds::new(100.0, 50.0, -40.0, -10.0).normalized();
    assert_eq!(b, Bounds::new(60.0, 40.0, 40.0, 10.0));
}

#[test]
fn normalized_keeps_positive_box() {
    let b = Bounds::new(1.0, 2.0, 3.0, 4.0);
    assert_eq!(b.normalized(), b);
}

// --- Queries ---

#[test]
fn contains_point_is_inclusive() {
    let b = Bounds::new(0.0, 0.0, 10.0, 10.0);
    assert!(b.contains_point(Point::new(0.0, 0.0)));
    assert!(b.contains_point(Point::new(10.0, 10.0)));
    assert!(b.contains_point(Point::new(5.0, 5.0)));
    assert!(!b.contains_point(Point::new(10.1, 5.0)));
    assert!(!b.contains_point(Point::new(5.0, -0.1)));
}

#[test]
fn intersects_detects_overlap_and_gap() {
    let a = Bounds::new(0.0, 0.0, 10.0, 10.0);
    let b = Bounds::new(5.0, 5.0, 10.0, 10.0);
    let c = Bounds::new(20.0, 20.0, 5.0, 5.0);
    assert!(a.intersects(&b));
    assert!(b.intersects(&a));
    assert!(!a.intersects(&c));
}

#[test]
fn center_right_bottom() {
    let b = Bounds::new(10.0, 20.0, 30.0, 40.0);
    assert_eq!(b.right(), 40.0);
    assert_eq!(b.bottom(), 60.0);
    assert_eq!(b.center(), Point::new(25.0, 40.0));
}

// --- Union ---

#[test]
fn union_covers_both() {
    let a = Bounds::new(0.0, 0.0, 100.0, 100.0);
    let b = Bounds::new(200.0, 50.0, 100.0, 100.0);
    assert_eq!(a.union(&b), Bounds::new(0.0, 0.0, 300.0, 150.0));
}

#[test]
fn union_all_empty_is_none() {
    assert!(Bounds::union_all(Vec::new()).is_none());
}

#[test]
fn union_all_many() {
    let boxes = vec![
        Bounds::new(10.0, 10.0, 5.0, 5.0),
        Bounds::new(-5.0, 0.0, 1.0, 1.0),
        Bounds::new(0.0, 30.0, 2.0, 2.0),
    ];
    assert_eq!(Bounds::union_all(boxes), Some(Bounds::new(-5.0, 0.0, 20.0, 32.0)));
}

#[test]
fn translate_keeps_size() {
    let b = Bounds::new(1.0, 1.0, 5.0, 6.0).translate(10.0, -1.0);
    assert_eq!(b, Bounds::new(11.0, 0.0, 5.0, 6.0));
}
