#![allow(clippy::float_cmp)]

use super::*;

#[test]
fn snapping_disabled_returns_point() {
    let g = Guides { snap_to_guides: false, ..Guides::default() };
    let p = Point::new(13.3, 27.9);
    assert_eq!(g.snap_point(p), p);
}

#[test]
fn grid_snap_rounds_to_nearest_line() {
    let g = Guides { snap_to_grid: true, grid_size: 10.0, ..Guides::default() };
    assert_eq!(g.snap_point(Point::new(14.0, 26.0)), Point::new(10.0, 30.0));
}

#[test]
fn guide_wins_over_grid_within_threshold() {
    let mut g = Guides { snap_to_grid: true, grid_size: 10.0, ..Guides::default() };
    g.add(Guide { axis: GuideAxis::Vertical, position: 17.0 });
    let p = g.snap_point(Point::new(14.0, 14.0));
    assert_eq!(p.x, 17.0);
    assert_eq!(p.y, 10.0);
}

#[test]
fn guide_outside_threshold_is_ignored() {
    let mut g = Guides::default();
    g.add(Guide { axis: GuideAxis::Horizontal, position: 100.0 });
    assert_eq!(g.snap_point(Point::new(0.0, 80.0)), Point::new(0.0, 80.0));
    assert_eq!(g.snap_point(Point::new(0.0, 97.0)), Point::new(0.0, 100.0));
}

#[test]
fn remove_out_of_range_is_noop() {
    let mut g = Guides::default();
    g.add(Guide { axis: GuideAxis::Vertical, position: 1.0 });
    g.remove(5);
    assert_eq!(g.lines.len(), 1);
    g.remove(0);
    assert!(g.lines.is_empty());
}
