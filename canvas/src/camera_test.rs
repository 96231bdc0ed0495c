#![allow(clippy::float_cmp)]

use super::*;

const EPSILON: f64 = 1e-10;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

fn point_approx_eq(a: Point, b: Point) -> bool {
    approx_eq(a.x, b.x) && approx_eq(a.y, b.y)
}

// --- Defaults ---

#[test]
fn camera_default_is_identity() {
    let cam = Camera::default();
    assert_eq!(cam.pan_x, 0.0);
    assert_eq!(cam.pan_y, 0.0);
    assert_eq!(cam.zoom, 1.0);
    let p = Point::new(12.0, -7.0);
    assert!(point_approx_eq(cam.screen_to_world(p), p));
}

// --- Conversions ---

#[test]
fn screen_world_roundtrip() {
    let cam = Camera { pan_x: 35.0, pan_y: -12.0, zoom: 2.5 };
    let screen = Point::new(400.0, 300.0);
    let back = cam.world_to_screen(cam.screen_to_world(screen));
    assert!(point_approx_eq(back, screen));
}

#[test]
fn screen_to_world_applies_pan_then_zoom() {
    let cam = Camera { pan_x: 100.0, pan_y: 50.0, zoom: 2.0 };
    let world = cam.screen_to_world(Point::new(300.0, 250.0));
    assert!(point_approx_eq(world, Point::new(100.0, 100.0)));
}

// --- Zoom ---

#[test]
fn set_zoom_clamps_to_range() {
    let mut cam = Camera::default();
    cam.set_zoom(100.0);
    assert_eq!(cam.zoom, MAX_ZOOM);
    cam.set_zoom(0.0);
    assert_eq!(cam.zoom, MIN_ZOOM);
}

#[test]
fn zoom_at_keeps_anchor_fixed() {
    let mut cam = Camera { pan_x: 20.0, pan_y: 10.0, zoom: 1.0 };
    let screen = Point::new(200.0, 150.0);
    let before = cam.screen_to_world(screen);
    cam.zoom_at(screen, 2.0);
    assert!(approx_eq(cam.zoom, 2.0));
    assert!(point_approx_eq(cam.screen_to_world(screen), before));
}

#[test]
fn pan_by_accumulates() {
    let mut cam = Camera::default();
    cam.pan_by(10.0, -5.0);
    cam.pan_by(1.0, 1.0);
    assert_eq!(cam.pan_x, 11.0);
    assert_eq!(cam.pan_y, -4.0);
}

// --- Visible bounds / fit ---

#[test]
fn visible_bounds_scales_with_zoom() {
    let cam = Camera { pan_x: -100.0, pan_y: 0.0, zoom: 2.0 };
    let b = cam.visible_bounds(800.0, 600.0);
    assert!(approx_eq(b.x, 50.0));
    assert!(approx_eq(b.y, 0.0));
    assert!(approx_eq(b.width, 400.0));
    assert!(approx_eq(b.height, 300.0));
}

#[test]
fn fit_centers_content() {
    let mut cam = Camera::default();
    let content = Bounds::new(0.0, 0.0, 360.0, 100.0);
    cam.fit(content, 800.0, 600.0);
    // Width-limited: (800 - 80) / 360 = 2.0.
    assert!(approx_eq(cam.zoom, 2.0));
    let center = cam.world_to_screen(content.center());
    assert!(point_approx_eq(center, Point::new(400.0, 300.0)));
}

#[test]
fn fit_ignores_degenerate_viewport() {
    let mut cam = Camera { pan_x: 5.0, pan_y: 5.0, zoom: 1.5 };
    cam.fit(Bounds::new(0.0, 0.0, 10.0, 10.0), 50.0, 50.0);
    assert_eq!(cam, Camera { pan_x: 5.0, pan_y: 5.0, zoom: 1.5 });
}
