#[cfg(test)]
#[path = "camera_test.rs"]
mod camera_test;

use serde::{Deserialize, Serialize};

use crate::consts::{FIT_PADDING_PX, MAX_ZOOM, MIN_ZOOM};
use crate::geom::{Bounds, Point};

/// Camera state for pan/zoom on the infinite canvas.
///
/// `pan_x` / `pan_y` are in CSS pixels.
/// `zoom` is a scale factor (1.0 = no zoom), kept within
/// [`MIN_ZOOM`]..=[`MAX_ZOOM`] by every setter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub pan_x: f64,
    pub pan_y: f64,
    pub zoom: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self { pan_x: 0.0, pan_y: 0.0, zoom: 1.0 }
    }
}

impl Camera {
    /// Convert a screen-space point (CSS pixels) to world coordinates.
    #[must_use]
    pub fn screen_to_world(&self, screen: Point) -> Point {
        Point {
            x: (screen.x - self.pan_x) / self.zoom,
            y: (screen.y - self.pan_y) / self.zoom,
        }
    }

    /// Convert a world-space point to screen coordinates (CSS pixels).
    #[must_use]
    pub fn world_to_screen(&self, world: Point) -> Point {
        Point {
            x: world.x * self.zoom + self.pan_x,
            y: world.y * self.zoom + self.pan_y,
        }
    }

    /// Set the zoom factor, clamped to the allowed range.
    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
    }

    /// Zoom by `factor` while keeping the world point under `screen_pt` fixed.
    pub fn zoom_at(&mut self, screen_pt: Point, factor: f64) {
        let anchor = self.screen_to_world(screen_pt);
        self.set_zoom(self.zoom * factor);
        self.pan_x = screen_pt.x - anchor.x * self.zoom;
        self.pan_y = screen_pt.y - anchor.y * self.zoom;
    }

    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.pan_x += dx;
        self.pan_y += dy;
    }

    /// World-space rectangle visible through a viewport of the given CSS size.
    #[must_use]
    pub fn visible_bounds(&self, viewport_width: f64, viewport_height: f64) -> Bounds {
        let origin = self.screen_to_world(Point::new(0.0, 0.0));
        Bounds::new(origin.x, origin.y, viewport_width / self.zoom, viewport_height / self.zoom)
    }

    /// Center `content` in the viewport at the largest zoom that fits it.
    ///
    /// Leaves the camera unchanged for an empty viewport.
    pub fn fit(&mut self, content: Bounds, viewport_width: f64, viewport_height: f64) {
        let avail_w = viewport_width - 2.0 * FIT_PADDING_PX;
        let avail_h = viewport_height - 2.0 * FIT_PADDING_PX;
        if avail_w <= 0.0 || avail_h <= 0.0 {
            return;
        }
        let zoom_w = if content.width > 0.0 { avail_w / content.width } else { MAX_ZOOM };
        let zoom_h = if content.height > 0.0 { avail_h / content.height } else { MAX_ZOOM };
        self.set_zoom(zoom_w.min(zoom_h));
        let center = content.center();
        self.pan_x = viewport_width / 2.0 - center.x * self.zoom;
        self.pan_y = viewport_height / 2.0 - center.y * self.zoom;
    }
}
