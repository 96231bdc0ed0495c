//! Grid, ruler guides and snapping configuration.

#[cfg(test)]
#[path = "guides_test.rs"]
mod guides_test;

use serde::{Deserialize, Serialize};

use crate::consts::DEFAULT_GRID_SIZE;
use crate::geom::Point;

/// Axis a ruler guide is perpendicular to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GuideAxis {
    /// A vertical line at a fixed x.
    Vertical,
    /// A horizontal line at a fixed y.
    Horizontal,
}

/// A ruler guide dragged onto the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Guide {
    pub axis: GuideAxis,
    pub position: f64,
}

/// Guide and snapping settings of the editor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Guides {
    pub show_grid: bool,
    pub snap_to_grid: bool,
    pub grid_size: f64,
    pub show_rulers: bool,
    /// Snap to ruler guides within `snap_threshold` world units.
    pub snap_to_guides: bool,
    pub snap_threshold: f64,
    pub lines: Vec<Guide>,
}

impl Default for Guides {
    fn default() -> Self {
        Self {
            show_grid: false,
            snap_to_grid: false,
            grid_size: DEFAULT_GRID_SIZE,
            show_rulers: false,
            snap_to_guides: true,
            snap_threshold: 5.0,
            lines: Vec::new(),
        }
    }
}

impl Guides {
    /// Snap a world point to the nearest guide (preferred) or grid line.
    ///
    /// Each axis snaps independently. With snapping disabled the point is
    /// returned unchanged.
    #[must_use]
    pub fn snap_point(&self, pt: Point) -> Point {
        Point::new(self.snap_axis(pt.x, GuideAxis::Vertical), self.snap_axis(pt.y, GuideAxis::Horizontal))
    }

    fn snap_axis(&self, value: f64, axis: GuideAxis) -> f64 {
        if self.snap_to_guides {
            let nearest = self
                .lines
                .iter()
                .filter(|g| g.axis == axis)
                .map(|g| g.position)
                .min_by(|a, b| (a - value).abs().total_cmp(&(b - value).abs()));
            if let Some(pos) = nearest {
                if (pos - value).abs() <= self.snap_threshold {
                    return pos;
                }
            }
        }
        if self.snap_to_grid && self.grid_size > 0.0 {
            return (value / self.grid_size).round() * self.grid_size;
        }
        value
    }

    pub fn add(&mut self, guide: Guide) {
        self.lines.push(guide);
    }

    /// Remove the guide at `index`. Out-of-range indices are ignored.
    pub fn remove(&mut self, index: usize) {
        if index < self.lines.len() {
            self.lines.remove(index);
        }
    }
}
