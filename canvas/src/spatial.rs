//! Grid-bucketed spatial index over element bounding boxes.
//!
//! DESIGN
//! ======
//! The plane is cut into square cells of a fixed size. Each element id is
//! registered in every cell its bounding box touches, and the index keeps the
//! list of touched cells per id so `remove` only visits those cells. A query
//! returns the union of the ids in every cell the query box touches: a
//! superset of the true overlaps at cell granularity. Callers needing exact
//! hit-testing must still check precise geometry.
//!
//! Query cost is bounded by the occupied cells, not the query area: when the
//! query box spans more cells than are occupied, the occupied cells are
//! walked and filtered by key instead. Elements spanning more than
//! `MAX_ELEMENT_CELLS` cells are kept in a side table of boxes and matched
//! by intersection.
//!
//! Input is not sanitized: NaN or infinite boxes are the caller's problem.

#[cfg(test)]
#[path = "spatial_test.rs"]
mod spatial_test;

use std::collections::{HashMap, HashSet};

use crate::consts::GRID_CELL_SIZE;
use crate::doc::{Element, ElementId};
use crate::geom::Bounds;

/// Integer grid coordinates of a cell.
type CellKey = (i64, i64);

/// Elements covering more cells than this skip the grid.
const MAX_ELEMENT_CELLS: u128 = 4096;

/// Inclusive cell rectangle covered by a box.
#[derive(Debug, Clone, Copy)]
struct CellRange {
    x0: i64,
    y0: i64,
    x1: i64,
    y1: i64,
}

impl CellRange {
    fn cell_total(self) -> u128 {
        let w = u128::try_from(i128::from(self.x1) - i128::from(self.x0) + 1).unwrap_or(0);
        let h = u128::try_from(i128::from(self.y1) - i128::from(self.y0) + 1).unwrap_or(0);
        w.saturating_mul(h)
    }

    fn contains(self, (cx, cy): CellKey) -> bool {
        (self.x0..=self.x1).contains(&cx) && (self.y0..=self.y1).contains(&cy)
    }

    fn keys(self) -> impl Iterator<Item = CellKey> {
        (self.x0..=self.x1).flat_map(move |cx| (self.y0..=self.y1).map(move |cy| (cx, cy)))
    }
}

/// Grid-based index mapping cells to the element ids they overlap.
#[derive(Debug, Clone)]
pub struct SpatialIndex {
    cell_size: f64,
    cells: HashMap<CellKey, HashSet<ElementId>>,
    touched: HashMap<ElementId, Vec<CellKey>>,
    oversized: HashMap<ElementId, Bounds>,
}

impl SpatialIndex {
    /// Create an empty index with the given cell edge length.
    #[must_use]
    pub fn new(cell_size: f64) -> Self {
        Self { cell_size, cells: HashMap::new(), touched: HashMap::new(), oversized: HashMap::new() }
    }

    #[must_use]
    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    /// Register `element` in every cell its bounding box touches.
    ///
    /// Re-inserting an id already present replaces its old cells.
    pub fn insert(&mut self, element: &Element) {
        self.insert_bounds(element.id, element.bounds());
    }

    /// Register `id` under an explicit box.
    pub fn insert_bounds(&mut self, id: ElementId, bounds: Bounds) {
        self.remove(&id);
        let range = self.range_for(bounds);
        if range.cell_total() > MAX_ELEMENT_CELLS {
            self.oversized.insert(id, bounds.normalized());
            self.touched.insert(id, Vec::new());
            return;
        }
        let keys: Vec<CellKey> = range.keys().collect();
        for key in &keys {
            self.cells.entry(*key).or_default().insert(id);
        }
        self.touched.insert(id, keys);
    }

    /// Forget `id`. Unknown ids are ignored.
    pub fn remove(&mut self, id: &ElementId) {
        let Some(keys) = self.touched.remove(id) else {
            return;
        };
        self.oversized.remove(id);
        for key in keys {
            if let Some(members) = self.cells.get_mut(&key) {
                members.remove(id);
                if members.is_empty() {
                    self.cells.remove(&key);
                }
            }
        }
    }

    /// Ids registered in any cell touched by `bounds`.
    #[must_use]
    pub fn query(&self, bounds: Bounds) -> HashSet<ElementId> {
        let range = self.range_for(bounds);
        let mut out = HashSet::new();
        if range.cell_total() > self.cell_count() as u128 {
            for (key, members) in &self.cells {
                if range.contains(*key) {
                    out.extend(members.iter().copied());
                }
            }
        } else {
            for key in range.keys() {
                if let Some(members) = self.cells.get(&key) {
                    out.extend(members.iter().copied());
                }
            }
        }
        let b = bounds.normalized();
        out.extend(self.oversized.iter().filter(|(_, big)| big.intersects(&b)).map(|(id, _)| *id));
        out
    }

    /// Clear and re-insert every element.
    pub fn rebuild<'a, I>(&mut self, elements: I)
    where
        I: IntoIterator<Item = &'a Element>,
    {
        self.clear();
        for el in elements {
            self.insert(el);
        }
    }

    pub fn clear(&mut self) {
        self.cells.clear();
        self.touched.clear();
        self.oversized.clear();
    }

    #[must_use]
    pub fn contains(&self, id: &ElementId) -> bool {
        self.touched.contains_key(id)
    }

    /// Every id currently registered.
    #[must_use]
    pub fn ids(&self) -> HashSet<ElementId> {
        self.touched.keys().copied().collect()
    }

    /// Number of registered ids.
    #[must_use]
    pub fn len(&self) -> usize {
        self.touched.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.touched.is_empty()
    }

    /// Number of non-empty cells.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Cells covered by `bounds`. A zero-size box covers exactly one cell.
    /// Coordinates beyond the `i64` range saturate.
    #[allow(clippy::cast_possible_truncation)]
    fn range_for(&self, bounds: Bounds) -> CellRange {
        let b = bounds.normalized();
        let cell = |v: f64| (v / self.cell_size).floor() as i64;
        CellRange { x0: cell(b.x), y0: cell(b.y), x1: cell(b.right()), y1: cell(b.bottom()) }
    }
}

impl Default for SpatialIndex {
    fn default() -> Self {
        Self::new(GRID_CELL_SIZE)
    }
}
