//! Entity store: the single source of truth for the open document.
//!
//! DESIGN
//! ======
//! `CanvasStore` owns the ordered element list (position = paint order, last
//! paints on top), the selection, tool/viewport/guide state, the spatial
//! index, the undo timeline and the presence of remote participants. It is an
//! explicit context object: the view layer and the sync adapter each hold a
//! reference to it rather than reaching for a global.
//!
//! Every mutation keeps the spatial index in step with the element list.
//! Committed local mutations append a [`Change`] to an outbox that the sync
//! adapter drains; the `apply_remote_*` family mutates the same state without
//! touching the outbox or the history, so remote edits never echo back out
//! and never land on the local undo timeline.
//!
//! History is pushed by discrete operations (add, delete, reorder, group,
//! align, ...) but not by `update_element(s)`: a drag issues many updates and
//! the caller pushes a single entry when the gesture ends.
//!
//! ERROR HANDLING
//! ==============
//! Operations are total. Unknown ids are filtered out, selections too small
//! for grouping (<2) or distribution (<3) turn the call into a no-op, and
//! nothing here returns an error or panics.

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::camera::Camera;
use crate::consts::{GRID_CELL_SIZE, MAX_HISTORY, PASTE_OFFSET};
use crate::doc::{Element, ElementId, ElementKind, ElementPatch, ParticipantId, Shape, now_ms};
use crate::geom::{Bounds, Point};
use crate::guides::Guides;
use crate::history::{EntryInfo, History};
use crate::presence::Presence;
use crate::spatial::SpatialIndex;
use crate::tool::Tool;

// =============================================================
// Types
// =============================================================

/// Construction parameters for a [`CanvasStore`].
#[derive(Debug, Clone, PartialEq)]
pub struct StoreConfig {
    /// Local participant, stamped on created and modified elements.
    pub participant: ParticipantId,
    /// Spatial-index cell edge length in world units.
    pub grid_cell_size: f64,
    /// Maximum retained history entries.
    pub history_limit: usize,
    /// Offset applied to pasted and duplicated elements.
    pub paste_offset: f64,
}

impl StoreConfig {
    #[must_use]
    pub fn new(participant: &str) -> Self {
        Self { participant: participant.to_owned(), ..Self::default() }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            participant: "local".to_owned(),
            grid_cell_size: GRID_CELL_SIZE,
            history_limit: MAX_HISTORY,
            paste_offset: PASTE_OFFSET,
        }
    }
}

/// A committed local mutation, queued for the sync adapter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum Change {
    /// A full element; receivers upsert it (replace in place or append).
    Created(Element),
    /// Sparse update of one element.
    Modified { id: ElementId, patch: ElementPatch },
    /// Elements removed from the top level.
    Deleted(Vec<ElementId>),
    /// New paint order of the whole top level.
    Reordered(Vec<ElementId>),
}

/// Edge or center line used by [`CanvasStore::align_elements`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    Left,
    /// Horizontal center.
    Center,
    Right,
    Top,
    /// Vertical center.
    Middle,
    Bottom,
}

/// Axis used by [`CanvasStore::distribute_elements`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// Everything a renderer needs to draw one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub elements: Vec<Element>,
    pub selected_ids: Vec<ElementId>,
    pub hovered_id: Option<ElementId>,
    pub tool: Tool,
    pub zoom: f64,
    pub pan: Point,
    pub guides: Guides,
}

// =============================================================
// Store
// =============================================================

/// In-memory document plus the editor state around it.
#[derive(Debug, Clone)]
pub struct CanvasStore {
    config: StoreConfig,
    elements: Vec<Element>,
    selected: Vec<ElementId>,
    hovered: Option<ElementId>,
    tool: Tool,
    camera: Camera,
    guides: Guides,
    index: SpatialIndex,
    history: History,
    clipboard: Vec<Element>,
    presence: Presence,
    outbox: Vec<Change>,
}

impl CanvasStore {
    /// Create an empty store. The history starts with one empty entry.
    #[must_use]
    pub fn new(config: StoreConfig) -> Self {
        Self {
            index: SpatialIndex::new(config.grid_cell_size),
            history: History::new(&[], config.history_limit),
            config,
            elements: Vec::new(),
            selected: Vec::new(),
            hovered: None,
            tool: Tool::default(),
            camera: Camera::default(),
            guides: Guides::default(),
            clipboard: Vec::new(),
            presence: Presence::new(),
            outbox: Vec::new(),
        }
    }

    /// Create an empty store with default settings for `participant`.
    #[must_use]
    pub fn with_participant(participant: &str) -> Self {
        Self::new(StoreConfig::new(participant))
    }

    // --- Queries ---

    #[must_use]
    pub fn participant(&self) -> &str {
        &self.config.participant
    }

    /// Elements in paint order, bottom first.
    #[must_use]
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    #[must_use]
    pub fn element(&self, id: &ElementId) -> Option<&Element> {
        self.elements.iter().find(|e| e.id == *id)
    }

    #[must_use]
    pub fn contains(&self, id: &ElementId) -> bool {
        self.position(id).is_some()
    }

    /// Index of `id` in paint order.
    #[must_use]
    pub fn position(&self, id: &ElementId) -> Option<usize> {
        self.elements.iter().position(|e| e.id == *id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    #[must_use]
    pub fn selected_ids(&self) -> &[ElementId] {
        &self.selected
    }

    #[must_use]
    pub fn is_selected(&self, id: &ElementId) -> bool {
        self.selected.contains(id)
    }

    #[must_use]
    pub fn hovered_id(&self) -> Option<ElementId> {
        self.hovered
    }

    #[must_use]
    pub fn tool(&self) -> Tool {
        self.tool
    }

    #[must_use]
    pub fn camera(&self) -> Camera {
        self.camera
    }

    #[must_use]
    pub fn guides(&self) -> &Guides {
        &self.guides
    }

    pub fn guides_mut(&mut self) -> &mut Guides {
        &mut self.guides
    }

    #[must_use]
    pub fn spatial_index(&self) -> &SpatialIndex {
        &self.index
    }

    #[must_use]
    pub fn presence(&self) -> &Presence {
        &self.presence
    }

    pub fn presence_mut(&mut self) -> &mut Presence {
        &mut self.presence
    }

    #[must_use]
    pub fn clipboard(&self) -> &[Element] {
        &self.clipboard
    }

    /// Copy of the state a renderer draws from.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            elements: self.elements.clone(),
            selected_ids: self.selected.clone(),
            hovered_id: self.hovered,
            tool: self.tool,
            zoom: self.camera.zoom,
            pan: Point::new(self.camera.pan_x, self.camera.pan_y),
            guides: self.guides.clone(),
        }
    }

    /// Topmost visible, unlocked element whose bounding box contains `pt`.
    #[must_use]
    pub fn element_at_point(&self, pt: Point) -> Option<&Element> {
        self.elements.iter().rev().find(|e| e.is_interactive() && e.bounds().contains_point(pt))
    }

    /// Union bounding box of the selection, or `None` when nothing is selected.
    #[must_use]
    pub fn selection_bounds(&self) -> Option<Bounds> {
        Bounds::union_all(self.selected_elements().map(Element::bounds))
    }

    /// Visible elements overlapping `view`, in paint order.
    #[must_use]
    pub fn visible_elements(&self, view: Bounds) -> Vec<&Element> {
        let candidates = self.index.query(view);
        self.elements
            .iter()
            .filter(|e| e.visible && candidates.contains(&e.id) && e.bounds().intersects(&view))
            .collect()
    }

    /// Visible elements inside the current camera's viewport.
    #[must_use]
    pub fn visible_in_viewport(&self, viewport_width: f64, viewport_height: f64) -> Vec<&Element> {
        self.visible_elements(self.camera.visible_bounds(viewport_width, viewport_height))
    }

    /// Ids of interactive elements overlapping `area`, in paint order.
    #[must_use]
    pub fn elements_in_bounds(&self, area: Bounds) -> Vec<ElementId> {
        let candidates = self.index.query(area);
        self.elements
            .iter()
            .filter(|e| e.is_interactive() && candidates.contains(&e.id) && e.bounds().intersects(&area))
            .map(|e| e.id)
            .collect()
    }

    fn selected_elements(&self) -> impl Iterator<Item = &Element> {
        self.elements.iter().filter(|e| self.selected.contains(&e.id))
    }

    // --- Selection ---

    /// Replace the selection. Unknown and duplicate ids are dropped.
    pub fn set_selection(&mut self, ids: &[ElementId]) {
        self.selected = self.known_unique(ids);
    }

    pub fn add_to_selection(&mut self, id: ElementId) {
        if self.contains(&id) && !self.selected.contains(&id) {
            self.selected.push(id);
        }
    }

    pub fn toggle_selection(&mut self, id: ElementId) {
        if self.selected.contains(&id) {
            self.selected.retain(|s| *s != id);
        } else {
            self.add_to_selection(id);
        }
    }

    pub fn clear_selection(&mut self) {
        self.selected.clear();
    }

    /// Select every unlocked element.
    pub fn select_all(&mut self) {
        self.selected = self.elements.iter().filter(|e| !e.locked).map(|e| e.id).collect();
    }

    /// Marquee selection. With `additive` the hits are added to the current selection.
    pub fn select_in_bounds(&mut self, area: Bounds, additive: bool) {
        let hits = self.elements_in_bounds(area.normalized());
        if !additive {
            self.selected.clear();
        }
        for id in hits {
            self.add_to_selection(id);
        }
    }

    pub fn set_hovered(&mut self, id: Option<ElementId>) {
        self.hovered = id.filter(|id| self.contains(id));
    }

    /// Update the hovered element from a world point using the spatial index.
    pub fn hover_at(&mut self, pt: Point) -> Option<ElementId> {
        let candidates = self.index.query(Bounds::new(pt.x, pt.y, 0.0, 0.0));
        self.hovered = self
            .elements
            .iter()
            .rev()
            .find(|e| candidates.contains(&e.id) && e.is_interactive() && e.bounds().contains_point(pt))
            .map(|e| e.id);
        self.hovered
    }

    fn known_unique(&self, ids: &[ElementId]) -> Vec<ElementId> {
        let mut seen = HashSet::new();
        ids.iter().copied().filter(|id| self.contains(id) && seen.insert(*id)).collect()
    }

    // --- Tool / viewport / guides ---

    pub fn set_tool(&mut self, tool: Tool) {
        self.tool = tool;
    }

    pub fn set_zoom(&mut self, zoom: f64) {
        self.camera.set_zoom(zoom);
    }

    pub fn zoom_at(&mut self, screen_pt: Point, factor: f64) {
        self.camera.zoom_at(screen_pt, factor);
    }

    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.camera.pan_by(dx, dy);
    }

    pub fn set_pan(&mut self, pan: Point) {
        self.camera.pan_x = pan.x;
        self.camera.pan_y = pan.y;
    }

    pub fn reset_view(&mut self) {
        self.camera = Camera::default();
    }

    /// Fit every element into a viewport of the given size. No-op on an empty document.
    pub fn zoom_to_fit(&mut self, viewport_width: f64, viewport_height: f64) {
        if let Some(content) = Bounds::union_all(self.elements.iter().map(Element::bounds)) {
            self.camera.fit(content, viewport_width, viewport_height);
        }
    }

    #[must_use]
    pub fn snap_point(&self, pt: Point) -> Point {
        self.guides.snap_point(pt)
    }

    // --- Create ---

    /// Append an element on top of the paint order and select it.
    pub fn add_element(&mut self, element: Element) -> ElementId {
        let id = element.id;
        self.add_elements(vec![element]);
        id
    }

    /// Append elements on top, select them, and push one history entry.
    ///
    /// An element whose id is already present replaces the old one.
    pub fn add_elements(&mut self, elements: Vec<Element>) -> Vec<ElementId> {
        if elements.is_empty() {
            return Vec::new();
        }
        let description = match elements.as_slice() {
            [only] => format!("Add {}", only.kind().label()),
            many => format!("Add {} elements", many.len()),
        };
        let mut ids = Vec::with_capacity(elements.len());
        for el in elements {
            self.elements.retain(|e| e.id != el.id);
            self.index.insert(&el);
            self.outbox.push(Change::Created(el.clone()));
            ids.push(el.id);
            self.elements.push(el);
        }
        let ids = self.known_unique(&ids);
        self.selected.clone_from(&ids);
        self.push_history(&description);
        ids
    }

    /// Create an element of the active tool's kind from a finished drag.
    ///
    /// Both corners are snapped first. Returns `None` for tools that do not
    /// create elements.
    pub fn commit_draw(&mut self, start: Point, end: Point) -> Option<ElementId> {
        let kind = self.tool.creates()?;
        let bounds = Bounds::from_corners(self.snap_point(start), self.snap_point(end));
        let el = Element::of_kind(kind, bounds, &self.config.participant);
        Some(self.add_element(el))
    }

    // --- Update ---

    /// Merge `patch` into element `id`. No history entry is pushed.
    ///
    /// Returns `false` when `id` does not exist.
    pub fn update_element(&mut self, id: ElementId, patch: ElementPatch) -> bool {
        let Some(el) = self.elements.iter_mut().find(|e| e.id == id) else {
            return false;
        };
        el.apply_patch(&patch);
        el.updated_at = now_ms();
        self.config.participant.clone_into(&mut el.last_modified_by);
        if patch.touches_geometry() {
            self.index.insert(el);
        }
        self.outbox.push(Change::Modified { id, patch });
        true
    }

    /// Apply several updates. Returns how many ids were found.
    pub fn update_elements(&mut self, updates: Vec<(ElementId, ElementPatch)>) -> usize {
        updates.into_iter().filter(|(id, patch)| self.update_element(*id, patch.clone())).count()
    }

    /// Move every selected element by `(dx, dy)` and record one history entry.
    pub fn nudge_selected(&mut self, dx: f64, dy: f64) {
        let moves: Vec<(ElementId, ElementPatch)> =
            self.selected_elements().map(|e| (e.id, ElementPatch::position(e.x + dx, e.y + dy))).collect();
        if self.update_elements(moves) > 0 {
            self.push_history("Move");
        }
    }

    pub fn set_locked(&mut self, ids: &[ElementId], locked: bool) {
        let patch = ElementPatch { locked: Some(locked), ..Default::default() };
        let updates = self.known_unique(ids).into_iter().map(|id| (id, patch.clone())).collect();
        if self.update_elements(updates) > 0 {
            self.push_history(if locked { "Lock" } else { "Unlock" });
        }
    }

    pub fn set_visible(&mut self, ids: &[ElementId], visible: bool) {
        let patch = ElementPatch { visible: Some(visible), ..Default::default() };
        let updates = self.known_unique(ids).into_iter().map(|id| (id, patch.clone())).collect();
        if self.update_elements(updates) > 0 {
            self.push_history(if visible { "Show" } else { "Hide" });
        }
    }

    pub fn rename_element(&mut self, id: ElementId, name: &str) {
        if self.update_element(id, ElementPatch { name: Some(name.to_owned()), ..Default::default() }) {
            self.push_history("Rename");
        }
    }

    // --- Delete ---

    /// Remove elements, drop them from the selection, and push one history entry.
    pub fn delete_elements(&mut self, ids: &[ElementId]) {
        let doomed = self.known_unique(ids);
        if doomed.is_empty() {
            return;
        }
        self.remove_top_level(&doomed);
        let description = match doomed.len() {
            1 => "Delete element".to_owned(),
            n => format!("Delete {n} elements"),
        };
        self.outbox.push(Change::Deleted(doomed));
        self.push_history(&description);
    }

    pub fn delete_selected(&mut self) {
        let ids = self.selected.clone();
        self.delete_elements(&ids);
    }

    fn remove_top_level(&mut self, ids: &[ElementId]) {
        let doomed: HashSet<ElementId> = ids.iter().copied().collect();
        self.elements.retain(|e| !doomed.contains(&e.id));
        for id in &doomed {
            self.index.remove(id);
        }
        self.selected.retain(|id| !doomed.contains(id));
        if self.hovered.is_some_and(|h| doomed.contains(&h)) {
            self.hovered = None;
        }
    }

    // --- Z-order ---

    /// Move `ids` to the top of the paint order, keeping their relative order.
    pub fn bring_to_front(&mut self, ids: &[ElementId]) {
        let set: HashSet<ElementId> = ids.iter().copied().collect();
        let (moved, rest): (Vec<Element>, Vec<Element>) = self.elements.iter().cloned().partition(|e| set.contains(&e.id));
        let mut order = rest;
        order.extend(moved);
        self.reorder(order, "Bring to front");
    }

    /// Move `ids` to the bottom of the paint order, keeping their relative order.
    pub fn send_to_back(&mut self, ids: &[ElementId]) {
        let set: HashSet<ElementId> = ids.iter().copied().collect();
        let (mut order, rest): (Vec<Element>, Vec<Element>) =
            self.elements.iter().cloned().partition(|e| set.contains(&e.id));
        order.extend(rest);
        self.reorder(order, "Send to back");
    }

    /// Swap each of `ids` with the element directly above it.
    ///
    /// Walks top to bottom so an element moved this call is never swapped
    /// again, and a contiguous block moves up as a unit.
    pub fn bring_forward(&mut self, ids: &[ElementId]) {
        let set: HashSet<ElementId> = ids.iter().copied().collect();
        let mut order = self.elements.clone();
        for i in (0..order.len().saturating_sub(1)).rev() {
            if set.contains(&order[i].id) && !set.contains(&order[i + 1].id) {
                order.swap(i, i + 1);
            }
        }
        self.reorder(order, "Bring forward");
    }

    /// Swap each of `ids` with the element directly below it.
    ///
    /// Walks bottom to top, mirroring [`CanvasStore::bring_forward`].
    pub fn send_backward(&mut self, ids: &[ElementId]) {
        let set: HashSet<ElementId> = ids.iter().copied().collect();
        let mut order = self.elements.clone();
        for i in 1..order.len() {
            if set.contains(&order[i].id) && !set.contains(&order[i - 1].id) {
                order.swap(i - 1, i);
            }
        }
        self.reorder(order, "Send backward");
    }

    fn reorder(&mut self, order: Vec<Element>, description: &str) {
        let unchanged = order.iter().map(|e| e.id).eq(self.elements.iter().map(|e| e.id));
        if unchanged {
            return;
        }
        self.elements = order;
        self.outbox.push(Change::Reordered(self.elements.iter().map(|e| e.id).collect()));
        self.push_history(description);
    }

    // --- Grouping ---

    /// Wrap two or more elements in a new group placed on top.
    ///
    /// Children keep their paint order and are stored relative to the group
    /// origin. Returns the new group's id, or `None` with fewer than two known ids.
    pub fn group_elements(&mut self, ids: &[ElementId]) -> Option<ElementId> {
        let members: HashSet<ElementId> = self.known_unique(ids).into_iter().collect();
        if members.len() < 2 {
            return None;
        }
        let bounds = Bounds::union_all(
            self.elements.iter().filter(|e| members.contains(&e.id)).map(Element::bounds),
        )?;
        let (mut children, rest): (Vec<Element>, Vec<Element>) =
            std::mem::take(&mut self.elements).into_iter().partition(|e| members.contains(&e.id));
        self.elements = rest;

        let child_ids: Vec<ElementId> = children.iter().map(|c| c.id).collect();
        for child in &mut children {
            child.translate(-bounds.x, -bounds.y);
            self.index.remove(&child.id);
        }

        let group = Element::new(Shape::Group { children }, bounds, &self.config.participant);
        let group_id = group.id;
        self.index.insert(&group);
        self.outbox.push(Change::Deleted(child_ids));
        self.outbox.push(Change::Created(group.clone()));
        self.elements.push(group);
        self.selected = vec![group_id];
        self.hovered = None;
        self.push_history("Group");
        Some(group_id)
    }

    /// Dissolve groups among `ids`, restoring their children in place.
    ///
    /// Restored children get fresh identifiers and absolute coordinates and
    /// become the selection. Non-group ids are ignored.
    pub fn ungroup_elements(&mut self, ids: &[ElementId]) -> Vec<ElementId> {
        let mut restored_ids = Vec::new();
        let mut dissolved = false;
        let now = now_ms();
        for id in self.known_unique(ids) {
            let Some(pos) = self.position(&id) else {
                continue;
            };
            if self.elements[pos].kind() != ElementKind::Group {
                continue;
            }
            let mut group = self.elements.remove(pos);
            self.index.remove(&group.id);
            self.outbox.push(Change::Deleted(vec![group.id]));
            dissolved = true;

            let mut restored = group.take_children();
            for child in &mut restored {
                child.id = Uuid::new_v4();
                child.translate(group.x, group.y);
                child.updated_at = now;
                self.config.participant.clone_into(&mut child.last_modified_by);
                self.index.insert(child);
                self.outbox.push(Change::Created(child.clone()));
                restored_ids.push(child.id);
            }
            self.elements.splice(pos..pos, restored);
        }
        if !dissolved {
            return restored_ids;
        }
        // Receivers append created elements, so restate where the children went.
        self.outbox.push(Change::Reordered(self.elements.iter().map(|e| e.id).collect()));
        self.selected.clone_from(&restored_ids);
        self.hovered = None;
        self.push_history("Ungroup");
        restored_ids
    }

    // --- Alignment ---

    /// Line up the selection against an edge or center of its union box.
    pub fn align_elements(&mut self, alignment: Alignment) {
        let Some(target) = self.selection_bounds() else {
            return;
        };
        let moves: Vec<(ElementId, ElementPatch)> = self
            .selected_elements()
            .filter_map(|e| {
                let b = e.bounds();
                let (x, y) = match alignment {
                    Alignment::Left => (target.x, b.y),
                    Alignment::Center => (target.center().x - b.width / 2.0, b.y),
                    Alignment::Right => (target.right() - b.width, b.y),
                    Alignment::Top => (b.x, target.y),
                    Alignment::Middle => (b.x, target.center().y - b.height / 2.0),
                    Alignment::Bottom => (b.x, target.bottom() - b.height),
                };
                moved(b, x, y).then(|| (e.id, ElementPatch::position(x, y)))
            })
            .collect();
        if self.update_elements(moves) > 0 {
            self.push_history("Align");
        }
    }

    /// Space three or more selected elements with equal gaps along `axis`.
    ///
    /// The first and last elements along the axis stay put; the ones between
    /// are repositioned so every gap between neighbouring boxes is the same.
    pub fn distribute_elements(&mut self, axis: Axis) {
        let mut items: Vec<(ElementId, Bounds)> = self.selected_elements().map(|e| (e.id, e.bounds())).collect();
        if items.len() < 3 {
            return;
        }
        // (start, extent) of a box along the axis.
        let along = |b: &Bounds| match axis {
            Axis::Horizontal => (b.x, b.width),
            Axis::Vertical => (b.y, b.height),
        };
        items.sort_by(|a, b| along(&a.1).0.total_cmp(&along(&b.1).0));

        let (first_start, first_extent) = along(&items[0].1);
        let (last_start, last_extent) = along(&items[items.len() - 1].1);
        let occupied: f64 = items.iter().map(|(_, b)| along(b).1).sum();
        #[allow(clippy::cast_precision_loss)]
        let gap = (last_start + last_extent - first_start - occupied) / (items.len() - 1) as f64;

        let mut cursor = first_start + first_extent + gap;
        let mut moves = Vec::new();
        for (id, b) in &items[1..items.len() - 1] {
            let (x, y) = match axis {
                Axis::Horizontal => (cursor, b.y),
                Axis::Vertical => (b.x, cursor),
            };
            if moved(*b, x, y) {
                moves.push((*id, ElementPatch::position(x, y)));
            }
            cursor += along(b).1 + gap;
        }
        if self.update_elements(moves) > 0 {
            self.push_history("Distribute");
        }
    }

    // --- Clipboard ---

    /// Copy the selection to the clipboard. Returns how many were copied.
    pub fn copy(&mut self) -> usize {
        self.clipboard = self.selected_elements().cloned().collect();
        self.clipboard.len()
    }

    /// Copy the selection, then delete it.
    pub fn cut(&mut self) -> usize {
        let n = self.copy();
        self.delete_selected();
        n
    }

    /// Add offset copies of the clipboard with fresh ids.
    ///
    /// Repeated pastes cascade: each one lands one offset further from the last.
    pub fn paste(&mut self) -> Vec<ElementId> {
        let copies = self.offset_copies(&self.clipboard);
        if copies.is_empty() {
            return Vec::new();
        }
        self.clipboard.clone_from(&copies);
        self.add_elements(copies)
    }

    /// Add offset copies of the selection without touching the clipboard.
    pub fn duplicate(&mut self) -> Vec<ElementId> {
        let selected: Vec<Element> = self.selected_elements().cloned().collect();
        let copies = self.offset_copies(&selected);
        self.add_elements(copies)
    }

    fn offset_copies(&self, source: &[Element]) -> Vec<Element> {
        let offset = self.config.paste_offset;
        source
            .iter()
            .map(|e| {
                let mut copy = e.duplicate(&self.config.participant);
                copy.translate(offset, offset);
                copy
            })
            .collect()
    }

    // --- History ---

    /// Record the current document as a new history entry.
    ///
    /// Ignored while an undo/redo replay is in progress.
    pub fn push_history(&mut self, description: &str) -> bool {
        self.history.push(&self.elements, description)
    }

    /// Restore the previous history entry. Returns `false` at the start of the timeline.
    pub fn undo(&mut self) -> bool {
        let Some(snapshot) = self.history.undo() else {
            return false;
        };
        self.restore(snapshot);
        self.history.end_replay();
        true
    }

    /// Restore the next history entry. Returns `false` at the end of the timeline.
    pub fn redo(&mut self) -> bool {
        let Some(snapshot) = self.history.redo() else {
            return false;
        };
        self.restore(snapshot);
        self.history.end_replay();
        true
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    #[must_use]
    pub fn history_entries(&self) -> Vec<EntryInfo> {
        self.history.entries()
    }

    /// Swap in a snapshot, queueing the difference for peers.
    fn restore(&mut self, snapshot: Vec<Element>) {
        self.outbox.extend(diff_changes(&self.elements, &snapshot));
        self.elements = snapshot;
        self.index.rebuild(&self.elements);
        self.selected.clear();
        self.hovered = None;
    }

    // --- Remote apply ---

    /// Upsert an element received from a peer: replace in place or append on top.
    pub fn apply_remote_create(&mut self, element: Element) {
        self.index.insert(&element);
        if let Some(pos) = self.position(&element.id) {
            self.elements[pos] = element;
        } else {
            self.elements.push(element);
        }
    }

    /// Merge a peer's sparse update. Unknown ids are ignored.
    pub fn apply_remote_update(&mut self, id: ElementId, patch: &ElementPatch, origin: &str) -> bool {
        let Some(el) = self.elements.iter_mut().find(|e| e.id == id) else {
            return false;
        };
        el.apply_patch(patch);
        el.updated_at = now_ms();
        origin.clone_into(&mut el.last_modified_by);
        if patch.touches_geometry() {
            self.index.insert(el);
        }
        true
    }

    /// Remove elements deleted by a peer.
    pub fn apply_remote_delete(&mut self, ids: &[ElementId]) {
        let known = self.known_unique(ids);
        if known.is_empty() {
            return;
        }
        self.remove_top_level(&known);
        let elements = &self.elements;
        self.presence.retain_selected(|id| elements.iter().any(|e| e.id == *id));
    }

    /// Adopt a peer's paint order. Ids missing from `order` keep their
    /// relative order above the listed ones.
    pub fn apply_remote_reorder(&mut self, order: &[ElementId]) {
        let rank: HashMap<ElementId, usize> = order.iter().enumerate().map(|(i, id)| (*id, i)).collect();
        self.elements.sort_by_key(|e| rank.get(&e.id).copied().unwrap_or(usize::MAX));
    }

    /// Replace the whole document, e.g. on joining a room.
    ///
    /// The index is rebuilt, the selection cleared and the history restarted
    /// from the loaded state.
    pub fn load_elements(&mut self, elements: Vec<Element>) {
        self.elements = elements;
        self.index.rebuild(&self.elements);
        self.selected.clear();
        self.hovered = None;
        self.history.reset(&self.elements);
    }

    // --- Outbox ---

    /// Drain the committed local mutations not yet handed to the sync adapter.
    pub fn take_changes(&mut self) -> Vec<Change> {
        std::mem::take(&mut self.outbox)
    }

    #[must_use]
    pub fn has_changes(&self) -> bool {
        !self.outbox.is_empty()
    }
}

impl Default for CanvasStore {
    fn default() -> Self {
        Self::new(StoreConfig::default())
    }
}

/// Whether a box at `(x, y)` differs from `b`'s origin.
fn moved(b: Bounds, x: f64, y: f64) -> bool {
    (b.x - x).abs() > f64::EPSILON || (b.y - y).abs() > f64::EPSILON
}

/// Changes that turn `old` into `new` for a receiver applying them in order.
///
/// Changed and new elements travel as full upserts; a `Reordered` closes the
/// list when the receiver's resulting order would differ from `new`.
fn diff_changes(old: &[Element], new: &[Element]) -> Vec<Change> {
    let old_by_id: HashMap<ElementId, &Element> = old.iter().map(|e| (e.id, e)).collect();
    let new_ids: HashSet<ElementId> = new.iter().map(|e| e.id).collect();
    let mut changes = Vec::new();

    let deleted: Vec<ElementId> = old.iter().map(|e| e.id).filter(|id| !new_ids.contains(id)).collect();
    if !deleted.is_empty() {
        changes.push(Change::Deleted(deleted));
    }

    let mut appended = Vec::new();
    for el in new {
        match old_by_id.get(&el.id) {
            None => {
                appended.push(el.id);
                changes.push(Change::Created(el.clone()));
            }
            Some(prev) if *prev != el => changes.push(Change::Created(el.clone())),
            Some(_) => {}
        }
    }

    let receiver_order = old.iter().map(|e| e.id).filter(|id| new_ids.contains(id)).chain(appended);
    if !receiver_order.eq(new.iter().map(|e| e.id)) {
        changes.push(Change::Reordered(new.iter().map(|e| e.id).collect()));
    }
    changes
}
