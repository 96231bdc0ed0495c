//! Browser-facing handle around [`CanvasStore`].
//!
//! The JS view layer talks to the store through `CanvasHandle`: scalars go in
//! directly, everything structured crosses the boundary as a JSON string.
//! Failures come back as the error's display text so the host can log it.
//!
//! Nothing here touches `JsValue`, so the handle also runs (and is tested) on
//! native targets.

#[cfg(test)]
#[path = "bindings_test.rs"]
mod bindings_test;

use serde::Serialize;
use serde::de::DeserializeOwned;
use wasm_bindgen::prelude::*;

use crate::doc::{Element, ElementId, ElementKind, ElementPatch, now_ms};
use crate::export::ExportDocument;
use crate::geom::{Bounds, Point};
use crate::presence::PresenceUpdate;
use crate::store::{Alignment, Axis, CanvasStore, Change, StoreConfig};
use crate::tool::Tool;

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, String> {
    serde_json::to_string(value).map_err(|e| e.to_string())
}

fn from_json<T: DeserializeOwned>(input: &str) -> Result<T, String> {
    serde_json::from_str(input).map_err(|e| e.to_string())
}

/// Parse a bare enum name such as `"left"` or `"rectangle"`.
fn from_name<T: DeserializeOwned>(name: &str) -> Result<T, String> {
    serde_json::from_value(serde_json::Value::String(name.to_owned())).map_err(|e| e.to_string())
}

fn parse_id(id: &str) -> Result<ElementId, String> {
    ElementId::parse_str(id).map_err(|e| e.to_string())
}

#[wasm_bindgen]
pub struct CanvasHandle {
    store: CanvasStore,
}

#[wasm_bindgen]
impl CanvasHandle {
    #[wasm_bindgen(constructor)]
    #[must_use]
    pub fn new(participant: &str) -> Self {
        Self { store: CanvasStore::new(StoreConfig::new(participant)) }
    }

    // --- Read ---

    /// Render snapshot as JSON.
    pub fn snapshot(&self) -> Result<String, String> {
        to_json(&self.store.snapshot())
    }

    /// Visible elements overlapping a world-space box, in paint order.
    pub fn visible_elements(&self, x: f64, y: f64, width: f64, height: f64) -> Result<String, String> {
        to_json(&self.store.visible_elements(Bounds::new(x, y, width, height)))
    }

    pub fn element_at(&self, x: f64, y: f64) -> Option<String> {
        self.store.element_at_point(Point::new(x, y)).map(|e| e.id.to_string())
    }

    pub fn selection_bounds(&self) -> Result<String, String> {
        to_json(&self.store.selection_bounds())
    }

    pub fn history(&self) -> Result<String, String> {
        to_json(&self.store.history_entries())
    }

    pub fn participants(&self) -> Result<String, String> {
        to_json(&self.store.presence().participants())
    }

    // --- Create / update / delete ---

    /// Add a default element of `kind` and return its id.
    pub fn add_element(&mut self, kind: &str, x: f64, y: f64, width: f64, height: f64) -> Result<String, String> {
        let kind: ElementKind = from_name(kind)?;
        let el = Element::of_kind(kind, Bounds::new(x, y, width, height), self.store.participant());
        Ok(self.store.add_element(el).to_string())
    }

    /// Add a fully specified element given as JSON and return its id.
    pub fn add_element_json(&mut self, element: &str) -> Result<String, String> {
        let el: Element = from_json(element)?;
        Ok(self.store.add_element(el).to_string())
    }

    /// Finish a drag with the active tool. Returns the new id, if one was created.
    pub fn commit_draw(&mut self, x0: f64, y0: f64, x1: f64, y1: f64) -> Option<String> {
        self.store.commit_draw(Point::new(x0, y0), Point::new(x1, y1)).map(|id| id.to_string())
    }

    /// Merge a JSON patch into one element. Does not record history.
    pub fn update_element(&mut self, id: &str, patch: &str) -> Result<bool, String> {
        let patch: ElementPatch = from_json(patch)?;
        Ok(self.store.update_element(parse_id(id)?, patch))
    }

    pub fn delete_selected(&mut self) {
        self.store.delete_selected();
    }

    pub fn nudge_selected(&mut self, dx: f64, dy: f64) {
        self.store.nudge_selected(dx, dy);
    }

    // --- Selection ---

    /// Replace the selection with a JSON array of ids.
    pub fn set_selection(&mut self, ids: &str) -> Result<(), String> {
        let ids: Vec<ElementId> = from_json(ids)?;
        self.store.set_selection(&ids);
        Ok(())
    }

    /// Click-select: the topmost element at a world point, or nothing.
    pub fn select_at(&mut self, x: f64, y: f64, additive: bool) -> Option<String> {
        let hit = self.store.element_at_point(Point::new(x, y)).map(|e| e.id);
        match (hit, additive) {
            (Some(id), true) => self.store.toggle_selection(id),
            (Some(id), false) => self.store.set_selection(&[id]),
            (None, false) => self.store.clear_selection(),
            (None, true) => {}
        }
        hit.map(|id| id.to_string())
    }

    pub fn select_in_bounds(&mut self, x: f64, y: f64, width: f64, height: f64, additive: bool) {
        self.store.select_in_bounds(Bounds::new(x, y, width, height), additive);
    }

    pub fn select_all(&mut self) {
        self.store.select_all();
    }

    pub fn clear_selection(&mut self) {
        self.store.clear_selection();
    }

    pub fn hover_at(&mut self, x: f64, y: f64) -> Option<String> {
        self.store.hover_at(Point::new(x, y)).map(|id| id.to_string())
    }

    // --- Arrange ---

    pub fn bring_to_front(&mut self) {
        let ids = self.store.selected_ids().to_vec();
        self.store.bring_to_front(&ids);
    }

    pub fn send_to_back(&mut self) {
        let ids = self.store.selected_ids().to_vec();
        self.store.send_to_back(&ids);
    }

    pub fn bring_forward(&mut self) {
        let ids = self.store.selected_ids().to_vec();
        self.store.bring_forward(&ids);
    }

    pub fn send_backward(&mut self) {
        let ids = self.store.selected_ids().to_vec();
        self.store.send_backward(&ids);
    }

    pub fn group_selected(&mut self) -> Option<String> {
        let ids = self.store.selected_ids().to_vec();
        self.store.group_elements(&ids).map(|id| id.to_string())
    }

    /// Ungroup selected groups; returns the restored ids as JSON.
    pub fn ungroup_selected(&mut self) -> Result<String, String> {
        let ids = self.store.selected_ids().to_vec();
        to_json(&self.store.ungroup_elements(&ids))
    }

    /// `left`, `center`, `right`, `top`, `middle` or `bottom`.
    pub fn align(&mut self, alignment: &str) -> Result<(), String> {
        let alignment: Alignment = from_name(alignment)?;
        self.store.align_elements(alignment);
        Ok(())
    }

    /// `horizontal` or `vertical`.
    pub fn distribute(&mut self, axis: &str) -> Result<(), String> {
        let axis: Axis = from_name(axis)?;
        self.store.distribute_elements(axis);
        Ok(())
    }

    // --- Clipboard ---

    pub fn copy(&mut self) -> usize {
        self.store.copy()
    }

    pub fn cut(&mut self) -> usize {
        self.store.cut()
    }

    pub fn paste(&mut self) -> Result<String, String> {
        to_json(&self.store.paste())
    }

    pub fn duplicate(&mut self) -> Result<String, String> {
        to_json(&self.store.duplicate())
    }

    // --- History ---

    pub fn push_history(&mut self, description: &str) -> bool {
        self.store.push_history(description)
    }

    pub fn undo(&mut self) -> bool {
        self.store.undo()
    }

    pub fn redo(&mut self) -> bool {
        self.store.redo()
    }

    pub fn can_undo(&self) -> bool {
        self.store.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.store.can_redo()
    }

    // --- Tool / viewport ---

    pub fn set_tool(&mut self, tool: &str) -> Result<(), String> {
        let tool: Tool = from_name(tool)?;
        self.store.set_tool(tool);
        Ok(())
    }

    pub fn zoom_at(&mut self, screen_x: f64, screen_y: f64, factor: f64) {
        self.store.zoom_at(Point::new(screen_x, screen_y), factor);
    }

    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.store.pan_by(dx, dy);
    }

    pub fn reset_view(&mut self) {
        self.store.reset_view();
    }

    pub fn zoom_to_fit(&mut self, viewport_width: f64, viewport_height: f64) {
        self.store.zoom_to_fit(viewport_width, viewport_height);
    }

    pub fn set_snap_to_grid(&mut self, enabled: bool) {
        self.store.guides_mut().snap_to_grid = enabled;
    }

    pub fn set_show_grid(&mut self, enabled: bool) {
        self.store.guides_mut().show_grid = enabled;
    }

    // --- Sync plumbing ---

    /// Drain the pending local changes as a JSON array.
    pub fn take_changes(&mut self) -> Result<String, String> {
        to_json(&self.store.take_changes())
    }

    /// Apply one change received from `origin`. Never re-queued or recorded.
    pub fn apply_remote(&mut self, change: &str, origin: &str) -> Result<(), String> {
        match from_json::<Change>(change)? {
            Change::Created(el) => self.store.apply_remote_create(el),
            Change::Modified { id, patch } => {
                self.store.apply_remote_update(id, &patch, origin);
            }
            Change::Deleted(ids) => self.store.apply_remote_delete(&ids),
            Change::Reordered(order) => self.store.apply_remote_reorder(&order),
        }
        Ok(())
    }

    /// Merge a JSON presence update for a remote participant.
    pub fn apply_presence(&mut self, participant: &str, update: &str) -> Result<(), String> {
        let update: PresenceUpdate = from_json(update)?;
        self.store.presence_mut().apply(participant, update, now_ms());
        Ok(())
    }

    pub fn remove_participant(&mut self, participant: &str) {
        self.store.presence_mut().leave(participant);
    }

    // --- Export ---

    pub fn export_json(&self, room_id: Option<String>) -> Result<String, String> {
        self.store.export(room_id.as_deref()).to_json().map_err(|e| e.to_string())
    }

    pub fn import_json(&mut self, input: &str) -> Result<(), String> {
        let doc = ExportDocument::from_json(input).map_err(|e| e.to_string())?;
        self.store.import(doc);
        Ok(())
    }
}

impl CanvasHandle {
    /// Borrow the wrapped store.
    #[must_use]
    pub fn store(&self) -> &CanvasStore {
        &self.store
    }
}
