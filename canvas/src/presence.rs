//! Remote participant state: cursors, selections and viewports of peers.
//!
//! Entries are keyed by participant id, created or refreshed by presence
//! updates, and dropped on an explicit leave. Cursors that stop moving for
//! [`CURSOR_STALE_MS`] are hidden by [`Presence::prune_stale_cursors`] but the
//! participant itself is kept until it leaves.

#[cfg(test)]
#[path = "presence_test.rs"]
mod presence_test;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::camera::Camera;
use crate::consts::CURSOR_STALE_MS;
use crate::doc::{ElementId, ParticipantId};
use crate::geom::Point;

/// What one remote participant is doing right now.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub id: ParticipantId,
    pub name: String,
    /// CSS colour used for the cursor and selection outline.
    pub color: String,
    pub cursor: Option<Point>,
    pub selection: Vec<ElementId>,
    pub camera: Option<Camera>,
    /// When the cursor was last moved, in ms since the Unix epoch.
    pub cursor_updated_at: i64,
}

/// Sparse presence update. Absent fields keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresenceUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cursor: Option<Point>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selection: Option<Vec<ElementId>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub camera: Option<Camera>,
}

/// Live presence of every remote participant.
#[derive(Debug, Clone, Default)]
pub struct Presence {
    participants: HashMap<ParticipantId, Participant>,
}

impl Presence {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create or refresh a participant from a sparse update received at `ts`.
    pub fn apply(&mut self, id: &str, update: PresenceUpdate, ts: i64) {
        let entry = self.participants.entry(id.to_owned()).or_insert_with(|| Participant {
            id: id.to_owned(),
            name: "Guest".to_owned(),
            color: "#8A8178".to_owned(),
            cursor: None,
            selection: Vec::new(),
            camera: None,
            cursor_updated_at: ts,
        });
        if let Some(name) = update.name {
            entry.name = name;
        }
        if let Some(color) = update.color {
            entry.color = color;
        }
        if let Some(cursor) = update.cursor {
            entry.cursor = Some(cursor);
            entry.cursor_updated_at = ts;
        }
        if let Some(selection) = update.selection {
            entry.selection = selection;
        }
        if let Some(camera) = update.camera {
            entry.camera = Some(camera);
        }
    }

    /// Remove a participant after an explicit leave. Returns it if present.
    pub fn leave(&mut self, id: &str) -> Option<Participant> {
        self.participants.remove(id)
    }

    /// Hide cursors not refreshed within the stale window before `now`.
    pub fn prune_stale_cursors(&mut self, now: i64) {
        for p in self.participants.values_mut() {
            if p.cursor.is_some() && now - p.cursor_updated_at > CURSOR_STALE_MS {
                p.cursor = None;
            }
        }
    }

    /// Drop ids that no longer exist from every remote selection.
    pub fn retain_selected(&mut self, exists: impl Fn(&ElementId) -> bool) {
        for p in self.participants.values_mut() {
            p.selection.retain(|id| exists(id));
        }
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Participant> {
        self.participants.get(id)
    }

    /// All participants, sorted by id for stable rendering.
    #[must_use]
    pub fn participants(&self) -> Vec<&Participant> {
        let mut out: Vec<&Participant> = self.participants.values().collect();
        out.sort_by(|a, b| a.id.cmp(&b.id));
        out
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.participants.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }
}
