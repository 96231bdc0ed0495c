//! Export document: the on-disk JSON form of a canvas.
//!
//! ```json
//! { "version": 1, "elements": [...], "metadata": { "roomId": "...", "exportedAt": 0, "exportedBy": "..." } }
//! ```
//!
//! Every element field survives a write/read cycle unchanged. Documents from
//! a newer format version are rejected instead of being half-read.

#[cfg(test)]
#[path = "export_test.rs"]
mod export_test;

use serde::{Deserialize, Serialize};

use crate::consts::EXPORT_VERSION;
use crate::doc::{Element, ParticipantId, now_ms};
use crate::store::CanvasStore;

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("malformed export document: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported export version {found} (newest supported is {supported})")]
    UnsupportedVersion { found: u32, supported: u32 },
}

impl ExportError {
    /// Stable machine-readable code for hosts that surface the failure.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Json(_) => "E_EXPORT_MALFORMED",
            Self::UnsupportedVersion { .. } => "E_EXPORT_VERSION",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportMetadata {
    #[serde(default)]
    pub room_id: Option<String>,
    /// Milliseconds since the Unix epoch.
    pub exported_at: i64,
    pub exported_by: ParticipantId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportDocument {
    pub version: u32,
    pub elements: Vec<Element>,
    pub metadata: ExportMetadata,
}

impl ExportDocument {
    /// Capture the store's elements, stamped with its participant and the current time.
    #[must_use]
    pub fn from_store(store: &CanvasStore, room_id: Option<&str>) -> Self {
        Self {
            version: EXPORT_VERSION,
            elements: store.elements().to_vec(),
            metadata: ExportMetadata {
                room_id: room_id.map(str::to_owned),
                exported_at: now_ms(),
                exported_by: store.participant().to_owned(),
            },
        }
    }

    /// Serialize to compact JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::Json`] if an element cannot be serialized
    /// (e.g. a non-finite coordinate).
    pub fn to_json(&self) -> Result<String, ExportError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Serialize to indented JSON, for files meant to be read by people.
    ///
    /// # Errors
    ///
    /// Same as [`ExportDocument::to_json`].
    pub fn to_json_pretty(&self) -> Result<String, ExportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse and version-check a document.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::Json`] for malformed input and
    /// [`ExportError::UnsupportedVersion`] for documents newer than this build.
    pub fn from_json(input: &str) -> Result<Self, ExportError> {
        let doc: Self = serde_json::from_str(input)?;
        if doc.version > EXPORT_VERSION {
            return Err(ExportError::UnsupportedVersion { found: doc.version, supported: EXPORT_VERSION });
        }
        Ok(doc)
    }
}

impl CanvasStore {
    #[must_use]
    pub fn export(&self, room_id: Option<&str>) -> ExportDocument {
        ExportDocument::from_store(self, room_id)
    }

    /// Replace the document with an imported one. History restarts from it.
    pub fn import(&mut self, doc: ExportDocument) {
        self.load_elements(doc.elements);
    }
}
