//! Shared numeric constants for the canvas crate.

// ── Spatial index ───────────────────────────────────────────────

/// Edge length of a spatial-index grid cell, in world units.
pub const GRID_CELL_SIZE: f64 = 100.0;

// ── History ─────────────────────────────────────────────────────

/// Maximum number of retained history entries, including the initial one.
pub const MAX_HISTORY: usize = 50;

// ── Clipboard ───────────────────────────────────────────────────

/// World-space offset applied to pasted and duplicated elements.
pub const PASTE_OFFSET: f64 = 20.0;

// ── Viewport ────────────────────────────────────────────────────

/// Smallest allowed zoom factor.
pub const MIN_ZOOM: f64 = 0.1;

/// Largest allowed zoom factor.
pub const MAX_ZOOM: f64 = 10.0;

/// Margin kept around the content by zoom-to-fit, in screen pixels.
pub const FIT_PADDING_PX: f64 = 40.0;

// ── Guides ──────────────────────────────────────────────────────

/// Default snapping grid spacing, in world units.
pub const DEFAULT_GRID_SIZE: f64 = 20.0;

// ── Presence ────────────────────────────────────────────────────

/// Remote cursors not refreshed within this window are hidden.
pub const CURSOR_STALE_MS: i64 = 3000;

// ── Export ──────────────────────────────────────────────────────

/// Current version of the export document format.
pub const EXPORT_VERSION: u32 = 1;
