//! Document model and entity store for the collaborative design canvas.
//!
//! This crate is compiled to WebAssembly for the browser and as a plain rlib
//! for the sync layer and the command-line tools. It owns the in-memory
//! document: the element list and its paint order, selection and view state,
//! a uniform-grid spatial index for hit-testing and culling, and a linear
//! undo/redo timeline. Rendering and transport live elsewhere; the store
//! hands committed local edits to the sync layer through an outbox of
//! [`store::Change`]s and accepts remote edits through its `apply_remote_*`
//! methods.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`store`] | `CanvasStore`: element CRUD, z-order, grouping, alignment, clipboard, history |
//! | [`doc`] | Element, shape and paint types; sparse `ElementPatch` |
//! | [`geom`] | `Point` and axis-aligned `Bounds` |
//! | [`spatial`] | Uniform-grid spatial index |
//! | [`history`] | Bounded undo/redo timeline with a replay guard |
//! | [`camera`] | Pan/zoom camera and coordinate conversions |
//! | [`guides`] | Grid, ruler guides and snapping |
//! | [`presence`] | Remote participants' cursors, selections and viewports |
//! | [`tool`] | Active drawing tool |
//! | [`export`] | Versioned JSON export document |
//! | [`bindings`] | `wasm-bindgen` handle for the JS view layer |
//! | [`consts`] | Shared numeric constants |

pub mod bindings;
pub mod camera;
pub mod consts;
pub mod doc;
pub mod export;
pub mod geom;
pub mod guides;
pub mod history;
pub mod presence;
pub mod spatial;
pub mod store;
pub mod tool;
