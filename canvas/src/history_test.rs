#![allow(clippy::float_cmp)]

use super::*;
use crate::doc::ElementKind;
use crate::geom::Bounds;

fn rect(x: f64) -> Element {
    Element::of_kind(ElementKind::Rectangle, Bounds::new(x, 0.0, 10.0, 10.0), "tester")
}

// =============================================================
// Basics
// =============================================================

#[test]
fn new_history_has_initial_entry_only() {
    let h = History::default();
    assert_eq!(h.len(), 1);
    assert!(!h.is_empty());
    assert!(!h.can_undo());
    assert!(!h.can_redo());
    assert_eq!(h.entries()[0].description, "Initial");
}

#[test]
fn push_advances_cursor() {
    let mut h = History::default();
    assert!(h.push(&[rect(0.0)], "Add"));
    assert_eq!(h.len(), 2);
    assert_eq!(h.cursor(), 1);
    assert!(h.can_undo());
    assert!(!h.can_redo());
}

#[test]
fn undo_returns_previous_snapshot() {
    let mut h = History::default();
    let a = rect(0.0);
    h.push(&[a.clone()], "Add");
    h.push(&[], "Delete");

    let snap = h.undo().unwrap();
    h.end_replay();
    assert_eq!(snap, vec![a]);
    assert!(h.can_redo());

    let snap = h.undo().unwrap();
    h.end_replay();
    assert!(snap.is_empty());
    assert!(h.undo().is_none());
}

#[test]
fn redo_returns_next_snapshot() {
    let mut h = History::default();
    let a = rect(0.0);
    h.push(&[a.clone()], "Add");
    h.undo();
    h.end_replay();
    let snap = h.redo().unwrap();
    h.end_replay();
    assert_eq!(snap, vec![a]);
    assert!(h.redo().is_none());
}

// =============================================================
// Branch truncation / eviction
// =============================================================

#[test]
fn push_after_undo_discards_redo_branch() {
    let mut h = History::default();
    h.push(&[rect(1.0)], "One");
    h.push(&[rect(2.0)], "Two");
    h.undo();
    h.end_replay();
    h.push(&[rect(3.0)], "Three");
    assert!(!h.can_redo());
    assert_eq!(h.len(), 3);
    let descriptions: Vec<_> = h.entries().into_iter().map(|e| e.description).collect();
    assert_eq!(descriptions, vec!["Initial", "One", "Three"]);
}

#[test]
fn limit_evicts_oldest() {
    let mut h = History::new(&[], 3);
    for i in 0..5 {
        h.push(&[rect(f64::from(i))], &format!("Edit {i}"));
    }
    assert_eq!(h.len(), 3);
    assert_eq!(h.cursor(), 2);
    assert_eq!(h.entries()[0].description, "Edit 2");
    // Two steps back is the oldest retained entry.
    assert!(h.undo().is_some());
    h.end_replay();
    assert!(h.undo().is_some());
    h.end_replay();
    assert!(!h.can_undo());
}

// =============================================================
// Replay guard
// =============================================================

#[test]
fn push_during_replay_is_suppressed() {
    let mut h = History::default();
    h.push(&[rect(0.0)], "Add");
    h.undo();
    assert!(!h.push(&[rect(5.0)], "Sneaky"));
    h.end_replay();
    assert_eq!(h.len(), 2);
    assert!(h.can_redo());
}

#[test]
fn snapshots_are_independent_copies() {
    let mut h = History::default();
    let mut live = vec![rect(0.0)];
    h.push(&live, "Add");
    live[0].x = 500.0;
    h.push(&live, "Move");
    let restored = h.undo().unwrap();
    assert_eq!(restored[0].x, 0.0);
}

#[test]
fn entries_mark_current() {
    let mut h = History::default();
    h.push(&[], "A");
    h.push(&[], "B");
    h.undo();
    h.end_replay();
    let current: Vec<bool> = h.entries().iter().map(|e| e.current).collect();
    assert_eq!(current, vec![false, true, false]);
}

#[test]
fn reset_starts_over() {
    let mut h = History::default();
    h.push(&[], "A");
    h.reset(&[rect(0.0)]);
    assert_eq!(h.len(), 1);
    h.push(&[], "B");
    assert_eq!(h.undo().unwrap().len(), 1);
}
