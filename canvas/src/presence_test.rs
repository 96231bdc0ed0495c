use uuid::Uuid;

use super::*;

fn cursor_at(x: f64, y: f64) -> PresenceUpdate {
    PresenceUpdate { cursor: Some(Point::new(x, y)), ..Default::default() }
}

#[test]
fn first_update_creates_participant_with_defaults() {
    let mut p = Presence::new();
    p.apply("bob", cursor_at(1.0, 2.0), 100);
    let bob = p.get("bob").unwrap();
    assert_eq!(bob.name, "Guest");
    assert_eq!(bob.cursor, Some(Point::new(1.0, 2.0)));
    assert_eq!(bob.cursor_updated_at, 100);
}

#[test]
fn sparse_update_keeps_other_fields() {
    let mut p = Presence::new();
    p.apply("bob", PresenceUpdate { name: Some("Bob".into()), color: Some("#FF0000".into()), ..Default::default() }, 0);
    p.apply("bob", cursor_at(5.0, 5.0), 10);
    let bob = p.get("bob").unwrap();
    assert_eq!(bob.name, "Bob");
    assert_eq!(bob.color, "#FF0000");
    assert_eq!(bob.cursor, Some(Point::new(5.0, 5.0)));
}

#[test]
fn viewport_and_selection_are_tracked() {
    let mut p = Presence::new();
    let id = Uuid::new_v4();
    let camera = Camera { pan_x: 10.0, pan_y: 20.0, zoom: 2.0 };
    p.apply("bob", PresenceUpdate { selection: Some(vec![id]), camera: Some(camera), ..Default::default() }, 0);
    let bob = p.get("bob").unwrap();
    assert_eq!(bob.selection, vec![id]);
    assert_eq!(bob.camera, Some(camera));
}

#[test]
fn leave_removes_participant() {
    let mut p = Presence::new();
    p.apply("bob", cursor_at(0.0, 0.0), 0);
    assert!(p.leave("bob").is_some());
    assert!(p.is_empty());
    assert!(p.leave("bob").is_none());
}

#[test]
fn stale_cursor_is_hidden_but_participant_kept() {
    let mut p = Presence::new();
    p.apply("bob", cursor_at(0.0, 0.0), 1_000);
    p.apply("carol", cursor_at(0.0, 0.0), 4_500);
    p.prune_stale_cursors(5_000);
    assert!(p.get("bob").unwrap().cursor.is_none());
    assert!(p.get("carol").unwrap().cursor.is_some());
    assert_eq!(p.len(), 2);
}

#[test]
fn retain_selected_drops_deleted_ids() {
    let mut p = Presence::new();
    let keep = Uuid::new_v4();
    let gone = Uuid::new_v4();
    p.apply("bob", PresenceUpdate { selection: Some(vec![keep, gone]), ..Default::default() }, 0);
    p.retain_selected(|id| *id == keep);
    assert_eq!(p.get("bob").unwrap().selection, vec![keep]);
}

#[test]
fn participants_sorted_by_id() {
    let mut p = Presence::new();
    p.apply("zed", PresenceUpdate::default(), 0);
    p.apply("amy", PresenceUpdate::default(), 0);
    let ids: Vec<&str> = p.participants().iter().map(|x| x.id.as_str()).collect();
    assert_eq!(ids, vec!["amy", "zed"]);
}
