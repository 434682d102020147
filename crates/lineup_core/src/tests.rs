//! End-to-end board scenarios: store, reconciler and gateways together.

use tempfile::TempDir;

use crate::board::{starting_lineup, Board};
use crate::config::BoardConfig;
use crate::engine::coordinates::{to_visual, LogicalPos, Orientation};
use crate::engine::drag::{CancelReason, DragOutcome, DragSource, DropRequest, DropTarget, PointerKind};
use crate::engine::field_surface::{FieldRect, PixelDelta, PixelPoint};
use crate::models::access::OwnerKey;
use crate::models::roster::{EntryId, EntryPatch, NewEntry, RoleCategory};
use crate::save::gateway::{FileGateway, PersistenceGateway};

const SQUARE: FieldRect = FieldRect::new(0.0, 0.0, 400.0, 400.0);

fn id(s: &str) -> EntryId {
    EntryId::new(s)
}

fn lineup() -> Board {
    Board::from_snapshot(starting_lineup(), BoardConfig::default(), false)
}

fn field_drag(board: &mut Board, who: &str, delta: PixelDelta, rect: FieldRect) -> DragOutcome {
    board
        .commit_drop(&DropRequest {
            source: DragSource::FieldEntry(id(who)),
            target: DropTarget::Field,
            field: Some(rect),
            origin: PixelPoint::default(),
            delta,
        })
        .unwrap()
}

#[test]
fn starting_lineup_is_seven_on_field() {
    let board = lineup();
    assert_eq!(board.store().on_field().len(), 7);
    assert_eq!(board.store().get(&id("p1")).unwrap().role, RoleCategory::Goalkeeper);
    assert!(board.store().entries().iter().all(|e| e.is_confirmed));
}

#[test]
fn substitute_swaps_into_midfield_slot() {
    let mut board = lineup();
    let sub = board.add(NewEntry { display_name: Some("SUB1".into()), ..Default::default() }).unwrap();

    board.begin_drag(DragSource::Bench(sub.clone()), PointerKind::Mouse, PixelPoint::new(0.0, 0.0), 0).unwrap();
    board.move_drag(PixelDelta::new(60.0, 80.0), 16);
    // Lands on (36, 49), about 1.41 from p5 at (35, 50).
    let outcome = board.end_drag(DropTarget::Field, Some(SQUARE), PixelDelta::new(144.0, 196.0), 32).unwrap();
    assert_eq!(outcome, DragOutcome::Swapped { incoming: sub.clone(), outgoing: id("p5"), to: LogicalPos::new(35.0, 50.0) });

    let s = board.store().get(&sub).unwrap();
    assert_eq!(s.logical_pos(), LogicalPos::new(35.0, 50.0));
    assert!(s.is_on_field && s.is_confirmed);

    let p5 = board.store().get(&id("p5")).unwrap();
    assert!(!p5.is_on_field && !p5.is_locked);
    assert!(p5.is_confirmed, "benched starter stays in the match squad");

    assert_eq!(board.store().on_field().len(), 7);
    assert_eq!(board.store().match_squad().iter().map(|e| &e.id).collect::<Vec<_>>(), vec![&id("p5")]);
}

#[test]
fn bench_drop_into_open_space_adds_a_player() {
    let mut board = lineup();
    let sub = board.add(NewEntry::default()).unwrap();
    let outcome = board
        .commit_drop(&DropRequest {
            source: DragSource::Bench(sub.clone()),
            target: DropTarget::Field,
            field: Some(SQUARE),
            origin: PixelPoint::new(40.0, 120.0),
            delta: PixelDelta::default(),
        })
        .unwrap();
    assert_eq!(outcome, DragOutcome::Placed { id: sub, to: LogicalPos::new(10.0, 30.0) });
    assert_eq!(board.store().on_field().len(), 8);
}

#[test]
fn locked_entry_drag_changes_nothing() {
    let mut board = lineup();
    board.toggle_lock(&id("p2")).unwrap();
    let before = board.snapshot();

    let outcome = field_drag(&mut board, "p2", PixelDelta::new(80.0, -40.0), SQUARE);
    assert_eq!(outcome, DragOutcome::Cancelled(CancelReason::Locked));
    assert_eq!(board.snapshot(), before);
}

#[test]
fn locked_entries_are_never_swapped_out() {
    let mut board = lineup();
    board.toggle_lock(&id("p5")).unwrap();
    let sub = board.add(NewEntry::default()).unwrap();

    let outcome = board
        .commit_drop(&DropRequest {
            source: DragSource::Bench(sub.clone()),
            target: DropTarget::Field,
            field: Some(SQUARE),
            origin: PixelPoint::new(144.0, 196.0),
            delta: PixelDelta::default(),
        })
        .unwrap();
    assert_eq!(outcome, DragOutcome::Placed { id: sub, to: LogicalPos::new(36.0, 49.0) });
    assert!(board.store().get(&id("p5")).unwrap().is_on_field);
}

#[test]
fn field_drag_clamps_at_the_touchline() {
    let mut board = lineup();
    board.update(&id("p4"), &EntryPatch { position: Some(LogicalPos::new(98.0, 98.0)), ..Default::default() }).unwrap();

    let rect = FieldRect::new(0.0, 0.0, 100.0, 100.0);
    let outcome = field_drag(&mut board, "p4", PixelDelta::new(10.0, 10.0), rect);
    assert_eq!(outcome, DragOutcome::Relocated { id: id("p4"), to: LogicalPos::new(100.0, 100.0) });
    assert_eq!(board.store().get(&id("p4")).unwrap().logical_pos(), LogicalPos::new(100.0, 100.0));
}

#[test]
fn landscape_drag_moves_marker_with_pointer() {
    let mut board = lineup();
    board.set_orientation(Orientation::Horizontal);
    let before = to_visual(board.store().get(&id("p6")).unwrap().logical_pos(), Orientation::Horizontal);

    // +10% across, -5% down the screen.
    field_drag(&mut board, "p6", PixelDelta::new(40.0, -20.0), SQUARE);

    let after = to_visual(board.store().get(&id("p6")).unwrap().logical_pos(), Orientation::Horizontal);
    assert_eq!(after.x - before.x, 10.0);
    assert_eq!(after.y - before.y, -5.0);
}

#[test]
fn field_entries_never_swap() {
    let mut board = lineup();
    // p3 (50, 70) dragged onto p1 (50, 90).
    let outcome = field_drag(&mut board, "p3", PixelDelta::new(0.0, 80.0), SQUARE);
    assert_eq!(outcome, DragOutcome::Relocated { id: id("p3"), to: LogicalPos::new(50.0, 90.0) });
    assert!(board.store().get(&id("p1")).unwrap().is_on_field);
}

#[test]
fn bench_drop_off_field_or_without_surface_is_cancelled() {
    let mut board = lineup();
    let sub = board.add(NewEntry::default()).unwrap();
    let before = board.snapshot();

    let mut request = DropRequest {
        source: DragSource::Bench(sub),
        target: DropTarget::Elsewhere,
        field: Some(SQUARE),
        origin: PixelPoint::new(10.0, 10.0),
        delta: PixelDelta::default(),
    };
    assert_eq!(board.commit_drop(&request).unwrap(), DragOutcome::Cancelled(CancelReason::DroppedOutsideField));

    request.target = DropTarget::Field;
    request.field = None;
    assert_eq!(board.commit_drop(&request).unwrap(), DragOutcome::Cancelled(CancelReason::MissingFieldSurface));
    assert_eq!(board.snapshot(), before);
}

#[test]
fn confirmation_and_placement_are_decoupled() {
    let mut board = lineup();
    let sub = board.add(NewEntry::default()).unwrap();

    assert!(board.toggle_confirm(&sub).unwrap());
    assert!(!board.store().get(&sub).unwrap().is_on_field);

    assert!(!board.toggle_confirm(&id("p7")).unwrap());
    let p7 = board.store().get(&id("p7")).unwrap();
    assert!(!p7.is_on_field && !p7.is_confirmed);
}

#[test]
fn read_only_viewer_cannot_change_anything() {
    let mut board = Board::from_snapshot(starting_lineup(), BoardConfig::default(), true);
    let before = board.snapshot();

    assert!(board.add(NewEntry::default()).unwrap_err().is_permission());
    assert!(board.update(&id("p1"), &EntryPatch { number: Some(99), ..Default::default() }).unwrap_err().is_permission());
    assert!(board.remove(&id("p1")).unwrap_err().is_permission());
    assert!(board.toggle_confirm(&id("p1")).unwrap_err().is_permission());
    assert!(board.toggle_lock(&id("p1")).unwrap_err().is_permission());
    assert!(board.remove_from_field(&id("p1")).unwrap_err().is_permission());
    assert_eq!(
        field_drag(&mut board, "p1", PixelDelta::new(40.0, 0.0), SQUARE),
        DragOutcome::Cancelled(CancelReason::ReadOnly)
    );

    assert_eq!(board.snapshot(), before);
}

#[test]
fn file_gateway_round_trip_preserves_board() {
    let dir = TempDir::new().unwrap();
    let owner = OwnerKey::new("coach_7");
    let mut gateway = FileGateway::new(dir.path());

    let mut board = lineup();
    board.set_keeper_color("bg-orange-500").unwrap();
    board.toggle_lock(&id("p1")).unwrap();
    board.save(&mut gateway, &owner).unwrap();

    let mut sub = gateway.load(&owner).unwrap();
    let mut restored = Board::new(BoardConfig::default(), false);
    assert!(restored.poll(&mut sub));
    assert_eq!(restored.snapshot(), board.snapshot());
}
