//! Session tests - orchestration, completion, undo and persistence

use gridlock::adapter::SaveState;
use gridlock::core::{
    Board, CompletionTemplate, ExclusionMask, GameDefinition, PuzzleSession, StartLayout,
    TilePlacement, TileSpec,
};
use gridlock::types::{GridPos, MovementConstraint, TileMove};

/// A 4x4 board with two tiles and a single-tile completion target.
fn definition() -> GameDefinition {
    GameDefinition::new(
        "duo",
        Board::new(4, 4, ExclusionMask::none()),
        vec![TileSpec::rect("runner", 1, 1), TileSpec::rect("block", 2, 2)],
        MovementConstraint::None,
        vec![StartLayout::new(
            "start",
            vec![
                TilePlacement::new("runner", GridPos::new(0, 0)),
                TilePlacement::new("block", GridPos::new(2, 2)),
            ],
        )],
        vec![CompletionTemplate::new(
            "arrived",
            vec![TilePlacement::new("runner", GridPos::new(0, 3))],
        )],
    )
    .unwrap()
}

fn session() -> PuzzleSession {
    definition().open_session("start").unwrap()
}

#[test]
fn test_full_drag_cycle() {
    let mut session = session();

    session.select_tile("runner").unwrap();
    let outcome = session.check_movement(GridPos::new(0, 3), false);
    assert!(outcome.accepted);
    assert_eq!(session.cursor(), Some(GridPos::new(0, 3)));

    let commit = session.release().unwrap().expect("tile moved");
    assert_eq!(commit.move_count, 1);
    assert_eq!(commit.completed.as_deref(), Some("arrived"));
    assert_eq!(session.completed_template(), Some("arrived"));
}

#[test]
fn test_drag_into_occupied_area_stops_at_edge() {
    let mut session = session();

    session.select_tile("runner").unwrap();
    // Straight toward the 2x2 block's column.
    session.check_movement(GridPos::new(2, 2), true);
    let cursor = session.cursor().unwrap();
    // Never on top of the block.
    assert_ne!(session.grid().get(cursor.x, cursor.y), Some(2));

    // Abandoning the drag commits nothing.
    let before = session.tiles()[0].anchor();
    session.select_tile("block").unwrap();
    assert_eq!(session.tiles()[0].anchor(), before);
    assert_eq!(session.move_count(), 0);
}

#[test]
fn test_commit_applies_grid_and_history() {
    let mut session = session();
    let commit = session
        .commit_move(TileMove::new("runner", GridPos::new(0, 0), GridPos::new(1, 0)))
        .unwrap();

    assert_eq!(commit.move_count, 1);
    assert_eq!(commit.completed, None);
    assert_eq!(session.grid().get(1, 0), Some(1));
    assert_eq!(session.grid().get(0, 0), Some(0));
    assert_eq!(session.history().moves().len(), 1);
}

#[test]
fn test_undo_round_trip_restores_initial_grid() {
    let mut session = session();
    let initial = session.grid().clone();

    session
        .commit_move(TileMove::new("runner", GridPos::new(0, 0), GridPos::new(1, 1)))
        .unwrap();
    assert_ne!(session.grid(), &initial);

    let undone = session.undo().unwrap().unwrap();
    assert_eq!(undone.identity, "runner");
    assert_eq!(session.grid(), &initial);
    assert_eq!(session.move_count(), 0);
}

#[test]
fn test_save_state_round_trip_preserves_behavior() {
    let mut session = session();
    session
        .commit_move(TileMove::new("runner", GridPos::new(0, 0), GridPos::new(1, 1)))
        .unwrap();
    session
        .commit_move(TileMove::new("block", GridPos::new(2, 2), GridPos::new(2, 1)))
        .unwrap();

    // Serialize through the adapter and back.
    let json = SaveState::from(&session.snapshot()).to_json().unwrap();
    let snapshot = SaveState::from_json(&json).unwrap().into_snapshot();

    let mut resumed = definition().open_session("start").unwrap();
    resumed.restore(&snapshot).unwrap();

    assert_eq!(resumed.grid(), session.grid());
    assert_eq!(resumed.move_count(), 2);

    // Undo works identically on the resumed session.
    let undone = resumed.undo().unwrap().unwrap();
    assert_eq!(undone, TileMove::new("block", GridPos::new(2, 2), GridPos::new(2, 1)));
    assert_eq!(resumed.grid().get(2, 2), Some(2));
}

#[test]
fn test_selecting_unknown_tile_is_an_error() {
    let mut session = session();
    assert!(session.select_tile("nobody").is_err());
}

#[test]
fn test_check_without_selection_is_noop() {
    let mut session = session();
    let outcome = session.check_movement(GridPos::new(1, 1), true);
    assert!(!outcome.accepted);
    assert!(!outcome.x_blocked);
    assert!(!outcome.y_blocked);
    assert_eq!(session.cursor(), None);
}
