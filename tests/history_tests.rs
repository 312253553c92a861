//! Move history tests - collapsing and bounding

use gridlock::core::MoveHistory;
use gridlock::types::{GridPos, TileMove, DEFAULT_HISTORY_CAPACITY};

fn mv(identity: &str, from: (i32, i32), to: (i32, i32)) -> TileMove {
    TileMove::new(
        identity,
        GridPos::new(from.0, from.1),
        GridPos::new(to.0, to.1),
    )
}

#[test]
fn test_default_capacity() {
    let history = MoveHistory::new();
    assert_eq!(history.capacity(), DEFAULT_HISTORY_CAPACITY);
    assert!(history.is_empty());
}

#[test]
fn test_round_trip_cancels_to_empty() {
    let mut history = MoveHistory::new();
    history.record(mv("a", (0, 0), (1, 0)));
    history.record(mv("a", (1, 0), (0, 0)));
    assert!(history.is_empty());
}

#[test]
fn test_nested_round_trips_cancel_pairwise() {
    let mut history = MoveHistory::new();
    history.record(mv("a", (0, 0), (1, 0)));
    history.record(mv("a", (1, 0), (1, 1)));
    history.record(mv("a", (1, 1), (1, 0)));
    history.record(mv("a", (1, 0), (0, 0)));
    assert!(history.is_empty());
}

#[test]
fn test_collapse_requires_same_identity() {
    let mut history = MoveHistory::new();
    history.record(mv("a", (0, 0), (1, 0)));
    history.record(mv("b", (1, 0), (0, 0)));
    assert_eq!(history.len(), 2);
}

#[test]
fn test_capacity_evicts_oldest_first() {
    let mut history = MoveHistory::with_capacity(4);
    for i in 0..5 {
        history.record(mv("a", (i, 0), (i + 1, 0)));
    }

    assert_eq!(history.len(), 4);
    assert_eq!(history.moves()[0], mv("a", (1, 0), (2, 0)));
    assert_eq!(history.moves()[3], mv("a", (4, 0), (5, 0)));
}

#[test]
fn test_undo_returns_newest_and_shrinks() {
    let mut history = MoveHistory::new();
    history.record(mv("a", (0, 0), (1, 0)));
    history.record(mv("b", (3, 3), (3, 4)));

    assert_eq!(history.undo_last(), Some(mv("b", (3, 3), (3, 4))));
    assert_eq!(history.len(), 1);
    assert_eq!(history.undo_last(), Some(mv("a", (0, 0), (1, 0))));
    assert_eq!(history.undo_last(), None);
}
