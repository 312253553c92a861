//! Core puzzle engine - pure, deterministic, and testable
//!
//! This crate contains the grid occupancy and move-validation engine for a
//! sliding-tile puzzle. It has **zero dependencies** on UI, networking, or
//! file I/O, making it:
//!
//! - **Deterministic**: every operation is a pure function of current state
//! - **Testable**: all rules are exercised without a front-end
//! - **Portable**: usable from a terminal, a GUI, or headless tooling
//!
//! # Module Structure
//!
//! - [`exclusion`]: masks describing the cells a board or tile does not use
//! - [`grid`]: the authoritative occupancy array, rebuilt per committed move
//! - [`game`]: validated definitions and instance derivation
//! - [`movement`]: the incremental drag scan with diagonal tie-breaking
//! - [`completion`]: target-template evaluation and best-result tracking
//! - [`history`]: bounded, self-collapsing move log for undo
//! - [`session`]: the thin orchestrator front-ends talk to
//! - [`snapshot`]: the resumable-state value the persistence layer stores
//!
//! # How a move happens
//!
//! A front-end reports "tile selected"; the session points the validator's
//! cursor at the tile's anchor. Every drag tick supplies a candidate target
//! cell; the validator walks the cursor toward it one step at a time,
//! re-deriving the dominant axis per step and stopping at the first cell the
//! grid refuses. On release, if the anchor changed, a [`TileMove`] is
//! committed: the grid rebuilds, the history records (cancelling perfect
//! round trips), and completion templates are evaluated.
//!
//! # Example
//!
//! ```
//! use gridlock_core::{
//!     Board, CompletionTemplate, ExclusionMask, GameDefinition, StartLayout, TilePlacement,
//!     TileSpec,
//! };
//! use gridlock_types::{GridPos, MovementConstraint};
//!
//! let definition = GameDefinition::new(
//!     "mini",
//!     Board::new(3, 3, ExclusionMask::none()),
//!     vec![TileSpec::rect("a", 1, 1)],
//!     MovementConstraint::None,
//!     vec![StartLayout::new(
//!         "start",
//!         vec![TilePlacement::new("a", GridPos::new(0, 0))],
//!     )],
//!     vec![CompletionTemplate::new(
//!         "solved",
//!         vec![TilePlacement::new("a", GridPos::new(2, 2))],
//!     )],
//! )
//! .unwrap();
//!
//! let mut session = definition.open_session("start").unwrap();
//! session.select_tile("a").unwrap();
//! let outcome = session.check_movement(GridPos::new(2, 2), true);
//! assert!(outcome.accepted);
//!
//! let commit = session.release().unwrap().unwrap();
//! assert_eq!(commit.completed.as_deref(), Some("solved"));
//! ```

pub mod completion;
pub mod exclusion;
pub mod game;
pub mod grid;
pub mod history;
pub mod movement;
pub mod session;
pub mod snapshot;

pub use completion::{BestResults, CompletionTemplate};
pub use exclusion::{ExclusionMask, MaskError};
pub use game::{
    Board, DefinitionError, GameDefinition, GameInstance, StartLayout, Tile, TilePlacement,
    TileSpec,
};
pub use grid::OccupancyGrid;
pub use history::MoveHistory;
pub use movement::{CheckOutcome, MoveValidator, MAX_DRAG_CELLS};
pub use session::{CommitOutcome, PuzzleSession, SessionError, SessionOpenError};
pub use snapshot::{SessionSnapshot, TileAnchor};

// Re-export the shared types so downstream crates can use one import path.
pub use gridlock_types as types;
pub use gridlock_types::TileMove;
