//! Puzzle session - thin orchestrator over grid, validator, history
//!
//! Owns the live tile arena, the occupancy grid, the per-gesture validator
//! and the move history for one puzzle being played. All operations are
//! synchronous and run on the caller's thread; abandoning a drag is simply
//! never committing it, since [`select_tile`](PuzzleSession::select_tile)
//! resets scan state wholesale.
//!
//! The session returns plain values (the committed move, the satisfied
//! template's name, the undone move) instead of invoking callbacks; the
//! front-end repositions its on-screen representations from those.

use thiserror::Error;
use tracing::debug;

use gridlock_types::{GridPos, MovementConstraint, TileMove};

use crate::completion::CompletionTemplate;
use crate::exclusion::MaskError;
use crate::game::{Board, GameDefinition, GameInstance, Tile};
use crate::grid::OccupancyGrid;
use crate::history::MoveHistory;
use crate::movement::{CheckOutcome, MoveValidator};
use crate::snapshot::{SessionSnapshot, TileAnchor};

/// Failure of a session operation.
///
/// `UnknownTile` is an invariant violation (the caller handed a move or
/// selection naming a tile not in this session); mask errors can only
/// escape here if a definition bypassed validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("no tile named `{0}` in this session")]
    UnknownTile(String),

    #[error("snapshot is for instance `{snapshot}`, session is `{session}`")]
    InstanceMismatch { snapshot: String, session: String },

    #[error(transparent)]
    Mask(#[from] MaskError),
}

/// Result of a committed move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitOutcome {
    /// Name of the first completion template now satisfied, if any.
    pub completed: Option<String>,
    /// Moves currently in the history (after palindrome collapsing).
    pub move_count: usize,
}

/// One puzzle instance in play.
#[derive(Debug, Clone)]
pub struct PuzzleSession {
    instance: String,
    board: Board,
    tiles: Vec<Tile>,
    completions: Vec<CompletionTemplate>,
    grid: OccupancyGrid,
    validator: MoveValidator,
    history: MoveHistory,
}

impl PuzzleSession {
    /// Open a session over a derived instance.
    pub fn new(
        board: Board,
        instance: GameInstance,
        completions: Vec<CompletionTemplate>,
    ) -> Result<Self, SessionError> {
        let name = instance.name().to_string();
        let mut tiles = instance.into_tiles();
        let mut grid = OccupancyGrid::new(board.width(), board.height());
        grid.rebuild(&board, &mut tiles)?;

        debug!(instance = %name, tiles = tiles.len(), "session opened");

        Ok(Self {
            instance: name,
            board,
            tiles,
            completions,
            grid,
            validator: MoveValidator::new(),
            history: MoveHistory::new(),
        })
    }

    pub fn instance(&self) -> &str {
        &self.instance
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn grid(&self) -> &OccupancyGrid {
        &self.grid
    }

    pub fn move_count(&self) -> usize {
        self.history.len()
    }

    pub fn history(&self) -> &MoveHistory {
        &self.history
    }

    fn tile_index(&self, identity: &str) -> Result<usize, SessionError> {
        self.tiles
            .iter()
            .position(|tile| tile.identity() == identity)
            .ok_or_else(|| SessionError::UnknownTile(identity.to_string()))
    }

    /// Begin a drag on the named tile.
    pub fn select_tile(&mut self, identity: &str) -> Result<(), SessionError> {
        let index = self.tile_index(identity)?;
        self.validator.select_tile(&self.tiles[index]);
        Ok(())
    }

    /// Begin a drag whose gesture bounding box covers `cells`.
    pub fn select_tile_spanning(
        &mut self,
        identity: &str,
        cells: &[GridPos],
    ) -> Result<(), SessionError> {
        let index = self.tile_index(identity)?;
        self.validator.select_tile_spanning(&self.tiles[index], cells);
        Ok(())
    }

    /// The selected tile's last confirmed-reachable cell, if a drag is live.
    pub fn cursor(&self) -> Option<GridPos> {
        self.validator.cursor()
    }

    /// Validate one drag tick toward `target`.
    ///
    /// The selected tile's movement constraint clamps the target first: a
    /// horizontal-only tile ignores the drag's Y component entirely, and
    /// symmetrically for vertical. With no live drag this is a no-op.
    pub fn check_movement(&mut self, target: GridPos, x_bias: bool) -> CheckOutcome {
        let (Some(cursor), Some(grid_id)) =
            (self.validator.cursor(), self.validator.selected_grid_id())
        else {
            return CheckOutcome::rejected();
        };
        let Some(tile) = self.tiles.iter().find(|tile| tile.grid_id() == grid_id) else {
            return CheckOutcome::rejected();
        };

        let clamped = match tile.constraint() {
            MovementConstraint::None => target,
            MovementConstraint::Horizontal => GridPos::new(target.x, cursor.y),
            MovementConstraint::Vertical => GridPos::new(cursor.x, target.y),
        };

        self.validator
            .check_movement(&self.grid, tile, clamped, x_bias)
    }

    /// Commit a grid-validated move: reposition the tile named by the move,
    /// rebuild the grid, record the move (collapsing round trips) and check
    /// completion.
    ///
    /// The move value itself is the handle; committing never consults the
    /// drag selection, so an unknown identity is a hard error rather than
    /// silently trusted ambient state.
    pub fn commit_move(&mut self, mv: TileMove) -> Result<CommitOutcome, SessionError> {
        let index = self.tile_index(&mv.identity)?;
        self.tiles[index].set_anchor(mv.to);

        debug!(
            tile = %mv.identity,
            from = %mv.from,
            to = %mv.to,
            "move committed"
        );

        self.history.record(mv);
        self.grid.rebuild(&self.board, &mut self.tiles)?;
        self.validator.clear();

        Ok(CommitOutcome {
            completed: self.completed_template().map(str::to_string),
            move_count: self.history.len(),
        })
    }

    /// Commit the live drag at its current cursor, if the anchor changed.
    ///
    /// Returns `None` when there is no live drag or the tile never left its
    /// cell; the drag state is discarded either way.
    pub fn release(&mut self) -> Result<Option<CommitOutcome>, SessionError> {
        let (Some(cursor), Some(grid_id)) =
            (self.validator.cursor(), self.validator.selected_grid_id())
        else {
            self.validator.clear();
            return Ok(None);
        };

        let Some(tile) = self.tiles.iter().find(|tile| tile.grid_id() == grid_id) else {
            self.validator.clear();
            return Ok(None);
        };

        if tile.anchor() == cursor {
            self.validator.clear();
            return Ok(None);
        }

        let mv = TileMove::new(tile.identity(), tile.anchor(), cursor);
        self.commit_move(mv).map(Some)
    }

    /// Undo the most recent move: pop it, put the tile back, rebuild.
    ///
    /// Returns the undone move so the front-end can reposition its view, or
    /// `None` when the history is empty.
    pub fn undo(&mut self) -> Result<Option<TileMove>, SessionError> {
        let Some(mv) = self.history.undo_last() else {
            return Ok(None);
        };

        let index = self.tile_index(&mv.identity)?;
        self.tiles[index].set_anchor(mv.from);
        self.grid.rebuild(&self.board, &mut self.tiles)?;
        self.validator.clear();

        debug!(tile = %mv.identity, to = %mv.from, "move undone");

        Ok(Some(mv))
    }

    /// Name of the first satisfied completion template, if any.
    pub fn completed_template(&self) -> Option<&str> {
        self.completions
            .iter()
            .find(|template| template.is_satisfied(&self.tiles))
            .map(|template| template.name())
    }

    /// Capture the resumable state: anchors plus history.
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            instance: self.instance.clone(),
            anchors: self
                .tiles
                .iter()
                .map(|tile| TileAnchor::new(tile.identity(), tile.anchor()))
                .collect(),
            moves: self.history.moves().to_vec(),
        }
    }

    /// Restore a previously captured snapshot into this session.
    ///
    /// Every snapshot anchor must name a tile of this session's instance;
    /// the grid is rebuilt once afterwards so subsequent behavior is
    /// identical to the session the snapshot was taken from.
    pub fn restore(&mut self, snapshot: &SessionSnapshot) -> Result<(), SessionError> {
        if snapshot.instance != self.instance {
            return Err(SessionError::InstanceMismatch {
                snapshot: snapshot.instance.clone(),
                session: self.instance.clone(),
            });
        }

        // Validate all identities before mutating anything.
        for anchor in &snapshot.anchors {
            self.tile_index(&anchor.identity)?;
        }

        for anchor in &snapshot.anchors {
            let index = self.tile_index(&anchor.identity)?;
            self.tiles[index].set_anchor(anchor.at);
        }

        self.history = MoveHistory::from_moves(snapshot.moves.clone(), self.history.capacity());
        self.grid.rebuild(&self.board, &mut self.tiles)?;
        self.validator.clear();

        Ok(())
    }
}

/// Convenience: open a session straight from a definition and layout name.
impl GameDefinition {
    pub fn open_session(&self, layout: &str) -> Result<PuzzleSession, SessionOpenError> {
        let instance = self.instantiate(layout)?;
        PuzzleSession::new(
            self.board().clone(),
            instance,
            self.completions().to_vec(),
        )
        .map_err(SessionOpenError::Session)
    }
}

/// Failure while opening a session from a definition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionOpenError {
    #[error(transparent)]
    Definition(#[from] crate::game::DefinitionError),

    #[error(transparent)]
    Session(#[from] SessionError),
}
