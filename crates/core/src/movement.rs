//! Drag-move validation - the incremental path scan
//!
//! The validator keeps a cursor at the last cell confirmed reachable for the
//! tile being dragged and, on every drag tick, advances it one grid step at
//! a time toward the requested target. Stepping cell by cell (instead of
//! testing the destination directly) is what lets an irregular tile hug a
//! jagged boundary: a tile that only partially overlaps the straight-line
//! path still blocks exactly the cells it covers.
//!
//! Direction signs are re-derived after every step, so a target that moves
//! between ticks of one continuous drag is picked up mid-scan. On a tied
//! (diagonal) step where each axis fits alone but not combined, the caller's
//! bias picks the surviving axis and the scan stops at that ambiguous cell.
//!
//! A drag gesture that starts between cell boundaries can cover up to four
//! grid cells; those constituent cells are collected once at gesture start
//! and every step must fit all of them.

use arrayvec::ArrayVec;
use tracing::{debug, trace};

use gridlock_types::GridPos;

use crate::game::Tile;
use crate::grid::OccupancyGrid;

/// Most grid cells a drag bounding box can cover at gesture start.
pub const MAX_DRAG_CELLS: usize = 4;

/// Result of one drag-tick validation.
///
/// `accepted` means the cursor reached the target on at least one axis, so a
/// drag sliding along a wall stays fluid. The blocked flags name the axis
/// whose last step failed short of the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CheckOutcome {
    pub accepted: bool,
    pub x_blocked: bool,
    pub y_blocked: bool,
}

impl CheckOutcome {
    /// Outcome of a tick with nothing selected: a no-op, not an error.
    pub fn rejected() -> Self {
        Self::default()
    }
}

#[derive(Debug, Clone)]
struct DragScan {
    grid_id: i32,
    /// Last position confirmed reachable (anchor coordinates).
    cursor: GridPos,
    /// Constituent-cell offsets relative to the anchor; `(0, 0)` first.
    cells: ArrayVec<GridPos, MAX_DRAG_CELLS>,
}

/// Stateful per-gesture move validator.
#[derive(Debug, Clone, Default)]
pub struct MoveValidator {
    scan: Option<DragScan>,
}

impl MoveValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin a drag on `tile`, placing the cursor at its current anchor.
    /// Any previous scan state is discarded wholesale.
    pub fn select_tile(&mut self, tile: &Tile) {
        self.select_tile_spanning(tile, &[]);
    }

    /// Begin a drag on `tile` whose gesture bounding box covers `cells`
    /// (absolute grid positions). The anchor cell is always included;
    /// duplicates and cells beyond [`MAX_DRAG_CELLS`] are ignored.
    pub fn select_tile_spanning(&mut self, tile: &Tile, cells: &[GridPos]) {
        let anchor = tile.anchor();
        let mut offsets = ArrayVec::new();
        offsets.push(GridPos::new(0, 0));
        for cell in cells {
            let offset = GridPos::new(cell.x - anchor.x, cell.y - anchor.y);
            if !offsets.contains(&offset) && !offsets.is_full() {
                offsets.push(offset);
            }
        }

        debug!(
            tile = tile.identity(),
            anchor = %anchor,
            cells = offsets.len(),
            "drag started"
        );

        self.scan = Some(DragScan {
            grid_id: tile.grid_id(),
            cursor: anchor,
            cells: offsets,
        });
    }

    /// Abandon the current scan, if any.
    pub fn clear(&mut self) {
        self.scan = None;
    }

    pub fn has_selection(&self) -> bool {
        self.scan.is_some()
    }

    /// The last position confirmed reachable this gesture.
    pub fn cursor(&self) -> Option<GridPos> {
        self.scan.as_ref().map(|scan| scan.cursor)
    }

    /// Grid id of the tile the live scan belongs to.
    pub fn selected_grid_id(&self) -> Option<i32> {
        self.scan.as_ref().map(|scan| scan.grid_id)
    }

    /// Advance the cursor toward `target`, one step at a time, stopping at
    /// the first blocked step. `x_bias` picks the surviving axis when a tied
    /// diagonal step fits on each axis alone but not combined.
    ///
    /// With no selected tile, or a `tile` that is not the selected one, the
    /// tick is a no-op reporting rejection.
    pub fn check_movement(
        &mut self,
        grid: &OccupancyGrid,
        tile: &Tile,
        target: GridPos,
        x_bias: bool,
    ) -> CheckOutcome {
        let Some(scan) = self.scan.as_mut() else {
            return CheckOutcome::rejected();
        };
        if scan.grid_id != tile.grid_id() {
            return CheckOutcome::rejected();
        }

        let cells = scan.cells.clone();
        let fits = |anchor: GridPos| {
            cells
                .iter()
                .all(|offset| grid.can_place(tile, anchor.x + offset.x, anchor.y + offset.y))
        };

        let mut cursor = scan.cursor;
        let mut x_valid = false;
        let mut y_valid = false;

        loop {
            let dx = target.x - cursor.x;
            let dy = target.y - cursor.y;

            // Target reached; flags keep the verdict of the final step.
            if dx == 0 && dy == 0 {
                break;
            }

            x_valid = false;
            y_valid = false;

            if dx.abs() > dy.abs() {
                // X is the dominant axis: test that direction alone.
                x_valid = fits(cursor.offset(dx.signum(), 0));
                if !x_valid {
                    break;
                }
                cursor.x += dx.signum();
            } else if dy.abs() > dx.abs() {
                y_valid = fits(cursor.offset(0, dy.signum()));
                if !y_valid {
                    break;
                }
                cursor.y += dy.signum();
            } else {
                // Equally far on both axes: test each single-axis step.
                let sx = dx.signum();
                let sy = dy.signum();
                x_valid = fits(cursor.offset(sx, 0));
                y_valid = fits(cursor.offset(0, sy));

                if x_valid && y_valid {
                    if fits(cursor.offset(sx, sy)) {
                        cursor.x += sx;
                        cursor.y += sy;
                    } else {
                        // Each axis passes alone but not together: a squeeze
                        // between shapes. The bias picks which advance to
                        // keep, and the ambiguous cell ends the scan.
                        if x_bias {
                            cursor.x += sx;
                            y_valid = false;
                        } else {
                            cursor.y += sy;
                            x_valid = false;
                        }
                        break;
                    }
                } else {
                    // Keep whichever single-axis step fit, then stop.
                    if x_valid {
                        cursor.x += sx;
                    }
                    if y_valid {
                        cursor.y += sy;
                    }
                    break;
                }
            }
        }

        scan.cursor = cursor;

        let x_blocked = cursor.x != target.x && !x_valid;
        let y_blocked = cursor.y != target.y && !y_valid;
        // A tick counts as accepted when the cursor reached the target on at
        // least one axis, even if a tied step advanced neither axis fully;
        // release-time snapping relies on this.
        let accepted = cursor.x == target.x || cursor.y == target.y;

        trace!(
            tile = tile.identity(),
            cursor = %cursor,
            target = %target,
            accepted,
            x_blocked,
            y_blocked,
            "movement checked"
        );

        CheckOutcome {
            accepted,
            x_blocked,
            y_blocked,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exclusion::ExclusionMask;
    use crate::game::{Board, GameDefinition, StartLayout, TilePlacement, TileSpec};
    use gridlock_types::MovementConstraint;

    /// Build a board, a rebuilt grid and the tile arena from specs and
    /// placements. Tile 0 is the one under test in most scenarios.
    fn fixture(
        board: Board,
        specs: Vec<TileSpec>,
        placements: Vec<TilePlacement>,
    ) -> (OccupancyGrid, Vec<Tile>, Board) {
        let definition = GameDefinition::new(
            "t",
            board,
            specs,
            MovementConstraint::None,
            vec![StartLayout::new("start", placements)],
            Vec::new(),
        )
        .unwrap();
        let board = definition.board().clone();
        let mut tiles = definition.instantiate("start").unwrap().into_tiles();
        let mut grid = OccupancyGrid::new(board.width(), board.height());
        grid.rebuild(&board, &mut tiles).unwrap();
        (grid, tiles, board)
    }

    fn open_3x3_single_tile() -> (OccupancyGrid, Vec<Tile>, Board) {
        fixture(
            Board::new(3, 3, ExclusionMask::none()),
            vec![TileSpec::rect("a", 1, 1)],
            vec![TilePlacement::new("a", GridPos::new(0, 0))],
        )
    }

    #[test]
    fn test_open_board_reaches_diagonal_target() {
        let (grid, tiles, _) = open_3x3_single_tile();
        let mut validator = MoveValidator::new();
        validator.select_tile(&tiles[0]);

        let outcome = validator.check_movement(&grid, &tiles[0], GridPos::new(2, 2), true);
        assert_eq!(validator.cursor(), Some(GridPos::new(2, 2)));
        assert!(outcome.accepted);
        assert!(!outcome.x_blocked);
        assert!(!outcome.y_blocked);
    }

    #[test]
    fn test_excluded_column_blocks_x() {
        let (grid, tiles, _) = fixture(
            Board::new(
                3,
                3,
                ExclusionMask::positions(vec![
                    GridPos::new(2, 0),
                    GridPos::new(2, 1),
                    GridPos::new(2, 2),
                ]),
            ),
            vec![TileSpec::rect("a", 1, 1)],
            vec![TilePlacement::new("a", GridPos::new(0, 0))],
        );
        let mut validator = MoveValidator::new();
        validator.select_tile(&tiles[0]);

        let outcome = validator.check_movement(&grid, &tiles[0], GridPos::new(2, 0), true);
        assert_eq!(validator.cursor(), Some(GridPos::new(1, 0)));
        assert!(outcome.x_blocked);
        assert!(!outcome.y_blocked);
        // The Y axis is already at its target, so the tick still counts.
        assert!(outcome.accepted);
    }

    #[test]
    fn test_diagonal_squeeze_keeps_biased_axis() {
        // Tile at (0,0), the diagonal cell (1,1) held by another tile:
        // each single-axis step fits, the combined step does not.
        let (grid, tiles, _) = fixture(
            Board::new(3, 3, ExclusionMask::none()),
            vec![TileSpec::rect("a", 1, 1), TileSpec::rect("wall", 1, 1)],
            vec![
                TilePlacement::new("a", GridPos::new(0, 0)),
                TilePlacement::new("wall", GridPos::new(1, 1)),
            ],
        );

        let mut validator = MoveValidator::new();
        validator.select_tile(&tiles[0]);
        let outcome = validator.check_movement(&grid, &tiles[0], GridPos::new(1, 1), true);
        assert_eq!(validator.cursor(), Some(GridPos::new(1, 0)));
        assert!(outcome.accepted);
        assert!(!outcome.x_blocked);
        assert!(outcome.y_blocked);

        // Flipping the bias swaps the surviving axis.
        let mut validator = MoveValidator::new();
        validator.select_tile(&tiles[0]);
        let outcome = validator.check_movement(&grid, &tiles[0], GridPos::new(1, 1), false);
        assert_eq!(validator.cursor(), Some(GridPos::new(0, 1)));
        assert!(outcome.accepted);
        assert!(outcome.x_blocked);
        assert!(!outcome.y_blocked);
    }

    #[test]
    fn test_bias_flip_does_not_change_open_reachability() {
        for bias in [true, false] {
            let (grid, tiles, _) = open_3x3_single_tile();
            let mut validator = MoveValidator::new();
            validator.select_tile(&tiles[0]);
            let outcome = validator.check_movement(&grid, &tiles[0], GridPos::new(2, 2), bias);
            assert!(outcome.accepted, "bias {bias}");
            assert_eq!(validator.cursor(), Some(GridPos::new(2, 2)), "bias {bias}");
        }
    }

    #[test]
    fn test_cursor_persists_across_ticks() {
        let (grid, tiles, _) = open_3x3_single_tile();
        let mut validator = MoveValidator::new();
        validator.select_tile(&tiles[0]);

        validator.check_movement(&grid, &tiles[0], GridPos::new(1, 0), true);
        assert_eq!(validator.cursor(), Some(GridPos::new(1, 0)));

        // The next tick retargets; the scan resumes from the cursor.
        let outcome = validator.check_movement(&grid, &tiles[0], GridPos::new(1, 2), true);
        assert_eq!(validator.cursor(), Some(GridPos::new(1, 2)));
        assert!(outcome.accepted);
    }

    #[test]
    fn test_no_selection_is_noop() {
        let (grid, tiles, _) = open_3x3_single_tile();
        let mut validator = MoveValidator::new();
        let outcome = validator.check_movement(&grid, &tiles[0], GridPos::new(1, 0), true);
        assert_eq!(outcome, CheckOutcome::rejected());
        assert_eq!(validator.cursor(), None);
    }

    #[test]
    fn test_out_of_bounds_target_is_a_block_not_a_fault() {
        let (grid, tiles, _) = open_3x3_single_tile();
        let mut validator = MoveValidator::new();
        validator.select_tile(&tiles[0]);

        let outcome = validator.check_movement(&grid, &tiles[0], GridPos::new(-2, 0), true);
        assert_eq!(validator.cursor(), Some(GridPos::new(0, 0)));
        assert!(outcome.x_blocked);
    }

    #[test]
    fn test_spanning_cells_must_all_fit() {
        // 1x1 tile whose gesture box straddles (0,0) and (1,0); a wall at
        // (1,1) blocks the straddled cell's downward step even though the
        // anchor's own step is free.
        let (grid, tiles, _) = fixture(
            Board::new(3, 3, ExclusionMask::none()),
            vec![TileSpec::rect("a", 1, 1), TileSpec::rect("wall", 1, 1)],
            vec![
                TilePlacement::new("a", GridPos::new(0, 0)),
                TilePlacement::new("wall", GridPos::new(1, 1)),
            ],
        );

        let mut validator = MoveValidator::new();
        validator.select_tile_spanning(&tiles[0], &[GridPos::new(0, 0), GridPos::new(1, 0)]);
        let outcome = validator.check_movement(&grid, &tiles[0], GridPos::new(0, 1), true);
        assert_eq!(validator.cursor(), Some(GridPos::new(0, 0)));
        assert!(outcome.y_blocked);
        // X never left its target column, so the tick itself still counts.
        assert!(outcome.accepted);

        // Without the straddle the same step is clear.
        let mut validator = MoveValidator::new();
        validator.select_tile(&tiles[0]);
        let outcome = validator.check_movement(&grid, &tiles[0], GridPos::new(0, 1), true);
        assert!(outcome.accepted);
        assert_eq!(validator.cursor(), Some(GridPos::new(0, 1)));
    }

    #[test]
    fn test_dominant_axis_steps_first() {
        // dx=2, dy=1: the first step must be X-only even with y_bias, since
        // X is strictly dominant until the deltas tie.
        let (grid, tiles, _) = open_3x3_single_tile();
        let mut validator = MoveValidator::new();
        validator.select_tile(&tiles[0]);
        let outcome = validator.check_movement(&grid, &tiles[0], GridPos::new(2, 1), false);
        assert!(outcome.accepted);
        assert_eq!(validator.cursor(), Some(GridPos::new(2, 1)));
    }

    #[test]
    fn test_irregular_tile_slides_past_partial_overlap() {
        // A 2x2 tile missing its bottom-right cell can sit beside a 1x1
        // tile occupying exactly that notch.
        let (grid, tiles, _) = fixture(
            Board::new(4, 3, ExclusionMask::none()),
            vec![
                TileSpec::irregular("l", 2, 2, vec![GridPos::new(1, 1)]),
                TileSpec::rect("peg", 1, 1),
            ],
            vec![
                TilePlacement::new("l", GridPos::new(0, 0)),
                TilePlacement::new("peg", GridPos::new(2, 1)),
            ],
        );

        let mut validator = MoveValidator::new();
        validator.select_tile(&tiles[0]);
        // Moving right by one puts the notch over the peg: legal.
        let outcome = validator.check_movement(&grid, &tiles[0], GridPos::new(1, 0), true);
        assert!(outcome.accepted);
        assert_eq!(validator.cursor(), Some(GridPos::new(1, 0)));
    }
}
