//! Exclusion masks - the cells of a board or tile that are not part of it
//!
//! A mask is an optional uniform border (board holes around the playing area)
//! plus an explicit list of excluded offsets in the owning shape's own
//! coordinate frame. Boards stamp their mask *directly* onto the grid as
//! blocked cells; tiles project the *complement* of theirs (the footprint)
//! so irregular tiles occupy only the cells they really cover.
//!
//! The tile footprint is a two-phase value: `Unbuilt` until the first
//! projection, then `Built` and immutable. Fit checks against an unbuilt
//! footprint report failure rather than vacuously succeeding.

use thiserror::Error;

use gridlock_types::{GridPos, BLOCKED_CELL, EMPTY_CELL};

use crate::grid::OccupancyGrid;

/// Configuration failure while applying or validating a mask.
///
/// These surface at load time; they are never player-facing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MaskError {
    /// Border dimensions must each be under half the owning extent.
    #[error("border {border_width}x{border_height} too large for {area_width}x{area_height} area")]
    BorderTooLarge {
        border_width: i32,
        border_height: i32,
        area_width: i32,
        area_height: i32,
    },

    /// A listed excluded position falls outside the owning shape.
    #[error("excluded position ({x}, {y}) outside {area_width}x{area_height} area")]
    PositionOutOfBounds {
        x: i32,
        y: i32,
        area_width: i32,
        area_height: i32,
    },
}

/// Local footprint of a shape: which of its `width`x`height` cells are
/// excluded. Row-major, `true` = excluded.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Footprint {
    width: i32,
    height: i32,
    excluded: Vec<bool>,
}

impl Footprint {
    fn is_excluded(&self, x: i32, y: i32) -> bool {
        self.excluded[(y * self.width + x) as usize]
    }
}

/// Two-phase footprint cache. Built once on first projection, then immutable
/// (mask definitions never change after load).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
enum FootprintCache {
    #[default]
    Unbuilt,
    Built(Footprint),
}

/// The excluded area of a board or tile.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExclusionMask {
    border_width: i32,
    border_height: i32,
    excluded: Vec<GridPos>,
    cache: FootprintCache,
}

impl ExclusionMask {
    /// A mask excluding nothing.
    pub fn none() -> Self {
        Self::default()
    }

    /// A mask with a uniform border and explicit excluded offsets.
    pub fn new(border_width: i32, border_height: i32, excluded: Vec<GridPos>) -> Self {
        Self {
            border_width,
            border_height,
            excluded,
            cache: FootprintCache::Unbuilt,
        }
    }

    /// A pure border mask.
    pub fn border(border_width: i32, border_height: i32) -> Self {
        Self::new(border_width, border_height, Vec::new())
    }

    /// A mask with explicit excluded offsets only.
    pub fn positions(excluded: Vec<GridPos>) -> Self {
        Self::new(0, 0, excluded)
    }

    pub fn border_width(&self) -> i32 {
        self.border_width
    }

    pub fn border_height(&self) -> i32 {
        self.border_height
    }

    pub fn excluded_positions(&self) -> &[GridPos] {
        &self.excluded
    }

    /// Whether the local footprint has been built yet.
    pub fn is_built(&self) -> bool {
        matches!(self.cache, FootprintCache::Built(_))
    }

    /// A copy of this mask's definition with an unbuilt footprint.
    ///
    /// Used when deriving a playable tile from its master definition so that
    /// instances never share cache state.
    pub fn fresh(&self) -> Self {
        Self::new(self.border_width, self.border_height, self.excluded.clone())
    }

    /// Validate this mask against the owning shape's extents without
    /// touching any grid. Checks the border-halves rule and that every
    /// listed position lies inside `width`x`height`.
    pub fn validate(&self, width: i32, height: i32) -> Result<(), MaskError> {
        if self.border_width > 0 && self.border_height > 0 {
            if self.border_width * 2 >= width || self.border_height * 2 >= height {
                return Err(MaskError::BorderTooLarge {
                    border_width: self.border_width,
                    border_height: self.border_height,
                    area_width: width,
                    area_height: height,
                });
            }
        }

        for pos in &self.excluded {
            if pos.x < 0 || pos.x >= width || pos.y < 0 || pos.y >= height {
                return Err(MaskError::PositionOutOfBounds {
                    x: pos.x,
                    y: pos.y,
                    area_width: width,
                    area_height: height,
                });
            }
        }

        Ok(())
    }

    /// Stamp `tag` into every cell of `grid` this mask excludes: the border
    /// frame first, then the listed positions.
    ///
    /// Fails on a border too large for the grid or a listed position outside
    /// it; these are load-time configuration errors, not player errors.
    pub fn apply(&self, grid: &mut OccupancyGrid, tag: i32) -> Result<(), MaskError> {
        let width = grid.width();
        let height = grid.height();

        // Border first. Only a border with both dimensions set is applied.
        if self.border_width > 0 && self.border_height > 0 {
            if self.border_width * 2 >= width || self.border_height * 2 >= height {
                return Err(MaskError::BorderTooLarge {
                    border_width: self.border_width,
                    border_height: self.border_height,
                    area_width: width,
                    area_height: height,
                });
            }

            for y in 0..height {
                for x in 0..width {
                    let in_frame = y < self.border_height
                        || y >= height - self.border_height
                        || x < self.border_width
                        || x >= width - self.border_width;
                    if in_frame {
                        grid.set(x, y, tag);
                    }
                }
            }
        }

        // Then the individual exclusions.
        for pos in &self.excluded {
            if pos.x < 0 || pos.x >= width || pos.y < 0 || pos.y >= height {
                return Err(MaskError::PositionOutOfBounds {
                    x: pos.x,
                    y: pos.y,
                    area_width: width,
                    area_height: height,
                });
            }
            grid.set(pos.x, pos.y, tag);
        }

        Ok(())
    }

    /// Project the *non*-excluded cells of a `width`x`height` shape onto
    /// `grid` at `(x_offset, y_offset)`, stamping them with `tag`.
    ///
    /// The local footprint is built and cached on first use. Cells that fall
    /// outside the grid are clipped silently; only a listed position outside
    /// the shape itself is a configuration error. Blocked grid cells are
    /// never overwritten: where a shape and an exclusion overlap, the
    /// exclusion wins.
    pub fn apply_at(
        &mut self,
        grid: &mut OccupancyGrid,
        tag: i32,
        width: i32,
        height: i32,
        x_offset: i32,
        y_offset: i32,
    ) -> Result<(), MaskError> {
        let footprint = self.build_footprint(width, height)?;

        for y in 0..footprint.height {
            for x in 0..footprint.width {
                if footprint.is_excluded(x, y) {
                    continue;
                }
                // Clip cells landing outside the grid; leave blocked cells
                // blocked.
                if grid.get(x + x_offset, y + y_offset) != Some(BLOCKED_CELL) {
                    grid.set(x + x_offset, y + y_offset, tag);
                }
            }
        }

        Ok(())
    }

    /// Check whether the shape's footprint fits on `grid` at
    /// `(x_offset, y_offset)`: every non-excluded cell must map inside the
    /// grid onto either the shape's own `tag` or an empty cell.
    ///
    /// Returns `false` if the footprint has never been built: a shape that
    /// has never been projected cannot vacuously fit anywhere.
    pub fn check_fit(&self, grid: &OccupancyGrid, tag: i32, x_offset: i32, y_offset: i32) -> bool {
        let FootprintCache::Built(footprint) = &self.cache else {
            return false;
        };

        for y in 0..footprint.height {
            for x in 0..footprint.width {
                if footprint.is_excluded(x, y) {
                    continue;
                }
                match grid.get(x + x_offset, y + y_offset) {
                    Some(value) if value == tag || value == EMPTY_CELL => {}
                    // Another tile, a blocked cell, or out of bounds.
                    _ => return false,
                }
            }
        }

        true
    }

    fn build_footprint(&mut self, width: i32, height: i32) -> Result<&Footprint, MaskError> {
        if let FootprintCache::Unbuilt = self.cache {
            let mut excluded = vec![false; (width * height) as usize];
            for pos in &self.excluded {
                if pos.x < 0 || pos.x >= width || pos.y < 0 || pos.y >= height {
                    return Err(MaskError::PositionOutOfBounds {
                        x: pos.x,
                        y: pos.y,
                        area_width: width,
                        area_height: height,
                    });
                }
                excluded[(pos.y * width + pos.x) as usize] = true;
            }
            self.cache = FootprintCache::Built(Footprint {
                width,
                height,
                excluded,
            });
        }

        match &self.cache {
            FootprintCache::Built(footprint) => Ok(footprint),
            FootprintCache::Unbuilt => unreachable!("footprint built above"),
        }
    }
}
