//! Game definitions - boards, tiles, layouts, and instance derivation
//!
//! A [`GameDefinition`] is the immutable, fully validated description of one
//! puzzle type: its board, its master tiles, its named starting layouts and
//! its completion templates. Playable [`GameInstance`]s are derived from a
//! layout by deep-copying the referenced master tiles, assigning fresh grid
//! ids in layout order and giving every copy an unbuilt footprint cache so
//! instances never alias definition state.
//!
//! Definitions arrive here already parsed; file formats are a front-end
//! concern. Validation is structural only: identity uniqueness, reference
//! resolution and mask well-formedness.

use std::collections::HashSet;

use thiserror::Error;

use gridlock_types::{GridPos, MovementConstraint};

use crate::completion::CompletionTemplate;
use crate::exclusion::{ExclusionMask, MaskError};
use crate::grid::OccupancyGrid;

/// A configuration error detected while building a [`GameDefinition`].
///
/// Fatal at load time; a session is never started over a bad definition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DefinitionError {
    #[error("duplicate tile identity `{0}`")]
    DuplicateTile(String),

    #[error("layout `{layout}` references unknown tile `{identity}`")]
    UnknownLayoutTile { layout: String, identity: String },

    #[error("completion `{template}` references unknown tile `{identity}`")]
    UnknownCompletionTile { template: String, identity: String },

    #[error("no layout named `{0}`")]
    UnknownLayout(String),

    #[error("board mask invalid: {0}")]
    BoardMask(#[source] MaskError),

    #[error("mask of tile `{identity}` invalid: {source}")]
    TileMask {
        identity: String,
        #[source]
        source: MaskError,
    },
}

/// The board of a game: its extent in cells and the exclusion describing its
/// border and holes.
#[derive(Debug, Clone)]
pub struct Board {
    width: i32,
    height: i32,
    exclusion: ExclusionMask,
}

impl Board {
    pub fn new(width: i32, height: i32, exclusion: ExclusionMask) -> Self {
        Self {
            width,
            height,
            exclusion,
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn exclusion(&self) -> &ExclusionMask {
        &self.exclusion
    }
}

/// Master description of a tile kind, before it is placed in an instance.
#[derive(Debug, Clone)]
pub struct TileSpec {
    pub identity: String,
    pub width: i32,
    pub height: i32,
    /// Constraint for this tile; `None` inherits the game default.
    pub constraint: Option<MovementConstraint>,
    pub exclusion: ExclusionMask,
}

impl TileSpec {
    /// A plain rectangular tile with no constraint override.
    pub fn rect(identity: impl Into<String>, width: i32, height: i32) -> Self {
        Self {
            identity: identity.into(),
            width,
            height,
            constraint: None,
            exclusion: ExclusionMask::none(),
        }
    }

    /// An irregular tile whose listed local cells are not part of it.
    pub fn irregular(
        identity: impl Into<String>,
        width: i32,
        height: i32,
        excluded: Vec<GridPos>,
    ) -> Self {
        Self {
            identity: identity.into(),
            width,
            height,
            constraint: None,
            exclusion: ExclusionMask::positions(excluded),
        }
    }

    /// Override the movement constraint for this tile.
    pub fn with_constraint(mut self, constraint: MovementConstraint) -> Self {
        self.constraint = Some(constraint);
        self
    }
}

/// A live, placed tile inside a [`GameInstance`].
#[derive(Debug, Clone)]
pub struct Tile {
    identity: String,
    width: i32,
    height: i32,
    constraint: MovementConstraint,
    exclusion: ExclusionMask,
    grid_id: i32,
    anchor: GridPos,
}

impl Tile {
    pub fn identity(&self) -> &str {
        &self.identity
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn constraint(&self) -> MovementConstraint {
        self.constraint
    }

    /// Stable positive tag identifying this tile on the occupancy grid.
    pub fn grid_id(&self) -> i32 {
        self.grid_id
    }

    /// Top-left grid coordinate of the tile's bounding box.
    pub fn anchor(&self) -> GridPos {
        self.anchor
    }

    pub(crate) fn set_anchor(&mut self, anchor: GridPos) {
        self.anchor = anchor;
    }

    /// Stamp this tile's footprint onto the grid at its current anchor.
    pub fn apply_to_grid(&mut self, grid: &mut OccupancyGrid) -> Result<(), MaskError> {
        let (width, height, anchor, grid_id) = (self.width, self.height, self.anchor, self.grid_id);
        self.exclusion
            .apply_at(grid, grid_id, width, height, anchor.x, anchor.y)
    }

    /// Whether this tile could sit with its anchor at `(x, y)`.
    pub fn check_move(&self, grid: &OccupancyGrid, x: i32, y: i32) -> bool {
        self.exclusion.check_fit(grid, self.grid_id, x, y)
    }
}

/// One tile placement: an identity plus a grid position. Used both by
/// starting layouts and by completion templates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TilePlacement {
    pub identity: String,
    pub at: GridPos,
}

impl TilePlacement {
    pub fn new(identity: impl Into<String>, at: GridPos) -> Self {
        Self {
            identity: identity.into(),
            at,
        }
    }
}

/// A named starting arrangement of tiles.
#[derive(Debug, Clone)]
pub struct StartLayout {
    pub name: String,
    pub placements: Vec<TilePlacement>,
}

impl StartLayout {
    pub fn new(name: impl Into<String>, placements: Vec<TilePlacement>) -> Self {
        Self {
            name: name.into(),
            placements,
        }
    }
}

/// A fully validated, immutable game definition.
#[derive(Debug, Clone)]
pub struct GameDefinition {
    name: String,
    board: Board,
    tiles: Vec<TileSpec>,
    default_constraint: MovementConstraint,
    layouts: Vec<StartLayout>,
    completions: Vec<CompletionTemplate>,
}

impl GameDefinition {
    /// Build and validate a definition.
    ///
    /// Checks identity uniqueness, that every layout and completion entry
    /// resolves to a defined tile, and that the board and tile masks are
    /// well formed for their extents.
    pub fn new(
        name: impl Into<String>,
        board: Board,
        tiles: Vec<TileSpec>,
        default_constraint: MovementConstraint,
        layouts: Vec<StartLayout>,
        completions: Vec<CompletionTemplate>,
    ) -> Result<Self, DefinitionError> {
        let mut seen = HashSet::new();
        for spec in &tiles {
            if !seen.insert(spec.identity.as_str()) {
                return Err(DefinitionError::DuplicateTile(spec.identity.clone()));
            }
            spec.exclusion
                .validate(spec.width, spec.height)
                .map_err(|source| DefinitionError::TileMask {
                    identity: spec.identity.clone(),
                    source,
                })?;
        }

        board
            .exclusion()
            .validate(board.width(), board.height())
            .map_err(DefinitionError::BoardMask)?;

        for layout in &layouts {
            for placement in &layout.placements {
                if !seen.contains(placement.identity.as_str()) {
                    return Err(DefinitionError::UnknownLayoutTile {
                        layout: layout.name.clone(),
                        identity: placement.identity.clone(),
                    });
                }
            }
        }

        for template in &completions {
            for placement in template.placements() {
                if !seen.contains(placement.identity.as_str()) {
                    return Err(DefinitionError::UnknownCompletionTile {
                        template: template.name().to_string(),
                        identity: placement.identity.clone(),
                    });
                }
            }
        }

        Ok(Self {
            name: name.into(),
            board,
            tiles,
            default_constraint,
            layouts,
            completions,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn layouts(&self) -> &[StartLayout] {
        &self.layouts
    }

    pub fn completions(&self) -> &[CompletionTemplate] {
        &self.completions
    }

    fn spec(&self, identity: &str) -> Option<&TileSpec> {
        self.tiles.iter().find(|spec| spec.identity == identity)
    }

    /// Derive a playable instance from the named layout.
    ///
    /// Tiles are deep copies of their masters: fresh grid ids assigned in
    /// layout order starting at 1, the game default constraint filled in
    /// where the master has none, and an unbuilt footprint cache.
    pub fn instantiate(&self, layout_name: &str) -> Result<GameInstance, DefinitionError> {
        let layout = self
            .layouts
            .iter()
            .find(|layout| layout.name == layout_name)
            .ok_or_else(|| DefinitionError::UnknownLayout(layout_name.to_string()))?;

        let mut tiles = Vec::with_capacity(layout.placements.len());
        for (index, placement) in layout.placements.iter().enumerate() {
            // Validation guarantees the spec exists.
            let spec = self
                .spec(&placement.identity)
                .ok_or_else(|| DefinitionError::UnknownLayoutTile {
                    layout: layout.name.clone(),
                    identity: placement.identity.clone(),
                })?;

            tiles.push(Tile {
                identity: spec.identity.clone(),
                width: spec.width,
                height: spec.height,
                constraint: spec.constraint.unwrap_or(self.default_constraint),
                exclusion: spec.exclusion.fresh(),
                grid_id: index as i32 + 1,
                anchor: placement.at,
            });
        }

        Ok(GameInstance {
            name: format!("{}/{}", self.name, layout.name),
            tiles,
        })
    }
}

/// A playable arrangement: the tile arena for one session.
///
/// Tiles are indexed by `grid_id - 1`; nothing holds references between
/// tiles, templates index by identity instead.
#[derive(Debug, Clone)]
pub struct GameInstance {
    name: String,
    tiles: Vec<Tile>,
}

impl GameInstance {
    /// Full name of the instance (`game/layout`).
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub(crate) fn into_tiles(self) -> Vec<Tile> {
        self.tiles
    }
}
