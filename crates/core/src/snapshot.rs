//! Session snapshot - the resumable state of a puzzle in play
//!
//! Exactly the state a front-end must persist to resume a session: the
//! instance name, every tile's current anchor, and the recorded move
//! history. The wire format is the persistence adapter's concern; this is
//! the plain value it round-trips.

use gridlock_types::{GridPos, TileMove};

/// Plain-value snapshot of a [`PuzzleSession`](crate::session::PuzzleSession).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    /// Full instance name (`game/layout`).
    pub instance: String,
    /// Current anchor of every tile, in arena order.
    pub anchors: Vec<TileAnchor>,
    /// Recorded moves, oldest first.
    pub moves: Vec<TileMove>,
}

/// One tile's identity and current anchor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileAnchor {
    pub identity: String,
    pub at: GridPos,
}

impl TileAnchor {
    pub fn new(identity: impl Into<String>, at: GridPos) -> Self {
        Self {
            identity: identity.into(),
            at,
        }
    }
}
