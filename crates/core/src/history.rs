//! Move history - bounded, self-collapsing log of committed moves
//!
//! Recording a move that exactly undoes the previous entry removes that
//! entry instead of appending, so dragging a tile out and straight back
//! leaves no trace. When the bound is exceeded the oldest entry is evicted.
//!
//! The history never touches the grid: undo hands the popped move back to
//! the caller, who applies the inverse anchor and rebuilds.

use gridlock_types::{TileMove, DEFAULT_HISTORY_CAPACITY};

/// Ordered log of committed tile moves, newest last.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveHistory {
    moves: Vec<TileMove>,
    capacity: usize,
}

impl MoveHistory {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_CAPACITY)
    }

    /// A history bounded at `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            moves: Vec::new(),
            capacity,
        }
    }

    /// Rebuild a history from previously saved moves, re-applying the bound.
    pub fn from_moves(moves: Vec<TileMove>, capacity: usize) -> Self {
        let mut history = Self { moves, capacity };
        let len = history.moves.len();
        if len > capacity {
            history.moves.drain(..len - capacity);
        }
        history
    }

    /// Record a committed move.
    ///
    /// If it is the perfect inverse of the previous entry the pair cancels;
    /// otherwise it is appended and the oldest entry evicted when the bound
    /// is exceeded.
    pub fn record(&mut self, mv: TileMove) {
        if let Some(previous) = self.moves.last() {
            if mv.is_inverse_of(previous) {
                self.moves.pop();
                return;
            }
        }

        self.moves.push(mv);
        if self.moves.len() > self.capacity {
            self.moves.remove(0);
        }
    }

    /// Pop and return the most recent move, if any. The caller applies the
    /// inverse to the tile and rebuilds the grid.
    pub fn undo_last(&mut self) -> Option<TileMove> {
        self.moves.pop()
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// All recorded moves, oldest first.
    pub fn moves(&self) -> &[TileMove] {
        &self.moves
    }

    pub fn clear(&mut self) {
        self.moves.clear();
    }
}

impl Default for MoveHistory {
    fn default() -> Self {
        Self::new()
    }
}
