//! Completion templates and the best-result log
//!
//! A template names the exact anchors one or more tiles must reach. The
//! check is a pure short-circuit comparison against the live tile arena and
//! is cheap enough to run after every committed move.

use std::collections::HashMap;

use crate::game::{Tile, TilePlacement};

/// A named set of target anchors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionTemplate {
    name: String,
    placements: Vec<TilePlacement>,
}

impl CompletionTemplate {
    pub fn new(name: impl Into<String>, placements: Vec<TilePlacement>) -> Self {
        Self {
            name: name.into(),
            placements,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn placements(&self) -> &[TilePlacement] {
        &self.placements
    }

    /// True when every listed tile exists among `tiles` with exactly the
    /// listed anchor. A tile missing from the live set fails the whole
    /// check; an empty template is vacuously satisfied.
    pub fn is_satisfied(&self, tiles: &[Tile]) -> bool {
        for placement in &self.placements {
            match tiles.iter().find(|t| t.identity() == placement.identity) {
                Some(tile) if tile.anchor() == placement.at => {}
                _ => return false,
            }
        }
        true
    }
}

/// Best (lowest) committed move count per completed instance.
#[derive(Debug, Clone, Default)]
pub struct BestResults {
    counts: HashMap<String, usize>,
}

impl BestResults {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a completed run; kept only if it beats the stored count.
    pub fn record(&mut self, instance: impl Into<String>, move_count: usize) {
        let entry = self.counts.entry(instance.into()).or_insert(move_count);
        if move_count < *entry {
            *entry = move_count;
        }
    }

    pub fn best_for(&self, instance: &str) -> Option<usize> {
        self.counts.get(instance).copied()
    }
}
