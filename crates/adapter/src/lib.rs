//! Persistence adapter - serializable save state for puzzle sessions
//!
//! The core deliberately owns no wire format; the exact state needed to
//! resume a session is {tile anchors, move history}, exposed as
//! [`SessionSnapshot`]. This crate is the serialization collaborator: it
//! mirrors that snapshot into serde-friendly wire types and round-trips
//! them through line-friendly JSON.
//!
//! Restoring a save produced by `to_json` into a freshly opened session of
//! the same instance reproduces identical grid behavior.
//!
//! # Document shape
//!
//! ```json
//! {
//!   "instance": "klotski/standard",
//!   "tiles": [{"identity": "caocao", "x": 1, "y": 0}],
//!   "moves": [{"identity": "soldier1", "fromX": 0, "fromY": 4, "toX": 1, "toY": 4}]
//! }
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use gridlock_core::{SessionSnapshot, TileAnchor};
use gridlock_types::{GridPos, TileMove};

/// One persisted tile anchor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedTile {
    pub identity: String,
    pub x: i32,
    pub y: i32,
}

/// One persisted move record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedMove {
    pub identity: String,
    pub from_x: i32,
    pub from_y: i32,
    pub to_x: i32,
    pub to_y: i32,
}

/// The complete persisted state of one session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveState {
    pub instance: String,
    pub tiles: Vec<SavedTile>,
    pub moves: Vec<SavedMove>,
}

impl SaveState {
    /// Serialize to a JSON document.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).context("serializing save state")
    }

    /// Parse a JSON document produced by [`to_json`](Self::to_json).
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("parsing save state")
    }

    /// Convert back into the core's snapshot value.
    pub fn into_snapshot(self) -> SessionSnapshot {
        SessionSnapshot {
            instance: self.instance,
            anchors: self
                .tiles
                .into_iter()
                .map(|tile| TileAnchor::new(tile.identity, GridPos::new(tile.x, tile.y)))
                .collect(),
            moves: self
                .moves
                .into_iter()
                .map(|mv| {
                    TileMove::new(
                        mv.identity,
                        GridPos::new(mv.from_x, mv.from_y),
                        GridPos::new(mv.to_x, mv.to_y),
                    )
                })
                .collect(),
        }
    }
}

impl From<&SessionSnapshot> for SaveState {
    fn from(snapshot: &SessionSnapshot) -> Self {
        Self {
            instance: snapshot.instance.clone(),
            tiles: snapshot
                .anchors
                .iter()
                .map(|anchor| SavedTile {
                    identity: anchor.identity.clone(),
                    x: anchor.at.x,
                    y: anchor.at.y,
                })
                .collect(),
            moves: snapshot
                .moves
                .iter()
                .map(|mv| SavedMove {
                    identity: mv.identity.clone(),
                    from_x: mv.from.x,
                    from_y: mv.from.y,
                    to_x: mv.to.x,
                    to_y: mv.to.y,
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> SessionSnapshot {
        SessionSnapshot {
            instance: "klotski/standard".into(),
            anchors: vec![
                TileAnchor::new("caocao", GridPos::new(1, 0)),
                TileAnchor::new("soldier1", GridPos::new(0, 4)),
            ],
            moves: vec![TileMove::new(
                "soldier1",
                GridPos::new(0, 4),
                GridPos::new(1, 4),
            )],
        }
    }

    #[test]
    fn test_json_round_trip() {
        let save = SaveState::from(&snapshot());
        let json = save.to_json().unwrap();
        let restored = SaveState::from_json(&json).unwrap();
        assert_eq!(restored, save);
        assert_eq!(restored.into_snapshot(), snapshot());
    }

    #[test]
    fn test_move_fields_are_camel_case() {
        let save = SaveState::from(&snapshot());
        let json = save.to_json().unwrap();
        assert!(json.contains("\"fromX\":0"));
        assert!(json.contains("\"toY\":4"));
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        assert!(SaveState::from_json("{\"instance\":").is_err());
    }
}
