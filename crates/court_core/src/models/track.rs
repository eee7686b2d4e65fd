//! Track identities and per-frame detection containers.

use super::bbox::BoundingBox;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Persistent identity assigned by the external tracker.
pub type TrackId = u32;

/// One frame of player detections: track id → box.
///
/// `BTreeMap` keeps iteration order stable across runs.
pub type PlayerFrame = BTreeMap<TrackId, BoundingBox>;

/// One frame of ball detections (at most one ball).
pub type BallFrame = Option<BoundingBox>;

/// Which of the two selected players a value belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum PlayerSlot {
    One,
    Two,
}

impl PlayerSlot {
    pub const ALL: [PlayerSlot; 2] = [PlayerSlot::One, PlayerSlot::Two];

    /// Array index (0 or 1).
    #[inline]
    pub fn index(self) -> usize {
        match self {
            PlayerSlot::One => 0,
            PlayerSlot::Two => 1,
        }
    }

    /// Human-facing player number (1 or 2).
    #[inline]
    pub fn number(self) -> u8 {
        self.index() as u8 + 1
    }

    #[inline]
    pub fn other(self) -> PlayerSlot {
        match self {
            PlayerSlot::One => PlayerSlot::Two,
            PlayerSlot::Two => PlayerSlot::One,
        }
    }
}
