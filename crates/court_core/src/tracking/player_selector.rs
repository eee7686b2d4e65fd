//! # Player Selector
//!
//! Picks the two players on court from the first frame and keeps only their
//! tracks for the rest of the video.
//!
//! ## Algorithm
//! 1. For each entity in frame 0, distance from box center to the nearest keypoint
//! 2. Sort ascending (stable; equal distances keep track-id order)
//! 3. The first two are the players
//!
//! Umpires, ball kids and spectators sit further from every court keypoint.

use crate::court::CourtKeypoints;
use crate::error::{PipelineError, Result};
use crate::models::{BoundingBox, PlayerFrame, PlayerSlot, TrackId};
use serde::{Deserialize, Serialize};

/// The two persistent identities chosen as players.
///
/// Slot one always holds the lower track id so slot assignment does not
/// depend on detector ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedPlayers {
    ids: [TrackId; 2],
}

impl SelectedPlayers {
    pub fn new(a: TrackId, b: TrackId) -> Self {
        Self { ids: [a.min(b), a.max(b)] }
    }

    #[inline]
    pub fn id(&self, slot: PlayerSlot) -> TrackId {
        self.ids[slot.index()]
    }

    pub fn ids(&self) -> [TrackId; 2] {
        self.ids
    }

    pub fn slot_of(&self, id: TrackId) -> Option<PlayerSlot> {
        PlayerSlot::ALL.into_iter().find(|slot| self.id(*slot) == id)
    }

    pub fn contains(&self, id: TrackId) -> bool {
        self.slot_of(id).is_some()
    }
}

/// Choose the two entities closest to the court in the first frame.
pub fn select_two_players(
    first_frame: &PlayerFrame,
    keypoints: &CourtKeypoints,
) -> Result<SelectedPlayers> {
    if first_frame.len() < 2 {
        return Err(PipelineError::InsufficientDetections { found: first_frame.len() });
    }

    let mut distances: Vec<(TrackId, f64)> = first_frame
        .iter()
        .map(|(&track_id, bbox)| (track_id, keypoints.min_distance_to(bbox.center())))
        .collect();
    distances.sort_by(|a, b| a.1.total_cmp(&b.1));

    let selected = SelectedPlayers::new(distances[0].0, distances[1].0);
    tracing::info!(
        candidates = first_frame.len(),
        player_1 = selected.id(PlayerSlot::One),
        player_2 = selected.id(PlayerSlot::Two),
        "players selected"
    );
    Ok(selected)
}

/// Per-frame boxes of the two selected players, indexed by slot.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerTracks {
    selected: SelectedPlayers,
    frames: Vec<[Option<BoundingBox>; 2]>,
}

impl PlayerTracks {
    pub fn selected(&self) -> SelectedPlayers {
        self.selected
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Box of `slot` at `frame`; `None` when the tracker lost that player.
    #[inline]
    pub fn bbox(&self, slot: PlayerSlot, frame: usize) -> Option<BoundingBox> {
        self.frames.get(frame).and_then(|boxes| boxes[slot.index()])
    }

    /// Back to the detector's id-keyed shape, restricted to the selected ids.
    pub fn to_player_frames(&self) -> Vec<PlayerFrame> {
        self.frames
            .iter()
            .map(|boxes| {
                PlayerSlot::ALL
                    .into_iter()
                    .filter_map(|slot| boxes[slot.index()].map(|b| (self.selected.id(slot), b)))
                    .collect()
            })
            .collect()
    }
}

/// Restrict every frame to the selected ids.
pub fn filter_players(frames: &[PlayerFrame], selected: SelectedPlayers) -> PlayerTracks {
    let frames = frames
        .iter()
        .map(|frame| {
            [
                frame.get(&selected.id(PlayerSlot::One)).copied(),
                frame.get(&selected.id(PlayerSlot::Two)).copied(),
            ]
        })
        .collect();
    PlayerTracks { selected, frames }
}

/// Select from frame 0 and filter the whole sequence.
pub fn choose_and_filter_players(
    frames: &[PlayerFrame],
    keypoints: &CourtKeypoints,
) -> Result<PlayerTracks> {
    let first = frames.first().ok_or(PipelineError::EmptyFrameSequence)?;
    let selected = select_two_players(first, keypoints)?;
    Ok(filter_players(frames, selected))
}
