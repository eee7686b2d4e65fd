//! Local scale calibration.
//!
//! A player's box height is a ruler of known real length. Perspective makes
//! the ruler shorter at the far baseline, so the meters-per-pixel ratio is
//! measured per entity from its own boxes in a short window around the
//! current frame instead of once for the whole image.

use crate::models::{BoundingBox, PlayerSlot};
use crate::tracking::PlayerTracks;
use std::ops::Range;

/// Frames `[frame - before, frame + after)` clamped to `[0, len)`.
#[inline]
pub fn calibration_window(frame: usize, len: usize, before: usize, after: usize) -> Range<usize> {
    let start = frame.saturating_sub(before);
    let end = frame.saturating_add(after).min(len);
    start..end.max(start)
}

/// Tallest box over `window` among the frames where the entity was seen.
pub fn max_height_in_window<I>(boxes: I) -> Option<f64>
where
    I: IntoIterator<Item = Option<BoundingBox>>,
{
    boxes
        .into_iter()
        .flatten()
        .map(|b| b.height())
        .fold(None, |acc: Option<f64>, h| Some(acc.map_or(h, |a| a.max(h))))
}

/// Reference pixel height of `slot` at `frame`.
pub fn local_reference_height(
    tracks: &PlayerTracks,
    slot: PlayerSlot,
    frame: usize,
    before: usize,
    after: usize,
) -> Option<f64> {
    let window = calibration_window(frame, tracks.len(), before, after);
    max_height_in_window(window.map(|f| tracks.bbox(slot, f)))
}
