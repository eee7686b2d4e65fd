//! Court keypoints in original-frame pixel space.
//!
//! ## Layout (camera at the near baseline)
//! ```text
//!  0 ── 4 ────────── 6 ── 1     far baseline
//!  │    │            │    │
//!  │    8 ─── 12 ─── 9    │     far service line
//!  │    │     │      │    │
//!  │   10 ─── 13 ── 11    │     near service line
//!  │    │            │    │
//!  2 ── 5 ────────── 7 ── 3     near baseline
//! ```

use super::constants::mini_court::KEYPOINT_COUNT;
use crate::error::{PipelineError, Result};
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// Named court keypoint; the discriminant is the detector's output index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CourtKeypoint {
    FarBaselineLeft = 0,
    FarBaselineRight = 1,
    NearBaselineLeft = 2,
    NearBaselineRight = 3,
    FarSinglesLeft = 4,
    NearSinglesLeft = 5,
    FarSinglesRight = 6,
    NearSinglesRight = 7,
    FarServiceLeft = 8,
    FarServiceRight = 9,
    NearServiceLeft = 10,
    NearServiceRight = 11,
    FarServiceCenter = 12,
    NearServiceCenter = 13,
}

impl CourtKeypoint {
    pub const ALL: [CourtKeypoint; KEYPOINT_COUNT] = [
        CourtKeypoint::FarBaselineLeft,
        CourtKeypoint::FarBaselineRight,
        CourtKeypoint::NearBaselineLeft,
        CourtKeypoint::NearBaselineRight,
        CourtKeypoint::FarSinglesLeft,
        CourtKeypoint::NearSinglesLeft,
        CourtKeypoint::FarSinglesRight,
        CourtKeypoint::NearSinglesRight,
        CourtKeypoint::FarServiceLeft,
        CourtKeypoint::FarServiceRight,
        CourtKeypoint::NearServiceLeft,
        CourtKeypoint::NearServiceRight,
        CourtKeypoint::FarServiceCenter,
        CourtKeypoint::NearServiceCenter,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

/// The 14 court keypoints detected on the first frame.
///
/// The camera is static, so the set is computed once and never changes.
#[derive(Debug, Clone, PartialEq)]
pub struct CourtKeypoints {
    points: [Point2<f64>; KEYPOINT_COUNT],
}

impl CourtKeypoints {
    pub fn new(points: [Point2<f64>; KEYPOINT_COUNT]) -> Self {
        Self { points }
    }

    /// Build from the detector's flat `[x0, y0, x1, y1, ...]` output.
    pub fn from_flat(values: &[f64]) -> Result<Self> {
        let expected = KEYPOINT_COUNT * 2;
        if values.len() != expected {
            return Err(PipelineError::InvalidKeypoints { expected, found: values.len() });
        }

        let mut points = [Point2::origin(); KEYPOINT_COUNT];
        for (point, pair) in points.iter_mut().zip(values.chunks_exact(2)) {
            *point = Point2::new(pair[0], pair[1]);
        }
        Ok(Self { points })
    }

    /// Keypoint by raw index. Panics when `index >= 14`.
    #[inline]
    pub fn point(&self, index: usize) -> Point2<f64> {
        self.points[index]
    }

    #[inline]
    pub fn get(&self, keypoint: CourtKeypoint) -> Point2<f64> {
        self.points[keypoint.index()]
    }

    pub fn points(&self) -> &[Point2<f64>; KEYPOINT_COUNT] {
        &self.points
    }

    pub fn iter(&self) -> impl Iterator<Item = &Point2<f64>> {
        self.points.iter()
    }

    pub fn to_flat(&self) -> Vec<f64> {
        self.points.iter().flat_map(|p| [p.x, p.y]).collect()
    }

    /// Among `candidates`, the keypoint whose **y** is closest to `position.y`.
    ///
    /// Horizontal distance is ignored on purpose: the anchor only has to sit
    /// at a similar depth on court. Ties keep the earlier candidate; an empty
    /// candidate list yields index 0.
    pub fn closest_by_y(&self, position: Point2<f64>, candidates: &[usize]) -> usize {
        let mut best = candidates.first().copied().unwrap_or(0);
        let mut best_distance = f64::INFINITY;
        for &index in candidates {
            let distance = (position.y - self.points[index].y).abs();
            if distance < best_distance {
                best_distance = distance;
                best = index;
            }
        }
        best
    }

    /// Smallest euclidean distance from `position` to any keypoint.
    pub fn min_distance_to(&self, position: Point2<f64>) -> f64 {
        self.points
            .iter()
            .map(|p| nalgebra::distance(p, &position))
            .fold(f64::INFINITY, f64::min)
    }
}
