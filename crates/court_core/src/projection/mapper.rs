//! # Coordinate Mapper
//!
//! Original-frame pixels → mini-court pixels without a homography.
//!
//! ## Algorithm
//! 1. Pick an anchor keypoint at a similar depth (y only)
//! 2. Signed pixel offset from the anchor to the object
//! 3. Offset → meters with the entity's local scale (real height / pixel height)
//! 4. Meters → mini-court pixels with the global scale (court width / doubles width)
//! 5. Add to the anchor's mini-court position
//!
//! Every frame is independent once geometry and tracks are fixed, so frames
//! are mapped in parallel for long videos; results keep frame order.

use super::local_scale::local_reference_height;
use crate::config::CalibrationConfig;
use crate::court::{convert_pixel_distance_to_meters, CourtKeypoints, MiniCourtGeometry};
use crate::models::{BoundingBox, PlayerSlot};
use crate::tracking::PlayerTracks;
use nalgebra::{Point2, Vector2};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Frame count above which projection runs on the rayon pool.
const PARALLEL_FRAME_THRESHOLD: usize = 256;

/// Mini-court positions of every tracked entity, one entry per frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MiniCourtTrajectories {
    /// Player positions indexed by slot; `None` when the player was not detected
    pub players: Vec<[Option<Point2<f64>>; 2]>,
    /// Ball position; `None` when no player was available as a scale reference
    pub ball: Vec<Option<Point2<f64>>>,
}

impl MiniCourtTrajectories {
    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    #[inline]
    pub fn player(&self, slot: PlayerSlot, frame: usize) -> Option<Point2<f64>> {
        self.players.get(frame).and_then(|p| p[slot.index()])
    }

    #[inline]
    pub fn ball(&self, frame: usize) -> Option<Point2<f64>> {
        self.ball.get(frame).copied().flatten()
    }
}

/// Projects original-frame positions onto the mini-court.
#[derive(Debug, Clone, Copy)]
pub struct CoordinateMapper<'a> {
    geometry: &'a MiniCourtGeometry,
    keypoints: &'a CourtKeypoints,
    calibration: &'a CalibrationConfig,
}

impl<'a> CoordinateMapper<'a> {
    pub fn new(
        geometry: &'a MiniCourtGeometry,
        keypoints: &'a CourtKeypoints,
        calibration: &'a CalibrationConfig,
    ) -> Self {
        Self { geometry, keypoints, calibration }
    }

    /// Anchor keypoint with the closest **vertical** coordinate.
    ///
    /// Only y is compared: the anchor has to share the object's depth on
    /// court, horizontal spread is absorbed by the offset. Replacing this
    /// with a full 2-D nearest search changes every projected position.
    pub fn choose_anchor(&self, position: Point2<f64>) -> usize {
        self.keypoints.closest_by_y(position, &self.calibration.anchor_keypoints)
    }

    /// Map `object` to mini-court pixels relative to keypoint `anchor`.
    ///
    /// A non-positive reference height carries no scale information; the
    /// object is then placed on the anchor itself.
    pub fn project(
        &self,
        object: Point2<f64>,
        local_reference_px: f64,
        reference_height_m: f64,
        anchor: usize,
    ) -> Point2<f64> {
        let anchor_frame = self.keypoints.point(anchor);
        let anchor_mini = self.geometry.keypoint(anchor);

        if local_reference_px.is_nan() || local_reference_px <= 0.0 {
            tracing::debug!(anchor, local_reference_px, "no usable reference height");
            return anchor_mini;
        }

        let offset_px: Vector2<f64> = object - anchor_frame;
        let offset_m = offset_px.map(|d| {
            convert_pixel_distance_to_meters(d, reference_height_m, local_reference_px)
        });
        let offset_mini = offset_m.map(|m| self.geometry.meters_to_pixels(m));

        anchor_mini + offset_mini
    }

    /// Project one player's foot position at `frame`.
    pub fn project_player(
        &self,
        tracks: &PlayerTracks,
        slot: PlayerSlot,
        frame: usize,
    ) -> Option<Point2<f64>> {
        let bbox = tracks.bbox(slot, frame)?;
        let reference_px = self.reference_height(tracks, slot, frame)?;
        let foot = bbox.foot_position();
        let anchor = self.choose_anchor(foot);
        Some(self.project(foot, reference_px, self.player_height_m(slot), anchor))
    }

    /// Project the ball center at `frame`.
    ///
    /// The ball has no known real size, so it borrows the scale of the
    /// player standing nearest to it in the frame.
    pub fn project_ball(
        &self,
        tracks: &PlayerTracks,
        ball: &BoundingBox,
        frame: usize,
    ) -> Option<Point2<f64>> {
        let ball_center = ball.center();
        let nearest = PlayerSlot::ALL
            .into_iter()
            .filter_map(|slot| {
                tracks
                    .bbox(slot, frame)
                    .map(|b| (slot, nalgebra::distance(&b.center(), &ball_center)))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(slot, _)| slot)?;

        let reference_px = self.reference_height(tracks, nearest, frame)?;
        let anchor = self.choose_anchor(ball_center);
        Some(self.project(ball_center, reference_px, self.player_height_m(nearest), anchor))
    }

    /// Project both players and the ball over the whole sequence.
    ///
    /// `ball` must already be interpolated and as long as `tracks`.
    pub fn project_tracks(&self, tracks: &PlayerTracks, ball: &[BoundingBox]) -> MiniCourtTrajectories {
        let frame_count = tracks.len().min(ball.len());
        let project_frame = |frame: usize| {
            let players = [
                self.project_player(tracks, PlayerSlot::One, frame),
                self.project_player(tracks, PlayerSlot::Two, frame),
            ];
            let ball = self.project_ball(tracks, &ball[frame], frame);
            (players, ball)
        };

        let frames: Vec<([Option<Point2<f64>>; 2], Option<Point2<f64>>)> =
            if frame_count > PARALLEL_FRAME_THRESHOLD {
                (0..frame_count).into_par_iter().map(project_frame).collect()
            } else {
                (0..frame_count).map(project_frame).collect()
            };

        let (players, ball): (Vec<_>, Vec<_>) = frames.into_iter().unzip();
        let missing_ball = ball.iter().filter(|b| b.is_none()).count();
        if missing_ball > 0 {
            tracing::warn!(missing_ball, frame_count, "ball not projected in some frames");
        }
        MiniCourtTrajectories { players, ball }
    }

    fn reference_height(&self, tracks: &PlayerTracks, slot: PlayerSlot, frame: usize) -> Option<f64> {
        local_reference_height(
            tracks,
            slot,
            frame,
            self.calibration.window_before_frames,
            self.calibration.window_after_frames,
        )
    }

    #[inline]
    fn player_height_m(&self, slot: PlayerSlot) -> f64 {
        self.calibration.player_heights_m[slot.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CourtDimensions, MiniCourtConfig};
    use crate::models::PlayerFrame;
    use crate::tracking::{filter_players, SelectedPlayers};

    fn frame_keypoints() -> CourtKeypoints {
        let flat = [
            400.0, 100.0, 880.0, 100.0, 250.0, 650.0, 1030.0, 650.0, 450.0, 100.0, 330.0, 650.0,
            830.0, 100.0, 950.0, 650.0, 430.0, 230.0, 850.0, 230.0, 360.0, 500.0, 920.0, 500.0,
            640.0, 230.0, 640.0, 500.0,
        ];
        CourtKeypoints::from_flat(&flat).unwrap()
    }

    fn geometry() -> MiniCourtGeometry {
        MiniCourtGeometry::build(1280, 720, &MiniCourtConfig::default(), &CourtDimensions::default())
    }

    #[test]
    fn test_object_on_anchor_maps_to_mini_anchor() {
        let keypoints = frame_keypoints();
        let geometry = geometry();
        let calibration = CalibrationConfig::default();
        let mapper = CoordinateMapper::new(&geometry, &keypoints, &calibration);

        for &anchor in &calibration.anchor_keypoints {
            let pos = mapper.project(keypoints.point(anchor), 180.0, 1.88, anchor);
            assert_eq!(pos, geometry.keypoint(anchor));
        }
    }

    #[test]
    fn test_offset_is_scaled_and_signed() {
        let keypoints = frame_keypoints();
        let geometry = geometry();
        let calibration = CalibrationConfig::default();
        let mapper = CoordinateMapper::new(&geometry, &keypoints, &calibration);

        // 94 px tall box for a 1.88 m player: 0.02 m per pixel
        let anchor = 13;
        let object = keypoints.point(anchor) + Vector2::new(-50.0, 100.0);
        let pos = mapper.project(object, 94.0, 1.88, anchor);

        let px_per_m = 210.0 / 10.97;
        let expected = geometry.keypoint(anchor) + Vector2::new(-1.0 * px_per_m, 2.0 * px_per_m);
        assert!((pos - expected).norm() < 1e-9);
    }

    #[test]
    fn test_zero_reference_height_lands_on_anchor() {
        let keypoints = frame_keypoints();
        let geometry = geometry();
        let calibration = CalibrationConfig::default();
        let mapper = CoordinateMapper::new(&geometry, &keypoints, &calibration);

        let pos = mapper.project(Point2::new(900.0, 600.0), 0.0, 1.88, 2);
        assert_eq!(pos, geometry.keypoint(2));
    }

    #[test]
    fn test_choose_anchor_by_depth() {
        let keypoints = frame_keypoints();
        let geometry = geometry();
        let calibration = CalibrationConfig::default();
        let mapper = CoordinateMapper::new(&geometry, &keypoints, &calibration);

        assert_eq!(mapper.choose_anchor(Point2::new(1200.0, 90.0)), 0);
        assert_eq!(mapper.choose_anchor(Point2::new(0.0, 240.0)), 12);
        assert_eq!(mapper.choose_anchor(Point2::new(640.0, 480.0)), 13);
        assert_eq!(mapper.choose_anchor(Point2::new(640.0, 700.0)), 2);
    }

    #[test]
    fn test_project_tracks_shapes() {
        let keypoints = frame_keypoints();
        let geometry = geometry();
        let calibration = CalibrationConfig::default();
        let mapper = CoordinateMapper::new(&geometry, &keypoints, &calibration);

        let frames: Vec<PlayerFrame> = (0..10)
            .map(|f| {
                let mut frame = PlayerFrame::new();
                frame.insert(1, BoundingBox::new(600.0, 40.0, 640.0, 100.0));
                if f != 4 {
                    frame.insert(2, BoundingBox::new(620.0, 480.0, 680.0, 650.0));
                }
                frame
            })
            .collect();
        let tracks = filter_players(&frames, SelectedPlayers::new(1, 2));
        let ball = vec![BoundingBox::new(630.0, 300.0, 636.0, 306.0); 10];

        let traj = mapper.project_tracks(&tracks, &ball);
        assert_eq!(traj.len(), 10);
        assert!(traj.player(PlayerSlot::One, 4).is_some());
        assert!(traj.player(PlayerSlot::Two, 4).is_none());
        assert!((0..10).all(|f| traj.ball(f).is_some()));
    }

    #[test]
    fn test_ball_without_players_is_absent() {
        let keypoints = frame_keypoints();
        let geometry = geometry();
        let calibration = CalibrationConfig::default();
        let mapper = CoordinateMapper::new(&geometry, &keypoints, &calibration);

        let tracks = filter_players(&[PlayerFrame::new()], SelectedPlayers::new(1, 2));
        let ball = BoundingBox::new(630.0, 300.0, 636.0, 306.0);
        assert!(mapper.project_ball(&tracks, &ball, 0).is_none());
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let keypoints = frame_keypoints();
        let geometry = geometry();
        let calibration = CalibrationConfig::default();
        let mapper = CoordinateMapper::new(&geometry, &keypoints, &calibration);

        let n = PARALLEL_FRAME_THRESHOLD + 40;
        let frames: Vec<PlayerFrame> = (0..n)
            .map(|f| {
                let x = (f % 50) as f64;
                let mut frame = PlayerFrame::new();
                frame.insert(3, BoundingBox::new(500.0 + x, 40.0, 540.0 + x, 100.0 + x / 10.0));
                frame.insert(9, BoundingBox::new(700.0 - x, 480.0, 760.0 - x, 650.0));
                frame
            })
            .collect();
        let tracks = filter_players(&frames, SelectedPlayers::new(3, 9));
        let ball: Vec<BoundingBox> = (0..n)
            .map(|f| BoundingBox::new(600.0, 100.0 + f as f64, 606.0, 106.0 + f as f64))
            .collect();

        let parallel = mapper.project_tracks(&tracks, &ball);
        for f in 0..n {
            assert_eq!(parallel.player(PlayerSlot::One, f), mapper.project_player(&tracks, PlayerSlot::One, f));
            assert_eq!(parallel.ball(f), mapper.project_ball(&tracks, &ball[f], f));
        }
    }
}
