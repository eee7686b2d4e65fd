//! # Court Pipeline
//!
//! Runs every stage on one recorded rally or match.
//!
//! ## Stages
//! 1. Keypoints from the first frame, mini-court geometry (once)
//! 2. Player selection and filtering
//! 3. Ball gap filling
//! 4. Projection of players and ball onto the mini-court
//! 5. Shot detection on the ball's pixel trajectory
//! 6. Stat aggregation
//!
//! The pipeline owns no global state; each `run` is independent.

use crate::analysis::{MatchStats, ShotDetector, StatAggregator};
use crate::config::PipelineConfig;
use crate::court::{CourtKeypoints, MiniCourtGeometry};
use crate::error::{PipelineError, Result};
use crate::models::{BallFrame, BoundingBox, PlayerFrame};
use crate::projection::{CoordinateMapper, MiniCourtTrajectories};
use crate::tracking::{choose_and_filter_players, interpolate_ball_positions, SelectedPlayers};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Detector and tracker output for one video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct MatchInput {
    pub frame_width: u32,
    pub frame_height: u32,
    /// 28 numbers `x0, y0, …, x13, y13` detected on the first frame
    pub court_keypoints: Vec<f64>,
    /// Per frame: track id → player box
    pub player_detections: Vec<PlayerFrame>,
    /// Per frame: ball box, `null` when not detected
    pub ball_detections: Vec<BallFrame>,
}

impl MatchInput {
    pub fn frame_count(&self) -> usize {
        self.player_detections.len()
    }
}

/// Result of a full pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchAnalysis {
    pub geometry: MiniCourtGeometry,
    pub selected: SelectedPlayers,
    /// Ball boxes after gap filling, original-frame pixels
    pub ball_pixels: Vec<BoundingBox>,
    pub trajectories: MiniCourtTrajectories,
    pub shot_frames: Vec<usize>,
    pub stats: MatchStats,
}

impl MatchAnalysis {
    pub fn frame_count(&self) -> usize {
        self.trajectories.len()
    }
}

#[derive(Debug, Clone, Default)]
pub struct CourtPipeline {
    config: PipelineConfig,
}

impl CourtPipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn run(&self, input: &MatchInput) -> Result<MatchAnalysis> {
        let frame_count = input.frame_count();
        let _run = tracing::info_span!("court_pipeline", frame_count).entered();

        if frame_count == 0 {
            return Err(PipelineError::EmptyFrameSequence);
        }
        if input.ball_detections.len() != frame_count {
            return Err(PipelineError::FrameCountMismatch {
                players: frame_count,
                balls: input.ball_detections.len(),
            });
        }

        let keypoints = CourtKeypoints::from_flat(&input.court_keypoints)?;
        let geometry = MiniCourtGeometry::build(
            input.frame_width,
            input.frame_height,
            &self.config.mini_court,
            &self.config.court,
        );

        let tracks = {
            let _stage = tracing::debug_span!("select_players").entered();
            choose_and_filter_players(&input.player_detections, &keypoints)?
        };

        let ball_pixels = {
            let _stage = tracing::debug_span!("interpolate_ball").entered();
            interpolate_ball_positions(&input.ball_detections)?
        };

        let trajectories = {
            let _stage = tracing::debug_span!("project").entered();
            CoordinateMapper::new(&geometry, &keypoints, &self.config.calibration)
                .project_tracks(&tracks, &ball_pixels)
        };

        let shot_frames = {
            let _stage = tracing::debug_span!("detect_shots").entered();
            ShotDetector::new(self.config.shot_detection.clone()).detect(&ball_pixels)
        };

        let stats = {
            let _stage = tracing::debug_span!("aggregate").entered();
            StatAggregator::new(&geometry, self.config.frame_rate_fps).aggregate(
                &shot_frames,
                &trajectories,
                tracks.selected(),
            )?
        };

        tracing::info!(
            frame_count,
            shots = shot_frames.len(),
            intervals = stats.shots.len(),
            "match analysed"
        );

        Ok(MatchAnalysis {
            geometry,
            selected: tracks.selected(),
            ball_pixels,
            trajectories,
            shot_frames,
            stats,
        })
    }
}
