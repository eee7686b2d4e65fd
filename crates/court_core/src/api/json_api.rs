//! JSON request/response wrapper around [`CourtPipeline`].
//!
//! ## Request
//! ```json
//! {
//!   "schema_version": 1,
//!   "config": { "frame_rate_fps": 30.0 },
//!   "frame_width": 1280, "frame_height": 720,
//!   "court_keypoints": [ ... 28 numbers ... ],
//!   "player_detections": [ { "1": [x1, y1, x2, y2], "2": [ ... ] }, ... ],
//!   "ball_detections": [ [x1, y1, x2, y2], null, ... ]
//! }
//! ```

use crate::analysis::{PlayerStatsSnapshot, ShotEvent, ShotRecord};
use crate::config::PipelineConfig;
use crate::models::{BallFrame, PlayerFrame, PlayerSlot, TrackId};
use crate::pipeline::{CourtPipeline, MatchAnalysis, MatchInput};
use chrono::{DateTime, Utc};
use nalgebra::Point2;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Only request layout understood by this build.
pub const SCHEMA_VERSION: u8 = 1;

/// Versioned request: optional config plus the [`MatchInput`] fields at top level.
///
/// The input fields are spelled out rather than flattened: flattening buffers
/// the map and the integer track-id keys of `player_detections` no longer parse.
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct MatchRequest {
    pub schema_version: u8,
    /// Overrides the built-in defaults when present
    #[serde(default)]
    pub config: Option<PipelineConfig>,
    pub frame_width: u32,
    pub frame_height: u32,
    /// 28 numbers `x0, y0, …, x13, y13` detected on the first frame
    pub court_keypoints: Vec<f64>,
    /// Per frame: track id → player box
    pub player_detections: Vec<PlayerFrame>,
    /// Per frame: ball box, `null` when not detected
    pub ball_detections: Vec<BallFrame>,
}

impl MatchRequest {
    pub fn new(input: MatchInput, config: Option<PipelineConfig>) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            config,
            frame_width: input.frame_width,
            frame_height: input.frame_height,
            court_keypoints: input.court_keypoints,
            player_detections: input.player_detections,
            ball_detections: input.ball_detections,
        }
    }

    /// Split into the pipeline config override and the detections.
    pub fn into_parts(self) -> (Option<PipelineConfig>, MatchInput) {
        let input = MatchInput {
            frame_width: self.frame_width,
            frame_height: self.frame_height,
            court_keypoints: self.court_keypoints,
            player_detections: self.player_detections,
            ball_detections: self.ball_detections,
        };
        (self.config, input)
    }
}

/// Mini-court positions of one frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FramePositions {
    pub frame_index: usize,
    pub player_1: Option<[f64; 2]>,
    pub player_2: Option<[f64; 2]>,
    pub ball: Option<[f64; 2]>,
}

/// One row of the per-frame stats table, with derived averages.
///
/// Field names follow the column naming used by the stats CSV export.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatsRow {
    pub frame_num: usize,
    pub player_1_number_of_shots: u32,
    pub player_1_total_shot_speed: f64,
    pub player_1_last_shot_speed: f64,
    pub player_1_total_player_speed: f64,
    pub player_1_last_player_speed: f64,
    pub player_2_number_of_shots: u32,
    pub player_2_total_shot_speed: f64,
    pub player_2_last_shot_speed: f64,
    pub player_2_total_player_speed: f64,
    pub player_2_last_player_speed: f64,
    pub player_1_average_shot_speed: Option<f64>,
    pub player_2_average_shot_speed: Option<f64>,
    pub player_1_average_player_speed: Option<f64>,
    pub player_2_average_player_speed: Option<f64>,
}

impl From<&PlayerStatsSnapshot> for StatsRow {
    fn from(s: &PlayerStatsSnapshot) -> Self {
        let p1 = s.player(PlayerSlot::One);
        let p2 = s.player(PlayerSlot::Two);
        Self {
            frame_num: s.frame_index,
            player_1_number_of_shots: p1.shot_count,
            player_1_total_shot_speed: p1.total_shot_speed_kmh,
            player_1_last_shot_speed: p1.last_shot_speed_kmh,
            player_1_total_player_speed: p1.total_movement_speed_kmh,
            player_1_last_player_speed: p1.last_movement_speed_kmh,
            player_2_number_of_shots: p2.shot_count,
            player_2_total_shot_speed: p2.total_shot_speed_kmh,
            player_2_last_shot_speed: p2.last_shot_speed_kmh,
            player_2_total_player_speed: p2.total_movement_speed_kmh,
            player_2_last_player_speed: p2.last_movement_speed_kmh,
            player_1_average_shot_speed: s.avg_shot_speed(PlayerSlot::One),
            player_2_average_shot_speed: s.avg_shot_speed(PlayerSlot::Two),
            player_1_average_player_speed: s.avg_movement_speed(PlayerSlot::One),
            player_2_average_player_speed: s.avg_movement_speed(PlayerSlot::Two),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchResponse {
    pub schema_version: u8,
    pub engine_version: String,
    pub generated_at: DateTime<Utc>,
    pub frame_count: usize,
    pub selected_players: [TrackId; 2],
    pub shot_frames: Vec<usize>,
    pub shot_events: Vec<ShotEvent>,
    pub shots: Vec<ShotRecord>,
    pub positions: Vec<FramePositions>,
    pub stats: Vec<StatsRow>,
}

impl MatchResponse {
    pub fn from_analysis(analysis: &MatchAnalysis) -> Self {
        let xy = |p: Option<Point2<f64>>| p.map(|p| [p.x, p.y]);
        let trajectories = &analysis.trajectories;
        let positions = (0..trajectories.len())
            .map(|frame_index| FramePositions {
                frame_index,
                player_1: xy(trajectories.player(PlayerSlot::One, frame_index)),
                player_2: xy(trajectories.player(PlayerSlot::Two, frame_index)),
                ball: xy(trajectories.ball(frame_index)),
            })
            .collect();

        Self {
            schema_version: SCHEMA_VERSION,
            engine_version: crate::VERSION.to_string(),
            generated_at: Utc::now(),
            frame_count: analysis.frame_count(),
            selected_players: analysis.selected.ids(),
            shot_frames: analysis.shot_frames.clone(),
            shot_events: analysis.stats.shot_events.clone(),
            shots: analysis.stats.shots.clone(),
            positions,
            stats: analysis.stats.table.iter().map(StatsRow::from).collect(),
        }
    }
}

/// Parse a request, run the pipeline, return the response JSON.
pub fn analyze_match_json(request_json: &str) -> Result<String, String> {
    let request: MatchRequest =
        serde_json::from_str(request_json).map_err(|e| format!("Invalid JSON request: {}", e))?;

    if request.schema_version != SCHEMA_VERSION {
        return Err(format!("Unsupported schema version: {}", request.schema_version));
    }

    let (config, input) = request.into_parts();
    let config = match config {
        Some(config) => config.validated().map_err(|e| e.to_string())?,
        None => PipelineConfig::default(),
    };

    let analysis = CourtPipeline::new(config)
        .run(&input)
        .map_err(|e| format!("Analysis failed: {}", e))?;

    serde_json::to_string(&MatchResponse::from_analysis(&analysis))
        .map_err(|e| format!("Failed to serialize response: {}", e))
}

/// JSON schema of [`MatchRequest`].
pub fn input_schema_json() -> Result<String, String> {
    let schema = schemars::schema_for!(MatchRequest);
    serde_json::to_string_pretty(&schema).map_err(|e| format!("Failed to serialize schema: {}", e))
}
