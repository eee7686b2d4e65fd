//! # court_core - Court-Relative Tennis Kinematics
//!
//! Turns per-frame player/ball detections and one set of court keypoints
//! from broadcast tennis footage into positions on a schematic mini-court,
//! shot events, and per-player speed statistics.
//!
//! ## Features
//! - Perspective-aware projection without a homography (local player-height scale)
//! - Ball gap filling and shot detection from vertical motion reversals
//! - Per-frame cumulative stats table with shot and movement speeds
//! - JSON API and JSON schema for non-Rust callers
//!
//! Deterministic: equal input and configuration give equal output.

// Doc formatting lints - purely cosmetic
#![allow(clippy::doc_lazy_continuation)]
// Loop style - index loops mirror the frame-index formulas
#![allow(clippy::needless_range_loop)]

pub mod analysis;
pub mod api;
pub mod config;
pub mod court;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod projection;
pub mod tracking;

// Re-export main API functions
pub use api::{analyze_match_json, input_schema_json, MatchRequest, MatchResponse, StatsRow};
pub use error::{PipelineError, Result};

pub use analysis::{
    detect_shots, MatchStats, PlayerStats, PlayerStatsSnapshot, ShotDetector, ShotEvent,
    ShotRecord, StatAggregator, StatsTable,
};
pub use config::PipelineConfig;
pub use court::{CourtKeypoint, CourtKeypoints, MiniCourtGeometry};
pub use models::{BallFrame, BoundingBox, PlayerFrame, PlayerSlot, TrackId};
pub use pipeline::{CourtPipeline, MatchAnalysis, MatchInput};
pub use projection::{CoordinateMapper, MiniCourtTrajectories};
pub use tracking::{
    choose_and_filter_players, interpolate_ball_positions, select_two_players, PlayerTracks,
    SelectedPlayers,
};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub use api::json_api::SCHEMA_VERSION;
