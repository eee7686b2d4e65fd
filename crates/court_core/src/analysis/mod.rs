//! # Analysis Module
//!
//! Event detection and per-player statistics.
//!
//! - `shot_detector` - racket contacts from the ball's vertical motion
//! - `stat_aggregator` - shot/movement speeds and the per-frame stats table

pub mod shot_detector;
pub mod stat_aggregator;

pub use shot_detector::{detect_shots, first_difference, rolling_mean, ShotDetector};
pub use stat_aggregator::{
    MatchStats, PlayerStats, PlayerStatsSnapshot, ShotEvent, ShotRecord, StatAggregator,
    StatsTable,
};
