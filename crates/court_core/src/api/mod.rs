//! # JSON API
//!
//! String-in/string-out entry points for non-Rust callers.

pub mod json_api;

pub use json_api::{
    analyze_match_json, input_schema_json, FramePositions, MatchRequest, MatchResponse, StatsRow,
};
