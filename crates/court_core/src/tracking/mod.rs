//! # Tracking Module
//!
//! Cleans the external tracker's output before projection.
//!
//! - `player_selector` - two persistent player identities from frame 0
//! - `ball_interpolator` - gap filling for ball detections

pub mod ball_interpolator;
pub mod player_selector;

pub use ball_interpolator::{fill_series, interpolate_ball_positions};
pub use player_selector::{
    choose_and_filter_players, filter_players, select_two_players, PlayerTracks, SelectedPlayers,
};
