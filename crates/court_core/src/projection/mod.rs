//! # Projection Module
//!
//! Original-frame pixels → mini-court pixels.
//!
//! - `local_scale` - per-entity reference height over a temporal window
//! - `mapper` - anchor choice and offset projection for players and ball

pub mod local_scale;
pub mod mapper;

pub use local_scale::{calibration_window, local_reference_height, max_height_in_window};
pub use mapper::{CoordinateMapper, MiniCourtTrajectories};
