//! # Court Module
//!
//! Everything tied to the physical court: real-world constants, the detected
//! keypoint set, and the mini-court target geometry.
//!
//! - `constants` - ITF measurements, canvas defaults, detector thresholds
//! - `conversions` - pixel/meter scale helpers
//! - `keypoints` - 14 named keypoints in original-frame pixels
//! - `geometry` - mini-court canvas, keypoints and line topology

pub mod constants;
pub mod conversions;
pub mod geometry;
pub mod keypoints;

pub use conversions::{
    convert_meters_to_pixel_distance, convert_pixel_distance_to_meters, measure_distance,
    speed_kmh,
};
pub use geometry::{MiniCourtGeometry, COURT_LINES};
pub use keypoints::{CourtKeypoint, CourtKeypoints};
