//! # Pipeline Configuration
//!
//! All tuning values of the projection and event pipeline in one place.
//! Defaults reproduce the constants in [`crate::court::constants`].
//!
//! ## Usage
//! ```rust
//! use court_core::config::PipelineConfig;
//!
//! let config = PipelineConfig::default();
//! assert_eq!(config.frame_rate_fps, 24.0);
//! ```
//!
//! ## Environment Variables
//!
//! - `COURT_CONFIG_PATH`: YAML/JSON file loaded by [`PipelineConfig::from_env_or_default`]

use crate::court::constants::{calibration, court, mini_court, players, shot_detection, timing};
use crate::error::{PipelineError, Result};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use validator::{Validate, ValidationError};

/// Environment variable naming a configuration file.
pub const CONFIG_PATH_ENV: &str = "COURT_CONFIG_PATH";

/// Full pipeline configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, JsonSchema)]
#[serde(default)]
pub struct PipelineConfig {
    /// Real-world court measurements
    #[validate]
    pub court: CourtDimensions,
    /// Mini-court canvas layout
    #[validate]
    pub mini_court: MiniCourtConfig,
    /// Local scale calibration
    #[validate]
    pub calibration: CalibrationConfig,
    /// Shot event detection
    #[validate]
    pub shot_detection: ShotDetectionConfig,
    /// Footage frame rate (not read from video metadata)
    #[validate(range(min = 0.001))]
    pub frame_rate_fps: f64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            court: CourtDimensions::default(),
            mini_court: MiniCourtConfig::default(),
            calibration: CalibrationConfig::default(),
            shot_detection: ShotDetectionConfig::default(),
            frame_rate_fps: timing::FRAME_RATE_FPS,
        }
    }
}

impl PipelineConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: PipelineConfig = serde_yaml::from_str(yaml)?;
        config.validated()
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: PipelineConfig = serde_json::from_str(json)?;
        config.validated()
    }

    /// Load from a `.json` file, anything else is parsed as YAML.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("json"))
            .unwrap_or(false);
        if is_json {
            Self::from_json_str(&text)
        } else {
            Self::from_yaml_str(&text)
        }
    }

    /// Load the file named by `COURT_CONFIG_PATH`, or fall back to defaults.
    pub fn from_env_or_default() -> Result<Self> {
        match env::var(CONFIG_PATH_ENV) {
            Ok(path) if !path.trim().is_empty() => {
                tracing::info!(path = %path, "loading pipeline config from environment");
                Self::load(Path::new(path.trim()))
            }
            _ => Ok(Self::default()),
        }
    }

    /// Run field validation, returning the config on success.
    pub fn validated(self) -> Result<Self> {
        self.validate().map_err(PipelineError::from)?;
        Ok(self)
    }
}

/// Real-world court measurements in meters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, JsonSchema)]
#[serde(default)]
pub struct CourtDimensions {
    #[validate(range(min = 0.001))]
    pub double_line_width_m: f64,
    #[validate(range(min = 0.001))]
    pub single_line_width_m: f64,
    #[validate(range(min = 0.001))]
    pub half_court_line_height_m: f64,
    #[validate(range(min = 0.0))]
    pub double_alley_difference_m: f64,
    #[validate(range(min = 0.0))]
    pub no_mans_land_height_m: f64,
}

impl Default for CourtDimensions {
    fn default() -> Self {
        Self {
            double_line_width_m: court::DOUBLE_LINE_WIDTH_M,
            single_line_width_m: court::SINGLE_LINE_WIDTH_M,
            half_court_line_height_m: court::HALF_COURT_LINE_HEIGHT_M,
            double_alley_difference_m: court::DOUBLE_ALLEY_DIFFERENCE_M,
            no_mans_land_height_m: court::NO_MANS_LAND_HEIGHT_M,
        }
    }
}

/// Frame corner the mini-court canvas is anchored to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum CanvasCorner {
    TopLeft,
    #[default]
    TopRight,
    BottomLeft,
    BottomRight,
}

/// Mini-court canvas layout in pixels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, JsonSchema)]
#[serde(default)]
pub struct MiniCourtConfig {
    #[validate(range(min = 1.0))]
    pub canvas_width_px: f64,
    #[validate(range(min = 1.0))]
    pub canvas_height_px: f64,
    #[validate(range(min = 0.0))]
    pub buffer_px: f64,
    #[validate(range(min = 0.0))]
    pub padding_px: f64,
    pub corner: CanvasCorner,
}

impl Default for MiniCourtConfig {
    fn default() -> Self {
        Self {
            canvas_width_px: mini_court::CANVAS_WIDTH_PX,
            canvas_height_px: mini_court::CANVAS_HEIGHT_PX,
            buffer_px: mini_court::BUFFER_PX,
            padding_px: mini_court::PADDING_PX,
            corner: CanvasCorner::TopRight,
        }
    }
}

/// Local (per-object, per-window) scale calibration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, JsonSchema)]
#[serde(default)]
#[validate(schema(function = "validate_calibration"))]
pub struct CalibrationConfig {
    /// Frames before the current one included in the height window
    pub window_before_frames: usize,
    /// Frames after the current one, exclusive upper bound
    #[validate(range(min = 1))]
    pub window_after_frames: usize,
    /// Keypoint indices allowed as projection anchors
    pub anchor_keypoints: Vec<usize>,
    /// Real-world height of player 1 and player 2 in meters
    pub player_heights_m: [f64; 2],
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            window_before_frames: calibration::WINDOW_BEFORE_FRAMES,
            window_after_frames: calibration::WINDOW_AFTER_FRAMES,
            anchor_keypoints: calibration::ANCHOR_KEYPOINTS.to_vec(),
            player_heights_m: [players::PLAYER_1_HEIGHT_M, players::PLAYER_2_HEIGHT_M],
        }
    }
}

fn validate_calibration(cfg: &CalibrationConfig) -> std::result::Result<(), ValidationError> {
    if cfg.anchor_keypoints.is_empty() {
        return Err(ValidationError::new("anchor_keypoints_empty"));
    }
    if cfg.anchor_keypoints.iter().any(|&i| i >= mini_court::KEYPOINT_COUNT) {
        return Err(ValidationError::new("anchor_keypoint_out_of_range"));
    }
    if cfg.player_heights_m.iter().any(|&h| h.is_nan() || h <= 0.0) {
        return Err(ValidationError::new("player_height_not_positive"));
    }
    Ok(())
}

/// Shot event detection thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, JsonSchema)]
#[serde(default)]
#[validate(schema(function = "validate_shot_detection"))]
pub struct ShotDetectionConfig {
    /// Trailing moving-average window
    #[validate(range(min = 1))]
    pub rolling_window: usize,
    /// Post-reversal frames that must keep the new direction
    #[validate(range(min = 1))]
    pub min_change_frames: usize,
    /// Frames inspected after a reversal
    pub lookahead_frames: usize,
}

impl Default for ShotDetectionConfig {
    fn default() -> Self {
        Self {
            rolling_window: shot_detection::ROLLING_WINDOW,
            min_change_frames: shot_detection::MIN_CHANGE_FRAMES_FOR_HIT,
            lookahead_frames: shot_detection::LOOKAHEAD_FRAMES,
        }
    }
}

impl ShotDetectionConfig {
    /// Threshold with the standard lookahead of `ceil(1.2 × min_change_frames)`.
    pub fn with_min_change_frames(min_change_frames: usize) -> Self {
        Self {
            min_change_frames,
            lookahead_frames: (min_change_frames * 6).div_ceil(5),
            ..Self::default()
        }
    }
}

fn validate_shot_detection(cfg: &ShotDetectionConfig) -> std::result::Result<(), ValidationError> {
    if cfg.lookahead_frames < cfg.min_change_frames {
        return Err(ValidationError::new("lookahead_shorter_than_min_change"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let cfg = PipelineConfig::default();
        assert!((cfg.frame_rate_fps - 24.0).abs() < f64::EPSILON);
        assert!((cfg.court.double_line_width_m - 10.97).abs() < f64::EPSILON);
        assert_eq!(cfg.calibration.anchor_keypoints, vec![0, 2, 12, 13]);
        assert_eq!(cfg.shot_detection.lookahead_frames, 30);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_standard_lookahead() {
        assert_eq!(ShotDetectionConfig::with_min_change_frames(25).lookahead_frames, 30);
        assert_eq!(ShotDetectionConfig::with_min_change_frames(10).lookahead_frames, 12);
        assert_eq!(ShotDetectionConfig::with_min_change_frames(11).lookahead_frames, 14);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let yaml = "frame_rate_fps: 30.0\nshot_detection:\n  min_change_frames: 20\n";
        let cfg = PipelineConfig::from_yaml_str(yaml).unwrap();
        assert!((cfg.frame_rate_fps - 30.0).abs() < f64::EPSILON);
        assert_eq!(cfg.shot_detection.min_change_frames, 20);
        assert_eq!(cfg.shot_detection.lookahead_frames, 30);
        assert_eq!(cfg.mini_court, MiniCourtConfig::default());
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = PipelineConfig::from_yaml_str("frame_rate_fps: 0.0\n").unwrap_err();
        assert!(matches!(err, PipelineError::InvalidConfig(_)));

        let yaml = "shot_detection:\n  min_change_frames: 40\n  lookahead_frames: 30\n";
        assert!(PipelineConfig::from_yaml_str(yaml).is_err());

        let yaml = "calibration:\n  anchor_keypoints: [0, 14]\n";
        assert!(PipelineConfig::from_yaml_str(yaml).is_err());
    }

    #[test]
    fn test_canvas_corner_serde() {
        let yaml = "mini_court:\n  corner: bottom_left\n";
        let cfg = PipelineConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(cfg.mini_court.corner, CanvasCorner::BottomLeft);
    }

    #[test]
    fn test_load_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"frame_rate_fps": 50.0}"#).unwrap();
        let cfg = PipelineConfig::load(&path).unwrap();
        assert!((cfg.frame_rate_fps - 50.0).abs() < f64::EPSILON);
    }
}
