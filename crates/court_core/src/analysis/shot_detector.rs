//! # Shot Event Detector
//!
//! Finds racket contacts from the ball's vertical motion in the frame.
//!
//! ## Algorithm
//! 1. `mid_y` of every (interpolated) ball box
//! 2. Trailing moving average, window 5, partial at the start
//! 3. First difference `delta(t)`; undefined at t = 0
//! 4. Reversal at `i`: `delta(i)` and `delta(i + 1)` have strictly opposite signs
//! 5. Confirmed when at least 25 of `delta(i+1 ..= i+30)` keep the post-reversal sign
//!
//! Only persistence of the *new* direction is counted. A reversal whose
//! new direction holds for 25 frames confirms even if the window also
//! contains frames moving the old way.

use crate::config::ShotDetectionConfig;
use crate::models::BoundingBox;

/// Vertical direction of the smoothed ball trajectory between two frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Up,
    Down,
}

impl Direction {
    /// Strict sign; zero and undefined deltas have no direction.
    #[inline]
    fn of(delta: Option<f64>) -> Option<Direction> {
        match delta {
            Some(d) if d > 0.0 => Some(Direction::Down),
            Some(d) if d < 0.0 => Some(Direction::Up),
            _ => None,
        }
    }
}

/// Trailing mean over at most `window` samples ending at each index.
pub fn rolling_mean(values: &[f64], window: usize) -> Vec<f64> {
    let window = window.max(1);
    (0..values.len())
        .map(|t| {
            let start = (t + 1).saturating_sub(window);
            let slice = &values[start..=t];
            slice.iter().sum::<f64>() / slice.len() as f64
        })
        .collect()
}

/// `out[t] = values[t] - values[t - 1]`, `None` at t = 0.
pub fn first_difference(values: &[f64]) -> Vec<Option<f64>> {
    (0..values.len())
        .map(|t| if t == 0 { None } else { Some(values[t] - values[t - 1]) })
        .collect()
}

/// Stateless detector over an interpolated ball trajectory.
#[derive(Debug, Clone, Default)]
pub struct ShotDetector {
    config: ShotDetectionConfig,
}

impl ShotDetector {
    pub fn new(config: ShotDetectionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ShotDetectionConfig {
        &self.config
    }

    /// Smoothed per-frame vertical change of the ball.
    pub fn vertical_deltas(&self, ball: &[BoundingBox]) -> Vec<Option<f64>> {
        let mid_y: Vec<f64> = ball.iter().map(BoundingBox::mid_y).collect();
        let smoothed = rolling_mean(&mid_y, self.config.rolling_window);
        first_difference(&smoothed)
    }

    /// Frame indices of confirmed shots, strictly increasing.
    pub fn detect(&self, ball: &[BoundingBox]) -> Vec<usize> {
        let deltas = self.vertical_deltas(ball);
        let directions: Vec<Option<Direction>> = deltas.iter().map(|d| Direction::of(*d)).collect();

        let lookahead = self.config.lookahead_frames;
        let required = self.config.min_change_frames;
        let last_candidate = directions.len().saturating_sub(lookahead);

        let mut shots = Vec::new();
        for i in 1..last_candidate {
            let (Some(before), Some(after)) = (directions[i], directions[i + 1]) else {
                continue;
            };
            if before == after {
                continue;
            }

            let persisted = directions[i + 1..=i + lookahead]
                .iter()
                .filter(|d| **d == Some(after))
                .count();
            if persisted >= required {
                shots.push(i);
            }
        }

        tracing::info!(frames = ball.len(), shots = shots.len(), "shot detection finished");
        shots
    }
}

/// Detect shots with the given thresholds.
pub fn detect_shots(ball: &[BoundingBox], config: &ShotDetectionConfig) -> Vec<usize> {
    ShotDetector::new(config.clone()).detect(ball)
}
