//! # Ball Interpolator
//!
//! Fills frames where the ball detector found nothing.
//!
//! Each box coordinate is an independent time series:
//! - interior gaps: linear interpolation between the nearest known samples
//! - trailing gap: last known value carried forward
//! - leading gap: first known value carried backward

use crate::error::{PipelineError, Result};
use crate::models::{BallFrame, BoundingBox};

/// Fill every missing ball box.
///
/// Fails with `NoBallDetections` when no frame has a ball.
pub fn interpolate_ball_positions(ball_frames: &[BallFrame]) -> Result<Vec<BoundingBox>> {
    if ball_frames.is_empty() {
        return Err(PipelineError::EmptyFrameSequence);
    }

    let detected = ball_frames.iter().filter(|b| b.is_some()).count();
    if detected == 0 {
        return Err(PipelineError::NoBallDetections { frames: ball_frames.len() });
    }

    let channel = |pick: fn(&BoundingBox) -> f64| -> Vec<f64> {
        let series: Vec<Option<f64>> = ball_frames.iter().map(|b| b.as_ref().map(pick)).collect();
        fill_series(&series)
    };
    let x1 = channel(|b| b.x1);
    let y1 = channel(|b| b.y1);
    let x2 = channel(|b| b.x2);
    let y2 = channel(|b| b.y2);

    tracing::debug!(
        frames = ball_frames.len(),
        detected,
        filled = ball_frames.len() - detected,
        "ball positions interpolated"
    );

    Ok((0..ball_frames.len())
        .map(|i| BoundingBox::new(x1[i], y1[i], x2[i], y2[i]))
        .collect())
}

/// Linear fill of one scalar series with at least one known sample.
///
/// Known samples are returned unchanged.
pub fn fill_series(series: &[Option<f64>]) -> Vec<f64> {
    let mut out = Vec::with_capacity(series.len());
    let mut prev: Option<(usize, f64)> = None;
    let mut next_idx = 0usize;

    for (i, value) in series.iter().enumerate() {
        if let Some(v) = *value {
            prev = Some((i, v));
            out.push(v);
            continue;
        }

        if next_idx <= i {
            next_idx = series[i..]
                .iter()
                .position(Option::is_some)
                .map(|offset| i + offset)
                .unwrap_or(series.len());
        }
        let next = series.get(next_idx).copied().flatten().map(|v| (next_idx, v));

        let filled = match (prev, next) {
            (Some((i0, v0)), Some((i1, v1))) => {
                let t = (i - i0) as f64 / (i1 - i0) as f64;
                v0 + (v1 - v0) * t
            }
            (Some((_, v0)), None) => v0,
            (None, Some((_, v1))) => v1,
            (None, None) => f64::NAN,
        };
        out.push(filled);
    }
    out
}
