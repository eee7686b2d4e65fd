//! # Mini-Court Geometry
//!
//! Fixed-size schematic court used as the projection target.
//!
//! ## Construction
//! 1. Place the canvas rectangle at a frame corner, `buffer_px` from the edges
//! 2. Shrink by `padding_px` to get the court drawing rectangle
//! 3. Scale = court drawing width / doubles width (px per meter)
//! 4. Lay out the 14 keypoints with the same topology as the detected court
//!
//! Pure function of its inputs: equal inputs give bit-identical geometry.

use super::constants::mini_court::KEYPOINT_COUNT;
use super::conversions::{convert_meters_to_pixel_distance, convert_pixel_distance_to_meters};
use crate::config::{CanvasCorner, CourtDimensions, MiniCourtConfig};
use crate::models::BoundingBox;
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// Court line segments as keypoint index pairs.
///
/// `(10, 11)` appears twice; consumers that index line styles by position
/// rely on the nine-entry layout.
pub const COURT_LINES: [(usize, usize); 9] = [
    (0, 2),
    (4, 5),
    (6, 7),
    (1, 3),
    (0, 1),
    (8, 9),
    (10, 11),
    (10, 11),
    (2, 3),
];

/// Mini-court canvas and keypoints, computed once per video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MiniCourtGeometry {
    frame_width: u32,
    frame_height: u32,
    /// Background rectangle
    canvas: BoundingBox,
    /// Padded court drawing rectangle
    court: BoundingBox,
    keypoints: [Point2<f64>; KEYPOINT_COUNT],
    double_line_width_m: f64,
}

impl MiniCourtGeometry {
    pub fn build(
        frame_width: u32,
        frame_height: u32,
        layout: &MiniCourtConfig,
        dims: &CourtDimensions,
    ) -> Self {
        let canvas = canvas_rect(frame_width as f64, frame_height as f64, layout);
        let court = BoundingBox::new(
            canvas.x1 + layout.padding_px,
            canvas.y1 + layout.padding_px,
            canvas.x2 - layout.padding_px,
            canvas.y2 - layout.padding_px,
        );

        let mut geometry = Self {
            frame_width,
            frame_height,
            canvas,
            court,
            keypoints: [Point2::origin(); KEYPOINT_COUNT],
            double_line_width_m: dims.double_line_width_m,
        };
        geometry.keypoints = geometry.layout_keypoints(dims);

        tracing::debug!(
            frame_width,
            frame_height,
            court_width_px = geometry.court_width_px(),
            "mini-court geometry built"
        );
        geometry
    }

    fn layout_keypoints(&self, dims: &CourtDimensions) -> [Point2<f64>; KEYPOINT_COUNT] {
        let m = |meters: f64| self.meters_to_pixels(meters);
        let alley = m(dims.double_alley_difference_m);
        let no_mans_land = m(dims.no_mans_land_height_m);
        let singles = m(dims.single_line_width_m);

        let p0 = Point2::new(self.court.x1, self.court.y1);
        let p1 = Point2::new(self.court.x2, self.court.y1);
        let p2 = Point2::new(self.court.x1, self.court.y1 + m(dims.half_court_line_height_m * 2.0));
        let p3 = Point2::new(p0.x + self.court_width_px(), p2.y);
        let p4 = Point2::new(p0.x + alley, p0.y);
        let p5 = Point2::new(p2.x + alley, p2.y);
        let p6 = Point2::new(p1.x - alley, p1.y);
        let p7 = Point2::new(p3.x - alley, p3.y);
        let p8 = Point2::new(p4.x, p4.y + no_mans_land);
        let p9 = Point2::new(p8.x + singles, p8.y);
        let p10 = Point2::new(p5.x, p5.y - no_mans_land);
        let p11 = Point2::new(p10.x + singles, p10.y);
        // service-line midpoints snap to whole pixels
        let p12 = Point2::new(((p8.x + p9.x) / 2.0).trunc(), p8.y);
        let p13 = Point2::new(((p10.x + p11.x) / 2.0).trunc(), p10.y);

        [p0, p1, p2, p3, p4, p5, p6, p7, p8, p9, p10, p11, p12, p13]
    }

    /// Meters → mini-court pixels using the global doubles-width scale.
    #[inline]
    pub fn meters_to_pixels(&self, meters: f64) -> f64 {
        convert_meters_to_pixel_distance(meters, self.double_line_width_m, self.court_width_px())
    }

    /// Mini-court pixels → meters using the global doubles-width scale.
    #[inline]
    pub fn pixels_to_meters(&self, pixels: f64) -> f64 {
        convert_pixel_distance_to_meters(pixels, self.double_line_width_m, self.court_width_px())
    }

    /// Width of the court drawing (canvas width minus padding on both sides).
    #[inline]
    pub fn court_width_px(&self) -> f64 {
        self.court.x2 - self.court.x1
    }

    pub fn double_line_width_m(&self) -> f64 {
        self.double_line_width_m
    }

    /// Top-left corner of the court drawing.
    pub fn start_point(&self) -> Point2<f64> {
        Point2::new(self.court.x1, self.court.y1)
    }

    pub fn canvas(&self) -> BoundingBox {
        self.canvas
    }

    pub fn court_rect(&self) -> BoundingBox {
        self.court
    }

    pub fn frame_size(&self) -> (u32, u32) {
        (self.frame_width, self.frame_height)
    }

    #[inline]
    pub fn keypoint(&self, index: usize) -> Point2<f64> {
        self.keypoints[index]
    }

    pub fn keypoints(&self) -> &[Point2<f64>; KEYPOINT_COUNT] {
        &self.keypoints
    }

    pub fn lines(&self) -> &'static [(usize, usize)] {
        &COURT_LINES
    }

    /// Line segments resolved to mini-court points.
    pub fn line_segments(&self) -> Vec<(Point2<f64>, Point2<f64>)> {
        COURT_LINES
            .iter()
            .map(|&(a, b)| (self.keypoints[a], self.keypoints[b]))
            .collect()
    }

    /// Net: horizontal segment halfway between the far and near baselines.
    pub fn net_line(&self) -> (Point2<f64>, Point2<f64>) {
        let y = ((self.keypoints[0].y + self.keypoints[2].y) / 2.0).trunc();
        (Point2::new(self.keypoints[0].x, y), Point2::new(self.keypoints[1].x, y))
    }
}

fn canvas_rect(frame_width: f64, frame_height: f64, layout: &MiniCourtConfig) -> BoundingBox {
    let w = layout.canvas_width_px;
    let h = layout.canvas_height_px;
    let b = layout.buffer_px;

    let (start_x, start_y) = match layout.corner {
        CanvasCorner::TopLeft => (b, b),
        CanvasCorner::TopRight => (frame_width - b - w, b),
        CanvasCorner::BottomLeft => (b, frame_height - b - h),
        CanvasCorner::BottomRight => (frame_width - b - w, frame_height - b - h),
    };
    BoundingBox::new(start_x, start_y, start_x + w, start_y + h)
}
