//! Court and pipeline constants
//!
//! Real-world measurements follow ITF court dimensions. Pixel values describe
//! the mini-court overlay canvas.

// ============================================================
// Real-world court measurements (meters)
// ============================================================
pub mod court {
    /// Singles court width (sideline to sideline)
    pub const SINGLE_LINE_WIDTH_M: f64 = 8.23;

    /// Doubles court width; reference length for the mini-court scale
    pub const DOUBLE_LINE_WIDTH_M: f64 = 10.97;

    /// Baseline to net
    pub const HALF_COURT_LINE_HEIGHT_M: f64 = 11.88;

    /// Doubles alley: doubles sideline to singles sideline
    pub const DOUBLE_ALLEY_DIFFERENCE_M: f64 = 1.37;

    /// Baseline to service line
    pub const NO_MANS_LAND_HEIGHT_M: f64 = 5.48;
}

// ============================================================
// Player reference heights (meters)
// ============================================================
pub mod players {
    pub const PLAYER_1_HEIGHT_M: f64 = 1.88;
    pub const PLAYER_2_HEIGHT_M: f64 = 1.91;
}

// ============================================================
// Mini-court canvas (pixels)
// ============================================================
pub mod mini_court {
    /// Background rectangle width
    pub const CANVAS_WIDTH_PX: f64 = 250.0;

    /// Background rectangle height
    pub const CANVAS_HEIGHT_PX: f64 = 500.0;

    /// Gap between the frame edge and the canvas
    pub const BUFFER_PX: f64 = 50.0;

    /// Gap between the canvas edge and the court drawing
    pub const PADDING_PX: f64 = 20.0;

    /// Number of court keypoints (both in frame and mini-court space)
    pub const KEYPOINT_COUNT: usize = 14;
}

// ============================================================
// Local scale calibration
// ============================================================
pub mod calibration {
    /// Frames looked back when measuring an entity's reference height
    pub const WINDOW_BEFORE_FRAMES: usize = 20;

    /// Frames looked ahead (exclusive) when measuring an entity's reference height
    pub const WINDOW_AFTER_FRAMES: usize = 50;

    /// Anchor candidates: far/near baseline left corners, far/near service-line midpoints
    pub const ANCHOR_KEYPOINTS: [usize; 4] = [0, 2, 12, 13];
}

// ============================================================
// Shot detection
// ============================================================
pub mod shot_detection {
    /// Trailing moving-average window over the ball's vertical midpoint
    pub const ROLLING_WINDOW: usize = 5;

    /// Post-reversal frames that must keep the new direction
    pub const MIN_CHANGE_FRAMES_FOR_HIT: usize = 25;

    /// Frames inspected after a reversal: ceil(25 × 1.2)
    pub const LOOKAHEAD_FRAMES: usize = 30;
}

// ============================================================
// Timing
// ============================================================
pub mod timing {
    /// Broadcast frame rate assumed for all footage (not read from metadata)
    pub const FRAME_RATE_FPS: f64 = 24.0;

    /// m/s → km/h
    pub const MPS_TO_KMH: f64 = 3.6;
}
