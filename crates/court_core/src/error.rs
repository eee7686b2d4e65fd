use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Frame sequence is empty")]
    EmptyFrameSequence,

    #[error("Insufficient player detections in first frame: expected at least 2, found {found}")]
    InsufficientDetections { found: usize },

    #[error("Ball was never detected in {frames} frames")]
    NoBallDetections { frames: usize },

    #[error("Invalid court keypoints: expected {expected} values, found {found}")]
    InvalidKeypoints { expected: usize, found: usize },

    #[error("Frame count mismatch: {players} player frames, {balls} ball frames")]
    FrameCountMismatch { players: usize, balls: usize },

    #[error("Trajectory length mismatch: expected {expected} frames, found {found}")]
    TrajectoryLengthMismatch { expected: usize, found: usize },

    #[error("Shot frame {frame} is outside of {frame_count} frames")]
    ShotFrameOutOfRange { frame: usize, frame_count: usize },

    #[error("Shot frames must be strictly increasing: {frame} follows {previous}")]
    UnorderedShotFrames { previous: usize, frame: usize },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PipelineError {
    /// Whether re-running with different input or configuration could succeed.
    ///
    /// Detection-shaped failures are properties of the recorded footage and
    /// stay fatal for that footage.
    pub fn is_recoverable(&self) -> bool {
        match self {
            PipelineError::Io(_) => true,
            PipelineError::InvalidConfig(_) => true,
            PipelineError::Yaml(_) => true,
            PipelineError::Serialization(_) => true,
            PipelineError::EmptyFrameSequence => false,
            PipelineError::InsufficientDetections { .. } => false,
            PipelineError::NoBallDetections { .. } => false,
            _ => false,
        }
    }
}

impl From<validator::ValidationErrors> for PipelineError {
    fn from(err: validator::ValidationErrors) -> Self {
        PipelineError::InvalidConfig(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;
