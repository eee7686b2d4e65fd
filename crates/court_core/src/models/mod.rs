//! Detection-side data types shared by every stage.

pub mod bbox;
pub mod track;

pub use bbox::BoundingBox;
pub use track::{BallFrame, PlayerFrame, PlayerSlot, TrackId};
