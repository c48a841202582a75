//! Shared value types: bounding boxes, character pose, per-frame input intent.
//!
//! # Invariants
//! - Every type here is a `Copy` value. Nothing is shared by reference across frames.

mod types;

pub use types::{Aabb, CharacterPose, LookDelta, MotionIntent};
