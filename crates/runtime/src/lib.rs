//! Runtime: one exploration session driven frame by frame.
//!
//! # Invariants
//! - Each frame runs input, camera look, character step, animation, camera follow and quality
//!   sampling in that order, exactly once.
//! - Colliders, terrain and clips are optional and may arrive after the session starts.
//! - A frame never fails; configuration loading is the only fallible entry point.

mod config;
mod session;

pub use config::{ConfigError, SimConfig};
pub use session::{FrameOutput, Session};

pub fn crate_info() -> &'static str {
    "trailwalk-runtime v0.1.0"
}
