//! Adaptive quality: steps rendering fidelity up or down against a measured frame rate.
//!
//! # Invariants
//! - At most one tier step per evaluation tick.
//! - Once the mean frame rate lands in the lock band, the tier never changes again.
//! - The fps window never exceeds its capacity; the oldest sample is evicted first.
//!
//! Settings are pushed to the renderer; the controller itself holds no renderer state.

mod controller;
mod tier;
mod window;

pub use controller::{QualityChange, QualityConfig, QualityController, QualityError};
pub use tier::{QualitySettings, QualityTier};
pub use window::FpsWindow;
