//! Locomotion animation: maps character motion to a clip and cross-fades between clips.
//!
//! # Invariants
//! - Exactly one state is current; a previous state exists only during a cross-fade.
//! - At most one cross-fade is in flight. A new target mid-fade retargets it.
//! - A target whose clip has not loaded yet is ignored and the current state holds.

mod clips;
mod machine;

pub use clips::{AnimationState, ClipBinding, ClipLibrary, target_for};
pub use machine::{AnimationCommand, AnimationConfig, AnimationStateMachine, BlendWeights};
