//! Simulation kernel: the authoritative character pose and the static world it moves through.
//!
//! # Invariants
//! - The character pose is mutated once per step and only through [`CharacterController::step`].
//! - Colliders and terrain are read-only during a step.
//! - A step never fails: a rejected move, a missing surface or a missed ray keeps the last
//!   valid position.

pub mod character;
pub mod collision;
pub mod terrain;

pub use character::{CharacterConfig, CharacterController, MotionState, StepOutcome, camera_basis};
pub use collision::{ColliderBox, ColliderError, ColliderSet, ColliderSetBuilder};
pub use terrain::{GroundPlane, TerrainError, TerrainSampler, TerrainSurface, TriangleMesh};
