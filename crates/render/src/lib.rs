//! Rendering adapter: chase camera rig plus a renderer-agnostic frame interface.
//!
//! # Invariants
//! - The renderer reads a frame view and never mutates simulation state.
//! - The camera is never teleported during play; it only eases toward its target.
//! - Quality settings reach the renderer only through [`Renderer::apply_quality`].

mod camera;
mod renderer;

pub use camera::{CameraConfig, CameraRig, CameraRigState, CameraTransform, Spring};
pub use renderer::{DebugTextRenderer, FrameView, RenderView, Renderer};

pub fn crate_info() -> &'static str {
    "trailwalk-render v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("render"));
    }
}
