use glam::{Mat4, Vec3};
use trailwalk_anim::BlendWeights;
use trailwalk_common::CharacterPose;
use trailwalk_quality::{QualitySettings, QualityTier};

use crate::camera::CameraTransform;

/// Camera/view configuration for rendering.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderView {
    /// Camera position in world space.
    pub eye: Vec3,
    /// Point the camera is looking at.
    pub target: Vec3,
    pub up: Vec3,
    /// Field of view in degrees.
    pub fov_degrees: f32,
}

impl Default for RenderView {
    fn default() -> Self {
        Self {
            eye: Vec3::new(0.0, 10.0, 10.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
            fov_degrees: 60.0,
        }
    }
}

impl RenderView {
    /// Main perspective view from the chase camera.
    pub fn from_camera(camera: &CameraTransform, fov_degrees: f32) -> Self {
        Self {
            eye: camera.eye,
            target: camera.target,
            up: Vec3::Y,
            fov_degrees,
        }
    }

    /// Top-down map view centred on the character's ground position.
    /// Screen-up is world -Z so north stays at the top of the map.
    pub fn minimap(pose: &CharacterPose, height: f32) -> Self {
        let xz = pose.ground_marker();
        Self {
            eye: Vec3::new(xz.x, height, xz.y),
            target: Vec3::new(xz.x, 0.0, xz.y),
            up: Vec3::NEG_Z,
            fov_degrees: 0.0,
        }
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }
}

/// Everything a renderer needs to draw one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameView {
    pub pose: CharacterPose,
    pub view: RenderView,
    pub minimap: RenderView,
    pub blend: BlendWeights,
}

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// The renderer reads a frame view and produces output. Quality settings are
/// pushed in separately whenever the tier changes.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame.
    fn render(&self, frame: &FrameView) -> Self::Output;

    /// Apply tier-specific settings (pixel ratio, shadows, decorations).
    fn apply_quality(&mut self, settings: &QualitySettings);
}

/// Produces a human-readable description of each frame.
///
/// Useful for CLI output, logging, and testing the render interface.
#[derive(Debug)]
pub struct DebugTextRenderer {
    settings: QualitySettings,
}

impl Default for DebugTextRenderer {
    fn default() -> Self {
        Self {
            settings: QualityTier::High.settings(),
        }
    }
}

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn settings(&self) -> &QualitySettings {
        &self.settings
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, frame: &FrameView) -> String {
        let p = frame.pose.position;
        let v = frame.view;
        let mut out = String::new();
        out.push_str(&format!(
            "Character: pos=({:.2}, {:.2}, {:.2}) yaw={:.2}\n",
            p.x, p.y, p.z, frame.pose.facing_yaw
        ));
        out.push_str(&format!(
            "Camera: eye=({:.1}, {:.1}, {:.1}) target=({:.1}, {:.1}, {:.1}) fov={:.0}\n",
            v.eye.x, v.eye.y, v.eye.z, v.target.x, v.target.y, v.target.z, v.fov_degrees
        ));

        let (state, weight) = frame.blend.current;
        out.push_str(&format!("Animation: {} {:.2}", state.clip_name(), weight));
        if let Some((prev, prev_weight)) = frame.blend.previous {
            out.push_str(&format!(" (fading {} {:.2})", prev.clip_name(), prev_weight));
        }
        out.push('\n');

        let s = &self.settings;
        out.push_str(&format!(
            "Quality: pixel_ratio<={:.1} shadows={} cascades={} decor={:.2}\n",
            s.pixel_ratio_cap,
            if s.shadows { "on" } else { "off" },
            s.shadow_cascades,
            s.decorative_density
        ));
        let m = frame.minimap.eye;
        out.push_str(&format!("Minimap: center=({:.1}, {:.1})\n", m.x, m.z));
        out
    }

    fn apply_quality(&mut self, settings: &QualitySettings) {
        tracing::debug!(?settings, "debug renderer quality applied");
        self.settings = *settings;
    }
}
