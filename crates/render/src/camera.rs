use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Sub};
use trailwalk_common::{CharacterPose, LookDelta};

/// Velocity-based follow filter.
///
/// Each step: `velocity += (target - current) * damping * dt`, then
/// `velocity *= decay`, then `current += velocity`. Tolerates variable frame
/// time as long as `damping * dt` stays well below `2 * (1 + decay)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Spring {
    pub damping: f32,
    pub decay: f32,
}

impl Spring {
    pub fn new(damping: f32, decay: f32) -> Self {
        Self { damping, decay }
    }

    pub fn step<T>(&self, current: &mut T, velocity: &mut T, target: T, dt: f32)
    where
        T: Copy + Add<Output = T> + Sub<Output = T> + Mul<f32, Output = T>,
    {
        *velocity = (*velocity + (target - *current) * (self.damping * dt)) * self.decay;
        *current = *current + *velocity;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Horizontal distance behind the character.
    pub distance: f32,
    /// Height above the character at zero pitch.
    pub height: f32,
    /// Extra height per radian of pitch.
    pub pitch_lift: f32,
    /// Look-at point above the character position.
    pub look_at_offset: f32,
    pub pitch_min: f32,
    pub pitch_max: f32,
    pub orientation_spring: Spring,
    pub position_spring: Spring,
    pub fov_degrees: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            distance: 8.0,
            height: 3.0,
            pitch_lift: 5.0,
            look_at_offset: 1.5,
            pitch_min: -0.6,
            pitch_max: 0.4,
            orientation_spring: Spring::new(12.0, 0.75),
            position_spring: Spring::new(8.0, 0.8),
            fov_degrees: 60.0,
        }
    }
}

impl CameraConfig {
    /// Order the pitch limits; non-finite limits fall back to the defaults.
    pub fn normalized(mut self) -> Self {
        if !(self.pitch_min.is_finite() && self.pitch_max.is_finite()) {
            let defaults = Self::default();
            tracing::warn!(
                min = self.pitch_min,
                max = self.pitch_max,
                "non-finite pitch limits, using defaults"
            );
            self.pitch_min = defaults.pitch_min;
            self.pitch_max = defaults.pitch_max;
        }
        let (min, max) = (self.pitch_min, self.pitch_max);
        self.pitch_min = min.min(max);
        self.pitch_max = min.max(max);
        self
    }
}

/// Continuous filter state, persisted across frames.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CameraRigState {
    pub yaw: f32,
    pub pitch: f32,
    pub yaw_velocity: f32,
    pub pitch_velocity: f32,
    pub position: Vec3,
    pub velocity: Vec3,
}

/// Where the render camera sits and what it looks at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraTransform {
    pub eye: Vec3,
    pub target: Vec3,
}

/// Third-person chase camera with smoothed orientation and position.
#[derive(Debug, Clone)]
pub struct CameraRig {
    config: CameraConfig,
    target_yaw: f32,
    target_pitch: f32,
    state: CameraRigState,
}

impl CameraRig {
    /// Build a rig already settled behind `pose`.
    pub fn new(config: CameraConfig, pose: CharacterPose) -> Self {
        let mut rig = Self {
            config: config.normalized(),
            target_yaw: 0.0,
            target_pitch: 0.0,
            state: CameraRigState::default(),
        };
        rig.reset(pose);
        rig
    }

    pub fn config(&self) -> &CameraConfig {
        &self.config
    }

    pub fn state(&self) -> CameraRigState {
        self.state
    }

    /// Rendered (smoothed) yaw. Movement input is oriented by this.
    pub fn yaw(&self) -> f32 {
        self.state.yaw
    }

    pub fn target_yaw(&self) -> f32 {
        self.target_yaw
    }

    pub fn target_pitch(&self) -> f32 {
        self.target_pitch
    }

    /// Snap every filter to its target behind `pose`. Only for (re)initialization.
    pub fn reset(&mut self, pose: CharacterPose) {
        self.state = CameraRigState {
            yaw: self.target_yaw,
            pitch: self.target_pitch,
            yaw_velocity: 0.0,
            pitch_velocity: 0.0,
            position: self.desired_position(&pose, self.target_yaw, self.target_pitch),
            velocity: Vec3::ZERO,
        };
        tracing::debug!(eye = ?self.state.position, "camera rig reset");
    }

    /// Apply look input to the target orientation immediately. Pitch is clamped.
    pub fn apply_look(&mut self, delta: LookDelta) {
        if delta.d_yaw.is_finite() {
            self.target_yaw += delta.d_yaw;
        }
        if delta.d_pitch.is_finite() {
            self.target_pitch = (self.target_pitch + delta.d_pitch)
                .clamp(self.config.pitch_min, self.config.pitch_max);
        }
    }

    /// Ease orientation and position toward their targets for one frame.
    pub fn update(&mut self, pose: CharacterPose, dt: f32) -> CameraTransform {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        let orient = self.config.orientation_spring;
        let s = &mut self.state;
        orient.step(&mut s.yaw, &mut s.yaw_velocity, self.target_yaw, dt);
        orient.step(&mut s.pitch, &mut s.pitch_velocity, self.target_pitch, dt);

        let desired = self.desired_position(&pose, self.state.yaw, self.state.pitch);
        let s = &mut self.state;
        self.config
            .position_spring
            .step(&mut s.position, &mut s.velocity, desired, dt);

        self.transform(&pose)
    }

    /// Current camera transform for `pose` without advancing the filters.
    pub fn transform(&self, pose: &CharacterPose) -> CameraTransform {
        CameraTransform {
            eye: self.state.position,
            target: pose.position + Vec3::Y * self.config.look_at_offset,
        }
    }

    fn desired_position(&self, pose: &CharacterPose, yaw: f32, pitch: f32) -> Vec3 {
        let c = &self.config;
        pose.position
            + Vec3::new(
                yaw.sin() * c.distance,
                c.height + pitch * c.pitch_lift,
                yaw.cos() * c.distance,
            )
    }
}
