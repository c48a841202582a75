use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};
use trailwalk_common::{Aabb, CharacterPose, MotionIntent};

use crate::collision::ColliderSet;
use crate::terrain::TerrainSampler;

/// Movement, collision volume and ground-follow tuning for the player character.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CharacterConfig {
    /// Walking speed in units per second.
    pub base_speed: f32,
    pub sprint_multiplier: f32,
    /// Height of the tracked position above the ground.
    pub eye_offset: f32,
    /// How far above the character terrain rays start.
    pub ray_height: f32,
    /// Fraction of the remaining vertical gap closed each step, in (0, 1].
    pub vertical_smoothing: f32,
    pub collision_radius: f32,
    pub collision_height: f32,
    pub bounds_min: Vec2,
    pub bounds_max: Vec2,
    /// Ground elevation used when no terrain sampler is attached.
    pub ground_plane: f32,
    /// Starting XZ.
    pub spawn: Vec2,
}

impl Default for CharacterConfig {
    fn default() -> Self {
        Self {
            base_speed: 5.0,
            sprint_multiplier: 2.0,
            eye_offset: 1.7,
            ray_height: 10.0,
            vertical_smoothing: 0.35,
            collision_radius: 0.35,
            collision_height: 1.8,
            bounds_min: Vec2::splat(-240.0),
            bounds_max: Vec2::splat(240.0),
            ground_plane: 0.0,
            spawn: Vec2::ZERO,
        }
    }
}

impl CharacterConfig {
    /// Order the bounds corners; non-finite bounds fall back to the defaults.
    pub fn normalized(mut self) -> Self {
        if !(self.bounds_min.is_finite() && self.bounds_max.is_finite()) {
            let defaults = Self::default();
            tracing::warn!(
                min = %self.bounds_min,
                max = %self.bounds_max,
                "non-finite character bounds, using defaults"
            );
            self.bounds_min = defaults.bounds_min;
            self.bounds_max = defaults.bounds_max;
        }
        let (min, max) = (self.bounds_min, self.bounds_max);
        self.bounds_min = min.min(max);
        self.bounds_max = min.max(max);
        self
    }
}

/// Coarse locomotion state; a pure function of whether the intent has length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MotionState {
    #[default]
    Idle,
    Moving,
}

/// Result of one controller step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepOutcome {
    pub pose: CharacterPose,
    pub motion: MotionState,
    pub sprint: bool,
    /// The proposed move overlapped a collider and was discarded.
    pub blocked: bool,
}

/// Planar camera basis for a yaw: `forward` points away from the camera.
pub fn camera_basis(yaw: f32) -> (Vec3, Vec3) {
    let forward = Vec3::new(-yaw.sin(), 0.0, -yaw.cos());
    let right = forward.cross(Vec3::Y).normalize_or_zero();
    (forward, right)
}

/// Owns the character pose and advances it once per frame.
#[derive(Debug, Clone)]
pub struct CharacterController {
    config: CharacterConfig,
    pose: CharacterPose,
    motion: MotionState,
}

impl CharacterController {
    /// Place the character at the configured spawn, standing on the ground plane.
    pub fn new(config: CharacterConfig) -> Self {
        let config = config.normalized();
        let position = Vec3::new(
            config.spawn.x,
            config.ground_plane + config.eye_offset,
            config.spawn.y,
        );
        Self {
            pose: CharacterPose::new(position, 0.0),
            motion: MotionState::Idle,
            config,
        }
    }

    pub fn config(&self) -> &CharacterConfig {
        &self.config
    }

    pub fn pose(&self) -> CharacterPose {
        self.pose
    }

    pub fn motion(&self) -> MotionState {
        self.motion
    }

    /// Move the character without collision or smoothing (respawn, scripted placement).
    pub fn teleport(&mut self, pose: CharacterPose) {
        self.pose = pose;
        self.clamp_to_bounds();
    }

    /// Advance one frame.
    ///
    /// `camera_yaw` orients the input axis. Colliders and terrain are optional:
    /// without colliders every move is accepted, without terrain the character
    /// stands on the configured ground plane.
    pub fn step(
        &mut self,
        intent: MotionIntent,
        camera_yaw: f32,
        dt: f32,
        colliders: Option<&ColliderSet>,
        terrain: Option<&TerrainSampler>,
    ) -> StepOutcome {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        self.motion = if intent.is_moving() {
            MotionState::Moving
        } else {
            MotionState::Idle
        };

        let (forward, right) = camera_basis(camera_yaw);
        let direction = (right * intent.axis.x + forward * intent.axis.y).normalize_or_zero();

        let mut blocked = false;
        if direction != Vec3::ZERO {
            let multiplier = if intent.sprint {
                self.config.sprint_multiplier
            } else {
                1.0
            };
            let distance = self.config.base_speed * multiplier * dt;
            let proposed = self.pose.position + direction * distance;

            let feet = Vec3::new(
                proposed.x,
                self.pose.position.y - self.config.eye_offset,
                proposed.z,
            );
            let volume = Aabb::upright(
                feet,
                self.config.collision_radius,
                self.config.collision_height,
            );
            match colliders.and_then(|c| c.first_overlap(&volume)) {
                Some(hit) => {
                    blocked = true;
                    tracing::debug!(collider = %hit.name, "move rejected");
                }
                None => {
                    self.pose.position.x = proposed.x;
                    self.pose.position.z = proposed.z;
                }
            }
            // Facing follows the attempted direction even when the move is rejected.
            self.pose.facing_yaw = direction.x.atan2(direction.z);
        }

        self.clamp_to_bounds();
        self.follow_ground(terrain);

        tracing::trace!(
            x = self.pose.position.x,
            y = self.pose.position.y,
            z = self.pose.position.z,
            yaw = self.pose.facing_yaw,
            blocked,
            "character step"
        );

        StepOutcome {
            pose: self.pose,
            motion: self.motion,
            sprint: intent.sprint,
            blocked,
        }
    }

    fn clamp_to_bounds(&mut self) {
        let p = &mut self.pose.position;
        p.x = p.x.clamp(self.config.bounds_min.x, self.config.bounds_max.x);
        p.z = p.z.clamp(self.config.bounds_min.y, self.config.bounds_max.y);
    }

    fn follow_ground(&mut self, terrain: Option<&TerrainSampler>) {
        let Some(terrain) = terrain else {
            self.pose.position.y = self.config.ground_plane + self.config.eye_offset;
            return;
        };
        let xz = self.pose.ground_marker();
        let ceiling = self.pose.position.y + self.config.ray_height;
        // A miss keeps the last height: never fall through a gap.
        if let Some(ground) = terrain.sample_ground_height_below(xz, ceiling) {
            let target = ground + self.config.eye_offset;
            self.pose.position.y += (target - self.pose.position.y) * self.config.vertical_smoothing;
        }
    }
}
