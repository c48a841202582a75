use trailwalk_anim::{
    AnimationCommand, AnimationState, AnimationStateMachine, BlendWeights, ClipLibrary, target_for,
};
use trailwalk_common::CharacterPose;
use trailwalk_input::{InputAggregator, InputEvent};
use trailwalk_kernel::{CharacterController, ColliderSet, MotionState, TerrainSampler};
use trailwalk_quality::{QualityChange, QualityController, QualityTier};
use trailwalk_render::{CameraRig, CameraTransform, FrameView, RenderView};

use crate::config::{ConfigError, SimConfig};

/// Everything produced by one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameOutput {
    pub pose: CharacterPose,
    pub camera: CameraTransform,
    pub view: RenderView,
    pub minimap: RenderView,
    pub blend: BlendWeights,
    /// Cross-fade started this frame.
    pub animation: Option<AnimationCommand>,
    /// Tier change decided this frame; push `settings` to the renderer.
    pub quality: Option<QualityChange>,
    /// The character's move was rejected by a collider.
    pub blocked: bool,
}

impl FrameOutput {
    /// The renderer-facing subset of this frame.
    pub fn frame_view(&self) -> FrameView {
        FrameView {
            pose: self.pose,
            view: self.view,
            minimap: self.minimap,
            blend: self.blend,
        }
    }
}

/// One exploration session: owns every piece of per-frame state from start to end.
#[derive(Debug)]
pub struct Session {
    config: SimConfig,
    input: InputAggregator,
    controller: CharacterController,
    camera: CameraRig,
    colliders: Option<ColliderSet>,
    terrain: Option<TerrainSampler>,
    clips: ClipLibrary,
    animation: AnimationStateMachine,
    quality: Option<QualityController>,
    frames: u64,
}

impl Session {
    /// Start a session with the character at its spawn point and the camera settled behind it.
    ///
    /// No colliders, terrain or clips are attached yet. Fails when `config`
    /// does not pass [`SimConfig::validate`].
    pub fn new(config: SimConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let controller = CharacterController::new(config.character.clone());
        let camera = CameraRig::new(config.camera.clone(), controller.pose());
        let quality = config
            .session
            .adaptive_quality
            .then(|| QualityController::new(config.quality.clone()));
        tracing::debug!(
            spawn = ?controller.pose().position,
            adaptive_quality = quality.is_some(),
            "session started"
        );
        Ok(Self {
            input: InputAggregator::new(config.input.clone()),
            animation: AnimationStateMachine::new(config.animation.clone()),
            clips: ClipLibrary::new(),
            colliders: None,
            terrain: None,
            frames: 0,
            controller,
            camera,
            quality,
            config,
        })
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Replace the static collider set. Moves are unrestricted until one is attached.
    pub fn attach_colliders(&mut self, colliders: ColliderSet) {
        tracing::debug!(count = colliders.len(), "colliders attached");
        self.colliders = Some(colliders);
    }

    /// Switch the character from the fixed ground plane to terrain sampling and
    /// return the sampler so surfaces can be registered as they load.
    pub fn enable_terrain(&mut self) -> &mut TerrainSampler {
        let origin = self.config.session.terrain_ray_origin;
        self.terrain.get_or_insert_with(|| TerrainSampler::new(origin))
    }

    pub fn terrain_mut(&mut self) -> Option<&mut TerrainSampler> {
        self.terrain.as_mut()
    }

    pub fn terrain(&self) -> Option<&TerrainSampler> {
        self.terrain.as_ref()
    }

    /// Clips reported loaded by the asset layer.
    pub fn clips_mut(&mut self) -> &mut ClipLibrary {
        &mut self.clips
    }

    /// Stop adaptive quality; the current tier stays as it is.
    pub fn disable_quality(&mut self) {
        if self.quality.take().is_some() {
            tracing::debug!("adaptive quality disabled");
        }
    }

    pub fn quality_tier(&self) -> Option<QualityTier> {
        self.quality.as_ref().map(QualityController::tier)
    }

    pub fn handle_input(&mut self, event: InputEvent) {
        self.input.handle(event);
    }

    pub fn pose(&self) -> CharacterPose {
        self.controller.pose()
    }

    pub fn animation_state(&self) -> AnimationState {
        self.animation.current()
    }

    pub fn camera(&self) -> &CameraRig {
        &self.camera
    }

    /// Frames run so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Advance the session by one rendered frame of `dt` seconds.
    ///
    /// Simulation uses `dt` clamped to `[0, max_frame_delta]`; the quality
    /// controller samples the unclamped delta so it sees the real frame rate.
    pub fn frame(&mut self, dt: f32) -> FrameOutput {
        let _span = tracing::info_span!("session_frame", frame = self.frames).entered();
        let sim_dt = if dt.is_finite() {
            dt.clamp(0.0, self.config.session.max_frame_delta)
        } else {
            0.0
        };

        let (intent, look) = self.input.poll();
        self.camera.apply_look(look);

        let step = self.controller.step(
            intent,
            self.camera.yaw(),
            sim_dt,
            self.colliders.as_ref(),
            self.terrain.as_ref(),
        );

        let target = target_for(step.motion == MotionState::Moving, step.sprint, &self.clips);
        let animation = self.animation.request(target, &self.clips);
        self.animation.advance(sim_dt);

        let camera = self.camera.update(step.pose, sim_dt);
        let quality = self.quality.as_mut().and_then(|q| q.record_frame(dt));

        self.frames += 1;
        tracing::trace!(dt = sim_dt, blocked = step.blocked, state = ?self.animation.current(), "frame");

        FrameOutput {
            pose: step.pose,
            camera,
            view: RenderView::from_camera(&camera, self.camera.config().fov_degrees),
            minimap: RenderView::minimap(&step.pose, self.config.session.minimap_height),
            blend: self.animation.weights(),
            animation,
            quality,
            blocked: step.blocked,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use trailwalk_common::Aabb;
    use trailwalk_input::Key;
    use trailwalk_kernel::{ColliderSetBuilder, GroundPlane};

    const DT: f32 = 1.0 / 60.0;

    fn session() -> Session {
        let mut s = Session::new(SimConfig::default()).unwrap();
        for clip in ["Idle", "Walk", "Run"] {
            s.clips_mut().register(clip);
        }
        s
    }

    #[test]
    fn idle_session_stays_put() {
        let mut s = session();
        let start = s.pose();
        for _ in 0..10 {
            let out = s.frame(DT);
            assert!(out.animation.is_none());
            assert!(!out.blocked);
        }
        assert_eq!(s.pose(), start);
        assert_eq!(s.animation_state(), AnimationState::Idle);
        assert_eq!(s.frames(), 10);
    }

    #[test]
    fn forward_walk_over_terrain() {
        let mut config = SimConfig::default();
        config.character.ground_plane = 5.0;
        let mut s = Session::new(config).unwrap();
        for clip in ["Idle", "Walk", "Run"] {
            s.clips_mut().register(clip);
        }
        s.enable_terrain().register(GroundPlane::infinite(0.0));
        assert!((s.pose().position.y - 6.7).abs() < 1e-5);

        s.handle_input(InputEvent::KeyDown(Key::Forward));
        let out = s.frame(DT);

        // Camera yaw 0 puts forward along -Z.
        assert!(out.pose.position.x.abs() < 1e-6);
        assert!((out.pose.position.z + 5.0 * DT).abs() < 1e-5);
        assert!(out.pose.position.y < 6.7);
        assert_eq!(
            out.animation,
            Some(AnimationCommand::CrossFade {
                from: AnimationState::Idle,
                to: AnimationState::Walk,
                duration: 0.15,
            })
        );
        assert_eq!(out.blend.current.0, AnimationState::Walk);

        for _ in 0..60 {
            s.frame(DT);
        }
        assert!((s.pose().position.y - 1.7).abs() < 1e-3);
        assert_eq!(s.animation_state(), AnimationState::Walk);
    }

    #[test]
    fn sprint_switches_to_run() {
        let mut s = session();
        s.handle_input(InputEvent::KeyDown(Key::Forward));
        s.handle_input(InputEvent::KeyDown(Key::Run));
        let out = s.frame(DT);
        assert!((out.pose.position.z + 10.0 * DT).abs() < 1e-5);
        assert_eq!(s.animation_state(), AnimationState::Run);
    }

    #[test]
    fn missing_clips_hold_idle() {
        let mut s = Session::new(SimConfig::default()).unwrap();
        s.handle_input(InputEvent::KeyDown(Key::Forward));
        let out = s.frame(DT);
        assert!(out.animation.is_none());
        assert_eq!(s.animation_state(), AnimationState::Idle);

        s.clips_mut().register("Walk");
        assert!(s.frame(DT).animation.is_some());
        assert_eq!(s.animation_state(), AnimationState::Walk);
    }

    #[test]
    fn blocked_move_freezes_position() {
        let mut s = session();
        let mut builder = ColliderSetBuilder::new();
        builder
            .register(
                "Object_35",
                Aabb::from_corners(Vec3::new(-1.0, 0.0, -0.6), Vec3::new(1.0, 2.0, -0.4)),
            )
            .unwrap();
        s.attach_colliders(builder.build());

        s.handle_input(InputEvent::KeyDown(Key::Forward));
        let before = s.pose();
        let out = s.frame(DT);

        assert!(out.blocked);
        assert_eq!(out.pose.position, before.position);
        // Facing still turns toward the attempted direction (-Z).
        assert!((out.pose.facing_yaw.abs() - std::f32::consts::PI).abs() < 1e-5);
    }

    #[test]
    fn long_frames_are_clamped() {
        let mut s = session();
        s.handle_input(InputEvent::KeyDown(Key::Forward));
        let out = s.frame(5.0);
        assert!((out.pose.position.z + 0.5).abs() < 1e-5);

        let before = s.pose();
        let out = s.frame(f32::NAN);
        assert_eq!(out.pose.position, before.position);
    }

    #[test]
    fn late_terrain_keeps_height_until_loaded() {
        let mut s = session();
        s.enable_terrain();
        for _ in 0..5 {
            s.frame(DT);
        }
        assert!((s.pose().position.y - 1.7).abs() < 1e-6);

        s.terrain_mut().unwrap().register(GroundPlane::infinite(3.0));
        for _ in 0..60 {
            s.frame(DT);
        }
        assert!((s.pose().position.y - 4.7).abs() < 1e-3);
    }

    #[test]
    fn look_drag_turns_camera_and_heading() {
        let mut s = session();
        s.handle_input(InputEvent::PointerDown);
        s.handle_input(InputEvent::PointerMove { dx: -100.0, dy: 0.0 });
        s.handle_input(InputEvent::PointerUp);
        for _ in 0..120 {
            s.frame(DT);
        }
        assert!((s.camera().yaw() - 0.8).abs() < 1e-3);

        s.handle_input(InputEvent::KeyDown(Key::Forward));
        let before = s.pose().position;
        let out = s.frame(DT);
        let moved = out.pose.position - before;
        assert!((moved.x + 0.8_f32.sin() * 5.0 * DT).abs() < 1e-4);
        assert!((moved.z + 0.8_f32.cos() * 5.0 * DT).abs() < 1e-4);
    }

    #[test]
    fn camera_follows_character() {
        let mut s = session();
        s.handle_input(InputEvent::KeyDown(Key::Right));
        for _ in 0..300 {
            s.frame(DT);
        }
        s.handle_input(InputEvent::KeyUp(Key::Right));
        for _ in 0..300 {
            s.frame(DT);
        }
        let out = s.frame(DT);
        assert!(out.pose.position.x > 20.0);
        assert_eq!(out.camera.target, out.pose.position + Vec3::Y * 1.5);
        let expected_eye = out.pose.position + Vec3::new(0.0, 3.0, 8.0);
        assert!(out.camera.eye.distance(expected_eye) < 1e-3);
        assert_eq!(out.minimap.eye.x, out.pose.position.x);
    }

    #[test]
    fn slow_frames_drop_one_tier() {
        let mut s = session();
        let changes: Vec<QualityChange> = (0..70).filter_map(|_| s.frame(0.05).quality).collect();
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].from, QualityTier::High);
        assert_eq!(changes[0].to, QualityTier::Medium);
        assert_eq!(s.quality_tier(), Some(QualityTier::Medium));
    }

    #[test]
    fn disabled_quality_never_changes() {
        let mut s = session();
        s.disable_quality();
        assert!((0..200).all(|_| s.frame(0.05).quality.is_none()));
        assert_eq!(s.quality_tier(), None);
    }

    #[test]
    fn invalid_config_is_rejected_before_any_frame() {
        let mut config = SimConfig::default();
        config.character.bounds_min = glam::Vec2::splat(10.0);
        config.character.bounds_max = glam::Vec2::splat(-10.0);
        assert!(matches!(
            Session::new(config),
            Err(ConfigError::Invalid {
                field: "character.bounds",
                ..
            })
        ));

        let mut config = SimConfig::default();
        config.camera.pitch_min = 0.5;
        config.camera.pitch_max = -0.5;
        assert!(matches!(
            Session::new(config),
            Err(ConfigError::Invalid {
                field: "camera.pitch",
                ..
            })
        ));

        let mut config = SimConfig::default();
        config.quality.evaluation_interval = 0.0;
        assert!(matches!(Session::new(config), Err(ConfigError::Quality(_))));
    }

    #[test]
    fn swapped_limits_run_through_components() {
        let mut config = SimConfig::default();
        config.character.bounds_min = glam::Vec2::splat(10.0);
        config.character.bounds_max = glam::Vec2::splat(-10.0);
        config.camera.pitch_min = 0.5;
        config.camera.pitch_max = -0.5;

        let mut ctrl = CharacterController::new(config.character.clone());
        let mut rig = CameraRig::new(config.camera.clone(), ctrl.pose());
        rig.apply_look(trailwalk_common::LookDelta::new(0.0, -0.9));
        for _ in 0..300 {
            let step = ctrl.step(
                trailwalk_common::MotionIntent::new(glam::Vec2::Y, false),
                rig.yaw(),
                DT,
                None,
                None,
            );
            rig.update(step.pose, DT);
        }
        assert_eq!(ctrl.pose().position.z, -10.0);
        assert_eq!(rig.target_pitch(), -0.5);
    }

    #[test]
    fn frame_view_matches_output() {
        let mut s = session();
        let out = s.frame(DT);
        let view = out.frame_view();
        assert_eq!(view.pose, out.pose);
        assert_eq!(view.blend, out.blend);
    }
}
