use serde::{Deserialize, Serialize};

use crate::clips::{AnimationState, ClipLibrary};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    /// Seconds for both the fade-out and the fade-in of a transition.
    pub crossfade_duration: f32,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            crossfade_duration: 0.15,
        }
    }
}

/// Instruction for the animation mixer when the state changes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnimationCommand {
    /// Fade `from` out and restart `to` fading in, both over `duration` seconds.
    CrossFade {
        from: AnimationState,
        to: AnimationState,
        duration: f32,
    },
}

/// Clip weights for the current frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlendWeights {
    pub current: (AnimationState, f32),
    /// The clip fading out, while a cross-fade is in flight.
    pub previous: Option<(AnimationState, f32)>,
}

#[derive(Debug, Clone, Copy)]
struct Crossfade {
    from: AnimationState,
    /// Weight `from` had when the fade began.
    from_weight: f32,
    elapsed: f32,
}

/// Idle/Walk/Run state machine with a single in-flight cross-fade.
#[derive(Debug, Clone)]
pub struct AnimationStateMachine {
    config: AnimationConfig,
    current: AnimationState,
    fade: Option<Crossfade>,
}

impl AnimationStateMachine {
    /// Starts in `Idle` at full weight.
    pub fn new(config: AnimationConfig) -> Self {
        Self {
            config,
            current: AnimationState::Idle,
            fade: None,
        }
    }

    pub fn current(&self) -> AnimationState {
        self.current
    }

    pub fn is_fading(&self) -> bool {
        self.fade.is_some()
    }

    /// Ask for `target`. Returns the mixer command when a transition starts.
    ///
    /// Requesting the current state does nothing, and so does a target whose
    /// clip is not loaded yet; the next frame asks again.
    pub fn request(
        &mut self,
        target: AnimationState,
        library: &ClipLibrary,
    ) -> Option<AnimationCommand> {
        if target == self.current {
            return None;
        }
        if !library.is_available(target) {
            tracing::trace!(?target, "clip not loaded, holding current state");
            return None;
        }

        let from = self.current;
        let from_weight = self.current_weight();
        let duration = self.config.crossfade_duration;
        self.fade = (duration > 0.0).then_some(Crossfade {
            from,
            from_weight,
            elapsed: 0.0,
        });
        self.current = target;
        tracing::debug!(?from, to = ?target, duration, "animation cross-fade");

        Some(AnimationCommand::CrossFade {
            from,
            to: target,
            duration,
        })
    }

    /// Progress the in-flight fade.
    pub fn advance(&mut self, dt: f32) {
        let Some(fade) = &mut self.fade else {
            return;
        };
        if dt.is_finite() && dt > 0.0 {
            fade.elapsed += dt;
        }
        if fade.elapsed >= self.config.crossfade_duration {
            self.fade = None;
        }
    }

    pub fn weights(&self) -> BlendWeights {
        match self.fade {
            Some(fade) => {
                let t = self.progress(&fade);
                BlendWeights {
                    current: (self.current, t),
                    previous: Some((fade.from, fade.from_weight * (1.0 - t))),
                }
            }
            None => BlendWeights {
                current: (self.current, 1.0),
                previous: None,
            },
        }
    }

    fn current_weight(&self) -> f32 {
        self.fade.as_ref().map_or(1.0, |f| self.progress(f))
    }

    fn progress(&self, fade: &Crossfade) -> f32 {
        (fade.elapsed / self.config.crossfade_duration).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn machine() -> AnimationStateMachine {
        AnimationStateMachine::new(AnimationConfig::default())
    }

    #[test]
    fn starts_idle_at_full_weight() {
        let m = machine();
        assert_eq!(m.current(), AnimationState::Idle);
        let w = m.weights();
        assert_eq!(w.current, (AnimationState::Idle, 1.0));
        assert!(w.previous.is_none());
    }

    #[test]
    fn change_starts_crossfade() {
        let lib = ClipLibrary::complete();
        let mut m = machine();
        let cmd = m.request(AnimationState::Walk, &lib);
        assert_eq!(
            cmd,
            Some(AnimationCommand::CrossFade {
                from: AnimationState::Idle,
                to: AnimationState::Walk,
                duration: 0.15,
            })
        );
        assert!(m.is_fading());
        let w = m.weights();
        assert_eq!(w.current, (AnimationState::Walk, 0.0));
        assert_eq!(w.previous, Some((AnimationState::Idle, 1.0)));
    }

    #[test]
    fn fade_completes_after_duration() {
        let lib = ClipLibrary::complete();
        let mut m = machine();
        m.request(AnimationState::Walk, &lib);
        m.advance(0.075);
        let w = m.weights();
        assert!((w.current.1 - 0.5).abs() < 1e-5);
        assert!((w.previous.unwrap().1 - 0.5).abs() < 1e-5);

        m.advance(0.1);
        assert!(!m.is_fading());
        assert_eq!(m.weights().current, (AnimationState::Walk, 1.0));
    }

    #[test]
    fn same_target_is_idempotent() {
        let lib = ClipLibrary::complete();
        let mut m = machine();
        assert!(m.request(AnimationState::Idle, &lib).is_none());
        m.request(AnimationState::Run, &lib);
        m.advance(0.05);
        let before = m.weights();
        for _ in 0..10 {
            assert!(m.request(AnimationState::Run, &lib).is_none());
        }
        assert_eq!(m.weights(), before);
    }

    #[test]
    fn unavailable_clip_holds_state() {
        let mut lib = ClipLibrary::new();
        lib.register("Idle");
        let mut m = machine();
        assert!(m.request(AnimationState::Walk, &lib).is_none());
        assert_eq!(m.current(), AnimationState::Idle);
        assert!(!m.is_fading());

        lib.register("Walk");
        assert!(m.request(AnimationState::Walk, &lib).is_some());
        assert_eq!(m.current(), AnimationState::Walk);
    }

    #[test]
    fn retarget_mid_fade_replaces_transition() {
        let lib = ClipLibrary::complete();
        let mut m = machine();
        m.request(AnimationState::Walk, &lib);
        m.advance(0.06);
        let cmd = m.request(AnimationState::Run, &lib);
        assert!(matches!(
            cmd,
            Some(AnimationCommand::CrossFade {
                from: AnimationState::Walk,
                to: AnimationState::Run,
                ..
            })
        ));
        let w = m.weights();
        assert_eq!(w.current, (AnimationState::Run, 0.0));
        let (prev, weight) = w.previous.unwrap();
        assert_eq!(prev, AnimationState::Walk);
        // Walk had reached 40% when the new fade began.
        assert!((weight - 0.4).abs() < 1e-5);
    }

    #[test]
    fn zero_duration_is_a_hard_cut() {
        let lib = ClipLibrary::complete();
        let mut m = AnimationStateMachine::new(AnimationConfig {
            crossfade_duration: 0.0,
        });
        assert!(m.request(AnimationState::Walk, &lib).is_some());
        assert!(!m.is_fading());
        assert_eq!(m.weights().current, (AnimationState::Walk, 1.0));
    }
}
