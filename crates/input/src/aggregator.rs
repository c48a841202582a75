use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use trailwalk_common::{LookDelta, MotionIntent};

use crate::event::{InputEvent, Key};

/// Look sensitivities in radians per pixel of drag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    pub mouse_yaw_sensitivity: f32,
    pub mouse_pitch_sensitivity: f32,
    pub touch_yaw_sensitivity: f32,
    pub touch_pitch_sensitivity: f32,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            mouse_yaw_sensitivity: 0.008,
            mouse_pitch_sensitivity: 0.002,
            touch_yaw_sensitivity: 0.005,
            touch_pitch_sensitivity: 0.003,
        }
    }
}

/// Folds keyboard, pointer, touch and joystick input into one intent.
///
/// Events may arrive between frames in any order; `poll` is the single
/// consumption point and drains the accumulated look delta.
#[derive(Debug, Default)]
pub struct InputAggregator {
    config: InputConfig,
    keys_held: HashSet<Key>,
    pointer_down: bool,
    joystick: Vec2,
    run_button: bool,
    pending_look: LookDelta,
}

impl InputAggregator {
    pub fn new(config: InputConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    pub fn config(&self) -> &InputConfig {
        &self.config
    }

    /// Feed one raw event.
    pub fn handle(&mut self, event: InputEvent) {
        match event {
            InputEvent::KeyDown(key) => {
                self.keys_held.insert(key);
            }
            InputEvent::KeyUp(key) => {
                self.keys_held.remove(&key);
            }
            InputEvent::PointerDown => self.pointer_down = true,
            InputEvent::PointerUp => self.pointer_down = false,
            InputEvent::PointerMove { dx, dy } => {
                if self.pointer_down && dx.is_finite() && dy.is_finite() {
                    self.pending_look += LookDelta::new(
                        -dx * self.config.mouse_yaw_sensitivity,
                        -dy * self.config.mouse_pitch_sensitivity,
                    );
                }
            }
            InputEvent::TouchDrag { dx, dy } => {
                if dx.is_finite() && dy.is_finite() {
                    self.pending_look += LookDelta::new(
                        -dx * self.config.touch_yaw_sensitivity,
                        -dy * self.config.touch_pitch_sensitivity,
                    );
                }
            }
            InputEvent::Joystick { x, y } => {
                let stick = Vec2::new(x, y);
                self.joystick = if stick.is_finite() {
                    stick.clamp(Vec2::NEG_ONE, Vec2::ONE)
                } else {
                    Vec2::ZERO
                };
            }
            InputEvent::JoystickRelease => self.joystick = Vec2::ZERO,
            InputEvent::RunButton(held) => self.run_button = held,
            InputEvent::Blur => {
                tracing::debug!(held = self.keys_held.len(), "focus lost, releasing input");
                self.keys_held.clear();
                self.pointer_down = false;
                self.joystick = Vec2::ZERO;
                self.run_button = false;
            }
        }
    }

    /// Current motion intent without draining anything.
    pub fn intent(&self) -> MotionIntent {
        let held = |k: Key| if self.keys_held.contains(&k) { 1.0 } else { 0.0 };
        let keyboard = Vec2::new(
            held(Key::Right) - held(Key::Left),
            held(Key::Forward) - held(Key::Back),
        );
        let sprint = self.keys_held.contains(&Key::Run) || self.run_button;
        MotionIntent::new(keyboard + self.joystick, sprint)
    }

    /// Take the look delta accumulated since the last drain.
    pub fn drain_look(&mut self) -> LookDelta {
        std::mem::take(&mut self.pending_look)
    }

    /// Per-frame consumption: the current intent plus the drained look delta.
    pub fn poll(&mut self) -> (MotionIntent, LookDelta) {
        (self.intent(), self.drain_look())
    }

    pub fn is_pointer_down(&self) -> bool {
        self.pointer_down
    }
}
