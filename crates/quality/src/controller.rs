use serde::{Deserialize, Serialize};

use crate::tier::{QualitySettings, QualityTier};
use crate::window::FpsWindow;

/// Errors from quality configuration.
#[derive(Debug, thiserror::Error)]
pub enum QualityError {
    #[error("fps window capacity must be at least 1")]
    ZeroCapacity,
    #[error("evaluation interval must be positive, got {0}")]
    BadInterval(f32),
    #[error(
        "thresholds must satisfy downgrade < lock_min <= lock_max <= upgrade, got {downgrade_below} / {lock_min}..{lock_max} / {upgrade_above}"
    )]
    UnorderedThresholds {
        downgrade_below: f32,
        lock_min: f32,
        lock_max: f32,
        upgrade_above: f32,
    },
}

/// Sampling cadence and hysteresis thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QualityConfig {
    pub window_capacity: usize,
    /// Seconds between evaluations.
    pub evaluation_interval: f32,
    /// Mean fps below this steps one tier down.
    pub downgrade_below: f32,
    /// Mean fps within `[lock_min, lock_max]` locks the current tier.
    pub lock_min: f32,
    pub lock_max: f32,
    /// Mean fps above this steps one tier up.
    pub upgrade_above: f32,
    pub initial_tier: QualityTier,
}

impl Default for QualityConfig {
    fn default() -> Self {
        Self {
            window_capacity: 60,
            evaluation_interval: 3.0,
            downgrade_below: 28.0,
            lock_min: 45.0,
            lock_max: 55.0,
            upgrade_above: 55.0,
            initial_tier: QualityTier::High,
        }
    }
}

impl QualityConfig {
    pub fn validate(&self) -> Result<(), QualityError> {
        if self.window_capacity == 0 {
            return Err(QualityError::ZeroCapacity);
        }
        if self.evaluation_interval.is_nan() || self.evaluation_interval <= 0.0 {
            return Err(QualityError::BadInterval(self.evaluation_interval));
        }
        let ordered = self.downgrade_below < self.lock_min
            && self.lock_min <= self.lock_max
            && self.lock_max <= self.upgrade_above;
        if !ordered {
            return Err(QualityError::UnorderedThresholds {
                downgrade_below: self.downgrade_below,
                lock_min: self.lock_min,
                lock_max: self.lock_max,
                upgrade_above: self.upgrade_above,
            });
        }
        Ok(())
    }
}

/// A tier transition to push to the renderer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QualityChange {
    pub from: QualityTier,
    pub to: QualityTier,
    pub settings: QualitySettings,
}

/// Samples frame rate every frame and re-tiers on a fixed interval.
#[derive(Debug, Clone)]
pub struct QualityController {
    config: QualityConfig,
    tier: QualityTier,
    window: FpsWindow,
    locked: bool,
    since_evaluation: f32,
}

impl QualityController {
    /// A non-positive or non-finite evaluation interval falls back to the default.
    pub fn new(mut config: QualityConfig) -> Self {
        if !(config.evaluation_interval.is_finite() && config.evaluation_interval > 0.0) {
            tracing::warn!(
                interval = config.evaluation_interval,
                "invalid quality evaluation interval, using default"
            );
            config.evaluation_interval = QualityConfig::default().evaluation_interval;
        }
        Self {
            tier: config.initial_tier,
            window: FpsWindow::new(config.window_capacity),
            locked: false,
            since_evaluation: 0.0,
            config,
        }
    }

    pub fn tier(&self) -> QualityTier {
        self.tier
    }

    pub fn settings(&self) -> QualitySettings {
        self.tier.settings()
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn window(&self) -> &FpsWindow {
        &self.window
    }

    /// Record one rendered frame of length `dt` seconds. Evaluates once per
    /// elapsed interval and returns the resulting tier change, if any.
    ///
    /// Non-positive or non-finite deltas are ignored.
    pub fn record_frame(&mut self, dt: f32) -> Option<QualityChange> {
        if !(dt.is_finite() && dt > 0.0) {
            return None;
        }
        self.record_fps(1.0 / dt);
        self.since_evaluation += dt;
        if self.since_evaluation < self.config.evaluation_interval {
            return None;
        }
        self.since_evaluation %= self.config.evaluation_interval;
        self.evaluate()
    }

    /// Push an fps sample without advancing the evaluation clock.
    pub fn record_fps(&mut self, fps: f32) {
        if fps.is_finite() && fps >= 0.0 {
            self.window.push(fps);
        }
    }

    /// Apply the transition rule to the current window mean.
    pub fn evaluate(&mut self) -> Option<QualityChange> {
        let _span = tracing::info_span!("quality_evaluate").entered();
        if self.locked {
            return None;
        }
        let mean = self.window.mean()?;
        let next = if mean < self.config.downgrade_below {
            self.tier.lower()
        } else if mean > self.config.upgrade_above {
            self.tier.higher()
        } else {
            if (self.config.lock_min..=self.config.lock_max).contains(&mean) {
                self.locked = true;
                tracing::info!(tier = %self.tier, mean, "frame rate stable, quality locked");
            }
            None
        };

        let to = next?;
        let from = self.tier;
        self.tier = to;
        tracing::info!(%from, %to, mean, "quality tier changed");
        Some(QualityChange {
            from,
            to,
            settings: to.settings(),
        })
    }
}
