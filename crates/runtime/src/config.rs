use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use trailwalk_anim::AnimationConfig;
use trailwalk_input::InputConfig;
use trailwalk_kernel::CharacterConfig;
use trailwalk_quality::{QualityConfig, QualityError};
use trailwalk_render::CameraConfig;

/// Errors from loading or validating a session configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("unsupported config format: {0:?} (expected .json, .yaml or .yml)")]
    UnsupportedExtension(PathBuf),
    #[error("quality: {0}")]
    Quality(#[from] QualityError),
    #[error("{field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Every tunable of a session. Partial files override only the keys they name.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub character: CharacterConfig,
    pub camera: CameraConfig,
    pub input: InputConfig,
    pub animation: AnimationConfig,
    pub quality: QualityConfig,
    pub session: SessionConfig,
}

/// Frame pacing and sampler placement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Longest frame delta a session accepts; longer frames are clamped.
    pub max_frame_delta: f32,
    /// Elevation fixed-origin terrain probes start from.
    pub terrain_ray_origin: f32,
    /// Height of the top-down map camera above the ground.
    pub minimap_height: f32,
    pub adaptive_quality: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_frame_delta: 0.1,
            terrain_ray_origin: 100.0,
            minimap_height: 60.0,
            adaptive_quality: true,
        }
    }
}

impl SimConfig {
    /// Load from a `.json`, `.yaml` or `.yml` file and validate.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        let config: Self = match ext.as_deref() {
            Some("json") => serde_json::from_reader(std::fs::File::open(path)?)?,
            Some("yaml" | "yml") => serde_yaml::from_reader(std::fs::File::open(path)?)?,
            _ => return Err(ConfigError::UnsupportedExtension(path.to_path_buf())),
        };
        config.validate()?;
        tracing::debug!(path = %path.display(), "session config loaded");
        Ok(config)
    }

    /// Save as pretty JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let c = &self.character;
        positive("character.base_speed", c.base_speed)?;
        positive("character.sprint_multiplier", c.sprint_multiplier)?;
        positive("character.collision_height", c.collision_height)?;
        if c.vertical_smoothing.is_nan() || c.vertical_smoothing <= 0.0 || c.vertical_smoothing > 1.0 {
            return Err(invalid(
                "character.vertical_smoothing",
                format!("must be in (0, 1], got {}", c.vertical_smoothing),
            ));
        }
        let bounds_finite = c.bounds_min.is_finite() && c.bounds_max.is_finite();
        if !bounds_finite || c.bounds_min.cmpgt(c.bounds_max).any() {
            return Err(invalid(
                "character.bounds",
                format!("min {} exceeds max {}", c.bounds_min, c.bounds_max),
            ));
        }

        let cam = &self.camera;
        let pitch_finite = cam.pitch_min.is_finite() && cam.pitch_max.is_finite();
        if !pitch_finite || cam.pitch_min > cam.pitch_max {
            return Err(invalid(
                "camera.pitch",
                format!("min {} exceeds max {}", cam.pitch_min, cam.pitch_max),
            ));
        }

        if self.animation.crossfade_duration.is_nan() || self.animation.crossfade_duration < 0.0 {
            return Err(invalid(
                "animation.crossfade_duration",
                format!("must be non-negative, got {}", self.animation.crossfade_duration),
            ));
        }

        positive("session.max_frame_delta", self.session.max_frame_delta)?;
        self.quality.validate()?;
        Ok(())
    }
}

fn invalid(field: &'static str, reason: String) -> ConfigError {
    ConfigError::Invalid { field, reason }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(field, format!("must be positive, got {value}")))
    }
}
