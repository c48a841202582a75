use serde::{Deserialize, Serialize};

/// Discrete rendering fidelity levels, ordered low to high.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum QualityTier {
    Low,
    Medium,
    High,
}

impl QualityTier {
    /// One step down, or `None` at `Low`.
    pub fn lower(self) -> Option<Self> {
        match self {
            Self::Low => None,
            Self::Medium => Some(Self::Low),
            Self::High => Some(Self::Medium),
        }
    }

    /// One step up, or `None` at `High`.
    pub fn higher(self) -> Option<Self> {
        match self {
            Self::Low => Some(Self::Medium),
            Self::Medium => Some(Self::High),
            Self::High => None,
        }
    }

    pub fn settings(self) -> QualitySettings {
        QualitySettings::for_tier(self)
    }
}

impl std::fmt::Display for QualityTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        };
        f.write_str(name)
    }
}

/// Renderer configuration for a tier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QualitySettings {
    /// Upper bound applied to the device pixel ratio.
    pub pixel_ratio_cap: f32,
    pub shadows: bool,
    pub shadow_cascades: u32,
    pub shadow_map_size: u32,
    /// Fraction of decorative instances (grass, props, particles) to draw.
    pub decorative_density: f32,
}

impl QualitySettings {
    pub fn for_tier(tier: QualityTier) -> Self {
        match tier {
            QualityTier::Low => Self {
                pixel_ratio_cap: 1.0,
                shadows: false,
                shadow_cascades: 0,
                shadow_map_size: 0,
                decorative_density: 0.25,
            },
            QualityTier::Medium => Self {
                pixel_ratio_cap: 1.5,
                shadows: true,
                shadow_cascades: 2,
                shadow_map_size: 1024,
                decorative_density: 0.6,
            },
            QualityTier::High => Self {
                pixel_ratio_cap: 2.0,
                shadows: true,
                shadow_cascades: 4,
                shadow_map_size: 2048,
                decorative_density: 1.0,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tiers_are_ordered() {
        assert!(QualityTier::Low < QualityTier::Medium);
        assert!(QualityTier::Medium < QualityTier::High);
    }

    #[test]
    fn stepping_saturates_at_the_ends() {
        assert_eq!(QualityTier::High.lower(), Some(QualityTier::Medium));
        assert_eq!(QualityTier::Low.lower(), None);
        assert_eq!(QualityTier::Low.higher(), Some(QualityTier::Medium));
        assert_eq!(QualityTier::High.higher(), None);
    }

    #[test]
    fn settings_scale_with_tier() {
        let low = QualityTier::Low.settings();
        let high = QualityTier::High.settings();
        assert!(!low.shadows);
        assert_eq!(low.shadow_cascades, 0);
        assert!(high.shadows);
        assert_eq!(high.shadow_cascades, 4);
        assert!(high.pixel_ratio_cap > low.pixel_ratio_cap);
        assert!(high.decorative_density > low.decorative_density);
    }

    #[test]
    fn display_names() {
        assert_eq!(QualityTier::Medium.to_string(), "medium");
    }
}
