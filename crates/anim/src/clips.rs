use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Locomotion clip states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum AnimationState {
    #[default]
    Idle,
    Walk,
    Run,
}

impl AnimationState {
    pub const ALL: [AnimationState; 3] = [Self::Idle, Self::Walk, Self::Run];

    /// Clip name as authored in the character asset.
    pub fn clip_name(self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Walk => "Walk",
            Self::Run => "Run",
        }
    }
}

/// Result of resolving an asset clip name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipBinding {
    Bound(AnimationState),
    /// The asset ships a clip the state machine has no state for.
    Unresolved,
}

impl ClipBinding {
    pub fn resolve(name: &str) -> Self {
        AnimationState::ALL
            .into_iter()
            .find(|s| s.clip_name() == name)
            .map_or(Self::Unresolved, Self::Bound)
    }
}

/// Which clips the asset layer has reported as loaded.
#[derive(Debug, Clone, Default)]
pub struct ClipLibrary {
    available: BTreeSet<AnimationState>,
}

impl ClipLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// A library with every locomotion clip loaded.
    pub fn complete() -> Self {
        Self {
            available: AnimationState::ALL.into_iter().collect(),
        }
    }

    /// Record a loaded clip by its asset name.
    pub fn register(&mut self, name: &str) -> ClipBinding {
        let binding = ClipBinding::resolve(name);
        match binding {
            ClipBinding::Bound(state) => {
                tracing::debug!(clip = name, ?state, "animation clip available");
                self.available.insert(state);
            }
            ClipBinding::Unresolved => {
                tracing::debug!(clip = name, "ignoring clip with no locomotion state");
            }
        }
        binding
    }

    pub fn is_available(&self, state: AnimationState) -> bool {
        self.available.contains(&state)
    }

    pub fn len(&self) -> usize {
        self.available.len()
    }

    pub fn is_empty(&self) -> bool {
        self.available.is_empty()
    }
}

/// The state a character should be in. Sprinting falls back to walking when
/// the asset has no run clip.
pub fn target_for(moving: bool, sprint: bool, library: &ClipLibrary) -> AnimationState {
    match (moving, sprint) {
        (false, _) => AnimationState::Idle,
        (true, true) if library.is_available(AnimationState::Run) => AnimationState::Run,
        (true, _) => AnimationState::Walk,
    }
}
