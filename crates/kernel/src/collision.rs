use trailwalk_common::Aabb;

/// Errors from collider registration.
#[derive(Debug, thiserror::Error)]
pub enum ColliderError {
    #[error("collider name must not be empty")]
    EmptyName,
    #[error("collider {0:?} has non-finite bounds")]
    NonFinite(String),
}

/// A named static box used for coarse movement rejection.
#[derive(Debug, Clone, PartialEq)]
pub struct ColliderBox {
    pub name: String,
    pub bounds: Aabb,
}

/// Collects colliders while the scene loads. Consumed by [`ColliderSetBuilder::build`].
#[derive(Debug, Default)]
pub struct ColliderSetBuilder {
    boxes: Vec<ColliderBox>,
}

impl ColliderSetBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a collider. Bounds with swapped corners are reordered.
    pub fn register(&mut self, name: impl Into<String>, bounds: Aabb) -> Result<(), ColliderError> {
        let name = name.into();
        if name.is_empty() {
            return Err(ColliderError::EmptyName);
        }
        if !bounds.is_finite() {
            return Err(ColliderError::NonFinite(name));
        }
        tracing::debug!(%name, min = ?bounds.min, max = ?bounds.max, "registered collider");
        self.boxes.push(ColliderBox {
            name,
            bounds: Aabb::from_corners(bounds.min, bounds.max),
        });
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    /// Freeze the registered boxes into a read-only set.
    pub fn build(self) -> ColliderSet {
        ColliderSet { boxes: self.boxes }
    }
}

/// Immutable set of static colliders.
///
/// Queries are a linear scan; scenes carry tens of boxes, not thousands.
#[derive(Debug, Clone, Default)]
pub struct ColliderSet {
    boxes: Vec<ColliderBox>,
}

impl ColliderSet {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ColliderBox> {
        self.boxes.iter()
    }

    pub fn get(&self, name: &str) -> Option<&ColliderBox> {
        self.boxes.iter().find(|b| b.name == name)
    }

    /// True if `volume` overlaps any registered box.
    pub fn would_collide(&self, volume: &Aabb) -> bool {
        self.first_overlap(volume).is_some()
    }

    /// The first registered box `volume` overlaps, in registration order.
    pub fn first_overlap(&self, volume: &Aabb) -> Option<&ColliderBox> {
        self.boxes.iter().find(|b| b.bounds.intersects(volume))
    }
}
