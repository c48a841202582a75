use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};
use std::ops::AddAssign;

/// Axis-aligned bounding box in world space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Build a box from two arbitrary corners.
    pub fn from_corners(a: Vec3, b: Vec3) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    pub fn from_center_half_extents(center: Vec3, half_extents: Vec3) -> Self {
        let half = half_extents.abs();
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Vertical volume standing on `feet`: a square footprint of `radius`
    /// around the XZ position, extending `height` upward.
    pub fn upright(feet: Vec3, radius: f32, height: f32) -> Self {
        Self {
            min: Vec3::new(feet.x - radius, feet.y, feet.z - radius),
            max: Vec3::new(feet.x + radius, feet.y + height, feet.z + radius),
        }
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Strict overlap test. Boxes that only share a face do not intersect.
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
            && self.min.z < other.max.z
            && self.max.z > other.min.z
    }

    pub fn contains_point(&self, p: Vec3) -> bool {
        p.cmpge(self.min).all() && p.cmple(self.max).all()
    }

    pub fn is_finite(&self) -> bool {
        self.min.is_finite() && self.max.is_finite()
    }
}

/// Authoritative character placement for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CharacterPose {
    /// Eye-level position. Y already includes the eye offset above the ground.
    pub position: Vec3,
    /// Heading around +Y in radians; 0 faces +Z.
    pub facing_yaw: f32,
}

impl CharacterPose {
    pub fn new(position: Vec3, facing_yaw: f32) -> Self {
        Self {
            position,
            facing_yaw,
        }
    }

    /// XZ tracked by ground decorations and the top-down map.
    pub fn ground_marker(&self) -> Vec2 {
        Vec2::new(self.position.x, self.position.z)
    }

    /// Unit vector the character faces, on the XZ plane.
    pub fn facing_direction(&self) -> Vec3 {
        Vec3::new(self.facing_yaw.sin(), 0.0, self.facing_yaw.cos())
    }
}

/// Desired movement for the current frame, produced fresh by the input layer.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MotionIntent {
    /// x = strafe right, y = away from the camera. Each component in [-1, 1].
    pub axis: Vec2,
    pub sprint: bool,
}

impl MotionIntent {
    pub fn new(axis: Vec2, sprint: bool) -> Self {
        Self {
            axis: axis.clamp(Vec2::NEG_ONE, Vec2::ONE),
            sprint,
        }
    }

    pub fn idle() -> Self {
        Self::default()
    }

    pub fn is_moving(&self) -> bool {
        self.axis.length_squared() > 0.0
    }

    /// Unit-length direction used for speed; zero when idle.
    pub fn movement_direction(&self) -> Vec2 {
        self.axis.normalize_or_zero()
    }
}

/// Look input accumulated since the camera last consumed it, in radians.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LookDelta {
    pub d_yaw: f32,
    pub d_pitch: f32,
}

impl LookDelta {
    pub fn new(d_yaw: f32, d_pitch: f32) -> Self {
        Self { d_yaw, d_pitch }
    }

    pub fn is_zero(&self) -> bool {
        self.d_yaw == 0.0 && self.d_pitch == 0.0
    }
}

impl AddAssign for LookDelta {
    fn add_assign(&mut self, rhs: Self) {
        self.d_yaw += rhs.d_yaw;
        self.d_pitch += rhs.d_pitch;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aabb_from_corners_orders_bounds() {
        let b = Aabb::from_corners(Vec3::new(2.0, 0.0, -1.0), Vec3::new(-2.0, 3.0, 1.0));
        assert_eq!(b.min, Vec3::new(-2.0, 0.0, -1.0));
        assert_eq!(b.max, Vec3::new(2.0, 3.0, 1.0));
        assert_eq!(b.center(), Vec3::new(0.0, 1.5, 0.0));
    }

    #[test]
    fn aabb_overlap_is_strict() {
        let a = Aabb::from_corners(Vec3::ZERO, Vec3::ONE);
        let touching = Aabb::from_corners(Vec3::new(1.0, 0.0, 0.0), Vec3::new(2.0, 1.0, 1.0));
        let overlapping = Aabb::from_corners(Vec3::splat(0.5), Vec3::splat(1.5));
        assert!(!a.intersects(&touching));
        assert!(a.intersects(&overlapping));
        assert!(overlapping.intersects(&a));
    }

    #[test]
    fn aabb_size_and_point_containment() {
        let b = Aabb::from_center_half_extents(Vec3::new(1.0, 1.0, 1.0), Vec3::new(1.0, 0.5, 2.0));
        assert_eq!(b.size(), Vec3::new(2.0, 1.0, 4.0));
        assert!(b.contains_point(Vec3::new(1.0, 1.0, 1.0)));
        // Faces count as inside.
        assert!(b.contains_point(Vec3::new(2.0, 1.5, -1.0)));
        assert!(!b.contains_point(Vec3::new(2.1, 1.0, 1.0)));
    }

    #[test]
    fn upright_volume_stands_on_feet() {
        let v = Aabb::upright(Vec3::new(1.0, 2.0, 3.0), 0.5, 1.8);
        assert_eq!(v.min, Vec3::new(0.5, 2.0, 2.5));
        assert_eq!(v.max, Vec3::new(1.5, 3.8, 3.5));
    }

    #[test]
    fn intent_clamps_components() {
        let i = MotionIntent::new(Vec2::new(3.0, -2.0), false);
        assert_eq!(i.axis, Vec2::new(1.0, -1.0));
        let dir = i.movement_direction();
        assert!((dir.length() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn idle_intent_has_no_direction() {
        let i = MotionIntent::idle();
        assert!(!i.is_moving());
        assert_eq!(i.movement_direction(), Vec2::ZERO);
    }

    #[test]
    fn look_delta_accumulates() {
        let mut d = LookDelta::default();
        d += LookDelta::new(0.1, -0.2);
        d += LookDelta::new(0.1, 0.1);
        assert!((d.d_yaw - 0.2).abs() < 1e-6);
        assert!((d.d_pitch + 0.1).abs() < 1e-6);
    }

    #[test]
    fn pose_ground_marker_drops_height() {
        let pose = CharacterPose::new(Vec3::new(4.0, 1.7, -2.0), 0.0);
        assert_eq!(pose.ground_marker(), Vec2::new(4.0, -2.0));
        assert_eq!(pose.facing_direction(), Vec3::new(0.0, 0.0, 1.0));
    }
}
