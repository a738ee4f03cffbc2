#![warn(missing_docs)]
//! Core primitives shared across the workspace.

mod bounds;
mod geo;

use glam::{Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

pub use bounds::Aabb;
pub use geo::GeoCoordinate;

/// Frame counter of the cooperative scene-update loop.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct FrameTick(pub u64);

impl FrameTick {
    /// First frame of any session.
    pub const ZERO: Self = Self(0);

    /// Advance by `delta` frames.
    pub fn advance(self, delta: u64) -> Self {
        Self(self.0 + delta)
    }
}

/// A rigid pose in tracked world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldTransform(pub Mat4);

impl Default for WorldTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl WorldTransform {
    /// The world origin.
    pub const IDENTITY: Self = Self(Mat4::IDENTITY);

    /// Pose with the given translation and no rotation.
    pub fn from_translation(translation: Vec3) -> Self {
        Self(Mat4::from_translation(translation))
    }

    /// Pose with rotation and translation.
    pub fn from_rotation_translation(rotation: Quat, translation: Vec3) -> Self {
        Self(Mat4::from_rotation_translation(rotation, translation))
    }

    /// Underlying matrix.
    pub fn matrix(&self) -> Mat4 {
        self.0
    }

    /// Translation component.
    pub fn translation(&self) -> Vec3 {
        self.0.w_axis.truncate()
    }

    /// Rotation component (scale is discarded).
    pub fn rotation(&self) -> Quat {
        let (_, rotation, _) = self.0.to_scale_rotation_translation();
        rotation
    }

    /// Map a point from local space into this pose's parent space.
    pub fn transform_point(&self, point: Vec3) -> Vec3 {
        self.0.transform_point3(point)
    }

    /// Compose `self * child`.
    pub fn then(&self, child: &WorldTransform) -> WorldTransform {
        WorldTransform(self.0 * child.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_tick_advances() {
        assert_eq!(FrameTick::ZERO.advance(3), FrameTick(3));
    }

    #[test]
    fn world_transform_composes_translations() {
        let parent = WorldTransform::from_translation(Vec3::new(1.0, 0.0, 0.0));
        let child = WorldTransform::from_translation(Vec3::new(0.0, 2.0, 0.0));
        let world = parent.then(&child);
        assert_eq!(world.translation(), Vec3::new(1.0, 2.0, 0.0));
        assert_eq!(world.transform_point(Vec3::ZERO), Vec3::new(1.0, 2.0, 0.0));
    }
}
