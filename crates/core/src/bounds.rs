//! Axis-aligned bounds for placed objects and their selection volumes.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    /// Minimum corner.
    pub min: Vec3,
    /// Maximum corner.
    pub max: Vec3,
}

impl Aabb {
    /// Create a new AABB ensuring min <= max per axis.
    pub fn new(min: Vec3, max: Vec3) -> Self {
        debug_assert!(min.x <= max.x && min.y <= max.y && min.z <= max.z);
        Self { min, max }
    }

    /// Box of `size` resting on the origin: centred in X/Z, spanning `0..size.y` in Y.
    pub fn grounded(size: Vec3) -> Self {
        let half = size * 0.5;
        Self {
            min: Vec3::new(-half.x, 0.0, -half.z),
            max: Vec3::new(half.x, size.y, half.z),
        }
    }

    /// Full extents (width, height, depth).
    pub fn extents(&self) -> Vec3 {
        self.max - self.min
    }

    /// Half of the extents.
    pub fn half_extents(&self) -> Vec3 {
        self.extents() * 0.5
    }

    /// Centre point.
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Shift by `offset`.
    pub fn translated(&self, offset: Vec3) -> Self {
        Self {
            min: self.min + offset,
            max: self.max + offset,
        }
    }

    /// Slab test. Returns the distance along `ray_dir` to the first intersection.
    pub fn ray_intersection(&self, ray_origin: Vec3, ray_dir: Vec3) -> Option<f32> {
        let inv_dir = Vec3::ONE / ray_dir;

        let t1 = (self.min - ray_origin) * inv_dir;
        let t2 = (self.max - ray_origin) * inv_dir;

        let tmin = t1.min(t2).max_element();
        let tmax = t1.max(t2).min_element();

        // Box entirely behind the origin
        if tmax < 0.0 || tmin > tmax {
            return None;
        }

        // Origin inside the box
        Some(if tmin < 0.0 { tmax } else { tmin })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grounded_box_sits_on_origin() {
        let aabb = Aabb::grounded(Vec3::new(2.0, 1.0, 4.0));
        assert_eq!(aabb.min, Vec3::new(-1.0, 0.0, -2.0));
        assert_eq!(aabb.max, Vec3::new(1.0, 1.0, 2.0));
        assert_eq!(aabb.half_extents(), Vec3::new(1.0, 0.5, 2.0));
    }

    #[test]
    fn ray_hits_box_from_front() {
        let aabb = Aabb::new(Vec3::splat(-0.5), Vec3::splat(0.5));
        let hit = aabb.ray_intersection(Vec3::new(0.0, 0.0, 2.0), Vec3::new(0.0, 0.0, -1.0));
        assert!((hit.unwrap() - 1.5).abs() < 0.001);

        let miss = aabb.ray_intersection(Vec3::new(2.0, 0.0, 2.0), Vec3::new(0.0, 0.0, -1.0));
        assert!(miss.is_none());
    }

    #[test]
    fn ray_behind_box_misses() {
        let aabb = Aabb::new(Vec3::splat(-0.5), Vec3::splat(0.5));
        let hit = aabb.ray_intersection(Vec3::new(0.0, 0.0, 2.0), Vec3::new(0.0, 0.0, 1.0));
        assert!(hit.is_none());
    }
}
