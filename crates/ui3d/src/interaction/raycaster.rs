//! UI Raycasting - detect touches on label background quads

use glam::{Quat, Vec3};

/// Result of a UI raycast
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UIRaycastHit {
    /// Position where ray hit the UI element
    pub position: Vec3,
    /// Distance from ray origin to hit point
    pub distance: f32,
    /// UV coordinates on the UI quad (0-1 range)
    pub uv: (f32, f32),
}

/// Raycast against a quad lying in the XY plane of `rotation`.
///
/// The quad's local +X is its right edge direction and +Y its up direction.
/// Hits behind the ray origin or rays parallel to the quad miss.
pub fn raycast_oriented_quad(
    ray_origin: Vec3,
    ray_dir: Vec3,
    quad_center: Vec3,
    rotation: Quat,
    quad_size: (f32, f32), // width, height
) -> Option<UIRaycastHit> {
    let right = rotation * Vec3::X;
    let up = rotation * Vec3::Y;
    let normal = rotation * Vec3::Z;

    let denom = ray_dir.dot(normal);
    // Ray parallel to plane
    if denom.abs() < 0.0001 {
        return None;
    }

    let t = (quad_center - ray_origin).dot(normal) / denom;
    // Intersection behind ray origin
    if t < 0.0 {
        return None;
    }

    let hit_pos = ray_origin + ray_dir * t;
    let to_hit = hit_pos - quad_center;
    let u = to_hit.dot(right);
    let v = to_hit.dot(up);

    let half_width = quad_size.0 * 0.5;
    let half_height = quad_size.1 * 0.5;
    if u.abs() > half_width || v.abs() > half_height {
        return None;
    }

    Some(UIRaycastHit {
        position: hit_pos,
        distance: t * ray_dir.length(),
        uv: (
            (u + half_width) / quad_size.0,
            (v + half_height) / quad_size.1,
        ),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_facing_quad_raycast() {
        let quad_center = Vec3::new(0.0, 0.0, -5.0);

        let hit = raycast_oriented_quad(
            Vec3::ZERO,
            Vec3::new(0.0, 0.0, -1.0),
            quad_center,
            Quat::IDENTITY,
            (2.0, 1.0), // 2 units wide, 1 unit tall
        )
        .unwrap();

        assert!((hit.distance - 5.0).abs() < 0.001);
        assert!((hit.uv.0 - 0.5).abs() < 0.001); // Center U
        assert!((hit.uv.1 - 0.5).abs() < 0.001); // Center V
    }

    #[test]
    fn test_oriented_quad_edges() {
        let rotation = Quat::from_rotation_y(std::f32::consts::FRAC_PI_2);
        // Quad faces +X after the rotation; right edge points to -Z
        let center = Vec3::new(-3.0, 0.0, 0.0);
        let hit = raycast_oriented_quad(Vec3::ZERO, Vec3::NEG_X, center, rotation, (1.0, 1.0));
        assert!(hit.is_some());

        let miss = raycast_oriented_quad(
            Vec3::new(0.0, 0.0, 0.6),
            Vec3::NEG_X,
            center,
            rotation,
            (1.0, 1.0),
        );
        assert!(miss.is_none());
    }

    #[test]
    fn test_parallel_and_behind_miss() {
        let center = Vec3::new(0.0, 0.0, -2.0);
        assert!(raycast_oriented_quad(Vec3::ZERO, Vec3::X, center, Quat::IDENTITY, (1.0, 1.0)).is_none());
        assert!(raycast_oriented_quad(Vec3::ZERO, Vec3::Z, center, Quat::IDENTITY, (1.0, 1.0)).is_none());
    }
}
