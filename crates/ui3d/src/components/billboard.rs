//! Billboard Component - keeps a label facing the viewer

use glam::{Mat3, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// "Always face camera" behaviour attached to a label root
///
/// This is not a one-off rotation: the scene re-evaluates
/// [`Billboard::facing_rotation`] every frame with the current viewer pose.
/// Both orientations face the viewer; they differ only in whether the label
/// may tilt.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Billboard {
    /// Billboard orientation mode
    pub orientation: BillboardOrientation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BillboardOrientation {
    /// Full billboard - faces camera completely
    Full,
    /// Y-axis aligned - rotates around Y axis only (stays upright)
    YAxis,
}

impl Default for Billboard {
    fn default() -> Self {
        Self::always_face_camera()
    }
}

impl Billboard {
    /// Full camera-facing billboard.
    pub fn always_face_camera() -> Self {
        Self {
            orientation: BillboardOrientation::Full,
        }
    }

    /// Builder: Set orientation mode
    pub fn with_orientation(mut self, orientation: BillboardOrientation) -> Self {
        self.orientation = orientation;
        self
    }

    /// World rotation that turns the owner's +Z face toward the camera.
    ///
    /// Returns `None` when the camera sits exactly on the owner (or, for
    /// [`BillboardOrientation::YAxis`], straight above or below it).
    pub fn facing_rotation(
        &self,
        position: Vec3,
        camera_position: Vec3,
        camera_up: Vec3,
    ) -> Option<Quat> {
        match self.orientation {
            BillboardOrientation::Full => full_billboard(position, camera_position, camera_up),
            BillboardOrientation::YAxis => y_axis_billboard(position, camera_position),
        }
    }
}

fn full_billboard(position: Vec3, camera_position: Vec3, camera_up: Vec3) -> Option<Quat> {
    let to_camera = (camera_position - position).try_normalize()?;
    // Camera straight above/below: fall back to world X as the right vector
    let right = camera_up
        .cross(to_camera)
        .try_normalize()
        .unwrap_or(Vec3::X);
    let up = to_camera.cross(right);

    let rotation = Mat3::from_cols(right, up, to_camera);
    Some(Quat::from_mat3(&rotation))
}

fn y_axis_billboard(position: Vec3, camera_position: Vec3) -> Option<Quat> {
    let mut to_camera = camera_position - position;
    to_camera.y = 0.0; // Project to XZ plane
    let to_camera = to_camera.try_normalize()?;

    let right = Vec3::Y.cross(to_camera).normalize();
    let rotation = Mat3::from_cols(right, Vec3::Y, to_camera);
    Some(Quat::from_mat3(&rotation))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_billboard_faces_camera() {
        let billboard = Billboard::always_face_camera();
        let position = Vec3::new(0.0, 0.0, -2.0);
        let camera = Vec3::new(1.0, 1.0, 0.0);

        let rotation = billboard.facing_rotation(position, camera, Vec3::Y).unwrap();
        let facing = rotation * Vec3::Z;
        let expected = (camera - position).normalize();
        assert!(facing.abs_diff_eq(expected, 1e-4));
    }

    #[test]
    fn test_unknown_orientation_is_rejected() {
        assert_eq!(
            serde_json::from_str::<BillboardOrientation>("\"y_axis\"").unwrap(),
            BillboardOrientation::YAxis
        );
        assert!(serde_json::from_str::<BillboardOrientation>("\"fixed\"").is_err());
    }

    #[test]
    fn test_y_axis_billboard_stays_upright() {
        let billboard = Billboard::always_face_camera().with_orientation(BillboardOrientation::YAxis);
        let rotation = billboard
            .facing_rotation(Vec3::ZERO, Vec3::new(3.0, 5.0, 0.0), Vec3::Y)
            .unwrap();
        assert!((rotation * Vec3::Y).abs_diff_eq(Vec3::Y, 1e-4));
        assert!((rotation * Vec3::Z).abs_diff_eq(Vec3::X, 1e-4));
    }

    #[test]
    fn test_degenerate_cases() {
        let upright = Billboard::always_face_camera().with_orientation(BillboardOrientation::YAxis);
        assert!(upright
            .facing_rotation(Vec3::ZERO, Vec3::new(0.0, 3.0, 0.0), Vec3::Y)
            .is_none());

        let full = Billboard::always_face_camera();
        assert!(full.facing_rotation(Vec3::ONE, Vec3::ONE, Vec3::Y).is_none());
        // Camera directly overhead still yields a finite rotation
        let overhead = full
            .facing_rotation(Vec3::ZERO, Vec3::new(0.0, 4.0, 0.0), Vec3::Y)
            .unwrap();
        assert!(overhead.is_finite());
    }
}
