#![warn(missing_docs)]
//! Device viewer pose and screen-space ray construction.
//!
//! The handheld device is the camera: the tracking service reports its pose
//! every frame and the scene uses it to cast rays from screen points and to
//! re-orient billboards.

use glam::{Mat4, Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// Size of the device screen in points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Width in points.
    pub width: f32,
    /// Height in points.
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        // Portrait phone screen
        Self {
            width: 1170.0,
            height: 2532.0,
        }
    }
}

impl Viewport {
    /// Create a viewport.
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Screen centre, the fixed anchor point used for placement raycasts.
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width * 0.5, self.height * 0.5)
    }

    /// Width / height.
    pub fn aspect(&self) -> f32 {
        if self.height > 0.0 {
            self.width / self.height
        } else {
            1.0
        }
    }

    /// Whether `point` lies on the screen.
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= 0.0 && point.y >= 0.0 && point.x <= self.width && point.y <= self.height
    }
}

/// A ray in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// Ray origin.
    pub origin: Vec3,
    /// Normalised direction.
    pub direction: Vec3,
}

impl Ray {
    /// Point at distance `t` along the ray.
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// Device camera pose with projection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Viewer {
    /// Camera position in world space.
    pub position: Vec3,
    /// Horizontal rotation in radians (around Y axis).
    pub yaw: f32,
    /// Vertical rotation in radians (around local X axis).
    pub pitch: f32,

    /// Vertical field of view in radians.
    pub fov: f32,
    /// Near clipping plane distance.
    pub near: f32,
    /// Far clipping plane distance.
    pub far: f32,
}

impl Default for Viewer {
    fn default() -> Self {
        // Held at chest height, looking forward (-Z) and 45 degrees down.
        Self {
            position: Vec3::new(0.0, 1.4, 0.0),
            yaw: -std::f32::consts::FRAC_PI_2,
            pitch: -std::f32::consts::FRAC_PI_4,
            fov: std::f32::consts::FRAC_PI_3,
            near: 0.01,
            far: 100.0,
        }
    }
}

impl Viewer {
    /// Create a viewer at `position` with the default orientation.
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Builder: set yaw and pitch.
    pub fn with_orientation(mut self, yaw: f32, pitch: f32) -> Self {
        self.yaw = yaw;
        self.pitch = pitch.clamp(-1.55, 1.55);
        self
    }

    /// Forward direction (where the device camera looks).
    pub fn forward(&self) -> Vec3 {
        Vec3::new(
            self.yaw.cos() * self.pitch.cos(),
            self.pitch.sin(),
            self.yaw.sin() * self.pitch.cos(),
        )
        .normalize()
    }

    /// Right direction (camera's local X axis).
    pub fn right(&self) -> Vec3 {
        Vec3::new(-self.yaw.sin(), 0.0, self.yaw.cos()).normalize()
    }

    /// Up direction (camera's local Y axis).
    pub fn up(&self) -> Vec3 {
        self.right().cross(self.forward()).normalize()
    }

    /// World -> camera space.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.forward(), Vec3::Y)
    }

    /// Camera -> clip space for the given viewport.
    pub fn projection_matrix(&self, viewport: &Viewport) -> Mat4 {
        Mat4::perspective_rh(self.fov, viewport.aspect(), self.near, self.far)
    }

    /// Convert a screen point (origin top-left, Y down) into a world ray.
    pub fn screen_to_ray(&self, screen_pos: Vec2, viewport: &Viewport) -> Ray {
        let x = (2.0 * screen_pos.x) / viewport.width - 1.0;
        let y = 1.0 - (2.0 * screen_pos.y) / viewport.height; // Flip Y

        let inv_view_proj = (self.projection_matrix(viewport) * self.view_matrix()).inverse();
        let near = inv_view_proj.project_point3(Vec3::new(x, y, 0.0));
        let far = inv_view_proj.project_point3(Vec3::new(x, y, 1.0));

        Ray {
            origin: self.position,
            direction: (far - near).normalize(),
        }
    }
}
