//! 3D Panel Component - Background quad behind the label text

use super::Transform3D;
use glam::Vec3;

/// Flat background rectangle in the label root's XY plane
#[derive(Debug, Clone, PartialEq)]
pub struct Panel3D {
    /// Panel transform relative to the label root
    pub transform: Transform3D,

    /// Panel size (width, height)
    pub size: (f32, f32),

    /// Background color
    pub color: [f32; 4],
}

impl Default for Panel3D {
    fn default() -> Self {
        Self {
            transform: Transform3D::default(),
            size: (1.0, 1.0),
            color: [1.0, 1.0, 1.0, 0.8],
        }
    }
}

impl Panel3D {
    /// Create a new 3D panel
    pub fn new(position: Vec3, width: f32, height: f32) -> Self {
        Self {
            transform: Transform3D::new(position),
            size: (width, height),
            ..Default::default()
        }
    }

    /// Builder: Set background color
    pub fn with_color(mut self, color: [f32; 4]) -> Self {
        self.color = color;
        self
    }

    pub fn width(&self) -> f32 {
        self.size.0
    }

    pub fn height(&self) -> f32 {
        self.size.1
    }

    /// Generate vertices for the panel quad
    /// Format: [bottom-left, bottom-right, top-right, top-left]
    pub fn generate_vertices(&self) -> [PanelVertex; 4] {
        let half_width = self.size.0 * 0.5;
        let half_height = self.size.1 * 0.5;

        let corners = [
            (Vec3::new(-half_width, -half_height, 0.0), [0.0, 0.0]),
            (Vec3::new(half_width, -half_height, 0.0), [1.0, 0.0]),
            (Vec3::new(half_width, half_height, 0.0), [1.0, 1.0]),
            (Vec3::new(-half_width, half_height, 0.0), [0.0, 1.0]),
        ];

        corners.map(|(corner, uv)| PanelVertex {
            position: (self.transform.position + self.transform.rotation * corner).to_array(),
            uv,
            color: self.color,
        })
    }
}

/// Vertex data for panel rendering
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelVertex {
    /// Vertex position relative to the label root
    pub position: [f32; 3],
    /// UV coordinates (0-1)
    pub uv: [f32; 2],
    /// Vertex color
    pub color: [f32; 4],
}
