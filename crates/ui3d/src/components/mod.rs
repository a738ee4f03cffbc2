//! 3D label components
//!
//! This module contains the pieces a placard is assembled from: shaped text
//! blocks, the background panel, the billboard behaviour and the finished
//! [`LabelGeometry`].

pub mod billboard;
pub mod label;
pub mod panel;
pub mod text3d;

pub use billboard::{Billboard, BillboardOrientation};
pub use label::{LabelGeometry, LabelReport};
pub use panel::{Panel3D, PanelVertex};
pub use text3d::{BlockRole, TextBlock};

use glam::{Quat, Vec3};

/// Local pose of a label part relative to the label root
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform3D {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Default for Transform3D {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
        }
    }
}

impl Transform3D {
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }
}
