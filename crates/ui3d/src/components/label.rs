//! Assembled place label - three text blocks on a billboarded panel

use super::billboard::{Billboard, BillboardOrientation};
use super::panel::Panel3D;
use super::text3d::{BlockRole, TextBlock};
use glam::Vec3;
use serde::Serialize;

/// Everything a renderer needs to draw one placard
///
/// Built in one go by [`crate::LabelLayoutEngine`]; there are no setters. When
/// any input changes the whole geometry is rebuilt.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelGeometry {
    pub(crate) title: TextBlock,
    pub(crate) detail: TextBlock,
    pub(crate) comments: TextBlock,
    /// Block heights after the per-block scale, in stacking order
    pub(crate) scaled_heights: [f32; 3],
    /// Tight bounds of the stacked text: (max width + 2 * padding, summed heights + spacings)
    pub(crate) total_size: (f32, f32),
    /// Block anchors (left edge, vertical centre) relative to the label root
    pub(crate) block_offsets: [Vec3; 3],
    pub(crate) background: Panel3D,
    /// Label root position relative to the host object
    pub(crate) root_offset: Vec3,
    pub(crate) billboard: Billboard,
}

impl LabelGeometry {
    pub fn title(&self) -> &TextBlock {
        &self.title
    }

    pub fn detail(&self) -> &TextBlock {
        &self.detail
    }

    pub fn comments(&self) -> &TextBlock {
        &self.comments
    }

    /// Blocks top to bottom.
    pub fn blocks(&self) -> [&TextBlock; 3] {
        [&self.title, &self.detail, &self.comments]
    }

    pub fn block(&self, role: BlockRole) -> &TextBlock {
        match role {
            BlockRole::Title => &self.title,
            BlockRole::Detail => &self.detail,
            BlockRole::Comments => &self.comments,
        }
    }

    /// Height each block contributes to the stack.
    pub fn scaled_heights(&self) -> [f32; 3] {
        self.scaled_heights
    }

    /// Left edge and vertical centre of each block, top to bottom.
    pub fn block_offsets(&self) -> [Vec3; 3] {
        self.block_offsets
    }

    pub fn block_offset(&self, role: BlockRole) -> Vec3 {
        match role {
            BlockRole::Title => self.block_offsets[0],
            BlockRole::Detail => self.block_offsets[1],
            BlockRole::Comments => self.block_offsets[2],
        }
    }

    pub fn total_width(&self) -> f32 {
        self.total_size.0
    }

    pub fn total_height(&self) -> f32 {
        self.total_size.1
    }

    pub fn background(&self) -> &Panel3D {
        &self.background
    }

    /// Background panel size, including the vertical overscan.
    pub fn background_size(&self) -> (f32, f32) {
        self.background.size
    }

    /// Label root position in the host object's local frame.
    pub fn root_offset(&self) -> Vec3 {
        self.root_offset
    }

    pub fn billboard(&self) -> Billboard {
        self.billboard
    }

    /// Serialisable summary for renderers and logs.
    pub fn describe(&self) -> LabelReport {
        LabelReport {
            title: self.title.lines().to_vec(),
            detail: self.detail.lines().to_vec(),
            comments: self.comments.lines().to_vec(),
            total_size: [self.total_size.0, self.total_size.1],
            background_size: [self.background.size.0, self.background.size.1],
            background_corners: self
                .background
                .generate_vertices()
                .map(|vertex| vertex.position),
            block_offsets: self.block_offsets.map(|offset| offset.to_array()),
            root_offset: self.root_offset.to_array(),
            billboarded: true,
            billboard: self.billboard.orientation,
        }
    }
}

/// Plain-data view of a [`LabelGeometry`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelReport {
    pub title: Vec<String>,
    pub detail: Vec<String>,
    pub comments: Vec<String>,
    pub total_size: [f32; 2],
    pub background_size: [f32; 2],
    /// Panel corners relative to the label root, counter-clockwise from bottom-left
    pub background_corners: [[f32; 3]; 4],
    pub block_offsets: [[f32; 3]; 3],
    pub root_offset: [f32; 3],
    /// Always true: every label root carries a face-camera component.
    pub billboarded: bool,
    pub billboard: BillboardOrientation,
}
