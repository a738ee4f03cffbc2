//! Shaped 3D text block

use crate::layout::BlockStyle;
use crate::text::TextMetrics;
use serde::{Deserialize, Serialize};

/// Position of a block in the placard's fixed top-to-bottom order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockRole {
    Title,
    Detail,
    Comments,
}

impl BlockRole {
    /// Stacking order, top first.
    pub const ORDER: [BlockRole; 3] = [BlockRole::Title, BlockRole::Detail, BlockRole::Comments];
}

/// Extruded text ready for meshing
///
/// Immutable once shaped: the lines and measured extent never change. A block
/// with no lines is still a valid block and measures `(0, 0)`.
#[derive(Debug, Clone, PartialEq)]
pub struct TextBlock {
    role: BlockRole,
    lines: Vec<String>,
    font_size: f32,
    extrusion_depth: f32,
    color: [f32; 4],
    bold: bool,
    extent: (f32, f32),
}

impl TextBlock {
    /// Measure `lines` with `metrics` using the typography in `style`.
    pub fn shape(
        role: BlockRole,
        lines: Vec<String>,
        style: &BlockStyle,
        metrics: &impl TextMetrics,
    ) -> Self {
        let extent = metrics.measure_block(&lines, style.font_size);
        Self {
            role,
            lines,
            font_size: style.font_size,
            extrusion_depth: style.extrusion_depth,
            color: style.color,
            bold: style.bold,
            extent,
        }
    }

    pub fn role(&self) -> BlockRole {
        self.role
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Lines joined with hard breaks, as handed to a text mesher.
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    pub fn font_size(&self) -> f32 {
        self.font_size
    }

    pub fn extrusion_depth(&self) -> f32 {
        self.extrusion_depth
    }

    pub fn color(&self) -> [f32; 4] {
        self.color
    }

    pub fn is_bold(&self) -> bool {
        self.bold
    }

    /// Unscaled `(width, height)`.
    pub fn extent(&self) -> (f32, f32) {
        self.extent
    }

    pub fn width(&self) -> f32 {
        self.extent.0
    }

    pub fn height(&self) -> f32 {
        self.extent.1
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
