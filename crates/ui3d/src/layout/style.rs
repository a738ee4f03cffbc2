//! Tunable layout constants

use crate::components::BillboardOrientation;
use serde::{Deserialize, Serialize};

/// Typography of one text block
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlockStyle {
    /// Font size in world units (metres)
    pub font_size: f32,
    /// Depth of the extruded glyphs
    pub extrusion_depth: f32,
    /// RGBA
    pub color: [f32; 4],
    pub bold: bool,
    /// Factor applied to the measured height before stacking
    pub height_scale: f32,
}

impl BlockStyle {
    pub fn title() -> Self {
        Self {
            font_size: 0.15,
            extrusion_depth: 0.002,
            color: [0.333, 0.333, 0.333, 1.0],
            bold: true,
            height_scale: 1.1,
        }
    }

    pub fn detail() -> Self {
        Self {
            font_size: 0.06,
            extrusion_depth: 0.002,
            color: [0.557, 0.557, 0.576, 1.0],
            bold: false,
            height_scale: 1.3,
        }
    }

    pub fn comments() -> Self {
        Self {
            font_size: 0.08,
            extrusion_depth: 0.001,
            color: [0.0, 0.0, 0.0, 1.0],
            bold: false,
            height_scale: 1.2,
        }
    }
}

/// Every constant the label layout depends on
///
/// Lengths are in metres. The two inter-block spacings are independent; they
/// are not derived from block sizes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelStyle {
    pub title: BlockStyle,
    pub detail: BlockStyle,
    pub comments: BlockStyle,

    /// Hard break in the title every N characters
    pub title_break_every: usize,
    /// Detail lines longer than this are cut and end in an ellipsis
    pub detail_max_chars: usize,
    /// Word-wrap width for each numbered comment, in characters
    pub comment_wrap_width: usize,
    /// Number of ranked comments shown
    pub comment_limit: usize,

    /// Padding around the stacked text
    pub padding: f32,
    /// Gap between title and detail
    pub title_detail_spacing: f32,
    /// Gap between detail and comments
    pub detail_comment_spacing: f32,

    /// Background height as a multiple of the tight text height
    pub background_overscan: f32,
    pub background_color: [f32; 4],
    /// Background depth relative to the label root
    pub background_depth: f32,
    /// Text depth relative to the label root; must exceed `background_depth`
    pub text_depth: f32,

    /// Horizontal gap between the host's bounds and the label's edge
    pub host_clearance: f32,
    /// Forward offset of the label root from the host
    pub root_depth: f32,

    pub billboard: BillboardOrientation,
}

impl Default for LabelStyle {
    fn default() -> Self {
        Self {
            title: BlockStyle::title(),
            detail: BlockStyle::detail(),
            comments: BlockStyle::comments(),
            title_break_every: 25,
            detail_max_chars: 30,
            comment_wrap_width: 32,
            comment_limit: 3,
            padding: 0.05,
            title_detail_spacing: 0.001,
            detail_comment_spacing: 0.20,
            background_overscan: 1.3,
            background_color: [1.0, 1.0, 1.0, 0.8],
            background_depth: 0.0,
            text_depth: 0.01,
            host_clearance: 0.1,
            root_depth: 0.05,
            billboard: BillboardOrientation::Full,
        }
    }
}

impl LabelStyle {
    /// Block typography for `role`.
    pub fn block(&self, role: crate::components::BlockRole) -> &BlockStyle {
        use crate::components::BlockRole;
        match role {
            BlockRole::Title => &self.title,
            BlockRole::Detail => &self.detail,
            BlockRole::Comments => &self.comments,
        }
    }

    /// Human-readable problems that would break the layout invariants.
    pub fn problems(&self) -> Vec<String> {
        let mut problems = Vec::new();
        if self.text_depth <= self.background_depth {
            problems.push("text_depth must be greater than background_depth".to_string());
        }
        if self.host_clearance <= 0.0 {
            problems.push("host_clearance must be positive".to_string());
        }
        if self.padding < 0.0 || self.title_detail_spacing < 0.0 || self.detail_comment_spacing < 0.0
        {
            problems.push("padding and spacings must not be negative".to_string());
        }
        if self.background_overscan < 1.0 {
            problems.push("background_overscan must be at least 1.0".to_string());
        }
        for (name, block) in [
            ("title", &self.title),
            ("detail", &self.detail),
            ("comments", &self.comments),
        ] {
            if block.font_size <= 0.0 || block.height_scale <= 0.0 {
                problems.push(format!("{name}: font_size and height_scale must be positive"));
            }
        }
        problems
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_consistent() {
        assert!(LabelStyle::default().problems().is_empty());
    }

    #[test]
    fn spacing_ratio_matches_reference() {
        let style = LabelStyle::default();
        let ratio = style.detail_comment_spacing / style.title_detail_spacing;
        assert!((ratio - 200.0).abs() < 1e-3);
    }

    #[test]
    fn partial_json_keeps_other_defaults() {
        let style: LabelStyle = serde_json::from_str(r#"{"padding": 0.1}"#).unwrap();
        assert_eq!(style.padding, 0.1);
        assert_eq!(style.title_break_every, 25);
        assert_eq!(style.title, BlockStyle::title());
    }

    #[test]
    fn reports_inverted_depths() {
        let style = LabelStyle {
            text_depth: 0.0,
            background_depth: 0.01,
            ..Default::default()
        };
        assert_eq!(style.problems().len(), 1);
    }
}
