//! Stacking layout for place labels

use super::style::LabelStyle;
use crate::components::{Billboard, BlockRole, LabelGeometry, Panel3D, TextBlock};
use crate::text::{self, MonospaceMetrics, TextMetrics};
use glam::Vec3;
use tracing::debug;
use waymark_core::Aabb;

/// Vertical centres of three stacked blocks and the total stack height.
///
/// The stack is centred on y = 0. The cursor starts at `H/2 - padding` and
/// walks down: each block's centre sits half its height below the cursor, then
/// the cursor moves past the block and the following spacing. Padding is part
/// of the starting point only, not of `H`.
pub fn stack_blocks(heights: [f32; 3], spacings: [f32; 2], padding: f32) -> ([f32; 3], f32) {
    let total = heights.iter().sum::<f32>() + spacings.iter().sum::<f32>();
    let mut cursor = total * 0.5 - padding;
    let mut centres = [0.0; 3];
    for (i, height) in heights.iter().enumerate() {
        centres[i] = cursor - height * 0.5;
        cursor -= height;
        if let Some(spacing) = spacings.get(i) {
            cursor -= spacing;
        }
    }
    (centres, total)
}

/// Builds [`LabelGeometry`] from place metadata
#[derive(Debug, Clone)]
pub struct LabelLayoutEngine<M = MonospaceMetrics> {
    style: LabelStyle,
    metrics: M,
}

impl Default for LabelLayoutEngine {
    fn default() -> Self {
        Self::new(LabelStyle::default())
    }
}

impl LabelLayoutEngine<MonospaceMetrics> {
    pub fn new(style: LabelStyle) -> Self {
        Self::with_metrics(style, MonospaceMetrics::default())
    }
}

impl<M: TextMetrics> LabelLayoutEngine<M> {
    pub fn with_metrics(style: LabelStyle, metrics: M) -> Self {
        Self { style, metrics }
    }

    pub fn style(&self) -> &LabelStyle {
        &self.style
    }

    pub fn metrics(&self) -> &M {
        &self.metrics
    }

    /// Title: hard line break every `title_break_every` characters.
    pub fn shape_title(&self, place_name: &str) -> TextBlock {
        let broken = text::insert_line_breaks(self.style.title_break_every, place_name);
        self.shape(BlockRole::Title, text::split_lines(&broken))
    }

    /// Detail: a single line truncated with an ellipsis.
    pub fn shape_detail(&self, place_detail: &str) -> TextBlock {
        let line = text::truncate(place_detail, self.style.detail_max_chars);
        let lines = if line.is_empty() { Vec::new() } else { vec![line] };
        self.shape(BlockRole::Detail, lines)
    }

    /// Comments: numbered, each wrapped to `comment_wrap_width`.
    pub fn shape_comments(&self, comments: &[String]) -> TextBlock {
        let lines = text::number_comments(comments, self.style.comment_limit)
            .iter()
            .flat_map(|entry| text::wrap_words(entry, self.style.comment_wrap_width))
            .collect();
        self.shape(BlockRole::Comments, lines)
    }

    fn shape(&self, role: BlockRole, lines: Vec<String>) -> TextBlock {
        TextBlock::shape(role, lines, self.style.block(role), &self.metrics)
    }

    /// Lay out the placard for a place beside `host_bounds`.
    ///
    /// `host_bounds` are in the host object's local frame; the returned root
    /// offset is relative to that frame. Total function: empty inputs give
    /// empty blocks, never an error.
    pub fn build_label(
        &self,
        place_name: &str,
        place_detail: &str,
        comments: &[String],
        host_bounds: &Aabb,
    ) -> LabelGeometry {
        let title = self.shape_title(place_name);
        let detail = self.shape_detail(place_detail);
        let comments = self.shape_comments(comments);
        self.assemble(title, detail, comments, host_bounds)
    }

    /// Stack already shaped blocks.
    pub fn assemble(
        &self,
        title: TextBlock,
        detail: TextBlock,
        comments: TextBlock,
        host_bounds: &Aabb,
    ) -> LabelGeometry {
        let style = &self.style;
        let blocks = [&title, &detail, &comments];

        // Scale factors apply to heights only
        let scaled_heights = blocks.map(|block| block.height() * style.block(block.role()).height_scale);
        let max_width = blocks.iter().map(|block| block.width()).fold(0.0_f32, f32::max);
        let total_width = max_width + 2.0 * style.padding;

        let (centres, total_height) = stack_blocks(
            scaled_heights,
            [style.title_detail_spacing, style.detail_comment_spacing],
            style.padding,
        );
        let left = -total_width * 0.5 + style.padding;
        let block_offsets = centres.map(|y| Vec3::new(left, y, style.text_depth));

        let background = Panel3D::new(
            Vec3::new(0.0, 0.0, style.background_depth),
            total_width,
            total_height * style.background_overscan,
        )
        .with_color(style.background_color);

        let host_center = host_bounds.center();
        let host_half = host_bounds.half_extents();
        let root_offset = Vec3::new(
            host_center.x + host_half.x + total_width * 0.5 + style.host_clearance,
            host_center.y,
            host_center.z + style.root_depth,
        );

        debug!(
            width = total_width,
            height = total_height,
            title_lines = title.lines().len(),
            comment_lines = comments.lines().len(),
            "label laid out"
        );

        LabelGeometry {
            title,
            detail,
            comments,
            scaled_heights,
            total_size: (total_width, total_height),
            block_offsets,
            background,
            root_offset,
            billboard: Billboard::always_face_camera().with_orientation(style.billboard),
        }
    }
}
