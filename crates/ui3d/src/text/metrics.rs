//! Text measurement in world units

use serde::{Deserialize, Serialize};

/// Glyph measurement used to size text blocks.
///
/// Implementations backed by a real font can be swapped in; the layout only
/// needs advances and a line height.
pub trait TextMetrics {
    /// Horizontal advance of `c` at `font_size` (world units).
    fn advance(&self, c: char, font_size: f32) -> f32;

    /// Distance between baselines at `font_size`.
    fn line_height(&self, font_size: f32) -> f32;

    /// Width of a single line of text.
    fn measure_line(&self, line: &str, font_size: f32) -> f32 {
        line.chars().map(|c| self.advance(c, font_size)).sum()
    }

    /// Extent `(width, height)` of a block of lines.
    ///
    /// Width is the widest line; height is one line height per line. An empty
    /// block measures `(0, 0)`.
    fn measure_block(&self, lines: &[String], font_size: f32) -> (f32, f32) {
        let width = lines
            .iter()
            .map(|line| self.measure_line(line, font_size))
            .fold(0.0, f32::max);
        let height = lines.len() as f32 * self.line_height(font_size);
        (width, height)
    }
}

/// Fixed-advance approximation of a proportional system font.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonospaceMetrics {
    /// Advance as a fraction of the font size.
    pub advance_ratio: f32,
    /// Line height as a multiple of the font size.
    pub line_height_ratio: f32,
}

impl Default for MonospaceMetrics {
    fn default() -> Self {
        Self {
            advance_ratio: 0.6,
            line_height_ratio: 1.2, // 20% line spacing
        }
    }
}

impl TextMetrics for MonospaceMetrics {
    fn advance(&self, c: char, font_size: f32) -> f32 {
        if c.is_control() {
            0.0
        } else {
            font_size * self.advance_ratio
        }
    }

    fn line_height(&self, font_size: f32) -> f32 {
        font_size * self.line_height_ratio
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn measures_widest_line() {
        let metrics = MonospaceMetrics::default();
        let lines = vec!["abc".to_string(), "abcdef".to_string()];
        let (width, height) = metrics.measure_block(&lines, 1.0);
        assert!((width - 3.6).abs() < 1e-5);
        assert!((height - 2.4).abs() < 1e-5);
    }

    #[test]
    fn empty_block_has_no_extent() {
        let metrics = MonospaceMetrics::default();
        assert_eq!(metrics.measure_block(&[], 0.15), (0.0, 0.0));
    }
}
