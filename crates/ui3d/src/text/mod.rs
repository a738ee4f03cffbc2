//! Text shaping and measurement
//!
//! Shaping turns raw place strings into display lines; measurement gives each
//! shaped block a world-space extent so the layout engine can stack blocks.

mod metrics;
mod shaping;

pub use metrics::{MonospaceMetrics, TextMetrics};
pub use shaping::{insert_line_breaks, number_comments, split_lines, truncate, wrap_words};
