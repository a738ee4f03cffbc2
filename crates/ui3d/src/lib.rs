//! 3D place labels for waymark
//!
//! This crate builds the information placard that floats beside a placed
//! object: a title, an address detail line and the top comments for the
//! place, stacked on a background panel that always faces the viewer.
//!
//! Nothing here talks to a GPU. The output is a [`LabelGeometry`]
//! description (text blocks, offsets, panel size, billboard behaviour) that a
//! renderer turns into meshes.
//!
//! # Example
//!
//! ```rust
//! use glam::Vec3;
//! use waymark_core::Aabb;
//! use waymark_ui3d::{CommentIndex, LabelLayoutEngine};
//!
//! let engine = LabelLayoutEngine::default();
//! let comments = CommentIndex::global().top_comments("Haijun Park", 3);
//! let host = Aabb::grounded(Vec3::new(0.4, 0.6, 0.4));
//!
//! let label = engine.build_label("Haijun Park", "Qingdao, Shandong, China", &comments, &host);
//! assert!(label.describe().billboarded);
//! assert!(label.root_offset().x > host.half_extents().x);
//! ```

pub mod comments;
pub mod components;
pub mod interaction;
pub mod layout;
pub mod text;

// Re-export commonly used types
pub use comments::{normalize_place_name, CommentIndex, CommentIndexError, PlaceComments};
pub use components::{
    Billboard, BillboardOrientation, BlockRole, LabelGeometry, LabelReport, Panel3D, PanelVertex,
    TextBlock, Transform3D,
};
pub use interaction::{raycast_oriented_quad, UIRaycastHit};
pub use layout::{BlockStyle, LabelLayoutEngine, LabelStyle};
pub use text::{
    insert_line_breaks, number_comments, truncate, wrap_words, MonospaceMetrics, TextMetrics,
};
