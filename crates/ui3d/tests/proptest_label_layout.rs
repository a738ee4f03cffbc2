//! Property-based tests for label layout
//!
//! Validates layout invariants for arbitrary place metadata:
//! - Total height is the scaled block heights plus both spacings
//! - Neighbouring block centres are half-heights plus the spacing apart
//! - The label never overlaps its host horizontally
//! - Text always renders in front of the background

use glam::Vec3;
use proptest::prelude::*;
use waymark_core::Aabb;
use waymark_ui3d::LabelLayoutEngine;

const EPS: f32 = 1e-4;

fn host_strategy() -> impl Strategy<Value = Aabb> {
    (0.01f32..3.0, 0.01f32..3.0, 0.01f32..3.0, -1.0f32..1.0)
        .prop_map(|(x, y, z, shift)| Aabb::grounded(Vec3::new(x, y, z)).translated(Vec3::new(shift, 0.0, 0.0)))
}

fn comments_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-zA-Z !]{0,80}", 0..6)
}

proptest! {
    /// Property: H equals the sum of scaled heights plus both spacings
    #[test]
    fn total_height_matches_stack(
        name in "[a-zA-Z ]{0,60}",
        detail in "[a-zA-Z, ]{0,60}",
        comments in comments_strategy(),
        host in host_strategy(),
    ) {
        let engine = LabelLayoutEngine::default();
        let label = engine.build_label(&name, &detail, &comments, &host);
        let style = engine.style();

        let expected = label.scaled_heights().iter().sum::<f32>()
            + style.title_detail_spacing
            + style.detail_comment_spacing;
        prop_assert!((label.total_height() - expected).abs() < EPS);
        prop_assert!((label.background_size().1 - expected * style.background_overscan).abs() < EPS);
    }

    /// Property: neighbour centres differ by half of each height plus the spacing
    #[test]
    fn neighbour_spacing(
        name in "[a-zA-Z ]{0,60}",
        detail in "[a-zA-Z, ]{0,60}",
        comments in comments_strategy(),
    ) {
        let engine = LabelLayoutEngine::default();
        let label = engine.build_label(&name, &detail, &comments, &Aabb::grounded(Vec3::ONE));
        let style = engine.style();
        let h = label.scaled_heights();
        let y = label.block_offsets().map(|offset| offset.y);

        prop_assert!((y[0] - y[1] - (h[0] / 2.0 + style.title_detail_spacing + h[1] / 2.0)).abs() < EPS);
        prop_assert!((y[1] - y[2] - (h[1] / 2.0 + style.detail_comment_spacing + h[2] / 2.0)).abs() < EPS);
    }

    /// Property: the label's near edge lies beyond the host's far edge
    #[test]
    fn label_clears_host(
        name in "[a-zA-Z ]{0,60}",
        comments in comments_strategy(),
        host in host_strategy(),
    ) {
        let engine = LabelLayoutEngine::default();
        let label = engine.build_label(&name, "", &comments, &host);
        let near_edge = label.root_offset().x - label.total_width() / 2.0;
        prop_assert!(near_edge > host.max.x);
    }

    /// Property: every text block sits in front of the background panel
    #[test]
    fn text_in_front_of_background(name in "[a-zA-Z ]{0,60}") {
        let engine = LabelLayoutEngine::default();
        let label = engine.build_label(&name, "detail", &[], &Aabb::grounded(Vec3::ONE));
        let background_z = label.background().transform.position.z;
        for offset in label.block_offsets() {
            prop_assert!(offset.z > background_z);
        }
    }
}
