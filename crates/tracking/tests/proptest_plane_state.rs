//! Property-based tests for plane detection
//!
//! Validates plane-state invariants:
//! - Any added horizontal plane makes a surface available
//! - Updated planes count only with strictly positive extents
//! - The state never regresses within a session

use glam::Vec3;
use proptest::prelude::*;
use waymark_tracking::{AnchorKind, PlaneId, PlaneState, PlaneTracker, TrackingEvent};

fn event_strategy() -> impl Strategy<Value = TrackingEvent> {
    (
        0u64..16,
        prop_oneof![Just(AnchorKind::HorizontalPlane), Just(AnchorKind::Other)],
        -2.0f32..2.0,
        -2.0f32..2.0,
    )
        .prop_map(|(id, kind, width, height)| TrackingEvent {
            id: PlaneId(id),
            kind,
            extent: (width, height),
            center: Vec3::ZERO,
        })
}

proptest! {
    /// Property: an added batch with any plane event makes a surface available
    #[test]
    fn added_plane_always_available(events in prop::collection::vec(event_strategy(), 0..8)) {
        let mut tracker = PlaneTracker::new();
        tracker.on_anchors_added(&events);

        let has_plane = events.iter().any(|e| e.kind == AnchorKind::HorizontalPlane);
        prop_assert_eq!(tracker.is_surface_available(), has_plane);
    }

    /// Property: an updated batch counts iff some plane has width > 0 and height > 0
    #[test]
    fn updated_requires_positive_extent(events in prop::collection::vec(event_strategy(), 0..8)) {
        let mut tracker = PlaneTracker::new();
        tracker.on_anchors_updated(&events);

        let usable = events.iter().any(|e| {
            e.kind == AnchorKind::HorizontalPlane && e.extent.0 > 0.0 && e.extent.1 > 0.0
        });
        let expected = if usable { PlaneState::SurfaceAvailable } else { PlaneState::NoSurface };
        prop_assert_eq!(tracker.state(), expected);
    }

    /// Property: once available, no sequence of batches reverts the state
    #[test]
    fn state_is_monotonic(
        batches in prop::collection::vec(
            (any::<bool>(), prop::collection::vec(event_strategy(), 0..4)),
            1..12,
        ),
    ) {
        let mut tracker = PlaneTracker::new();
        let mut was_available = false;
        for (added, events) in &batches {
            if *added {
                tracker.on_anchors_added(events);
            } else {
                tracker.on_anchors_updated(events);
            }
            if was_available {
                prop_assert!(tracker.is_surface_available());
            }
            was_available = tracker.is_surface_available();
        }
    }
}
