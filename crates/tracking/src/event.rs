//! Anchor events reported by the tracking service.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Stable identifier the tracking service assigns to a detected anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlaneId(pub u64);

/// Kind of anchor the tracking service reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnchorKind {
    /// A detected horizontal plane.
    HorizontalPlane,
    /// Anything else (images, faces, points). Ignored by plane detection.
    Other,
}

/// A single detection or refinement of an anchor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrackingEvent {
    /// Anchor identifier.
    pub id: PlaneId,
    /// Anchor kind.
    pub kind: AnchorKind,
    /// Reported extent as (width, height), in metres. Height is the plane's Z extent.
    pub extent: (f32, f32),
    /// Anchor centre in world space.
    #[serde(default)]
    pub center: Vec3,
}

impl TrackingEvent {
    /// A horizontal-plane event.
    pub fn plane(id: u64, center: Vec3, width: f32, height: f32) -> Self {
        Self {
            id: PlaneId(id),
            kind: AnchorKind::HorizontalPlane,
            extent: (width, height),
            center,
        }
    }

    /// A non-plane anchor event.
    pub fn other(id: u64) -> Self {
        Self {
            id: PlaneId(id),
            kind: AnchorKind::Other,
            extent: (0.0, 0.0),
            center: Vec3::ZERO,
        }
    }

    /// Whether this event reports a horizontal plane.
    pub fn is_plane(&self) -> bool {
        self.kind == AnchorKind::HorizontalPlane
    }

    /// Whether both reported extents are strictly positive.
    pub fn has_positive_extent(&self) -> bool {
        self.extent.0 > 0.0 && self.extent.1 > 0.0
    }
}

/// One delegate callback worth of events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "phase", content = "events", rename_all = "snake_case")]
pub enum TrackingBatch {
    /// Anchors discovered this frame.
    Added(Vec<TrackingEvent>),
    /// Anchors refined this frame.
    Updated(Vec<TrackingEvent>),
}

impl TrackingBatch {
    /// Events carried by the batch.
    pub fn events(&self) -> &[TrackingEvent] {
        match self {
            TrackingBatch::Added(events) | TrackingBatch::Updated(events) => events,
        }
    }
}
