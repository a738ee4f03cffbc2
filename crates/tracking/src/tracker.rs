//! Plane Detection Tracker.

use crate::event::{PlaneId, TrackingBatch, TrackingEvent};
use glam::Vec3;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Whether a usable horizontal surface has been detected this session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum PlaneState {
    /// Nothing usable has been reported yet.
    #[default]
    NoSurface,
    /// At least one horizontal plane is being tracked.
    SurfaceAvailable,
}

impl PlaneState {
    /// The boolean published to subscribers.
    pub fn is_available(self) -> bool {
        self == PlaneState::SurfaceAvailable
    }
}

/// A horizontal plane currently known to the tracker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackedPlane {
    /// Anchor identifier.
    pub id: PlaneId,
    /// Plane centre in world space.
    pub center: Vec3,
    /// Extent along world X and Z.
    pub extent: (f32, f32),
}

impl TrackedPlane {
    /// Whether the XZ projection of `point` falls inside the plane's extent.
    pub fn contains_xz(&self, point: Vec3) -> bool {
        let half_w = self.extent.0 * 0.5;
        let half_h = self.extent.1 * 0.5;
        (point.x - self.center.x).abs() <= half_w && (point.z - self.center.z).abs() <= half_h
    }
}

/// Handle returned by [`PlaneTracker::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(bool) + Send>;

/// Single writer of [`PlaneState`].
///
/// The state only ever moves from `NoSurface` to `SurfaceAvailable`; losing
/// tracking is left to the tracking service. [`PlaneTracker::reset`] exists for
/// session teardown.
pub struct PlaneTracker {
    state: PlaneState,
    planes: BTreeMap<PlaneId, TrackedPlane>,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
}

impl Default for PlaneTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for PlaneTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaneTracker")
            .field("state", &self.state)
            .field("planes", &self.planes.len())
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl PlaneTracker {
    /// Tracker with no detected surface.
    pub fn new() -> Self {
        Self {
            state: PlaneState::NoSurface,
            planes: BTreeMap::new(),
            listeners: Vec::new(),
            next_subscription: 1,
        }
    }

    /// Current state.
    pub fn state(&self) -> PlaneState {
        self.state
    }

    /// Shorthand for `state().is_available()`.
    pub fn is_surface_available(&self) -> bool {
        self.state.is_available()
    }

    /// Horizontal planes reported so far, ordered by id.
    pub fn planes(&self) -> impl Iterator<Item = &TrackedPlane> {
        self.planes.values()
    }

    /// Number of tracked planes.
    pub fn plane_count(&self) -> usize {
        self.planes.len()
    }

    /// Handle anchors discovered by the tracking service.
    ///
    /// Any horizontal plane in the batch makes a surface available, whatever its
    /// extent. Returns `true` if the state changed.
    pub fn on_anchors_added(&mut self, events: &[TrackingEvent]) -> bool {
        let mut saw_plane = false;
        for event in events.iter().filter(|e| e.is_plane()) {
            saw_plane = true;
            self.planes.insert(event.id, plane_from_event(event));
        }

        saw_plane && self.publish(PlaneState::SurfaceAvailable)
    }

    /// Handle anchors refined by the tracking service.
    ///
    /// Only a plane with both extents strictly positive makes a surface
    /// available. Returns `true` if the state changed.
    pub fn on_anchors_updated(&mut self, events: &[TrackingEvent]) -> bool {
        let mut usable = false;
        for event in events.iter().filter(|e| e.is_plane()) {
            self.planes.insert(event.id, plane_from_event(event));
            usable |= event.has_positive_extent();
        }

        usable && self.publish(PlaneState::SurfaceAvailable)
    }

    /// Route a queued batch to the matching handler.
    pub fn apply(&mut self, batch: &TrackingBatch) -> bool {
        match batch {
            TrackingBatch::Added(events) => self.on_anchors_added(events),
            TrackingBatch::Updated(events) => self.on_anchors_updated(events),
        }
    }

    /// Register a listener. It is called once with the current value, then on
    /// every transition.
    pub fn subscribe(&mut self, mut listener: impl FnMut(bool) + Send + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        listener(self.state.is_available());
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener. Returns `false` if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sub, _)| *sub != id);
        self.listeners.len() != before
    }

    /// Forget every plane and return to `NoSurface`. Session teardown only.
    pub fn reset(&mut self) {
        self.planes.clear();
        if self.state != PlaneState::NoSurface {
            self.state = PlaneState::NoSurface;
            self.notify();
        }
    }

    fn publish(&mut self, state: PlaneState) -> bool {
        if self.state == state {
            return false;
        }
        info!(?state, planes = self.planes.len(), "plane state changed");
        self.state = state;
        self.notify();
        true
    }

    fn notify(&mut self) {
        let value = self.state.is_available();
        debug!(value, listeners = self.listeners.len(), "publishing plane state");
        for (_, listener) in &mut self.listeners {
            listener(value);
        }
    }
}

fn plane_from_event(event: &TrackingEvent) -> TrackedPlane {
    TrackedPlane {
        id: event.id,
        center: event.center,
        extent: event.extent,
    }
}
