#![warn(missing_docs)]
//! Plane detection state derived from the AR tracking service.
//!
//! The tracking service reports anchors as they are discovered and refined.
//! Its delegate callbacks are not consumed directly: batches are posted into a
//! bounded [`TrackingEventQueue`] and drained once per frame by the scene
//! update loop, which feeds them to the [`PlaneTracker`].
//!
//! ```text
//! tracking thread ──TrackingSender::post──► TrackingEventQueue
//!                                                │ drain_into (once per tick)
//!                                                ▼
//!                                          PlaneTracker ──► subscribers(bool)
//! ```

mod event;
mod queue;
mod tracker;

pub use event::{AnchorKind, PlaneId, TrackingBatch, TrackingEvent};
pub use queue::{TrackingEventQueue, TrackingSender, DEFAULT_QUEUE_CAPACITY};
pub use tracker::{PlaneState, PlaneTracker, SubscriptionId, TrackedPlane};

use thiserror::Error;

/// Errors raised while posting tracking batches.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TrackingError {
    /// The per-frame queue is at capacity; the batch was dropped.
    #[error("tracking event queue is full (capacity {capacity})")]
    QueueFull {
        /// Queue capacity in batches.
        capacity: usize,
    },
    /// The update loop side of the queue has been dropped.
    #[error("tracking event queue is closed")]
    Closed,
}
