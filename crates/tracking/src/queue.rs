//! Bounded, ordered hand-off between the tracking service and the update loop.

use crate::event::TrackingBatch;
use crate::tracker::PlaneTracker;
use crate::TrackingError;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::{self, Receiver, SyncSender, TryRecvError, TrySendError};
use std::sync::Arc;
use tracing::{debug, warn};

/// Default number of batches buffered between two frames.
pub const DEFAULT_QUEUE_CAPACITY: usize = 64;

/// Producer side, handed to the tracking service. Cheap to clone.
#[derive(Debug, Clone)]
pub struct TrackingSender {
    tx: SyncSender<TrackingBatch>,
    capacity: usize,
    dropped: Arc<AtomicUsize>,
}

impl TrackingSender {
    /// Post a batch without blocking. A full queue drops the batch.
    pub fn post(&self, batch: TrackingBatch) -> Result<(), TrackingError> {
        match self.tx.try_send(batch) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(batch)) => {
                self.dropped.fetch_add(1, Ordering::Relaxed);
                warn!(
                    capacity = self.capacity,
                    events = batch.events().len(),
                    "tracking queue full, dropping batch"
                );
                Err(TrackingError::QueueFull {
                    capacity: self.capacity,
                })
            }
            Err(TrySendError::Disconnected(_)) => Err(TrackingError::Closed),
        }
    }
}

/// Consumer side, owned by the update loop.
#[derive(Debug)]
pub struct TrackingEventQueue {
    rx: Receiver<TrackingBatch>,
    capacity: usize,
    dropped: Arc<AtomicUsize>,
}

impl TrackingEventQueue {
    /// Create a queue holding at most `capacity` batches (minimum 1).
    pub fn bounded(capacity: usize) -> (TrackingSender, TrackingEventQueue) {
        let capacity = capacity.max(1);
        let (tx, rx) = mpsc::sync_channel(capacity);
        let dropped = Arc::new(AtomicUsize::new(0));
        (
            TrackingSender {
                tx,
                capacity,
                dropped: Arc::clone(&dropped),
            },
            TrackingEventQueue {
                rx,
                capacity,
                dropped,
            },
        )
    }

    /// Queue capacity in batches.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Batches rejected because the queue was full.
    pub fn dropped(&self) -> usize {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Pop the oldest batch, if any.
    pub fn try_next(&self) -> Option<TrackingBatch> {
        match self.rx.try_recv() {
            Ok(batch) => Some(batch),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }

    /// Feed queued batches to `tracker` in arrival order.
    ///
    /// At most `capacity` batches are consumed per call so a chatty producer
    /// cannot stall the frame. Returns the number of batches applied.
    pub fn drain_into(&self, tracker: &mut PlaneTracker) -> usize {
        let mut applied = 0;
        while applied < self.capacity {
            let Some(batch) = self.try_next() else {
                break;
            };
            tracker.apply(&batch);
            applied += 1;
        }
        if applied > 0 {
            debug!(applied, "drained tracking batches");
        }
        applied
    }
}
