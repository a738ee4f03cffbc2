//! Asynchronous place metadata
//!
//! Geocoders run wherever they like and answer through a [`MetadataSender`].
//! Answers queue in the session's [`MetadataInbox`] until the update loop
//! drains it; nothing touches the scene from a geocoder thread.

use crate::graph::NodeId;
use crate::placemark::Placemark;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use tracing::debug;
use waymark_core::GeoCoordinate;

/// A geocoding answer for a placed object
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedMetadata {
    pub object: NodeId,
    pub placemark: Placemark,
}

/// Reply handle handed to geocoders; cheap to clone and `Send`
#[derive(Debug, Clone)]
pub struct MetadataSender {
    tx: Sender<ResolvedMetadata>,
}

impl MetadataSender {
    /// Deliver a placemark for `object`. Returns false once the session is gone.
    pub fn resolve(&self, object: NodeId, placemark: Placemark) -> bool {
        self.tx.send(ResolvedMetadata { object, placemark }).is_ok()
    }
}

/// Reverse-geocoding request for a freshly placed object
#[derive(Debug, Clone)]
pub struct GeocodeRequest {
    pub object: NodeId,
    pub coordinate: GeoCoordinate,
    pub reply: MetadataSender,
}

impl GeocodeRequest {
    pub fn respond(self, placemark: Placemark) -> bool {
        self.reply.resolve(self.object, placemark)
    }
}

/// Fire-and-forget reverse geocoding
///
/// Implementations may answer later, on any thread, or never. A request that
/// never resolves just leaves the object unlabeled.
pub trait Geocoder {
    fn request(&mut self, request: GeocodeRequest);
}

/// Geocoder that never answers
#[derive(Debug, Clone, Copy, Default)]
pub struct NullGeocoder;

impl Geocoder for NullGeocoder {
    fn request(&mut self, request: GeocodeRequest) {
        debug!(object = %request.object, "geocoding unavailable, request dropped");
    }
}

/// Receiving side of resolved metadata
#[derive(Debug)]
pub struct MetadataInbox {
    tx: Sender<ResolvedMetadata>,
    rx: Receiver<ResolvedMetadata>,
}

impl Default for MetadataInbox {
    fn default() -> Self {
        Self::new()
    }
}

impl MetadataInbox {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        Self { tx, rx }
    }

    pub fn sender(&self) -> MetadataSender {
        MetadataSender {
            tx: self.tx.clone(),
        }
    }

    /// Everything that arrived since the last drain, in arrival order.
    pub fn drain(&self) -> Vec<ResolvedMetadata> {
        let mut resolved = Vec::new();
        loop {
            match self.rx.try_recv() {
                Ok(item) => resolved.push(item),
                // The inbox holds its own sender, so Disconnected cannot happen
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        resolved
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn drains_in_arrival_order() {
        let inbox = MetadataInbox::new();
        let sender = inbox.sender();
        assert!(sender.resolve(NodeId(2), Placemark::named("A")));
        assert!(sender.resolve(NodeId(5), Placemark::named("B")));

        let drained = inbox.drain();
        assert_eq!(drained.len(), 2);
        assert_eq!(drained[0].object, NodeId(2));
        assert_eq!(drained[1].placemark.name.as_deref(), Some("B"));
        assert!(inbox.drain().is_empty());
    }

    #[test]
    fn answers_cross_threads() {
        let inbox = MetadataInbox::new();
        let request = GeocodeRequest {
            object: NodeId(7),
            coordinate: GeoCoordinate::new(36.06, 120.38),
            reply: inbox.sender(),
        };

        thread::spawn(move || request.respond(Placemark::named("Haijun Park")))
            .join()
            .unwrap();

        let drained = inbox.drain();
        assert_eq!(drained.len(), 1);
        assert_eq!(drained[0].object, NodeId(7));
    }

    #[test]
    fn sender_reports_closed_session() {
        let inbox = MetadataInbox::new();
        let sender = inbox.sender();
        drop(inbox);
        assert!(!sender.resolve(NodeId(1), Placemark::default()));
    }
}
