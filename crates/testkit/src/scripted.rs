//! Scripted stand-ins for the collaborators a device would provide.

use glam::Vec3;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::debug;
use waymark_core::WorldTransform;
use waymark_scene::{
    CommentComposer, CommentRequest, GeocodeRequest, Geocoder, NodeId, Placemark,
    RaycastContext, RaycastHit, Raycaster, SurfaceQuery,
};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Raycaster that ignores the camera and returns fixed hits.
#[derive(Debug, Clone, Default)]
pub struct ScriptedRaycaster {
    hits: Vec<RaycastHit>,
}

impl ScriptedRaycaster {
    /// Always hit `point`, `distance` metres away.
    pub fn at(point: Vec3, distance: f32) -> Self {
        Self {
            hits: vec![RaycastHit {
                transform: WorldTransform::from_translation(point),
                distance,
            }],
        }
    }

    /// Never hit anything.
    pub fn miss() -> Self {
        Self::default()
    }
}

impl Raycaster for ScriptedRaycaster {
    fn raycast(&self, _query: &SurfaceQuery, _ctx: &RaycastContext<'_>) -> Vec<RaycastHit> {
        self.hits.clone()
    }
}

/// Geocoder that parks requests until a test answers them.
///
/// Clones share the same request list, so a test keeps one handle while the
/// session owns the other. Requests are kept after answering so any of them
/// can be answered again.
#[derive(Debug, Clone, Default)]
pub struct ManualGeocoder {
    inner: Arc<Mutex<Parked>>,
}

#[derive(Debug, Default)]
struct Parked {
    requests: Vec<GeocodeRequest>,
    answered: Vec<bool>,
}

impl ManualGeocoder {
    /// Requests received over the geocoder's lifetime.
    pub fn received(&self) -> usize {
        lock(&self.inner).requests.len()
    }

    /// Requests still waiting for a first answer.
    pub fn pending(&self) -> usize {
        lock(&self.inner).answered.iter().filter(|done| !**done).count()
    }

    /// Object the `index`-th request was made for.
    pub fn object(&self, index: usize) -> Option<NodeId> {
        lock(&self.inner).requests.get(index).map(|request| request.object)
    }

    /// Answer the `index`-th request. Returns false when there is no such
    /// request or the session has gone away.
    pub fn answer(&self, index: usize, placemark: Placemark) -> bool {
        let request = {
            let mut parked = lock(&self.inner);
            let Some(request) = parked.requests.get(index).cloned() else {
                return false;
            };
            parked.answered[index] = true;
            request
        };
        request.respond(placemark)
    }

    /// Answer the oldest request that has not been answered yet.
    pub fn answer_next(&self, placemark: Placemark) -> bool {
        let next = lock(&self.inner).answered.iter().position(|done| !*done);
        match next {
            Some(index) => self.answer(index, placemark),
            None => false,
        }
    }
}

impl Geocoder for ManualGeocoder {
    fn request(&mut self, request: GeocodeRequest) {
        debug!(object = %request.object, "geocode request parked");
        let mut parked = lock(&self.inner);
        parked.requests.push(request);
        parked.answered.push(false);
    }
}

/// Comment editor that records what it was asked to open.
#[derive(Debug, Clone, Default)]
pub struct RecordingComposer {
    requests: Arc<Mutex<Vec<CommentRequest>>>,
}

impl RecordingComposer {
    /// Everything composed so far, oldest first.
    pub fn requests(&self) -> Vec<CommentRequest> {
        lock(&self.requests).clone()
    }
}

impl CommentComposer for RecordingComposer {
    fn compose(&mut self, request: CommentRequest) {
        lock(&self.requests).push(request);
    }
}
