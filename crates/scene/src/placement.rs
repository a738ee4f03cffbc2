//! Placement service - surface raycast to anchored object to label
//!
//! `place` is all-or-nothing: either an anchor with exactly one object child
//! is appended to the scene, or nothing changes. Labels arrive later through
//! [`PlacementService::drain_metadata`].

use crate::catalog::{CatalogError, ObjectCatalog};
use crate::graph::{LabelPart, NodeId, NodeKind, PlacedObject, SceneGraph};
use crate::metadata::{GeocodeRequest, Geocoder, MetadataInbox, MetadataSender};
use crate::placemark::Placemark;
use crate::raycast::{RaycastContext, RaycastHit, Raycaster, SurfaceQuery};
use crate::SceneError;
use thiserror::Error;
use tracing::{debug, info, warn};
use waymark_camera::{Viewer, Viewport};
use waymark_core::{GeoCoordinate, WorldTransform};
use waymark_tracking::PlaneTracker;
use waymark_ui3d::{CommentIndex, LabelGeometry, LabelLayoutEngine};

#[derive(Debug, Error)]
pub enum PlacementError {
    /// No horizontal surface yet; the request is dropped without side effects
    #[error("no horizontal surface detected yet")]
    SurfaceUnavailable,
    #[error("no surface under the reticle")]
    NoSurfaceHit,
    #[error("failed to load object `{kind}`: {source}")]
    ObjectLoadFailed {
        kind: String,
        #[source]
        source: CatalogError,
    },
    #[error(transparent)]
    Scene(#[from] SceneError),
}

impl PlacementError {
    /// Short machine-readable reason.
    pub fn reason(&self) -> &'static str {
        match self {
            PlacementError::SurfaceUnavailable => "surface_unavailable",
            PlacementError::NoSurfaceHit => "no_surface_hit",
            PlacementError::ObjectLoadFailed { .. } => "object_load_failed",
            PlacementError::Scene(_) => "scene",
        }
    }
}

/// Outcome of a successful placement
#[derive(Debug, Clone, PartialEq)]
pub struct Placed {
    pub anchor: NodeId,
    pub object: NodeId,
    pub kind: String,
    pub transform: WorldTransform,
    /// Whether a reverse-geocoding request went out
    pub geocode_requested: bool,
}

/// What happened to one resolved placemark
#[derive(Debug, Clone, PartialEq)]
pub enum LabelAttachment {
    Attached {
        object: NodeId,
        label: NodeId,
        place_name: String,
        /// Label root that was replaced, if the object already had one
        replaced: Option<NodeId>,
    },
    /// The object was deleted before its metadata arrived
    TargetGone { object: NodeId },
}

/// How far a deletion reached
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeletionScope {
    /// The nearest anchor ancestor and its whole subtree
    Anchor,
    /// No anchor above the target; only the target subtree
    TargetOnly,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Deletion {
    pub target: NodeId,
    pub removed_root: NodeId,
    pub removed: Vec<NodeId>,
    pub scope: DeletionScope,
}

/// Remove the anchor owning `target`, or just `target` when it has none.
pub fn delete_with_anchor(graph: &mut SceneGraph, target: NodeId) -> Result<Deletion, SceneError> {
    let (removed_root, scope) = match graph.nearest_anchor(target) {
        Some(anchor) => (anchor, DeletionScope::Anchor),
        None => (target, DeletionScope::TargetOnly),
    };
    let removed = graph.remove_subtree(removed_root)?;
    info!(
        target = %target,
        root = %removed_root,
        removed = removed.len(),
        scope = ?scope,
        "deleted from scene"
    );
    Ok(Deletion {
        target,
        removed_root,
        removed,
        scope,
    })
}

/// Places catalog objects on detected surfaces and labels them
pub struct PlacementService {
    catalog: Box<dyn ObjectCatalog>,
    raycaster: Box<dyn Raycaster>,
    geocoder: Box<dyn Geocoder>,
    layout: LabelLayoutEngine,
    comments: CommentIndex,
    inbox: MetadataInbox,
    device_location: Option<GeoCoordinate>,
}

impl std::fmt::Debug for PlacementService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlacementService")
            .field("kinds", &self.catalog.kinds())
            .field("comment_places", &self.comments.len())
            .field("device_location", &self.device_location)
            .finish_non_exhaustive()
    }
}

impl PlacementService {
    pub fn new(
        catalog: Box<dyn ObjectCatalog>,
        raycaster: Box<dyn Raycaster>,
        geocoder: Box<dyn Geocoder>,
    ) -> Self {
        Self {
            catalog,
            raycaster,
            geocoder,
            layout: LabelLayoutEngine::default(),
            comments: CommentIndex::global().clone(),
            inbox: MetadataInbox::new(),
            device_location: None,
        }
    }

    /// Builder: Set the label layout engine
    pub fn with_layout(mut self, layout: LabelLayoutEngine) -> Self {
        self.layout = layout;
        self
    }

    /// Builder: Set the comment table used for ranking
    pub fn with_comments(mut self, comments: CommentIndex) -> Self {
        self.comments = comments;
        self
    }

    /// Builder: Set the device location sent to the geocoder
    pub fn with_device_location(mut self, location: Option<GeoCoordinate>) -> Self {
        self.device_location = location;
        self
    }

    pub fn set_device_location(&mut self, location: Option<GeoCoordinate>) {
        self.device_location = location;
    }

    pub fn device_location(&self) -> Option<GeoCoordinate> {
        self.device_location
    }

    pub fn comments(&self) -> &CommentIndex {
        &self.comments
    }

    pub fn layout(&self) -> &LabelLayoutEngine {
        &self.layout
    }

    pub fn catalog(&self) -> &dyn ObjectCatalog {
        self.catalog.as_ref()
    }

    /// Reply handle for geocoders living outside the service.
    pub fn metadata_sender(&self) -> MetadataSender {
        self.inbox.sender()
    }

    /// First surface under the view centre, ignoring plane state.
    pub fn aim(&self, tracker: &PlaneTracker, viewer: &Viewer, viewport: &Viewport) -> Option<RaycastHit> {
        let ctx = RaycastContext {
            viewer,
            viewport,
            planes: tracker,
        };
        self.raycaster
            .raycast(&SurfaceQuery::view_center(viewport), &ctx)
            .into_iter()
            .next()
    }

    /// Anchor a new `kind` object on the surface under the view centre.
    pub fn place(
        &mut self,
        graph: &mut SceneGraph,
        tracker: &PlaneTracker,
        viewer: &Viewer,
        viewport: &Viewport,
        kind: &str,
    ) -> Result<Placed, PlacementError> {
        if !tracker.is_surface_available() {
            debug!(kind, "placement ignored, no surface yet");
            return Err(PlacementError::SurfaceUnavailable);
        }

        let Some(hit) = self.aim(tracker, viewer, viewport) else {
            debug!(kind, "raycast found no surface");
            return Err(PlacementError::NoSurfaceHit);
        };

        let template = self.catalog.load(kind).map_err(|source| {
            warn!(kind, error = %source, "failed to load object");
            PlacementError::ObjectLoadFailed {
                kind: kind.to_string(),
                source,
            }
        })?;

        let anchor = graph.add_anchor(hit.transform);
        let object = match graph.add_child(
            anchor,
            NodeKind::Object(PlacedObject {
                name: template.kind.clone(),
                kind: template.kind.clone(),
                bounds: template.bounds,
            }),
            WorldTransform::IDENTITY,
        ) {
            Ok(object) => object,
            Err(err) => {
                graph.remove_subtree(anchor)?;
                return Err(err.into());
            }
        };

        info!(
            anchor = %anchor,
            object = %object,
            kind = %template.kind,
            position = ?hit.transform.translation(),
            "object placed"
        );

        let geocode_requested = match self.device_location {
            Some(coordinate) => {
                self.geocoder.request(GeocodeRequest {
                    object,
                    coordinate,
                    reply: self.inbox.sender(),
                });
                true
            }
            None => {
                debug!(object = %object, "no device location, object stays unlabeled");
                false
            }
        };

        Ok(Placed {
            anchor,
            object,
            kind: template.kind,
            transform: hit.transform,
            geocode_requested,
        })
    }

    /// Attach labels for every placemark that arrived since the last call.
    pub fn drain_metadata(&self, graph: &mut SceneGraph) -> Vec<LabelAttachment> {
        let mut attachments = Vec::new();
        for resolved in self.inbox.drain() {
            match self.attach_label(graph, resolved.object, &resolved.placemark) {
                Ok(attachment) => attachments.push(attachment),
                Err(err) => warn!(object = %resolved.object, error = %err, "label attachment failed"),
            }
        }
        attachments
    }

    /// Throw away placemarks that arrived but were never applied.
    pub fn discard_metadata(&self) -> usize {
        self.inbox.drain().len()
    }

    /// Build the label for `placemark` and hang it under `object`.
    ///
    /// An existing label on the object is replaced. A deleted object is not
    /// an error; the placemark is discarded.
    pub fn attach_label(
        &self,
        graph: &mut SceneGraph,
        object: NodeId,
        placemark: &Placemark,
    ) -> Result<LabelAttachment, SceneError> {
        let Some(host) = graph.object(object) else {
            debug!(object = %object, "metadata for deleted object discarded");
            return Ok(LabelAttachment::TargetGone { object });
        };

        let place_name = placemark.place_name(&host.kind);
        let place_detail = placemark.place_detail();
        let comments = self
            .comments
            .top_comments(&place_name, self.layout.style().comment_limit);
        let geometry = self
            .layout
            .build_label(&place_name, &place_detail, &comments, &host.bounds);

        let replaced = match graph.label_of(object) {
            Some(old) => {
                graph.remove_subtree(old)?;
                Some(old)
            }
            None => None,
        };

        let label = insert_label(graph, object, geometry)?;
        if let Some(host) = graph.object_mut(object) {
            host.name = place_name.clone();
        }

        info!(
            object = %object,
            label = %label,
            place = %place_name,
            comments = comments.len(),
            replaced = replaced.is_some(),
            "label attached"
        );

        Ok(LabelAttachment::Attached {
            object,
            label,
            place_name,
            replaced,
        })
    }
}

/// Label root plus its four parts, background first.
fn insert_label(
    graph: &mut SceneGraph,
    object: NodeId,
    geometry: LabelGeometry,
) -> Result<NodeId, SceneError> {
    let root_offset = geometry.root_offset();
    let offsets = LabelPart::ORDER.map(|part| match part {
        LabelPart::Background => geometry.background().transform.position,
        LabelPart::Text(role) => geometry.block_offset(role),
    });

    let root = graph.add_child(
        object,
        NodeKind::LabelRoot(Box::new(geometry)),
        WorldTransform::from_translation(root_offset),
    )?;
    for (part, offset) in LabelPart::ORDER.into_iter().zip(offsets) {
        graph.add_child(
            root,
            NodeKind::LabelPart(part),
            WorldTransform::from_translation(offset),
        )?;
    }
    Ok(root)
}
