//! Scene side of waymark: anchoring objects on detected surfaces and hanging
//! place labels off them.
//!
//! ```text
//! TrackingSender ──► ArSession::tick ──► PlaneTracker
//!                         │
//!   request_placement ──► PlacementService::place ──► anchor ─► object
//!                         │                              │
//!   Geocoder ─MetadataSender─► MetadataInbox ──► label root ─► 4 parts
//!                         │
//!                         └──► update_billboards (every frame)
//! ```
//!
//! Collaborators sit behind traits ([`Raycaster`], [`ObjectCatalog`],
//! [`Geocoder`], [`CommentComposer`]) so a session runs the same headless as
//! on a device.

mod catalog;
mod graph;
mod interaction;
mod metadata;
mod placemark;
mod placement;
mod raycast;
mod session;

pub use catalog::{CatalogEntry, CatalogError, ObjectCatalog, ObjectTemplate, StaticCatalog, DEFAULT_KINDS};
pub use graph::{
    LabelPart, Node, NodeId, NodeKind, PlacedObject, SceneGraph, MAX_SCENE_DEPTH,
};
pub use interaction::{
    hit_test, ActionMenu, CommentComposer, CommentRequest, InteractionOutcome, InteractionRouter,
    LoggingComposer, MenuChoice, PressHit,
};
pub use metadata::{
    GeocodeRequest, Geocoder, MetadataInbox, MetadataSender, NullGeocoder, ResolvedMetadata,
};
pub use placemark::Placemark;
pub use placement::{
    delete_with_anchor, Deletion, DeletionScope, LabelAttachment, Placed, PlacementError,
    PlacementService,
};
pub use raycast::{
    EstimationMode, HorizontalPlaneRaycaster, RaycastContext, RaycastHit, Raycaster,
    SurfaceQuery,
};
pub use session::{
    update_billboards, AnchorSnapshot, ArSession, ObjectSnapshot, SceneSnapshot, SessionEvent,
    TickSummary, TimedEvent,
};

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SceneError {
    #[error("scene node {0} does not exist")]
    MissingNode(NodeId),
    #[error("cannot attach below {parent}: scene trees are at most {max} levels deep")]
    DepthExceeded { parent: NodeId, max: usize },
}
