//! Per-frame AR session update loop
//!
//! All scene mutation happens inside [`ArSession`] on the thread that calls
//! [`ArSession::tick`]. Other threads reach it only through a
//! [`TrackingSender`] or a [`MetadataSender`].

use crate::graph::{NodeId, SceneGraph};
use crate::interaction::{
    ActionMenu, CommentComposer, InteractionOutcome, InteractionRouter, LoggingComposer, MenuChoice,
};
use crate::metadata::MetadataSender;
use crate::placement::{LabelAttachment, Placed, PlacementError, PlacementService};
use crate::raycast::RaycastHit;
use crate::SceneError;
use glam::{Vec2, Vec3};
use serde::Serialize;
use std::collections::VecDeque;
use std::sync::mpsc::{self, Receiver};
use tracing::{debug, info, warn};
use waymark_camera::{Viewer, Viewport};
use waymark_core::{FrameTick, WorldTransform};
use waymark_tracking::{
    PlaneState, PlaneTracker, TrackingEventQueue, TrackingSender, DEFAULT_QUEUE_CAPACITY,
};
use waymark_ui3d::LabelReport;

/// Something observable that happened during a session
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SessionEvent {
    SurfaceAvailability {
        available: bool,
    },
    PlacementCompleted {
        anchor: NodeId,
        object: NodeId,
        kind: String,
    },
    PlacementRejected {
        kind: String,
        reason: String,
    },
    GeocodeRequested {
        object: NodeId,
    },
    LabelAttached {
        object: NodeId,
        label: NodeId,
        place_name: String,
        replaced: Option<NodeId>,
    },
    LabelDiscarded {
        object: NodeId,
    },
    MenuOpened {
        object: NodeId,
        node: NodeId,
    },
    CommentRequested {
        object: NodeId,
        place_name: String,
        initial_comment: String,
    },
    Deleted {
        target: NodeId,
        removed_root: NodeId,
        removed: usize,
    },
    MenuCancelled {
        object: NodeId,
    },
}

impl SessionEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            SessionEvent::SurfaceAvailability { .. } => "surface_availability",
            SessionEvent::PlacementCompleted { .. } => "placement_completed",
            SessionEvent::PlacementRejected { .. } => "placement_rejected",
            SessionEvent::GeocodeRequested { .. } => "geocode_requested",
            SessionEvent::LabelAttached { .. } => "label_attached",
            SessionEvent::LabelDiscarded { .. } => "label_discarded",
            SessionEvent::MenuOpened { .. } => "menu_opened",
            SessionEvent::CommentRequested { .. } => "comment_requested",
            SessionEvent::Deleted { .. } => "deleted",
            SessionEvent::MenuCancelled { .. } => "menu_cancelled",
        }
    }
}

/// Event stamped with the frame it happened in
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimedEvent {
    pub tick: FrameTick,
    #[serde(flatten)]
    pub event: SessionEvent,
}

/// What one call to [`ArSession::tick`] did
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickSummary {
    pub tick: FrameTick,
    pub tracking_batches: usize,
    pub placement: Option<Result<NodeId, &'static str>>,
    pub labels_attached: usize,
    pub billboards_updated: usize,
}

/// Re-orient every billboarded label root towards the viewer.
pub fn update_billboards(graph: &mut SceneGraph, viewer: &Viewer) -> usize {
    let camera_up = viewer.up();
    let mut updated = 0;
    for label in graph.label_roots() {
        let Some(billboard) = graph.label_geometry(label).map(|geometry| geometry.billboard()) else {
            continue;
        };
        let (Some(node), Some(parent_world)) = (
            graph.node(label),
            graph
                .node(label)
                .and_then(|node| node.parent())
                .and_then(|parent| graph.world_transform(parent)),
        ) else {
            continue;
        };
        let offset = node.local().translation();
        let position = parent_world.transform_point(offset);
        let Some(world_rotation) = billboard.facing_rotation(position, viewer.position, camera_up)
        else {
            continue;
        };
        let local_rotation = parent_world.rotation().inverse() * world_rotation;
        if graph
            .set_local(label, WorldTransform::from_rotation_translation(local_rotation, offset))
            .is_ok()
        {
            updated += 1;
        }
    }
    updated
}

/// Serialisable view of the scene
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SceneSnapshot {
    pub tick: FrameTick,
    pub surface_available: bool,
    pub anchors: Vec<AnchorSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnchorSnapshot {
    pub id: NodeId,
    pub position: [f32; 3],
    pub objects: Vec<ObjectSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObjectSnapshot {
    pub id: NodeId,
    pub kind: String,
    pub name: String,
    pub label: Option<LabelReport>,
}

/// The cooperative per-frame update loop
pub struct ArSession {
    frame: FrameTick,
    graph: SceneGraph,
    tracker: PlaneTracker,
    tracking: TrackingEventQueue,
    tracking_tx: TrackingSender,
    surface_rx: Receiver<bool>,
    placement: PlacementService,
    router: InteractionRouter,
    composer: Box<dyn CommentComposer>,
    viewport: Viewport,
    viewer: Viewer,
    pending: VecDeque<String>,
    reticle: Option<RaycastHit>,
    events: Vec<TimedEvent>,
}

impl std::fmt::Debug for ArSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArSession")
            .field("frame", &self.frame)
            .field("nodes", &self.graph.len())
            .field("plane_state", &self.tracker.state())
            .field("pending", &self.pending)
            .finish_non_exhaustive()
    }
}

impl ArSession {
    pub fn new(placement: PlacementService, viewport: Viewport) -> Self {
        Self::with_queue_capacity(placement, viewport, DEFAULT_QUEUE_CAPACITY)
    }

    pub fn with_queue_capacity(
        placement: PlacementService,
        viewport: Viewport,
        tracking_queue_capacity: usize,
    ) -> Self {
        let (tracking_tx, tracking) = TrackingEventQueue::bounded(tracking_queue_capacity);
        let (surface_tx, surface_rx) = mpsc::channel();
        let mut tracker = PlaneTracker::new();
        tracker.subscribe(move |available| {
            // Receiver lives as long as the session
            let _ = surface_tx.send(available);
        });

        Self {
            frame: FrameTick::ZERO,
            graph: SceneGraph::new(),
            tracker,
            tracking,
            tracking_tx,
            surface_rx,
            placement,
            router: InteractionRouter,
            composer: Box::new(LoggingComposer),
            viewport,
            viewer: Viewer::default(),
            pending: VecDeque::new(),
            reticle: None,
            events: Vec::new(),
        }
    }

    /// Builder: Set the comment editor collaborator
    pub fn with_composer(mut self, composer: Box<dyn CommentComposer>) -> Self {
        self.composer = composer;
        self
    }

    pub fn frame(&self) -> FrameTick {
        self.frame
    }

    pub fn graph(&self) -> &SceneGraph {
        &self.graph
    }

    pub fn tracker(&self) -> &PlaneTracker {
        &self.tracker
    }

    pub fn plane_state(&self) -> PlaneState {
        self.tracker.state()
    }

    pub fn placement(&self) -> &PlacementService {
        &self.placement
    }

    pub fn placement_mut(&mut self) -> &mut PlacementService {
        &mut self.placement
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Viewer pose of the most recent tick.
    pub fn viewer(&self) -> &Viewer {
        &self.viewer
    }

    /// Surface under the reticle as of the last tick.
    pub fn reticle(&self) -> Option<RaycastHit> {
        self.reticle
    }

    /// Handle for the tracking service thread.
    pub fn tracking_sender(&self) -> TrackingSender {
        self.tracking_tx.clone()
    }

    /// Handle for geocoders answering on other threads.
    pub fn metadata_sender(&self) -> MetadataSender {
        self.placement.metadata_sender()
    }

    /// Tracking batches rejected because the queue was full.
    pub fn dropped_tracking_batches(&self) -> usize {
        self.tracking.dropped()
    }

    /// Queue a placement for the next tick.
    pub fn request_placement(&mut self, kind: impl Into<String>) {
        self.pending.push_back(kind.into());
    }

    pub fn pending_placements(&self) -> usize {
        self.pending.len()
    }

    fn record(&mut self, event: SessionEvent) {
        debug!(tick = self.frame.0, event = event.kind(), "session event");
        self.events.push(TimedEvent {
            tick: self.frame,
            event,
        });
    }

    /// Events recorded since the last drain.
    pub fn drain_events(&mut self) -> Vec<TimedEvent> {
        std::mem::take(&mut self.events)
    }

    /// Place immediately, outside the queued path.
    pub fn place(&mut self, kind: &str) -> Result<Placed, PlacementError> {
        let result = self.placement.place(
            &mut self.graph,
            &self.tracker,
            &self.viewer,
            &self.viewport,
            kind,
        );
        match &result {
            Ok(placed) => {
                self.record(SessionEvent::PlacementCompleted {
                    anchor: placed.anchor,
                    object: placed.object,
                    kind: placed.kind.clone(),
                });
                if placed.geocode_requested {
                    self.record(SessionEvent::GeocodeRequested {
                        object: placed.object,
                    });
                }
            }
            Err(err) => self.record(SessionEvent::PlacementRejected {
                kind: kind.to_string(),
                reason: err.reason().to_string(),
            }),
        }
        result
    }

    /// Run one frame.
    pub fn tick(&mut self, viewer: &Viewer) -> TickSummary {
        self.viewer = viewer.clone();
        let mut summary = TickSummary {
            tick: self.frame,
            ..Default::default()
        };

        // 1. tracking
        summary.tracking_batches = self.tracking.drain_into(&mut self.tracker);
        while let Ok(available) = self.surface_rx.try_recv() {
            self.record(SessionEvent::SurfaceAvailability { available });
        }

        // 2. reticle hint
        self.reticle = self
            .placement
            .aim(&self.tracker, &self.viewer, &self.viewport);

        // 3. at most one placement
        if let Some(kind) = self.pending.pop_front() {
            summary.placement = Some(match self.place(&kind) {
                Ok(placed) => Ok(placed.object),
                Err(err) => Err(err.reason()),
            });
        }

        // 4. metadata
        for attachment in self.placement.drain_metadata(&mut self.graph) {
            match attachment {
                LabelAttachment::Attached {
                    object,
                    label,
                    place_name,
                    replaced,
                } => {
                    summary.labels_attached += 1;
                    self.record(SessionEvent::LabelAttached {
                        object,
                        label,
                        place_name,
                        replaced,
                    });
                }
                LabelAttachment::TargetGone { object } => {
                    self.record(SessionEvent::LabelDiscarded { object });
                }
            }
        }

        // 5. billboards
        summary.billboards_updated = update_billboards(&mut self.graph, &self.viewer);

        // 6. advance
        self.frame = self.frame.advance(1);
        summary
    }

    /// Long press at a pixel; opens the menu for the object underneath.
    pub fn long_press(&mut self, point: Vec2) -> Option<ActionMenu> {
        let menu = self
            .router
            .long_press(&self.graph, &self.viewer, &self.viewport, point)?;
        self.record(SessionEvent::MenuOpened {
            object: menu.object(),
            node: menu.hit.node,
        });
        Some(menu)
    }

    /// Run the user's menu choice.
    pub fn choose(
        &mut self,
        menu: &ActionMenu,
        choice: MenuChoice,
    ) -> Result<InteractionOutcome, SceneError> {
        let outcome = self.router.dispatch(
            &mut self.graph,
            menu,
            choice,
            self.placement.comments(),
            self.composer.as_mut(),
        );
        match &outcome {
            Ok(InteractionOutcome::CommentRequested(request)) => {
                self.record(SessionEvent::CommentRequested {
                    object: request.object,
                    place_name: request.place_name.clone(),
                    initial_comment: request.initial_comment.clone(),
                })
            }
            Ok(InteractionOutcome::Deleted(deletion)) => self.record(SessionEvent::Deleted {
                target: deletion.target,
                removed_root: deletion.removed_root,
                removed: deletion.removed.len(),
            }),
            Ok(InteractionOutcome::Cancelled) => self.record(SessionEvent::MenuCancelled {
                object: menu.object(),
            }),
            Err(err) => warn!(object = %menu.object(), error = %err, "menu action failed"),
        }
        outcome
    }

    pub fn snapshot(&self) -> SceneSnapshot {
        let anchors = self
            .graph
            .anchors()
            .filter_map(|anchor| {
                let node = self.graph.node(anchor)?;
                let position = self
                    .graph
                    .world_transform(anchor)
                    .map(|world| world.translation())
                    .unwrap_or(Vec3::ZERO);
                let objects = node
                    .children()
                    .iter()
                    .filter_map(|child| {
                        let object = self.graph.object(*child)?;
                        Some(ObjectSnapshot {
                            id: *child,
                            kind: object.kind.clone(),
                            name: object.name.clone(),
                            label: self
                                .graph
                                .label_of(*child)
                                .and_then(|label| self.graph.label_geometry(label))
                                .map(|geometry| geometry.describe()),
                        })
                    })
                    .collect();
                Some(AnchorSnapshot {
                    id: anchor,
                    position: position.to_array(),
                    objects,
                })
            })
            .collect();

        SceneSnapshot {
            tick: self.frame,
            surface_available: self.tracker.is_surface_available(),
            anchors,
        }
    }

    /// Tear the session down to an empty scene with no surface.
    pub fn reset(&mut self) {
        let removed = self.graph.clear();
        let stale = self.placement.discard_metadata();
        while self.tracking.try_next().is_some() {}
        self.tracker.reset();
        self.pending.clear();
        self.reticle = None;
        info!(removed, stale, "session reset");
    }
}
