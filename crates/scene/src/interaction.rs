//! Interaction router - long-press hit testing and the object action menu

use crate::graph::{LabelPart, NodeId, NodeKind, SceneGraph};
use crate::placement::{delete_with_anchor, Deletion};
use crate::SceneError;
use glam::Vec2;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use waymark_camera::{Ray, Viewer, Viewport};
use waymark_ui3d::{raycast_oriented_quad, CommentIndex};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MenuChoice {
    Comment,
    Delete,
    Cancel,
}

impl MenuChoice {
    pub const ALL: [MenuChoice; 3] = [MenuChoice::Comment, MenuChoice::Delete, MenuChoice::Cancel];
}

/// Nearest thing under a screen point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PressHit {
    /// Node actually hit (object or label background)
    pub node: NodeId,
    /// Object owning that node
    pub object: NodeId,
    pub distance: f32,
}

/// Command menu opened on a placed object
#[derive(Debug, Clone, PartialEq)]
pub struct ActionMenu {
    pub hit: PressHit,
    pub options: [MenuChoice; 3],
}

impl ActionMenu {
    pub fn object(&self) -> NodeId {
        self.hit.object
    }
}

/// Hand-off to the comment editor
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommentRequest {
    pub object: NodeId,
    pub place_name: String,
    /// Most recent stored comment for the place, empty if none
    pub initial_comment: String,
}

/// External comment editor
pub trait CommentComposer {
    fn compose(&mut self, request: CommentRequest);
}

/// Composer that only logs
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingComposer;

impl CommentComposer for LoggingComposer {
    fn compose(&mut self, request: CommentRequest) {
        info!(object = %request.object, place = %request.place_name, "comment requested");
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum InteractionOutcome {
    CommentRequested(CommentRequest),
    Deleted(Deletion),
    Cancelled,
}

/// Nearest object volume or label background along `ray`.
pub fn hit_test(graph: &SceneGraph, ray: &Ray) -> Option<PressHit> {
    let mut best: Option<PressHit> = None;
    let mut consider = |node: NodeId, distance: f32| {
        let Some(object) = graph.owning_object(node) else {
            return;
        };
        if best.map_or(true, |hit| distance < hit.distance) {
            best = Some(PressHit {
                node,
                object,
                distance,
            });
        }
    };

    for object in graph.objects() {
        let (Some(placed), Some(world)) = (graph.object(object), graph.world_transform(object)) else {
            continue;
        };
        let inverse = world.matrix().inverse();
        let origin = inverse.transform_point3(ray.origin);
        let direction = inverse.transform_vector3(ray.direction);
        if let Some(distance) = placed.bounds.ray_intersection(origin, direction) {
            consider(object, distance);
        }
    }

    for label in graph.label_roots() {
        let Some(geometry) = graph.label_geometry(label) else {
            continue;
        };
        let Some(background) = graph.node(label).and_then(|root| {
            root.children().iter().copied().find(|child| {
                graph
                    .node(*child)
                    .is_some_and(|node| node.kind() == &NodeKind::LabelPart(LabelPart::Background))
            })
        }) else {
            continue;
        };
        let Some(world) = graph.world_transform(background) else {
            continue;
        };
        if let Some(hit) = raycast_oriented_quad(
            ray.origin,
            ray.direction,
            world.translation(),
            world.rotation(),
            geometry.background_size(),
        ) {
            consider(background, hit.distance);
        }
    }

    best
}

/// Maps long presses to objects and runs the chosen command
#[derive(Debug, Clone, Copy, Default)]
pub struct InteractionRouter;

impl InteractionRouter {
    /// Open the action menu for whatever object lies under `point`.
    pub fn long_press(
        &self,
        graph: &SceneGraph,
        viewer: &Viewer,
        viewport: &Viewport,
        point: Vec2,
    ) -> Option<ActionMenu> {
        if !viewport.contains(point) {
            return None;
        }
        let ray = viewer.screen_to_ray(point, viewport);
        let hit = hit_test(graph, &ray);
        match hit {
            Some(hit) => debug!(node = %hit.node, object = %hit.object, "long press hit"),
            None => debug!(x = point.x, y = point.y, "long press hit nothing"),
        }
        hit.map(|hit| ActionMenu {
            hit,
            options: MenuChoice::ALL,
        })
    }

    /// Run `choice` for the menu's object.
    pub fn dispatch(
        &self,
        graph: &mut SceneGraph,
        menu: &ActionMenu,
        choice: MenuChoice,
        comments: &CommentIndex,
        composer: &mut dyn CommentComposer,
    ) -> Result<InteractionOutcome, SceneError> {
        match choice {
            MenuChoice::Comment => {
                let object = graph
                    .object(menu.object())
                    .ok_or(SceneError::MissingNode(menu.object()))?;
                let request = CommentRequest {
                    object: menu.object(),
                    place_name: object.name.clone(),
                    initial_comment: comments.latest_comment(&object.name),
                };
                composer.compose(request.clone());
                Ok(InteractionOutcome::CommentRequested(request))
            }
            MenuChoice::Delete => {
                delete_with_anchor(graph, menu.hit.node).map(InteractionOutcome::Deleted)
            }
            MenuChoice::Cancel => Ok(InteractionOutcome::Cancelled),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::PlacedObject;
    use glam::Vec3;
    use waymark_core::{Aabb, WorldTransform};

    #[derive(Default)]
    struct Recorder(Vec<CommentRequest>);

    impl CommentComposer for Recorder {
        fn compose(&mut self, request: CommentRequest) {
            self.0.push(request);
        }
    }

    fn scene_with_object(at: Vec3, name: &str) -> (SceneGraph, NodeId, NodeId) {
        let mut graph = SceneGraph::new();
        let anchor = graph.add_anchor(WorldTransform::from_translation(at));
        let object = graph
            .add_child(
                anchor,
                NodeKind::Object(PlacedObject {
                    kind: "Drummer".into(),
                    name: name.into(),
                    bounds: Aabb::grounded(Vec3::splat(0.4)),
                }),
                WorldTransform::IDENTITY,
            )
            .unwrap();
        (graph, anchor, object)
    }

    fn ray_at(target: Vec3) -> Ray {
        let origin = Vec3::new(0.0, 1.0, 2.0);
        Ray {
            origin,
            direction: (target - origin).normalize(),
        }
    }

    #[test]
    fn hit_test_finds_object_volume() {
        let (graph, _, object) = scene_with_object(Vec3::ZERO, "Drummer");
        let hit = hit_test(&graph, &ray_at(Vec3::new(0.0, 0.2, 0.0))).unwrap();
        assert_eq!(hit.object, object);
        assert_eq!(hit.node, object);
        assert!(hit_test(&graph, &ray_at(Vec3::new(3.0, 0.2, 0.0))).is_none());
    }

    #[test]
    fn nearest_object_wins() {
        let (mut graph, _, far) = scene_with_object(Vec3::new(0.0, 0.0, -2.0), "Far");
        let anchor = graph.add_anchor(WorldTransform::IDENTITY);
        let near = graph
            .add_child(
                anchor,
                NodeKind::Object(PlacedObject {
                    kind: "RocketToy".into(),
                    name: "Near".into(),
                    bounds: Aabb::grounded(Vec3::splat(0.4)),
                }),
                WorldTransform::IDENTITY,
            )
            .unwrap();
        let ray = Ray {
            origin: Vec3::new(0.0, 0.2, 3.0),
            direction: Vec3::NEG_Z,
        };
        let hit = hit_test(&graph, &ray).unwrap();
        assert_eq!(hit.object, near);
        assert_ne!(hit.object, far);
    }

    #[test]
    fn comment_uses_latest_stored_comment() {
        let (mut graph, _, object) = scene_with_object(Vec3::ZERO, "Haijun Park");
        let menu = ActionMenu {
            hit: PressHit {
                node: object,
                object,
                distance: 1.0,
            },
            options: MenuChoice::ALL,
        };
        let mut recorder = Recorder::default();
        let outcome = InteractionRouter
            .dispatch(
                &mut graph,
                &menu,
                MenuChoice::Comment,
                &CommentIndex::builtin(),
                &mut recorder,
            )
            .unwrap();

        assert_eq!(recorder.0.len(), 1);
        assert_eq!(recorder.0[0].place_name, "Haijun Park");
        assert_eq!(recorder.0[0].initial_comment, "Beautiful sea view !");
        assert!(matches!(outcome, InteractionOutcome::CommentRequested(_)));
    }

    #[test]
    fn delete_and_cancel() {
        let (mut graph, anchor, object) = scene_with_object(Vec3::ZERO, "Drummer");
        let menu = ActionMenu {
            hit: PressHit {
                node: object,
                object,
                distance: 1.0,
            },
            options: MenuChoice::ALL,
        };
        let mut recorder = Recorder::default();
        let index = CommentIndex::default();

        let cancelled = InteractionRouter
            .dispatch(&mut graph, &menu, MenuChoice::Cancel, &index, &mut recorder)
            .unwrap();
        assert_eq!(cancelled, InteractionOutcome::Cancelled);
        assert_eq!(graph.len(), 2);

        let deleted = InteractionRouter
            .dispatch(&mut graph, &menu, MenuChoice::Delete, &index, &mut recorder)
            .unwrap();
        let InteractionOutcome::Deleted(deletion) = deleted else {
            panic!("expected deletion");
        };
        assert_eq!(deletion.removed_root, anchor);
        assert!(graph.is_empty());
        assert!(recorder.0.is_empty());
    }

    #[test]
    fn press_outside_viewport_is_ignored() {
        let (graph, _, _) = scene_with_object(Vec3::ZERO, "Drummer");
        let viewport = Viewport::default();
        let menu = InteractionRouter.long_press(
            &graph,
            &Viewer::default(),
            &viewport,
            Vec2::new(-10.0, 5.0),
        );
        assert!(menu.is_none());
    }
}
