//! Scene graph arena
//!
//! Nodes live in a map keyed by [`NodeId`] and reference each other by id:
//! children know their parent, parents list their children. The tree is at
//! most [`MAX_SCENE_DEPTH`] levels deep (anchor, object, label root, label
//! part), so every upward walk is bounded.

use crate::SceneError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use waymark_core::{Aabb, WorldTransform};
use waymark_ui3d::{BlockRole, LabelGeometry};

/// Number of levels a scene tree may have, root included.
pub const MAX_SCENE_DEPTH: usize = 4;

/// Stable handle to a scene node; never reused within a graph.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct NodeId(pub u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A catalog object placed in the world
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedObject {
    /// Catalog kind, e.g. `Drummer`
    pub kind: String,
    /// Display name; the kind until a place name resolves
    pub name: String,
    /// Collision/selection volume in the object's local frame
    pub bounds: Aabb,
}

/// Child of a label root
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelPart {
    Background,
    Text(BlockRole),
}

impl LabelPart {
    /// Child order under a label root.
    pub const ORDER: [LabelPart; 4] = [
        LabelPart::Background,
        LabelPart::Text(BlockRole::Title),
        LabelPart::Text(BlockRole::Detail),
        LabelPart::Text(BlockRole::Comments),
    ];
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// World anchor pinned to a tracked pose
    Anchor,
    Object(PlacedObject),
    /// Billboarded label root carrying its full layout
    LabelRoot(Box<LabelGeometry>),
    LabelPart(LabelPart),
}

impl NodeKind {
    pub fn is_anchor(&self) -> bool {
        matches!(self, NodeKind::Anchor)
    }

    pub fn as_object(&self) -> Option<&PlacedObject> {
        match self {
            NodeKind::Object(object) => Some(object),
            _ => None,
        }
    }

    pub fn as_label(&self) -> Option<&LabelGeometry> {
        match self {
            NodeKind::LabelRoot(geometry) => Some(geometry),
            _ => None,
        }
    }

    fn tag(&self) -> &'static str {
        match self {
            NodeKind::Anchor => "anchor",
            NodeKind::Object(_) => "object",
            NodeKind::LabelRoot(_) => "label_root",
            NodeKind::LabelPart(_) => "label_part",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Node {
    id: NodeId,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    local: WorldTransform,
    kind: NodeKind,
}

impl Node {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Pose relative to the parent (or world, for roots).
    pub fn local(&self) -> WorldTransform {
        self.local
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }
}

/// Arena of scene nodes
#[derive(Debug, Default)]
pub struct SceneGraph {
    nodes: HashMap<NodeId, Node>,
    roots: Vec<NodeId>,
    next_id: u64,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self {
            nodes: HashMap::new(),
            roots: Vec::new(),
            next_id: 1,
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Drop every node. Ids keep counting up, so handles from before the
    /// clear never name a new node.
    pub fn clear(&mut self) -> usize {
        let removed = self.nodes.len();
        self.nodes.clear();
        self.roots.clear();
        removed
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    /// Root nodes in insertion order.
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Anchors in the order they were appended.
    pub fn anchors(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.roots
            .iter()
            .copied()
            .filter(|id| self.nodes.get(id).is_some_and(|node| node.kind.is_anchor()))
    }

    /// Every placed object, ordered by id.
    pub fn objects(&self) -> Vec<NodeId> {
        let mut objects: Vec<NodeId> = self
            .nodes
            .values()
            .filter(|node| node.kind.as_object().is_some())
            .map(|node| node.id)
            .collect();
        objects.sort();
        objects
    }

    pub fn object(&self, id: NodeId) -> Option<&PlacedObject> {
        self.nodes.get(&id).and_then(|node| node.kind.as_object())
    }

    pub(crate) fn object_mut(&mut self, id: NodeId) -> Option<&mut PlacedObject> {
        match self.nodes.get_mut(&id).map(|node| &mut node.kind) {
            Some(NodeKind::Object(object)) => Some(object),
            _ => None,
        }
    }

    fn allocate(&mut self) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Append a top-level node.
    pub fn add_root(&mut self, kind: NodeKind, local: WorldTransform) -> NodeId {
        let id = self.allocate();
        self.nodes.insert(
            id,
            Node {
                id,
                parent: None,
                children: Vec::new(),
                local,
                kind,
            },
        );
        self.roots.push(id);
        id
    }

    /// Append a world anchor at `transform`.
    pub fn add_anchor(&mut self, transform: WorldTransform) -> NodeId {
        self.add_root(NodeKind::Anchor, transform)
    }

    /// Attach a new node under `parent`.
    pub fn add_child(
        &mut self,
        parent: NodeId,
        kind: NodeKind,
        local: WorldTransform,
    ) -> Result<NodeId, SceneError> {
        let parent_depth = self.depth(parent).ok_or(SceneError::MissingNode(parent))?;
        if parent_depth + 1 >= MAX_SCENE_DEPTH {
            return Err(SceneError::DepthExceeded {
                parent,
                max: MAX_SCENE_DEPTH,
            });
        }

        let id = self.allocate();
        self.nodes.insert(
            id,
            Node {
                id,
                parent: Some(parent),
                children: Vec::new(),
                local,
                kind,
            },
        );
        if let Some(parent_node) = self.nodes.get_mut(&parent) {
            parent_node.children.push(id);
        }
        Ok(id)
    }

    pub fn set_local(&mut self, id: NodeId, local: WorldTransform) -> Result<(), SceneError> {
        let node = self.nodes.get_mut(&id).ok_or(SceneError::MissingNode(id))?;
        node.local = local;
        Ok(())
    }

    /// Ancestors of `id`, nearest first. Empty for roots and unknown ids.
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut chain = Vec::with_capacity(MAX_SCENE_DEPTH);
        let mut current = self.nodes.get(&id).and_then(|node| node.parent);
        while let Some(parent) = current {
            if chain.len() >= MAX_SCENE_DEPTH {
                break;
            }
            chain.push(parent);
            current = self.nodes.get(&parent).and_then(|node| node.parent);
        }
        chain
    }

    /// Zero for roots.
    pub fn depth(&self, id: NodeId) -> Option<usize> {
        self.nodes.get(&id).map(|_| self.ancestors(id).len())
    }

    /// Closest anchor strictly above `id`.
    pub fn nearest_anchor(&self, id: NodeId) -> Option<NodeId> {
        self.ancestors(id).into_iter().find(|ancestor| {
            self.nodes
                .get(ancestor)
                .is_some_and(|node| node.kind.is_anchor())
        })
    }

    /// `id` itself if it is an object, else its closest object ancestor.
    pub fn owning_object(&self, id: NodeId) -> Option<NodeId> {
        if self.object(id).is_some() {
            return Some(id);
        }
        self.ancestors(id)
            .into_iter()
            .find(|ancestor| self.object(*ancestor).is_some())
    }

    /// Label root attached to `object`, if any.
    pub fn label_of(&self, object: NodeId) -> Option<NodeId> {
        self.nodes.get(&object).and_then(|node| {
            node.children.iter().copied().find(|child| {
                self.nodes
                    .get(child)
                    .is_some_and(|child| child.kind.as_label().is_some())
            })
        })
    }

    pub fn label_geometry(&self, label_root: NodeId) -> Option<&LabelGeometry> {
        self.nodes.get(&label_root).and_then(|node| node.kind.as_label())
    }

    /// Every label root in the scene.
    pub fn label_roots(&self) -> Vec<NodeId> {
        let mut labels: Vec<NodeId> = self
            .nodes
            .values()
            .filter(|node| node.kind.as_label().is_some())
            .map(|node| node.id)
            .collect();
        labels.sort();
        labels
    }

    /// Pose of `id` in world space.
    pub fn world_transform(&self, id: NodeId) -> Option<WorldTransform> {
        let node = self.nodes.get(&id)?;
        let world = self
            .ancestors(id)
            .iter()
            .rev()
            .filter_map(|ancestor| self.nodes.get(ancestor))
            .fold(WorldTransform::IDENTITY, |acc, ancestor| acc.then(&ancestor.local));
        Some(world.then(&node.local))
    }

    /// Remove `id` and everything below it. Returns the removed ids, `id` first.
    pub fn remove_subtree(&mut self, id: NodeId) -> Result<Vec<NodeId>, SceneError> {
        let node = self.nodes.get(&id).ok_or(SceneError::MissingNode(id))?;
        match node.parent {
            Some(parent) => {
                if let Some(parent_node) = self.nodes.get_mut(&parent) {
                    parent_node.children.retain(|child| *child != id);
                }
            }
            None => self.roots.retain(|root| *root != id),
        }

        let mut removed = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.remove(&current) {
                stack.extend(node.children.iter().rev().copied());
                removed.push(current);
            }
        }
        Ok(removed)
    }

    /// Compact one-line-per-node dump, roots first.
    pub fn describe(&self) -> Vec<String> {
        let mut lines = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<(NodeId, usize)> = self.roots.iter().rev().map(|id| (*id, 0)).collect();
        while let Some((id, depth)) = stack.pop() {
            let Some(node) = self.nodes.get(&id) else {
                continue;
            };
            let name = node
                .kind
                .as_object()
                .map(|object| format!(" {}", object.name))
                .unwrap_or_default();
            lines.push(format!("{}{} {}{}", "  ".repeat(depth), id, node.kind.tag(), name));
            stack.extend(node.children.iter().rev().map(|child| (*child, depth + 1)));
        }
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Quat, Vec3};

    fn object(kind: &str) -> NodeKind {
        NodeKind::Object(PlacedObject {
            kind: kind.to_string(),
            name: kind.to_string(),
            bounds: Aabb::grounded(Vec3::ONE),
        })
    }

    fn full_tree(graph: &mut SceneGraph) -> (NodeId, NodeId, NodeId, NodeId) {
        let anchor = graph.add_anchor(WorldTransform::from_translation(Vec3::new(0.0, 0.0, -1.0)));
        let obj = graph.add_child(anchor, object("Drummer"), WorldTransform::IDENTITY).unwrap();
        let label = graph
            .add_child(obj, NodeKind::LabelPart(LabelPart::Background), WorldTransform::IDENTITY)
            .unwrap();
        let part = graph
            .add_child(label, NodeKind::LabelPart(LabelPart::Background), WorldTransform::IDENTITY)
            .unwrap();
        (anchor, obj, label, part)
    }

    #[test]
    fn ids_are_never_reused() {
        let mut graph = SceneGraph::new();
        let a = graph.add_anchor(WorldTransform::IDENTITY);
        graph.remove_subtree(a).unwrap();
        let b = graph.add_anchor(WorldTransform::IDENTITY);
        assert_ne!(a, b);
    }

    #[test]
    fn depth_is_bounded() {
        let mut graph = SceneGraph::new();
        let (_, _, _, part) = full_tree(&mut graph);
        assert_eq!(graph.depth(part), Some(3));
        let err = graph
            .add_child(part, NodeKind::LabelPart(LabelPart::Background), WorldTransform::IDENTITY)
            .unwrap_err();
        assert!(matches!(err, SceneError::DepthExceeded { max: 4, .. }));
    }

    #[test]
    fn nearest_anchor_from_deepest_node() {
        let mut graph = SceneGraph::new();
        let (anchor, obj, _, part) = full_tree(&mut graph);
        assert_eq!(graph.nearest_anchor(part), Some(anchor));
        assert_eq!(graph.owning_object(part), Some(obj));
        assert_eq!(graph.nearest_anchor(anchor), None);
    }

    #[test]
    fn remove_subtree_detaches_everything() {
        let mut graph = SceneGraph::new();
        let (anchor, obj, label, part) = full_tree(&mut graph);
        let other = graph.add_anchor(WorldTransform::IDENTITY);

        let removed = graph.remove_subtree(anchor).unwrap();
        assert_eq!(removed, vec![anchor, obj, label, part]);
        assert_eq!(graph.len(), 1);
        assert_eq!(graph.roots(), &[other]);
    }

    #[test]
    fn removing_child_updates_parent() {
        let mut graph = SceneGraph::new();
        let (anchor, obj, _, _) = full_tree(&mut graph);
        graph.remove_subtree(obj).unwrap();
        assert!(graph.node(anchor).unwrap().children().is_empty());
        assert!(matches!(
            graph.remove_subtree(obj),
            Err(SceneError::MissingNode(_))
        ));
    }

    #[test]
    fn world_transform_composes_parents() {
        let mut graph = SceneGraph::new();
        let anchor = graph.add_anchor(WorldTransform::from_rotation_translation(
            Quat::from_rotation_y(std::f32::consts::FRAC_PI_2),
            Vec3::new(1.0, 0.0, 0.0),
        ));
        let child = graph
            .add_child(
                anchor,
                object("RocketToy"),
                WorldTransform::from_translation(Vec3::new(0.0, 0.0, 1.0)),
            )
            .unwrap();
        let world = graph.world_transform(child).unwrap();
        // +Z rotated a quarter turn about Y lands on +X
        assert!(world.translation().abs_diff_eq(Vec3::new(2.0, 0.0, 0.0), 1e-5));
    }

    #[test]
    fn describe_lists_tree() {
        let mut graph = SceneGraph::new();
        full_tree(&mut graph);
        let lines = graph.describe();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "#1 anchor");
        assert_eq!(lines[1], "  #2 object Drummer");
    }
}
