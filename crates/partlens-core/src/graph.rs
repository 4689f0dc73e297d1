//! Engine seam: read and mutate the live scene graph through node handles

use bevy_math::Vec3;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::hash::Hash;

/// Kind of a scene-graph node as reported by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum NodeKind {
    /// Container produced for a whole scene
    Group,
    /// Positioned node without geometry of its own
    Object,
    /// Node carrying renderable geometry
    Mesh,
    #[default]
    Unknown,
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            NodeKind::Group => "Group",
            NodeKind::Object => "Object",
            NodeKind::Mesh => "Mesh",
            NodeKind::Unknown => "Unknown",
        };
        f.write_str(s)
    }
}

/// Translation axis of a node's local transform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// Return `v` with the component along this axis replaced by `value`
    pub fn with_component(self, mut v: Vec3, value: f32) -> Vec3 {
        match self {
            Axis::X => v.x = value,
            Axis::Y => v.y = value,
            Axis::Z => v.z = value,
        }
        v
    }

    pub fn component(self, v: Vec3) -> f32 {
        match self {
            Axis::X => v.x,
            Axis::Y => v.y,
            Axis::Z => v.z,
        }
    }
}

/// Direction a slider drives a part along its axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sign {
    #[default]
    Positive,
    Negative,
}

impl Sign {
    pub fn factor(self) -> f32 {
        match self {
            Sign::Positive => 1.0,
            Sign::Negative => -1.0,
        }
    }
}

/// Read access to the engine's node hierarchy.
///
/// `Node` is a weak handle: the engine owns the node and may drop it at any
/// time, so every accessor tolerates stale handles.
pub trait SceneGraph {
    type Node: Copy + Eq + Hash + Debug;

    /// Source-supplied name, if any
    fn name(&self, node: Self::Node) -> Option<&str>;

    fn kind(&self, node: Self::Node) -> NodeKind;

    /// Children in the engine's stable order
    fn children(&self, node: Self::Node) -> Vec<Self::Node>;
}

/// Transform access for nodes whose position the viewer drives
pub trait SceneGraphMut: SceneGraph {
    /// Local translation, `None` if the node no longer exists
    fn translation(&self, node: Self::Node) -> Option<Vec3>;

    /// Returns false if the node no longer exists
    fn set_translation(&mut self, node: Self::Node, translation: Vec3) -> bool;
}
