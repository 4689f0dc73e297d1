//! In-memory scene graph used by unit tests

use bevy_math::Vec3;

use crate::graph::{NodeKind, SceneGraph, SceneGraphMut};

struct MemoryNode {
    name: Option<String>,
    kind: NodeKind,
    translation: Vec3,
    children: Vec<usize>,
}

/// Arena-backed tree; node handles are indices, removed nodes leave a hole
pub struct MemoryScene {
    nodes: Vec<Option<MemoryNode>>,
}

impl MemoryScene {
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    pub fn add(&mut self, parent: Option<usize>, name: Option<&str>, kind: NodeKind) -> usize {
        let id = self.nodes.len();
        self.nodes.push(Some(MemoryNode {
            name: name.map(str::to_string),
            kind,
            translation: Vec3::ZERO,
            children: Vec::new(),
        }));
        if let Some(Some(parent)) = parent.and_then(|p| self.nodes.get_mut(p)) {
            parent.children.push(id);
        }
        id
    }

    pub fn remove(&mut self, node: usize) {
        if let Some(slot) = self.nodes.get_mut(node) {
            *slot = None;
        }
    }

    /// Number of nodes ever added
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    fn node(&self, node: usize) -> Option<&MemoryNode> {
        self.nodes.get(node).and_then(Option::as_ref)
    }
}

impl SceneGraph for MemoryScene {
    type Node = usize;

    fn name(&self, node: usize) -> Option<&str> {
        self.node(node).and_then(|n| n.name.as_deref())
    }

    fn kind(&self, node: usize) -> NodeKind {
        self.node(node).map(|n| n.kind).unwrap_or_default()
    }

    fn children(&self, node: usize) -> Vec<usize> {
        self.node(node)
            .map(|n| n.children.clone())
            .unwrap_or_default()
    }
}

impl SceneGraphMut for MemoryScene {
    fn translation(&self, node: usize) -> Option<Vec3> {
        self.node(node).map(|n| n.translation)
    }

    fn set_translation(&mut self, node: usize, translation: Vec3) -> bool {
        match self.nodes.get_mut(node).and_then(Option::as_mut) {
            Some(n) => {
                n.translation = translation;
                true
            }
            None => false,
        }
    }
}
