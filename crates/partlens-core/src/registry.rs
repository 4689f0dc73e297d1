//! Part registry - maps raw node identifiers of a loaded model to live nodes
//!
//! The registry is built once when a model finishes loading by walking the
//! model's node tree in pre-order. Its structure is fixed afterwards; only
//! the transforms of the nodes it points at change (through the engine).

use std::collections::HashMap;
use std::hash::Hash;

use tracing::{debug, info, warn};

use crate::error::PartError;
use crate::graph::{Axis, NodeKind, SceneGraph, SceneGraphMut, Sign};

/// Prefix for identifiers synthesized for nodes without a name
pub const UNNAMED_PREFIX: &str = "Unnamed_";

/// Metadata for one node of a loaded model
#[derive(Debug, Clone, PartialEq)]
pub struct PartDescriptor<N> {
    /// Unique identifier within the model (source name or synthetic)
    pub raw_id: String,
    /// Source name, or the synthetic `Unnamed_<k>` placeholder
    pub display_name: String,
    pub kind: NodeKind,
    /// Weak handle to the engine-owned node
    pub node: N,
    /// Identifier of the parent part, `None` for the traversal root
    pub parent: Option<String>,
}

/// Registry of every node in a loaded model, in traversal order
#[derive(Debug, Clone)]
pub struct PartRegistry<N> {
    parts: Vec<PartDescriptor<N>>,
    by_id: HashMap<String, usize>,
    by_node: HashMap<N, usize>,
}

impl<N: Copy + Eq + Hash> PartRegistry<N> {
    /// Registry for a model that has not loaded (or failed to load)
    pub fn empty() -> Self {
        Self {
            parts: Vec::new(),
            by_id: HashMap::new(),
            by_node: HashMap::new(),
        }
    }

    /// Build the registry by walking `root` and all of its descendants.
    ///
    /// Traversal is pre-order in the engine's child order, so repeated builds
    /// over the same asset assign the same identifiers. Unnamed nodes get
    /// `Unnamed_<k>` with `k` counting unnamed nodes from 1. Duplicate names
    /// get a `.001`, `.002`, ... suffix so every node keeps its own entry.
    pub fn build<G>(graph: &G, root: Option<N>) -> Result<Self, PartError>
    where
        G: SceneGraph<Node = N>,
    {
        let Some(root) = root else {
            warn!("Cannot build part registry: model root is missing");
            return Err(PartError::MissingRoot);
        };

        let mut registry = Self::empty();
        let mut unnamed = 0usize;
        let mut stack: Vec<(N, Option<String>)> = vec![(root, None)];

        while let Some((node, parent)) = stack.pop() {
            if registry.by_node.contains_key(&node) {
                let seen = registry.id_of(node).unwrap_or_default();
                warn!("Node \"{}\" reached twice during traversal, skipping", seen);
                continue;
            }

            let source_name = graph.name(node).filter(|name| !name.is_empty());
            let (candidate, display_name) = match source_name {
                Some(name) => (name.to_string(), name.to_string()),
                None => {
                    unnamed += 1;
                    let synthetic = format!("{}{}", UNNAMED_PREFIX, unnamed);
                    (synthetic.clone(), synthetic)
                }
            };

            let raw_id = registry.unique_id(candidate);
            let kind = graph.kind(node);
            debug!("{:<25} {}", format!("Name: {}", raw_id), format!("Type: {}", kind));

            let index = registry.parts.len();
            registry.by_id.insert(raw_id.clone(), index);
            registry.by_node.insert(node, index);
            registry.parts.push(PartDescriptor {
                raw_id: raw_id.clone(),
                display_name,
                kind,
                node,
                parent,
            });

            for child in graph.children(node).into_iter().rev() {
                stack.push((child, Some(raw_id.clone())));
            }
        }

        info!(
            "Part registry built: {} nodes ({} unnamed)",
            registry.parts.len(),
            unnamed
        );
        Ok(registry)
    }

    /// Pick an identifier not yet used in this registry
    fn unique_id(&self, candidate: String) -> String {
        if !self.by_id.contains_key(&candidate) {
            return candidate;
        }

        let mut suffix = 1usize;
        loop {
            let renamed = format!("{}.{:03}", candidate, suffix);
            if !self.by_id.contains_key(&renamed) {
                warn!("Duplicate node name '{}' registered as '{}'", candidate, renamed);
                return renamed;
            }
            suffix += 1;
        }
    }

    pub fn lookup(&self, raw_id: &str) -> Option<&PartDescriptor<N>> {
        self.by_id.get(raw_id).map(|&i| &self.parts[i])
    }

    /// Identifier registered for an engine node
    pub fn id_of(&self, node: N) -> Option<&str> {
        self.by_node
            .get(&node)
            .map(|&i| self.parts[i].raw_id.as_str())
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Parts in traversal order
    pub fn iter(&self) -> impl Iterator<Item = &PartDescriptor<N>> {
        self.parts.iter()
    }

    /// Set the part's local position along `axis` to `sign * magnitude`,
    /// leaving the other axes untouched.
    pub fn move_part<G>(
        &self,
        graph: &mut G,
        raw_id: &str,
        axis: Axis,
        magnitude: f32,
        sign: Sign,
    ) -> Result<(), PartError>
    where
        G: SceneGraphMut<Node = N>,
    {
        let Some(part) = self.lookup(raw_id) else {
            warn!("Part \"{}\" not found or invalid", raw_id);
            return Err(PartError::NotFound(raw_id.to_string()));
        };

        let Some(current) = graph.translation(part.node) else {
            warn!("Part \"{}\" no longer exists in the scene", raw_id);
            return Err(PartError::NodeGone(raw_id.to_string()));
        };

        let updated = axis.with_component(current, sign.factor() * magnitude);
        if !graph.set_translation(part.node, updated) {
            warn!("Part \"{}\" no longer exists in the scene", raw_id);
            return Err(PartError::NodeGone(raw_id.to_string()));
        }

        debug!(
            "Updated {} position.{:?} to {}",
            raw_id,
            axis,
            axis.component(updated)
        );
        Ok(())
    }

    /// Map a hit node to the part a user meant to select.
    ///
    /// Engines split a mesh node into primitive children, so a `Mesh` hit
    /// climbs to its first non-mesh ancestor. Any other node is selected as
    /// is. Returns `None` for nodes outside this model.
    pub fn resolve_selectable(&self, node: N) -> Option<&str> {
        let mut part = self.by_node.get(&node).map(|&i| &self.parts[i])?;

        while part.kind == NodeKind::Mesh {
            match part.parent.as_deref().and_then(|id| self.lookup(id)) {
                Some(parent) => part = parent,
                None => break,
            }
        }

        Some(part.raw_id.as_str())
    }
}

impl<N: Copy + Eq + Hash> Default for PartRegistry<N> {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MemoryScene;
    use bevy_math::Vec3;

    /// Sketchfab-style export: scene group, wrappers, hemispheres with mesh children
    fn brain_scene() -> (MemoryScene, usize) {
        let mut scene = MemoryScene::new();
        let root = scene.add(None, Some("Sketchfab_Scene"), NodeKind::Group);
        let model = scene.add(Some(root), Some("Sketchfab_model"), NodeKind::Object);
        let inner = scene.add(Some(model), Some("Root"), NodeKind::Object);
        let right = scene.add(Some(inner), Some("Brain001"), NodeKind::Object);
        scene.add(Some(right), Some("Brain001_0"), NodeKind::Mesh);
        scene.add(Some(right), Some("Brain001_0_1"), NodeKind::Mesh);
        let cerebellum = scene.add(Some(inner), Some("Brain002"), NodeKind::Object);
        scene.add(Some(cerebellum), Some("Brain002_0"), NodeKind::Mesh);
        let left = scene.add(Some(inner), Some("Brain003"), NodeKind::Object);
        scene.add(Some(left), Some("Brain003_0"), NodeKind::Mesh);
        scene.add(Some(left), None, NodeKind::Mesh);
        (scene, root)
    }

    #[test]
    fn test_build_registers_every_node_once() {
        let (scene, root) = brain_scene();
        let registry = PartRegistry::build(&scene, Some(root)).unwrap();

        assert_eq!(registry.len(), scene.len());
        for node in 0..scene.len() {
            assert!(registry.id_of(node).is_some(), "node {} missing", node);
        }

        let ids: Vec<&str> = registry.iter().map(|p| p.raw_id.as_str()).collect();
        assert_eq!(
            ids,
            vec![
                "Sketchfab_Scene",
                "Sketchfab_model",
                "Root",
                "Brain001",
                "Brain001_0",
                "Brain001_0_1",
                "Brain002",
                "Brain002_0",
                "Brain003",
                "Brain003_0",
                "Unnamed_1",
            ]
        );
    }

    #[test]
    fn test_build_is_deterministic() {
        let (scene, root) = brain_scene();
        let first = PartRegistry::build(&scene, Some(root)).unwrap();
        let second = PartRegistry::build(&scene, Some(root)).unwrap();

        let a: Vec<_> = first.iter().map(|p| (p.raw_id.clone(), p.node)).collect();
        let b: Vec<_> = second.iter().map(|p| (p.raw_id.clone(), p.node)).collect();
        assert_eq!(a, b);
    }

    #[test]
    fn test_unnamed_ids_increase_in_traversal_order() {
        let mut scene = MemoryScene::new();
        let root = scene.add(None, None, NodeKind::Group);
        let a = scene.add(Some(root), Some("A"), NodeKind::Object);
        scene.add(Some(a), None, NodeKind::Mesh);
        scene.add(Some(a), Some(""), NodeKind::Mesh);
        scene.add(Some(root), None, NodeKind::Mesh);

        let registry = PartRegistry::build(&scene, Some(root)).unwrap();
        let unnamed: Vec<&str> = registry
            .iter()
            .filter(|p| p.raw_id.starts_with(UNNAMED_PREFIX))
            .map(|p| p.raw_id.as_str())
            .collect();

        assert_eq!(unnamed, vec!["Unnamed_1", "Unnamed_2", "Unnamed_3", "Unnamed_4"]);
        assert_eq!(registry.lookup("Unnamed_1").unwrap().display_name, "Unnamed_1");
        assert_eq!(registry.lookup("Unnamed_1").unwrap().kind, NodeKind::Group);
    }

    #[test]
    fn test_duplicate_names_stay_distinct() {
        let mut scene = MemoryScene::new();
        let root = scene.add(None, Some("Scene"), NodeKind::Group);
        let first = scene.add(Some(root), Some("Part"), NodeKind::Mesh);
        let second = scene.add(Some(root), Some("Part"), NodeKind::Mesh);
        let third = scene.add(Some(root), Some("Part"), NodeKind::Mesh);

        let registry = PartRegistry::build(&scene, Some(root)).unwrap();

        assert_eq!(registry.len(), 4);
        assert_eq!(registry.id_of(first), Some("Part"));
        assert_eq!(registry.id_of(second), Some("Part.001"));
        assert_eq!(registry.id_of(third), Some("Part.002"));
        assert_eq!(registry.lookup("Part.002").unwrap().display_name, "Part");
    }

    #[test]
    fn test_synthetic_id_collision() {
        let mut scene = MemoryScene::new();
        let root = scene.add(None, Some("Unnamed_1"), NodeKind::Group);
        let child = scene.add(Some(root), None, NodeKind::Mesh);

        let registry = PartRegistry::build(&scene, Some(root)).unwrap();
        assert_eq!(registry.id_of(child), Some("Unnamed_1.001"));
    }

    #[test]
    fn test_missing_root() {
        let scene = MemoryScene::new();
        let result = PartRegistry::build(&scene, None);
        assert_eq!(result.unwrap_err(), PartError::MissingRoot);
    }

    #[test]
    fn test_lookup_unknown_id() {
        let (scene, root) = brain_scene();
        let registry = PartRegistry::build(&scene, Some(root)).unwrap();

        assert!(registry.lookup("Brain999").is_none());
        assert!(PartRegistry::<usize>::empty().lookup("Brain001").is_none());
    }

    #[test]
    fn test_move_part_sets_single_axis() {
        let (mut scene, root) = brain_scene();
        let registry = PartRegistry::build(&scene, Some(root)).unwrap();
        let node = registry.lookup("Brain001").unwrap().node;
        scene.set_translation(node, Vec3::new(1.0, 2.0, 3.0));

        registry
            .move_part(&mut scene, "Brain001", Axis::X, 5.0, Sign::Positive)
            .unwrap();
        assert_eq!(scene.translation(node), Some(Vec3::new(5.0, 2.0, 3.0)));

        registry
            .move_part(&mut scene, "Brain001", Axis::X, 5.0, Sign::Negative)
            .unwrap();
        assert_eq!(scene.translation(node), Some(Vec3::new(-5.0, 2.0, 3.0)));

        registry
            .move_part(&mut scene, "Brain001", Axis::Z, 0.5, Sign::Positive)
            .unwrap();
        assert_eq!(scene.translation(node), Some(Vec3::new(-5.0, 2.0, 0.5)));
    }

    #[test]
    fn test_move_part_not_found() {
        let (mut scene, root) = brain_scene();
        let registry = PartRegistry::build(&scene, Some(root)).unwrap();

        let result = registry.move_part(&mut scene, "Brain999", Axis::Y, 1.0, Sign::Positive);
        assert_eq!(result, Err(PartError::NotFound("Brain999".to_string())));
    }

    #[test]
    fn test_move_part_node_gone() {
        let (mut scene, root) = brain_scene();
        let registry = PartRegistry::build(&scene, Some(root)).unwrap();
        let node = registry.lookup("Brain002").unwrap().node;
        scene.remove(node);

        let result = registry.move_part(&mut scene, "Brain002", Axis::Y, 1.0, Sign::Positive);
        assert_eq!(result, Err(PartError::NodeGone("Brain002".to_string())));
    }

    #[test]
    fn test_resolve_selectable_climbs_past_meshes() {
        let mut scene = MemoryScene::new();
        let root = scene.add(None, Some("Root"), NodeKind::Group);
        let part = scene.add(Some(root), Some("Brain003"), NodeKind::Object);
        let mesh = scene.add(Some(part), Some("Brain003.Mesh"), NodeKind::Mesh);
        let primitive = scene.add(Some(mesh), None, NodeKind::Mesh);
        let loose = scene.add(Some(root), Some("Loose"), NodeKind::Object);

        let registry = PartRegistry::build(&scene, Some(root)).unwrap();

        assert_eq!(registry.resolve_selectable(primitive), Some("Brain003"));
        assert_eq!(registry.resolve_selectable(mesh), Some("Brain003"));
        assert_eq!(registry.resolve_selectable(part), Some("Brain003"));

        // Non-mesh hits never climb, even to a labelled ancestor
        assert_eq!(registry.resolve_selectable(loose), Some("Loose"));
        assert_eq!(registry.resolve_selectable(root), Some("Root"));

        // Nodes outside the model resolve to nothing
        assert_eq!(registry.resolve_selectable(999), None);
    }

    #[test]
    fn test_resolve_selectable_mesh_root() {
        let mut scene = MemoryScene::new();
        let root = scene.add(None, Some("Solo"), NodeKind::Mesh);
        let child = scene.add(Some(root), None, NodeKind::Mesh);

        let registry = PartRegistry::build(&scene, Some(root)).unwrap();
        assert_eq!(registry.resolve_selectable(child), Some("Solo"));
    }
}
