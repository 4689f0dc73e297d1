//! Bevy entity hierarchy exposed through the core scene-graph traits

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use partlens_core::{NodeKind, SceneGraph, SceneGraphMut};

/// Read/write view of the spawned model hierarchy
#[derive(SystemParam)]
pub struct EntityGraph<'w, 's> {
    names: Query<'w, 's, &'static Name>,
    children: Query<'w, 's, &'static Children>,
    meshes: Query<'w, 's, (), With<Mesh3d>>,
    scene_roots: Query<'w, 's, (), With<SceneRoot>>,
    transforms: Query<'w, 's, &'static mut Transform>,
}

impl SceneGraph for EntityGraph<'_, '_> {
    type Node = Entity;

    fn name(&self, node: Entity) -> Option<&str> {
        self.names.get(node).ok().map(|name| name.as_str())
    }

    fn kind(&self, node: Entity) -> NodeKind {
        if self.scene_roots.contains(node) {
            NodeKind::Group
        } else if self.meshes.contains(node) {
            NodeKind::Mesh
        } else if self.transforms.contains(node) {
            NodeKind::Object
        } else {
            NodeKind::Unknown
        }
    }

    fn children(&self, node: Entity) -> Vec<Entity> {
        self.children
            .get(node)
            .map(|children| children.iter().collect())
            .unwrap_or_default()
    }
}

impl SceneGraphMut for EntityGraph<'_, '_> {
    fn translation(&self, node: Entity) -> Option<Vec3> {
        self.transforms.get(node).ok().map(|t| t.translation)
    }

    fn set_translation(&mut self, node: Entity, translation: Vec3) -> bool {
        match self.transforms.get_mut(node) {
            Ok(mut transform) => {
                transform.translation = translation;
                true
            }
            Err(_) => false,
        }
    }
}
