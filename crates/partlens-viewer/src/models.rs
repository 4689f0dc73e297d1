//! Model spawning and load tracking

use bevy::asset::LoadState;
use bevy::prelude::*;
use bevy::scene::{SceneInstance, SceneSpawner};
use partlens_core::{LoadEvent, LoadOutcome};

use crate::app::{Session, ViewerSettings};
use crate::graph::EntityGraph;

/// Plugin for model loading
pub struct ModelsPlugin;

impl Plugin for ModelsPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_model)
            .add_systems(Update, track_model_load);
    }
}

/// Marker component for the spawned model root
#[derive(Component)]
pub struct ModelRoot;

/// The model being loaded or shown
#[derive(Resource)]
pub struct LoadedModel {
    pub handle: Handle<Scene>,
    pub root: Entity,
    /// Last progress ratio passed to the session
    reported: Option<f32>,
}

fn spawn_model(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    settings: Res<ViewerSettings>,
    mut session: ResMut<Session>,
) {
    let model = &settings.model;
    let handle: Handle<Scene> =
        asset_server.load(GltfAssetLabel::Scene(0).from_asset(model.path.clone()));

    let [rx, ry, rz] = model.rotation;
    let root = commands
        .spawn((
            SceneRoot(handle.clone()),
            Transform::from_scale(Vec3::from_array(model.scale))
                .with_rotation(Quat::from_euler(EulerRot::XYZ, rx, ry, rz)),
            ModelRoot,
        ))
        .id();

    session.begin_load(&model.path);
    commands.insert_resource(LoadedModel {
        handle,
        root,
        reported: None,
    });
}

/// Poll the asset server and scene spawner, feeding load events to the session
fn track_model_load(
    mut session: ResMut<Session>,
    mut model: ResMut<LoadedModel>,
    asset_server: Res<AssetServer>,
    scene_spawner: Res<SceneSpawner>,
    instances: Query<&SceneInstance, With<ModelRoot>>,
    graph: EntityGraph,
) {
    if session.load_status().is_terminal() {
        return;
    }

    let event = match asset_server.get_load_state(model.handle.id()) {
        Some(LoadState::Failed(err)) => LoadEvent::Failure(err.to_string()),
        Some(LoadState::Loaded) => {
            // The asset is in memory; the part tree exists once the scene
            // instance has been spawned into the world
            let ready = instances
                .get(model.root)
                .map(|instance| scene_spawner.instance_is_ready(**instance))
                .unwrap_or(false);
            if ready {
                LoadEvent::Success(model.root)
            } else {
                LoadEvent::Progress(1.0)
            }
        }
        _ => LoadEvent::Progress(0.0),
    };

    if let LoadEvent::Progress(ratio) = event {
        if model.reported == Some(ratio) {
            return;
        }
        model.reported = Some(ratio);
    }

    match session.on_load_event(&graph, event) {
        Some(LoadOutcome::Loaded(_)) => {
            let parts = session.registry().map(|r| r.len()).unwrap_or(0);
            tracing::info!("Total number of objects in the model: {}", parts);
        }
        Some(LoadOutcome::Failed(e)) => {
            tracing::warn!("Viewer running without a model: {}", e);
        }
        None => {}
    }
}
