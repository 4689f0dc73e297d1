//! Bevy application setup

use bevy::prelude::*;
use bevy_egui::EguiPlugin;
use bevy_picking::{prelude::MeshPickingPlugin, DefaultPickingPlugins};
use partlens_core::{ViewerConfig, ViewerSession};

use crate::models::ModelsPlugin;
use crate::scene::ScenePlugin;
use crate::ui::UiPlugin;

/// Viewer configuration, read-only after startup
#[derive(Resource, Deref)]
pub struct ViewerSettings(pub ViewerConfig);

/// Interaction state for the current model, keyed by entity
#[derive(Resource, Deref, DerefMut)]
pub struct Session(pub ViewerSession<Entity>);

/// Run the Bevy application
pub fn run(config: ViewerConfig) {
    let session = match ViewerSession::new(&config) {
        Ok(session) => session,
        Err(e) => {
            tracing::error!("Invalid viewer configuration: {}", e);
            return;
        }
    };

    App::new()
        .insert_resource(ClearColor(Color::NONE)) // Transparent over the page background
        .add_plugins(DefaultPlugins
            .set(WindowPlugin {
                primary_window: Some(Window {
                    title: config.window.title.clone(),
                    canvas: Some(config.window.canvas.clone()),
                    fit_canvas_to_parent: true,
                    prevent_default_event_handling: false,
                    ..default()
                }),
                ..default()
            })
            .set(AssetPlugin {
                // Models are served next to the page
                file_path: "".to_string(),
                meta_check: bevy::asset::AssetMetaCheck::Never,
                ..default()
            })
        )
        // Picking plugins must be added before EguiPlugin so it can detect them
        .add_plugins(DefaultPickingPlugins)
        .add_plugins(MeshPickingPlugin)
        .add_plugins(EguiPlugin::default())
        .insert_resource(Session(session))
        .insert_resource(ViewerSettings(config))
        .add_plugins(ScenePlugin)
        .add_plugins(ModelsPlugin)
        .add_plugins(UiPlugin)
        .run();
}
