//! UI overlays using bevy_egui

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts, EguiPrimaryContextPass};
use partlens_core::{LoadStatus, SliderOutcome};

use crate::app::{Session, ViewerSettings};
use crate::graph::EntityGraph;

/// Grouped system parameters for the UI system
#[derive(SystemParam)]
pub struct UiParams<'w, 's> {
    pub contexts: EguiContexts<'w, 's>,
    pub session: ResMut<'w, Session>,
    pub settings: Res<'w, ViewerSettings>,
    pub graph: EntityGraph<'w, 's>,
}

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(EguiPrimaryContextPass, ui_system);
    }
}

fn to_color32([r, g, b]: [f32; 3]) -> egui::Color32 {
    let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
    egui::Color32::from_rgb(channel(r), channel(g), channel(b))
}

fn ui_system(mut params: UiParams) {
    let Ok(ctx) = params.contexts.ctx_mut() else { return };

    // Selected part label, emphasized for a moment after each click
    let highlight = params.session.highlight();
    if let Some(label) = highlight.label() {
        let (fill, text) = if highlight.is_emphasized() {
            (to_color32(params.settings.highlight.color), egui::Color32::WHITE)
        } else {
            (ctx.style().visuals.window_fill, ctx.style().visuals.text_color())
        };

        egui::Area::new(egui::Id::new("part_label"))
            .anchor(egui::Align2::LEFT_TOP, [10.0, 10.0])
            .show(ctx, |ui| {
                egui::Frame::default()
                    .fill(fill)
                    .corner_radius(4.0)
                    .inner_margin(egui::Margin::same(8))
                    .show(ui, |ui| {
                        ui.label(egui::RichText::new(label).size(18.0).color(text));
                    });
            });
    }

    // Load status, hidden once the model is up
    let status = match params.session.load_status() {
        LoadStatus::Idle | LoadStatus::Loaded => None,
        LoadStatus::Loading { progress } => Some((
            format!("Loading model... {:.0}%", progress * 100.0),
            ctx.style().visuals.text_color(),
        )),
        LoadStatus::Failed(e) => Some((format!("Model failed to load: {}", e), egui::Color32::RED)),
    };
    if let Some((message, color)) = status {
        egui::Area::new(egui::Id::new("load_status"))
            .anchor(egui::Align2::CENTER_TOP, [0.0, 10.0])
            .show(ctx, |ui| {
                ui.colored_label(color, message);
            });
    }

    // Exploded-view slider
    if params.session.bindings().is_empty() {
        return;
    }
    let (min, max) = params.session.slider_range();
    let mut value = params.session.slider_value();
    let enabled = params.session.is_loaded();

    egui::Window::new("Separation")
        .anchor(egui::Align2::RIGHT_BOTTOM, [-10.0, -10.0])
        .resizable(false)
        .collapsible(false)
        .show(ctx, |ui| {
            ui.add_enabled_ui(enabled, |ui| {
                let response = ui.add(egui::Slider::new(&mut value, min..=max).show_value(false));
                ui.label(format!("Slider Value: {:.2}", value));

                if response.changed() {
                    let outcome = params.session.on_slider(&mut params.graph, value);
                    if let SliderOutcome::Applied { missing, .. } = outcome {
                        if missing > 0 {
                            tracing::debug!("{} slider part(s) not found in the model", missing);
                        }
                    }
                }
            });
        });
}
