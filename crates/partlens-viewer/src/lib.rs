//! Partlens Viewer - browser glTF viewer with clickable parts
//!
//! Loads a model, lets the user orbit and zoom, focuses the camera on clicked
//! parts and moves configured parts apart with a slider.

mod app;
mod graph;
mod models;
mod scene;
mod ui;

use partlens_core::ViewerConfig;
use wasm_bindgen::prelude::*;

/// Configuration compiled into the viewer
const BUNDLED_CONFIG: &str = include_str!("../../../assets/partlens.toml");

/// WASM entry point
#[wasm_bindgen(start)]
pub fn main() {
    // Set up panic hook for better error messages
    console_error_panic_hook::set_once();

    let (config, config_error) = match ViewerConfig::from_toml(BUNDLED_CONFIG) {
        Ok(config) => (config, None),
        Err(e) => (ViewerConfig::default(), Some(e)),
    };

    tracing_wasm::set_as_global_default_with_config(
        tracing_wasm::WASMLayerConfigBuilder::new()
            .set_max_level(config.log_level())
            .build(),
    );

    if let Some(e) = config_error {
        tracing::error!("Bundled configuration rejected, using defaults: {}", e);
    }

    app::run(config);
}
