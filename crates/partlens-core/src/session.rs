//! Viewer session - the explicit context object the host application owns
//!
//! Everything that reacts to user input lives here: the part registry of the
//! current model, the focus controller, the label highlight, and the slider
//! bindings. Load completion is the gate: until a model has loaded, clicks
//! and slider input are accepted and ignored.

use bevy_math::Vec3;
use std::hash::Hash;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::config::{SliderBinding, ViewerConfig};
use crate::error::{ConfigError, PartError};
use crate::focus::{CameraPose, FocusController, FocusStart};
use crate::framing::CameraFraming;
use crate::graph::{SceneGraph, SceneGraphMut};
use crate::highlight::Highlight;
use crate::labels::LabelTable;
use crate::load::{LoadEvent, LoadOutcome, LoadStatus, LoadTracker};
use crate::registry::PartRegistry;

/// Nearest ray hit reported by the engine for a click
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit<N> {
    pub node: N,
    /// World position of the hit node at click time
    pub world_position: Vec3,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ClickOutcome {
    /// No model loaded yet (or the load failed)
    NotLoaded,
    /// The click ray hit nothing
    NoIntersection,
    /// The ray hit something that is not part of the model
    OutsideModel,
    Focused {
        raw_id: String,
        label: String,
        focus: FocusStart,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SliderOutcome {
    NotLoaded,
    Applied {
        value: f32,
        moved: usize,
        missing: usize,
    },
}

pub struct ViewerSession<N> {
    registry: Option<PartRegistry<N>>,
    load: LoadTracker,
    focus: FocusController,
    highlight: Highlight,
    labels: LabelTable,
    bindings: Vec<SliderBinding>,
    slider_min: f32,
    slider_max: f32,
    slider_value: f32,
}

impl<N: Copy + Eq + Hash> ViewerSession<N> {
    pub fn new(config: &ViewerConfig) -> Result<Self, ConfigError> {
        let framing = CameraFraming::from_config(config)?;
        let focus = FocusController::new(
            framing,
            Duration::from_millis(config.camera.transition_ms),
        );

        Ok(Self {
            registry: None,
            load: LoadTracker::new(),
            focus,
            highlight: Highlight::new(Duration::from_millis(config.highlight.hold_ms)),
            labels: LabelTable::from_config(config),
            bindings: config.slider.bindings.clone(),
            slider_min: config.slider.min,
            slider_max: config.slider.max,
            slider_value: config.slider.min,
        })
    }

    /// Start loading a model, discarding everything tied to the previous one
    pub fn begin_load(&mut self, source: &str) {
        self.registry = None;
        self.focus.cancel();
        self.highlight.clear();
        self.slider_value = self.slider_min;
        self.load.begin(source);
    }

    /// Feed a loader event; a successful load builds the part registry
    pub fn on_load_event<G>(&mut self, graph: &G, event: LoadEvent<N>) -> Option<LoadOutcome<N>>
    where
        G: SceneGraph<Node = N>,
    {
        let outcome = self.load.handle(event)?;

        match &outcome {
            LoadOutcome::Loaded(root) => {
                let registry = match PartRegistry::build(graph, Some(*root)) {
                    Ok(registry) => registry,
                    Err(e) => {
                        warn!("Part registry left empty: {}", e);
                        PartRegistry::empty()
                    }
                };
                self.report_table_drift(&registry);
                self.registry = Some(registry);
            }
            LoadOutcome::Failed(_) => {
                self.registry = None;
            }
        }

        Some(outcome)
    }

    /// Log configured ids the loaded model does not contain
    fn report_table_drift(&self, registry: &PartRegistry<N>) {
        let framing = self.focus.framing();
        for binding in &self.bindings {
            if registry.lookup(&binding.part).is_none() {
                warn!("Slider part \"{}\" is not in the loaded model", binding.part);
            }
        }
        for part in registry.iter() {
            if self.labels.contains(&part.raw_id) || framing.contains(&part.raw_id) {
                debug!("Configured part found: {} ({})", part.raw_id, self.labels.label_for(&part.raw_id));
            }
        }
    }

    /// Handle a click: `hit` is the nearest intersection, if any
    pub fn on_click(&mut self, hit: Option<Hit<N>>, camera_position: Vec3, now: Duration) -> ClickOutcome {
        let Some(registry) = &self.registry else {
            debug!("Click ignored: model not loaded");
            return ClickOutcome::NotLoaded;
        };

        let Some(hit) = hit else {
            return ClickOutcome::NoIntersection;
        };

        let Some(raw_id) = registry.resolve_selectable(hit.node).map(str::to_string) else {
            debug!("Click hit a node outside the model");
            return ClickOutcome::OutsideModel;
        };

        let label = self.labels.label_for(&raw_id).to_string();
        self.highlight.show(&label, now);
        let focus = self.focus.on_select(&raw_id, hit.world_position, camera_position);

        info!("Clicked part: {} ({})", raw_id, label);
        info!(
            "Target Position: x={}, y={}, z={}",
            hit.world_position.x, hit.world_position.y, hit.world_position.z
        );

        ClickOutcome::Focused {
            raw_id,
            label,
            focus,
        }
    }

    /// Apply a slider value to every bound part
    pub fn on_slider<G>(&mut self, graph: &mut G, value: f32) -> SliderOutcome
    where
        G: SceneGraphMut<Node = N>,
    {
        let value = if value.is_finite() {
            value.clamp(self.slider_min, self.slider_max)
        } else {
            self.slider_min
        };
        self.slider_value = value;

        let Some(registry) = &self.registry else {
            debug!("Slider ignored: model not loaded");
            return SliderOutcome::NotLoaded;
        };

        let mut moved = 0;
        let mut missing = 0;
        for binding in &self.bindings {
            match registry.move_part(graph, &binding.part, binding.axis, value, binding.sign) {
                Ok(()) => moved += 1,
                Err(PartError::NotFound(_)) | Err(PartError::NodeGone(_)) => missing += 1,
                Err(PartError::MissingRoot) => missing += 1,
            }
        }

        SliderOutcome::Applied {
            value,
            moved,
            missing,
        }
    }

    /// Per-frame update: advances the camera transition and the highlight timer
    pub fn tick(&mut self, dt: Duration, now: Duration) -> Option<CameraPose> {
        self.highlight.update(now);
        self.focus.tick(dt)
    }

    pub fn is_loaded(&self) -> bool {
        self.registry.is_some()
    }

    pub fn registry(&self) -> Option<&PartRegistry<N>> {
        self.registry.as_ref()
    }

    pub fn load_status(&self) -> &LoadStatus {
        self.load.status()
    }

    pub fn focus(&self) -> &FocusController {
        &self.focus
    }

    pub fn highlight(&self) -> &Highlight {
        &self.highlight
    }

    pub fn labels(&self) -> &LabelTable {
        &self.labels
    }

    pub fn bindings(&self) -> &[SliderBinding] {
        &self.bindings
    }

    pub fn slider_range(&self) -> (f32, f32) {
        (self.slider_min, self.slider_max)
    }

    pub fn slider_value(&self) -> f32 {
        self.slider_value
    }
}
