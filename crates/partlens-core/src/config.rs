//! Viewer configuration loading and validation
//!
//! The configuration is plain data: model placement, camera, lighting, the
//! hand-maintained part table (labels and camera framings) and the slider
//! bindings. It is validated once when loaded; the typed tables built from it
//! ([`CameraFraming`](crate::framing::CameraFraming),
//! [`LabelTable`](crate::labels::LabelTable)) never re-check at access time.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use tracing::info;

use crate::error::ConfigError;
use crate::graph::{Axis, Sign};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ViewerConfig {
    #[serde(default)]
    pub window: WindowConfig,
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub highlight: HighlightConfig,
    #[serde(default)]
    pub lighting: LightingConfig,
    #[serde(default)]
    pub slider: SliderConfig,
    #[serde(default, rename = "part")]
    pub parts: Vec<PartConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowConfig {
    #[serde(default = "default_title")]
    pub title: String,
    /// CSS selector of the canvas the viewer renders into
    #[serde(default = "default_canvas")]
    pub canvas: String,
    /// Maximum log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            canvas: default_canvas(),
            log_level: default_log_level(),
        }
    }
}

fn default_title() -> String {
    "Partlens Viewer".to_string()
}

fn default_canvas() -> String {
    "#partlens-canvas".to_string()
}

fn default_log_level() -> String {
    "warn".to_string()
}

/// Model asset and its placement in the scene
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Asset path of the glTF/GLB file
    #[serde(default = "default_model_path")]
    pub path: String,
    #[serde(default = "default_scale")]
    pub scale: [f32; 3],
    /// Euler XYZ rotation in radians
    #[serde(default)]
    pub rotation: [f32; 3],
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            path: default_model_path(),
            scale: default_scale(),
            rotation: [0.0; 3],
        }
    }
}

fn default_model_path() -> String {
    "models/model.glb".to_string()
}

fn default_scale() -> [f32; 3] {
    [1.0, 1.0, 1.0]
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraConfig {
    /// Initial camera position
    #[serde(default = "default_camera_position")]
    pub position: [f32; 3],
    /// Vertical field of view in degrees
    #[serde(default = "default_fov")]
    pub fov_degrees: f32,
    #[serde(default = "default_near")]
    pub near: f32,
    #[serde(default = "default_far")]
    pub far: f32,
    /// Camera position used for parts without a framing entry
    #[serde(default = "default_camera_position")]
    pub default_framing: [f32; 3],
    /// Duration of the focus transition in milliseconds
    #[serde(default = "default_transition_ms")]
    pub transition_ms: u64,
    /// Orbit speed in radians per pixel of drag
    #[serde(default = "default_sensitivity")]
    pub sensitivity: f32,
    /// Fraction of the distance covered per scroll step
    #[serde(default = "default_zoom_speed")]
    pub zoom_speed: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: default_camera_position(),
            fov_degrees: default_fov(),
            near: default_near(),
            far: default_far(),
            default_framing: default_camera_position(),
            transition_ms: default_transition_ms(),
            sensitivity: default_sensitivity(),
            zoom_speed: default_zoom_speed(),
        }
    }
}

fn default_camera_position() -> [f32; 3] {
    [0.0, 0.0, 150.0]
}

fn default_fov() -> f32 {
    75.0
}

fn default_near() -> f32 {
    0.1
}

fn default_far() -> f32 {
    1000.0
}

fn default_transition_ms() -> u64 {
    1000
}

fn default_sensitivity() -> f32 {
    0.005
}

fn default_zoom_speed() -> f32 {
    0.1
}

/// Label panel emphasis
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HighlightConfig {
    /// How long the emphasis lasts after the last selection
    #[serde(default = "default_hold_ms")]
    pub hold_ms: u64,
    /// Emphasis background as RGB (0.0-1.0)
    #[serde(default = "default_highlight_color")]
    pub color: [f32; 3],
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            hold_ms: default_hold_ms(),
            color: default_highlight_color(),
        }
    }
}

fn default_hold_ms() -> u64 {
    500
}

fn default_highlight_color() -> [f32; 3] {
    [0.0, 0.0, 1.0]
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LightingConfig {
    #[serde(default = "default_sun_position")]
    pub sun_position: [f32; 3],
    #[serde(default = "default_sun_illuminance")]
    pub sun_illuminance: f32,
    #[serde(default = "default_true")]
    pub shadows: bool,
    /// Ambient tint as RGB (0.0-1.0)
    #[serde(default = "default_ambient_color")]
    pub ambient_color: [f32; 3],
    #[serde(default = "default_ambient_brightness")]
    pub ambient_brightness: f32,
    /// Hemisphere fill: light from above in `sky_color`, from below in `ground_color`
    #[serde(default = "default_sky_color")]
    pub sky_color: [f32; 3],
    #[serde(default = "default_ground_color")]
    pub ground_color: [f32; 3],
    #[serde(default = "default_hemisphere_illuminance")]
    pub hemisphere_illuminance: f32,
}

impl Default for LightingConfig {
    fn default() -> Self {
        Self {
            sun_position: default_sun_position(),
            sun_illuminance: default_sun_illuminance(),
            shadows: true,
            ambient_color: default_ambient_color(),
            ambient_brightness: default_ambient_brightness(),
            sky_color: default_sky_color(),
            ground_color: default_ground_color(),
            hemisphere_illuminance: default_hemisphere_illuminance(),
        }
    }
}

fn default_sun_position() -> [f32; 3] {
    [50.0, 200.0, 100.0]
}

fn default_sun_illuminance() -> f32 {
    8000.0
}

fn default_true() -> bool {
    true
}

fn default_ambient_color() -> [f32; 3] {
    [1.0, 1.0, 1.0]
}

fn default_ambient_brightness() -> f32 {
    300.0
}

fn default_sky_color() -> [f32; 3] {
    [1.0, 1.0, 1.0]
}

fn default_ground_color() -> [f32; 3] {
    [0.2, 0.2, 0.2]
}

fn default_hemisphere_illuminance() -> f32 {
    1500.0
}

/// Exploded-view slider and the parts it drives
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SliderConfig {
    #[serde(default)]
    pub min: f32,
    #[serde(default = "default_slider_max")]
    pub max: f32,
    #[serde(default, rename = "binding")]
    pub bindings: Vec<SliderBinding>,
}

impl Default for SliderConfig {
    fn default() -> Self {
        Self {
            min: 0.0,
            max: default_slider_max(),
            bindings: Vec::new(),
        }
    }
}

fn default_slider_max() -> f32 {
    50.0
}

/// One part moved by the slider: its position along `axis` becomes
/// `sign * value`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SliderBinding {
    pub part: String,
    pub axis: Axis,
    #[serde(default)]
    pub sign: Sign,
}

/// Hand-maintained entry for a selectable part
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartConfig {
    /// Raw node identifier in the asset
    pub id: String,
    /// Friendly label shown when the part is selected
    #[serde(default)]
    pub label: Option<String>,
    /// Camera position used when focusing this part
    #[serde(default)]
    pub framing: Option<[f32; 3]>,
}

impl ViewerConfig {
    /// Load configuration from a file; `.json` files are read as JSON,
    /// everything else as TOML
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config = if is_json(path) {
            Self::from_json(&content)?
        } else {
            Self::from_toml(&content)?
        };
        info!(
            path = %path.display(),
            parts = config.parts.len(),
            bindings = config.slider.bindings.len(),
            "Configuration loaded"
        );
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: ViewerConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        let config: ViewerConfig = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Save to a file, using the same format rule as [`Self::from_file`]
    pub fn to_file(&self, path: &Path) -> Result<(), ConfigError> {
        let content = if is_json(path) {
            self.to_json_string()?
        } else {
            self.to_toml_string()?
        };
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Check every value that would otherwise surface as a runtime surprise
    pub fn validate(&self) -> Result<(), ConfigError> {
        parse_log_level(&self.window.log_level)?;

        if self.model.path.trim().is_empty() {
            return Err(ConfigError::invalid("model.path", "must not be empty"));
        }
        check_finite("model.scale", &self.model.scale)?;
        check_finite("model.rotation", &self.model.rotation)?;

        let camera = &self.camera;
        check_finite("camera.position", &camera.position)?;
        check_finite("camera.default_framing", &camera.default_framing)?;
        if !(camera.fov_degrees > 0.0 && camera.fov_degrees < 180.0) {
            return Err(ConfigError::invalid(
                "camera.fov_degrees",
                format!("{} is outside (0, 180)", camera.fov_degrees),
            ));
        }
        if !(camera.near > 0.0 && camera.far > camera.near) {
            return Err(ConfigError::invalid(
                "camera.near/far",
                format!("need 0 < near < far, got {} and {}", camera.near, camera.far),
            ));
        }

        check_finite("highlight.color", &self.highlight.color)?;
        check_finite("lighting.sun_position", &self.lighting.sun_position)?;
        check_finite("lighting.ambient_color", &self.lighting.ambient_color)?;
        check_finite("lighting.sky_color", &self.lighting.sky_color)?;
        check_finite("lighting.ground_color", &self.lighting.ground_color)?;
        let lighting = &self.lighting;
        for (field, value) in [
            ("lighting.sun_illuminance", lighting.sun_illuminance),
            ("lighting.ambient_brightness", lighting.ambient_brightness),
            ("lighting.hemisphere_illuminance", lighting.hemisphere_illuminance),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::invalid(field, format!("{} must be finite and >= 0", value)));
            }
        }

        let slider = &self.slider;
        if !(slider.min.is_finite() && slider.max.is_finite() && slider.min < slider.max) {
            return Err(ConfigError::invalid(
                "slider",
                format!("need min < max, got {} and {}", slider.min, slider.max),
            ));
        }
        for (i, binding) in slider.bindings.iter().enumerate() {
            if binding.part.trim().is_empty() {
                return Err(ConfigError::invalid(
                    format!("slider.binding[{}].part", i),
                    "must not be empty",
                ));
            }
        }

        let mut seen = HashSet::new();
        for part in &self.parts {
            if part.id.trim().is_empty() {
                return Err(ConfigError::invalid("part.id", "must not be empty"));
            }
            if !seen.insert(part.id.as_str()) {
                return Err(ConfigError::DuplicatePart(part.id.clone()));
            }
            if let Some(framing) = &part.framing {
                check_finite(&format!("part.{}.framing", part.id), framing)?;
            }
        }

        Ok(())
    }

    /// Maximum log level as configured
    pub fn log_level(&self) -> tracing::Level {
        parse_log_level(&self.window.log_level).unwrap_or(tracing::Level::WARN)
    }
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

fn check_finite(field: &str, values: &[f32; 3]) -> Result<(), ConfigError> {
    if values.iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, format!("{:?} is not finite", values)))
    }
}

/// Parse a level name (`trace` .. `error`, any case)
pub fn parse_log_level(level: &str) -> Result<tracing::Level, ConfigError> {
    match level.to_lowercase().as_str() {
        "trace" => Ok(tracing::Level::TRACE),
        "debug" => Ok(tracing::Level::DEBUG),
        "info" => Ok(tracing::Level::INFO),
        "warn" => Ok(tracing::Level::WARN),
        "error" => Ok(tracing::Level::ERROR),
        other => Err(ConfigError::invalid(
            "log_level",
            format!("unknown level '{}'", other),
        )),
    }
}
