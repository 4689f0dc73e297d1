//! Camera framing table - where the camera goes when a part is focused

use bevy_math::Vec3;
use std::collections::HashMap;

use crate::config::ViewerConfig;
use crate::error::ConfigError;

/// Target camera positions per part, with one fallback for everything else
#[derive(Debug, Clone, PartialEq)]
pub struct CameraFraming {
    default: Vec3,
    entries: HashMap<String, Vec3>,
}

impl CameraFraming {
    pub fn new(default: Vec3) -> Self {
        Self {
            default,
            entries: HashMap::new(),
        }
    }

    /// Build from a configuration's part table; parts without a framing
    /// use the default
    pub fn from_config(config: &ViewerConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut framing = Self::new(Vec3::from_array(config.camera.default_framing));
        for part in &config.parts {
            if let Some(position) = part.framing {
                framing.insert(&part.id, Vec3::from_array(position));
            }
        }
        Ok(framing)
    }

    pub fn insert(&mut self, raw_id: &str, position: Vec3) {
        self.entries.insert(raw_id.to_string(), position);
    }

    /// Configured position for `raw_id`, if any
    pub fn get(&self, raw_id: &str) -> Option<Vec3> {
        self.entries.get(raw_id).copied()
    }

    /// Position to frame `raw_id`, falling back to the default
    pub fn target_for(&self, raw_id: &str) -> Vec3 {
        self.get(raw_id).unwrap_or(self.default)
    }

    pub fn default_position(&self) -> Vec3 {
        self.default
    }

    pub fn contains(&self, raw_id: &str) -> bool {
        self.entries.contains_key(raw_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
