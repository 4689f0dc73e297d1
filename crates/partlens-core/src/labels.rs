//! Friendly labels for selectable parts

use std::collections::HashMap;

use crate::config::ViewerConfig;

/// Label shown for parts missing from the label table
pub const FALLBACK_LABEL: &str = "(Unnamed)";

/// Hand-maintained `raw id -> label` table.
///
/// The table can drift from the asset's actual node names; a missing entry
/// is an expected state and resolves to [`FALLBACK_LABEL`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelTable {
    labels: HashMap<String, String>,
}

impl LabelTable {
    pub fn from_config(config: &ViewerConfig) -> Self {
        let mut table = Self::default();
        for part in &config.parts {
            if let Some(label) = part.label.as_deref().filter(|l| !l.trim().is_empty()) {
                table.insert(&part.id, label);
            }
        }
        table
    }

    pub fn insert(&mut self, raw_id: &str, label: &str) {
        self.labels.insert(raw_id.to_string(), label.to_string());
    }

    pub fn get(&self, raw_id: &str) -> Option<&str> {
        self.labels.get(raw_id).map(String::as_str)
    }

    /// Label for `raw_id`, or `(Unnamed)`
    pub fn label_for(&self, raw_id: &str) -> &str {
        self.get(raw_id).unwrap_or(FALLBACK_LABEL)
    }

    pub fn contains(&self, raw_id: &str) -> bool {
        self.labels.contains_key(raw_id)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}
