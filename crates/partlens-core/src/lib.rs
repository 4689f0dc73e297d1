//! Partlens Core - part registry and click-to-focus state for model viewers
//!
//! This crate holds the engine-agnostic half of the viewer:
//! - Part registry built from a loaded model's node tree
//! - Camera framing table and label table from the viewer configuration
//! - Focus controller driving eased camera transitions
//! - Label highlight timer and single-shot load tracking
//! - `ViewerSession`, the context object tying them together
//!
//! The rendering engine is reached only through the [`SceneGraph`] and
//! [`SceneGraphMut`] traits.

pub mod config;
pub mod error;
pub mod focus;
pub mod framing;
pub mod graph;
pub mod highlight;
pub mod labels;
pub mod load;
pub mod registry;
pub mod session;

#[cfg(test)]
mod testing;

pub use config::{parse_log_level, PartConfig, SliderBinding, ViewerConfig};
pub use error::{ConfigError, LoadError, PartError};
pub use focus::{CameraPose, FocusController, FocusStart, Transition};
pub use framing::CameraFraming;
pub use graph::{Axis, NodeKind, SceneGraph, SceneGraphMut, Sign};
pub use highlight::{Emphasis, Highlight};
pub use labels::{LabelTable, FALLBACK_LABEL};
pub use load::{LoadEvent, LoadOutcome, LoadStatus, LoadTracker};
pub use registry::{PartDescriptor, PartRegistry};
pub use session::{ClickOutcome, Hit, SliderOutcome, ViewerSession};
