//! Single-shot model load lifecycle
//!
//! The engine reports progress any number of times and then exactly one
//! terminal result. The tracker turns that stream into one outcome and
//! ignores anything arriving after it until the caller starts a new load.

use tracing::{debug, error, info};

use crate::error::LoadError;

/// Notification from the engine's asset loader
#[derive(Debug, Clone, PartialEq)]
pub enum LoadEvent<N> {
    /// Fraction loaded in [0, 1]
    Progress(f32),
    /// Model root node is available
    Success(N),
    Failure(String),
}

/// Terminal result of a load
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome<N> {
    Loaded(N),
    Failed(LoadError),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum LoadStatus {
    #[default]
    Idle,
    Loading {
        progress: f32,
    },
    Loaded,
    Failed(LoadError),
}

impl LoadStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, LoadStatus::Loaded | LoadStatus::Failed(_))
    }
}

#[derive(Debug, Clone, Default)]
pub struct LoadTracker {
    source: Option<String>,
    status: LoadStatus,
    last_percent: Option<u32>,
}

impl LoadTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start (or explicitly restart) a load of `source`
    pub fn begin(&mut self, source: &str) {
        info!("Loading model: {}", source);
        self.source = Some(source.to_string());
        self.status = LoadStatus::Loading { progress: 0.0 };
        self.last_percent = None;
    }

    /// Feed one loader event; returns the outcome on the terminal event only
    pub fn handle<N>(&mut self, event: LoadEvent<N>) -> Option<LoadOutcome<N>> {
        if self.status.is_terminal() {
            debug!("Ignoring loader event after load finished");
            return None;
        }

        match event {
            LoadEvent::Progress(ratio) => {
                let progress = if ratio.is_finite() { ratio.clamp(0.0, 1.0) } else { 0.0 };
                let percent = (progress * 100.0).round() as u32;
                if self.last_percent != Some(percent) {
                    info!("Loading: {}%", percent);
                    self.last_percent = Some(percent);
                }
                self.status = LoadStatus::Loading { progress };
                None
            }
            LoadEvent::Success(root) => {
                info!("Model loaded: {}", self.source.as_deref().unwrap_or("<unknown>"));
                self.status = LoadStatus::Loaded;
                Some(LoadOutcome::Loaded(root))
            }
            LoadEvent::Failure(message) => {
                error!("Error loading model: {}", message);
                let err = LoadError(message);
                self.status = LoadStatus::Failed(err.clone());
                Some(LoadOutcome::Failed(err))
            }
        }
    }

    pub fn status(&self) -> &LoadStatus {
        &self.status
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_terminal_outcome() {
        let mut tracker = LoadTracker::new();
        tracker.begin("models/brain.glb");

        assert_eq!(tracker.handle(LoadEvent::<u32>::Progress(0.25)), None);
        assert_eq!(tracker.status(), &LoadStatus::Loading { progress: 0.25 });

        assert_eq!(tracker.handle(LoadEvent::Success(7u32)), Some(LoadOutcome::Loaded(7)));
        assert_eq!(tracker.status(), &LoadStatus::Loaded);

        // Late events after the terminal one are dropped
        assert_eq!(tracker.handle(LoadEvent::Success(8u32)), None);
        assert_eq!(tracker.handle(LoadEvent::<u32>::Failure("late".into())), None);
        assert_eq!(tracker.status(), &LoadStatus::Loaded);
    }

    #[test]
    fn test_failure_is_terminal_until_reload() {
        let mut tracker = LoadTracker::new();
        tracker.begin("models/missing.glb");

        let outcome = tracker.handle(LoadEvent::<u32>::Failure("404".into()));
        assert_eq!(outcome, Some(LoadOutcome::Failed(LoadError("404".into()))));
        assert!(tracker.status().is_terminal());
        assert_eq!(tracker.handle(LoadEvent::Success(1u32)), None);

        tracker.begin("models/brain.glb");
        assert_eq!(tracker.source(), Some("models/brain.glb"));
        assert_eq!(tracker.handle(LoadEvent::Success(1u32)), Some(LoadOutcome::Loaded(1)));
    }

    #[test]
    fn test_progress_is_clamped() {
        let mut tracker = LoadTracker::new();
        tracker.begin("models/brain.glb");

        tracker.handle(LoadEvent::<u32>::Progress(1.7));
        assert_eq!(tracker.status(), &LoadStatus::Loading { progress: 1.0 });

        tracker.handle(LoadEvent::<u32>::Progress(f32::NAN));
        assert_eq!(tracker.status(), &LoadStatus::Loading { progress: 0.0 });
    }
}
