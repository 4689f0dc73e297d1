//! Label panel emphasis
//!
//! `Idle --show--> Emphasized { until } --timeout--> Idle`. Showing a label
//! while emphasized replaces the label and restarts the timer; it never
//! stacks.

use std::time::Duration;

/// Emphasis state of the label panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Emphasis {
    #[default]
    Idle,
    /// Emphasized until the given clock time
    Emphasized { until: Duration },
}

/// Label panel state driven by an external monotonic clock
#[derive(Debug, Clone)]
pub struct Highlight {
    label: Option<String>,
    emphasis: Emphasis,
    hold: Duration,
}

impl Highlight {
    pub fn new(hold: Duration) -> Self {
        Self {
            label: None,
            emphasis: Emphasis::Idle,
            hold,
        }
    }

    /// Replace the label and (re)start the emphasis at clock time `now`
    pub fn show(&mut self, label: &str, now: Duration) {
        self.label = Some(label.to_string());
        self.emphasis = Emphasis::Emphasized {
            until: now.saturating_add(self.hold),
        };
    }

    /// Revert the emphasis once its time is up.
    ///
    /// Returns true only on the call that performs the revert.
    pub fn update(&mut self, now: Duration) -> bool {
        match self.emphasis {
            Emphasis::Emphasized { until } if now >= until => {
                self.emphasis = Emphasis::Idle;
                true
            }
            _ => false,
        }
    }

    pub fn is_emphasized(&self) -> bool {
        matches!(self.emphasis, Emphasis::Emphasized { .. })
    }

    pub fn emphasis(&self) -> Emphasis {
        self.emphasis
    }

    /// Last label shown; stays after the emphasis reverts
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Drop the label, e.g. when a new model replaces the old one
    pub fn clear(&mut self) {
        self.label = None;
        self.emphasis = Emphasis::Idle;
    }
}

impl Default for Highlight {
    fn default() -> Self {
        Self::new(Duration::from_millis(500))
    }
}
