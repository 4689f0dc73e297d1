//! Click-to-focus camera transitions
//!
//! Selecting a part moves the camera from wherever it is to the part's
//! framing position over a fixed duration while it keeps looking at the point
//! captured at click time. Only one transition runs at a time; a new
//! selection replaces the running one.

use bevy_math::curve::{Curve, EaseFunction};
use bevy_math::Vec3;
use std::time::Duration;
use tracing::debug;

use crate::framing::CameraFraming;

const EASING: EaseFunction = EaseFunction::QuadraticInOut;

/// Camera placement for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    pub position: Vec3,
    pub look_at: Vec3,
}

/// Result of a selection, for the caller to apply immediately
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FocusStart {
    /// Where the camera will end up
    pub target: Vec3,
    /// New orbit pivot (the clicked node's world position)
    pub pivot: Vec3,
    /// Whether the target came from the framing table rather than the default
    pub framed: bool,
}

/// An in-flight camera transition
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub from: Vec3,
    pub to: Vec3,
    pub look_at: Vec3,
    pub elapsed: Duration,
    pub duration: Duration,
}

impl Transition {
    /// Linear progress in [0, 1]
    pub fn progress(&self) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        (self.elapsed.as_secs_f32() / self.duration.as_secs_f32()).min(1.0)
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }

    /// Camera pose at the current progress
    pub fn pose(&self) -> CameraPose {
        let position = if self.is_finished() {
            self.to
        } else {
            self.from.lerp(self.to, EASING.sample_clamped(self.progress()))
        };
        CameraPose {
            position,
            look_at: self.look_at,
        }
    }
}

#[derive(Debug, Clone)]
pub struct FocusController {
    framing: CameraFraming,
    duration: Duration,
    active: Option<Transition>,
}

impl FocusController {
    pub fn new(framing: CameraFraming, duration: Duration) -> Self {
        Self {
            framing,
            duration,
            active: None,
        }
    }

    /// Start focusing `raw_id`, replacing any running transition
    pub fn on_select(&mut self, raw_id: &str, clicked: Vec3, camera_position: Vec3) -> FocusStart {
        let framed = self.framing.contains(raw_id);
        let target = self.framing.target_for(raw_id);

        if let Some(previous) = &self.active {
            debug!("Focus transition to {:?} superseded", previous.to);
        }

        self.active = Some(Transition {
            from: camera_position,
            to: target,
            look_at: clicked,
            elapsed: Duration::ZERO,
            duration: self.duration,
        });

        debug!(
            "Focus {} -> camera {:?}, look at {:?} (framed: {})",
            raw_id, target, clicked, framed
        );

        FocusStart {
            target,
            pivot: clicked,
            framed,
        }
    }

    /// Advance the running transition by one frame.
    ///
    /// Returns the pose to apply this frame, or `None` when idle. The final
    /// frame lands exactly on the target and ends the transition.
    pub fn tick(&mut self, dt: Duration) -> Option<CameraPose> {
        let transition = self.active.as_mut()?;
        transition.elapsed = transition.elapsed.saturating_add(dt);
        let pose = transition.pose();

        if transition.is_finished() {
            self.active = None;
        }
        Some(pose)
    }

    pub fn active(&self) -> Option<&Transition> {
        self.active.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn cancel(&mut self) {
        self.active = None;
    }

    pub fn framing(&self) -> &CameraFraming {
        &self.framing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller() -> FocusController {
        let mut framing = CameraFraming::new(Vec3::new(0.0, 0.0, 150.0));
        framing.insert("Brain001", Vec3::new(114.81, 3.15, -115.31));
        framing.insert("Brain003", Vec3::new(-50.67, 8.48, 150.0));
        FocusController::new(framing, Duration::from_millis(1000))
    }

    fn run_to_end(focus: &mut FocusController) -> Vec<CameraPose> {
        let mut poses = Vec::new();
        while let Some(pose) = focus.tick(Duration::from_millis(16)) {
            poses.push(pose);
        }
        poses
    }

    #[test]
    fn test_framed_part_ends_on_configured_position() {
        let mut focus = controller();
        let clicked = Vec3::new(1.0, 2.0, 3.0);

        let start = focus.on_select("Brain001", clicked, Vec3::new(0.0, 0.0, 150.0));
        assert!(start.framed);
        assert_eq!(start.pivot, clicked);
        assert_eq!(start.target, Vec3::new(114.81, 3.15, -115.31));

        let poses = run_to_end(&mut focus);
        let last = poses.last().unwrap();
        assert_eq!(last.position, Vec3::new(114.81, 3.15, -115.31));
        assert!(poses.iter().all(|p| p.look_at == clicked));
        assert!(!focus.is_active());
    }

    #[test]
    fn test_unframed_part_uses_default() {
        let mut focus = controller();

        let start = focus.on_select("Brain002_0", Vec3::ZERO, Vec3::new(10.0, 10.0, 10.0));
        assert!(!start.framed);

        let poses = run_to_end(&mut focus);
        assert_eq!(poses.last().unwrap().position, Vec3::new(0.0, 0.0, 150.0));
    }

    #[test]
    fn test_eases_in_and_out() {
        let mut framing = CameraFraming::new(Vec3::ZERO);
        framing.insert("Part", Vec3::new(0.0, 0.0, 100.0));
        let mut focus = FocusController::new(framing, Duration::from_millis(1000));
        focus.on_select("Part", Vec3::ZERO, Vec3::ZERO);

        let quarter = focus.tick(Duration::from_millis(250)).unwrap();
        assert!((quarter.position.z - 12.5).abs() < 1e-3);

        let half = focus.tick(Duration::from_millis(250)).unwrap();
        assert!((half.position.z - 50.0).abs() < 1e-3);

        let three_quarters = focus.tick(Duration::from_millis(250)).unwrap();
        assert!((three_quarters.position.z - 87.5).abs() < 1e-3);
    }

    #[test]
    fn test_new_selection_supersedes() {
        let mut focus = controller();
        focus.on_select("Brain001", Vec3::X, Vec3::new(0.0, 0.0, 150.0));
        let mid = focus.tick(Duration::from_millis(400)).unwrap();

        focus.on_select("Brain003", Vec3::Y, mid.position);

        let active = focus.active().unwrap();
        assert_eq!(active.to, Vec3::new(-50.67, 8.48, 150.0));
        assert_eq!(active.from, mid.position);
        assert_eq!(active.look_at, Vec3::Y);
        assert_eq!(active.elapsed, Duration::ZERO);

        let poses = run_to_end(&mut focus);
        assert_eq!(poses.last().unwrap().position, Vec3::new(-50.67, 8.48, 150.0));
        assert!(poses.iter().all(|p| p.look_at == Vec3::Y));
    }

    #[test]
    fn test_idle_and_zero_duration() {
        let mut focus = FocusController::new(CameraFraming::new(Vec3::ONE), Duration::ZERO);
        assert_eq!(focus.tick(Duration::from_millis(16)), None);

        focus.on_select("Anything", Vec3::ZERO, Vec3::ZERO);
        let pose = focus.tick(Duration::ZERO).unwrap();
        assert_eq!(pose.position, Vec3::ONE);
        assert!(!focus.is_active());
    }

    #[test]
    fn test_cancel() {
        let mut focus = controller();
        focus.on_select("Brain001", Vec3::ZERO, Vec3::ZERO);
        focus.cancel();
        assert!(focus.tick(Duration::from_millis(16)).is_none());
    }
}
