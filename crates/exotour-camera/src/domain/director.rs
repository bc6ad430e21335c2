//! Camera director.

use std::fmt;

use exotour_core::error::TourError;
use exotour_core::frame::{FrameControl, FrameTask, FrameTime};
use exotour_core::pose::{CameraPose, CameraTarget};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Smoothing used when none is configured.
pub const DEFAULT_SMOOTHING: f64 = 0.05;

/// Tunables for a [`CameraDirector`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraConfig {
    /// Fraction of the remaining distance covered per frame, in `(0, 1)`.
    pub smoothing: f64,
    /// Orbit limits handed to the free-orbit collaborator.
    pub orbit_limits: OrbitLimits,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            smoothing: DEFAULT_SMOOTHING,
            orbit_limits: OrbitLimits::default(),
        }
    }
}

/// Zoom bounds for user-driven orbiting.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrbitLimits {
    /// Closest allowed distance to the orbit centre.
    pub min_distance: f64,
    /// Farthest allowed distance to the orbit centre.
    pub max_distance: f64,
}

impl Default for OrbitLimits {
    fn default() -> Self {
        Self {
            min_distance: 10.0,
            max_distance: 450.0,
        }
    }
}

/// Who owns the camera pose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CameraMode {
    /// The director writes the pose.
    Scripted,
    /// The free-orbit collaborator owns the pose; the director is frozen.
    FreeOrbit,
}

impl fmt::Display for CameraMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scripted => f.write_str("scripted"),
            Self::FreeOrbit => f.write_str("free_orbit"),
        }
    }
}

/// Eases the camera toward a target pose and performs the one-shot handoff
/// to free orbit control.
#[derive(Debug, Clone)]
pub struct CameraDirector {
    pose: CameraPose,
    target: Option<CameraTarget>,
    smoothing: f64,
    orbit_limits: OrbitLimits,
    mode: CameraMode,
}

impl CameraDirector {
    /// Creates a director at `pose`.
    ///
    /// # Errors
    ///
    /// Returns `TourError::Validation` if the smoothing factor is not in
    /// `(0, 1)` or the orbit limits are not `0 < min <= max`.
    pub fn new(pose: CameraPose, config: CameraConfig) -> Result<Self, TourError> {
        let k = config.smoothing;
        if !(k.is_finite() && k > 0.0 && k < 1.0) {
            return Err(TourError::Validation(format!(
                "camera smoothing must be in (0, 1), got {k}"
            )));
        }
        let limits = config.orbit_limits;
        if !(limits.min_distance > 0.0 && limits.min_distance <= limits.max_distance) {
            return Err(TourError::Validation(format!(
                "orbit limits must satisfy 0 < min <= max, got {}..{}",
                limits.min_distance, limits.max_distance
            )));
        }
        Ok(Self {
            pose,
            target: None,
            smoothing: k,
            orbit_limits: limits,
            mode: CameraMode::Scripted,
        })
    }

    /// Current pose.
    #[must_use]
    pub fn pose(&self) -> CameraPose {
        self.pose
    }

    /// Active target, if any.
    #[must_use]
    pub fn target(&self) -> Option<CameraTarget> {
        self.target
    }

    /// Who owns the pose.
    #[must_use]
    pub fn mode(&self) -> CameraMode {
        self.mode
    }

    /// Whether the free-orbit collaborator owns the pose.
    #[must_use]
    pub fn is_free_control(&self) -> bool {
        self.mode == CameraMode::FreeOrbit
    }

    /// Starts easing toward `target`.
    ///
    /// # Errors
    ///
    /// Returns `TourError::InvalidTransition` after the handoff; the pose
    /// then belongs to the free-orbit collaborator.
    pub fn set_target(&mut self, target: CameraTarget) -> Result<(), TourError> {
        if self.is_free_control() {
            return Err(TourError::invalid_transition(self.mode, "set camera target"));
        }
        debug!(
            x = target.position.x,
            y = target.position.y,
            z = target.position.z,
            "camera target set"
        );
        self.target = Some(target);
        Ok(())
    }

    /// Stops easing; the pose stays where it is.
    pub fn clear_target(&mut self) {
        self.target = None;
    }

    /// Advances the pose by one frame.
    ///
    /// Returns the new pose, or `None` if nothing was written (no target, or
    /// after handoff).
    pub fn update(&mut self) -> Option<CameraPose> {
        if self.is_free_control() {
            return None;
        }
        let target = self.target?;
        self.pose.position += (target.position - self.pose.position) * self.smoothing;
        self.pose.look_at = target.focus;
        Some(self.pose)
    }

    /// Whether the pose is within `epsilon` of the target. Trivially true
    /// with no target.
    #[must_use]
    pub fn is_converged(&self, epsilon: f64) -> bool {
        self.target
            .is_none_or(|target| self.pose.distance_to(&target.position) <= epsilon)
    }

    /// Hands the pose to the free-orbit collaborator. Irreversible.
    ///
    /// # Errors
    ///
    /// Returns `TourError::InvalidTransition` if control was already handed
    /// off.
    pub fn enable_free_control(&mut self) -> Result<OrbitLimits, TourError> {
        if self.is_free_control() {
            return Err(TourError::invalid_transition(self.mode, "enable free control"));
        }
        self.mode = CameraMode::FreeOrbit;
        self.target = None;
        info!(
            min_distance = self.orbit_limits.min_distance,
            max_distance = self.orbit_limits.max_distance,
            "camera handed to free orbit control"
        );
        Ok(self.orbit_limits)
    }
}

impl FrameTask for CameraDirector {
    fn on_frame(&mut self, _time: FrameTime) -> FrameControl {
        if self.is_free_control() {
            return FrameControl::Stop;
        }
        self.update();
        FrameControl::Continue
    }
}
