//! Binds a [`CameraDirector`] to a frame ticker.

use std::cell::RefCell;
use std::rc::Rc;

use exotour_core::error::TourError;
use exotour_core::frame::{FrameSubscription, FrameTicker, subscribe};
use exotour_core::pose::{CameraPose, CameraTarget};

use crate::domain::director::{CameraDirector, OrbitLimits};

/// A director registered on a frame ticker.
///
/// The director stays owned here; the ticker only holds a weak reference, so
/// dropping the rig unregisters the per-frame update.
#[derive(Debug)]
pub struct CameraRig {
    director: Rc<RefCell<CameraDirector>>,
    subscription: Option<FrameSubscription>,
}

impl CameraRig {
    /// Registers `director` on `ticker`.
    #[must_use]
    pub fn mount(ticker: &Rc<dyn FrameTicker>, director: CameraDirector) -> Self {
        let director = Rc::new(RefCell::new(director));
        let subscription = subscribe(ticker, &director);
        Self {
            director,
            subscription: Some(subscription),
        }
    }

    /// Current pose, for the renderer.
    #[must_use]
    pub fn pose(&self) -> CameraPose {
        self.director.borrow().pose()
    }

    /// Whether the free-orbit collaborator owns the pose.
    #[must_use]
    pub fn is_free_control(&self) -> bool {
        self.director.borrow().is_free_control()
    }

    /// See [`CameraDirector::set_target`].
    ///
    /// # Errors
    ///
    /// Returns `TourError::InvalidTransition` after the handoff.
    pub fn focus(&self, target: CameraTarget) -> Result<(), TourError> {
        self.director.borrow_mut().set_target(target)
    }

    /// See [`CameraDirector::enable_free_control`].
    ///
    /// # Errors
    ///
    /// Returns `TourError::InvalidTransition` if already handed off.
    pub fn enable_free_control(&self) -> Result<OrbitLimits, TourError> {
        self.director.borrow_mut().enable_free_control()
    }

    /// Whether the pose is within `epsilon` of the active target.
    #[must_use]
    pub fn is_converged(&self, epsilon: f64) -> bool {
        self.director.borrow().is_converged(epsilon)
    }

    /// Unregisters the per-frame update.
    pub fn detach(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use exotour_core::frame::FrameLoop;
    use nalgebra::Vector3;

    use super::*;
    use crate::domain::director::CameraConfig;

    const FRAME: Duration = Duration::from_millis(16);

    fn rig() -> (Rc<FrameLoop>, CameraRig) {
        let frame_loop = Rc::new(FrameLoop::new());
        let ticker: Rc<dyn FrameTicker> = frame_loop.clone();
        let director = CameraDirector::new(
            CameraPose::new([0.0, 0.0, 0.0], [0.0, 0.0, 0.0]),
            CameraConfig::default(),
        )
        .unwrap();
        (frame_loop, CameraRig::mount(&ticker, director))
    }

    #[test]
    fn test_rig_updates_pose_each_frame() {
        // Arrange
        let (frame_loop, rig) = rig();
        rig.focus(CameraTarget::looking_at_origin([0.0, 20.0, 50.0]))
            .unwrap();

        // Act
        frame_loop.run_frame(FRAME);

        // Assert
        assert!((rig.pose().position - Vector3::new(0.0, 1.0, 2.5)).norm() < 1e-9);
    }

    #[test]
    fn test_rig_unregisters_after_handoff() {
        // Arrange
        let (frame_loop, rig) = rig();
        rig.enable_free_control().unwrap();

        // Act
        frame_loop.run_frame(FRAME);

        // Assert
        assert_eq!(frame_loop.registered_count(), 0);
    }

    #[test]
    fn test_detach_stops_updates() {
        // Arrange
        let (frame_loop, mut rig) = rig();
        rig.focus(CameraTarget::looking_at_origin([0.0, 20.0, 50.0]))
            .unwrap();

        // Act
        rig.detach();
        frame_loop.run_frame(FRAME);

        // Assert
        assert_eq!(rig.pose().position, Vector3::zeros());
        assert_eq!(frame_loop.registered_count(), 0);
    }

    #[test]
    fn test_dropping_rig_unregisters() {
        let (frame_loop, rig) = rig();

        drop(rig);

        assert_eq!(frame_loop.registered_count(), 0);
    }
}
