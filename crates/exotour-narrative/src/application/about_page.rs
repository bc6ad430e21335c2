//! The About page.
//!
//! On mount the camera zooms in from the opening shot while the page drifts
//! down at container speed. The content is a short run of panels walked
//! with Back / Next, ending in a Home button.

use std::rc::Rc;

use exotour_camera::application::rig::CameraRig;
use exotour_camera::domain::director::{CameraConfig, CameraDirector};
use exotour_content::domain::narration::Narration;
use exotour_content::domain::steps::StepTable;
use exotour_core::error::TourError;
use exotour_core::frame::FrameTicker;
use exotour_core::navigation::{Navigator, Route};
use exotour_core::pose::{CameraPose, CameraTarget};
use exotour_core::scroll::ScrollSurface;
use exotour_scroll::application::session::AutoscrollSession;
use exotour_scroll::domain::autoscroll::{AutoscrollConfig, AutoscrollState};
use serde::Serialize;
use tracing::{debug, info};

/// Tunables for an [`AboutPage`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AboutConfig {
    /// Pose the camera starts from.
    pub initial_pose: CameraPose,
    /// Where the mount-time zoom ends.
    pub focus: CameraTarget,
    /// Camera smoothing.
    pub camera: CameraConfig,
    /// Page drift.
    pub scroll: AutoscrollConfig,
}

impl Default for AboutConfig {
    fn default() -> Self {
        Self {
            initial_pose: CameraPose::default(),
            focus: CameraTarget::looking_at_origin([0.0, 20.0, 50.0]),
            camera: CameraConfig::default(),
            scroll: AutoscrollConfig::container(),
        }
    }
}

/// The displayed panel and its buttons.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AboutPanel {
    /// 0-based panel ordinal.
    pub index: usize,
    /// Number of panels.
    pub count: usize,
    /// Panel text.
    pub narration: Narration,
    /// Photo or illustration.
    pub asset: Option<String>,
    /// "Back".
    pub back_visible: bool,
    /// "Next".
    pub next_visible: bool,
    /// "Home", on the last panel only.
    pub home_visible: bool,
}

/// A mounted About page.
///
/// Dropping the page unregisters its camera and scroll callbacks.
pub struct AboutPage<S> {
    panels: StepTable,
    current: usize,
    camera: CameraRig,
    scroll: AutoscrollSession<S>,
    navigator: Rc<dyn Navigator>,
}

impl<S> std::fmt::Debug for AboutPage<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AboutPage")
            .field("panels", &self.panels.name())
            .field("current", &self.current)
            .finish_non_exhaustive()
    }
}

impl<S: ScrollSurface + 'static> AboutPage<S> {
    /// Mounts the page: starts the zoom and the autoscroll, shows panel 0.
    ///
    /// # Errors
    ///
    /// Returns `TourError::Validation` if `panels` is empty or the camera or
    /// scroll configuration is invalid.
    pub fn mount(
        ticker: &Rc<dyn FrameTicker>,
        panels: StepTable,
        surface: S,
        navigator: Rc<dyn Navigator>,
        config: AboutConfig,
    ) -> Result<Self, TourError> {
        if panels.is_empty() {
            return Err(TourError::Validation(format!(
                "about page '{}' has no panels",
                panels.name()
            )));
        }
        let director = CameraDirector::new(config.initial_pose, config.camera)?;
        let camera = CameraRig::mount(ticker, director);
        camera.focus(config.focus)?;
        let scroll = AutoscrollSession::start(ticker, surface, config.scroll)?;
        info!(panels = panels.len(), "about page mounted");

        Ok(Self {
            panels,
            current: 0,
            camera,
            scroll,
            navigator,
        })
    }

    /// The displayed panel.
    #[must_use]
    pub fn panel(&self) -> AboutPanel {
        let count = self.panels.len();
        let is_last = self.current + 1 == count;
        let (narration, asset) = self
            .panels
            .step_at(self.current)
            .map(|step| (step.descriptor.narration.clone(), step.descriptor.asset.clone()))
            .unwrap_or_else(|| (Narration::new(""), None));
        AboutPanel {
            index: self.current,
            count,
            narration,
            asset,
            back_visible: self.current > 0,
            next_visible: !is_last,
            home_visible: is_last,
        }
    }

    /// "Next".
    ///
    /// # Errors
    ///
    /// Returns `TourError::InvalidTransition` on the last panel.
    pub fn next(&mut self) -> Result<(), TourError> {
        if self.current + 1 >= self.panels.len() {
            return Err(TourError::invalid_transition(
                format!("panel {}", self.current),
                "next about panel",
            ));
        }
        self.current += 1;
        debug!(panel = self.current, "about panel shown");
        Ok(())
    }

    /// "Back".
    ///
    /// # Errors
    ///
    /// Returns `TourError::InvalidTransition` on the first panel.
    pub fn back(&mut self) -> Result<(), TourError> {
        if self.current == 0 {
            return Err(TourError::invalid_transition("panel 0", "previous about panel"));
        }
        self.current -= 1;
        debug!(panel = self.current, "about panel shown");
        Ok(())
    }

    /// "Home".
    ///
    /// # Errors
    ///
    /// Returns `TourError::InvalidTransition` unless the last panel is shown.
    pub fn home(&self) -> Result<(), TourError> {
        if !self.panel().home_visible {
            return Err(TourError::invalid_transition(
                format!("panel {}", self.current),
                "leave about page",
            ));
        }
        info!("leaving about page");
        self.navigator.navigate(&Route::Home);
        Ok(())
    }

    /// Autoscroll state.
    #[must_use]
    pub fn scroll_state(&self) -> AutoscrollState {
        self.scroll.state()
    }

    /// Whether the autoscroll callback is still registered.
    #[must_use]
    pub fn is_scrolling(&self) -> bool {
        self.scroll.is_running()
    }

    /// Camera pose to render with.
    #[must_use]
    pub fn camera(&self) -> CameraPose {
        self.camera.pose()
    }

    /// Whether the zoom has settled within `epsilon`.
    #[must_use]
    pub fn camera_converged(&self, epsilon: f64) -> bool {
        self.camera.is_converged(epsilon)
    }

    /// Stops the autoscroll and the zoom. Idempotent.
    pub fn teardown(&mut self) {
        if self.scroll.is_running() {
            debug!("about page torn down");
        }
        self.scroll.stop();
        self.camera.detach();
    }
}
