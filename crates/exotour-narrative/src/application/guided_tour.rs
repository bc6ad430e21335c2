//! The guided home tour.
//!
//! Mounts a [`NarrationSequencer`], an [`AudioCueDriver`] and a camera rig
//! together and applies every signal the sequencer emits: narration
//! replacement, one cue at a time, camera targets, guide reactions, and
//! delayed stage effects released on frame time.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

use exotour_camera::application::rig::CameraRig;
use exotour_camera::domain::director::{CameraConfig, CameraDirector, OrbitLimits};
use exotour_content::domain::narration::Narration;
use exotour_content::domain::steps::{CueId, Reaction, StageEffect, StepTable};
use exotour_core::audio::AudioBackend;
use exotour_core::error::TourError;
use exotour_core::event::Clock;
use exotour_core::frame::{
    FrameControl, FrameSubscription, FrameTask, FrameTicker, FrameTime, subscribe,
};
use exotour_core::machine::SignalSource;
use exotour_core::navigation::{Navigator, Route};
use exotour_core::pose::CameraPose;
use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::domain::audio_driver::AudioCueDriver;
use crate::domain::sequencer::NarrationSequencer;
use crate::domain::signals::{NarrativeSignal, NarrativeSignalKind, StepEntered};
use crate::domain::timeline::Timeline;

/// Tunables for a [`GuidedTour`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TourConfig {
    /// How long the opening overlay takes to fade before it is removed.
    pub overlay_fade: Duration,
    /// Pose the camera starts from.
    pub initial_pose: CameraPose,
    /// Camera smoothing and orbit limits.
    pub camera: CameraConfig,
}

impl Default for TourConfig {
    fn default() -> Self {
        Self {
            overlay_fade: Duration::from_secs(4),
            initial_pose: CameraPose::default(),
            camera: CameraConfig::default(),
        }
    }
}

/// The dark overlay covering the scene before the tour starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlayState {
    /// Fully opaque.
    Present,
    /// Fading out.
    Fading,
    /// Gone.
    Removed,
}

/// Everything the renderer needs to draw the home scene for one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SceneView {
    /// "Press any key or click to start".
    pub start_prompt_visible: bool,
    /// Opening overlay.
    pub overlay: OverlayState,
    /// Whether the guide character is shown.
    pub guide_visible: bool,
    /// The guide's pose.
    pub reaction: Reaction,
    /// Whether the narration panel is shown.
    pub narration_panel_visible: bool,
    /// Narration of the displayed step.
    pub narration: Option<Narration>,
    /// Illustrative asset of the displayed step.
    pub asset: Option<String>,
    /// Displayed step.
    pub step_index: Option<usize>,
    /// Whether the displayed step is the last one (hides "Next").
    pub is_last_step: bool,
    /// Camera pose to render with.
    pub camera: CameraPose,
    /// Orbit limits once the user controls the camera.
    pub free_orbit: Option<OrbitLimits>,
    /// "Guided Tour" / "Free Navigation" controls.
    pub navigation_controls_visible: bool,
}

#[derive(Debug, Clone, Copy)]
enum Deferred {
    RemoveOverlay,
    Stage(StageEffect),
}

/// Frame-driven half of the tour: the pieces deferred effects touch.
#[derive(Debug)]
struct Stage {
    view: SceneView,
    camera: CameraRig,
    timeline: Timeline<Deferred>,
}

impl Stage {
    fn apply(&mut self, effect: StageEffect) {
        debug!(?effect, "stage effect applied");
        match effect {
            StageEffect::HideGuide => self.view.guide_visible = false,
            StageEffect::HideNarrationPanel => self.view.narration_panel_visible = false,
            StageEffect::FocusCamera { target } => {
                if let Err(e) = self.camera.focus(target) {
                    warn!(error = %e, "camera target ignored");
                }
            }
            StageEffect::EnableFreeControl => match self.camera.enable_free_control() {
                Ok(limits) => self.view.free_orbit = Some(limits),
                Err(e) => warn!(error = %e, "free control already enabled"),
            },
            StageEffect::ShowNavigationControls => self.view.navigation_controls_visible = true,
        }
    }

    fn release(&mut self, deferred: Deferred) {
        match deferred {
            Deferred::RemoveOverlay => {
                self.view.overlay = OverlayState::Removed;
                debug!("overlay removed");
            }
            Deferred::Stage(effect) => self.apply(effect),
        }
    }
}

impl FrameTask for Stage {
    fn on_frame(&mut self, time: FrameTime) -> FrameControl {
        for deferred in self.timeline.advance(time.delta) {
            self.release(deferred);
        }
        FrameControl::Continue
    }
}

/// The narrated, camera-driven tour of the home scene.
pub struct GuidedTour {
    sequencer: NarrationSequencer,
    audio: AudioCueDriver,
    stage: Rc<RefCell<Stage>>,
    subscription: Option<FrameSubscription>,
    navigator: Rc<dyn Navigator>,
    clock: Arc<dyn Clock>,
    overlay_fade: Duration,
    applied: Vec<NarrativeSignal>,
}

impl std::fmt::Debug for GuidedTour {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GuidedTour")
            .field("sequencer", &self.sequencer)
            .field("audio", &self.audio)
            .field("mounted", &self.subscription.is_some())
            .finish_non_exhaustive()
    }
}

impl GuidedTour {
    /// Mounts the tour on `ticker`. Nothing plays until [`GuidedTour::start`].
    ///
    /// # Errors
    ///
    /// Returns `TourError::Validation` if the table is empty or the camera
    /// configuration is invalid.
    pub fn mount(
        ticker: &Rc<dyn FrameTicker>,
        table: StepTable,
        audio: Box<dyn AudioBackend>,
        navigator: Rc<dyn Navigator>,
        clock: Arc<dyn Clock>,
        config: TourConfig,
    ) -> Result<Self, TourError> {
        let director = CameraDirector::new(config.initial_pose, config.camera)?;
        let audio = AudioCueDriver::new(audio, table.cues().clone());
        let session_id = Uuid::new_v4();
        info!(
            session_id = %session_id,
            script = table.name(),
            steps = table.len(),
            hash = table.content_hash().unwrap_or_default(),
            "guided tour mounted"
        );
        let sequencer = NarrationSequencer::new(session_id, table)?;

        let stage = Rc::new(RefCell::new(Stage {
            view: SceneView {
                start_prompt_visible: true,
                overlay: OverlayState::Present,
                guide_visible: false,
                reaction: Reaction::Normal,
                narration_panel_visible: false,
                narration: None,
                asset: None,
                step_index: None,
                is_last_step: false,
                camera: config.initial_pose,
                free_orbit: None,
                navigation_controls_visible: false,
            },
            camera: CameraRig::mount(ticker, director),
            timeline: Timeline::new(),
        }));
        let subscription = subscribe(ticker, &stage);

        Ok(Self {
            sequencer,
            audio,
            stage,
            subscription: Some(subscription),
            navigator,
            clock,
            overlay_fade: config.overlay_fade,
            applied: Vec::new(),
        })
    }

    /// Starts the tour: the prompt disappears, the overlay begins to fade
    /// and step 0 is entered.
    ///
    /// # Errors
    ///
    /// Returns `TourError::InvalidTransition` if the tour already started.
    pub fn start(&mut self) -> Result<(), TourError> {
        self.sequencer.start(self.clock.as_ref()).inspect_err(|e| {
            warn!(error = %e, "tour start ignored");
        })?;
        {
            let mut stage = self.stage.borrow_mut();
            stage.view.start_prompt_visible = false;
            stage.view.overlay = OverlayState::Fading;
            stage.view.guide_visible = true;
            stage.view.narration_panel_visible = true;
            let fade = self.overlay_fade;
            stage.timeline.schedule(fade, Deferred::RemoveOverlay);
        }
        info!(session_id = %self.sequencer.session_id(), "guided tour started");
        self.apply_pending();
        Ok(())
    }

    /// Moves to the next step ("Next").
    ///
    /// # Errors
    ///
    /// Returns `TourError::InvalidTransition` if the tour is not running;
    /// nothing changes in that case.
    pub fn advance(&mut self) -> Result<(), TourError> {
        self.sequencer.advance(self.clock.as_ref()).inspect_err(|e| {
            warn!(error = %e, "tour advance ignored");
        })?;
        self.apply_pending();
        Ok(())
    }

    /// Ends the tour early at the current step.
    ///
    /// # Errors
    ///
    /// Returns `TourError::InvalidTransition` if the tour is not running.
    pub fn finish(&mut self) -> Result<(), TourError> {
        self.sequencer.finish(self.clock.as_ref()).inspect_err(|e| {
            warn!(error = %e, "tour finish ignored");
        })?;
        self.apply_pending();
        Ok(())
    }

    /// Whether the final step has been reached (or the tour was finished).
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.sequencer.is_complete()
    }

    /// The "Free Navigation" control.
    ///
    /// # Errors
    ///
    /// Returns `TourError::InvalidTransition` while the controls are hidden.
    pub fn choose_free_navigation(&self) -> Result<(), TourError> {
        self.choose(Route::FreeNavigation, "choose free navigation")
    }

    /// The "Guided Tour" control.
    ///
    /// # Errors
    ///
    /// Returns `TourError::InvalidTransition` while the controls are hidden.
    pub fn choose_guided_tour(&self) -> Result<(), TourError> {
        self.choose(Route::Home, "choose guided tour")
    }

    /// The always-visible "About" link.
    pub fn open_about(&self) {
        self.navigator.navigate(&Route::About);
    }

    fn choose(&self, route: Route, action: &'static str) -> Result<(), TourError> {
        if !self.stage.borrow().view.navigation_controls_visible {
            return Err(TourError::invalid_transition(
                "navigation controls hidden",
                action,
            ));
        }
        info!(route = %route, "leaving guided tour");
        self.navigator.navigate(&route);
        Ok(())
    }

    /// Reports an asynchronous playback failure from the audio backend.
    pub fn on_playback_error(&mut self, cue: &CueId, error: &TourError) {
        self.audio.on_playback_error(cue, error);
    }

    /// The scene as the renderer should draw it now.
    #[must_use]
    pub fn view(&self) -> SceneView {
        let stage = self.stage.borrow();
        let mut view = stage.view.clone();
        view.camera = stage.camera.pose();
        view
    }

    /// Whether the camera is within `epsilon` of its scripted target.
    #[must_use]
    pub fn camera_converged(&self, epsilon: f64) -> bool {
        self.stage.borrow().camera.is_converged(epsilon)
    }

    /// Cancels frame registrations and pending effects and silences audio.
    /// Idempotent.
    pub fn teardown(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.cancel();
            let mut stage = self.stage.borrow_mut();
            stage.timeline.cancel_all();
            stage.camera.detach();
            info!(session_id = %self.sequencer.session_id(), "guided tour torn down");
        }
        self.audio.stop_all();
    }

    fn apply_pending(&mut self) {
        for signal in self.sequencer.drain_signals() {
            match &signal.kind {
                NarrativeSignalKind::SequenceStarted(_) => {}
                NarrativeSignalKind::StepEntered(entered) => self.enter_step(entered),
                NarrativeSignalKind::SequenceCompleted(completed) => {
                    info!(
                        step = completed.step_index,
                        finished_early = completed.finished_early,
                        "guided tour completed"
                    );
                }
            }
            self.applied.push(signal);
        }
    }

    fn enter_step(&mut self, entered: &StepEntered) {
        let step = &entered.step;
        match &step.cue {
            Some(cue) => self.audio.play(cue),
            None => self.audio.stop_all(),
        }

        let mut stage = self.stage.borrow_mut();
        stage.view.narration = Some(step.narration.clone());
        stage.view.asset.clone_from(&step.asset);
        stage.view.step_index = Some(entered.step_index);
        stage.view.is_last_step = entered.is_last;
        if let Some(reaction) = step.reaction {
            stage.view.reaction = reaction;
        }
        if let Some(target) = step.camera_target {
            stage.apply(StageEffect::FocusCamera { target });
        }
        for trigger in &step.triggers {
            if trigger.delay.is_zero() {
                stage.apply(trigger.effect);
            } else {
                stage
                    .timeline
                    .schedule(trigger.delay, Deferred::Stage(trigger.effect));
            }
        }
    }
}

impl SignalSource for GuidedTour {
    type Signal = NarrativeSignal;

    fn session_id(&self) -> Uuid {
        self.sequencer.session_id()
    }

    fn pending_signals(&self) -> &[Self::Signal] {
        &self.applied
    }

    fn drain_signals(&mut self) -> Vec<Self::Signal> {
        std::mem::take(&mut self.applied)
    }
}

impl Drop for GuidedTour {
    fn drop(&mut self) {
        self.teardown();
    }
}
