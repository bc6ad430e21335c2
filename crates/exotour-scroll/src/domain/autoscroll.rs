//! Autoscroll driver.

use std::fmt;

use exotour_core::error::TourError;
use exotour_core::frame::{FrameControl, FrameTask, FrameTime};
use exotour_core::scroll::ScrollSurface;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Slack, in surface units, under which the surface counts as scrolled to
/// the end.
pub const END_TOLERANCE: f64 = 1.0;

/// Tunables for an [`AutoscrollDriver`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AutoscrollConfig {
    /// Units to scroll per frame. May be fractional.
    pub rate: f64,
}

impl AutoscrollConfig {
    /// Whole-page scrolling.
    #[must_use]
    pub fn page() -> Self {
        Self { rate: 2.0 }
    }

    /// Slow container scrolling (the credits panel).
    #[must_use]
    pub fn container() -> Self {
        Self { rate: 0.3 }
    }
}

impl Default for AutoscrollConfig {
    fn default() -> Self {
        Self::page()
    }
}

/// Whether the driver is moving or waiting for more content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AutoscrollState {
    /// Advancing every frame.
    Scrolling,
    /// At the end; re-checking the content size every frame.
    Parked,
}

impl fmt::Display for AutoscrollState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scrolling => f.write_str("scrolling"),
            Self::Parked => f.write_str("parked"),
        }
    }
}

/// Advances a [`ScrollSurface`] toward its end, one frame at a time.
///
/// Fractional rates accumulate across frames and only whole units are
/// passed to the surface. The distance owed is recomputed from the frame
/// count of the current run, so rounding never compounds.
#[derive(Debug)]
pub struct AutoscrollDriver<S> {
    surface: S,
    rate: f64,
    frames: u64,
    emitted: u64,
    state: AutoscrollState,
}

impl<S: ScrollSurface> AutoscrollDriver<S> {
    /// Creates a driver for `surface`.
    ///
    /// # Errors
    ///
    /// Returns `TourError::Validation` if the rate is not a positive finite
    /// number.
    pub fn new(surface: S, config: AutoscrollConfig) -> Result<Self, TourError> {
        if !(config.rate.is_finite() && config.rate > 0.0) {
            return Err(TourError::Validation(format!(
                "autoscroll rate must be positive, got {}",
                config.rate
            )));
        }
        Ok(Self {
            surface,
            rate: config.rate,
            frames: 0,
            emitted: 0,
            state: AutoscrollState::Scrolling,
        })
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> AutoscrollState {
        self.state
    }

    /// The driven surface.
    #[must_use]
    pub fn surface(&self) -> &S {
        &self.surface
    }

    fn at_end(&self) -> bool {
        self.surface.position() + self.surface.viewport()
            >= self.surface.content() - END_TOLERANCE
    }

    /// Runs one frame: scrolls, parks or resumes.
    pub fn tick(&mut self) -> AutoscrollState {
        match self.state {
            AutoscrollState::Parked => {
                if !self.at_end() {
                    debug!(content = self.surface.content(), "content grew, resuming autoscroll");
                    self.state = AutoscrollState::Scrolling;
                }
            }
            AutoscrollState::Scrolling => {
                if self.at_end() {
                    info!(position = self.surface.position(), "autoscroll reached the end");
                    self.state = AutoscrollState::Parked;
                    self.frames = 0;
                    self.emitted = 0;
                } else {
                    self.advance();
                }
            }
        }
        self.state
    }

    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_precision_loss,
        clippy::cast_sign_loss
    )]
    fn advance(&mut self) {
        self.frames += 1;
        let owed = (self.frames as f64 * self.rate).floor() as u64;
        let delta = owed.saturating_sub(self.emitted);
        if delta > 0 {
            let delta = u32::try_from(delta).unwrap_or(u32::MAX);
            self.emitted += u64::from(delta);
            self.surface.scroll_by(delta);
        }
    }
}

impl<S: ScrollSurface> FrameTask for AutoscrollDriver<S> {
    fn on_frame(&mut self, _time: FrameTime) -> FrameControl {
        self.tick();
        FrameControl::Continue
    }
}

#[cfg(test)]
mod tests {
    use exotour_test_support::FakeScrollSurface;

    use super::*;

    fn driver(
        viewport: f64,
        content: f64,
        rate: f64,
    ) -> (FakeScrollSurface, AutoscrollDriver<FakeScrollSurface>) {
        let surface = FakeScrollSurface::new(viewport, content);
        let driver = AutoscrollDriver::new(surface.clone(), AutoscrollConfig { rate }).unwrap();
        (surface, driver)
    }

    #[test]
    fn test_new_rejects_non_positive_rate() {
        for rate in [0.0, -2.0, f64::INFINITY] {
            let result = AutoscrollDriver::new(
                FakeScrollSurface::new(100.0, 1000.0),
                AutoscrollConfig { rate },
            );

            assert!(matches!(result, Err(TourError::Validation(_))));
        }
    }

    #[test]
    fn test_fractional_rate_emits_only_whole_units() {
        // Arrange
        let (surface, mut driver) = driver(100.0, 1000.0, 0.3);

        // Act
        for _ in 0..9 {
            driver.tick();
        }

        // Assert
        let calls = surface.scroll_calls();
        assert_eq!(calls, vec![1, 1]);
        assert!((surface.current_position() - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_fractional_rate_does_not_drift_over_long_run() {
        // Arrange
        let (surface, mut driver) = driver(100.0, 10_000.0, 0.3);

        // Act
        for _ in 0..1000 {
            driver.tick();
        }

        // Assert
        let calls = surface.scroll_calls();
        assert_eq!(calls.iter().map(|&d| u64::from(d)).sum::<u64>(), 300);
        assert!(calls.iter().all(|&d| d == 1));
        assert!((surface.current_position() - 300.0).abs() < f64::EPSILON);
        assert_eq!(driver.state(), AutoscrollState::Scrolling);
    }

    #[test]
    fn test_constant_rate_scrolls_every_frame() {
        // Arrange
        let (surface, mut driver) = driver(100.0, 1000.0, 2.0);

        // Act
        for _ in 0..5 {
            driver.tick();
        }

        // Assert
        assert_eq!(surface.scroll_calls(), vec![2, 2, 2, 2, 2]);
    }

    #[test]
    fn test_parks_at_end_within_tolerance() {
        // Arrange
        let (surface, mut driver) = driver(100.0, 110.0, 2.0);

        // Act
        for _ in 0..20 {
            driver.tick();
        }

        // Assert
        assert_eq!(driver.state(), AutoscrollState::Parked);
        assert!(surface.current_position() + 100.0 >= 110.0 - END_TOLERANCE);
    }

    #[test]
    fn test_termination_is_idempotent() {
        // Arrange
        let (surface, mut driver) = driver(100.0, 110.0, 2.0);
        for _ in 0..20 {
            driver.tick();
        }
        let calls_when_parked = surface.scroll_calls().len();

        // Act
        for _ in 0..50 {
            driver.tick();
        }

        // Assert
        assert_eq!(driver.state(), AutoscrollState::Parked);
        assert_eq!(surface.scroll_calls().len(), calls_when_parked);
    }

    #[test]
    fn test_resumes_when_content_grows() {
        // Arrange
        let (surface, mut driver) = driver(100.0, 110.0, 2.0);
        for _ in 0..20 {
            driver.tick();
        }
        let parked_at = surface.current_position();

        // Act
        surface.set_content(200.0);
        driver.tick();
        driver.tick();

        // Assert
        assert_eq!(driver.state(), AutoscrollState::Scrolling);
        assert!(surface.current_position() > parked_at);
    }

    #[test]
    fn test_parked_ticks_do_not_accumulate() {
        // Arrange
        let (surface, mut driver) = driver(100.0, 110.0, 0.3);
        while driver.tick() == AutoscrollState::Scrolling {}
        let before = surface.scroll_calls().len();
        for _ in 0..100 {
            driver.tick();
        }

        // Act
        surface.set_content(500.0);
        driver.tick();
        driver.tick();

        // Assert
        assert_eq!(surface.scroll_calls().len(), before);
    }

    #[test]
    fn test_already_at_end_parks_on_first_tick() {
        let (surface, mut driver) = driver(100.0, 50.0, 2.0);

        let state = driver.tick();

        assert_eq!(state, AutoscrollState::Parked);
        assert!(surface.scroll_calls().is_empty());
    }
}
