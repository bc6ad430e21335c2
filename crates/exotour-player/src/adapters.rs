//! Terminal stand-ins for the browser collaborators.

use std::cell::RefCell;
use std::rc::Rc;

use exotour_core::audio::{AudioBackend, AudioChannel};
use exotour_core::error::TourError;
use exotour_core::navigation::{Navigator, Route};
use exotour_core::scroll::ScrollSurface;
use tracing::{debug, info};

/// An audio backend that logs instead of producing sound.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingAudioBackend;

impl AudioBackend for LoggingAudioBackend {
    fn load(&mut self, source: &str) -> Result<Box<dyn AudioChannel>, TourError> {
        debug!(source, "audio loaded");
        Ok(Box::new(LoggingChannel {
            source: source.to_owned(),
        }))
    }
}

struct LoggingChannel {
    source: String,
}

impl AudioChannel for LoggingChannel {
    fn play(&mut self) -> Result<(), TourError> {
        info!(source = %self.source, "audio playing");
        Ok(())
    }

    fn pause(&mut self) {
        info!(source = %self.source, "audio paused");
    }

    fn reset_position(&mut self) {
        debug!(source = %self.source, "audio rewound");
    }
}

/// A navigator that remembers the last requested route.
#[derive(Debug, Default)]
pub struct RouteLog {
    current: RefCell<Option<Route>>,
}

impl RouteLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recent route, if any.
    #[must_use]
    pub fn current(&self) -> Option<Route> {
        self.current.borrow().clone()
    }
}

impl Navigator for RouteLog {
    fn navigate(&self, route: &Route) {
        info!(route = %route, "navigating");
        *self.current.borrow_mut() = Some(route.clone());
    }
}

#[derive(Debug, Default)]
struct PageRows {
    position: f64,
    viewport: f64,
    content: f64,
}

/// A page of terminal rows. Clones share the same geometry, so the player
/// can resize what it printed while the autoscroll holds the page.
#[derive(Debug, Clone, Default)]
pub struct TerminalPage {
    rows: Rc<RefCell<PageRows>>,
}

impl TerminalPage {
    /// A page showing `viewport` rows at a time.
    #[must_use]
    pub fn new(viewport: u16) -> Self {
        Self {
            rows: Rc::new(RefCell::new(PageRows {
                viewport: f64::from(viewport),
                ..PageRows::default()
            })),
        }
    }

    /// Replaces the page height with `content` rows.
    pub fn set_content(&self, content: usize) {
        let mut rows = self.rows.borrow_mut();
        rows.content = f64::from(u32::try_from(content).unwrap_or(u32::MAX));
        rows.position = rows.position.min((rows.content - rows.viewport).max(0.0));
    }

    /// Rows scrolled past so far.
    #[must_use]
    pub fn offset(&self) -> f64 {
        self.rows.borrow().position
    }
}

impl ScrollSurface for TerminalPage {
    fn position(&self) -> f64 {
        self.rows.borrow().position
    }

    fn viewport(&self) -> f64 {
        self.rows.borrow().viewport
    }

    fn content(&self) -> f64 {
        self.rows.borrow().content
    }

    fn scroll_by(&mut self, delta: u32) {
        let mut rows = self.rows.borrow_mut();
        let max = (rows.content - rows.viewport).max(0.0);
        rows.position = (rows.position + f64::from(delta)).min(max);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logging_backend_loads_and_plays() {
        let mut backend = LoggingAudioBackend;

        let mut channel = backend.load("/audios/intro.mp3").unwrap();

        assert!(channel.play().is_ok());
    }

    #[test]
    fn test_route_log_keeps_latest_route() {
        // Arrange
        let log = RouteLog::new();

        // Act
        log.navigate(&Route::About);
        log.navigate(&Route::FreeNavigation);

        // Assert
        assert_eq!(log.current(), Some(Route::FreeNavigation));
    }

    #[test]
    fn test_terminal_page_clamps_at_bottom() {
        // Arrange
        let page = TerminalPage::new(24);
        page.set_content(30);
        let mut surface = page.clone();

        // Act
        surface.scroll_by(4);
        surface.scroll_by(4);

        // Assert
        assert!((page.offset() - 6.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_terminal_page_shrinking_pulls_offset_back() {
        // Arrange
        let page = TerminalPage::new(10);
        page.set_content(40);
        page.clone().scroll_by(25);

        // Act
        page.set_content(20);

        // Assert
        assert!((page.offset() - 10.0).abs() < f64::EPSILON);
        assert!((page.content() - 20.0).abs() < f64::EPSILON);
    }
}
