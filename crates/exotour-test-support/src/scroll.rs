//! Test scroll surface.

use std::cell::RefCell;
use std::rc::Rc;

use exotour_core::scroll::ScrollSurface;

#[derive(Debug)]
struct Geometry {
    position: f64,
    viewport: f64,
    content: f64,
    scroll_calls: Vec<u32>,
}

/// A scroll surface whose geometry tests can change mid-run. Clones share
/// the same geometry.
#[derive(Debug, Clone)]
pub struct FakeScrollSurface {
    geometry: Rc<RefCell<Geometry>>,
}

impl FakeScrollSurface {
    /// Creates a surface scrolled to the top.
    #[must_use]
    pub fn new(viewport: f64, content: f64) -> Self {
        Self {
            geometry: Rc::new(RefCell::new(Geometry {
                position: 0.0,
                viewport,
                content,
                scroll_calls: Vec::new(),
            })),
        }
    }

    /// Grows (or shrinks) the content, e.g. after late-loading media.
    pub fn set_content(&self, content: f64) {
        self.geometry.borrow_mut().content = content;
    }

    /// Current scroll offset.
    #[must_use]
    pub fn current_position(&self) -> f64 {
        self.geometry.borrow().position
    }

    /// Every delta passed to `scroll_by`, in order.
    #[must_use]
    pub fn scroll_calls(&self) -> Vec<u32> {
        self.geometry.borrow().scroll_calls.clone()
    }
}

impl ScrollSurface for FakeScrollSurface {
    fn position(&self) -> f64 {
        self.geometry.borrow().position
    }

    fn viewport(&self) -> f64 {
        self.geometry.borrow().viewport
    }

    fn content(&self) -> f64 {
        self.geometry.borrow().content
    }

    fn scroll_by(&mut self, delta: u32) {
        let mut geometry = self.geometry.borrow_mut();
        geometry.scroll_calls.push(delta);
        // Like a browser, clamp at the bottom of the content.
        let max = (geometry.content - geometry.viewport).max(0.0);
        geometry.position = (geometry.position + f64::from(delta)).min(max);
    }
}
