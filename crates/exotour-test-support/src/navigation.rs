//! Test navigator.

use std::cell::RefCell;

use exotour_core::navigation::{Navigator, Route};

/// A navigator that records the routes it was asked to visit.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    visited: RefCell<Vec<Route>>,
}

impl RecordingNavigator {
    /// Creates a navigator with no history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Routes visited so far, in order.
    #[must_use]
    pub fn visited(&self) -> Vec<Route> {
        self.visited.borrow().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, route: &Route) {
        self.visited.borrow_mut().push(route.clone());
    }
}
