//! Frame binding for autoscroll.

use std::cell::RefCell;
use std::rc::Rc;

use exotour_core::error::TourError;
use exotour_core::frame::{FrameSubscription, FrameTicker, subscribe};
use exotour_core::scroll::ScrollSurface;
use tracing::debug;

use crate::domain::autoscroll::{AutoscrollConfig, AutoscrollDriver, AutoscrollState};

/// A running autoscroll. Dropping it, or calling [`AutoscrollSession::stop`],
/// unregisters the per-frame callback.
#[derive(Debug)]
pub struct AutoscrollSession<S> {
    driver: Rc<RefCell<AutoscrollDriver<S>>>,
    subscription: Option<FrameSubscription>,
}

impl<S: ScrollSurface + 'static> AutoscrollSession<S> {
    /// Starts autoscrolling `surface` on `ticker`.
    ///
    /// # Errors
    ///
    /// Returns `TourError::Validation` if the rate is invalid.
    pub fn start(
        ticker: &Rc<dyn FrameTicker>,
        surface: S,
        config: AutoscrollConfig,
    ) -> Result<Self, TourError> {
        let driver = Rc::new(RefCell::new(AutoscrollDriver::new(surface, config)?));
        let subscription = subscribe(ticker, &driver);
        debug!(rate = config.rate, "autoscroll started");
        Ok(Self {
            driver,
            subscription: Some(subscription),
        })
    }

    /// Current driver state.
    #[must_use]
    pub fn state(&self) -> AutoscrollState {
        self.driver.borrow().state()
    }

    /// Whether the per-frame callback is still registered.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.subscription.is_some()
    }

    /// Unregisters the per-frame callback. Stopping twice is a no-op.
    pub fn stop(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.cancel();
            debug!("autoscroll stopped");
        }
    }
}
