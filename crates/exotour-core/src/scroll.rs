//! Scrollable surface port.

/// A scrollable region: a page or a container. Sizes are in the surface's
/// native units (CSS pixels in a browser host).
pub trait ScrollSurface {
    /// Current scroll offset from the top.
    fn position(&self) -> f64;

    /// Height of the visible viewport.
    fn viewport(&self) -> f64;

    /// Total height of the scrollable content. May grow at any time.
    fn content(&self) -> f64;

    /// Scrolls down by a whole number of units.
    fn scroll_by(&mut self, delta: u32);
}
