//! Signal-source abstraction for state machines.

use uuid::Uuid;

use crate::event::Signal;

/// A state machine that records the signals produced by its transitions
/// until the host drains them.
///
/// Signals are how components coordinate without reaching into each other's
/// state: the host drains one component and calls methods on another.
pub trait SignalSource {
    /// The signal type this machine produces.
    type Signal: Signal;

    /// Returns the session this machine belongs to.
    fn session_id(&self) -> Uuid;

    /// Returns signals produced since the last drain.
    fn pending_signals(&self) -> &[Self::Signal];

    /// Removes and returns the pending signals, in emission order.
    fn drain_signals(&mut self) -> Vec<Self::Signal>;
}
