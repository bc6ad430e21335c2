//! Frame ticker abstraction.
//!
//! All per-frame work (camera smoothing, autoscroll, deferred effects) runs
//! through a "run before next repaint" primitive instead of timers, so it
//! pauses when the view is hidden and resumes in lockstep with rendering.
//! A callback registered during frame `n` first runs in frame `n + 1`.

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, BTreeSet};
use std::rc::{Rc, Weak};
use std::time::Duration;

/// Opaque handle to a registered per-frame callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FrameHandle(u64);

/// Timing information passed to every frame callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameTime {
    /// Frame counter, starting at 1 for the first rendered frame.
    pub frame: u64,
    /// Time elapsed since the loop started, summed from frame deltas.
    pub elapsed: Duration,
    /// Time since the previous frame.
    pub delta: Duration,
}

/// Whether a callback wants to run again on the next frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameControl {
    /// Reschedule for the next frame.
    Continue,
    /// Unregister.
    Stop,
}

/// A per-frame callback.
pub type FrameCallback = Box<dyn FnMut(FrameTime) -> FrameControl>;

/// Registers and cancels per-frame callbacks.
pub trait FrameTicker {
    /// Registers a callback that runs once per frame until it returns
    /// [`FrameControl::Stop`] or is cancelled.
    fn register(&self, callback: FrameCallback) -> FrameHandle;

    /// Unregisters a callback. Cancelling an unknown or finished handle is a
    /// no-op.
    fn cancel(&self, handle: FrameHandle);
}

/// A component that does work once per frame.
pub trait FrameTask {
    /// Runs one frame of work.
    fn on_frame(&mut self, time: FrameTime) -> FrameControl;
}

/// Single-threaded frame loop driven by the host's repaint cadence.
///
/// The host calls [`FrameLoop::run_frame`] once per repaint; tests call it
/// directly to drive an exact number of ticks.
#[derive(Default)]
pub struct FrameLoop {
    next_handle: Cell<u64>,
    frame: Cell<u64>,
    elapsed: Cell<Duration>,
    running: Cell<bool>,
    callbacks: RefCell<BTreeMap<FrameHandle, FrameCallback>>,
    cancelled_while_running: RefCell<BTreeSet<FrameHandle>>,
}

impl std::fmt::Debug for FrameLoop {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameLoop")
            .field("frame", &self.frame.get())
            .field("elapsed", &self.elapsed.get())
            .field("registered", &self.registered_count())
            .finish_non_exhaustive()
    }
}

impl FrameLoop {
    /// Creates an empty frame loop.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs every registered callback once and returns the frame timing.
    pub fn run_frame(&self, delta: Duration) -> FrameTime {
        let frame = self.frame.get() + 1;
        let elapsed = self.elapsed.get() + delta;
        self.frame.set(frame);
        self.elapsed.set(elapsed);
        let time = FrameTime {
            frame,
            elapsed,
            delta,
        };

        // Callbacks may register or cancel while they run, so the map is
        // detached for the duration of the frame.
        let due = std::mem::take(&mut *self.callbacks.borrow_mut());
        self.running.set(true);
        let mut survivors = Vec::with_capacity(due.len());
        for (handle, mut callback) in due {
            if self.cancelled_while_running.borrow().contains(&handle) {
                continue;
            }
            if callback(time) == FrameControl::Continue {
                survivors.push((handle, callback));
            }
        }
        self.running.set(false);

        let cancelled = std::mem::take(&mut *self.cancelled_while_running.borrow_mut());
        let mut callbacks = self.callbacks.borrow_mut();
        for (handle, callback) in survivors {
            if !cancelled.contains(&handle) {
                callbacks.insert(handle, callback);
            }
        }
        time
    }

    /// Returns the number of callbacks waiting for the next frame.
    #[must_use]
    pub fn registered_count(&self) -> usize {
        self.callbacks.borrow().len()
    }

    /// Returns whether `handle` will run on the next frame.
    #[must_use]
    pub fn is_registered(&self, handle: FrameHandle) -> bool {
        self.callbacks.borrow().contains_key(&handle)
    }
}

impl FrameTicker for FrameLoop {
    fn register(&self, callback: FrameCallback) -> FrameHandle {
        let handle = FrameHandle(self.next_handle.get());
        self.next_handle.set(handle.0 + 1);
        self.callbacks.borrow_mut().insert(handle, callback);
        handle
    }

    fn cancel(&self, handle: FrameHandle) {
        let removed = self.callbacks.borrow_mut().remove(&handle).is_some();
        if !removed && self.running.get() {
            self.cancelled_while_running.borrow_mut().insert(handle);
        }
    }
}

/// Stop handle for a frame registration. Dropping it cancels the callback.
#[must_use = "dropping a FrameSubscription cancels the registration"]
pub struct FrameSubscription {
    handle: FrameHandle,
    ticker: Weak<dyn FrameTicker>,
}

impl std::fmt::Debug for FrameSubscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameSubscription")
            .field("handle", &self.handle)
            .finish_non_exhaustive()
    }
}

impl FrameSubscription {
    /// Returns the underlying handle.
    #[must_use]
    pub fn handle(&self) -> FrameHandle {
        self.handle
    }

    /// Cancels the registration now.
    pub fn cancel(self) {}
}

impl Drop for FrameSubscription {
    fn drop(&mut self) {
        if let Some(ticker) = self.ticker.upgrade() {
            ticker.cancel(self.handle);
        }
    }
}

/// Registers `task` on `ticker`.
///
/// The callback holds only a weak reference: once the owner drops the task,
/// the next frame unregisters the callback instead of touching a destroyed
/// view. A frame in which the task is already borrowed is skipped.
pub fn subscribe<T>(ticker: &Rc<dyn FrameTicker>, task: &Rc<RefCell<T>>) -> FrameSubscription
where
    T: FrameTask + 'static,
{
    let weak = Rc::downgrade(task);
    let handle = ticker.register(Box::new(move |time| {
        let Some(task) = weak.upgrade() else {
            return FrameControl::Stop;
        };
        let Ok(mut task) = task.try_borrow_mut() else {
            return FrameControl::Continue;
        };
        task.on_frame(time)
    }));
    FrameSubscription {
        handle,
        ticker: Rc::downgrade(ticker),
    }
}
