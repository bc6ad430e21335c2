//! One-shot deferred effects measured on frame time.
//!
//! The timeline only moves when frames are rendered, so a hidden view
//! pauses its pending effects instead of firing them all at once on return.

use std::time::Duration;

/// Identifies a scheduled effect so it can be cancelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ScheduleId(u64);

#[derive(Debug)]
struct Scheduled<E> {
    id: ScheduleId,
    due: Duration,
    effect: E,
}

/// A queue of effects, each released once its delay has elapsed.
#[derive(Debug)]
pub struct Timeline<E> {
    now: Duration,
    next_id: u64,
    pending: Vec<Scheduled<E>>,
}

impl<E> Default for Timeline<E> {
    fn default() -> Self {
        Self {
            now: Duration::ZERO,
            next_id: 0,
            pending: Vec::new(),
        }
    }
}

impl<E> Timeline<E> {
    /// Creates an empty timeline at time zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Time accumulated from frame deltas.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Number of effects not yet released.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Schedules `effect` to be released `delay` from now.
    pub fn schedule(&mut self, delay: Duration, effect: E) -> ScheduleId {
        let id = ScheduleId(self.next_id);
        self.next_id += 1;
        self.pending.push(Scheduled {
            id,
            due: self.now + delay,
            effect,
        });
        id
    }

    /// Drops a scheduled effect. Returns whether it was still pending.
    pub fn cancel(&mut self, id: ScheduleId) -> bool {
        let before = self.pending.len();
        self.pending.retain(|scheduled| scheduled.id != id);
        self.pending.len() != before
    }

    /// Drops every pending effect.
    pub fn cancel_all(&mut self) {
        self.pending.clear();
    }

    /// Moves time forward and returns the effects that came due, earliest
    /// first and in scheduling order for equal due times.
    pub fn advance(&mut self, delta: Duration) -> Vec<E> {
        self.now += delta;
        let now = self.now;
        let (mut due, pending): (Vec<_>, Vec<_>) = std::mem::take(&mut self.pending)
            .into_iter()
            .partition(|scheduled| scheduled.due <= now);
        self.pending = pending;
        due.sort_by_key(|scheduled| (scheduled.due, scheduled.id));
        due.into_iter().map(|scheduled| scheduled.effect).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: Duration = Duration::from_millis(100);

    #[test]
    fn test_effect_released_once_delay_elapses() {
        // Arrange
        let mut timeline = Timeline::new();
        timeline.schedule(Duration::from_millis(250), "fade");

        // Act
        let early = timeline.advance(FRAME);
        let still_early = timeline.advance(FRAME);
        let due = timeline.advance(FRAME);
        let after = timeline.advance(FRAME);

        // Assert
        assert!(early.is_empty());
        assert!(still_early.is_empty());
        assert_eq!(due, vec!["fade"]);
        assert!(after.is_empty());
    }

    #[test]
    fn test_effects_released_in_due_then_schedule_order() {
        // Arrange
        let mut timeline = Timeline::new();
        timeline.schedule(Duration::from_millis(200), "late");
        timeline.schedule(Duration::from_millis(100), "first");
        timeline.schedule(Duration::from_millis(100), "second");

        // Act
        let due = timeline.advance(Duration::from_millis(300));

        // Assert
        assert_eq!(due, vec!["first", "second", "late"]);
    }

    #[test]
    fn test_delay_is_relative_to_scheduling_time() {
        // Arrange
        let mut timeline = Timeline::new();
        timeline.advance(Duration::from_secs(5));

        // Act
        timeline.schedule(Duration::from_secs(1), "zoom");
        let early = timeline.advance(Duration::from_millis(900));
        let due = timeline.advance(FRAME);

        // Assert
        assert!(early.is_empty());
        assert_eq!(due, vec!["zoom"]);
    }

    #[test]
    fn test_cancelled_effect_never_released() {
        // Arrange
        let mut timeline = Timeline::new();
        let id = timeline.schedule(FRAME, "fade");

        // Act
        let cancelled = timeline.cancel(id);
        let due = timeline.advance(Duration::from_secs(1));

        // Assert
        assert!(cancelled);
        assert!(due.is_empty());
        assert!(!timeline.cancel(id));
    }

    #[test]
    fn test_cancel_all_clears_pending() {
        let mut timeline = Timeline::new();
        timeline.schedule(FRAME, 1);
        timeline.schedule(FRAME * 2, 2);

        timeline.cancel_all();

        assert_eq!(timeline.pending_count(), 0);
        assert!(timeline.advance(FRAME * 3).is_empty());
    }
}
