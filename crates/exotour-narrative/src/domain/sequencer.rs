//! Narration sequencer.

use std::fmt;

use exotour_content::domain::steps::{Step, StepTable};
use exotour_core::error::TourError;
use exotour_core::event::{Clock, SignalMetadata};
use exotour_core::machine::SignalSource;
use tracing::debug;
use uuid::Uuid;

use super::signals::{
    NarrativeSignal, NarrativeSignalKind, SequenceCompleted, SequenceStarted, StepEntered,
};

/// Where a sequence is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceState {
    /// Not started.
    Idle,
    /// Displaying a step that is not the last.
    Active {
        /// Current step.
        step: usize,
    },
    /// Finished; the given step stays displayed.
    Complete {
        /// Step that stays displayed.
        step: usize,
    },
}

impl fmt::Display for SequenceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => f.write_str("idle"),
            Self::Active { step } => write!(f, "active at step {step}"),
            Self::Complete { step } => write!(f, "complete at step {step}"),
        }
    }
}

/// Owns the current step of a guided sequence and emits a signal for every
/// transition.
///
/// Steps are strictly linear. Entering the final step completes the
/// sequence. Rejected transitions leave the state untouched.
#[derive(Debug)]
pub struct NarrationSequencer {
    session_id: Uuid,
    table: StepTable,
    state: SequenceState,
    emitted: u64,
    pending: Vec<NarrativeSignal>,
}

impl NarrationSequencer {
    /// Creates an idle sequencer over `table`.
    ///
    /// # Errors
    ///
    /// Returns `TourError::Validation` if the table has no steps.
    pub fn new(session_id: Uuid, table: StepTable) -> Result<Self, TourError> {
        if table.is_empty() {
            return Err(TourError::Validation(format!(
                "step table '{}' has no steps",
                table.name()
            )));
        }
        Ok(Self {
            session_id,
            table,
            state: SequenceState::Idle,
            emitted: 0,
            pending: Vec::new(),
        })
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> SequenceState {
        self.state
    }

    /// The step table.
    #[must_use]
    pub fn table(&self) -> &StepTable {
        &self.table
    }

    /// The displayed step, if the sequence has started.
    #[must_use]
    pub fn current_step(&self) -> Option<Step<'_>> {
        match self.state {
            SequenceState::Idle => None,
            SequenceState::Active { step } | SequenceState::Complete { step } => {
                self.table.step_at(step)
            }
        }
    }

    /// Whether the sequence is between `start` and completion.
    #[must_use]
    pub fn is_active(&self) -> bool {
        matches!(self.state, SequenceState::Active { .. })
    }

    /// Whether the sequence has completed.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        matches!(self.state, SequenceState::Complete { .. })
    }

    /// Enters step 0.
    ///
    /// # Errors
    ///
    /// Returns `TourError::InvalidTransition` unless the sequence is idle.
    pub fn start(&mut self, clock: &dyn Clock) -> Result<(), TourError> {
        if self.state != SequenceState::Idle {
            return Err(TourError::invalid_transition(self.state, "start"));
        }
        self.emit(
            NarrativeSignalKind::SequenceStarted(SequenceStarted {
                table: self.table.name().to_owned(),
                step_count: self.table.len(),
            }),
            clock,
        );
        self.enter(0, clock);
        Ok(())
    }

    /// Enters the next step.
    ///
    /// # Errors
    ///
    /// Returns `TourError::InvalidTransition` unless the sequence is active.
    pub fn advance(&mut self, clock: &dyn Clock) -> Result<(), TourError> {
        let SequenceState::Active { step } = self.state else {
            return Err(TourError::invalid_transition(self.state, "advance"));
        };
        self.enter(step + 1, clock);
        Ok(())
    }

    /// Completes the sequence at the current step.
    ///
    /// # Errors
    ///
    /// Returns `TourError::InvalidTransition` unless the sequence is active.
    pub fn finish(&mut self, clock: &dyn Clock) -> Result<(), TourError> {
        let SequenceState::Active { step } = self.state else {
            return Err(TourError::invalid_transition(self.state, "finish"));
        };
        self.complete(step, true, clock);
        Ok(())
    }

    fn enter(&mut self, index: usize, clock: &dyn Clock) {
        let Some(step) = self.table.step_at(index) else {
            return;
        };
        let is_last = step.is_last;
        let descriptor = step.descriptor.clone();
        debug!(
            session_id = %self.session_id,
            table = self.table.name(),
            step = index,
            is_last,
            "step entered"
        );
        self.state = SequenceState::Active { step: index };
        self.emit(
            NarrativeSignalKind::StepEntered(StepEntered {
                step_index: index,
                is_last,
                step: descriptor,
            }),
            clock,
        );
        if is_last {
            self.complete(index, false, clock);
        }
    }

    fn complete(&mut self, index: usize, finished_early: bool, clock: &dyn Clock) {
        debug!(
            session_id = %self.session_id,
            table = self.table.name(),
            step = index,
            finished_early,
            "sequence completed"
        );
        self.state = SequenceState::Complete { step: index };
        self.emit(
            NarrativeSignalKind::SequenceCompleted(SequenceCompleted {
                step_index: index,
                finished_early,
            }),
            clock,
        );
    }

    fn emit(&mut self, kind: NarrativeSignalKind, clock: &dyn Clock) {
        self.emitted += 1;
        let metadata =
            SignalMetadata::next(kind.type_name(), self.session_id, self.emitted, clock);
        self.pending.push(NarrativeSignal { metadata, kind });
    }
}

impl SignalSource for NarrationSequencer {
    type Signal = NarrativeSignal;

    fn session_id(&self) -> Uuid {
        self.session_id
    }

    fn pending_signals(&self) -> &[Self::Signal] {
        &self.pending
    }

    fn drain_signals(&mut self) -> Vec<Self::Signal> {
        std::mem::take(&mut self.pending)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use exotour_content::domain::steps::{CueId, StepDescriptor};
    use exotour_core::event::Signal;
    use exotour_test_support::FixedClock;

    use super::*;

    fn table(steps: usize) -> StepTable {
        let descriptors = (0..steps)
            .map(|i| {
                let mut step = StepDescriptor::narration(format!("step {i}").as_str());
                step.cue = Some(CueId::new(format!("cue{i}")));
                step
            })
            .collect();
        StepTable::new("test", BTreeMap::new(), descriptors)
    }

    fn sequencer(steps: usize) -> NarrationSequencer {
        NarrationSequencer::new(Uuid::new_v4(), table(steps)).unwrap()
    }

    fn types(signals: &[NarrativeSignal]) -> Vec<&'static str> {
        signals.iter().map(Signal::signal_type).collect()
    }

    #[test]
    fn test_new_rejects_empty_table() {
        let result = NarrationSequencer::new(Uuid::new_v4(), table(0));

        assert!(matches!(result, Err(TourError::Validation(_))));
    }

    #[test]
    fn test_start_enters_first_step() {
        // Arrange
        let clock = FixedClock::standard();
        let mut sequencer = sequencer(4);

        // Act
        sequencer.start(&clock).unwrap();

        // Assert
        assert_eq!(sequencer.state(), SequenceState::Active { step: 0 });
        let signals = sequencer.drain_signals();
        assert_eq!(
            types(&signals),
            vec!["narrative.sequence_started", "narrative.step_entered"]
        );
        let meta = signals[1].metadata();
        assert_eq!(meta.sequence_number, 2);
        assert_eq!(meta.session_id, sequencer.session_id());
        assert_eq!(meta.occurred_at, clock.0);
    }

    #[test]
    fn test_step_count_minus_one_advances_reach_complete() {
        // Arrange
        let clock = FixedClock::standard();
        let mut sequencer = sequencer(4);
        sequencer.start(&clock).unwrap();

        // Act
        for _ in 0..3 {
            sequencer.advance(&clock).unwrap();
        }

        // Assert
        assert_eq!(sequencer.state(), SequenceState::Complete { step: 3 });
        assert!(sequencer.current_step().unwrap().is_last);
        let signals = sequencer.drain_signals();
        assert_eq!(
            types(&signals).last().copied(),
            Some("narrative.sequence_completed")
        );
    }

    #[test]
    fn test_advance_after_complete_is_noop() {
        // Arrange
        let clock = FixedClock::standard();
        let mut sequencer = sequencer(2);
        sequencer.start(&clock).unwrap();
        sequencer.advance(&clock).unwrap();
        sequencer.drain_signals();

        // Act
        let result = sequencer.advance(&clock);

        // Assert
        assert!(matches!(result, Err(TourError::InvalidTransition { .. })));
        assert_eq!(sequencer.state(), SequenceState::Complete { step: 1 });
        assert!(sequencer.pending_signals().is_empty());
    }

    #[test]
    fn test_advance_from_idle_is_invalid_transition() {
        // Arrange
        let clock = FixedClock::standard();
        let mut sequencer = sequencer(3);

        // Act
        let result = sequencer.advance(&clock);

        // Assert
        assert!(matches!(result, Err(TourError::InvalidTransition { .. })));
        assert_eq!(sequencer.state(), SequenceState::Idle);
        assert!(sequencer.pending_signals().is_empty());
    }

    #[test]
    fn test_start_twice_is_invalid_transition() {
        let clock = FixedClock::standard();
        let mut sequencer = sequencer(3);
        sequencer.start(&clock).unwrap();

        let result = sequencer.start(&clock);

        assert!(matches!(result, Err(TourError::InvalidTransition { .. })));
    }

    #[test]
    fn test_finish_completes_at_current_step() {
        // Arrange
        let clock = FixedClock::standard();
        let mut sequencer = sequencer(4);
        sequencer.start(&clock).unwrap();
        sequencer.advance(&clock).unwrap();
        sequencer.drain_signals();

        // Act
        sequencer.finish(&clock).unwrap();

        // Assert
        assert_eq!(sequencer.state(), SequenceState::Complete { step: 1 });
        let signals = sequencer.drain_signals();
        match &signals[0].kind {
            NarrativeSignalKind::SequenceCompleted(payload) => {
                assert_eq!(payload.step_index, 1);
                assert!(payload.finished_early);
            }
            other => panic!("expected SequenceCompleted, got {other:?}"),
        }
    }

    #[test]
    fn test_single_step_table_completes_on_start() {
        let clock = FixedClock::standard();
        let mut sequencer = sequencer(1);

        sequencer.start(&clock).unwrap();

        assert_eq!(sequencer.state(), SequenceState::Complete { step: 0 });
    }

    #[test]
    fn test_each_step_entered_once_with_its_cue() {
        // Arrange
        let clock = FixedClock::standard();
        let mut sequencer = sequencer(3);

        // Act
        sequencer.start(&clock).unwrap();
        sequencer.advance(&clock).unwrap();
        sequencer.advance(&clock).unwrap();

        // Assert
        let cues: Vec<String> = sequencer
            .drain_signals()
            .into_iter()
            .filter_map(|signal| match signal.kind {
                NarrativeSignalKind::StepEntered(entered) => entered.step.cue,
                _ => None,
            })
            .map(|cue| cue.to_string())
            .collect();
        assert_eq!(cues, vec!["cue0", "cue1", "cue2"]);
    }

    #[test]
    fn test_sequence_numbers_increase_across_drains() {
        // Arrange
        let clock = FixedClock::standard();
        let mut sequencer = sequencer(3);
        sequencer.start(&clock).unwrap();
        let first = sequencer.drain_signals();

        // Act
        sequencer.advance(&clock).unwrap();
        let second = sequencer.drain_signals();

        // Assert
        assert_eq!(first.last().unwrap().metadata.sequence_number, 2);
        assert_eq!(second[0].metadata.sequence_number, 3);
    }
}
