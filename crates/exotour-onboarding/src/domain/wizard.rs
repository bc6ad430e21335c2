//! Onboarding wizard.

use std::fmt;
use std::sync::Arc;

use exotour_content::domain::steps::{Step, StepTable};
use exotour_core::error::TourError;
use exotour_core::event::{Clock, SignalMetadata};
use exotour_core::machine::SignalSource;
use exotour_core::storage::KeyValueStore;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::signals::{
    OnboardingSignal, OnboardingSignalKind, WizardClosed, WizardOpened, WizardStepShown,
};

/// Persistence key of the "already seen" flag.
pub const VISITED_KEY: &str = "hwoVisited";

/// Value written to [`VISITED_KEY`] on close.
pub const VISITED_VALUE: &str = "true";

/// Where the wizard is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardState {
    /// Never opened in this mount (the flag was already set).
    Closed,
    /// Showing a step.
    Open {
        /// Displayed step.
        step: usize,
    },
    /// Closed by the user; stays closed.
    Dismissed,
}

impl fmt::Display for WizardState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Closed => f.write_str("closed"),
            Self::Open { step } => write!(f, "open at step {step}"),
            Self::Dismissed => f.write_str("dismissed"),
        }
    }
}

/// A bounded step sequence shown only on the first visit.
///
/// The flag is read once at mount and written once on close.
pub struct OnboardingWizard {
    session_id: Uuid,
    table: StepTable,
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    auto_open: bool,
    state: WizardState,
    emitted: u64,
    pending: Vec<OnboardingSignal>,
}

impl fmt::Debug for OnboardingWizard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OnboardingWizard")
            .field("session_id", &self.session_id)
            .field("table", &self.table.name())
            .field("auto_open", &self.auto_open)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl OnboardingWizard {
    /// Mounts the wizard, opening it at step 0 unless the flag is set.
    ///
    /// A store that cannot be read is treated as "already seen": the wizard
    /// stays closed rather than nagging on every visit.
    ///
    /// # Errors
    ///
    /// Returns `TourError::Validation` if the table has no steps.
    pub fn mount(
        table: StepTable,
        store: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, TourError> {
        if table.is_empty() {
            return Err(TourError::Validation(format!(
                "tutorial '{}' has no steps",
                table.name()
            )));
        }
        let auto_open = match store.get(VISITED_KEY) {
            Ok(flag) => flag.is_none_or(|value| value.is_empty()),
            Err(e) => {
                warn!(
                    key = VISITED_KEY,
                    error = %e,
                    "cannot read tutorial flag, keeping tutorial closed"
                );
                false
            }
        };

        let mut wizard = Self {
            session_id: Uuid::new_v4(),
            table,
            store,
            clock,
            auto_open,
            state: WizardState::Closed,
            emitted: 0,
            pending: Vec::new(),
        };
        if auto_open {
            info!(
                session_id = %wizard.session_id,
                tutorial = wizard.table.name(),
                "tutorial opened"
            );
            wizard.emit(OnboardingSignalKind::Opened(WizardOpened {
                step_count: wizard.table.len(),
            }));
            wizard.show(0);
        } else {
            debug!(tutorial = wizard.table.name(), "tutorial already seen");
        }
        Ok(wizard)
    }

    /// Whether the wizard opened at mount (the flag was never set).
    #[must_use]
    pub fn should_auto_open(&self) -> bool {
        self.auto_open
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> WizardState {
        self.state
    }

    /// Whether a step is displayed.
    #[must_use]
    pub fn is_open(&self) -> bool {
        matches!(self.state, WizardState::Open { .. })
    }

    /// The displayed step.
    #[must_use]
    pub fn current_step(&self) -> Option<Step<'_>> {
        match self.state {
            WizardState::Open { step } => self.table.step_at(step),
            WizardState::Closed | WizardState::Dismissed => None,
        }
    }

    /// Whether the displayed step is the last one.
    #[must_use]
    pub fn is_last_step(&self) -> bool {
        self.current_step().is_some_and(|step| step.is_last)
    }

    /// The tutorial's step table.
    #[must_use]
    pub fn table(&self) -> &StepTable {
        &self.table
    }

    /// Shows the next step ("Next").
    ///
    /// # Errors
    ///
    /// Returns `TourError::InvalidTransition` if the wizard is not open or
    /// is already on its last step.
    pub fn advance(&mut self) -> Result<(), TourError> {
        match self.state {
            WizardState::Open { step } if step + 1 < self.table.len() => {
                self.show(step + 1);
                Ok(())
            }
            state => Err(TourError::invalid_transition(state, "advance tutorial")),
        }
    }

    /// Closes the wizard for good ("Finish" or dismiss) and sets the flag.
    ///
    /// A failed write is logged; the wizard still closes.
    ///
    /// # Errors
    ///
    /// Returns `TourError::InvalidTransition` if the wizard is not open.
    pub fn close(&mut self) -> Result<(), TourError> {
        let WizardState::Open { step } = self.state else {
            return Err(TourError::invalid_transition(self.state, "close tutorial"));
        };
        let completed = self.is_last_step();
        let persisted = match self.store.set(VISITED_KEY, VISITED_VALUE) {
            Ok(()) => true,
            Err(e) => {
                warn!(key = VISITED_KEY, error = %e, "cannot persist tutorial flag");
                false
            }
        };
        self.state = WizardState::Dismissed;
        info!(session_id = %self.session_id, step, completed, "tutorial closed");
        self.emit(OnboardingSignalKind::Closed(WizardClosed {
            step_index: step,
            completed,
            persisted,
        }));
        Ok(())
    }

    fn show(&mut self, index: usize) {
        self.state = WizardState::Open { step: index };
        let is_last = index + 1 == self.table.len();
        debug!(session_id = %self.session_id, step = index, is_last, "tutorial step shown");
        self.emit(OnboardingSignalKind::StepShown(WizardStepShown {
            step_index: index,
            is_last,
        }));
    }

    fn emit(&mut self, kind: OnboardingSignalKind) {
        self.emitted += 1;
        let metadata = SignalMetadata::next(
            kind.type_name(),
            self.session_id,
            self.emitted,
            self.clock.as_ref(),
        );
        self.pending.push(OnboardingSignal { metadata, kind });
    }
}

impl SignalSource for OnboardingWizard {
    type Signal = OnboardingSignal;

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
