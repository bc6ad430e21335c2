//! Signals emitted by the onboarding wizard.

use exotour_core::event::{Signal, SignalMetadata};
use serde::{Deserialize, Serialize};

/// Emitted when the wizard opens at mount.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WizardOpened {
    /// Number of steps in the tutorial.
    pub step_count: usize,
}

/// Emitted whenever a step is shown.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WizardStepShown {
    /// 0-based step ordinal.
    pub step_index: usize,
    /// Whether "Finish" replaces "Next".
    pub is_last: bool,
}

/// Emitted when the wizard closes for good.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WizardClosed {
    /// Step displayed when the wizard closed.
    pub step_index: usize,
    /// Whether the user reached the final step ("Finish" rather than dismiss).
    pub completed: bool,
    /// Whether the "already seen" flag was written.
    pub persisted: bool,
}

/// Signal payload variants for the Onboarding context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OnboardingSignalKind {
    /// The wizard opened.
    Opened(WizardOpened),
    /// A step was shown.
    StepShown(WizardStepShown),
    /// The wizard closed.
    Closed(WizardClosed),
}

impl OnboardingSignalKind {
    /// Type name used in signal metadata.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Opened(_) => "onboarding.opened",
            Self::StepShown(_) => "onboarding.step_shown",
            Self::Closed(_) => "onboarding.closed",
        }
    }
}

/// Signal envelope for the Onboarding context.
#[derive(Debug, Clone)]
pub struct OnboardingSignal {
    /// Signal metadata.
    pub metadata: SignalMetadata,
    /// Signal-specific payload.
    pub kind: OnboardingSignalKind,
}

impl Signal for OnboardingSignal {
    fn signal_type(&self) -> &'static str {
        self.kind.type_name()
    }

    fn to_payload(&self) -> serde_json::Value {
        // Serialization of derived Serialize types to Value is infallible.
        serde_json::to_value(&self.kind).expect("OnboardingSignalKind serialization is infallible")
    }

    fn metadata(&self) -> &SignalMetadata {
        &self.metadata
    }
}
