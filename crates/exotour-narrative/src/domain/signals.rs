//! Signals emitted by the narration sequencer.

use exotour_content::domain::steps::StepDescriptor;
use exotour_core::event::{Signal, SignalMetadata};
use serde::{Deserialize, Serialize};

/// Emitted when a sequence leaves `Idle`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SequenceStarted {
    /// Name of the step table.
    pub table: String,
    /// Number of steps in the table.
    pub step_count: usize,
}

/// Emitted on every transition into a step. Carries everything the host
/// needs to apply the step's side effects.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepEntered {
    /// 0-based step ordinal.
    pub step_index: usize,
    /// Whether this is the final step.
    pub is_last: bool,
    /// The step's content and side effects.
    pub step: StepDescriptor,
}

/// Emitted when a sequence reaches `Complete`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SequenceCompleted {
    /// The step that stays displayed.
    pub step_index: usize,
    /// Whether `finish` ended the sequence before its final step.
    pub finished_early: bool,
}

/// Signal payload variants for the Narrative context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum NarrativeSignalKind {
    /// The sequence started.
    SequenceStarted(SequenceStarted),
    /// A step was entered.
    StepEntered(StepEntered),
    /// The sequence completed.
    SequenceCompleted(SequenceCompleted),
}

/// Signal envelope for the Narrative context.
#[derive(Debug, Clone)]
pub struct NarrativeSignal {
    /// Signal metadata.
    pub metadata: SignalMetadata,
    /// Signal-specific payload.
    pub kind: NarrativeSignalKind,
}

impl NarrativeSignalKind {
    /// Type name used in signal metadata.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::SequenceStarted(_) => "narrative.sequence_started",
            Self::StepEntered(_) => "narrative.step_entered",
            Self::SequenceCompleted(_) => "narrative.sequence_completed",
        }
    }
}

impl Signal for NarrativeSignal {
    fn signal_type(&self) -> &'static str {
        self.kind.type_name()
    }

    fn to_payload(&self) -> serde_json::Value {
        // Serialization of derived Serialize types to Value is infallible.
        serde_json::to_value(&self.kind).expect("NarrativeSignalKind serialization is infallible")
    }

    fn metadata(&self) -> &SignalMetadata {
        &self.metadata
    }
}
