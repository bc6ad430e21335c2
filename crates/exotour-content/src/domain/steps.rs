//! Step tables.
//!
//! A [`StepTable`] is the explicit, data-driven description of a guided
//! sequence. Sequencers never branch on step indices; every side effect of
//! entering a step is read from its [`StepDescriptor`].

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use exotour_core::pose::CameraTarget;
use serde::{Deserialize, Serialize};

use super::narration::Narration;

/// Identifier of an audio cue declared by a script.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CueId(String);

impl CueId {
    /// Creates a cue id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CueId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Pose the on-screen guide takes while a step is displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Reaction {
    /// Talking, idle pose.
    #[default]
    Normal,
    /// Pointing at the scene.
    Pointing,
    /// Thumbs up.
    ThumbsUp,
}

/// A visibility or control change applied when a step is entered.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum StageEffect {
    /// Fade the guide character out.
    HideGuide,
    /// Hide the narration panel.
    HideNarrationPanel,
    /// Start a scripted camera move.
    FocusCamera {
        /// Where the camera should end up.
        target: CameraTarget,
    },
    /// Hand the camera to the free-orbit collaborator.
    EnableFreeControl,
    /// Show the "Guided Tour" / "Free Navigation" controls.
    ShowNavigationControls,
}

/// An effect scheduled relative to entering a step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StepTrigger {
    /// Delay after entering the step. Zero means "immediately".
    pub delay: Duration,
    /// The effect.
    pub effect: StageEffect,
}

impl StepTrigger {
    /// A trigger that fires as soon as the step is entered.
    #[must_use]
    pub fn immediate(effect: StageEffect) -> Self {
        Self {
            delay: Duration::ZERO,
            effect,
        }
    }

    /// A trigger that fires `delay` after the step is entered.
    #[must_use]
    pub fn after(delay: Duration, effect: StageEffect) -> Self {
        Self { delay, effect }
    }
}

/// Everything a sequencer needs to know about one step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepDescriptor {
    /// Narration shown while the step is displayed.
    pub narration: Narration,
    /// Optional illustrative asset (image path).
    pub asset: Option<String>,
    /// Optional audio cue.
    pub cue: Option<CueId>,
    /// Optional camera target, applied on entry.
    pub camera_target: Option<CameraTarget>,
    /// Optional guide reaction. `None` keeps the previous one.
    pub reaction: Option<Reaction>,
    /// Effects applied on entry, each exactly once.
    pub triggers: Vec<StepTrigger>,
}

impl StepDescriptor {
    /// A step that only shows narration.
    pub fn narration(narration: impl Into<Narration>) -> Self {
        Self {
            narration: narration.into(),
            asset: None,
            cue: None,
            camera_target: None,
            reaction: None,
            triggers: Vec::new(),
        }
    }
}

/// A step resolved against its table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Step<'a> {
    /// 0-based ordinal.
    pub index: usize,
    /// Whether this is the final step of the table.
    pub is_last: bool,
    /// The step's content.
    pub descriptor: &'a StepDescriptor,
}

/// An ordered, non-empty list of steps plus the cues they may reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepTable {
    name: String,
    cues: BTreeMap<CueId, String>,
    steps: Vec<StepDescriptor>,
    content_hash: Option<String>,
}

impl StepTable {
    /// Builds a table. Callers are expected to have validated `steps` is
    /// non-empty; the script loader does.
    pub fn new(
        name: impl Into<String>,
        cues: BTreeMap<CueId, String>,
        steps: Vec<StepDescriptor>,
    ) -> Self {
        Self {
            name: name.into(),
            cues,
            steps,
            content_hash: None,
        }
    }

    /// Attaches the hash of the source document.
    #[must_use]
    pub fn with_content_hash(mut self, hash: String) -> Self {
        self.content_hash = Some(hash);
        self
    }

    /// Script name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Hex SHA-256 of the source document, when loaded from one.
    #[must_use]
    pub fn content_hash(&self) -> Option<&str> {
        self.content_hash.as_deref()
    }

    /// Number of steps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether the table has no steps.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Resolves step `index`.
    #[must_use]
    pub fn step_at(&self, index: usize) -> Option<Step<'_>> {
        self.steps.get(index).map(|descriptor| Step {
            index,
            is_last: index + 1 == self.steps.len(),
            descriptor,
        })
    }

    /// Iterates all steps in order.
    pub fn steps(&self) -> impl Iterator<Item = Step<'_>> {
        (0..self.steps.len()).filter_map(|index| self.step_at(index))
    }

    /// The source for `cue`, if the script declares it.
    #[must_use]
    pub fn cue_source(&self, cue: &CueId) -> Option<&str> {
        self.cues.get(cue).map(String::as_str)
    }

    /// Declared cues, keyed by id.
    #[must_use]
    pub fn cues(&self) -> &BTreeMap<CueId, String> {
        &self.cues
    }
}
