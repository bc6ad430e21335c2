//! Tour script loading.
//!
//! Scripts are YAML documents. The on-disk shape is kept separate from the
//! domain [`StepTable`] so the document can stay terse (`delay_ms`, inline
//! coordinate arrays, cue names) while the domain uses durations and typed
//! vectors.

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use exotour_core::error::TourError;
use exotour_core::pose::CameraTarget;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use tracing::{info, warn};

use crate::domain::narration::Narration;
use crate::domain::steps::{CueId, Reaction, StageEffect, StepDescriptor, StepTable, StepTrigger};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ScriptDocument {
    name: String,
    #[serde(default)]
    cues: BTreeMap<String, String>,
    steps: Vec<StepDocument>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct StepDocument {
    narration: String,
    #[serde(default)]
    asset: Option<String>,
    #[serde(default)]
    cue: Option<String>,
    #[serde(default)]
    camera_target: Option<TargetDocument>,
    #[serde(default)]
    reaction: Option<Reaction>,
    #[serde(default)]
    triggers: Vec<TriggerDocument>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(deny_unknown_fields)]
struct TargetDocument {
    position: [f64; 3],
    #[serde(default)]
    focus: [f64; 3],
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "snake_case")]
enum EffectKind {
    HideGuide,
    HideNarrationPanel,
    FocusCamera,
    EnableFreeControl,
    ShowNavigationControls,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct TriggerDocument {
    effect: EffectKind,
    #[serde(default)]
    delay_ms: u64,
    #[serde(default)]
    target: Option<TargetDocument>,
}

/// Hex SHA-256 of a script's source text.
#[must_use]
pub fn content_hash(source: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(source.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Parses and validates a YAML tour script.
///
/// # Errors
///
/// Returns `TourError::Validation` if the document is malformed, has no
/// steps, has blank narration, uses non-finite coordinates, or declares a
/// `focus_camera` trigger without a target.
pub fn parse_script(source: &str) -> Result<StepTable, TourError> {
    let document: ScriptDocument = serde_yaml::from_str(source)
        .map_err(|e| TourError::Validation(format!("malformed tour script: {e}")))?;

    if document.name.trim().is_empty() {
        return Err(TourError::Validation(
            "tour script name must not be empty".to_owned(),
        ));
    }
    if document.steps.is_empty() {
        return Err(TourError::Validation(format!(
            "tour script '{}' has no steps",
            document.name
        )));
    }

    let cues: BTreeMap<CueId, String> = document
        .cues
        .into_iter()
        .map(|(id, source)| (CueId::new(id), source))
        .collect();

    let steps = document
        .steps
        .into_iter()
        .enumerate()
        .map(|(index, step)| convert_step(&document.name, index, step, &cues))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(StepTable::new(document.name, cues, steps).with_content_hash(content_hash(source)))
}

/// Reads and parses the tour script at `path`.
///
/// # Errors
///
/// Returns `TourError::Infrastructure` if the file cannot be read, and
/// `TourError::Validation` if it is not a valid script.
pub fn load_script(path: &Path) -> Result<StepTable, TourError> {
    let source = std::fs::read_to_string(path).map_err(|e| {
        TourError::Infrastructure(format!("cannot read tour script {}: {e}", path.display()))
    })?;
    let table = parse_script(&source)?;
    info!(
        path = %path.display(),
        script = table.name(),
        steps = table.len(),
        hash = table.content_hash().unwrap_or_default(),
        "tour script loaded"
    );
    Ok(table)
}

fn convert_step(
    script: &str,
    index: usize,
    step: StepDocument,
    cues: &BTreeMap<CueId, String>,
) -> Result<StepDescriptor, TourError> {
    if step.narration.trim().is_empty() {
        return Err(TourError::Validation(format!(
            "step {index} of '{script}' has empty narration"
        )));
    }

    let cue = step.cue.map(CueId::new);
    if let Some(cue) = &cue {
        if !cues.contains_key(cue) {
            // Unknown cues are tolerated at play time, so only flag them here.
            warn!(script, step = index, cue = %cue, "step references undeclared cue");
        }
    }

    let camera_target = step
        .camera_target
        .map(|target| convert_target(script, index, target))
        .transpose()?;

    let triggers = step
        .triggers
        .into_iter()
        .map(|trigger| convert_trigger(script, index, trigger))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(StepDescriptor {
        narration: Narration::new(step.narration),
        asset: step.asset.filter(|asset| !asset.trim().is_empty()),
        cue,
        camera_target,
        reaction: step.reaction,
        triggers,
    })
}

fn convert_target(
    script: &str,
    index: usize,
    target: TargetDocument,
) -> Result<CameraTarget, TourError> {
    let finite = target
        .position
        .iter()
        .chain(target.focus.iter())
        .all(|c| c.is_finite());
    if !finite {
        return Err(TourError::Validation(format!(
            "step {index} of '{script}' has a non-finite camera coordinate"
        )));
    }
    Ok(CameraTarget::new(target.position, target.focus))
}

fn convert_trigger(
    script: &str,
    index: usize,
    trigger: TriggerDocument,
) -> Result<StepTrigger, TourError> {
    let effect = match trigger.effect {
        EffectKind::HideGuide => StageEffect::HideGuide,
        EffectKind::HideNarrationPanel => StageEffect::HideNarrationPanel,
        EffectKind::EnableFreeControl => StageEffect::EnableFreeControl,
        EffectKind::ShowNavigationControls => StageEffect::ShowNavigationControls,
        EffectKind::FocusCamera => {
            let Some(target) = trigger.target else {
                return Err(TourError::Validation(format!(
                    "step {index} of '{script}': focus_camera trigger needs a target"
                )));
            };
            StageEffect::FocusCamera {
                target: convert_target(script, index, target)?,
            }
        }
    };
    Ok(StepTrigger::after(
        Duration::from_millis(trigger.delay_ms),
        effect,
    ))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    const SCRIPT: &str = r"
name: sample
cues:
  intro: /audios/intro.mp3
steps:
  - narration: Hello there.
    cue: intro
    reaction: normal
  - narration: Done.
    triggers:
      - effect: hide_guide
      - effect: focus_camera
        delay_ms: 1000
        target:
          position: [0, 20, 50]
";

    #[test]
    fn test_parse_script_builds_step_table() {
        // Act
        let table = parse_script(SCRIPT).unwrap();

        // Assert
        assert_eq!(table.name(), "sample");
        assert_eq!(table.len(), 2);
        assert_eq!(
            table.cue_source(&CueId::from("intro")),
            Some("/audios/intro.mp3")
        );
        let first = table.step_at(0).unwrap();
        assert_eq!(first.descriptor.cue, Some(CueId::from("intro")));
        assert_eq!(first.descriptor.reaction, Some(Reaction::Normal));
    }

    #[test]
    fn test_parse_script_converts_triggers() {
        // Act
        let table = parse_script(SCRIPT).unwrap();

        // Assert
        let last = table.step_at(1).unwrap();
        assert!(last.is_last);
        assert_eq!(
            last.descriptor.triggers,
            vec![
                StepTrigger::immediate(StageEffect::HideGuide),
                StepTrigger::after(
                    Duration::from_secs(1),
                    StageEffect::FocusCamera {
                        target: CameraTarget::looking_at_origin([0.0, 20.0, 50.0]),
                    },
                ),
            ]
        );
    }

    #[test]
    fn test_parse_script_records_content_hash() {
        let table = parse_script(SCRIPT).unwrap();

        assert_eq!(table.content_hash(), Some(content_hash(SCRIPT).as_str()));
        assert_eq!(content_hash(SCRIPT).len(), 64);
    }

    #[test]
    fn test_content_hash_changes_with_content() {
        assert_ne!(content_hash("name: a"), content_hash("name: b"));
    }

    #[test]
    fn test_parse_script_without_steps_is_rejected() {
        // Act
        let result = parse_script("name: empty\nsteps: []\n");

        // Assert
        assert!(matches!(result, Err(TourError::Validation(_))));
    }

    #[test]
    fn test_parse_script_focus_without_target_is_rejected() {
        // Arrange
        let source = "name: x\nsteps:\n  - narration: a\n    triggers:\n      - effect: focus_camera\n";

        // Act
        let result = parse_script(source);

        // Assert
        assert!(matches!(result, Err(TourError::Validation(_))));
    }

    #[test]
    fn test_parse_script_tolerates_undeclared_cue() {
        // Arrange
        let source = "name: x\nsteps:\n  - narration: a\n    cue: missing\n";

        // Act
        let table = parse_script(source).unwrap();

        // Assert
        assert_eq!(
            table.step_at(0).unwrap().descriptor.cue,
            Some(CueId::from("missing"))
        );
        assert_eq!(table.cue_source(&CueId::from("missing")), None);
    }

    #[test]
    fn test_parse_script_unknown_field_is_rejected() {
        let result = parse_script("name: x\nsteps:\n  - narration: a\n    colour: red\n");

        assert!(matches!(result, Err(TourError::Validation(_))));
    }

    #[test]
    fn test_load_script_reads_file() {
        // Arrange
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        file.write_all(SCRIPT.as_bytes()).unwrap();

        // Act
        let table = load_script(file.path()).unwrap();

        // Assert
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_load_script_missing_file_is_infrastructure_error() {
        let dir = tempfile::tempdir().unwrap();

        let result = load_script(&dir.path().join("nope.yaml"));

        assert!(matches!(result, Err(TourError::Infrastructure(_))));
    }
}
