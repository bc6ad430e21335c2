//! The HWO free-navigation tutorial.

use std::sync::Arc;

use exotour_content::application::builtin::hwo_tutorial;
use exotour_content::domain::narration::NarrationSpan;
use exotour_core::error::TourError;
use exotour_core::event::Clock;
use exotour_core::storage::KeyValueStore;
use serde::Serialize;

use crate::domain::wizard::OnboardingWizard;

/// The button that closes out the displayed step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PrimaryAction {
    /// Show the next step.
    Next,
    /// Close the tutorial.
    Finish,
}

/// What the host renders for the displayed tutorial step.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TutorialCard {
    /// 0-based step ordinal.
    pub step_index: usize,
    /// Number of steps.
    pub step_count: usize,
    /// Narration with markup stripped.
    pub message: String,
    /// Narration as styled runs.
    pub spans: Vec<NarrationSpan>,
    /// Illustration, e.g. a star texture.
    pub image: Option<String>,
    /// "Next" or "Finish".
    pub primary_action: PrimaryAction,
}

/// Mounts the built-in tutorial against `store`.
///
/// # Errors
///
/// Returns `TourError::Validation` if the embedded script is invalid.
pub fn mount_hwo_tutorial(
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
) -> Result<OnboardingWizard, TourError> {
    OnboardingWizard::mount(hwo_tutorial()?, store, clock)
}

/// The card for the displayed step, or `None` while the wizard is closed.
#[must_use]
pub fn tutorial_card(wizard: &OnboardingWizard) -> Option<TutorialCard> {
    let step = wizard.current_step()?;
    let narration = &step.descriptor.narration;
    Some(TutorialCard {
        step_index: step.index,
        step_count: wizard.table().len(),
        message: narration.plain_text(),
        spans: narration.spans(),
        image: step.descriptor.asset.clone(),
        primary_action: if step.is_last {
            PrimaryAction::Finish
        } else {
            PrimaryAction::Next
        },
    })
}

#[cfg(test)]
mod tests {
    use exotour_content::domain::narration::SpanStyle;
    use exotour_test_support::{FixedClock, InMemoryKeyValueStore};

    use super::*;
    use crate::domain::wizard::{VISITED_KEY, VISITED_VALUE};

    fn mount(store: &InMemoryKeyValueStore) -> OnboardingWizard {
        mount_hwo_tutorial(Arc::new(store.clone()), Arc::new(FixedClock::standard())).unwrap()
    }

    #[test]
    fn test_first_card_is_welcome() {
        // Arrange
        let wizard = mount(&InMemoryKeyValueStore::new());

        // Act
        let card = tutorial_card(&wizard).unwrap();

        // Assert
        assert_eq!(card.step_index, 0);
        assert_eq!(card.step_count, 10);
        assert!(card.message.contains("Welcome to HWO!"));
        assert_eq!(card.primary_action, PrimaryAction::Next);
        assert!(card.image.is_none());
    }

    #[test]
    fn test_rotate_card_has_strong_label() {
        // Arrange
        let mut wizard = mount(&InMemoryKeyValueStore::new());

        // Act
        wizard.advance().unwrap();
        let card = tutorial_card(&wizard).unwrap();

        // Assert
        assert!(
            card.spans
                .iter()
                .any(|span| span.style == SpanStyle::Strong && span.text == "Rotate:")
        );
        assert!(!card.message.contains("**"));
    }

    #[test]
    fn test_texture_cards_carry_images() {
        // Arrange
        let mut wizard = mount(&InMemoryKeyValueStore::new());
        for _ in 0..5 {
            wizard.advance().unwrap();
        }

        // Act
        let card = tutorial_card(&wizard).unwrap();

        // Assert
        assert_eq!(card.image.as_deref(), Some("/textures/star2.svg"));
    }

    #[test]
    fn test_last_card_offers_finish() {
        // Arrange
        let mut wizard = mount(&InMemoryKeyValueStore::new());
        for _ in 0..9 {
            wizard.advance().unwrap();
        }

        // Act
        let card = tutorial_card(&wizard).unwrap();

        // Assert
        assert_eq!(card.primary_action, PrimaryAction::Finish);
        assert_eq!(
            card.message,
            "Explore the star system and discover fascinating exoplanets!"
        );
    }

    #[test]
    fn test_finish_then_remount_shows_no_card() {
        // Arrange
        let store = InMemoryKeyValueStore::new();
        let mut wizard = mount(&store);
        for _ in 0..9 {
            wizard.advance().unwrap();
        }

        // Act
        wizard.close().unwrap();
        let remounted = mount(&store);

        // Assert
        assert!(tutorial_card(&wizard).is_none());
        assert!(tutorial_card(&remounted).is_none());
        assert_eq!(
            store.writes(),
            vec![(VISITED_KEY.to_owned(), VISITED_VALUE.to_owned())]
        );
    }
}
