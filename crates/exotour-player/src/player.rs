//! The terminal player: one input at a time through the tour, the tutorial
//! and the About page.

use std::io::Write;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

use exotour_catalog::application::query_handlers::list_stars;
use exotour_catalog::domain::index::CatalogIndex;
use exotour_content::application::builtin::about_panels;
use exotour_content::domain::steps::StepTable;
use exotour_core::event::Clock;
use exotour_core::frame::{FrameLoop, FrameTicker};
use exotour_core::navigation::{Navigator, Route};
use exotour_core::storage::KeyValueStore;
use exotour_narrative::application::about_page::{AboutConfig, AboutPage};
use exotour_narrative::application::guided_tour::{GuidedTour, TourConfig};
use exotour_onboarding::application::tutorial::{PrimaryAction, mount_hwo_tutorial, tutorial_card};
use exotour_onboarding::domain::wizard::OnboardingWizard;
use tracing::{debug, info};

use crate::adapters::{LoggingAudioBackend, RouteLog, TerminalPage};
use crate::error::PlayerError;

/// Where the player is in its run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for the first input to start the tour.
    AwaitingStart,
    /// Narrating tour steps.
    Touring,
    /// The navigation controls are up; the next input picks free navigation.
    ChoosingMode,
    /// Walking the free-navigation tutorial.
    Tutorial,
    /// Reading the About page.
    About,
    /// Nothing left to play.
    Finished,
}

/// Terminal rows the About page scrolls through.
const ABOUT_VIEWPORT_ROWS: u16 = 24;

/// One line of viewer input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Enter, or any other line: the primary action.
    Continue,
    /// `about`: opens the About page.
    About,
    /// `back`: previous About panel.
    Back,
    /// `home`: leaves the About page from its last panel.
    Home,
}

impl Command {
    /// Reads a command from an input line. Unknown words count as
    /// [`Command::Continue`].
    #[must_use]
    pub fn parse(line: &str) -> Self {
        match line.trim().to_ascii_lowercase().as_str() {
            "about" => Self::About,
            "back" => Self::Back,
            "home" => Self::Home,
            _ => Self::Continue,
        }
    }
}

/// Drives a [`GuidedTour`] and then the tutorial from discrete inputs and
/// frame ticks, writing what a viewer would see to `out`.
pub struct Player<W: Write> {
    frame_loop: Rc<FrameLoop>,
    tour: Option<GuidedTour>,
    wizard: Option<OnboardingWizard>,
    routes: Rc<RouteLog>,
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    catalog: Option<CatalogIndex>,
    about: Option<AboutPage<TerminalPage>>,
    page: TerminalPage,
    phase: Phase,
    resume: Phase,
    shown_step: Option<usize>,
    out: W,
}

impl<W: Write> Player<W> {
    /// Mounts the tour for `table` and prints the start prompt.
    ///
    /// # Errors
    ///
    /// Returns `PlayerError::Tour` if the tour cannot be mounted, or
    /// `PlayerError::Io` if the prompt cannot be written.
    pub fn new(
        table: StepTable,
        store: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
        catalog: Option<CatalogIndex>,
        mut out: W,
    ) -> Result<Self, PlayerError> {
        let frame_loop = Rc::new(FrameLoop::new());
        let ticker: Rc<dyn FrameTicker> = frame_loop.clone();
        let routes = Rc::new(RouteLog::new());
        let navigator: Rc<dyn Navigator> = routes.clone();
        let tour = GuidedTour::mount(
            &ticker,
            table,
            Box::new(LoggingAudioBackend),
            navigator,
            Arc::clone(&clock),
            TourConfig::default(),
        )?;
        writeln!(out, "Press Enter to start")?;

        Ok(Self {
            frame_loop,
            tour: Some(tour),
            wizard: None,
            routes,
            store,
            clock,
            catalog,
            about: None,
            page: TerminalPage::new(ABOUT_VIEWPORT_ROWS),
            phase: Phase::AwaitingStart,
            resume: Phase::AwaitingStart,
            shown_step: None,
            out,
        })
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The last route the tour navigated to.
    #[must_use]
    pub fn route(&self) -> Option<Route> {
        self.routes.current()
    }

    /// Consumes the player and returns its output sink.
    pub fn into_output(self) -> W {
        self.out
    }

    /// Runs one frame and renders any change it caused.
    ///
    /// # Errors
    ///
    /// Returns `PlayerError::Io` if output cannot be written.
    pub fn on_frame(&mut self, delta: Duration) -> Result<(), PlayerError> {
        self.frame_loop.run_frame(delta);
        let Some(tour) = &self.tour else {
            return Ok(());
        };
        let view = tour.view();

        if view.step_index != self.shown_step {
            self.shown_step = view.step_index;
            if view.narration_panel_visible
                && let Some(narration) = &view.narration
            {
                writeln!(self.out, "Guide: {}", narration.plain_text())?;
                if !view.is_last_step {
                    writeln!(self.out, "  [Next]")?;
                }
            }
        }

        if self.phase == Phase::Touring && view.navigation_controls_visible {
            info!(camera = ?view.camera, "navigation controls shown");
            writeln!(self.out, "[Guided Tour] [Free Navigation] (Enter picks Free Navigation)")?;
            self.phase = Phase::ChoosingMode;
        }
        Ok(())
    }

    /// Handles one line of input.
    ///
    /// # Errors
    ///
    /// As [`Player::on_input`]; opening the About page can also fail with
    /// `PlayerError::Tour` if its panels cannot be loaded.
    pub fn on_command(&mut self, command: Command) -> Result<(), PlayerError> {
        match (self.phase, command) {
            (Phase::About, command) => self.step_about(command),
            (_, Command::About) => self.open_about(),
            (_, Command::Continue) => self.on_input(),
            (phase, command) => {
                debug!(?phase, ?command, "command ignored");
                Ok(())
            }
        }
    }

    /// Handles one "press any key" input.
    ///
    /// # Errors
    ///
    /// Returns `PlayerError::Tour` if the tutorial store fails in a way the
    /// wizard does not absorb, or `PlayerError::Io` on output failure.
    pub fn on_input(&mut self) -> Result<(), PlayerError> {
        match self.phase {
            Phase::AwaitingStart => {
                if let Some(tour) = &mut self.tour {
                    tour.start()?;
                }
                self.phase = Phase::Touring;
            }
            Phase::Touring => {
                // Past the final step the tour is only waiting on its timeline.
                if let Some(tour) = self.tour.as_mut().filter(|tour| !tour.is_complete())
                    && let Err(e) = tour.advance()
                {
                    debug!(error = %e, "advance ignored");
                }
            }
            Phase::ChoosingMode => {
                if let Some(mut tour) = self.tour.take() {
                    tour.choose_free_navigation()?;
                    tour.teardown();
                }
                self.shown_step = None;
                self.print_catalog_summary()?;
                self.open_tutorial()?;
            }
            Phase::Tutorial => self.step_tutorial()?,
            Phase::About => self.step_about(Command::Continue)?,
            Phase::Finished => {}
        }
        Ok(())
    }

    fn open_about(&mut self) -> Result<(), PlayerError> {
        match &self.tour {
            Some(tour) => tour.open_about(),
            None => self.routes.navigate(&Route::About),
        }
        let ticker: Rc<dyn FrameTicker> = self.frame_loop.clone();
        let navigator: Rc<dyn Navigator> = self.routes.clone();
        let page = AboutPage::mount(
            &ticker,
            about_panels()?,
            self.page.clone(),
            navigator,
            AboutConfig::default(),
        )?;
        self.about = Some(page);
        self.resume = self.phase;
        self.phase = Phase::About;
        self.render_about_panel()
    }

    fn step_about(&mut self, command: Command) -> Result<(), PlayerError> {
        let Some(page) = &mut self.about else {
            self.phase = self.resume;
            return Ok(());
        };
        let leaving = match command {
            Command::About => return Ok(()),
            Command::Continue if page.panel().home_visible => page.home().map(|()| true),
            Command::Continue => page.next().map(|()| false),
            Command::Back => page.back().map(|()| false),
            Command::Home => page.home().map(|()| true),
        };
        match leaving {
            Ok(true) => self.close_about(),
            Ok(false) => self.render_about_panel(),
            Err(e) => {
                debug!(error = %e, "about input ignored");
                Ok(())
            }
        }
    }

    fn close_about(&mut self) -> Result<(), PlayerError> {
        if let Some(mut page) = self.about.take() {
            page.teardown();
        }
        self.phase = self.resume;
        // Re-print the guide line that the page covered.
        self.shown_step = None;
        if self.phase == Phase::AwaitingStart {
            writeln!(self.out, "Press Enter to start")?;
        }
        Ok(())
    }

    fn render_about_panel(&mut self) -> Result<(), PlayerError> {
        let Some(page) = &self.about else {
            return Ok(());
        };
        let panel = page.panel();
        let mut lines = vec![format!("About [{}/{}]", panel.index + 1, panel.count)];
        lines.extend(panel.narration.plain_text().lines().map(str::to_owned));
        if let Some(asset) = &panel.asset {
            lines.push(format!("  (image: {asset})"));
        }
        let buttons: Vec<&str> = [
            (panel.back_visible, "[Back]"),
            (panel.next_visible, "[Next]"),
            (panel.home_visible, "[Home]"),
        ]
        .into_iter()
        .filter_map(|(visible, label)| visible.then_some(label))
        .collect();
        lines.push(format!("  {}", buttons.join(" ")));

        self.page.set_content(lines.len());
        for line in &lines {
            writeln!(self.out, "{line}")?;
        }
        Ok(())
    }

    fn print_catalog_summary(&mut self) -> Result<(), PlayerError> {
        let Some(catalog) = &self.catalog else {
            return Ok(());
        };
        let stars = list_stars(catalog);
        writeln!(
            self.out,
            "{} planets around {} host stars",
            catalog.len(),
            stars.len()
        )?;
        for star in stars.iter().take(5) {
            writeln!(self.out, "  {} ({} planets)", star.host, star.planet_count)?;
        }
        Ok(())
    }

    fn open_tutorial(&mut self) -> Result<(), PlayerError> {
        let wizard = mount_hwo_tutorial(Arc::clone(&self.store), Arc::clone(&self.clock))?;
        if wizard.is_open() {
            self.wizard = Some(wizard);
            self.phase = Phase::Tutorial;
            self.render_card()
        } else {
            writeln!(self.out, "Tutorial already seen")?;
            self.phase = Phase::Finished;
            Ok(())
        }
    }

    fn step_tutorial(&mut self) -> Result<(), PlayerError> {
        let Some(wizard) = &mut self.wizard else {
            self.phase = Phase::Finished;
            return Ok(());
        };
        if wizard.is_last_step() {
            wizard.close()?;
            writeln!(self.out, "Tutorial finished")?;
            self.phase = Phase::Finished;
            Ok(())
        } else {
            wizard.advance()?;
            self.render_card()
        }
    }

    fn render_card(&mut self) -> Result<(), PlayerError> {
        let Some(card) = self.wizard.as_ref().and_then(tutorial_card) else {
            return Ok(());
        };
        writeln!(
            self.out,
            "[{}/{}] {}",
            card.step_index + 1,
            card.step_count,
            card.message
        )?;
        if let Some(image) = &card.image {
            writeln!(self.out, "  (image: {image})")?;
        }
        let action = match card.primary_action {
            PrimaryAction::Next => "[Next]",
            PrimaryAction::Finish => "[Finish]",
        };
        writeln!(self.out, "  {action}")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use exotour_content::application::builtin::home_tour;
    use exotour_onboarding::domain::wizard::{VISITED_KEY, VISITED_VALUE};
    use exotour_test_support::{FixedClock, InMemoryKeyValueStore};

    use super::*;

    const FRAME: Duration = Duration::from_millis(100);

    fn player(store: &InMemoryKeyValueStore) -> Player<Vec<u8>> {
        Player::new(
            home_tour().unwrap(),
            Arc::new(store.clone()),
            Arc::new(FixedClock::standard()),
            None,
            Vec::new(),
        )
        .unwrap()
    }

    fn frames(player: &mut Player<Vec<u8>>, count: usize) {
        for _ in 0..count {
            player.on_frame(FRAME).unwrap();
        }
    }

    fn play_tour(player: &mut Player<Vec<u8>>) {
        player.on_input().unwrap();
        frames(player, 1);
        for _ in 0..3 {
            player.on_input().unwrap();
            frames(player, 1);
        }
        frames(player, 50);
    }

    fn output(player: Player<Vec<u8>>) -> String {
        String::from_utf8(player.into_output()).unwrap()
    }

    #[test]
    fn test_first_input_starts_tour() {
        // Arrange
        let store = InMemoryKeyValueStore::new();
        let mut player = player(&store);

        // Act
        player.on_input().unwrap();
        frames(&mut player, 1);

        // Assert
        assert_eq!(player.phase(), Phase::Touring);
        let text = output(player);
        assert!(text.starts_with("Press Enter to start"));
        assert!(text.contains("Guide: "));
    }

    #[test]
    fn test_controls_appear_after_final_step_effects() {
        // Arrange
        let store = InMemoryKeyValueStore::new();
        let mut player = player(&store);

        // Act
        play_tour(&mut player);

        // Assert
        assert_eq!(player.phase(), Phase::ChoosingMode);
        assert!(output(player).contains("[Free Navigation]"));
    }

    #[test]
    fn test_inputs_after_final_step_wait_for_controls() {
        // Arrange
        let store = InMemoryKeyValueStore::new();
        let mut player = player(&store);
        for _ in 0..4 {
            player.on_input().unwrap();
            frames(&mut player, 1);
        }

        // Act
        player.on_input().unwrap();
        player.on_input().unwrap();
        frames(&mut player, 1);

        // Assert
        assert_eq!(player.phase(), Phase::Touring);
        assert!(player.route().is_none());
    }

    #[test]
    fn test_free_navigation_opens_tutorial_and_finish_sets_flag() {
        // Arrange
        let store = InMemoryKeyValueStore::new();
        let mut player = player(&store);
        play_tour(&mut player);

        // Act
        player.on_input().unwrap();
        let after_choice = player.phase();
        for _ in 0..10 {
            player.on_input().unwrap();
        }

        // Assert
        assert_eq!(after_choice, Phase::Tutorial);
        assert_eq!(player.phase(), Phase::Finished);
        assert_eq!(player.route(), Some(Route::FreeNavigation));
        assert_eq!(
            store.writes(),
            vec![(VISITED_KEY.to_owned(), VISITED_VALUE.to_owned())]
        );
        let text = output(player);
        assert!(text.contains("[1/10]"));
        assert!(text.contains("[10/10]"));
        assert!(text.contains("[Finish]"));
        assert!(text.contains("Tutorial finished"));
    }

    #[test]
    fn test_seen_tutorial_is_skipped() {
        // Arrange
        let store = InMemoryKeyValueStore::with_entry(VISITED_KEY, VISITED_VALUE);
        let mut player = player(&store);
        play_tour(&mut player);

        // Act
        player.on_input().unwrap();

        // Assert
        assert_eq!(player.phase(), Phase::Finished);
        assert!(store.writes().is_empty());
        assert!(output(player).contains("Tutorial already seen"));
    }

    #[test]
    fn test_command_parse_reads_known_words() {
        assert_eq!(Command::parse(""), Command::Continue);
        assert_eq!(Command::parse(" About \n"), Command::About);
        assert_eq!(Command::parse("back"), Command::Back);
        assert_eq!(Command::parse("HOME"), Command::Home);
        assert_eq!(Command::parse("anything"), Command::Continue);
    }

    #[test]
    fn test_about_mid_tour_returns_to_tour() {
        // Arrange
        let store = InMemoryKeyValueStore::new();
        let mut player = player(&store);
        player.on_input().unwrap();
        frames(&mut player, 1);

        // Act
        player.on_command(Command::About).unwrap();
        let opened = (player.phase(), player.route());
        frames(&mut player, 5);
        player.on_command(Command::Continue).unwrap();
        player.on_command(Command::Continue).unwrap();
        let registered_while_open = player.frame_loop.registered_count();
        player.on_command(Command::Continue).unwrap();
        let registered_after_close = player.frame_loop.registered_count();
        frames(&mut player, 1);

        // Assert
        assert_eq!(opened, (Phase::About, Some(Route::About)));
        assert_eq!(player.phase(), Phase::Touring);
        assert_eq!(player.route(), Some(Route::Home));
        assert_eq!(registered_after_close + 2, registered_while_open);
        let text = output(player);
        assert!(text.contains("About [1/3]"));
        assert!(text.contains("Zathura Team"));
        assert!(text.contains("  [Back] [Home]"));
        assert_eq!(text.matches("Guide: ").count(), 2);
    }

    #[test]
    fn test_about_before_start_only_leaves_from_last_panel() {
        // Arrange
        let store = InMemoryKeyValueStore::new();
        let mut player = player(&store);
        player.on_command(Command::parse("about")).unwrap();

        // Act
        player.on_command(Command::Home).unwrap();
        player.on_command(Command::Back).unwrap();
        let still_open = player.phase();
        player.on_command(Command::Continue).unwrap();
        player.on_command(Command::Continue).unwrap();
        player.on_command(Command::Back).unwrap();
        player.on_command(Command::Continue).unwrap();
        player.on_command(Command::Home).unwrap();

        // Assert
        assert_eq!(still_open, Phase::About);
        assert_eq!(player.phase(), Phase::AwaitingStart);
        assert_eq!(player.route(), Some(Route::Home));
        let text = output(player);
        assert_eq!(text.matches("About [2/3]").count(), 2);
        assert!(text.ends_with("Press Enter to start\n"));
    }

    #[test]
    fn test_about_page_scrolls_while_open() {
        // Arrange
        let store = InMemoryKeyValueStore::new();
        let mut player = player(&store);
        player.on_command(Command::About).unwrap();
        player.page.set_content(100);

        // Act
        frames(&mut player, 10);

        // Assert
        assert!((player.page.offset() - 3.0).abs() < f64::EPSILON);
    }
}
