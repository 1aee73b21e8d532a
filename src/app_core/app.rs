use crate::{
    config::SiteConfig,
    domain::RouteId,
    key_handler::{self, Action},
    player::{
        AudioArbiter, EmbeddedPlayers, OutputFactory, PlayerWidget, RodioEngine, SharedArbiter,
        SharedRegistry, TrackRegistry,
    },
    transition::{Clock, SystemClock, TransitionCoordinator, TransitionEvent},
    tui,
    ui_state::{ControlView, Mode, PlayerSnapshot, UiState},
};
use anyhow::{Context, Result, anyhow};
use ratatui::crossterm::event::{Event, KeyEventKind};
use std::path::PathBuf;
use tracing::{debug, info, warn};

pub struct Overture<C: Clock = SystemClock> {
    pub(crate) config: SiteConfig,
    pub(crate) config_path: Option<PathBuf>,

    pub(crate) ui: UiState,
    pub(crate) transitions: TransitionCoordinator<C>,

    pub(crate) arbiter: SharedArbiter,
    pub(crate) registry: SharedRegistry,
    pub(crate) widget: PlayerWidget,
    pub(crate) embedded: EmbeddedPlayers,
}

impl Overture<SystemClock> {
    /// Loads the site and opens the audio device.
    pub fn new(config_path: Option<PathBuf>) -> Result<Self> {
        let config = SiteConfig::load(config_path.as_deref())?;
        let engine = RodioEngine::new(config.media_root())?;

        Self::with_parts(config, config_path, Box::new(engine), SystemClock::new())
    }
}

impl<C: Clock> Overture<C> {
    pub fn with_parts(
        config: SiteConfig,
        config_path: Option<PathBuf>,
        factory: Box<dyn OutputFactory>,
        clock: C,
    ) -> Result<Self> {
        let routes = config.route_table();
        let start = routes
            .first()
            .map(|r| r.id.clone())
            .ok_or_else(|| anyhow!("Site has no pages"))?;

        let arbiter = AudioArbiter::shared(factory);
        let registry = TrackRegistry::from_tracks(config.tracks.clone()).shared();
        let widget = PlayerWidget::new(arbiter.clone(), config.playlist())
            .context("Could not set up the player")?;
        let embedded = EmbeddedPlayers::new(arbiter.clone(), registry.clone());

        let ui = UiState::new(&config, start.clone())?;
        let transitions = TransitionCoordinator::new(clock, routes, config.timings(), start);

        Ok(Overture {
            config,
            config_path,
            ui,
            transitions,
            arbiter,
            registry,
            widget,
            embedded,
        })
    }

    /// One pass over every time-driven piece of state. Safe to call as often
    /// as the loop likes.
    pub fn tick(&mut self) {
        for event in self.transitions.poll(&mut self.ui) {
            match event {
                TransitionEvent::Entering(route) => debug!(%route, "page entering"),
                TransitionEvent::SwapCancelled(route) => warn!(%route, "page swap cancelled"),
                TransitionEvent::Completed { route, mounted } => {
                    debug!(%route, mounted, "page settled")
                }
            }
        }
        self.ui.set_frame(self.transitions.frame());
        self.poll_contact();

        self.arbiter.borrow_mut().poll();
        let events = self.arbiter.borrow_mut().poll_events();
        for event in events {
            if let Err(e) = self.handle_player_event(event) {
                self.ui.set_error(e);
            }
        }

        self.embedded.sync_registry();
        let controls = self.wire_displayed_page();
        self.embedded.tick();

        self.ui.player = PlayerSnapshot::capture(&self.widget);
        self.ui
            .set_controls(ControlView::capture_all(&self.embedded, &controls));
    }

    pub fn displayed_route(&self) -> &RouteId {
        self.ui.displayed_route()
    }

    pub fn ui(&self) -> &UiState {
        &self.ui
    }
}

impl Overture<SystemClock> {
    pub fn run(&mut self) -> Result<()> {
        let mut terminal = ratatui::init();
        terminal.clear()?;
        info!("overture started");

        // MAIN ROUTINE
        let result = loop {
            self.tick();

            if let Err(e) = terminal.draw(|f| tui::render(f, &mut self.ui)) {
                break Err(anyhow::Error::from(e));
            }

            match key_handler::next_event() {
                Ok(Some(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                    if let Some(action) = key_handler::handle_key_event(key, &self.ui) {
                        self.dispatch(action);
                    }
                }
                Ok(_) => (),
                Err(e) => break Err(e),
            }

            if self.ui.get_mode() == Mode::QUIT {
                break Ok(());
            }
        };

        self.arbiter.borrow_mut().stop_all();
        ratatui::restore();
        info!("overture stopped");

        result
    }
}

impl<C: Clock> Overture<C> {
    /// Runs an action, routing any failure into the error popup.
    pub fn dispatch(&mut self, action: Action) {
        if let Err(e) = self.handle_action(action) {
            warn!(?action, error = %e, "action failed");
            self.ui.set_error(e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{Direction, Track},
        player::{Glyph, testing::FakeFactory},
        transition::{ManualClock, TransitionPhase},
    };

    fn app() -> (Overture<ManualClock>, ManualClock, FakeFactory) {
        let clock = ManualClock::default();
        let factory = FakeFactory::default();
        let app = Overture::with_parts(
            SiteConfig::default(),
            None,
            Box::new(factory.clone()),
            clock.clone(),
        )
        .unwrap();
        (app, clock, factory)
    }

    #[test]
    fn page_slides_through_both_phases() {
        let (mut app, clock, _) = app();

        app.dispatch(Action::GoToPage(2));
        app.tick();
        assert_eq!(app.ui.frame().phase, TransitionPhase::Exiting);
        assert_eq!(app.ui.frame().direction, Direction::Forward);
        assert_eq!(app.displayed_route().as_str(), "/");

        // Ignored while in flight
        app.dispatch(Action::GoToPage(1));

        clock.advance(400);
        app.tick();
        assert_eq!(app.ui.frame().phase, TransitionPhase::Entering);
        assert_eq!(app.displayed_route().as_str(), "/media");

        clock.advance(400);
        app.tick();
        assert_eq!(app.ui.frame().phase, TransitionPhase::Idle);
        assert_eq!(app.displayed_route().as_str(), "/media");
    }

    #[test]
    fn stepping_back_from_the_first_page_does_nothing() {
        let (mut app, _, _) = app();
        app.dispatch(Action::Step(Direction::Backward));
        app.tick();
        assert_eq!(app.ui.frame().phase, TransitionPhase::Idle);
    }

    #[test]
    fn media_page_controls_share_the_single_slot_with_the_player() {
        let (mut app, clock, factory) = app();

        app.dispatch(Action::GoToPage(2));
        clock.advance(800);
        app.tick();
        assert_eq!(app.ui.controls.len(), 3);

        app.dispatch(Action::TogglePause);
        app.tick();
        assert_eq!(app.ui.player.glyph, Glyph::Pause);

        app.dispatch(Action::FocusNext);
        app.dispatch(Action::ActivateControl);
        app.tick();

        assert_eq!(app.ui.player.glyph, Glyph::Play);
        assert_eq!(app.ui.controls[0].glyph, Glyph::Pause);
        assert_eq!(factory.playing_count(), 1);
        assert!(app.ui.get_error().is_none());
    }

    #[test]
    fn player_end_advances_without_resuming() {
        let (mut app, _, factory) = app();

        app.dispatch(Action::TogglePause);
        factory.output(0).borrow_mut().finish();
        app.tick();

        assert_eq!(app.ui.player.track.as_ref().unwrap().id, "2");
        assert_eq!(app.ui.player.glyph, Glyph::Play);
        assert_eq!(factory.playing_count(), 0);
    }

    #[test]
    fn rejected_playback_surfaces_in_popup() {
        let (mut app, _, factory) = app();
        factory.reject("/audio/symphony1.mp3");

        app.dispatch(Action::TogglePause);
        app.tick();

        assert!(app.ui.get_error().unwrap().contains("symphony1"));
        assert_eq!(app.ui.player.glyph, Glyph::Play);
    }

    #[test]
    fn registry_update_resolves_late_controls() {
        let (mut app, clock, _) = app();
        app.registry.borrow_mut().replace(Vec::<Track>::new());

        app.dispatch(Action::GoToPage(1));
        clock.advance(800);
        app.tick();
        assert_eq!(app.ui.controls.len(), 1);
        assert!(app.ui.controls[0].title.is_none());

        app.registry
            .borrow_mut()
            .insert(Track::new("1", "Симфония № 1", "", "/audio/symphony1.mp3"));
        app.tick();
        assert_eq!(app.ui.controls[0].title.as_deref(), Some("Симфония № 1"));
    }
}
