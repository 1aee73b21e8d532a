use super::{
    ContactForm, ControlView, DisplayTheme, Mode, PlayerSnapshot, ThemeManager,
    popup::{PopupState, PopupType},
};
use crate::{
    config::{PageConfig, SiteConfig},
    domain::RouteId,
    player::ControlId,
    transition::{TransitionFrame, TransitionPhase, ViewRenderer, ViewSwap},
};
use anyhow::{Error, Result};
use indexmap::IndexMap;
use ratatui::crossterm::event::KeyEvent;
use tracing::debug;

pub struct UiState {
    pages: IndexMap<RouteId, PageConfig>,
    displayed: RouteId,
    frame: TransitionFrame,
    mode: Mode,
    focus: Option<usize>,

    pub(crate) popup: PopupState,
    pub(crate) theme_manager: ThemeManager,
    pub(crate) contact: ContactForm,

    // Refreshed every tick from the player side
    pub(crate) player: PlayerSnapshot,
    pub(crate) controls: Vec<ControlView>,
}

impl UiState {
    pub fn new(config: &SiteConfig, start: RouteId) -> Result<Self> {
        Ok(UiState {
            pages: config
                .pages
                .iter()
                .map(|p| (p.route.clone(), p.clone()))
                .collect(),
            displayed: start,
            frame: TransitionFrame {
                phase: TransitionPhase::Idle,
                direction: crate::domain::Direction::Forward,
                progress: 1.0,
            },
            mode: Mode::default(),
            focus: None,
            popup: PopupState::default(),
            theme_manager: ThemeManager::new(&config.theme)?,
            contact: ContactForm::new(),
            player: PlayerSnapshot::default(),
            controls: Vec::new(),
        })
    }

    pub fn pages(&self) -> impl Iterator<Item = &PageConfig> {
        self.pages.values()
    }

    pub fn route_at(&self, idx: usize) -> Option<RouteId> {
        self.pages.get_index(idx).map(|(route, _)| route.clone())
    }

    pub fn displayed_route(&self) -> &RouteId {
        &self.displayed
    }

    pub fn displayed_page(&self) -> Option<&PageConfig> {
        self.pages.get(&self.displayed)
    }

    pub fn set_frame(&mut self, frame: TransitionFrame) {
        self.frame = frame
    }

    pub fn frame(&self) -> TransitionFrame {
        self.frame
    }

    pub fn get_mode(&self) -> Mode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode
    }

    pub fn get_theme(&self) -> DisplayTheme {
        self.theme_manager.display()
    }

    pub fn toggle_theme(&mut self) {
        self.theme_manager.toggle();
        debug!(mode = ?self.theme_manager.mode(), "theme toggled");
    }

    pub fn set_error(&mut self, e: Error) {
        self.show_popup(PopupType::Error(format!("{e:#}")));
    }

    pub fn get_error(&self) -> Option<&str> {
        match &self.popup.current {
            PopupType::Error(e) => Some(e.as_str()),
            _ => None,
        }
    }

    pub fn has_contact_form(&self) -> bool {
        self.displayed_page().is_some_and(|p| p.contact_form)
    }

    pub fn soft_reset(&mut self) {
        if self.popup.is_open() {
            self.close_popup();
        } else if self.mode == Mode::Compose {
            self.leave_form();
        } else {
            self.focus = None;
        }
    }

    fn leave_form(&mut self) {
        self.contact.clear_focus();
        if self.mode == Mode::Compose {
            self.mode = Mode::Browse;
        }
    }

    pub fn set_controls(&mut self, controls: Vec<ControlView>) {
        if self.focus.is_some_and(|f| f >= controls.len()) {
            self.focus = None;
        }
        self.controls = controls;
    }

    /// On a form page focus moves through the form fields instead of the
    /// embedded controls.
    pub fn focus_next(&mut self) {
        if self.has_contact_form() {
            self.contact.focus_next();
            self.mode = Mode::Compose;
            return;
        }

        let len = self.controls.len();
        if len == 0 {
            return;
        }
        self.focus = Some(match self.focus {
            Some(idx) => (idx + 1) % len,
            None => 0,
        });
    }

    pub fn focus_prev(&mut self) {
        if self.has_contact_form() {
            self.contact.focus_prev();
            self.mode = Mode::Compose;
            return;
        }

        let len = self.controls.len();
        if len == 0 {
            return;
        }
        self.focus = Some(match self.focus {
            Some(0) | None => len - 1,
            Some(idx) => idx - 1,
        });
    }

    pub fn focused(&self) -> Option<usize> {
        self.focus
    }

    pub fn process_form_input(&mut self, key: KeyEvent) {
        self.contact.input(key);
    }

    pub fn focused_control(&self) -> Option<ControlId> {
        self.focus
            .and_then(|idx| self.controls.get(idx))
            .map(|c| c.id.clone())
    }
}

impl ViewRenderer for UiState {
    fn render_view(&mut self, route: &RouteId) -> ViewSwap {
        if !self.pages.contains_key(route) {
            return ViewSwap::Cancelled;
        }

        debug!(%route, "view mounted");
        self.displayed = route.clone();
        self.focus = None;
        self.controls.clear();
        self.leave_form();
        ViewSwap::Mounted
    }
}
