use crate::{
    REFRESH_RATE,
    app_core::Overture,
    domain::Direction,
    key_handler::*,
    player::{SEEK_STEP_SECS, VOLUME_STEP},
    transition::Clock,
    ui_state::{Mode, UiState},
};
use anyhow::Result;
use ratatui::crossterm::event::{self, Event, KeyCode, KeyEvent};
use std::time::Duration;

use KeyCode::*;

pub fn handle_key_event(key_event: KeyEvent, state: &UiState) -> Option<Action> {
    let key = &key_event;

    match (key.modifiers, key.code) {
        (C, Char('c')) => return Some(Action::QUIT),
        (X, Esc) => return Some(Action::SoftReset),
        _ => (),
    }

    // Popups swallow everything else
    if state.popup.is_open() {
        return None;
    }

    match state.get_mode() {
        Mode::Compose => handle_form_keys(key, state),
        _ => handle_browse_keys(key),
    }
}

fn handle_form_keys(key: &KeyEvent, state: &UiState) -> Option<Action> {
    let multiline = state.contact.focused().is_some_and(|f| f.is_multiline());

    match (key.modifiers, key.code) {
        (C, Char('s')) => Some(Action::SubmitForm),
        (X, Tab) => Some(Action::FocusNext),
        (S, BackTab) | (X, BackTab) => Some(Action::FocusPrev),
        (X, Enter) if !multiline => Some(Action::FocusNext),
        _ => Some(Action::FormInput(*key)),
    }
}

fn handle_browse_keys(key: &KeyEvent) -> Option<Action> {
    match (key.modifiers, key.code) {
        (X, Char('q')) => Some(Action::QUIT),

        // PLAYBACK
        (X, Char(' ')) => Some(Action::TogglePause),
        (X, Char('n')) => Some(Action::PlayNext),
        (X, Char('p')) => Some(Action::PlayPrev),
        (X, Char('.')) => Some(Action::SeekForward),
        (X, Char(',')) => Some(Action::SeekBack),
        (X, Char('=')) | (S, Char('+')) => Some(Action::VolumeUp),
        (X, Char('-')) => Some(Action::VolumeDown),

        // PAGES
        (X, Char(c @ '1'..='9')) => c.to_digit(10).map(|d| Action::GoToPage(d as usize - 1)),
        (X, Right) | (X, Char('l')) => Some(Action::Step(Direction::Forward)),
        (X, Left) | (X, Char('h')) => Some(Action::Step(Direction::Backward)),

        // EMBEDDED CONTROLS
        (X, Tab) => Some(Action::FocusNext),
        (S, BackTab) | (X, BackTab) => Some(Action::FocusPrev),
        (X, Enter) => Some(Action::ActivateControl),

        (X, Char('t')) => Some(Action::ToggleTheme),
        (X, Char('r')) | (X, F(5)) => Some(Action::ReloadTracks),

        _ => None,
    }
}

pub fn next_event() -> Result<Option<Event>> {
    match event::poll(Duration::from_millis(REFRESH_RATE))? {
        true => Ok(Some(event::read()?)),
        false => Ok(None),
    }
}

impl<C: Clock> Overture<C> {
    #[rustfmt::skip]
    pub fn handle_action(&mut self, action: Action) -> Result<()> {
        match action {
            // Player
            Action::TogglePause     => self.widget.toggle_play()?,
            Action::PlayNext        => self.widget.next()?,
            Action::PlayPrev        => self.widget.previous()?,
            Action::SeekForward     => self.widget.seek_by(SEEK_STEP_SECS)?,
            Action::SeekBack        => self.widget.seek_by(-SEEK_STEP_SECS)?,
            Action::VolumeUp        => self.widget.adjust_volume(VOLUME_STEP)?,
            Action::VolumeDown      => self.widget.adjust_volume(-VOLUME_STEP)?,

            // Embedded
            Action::FocusNext       => self.ui.focus_next(),
            Action::FocusPrev       => self.ui.focus_prev(),
            Action::ActivateControl => self.activate_focused()?,

            // Contact
            Action::FormInput(key)  => self.ui.process_form_input(key),
            Action::SubmitForm      => self.submit_contact()?,

            // Pages
            Action::GoToPage(idx)   => self.go_to_page(idx),
            Action::Step(dir)       => self.step_page(dir),

            // Ops
            Action::ToggleTheme     => self.ui.toggle_theme(),
            Action::ReloadTracks    => self.reload_tracks()?,
            Action::SoftReset       => self.ui.soft_reset(),
            Action::QUIT            => self.ui.set_mode(Mode::QUIT),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::SiteConfig, domain::RouteId, transition::ViewRenderer};
    use ratatui::crossterm::event::KeyModifiers;

    fn press(modifiers: KeyModifiers, code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    fn state() -> UiState {
        UiState::new(&SiteConfig::default(), RouteId::from("/")).unwrap()
    }

    #[test]
    fn digits_map_to_zero_based_pages() {
        let ui = state();
        assert_eq!(
            handle_key_event(press(X, Char('1')), &ui),
            Some(Action::GoToPage(0))
        );
        assert_eq!(
            handle_key_event(press(X, Char('4')), &ui),
            Some(Action::GoToPage(3))
        );
        assert_eq!(handle_key_event(press(X, Char('0')), &ui), None);
    }

    #[test]
    fn popup_blocks_everything_but_escape_and_quit() {
        let mut ui = state();
        ui.set_error(anyhow::anyhow!("nope"));

        assert_eq!(handle_key_event(press(X, Char(' ')), &ui), None);
        assert_eq!(handle_key_event(press(X, Right), &ui), None);
        assert_eq!(
            handle_key_event(press(X, Esc), &ui),
            Some(Action::SoftReset)
        );
        assert_eq!(
            handle_key_event(press(C, Char('c')), &ui),
            Some(Action::QUIT)
        );
    }

    #[test]
    fn form_keys_type_instead_of_controlling_playback() {
        let mut ui = state();
        ui.render_view(&RouteId::from("/contact"));
        ui.focus_next();

        let space = press(X, Char(' '));
        assert_eq!(handle_key_event(space, &ui), Some(Action::FormInput(space)));
        let q = press(X, Char('q'));
        assert_eq!(handle_key_event(q, &ui), Some(Action::FormInput(q)));

        assert_eq!(
            handle_key_event(press(X, Enter), &ui),
            Some(Action::FocusNext)
        );
        assert_eq!(
            handle_key_event(press(C, Char('s')), &ui),
            Some(Action::SubmitForm)
        );
        assert_eq!(
            handle_key_event(press(X, Esc), &ui),
            Some(Action::SoftReset)
        );
    }

    #[test]
    fn enter_breaks_lines_in_the_message_field() {
        let mut ui = state();
        ui.render_view(&RouteId::from("/contact"));
        ui.focus_prev();

        let enter = press(X, Enter);
        assert_eq!(handle_key_event(enter, &ui), Some(Action::FormInput(enter)));
    }

    #[test]
    fn arrows_step_between_pages() {
        let ui = state();
        assert_eq!(
            handle_key_event(press(X, Right), &ui),
            Some(Action::Step(Direction::Forward))
        );
        assert_eq!(
            handle_key_event(press(X, Char('h')), &ui),
            Some(Action::Step(Direction::Backward))
        );
    }
}
