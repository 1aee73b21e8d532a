mod action;

pub use action::{handle_key_event, next_event};

use crate::domain::Direction;
use ratatui::crossterm::event::{KeyEvent, KeyModifiers};

const X: KeyModifiers = KeyModifiers::NONE;
const S: KeyModifiers = KeyModifiers::SHIFT;
const C: KeyModifiers = KeyModifiers::CONTROL;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    // Player Controls
    TogglePause,
    PlayNext,
    PlayPrev,
    SeekForward,
    SeekBack,
    VolumeUp,
    VolumeDown,

    // Embedded Controls
    FocusNext,
    FocusPrev,
    ActivateControl,

    // Contact Form
    FormInput(KeyEvent),
    SubmitForm,

    // Navigation
    GoToPage(usize),
    Step(Direction),

    // Display & Other
    ToggleTheme,
    ReloadTracks,
    SoftReset,
    QUIT,
}
