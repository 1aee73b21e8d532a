use crate::ui_state::UiState;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum PopupType {
    #[default]
    None,
    Error(String),
}

#[derive(Default)]
pub struct PopupState {
    pub current: PopupType,
}

impl PopupState {
    pub fn is_open(&self) -> bool {
        self.current != PopupType::None
    }
}

impl UiState {
    pub fn show_popup(&mut self, popup: PopupType) {
        self.popup.current = popup;
    }

    pub fn close_popup(&mut self) {
        self.popup.current = PopupType::None;
    }
}
