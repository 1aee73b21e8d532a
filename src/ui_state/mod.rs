mod contact_form;
mod mode;
mod popup;
mod snapshot;
mod theme;
mod ui_state;

pub use contact_form::{
    ContactForm, FormError, FormEvent, FormField, FormStatus, RESET_DELAY, SUBMIT_DELAY,
};
pub use mode::Mode;
pub use popup::PopupType;
pub use snapshot::{ControlView, PlayerSnapshot};
pub use theme::{DARK, DisplayTheme, ERROR_BG, LIGHT, Palette, ThemeManager, ThemeMode};
pub use ui_state::UiState;
