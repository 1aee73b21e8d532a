use crate::ui_state::UiState;
use ratatui::layout::{Constraint, Direction, Layout, Rect};

pub struct AppLayout {
    pub nav_bar: Rect,
    pub page: Rect,
    pub player_bar: Rect,
}

impl AppLayout {
    pub fn new(area: Rect, state: &UiState) -> Self {
        // An empty playlist keeps its slot for the placeholder
        let player_height = match state.player.count {
            0 => 3,
            _ => 4,
        };

        let [nav_bar, page, player_bar] = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(6),
                Constraint::Length(player_height),
            ])
            .areas(area);

        AppLayout {
            nav_bar,
            page,
            player_bar,
        }
    }
}
