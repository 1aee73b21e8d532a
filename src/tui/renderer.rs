use super::{AppLayout, ErrorMsg, NavBar, PageView, PlayerBar};
use crate::ui_state::UiState;
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Stylize,
    widgets::{Block, Clear, StatefulWidget, Widget},
};

pub fn render(f: &mut Frame, state: &mut UiState) {
    let layout = AppLayout::new(f.area(), state);
    let theme = state.get_theme();

    Block::new().bg(theme.bg).render(f.area(), f.buffer_mut());

    NavBar.render(layout.nav_bar, f.buffer_mut(), state);
    PageView.render(layout.page, f.buffer_mut(), state);
    PlayerBar.render(layout.player_bar, f.buffer_mut(), state);

    if state.popup.is_open() {
        let popup_rect = centered_rect(50, 30, f.area());
        Clear.render(popup_rect, f.buffer_mut());
        ErrorMsg.render(popup_rect, f.buffer_mut(), state);
    }
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::vertical([
        Constraint::Percentage((100 - percent_y) / 2),
        Constraint::Percentage(percent_y),
        Constraint::Percentage((100 - percent_y) / 2),
    ])
    .split(r);

    Layout::horizontal([
        Constraint::Percentage((100 - percent_x) / 2),
        Constraint::Percentage(percent_x),
        Constraint::Percentage((100 - percent_x) / 2),
    ])
    .split(popup_layout[1])[1]
}
