use crate::ui_state::UiState;
use ratatui::{
    layout::{Constraint, Layout},
    style::{Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, StatefulWidget, Widget},
};

/// Page titles left to right in route order, current one underlined, theme
/// toggle on the far right.
pub struct NavBar;

impl StatefulWidget for NavBar {
    type State = UiState;

    fn render(
        self,
        area: ratatui::prelude::Rect,
        buf: &mut ratatui::prelude::Buffer,
        state: &mut Self::State,
    ) {
        let theme = state.get_theme();
        let block = Block::bordered()
            .border_type(theme.border_type)
            .border_style(Style::new().fg(theme.border))
            .bg(theme.bg_panel);
        let inner = block.inner(area);
        block.render(area, buf);

        let current = state.displayed_route();
        let mut spans = Vec::new();
        for (idx, page) in state.pages().enumerate() {
            let label = format!(" {} {} ", idx + 1, page.title);
            let span = match &page.route == current {
                true => Span::from(label)
                    .fg(theme.accent)
                    .add_modifier(Modifier::UNDERLINED | Modifier::BOLD),
                false => Span::from(label).fg(theme.text_faded),
            };
            spans.push(span);
            spans.push(Span::from(" "));
        }

        let [tabs, toggle] = Layout::horizontal([Constraint::Fill(1), Constraint::Length(5)])
            .areas(inner);

        Line::from(spans).render(tabs, buf);
        Line::from(format!(" {} ", state.theme_manager.mode().toggle_label()))
            .fg(theme.text)
            .right_aligned()
            .render(toggle, buf);
    }
}
