use crate::ui_state::{ERROR_BG, UiState};
use ratatui::{
    layout::{Constraint, Layout},
    style::{Color, Modifier, Stylize},
    text::Line,
    widgets::{Block, BorderType, Padding, Paragraph, StatefulWidget, Widget, Wrap},
};

const TITLE: &str = " Ошибка ";
const DISMISS_HINT: &str = "Esc: закрыть";

/// Last failure, shown over the page until Esc.
pub struct ErrorMsg;

impl StatefulWidget for ErrorMsg {
    type State = UiState;

    fn render(
        self,
        area: ratatui::prelude::Rect,
        buf: &mut ratatui::prelude::Buffer,
        state: &mut Self::State,
    ) {
        let Some(message) = state.get_error() else {
            return;
        };

        let block = Block::bordered()
            .border_type(BorderType::Thick)
            .title(Line::from(TITLE).add_modifier(Modifier::BOLD))
            .padding(Padding::symmetric(3, 1))
            .fg(Color::White)
            .bg(ERROR_BG);
        let inner = block.inner(area);
        block.render(area, buf);

        let [body, hint] =
            Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).areas(inner);

        Paragraph::new(message)
            .wrap(Wrap { trim: true })
            .render(body, buf);

        Line::from(DISMISS_HINT)
            .add_modifier(Modifier::DIM)
            .right_aligned()
            .render(hint, buf);
    }
}
