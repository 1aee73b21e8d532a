use super::{ContactFormView, FORM_HEIGHT, INLINE_BAR_WIDTH, text_bar};
use crate::{
    player::{Glyph, split_markers},
    transition::slide_offset,
    ui_state::{ControlView, DisplayTheme, UiState},
};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Padding, Paragraph, StatefulWidget, Widget, Wrap},
};

pub struct PageView;

impl StatefulWidget for PageView {
    type State = UiState;

    fn render(
        self,
        area: ratatui::prelude::Rect,
        buf: &mut ratatui::prelude::Buffer,
        state: &mut Self::State,
    ) {
        let theme = state.get_theme();
        let Some(page) = state.displayed_page() else {
            return;
        };

        let block = Block::bordered()
            .border_type(theme.border_type)
            .border_style(Style::new().fg(theme.border))
            .title(format!(" {} ", page.title))
            .padding(Padding::horizontal(2))
            .bg(theme.bg_panel);
        let inner = block.inner(area);
        block.render(area, buf);

        let offset = slide_offset(&state.frame(), inner.width);
        let content = shift(inner, offset);
        if content.width == 0 {
            return;
        }

        let with_form = page.contact_form;
        let mut ordinal = 0;
        let lines = page
            .body
            .iter()
            .map(|line| {
                let spans = split_markers(line)
                    .into_iter()
                    .map(|part| match part {
                        Ok(text) => Span::from(text.to_string()).fg(theme.text),
                        Err(track_id) => {
                            let view = state.controls.get(ordinal);
                            let focused = state.focused() == Some(ordinal);
                            ordinal += 1;
                            control_span(track_id, view, focused, &theme)
                        }
                    })
                    .collect::<Vec<_>>();
                Line::from(spans)
            })
            .collect::<Vec<_>>();

        if !with_form {
            Paragraph::new(lines)
                .wrap(Wrap { trim: false })
                .render(content, buf);
            return;
        }

        let [text, form] =
            Layout::vertical([Constraint::Min(1), Constraint::Length(FORM_HEIGHT)])
                .spacing(1)
                .areas(content);

        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .render(text, buf);
        ContactFormView.render(form, buf, state);
    }
}

/// Narrows `area` from the side the content is sliding out of.
fn shift(area: Rect, offset: i32) -> Rect {
    let by = offset.unsigned_abs().min(u32::from(area.width)) as u16;
    match offset >= 0 {
        true => Rect {
            x: area.x + by,
            width: area.width - by,
            ..area
        },
        false => Rect {
            width: area.width - by,
            ..area
        },
    }
}

fn control_span(
    track_id: &str,
    view: Option<&ControlView>,
    focused: bool,
    theme: &DisplayTheme,
) -> Span<'static> {
    let text = match view {
        Some(ControlView {
            title: Some(title),
            glyph,
            progress,
            ..
        }) => format!(
            " {} {title}  {} {} ",
            glyph.symbol(),
            text_bar(progress.ratio(), INLINE_BAR_WIDTH),
            progress.label()
        ),
        _ => format!(" {} {track_id} (нет записи) ", Glyph::Play.symbol()),
    };

    let playing = view.is_some_and(|v| v.glyph == Glyph::Pause);
    let span = Span::from(text).bg(theme.bg);
    let span = match playing {
        true => span.fg(theme.accent),
        false => span.fg(theme.text_faded),
    };

    match focused {
        true => span.add_modifier(Modifier::REVERSED),
        false => span,
    }
}
