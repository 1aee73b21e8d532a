use crate::ui_state::{ContactForm, DisplayTheme, FormField, FormStatus, UiState};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style, Stylize},
    text::Line,
    widgets::{Block, Padding, Paragraph, StatefulWidget, Widget, Wrap},
};

const SENT_TITLE: &str = "СООБЩЕНИЕ ОТПРАВЛЕНО";
const SENT_BODY: &str = "Спасибо за ваше сообщение. Мы свяжемся с вами в ближайшее время.";
const SENDING: &str = "Отправка...";
const SUBMIT_HINT: &str = "Ctrl-S  Отправить сообщение";
const BROWSE_HINT: &str = "Tab: заполнить форму";
const EDIT_HINT: &str = "Tab: следующее поле   Esc: выйти";

/// Rows the form wants below the page text.
pub const FORM_HEIGHT: u16 = 15;

pub struct ContactFormView;

impl StatefulWidget for ContactFormView {
    type State = UiState;

    fn render(
        self,
        area: ratatui::prelude::Rect,
        buf: &mut ratatui::prelude::Buffer,
        state: &mut Self::State,
    ) {
        if area.height < 3 || area.width < 10 {
            return;
        }

        let theme = state.get_theme();
        let form = &mut state.contact;

        match form.status() {
            FormStatus::Sent { .. } => render_sent(area, buf, &theme),
            status => {
                let [name_row, subject, message, footer] = Layout::vertical([
                    Constraint::Length(3),
                    Constraint::Length(3),
                    Constraint::Min(3),
                    Constraint::Length(1),
                ])
                .areas(area);
                let [name, email] = Layout::horizontal([Constraint::Fill(1), Constraint::Fill(1)])
                    .spacing(1)
                    .areas(name_row);

                let editing = status == FormStatus::Editing;
                render_field(form, FormField::Name, name, buf, &theme, editing);
                render_field(form, FormField::Email, email, buf, &theme, editing);
                render_field(form, FormField::Subject, subject, buf, &theme, editing);
                render_field(form, FormField::Message, message, buf, &theme, editing);

                let [hint, button] =
                    Layout::horizontal([Constraint::Fill(1), Constraint::Length(30)])
                        .areas(footer);

                let hint_text = match form.focused() {
                    Some(_) => EDIT_HINT,
                    None => BROWSE_HINT,
                };
                Line::from(hint_text)
                    .fg(theme.text_faded)
                    .render(hint, buf);

                let button_line = match editing {
                    true => Line::from(SUBMIT_HINT).fg(theme.accent).bold(),
                    false => Line::from(SENDING).fg(theme.text_faded),
                };
                button_line.right_aligned().render(button, buf);
            }
        }
    }
}

fn render_field(
    form: &mut ContactForm,
    field: FormField,
    area: Rect,
    buf: &mut ratatui::prelude::Buffer,
    theme: &DisplayTheme,
    editing: bool,
) {
    let focused = form.focused() == Some(field);
    let border = match focused {
        true => theme.accent,
        false => theme.border,
    };
    let title = match field.is_required() {
        true => format!(" {} * ", field.name()),
        false => format!(" {} ", field.name()),
    };
    let cursor = match focused && editing {
        true => Style::new().add_modifier(Modifier::REVERSED),
        false => Style::new(),
    };

    let input = form.field_mut(field);
    input.set_block(
        Block::bordered()
            .border_type(theme.border_type)
            .border_style(Style::new().fg(border))
            .title(title)
            .padding(Padding::horizontal(1)),
    );
    input.set_style(Style::new().fg(theme.text));
    input.set_placeholder_style(Style::new().fg(theme.text_faded));
    input.set_cursor_style(cursor);
    input.render(area, buf);
}

fn render_sent(area: Rect, buf: &mut ratatui::prelude::Buffer, theme: &DisplayTheme) {
    let block = Block::bordered()
        .border_type(theme.border_type)
        .border_style(Style::new().fg(theme.accent))
        .padding(Padding::vertical(1));
    let inner = block.inner(area);
    block.render(area, buf);

    Paragraph::new(vec![
        Line::from(SENT_TITLE).fg(theme.accent).bold().centered(),
        Line::default(),
        Line::from(SENT_BODY).fg(theme.text).centered(),
    ])
    .wrap(Wrap { trim: true })
    .render(inner, buf);
}
