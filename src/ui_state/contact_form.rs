use ratatui::{crossterm::event::KeyEvent, style::Style};
use std::time::Duration;
use tui_textarea::TextArea;

/// Time the fake send takes.
pub const SUBMIT_DELAY: Duration = Duration::from_millis(1000);
/// How long the confirmation stays up before the form is cleared.
pub const RESET_DELAY: Duration = Duration::from_millis(3000);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormField {
    Name,
    Email,
    Subject,
    Message,
}

impl FormField {
    pub const ALL: [FormField; 4] = [
        FormField::Name,
        FormField::Email,
        FormField::Subject,
        FormField::Message,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            FormField::Name => "Имя",
            FormField::Email => "Email",
            FormField::Subject => "Тема",
            FormField::Message => "Сообщение",
        }
    }

    pub fn placeholder(&self) -> &'static str {
        match self {
            FormField::Name => "Ваше имя",
            FormField::Email => "your@email.com",
            FormField::Subject => "Тема вашего сообщения",
            FormField::Message => "Поделитесь своими мыслями, вопросами или предложениями...",
        }
    }

    pub fn is_required(&self) -> bool {
        !matches!(self, FormField::Subject)
    }

    pub fn is_multiline(&self) -> bool {
        matches!(self, FormField::Message)
    }

    pub fn next(self) -> Self {
        let idx = (self as usize + 1) % Self::ALL.len();
        Self::ALL[idx]
    }

    pub fn prev(self) -> Self {
        let idx = (self as usize + Self::ALL.len() - 1) % Self::ALL.len();
        Self::ALL[idx]
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FormStatus {
    #[default]
    Editing,
    Submitting {
        since: Duration,
    },
    Sent {
        since: Duration,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormEvent {
    Sent,
    Reset,
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum FormError {
    #[error("Заполните обязательное поле: {0}")]
    Missing(&'static str),

    #[error("Некорректный email: {0}")]
    InvalidEmail(String),

    #[error("Сообщение уже отправляется")]
    Busy,
}

/// Feedback form on the contact page. Sending is simulated: the form shows
/// a spinner for [`SUBMIT_DELAY`], then a confirmation for [`RESET_DELAY`],
/// then comes back empty.
pub struct ContactForm {
    fields: [TextArea<'static>; 4],
    focus: Option<FormField>,
    status: FormStatus,
}

impl Default for ContactForm {
    fn default() -> Self {
        Self::new()
    }
}

impl ContactForm {
    pub fn new() -> Self {
        ContactForm {
            fields: FormField::ALL.map(|f| new_field(f, "")),
            focus: None,
            status: FormStatus::Editing,
        }
    }

    pub fn field(&self, field: FormField) -> &TextArea<'static> {
        &self.fields[field as usize]
    }

    pub fn field_mut(&mut self, field: FormField) -> &mut TextArea<'static> {
        &mut self.fields[field as usize]
    }

    pub fn value(&self, field: FormField) -> String {
        self.field(field).lines().join("\n")
    }

    /// Replaces a field's text outright.
    pub fn fill(&mut self, field: FormField, text: &str) {
        self.fields[field as usize] = new_field(field, text);
    }

    pub fn focused(&self) -> Option<FormField> {
        self.focus
    }

    pub fn focus_next(&mut self) {
        self.focus = Some(match self.focus {
            Some(f) => f.next(),
            None => FormField::Name,
        });
    }

    pub fn focus_prev(&mut self) {
        self.focus = Some(match self.focus {
            Some(f) => f.prev(),
            None => FormField::Message,
        });
    }

    pub fn clear_focus(&mut self) {
        self.focus = None;
    }

    pub fn status(&self) -> FormStatus {
        self.status
    }

    pub fn is_editing(&self) -> bool {
        self.status == FormStatus::Editing
    }

    /// Types into the focused field. Returns false if nothing changed,
    /// which includes every key while a send is in progress.
    pub fn input(&mut self, key: KeyEvent) -> bool {
        let (FormStatus::Editing, Some(field)) = (self.status, self.focus) else {
            return false;
        };
        self.fields[field as usize].input(key)
    }

    pub fn validate(&self) -> Result<(), FormError> {
        for field in FormField::ALL {
            if field.is_required() && self.value(field).trim().is_empty() {
                return Err(FormError::Missing(field.name()));
            }
        }

        let email = self.value(FormField::Email);
        match is_valid_email(email.trim()) {
            true => Ok(()),
            false => Err(FormError::InvalidEmail(email)),
        }
    }

    pub fn submit(&mut self, now: Duration) -> Result<(), FormError> {
        if !self.is_editing() {
            return Err(FormError::Busy);
        }
        self.validate()?;

        self.status = FormStatus::Submitting { since: now };
        self.focus = None;
        Ok(())
    }

    /// Advances the send sequence. A late poll runs every step that is due,
    /// in order.
    pub fn poll(&mut self, now: Duration) -> Vec<FormEvent> {
        let mut events = Vec::new();

        loop {
            match self.status {
                FormStatus::Submitting { since } if now >= since + SUBMIT_DELAY => {
                    self.status = FormStatus::Sent {
                        since: since + SUBMIT_DELAY,
                    };
                    events.push(FormEvent::Sent);
                }
                FormStatus::Sent { since } if now >= since + RESET_DELAY => {
                    self.reset();
                    events.push(FormEvent::Reset);
                }
                _ => break,
            }
        }

        events
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

fn new_field(field: FormField, text: &str) -> TextArea<'static> {
    let mut input = TextArea::from(text.lines());
    input.set_cursor_line_style(Style::default());
    input.set_placeholder_text(field.placeholder());
    input
}

fn is_valid_email(s: &str) -> bool {
    let Some((local, domain)) = s.split_once('@') else {
        return false;
    };

    !local.is_empty()
        && !s.contains(char::is_whitespace)
        && domain
            .split_once('.')
            .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty() && !tld.ends_with('.'))
}
