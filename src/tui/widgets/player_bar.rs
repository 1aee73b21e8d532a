use super::{NEXT_ICON, PREV_ICON};
use crate::{player::Glyph, ui_state::UiState};
use ratatui::{
    layout::{Constraint, Layout},
    style::{Style, Stylize},
    text::{Line, Span},
    widgets::{Block, LineGauge, StatefulWidget, Widget},
};

const NO_TRACKS: &str = "No tracks available";

pub struct PlayerBar;

impl StatefulWidget for PlayerBar {
    type State = UiState;

    fn render(
        self,
        area: ratatui::prelude::Rect,
        buf: &mut ratatui::prelude::Buffer,
        state: &mut Self::State,
    ) {
        if area.height == 0 {
            return;
        }

        let theme = state.get_theme();
        let snap = &state.player;

        let block = Block::bordered()
            .border_type(theme.border_type)
            .border_style(Style::new().fg(theme.border))
            .bg(theme.bg_panel);
        let inner = block.inner(area);
        block.render(area, buf);

        if snap.count == 0 {
            Line::from(NO_TRACKS)
                .fg(theme.text_faded)
                .centered()
                .render(inner, buf);
            return;
        }

        let [info, bars] = Layout::vertical([Constraint::Length(1), Constraint::Length(1)])
            .areas(inner);

        let glyph = match snap.glyph {
            Glyph::Pause => Span::from(snap.glyph.symbol()).fg(theme.accent),
            Glyph::Play => Span::from(snap.glyph.symbol()).fg(theme.text),
        };

        let (title, composer) = match &snap.track {
            Some(t) => (t.title.as_str(), t.composer.as_str()),
            None => ("", ""),
        };

        let [controls, now_playing, position] = Layout::horizontal([
            Constraint::Length(9),
            Constraint::Fill(1),
            Constraint::Length(8),
        ])
        .areas(info);

        Line::from_iter([
            Span::from(format!(" {PREV_ICON} ")).fg(theme.text_faded),
            glyph,
            Span::from(format!(" {NEXT_ICON} ")).fg(theme.text_faded),
        ])
        .render(controls, buf);

        Line::from_iter([
            Span::from(title.to_string()).fg(theme.text).bold(),
            Span::from("  ✧  ").fg(theme.text_faded),
            Span::from(composer.to_string()).fg(theme.text_faded),
        ])
        .render(now_playing, buf);

        Line::from(format!("{}/{} ", snap.index + 1, snap.count))
            .fg(theme.text_faded)
            .right_aligned()
            .render(position, buf);

        let [progress, time, volume] = Layout::horizontal([
            Constraint::Fill(1),
            Constraint::Length(15),
            Constraint::Length(14),
        ])
        .areas(bars);

        LineGauge::default()
            .filled_style(Style::new().fg(theme.progress_complete))
            .unfilled_style(Style::new().fg(theme.progress_incomplete))
            .label("")
            .ratio(snap.progress.ratio())
            .render(progress, buf);

        Line::from(format!(" {} ", snap.progress.label()))
            .fg(theme.text)
            .centered()
            .render(time, buf);

        LineGauge::default()
            .filled_style(Style::new().fg(theme.accent))
            .unfilled_style(Style::new().fg(theme.progress_incomplete))
            .label(format!("vol {:>3}% ", (snap.volume * 100.0).round() as u8))
            .ratio(f64::from(snap.volume.clamp(0.0, 1.0)))
            .render(volume, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::SiteConfig, domain::RouteId};
    use ratatui::{buffer::Buffer, layout::Rect};

    #[test]
    fn empty_playlist_shows_placeholder() {
        let mut state = UiState::new(&SiteConfig::default(), RouteId::from("/")).unwrap();
        let area = Rect::new(0, 0, 40, 3);
        let mut buf = Buffer::empty(area);

        PlayerBar.render(area, &mut buf, &mut state);

        let text = buf.content.iter().map(|c| c.symbol()).collect::<String>();
        assert!(text.contains(NO_TRACKS));
    }
}
