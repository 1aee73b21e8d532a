mod theme_config;
mod theme_utils;

use crate::config::ThemeSection;
use anyhow::Result;
use ratatui::{style::Color, widgets::BorderType};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

impl ThemeMode {
    pub fn toggled(self) -> Self {
        match self {
            ThemeMode::Light => ThemeMode::Dark,
            ThemeMode::Dark => ThemeMode::Light,
        }
    }

    /// Label for the toggle: names the mode it switches to.
    pub fn toggle_label(&self) -> &'static str {
        match self {
            ThemeMode::Light => "☾",
            ThemeMode::Dark => "☀",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Palette {
    pub bg: Color,
    pub surface: Color,
    pub text: Color,
    pub text_muted: Color,
    pub accent: Color,
    pub border: Color,
    /// Unfilled part of progress and volume bars.
    pub progress: Color,
}

pub const DARK: Palette = Palette {
    bg: Color::Rgb(17, 24, 39),
    surface: Color::Rgb(31, 41, 55),
    text: Color::Rgb(243, 244, 246),
    text_muted: Color::Rgb(156, 163, 175),
    accent: Color::Rgb(59, 130, 246),
    border: Color::Rgb(55, 65, 81),
    progress: Color::Rgb(75, 85, 99),
};

pub const LIGHT: Palette = Palette {
    bg: Color::Rgb(249, 250, 251),
    surface: Color::Rgb(255, 255, 255),
    text: Color::Rgb(17, 24, 39),
    text_muted: Color::Rgb(107, 114, 128),
    accent: Color::Rgb(37, 99, 235),
    border: Color::Rgb(229, 231, 235),
    progress: Color::Rgb(209, 213, 219),
};

pub const ERROR_BG: Color = Color::Rgb(180, 30, 30);

pub struct DisplayTheme {
    pub bg: Color,
    pub bg_panel: Color,
    pub border: Color,
    pub border_type: BorderType,

    pub text: Color,
    pub text_faded: Color,
    pub accent: Color,

    pub progress_complete: Color,
    pub progress_incomplete: Color,
}

pub struct ThemeManager {
    mode: ThemeMode,
    light: Palette,
    dark: Palette,
}

impl ThemeManager {
    pub fn new(section: &ThemeSection) -> Result<Self> {
        Ok(ThemeManager {
            mode: match section.start_dark {
                true => ThemeMode::Dark,
                false => ThemeMode::Light,
            },
            light: LIGHT.with_overrides(&section.light)?,
            dark: DARK.with_overrides(&section.dark)?,
        })
    }

    pub fn mode(&self) -> ThemeMode {
        self.mode
    }

    pub fn toggle(&mut self) {
        self.mode = self.mode.toggled();
    }

    pub fn active(&self) -> &Palette {
        match self.mode {
            ThemeMode::Light => &self.light,
            ThemeMode::Dark => &self.dark,
        }
    }

    pub fn display(&self) -> DisplayTheme {
        let p = self.active();
        DisplayTheme {
            bg: p.bg,
            bg_panel: p.surface,
            border: p.border,
            border_type: BorderType::Rounded,
            text: p.text,
            text_faded: p.text_muted,
            accent: p.accent,
            progress_complete: p.accent,
            progress_incomplete: p.progress,
        }
    }
}

impl Default for ThemeManager {
    fn default() -> Self {
        ThemeManager {
            mode: ThemeMode::Light,
            light: LIGHT,
            dark: DARK,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PaletteImport;

    #[test]
    fn toggling_switches_palettes() {
        let mut themes = ThemeManager::default();
        assert_eq!(themes.mode(), ThemeMode::Light);
        assert_eq!(themes.active(), &LIGHT);

        themes.toggle();
        assert_eq!(themes.mode(), ThemeMode::Dark);
        assert_eq!(themes.active(), &DARK);
    }

    #[test]
    fn overrides_only_replace_given_fields() {
        let section = ThemeSection {
            start_dark: false,
            light: PaletteImport {
                accent: Some("rgb(1, 2, 3)".into()),
                ..Default::default()
            },
            dark: PaletteImport::default(),
        };

        let themes = ThemeManager::new(&section).unwrap();
        assert_eq!(themes.active().accent, Color::Rgb(1, 2, 3));
        assert_eq!(themes.active().bg, LIGHT.bg);
    }

    #[test]
    fn bad_color_names_the_field() {
        let section = ThemeSection {
            dark: PaletteImport {
                border: Some("#nothex".into()),
                ..Default::default()
            },
            ..Default::default()
        };

        let err = ThemeManager::new(&section).err().unwrap();
        assert!(format!("{err:#}").contains("border"));
    }
}
