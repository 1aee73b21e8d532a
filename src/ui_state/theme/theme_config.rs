use super::{Palette, theme_utils::parse_color};
use crate::config::PaletteImport;
use anyhow::{Context, Result};
use ratatui::style::Color;

impl Palette {
    /// Built-in palette with whatever colors the config file overrides.
    pub fn with_overrides(&self, import: &PaletteImport) -> Result<Palette> {
        Ok(Palette {
            bg: pick(self.bg, &import.bg, "bg")?,
            surface: pick(self.surface, &import.surface, "surface")?,
            text: pick(self.text, &import.text, "text")?,
            text_muted: pick(self.text_muted, &import.text_muted, "text_muted")?,
            accent: pick(self.accent, &import.accent, "accent")?,
            border: pick(self.border, &import.border, "border")?,
            progress: pick(self.progress, &import.progress, "progress")?,
        })
    }
}

fn pick(base: Color, raw: &Option<String>, field: &str) -> Result<Color> {
    match raw {
        Some(s) => parse_color(s).with_context(|| format!("theme color '{field}'")),
        None => Ok(base),
    }
}
