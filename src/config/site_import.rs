use crate::domain::{RouteId, Track};
use serde::Deserialize;
use std::path::PathBuf;

pub(super) const COMPOSER: &str = "М. Б. Тертерян";

#[derive(Clone, Debug, Deserialize)]
pub struct PageConfig {
    pub route: RouteId,
    pub title: String,
    #[serde(default)]
    pub body: Vec<String>,
    /// Shows the feedback form under the body.
    #[serde(default)]
    pub contact_form: bool,
}

impl PageConfig {
    fn new(route: &str, title: &str, body: &[&str]) -> Self {
        PageConfig {
            route: RouteId::from(route),
            title: title.to_string(),
            body: body.iter().map(|l| l.to_string()).collect(),
            contact_form: false,
        }
    }

    fn with_contact_form(mut self) -> Self {
        self.contact_form = true;
        self
    }
}

#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(default)]
pub struct TransitionConfig {
    pub exit_ms: u64,
    pub enter_ms: u64,
}

impl Default for TransitionConfig {
    fn default() -> Self {
        TransitionConfig {
            exit_ms: 400,
            enter_ms: 400,
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct MediaConfig {
    /// Directory that relative track sources resolve against.
    pub root: Option<PathBuf>,
    /// Track ids for the player bar, in order. Empty means every track.
    pub playlist: Vec<String>,
}

/// Any field left out keeps the built-in color for that mode.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct PaletteImport {
    pub bg: Option<String>,
    pub surface: Option<String>,
    pub text: Option<String>,
    pub text_muted: Option<String>,
    pub accent: Option<String>,
    pub border: Option<String>,
    pub progress: Option<String>,
}

/// Starts in light mode unless `start_dark` is set.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct ThemeSection {
    pub start_dark: bool,
    pub light: PaletteImport,
    pub dark: PaletteImport,
}

pub(super) fn default_pages() -> Vec<PageConfig> {
    vec![
        PageConfig::new(
            "/",
            "ГЛАВНАЯ",
            &[
                "МИХАИЛ БАБКЕНОВИЧ",
                "ТЕРТЕРЯН",
                "",
                "Армянский пианист, композитор и педагог, посвятивший более 40 лет обучению \
                 в Московском музыкальном колледже, где воспитал множество музыкантов.",
                "",
                "Его многогранный талант проявился в исполнительстве, сочинении и глубокой \
                 преданности искусству: от романтической классики до авторской музыки \
                 с восточным колоритом.",
            ],
        ),
        PageConfig::new(
            "/biography",
            "БИОГРАФИЯ",
            &[
                "Пианист, композитор, педагог.",
                "",
                "Более сорока лет преподавал в Московском музыкальном колледже.",
                "",
                "Послушать: [[player:1]]",
            ],
        ),
        PageConfig::new(
            "/media",
            "МЕДИА",
            &[
                "Аудиозаписи произведений",
                "",
                "[[player:1]]",
                "[[player:2]]",
                "[[player:3]]",
            ],
        ),
        PageConfig::new(
            "/contact",
            "ОБРАТНАЯ СВЯЗЬ",
            &["Используйте форму ниже, если у Вас есть вопросы по творчеству композитора."],
        )
        .with_contact_form(),
    ]
}

pub(super) fn default_tracks() -> Vec<Track> {
    vec![
        Track::new("1", "Симфония № 1", COMPOSER, "/audio/symphony1.mp3").with_duration("4:32"),
        Track::new("2", "Струнный квартет № 2", COMPOSER, "/audio/quartet2.mp3")
            .with_duration("6:18"),
        Track::new("3", "Концерт для фортепиано", COMPOSER, "/audio/piano-concerto.mp3")
            .with_duration("8:45"),
    ]
}
