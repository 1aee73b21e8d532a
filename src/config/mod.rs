mod site_import;

pub use site_import::{MediaConfig, PageConfig, PaletteImport, ThemeSection, TransitionConfig};

use crate::{
    CONFIG_DIRECTORY, SITE_FILE,
    domain::{Route, RouteId, RouteTable, Track},
    transition::TransitionTimings,
};
use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::{
    collections::HashSet,
    path::{Path, PathBuf},
    time::Duration,
};
use tracing::{info, warn};

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub pages: Vec<PageConfig>,
    pub transition: TransitionConfig,
    pub media: MediaConfig,
    pub tracks: Vec<Track>,
    pub theme: ThemeSection,
}

impl Default for SiteConfig {
    fn default() -> Self {
        SiteConfig {
            pages: site_import::default_pages(),
            transition: TransitionConfig::default(),
            media: MediaConfig::default(),
            tracks: site_import::default_tracks(),
            theme: ThemeSection::default(),
        }
    }
}

impl SiteConfig {
    /// `$CONFIG/overture/site.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIRECTORY).join(SITE_FILE))
    }

    /// An explicit path has to exist. Without one the default location is
    /// tried and the built-in site is used if nothing is there.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load_from_file(path);
        }

        match Self::default_path() {
            Some(path) if path.exists() => Self::load_from_file(&path),
            _ => {
                info!("no site config found, using built-in defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file_str = std::fs::read_to_string(path)
            .with_context(|| format!("Could not read {}", path.display()))?;
        let config = toml::from_str::<SiteConfig>(&file_str)
            .with_context(|| format!("Invalid site config {}", path.display()))?;

        config.validate()?;
        info!(path = %path.display(), pages = config.pages.len(), tracks = config.tracks.len(), "site config loaded");
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.pages.is_empty() {
            bail!("Site config needs at least one page");
        }

        let mut routes = HashSet::new();
        for page in &self.pages {
            if !routes.insert(&page.route) {
                bail!("Duplicate page route: {}", page.route);
            }
        }

        let mut ids = HashSet::new();
        for track in &self.tracks {
            if !ids.insert(track.id.as_str()) {
                warn!(track = %track.id, "duplicate track id, later entry wins");
            }
        }

        Ok(())
    }

    pub fn route_table(&self) -> RouteTable {
        RouteTable::new(
            self.pages
                .iter()
                .map(|p| Route {
                    id: p.route.clone(),
                    title: p.title.clone(),
                })
                .collect(),
        )
    }

    pub fn page(&self, route: &RouteId) -> Option<&PageConfig> {
        self.pages.iter().find(|p| &p.route == route)
    }

    pub fn timings(&self) -> TransitionTimings {
        TransitionTimings {
            exit: Duration::from_millis(self.transition.exit_ms),
            enter: Duration::from_millis(self.transition.enter_ms),
        }
    }

    /// Tracks for the player bar. Playlist ids that name no track are
    /// skipped.
    pub fn playlist(&self) -> Vec<Track> {
        if self.media.playlist.is_empty() {
            return self.tracks.clone();
        }

        self.media
            .playlist
            .iter()
            .filter_map(|id| {
                let found = self.tracks.iter().rev().find(|t| &t.id == id).cloned();
                if found.is_none() {
                    warn!(track = %id, "playlist entry has no matching track");
                }
                found
            })
            .collect()
    }

    pub fn media_root(&self) -> PathBuf {
        self.media
            .root
            .clone()
            .or_else(|| dirs::config_dir().map(|dir| dir.join(CONFIG_DIRECTORY).join("media")))
            .unwrap_or_else(|| PathBuf::from("."))
    }
}
