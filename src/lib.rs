pub mod app_core;
pub mod config;
pub mod domain;
pub mod key_handler;
pub mod logging;
pub mod player;
pub mod transition;
pub mod tui;
pub mod ui_state;

pub use app_core::Overture;
pub use config::SiteConfig;

// ~30fps
pub const REFRESH_RATE: u64 = 33;

pub const CONFIG_DIRECTORY: &str = "overture";
pub const SITE_FILE: &str = "site.toml";
