mod app;
mod contact;
mod navigation;
mod player;

pub use app::Overture;
