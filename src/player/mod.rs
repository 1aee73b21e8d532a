mod arbiter;
mod backend_rodio;
mod embedded;
mod progress;
mod registry;
mod widget;

#[cfg(test)]
pub(crate) mod testing;

pub use arbiter::{AudioArbiter, ChannelId, SharedArbiter};
pub use backend_rodio::{RodioEngine, RodioOutput};
pub use embedded::{
    ControlId, ControlMarker, EmbeddedControl, EmbeddedPlayers, scan_markers, split_markers,
};
pub use progress::{ProgressSnapshot, format_time};
pub use registry::{RegistryEvent, SharedRegistry, TrackRegistry};
pub use widget::{PlaybackSession, PlayerWidget};

use anyhow::Result;
use std::time::Duration;

pub const SEEK_STEP_SECS: f64 = 5.0;
pub const VOLUME_STEP: f32 = 0.1;

/// One audio element: a single loaded source that can be started, paused and
/// positioned. Implementations may defer decoding until `play`, in which case
/// a broken source surfaces as a rejected `play`.
pub trait AudioOutput {
    fn load(&mut self, source: &str) -> Result<()>;
    fn play(&mut self) -> Result<()>;
    fn pause(&mut self);
    fn seek(&mut self, pos: Duration) -> Result<()>;
    fn set_volume(&mut self, volume: f32);
    fn position(&self) -> Duration;
    /// `None` until the source's length is known.
    fn duration(&self) -> Option<Duration>;
    fn is_playing(&self) -> bool;
    fn track_ended(&self) -> bool;
}

pub trait OutputFactory {
    fn create_output(&self) -> Result<Box<dyn AudioOutput>>;
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Glyph {
    #[default]
    Play,
    Pause,
}

impl Glyph {
    pub fn symbol(&self) -> &'static str {
        match self {
            Glyph::Play => "▶",
            Glyph::Pause => "⏸",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PlayerEvent {
    Started(ChannelId),
    Paused(ChannelId),
    Superseded(ChannelId),
    Ended(ChannelId),
    Rejected { channel: ChannelId, reason: String },
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum PlaybackError {
    #[error("track not found: {0}")]
    TrackNotFound(String),

    #[error("no tracks available")]
    NoTracks,

    #[error("track '{0}' has no playable source")]
    MissingSource(String),

    #[error("failed to play '{track}': {reason}")]
    Rejected { track: String, reason: String },

    #[error("seek failed: {0}")]
    Seek(String),

    #[error("unknown player control: {0}")]
    UnknownControl(String),
}
