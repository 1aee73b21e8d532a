use super::{ChannelId, Glyph, PlaybackError, PlayerEvent, ProgressSnapshot, SharedArbiter};
use crate::domain::Track;
use anyhow::Result;
use std::time::Duration;
use tracing::{debug, info};

/// Read-only view of the widget for the front-end.
#[derive(Clone, Debug, PartialEq)]
pub struct PlaybackSession {
    pub active_track: Option<Track>,
    pub is_playing: bool,
    pub position: Duration,
    pub duration: Option<Duration>,
    pub volume: f32,
}

/// The dedicated player: an ordered track list, a cursor into it and one
/// channel on the shared arbiter.
pub struct PlayerWidget {
    arbiter: SharedArbiter,
    channel: ChannelId,
    tracks: Vec<Track>,
    current: usize,
    volume: f32,
}

impl PlayerWidget {
    pub fn new(arbiter: SharedArbiter, tracks: Vec<Track>) -> Result<Self> {
        let channel = arbiter.borrow_mut().open_channel()?;
        let mut widget = PlayerWidget {
            arbiter,
            channel,
            tracks,
            current: 0,
            volume: 1.0,
        };

        widget.arbiter.borrow_mut().set_volume(channel, widget.volume)?;
        if !widget.tracks.is_empty() {
            widget.load_current()?;
        }
        Ok(widget)
    }

    pub fn toggle_play(&mut self) -> Result<(), PlaybackError> {
        if self.tracks.is_empty() {
            return Err(PlaybackError::NoTracks);
        }

        let mut arbiter = self.arbiter.borrow_mut();
        match arbiter.is_active(self.channel) {
            true => {
                arbiter.release(self.channel);
                Ok(())
            }
            false => arbiter.acquire(self.channel),
        }
    }

    pub fn next(&mut self) -> Result<(), PlaybackError> {
        if self.tracks.is_empty() {
            return Err(PlaybackError::NoTracks);
        }
        self.current = (self.current + 1) % self.tracks.len();
        self.load_current()
    }

    pub fn previous(&mut self) -> Result<(), PlaybackError> {
        if self.tracks.is_empty() {
            return Err(PlaybackError::NoTracks);
        }
        self.current = match self.current {
            0 => self.tracks.len() - 1,
            n => n - 1,
        };
        self.load_current()
    }

    /// Advance to the next track and stay paused.
    pub fn on_track_end(&mut self) -> Result<(), PlaybackError> {
        debug!("widget track ended, advancing");
        self.next()
    }

    /// Returns true if the event concerned this widget.
    pub fn handle_event(&mut self, event: &PlayerEvent) -> Result<bool, PlaybackError> {
        match event {
            PlayerEvent::Ended(id) if *id == self.channel => {
                self.on_track_end()?;
                Ok(true)
            }
            PlayerEvent::Started(id)
            | PlayerEvent::Paused(id)
            | PlayerEvent::Superseded(id)
            | PlayerEvent::Ended(id) => Ok(*id == self.channel),
            PlayerEvent::Rejected { channel, .. } => Ok(*channel == self.channel),
        }
    }

    /// Absolute seek in seconds, clamped to the known length.
    pub fn seek(&mut self, secs: f64) -> Result<(), PlaybackError> {
        if self.tracks.is_empty() || !secs.is_finite() {
            return Ok(());
        }

        let mut secs = secs.max(0.0);
        if let Some(total) = self.progress().total {
            secs = secs.min(total.as_secs_f64());
        }

        self.arbiter
            .borrow_mut()
            .seek(self.channel, Duration::from_secs_f64(secs))
    }

    pub fn seek_by(&mut self, delta: f64) -> Result<(), PlaybackError> {
        let elapsed = self.progress().elapsed.as_secs_f64();
        self.seek(elapsed + delta)
    }

    pub fn set_volume(&mut self, volume: f32) -> Result<(), PlaybackError> {
        if volume.is_nan() {
            return Ok(());
        }
        self.volume = volume.clamp(0.0, 1.0);
        self.arbiter.borrow_mut().set_volume(self.channel, self.volume)
    }

    pub fn adjust_volume(&mut self, delta: f32) -> Result<(), PlaybackError> {
        self.set_volume(self.volume + delta)
    }

    /// Replaces the list. The current track survives if its id is still
    /// present, otherwise the cursor goes back to the first entry.
    pub fn set_tracks(&mut self, tracks: Vec<Track>) -> Result<(), PlaybackError> {
        let current_id = self.current_track().map(|t| t.id.clone());
        let kept = current_id
            .as_deref()
            .and_then(|id| tracks.iter().position(|t| t.id == id));

        let unchanged = match (kept, self.current_track()) {
            (Some(idx), Some(old)) => tracks[idx] == *old,
            _ => false,
        };

        self.tracks = tracks;
        self.current = kept.unwrap_or(0);

        match self.tracks.is_empty() {
            true => {
                self.arbiter.borrow_mut().release(self.channel);
                Ok(())
            }
            false if unchanged => Ok(()),
            false => self.load_current(),
        }
    }

    pub fn current_track(&self) -> Option<&Track> {
        self.tracks.get(self.current)
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn channel(&self) -> ChannelId {
        self.channel
    }

    pub fn is_playing(&self) -> bool {
        self.arbiter.borrow().is_active(self.channel)
    }

    pub fn glyph(&self) -> Glyph {
        self.arbiter.borrow().glyph(self.channel)
    }

    pub fn progress(&self) -> ProgressSnapshot {
        self.arbiter.borrow().progress(self.channel)
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn session(&self) -> PlaybackSession {
        let progress = self.progress();
        PlaybackSession {
            active_track: self.current_track().cloned(),
            is_playing: self.is_playing(),
            position: progress.elapsed,
            duration: progress.total,
            volume: self.volume,
        }
    }

    fn load_current(&mut self) -> Result<(), PlaybackError> {
        let track = self
            .tracks
            .get(self.current)
            .ok_or(PlaybackError::NoTracks)?;

        info!(track = %track.id, index = self.current, "widget loaded track");
        self.arbiter.borrow_mut().load(self.channel, track)
    }
}
