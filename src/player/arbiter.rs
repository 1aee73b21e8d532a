use super::{AudioOutput, Glyph, OutputFactory, PlaybackError, PlayerEvent, ProgressSnapshot};
use crate::domain::Track;
use anyhow::Result;
use crossbeam_channel::{Receiver, Sender};
use std::{cell::RefCell, rc::Rc, time::Duration};
use tracing::{debug, info, warn};

pub type SharedArbiter = Rc<RefCell<AudioArbiter>>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ChannelId(usize);

impl std::fmt::Display for ChannelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ch{}", self.0)
    }
}

struct Channel {
    output: Box<dyn AudioOutput>,
    glyph: Glyph,
    track_id: Option<String>,
}

/// Owner of every audio output on the page and of the single "now playing"
/// slot. Nothing starts or stops audibly except through here.
pub struct AudioArbiter {
    factory: Box<dyn OutputFactory>,
    channels: Vec<Channel>,
    active: Option<ChannelId>,
    events: Sender<PlayerEvent>,
    event_rx: Receiver<PlayerEvent>,
}

impl AudioArbiter {
    pub fn new(factory: Box<dyn OutputFactory>) -> Self {
        let (events, event_rx) = crossbeam_channel::unbounded();
        AudioArbiter {
            factory,
            channels: Vec::new(),
            active: None,
            events,
            event_rx,
        }
    }

    pub fn shared(factory: Box<dyn OutputFactory>) -> SharedArbiter {
        Rc::new(RefCell::new(Self::new(factory)))
    }

    pub fn open_channel(&mut self) -> Result<ChannelId> {
        let output = self.factory.create_output()?;
        self.channels.push(Channel {
            output,
            glyph: Glyph::Play,
            track_id: None,
        });

        let id = ChannelId(self.channels.len() - 1);
        debug!(channel = %id, "audio channel opened");
        Ok(id)
    }

    /// Points a channel at a new source. A channel that was the active one
    /// gives up the slot first.
    pub fn load(&mut self, id: ChannelId, track: &Track) -> Result<(), PlaybackError> {
        self.release(id);

        let channel = self.channel_mut(id)?;
        channel.glyph = Glyph::Play;
        channel.track_id = Some(track.id.clone());

        channel
            .output
            .load(&track.source)
            .map_err(|e| PlaybackError::Rejected {
                track: track.id.clone(),
                reason: e.to_string(),
            })
    }

    /// Makes `id` the one playing channel. Whoever held the slot before is
    /// paused and shows the play glyph again before `id` is started.
    pub fn acquire(&mut self, id: ChannelId) -> Result<(), PlaybackError> {
        self.channel(id)?;

        if self.active == Some(id) && self.channels[id.0].output.is_playing() {
            return Ok(());
        }

        if let Some(prev) = self.active.take().filter(|prev| *prev != id) {
            let previous = &mut self.channels[prev.0];
            previous.output.pause();
            previous.glyph = Glyph::Play;
            self.emit(PlayerEvent::Superseded(prev));
            debug!(channel = %prev, "superseded");
        }

        let channel = &mut self.channels[id.0];
        match channel.output.play() {
            Ok(()) => {
                channel.glyph = Glyph::Pause;
                self.active = Some(id);
                info!(channel = %id, track = ?channel.track_id, "playback started");
                self.emit(PlayerEvent::Started(id));
                Ok(())
            }
            Err(e) => {
                channel.glyph = Glyph::Play;
                let track = channel.track_id.clone().unwrap_or_default();
                let reason = e.to_string();
                warn!(channel = %id, %track, %reason, "playback rejected");

                self.emit(PlayerEvent::Rejected {
                    channel: id,
                    reason: reason.clone(),
                });
                Err(PlaybackError::Rejected { track, reason })
            }
        }
    }

    /// Pauses `id` if it holds the slot. Anything else is left alone.
    pub fn release(&mut self, id: ChannelId) {
        if self.active != Some(id) {
            return;
        }

        self.active = None;
        if let Some(channel) = self.channels.get_mut(id.0) {
            channel.output.pause();
            channel.glyph = Glyph::Play;
        }
        self.emit(PlayerEvent::Paused(id));
    }

    /// Checks the active output for a natural end. Call once per tick.
    pub fn poll(&mut self) {
        let Some(id) = self.active else { return };

        if self.channels[id.0].output.track_ended() {
            self.active = None;
            self.channels[id.0].glyph = Glyph::Play;
            debug!(channel = %id, "track ended");
            self.emit(PlayerEvent::Ended(id));
        }
    }

    pub fn poll_events(&mut self) -> Vec<PlayerEvent> {
        std::iter::from_fn(|| self.event_rx.try_recv().ok()).collect()
    }

    pub fn seek(&mut self, id: ChannelId, pos: Duration) -> Result<(), PlaybackError> {
        self.channel_mut(id)?
            .output
            .seek(pos)
            .map_err(|e| PlaybackError::Seek(e.to_string()))
    }

    pub fn set_volume(&mut self, id: ChannelId, volume: f32) -> Result<(), PlaybackError> {
        self.channel_mut(id)?.output.set_volume(volume);
        Ok(())
    }

    pub fn progress(&self, id: ChannelId) -> ProgressSnapshot {
        match self.channels.get(id.0) {
            Some(channel) => {
                ProgressSnapshot::new(channel.output.position(), channel.output.duration())
            }
            None => ProgressSnapshot::default(),
        }
    }

    pub fn glyph(&self, id: ChannelId) -> Glyph {
        self.channels
            .get(id.0)
            .map(|c| c.glyph)
            .unwrap_or_default()
    }

    pub fn active(&self) -> Option<ChannelId> {
        self.active
    }

    pub fn is_active(&self, id: ChannelId) -> bool {
        self.active == Some(id)
    }

    pub fn track_id(&self, id: ChannelId) -> Option<&str> {
        self.channels.get(id.0)?.track_id.as_deref()
    }

    /// Outputs currently producing sound. Never more than one.
    pub fn playing_count(&self) -> usize {
        self.channels
            .iter()
            .filter(|c| c.output.is_playing())
            .count()
    }

    pub fn stop_all(&mut self) {
        self.active = None;
        for channel in self.channels.iter_mut() {
            channel.output.pause();
            channel.glyph = Glyph::Play;
        }
    }

    fn channel(&self, id: ChannelId) -> Result<&Channel, PlaybackError> {
        self.channels
            .get(id.0)
            .ok_or_else(|| PlaybackError::UnknownControl(id.to_string()))
    }

    fn channel_mut(&mut self, id: ChannelId) -> Result<&mut Channel, PlaybackError> {
        self.channels
            .get_mut(id.0)
            .ok_or_else(|| PlaybackError::UnknownControl(id.to_string()))
    }

    fn emit(&self, event: PlayerEvent) {
        let _ = self.events.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::testing::FakeFactory;

    fn track(id: &str) -> Track {
        Track::new(id, id, "М. Б. Тертерян", format!("/audio/{id}.mp3"))
    }

    fn arbiter_with(n: usize) -> (AudioArbiter, FakeFactory, Vec<ChannelId>) {
        let factory = FakeFactory::default();
        let mut arbiter = AudioArbiter::new(Box::new(factory.clone()));
        let ids = (0..n)
            .map(|i| {
                let id = arbiter.open_channel().unwrap();
                arbiter.load(id, &track(&format!("t{i}"))).unwrap();
                id
            })
            .collect();
        (arbiter, factory, ids)
    }

    #[test]
    fn acquiring_stops_previous_owner_first() {
        let (mut arbiter, factory, ids) = arbiter_with(2);

        arbiter.acquire(ids[0]).unwrap();
        assert_eq!(arbiter.glyph(ids[0]), Glyph::Pause);

        arbiter.acquire(ids[1]).unwrap();
        assert_eq!(arbiter.glyph(ids[0]), Glyph::Play);
        assert_eq!(arbiter.glyph(ids[1]), Glyph::Pause);
        assert_eq!(arbiter.active(), Some(ids[1]));
        assert_eq!(factory.playing_count(), 1);

        let events = arbiter.poll_events();
        assert_eq!(
            events,
            vec![
                PlayerEvent::Started(ids[0]),
                PlayerEvent::Superseded(ids[0]),
                PlayerEvent::Started(ids[1]),
            ]
        );
    }

    #[test]
    fn rejected_start_leaves_nothing_playing() {
        let (mut arbiter, factory, ids) = arbiter_with(2);
        factory.reject("/audio/t1.mp3");

        arbiter.acquire(ids[0]).unwrap();
        let err = arbiter.acquire(ids[1]).unwrap_err();

        assert!(matches!(err, PlaybackError::Rejected { ref track, .. } if track == "t1"));
        assert_eq!(arbiter.glyph(ids[1]), Glyph::Play);
        assert_eq!(arbiter.glyph(ids[0]), Glyph::Play);
        assert_eq!(arbiter.active(), None);
        assert_eq!(factory.playing_count(), 0);
    }

    #[test]
    fn release_ignores_non_owner() {
        let (mut arbiter, factory, ids) = arbiter_with(2);

        arbiter.acquire(ids[0]).unwrap();
        arbiter.release(ids[1]);
        assert_eq!(arbiter.active(), Some(ids[0]));
        assert_eq!(factory.playing_count(), 1);

        arbiter.release(ids[0]);
        assert_eq!(arbiter.active(), None);
        assert_eq!(factory.playing_count(), 0);
    }

    #[test]
    fn natural_end_frees_the_slot() {
        let (mut arbiter, factory, ids) = arbiter_with(1);

        arbiter.acquire(ids[0]).unwrap();
        factory.output(0).borrow_mut().finish();
        arbiter.poll();

        assert_eq!(arbiter.active(), None);
        assert_eq!(arbiter.glyph(ids[0]), Glyph::Play);
        assert!(
            arbiter
                .poll_events()
                .contains(&PlayerEvent::Ended(ids[0]))
        );
    }

    #[test]
    fn loading_active_channel_releases_it() {
        let (mut arbiter, factory, ids) = arbiter_with(1);

        arbiter.acquire(ids[0]).unwrap();
        arbiter.load(ids[0], &track("other")).unwrap();

        assert_eq!(arbiter.active(), None);
        assert_eq!(arbiter.track_id(ids[0]), Some("other"));
        assert_eq!(factory.playing_count(), 0);
    }
}
