use crate::domain::Track;
use crossbeam_channel::{Receiver, Sender};
use indexmap::IndexMap;
use std::{cell::RefCell, rc::Rc};
use tracing::debug;

pub type SharedRegistry = Rc<RefCell<TrackRegistry>>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RegistryEvent {
    Updated { revision: u64 },
}

/// Page-wide lookup of tracks by id. Can be repopulated at any time;
/// subscribers are told about every change.
#[derive(Default)]
pub struct TrackRegistry {
    tracks: IndexMap<String, Track>,
    revision: u64,
    subscribers: Vec<Sender<RegistryEvent>>,
}

impl TrackRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_tracks<I: IntoIterator<Item = Track>>(tracks: I) -> Self {
        TrackRegistry {
            tracks: tracks.into_iter().map(|t| (t.id.clone(), t)).collect(),
            ..Default::default()
        }
    }

    pub fn shared(self) -> SharedRegistry {
        Rc::new(RefCell::new(self))
    }

    pub fn subscribe(&mut self) -> Receiver<RegistryEvent> {
        let (tx, rx) = crossbeam_channel::unbounded();
        self.subscribers.push(tx);
        rx
    }

    pub fn get(&self, id: &str) -> Option<&Track> {
        self.tracks.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.tracks.contains_key(id)
    }

    /// Swaps the whole set. Later duplicates of an id win.
    pub fn replace<I: IntoIterator<Item = Track>>(&mut self, tracks: I) {
        self.tracks = tracks.into_iter().map(|t| (t.id.clone(), t)).collect();
        self.notify();
    }

    pub fn insert(&mut self, track: Track) {
        self.tracks.insert(track.id.clone(), track);
        self.notify();
    }

    pub fn remove(&mut self, id: &str) -> Option<Track> {
        let removed = self.tracks.shift_remove(id);
        if removed.is_some() {
            self.notify();
        }
        removed
    }

    pub fn tracks(&self) -> impl Iterator<Item = &Track> {
        self.tracks.values()
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn notify(&mut self) {
        self.revision += 1;
        let event = RegistryEvent::Updated {
            revision: self.revision,
        };

        // Dropped receivers fall out of the list here
        self.subscribers.retain(|tx| tx.send(event).is_ok());
        debug!(
            revision = self.revision,
            tracks = self.tracks.len(),
            "track registry updated"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track(id: &str) -> Track {
        Track::new(id, format!("Title {id}"), "Composer", format!("/audio/{id}.mp3"))
    }

    #[test]
    fn subscribers_see_every_change() {
        let mut registry = TrackRegistry::new();
        let rx = registry.subscribe();

        registry.insert(track("a"));
        registry.replace([track("b"), track("c")]);
        registry.remove("b");
        registry.remove("missing");

        let events = rx.try_iter().collect::<Vec<_>>();
        assert_eq!(
            events,
            vec![
                RegistryEvent::Updated { revision: 1 },
                RegistryEvent::Updated { revision: 2 },
                RegistryEvent::Updated { revision: 3 },
            ]
        );
        assert!(registry.contains("c"));
        assert!(!registry.contains("a"));
    }

    #[test]
    fn dropped_subscribers_are_pruned() {
        let mut registry = TrackRegistry::new();
        let rx = registry.subscribe();
        drop(rx);

        registry.insert(track("a"));
        assert!(registry.subscribers.is_empty());
    }

    #[test]
    fn keeps_insertion_order() {
        let registry = TrackRegistry::from_tracks([track("z"), track("a"), track("m")]);
        let ids = registry.tracks().map(|t| t.id.as_str()).collect::<Vec<_>>();
        assert_eq!(ids, vec!["z", "a", "m"]);
    }
}
