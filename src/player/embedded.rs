use super::{
    ChannelId, Glyph, PlaybackError, ProgressSnapshot, RegistryEvent, SharedArbiter,
    SharedRegistry,
};
use crate::domain::{RouteId, Track};
use crossbeam_channel::Receiver;
use indexmap::IndexMap;
use std::{collections::HashMap, fmt};
use tracing::{debug, info, warn};

const MARKER_OPEN: &str = "[[player:";
const MARKER_CLOSE: &str = "]]";

/// Stable name of an inline control: the page it sits on and its position
/// among that page's controls.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ControlId {
    pub route: RouteId,
    pub ordinal: usize,
}

impl ControlId {
    pub fn new(route: RouteId, ordinal: usize) -> Self {
        ControlId { route, ordinal }
    }
}

impl fmt::Display for ControlId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.route, self.ordinal)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ControlMarker {
    pub control: ControlId,
    pub track_id: String,
    /// Body line the marker was found on.
    pub line: usize,
}

/// Finds `[[player:TRACK_ID]]` markers in page text. Ordinals count up
/// across the whole page, so rescanning the same text yields the same ids.
pub fn scan_markers<'a, I>(route: &RouteId, lines: I) -> Vec<ControlMarker>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut markers = Vec::new();

    for (line_idx, line) in lines.into_iter().enumerate() {
        let mut rest = line;
        while let Some(start) = rest.find(MARKER_OPEN) {
            let after = &rest[start + MARKER_OPEN.len()..];
            let Some(end) = after.find(MARKER_CLOSE) else {
                break;
            };

            let track_id = after[..end].trim();
            if !track_id.is_empty() {
                markers.push(ControlMarker {
                    control: ControlId::new(route.clone(), markers.len()),
                    track_id: track_id.to_string(),
                    line: line_idx,
                });
            }
            rest = &after[end + MARKER_CLOSE.len()..];
        }
    }

    markers
}

/// Splits a line around its markers. `Ok` is plain text, `Err` a track id.
pub fn split_markers(line: &str) -> Vec<Result<&str, &str>> {
    let mut parts = Vec::new();
    let mut rest = line;

    while let Some(start) = rest.find(MARKER_OPEN) {
        let after = &rest[start + MARKER_OPEN.len()..];
        let Some(end) = after.find(MARKER_CLOSE) else {
            break;
        };
        let track_id = after[..end].trim();

        if !rest[..start].is_empty() {
            parts.push(Ok(&rest[..start]));
        }
        let marker_end = start + MARKER_OPEN.len() + end + MARKER_CLOSE.len();
        match track_id.is_empty() {
            true => parts.push(Ok(&rest[start..marker_end])),
            false => parts.push(Err(track_id)),
        }
        rest = &after[end + MARKER_CLOSE.len()..];
    }

    if !rest.is_empty() {
        parts.push(Ok(rest));
    }
    parts
}

/// Hidden output of one track id and the source it was last loaded with.
#[derive(Clone, Debug)]
struct TrackChannel {
    channel: ChannelId,
    source: String,
}

#[derive(Clone, Debug)]
pub struct EmbeddedControl {
    pub track_id: String,
    pub track: Option<Track>,
    pub progress: ProgressSnapshot,
}

/// Inline play buttons inside page content. Each control resolves its track
/// through the registry on demand; controls naming the same track share a
/// single output on the arbiter.
pub struct EmbeddedPlayers {
    arbiter: SharedArbiter,
    registry: SharedRegistry,
    updates: Receiver<RegistryEvent>,
    controls: IndexMap<ControlId, EmbeddedControl>,
    channels: HashMap<String, TrackChannel>,
}

impl EmbeddedPlayers {
    pub fn new(arbiter: SharedArbiter, registry: SharedRegistry) -> Self {
        let updates = registry.borrow_mut().subscribe();
        EmbeddedPlayers {
            arbiter,
            registry,
            updates,
            controls: IndexMap::new(),
            channels: HashMap::new(),
        }
    }

    /// Wires every marker not already wired and returns how many were new.
    /// Running it again over the same markers is a no-op.
    pub fn discover(&mut self, markers: &[ControlMarker]) -> usize {
        let mut wired = 0;

        for marker in markers {
            if let Some(existing) = self.controls.get(&marker.control)
                && existing.track_id == marker.track_id
            {
                continue;
            }

            let track = self.registry.borrow().get(&marker.track_id).cloned();
            if track.is_none() {
                warn!(control = %marker.control, track = %marker.track_id, "track not found");
            }

            self.controls.insert(
                marker.control.clone(),
                EmbeddedControl {
                    track_id: marker.track_id.clone(),
                    track,
                    progress: ProgressSnapshot::default(),
                },
            );
            wired += 1;
        }

        if wired > 0 {
            debug!(wired, total = self.controls.len(), "embedded controls discovered");
        }
        wired
    }

    /// Applies pending registry notifications. Returns how many controls
    /// went from unresolved to resolved.
    ///
    /// Outputs whose track left the registry are stopped. Outputs whose
    /// track now names a different source are reloaded with it.
    pub fn sync_registry(&mut self) -> usize {
        if self.updates.try_iter().count() == 0 {
            return 0;
        }

        let registry = self.registry.borrow();
        let mut resolved = 0;

        for (id, control) in self.controls.iter_mut() {
            let fresh = registry.get(&control.track_id).cloned();
            if control.track.is_none() && fresh.is_some() {
                debug!(control = %id, track = %control.track_id, "control resolved");
                resolved += 1;
            }
            control.track = fresh;
        }

        let mut arbiter = self.arbiter.borrow_mut();
        for (track_id, loaded) in self.channels.iter_mut() {
            match registry.get(track_id) {
                None => {
                    if arbiter.is_active(loaded.channel) {
                        info!(track = %track_id, "playing track left the registry, stopping");
                    }
                    arbiter.release(loaded.channel);
                }
                Some(track) if track.source != loaded.source => {
                    if let Err(e) = arbiter.load(loaded.channel, track) {
                        warn!(track = %track_id, error = %e, "failed to reload embedded track");
                    }
                    loaded.source = track.source.clone();
                }
                Some(_) => (),
            }
        }

        resolved
    }

    /// Click on a control: start its track, or pause it if it is the one
    /// playing. Whatever else was playing stops first.
    pub fn activate(&mut self, id: &ControlId) -> Result<(), PlaybackError> {
        // A playing control can always pause, whatever the registry says now
        let playing = self
            .channel_of(id)
            .filter(|c| self.arbiter.borrow().is_active(*c));
        if let Some(channel) = playing {
            info!(control = %id, "embedded playback paused");
            self.arbiter.borrow_mut().release(channel);
            return Ok(());
        }

        let control = self
            .controls
            .get_mut(id)
            .ok_or_else(|| PlaybackError::UnknownControl(id.to_string()))?;

        if control.track.is_none() {
            control.track = self.registry.borrow().get(&control.track_id).cloned();
        }

        let Some(track) = control.track.clone() else {
            warn!(control = %id, track = %control.track_id, "track not found");
            return Err(PlaybackError::TrackNotFound(control.track_id.clone()));
        };

        if !track.has_source() {
            warn!(control = %id, track = %track.id, "track has no source");
            return Err(PlaybackError::MissingSource(track.id));
        }

        let channel = self.channel_for(&track)?;
        self.arbiter.borrow_mut().acquire(channel)
    }

    /// Copies the live position into the controls of the playing track.
    /// Every other control keeps whatever it last showed.
    pub fn tick(&mut self) {
        let arbiter = self.arbiter.borrow();
        let Some(active) = arbiter.active() else {
            return;
        };
        let progress = arbiter.progress(active);

        for control in self.controls.values_mut() {
            if self.channels.get(&control.track_id).map(|c| c.channel) == Some(active) {
                control.progress = progress;
            }
        }
    }

    pub fn owns(&self, channel: ChannelId) -> bool {
        self.channels.values().any(|c| c.channel == channel)
    }

    pub fn glyph(&self, id: &ControlId) -> Glyph {
        self.channel_of(id)
            .map(|c| self.arbiter.borrow().glyph(c))
            .unwrap_or_default()
    }

    pub fn progress(&self, id: &ControlId) -> ProgressSnapshot {
        self.controls
            .get(id)
            .map(|c| c.progress)
            .unwrap_or_default()
    }

    pub fn control(&self, id: &ControlId) -> Option<&EmbeddedControl> {
        self.controls.get(id)
    }

    pub fn is_resolved(&self, id: &ControlId) -> bool {
        self.controls.get(id).is_some_and(|c| c.track.is_some())
    }

    pub fn controls_on(&self, route: &RouteId) -> Vec<ControlId> {
        self.controls
            .keys()
            .filter(|id| &id.route == route)
            .cloned()
            .collect()
    }

    pub fn wired_count(&self) -> usize {
        self.controls.len()
    }

    fn channel_of(&self, id: &ControlId) -> Option<ChannelId> {
        let control = self.controls.get(id)?;
        self.channel_by_track(&control.track_id)
    }

    fn channel_by_track(&self, track_id: &str) -> Option<ChannelId> {
        self.channels.get(track_id).map(|c| c.channel)
    }

    /// One hidden output per track id, created and loaded on first use and
    /// reloaded whenever the track's source differs from what it holds.
    fn channel_for(&mut self, track: &Track) -> Result<ChannelId, PlaybackError> {
        if let Some(loaded) = self.channels.get_mut(&track.id) {
            if loaded.source != track.source {
                self.arbiter.borrow_mut().load(loaded.channel, track)?;
                loaded.source = track.source.clone();
            }
            return Ok(loaded.channel);
        }

        let mut arbiter = self.arbiter.borrow_mut();
        let channel = arbiter
            .open_channel()
            .map_err(|e| PlaybackError::Rejected {
                track: track.id.clone(),
                reason: e.to_string(),
            })?;
        arbiter.load(channel, track)?;

        self.channels.insert(
            track.id.clone(),
            TrackChannel {
                channel,
                source: track.source.clone(),
            },
        );
        Ok(channel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::{AudioArbiter, PlayerWidget, TrackRegistry, testing::FakeFactory};

    fn track(id: &str) -> Track {
        Track::new(id, id, "М. Б. Тертерян", format!("/audio/{id}.mp3"))
    }

    fn setup(ids: &[&str]) -> (EmbeddedPlayers, SharedArbiter, SharedRegistry, FakeFactory) {
        let factory = FakeFactory::default();
        let arbiter = AudioArbiter::shared(Box::new(factory.clone()));
        let registry = TrackRegistry::from_tracks(ids.iter().map(|id| track(id))).shared();
        let embedded = EmbeddedPlayers::new(arbiter.clone(), registry.clone());
        (embedded, arbiter, registry, factory)
    }

    fn media() -> RouteId {
        RouteId::from("/media")
    }

    #[test]
    fn scans_markers_with_stable_ordinals() {
        let lines = [
            "Intro",
            "[[player:sym-1]] and [[player: quartet-2 ]]",
            "broken [[player:oops",
            "[[player:]]",
            "[[player:concerto]]",
        ];
        let markers = scan_markers(&media(), lines);

        let ids = markers
            .iter()
            .map(|m| (m.control.to_string(), m.track_id.as_str(), m.line))
            .collect::<Vec<_>>();
        assert_eq!(
            ids,
            vec![
                ("/media#0".to_string(), "sym-1", 1),
                ("/media#1".to_string(), "quartet-2", 1),
                ("/media#2".to_string(), "concerto", 4),
            ]
        );
        assert_eq!(scan_markers(&media(), lines), markers);
    }

    #[test]
    fn splits_lines_around_markers() {
        let expected: Vec<Result<&str, &str>> = vec![Ok("Listen: "), Err("a"), Ok(" now")];
        assert_eq!(split_markers("Listen: [[player:a]] now"), expected);

        let plain: Vec<Result<&str, &str>> = vec![Ok("plain")];
        assert_eq!(split_markers("plain"), plain);

        let empty: Vec<Result<&str, &str>> = vec![Ok("x "), Ok("[[player: ]]")];
        assert_eq!(split_markers("x [[player: ]]"), empty);
    }

    #[test]
    fn discover_is_idempotent() {
        let (mut embedded, _, _, _) = setup(&["a", "b"]);
        let markers = scan_markers(&media(), ["[[player:a]]", "[[player:b]]"]);

        assert_eq!(embedded.discover(&markers), 2);
        assert_eq!(embedded.discover(&markers), 0);

        let more = scan_markers(&media(), ["[[player:a]]", "[[player:b]]", "[[player:a]]"]);
        assert_eq!(embedded.discover(&more), 1);
        assert_eq!(embedded.wired_count(), 3);
    }

    #[test]
    fn one_output_plays_across_widget_and_controls() {
        let (mut embedded, arbiter, _, factory) = setup(&["a", "b"]);
        let mut widget = PlayerWidget::new(arbiter.clone(), vec![track("w")]).unwrap();
        let markers = scan_markers(&media(), ["[[player:a]] [[player:b]]"]);
        embedded.discover(&markers);
        let (first, second) = (&markers[0].control, &markers[1].control);

        widget.toggle_play().unwrap();
        embedded.activate(first).unwrap();
        assert_eq!(widget.glyph(), Glyph::Play);
        assert_eq!(embedded.glyph(first), Glyph::Pause);
        assert_eq!(factory.playing_count(), 1);

        embedded.activate(second).unwrap();
        assert_eq!(embedded.glyph(first), Glyph::Play);
        assert_eq!(embedded.glyph(second), Glyph::Pause);
        assert_eq!(factory.playing_count(), 1);

        widget.toggle_play().unwrap();
        assert_eq!(embedded.glyph(second), Glyph::Play);
        assert_eq!(widget.glyph(), Glyph::Pause);
        assert_eq!(factory.playing_count(), 1);
        assert_eq!(arbiter.borrow().playing_count(), 1);
    }

    #[test]
    fn reactivating_the_playing_control_pauses_it() {
        let (mut embedded, arbiter, _, factory) = setup(&["a"]);
        let markers = scan_markers(&media(), ["[[player:a]]", "[[player:a]]"]);
        embedded.discover(&markers);

        embedded.activate(&markers[0].control).unwrap();
        assert_eq!(factory.output_count(), 1);

        // Same track from another control shares the output and pauses it
        embedded.activate(&markers[1].control).unwrap();
        assert_eq!(factory.output_count(), 1);
        assert_eq!(factory.playing_count(), 0);
        assert_eq!(arbiter.borrow().active(), None);
    }

    #[test]
    fn unknown_track_is_inert_until_registry_updates() {
        let (mut embedded, _, registry, factory) = setup(&[]);
        let markers = scan_markers(&media(), ["[[player:late]]"]);
        embedded.discover(&markers);
        let control = &markers[0].control;

        assert_eq!(
            embedded.activate(control),
            Err(PlaybackError::TrackNotFound("late".into()))
        );
        assert_eq!(factory.output_count(), 0);

        registry.borrow_mut().insert(track("late"));
        assert_eq!(embedded.sync_registry(), 1);
        assert_eq!(embedded.sync_registry(), 0);
        assert!(embedded.is_resolved(control));

        embedded.activate(control).unwrap();
        assert_eq!(embedded.glyph(control), Glyph::Pause);
    }

    #[test]
    fn track_without_source_is_rejected() {
        let (mut embedded, _, registry, factory) = setup(&[]);
        registry
            .borrow_mut()
            .insert(Track::new("silent", "Silent", "", ""));
        let markers = scan_markers(&media(), ["[[player:silent]]"]);
        embedded.discover(&markers);

        assert_eq!(
            embedded.activate(&markers[0].control),
            Err(PlaybackError::MissingSource("silent".into()))
        );
        assert_eq!(factory.output_count(), 0);
    }

    #[test]
    fn only_the_active_control_receives_progress() {
        let (mut embedded, _, _, factory) = setup(&["a", "b"]);
        let markers = scan_markers(&media(), ["[[player:a]] [[player:b]]"]);
        embedded.discover(&markers);
        let (first, second) = (&markers[0].control, &markers[1].control);

        embedded.activate(first).unwrap();
        factory.output(0).borrow_mut().position = std::time::Duration::from_secs(42);
        embedded.tick();
        assert_eq!(embedded.progress(first).elapsed_label(), "0:42");

        embedded.activate(second).unwrap();
        factory.output(0).borrow_mut().position = std::time::Duration::from_secs(99);
        factory.output(1).borrow_mut().position = std::time::Duration::from_secs(7);
        embedded.tick();

        assert_eq!(embedded.progress(first).elapsed_label(), "0:42");
        assert_eq!(embedded.progress(second).elapsed_label(), "0:07");
    }

    #[test]
    fn changed_source_reloads_the_shared_output() {
        let (mut embedded, _, registry, factory) = setup(&["a"]);
        let markers = scan_markers(&media(), ["[[player:a]]"]);
        embedded.discover(&markers);
        embedded.activate(&markers[0].control).unwrap();

        registry
            .borrow_mut()
            .replace([Track::new("a", "a", "", "/audio/a-remaster.mp3")]);
        embedded.sync_registry();

        let state = factory.output(0);
        assert_eq!(state.borrow().source.as_deref(), Some("/audio/a-remaster.mp3"));
        assert!(!state.borrow().playing);
    }

    #[test]
    fn removed_track_stops_its_output() {
        let (mut embedded, _, registry, factory) = setup(&["a"]);
        let markers = scan_markers(&media(), ["[[player:a]]"]);
        embedded.discover(&markers);
        let control = &markers[0].control;

        embedded.activate(control).unwrap();
        assert_eq!(factory.playing_count(), 1);

        registry.borrow_mut().replace(Vec::<Track>::new());
        embedded.sync_registry();

        assert_eq!(factory.playing_count(), 0);
        assert_eq!(embedded.glyph(control), Glyph::Play);
        assert!(!embedded.is_resolved(control));
    }

    #[test]
    fn playing_control_pauses_before_registry_sync() {
        let (mut embedded, arbiter, registry, factory) = setup(&["a"]);
        let markers = scan_markers(&media(), ["[[player:a]]"]);
        embedded.discover(&markers);
        let control = &markers[0].control;

        embedded.activate(control).unwrap();
        registry.borrow_mut().replace(Vec::<Track>::new());

        embedded.activate(control).unwrap();
        assert_eq!(factory.playing_count(), 0);
        assert_eq!(arbiter.borrow().active(), None);
        assert_eq!(embedded.glyph(control), Glyph::Play);
    }

    #[test]
    fn re_added_track_plays_its_new_source() {
        let (mut embedded, _, registry, factory) = setup(&[]);
        registry
            .borrow_mut()
            .insert(Track::new("a", "a", "", "/audio/old.mp3"));
        let markers = scan_markers(&media(), ["[[player:a]]"]);
        embedded.discover(&markers);
        let control = &markers[0].control;

        embedded.activate(control).unwrap();
        embedded.activate(control).unwrap();

        registry.borrow_mut().replace(Vec::<Track>::new());
        embedded.sync_registry();
        registry
            .borrow_mut()
            .replace([Track::new("a", "a", "", "/audio/new.mp3")]);
        embedded.sync_registry();

        embedded.activate(control).unwrap();
        let state = factory.output(0);
        assert_eq!(factory.output_count(), 1);
        assert_eq!(state.borrow().source.as_deref(), Some("/audio/new.mp3"));
        assert!(state.borrow().playing);
    }
}
