use crate::{
    app_core::Overture,
    config::SiteConfig,
    player::{ControlId, PlaybackError, PlayerEvent, scan_markers},
    transition::Clock,
};
use anyhow::Result;
use tracing::{debug, info, warn};

impl<C: Clock> Overture<C> {
    pub(super) fn handle_player_event(&mut self, event: PlayerEvent) -> Result<()> {
        if self.widget.handle_event(&event)? {
            return Ok(());
        }

        match event {
            PlayerEvent::Ended(channel) if self.embedded.owns(channel) => {
                debug!(%channel, "embedded track ended")
            }
            PlayerEvent::Rejected { channel, reason } => {
                warn!(%channel, %reason, "embedded playback rejected")
            }
            _ => (),
        }
        Ok(())
    }

    pub(crate) fn activate_focused(&mut self) -> Result<()> {
        let Some(control) = self.ui.focused_control() else {
            return Ok(());
        };
        self.activate_control(&control)
    }

    pub(crate) fn activate_control(&mut self, control: &ControlId) -> Result<()> {
        match self.embedded.activate(control) {
            Ok(()) => Ok(()),
            // Stays inert until the registry learns the track
            Err(PlaybackError::TrackNotFound(id)) => {
                warn!(%control, track = %id, "embedded control has no track yet");
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Scans the page on screen for inline players and wires any new ones.
    /// Returns the page's controls in order.
    pub(super) fn wire_displayed_page(&mut self) -> Vec<ControlId> {
        let Some(page) = self.ui.displayed_page() else {
            return Vec::new();
        };

        let markers = scan_markers(&page.route, page.body.iter().map(String::as_str));
        self.embedded.discover(&markers);

        markers.into_iter().map(|m| m.control).collect()
    }

    /// Re-reads the site file and pushes its tracks to the registry and the
    /// player bar.
    pub(crate) fn reload_tracks(&mut self) -> Result<()> {
        let fresh = SiteConfig::load(self.config_path.as_deref())?;

        self.registry.borrow_mut().replace(fresh.tracks.clone());
        self.widget.set_tracks(fresh.playlist())?;

        info!(tracks = fresh.tracks.len(), "tracks reloaded");
        self.config.tracks = fresh.tracks;
        self.config.media.playlist = fresh.media.playlist;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        app_core::Overture,
        config::SiteConfig,
        key_handler::Action,
        player::testing::FakeFactory,
        transition::ManualClock,
    };
    use std::io::Write;

    #[test]
    fn reload_picks_up_new_tracks_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(
            br#"
            [[tracks]]
            id = "1"
            title = "Old"
            src = "/audio/old.mp3"
            "#,
        )
        .unwrap();

        let path = file.path().to_path_buf();
        let config = SiteConfig::load(Some(path.as_path())).unwrap();
        let mut app = Overture::with_parts(
            config,
            Some(path.clone()),
            Box::new(FakeFactory::default()),
            ManualClock::default(),
        )
        .unwrap();
        app.tick();
        assert_eq!(app.ui.player.track.as_ref().unwrap().title, "Old");

        std::fs::write(
            &path,
            r#"
            [[tracks]]
            id = "1"
            title = "New"
            src = "/audio/new.mp3"

            [[tracks]]
            id = "9"
            title = "Extra"
            src = "/audio/extra.mp3"
            "#,
        )
        .unwrap();

        app.dispatch(Action::ReloadTracks);
        app.tick();

        assert!(app.ui.get_error().is_none());
        assert_eq!(app.ui.player.track.as_ref().unwrap().title, "New");
        assert_eq!(app.ui.player.count, 2);
        assert!(app.registry.borrow().contains("9"));
    }

    #[test]
    fn unknown_embedded_track_is_not_an_error() {
        let mut config = SiteConfig::default();
        config.tracks.clear();
        let clock = ManualClock::default();
        let mut app = Overture::with_parts(
            config,
            None,
            Box::new(FakeFactory::default()),
            clock.clone(),
        )
        .unwrap();

        app.dispatch(Action::GoToPage(2));
        clock.advance(800);
        app.tick();

        app.dispatch(Action::FocusNext);
        app.dispatch(Action::ActivateControl);
        assert!(app.ui.get_error().is_none());
    }
}
