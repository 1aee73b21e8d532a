use crate::{
    domain::Track,
    player::{ControlId, EmbeddedPlayers, Glyph, PlayerWidget, ProgressSnapshot},
};

/// Player bar contents as of the last tick.
#[derive(Clone, Debug, Default)]
pub struct PlayerSnapshot {
    pub track: Option<Track>,
    pub glyph: Glyph,
    pub progress: ProgressSnapshot,
    pub volume: f32,
    pub index: usize,
    pub count: usize,
}

impl PlayerSnapshot {
    pub fn capture(widget: &PlayerWidget) -> Self {
        PlayerSnapshot {
            track: widget.current_track().cloned(),
            glyph: widget.glyph(),
            progress: widget.progress(),
            volume: widget.volume(),
            index: widget.current_index(),
            count: widget.tracks().len(),
        }
    }
}

/// One inline control on the displayed page.
#[derive(Clone, Debug)]
pub struct ControlView {
    pub id: ControlId,
    pub track_id: String,
    pub title: Option<String>,
    pub glyph: Glyph,
    pub progress: ProgressSnapshot,
}

impl ControlView {
    pub fn capture_all(embedded: &EmbeddedPlayers, ids: &[ControlId]) -> Vec<ControlView> {
        ids.iter()
            .filter_map(|id| {
                let control = embedded.control(id)?;
                Some(ControlView {
                    id: id.clone(),
                    track_id: control.track_id.clone(),
                    title: control.track.as_ref().map(|t| t.title.clone()),
                    glyph: embedded.glyph(id),
                    progress: embedded.progress(id),
                })
            })
            .collect()
    }
}
