use serde::{Deserialize, Serialize};

/// A playable piece of music. `duration` is whatever the content author wrote
/// and is only ever displayed; the real length comes from the decoder.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    pub id: String,
    pub title: String,
    #[serde(alias = "artist", default)]
    pub composer: String,
    #[serde(alias = "src", alias = "url")]
    pub source: String,
    #[serde(default)]
    pub duration: String,
}

impl Track {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        composer: impl Into<String>,
        source: impl Into<String>,
    ) -> Self {
        Track {
            id: id.into(),
            title: title.into(),
            composer: composer.into(),
            source: source.into(),
            duration: String::new(),
        }
    }

    pub fn with_duration(mut self, duration: impl Into<String>) -> Self {
        self.duration = duration.into();
        self
    }

    pub fn has_source(&self) -> bool {
        !self.source.trim().is_empty()
    }
}
