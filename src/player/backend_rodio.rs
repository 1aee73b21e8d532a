use super::{AudioOutput, OutputFactory};
use anyhow::{Context, Result, anyhow};
use rodio::decoder::builder::SeekMode;
use rodio::{Decoder, OutputStream, OutputStreamBuilder, Sink, Source};
use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
    time::Duration,
};
use tracing::debug;

/// The one device stream every channel mixes into.
pub struct RodioEngine {
    stream: OutputStream,
    media_root: PathBuf,
}

impl RodioEngine {
    pub fn new(media_root: impl Into<PathBuf>) -> Result<Self> {
        let mut stream = OutputStreamBuilder::open_default_stream()
            .context("Failed to open default audio device")?;
        stream.log_on_drop(false);

        Ok(RodioEngine {
            stream,
            media_root: media_root.into(),
        })
    }
}

impl OutputFactory for RodioEngine {
    fn create_output(&self) -> Result<Box<dyn AudioOutput>> {
        let sink = Sink::connect_new(self.stream.mixer());
        sink.pause();

        Ok(Box::new(RodioOutput {
            sink,
            media_root: self.media_root.clone(),
            path: None,
            decoded: false,
            duration: None,
            pending_seek: None,
        }))
    }
}

/// A single sink holding at most one decoded source. Decoding happens on the
/// first `play` after a `load`, so bad files are reported there.
pub struct RodioOutput {
    sink: Sink,
    media_root: PathBuf,
    path: Option<PathBuf>,
    decoded: bool,
    duration: Option<Duration>,
    pending_seek: Option<Duration>,
}

impl RodioOutput {
    fn resolve(&self, source: &str) -> PathBuf {
        let path = Path::new(source);
        match path.exists() {
            true => path.to_path_buf(),
            false => self.media_root.join(source.trim_start_matches('/')),
        }
    }
}

impl AudioOutput for RodioOutput {
    fn load(&mut self, source: &str) -> Result<()> {
        self.sink.clear();
        self.path = Some(self.resolve(source));
        self.decoded = false;
        self.duration = None;
        self.pending_seek = None;
        Ok(())
    }

    fn play(&mut self) -> Result<()> {
        if !self.decoded || self.sink.empty() {
            let path = self.path.as_ref().ok_or_else(|| anyhow!("Nothing loaded"))?;
            let source = decode(path)?;
            debug!(path = %path.display(), "decoded source");

            self.duration = source.total_duration();
            self.sink.clear();
            self.sink.append(source);
            self.decoded = true;

            if let Some(pos) = self.pending_seek.take() {
                self.sink
                    .try_seek(pos)
                    .map_err(|e| anyhow!("Seek failed: {e}"))?;
            }
        }

        self.sink.play();
        Ok(())
    }

    fn pause(&mut self) {
        self.sink.pause();
    }

    fn seek(&mut self, pos: Duration) -> Result<()> {
        match self.decoded && !self.sink.empty() {
            true => self
                .sink
                .try_seek(pos)
                .map_err(|e| anyhow!("Seek failed: {e}")),
            false => {
                self.pending_seek = Some(pos);
                Ok(())
            }
        }
    }

    fn set_volume(&mut self, volume: f32) {
        self.sink.set_volume(volume);
    }

    fn position(&self) -> Duration {
        match self.decoded {
            true => self.sink.get_pos(),
            false => self.pending_seek.unwrap_or_default(),
        }
    }

    fn duration(&self) -> Option<Duration> {
        self.duration
    }

    fn is_playing(&self) -> bool {
        self.decoded && !self.sink.is_paused() && !self.sink.empty()
    }

    fn track_ended(&self) -> bool {
        self.decoded && self.sink.empty()
    }
}

fn decode(path: &Path) -> Result<Decoder<BufReader<File>>> {
    let file = File::open(path).with_context(|| format!("Cannot open {}", path.display()))?;
    let len = file.metadata()?.len();

    let mut builder = Decoder::builder()
        .with_data(BufReader::new(file))
        .with_byte_len(len)
        .with_seek_mode(SeekMode::Fastest)
        .with_seekable(true);

    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        let hint = match ext {
            "adif" | "adts" => "aac",
            "m4a" | "m4b" | "mp4" => "audio/mp4",
            "mpga" => "mp3",
            "oga" | "ogx" => "audio/ogg",
            "wave" => "wav",
            _ => ext,
        };
        builder = builder.with_hint(hint);
    }

    builder
        .build()
        .with_context(|| format!("Unsupported audio in {}", path.display()))
}
