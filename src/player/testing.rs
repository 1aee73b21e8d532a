use super::{AudioOutput, OutputFactory};
use anyhow::{Result, anyhow, bail};
use std::{cell::RefCell, collections::HashSet, rc::Rc, time::Duration};

pub const FAKE_DURATION: Duration = Duration::from_secs(200);

#[derive(Debug, Default)]
pub struct FakeState {
    pub source: Option<String>,
    pub playing: bool,
    pub position: Duration,
    pub duration: Option<Duration>,
    pub volume: f32,
    pub plays: usize,
    pub ended: bool,
}

impl FakeState {
    /// Simulates the output running off the end of its source.
    pub fn finish(&mut self) {
        self.playing = false;
        self.ended = true;
        if let Some(total) = self.duration {
            self.position = total;
        }
    }
}

pub type FakeHandle = Rc<RefCell<FakeState>>;

pub struct FakeOutput {
    state: FakeHandle,
    rejected: Rc<RefCell<HashSet<String>>>,
}

impl AudioOutput for FakeOutput {
    fn load(&mut self, source: &str) -> Result<()> {
        let mut state = self.state.borrow_mut();
        state.source = Some(source.to_string());
        state.playing = false;
        state.ended = false;
        state.position = Duration::ZERO;
        state.duration = Some(FAKE_DURATION);
        Ok(())
    }

    fn play(&mut self) -> Result<()> {
        let mut state = self.state.borrow_mut();
        let source = state
            .source
            .clone()
            .ok_or_else(|| anyhow!("nothing loaded"))?;

        if self.rejected.borrow().contains(&source) {
            bail!("unsupported format: {source}");
        }

        if state.ended {
            state.ended = false;
            state.position = Duration::ZERO;
        }
        state.playing = true;
        state.plays += 1;
        Ok(())
    }

    fn pause(&mut self) {
        self.state.borrow_mut().playing = false;
    }

    fn seek(&mut self, pos: Duration) -> Result<()> {
        self.state.borrow_mut().position = pos;
        Ok(())
    }

    fn set_volume(&mut self, volume: f32) {
        self.state.borrow_mut().volume = volume;
    }

    fn position(&self) -> Duration {
        self.state.borrow().position
    }

    fn duration(&self) -> Option<Duration> {
        self.state.borrow().duration
    }

    fn is_playing(&self) -> bool {
        self.state.borrow().playing
    }

    fn track_ended(&self) -> bool {
        self.state.borrow().ended
    }
}

/// Hands out `FakeOutput`s and keeps a handle on each so tests can inspect
/// and poke them after they have been boxed away inside the arbiter.
#[derive(Clone, Default)]
pub struct FakeFactory {
    outputs: Rc<RefCell<Vec<FakeHandle>>>,
    rejected: Rc<RefCell<HashSet<String>>>,
}

impl FakeFactory {
    pub fn reject(&self, source: &str) {
        self.rejected.borrow_mut().insert(source.to_string());
    }

    pub fn output(&self, idx: usize) -> FakeHandle {
        Rc::clone(&self.outputs.borrow()[idx])
    }

    pub fn output_count(&self) -> usize {
        self.outputs.borrow().len()
    }

    pub fn playing_count(&self) -> usize {
        self.outputs
            .borrow()
            .iter()
            .filter(|o| o.borrow().playing)
            .count()
    }
}

impl OutputFactory for FakeFactory {
    fn create_output(&self) -> Result<Box<dyn AudioOutput>> {
        let state = Rc::new(RefCell::new(FakeState {
            volume: 1.0,
            ..Default::default()
        }));
        self.outputs.borrow_mut().push(Rc::clone(&state));

        Ok(Box::new(FakeOutput {
            state,
            rejected: Rc::clone(&self.rejected),
        }))
    }
}
