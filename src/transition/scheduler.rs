use std::time::Duration;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimerKind {
    /// Exit animation has had its full window; the view may be swapped.
    ExitElapsed,
    /// Whole transition window is over, whatever happened in between.
    Complete,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Timer {
    pub kind: TimerKind,
    pub due: Duration,
    pub generation: u64,
}

/// Pending one-shot timers. Nothing is ever cancelled here; a timer carries
/// the generation of the transition that armed it and the owner discards it
/// on fire if that transition is gone.
#[derive(Default)]
pub struct PhaseScheduler {
    pending: Vec<Timer>,
}

impl PhaseScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, kind: TimerKind, due: Duration, generation: u64) {
        self.pending.push(Timer {
            kind,
            due,
            generation,
        });
    }

    /// Removes and returns every timer due at `now`, earliest first.
    /// Ties keep arming order.
    pub fn take_due(&mut self, now: Duration) -> Vec<Timer> {
        let (mut due, pending): (Vec<Timer>, Vec<Timer>) =
            self.pending.drain(..).partition(|t| t.due <= now);

        self.pending = pending;
        due.sort_by_key(|t| t.due);
        due
    }

    pub fn next_due(&self) -> Option<Duration> {
        self.pending.iter().map(|t| t.due).min()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
