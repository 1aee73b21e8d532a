mod clock;
mod coordinator;
mod motion;
mod scheduler;

pub use clock::{Clock, ManualClock, SystemClock};
pub use coordinator::TransitionCoordinator;
pub use motion::{ease_out_cubic, slide_offset};
pub use scheduler::{PhaseScheduler, Timer, TimerKind};

use crate::domain::{Direction, RouteId};
use std::time::Duration;

pub const EXIT_DURATION: Duration = Duration::from_millis(400);
pub const ENTER_DURATION: Duration = Duration::from_millis(400);

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TransitionPhase {
    #[default]
    Idle,
    Exiting,
    Entering,
}

impl std::fmt::Display for TransitionPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransitionPhase::Idle => write!(f, "idle"),
            TransitionPhase::Exiting => write!(f, "exiting"),
            TransitionPhase::Entering => write!(f, "entering"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NavigationRequest {
    pub target: RouteId,
    pub origin: RouteId,
    pub direction: Direction,
}

#[derive(Clone, Debug)]
pub struct TransitionState {
    pub phase: TransitionPhase,
    pub direction: Direction,
    pub pending_route: Option<RouteId>,
    /// View frozen at request time, drawn while it slides out.
    pub snapshot: Option<RouteId>,
    pub generation: u64,
}

impl Default for TransitionState {
    fn default() -> Self {
        TransitionState {
            phase: TransitionPhase::Idle,
            direction: Direction::Forward,
            pending_route: None,
            snapshot: None,
            generation: 0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TransitionTimings {
    pub exit: Duration,
    pub enter: Duration,
}

impl TransitionTimings {
    pub fn total(&self) -> Duration {
        self.exit + self.enter
    }
}

impl Default for TransitionTimings {
    fn default() -> Self {
        TransitionTimings {
            exit: EXIT_DURATION,
            enter: ENTER_DURATION,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewSwap {
    Mounted,
    /// The application declined to switch views (e.g. the router dropped
    /// the navigation). The coordinator still returns to idle on schedule.
    Cancelled,
}

/// Capability supplied by the application: actually put `route` on screen.
pub trait ViewRenderer {
    fn render_view(&mut self, route: &RouteId) -> ViewSwap;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IgnoreReason {
    InFlight,
    SameRoute,
    UnknownRoute,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NavigationOutcome {
    Accepted(NavigationRequest),
    Ignored(IgnoreReason),
}

impl NavigationOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, NavigationOutcome::Accepted(_))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TransitionEvent {
    Entering(RouteId),
    SwapCancelled(RouteId),
    Completed { route: RouteId, mounted: bool },
}

/// Where the current phase is, for drawing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransitionFrame {
    pub phase: TransitionPhase,
    pub direction: Direction,
    pub progress: f32,
}
