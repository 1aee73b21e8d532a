use super::{
    Clock, IgnoreReason, NavigationOutcome, NavigationRequest, PhaseScheduler, TimerKind,
    TransitionEvent, TransitionFrame, TransitionPhase, TransitionState, TransitionTimings,
    ViewRenderer, ViewSwap,
};
use crate::domain::{RouteId, RouteTable};
use std::time::Duration;
use tracing::{debug, info, trace, warn};

/// Sequences exit and entry animations around a navigation.
///
/// `Idle -> Exiting -> Entering -> Idle`. Both timers are armed when a request
/// is accepted: the exit timer gates the call to [`ViewRenderer::render_view`],
/// the completion timer returns to `Idle` no matter what the renderer did.
pub struct TransitionCoordinator<C: Clock> {
    clock: C,
    routes: RouteTable,
    timings: TransitionTimings,
    current: RouteId,
    state: TransitionState,
    scheduler: PhaseScheduler,
    phase_started: Duration,
}

impl<C: Clock> TransitionCoordinator<C> {
    pub fn new(clock: C, routes: RouteTable, timings: TransitionTimings, start: RouteId) -> Self {
        TransitionCoordinator {
            clock,
            routes,
            timings,
            current: start,
            state: TransitionState::default(),
            scheduler: PhaseScheduler::new(),
            phase_started: Duration::ZERO,
        }
    }

    pub fn request(&mut self, target: &RouteId) -> NavigationOutcome {
        if self.state.phase != TransitionPhase::Idle {
            trace!(%target, phase = %self.state.phase, "navigation dropped: transition in flight");
            return NavigationOutcome::Ignored(IgnoreReason::InFlight);
        }

        if *target == self.current {
            return NavigationOutcome::Ignored(IgnoreReason::SameRoute);
        }

        if !self.routes.contains(target) {
            warn!(%target, "navigation dropped: route is not in the route table");
            return NavigationOutcome::Ignored(IgnoreReason::UnknownRoute);
        }

        let now = self.clock.now();
        let direction = self.routes.direction(&self.current, target);

        self.state.generation += 1;
        let generation = self.state.generation;

        self.state.phase = TransitionPhase::Exiting;
        self.state.direction = direction;
        self.state.pending_route = Some(target.clone());
        self.state.snapshot = Some(self.current.clone());
        self.phase_started = now;

        self.scheduler
            .schedule(TimerKind::ExitElapsed, now + self.timings.exit, generation);
        self.scheduler
            .schedule(TimerKind::Complete, now + self.timings.total(), generation);

        info!(origin = %self.current, %target, ?direction, generation, "transition started");

        NavigationOutcome::Accepted(NavigationRequest {
            target: target.clone(),
            origin: self.current.clone(),
            direction,
        })
    }

    /// Fires every timer that is due. Call on each tick of the event loop.
    pub fn poll<R: ViewRenderer>(&mut self, view: &mut R) -> Vec<TransitionEvent> {
        let now = self.clock.now();
        let mut events = Vec::new();

        for timer in self.scheduler.take_due(now) {
            if timer.generation != self.state.generation {
                trace!(?timer, "stale timer ignored");
                continue;
            }

            match timer.kind {
                TimerKind::ExitElapsed => {
                    if let Some(event) = self.finish_exit(timer.due, view) {
                        events.push(event);
                    }
                }
                TimerKind::Complete => {
                    if let Some(event) = self.complete() {
                        events.push(event);
                    }
                }
            }
        }

        events
    }

    fn finish_exit<R: ViewRenderer>(
        &mut self,
        due: Duration,
        view: &mut R,
    ) -> Option<TransitionEvent> {
        if self.state.phase != TransitionPhase::Exiting {
            return None;
        }
        let target = self.state.pending_route.clone()?;

        match view.render_view(&target) {
            ViewSwap::Mounted => {
                self.current = target.clone();
                self.state.phase = TransitionPhase::Entering;
                // Anchor to the timer, not the poll, so the entry window
                // always ends together with the completion timer.
                self.phase_started = due;
                debug!(route = %target, "entering");
                Some(TransitionEvent::Entering(target))
            }
            ViewSwap::Cancelled => {
                debug!(route = %target, "view swap cancelled, waiting for backstop");
                Some(TransitionEvent::SwapCancelled(target))
            }
        }
    }

    fn complete(&mut self) -> Option<TransitionEvent> {
        if self.state.phase == TransitionPhase::Idle {
            return None;
        }

        let mounted = self.state.phase == TransitionPhase::Entering;
        self.reset();
        debug!(route = %self.current, mounted, "transition complete");

        Some(TransitionEvent::Completed {
            route: self.current.clone(),
            mounted,
        })
    }

    /// Drops an in-flight transition on the spot. Its timers become stale.
    pub fn abort(&mut self) {
        if self.state.phase == TransitionPhase::Idle {
            return;
        }
        warn!(generation = self.state.generation, "transition aborted");
        self.state.generation += 1;
        self.reset();
    }

    fn reset(&mut self) {
        self.state.phase = TransitionPhase::Idle;
        self.state.pending_route = None;
        self.state.snapshot = None;
    }

    pub fn frame(&self) -> TransitionFrame {
        let window = match self.state.phase {
            TransitionPhase::Idle => Duration::ZERO,
            TransitionPhase::Exiting => self.timings.exit,
            TransitionPhase::Entering => self.timings.enter,
        };

        let progress = match (self.state.phase, window.is_zero()) {
            (TransitionPhase::Idle, _) | (_, true) => 1.0,
            _ => {
                let elapsed = self.clock.now().saturating_sub(self.phase_started);
                (elapsed.as_secs_f32() / window.as_secs_f32()).clamp(0.0, 1.0)
            }
        };

        TransitionFrame {
            phase: self.state.phase,
            direction: self.state.direction,
            progress,
        }
    }

    /// Route whose content should be on screen right now.
    pub fn visible_route(&self) -> &RouteId {
        match (self.state.phase, &self.state.snapshot) {
            (TransitionPhase::Exiting, Some(snapshot)) => snapshot,
            _ => &self.current,
        }
    }

    pub fn phase(&self) -> TransitionPhase {
        self.state.phase
    }

    pub fn is_idle(&self) -> bool {
        self.state.phase == TransitionPhase::Idle
    }

    pub fn state(&self) -> &TransitionState {
        &self.state
    }

    pub fn current_route(&self) -> &RouteId {
        &self.current
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    pub fn timings(&self) -> TransitionTimings {
        self.timings
    }

    /// The clock every timed piece of the app reads from.
    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn next_deadline(&self) -> Option<Duration> {
        self.scheduler.next_due()
    }
}
