use crate::{
    app_core::Overture,
    domain::{Direction, RouteId},
    transition::{Clock, NavigationOutcome},
};

impl<C: Clock> Overture<C> {
    pub(crate) fn go_to_page(&mut self, idx: usize) {
        if let Some(route) = self.transitions.routes().get(idx).map(|r| r.id.clone()) {
            self.navigate(&route);
        }
    }

    /// Next or previous page in table order. No wrap at either end.
    pub(crate) fn step_page(&mut self, dir: Direction) {
        let target = self
            .transitions
            .routes()
            .neighbour(self.transitions.current_route(), dir)
            .map(|r| r.id.clone());

        if let Some(route) = target {
            self.navigate(&route);
        }
    }

    pub fn navigate(&mut self, route: &RouteId) -> NavigationOutcome {
        let outcome = self.transitions.request(route);
        if outcome.is_accepted() {
            self.ui.set_frame(self.transitions.frame());
        }
        outcome
    }
}
