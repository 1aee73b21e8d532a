use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RouteId(String);

impl RouteId {
    pub fn new(route: impl Into<String>) -> Self {
        RouteId(route.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RouteId {
    fn from(s: &str) -> Self {
        RouteId::new(s)
    }
}

impl fmt::Display for RouteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

#[derive(Clone, Debug)]
pub struct Route {
    pub id: RouteId,
    pub title: String,
}

/// Ordered list of navigable views. Position in the table decides which way
/// the page slides during a transition.
#[derive(Clone, Debug, Default)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    pub fn new(routes: Vec<Route>) -> Self {
        RouteTable { routes }
    }

    pub fn from_ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let routes = ids
            .into_iter()
            .map(|id| {
                let id = RouteId::new(id);
                Route {
                    title: id.to_string(),
                    id,
                }
            })
            .collect();

        RouteTable { routes }
    }

    pub fn index_of(&self, route: &RouteId) -> Option<usize> {
        self.routes.iter().position(|r| &r.id == route)
    }

    pub fn contains(&self, route: &RouteId) -> bool {
        self.index_of(route).is_some()
    }

    /// `Forward` when the target sits later in the table than the origin.
    /// An origin missing from the table orders before every known route.
    pub fn direction(&self, origin: &RouteId, target: &RouteId) -> Direction {
        match self.index_of(target) > self.index_of(origin) {
            true => Direction::Forward,
            false => Direction::Backward,
        }
    }

    pub fn get(&self, idx: usize) -> Option<&Route> {
        self.routes.get(idx)
    }

    pub fn first(&self) -> Option<&Route> {
        self.routes.first()
    }

    pub fn title_of(&self, route: &RouteId) -> Option<&str> {
        self.index_of(route)
            .and_then(|idx| self.routes.get(idx))
            .map(|r| r.title.as_str())
    }

    /// Neighbouring route, clamped at both ends of the table.
    pub fn neighbour(&self, route: &RouteId, dir: Direction) -> Option<&Route> {
        let idx = self.index_of(route)?;
        let next = match dir {
            Direction::Forward => idx + 1,
            Direction::Backward => idx.checked_sub(1)?,
        };
        self.routes.get(next)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Route> {
        self.routes.iter()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn abcd() -> RouteTable {
        RouteTable::from_ids(["A", "B", "C", "D"])
    }

    #[test]
    fn later_target_is_forward() {
        let table = abcd();
        assert_eq!(
            table.direction(&"B".into(), &"D".into()),
            Direction::Forward
        );
    }

    #[test]
    fn earlier_target_is_backward() {
        let table = abcd();
        assert_eq!(
            table.direction(&"D".into(), &"A".into()),
            Direction::Backward
        );
    }

    #[test]
    fn unknown_origin_orders_first() {
        let table = abcd();
        assert_eq!(
            table.direction(&"/admin".into(), &"A".into()),
            Direction::Forward
        );
    }

    #[test]
    fn neighbours_clamp_at_edges() {
        let table = abcd();
        assert!(table.neighbour(&"A".into(), Direction::Backward).is_none());
        assert!(table.neighbour(&"D".into(), Direction::Forward).is_none());
        assert_eq!(
            table
                .neighbour(&"B".into(), Direction::Forward)
                .map(|r| r.id.as_str()),
            Some("C")
        );
    }
}
