mod route;
mod track;

pub use route::{Direction, Route, RouteId, RouteTable};
pub use track::Track;
