pub mod pattern;
pub mod route;
pub mod router;

pub use pattern::PathPattern;
pub use route::{Route, RouteMatch};
pub use router::Router;
