mod route_guards;

pub use route_guards::{protect_route, protect_sweep_route};
