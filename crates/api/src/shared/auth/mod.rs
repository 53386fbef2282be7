mod route_guards;

pub use route_guards::{protect_family_route, protect_user_route};
