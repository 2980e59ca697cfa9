pub mod route;
pub mod route_solution;
