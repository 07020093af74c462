pub mod cost;
pub mod route;
