pub mod fitness;
pub mod geo;
