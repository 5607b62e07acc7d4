pub mod geo;
pub mod station;
