pub mod cache;
pub mod error;
pub mod geocode;
pub mod map;
pub mod nearby;
