pub mod error;
pub mod fetcher;
pub mod format;
pub mod record;
