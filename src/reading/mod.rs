pub mod advance;
pub mod tracker;

pub use advance::is_more_advanced;
pub use tracker::ReadingTracker;
