pub mod header;
pub mod khatam;
pub mod next_prayer;
pub mod prayers;
pub mod reading;
pub mod statusbar;
