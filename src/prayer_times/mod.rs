pub mod calculator;
pub mod qibla;
pub mod window;

pub use calculator::PrayerCalculator;
pub use qibla::QiblaBearing;
pub use window::{compute_window, PrayerWindow};
