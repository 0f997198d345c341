pub mod khatam;
pub mod prayer;
pub mod reading;

pub use khatam::{DailyProgress, KhatamPlan, KhatamStatus, MUSHAF_PAGES};
pub use prayer::{ClockMinutes, PrayerName, PrayerTimes};
pub use reading::{AyahNumber, Bookmark, JuzIndex, ReadingLocation, ReadingPosition, SurahIndex};
