use thiserror::Error;

use crate::models::PrayerName;

/// A clock string that is not a valid 24-hour "HH:MM" value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    #[error("invalid clock time '{0}': expected HH:MM")]
    Clock(String),

    #[error("{prayer} time '{value}' is not a valid HH:MM clock time")]
    PrayerTime { prayer: PrayerName, value: String },

    #[error("minutes since midnight out of range: {0}")]
    MinutesOutOfRange(u32),
}

/// A reading position that cannot exist in the mushaf.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PositionError {
    #[error("surah index {0} is out of range 1..=114")]
    SurahOutOfRange(u32),

    #[error("juz index {0} is out of range 1..=30")]
    JuzOutOfRange(u32),

    #[error("ayah numbers start at 1")]
    ZeroAyah,

    #[error("ayah number {0} is out of range")]
    AyahOutOfRange(u32),

    #[error("stored reading position has no surah index")]
    MissingSurah,

    #[error("juz reading position has no juz index")]
    MissingJuz,

    #[error("unknown reading position kind '{0}'")]
    UnknownKind(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KhatamError {
    #[error("target days must be greater than 0")]
    ZeroTargetDays,

    #[error("pages read must be greater than 0")]
    ZeroPages,

    #[error("cannot log {0} pages at once, the mushaf has 604")]
    TooManyPages(u32),

    #[error("plan is {0}, not active")]
    NotActive(&'static str),

    #[error("a khatam plan is already active")]
    AlreadyActive,
}
