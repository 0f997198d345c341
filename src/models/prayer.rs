use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::FormatError;

pub const MINUTES_PER_DAY: u32 = 24 * 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrayerName {
    Fajr,
    Sunrise,
    Dhuhr,
    Asr,
    Maghrib,
    Isha,
}

impl PrayerName {
    /// Fixed daily order. Sunrise is listed although it is not a prayer.
    pub const ALL: [PrayerName; 6] = [
        PrayerName::Fajr,
        PrayerName::Sunrise,
        PrayerName::Dhuhr,
        PrayerName::Asr,
        PrayerName::Maghrib,
        PrayerName::Isha,
    ];

    pub fn index(&self) -> usize {
        match self {
            PrayerName::Fajr => 0,
            PrayerName::Sunrise => 1,
            PrayerName::Dhuhr => 2,
            PrayerName::Asr => 3,
            PrayerName::Maghrib => 4,
            PrayerName::Isha => 5,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PrayerName::Fajr => "fajr",
            PrayerName::Sunrise => "sunrise",
            PrayerName::Dhuhr => "dhuhr",
            PrayerName::Asr => "asr",
            PrayerName::Maghrib => "maghrib",
            PrayerName::Isha => "isha",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            PrayerName::Fajr => "Fajr",
            PrayerName::Sunrise => "Sunrise",
            PrayerName::Dhuhr => "Dhuhr",
            PrayerName::Asr => "Asr",
            PrayerName::Maghrib => "Maghrib",
            PrayerName::Isha => "Isha",
        }
    }
}

impl std::fmt::Display for PrayerName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for PrayerName {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fajr" | "subuh" => Ok(PrayerName::Fajr),
            "sunrise" | "terbit" => Ok(PrayerName::Sunrise),
            "dhuhr" | "zuhr" | "dzuhur" => Ok(PrayerName::Dhuhr),
            "asr" | "ashar" => Ok(PrayerName::Asr),
            "maghrib" => Ok(PrayerName::Maghrib),
            "isha" | "isya" => Ok(PrayerName::Isha),
            _ => Err(anyhow::anyhow!("Unknown prayer name: {}", s)),
        }
    }
}

/// Local civil time of day, as whole minutes since midnight (0..=1439).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClockMinutes(u16);

impl ClockMinutes {
    pub fn new(minutes: u32) -> Result<Self, FormatError> {
        if minutes >= MINUTES_PER_DAY {
            return Err(FormatError::MinutesOutOfRange(minutes));
        }
        Ok(Self(minutes as u16))
    }

    pub fn from_hm(hours: u32, minutes: u32) -> Result<Self, FormatError> {
        if hours > 23 || minutes > 59 {
            return Err(FormatError::Clock(format!("{}:{}", hours, minutes)));
        }
        Self::new(hours * 60 + minutes)
    }

    /// Parse a 24-hour "HH:MM" string. Seconds, suffixes and 12-hour forms are rejected.
    pub fn parse(s: &str) -> Result<Self, FormatError> {
        let bad = || FormatError::Clock(s.to_string());
        let (h, m) = s.split_once(':').ok_or_else(bad)?;
        if h.is_empty() || h.len() > 2 || m.len() != 2 {
            return Err(bad());
        }
        if !h.bytes().chain(m.bytes()).all(|b| b.is_ascii_digit()) {
            return Err(bad());
        }
        let hours: u32 = h.parse().map_err(|_| bad())?;
        let minutes: u32 = m.parse().map_err(|_| bad())?;
        Self::from_hm(hours, minutes).map_err(|_| bad())
    }

    pub fn from_time(t: NaiveTime) -> Self {
        Self((t.hour() * 60 + t.minute()) as u16)
    }

    pub fn get(&self) -> u32 {
        self.0 as u32
    }

    pub fn hours(&self) -> u32 {
        self.get() / 60
    }

    pub fn minutes(&self) -> u32 {
        self.get() % 60
    }
}

impl std::fmt::Display for ClockMinutes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:{:02}", self.hours(), self.minutes())
    }
}

impl FromStr for ClockMinutes {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// One day's prayer times as "HH:MM" strings, in the shape the timings
/// services return them. Extra keys (Imsak, Midnight, ...) are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PrayerTimes {
    pub fajr: String,
    pub sunrise: String,
    pub dhuhr: String,
    pub asr: String,
    pub maghrib: String,
    pub isha: String,
}

impl PrayerTimes {
    pub fn get(&self, name: PrayerName) -> &str {
        match name {
            PrayerName::Fajr => &self.fajr,
            PrayerName::Sunrise => &self.sunrise,
            PrayerName::Dhuhr => &self.dhuhr,
            PrayerName::Asr => &self.asr,
            PrayerName::Maghrib => &self.maghrib,
            PrayerName::Isha => &self.isha,
        }
    }

    pub fn entries(&self) -> [(PrayerName, &str); 6] {
        PrayerName::ALL.map(|name| (name, self.get(name)))
    }

    /// Minutes since midnight for one prayer; the error names the prayer.
    pub fn minutes_of(&self, name: PrayerName) -> Result<ClockMinutes, FormatError> {
        let value = self.get(name);
        ClockMinutes::parse(value).map_err(|_| FormatError::PrayerTime {
            prayer: name,
            value: value.to_string(),
        })
    }

    /// Parse all six entries in fixed order.
    pub fn to_minutes(&self) -> Result<[ClockMinutes; 6], FormatError> {
        let mut out = [ClockMinutes(0); 6];
        for name in PrayerName::ALL {
            out[name.index()] = self.minutes_of(name)?;
        }
        Ok(out)
    }

    /// Accepts either a bare timings object or an API envelope
    /// (`{"code":200,"data":{"timings":{...}}}`).
    pub fn from_json(s: &str) -> anyhow::Result<Self> {
        #[derive(Deserialize)]
        struct Data {
            timings: PrayerTimes,
        }
        #[derive(Deserialize)]
        struct Envelope {
            data: Data,
        }
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Payload {
            Wrapped(Envelope),
            Bare(PrayerTimes),
        }

        let payload: Payload = serde_json::from_str(s)
            .map_err(|e| anyhow::anyhow!("Parsing prayer timings JSON: {}", e))?;
        Ok(match payload {
            Payload::Wrapped(env) => env.data.timings,
            Payload::Bare(times) => times,
        })
    }
}
