use log::debug;

use crate::error::FormatError;
use crate::models::prayer::MINUTES_PER_DAY;
use crate::models::{ClockMinutes, PrayerName, PrayerTimes};
use crate::utils::format::format_countdown;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrayerSlot {
    pub name: PrayerName,
    pub time: ClockMinutes,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpcomingPrayer {
    pub name: PrayerName,
    pub time: ClockMinutes,
    pub minutes_until: u32,
    /// Next prayer is tomorrow's Fajr.
    pub tomorrow: bool,
}

impl UpcomingPrayer {
    pub fn countdown(&self) -> String {
        format_countdown(self.minutes_until)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrayerWindow {
    pub current: PrayerSlot,
    pub next: UpcomingPrayer,
}

/// Work out which prayer is current and which is next at `now`.
///
/// A prayer whose time equals `now` exactly counts as current: only entries
/// strictly after `now` are candidates for next. When every entry is at or
/// before `now`, next is tomorrow's Fajr, assumed to fall at today's Fajr
/// clock time.
pub fn compute_window(times: &PrayerTimes, now: ClockMinutes) -> Result<PrayerWindow, FormatError> {
    let minutes = times.to_minutes()?;
    let now_m = now.get() as i64;

    let mut next_idx: Option<usize> = None;
    let mut min_diff = i64::MAX;
    for (i, t) in minutes.iter().enumerate() {
        let diff = t.get() as i64 - now_m;
        if diff > 0 && diff < min_diff {
            min_diff = diff;
            next_idx = Some(i);
        }
    }

    let all = PrayerName::ALL;
    let window = match next_idx {
        Some(i) => {
            let cur = (i + all.len() - 1) % all.len();
            PrayerWindow {
                current: PrayerSlot {
                    name: all[cur],
                    time: minutes[cur],
                },
                next: UpcomingPrayer {
                    name: all[i],
                    time: minutes[i],
                    minutes_until: min_diff as u32,
                    tomorrow: false,
                },
            }
        }
        None => {
            let fajr = minutes[PrayerName::Fajr.index()];
            let isha = minutes[PrayerName::Isha.index()];
            PrayerWindow {
                current: PrayerSlot {
                    name: PrayerName::Isha,
                    time: isha,
                },
                next: UpcomingPrayer {
                    name: PrayerName::Fajr,
                    time: fajr,
                    minutes_until: (MINUTES_PER_DAY - now.get()) + fajr.get(),
                    tomorrow: true,
                },
            }
        }
    };

    debug!(
        "prayer window at {}: current={} next={} in {}m",
        now, window.current.name, window.next.name, window.next.minutes_until
    );
    Ok(window)
}
