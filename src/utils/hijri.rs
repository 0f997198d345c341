use anyhow::Result;
use chrono::{Datelike, Duration, NaiveDate};
use hijri_date::HijriDate;

use crate::config::settings::AppLanguage;

/// Islamic month names (index 0 = Muharram = month 1)
const MONTHS_EN: &[&str] = &[
    "Muharram",
    "Safar",
    "Rabi' al-Awwal",
    "Rabi' al-Thani",
    "Jumada al-Awwal",
    "Jumada al-Thani",
    "Rajab",
    "Sha'ban",
    "Ramadan",
    "Shawwal",
    "Dhu al-Qi'dah",
    "Dhu al-Hijjah",
];

const MONTHS_ID: &[&str] = &[
    "Muharram",
    "Safar",
    "Rabiul Awal",
    "Rabiul Akhir",
    "Jumadil Awal",
    "Jumadil Akhir",
    "Rajab",
    "Sya'ban",
    "Ramadhan",
    "Syawal",
    "Dzulqa'dah",
    "Dzulhijjah",
];

pub fn month_name(month: usize, lang: AppLanguage) -> &'static str {
    let table = match lang {
        AppLanguage::En => MONTHS_EN,
        AppLanguage::Id => MONTHS_ID,
    };
    if (1..=12).contains(&month) {
        table[month - 1]
    } else {
        "Unknown"
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HijriInfo {
    pub day: usize,
    pub month: usize,
    pub year: usize,
    pub month_name: &'static str,
}

impl HijriInfo {
    pub fn formatted(&self) -> String {
        format!("{} {} {} AH", self.day, self.month_name, self.year)
    }
}

/// Hijri date for a Gregorian date, shifted by `offset_days` for local moon
/// sighting (e.g. -1 where the month starts a day after Saudi Arabia).
pub fn to_hijri(date: NaiveDate, offset_days: i32, lang: AppLanguage) -> Result<HijriInfo> {
    let adjusted = date + Duration::days(offset_days as i64);
    let hd = HijriDate::from_gr(
        adjusted.year() as usize,
        adjusted.month() as usize,
        adjusted.day() as usize,
    )
    .map_err(|e| anyhow::anyhow!("Hijri conversion error: {}", e))?;

    let month = hd.month();
    Ok(HijriInfo {
        day: hd.day(),
        month,
        year: hd.year(),
        month_name: month_name(month, lang),
    })
}

/// Every day of a Gregorian month, each paired with its Hijri date.
pub fn month_calendar(
    year: i32,
    month: u32,
    offset_days: i32,
    lang: AppLanguage,
) -> Result<Vec<(NaiveDate, HijriInfo)>> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| anyhow::anyhow!("Invalid month {}/{}", month, year))?;
    first
        .iter_days()
        .take_while(|d| d.month() == month)
        .map(|d| to_hijri(d, offset_days, lang).map(|info| (d, info)))
        .collect()
}

pub fn today_hijri_string(offset_days: i32, lang: AppLanguage) -> String {
    let today = chrono::Local::now().date_naive();
    match to_hijri(today, offset_days, lang) {
        Ok(info) => info.formatted(),
        Err(e) => {
            log::warn!("hijri conversion failed, showing unadjusted date: {}", e);
            let hd = HijriDate::today();
            format!("{} {} {} AH", hd.day(), month_name(hd.month(), lang), hd.year())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_names_by_language() {
        assert_eq!(month_name(9, AppLanguage::En), "Ramadan");
        assert_eq!(month_name(9, AppLanguage::Id), "Ramadhan");
        assert_eq!(month_name(13, AppLanguage::En), "Unknown");
    }

    #[test]
    fn march_2024_spans_shaban_into_ramadan() {
        let days = month_calendar(2024, 3, 0, AppLanguage::En).unwrap();
        assert_eq!(days.len(), 31);
        assert_eq!(days[0].0, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        assert_eq!((days[0].1.day, days[0].1.month), (20, 8));
        assert_eq!(days[30].1.month, 9);

        let starts: Vec<NaiveDate> = days
            .iter()
            .filter(|(_, h)| h.day == 1)
            .map(|(d, _)| *d)
            .collect();
        assert_eq!(starts, vec![NaiveDate::from_ymd_opt(2024, 3, 11).unwrap()]);
        assert_eq!(days[10].1.month_name, "Ramadan");
    }

    #[test]
    fn month_calendar_offset_and_lengths() {
        let shifted = month_calendar(2024, 3, 1, AppLanguage::Id).unwrap();
        let start = shifted.iter().find(|(_, h)| h.day == 1).unwrap();
        assert_eq!(start.0, NaiveDate::from_ymd_opt(2024, 3, 10).unwrap());
        assert_eq!(start.1.month_name, "Ramadhan");

        assert_eq!(month_calendar(2024, 2, 0, AppLanguage::En).unwrap().len(), 29);
        assert_eq!(month_calendar(2023, 2, 0, AppLanguage::En).unwrap().len(), 28);
        assert!(month_calendar(2024, 13, 0, AppLanguage::En).is_err());
    }

    #[test]
    fn offset_shifts_day() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 20).unwrap();
        let base = to_hijri(date, 0, AppLanguage::En).unwrap();
        let next = to_hijri(date, 1, AppLanguage::En).unwrap();
        assert_eq!(base.year, 1445);
        assert_eq!(base.month, 9);
        assert_ne!(base, next);
    }
}
