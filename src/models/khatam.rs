use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::KhatamError;

/// Pages in the standard Madani mushaf.
pub const MUSHAF_PAGES: u32 = 604;

const SECS_PER_DAY: i64 = 60 * 60 * 24;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KhatamStatus {
    Active,
    Completed,
    Abandoned,
}

impl KhatamStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            KhatamStatus::Active => "active",
            KhatamStatus::Completed => "completed",
            KhatamStatus::Abandoned => "abandoned",
        }
    }
}

impl FromStr for KhatamStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(KhatamStatus::Active),
            "completed" => Ok(KhatamStatus::Completed),
            "abandoned" => Ok(KhatamStatus::Abandoned),
            _ => Err(anyhow::anyhow!("Unknown khatam status: {}", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyProgress {
    pub date: NaiveDate,
    pub pages: u32,
}

/// A plan to read the whole mushaf within `target_days`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KhatamPlan {
    pub id: Option<i64>,
    pub started_at: DateTime<Utc>,
    pub target_days: u32,
    pub pages_read: u32,
    pub status: KhatamStatus,
    pub history: Vec<DailyProgress>,
    pub ended_at: Option<DateTime<Utc>>,
}

impl KhatamPlan {
    pub fn new(target_days: u32, started_at: DateTime<Utc>) -> Result<Self, KhatamError> {
        if target_days == 0 {
            return Err(KhatamError::ZeroTargetDays);
        }
        Ok(Self {
            id: None,
            started_at,
            target_days,
            pages_read: 0,
            status: KhatamStatus::Active,
            history: Vec::new(),
            ended_at: None,
        })
    }

    pub fn daily_target_pages(&self) -> u32 {
        daily_pages_for(self.target_days)
    }

    /// Record pages read on `date`. Returns true once the whole mushaf is covered.
    pub fn log_pages(&mut self, date: NaiveDate, pages: u32) -> Result<bool, KhatamError> {
        self.ensure_active()?;
        if pages == 0 {
            return Err(KhatamError::ZeroPages);
        }
        if pages > MUSHAF_PAGES {
            return Err(KhatamError::TooManyPages(pages));
        }
        match self.history.iter_mut().find(|d| d.date == date) {
            Some(day) => day.pages = day.pages.saturating_add(pages),
            None => self.history.push(DailyProgress { date, pages }),
        }
        self.pages_read = self.pages_read.saturating_add(pages);
        Ok(self.is_finished())
    }

    pub fn is_finished(&self) -> bool {
        self.pages_read >= MUSHAF_PAGES
    }

    pub fn progress_ratio(&self) -> f64 {
        (self.pages_read as f64 / MUSHAF_PAGES as f64).min(1.0)
    }

    /// Rough juz estimate at 20 pages per juz.
    pub fn current_juz(&self) -> u32 {
        (self.pages_read / 20 + 1).min(30)
    }

    pub fn pages_remaining(&self) -> u32 {
        MUSHAF_PAGES.saturating_sub(self.pages_read)
    }

    /// 1-based day of the plan; the first day counts as day 1.
    pub fn day_number(&self, now: DateTime<Utc>) -> i64 {
        ceil_days(now - self.started_at).max(1)
    }

    pub fn duration_days(&self) -> i64 {
        match self.ended_at {
            Some(end) => ceil_days(end - self.started_at),
            None => self.target_days as i64,
        }
    }

    pub fn complete(&mut self, now: DateTime<Utc>) -> Result<(), KhatamError> {
        self.ensure_active()?;
        self.status = KhatamStatus::Completed;
        self.pages_read = MUSHAF_PAGES;
        self.ended_at = Some(now);
        Ok(())
    }

    pub fn abandon(&mut self, now: DateTime<Utc>) -> Result<(), KhatamError> {
        self.ensure_active()?;
        self.status = KhatamStatus::Abandoned;
        self.ended_at = Some(now);
        Ok(())
    }

    fn ensure_active(&self) -> Result<(), KhatamError> {
        if self.status != KhatamStatus::Active {
            return Err(KhatamError::NotActive(self.status.as_str()));
        }
        Ok(())
    }
}

pub fn daily_pages_for(target_days: u32) -> u32 {
    if target_days == 0 {
        return MUSHAF_PAGES;
    }
    MUSHAF_PAGES.div_ceil(target_days)
}

fn ceil_days(d: chrono::Duration) -> i64 {
    let secs = d.num_seconds();
    if secs <= 0 {
        return 0;
    }
    (secs + SECS_PER_DAY - 1) / SECS_PER_DAY
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn start() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap()
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    #[test]
    fn zero_days_rejected() {
        assert_eq!(KhatamPlan::new(0, start()), Err(KhatamError::ZeroTargetDays));
    }

    #[test]
    fn daily_target_rounds_up() {
        assert_eq!(daily_pages_for(30), 21);
        assert_eq!(daily_pages_for(604), 1);
        assert_eq!(daily_pages_for(7), 87);
        assert_eq!(KhatamPlan::new(60, start()).unwrap().daily_target_pages(), 11);
    }

    #[test]
    fn logging_same_day_accumulates() {
        let mut plan = KhatamPlan::new(30, start()).unwrap();
        assert!(!plan.log_pages(day(1), 10).unwrap());
        assert!(!plan.log_pages(day(1), 5).unwrap());
        assert!(!plan.log_pages(day(2), 20).unwrap());
        assert_eq!(plan.pages_read, 35);
        assert_eq!(
            plan.history,
            vec![
                DailyProgress { date: day(1), pages: 15 },
                DailyProgress { date: day(2), pages: 20 },
            ]
        );
        assert_eq!(plan.current_juz(), 2);
    }

    #[test]
    fn zero_pages_rejected() {
        let mut plan = KhatamPlan::new(30, start()).unwrap();
        assert_eq!(plan.log_pages(day(1), 0), Err(KhatamError::ZeroPages));
        assert!(plan.history.is_empty());
    }

    #[test]
    fn oversized_log_rejected_without_touching_history() {
        let mut plan = KhatamPlan::new(30, start()).unwrap();
        assert_eq!(
            plan.log_pages(day(1), u32::MAX),
            Err(KhatamError::TooManyPages(u32::MAX))
        );
        assert_eq!(plan.log_pages(day(1), 605), Err(KhatamError::TooManyPages(605)));
        assert!(plan.history.is_empty());
        assert_eq!(plan.pages_read, 0);

        plan.log_pages(day(1), MUSHAF_PAGES).unwrap();
        plan.log_pages(day(1), MUSHAF_PAGES).unwrap();
        assert_eq!(plan.history[0].pages, 2 * MUSHAF_PAGES);
    }

    #[test]
    fn finishing_caps_progress() {
        let mut plan = KhatamPlan::new(1, start()).unwrap();
        assert!(!plan.log_pages(day(1), 600).unwrap());
        assert!(plan.log_pages(day(1), 100).unwrap());
        assert_eq!(plan.history, vec![DailyProgress { date: day(1), pages: 700 }]);
        assert_eq!(plan.progress_ratio(), 1.0);
        assert_eq!(plan.pages_remaining(), 0);
        assert_eq!(plan.current_juz(), 30);
    }

    #[test]
    fn day_number_starts_at_one() {
        let plan = KhatamPlan::new(30, start()).unwrap();
        assert_eq!(plan.day_number(start()), 1);
        assert_eq!(plan.day_number(start() + Duration::hours(3)), 1);
        assert_eq!(plan.day_number(start() + Duration::hours(25)), 2);
    }

    #[test]
    fn complete_and_duration() {
        let mut plan = KhatamPlan::new(30, start()).unwrap();
        assert_eq!(plan.duration_days(), 30);
        plan.complete(start() + Duration::days(12) + Duration::hours(1)).unwrap();
        assert_eq!(plan.status, KhatamStatus::Completed);
        assert_eq!(plan.pages_read, MUSHAF_PAGES);
        assert_eq!(plan.duration_days(), 13);
    }

    #[test]
    fn closed_plan_is_frozen() {
        let mut plan = KhatamPlan::new(30, start()).unwrap();
        plan.abandon(start()).unwrap();
        assert_eq!(
            plan.log_pages(day(1), 3),
            Err(KhatamError::NotActive("abandoned"))
        );
        assert_eq!(plan.complete(start()), Err(KhatamError::NotActive("abandoned")));
    }
}
