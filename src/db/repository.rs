use anyhow::{anyhow, Result};
use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::str::FromStr;

use crate::models::{
    AyahNumber, Bookmark, DailyProgress, KhatamPlan, KhatamStatus, ReadingLocation,
    ReadingPosition, SurahIndex,
};

fn parse_timestamp(s: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| anyhow!("Bad timestamp '{}': {}", s, e))
}

fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| anyhow!("Bad date '{}': {}", s, e))
}

// ─── Last read ───────────────────────────────────────────────────────────────

pub struct LastReadRepo;

impl LastReadRepo {
    /// Load the single last-read row. A row that cannot form a valid position
    /// is an error, not an empty result.
    pub fn get(conn: &Connection) -> Result<Option<ReadingPosition>> {
        let row = conn
            .query_row(
                "SELECT kind, juz, surah, ayah, label, updated_at FROM last_read WHERE id = 1",
                [],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, Option<u32>>(1)?,
                        row.get::<_, Option<u32>>(2)?,
                        row.get::<_, u32>(3)?,
                        row.get::<_, String>(4)?,
                        row.get::<_, String>(5)?,
                    ))
                },
            )
            .optional()?;

        match row {
            None => Ok(None),
            Some((kind, juz, surah, ayah, label, updated_at)) => {
                let location = ReadingLocation::from_parts(&kind, juz, surah, ayah)?;
                Ok(Some(ReadingPosition {
                    location,
                    label,
                    updated_at: parse_timestamp(&updated_at)?,
                }))
            }
        }
    }

    pub fn put(conn: &Connection, pos: &ReadingPosition) -> Result<()> {
        conn.execute(
            "INSERT INTO last_read (id, kind, juz, surah, ayah, label, updated_at)
             VALUES (1, ?1, ?2, ?3, ?4, ?5, ?6)
             ON CONFLICT(id) DO UPDATE SET
                kind = ?1, juz = ?2, surah = ?3, ayah = ?4, label = ?5, updated_at = ?6",
            params![
                pos.location.kind(),
                pos.location.juz().map(|j| j.get()),
                pos.location.surah().get(),
                pos.location.ayah().get(),
                pos.label,
                pos.updated_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }
}

// ─── Bookmarks ───────────────────────────────────────────────────────────────

pub struct BookmarkRepo;

impl BookmarkRepo {
    /// Returns false if the ayah was already bookmarked.
    pub fn add(conn: &Connection, bookmark: &Bookmark) -> Result<bool> {
        let n = conn.execute(
            "INSERT OR IGNORE INTO bookmarks (id, surah, ayah, label, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                bookmark.id,
                bookmark.surah.get(),
                bookmark.ayah.get(),
                bookmark.label,
                bookmark.created_at.to_rfc3339(),
            ],
        )?;
        Ok(n > 0)
    }

    pub fn remove(conn: &Connection, id: &str) -> Result<bool> {
        let n = conn.execute("DELETE FROM bookmarks WHERE id = ?1", params![id])?;
        Ok(n > 0)
    }

    pub fn is_bookmarked(conn: &Connection, surah: SurahIndex, ayah: AyahNumber) -> Result<bool> {
        conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM bookmarks WHERE surah = ?1 AND ayah = ?2)",
            params![surah.get(), ayah.get()],
            |row| row.get(0),
        )
        .map_err(anyhow::Error::from)
    }

    pub fn list(conn: &Connection) -> Result<Vec<Bookmark>> {
        let mut stmt = conn.prepare(
            "SELECT id, surah, ayah, label, created_at FROM bookmarks
             ORDER BY created_at, rowid",
        )?;

        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, u32>(1)?,
                row.get::<_, u32>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
            ))
        })?;

        let mut result = Vec::new();
        for r in rows {
            let (id, surah, ayah, label, created_at) = r?;
            result.push(Bookmark {
                id,
                surah: SurahIndex::new(surah)?,
                ayah: AyahNumber::new(ayah)?,
                label,
                created_at: parse_timestamp(&created_at)?,
            });
        }
        Ok(result)
    }

    pub fn count(conn: &Connection) -> Result<i64> {
        conn.query_row("SELECT COUNT(*) FROM bookmarks", [], |row| row.get(0))
            .map_err(anyhow::Error::from)
    }
}

// ─── Khatam plans ────────────────────────────────────────────────────────────

pub struct KhatamRepo;

impl KhatamRepo {
    pub fn active(conn: &Connection) -> Result<Option<KhatamPlan>> {
        let id: Option<i64> = conn
            .query_row(
                "SELECT id FROM khatam_plans WHERE status = 'active' ORDER BY id DESC LIMIT 1",
                [],
                |row| row.get(0),
            )
            .optional()?;
        match id {
            None => Ok(None),
            Some(id) => Self::get(conn, id).map(Some),
        }
    }

    pub fn get(conn: &Connection, id: i64) -> Result<KhatamPlan> {
        let (started_at, target_days, pages_read, status, ended_at) = conn.query_row(
            "SELECT started_at, target_days, pages_read, status, ended_at
             FROM khatam_plans WHERE id = ?1",
            params![id],
            |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, u32>(1)?,
                    row.get::<_, u32>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, Option<String>>(4)?,
                ))
            },
        )?;

        Ok(KhatamPlan {
            id: Some(id),
            started_at: parse_timestamp(&started_at)?,
            target_days,
            pages_read,
            status: KhatamStatus::from_str(&status)?,
            history: Self::history(conn, id)?,
            ended_at: ended_at.as_deref().map(parse_timestamp).transpose()?,
        })
    }

    fn history(conn: &Connection, plan_id: i64) -> Result<Vec<DailyProgress>> {
        let mut stmt = conn.prepare(
            "SELECT date, pages FROM khatam_progress WHERE plan_id = ?1 ORDER BY date",
        )?;
        let rows = stmt.query_map(params![plan_id], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, u32>(1)?))
        })?;

        let mut result = Vec::new();
        for r in rows {
            let (date, pages) = r?;
            result.push(DailyProgress {
                date: parse_date(&date)?,
                pages,
            });
        }
        Ok(result)
    }

    /// Insert a new plan and return its id.
    pub fn create(conn: &Connection, plan: &KhatamPlan) -> Result<i64> {
        conn.execute(
            "INSERT INTO khatam_plans (started_at, target_days, pages_read, status, ended_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                plan.started_at.to_rfc3339(),
                plan.target_days,
                plan.pages_read,
                plan.status.as_str(),
                plan.ended_at.map(|t| t.to_rfc3339()),
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Write back pages, status, end time and the daily history of a stored plan.
    pub fn save(conn: &Connection, plan: &KhatamPlan) -> Result<()> {
        let id = plan.id.ok_or_else(|| anyhow!("Khatam plan has not been stored yet"))?;
        conn.execute(
            "UPDATE khatam_plans SET pages_read = ?1, status = ?2, ended_at = ?3 WHERE id = ?4",
            params![
                plan.pages_read,
                plan.status.as_str(),
                plan.ended_at.map(|t| t.to_rfc3339()),
                id,
            ],
        )?;
        for day in &plan.history {
            conn.execute(
                "INSERT INTO khatam_progress (plan_id, date, pages) VALUES (?1, ?2, ?3)
                 ON CONFLICT(plan_id, date) DO UPDATE SET pages = ?3",
                params![id, day.date.format("%Y-%m-%d").to_string(), day.pages],
            )?;
        }
        Ok(())
    }

    /// Completed plans, most recent first.
    pub fn completed(conn: &Connection) -> Result<Vec<KhatamPlan>> {
        let mut stmt = conn.prepare(
            "SELECT id FROM khatam_plans WHERE status = 'completed' ORDER BY ended_at DESC, id DESC",
        )?;
        let ids = stmt
            .query_map([], |row| row.get::<_, i64>(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        ids.into_iter().map(|id| Self::get(conn, id)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;
    use crate::error::PositionError;
    use crate::models::JuzIndex;
    use chrono::Duration;

    fn db() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        conn
    }

    fn ts(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(secs, 0).unwrap()
    }

    #[test]
    fn last_read_empty_then_overwritten() {
        let conn = db();
        assert!(LastReadRepo::get(&conn).unwrap().is_none());

        let first = ReadingPosition::surah(
            SurahIndex::new(2).unwrap(),
            AyahNumber::new(5).unwrap(),
            "Al-Baqarah",
            ts(1_700_000_000),
        );
        LastReadRepo::put(&conn, &first).unwrap();
        assert_eq!(LastReadRepo::get(&conn).unwrap(), Some(first));

        let second = ReadingPosition::juz(
            JuzIndex::new(3).unwrap(),
            SurahIndex::new(3).unwrap(),
            AyahNumber::new(7).unwrap(),
            "Juz 3 Surah Ali 'Imran",
            ts(1_700_000_100),
        );
        LastReadRepo::put(&conn, &second).unwrap();
        assert_eq!(LastReadRepo::get(&conn).unwrap(), Some(second));

        let rows: i64 = conn
            .query_row("SELECT COUNT(*) FROM last_read", [], |r| r.get(0))
            .unwrap();
        assert_eq!(rows, 1);
    }

    #[test]
    fn last_read_without_surah_fails() {
        let conn = db();
        conn.execute(
            "INSERT INTO last_read (id, kind, juz, surah, ayah, label, updated_at)
             VALUES (1, 'juz', 2, NULL, 4, 'Juz 2', '2024-01-01T00:00:00+00:00')",
            [],
        )
        .unwrap();
        let err = LastReadRepo::get(&conn).unwrap_err();
        assert_eq!(
            err.downcast_ref::<PositionError>(),
            Some(&PositionError::MissingSurah)
        );
    }

    #[test]
    fn last_read_out_of_range_surah_fails() {
        let conn = db();
        conn.execute(
            "INSERT INTO last_read (id, kind, juz, surah, ayah, label, updated_at)
             VALUES (1, 'surah', NULL, 200, 4, 'Surah 200', '2024-01-01T00:00:00+00:00')",
            [],
        )
        .unwrap();
        let err = LastReadRepo::get(&conn).unwrap_err();
        assert_eq!(
            err.downcast_ref::<PositionError>(),
            Some(&PositionError::SurahOutOfRange(200))
        );
    }

    #[test]
    fn bookmarks_add_remove_list() {
        let conn = db();
        let s2 = SurahIndex::new(2).unwrap();
        let a255 = AyahNumber::new(255).unwrap();
        let kursi = Bookmark::new(s2, a255, "Ayat al-Kursi", ts(10));
        let kahf = Bookmark::new(
            SurahIndex::new(18).unwrap(),
            AyahNumber::new(1).unwrap(),
            "Al-Kahf",
            ts(20),
        );

        assert!(BookmarkRepo::add(&conn, &kahf).unwrap());
        assert!(BookmarkRepo::add(&conn, &kursi).unwrap());
        assert!(!BookmarkRepo::add(&conn, &kursi).unwrap());
        assert!(BookmarkRepo::is_bookmarked(&conn, s2, a255).unwrap());
        assert_eq!(BookmarkRepo::count(&conn).unwrap(), 2);

        let listed = BookmarkRepo::list(&conn).unwrap();
        assert_eq!(listed, vec![kursi.clone(), kahf]);

        assert!(BookmarkRepo::remove(&conn, "2_255").unwrap());
        assert!(!BookmarkRepo::remove(&conn, "2_255").unwrap());
        assert!(!BookmarkRepo::is_bookmarked(&conn, s2, a255).unwrap());
    }

    #[test]
    fn khatam_roundtrip_and_history() {
        let conn = db();
        assert!(KhatamRepo::active(&conn).unwrap().is_none());

        let start = ts(1_700_000_000);
        let mut plan = KhatamPlan::new(30, start).unwrap();
        plan.id = Some(KhatamRepo::create(&conn, &plan).unwrap());

        let d1 = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        plan.log_pages(d1, 12).unwrap();
        KhatamRepo::save(&conn, &plan).unwrap();
        plan.log_pages(d1, 3).unwrap();
        KhatamRepo::save(&conn, &plan).unwrap();

        let loaded = KhatamRepo::active(&conn).unwrap().unwrap();
        assert_eq!(loaded, plan);
        assert_eq!(loaded.history.len(), 1);
        assert_eq!(loaded.history[0].pages, 15);

        plan.complete(start + Duration::days(20)).unwrap();
        KhatamRepo::save(&conn, &plan).unwrap();
        assert!(KhatamRepo::active(&conn).unwrap().is_none());

        let done = KhatamRepo::completed(&conn).unwrap();
        assert_eq!(done.len(), 1);
        assert_eq!(done[0].status, KhatamStatus::Completed);
        assert_eq!(done[0].duration_days(), 20);
    }

    #[test]
    fn save_requires_stored_plan() {
        let conn = db();
        let plan = KhatamPlan::new(10, ts(0)).unwrap();
        assert!(KhatamRepo::save(&conn, &plan).is_err());
    }
}
