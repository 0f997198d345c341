use anyhow::Result;
use rusqlite::Connection;

pub fn run_migrations(conn: &Connection) -> Result<()> {
    conn.execute_batch("
        CREATE TABLE IF NOT EXISTS last_read (
            id          INTEGER PRIMARY KEY CHECK(id = 1),
            kind        TEXT NOT NULL CHECK(kind IN ('surah','juz')),
            juz         INTEGER,
            surah       INTEGER,
            ayah        INTEGER NOT NULL,
            label       TEXT NOT NULL DEFAULT '',
            updated_at  TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS bookmarks (
            id          TEXT PRIMARY KEY,
            surah       INTEGER NOT NULL,
            ayah        INTEGER NOT NULL,
            label       TEXT NOT NULL DEFAULT '',
            created_at  TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS khatam_plans (
            id           INTEGER PRIMARY KEY AUTOINCREMENT,
            started_at   TEXT NOT NULL,
            target_days  INTEGER NOT NULL CHECK(target_days > 0),
            pages_read   INTEGER NOT NULL DEFAULT 0,
            status       TEXT NOT NULL DEFAULT 'active'
                         CHECK(status IN ('active','completed','abandoned')),
            ended_at     TEXT
        );

        CREATE TABLE IF NOT EXISTS khatam_progress (
            id       INTEGER PRIMARY KEY AUTOINCREMENT,
            plan_id  INTEGER NOT NULL REFERENCES khatam_plans(id),
            date     TEXT NOT NULL,
            pages    INTEGER NOT NULL DEFAULT 0,
            UNIQUE(plan_id, date)
        );
    ")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn migrations_are_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        run_migrations(&conn).unwrap();
        let tables: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table'
                 AND name IN ('last_read','bookmarks','khatam_plans','khatam_progress')",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(tables, 4);
    }
}
