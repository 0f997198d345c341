use anyhow::{Context, Result};
use log::{debug, info};
use rusqlite::Connection;

use crate::db::repository::LastReadRepo;
use crate::models::ReadingPosition;
use crate::reading::advance::is_more_advanced;

/// Owns the last-read bookmark for one session: loaded once, then fed every
/// observed position. Only forward progress is written back.
pub struct ReadingTracker<'c> {
    conn: &'c Connection,
    last_read: Option<ReadingPosition>,
}

impl<'c> ReadingTracker<'c> {
    pub fn load(conn: &'c Connection) -> Result<Self> {
        let last_read = LastReadRepo::get(conn).context("Loading last-read position")?;
        debug!("loaded last-read position: {:?}", last_read);
        Ok(Self { conn, last_read })
    }

    pub fn last_read(&self) -> Option<&ReadingPosition> {
        self.last_read.as_ref()
    }

    /// Offer a newly observed position. Returns true if it replaced the
    /// stored one.
    pub fn observe(&mut self, candidate: ReadingPosition) -> Result<bool> {
        if !is_more_advanced(&candidate, self.last_read.as_ref()) {
            debug!(
                "ignoring position {}:{}, not past {:?}",
                candidate.surah_index(),
                candidate.ayah(),
                self.last_read.as_ref().map(|p| (p.surah_index(), p.ayah()))
            );
            return Ok(false);
        }

        LastReadRepo::put(self.conn, &candidate).context("Saving last-read position")?;
        info!(
            "last read advanced to surah {} ayah {}",
            candidate.surah_index(),
            candidate.ayah()
        );
        self.last_read = Some(candidate);
        Ok(true)
    }
}
