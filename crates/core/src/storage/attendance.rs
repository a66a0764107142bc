//! Attendance persistence

use chrono::Utc;
use rusqlite::{params, Connection, Row};
use tracing::{info, instrument};
use uuid::Uuid;

use super::parse::{parse_date, parse_status, parse_uuid, DATE_FORMAT};
use crate::error::{Error, Result};
use crate::models::{AttendanceRecord, AttendanceStatus, Participant};
use crate::roster::Roster;

/// Attendance store
pub struct AttendanceStore<'a> {
    conn: &'a Connection,
}

impl<'a> AttendanceStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Insert or replace a record
    #[instrument(skip(self, record), fields(id = %record.id, meeting = %record.meeting))]
    pub fn record(&self, record: &AttendanceRecord) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO attendance
             (id, name, meeting, date, status, check_in, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                record.id.to_string(),
                record.name,
                record.meeting,
                record.date.format(DATE_FORMAT).to_string(),
                record.status.code(),
                record.check_in,
                Utc::now().to_rfc3339(),
            ],
        )?;
        info!(status = record.status.code(), "Attendance recorded");
        Ok(())
    }

    /// All records, ordered by date then check-in time
    pub fn list(&self) -> Result<Vec<AttendanceRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, meeting, date, status, check_in FROM attendance
             ORDER BY date, check_in, rowid",
        )?;
        let records = stmt
            .query_map([], Self::row_to_record)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(records)
    }

    /// Delete a record; `NotFound` if no record has this id
    #[instrument(skip(self))]
    pub fn delete(&self, id: Uuid) -> Result<()> {
        let deleted = self
            .conn
            .execute("DELETE FROM attendance WHERE id = ?1", params![id.to_string()])?;
        if deleted == 0 {
            return Err(Error::NotFound(format!("attendance record {id}")));
        }
        info!("Attendance deleted");
        Ok(())
    }

    /// Participants marked present for `meeting` (title compared
    /// case-insensitively), deduplicated in first-seen order
    pub fn present_participants(&self, meeting: &str) -> Result<Vec<Participant>> {
        let mut stmt = self.conn.prepare(
            "SELECT name FROM attendance
             WHERE meeting = ?1 COLLATE NOCASE AND status = ?2
             ORDER BY date, check_in, rowid",
        )?;
        let names = stmt
            .query_map(
                params![meeting.trim(), AttendanceStatus::Present.code()],
                |row| row.get::<_, String>(0),
            )?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(Roster::from_names(names).participants().to_vec())
    }

    fn row_to_record(row: &Row<'_>) -> rusqlite::Result<AttendanceRecord> {
        let id: String = row.get(0)?;
        let date: String = row.get(3)?;
        let status: String = row.get(4)?;
        Ok(AttendanceRecord {
            id: parse_uuid(0, &id)?,
            name: row.get(1)?,
            meeting: row.get(2)?,
            date: parse_date(3, &date)?,
            status: parse_status(4, &status)?,
            check_in: row.get(5)?,
        })
    }
}
