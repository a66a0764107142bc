//! Meeting note persistence

use chrono::Utc;
use rusqlite::{params, Connection, Row};
use tracing::{info, instrument};
use uuid::Uuid;

use super::parse::{parse_date, parse_time, parse_uuid, OptionalExt, DATE_FORMAT, TIME_FORMAT};
use crate::error::{Error, Result};
use crate::models::{AttendanceStatus, MeetingNote, MeetingSummary};

const NOTE_COLUMNS: &str = "id, title, date, time, place, agenda, content, conclusion";

/// Meeting note store
pub struct NoteStore<'a> {
    conn: &'a Connection,
}

impl<'a> NoteStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Insert or replace a note
    #[instrument(skip(self, note), fields(id = %note.id, title = %note.title))]
    pub fn save(&self, note: &MeetingNote) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO notes
             (id, title, date, time, place, agenda, content, conclusion, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                note.id.to_string(),
                note.title,
                note.date.format(DATE_FORMAT).to_string(),
                note.time.map(|t| t.format(TIME_FORMAT).to_string()),
                note.place,
                note.agenda,
                note.content,
                note.conclusion,
                Utc::now().to_rfc3339(),
            ],
        )?;
        info!("Meeting note saved");
        Ok(())
    }

    /// All notes in the order they were held
    pub fn list(&self) -> Result<Vec<MeetingNote>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {NOTE_COLUMNS} FROM notes ORDER BY date, time, rowid"
        ))?;
        let notes = stmt
            .query_map([], Self::row_to_note)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(notes)
    }

    /// Most recent note whose title matches case-insensitively
    pub fn find_by_title(&self, title: &str) -> Result<Option<MeetingNote>> {
        let note = self
            .conn
            .query_row(
                &format!(
                    "SELECT {NOTE_COLUMNS} FROM notes
                     WHERE title = ?1 COLLATE NOCASE
                     ORDER BY date DESC, rowid DESC
                     LIMIT 1"
                ),
                params![title.trim()],
                Self::row_to_note,
            )
            .optional()?;
        Ok(note)
    }

    /// Delete a note; `NotFound` if no note has this id
    #[instrument(skip(self))]
    pub fn delete(&self, id: Uuid) -> Result<()> {
        let deleted = self
            .conn
            .execute("DELETE FROM notes WHERE id = ?1", params![id.to_string()])?;
        if deleted == 0 {
            return Err(Error::NotFound(format!("meeting note {id}")));
        }
        info!("Meeting note deleted");
        Ok(())
    }

    /// Every note with the number of distinct participants marked present
    /// under its title (compared case-insensitively), most recent first
    pub fn meetings(&self) -> Result<Vec<MeetingSummary>> {
        let mut stmt = self.conn.prepare(
            "SELECT n.title, n.date,
                    (SELECT COUNT(DISTINCT lower(a.name)) FROM attendance a
                     WHERE a.meeting = n.title COLLATE NOCASE AND a.status = ?1)
             FROM notes n
             ORDER BY n.date DESC, n.title COLLATE NOCASE",
        )?;
        let meetings = stmt
            .query_map(params![AttendanceStatus::Present.code()], |row| {
                let date: String = row.get(1)?;
                Ok(MeetingSummary {
                    title: row.get(0)?,
                    date: parse_date(1, &date)?,
                    present_count: row.get(2)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(meetings)
    }

    fn row_to_note(row: &Row<'_>) -> rusqlite::Result<MeetingNote> {
        let id: String = row.get(0)?;
        let date: String = row.get(2)?;
        let time: Option<String> = row.get(3)?;
        Ok(MeetingNote {
            id: parse_uuid(0, &id)?,
            title: row.get(1)?,
            date: parse_date(2, &date)?,
            time: time.map(|t| parse_time(3, &t)).transpose()?,
            place: row.get(4)?,
            agenda: row.get(5)?,
            content: row.get(6)?,
            conclusion: row.get(7)?,
        })
    }
}
