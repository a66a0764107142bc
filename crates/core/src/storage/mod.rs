//! SQLite storage layer for Rapat

mod attendance;
mod lists;
mod migrations;
mod notes;
mod parse;
mod traits;

use rusqlite::Connection;
use std::path::Path;
use tracing::instrument;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{AttendanceRecord, MeetingNote, MeetingSummary, Participant};

pub use attendance::AttendanceStore;
pub use lists::ListStore;
pub use notes::NoteStore;
pub use traits::{AttendanceRepository, NotesRepository, RosterStore, Storage};

/// Main database handle
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open or create database at the given path
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Open in-memory database (for testing)
    #[instrument]
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Initialize database schema via migrations
    fn init(&self) -> Result<()> {
        migrations::run_migrations(&self.conn)?;
        Ok(())
    }

    /// Get current schema version
    pub fn schema_version(&self) -> u32 {
        self.conn
            .query_row("SELECT MAX(version) FROM schema_migrations", [], |row| {
                row.get(0)
            })
            .unwrap_or(0)
    }

    /// Get named list store
    pub fn lists(&self) -> ListStore<'_> {
        ListStore::new(&self.conn)
    }

    /// Get attendance store
    pub fn attendance(&self) -> AttendanceStore<'_> {
        AttendanceStore::new(&self.conn)
    }

    /// Get meeting note store
    pub fn notes(&self) -> NoteStore<'_> {
        NoteStore::new(&self.conn)
    }
}

impl RosterStore for Database {
    fn load_names(&self, key: &str) -> Result<Vec<String>> {
        Ok(self.lists().load(key)?.unwrap_or_default())
    }

    fn save_names(&self, key: &str, names: &[String]) -> Result<()> {
        self.lists().save(key, names)
    }
}

impl AttendanceRepository for Database {
    fn record_attendance(&self, record: &AttendanceRecord) -> Result<()> {
        self.attendance().record(record)
    }

    fn list_attendance(&self) -> Result<Vec<AttendanceRecord>> {
        self.attendance().list()
    }

    fn delete_attendance(&self, id: Uuid) -> Result<()> {
        self.attendance().delete(id)
    }

    fn list_present_participants(&self, meeting: &str) -> Result<Vec<Participant>> {
        self.attendance().present_participants(meeting)
    }
}

impl NotesRepository for Database {
    fn save_note(&self, note: &MeetingNote) -> Result<()> {
        self.notes().save(note)
    }

    fn list_notes(&self) -> Result<Vec<MeetingNote>> {
        self.notes().list()
    }

    fn find_note(&self, title: &str) -> Result<Option<MeetingNote>> {
        self.notes().find_by_title(title)
    }

    fn delete_note(&self, id: Uuid) -> Result<()> {
        self.notes().delete(id)
    }

    fn list_meetings(&self) -> Result<Vec<MeetingSummary>> {
        self.notes().meetings()
    }
}
