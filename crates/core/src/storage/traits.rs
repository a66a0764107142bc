//! Storage repository traits
//!
//! These traits define the storage interface, allowing for different
//! implementations (SQLite, in-memory mocks).

use uuid::Uuid;

use crate::error::Result;
use crate::models::{AttendanceRecord, MeetingNote, MeetingSummary, Participant};

/// Named string lists, used to persist the roster
pub trait RosterStore {
    /// Load the list stored under `key`; an unknown key yields an empty list
    fn load_names(&self, key: &str) -> Result<Vec<String>>;

    /// Replace the list stored under `key`
    fn save_names(&self, key: &str, names: &[String]) -> Result<()>;
}

/// Attendance repository operations
pub trait AttendanceRepository {
    /// Record an attendance entry
    fn record_attendance(&self, record: &AttendanceRecord) -> Result<()>;

    /// List all entries ordered by date, then check-in time
    fn list_attendance(&self) -> Result<Vec<AttendanceRecord>>;

    /// Delete an entry
    fn delete_attendance(&self, id: Uuid) -> Result<()>;

    /// Distinct participants marked present for a meeting, first-seen order
    fn list_present_participants(&self, meeting: &str) -> Result<Vec<Participant>>;
}

/// Meeting note repository operations
pub trait NotesRepository {
    /// Save a new note or replace one with the same id
    fn save_note(&self, note: &MeetingNote) -> Result<()>;

    /// List all notes ordered by meeting date and time
    fn list_notes(&self) -> Result<Vec<MeetingNote>>;

    /// Most recent note with this title, compared case-insensitively
    fn find_note(&self, title: &str) -> Result<Option<MeetingNote>>;

    /// Delete a note
    fn delete_note(&self, id: Uuid) -> Result<()>;

    /// Noted meetings with their present count, most recent first
    fn list_meetings(&self) -> Result<Vec<MeetingSummary>>;
}

/// Combined storage interface
pub trait Storage: RosterStore + AttendanceRepository + NotesRepository {}

// Blanket implementation: any type implementing all traits implements Storage
impl<T> Storage for T where T: RosterStore + AttendanceRepository + NotesRepository {}
