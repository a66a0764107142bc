//! Roster import results
//!
//! Importers never fail outward: a source that cannot be reached yields an
//! empty candidate list plus a notice for the user.

use tracing::{info, warn};

use crate::models::Candidate;
use crate::storage::{AttendanceRepository, NotesRepository};

/// Candidates fetched from an external source
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportOutcome {
    pub candidates: Vec<Candidate>,
    /// Message to surface to the user, if any
    pub notice: Option<String>,
}

impl ImportOutcome {
    /// Candidates were fetched; an empty fetch still carries a notice
    pub fn found(source: &str, candidates: Vec<Candidate>) -> Self {
        let notice = candidates
            .is_empty()
            .then(|| format!("No participants found in {source}"));
        Self { candidates, notice }
    }

    /// The source could not be used
    pub fn unavailable(source: &str, reason: impl std::fmt::Display) -> Self {
        Self {
            candidates: Vec::new(),
            notice: Some(format!("Could not import from {source}: {reason}")),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

/// Candidates marked present at a noted meeting.
///
/// The title is looked up among the meeting notes first; attendance is then
/// read under the note's own title.
pub fn import_from_meeting<R>(repo: &R, title: &str) -> ImportOutcome
where
    R: AttendanceRepository + NotesRepository + ?Sized,
{
    let source = format!("meeting {:?}", title.trim());
    let note = match repo.find_note(title) {
        Ok(Some(note)) => note,
        Ok(None) => return ImportOutcome::unavailable(&source, "no meeting note with this title"),
        Err(e) => {
            warn!(title, error = %e, "Meeting note lookup failed");
            return ImportOutcome::unavailable(&source, e);
        }
    };

    match repo.list_present_participants(&note.title) {
        Ok(participants) => {
            let count = participants.len();
            info!(meeting = %note.title, count, "Fetched present participants");
            let candidates = participants
                .into_iter()
                .map(|p| Candidate::from(String::from(p)))
                .collect();
            ImportOutcome::found(&source, candidates)
        }
        Err(e) => {
            warn!(meeting = %note.title, error = %e, "Attendance import failed");
            ImportOutcome::unavailable(&source, e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, Result};
    use crate::models::{
        AttendanceRecord, AttendanceStatus, MeetingNote, MeetingSummary, Participant,
    };
    use crate::storage::Database;
    use chrono::NaiveDate;
    use uuid::Uuid;

    /// Knows one note but cannot read attendance
    struct OfflineAttendance;

    impl AttendanceRepository for OfflineAttendance {
        fn record_attendance(&self, _: &AttendanceRecord) -> Result<()> {
            Err(Error::ImportSourceUnavailable("offline".into()))
        }
        fn list_attendance(&self) -> Result<Vec<AttendanceRecord>> {
            Err(Error::ImportSourceUnavailable("offline".into()))
        }
        fn delete_attendance(&self, _: Uuid) -> Result<()> {
            Err(Error::ImportSourceUnavailable("offline".into()))
        }
        fn list_present_participants(&self, _: &str) -> Result<Vec<Participant>> {
            Err(Error::ImportSourceUnavailable("offline".into()))
        }
    }

    impl NotesRepository for OfflineAttendance {
        fn save_note(&self, _: &MeetingNote) -> Result<()> {
            Ok(())
        }
        fn list_notes(&self) -> Result<Vec<MeetingNote>> {
            Ok(Vec::new())
        }
        fn find_note(&self, title: &str) -> Result<Option<MeetingNote>> {
            let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
            Ok(Some(MeetingNote::new(title, date)?))
        }
        fn delete_note(&self, _: Uuid) -> Result<()> {
            Ok(())
        }
        fn list_meetings(&self) -> Result<Vec<MeetingSummary>> {
            Ok(Vec::new())
        }
    }

    fn record(db: &Database, name: &str, meeting: &str, status: AttendanceStatus) {
        let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        db.record_attendance(&AttendanceRecord::new(
            name.to_string(),
            meeting.to_string(),
            date,
            status,
        ))
        .unwrap();
    }

    #[test]
    fn test_import_from_meeting() {
        let db = Database::open_in_memory().unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        db.save_note(&MeetingNote::new("Standup", date).unwrap()).unwrap();
        record(&db, "Ana", "Standup", AttendanceStatus::Present);
        record(&db, "Budi", "Standup", AttendanceStatus::Excused);
        record(&db, "Citra", "standup", AttendanceStatus::Present);

        let outcome = import_from_meeting(&db, "STANDUP");
        assert_eq!(outcome.notice, None);
        let names: Vec<String> = outcome
            .candidates
            .iter()
            .filter_map(Candidate::resolved_name)
            .collect();
        assert_eq!(names, vec!["Ana", "Citra"]);
    }

    #[test]
    fn test_meeting_without_note_has_notice() {
        let db = Database::open_in_memory().unwrap();
        record(&db, "Ana", "Standup", AttendanceStatus::Present);

        let outcome = import_from_meeting(&db, "Standup");
        assert!(outcome.is_empty());
        assert!(outcome.notice.unwrap().contains("no meeting note"));
    }

    #[test]
    fn test_empty_meeting_has_notice() {
        let db = Database::open_in_memory().unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        db.save_note(&MeetingNote::new("Nothing", date).unwrap()).unwrap();

        let outcome = import_from_meeting(&db, "Nothing");
        assert!(outcome.is_empty());
        assert!(outcome.notice.unwrap().contains("No participants"));
    }

    #[test]
    fn test_failure_degrades_to_notice() {
        let outcome = import_from_meeting(&OfflineAttendance, "Standup");
        assert!(outcome.is_empty());
        assert!(outcome.notice.unwrap().contains("offline"));
    }
}
