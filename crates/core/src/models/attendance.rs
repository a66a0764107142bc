//! Attendance models

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Attendance status for one participant at one meeting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceStatus {
    /// Attended the meeting
    Present,
    /// Did not attend
    Absent,
    /// Excused absence
    Excused,
}

impl AttendanceStatus {
    pub fn display_name(&self) -> &'static str {
        match self {
            AttendanceStatus::Present => "Hadir",
            AttendanceStatus::Absent => "Tidak Hadir",
            AttendanceStatus::Excused => "Izin",
        }
    }

    /// Stable code used in storage
    pub fn code(&self) -> &'static str {
        match self {
            AttendanceStatus::Present => "hadir",
            AttendanceStatus::Absent => "tidak_hadir",
            AttendanceStatus::Excused => "izin",
        }
    }

    /// Parse a storage code or a user-typed label
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace(|c: char| c == ' ' || c == '-', "_").as_str() {
            "hadir" | "present" => Some(AttendanceStatus::Present),
            "tidak_hadir" | "absent" => Some(AttendanceStatus::Absent),
            "izin" | "excused" => Some(AttendanceStatus::Excused),
            _ => None,
        }
    }
}

impl std::fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// One attendance entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    pub id: Uuid,
    pub name: String,
    pub meeting: String,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
    /// Check-in time as entered (HH:MM), if any
    pub check_in: Option<String>,
}

impl AttendanceRecord {
    pub fn new(name: String, meeting: String, date: NaiveDate, status: AttendanceStatus) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            meeting,
            date,
            status,
            check_in: None,
        }
    }

    pub fn with_check_in(mut self, check_in: impl Into<String>) -> Self {
        self.check_in = Some(check_in.into());
        self
    }
}

/// A meeting note with the number of participants marked present
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeetingSummary {
    pub title: String,
    pub date: NaiveDate,
    pub present_count: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parse() {
        assert_eq!(AttendanceStatus::parse("Hadir"), Some(AttendanceStatus::Present));
        assert_eq!(AttendanceStatus::parse("Tidak Hadir"), Some(AttendanceStatus::Absent));
        assert_eq!(AttendanceStatus::parse("tidak_hadir"), Some(AttendanceStatus::Absent));
        assert_eq!(AttendanceStatus::parse("excused"), Some(AttendanceStatus::Excused));
        assert_eq!(AttendanceStatus::parse("maybe"), None);
    }

    #[test]
    fn test_status_code_roundtrip() {
        for status in [
            AttendanceStatus::Present,
            AttendanceStatus::Absent,
            AttendanceStatus::Excused,
        ] {
            assert_eq!(AttendanceStatus::parse(status.code()), Some(status));
        }
    }
}
