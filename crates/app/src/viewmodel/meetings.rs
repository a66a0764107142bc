//! Attendance, meeting note and calendar event view model

use rapat_core::{AttendanceRecord, MeetingNote, MeetingSummary};
use rapat_net::CalendarEvent;

pub fn attendance_line(record: &AttendanceRecord) -> String {
    format!(
        "{}  {}  {:<5}  {:<11}  {:<20}  {}",
        record.id,
        record.date.format("%Y-%m-%d"),
        record.check_in.as_deref().unwrap_or("-"),
        record.status.display_name(),
        record.name,
        record.meeting
    )
}

pub fn meeting_line(meeting: &MeetingSummary) -> String {
    format!(
        "{}  {}  ({} present)",
        meeting.date.format("%Y-%m-%d"),
        meeting.title,
        meeting.present_count
    )
}

fn time_label(note: &MeetingNote) -> String {
    note.time
        .map(|t| t.format("%H:%M").to_string())
        .unwrap_or_else(|| "-".to_string())
}

pub fn note_line(note: &MeetingNote) -> String {
    let place = if note.place.is_empty() {
        String::new()
    } else {
        format!("  @ {}", note.place)
    };
    format!(
        "{}  {}  {:<5}  {}{}",
        note.id,
        note.date.format("%Y-%m-%d"),
        time_label(note),
        note.title,
        place
    )
}

/// Full minutes, one section per field; empty sections read "-"
pub fn note_lines(note: &MeetingNote) -> Vec<String> {
    let section = |text: &str| {
        if text.trim().is_empty() {
            "-".to_string()
        } else {
            text.trim().to_string()
        }
    };

    vec![
        format!("Meeting notes: {}", note.title),
        format!("Date:  {}", note.date.format("%Y-%m-%d")),
        format!("Time:  {}", time_label(note)),
        format!("Place: {}", section(&note.place)),
        String::new(),
        "Agenda:".to_string(),
        section(&note.agenda),
        String::new(),
        "Discussion:".to_string(),
        section(&note.content),
        String::new(),
        "Conclusion:".to_string(),
        section(&note.conclusion),
    ]
}

pub fn event_line(event: &CalendarEvent) -> String {
    let start = event
        .start
        .as_ref()
        .map(|s| s.label())
        .unwrap_or_else(|| "-".to_string());
    format!(
        "{}  {:<16}  {}  ({} attendees)",
        event.id,
        start,
        event.title(),
        event.attendees.len()
    )
}
