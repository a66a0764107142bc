//! Command handlers
//!
//! Each handler writes its user-facing output to `out`; diagnostics go
//! through `tracing`.

use std::io::{self, Write};

use chrono::Local;
use rapat_core::wheel::FrameScheduler;
use rapat_core::{
    import_from_meeting, AttendanceRecord, AttendanceRepository, Error as CoreError,
    ImportOutcome, MeetingNote, NotesRepository, Participant, SelectionSession, SessionEvent,
};
use rapat_net::{CalendarProvider, GoogleCalendarClient, NewEvent, RosterImporter};
use tracing::info;

use crate::cli::{AttendanceCommand, Command, ImportCommand, NotesCommand, ParticipantsCommand};
use crate::error::Result;
use crate::platform::ColorSupport;
use crate::scheduler::TerminalScheduler;
use crate::state::AppState;
use crate::viewmodel;

/// Output settings shared by all handlers
#[derive(Debug, Clone, Copy)]
pub struct Output {
    pub color: ColorSupport,
    /// Draw per-frame status lines (only on an interactive terminal)
    pub animate: bool,
}

pub fn run<W: Write>(
    command: Command,
    state: &AppState,
    seed: Option<u64>,
    output: Output,
    out: &mut W,
) -> Result<()> {
    match command {
        Command::Participants(cmd) => participants(cmd, state, output, out),
        Command::Spin { remove } => {
            let mut session = state.session(seed)?;
            let mut scheduler = TerminalScheduler::new(state.config.wheel.frame_interval());
            spin(state, &mut session, &mut scheduler, remove, output, out)
        }
        Command::Sequence => {
            let mut session = state.session(seed)?;
            let mut scheduler = TerminalScheduler::new(state.config.wheel.frame_interval());
            sequence(&mut session, &mut scheduler, output, out)?;
            Ok(())
        }
        Command::Import(ImportCommand::Calendar { event_id }) => {
            let outcome = import_calendar(state, &event_id)?;
            apply_import(state, outcome, output, out)
        }
        Command::Import(ImportCommand::Meeting { title }) => {
            let outcome = import_from_meeting(&state.db, &title);
            apply_import(state, outcome, output, out)
        }
        Command::Events { max } => events(state, max, out),
        Command::Schedule {
            summary,
            start,
            end,
            location,
            description,
        } => {
            let mut event = NewEvent::new(&summary, start, end)?;
            if let Some(location) = location {
                event = event.with_location(location);
            }
            if let Some(description) = description {
                event = event.with_description(description);
            }
            schedule(state, &event, out)
        }
        Command::Notes(cmd) => notes(cmd, state, out),
        Command::Attendance(cmd) => attendance(cmd, state, out),
        Command::Meetings => {
            let meetings = state.db.list_meetings()?;
            if meetings.is_empty() {
                writeln!(out, "No meetings noted yet. Add one with `rapat notes add <title>`.")?;
            }
            for meeting in &meetings {
                writeln!(out, "{}", viewmodel::meeting_line(meeting))?;
            }
            Ok(())
        }
    }
}

fn participants<W: Write>(
    command: ParticipantsCommand,
    state: &AppState,
    output: Output,
    out: &mut W,
) -> Result<()> {
    let mut roster = state.load_roster()?;

    match command {
        ParticipantsCommand::List => {}
        ParticipantsCommand::Add { names } => {
            for name in &names {
                let added = roster.add(name)?;
                info!(participant = %added, "Participant added");
            }
            state.save_roster(&roster)?;
        }
        ParticipantsCommand::Remove { name } => match roster.remove(&name) {
            Some(removed) => {
                info!(participant = %removed, "Participant removed");
                state.save_roster(&roster)?;
            }
            None => writeln!(out, "{name} is not on the roster")?,
        },
        ParticipantsCommand::Clear => {
            roster.clear();
            state.save_roster(&roster)?;
        }
    }

    for line in viewmodel::roster_lines(&roster, output.color) {
        writeln!(out, "{line}")?;
    }
    Ok(())
}

/// Render session events; the first write error is kept and reported after
/// the draw, since the animation itself cannot be interrupted
struct EventPrinter<'a, W: Write> {
    out: &'a mut W,
    output: Output,
    error: Option<io::Error>,
}

impl<'a, W: Write> EventPrinter<'a, W> {
    fn new(out: &'a mut W, output: Output) -> Self {
        Self {
            out,
            output,
            error: None,
        }
    }

    fn handle(&mut self, session: &SelectionSession, event: &SessionEvent) {
        if self.error.is_some() {
            return;
        }
        if let Err(e) = self.write_event(session, event) {
            self.error = Some(e);
        }
    }

    fn write_event(&mut self, session: &SelectionSession, event: &SessionEvent) -> io::Result<()> {
        let color = self.output.color;
        match event {
            SessionEvent::Frame { .. } => {
                if self.output.animate {
                    let line = viewmodel::frame_line(&session.current_frame(), color);
                    write!(self.out, "\r\x1b[2K{line}")?;
                    self.out.flush()?;
                }
            }
            SessionEvent::Settled { winner } => {
                self.clear_frame_line()?;
                writeln!(self.out, "{}", viewmodel::winner_line(winner, color))?;
            }
            SessionEvent::Revealed { cycle, participant } => {
                self.clear_frame_line()?;
                writeln!(self.out, "{}", viewmodel::reveal_line(*cycle, participant, color))?;
            }
            SessionEvent::Completed { order } => {
                writeln!(self.out, "Order complete: {} participants", order.len())?;
                for line in viewmodel::order_lines(order, color) {
                    writeln!(self.out, "{line}")?;
                }
            }
        }
        Ok(())
    }

    fn clear_frame_line(&mut self) -> io::Result<()> {
        if self.output.animate {
            write!(self.out, "\r\x1b[2K")?;
        }
        Ok(())
    }

    fn finish(self) -> io::Result<()> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

fn spin<S: FrameScheduler, W: Write>(
    state: &AppState,
    session: &mut SelectionSession,
    scheduler: &mut S,
    remove: bool,
    output: Output,
    out: &mut W,
) -> Result<()> {
    let mut printer = EventPrinter::new(out, output);
    let winner = session.draw_single(scheduler, |s, event| printer.handle(s, event))?;
    printer.finish()?;

    if remove {
        if let Some(removed) = session.remove_winner_from_roster() {
            state.save_roster(session.roster())?;
            writeln!(out, "Removed {removed} from the roster")?;
        }
    }
    info!(winner = %winner, remove, "Spin finished");
    Ok(())
}

fn sequence<S: FrameScheduler, W: Write>(
    session: &mut SelectionSession,
    scheduler: &mut S,
    output: Output,
    out: &mut W,
) -> Result<Vec<Participant>> {
    let mut printer = EventPrinter::new(out, output);
    let order = session.draw_sequential(scheduler, |s, event| printer.handle(s, event))?;
    printer.finish()?;
    Ok(order)
}

fn import_calendar(state: &AppState, event_id: &str) -> Result<ImportOutcome> {
    let source = format!("calendar event {event_id}");
    let client = match GoogleCalendarClient::from_settings(&state.config.calendar) {
        Ok(client) => client,
        Err(e) => return Ok(ImportOutcome::unavailable(&source, e)),
    };
    let importer = RosterImporter::from_settings(client, &state.config.calendar);

    let runtime = tokio::runtime::Runtime::new()?;
    Ok(runtime.block_on(importer.fetch_candidates(event_id)))
}

fn apply_import<W: Write>(
    state: &AppState,
    outcome: ImportOutcome,
    output: Output,
    out: &mut W,
) -> Result<()> {
    if let Some(notice) = &outcome.notice {
        writeln!(out, "{notice}")?;
    }
    if outcome.is_empty() {
        return Ok(());
    }

    let mut roster = state.load_roster()?;
    let added = roster.import_merge(outcome.candidates);
    state.save_roster(&roster)?;

    writeln!(out, "Added {} new participant(s)", added.len())?;
    for participant in &added {
        let index = roster.position(participant.name()).unwrap_or_default();
        writeln!(
            out,
            "{}",
            viewmodel::participant_line(index, participant, output.color)
        )?;
    }
    Ok(())
}

fn events<W: Write>(state: &AppState, max: u32, out: &mut W) -> Result<()> {
    let client = GoogleCalendarClient::from_settings(&state.config.calendar)?;
    let runtime = tokio::runtime::Runtime::new()?;
    let events = runtime.block_on(client.upcoming_events(max))?;

    if events.is_empty() {
        writeln!(out, "No upcoming events")?;
    }
    for event in &events {
        writeln!(out, "{}", viewmodel::event_line(event))?;
    }
    Ok(())
}

fn schedule<W: Write>(state: &AppState, event: &NewEvent, out: &mut W) -> Result<()> {
    let client = GoogleCalendarClient::from_settings(&state.config.calendar)?;
    let runtime = tokio::runtime::Runtime::new()?;
    let created = runtime.block_on(client.create_event(event))?;
    writeln!(out, "Scheduled {}", viewmodel::event_line(&created))?;
    Ok(())
}

fn notes<W: Write>(command: NotesCommand, state: &AppState, out: &mut W) -> Result<()> {
    match command {
        NotesCommand::Add {
            title,
            date,
            time,
            place,
            agenda,
            content,
            conclusion,
        } => {
            let date = date.unwrap_or_else(|| Local::now().date_naive());
            let mut note = MeetingNote::new(&title, date)?
                .with_place(place.trim())
                .with_agenda(agenda)
                .with_content(content)
                .with_conclusion(conclusion);
            if let Some(time) = time {
                note = note.with_time(time);
            }
            state.db.save_note(&note)?;
            writeln!(out, "{}", viewmodel::note_line(&note))?;
        }
        NotesCommand::List => {
            let notes = state.db.list_notes()?;
            if notes.is_empty() {
                writeln!(out, "No meeting notes yet")?;
            }
            for note in &notes {
                writeln!(out, "{}", viewmodel::note_line(note))?;
            }
        }
        NotesCommand::Show { title } => {
            let note = state
                .db
                .find_note(&title)?
                .ok_or_else(|| CoreError::NotFound(format!("meeting note {:?}", title.trim())))?;
            for line in viewmodel::note_lines(&note) {
                writeln!(out, "{line}")?;
            }
        }
        NotesCommand::Remove { id } => {
            state.db.delete_note(id)?;
            writeln!(out, "Removed meeting note {id}")?;
        }
    }
    Ok(())
}

fn attendance<W: Write>(command: AttendanceCommand, state: &AppState, out: &mut W) -> Result<()> {
    match command {
        AttendanceCommand::Add {
            name,
            meeting,
            date,
            status,
            check_in,
        } => {
            let name = Participant::new(&name)?;
            let date = date.unwrap_or_else(|| Local::now().date_naive());
            let mut record =
                AttendanceRecord::new(name.into(), meeting.trim().to_string(), date, status);
            if let Some(check_in) = check_in {
                record = record.with_check_in(check_in);
            }
            state.db.record_attendance(&record)?;
            writeln!(out, "{}", viewmodel::attendance_line(&record))?;
        }
        AttendanceCommand::List => {
            let records = state.db.list_attendance()?;
            if records.is_empty() {
                writeln!(out, "No attendance recorded")?;
            }
            for record in &records {
                writeln!(out, "{}", viewmodel::attendance_line(record))?;
            }
        }
        AttendanceCommand::Remove { id } => {
            state.db.delete_attendance(id)?;
            writeln!(out, "Removed attendance record {id}")?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, NaiveDate};
    use rapat_core::wheel::FixedStepScheduler;
    use rapat_core::AttendanceStatus;
    use tempfile::TempDir;

    use crate::error::AppError;

    const PLAIN: Output = Output {
        color: ColorSupport::Plain,
        animate: false,
    };

    fn state(dir: &TempDir) -> AppState {
        AppState::open(&dir.path().join("data"), &dir.path().join("config.toml")).unwrap()
    }

    fn run_text(command: Command, state: &AppState) -> Result<String> {
        let mut out = Vec::new();
        run(command, state, Some(1), PLAIN, &mut out)?;
        Ok(String::from_utf8(out).unwrap())
    }

    fn add(state: &AppState, names: &[&str]) {
        run_text(
            Command::Participants(ParticipantsCommand::Add {
                names: names.iter().map(|n| n.to_string()).collect(),
            }),
            state,
        )
        .unwrap();
    }

    #[test]
    fn test_participants_add_list_remove() {
        let dir = TempDir::new().unwrap();
        let state = state(&dir);
        add(&state, &["Ana", "Budi"]);

        let duplicate = run_text(
            Command::Participants(ParticipantsCommand::Add {
                names: vec!["ana".to_string()],
            }),
            &state,
        );
        assert!(matches!(duplicate, Err(AppError::Core(CoreError::Duplicate(_)))));

        let text = run_text(
            Command::Participants(ParticipantsCommand::Remove {
                name: "Ana".to_string(),
            }),
            &state,
        )
        .unwrap();
        assert!(!text.contains("Ana"));
        assert!(text.contains("Budi"));

        let text = run_text(Command::Participants(ParticipantsCommand::Clear), &state).unwrap();
        assert!(text.contains("No participants yet"));
    }

    fn add_note(state: &AppState, title: &str) {
        run_text(
            Command::Notes(NotesCommand::Add {
                title: title.to_string(),
                date: NaiveDate::from_ymd_opt(2024, 6, 1),
                time: None,
                place: "Ruang 2".to_string(),
                agenda: "Sprint review".to_string(),
                content: String::new(),
                conclusion: String::new(),
            }),
            state,
        )
        .unwrap();
    }

    #[test]
    fn test_spin_keeps_winner_unless_removed() {
        let dir = TempDir::new().unwrap();
        let state = state(&dir);
        add(&state, &["Ana", "Budi", "Citra"]);

        let mut out = Vec::new();
        let mut session = state.session(Some(5)).unwrap();
        let mut scheduler = FixedStepScheduler::default();
        spin(&state, &mut session, &mut scheduler, false, PLAIN, &mut out).unwrap();
        assert_eq!(state.load_roster().unwrap().len(), 3);
        assert!(String::from_utf8(out).unwrap().starts_with("Selected: "));

        let mut out = Vec::new();
        let mut session = state.session(Some(5)).unwrap();
        spin(&state, &mut session, &mut scheduler, true, PLAIN, &mut out).unwrap();
        assert_eq!(state.load_roster().unwrap().len(), 2);
        assert!(String::from_utf8(out).unwrap().contains("from the roster"));
    }

    #[test]
    fn test_spin_empty_roster() {
        let dir = TempDir::new().unwrap();
        let state = state(&dir);
        let mut session = state.session(None).unwrap();
        let mut scheduler = FixedStepScheduler::default();
        let mut out = Vec::new();

        let result = spin(&state, &mut session, &mut scheduler, false, PLAIN, &mut out);
        assert!(matches!(result, Err(AppError::Core(CoreError::EmptyRoster))));
        assert_eq!(scheduler.frames(), 0);
        assert!(out.is_empty());
    }

    #[test]
    fn test_sequence_prints_every_participant() {
        let dir = TempDir::new().unwrap();
        let state = state(&dir);
        add(&state, &["Ana", "Budi", "Citra"]);

        let mut session = state.session(Some(2)).unwrap();
        let mut scheduler = FixedStepScheduler::new(std::time::Duration::from_millis(50));
        let mut out = Vec::new();
        let order = sequence(&mut session, &mut scheduler, PLAIN, &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(order.len(), 3);
        for participant in &order {
            assert!(text.contains(participant.name()));
        }
        let (_, summary) = text.split_once("Order complete: 3 participants\n").unwrap();
        let printed: Vec<&str> = summary.lines().collect();
        assert_eq!(printed, viewmodel::order_lines(&order, ColorSupport::Plain));
        assert!(printed[0].starts_with("  1. "));
        assert_eq!(state.load_roster().unwrap().len(), 3);
    }

    #[test]
    fn test_animated_frames_use_carriage_return() {
        let dir = TempDir::new().unwrap();
        let state = state(&dir);
        add(&state, &["Ana", "Budi"]);

        let mut session = state.session(Some(4)).unwrap();
        let mut scheduler = FixedStepScheduler::default();
        let mut out = Vec::new();
        let output = Output {
            color: ColorSupport::Plain,
            animate: true,
        };
        spin(&state, &mut session, &mut scheduler, true, output, &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.matches('\r').count() > 100);
        assert!(text.contains("Selected: "));
    }

    #[test]
    fn test_import_meeting_merges_present() {
        let dir = TempDir::new().unwrap();
        let state = state(&dir);
        add(&state, &["Ana"]);
        add_note(&state, "Retro");
        let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        for (name, status) in [
            ("ANA", AttendanceStatus::Present),
            ("Budi", AttendanceStatus::Present),
            ("Citra", AttendanceStatus::Absent),
        ] {
            run_text(
                Command::Attendance(AttendanceCommand::Add {
                    name: name.to_string(),
                    meeting: "Retro".to_string(),
                    date: Some(date),
                    status,
                    check_in: None,
                }),
                &state,
            )
            .unwrap();
        }

        let text = run_text(
            Command::Import(ImportCommand::Meeting {
                title: "Retro".to_string(),
            }),
            &state,
        )
        .unwrap();
        assert!(text.contains("Added 1 new participant(s)"));
        assert_eq!(state.load_roster().unwrap().names(), vec!["Ana", "Budi"]);

        let text = run_text(Command::Meetings, &state).unwrap();
        assert!(text.contains("2024-06-01  Retro  (2 present)"));
    }

    #[test]
    fn test_import_meeting_without_note_is_a_notice() {
        let dir = TempDir::new().unwrap();
        let state = state(&dir);
        let text = run_text(
            Command::Import(ImportCommand::Meeting {
                title: "Retro".to_string(),
            }),
            &state,
        )
        .unwrap();
        assert!(text.contains("Could not import"));
        assert!(state.load_roster().unwrap().is_empty());

        let text = run_text(Command::Meetings, &state).unwrap();
        assert!(text.contains("No meetings noted yet"));
    }

    #[test]
    fn test_notes_add_list_show_remove() {
        let dir = TempDir::new().unwrap();
        let state = state(&dir);
        let text = run_text(Command::Notes(NotesCommand::List), &state).unwrap();
        assert!(text.contains("No meeting notes yet"));

        add_note(&state, "Retro");
        let text = run_text(Command::Notes(NotesCommand::List), &state).unwrap();
        assert!(text.contains("2024-06-01"));
        assert!(text.contains("Retro  @ Ruang 2"));

        let text = run_text(
            Command::Notes(NotesCommand::Show {
                title: "retro".to_string(),
            }),
            &state,
        )
        .unwrap();
        assert!(text.starts_with("Meeting notes: Retro\n"));
        assert!(text.contains("Sprint review"));

        let note = state.db.find_note("Retro").unwrap().unwrap();
        run_text(Command::Notes(NotesCommand::Remove { id: note.id }), &state).unwrap();
        let missing = run_text(
            Command::Notes(NotesCommand::Show {
                title: "Retro".to_string(),
            }),
            &state,
        );
        assert!(matches!(missing, Err(AppError::Core(CoreError::NotFound(_)))));
    }

    #[test]
    fn test_notes_reject_blank_title() {
        let dir = TempDir::new().unwrap();
        let state = state(&dir);
        let result = run_text(
            Command::Notes(NotesCommand::Add {
                title: "  ".to_string(),
                date: None,
                time: None,
                place: String::new(),
                agenda: String::new(),
                content: String::new(),
                conclusion: String::new(),
            }),
            &state,
        );
        assert!(matches!(result, Err(AppError::Core(CoreError::InvalidNote(_)))));
    }

    fn schedule_command(start: &str, end: &str) -> Command {
        Command::Schedule {
            summary: "Retro".to_string(),
            start: DateTime::parse_from_rfc3339(start).unwrap(),
            end: DateTime::parse_from_rfc3339(end).unwrap(),
            location: Some("Ruang 2".to_string()),
            description: None,
        }
    }

    #[test]
    fn test_schedule_without_credentials() {
        let dir = TempDir::new().unwrap();
        let mut state = state(&dir);
        state.config.calendar.access_token = None;
        state.config.calendar.api_key = None;

        let command = schedule_command("2024-06-10T09:00:00+07:00", "2024-06-10T10:00:00+07:00");
        let result = run_text(command, &state);
        assert!(matches!(
            result,
            Err(AppError::Calendar(rapat_net::Error::NotConfigured(_)))
        ));
    }

    #[test]
    fn test_schedule_rejects_end_before_start() {
        let dir = TempDir::new().unwrap();
        let state = state(&dir);
        let command = schedule_command("2024-06-10T10:00:00+07:00", "2024-06-10T09:00:00+07:00");
        let result = run_text(command, &state);
        assert!(matches!(
            result,
            Err(AppError::Calendar(rapat_net::Error::InvalidEvent(_)))
        ));
    }

    #[test]
    fn test_import_calendar_without_credentials_is_a_notice() {
        let dir = TempDir::new().unwrap();
        let mut state = state(&dir);
        state.config.calendar.access_token = None;
        state.config.calendar.api_key = None;

        let text = run_text(
            Command::Import(ImportCommand::Calendar {
                event_id: "evt".to_string(),
            }),
            &state,
        )
        .unwrap();
        assert!(text.contains("Could not import"));
        assert!(state.load_roster().unwrap().is_empty());
    }

    #[test]
    fn test_attendance_remove_unknown() {
        let dir = TempDir::new().unwrap();
        let state = state(&dir);
        let result = run_text(
            Command::Attendance(AttendanceCommand::Remove {
                id: uuid::Uuid::new_v4(),
            }),
            &state,
        );
        assert!(matches!(result, Err(AppError::Core(CoreError::NotFound(_)))));
    }

    #[test]
    fn test_attendance_rejects_blank_name() {
        let dir = TempDir::new().unwrap();
        let state = state(&dir);
        let result = run_text(
            Command::Attendance(AttendanceCommand::Add {
                name: "   ".to_string(),
                meeting: "Retro".to_string(),
                date: None,
                status: AttendanceStatus::Present,
                check_in: None,
            }),
            &state,
        );
        assert!(matches!(result, Err(AppError::Core(CoreError::InvalidName(_)))));
    }
}
