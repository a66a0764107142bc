//! Command line definition

use std::path::PathBuf;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime};
use clap::{Parser, Subcommand};
use rapat_core::AttendanceStatus;
use uuid::Uuid;

#[derive(Parser, Debug)]
#[command(
    name = "rapat",
    version,
    about = "Pick meeting participants with a spinning wheel"
)]
pub struct Cli {
    /// Seed for reproducible draws
    #[arg(long, global = true, env = "RAPAT_SEED")]
    pub seed: Option<u64>,

    /// Config file (defaults to the platform config directory)
    #[arg(long, global = true, env = "RAPAT_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Manage the wheel roster
    #[command(subcommand)]
    Participants(ParticipantsCommand),
    /// Spin once and pick a winner
    Spin {
        /// Take the winner off the roster afterwards
        #[arg(long)]
        remove: bool,
    },
    /// Spin once per participant to produce a full random order
    Sequence,
    /// Add participants from an external source
    #[command(subcommand)]
    Import(ImportCommand),
    /// List upcoming calendar events
    Events {
        #[arg(long, default_value_t = 10)]
        max: u32,
    },
    /// Create a calendar event
    Schedule {
        summary: String,
        /// Start time, RFC 3339 (2024-06-10T09:00:00+07:00)
        #[arg(long, value_parser = parse_datetime)]
        start: DateTime<FixedOffset>,
        /// End time, RFC 3339
        #[arg(long, value_parser = parse_datetime)]
        end: DateTime<FixedOffset>,
        #[arg(long)]
        location: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    /// Manage meeting notes
    #[command(subcommand)]
    Notes(NotesCommand),
    /// Manage attendance records
    #[command(subcommand)]
    Attendance(AttendanceCommand),
    /// List noted meetings with their attendance
    Meetings,
}

#[derive(Subcommand, Debug)]
pub enum ParticipantsCommand {
    List,
    Add {
        #[arg(required = true)]
        names: Vec<String>,
    },
    Remove {
        name: String,
    },
    Clear,
}

#[derive(Subcommand, Debug)]
pub enum ImportCommand {
    /// Attendees of a calendar event
    Calendar { event_id: String },
    /// Participants marked present at a noted meeting
    Meeting { title: String },
}

#[derive(Subcommand, Debug)]
pub enum NotesCommand {
    Add {
        title: String,
        /// Meeting date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Start time (HH:MM)
        #[arg(long, value_parser = parse_time)]
        time: Option<NaiveTime>,
        #[arg(long, default_value = "")]
        place: String,
        #[arg(long, default_value = "")]
        agenda: String,
        /// What was discussed
        #[arg(long, default_value = "")]
        content: String,
        #[arg(long, default_value = "")]
        conclusion: String,
    },
    List,
    /// Print the full note for a meeting title
    Show {
        title: String,
    },
    Remove {
        id: Uuid,
    },
}

#[derive(Subcommand, Debug)]
pub enum AttendanceCommand {
    Add {
        name: String,
        #[arg(long)]
        meeting: String,
        /// Meeting date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
        /// hadir, tidak_hadir or izin
        #[arg(long, default_value = "hadir", value_parser = parse_status)]
        status: AttendanceStatus,
        /// Check-in time (HH:MM)
        #[arg(long)]
        check_in: Option<String>,
    },
    List,
    Remove {
        id: Uuid,
    },
}

fn parse_status(s: &str) -> Result<AttendanceStatus, String> {
    AttendanceStatus::parse(s).ok_or_else(|| format!("unknown status {s:?}"))
}

fn parse_time(s: &str) -> Result<NaiveTime, String> {
    NaiveTime::parse_from_str(s.trim(), "%H:%M").map_err(|e| format!("expected HH:MM: {e}"))
}

fn parse_datetime(s: &str) -> Result<DateTime<FixedOffset>, String> {
    DateTime::parse_from_rfc3339(s.trim()).map_err(|e| format!("expected RFC 3339: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_spin() {
        let cli = Cli::try_parse_from(["rapat", "spin", "--seed", "9"]).unwrap();
        assert_eq!(cli.seed, Some(9));
        assert!(matches!(cli.command, Command::Spin { remove: false }));

        let cli = Cli::try_parse_from(["rapat", "spin", "--remove"]).unwrap();
        assert!(matches!(cli.command, Command::Spin { remove: true }));
    }

    #[test]
    fn test_parse_notes_add() {
        let cli = Cli::try_parse_from([
            "rapat",
            "notes",
            "add",
            "Retro",
            "--date",
            "2024-06-01",
            "--time",
            "09:30",
            "--place",
            "Ruang 2",
        ])
        .unwrap();

        match cli.command {
            Command::Notes(NotesCommand::Add {
                title,
                time,
                place,
                agenda,
                ..
            }) => {
                assert_eq!(title, "Retro");
                assert_eq!(time, NaiveTime::from_hms_opt(9, 30, 0));
                assert_eq!(place, "Ruang 2");
                assert_eq!(agenda, "");
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_parse_schedule() {
        let cli = Cli::try_parse_from([
            "rapat",
            "schedule",
            "Sprint planning",
            "--start",
            "2024-06-10T09:00:00+07:00",
            "--end",
            "2024-06-10T10:00:00+07:00",
        ])
        .unwrap();
        let Command::Schedule { start, end, .. } = cli.command else {
            panic!("expected schedule");
        };
        assert_eq!((end - start).num_minutes(), 60);

        let bad = Cli::try_parse_from([
            "rapat",
            "schedule",
            "Retro",
            "--start",
            "tomorrow 9am",
            "--end",
            "2024-06-10T10:00:00+07:00",
        ]);
        assert!(bad.is_err());
    }

    #[test]
    fn test_parse_attendance_add() {
        let cli = Cli::try_parse_from([
            "rapat",
            "attendance",
            "add",
            "Ana",
            "--meeting",
            "Retro",
            "--date",
            "2024-06-01",
            "--status",
            "izin",
        ])
        .unwrap();

        match cli.command {
            Command::Attendance(AttendanceCommand::Add { name, date, status, .. }) => {
                assert_eq!(name, "Ana");
                assert_eq!(date, NaiveDate::from_ymd_opt(2024, 6, 1));
                assert_eq!(status, AttendanceStatus::Excused);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_rejects_unknown_status() {
        let result = Cli::try_parse_from([
            "rapat", "attendance", "add", "Ana", "--meeting", "Retro", "--status", "late",
        ]);
        assert!(result.is_err());
    }
}
