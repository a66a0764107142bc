//! Rapat Core Library
//!
//! Participant roster, wheel geometry, spin animation and the selection
//! session for picking meeting participants at random, plus meeting notes,
//! attendance storage and configuration.

pub mod config;
pub mod error;
pub mod identity;
pub mod import;
pub mod invariants;
pub mod models;
pub mod roster;
pub mod session;
pub mod storage;
pub mod wheel;

pub use config::{AppConfig, CalendarSettings, WheelSettings};
pub use error::{Error, Result};
pub use identity::{color_of, initials_of, Color, ACCENT, PALETTE};
pub use import::{import_from_meeting, ImportOutcome};
pub use models::*;
pub use roster::{Roster, PARTICIPANTS_KEY};
pub use session::{
    DrawMode, MergeOutcome, SelectionResult, SelectionSession, SessionEvent, SessionTiming,
    SpinPhase, SpinState,
};
pub use storage::{AttendanceRepository, Database, NotesRepository, RosterStore, Storage};
