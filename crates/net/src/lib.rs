//! Rapat Network Library
//!
//! Pulls meeting attendees from an external calendar so they can be merged
//! into the wheel roster, and schedules new meetings on that calendar.
//!
//! # Usage
//!
//! ```ignore
//! let client = GoogleCalendarClient::from_settings(&config.calendar)?;
//! let importer = RosterImporter::from_settings(client, &config.calendar);
//!
//! let outcome = importer.fetch_candidates("event-id").await;
//! if let Some(notice) = &outcome.notice {
//!     eprintln!("{notice}");
//! }
//! session.merge_candidates(outcome.candidates);
//! ```

pub mod calendar;
pub mod error;
pub mod importer;

pub use calendar::{
    CalendarAttendee, CalendarEvent, CalendarProvider, EventTime, GoogleCalendarClient, NewEvent,
};
pub use error::{Error, Result};
pub use importer::RosterImporter;
