//! Text view models
//!
//! Turn core state into lines of terminal output. Nothing here writes to the
//! terminal itself.

mod meetings;
mod roster;
mod wheel;

pub use meetings::{attendance_line, event_line, meeting_line, note_line, note_lines};
pub use roster::{participant_line, roster_lines};
pub use wheel::{frame_line, order_lines, reveal_line, swatch, winner_line};
