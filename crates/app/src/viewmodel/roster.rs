//! Roster view model

use rapat_core::{color_of, initials_of, Participant, Roster};

use super::wheel::swatch;
use crate::platform::ColorSupport;

pub fn participant_line(index: usize, participant: &Participant, support: ColorSupport) -> String {
    format!(
        "{:>3}. {} {:<3} {}",
        index + 1,
        swatch(color_of(participant.name()), support),
        initials_of(participant.name()),
        participant
    )
}

/// One line per participant in wheel order, or a hint for an empty roster
pub fn roster_lines(roster: &Roster, support: ColorSupport) -> Vec<String> {
    if roster.is_empty() {
        let hint = "No participants yet. Add some with `rapat participants add <name>`.";
        return vec![hint.to_string()];
    }

    roster
        .iter()
        .enumerate()
        .map(|(index, participant)| participant_line(index, participant, support))
        .collect()
}
