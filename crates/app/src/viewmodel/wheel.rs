//! Wheel view model

use rapat_core::wheel::VisualFrame;
use rapat_core::{color_of, initials_of, Color, Participant};

use crate::platform::ColorSupport;

/// Color sample for a participant
pub fn swatch(color: Color, support: ColorSupport) -> String {
    if support.is_truecolor() {
        format!("\x1b[48;2;{};{};{}m  \x1b[0m", color.r, color.g, color.b)
    } else {
        format!("[{}]", color.to_hex())
    }
}

/// Status line for one animation frame: what the pointer is over right now
pub fn frame_line(frame: &VisualFrame, support: ColorSupport) -> String {
    match frame.pointed_segment() {
        Some(segment) => format!(
            "{} {:<3} {}",
            swatch(segment.color, support),
            segment.initials,
            segment.participant
        ),
        None => format!("{} (no participants)", swatch(frame.pointer_color(), support)),
    }
}

pub fn winner_line(winner: &Participant, support: ColorSupport) -> String {
    format!(
        "Selected: {} {} ({})",
        swatch(color_of(winner.name()), support),
        winner,
        initials_of(winner.name())
    )
}

/// Line announcing sequential cycle `cycle` (0-based)
pub fn reveal_line(cycle: usize, participant: &Participant, support: ColorSupport) -> String {
    format!(
        "{:>3}. {} {}",
        cycle + 1,
        swatch(color_of(participant.name()), support),
        participant
    )
}

/// Numbered final order
pub fn order_lines(order: &[Participant], support: ColorSupport) -> Vec<String> {
    order
        .iter()
        .enumerate()
        .map(|(cycle, participant)| reveal_line(cycle, participant, support))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rapat_core::wheel::render_frame;
    use rapat_core::{Roster, ACCENT};

    #[test]
    fn test_swatch() {
        let color = Color {
            r: 255,
            g: 23,
            b: 68,
        };
        assert_eq!(swatch(color, ColorSupport::Plain), "[#FF1744]");
        assert_eq!(
            swatch(color, ColorSupport::TrueColor),
            "\x1b[48;2;255;23;68m  \x1b[0m"
        );
    }

    #[test]
    fn test_frame_line_names_pointed_participant() {
        let roster = Roster::from_names(["Ana Putri", "Budi"]);
        let frame = render_frame(&roster, 0.3);
        let segment = frame.pointed_segment().unwrap();

        let line = frame_line(&frame, ColorSupport::Plain);
        assert!(line.contains(segment.participant.name()));
        assert!(line.contains(&segment.color.to_hex()));
    }

    #[test]
    fn test_empty_frame_line() {
        let frame = render_frame(&Roster::new(), 0.0);
        let line = frame_line(&frame, ColorSupport::Plain);
        assert!(line.contains("no participants"));
        assert!(line.contains(&ACCENT.to_hex()));
    }

    #[test]
    fn test_order_lines() {
        let order = vec![
            Participant::new("Citra").unwrap(),
            Participant::new("Ana").unwrap(),
        ];
        let lines = order_lines(&order, ColorSupport::Plain);
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("  1. "));
        assert!(lines[0].ends_with("Citra"));
        assert!(lines[1].ends_with("Ana"));
    }

    #[test]
    fn test_winner_line() {
        let winner = Participant::new("Dewi Lestari").unwrap();
        let line = winner_line(&winner, ColorSupport::Plain);
        assert!(line.contains("Dewi Lestari"));
        assert!(line.ends_with("(DL)"));
    }
}
