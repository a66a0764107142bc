//! Wheel geometry
//!
//! The circle is split into `n` equal segments in roster order. Segment `i`
//! spans `[i * w + rotation, (i + 1) * w + rotation)` with `w = 2π / n`.
//! A fixed pointer at [`POINTER_ANGLE`] selects the segment it overlaps.
//!
//! [`index_at`] is the only decode used anywhere: live pointer feedback,
//! the settled winner and sequential landings all go through it.

use std::f64::consts::{FRAC_PI_2, TAU};

use crate::identity::{color_of, initials_of, Color, ACCENT};
use crate::invariants::assert_segment_index;
use crate::models::Participant;
use crate::roster::Roster;

/// Screen angle of the fixed pointer (radians, canvas convention)
pub const POINTER_ANGLE: f64 = FRAC_PI_2;

/// Angular width of one segment
pub fn segment_width(segment_count: usize) -> f64 {
    TAU / segment_count as f64
}

/// Normalize an angle into `[0, 2π)`
pub fn normalize_angle(angle: f64) -> f64 {
    let normalized = angle.rem_euclid(TAU);
    // rem_euclid may round up to exactly TAU
    if normalized >= TAU {
        0.0
    } else {
        normalized
    }
}

/// Unrotated bounds of segment `index`
pub fn segment_bounds(segment_count: usize, index: usize) -> (f64, f64) {
    let width = segment_width(segment_count);
    (index as f64 * width, (index + 1) as f64 * width)
}

/// Index of the segment under the pointer, or `None` for an empty wheel
pub fn index_at(segment_count: usize, rotation: f64) -> Option<usize> {
    if segment_count == 0 {
        return None;
    }

    let adjusted = normalize_angle(POINTER_ANGLE - normalize_angle(rotation));
    let index = ((adjusted / segment_width(segment_count)).floor() as usize).min(segment_count - 1);
    assert_segment_index(index, segment_count);
    Some(index)
}

/// Segment under the pointer for a roster at the given rotation
pub fn segment_index_under_pointer(roster: &Roster, rotation: f64) -> Option<usize> {
    index_at(roster.len(), rotation)
}

/// Rotation (in `[0, 2π)`) that puts the pointer at `fraction` of the way
/// through segment `index`. `fraction` is clamped into `[0, 1)`.
pub fn rotation_for(segment_count: usize, index: usize, fraction: f64) -> f64 {
    let fraction = fraction.clamp(0.0, 1.0 - f64::EPSILON);
    let width = segment_width(segment_count);
    normalize_angle(POINTER_ANGLE - (index as f64 + fraction) * width)
}

/// One drawn segment
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentView {
    pub index: usize,
    pub participant: Participant,
    pub color: Color,
    pub initials: String,
    /// Rotated start angle (not normalized)
    pub start_angle: f64,
    /// Rotated end angle (not normalized)
    pub end_angle: f64,
}

impl SegmentView {
    /// Angle of the segment's center line, where the avatar label sits
    pub fn label_angle(&self) -> f64 {
        (self.start_angle + self.end_angle) / 2.0
    }
}

/// What the pointer currently indicates
#[derive(Debug, Clone, PartialEq)]
pub struct PointerView {
    pub index: usize,
    pub color: Color,
}

/// Visual state of the wheel at one rotation
#[derive(Debug, Clone, PartialEq)]
pub struct VisualFrame {
    pub rotation: f64,
    pub segments: Vec<SegmentView>,
    pub pointer: Option<PointerView>,
}

impl VisualFrame {
    /// An empty wheel renders a placeholder and has no pointer target
    pub fn is_placeholder(&self) -> bool {
        self.segments.is_empty()
    }

    /// Pointer color, falling back to the accent color on an empty wheel
    pub fn pointer_color(&self) -> Color {
        self.pointer.as_ref().map_or(ACCENT, |p| p.color)
    }

    /// Segment the pointer indicates
    pub fn pointed_segment(&self) -> Option<&SegmentView> {
        let pointer = self.pointer.as_ref()?;
        self.segments.get(pointer.index)
    }
}

/// Compute the full visual state for a roster at a rotation
pub fn render_frame(roster: &Roster, rotation: f64) -> VisualFrame {
    let count = roster.len();
    if count == 0 {
        return VisualFrame {
            rotation,
            segments: Vec::new(),
            pointer: None,
        };
    }

    let segments: Vec<SegmentView> = roster
        .iter()
        .enumerate()
        .map(|(index, participant)| {
            let (start, end) = segment_bounds(count, index);
            SegmentView {
                index,
                participant: participant.clone(),
                color: color_of(participant.name()),
                initials: initials_of(participant.name()),
                start_angle: start + rotation,
                end_angle: end + rotation,
            }
        })
        .collect();

    let pointer = index_at(count, rotation).map(|index| PointerView {
        index,
        color: segments[index].color,
    });

    VisualFrame {
        rotation,
        segments,
        pointer,
    }
}
