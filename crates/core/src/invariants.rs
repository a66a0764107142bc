//! Developer guardrails and invariants
//!
//! Debug assertions for detecting impossible states during development.
//! These checks are compiled out in release builds.

use std::collections::HashSet;

use crate::models::{fold_case, Participant};
use crate::roster::Roster;

/// Validate that a roster has no blank or case-insensitively duplicated names
pub fn assert_roster_invariants(roster: &Roster) {
    if !cfg!(debug_assertions) {
        return;
    }

    let mut seen = HashSet::new();
    for participant in roster {
        debug_assert!(
            !participant.name().trim().is_empty(),
            "Roster contains a blank participant"
        );
        debug_assert!(
            seen.insert(fold_case(participant.name())),
            "Roster contains duplicate participant {:?}",
            participant.name()
        );
    }
}

/// Validate that a decoded segment index addresses the roster
pub fn assert_segment_index(index: usize, segment_count: usize) {
    debug_assert!(
        index < segment_count,
        "Segment index {} out of range for {} segments",
        index,
        segment_count
    );
}

/// Validate that a sequential order is a permutation of the roster
pub fn assert_permutation(roster: &Roster, order: &[Participant]) {
    if !cfg!(debug_assertions) {
        return;
    }

    debug_assert_eq!(
        order.len(),
        roster.len(),
        "Order has {} entries but roster has {}",
        order.len(),
        roster.len()
    );

    let expected: HashSet<&str> = roster.iter().map(Participant::name).collect();
    let actual: HashSet<&str> = order.iter().map(Participant::name).collect();
    debug_assert!(
        expected == actual && actual.len() == order.len(),
        "Order is not a permutation of the roster"
    );
}
