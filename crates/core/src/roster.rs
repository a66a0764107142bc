//! Participant roster
//!
//! Ordered, case-insensitively unique list of participants. Insertion order
//! defines wheel segment order.

use std::collections::HashSet;

use tracing::debug;

use crate::error::{Error, Result};
use crate::invariants::assert_roster_invariants;
use crate::models::{fold_case, Candidate, Participant};
use crate::storage::RosterStore;

/// Store key under which the roster is persisted
pub const PARTICIPANTS_KEY: &str = "participants";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Roster {
    participants: Vec<Participant>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a roster from stored names, skipping blanks and later duplicates
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut roster = Self::new();
        for name in names {
            if let Err(e) = roster.add(name.as_ref()) {
                debug!(error = %e, "Skipping stored participant");
            }
        }
        roster
    }

    /// Load the roster from a persistence capability
    pub fn load<S: RosterStore + ?Sized>(store: &S, key: &str) -> Result<Self> {
        Ok(Self::from_names(store.load_names(key)?))
    }

    /// Persist the roster
    pub fn save<S: RosterStore + ?Sized>(&self, store: &S, key: &str) -> Result<()> {
        store.save_names(key, &self.names())
    }

    pub fn len(&self) -> usize {
        self.participants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn get(&self, index: usize) -> Option<&Participant> {
        self.participants.get(index)
    }

    pub fn names(&self) -> Vec<String> {
        self.participants.iter().map(|p| p.name().to_string()).collect()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Participant> {
        self.participants.iter()
    }

    /// Whether a name is already present, ignoring case
    pub fn contains(&self, name: &str) -> bool {
        self.participants.iter().any(|p| p.same_person(name))
    }

    /// Position of an exact (case-sensitive) match
    pub fn position(&self, name: &str) -> Option<usize> {
        self.participants.iter().position(|p| p.name() == name)
    }

    /// Append a participant
    pub fn add(&mut self, name: &str) -> Result<&Participant> {
        let participant = Participant::new(name)?;
        if self.contains(participant.name()) {
            return Err(Error::Duplicate(participant.name().to_string()));
        }

        self.participants.push(participant);
        assert_roster_invariants(self);

        let index = self.participants.len() - 1;
        Ok(&self.participants[index])
    }

    /// Remove the first exact match. Absent names are not an error.
    pub fn remove(&mut self, name: &str) -> Option<Participant> {
        let index = self.position(name)?;
        Some(self.participants.remove(index))
    }

    pub fn clear(&mut self) {
        self.participants.clear();
    }

    /// Merge external candidates, appending only names not already present.
    ///
    /// Existing order is kept and new names follow in input order. Returns the
    /// participants that were added.
    pub fn import_merge<I, C>(&mut self, candidates: I) -> Vec<Participant>
    where
        I: IntoIterator<Item = C>,
        C: Into<Candidate>,
    {
        let mut seen: HashSet<String> = self
            .participants
            .iter()
            .map(|p| fold_case(p.name()))
            .collect();

        let mut added = Vec::new();
        for candidate in candidates {
            let Some(name) = candidate.into().resolved_name() else {
                continue;
            };
            let Ok(participant) = Participant::new(&name) else {
                continue;
            };
            if seen.insert(fold_case(participant.name())) {
                self.participants.push(participant.clone());
                added.push(participant);
            }
        }

        assert_roster_invariants(self);
        added
    }
}

impl<'a> IntoIterator for &'a Roster {
    type Item = &'a Participant;
    type IntoIter = std::slice::Iter<'a, Participant>;

    fn into_iter(self) -> Self::IntoIter {
        self.participants.iter()
    }
}
