//! Import candidates from external rosters

use serde::{Deserialize, Serialize};

/// A person offered by an external source (calendar attendee, attendance list).
///
/// Sources differ in which fields they fill, so both are optional and the
/// usable name is resolved by [`Candidate::resolved_name`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub display_name: Option<String>,
    pub identifier: Option<String>,
}

impl Candidate {
    pub fn new(display_name: Option<String>, identifier: Option<String>) -> Self {
        Self {
            display_name,
            identifier,
        }
    }

    /// A candidate known only by an email-like identifier
    pub fn from_identifier(identifier: impl Into<String>) -> Self {
        Self {
            display_name: None,
            identifier: Some(identifier.into()),
        }
    }

    /// Resolve the roster name: display name first, then the local part of
    /// the identifier before `@`. Returns `None` when neither is usable.
    pub fn resolved_name(&self) -> Option<String> {
        if let Some(name) = self.display_name.as_deref().map(str::trim) {
            if !name.is_empty() {
                return Some(name.to_string());
            }
        }

        let identifier = self.identifier.as_deref()?.trim();
        let local = identifier.split('@').next().unwrap_or_default().trim();
        if local.is_empty() {
            None
        } else {
            Some(local.to_string())
        }
    }
}

impl From<&str> for Candidate {
    fn from(name: &str) -> Self {
        Self {
            display_name: Some(name.to_string()),
            identifier: None,
        }
    }
}

impl From<String> for Candidate {
    fn from(name: String) -> Self {
        Self {
            display_name: Some(name),
            identifier: None,
        }
    }
}
