//! Participant model

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A roster entry. The trimmed display name is the identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Participant(String);

impl Participant {
    /// Create a participant from raw input, trimming surrounding whitespace
    pub fn new(name: &str) -> Result<Self> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(Error::InvalidName(name.to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn name(&self) -> &str {
        &self.0
    }

    /// Case-insensitive identity comparison used for deduplication
    pub fn same_person(&self, other: &str) -> bool {
        fold_case(&self.0) == fold_case(other.trim())
    }
}

/// Lowercase key used for case-insensitive comparison
pub(crate) fn fold_case(name: &str) -> String {
    name.to_lowercase()
}

impl TryFrom<String> for Participant {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::new(&value)
    }
}

impl From<Participant> for String {
    fn from(p: Participant) -> Self {
        p.0
    }
}

impl AsRef<str> for Participant {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Participant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
