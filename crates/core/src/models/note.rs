//! Meeting notes (minutes)

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};

/// Minutes of one meeting. The title is also the meeting name that
/// attendance records refer to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeetingNote {
    pub id: Uuid,
    pub title: String,
    pub date: NaiveDate,
    pub time: Option<NaiveTime>,
    pub place: String,
    pub agenda: String,
    /// Discussion
    pub content: String,
    pub conclusion: String,
}

impl MeetingNote {
    /// Create a note; the title is trimmed and must not be blank
    pub fn new(title: &str, date: NaiveDate) -> Result<Self> {
        let title = title.trim();
        if title.is_empty() {
            return Err(Error::InvalidNote("title is empty".to_string()));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            title: title.to_string(),
            date,
            time: None,
            place: String::new(),
            agenda: String::new(),
            content: String::new(),
            conclusion: String::new(),
        })
    }

    pub fn with_time(mut self, time: NaiveTime) -> Self {
        self.time = Some(time);
        self
    }

    pub fn with_place(mut self, place: impl Into<String>) -> Self {
        self.place = place.into();
        self
    }

    pub fn with_agenda(mut self, agenda: impl Into<String>) -> Self {
        self.agenda = agenda.into();
        self
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    pub fn with_conclusion(mut self, conclusion: impl Into<String>) -> Self {
        self.conclusion = conclusion.into();
        self
    }
}
