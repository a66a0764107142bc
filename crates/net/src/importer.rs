//! Roster import from a calendar event
//!
//! Wraps a [`CalendarProvider`] with a per-attempt timeout and a bounded
//! number of attempts. Failures never reach the caller as errors: they turn
//! into an empty [`ImportOutcome`] with a notice.

use std::time::Duration;

use rapat_core::{CalendarSettings, Candidate, ImportOutcome};
use tracing::{info, warn};

use crate::calendar::{CalendarAttendee, CalendarProvider};
use crate::error::{Error, Result};

pub struct RosterImporter<P> {
    provider: P,
    timeout: Duration,
    max_attempts: u32,
}

impl<P: CalendarProvider> RosterImporter<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            timeout: Duration::from_secs(5),
            max_attempts: 2,
        }
    }

    pub fn from_settings(provider: P, settings: &CalendarSettings) -> Self {
        Self::new(provider)
            .with_timeout(settings.timeout())
            .with_max_attempts(settings.attempts())
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Fetch import candidates for a calendar event
    pub async fn fetch_candidates(&self, event_id: &str) -> ImportOutcome {
        let source = format!("calendar event {event_id}");
        match self.fetch_with_retry(event_id).await {
            Ok(attendees) => {
                info!(event_id, count = attendees.len(), "Fetched calendar attendees");
                let candidates = attendees.into_iter().map(Candidate::from).collect();
                ImportOutcome::found(&source, candidates)
            }
            Err(e) => {
                warn!(event_id, error = %e, "Calendar import failed");
                ImportOutcome::unavailable(&source, e)
            }
        }
    }

    async fn fetch_with_retry(&self, event_id: &str) -> Result<Vec<CalendarAttendee>> {
        let mut attempt = 1;
        loop {
            match self.fetch_once(event_id).await {
                Ok(attendees) => return Ok(attendees),
                Err(e) if e.is_retryable() && attempt < self.max_attempts => {
                    warn!(attempt, error = %e, "Calendar request failed, retrying");
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn fetch_once(&self, event_id: &str) -> Result<Vec<CalendarAttendee>> {
        tokio::time::timeout(self.timeout, self.provider.list_attendees(event_id))
            .await
            .map_err(|_| Error::Timeout(self.timeout))?
    }
}
