//! Calendar provider capability and the Google Calendar implementation

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, NaiveDate, SecondsFormat, Utc};
use rapat_core::{CalendarSettings, Candidate};
use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::error::{Error, Result};

/// An attendee as reported by the calendar
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarAttendee {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    /// `accepted`, `declined`, `tentative` or `needsAction`
    #[serde(default)]
    pub response_status: Option<String>,
    /// Rooms and other resources booked as attendees
    #[serde(default)]
    pub resource: bool,
}

impl CalendarAttendee {
    pub fn is_declined(&self) -> bool {
        self.response_status.as_deref() == Some("declined")
    }
}

impl From<CalendarAttendee> for Candidate {
    fn from(attendee: CalendarAttendee) -> Self {
        Candidate::new(attendee.display_name, attendee.email)
    }
}

/// Event start or end; all-day events only carry a date
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventTime {
    #[serde(default)]
    pub date_time: Option<DateTime<FixedOffset>>,
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

impl EventTime {
    /// Short human-readable label
    pub fn label(&self) -> String {
        match (self.date_time, self.date) {
            (Some(dt), _) => dt.format("%Y-%m-%d %H:%M").to_string(),
            (None, Some(date)) => date.format("%Y-%m-%d").to_string(),
            (None, None) => "-".to_string(),
        }
    }
}

/// A calendar event
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    pub id: String,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub start: Option<EventTime>,
    #[serde(default)]
    pub attendees: Vec<CalendarAttendee>,
}

impl CalendarEvent {
    pub fn title(&self) -> &str {
        self.summary
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or("(untitled)")
    }
}

#[derive(Debug, Deserialize)]
struct EventList {
    #[serde(default)]
    items: Vec<CalendarEvent>,
}

/// A meeting to schedule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEvent {
    pub summary: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
}

impl NewEvent {
    /// A titled event; the end must come after the start
    pub fn new(
        summary: &str,
        start: DateTime<FixedOffset>,
        end: DateTime<FixedOffset>,
    ) -> Result<Self> {
        let summary = summary.trim();
        if summary.is_empty() {
            return Err(Error::InvalidEvent("summary is empty".to_string()));
        }
        if end <= start {
            return Err(Error::InvalidEvent(format!(
                "end {end} is not after start {start}"
            )));
        }
        Ok(Self {
            summary: summary.to_string(),
            description: None,
            location: None,
            start,
            end,
        })
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EventBoundary<'a> {
    date_time: String,
    time_zone: &'a str,
}

#[derive(Debug, Serialize)]
struct EventBody<'a> {
    summary: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    location: Option<&'a str>,
    start: EventBoundary<'a>,
    end: EventBoundary<'a>,
}

impl<'a> EventBody<'a> {
    fn new(event: &'a NewEvent, time_zone: &'a str) -> Self {
        let boundary = move |at: &DateTime<FixedOffset>| EventBoundary {
            date_time: at.to_rfc3339_opts(SecondsFormat::Secs, false),
            time_zone,
        };
        Self {
            summary: &event.summary,
            description: event.description.as_deref(),
            location: event.location.as_deref(),
            start: boundary(&event.start),
            end: boundary(&event.end),
        }
    }
}

/// Source of meeting attendees
#[async_trait]
pub trait CalendarProvider: Send + Sync {
    /// Attendees of an event, excluding those who declined
    async fn list_attendees(&self, event_id: &str) -> Result<Vec<CalendarAttendee>>;

    /// Upcoming events on the configured calendar, soonest first
    async fn upcoming_events(&self, max_results: u32) -> Result<Vec<CalendarEvent>>;

    /// Schedule an event on the configured calendar
    async fn create_event(&self, event: &NewEvent) -> Result<CalendarEvent>;
}

#[derive(Debug, Clone)]
enum Auth {
    Bearer(String),
    ApiKey(String),
}

/// Google Calendar v3 REST client
#[derive(Debug, Clone)]
pub struct GoogleCalendarClient {
    http: Client,
    base_url: String,
    calendar_id: String,
    time_zone: String,
    auth: Auth,
}

impl GoogleCalendarClient {
    /// Build a client from settings; a bearer token wins over an API key
    pub fn from_settings(settings: &CalendarSettings) -> Result<Self> {
        let auth = match (&settings.access_token, &settings.api_key) {
            (Some(token), _) => Auth::Bearer(token.clone()),
            (None, Some(key)) => Auth::ApiKey(key.clone()),
            (None, None) => {
                return Err(Error::NotConfigured(
                    "set calendar.access_token, calendar.api_key or RAPAT_CALENDAR_TOKEN"
                        .to_string(),
                ))
            }
        };

        let http = Client::builder().timeout(settings.timeout()).build()?;
        Ok(Self {
            http,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            calendar_id: settings.calendar_id.clone(),
            time_zone: settings.time_zone.clone(),
            auth,
        })
    }

    fn events_url(&self) -> String {
        format!(
            "{}/calendars/{}/events",
            self.base_url,
            urlencoding::encode(&self.calendar_id)
        )
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.auth {
            Auth::Bearer(token) => request.bearer_auth(token),
            Auth::ApiKey(key) => request.query(&[("key", key)]),
        }
    }

    async fn send_json<T>(&self, request: RequestBuilder) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        let response = self.authorize(request).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            warn!(status, "Calendar API error");
            return Err(Error::Status { status, body });
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl CalendarProvider for GoogleCalendarClient {
    #[instrument(skip(self))]
    async fn list_attendees(&self, event_id: &str) -> Result<Vec<CalendarAttendee>> {
        let url = format!("{}/{}", self.events_url(), urlencoding::encode(event_id));
        let event: CalendarEvent = self.send_json(self.http.get(url)).await?;

        let total = event.attendees.len();
        let attendees: Vec<CalendarAttendee> = event
            .attendees
            .into_iter()
            .filter(|a| !a.is_declined() && !a.resource)
            .collect();
        debug!(total, kept = attendees.len(), "Fetched attendees");
        Ok(attendees)
    }

    #[instrument(skip(self))]
    async fn upcoming_events(&self, max_results: u32) -> Result<Vec<CalendarEvent>> {
        let time_min = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
        let request = self.http.get(self.events_url()).query(&[
            ("timeMin", time_min),
            ("maxResults", max_results.to_string()),
            ("singleEvents", "true".to_string()),
            ("orderBy", "startTime".to_string()),
        ]);

        let list: EventList = self.send_json(request).await?;
        debug!(count = list.items.len(), "Fetched upcoming events");
        Ok(list.items)
    }

    #[instrument(skip(self, event), fields(summary = %event.summary))]
    async fn create_event(&self, event: &NewEvent) -> Result<CalendarEvent> {
        let body = EventBody::new(event, &self.time_zone);
        let request = self.http.post(self.events_url()).json(&body);

        let created: CalendarEvent = self.send_json(request).await?;
        info!(id = %created.id, "Calendar event created");
        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn settings(server: &MockServer) -> CalendarSettings {
        CalendarSettings {
            base_url: server.uri(),
            access_token: Some("token-123".to_string()),
            ..CalendarSettings::default()
        }
    }

    #[test]
    fn test_requires_credentials() {
        let result = GoogleCalendarClient::from_settings(&CalendarSettings::default());
        assert!(matches!(result, Err(Error::NotConfigured(_))));
    }

    #[test]
    fn test_attendee_to_candidate() {
        let attendee = CalendarAttendee {
            email: Some("budi@example.com".to_string()),
            ..CalendarAttendee::default()
        };
        let candidate = Candidate::from(attendee);
        assert_eq!(candidate.resolved_name().as_deref(), Some("budi"));
    }

    #[tokio::test]
    async fn test_list_attendees_skips_declined() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/calendars/primary/events/evt-1"))
            .and(header("authorization", "Bearer token-123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "evt-1",
                "summary": "Weekly sync",
                "attendees": [
                    { "email": "ana@example.com", "displayName": "Ana", "responseStatus": "accepted" },
                    { "email": "budi@example.com", "responseStatus": "declined" },
                    { "email": "citra@example.com", "responseStatus": "needsAction" },
                    { "email": "room-1@resource.example.com", "resource": true }
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = GoogleCalendarClient::from_settings(&settings(&server)).unwrap();
        let attendees = client.list_attendees("evt-1").await.unwrap();

        let emails: Vec<_> = attendees.iter().filter_map(|a| a.email.as_deref()).collect();
        assert_eq!(emails, vec!["ana@example.com", "citra@example.com"]);
        assert_eq!(attendees[0].display_name.as_deref(), Some("Ana"));
    }

    #[tokio::test]
    async fn test_event_without_attendees() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/calendars/primary/events/solo"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "solo" })))
            .mount(&server)
            .await;

        let client = GoogleCalendarClient::from_settings(&settings(&server)).unwrap();
        assert!(client.list_attendees("solo").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401).set_body_string("invalid credentials"))
            .mount(&server)
            .await;

        let client = GoogleCalendarClient::from_settings(&settings(&server)).unwrap();
        match client.list_attendees("evt-1").await {
            Err(Error::Status { status, body }) => {
                assert_eq!(status, 401);
                assert_eq!(body, "invalid credentials");
            }
            other => panic!("unexpected result {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_upcoming_events_with_api_key() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/calendars/team%40example.com/events"))
            .and(query_param("key", "k-1"))
            .and(query_param("maxResults", "5"))
            .and(query_param("singleEvents", "true"))
            .and(query_param("orderBy", "startTime"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [
                    {
                        "id": "a",
                        "summary": "Standup",
                        "start": { "dateTime": "2024-06-03T09:00:00+07:00" }
                    },
                    { "id": "b", "summary": "  ", "start": { "date": "2024-06-04" } }
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let settings = CalendarSettings {
            base_url: format!("{}/", server.uri()),
            calendar_id: "team@example.com".to_string(),
            api_key: Some("k-1".to_string()),
            ..CalendarSettings::default()
        };
        let client = GoogleCalendarClient::from_settings(&settings).unwrap();
        let events = client.upcoming_events(5).await.unwrap();

        assert_eq!(events.len(), 2);
        assert_eq!(events[0].title(), "Standup");
        assert_eq!(events[0].start.as_ref().unwrap().label(), "2024-06-03 09:00");
        assert_eq!(events[1].title(), "(untitled)");
        assert_eq!(events[1].start.as_ref().unwrap().label(), "2024-06-04");
    }

    fn at(s: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(s).unwrap()
    }

    #[test]
    fn test_new_event_validation() {
        let start = at("2024-06-10T09:00:00+07:00");
        let end = at("2024-06-10T10:00:00+07:00");

        assert!(matches!(NewEvent::new("  ", start, end), Err(Error::InvalidEvent(_))));
        assert!(matches!(NewEvent::new("Retro", end, start), Err(Error::InvalidEvent(_))));
        assert!(matches!(NewEvent::new("Retro", start, start), Err(Error::InvalidEvent(_))));
        assert_eq!(NewEvent::new(" Retro ", start, end).unwrap().summary, "Retro");
    }

    #[tokio::test]
    async fn test_create_event() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/calendars/primary/events"))
            .and(header("authorization", "Bearer token-123"))
            .and(body_json(json!({
                "summary": "Sprint planning",
                "location": "Ruang 2",
                "start": { "dateTime": "2024-06-10T09:00:00+07:00", "timeZone": "Asia/Jakarta" },
                "end": { "dateTime": "2024-06-10T10:30:00+07:00", "timeZone": "Asia/Jakarta" }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "new-1",
                "summary": "Sprint planning",
                "start": { "dateTime": "2024-06-10T09:00:00+07:00" }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = GoogleCalendarClient::from_settings(&settings(&server)).unwrap();
        let event = NewEvent::new(
            "Sprint planning",
            at("2024-06-10T09:00:00+07:00"),
            at("2024-06-10T10:30:00+07:00"),
        )
        .unwrap()
        .with_location("Ruang 2");

        let created = client.create_event(&event).await.unwrap();
        assert_eq!(created.id, "new-1");
        assert_eq!(created.title(), "Sprint planning");
    }

    #[tokio::test]
    async fn test_create_event_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(403).set_body_string("insufficient scope"))
            .mount(&server)
            .await;

        let client = GoogleCalendarClient::from_settings(&settings(&server)).unwrap();
        let event = NewEvent::new(
            "Retro",
            at("2024-06-10T09:00:00+07:00"),
            at("2024-06-10T10:00:00+07:00"),
        )
        .unwrap();

        match client.create_event(&event).await {
            Err(Error::Status { status, .. }) => assert_eq!(status, 403),
            other => panic!("unexpected result {other:?}"),
        }
    }
}
