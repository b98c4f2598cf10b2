use crate::services::rest::RestApi;
use calendar_notifier_domain::{CalendarEvent, Moment};
use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::Deserialize;
use tracing::warn;

const GOOGLE_API_BASE_URL: &str = "https://www.googleapis.com/calendar/v3";
const PAGE_SIZE: usize = 250;
const UNTITLED_EVENT: &str = "(No title)";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoogleCalendarEventDateTime {
    #[serde(default)]
    date_time: Option<DateTime<Utc>>,
    /// Set instead of `date_time` for all day events
    #[serde(default)]
    date: Option<NaiveDate>,
}

impl GoogleCalendarEventDateTime {
    /// All day events start at midnight in the display timezone
    fn resolve(&self, timezone: &Tz) -> Option<Moment> {
        match (self.date_time, self.date) {
            (Some(date_time), _) => Some(date_time),
            (None, Some(date)) => date
                .and_hms_opt(0, 0, 0)?
                .and_local_timezone(*timezone)
                .earliest()
                .map(|d| d.with_timezone(&Utc)),
            (None, None) => None,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoogleCalendarEvent {
    pub id: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    pub start: GoogleCalendarEventDateTime,
    pub end: GoogleCalendarEventDateTime,
}

impl GoogleCalendarEvent {
    pub fn into_calendar_event(self, timezone: &Tz) -> Option<CalendarEvent> {
        if self.status.as_deref() == Some("cancelled") {
            return None;
        }
        let (start, end) = match (self.start.resolve(timezone), self.end.resolve(timezone)) {
            (Some(start), Some(end)) => (start, end),
            _ => {
                warn!("Skipping google calendar event: {} without start or end", self.id);
                return None;
            }
        };
        let title = match self.summary {
            Some(summary) if !summary.trim().is_empty() => summary,
            _ => UNTITLED_EVENT.to_string(),
        };
        Some(CalendarEvent {
            id: self.id,
            title,
            start,
            end,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListEventsResponse {
    #[serde(default)]
    pub items: Vec<GoogleCalendarEvent>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoogleCalendarResource {
    pub id: String,
    #[serde(default)]
    pub summary: String,
}

pub struct GoogleCalendarRestApi {
    api: RestApi,
}

impl GoogleCalendarRestApi {
    pub fn new(access_token: String) -> Self {
        Self {
            api: RestApi::new("Google Calendar", GOOGLE_API_BASE_URL, access_token),
        }
    }

    pub async fn get_calendar(&self, calendar_id: &str) -> anyhow::Result<GoogleCalendarResource> {
        self.api.get(&["calendars", calendar_id], &[]).await
    }

    /// Lists the single event instances, expanded from recurring events,
    /// that overlap `[time_min, time_max)` ordered by start time
    pub async fn list_events(
        &self,
        calendar_id: &str,
        time_min: Moment,
        time_max: Moment,
    ) -> anyhow::Result<Vec<GoogleCalendarEvent>> {
        let mut events = Vec::new();
        let mut page_token: Option<String> = None;
        loop {
            let mut query = vec![
                ("timeMin", time_min.to_rfc3339()),
                ("timeMax", time_max.to_rfc3339()),
                ("singleEvents", "true".to_string()),
                ("orderBy", "startTime".to_string()),
                ("maxResults", PAGE_SIZE.to_string()),
            ];
            if let Some(token) = page_token.take() {
                query.push(("pageToken", token));
            }
            let page: ListEventsResponse = self
                .api
                .get(&["calendars", calendar_id, "events"], &query)
                .await?;
            events.extend(page.items);
            match page.next_page_token {
                Some(token) => page_token = Some(token),
                None => return Ok(events),
            }
        }
    }
}
