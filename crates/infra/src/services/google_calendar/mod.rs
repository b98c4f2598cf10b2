mod calendar_api;
mod inmemory;

use calendar_api::GoogleCalendarRestApi;
use calendar_notifier_domain::{CalendarEvent, Moment};
use chrono_tz::Tz;
pub use inmemory::InMemoryCalendarProvider;

// https://developers.google.com/calendar/api/v3/reference/events/list

/// Source of the events the notifications are built from
#[async_trait::async_trait]
pub trait ICalendarProvider: Send + Sync {
    /// Human readable name of the calendar
    async fn get_calendar_title(&self, calendar_id: &str) -> anyhow::Result<String>;

    /// Event instances overlapping `[start, end)` ordered by start time.
    /// Recurring events are expanded into their single instances.
    async fn get_events(
        &self,
        calendar_id: &str,
        start: Moment,
        end: Moment,
    ) -> anyhow::Result<Vec<CalendarEvent>>;
}

pub struct GoogleCalendarProvider {
    api: GoogleCalendarRestApi,
    timezone: Tz,
}

impl GoogleCalendarProvider {
    pub fn new(access_token: String, timezone: Tz) -> Self {
        Self {
            api: GoogleCalendarRestApi::new(access_token),
            timezone,
        }
    }
}

#[async_trait::async_trait]
impl ICalendarProvider for GoogleCalendarProvider {
    async fn get_calendar_title(&self, calendar_id: &str) -> anyhow::Result<String> {
        let calendar = self.api.get_calendar(calendar_id).await?;
        if calendar.summary.is_empty() {
            return Ok(calendar.id);
        }
        Ok(calendar.summary)
    }

    async fn get_events(
        &self,
        calendar_id: &str,
        start: Moment,
        end: Moment,
    ) -> anyhow::Result<Vec<CalendarEvent>> {
        let events = self.api.list_events(calendar_id, start, end).await?;
        Ok(events
            .into_iter()
            .filter_map(|e| e.into_calendar_event(&self.timezone))
            .collect())
    }
}
