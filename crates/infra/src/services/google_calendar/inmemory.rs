use super::ICalendarProvider;
use anyhow::anyhow;
use calendar_notifier_domain::{CalendarEvent, Moment};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

#[derive(Default)]
struct InMemoryCalendar {
    title: String,
    events: Vec<CalendarEvent>,
}

/// Calendar provider with canned calendars, used when testing
#[derive(Default)]
pub struct InMemoryCalendarProvider {
    calendars: Mutex<HashMap<String, InMemoryCalendar>>,
    failing: Mutex<HashSet<String>>,
}

impl InMemoryCalendarProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_calendar(&self, calendar_id: &str, title: &str, events: Vec<CalendarEvent>) {
        let mut calendars = self.calendars.lock().unwrap();
        calendars.insert(
            calendar_id.to_string(),
            InMemoryCalendar {
                title: title.to_string(),
                events,
            },
        );
    }

    /// Every following request for `calendar_id` fails
    pub fn fail_calendar(&self, calendar_id: &str) {
        self.failing.lock().unwrap().insert(calendar_id.to_string());
    }

    fn check_available(&self, calendar_id: &str) -> anyhow::Result<()> {
        if self.failing.lock().unwrap().contains(calendar_id) {
            return Err(anyhow!("Calendar: {} is unavailable", calendar_id));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl ICalendarProvider for InMemoryCalendarProvider {
    async fn get_calendar_title(&self, calendar_id: &str) -> anyhow::Result<String> {
        self.check_available(calendar_id)?;
        let calendars = self.calendars.lock().unwrap();
        calendars
            .get(calendar_id)
            .map(|calendar| calendar.title.clone())
            .ok_or_else(|| anyhow!("Calendar: {} was not found", calendar_id))
    }

    async fn get_events(
        &self,
        calendar_id: &str,
        start: Moment,
        end: Moment,
    ) -> anyhow::Result<Vec<CalendarEvent>> {
        self.check_available(calendar_id)?;
        let calendars = self.calendars.lock().unwrap();
        let calendar = calendars
            .get(calendar_id)
            .ok_or_else(|| anyhow!("Calendar: {} was not found", calendar_id))?;
        let mut events = calendar
            .events
            .iter()
            .filter(|e| e.end > start && e.start < end)
            .cloned()
            .collect::<Vec<_>>();
        events.sort_by_key(|e| e.start);
        Ok(events)
    }
}
