use crate::{
    calendar::CalendarEvent,
    trigger::{RuleError, Trigger},
};
use base64::{engine::general_purpose::STANDARD, Engine};
use std::fmt::Display;
use uuid::Uuid;

const CALENDAR_EVENT_URL: &str = "https://calendar.google.com/calendar/u/0/event?eid=";
const GROUP_CALENDAR_SUFFIX: &str = "@group.calendar.google.com";

/// Identifies all the `NotificationRule`s produced from one
/// `CalendarRuleConfig` row during one schedule build.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RuleSetId(String);

impl RuleSetId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for RuleSetId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for RuleSetId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl Display for RuleSetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RuleKind {
    Daily,
    Weekly,
    Before,
    /// A kind read back from storage that this version does not know about
    Unknown(String),
}

impl RuleKind {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Before => "before",
            Self::Unknown(kind) => kind,
        }
    }
}

impl From<&str> for RuleKind {
    fn from(kind: &str) -> Self {
        match kind.trim() {
            "daily" => Self::Daily,
            "weekly" => Self::Weekly,
            "before" => Self::Before,
            other => Self::Unknown(other.to_string()),
        }
    }
}

impl Display for RuleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A `NotificationRule` is one persisted row of the notification schedule:
/// a rule of some kind attached to one upcoming `CalendarEvent`.
///
/// Rules are never mutated after a schedule build, the tick dispatcher only
/// reads and classifies them.
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationRule {
    pub rule_set_id: RuleSetId,
    pub kind: RuleKind,
    /// `HH:MM` for `daily` and `weekly`, a minute count for `before`
    pub config: String,
    pub channel: String,
    pub calendar_id: String,
    pub calendar_title: String,
    pub event: CalendarEvent,
}

impl NotificationRule {
    pub fn trigger(&self) -> Result<Trigger, RuleError> {
        Trigger::parse(&self.kind, &self.config)
    }

    pub fn eid(&self) -> String {
        event_eid(&self.event.id, &self.calendar_id)
    }

    pub fn url(&self) -> String {
        event_url(&self.eid())
    }
}

/// The `eid` query parameter Google Calendar uses to deep link to an event.
///
/// Only the first trailing padding character is dropped, links produced this
/// way are what users already have bookmarked.
pub fn event_eid(event_id: &str, calendar_id: &str) -> String {
    let calendar_fragment = match calendar_id.strip_suffix(GROUP_CALENDAR_SUFFIX) {
        Some(prefix) => format!("{}@g", prefix),
        None => calendar_id.to_string(),
    };
    let event_fragment = event_id.split('@').next().unwrap_or(event_id);

    let encoded = STANDARD.encode(format!("{} {}", event_fragment, calendar_fragment));
    match encoded.strip_suffix('=') {
        Some(trimmed) => trimmed.to_string(),
        None => encoded,
    }
}

pub fn event_url(eid: &str) -> String {
    format!("{}{}", CALENDAR_EVENT_URL, eid)
}
