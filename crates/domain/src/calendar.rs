use crate::{notification::RuleKind, tick::Moment};

/// A concrete event instance returned by the calendar provider
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarEvent {
    pub id: String,
    pub title: String,
    pub start: Moment,
    pub end: Moment,
}

/// One row of the calendar configuration sheet.
///
/// Each of the rule configs is optional and an empty string is treated the
/// same as a missing value.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CalendarRuleConfig {
    pub calendar_id: String,
    /// Name of the channel the notifications are delivered to
    pub channel: String,
    /// `HH:MM` at which a digest of today's events is sent
    pub daily: Option<String>,
    /// `HH:MM` at which a digest of this week's events is sent on Mondays
    pub weekly: Option<String>,
    /// Number of minutes before each event to notify about it
    pub before: Option<String>,
}

impl CalendarRuleConfig {
    /// The configured rules in `daily`, `weekly`, `before` order
    pub fn rules(&self) -> Vec<(RuleKind, &str)> {
        [
            (RuleKind::Daily, &self.daily),
            (RuleKind::Weekly, &self.weekly),
            (RuleKind::Before, &self.before),
        ]
        .into_iter()
        .filter_map(|(kind, config)| match config.as_deref().map(str::trim) {
            Some(config) if !config.is_empty() => Some((kind, config)),
            _ => None,
        })
        .collect()
    }
}
