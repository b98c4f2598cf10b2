use crate::{
    notification::RuleKind,
    tick::{Moment, TickWindow},
};
use chrono::{Duration, NaiveTime};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RuleError {
    #[error("Unknown notification kind: `{0}`")]
    UnknownKind(String),
    #[error("Invalid time of day: `{0}`, expected HH:MM")]
    InvalidTimeOfDay(String),
    #[error("Invalid number of minutes: `{0}`")]
    InvalidMinutes(String),
}

/// The typed form of a `NotificationRule`'s kind and config
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// Fires every day at the given wall clock time
    Daily(NaiveTime),
    /// Fires at the given wall clock time, but only on Mondays
    Weekly(NaiveTime),
    /// Fires this long before the event starts
    Before(Duration),
}

impl Trigger {
    pub fn parse(kind: &RuleKind, config: &str) -> Result<Self, RuleError> {
        match kind {
            RuleKind::Daily => parse_time_of_day(config).map(Self::Daily),
            RuleKind::Weekly => parse_time_of_day(config).map(Self::Weekly),
            RuleKind::Before => parse_minutes(config).map(Self::Before),
            RuleKind::Unknown(kind) => Err(RuleError::UnknownKind(kind.clone())),
        }
    }

    pub fn kind(&self) -> RuleKind {
        match self {
            Self::Daily(_) => RuleKind::Daily,
            Self::Weekly(_) => RuleKind::Weekly,
            Self::Before(_) => RuleKind::Before,
        }
    }

    /// The instant this trigger fires at relative to the given tick, or `None`
    /// if it cannot fire during this tick at all.
    pub fn instant(
        &self,
        window: &TickWindow,
        event_start: Moment,
        is_monday_tick: bool,
    ) -> Option<Moment> {
        match self {
            Self::Daily(at) => window.day_at(*at),
            Self::Weekly(at) if is_monday_tick => window.day_at(*at),
            Self::Weekly(_) => None,
            Self::Before(lead) => Some(event_start - *lead),
        }
    }
}

fn strip_quote(config: &str) -> &str {
    let config = config.trim();
    config.strip_prefix('\'').unwrap_or(config)
}

/// Accepts `H:MM`, `HH:MM` and `HH:MM:SS` (seconds are ignored)
pub fn parse_time_of_day(config: &str) -> Result<NaiveTime, RuleError> {
    let invalid = || RuleError::InvalidTimeOfDay(config.to_string());

    let parts = strip_quote(config).split(':').collect::<Vec<_>>();
    if parts.len() != 2 && parts.len() != 3 {
        return Err(invalid());
    }
    let mut numbers = Vec::with_capacity(parts.len());
    for part in &parts {
        if part.is_empty() || part.len() > 2 || !part.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }
        numbers.push(part.parse::<u32>().map_err(|_| invalid())?);
    }

    NaiveTime::from_hms_opt(numbers[0], numbers[1], 0).ok_or_else(invalid)
}

pub fn parse_minutes(config: &str) -> Result<Duration, RuleError> {
    match strip_quote(config).parse::<i64>() {
        Ok(minutes) if (0..=MAX_LEAD_MINUTES).contains(&minutes) => Ok(Duration::minutes(minutes)),
        _ => Err(RuleError::InvalidMinutes(config.to_string())),
    }
}

// Nothing further ahead than the schedule lookahead can ever fire
const MAX_LEAD_MINUTES: i64 = 7 * 24 * 60;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tick::TickLength;
    use chrono::{DateTime, Utc};
    use chrono_tz::UTC;

    fn utc(s: &str) -> Moment {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    fn hm(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn it_parses_times_of_day() {
        assert_eq!(parse_time_of_day("09:00"), Ok(hm(9, 0)));
        assert_eq!(parse_time_of_day("9:05"), Ok(hm(9, 5)));
        assert_eq!(parse_time_of_day("'18:30"), Ok(hm(18, 30)));
        assert_eq!(parse_time_of_day(" 23:59:00 "), Ok(hm(23, 59)));
        assert_eq!(parse_time_of_day("00:00"), Ok(hm(0, 0)));
    }

    #[test]
    fn it_rejects_malformed_times_of_day() {
        for config in ["", "9", "24:00", "12:60", "ab:cd", "12:5x", "-1:00", "123:00", "1:2:3:4"] {
            assert_eq!(
                parse_time_of_day(config),
                Err(RuleError::InvalidTimeOfDay(config.to_string())),
                "{}",
                config
            );
        }
    }

    #[test]
    fn it_parses_minutes() {
        assert_eq!(parse_minutes("30"), Ok(Duration::minutes(30)));
        assert_eq!(parse_minutes("'15"), Ok(Duration::minutes(15)));
        assert_eq!(parse_minutes("0"), Ok(Duration::zero()));
        assert!(parse_minutes("thirty").is_err());
        assert!(parse_minutes("-5").is_err());
        assert!(parse_minutes("1.5").is_err());
        assert!(parse_minutes("").is_err());
    }

    #[test]
    fn it_builds_triggers_from_kind_and_config() {
        assert_eq!(
            Trigger::parse(&RuleKind::Daily, "09:00"),
            Ok(Trigger::Daily(hm(9, 0)))
        );
        assert_eq!(
            Trigger::parse(&RuleKind::Weekly, "08:30"),
            Ok(Trigger::Weekly(hm(8, 30)))
        );
        assert_eq!(
            Trigger::parse(&RuleKind::Before, "30"),
            Ok(Trigger::Before(Duration::minutes(30)))
        );
        assert_eq!(
            Trigger::parse(&RuleKind::Unknown("monthly".into()), "1"),
            Err(RuleError::UnknownKind("monthly".into()))
        );
        assert_eq!(Trigger::Before(Duration::minutes(1)).kind(), RuleKind::Before);
    }

    #[test]
    fn it_computes_trigger_instants() {
        let window = TickWindow::containing(utc("2024-01-02T09:00:00Z"), TickLength::default(), UTC);
        let event_start = utc("2024-01-03T10:00:00Z");

        assert_eq!(
            Trigger::Daily(hm(9, 0)).instant(&window, event_start, false),
            Some(utc("2024-01-02T09:00:00Z"))
        );
        assert_eq!(Trigger::Weekly(hm(9, 0)).instant(&window, event_start, false), None);
        assert_eq!(
            Trigger::Weekly(hm(9, 0)).instant(&window, event_start, true),
            Some(utc("2024-01-02T09:00:00Z"))
        );
        assert_eq!(
            Trigger::Before(Duration::minutes(45)).instant(&window, event_start, false),
            Some(utc("2024-01-03T09:15:00Z"))
        );
    }
}
