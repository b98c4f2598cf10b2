use crate::{
    calendar::{CalendarEvent, CalendarRuleConfig},
    notification::{NotificationRule, RuleKind, RuleSetId},
    tick::Moment,
};
use chrono::{Datelike, Duration};
use chrono_tz::Tz;

/// How `weekly` rules pick the events of the current week
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WeeklyPolicy {
    /// Events whose weekday (counted from Sunday) is not before today's.
    /// Late in the week this leaves out events of the next week, including
    /// the coming Sunday when run on a Monday.
    #[default]
    SameWeek,
    /// Every upcoming event within the lookahead
    Wraparound,
}

/// The point in time and the settings a schedule is built with
#[derive(Debug, Clone, Copy)]
pub struct ScheduleHorizon {
    pub now: Moment,
    pub timezone: Tz,
    pub lookahead: Duration,
    pub weekly_policy: WeeklyPolicy,
}

impl ScheduleHorizon {
    /// The interval of events to fetch from the calendar provider
    pub fn fetch_range(&self) -> (Moment, Moment) {
        (self.now, self.now + self.lookahead)
    }

    fn is_upcoming_today(&self, start: &Moment) -> bool {
        *start >= self.now
            && start.with_timezone(&self.timezone).date_naive()
                == self.now.with_timezone(&self.timezone).date_naive()
    }

    fn is_upcoming_this_week(&self, start: &Moment) -> bool {
        if *start < self.now {
            return false;
        }
        match self.weekly_policy {
            WeeklyPolicy::SameWeek => {
                let weekday = |m: &Moment| {
                    m.with_timezone(&self.timezone)
                        .weekday()
                        .num_days_from_sunday()
                };
                weekday(start) >= weekday(&self.now)
            }
            WeeklyPolicy::Wraparound => *start < self.now + self.lookahead,
        }
    }

    fn accepts(&self, kind: &RuleKind, event: &CalendarEvent) -> bool {
        match kind {
            RuleKind::Daily | RuleKind::Before => self.is_upcoming_today(&event.start),
            RuleKind::Weekly => self.is_upcoming_this_week(&event.start),
            RuleKind::Unknown(_) => false,
        }
    }
}

/// Expands one calendar config row into the `NotificationRule`s for the
/// fetched `events`. All produced rules share `rule_set_id`.
pub fn expand_calendar_rules(
    config: &CalendarRuleConfig,
    calendar_title: &str,
    events: &[CalendarEvent],
    rule_set_id: &RuleSetId,
    horizon: &ScheduleHorizon,
) -> Vec<NotificationRule> {
    let mut rules = Vec::new();
    for (kind, rule_config) in config.rules() {
        rules.extend(
            events
                .iter()
                .filter(|event| horizon.accepts(&kind, event))
                .map(|event| NotificationRule {
                    rule_set_id: rule_set_id.clone(),
                    kind: kind.clone(),
                    config: rule_config.to_string(),
                    channel: config.channel.clone(),
                    calendar_id: config.calendar_id.clone(),
                    calendar_title: calendar_title.to_string(),
                    event: event.clone(),
                }),
        );
    }
    rules
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};
    use chrono_tz::{Asia::Tokyo, UTC};

    fn utc(s: &str) -> Moment {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    fn event(id: &str, start: &str) -> CalendarEvent {
        let start = utc(start);
        CalendarEvent {
            id: format!("{}@google.com", id),
            title: id.to_uppercase(),
            start,
            end: start + Duration::hours(1),
        }
    }

    fn horizon(now: &str, timezone: Tz, weekly_policy: WeeklyPolicy) -> ScheduleHorizon {
        ScheduleHorizon {
            now: utc(now),
            timezone,
            lookahead: Duration::days(7),
            weekly_policy,
        }
    }

    fn config() -> CalendarRuleConfig {
        CalendarRuleConfig {
            calendar_id: "cal1@group.calendar.google.com".into(),
            channel: "general".into(),
            daily: Some("09:00".into()),
            weekly: Some("08:00".into()),
            before: Some("30".into()),
        }
    }

    fn ids(rules: &[NotificationRule], kind: RuleKind) -> Vec<String> {
        rules
            .iter()
            .filter(|r| r.kind == kind)
            .map(|r| r.event.title.clone())
            .collect()
    }

    #[test]
    fn daily_and_before_only_keep_upcoming_events_of_today() {
        // Wednesday
        let horizon = horizon("2024-01-03T10:00:00Z", UTC, WeeklyPolicy::SameWeek);
        let events = vec![
            event("past", "2024-01-03T09:00:00Z"),
            event("now", "2024-01-03T10:00:00Z"),
            event("later", "2024-01-03T23:30:00Z"),
            event("tomorrow", "2024-01-04T08:00:00Z"),
        ];
        let rules = expand_calendar_rules(&config(), "Team", &events, &"set".into(), &horizon);

        assert_eq!(ids(&rules, RuleKind::Daily), vec!["NOW", "LATER"]);
        assert_eq!(ids(&rules, RuleKind::Before), vec!["NOW", "LATER"]);
    }

    #[test]
    fn same_day_is_decided_in_the_display_timezone() {
        // 2024-01-03T16:00Z is already 2024-01-04 01:00 in Tokyo
        let horizon = horizon("2024-01-03T16:00:00Z", Tokyo, WeeklyPolicy::SameWeek);
        let events = vec![
            event("today", "2024-01-04T05:00:00Z"),
            event("tomorrow", "2024-01-04T16:00:00Z"),
        ];
        let rules = expand_calendar_rules(&config(), "Team", &events, &"set".into(), &horizon);
        assert_eq!(ids(&rules, RuleKind::Daily), vec!["TODAY"]);
    }

    #[test]
    fn weekly_same_week_does_not_wrap_around() {
        // Friday
        let horizon = horizon("2024-01-05T10:00:00Z", UTC, WeeklyPolicy::SameWeek);
        let events = vec![
            event("friday", "2024-01-05T12:00:00Z"),
            event("saturday", "2024-01-06T12:00:00Z"),
            event("sunday", "2024-01-07T12:00:00Z"),
            event("monday", "2024-01-08T12:00:00Z"),
            event("thursday", "2024-01-11T12:00:00Z"),
        ];
        let rules = expand_calendar_rules(&config(), "Team", &events, &"set".into(), &horizon);
        assert_eq!(ids(&rules, RuleKind::Weekly), vec!["FRIDAY", "SATURDAY"]);
    }

    #[test]
    fn weekly_wraparound_keeps_the_whole_lookahead() {
        let horizon = horizon("2024-01-05T10:00:00Z", UTC, WeeklyPolicy::Wraparound);
        let events = vec![
            event("past", "2024-01-05T09:00:00Z"),
            event("friday", "2024-01-05T12:00:00Z"),
            event("sunday", "2024-01-07T12:00:00Z"),
            event("thursday", "2024-01-11T12:00:00Z"),
            event("next_friday", "2024-01-12T12:00:00Z"),
        ];
        let rules = expand_calendar_rules(&config(), "Team", &events, &"set".into(), &horizon);
        assert_eq!(
            ids(&rules, RuleKind::Weekly),
            vec!["FRIDAY", "SUNDAY", "THURSDAY"]
        );
    }

    #[test]
    fn all_rules_of_a_row_share_the_rule_set() {
        let horizon = horizon("2024-01-01T07:00:00Z", UTC, WeeklyPolicy::SameWeek);
        let events = vec![event("standup", "2024-01-01T10:00:00Z")];
        let set: RuleSetId = "set".into();
        let rules = expand_calendar_rules(&config(), "Team", &events, &set, &horizon);

        assert_eq!(rules.len(), 3);
        assert!(rules.iter().all(|r| r.rule_set_id == set));
        assert_eq!(
            rules.iter().map(|r| r.kind.clone()).collect::<Vec<_>>(),
            vec![RuleKind::Daily, RuleKind::Weekly, RuleKind::Before]
        );
        assert_eq!(rules[0].config, "09:00");
        assert_eq!(rules[2].config, "30");
        assert!(rules.iter().all(|r| r.calendar_title == "Team"));
    }

    #[test]
    fn rows_without_rules_produce_nothing() {
        let horizon = horizon("2024-01-01T07:00:00Z", UTC, WeeklyPolicy::SameWeek);
        let config = CalendarRuleConfig {
            calendar_id: "cal".into(),
            channel: "general".into(),
            ..Default::default()
        };
        let events = vec![event("standup", "2024-01-01T10:00:00Z")];
        assert!(expand_calendar_rules(&config, "Team", &events, &"set".into(), &horizon).is_empty());
    }
}
