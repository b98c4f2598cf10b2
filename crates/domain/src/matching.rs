use crate::{
    multimap::OrderedMultiMap,
    notification::{NotificationRule, RuleSetId},
    tick::TickWindow,
    trigger::Trigger,
};
use tracing::warn;

/// Matching rules keyed by the rule set they were generated from
pub type GroupedMatches<'a> = OrderedMultiMap<&'a RuleSetId, &'a NotificationRule>;

/// The rules that fire during one tick, partitioned by kind
#[derive(Debug, PartialEq)]
pub struct TickMatches<'a> {
    pub daily: GroupedMatches<'a>,
    pub weekly: GroupedMatches<'a>,
    pub before: GroupedMatches<'a>,
}

impl<'a> TickMatches<'a> {
    pub fn is_empty(&self) -> bool {
        self.daily.is_empty() && self.weekly.is_empty() && self.before.is_empty()
    }

    pub fn total(&self) -> usize {
        self.daily.total() + self.weekly.total() + self.before.total()
    }
}

impl<'a> Default for TickMatches<'a> {
    fn default() -> Self {
        Self {
            daily: OrderedMultiMap::new(),
            weekly: OrderedMultiMap::new(),
            before: OrderedMultiMap::new(),
        }
    }
}

/// Decides which `rules` fire during the tick `window`.
///
/// A rule fires iff its trigger instant lies inside the window. `weekly`
/// rules only have a trigger instant when `is_monday_tick` is set. Rules with
/// an unknown kind or a malformed config are logged and left out, they never
/// fail the whole tick.
///
/// This is a pure function: the same inputs always give the same matches.
pub fn match_rules<'a, I>(window: &TickWindow, rules: I, is_monday_tick: bool) -> TickMatches<'a>
where
    I: IntoIterator<Item = &'a NotificationRule>,
{
    let mut matches = TickMatches::default();

    for rule in rules {
        let trigger = match rule.trigger() {
            Ok(trigger) => trigger,
            Err(e) => {
                warn!(
                    "Skipping notification rule for event {} in rule set {}: {}",
                    rule.event.id, rule.rule_set_id, e
                );
                continue;
            }
        };

        let fires = trigger
            .instant(window, rule.event.start, is_monday_tick)
            .map(|at| window.includes(&at))
            .unwrap_or(false);
        if !fires {
            continue;
        }

        let groups = match trigger {
            Trigger::Daily(_) => &mut matches.daily,
            Trigger::Weekly(_) => &mut matches.weekly,
            Trigger::Before(_) => &mut matches.before,
        };
        groups.append(&rule.rule_set_id, rule);
    }

    matches
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        calendar::CalendarEvent,
        notification::RuleKind,
        tick::{Moment, TickLength},
    };
    use chrono::{DateTime, Utc};
    use chrono_tz::UTC;

    fn utc(s: &str) -> Moment {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    fn window_at(s: &str) -> TickWindow {
        TickWindow::containing(utc(s), TickLength::default(), UTC)
    }

    fn rule(rule_set_id: &str, kind: &str, config: &str, event_id: &str, start: &str) -> NotificationRule {
        let start = utc(start);
        NotificationRule {
            rule_set_id: rule_set_id.into(),
            kind: RuleKind::from(kind),
            config: config.into(),
            channel: "general".into(),
            calendar_id: "cal1@group.calendar.google.com".into(),
            calendar_title: "Team".into(),
            event: CalendarEvent {
                id: event_id.into(),
                title: format!("Event {}", event_id),
                start,
                end: start + chrono::Duration::hours(1),
            },
        }
    }

    #[test]
    fn daily_rule_matches_only_the_window_containing_its_time() {
        let rules = vec![rule("set", "daily", "09:00", "e1", "2024-01-01T13:00:00Z")];

        let matches = match_rules(&window_at("2024-01-01T09:00:00Z"), &rules, false);
        assert_eq!(matches.daily.total(), 1);
        assert_eq!(matches.total(), 1);

        let matches = match_rules(&window_at("2024-01-01T08:55:00Z"), &rules, false);
        assert!(matches.is_empty());

        let matches = match_rules(&window_at("2024-01-01T09:05:00Z"), &rules, false);
        assert!(matches.is_empty());
    }

    #[test]
    fn weekly_rule_only_matches_on_monday_ticks() {
        let rules = vec![
            rule("set", "weekly", "09:00", "e1", "2024-01-03T13:00:00Z"),
            rule("set", "weekly", "00:00", "e2", "2024-01-03T13:00:00Z"),
            rule("set", "weekly", "23:59", "e3", "2024-01-03T13:00:00Z"),
        ];
        for at in ["2024-01-01T09:00:00Z", "2024-01-01T00:00:00Z", "2024-01-01T23:55:00Z"] {
            assert!(match_rules(&window_at(at), &rules, false).is_empty());
            assert_eq!(match_rules(&window_at(at), &rules, true).weekly.total(), 1);
        }
    }

    #[test]
    fn before_rule_matches_the_window_containing_its_offset() {
        let rules = vec![rule("set", "before", "30", "e1", "2024-01-01T10:00:00Z")];

        let matches = match_rules(&window_at("2024-01-01T09:30:00Z"), &rules, false);
        assert_eq!(matches.before.total(), 1);
        assert!(matches.daily.is_empty());

        for at in ["2024-01-01T09:25:00Z", "2024-01-01T09:35:00Z", "2024-01-01T10:00:00Z"] {
            assert!(match_rules(&window_at(at), &rules, false).is_empty());
        }
    }

    #[test]
    fn it_groups_matches_by_rule_set_and_kind() {
        let rules = vec![
            rule("a", "daily", "09:00", "e1", "2024-01-01T10:00:00Z"),
            rule("b", "daily", "09:00", "e2", "2024-01-01T11:00:00Z"),
            rule("a", "daily", "09:00", "e3", "2024-01-01T12:00:00Z"),
            rule("a", "before", "60", "e4", "2024-01-01T10:00:00Z"),
            rule("a", "before", "60", "e5", "2024-01-01T10:02:00Z"),
        ];
        let matches = match_rules(&window_at("2024-01-01T09:00:00Z"), &rules, false);

        let a: RuleSetId = "a".into();
        let b: RuleSetId = "b".into();
        let daily_a = matches.daily.get(&a).unwrap();
        assert_eq!(
            daily_a.iter().map(|r| r.event.id.as_str()).collect::<Vec<_>>(),
            vec!["e1", "e3"]
        );
        assert_eq!(matches.daily.get(&b).unwrap().len(), 1);
        assert_eq!(
            matches.daily.iter().map(|(id, _)| id.as_str()).collect::<Vec<_>>(),
            vec!["a", "b"]
        );
        assert_eq!(matches.before.get(&a).unwrap().len(), 2);
        assert!(matches.weekly.is_empty());
    }

    #[test]
    fn unknown_kinds_and_malformed_configs_are_skipped() {
        let rules = vec![
            rule("set", "monthly", "09:00", "e1", "2024-01-01T10:00:00Z"),
            rule("set", "daily", "nine", "e2", "2024-01-01T10:00:00Z"),
            rule("set", "before", "soon", "e3", "2024-01-01T10:00:00Z"),
            rule("set", "daily", "09:00", "e4", "2024-01-01T10:00:00Z"),
        ];
        let matches = match_rules(&window_at("2024-01-01T09:00:00Z"), &rules, true);
        assert_eq!(matches.total(), 1);
        assert_eq!(matches.daily.values().next().unwrap().event.id, "e4");
    }

    #[test]
    fn matching_is_idempotent() {
        let rules = vec![
            rule("a", "daily", "09:00", "e1", "2024-01-01T10:00:00Z"),
            rule("a", "weekly", "09:00", "e2", "2024-01-01T10:00:00Z"),
            rule("b", "before", "60", "e3", "2024-01-01T10:00:00Z"),
        ];
        let window = window_at("2024-01-01T09:01:00Z");
        let first = match_rules(&window, &rules, true);
        let second = match_rules(&window, &rules, true);
        assert_eq!(first, second);
        assert_eq!(first.total(), 3);
    }
}
