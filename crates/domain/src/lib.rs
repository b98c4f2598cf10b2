mod calendar;
mod lease;
mod matching;
mod multimap;
mod notification;
mod schedule;
mod tick;
mod trigger;

pub use calendar::{CalendarEvent, CalendarRuleConfig};
pub use lease::{LeaseDecision, LeaseState, TickLease};
pub use matching::{match_rules, GroupedMatches, TickMatches};
pub use multimap::OrderedMultiMap;
pub use notification::{event_eid, event_url, NotificationRule, RuleKind, RuleSetId};
pub use schedule::{expand_calendar_rules, ScheduleHorizon, WeeklyPolicy};
pub use tick::{Moment, TickLength, TickLengthError, TickWindow};
pub use trigger::{parse_minutes, parse_time_of_day, RuleError, Trigger};
