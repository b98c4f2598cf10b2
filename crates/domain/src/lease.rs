use crate::tick::Moment;
use chrono::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeaseState {
    InProgress,
    Done,
}

impl LeaseState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InProgress => "in_progress",
            Self::Done => "done",
        }
    }

    pub fn parse(state: &str) -> Option<Self> {
        match state.trim() {
            "in_progress" => Some(Self::InProgress),
            "done" => Some(Self::Done),
            _ => None,
        }
    }
}

/// Marker persisted by the tick dispatcher so that overlapping or repeated
/// invocations for the same tick do not deliver notifications twice.
///
/// Only the marker of the latest tick is kept. Ticks never overlap, so a
/// marker of an earlier tick never holds back a later one.
#[derive(Debug, Clone, PartialEq)]
pub struct TickLease {
    /// Start of the tick window the marker belongs to
    pub tick_start: Moment,
    pub state: LeaseState,
    pub updated_at: Moment,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LeaseDecision {
    Proceed,
    /// This tick has already been dispatched
    AlreadyDispatched,
    /// Another invocation started dispatching this tick at `since` and has
    /// not timed out
    Busy { since: Moment },
    /// The dispatch of the later tick starting at `by` has already begun
    Superseded { by: Moment },
}

impl TickLease {
    pub fn in_progress(tick_start: Moment, now: Moment) -> Self {
        Self {
            tick_start,
            state: LeaseState::InProgress,
            updated_at: now,
        }
    }

    pub fn done(tick_start: Moment, now: Moment) -> Self {
        Self {
            tick_start,
            state: LeaseState::Done,
            updated_at: now,
        }
    }

    /// Whether a tick starting at `tick_start` may be dispatched at `now`
    /// given the currently persisted lease
    pub fn decide(
        current: Option<&TickLease>,
        tick_start: Moment,
        now: Moment,
        timeout: Duration,
    ) -> LeaseDecision {
        let lease = match current {
            Some(lease) => lease,
            None => return LeaseDecision::Proceed,
        };
        if lease.tick_start > tick_start {
            return LeaseDecision::Superseded {
                by: lease.tick_start,
            };
        }
        if lease.tick_start < tick_start {
            return LeaseDecision::Proceed;
        }
        match lease.state {
            LeaseState::Done => LeaseDecision::AlreadyDispatched,
            LeaseState::InProgress if now - lease.updated_at < timeout => LeaseDecision::Busy {
                since: lease.updated_at,
            },
            LeaseState::InProgress => LeaseDecision::Proceed,
        }
    }

    /// Whether this lease may overwrite the `current` one. Markers only move
    /// forward, a late `done` of an earlier tick must not replace the marker
    /// of a tick that has started since.
    pub fn may_replace(&self, current: Option<&TickLease>) -> bool {
        current.map_or(true, |current| current.tick_start <= self.tick_start)
    }
}
