use chrono::{DateTime, Datelike, Duration, NaiveTime, TimeZone, Utc, Weekday};
use chrono_tz::Tz;
use thiserror::Error;

/// An absolute point in time. Matching only cares about minute resolution.
pub type Moment = DateTime<Utc>;

const MINUTES_PER_DAY: i64 = 24 * 60;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TickLengthError {
    #[error("Tick length must be a positive number of minutes, got: {0}")]
    NotPositive(i64),
    #[error("Tick length of {0} minutes does not evenly divide a day")]
    DoesNotDivideDay(i64),
}

/// The fixed polling cadence of the tick dispatcher
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickLength(i64);

impl TickLength {
    pub fn from_minutes(minutes: i64) -> Result<Self, TickLengthError> {
        if minutes <= 0 {
            return Err(TickLengthError::NotPositive(minutes));
        }
        if MINUTES_PER_DAY % minutes != 0 {
            return Err(TickLengthError::DoesNotDivideDay(minutes));
        }
        Ok(Self(minutes))
    }

    pub fn minutes(&self) -> i64 {
        self.0
    }

    pub fn as_duration(&self) -> Duration {
        Duration::minutes(self.0)
    }
}

impl Default for TickLength {
    fn default() -> Self {
        Self(5)
    }
}

/// A half open interval `[start, end)` of time that a single tick is
/// responsible for.
///
/// Windows are aligned to multiples of the `TickLength` counted from the unix
/// epoch, so consecutive windows partition time without gaps or overlaps.
/// The `timezone` is used to resolve wall clock triggers such as `"09:00"`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickWindow {
    start: Moment,
    end: Moment,
    timezone: Tz,
}

impl TickWindow {
    /// The window that `now` falls into
    pub fn containing(now: Moment, length: TickLength, timezone: Tz) -> Self {
        let tick_secs = length.minutes() * 60;
        let secs_into_tick = now.timestamp().rem_euclid(tick_secs);
        let start = now
            - Duration::seconds(secs_into_tick)
            - Duration::nanoseconds(i64::from(now.timestamp_subsec_nanos()));

        Self {
            start,
            end: start + length.as_duration(),
            timezone,
        }
    }

    pub fn includes(&self, moment: &Moment) -> bool {
        self.start <= *moment && *moment < self.end
    }

    /// The window directly following this one
    pub fn next(&self) -> Self {
        let length = self.end - self.start;
        Self {
            start: self.end,
            end: self.end + length,
            timezone: self.timezone,
        }
    }

    pub fn start(&self) -> Moment {
        self.start
    }

    pub fn end(&self) -> Moment {
        self.end
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    pub fn local_start(&self) -> DateTime<Tz> {
        self.start.with_timezone(&self.timezone)
    }

    /// Weekly notifications are only delivered on ticks that start on a Monday
    pub fn is_monday(&self) -> bool {
        self.local_start().weekday() == Weekday::Mon
    }

    /// Resolves `time` on the local calendar day this window starts in.
    ///
    /// Returns `None` when the wall clock time does not exist on that day
    /// (skipped by a DST transition). For ambiguous times the earliest
    /// instant is used.
    pub fn day_at(&self, time: NaiveTime) -> Option<Moment> {
        let date = self.local_start().date_naive();
        self.timezone
            .from_local_datetime(&date.and_time(time))
            .earliest()
            .map(|dt| dt.with_timezone(&Utc))
    }
}
