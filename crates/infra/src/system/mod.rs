use calendar_notifier_domain::Moment;
use chrono::Utc;

// Mocking out time so that it is possible to run tests that depend on time.
pub trait ISys: Send + Sync {
    /// The current point in time
    fn now(&self) -> Moment;

    /// The current timestamp in millis
    fn get_timestamp_millis(&self) -> i64 {
        self.now().timestamp_millis()
    }
}

/// System that gets the real time and is used when not testing
pub struct RealSys {}
impl ISys for RealSys {
    fn now(&self) -> Moment {
        Utc::now()
    }
}

/// System with a frozen clock
pub struct StaticTimeSys {
    pub now: Moment,
}

impl ISys for StaticTimeSys {
    fn now(&self) -> Moment {
        self.now
    }
}
