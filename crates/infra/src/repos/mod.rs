mod calendar_config;
mod notification_rule;
mod shared;
mod tick_lease;

use crate::services::google_sheets::ITableStore;
pub use calendar_config::{ICalendarConfigRepo, SheetsCalendarConfigRepo, CALENDARS_SHEET};
use chrono_tz::Tz;
pub use notification_rule::{
    INotificationRuleRepo, SheetsNotificationRuleRepo, NOTIFICATIONS_SHEET,
};
pub use shared::RowDecodeError;
use std::sync::Arc;
pub use tick_lease::{ITickLeaseRepo, SheetsTickLeaseRepo, TICK_LEASE_SHEET};

#[derive(Clone)]
pub struct Repos {
    pub calendar_config_repo: Arc<dyn ICalendarConfigRepo>,
    pub notification_rule_repo: Arc<dyn INotificationRuleRepo>,
    pub tick_lease_repo: Arc<dyn ITickLeaseRepo>,
}

impl Repos {
    /// Repos storing their rows in the sheets of `store`. Instants are
    /// written in `timezone`.
    pub fn create_sheets(store: Arc<dyn ITableStore>, timezone: Tz) -> Self {
        Self {
            calendar_config_repo: Arc::new(SheetsCalendarConfigRepo::new(store.clone())),
            notification_rule_repo: Arc::new(SheetsNotificationRuleRepo::new(
                store.clone(),
                timezone,
            )),
            tick_lease_repo: Arc::new(SheetsTickLeaseRepo::new(store, timezone)),
        }
    }
}
