mod sheets;

use calendar_notifier_domain::CalendarRuleConfig;
pub use sheets::{SheetsCalendarConfigRepo, CALENDARS_SHEET};

#[async_trait::async_trait]
pub trait ICalendarConfigRepo: Send + Sync {
    /// Every configured calendar in sheet order
    async fn find_all(&self) -> anyhow::Result<Vec<CalendarRuleConfig>>;
}
