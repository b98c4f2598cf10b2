mod sheets;

use calendar_notifier_domain::NotificationRule;
pub use sheets::{SheetsNotificationRuleRepo, NOTIFICATIONS_SHEET};

/// Storage of the notification schedule
#[async_trait::async_trait]
pub trait INotificationRuleRepo: Send + Sync {
    /// Replaces the whole schedule with `rules`
    async fn replace_all(&self, rules: &[NotificationRule]) -> anyhow::Result<()>;

    /// The stored schedule in insertion order. Rows that can not be decoded
    /// are skipped.
    async fn find_all(&self) -> anyhow::Result<Vec<NotificationRule>>;
}
