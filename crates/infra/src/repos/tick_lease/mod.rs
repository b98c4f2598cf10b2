mod sheets;

use calendar_notifier_domain::TickLease;
pub use sheets::{SheetsTickLeaseRepo, TICK_LEASE_SHEET};

/// Storage of the single tick dispatch marker
#[async_trait::async_trait]
pub trait ITickLeaseRepo: Send + Sync {
    /// The marker of the latest tick
    async fn find(&self) -> anyhow::Result<Option<TickLease>>;

    /// Stores `lease` unless the stored marker belongs to a later tick.
    /// Returns whether the lease was stored.
    async fn save(&self, lease: &TickLease) -> anyhow::Result<bool>;
}
