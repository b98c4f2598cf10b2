use super::ITickLeaseRepo;
use crate::repos::shared::{decode_instant, encode_instant, required_cell, RowDecodeError};
use crate::services::google_sheets::ITableStore;
use calendar_notifier_domain::{LeaseState, TickLease};
use chrono_tz::Tz;
use std::sync::Arc;
use tracing::warn;

pub const TICK_LEASE_SHEET: &str = "TickLease";
const HEADER: [&str; 3] = ["Tick Start", "State", "Updated At"];

pub struct SheetsTickLeaseRepo {
    store: Arc<dyn ITableStore>,
    timezone: Tz,
}

impl SheetsTickLeaseRepo {
    pub fn new(store: Arc<dyn ITableStore>, timezone: Tz) -> Self {
        Self { store, timezone }
    }
}

fn decode(row: &[String]) -> Result<TickLease, RowDecodeError> {
    let state = required_cell(&row[1], "state")?;
    Ok(TickLease {
        tick_start: decode_instant(&row[0], "tickStart")?,
        state: LeaseState::parse(&state).ok_or(RowDecodeError::InvalidValue {
            field: "state",
            value: state.clone(),
        })?,
        updated_at: decode_instant(&row[2], "updatedAt")?,
    })
}

#[async_trait::async_trait]
impl ITickLeaseRepo for SheetsTickLeaseRepo {
    async fn find(&self) -> anyhow::Result<Option<TickLease>> {
        let rows = self.store.read_rows(TICK_LEASE_SHEET, HEADER.len()).await?;
        let row = match rows.first() {
            Some(row) => row,
            None => return Ok(None),
        };
        match decode(row) {
            Ok(lease) => Ok(Some(lease)),
            Err(e) => {
                // A corrupt marker must not block dispatching
                warn!("Ignoring the unreadable tick lease: {:?}. Error: {}", row, e);
                Ok(None)
            }
        }
    }

    async fn save(&self, lease: &TickLease) -> anyhow::Result<bool> {
        let current = self.find().await?;
        if !lease.may_replace(current.as_ref()) {
            return Ok(false);
        }
        let row = vec![
            encode_instant(&lease.tick_start, &self.timezone),
            lease.state.as_str().to_string(),
            encode_instant(&lease.updated_at, &self.timezone),
        ];
        self.store
            .clear_and_write_rows(TICK_LEASE_SHEET, &HEADER, &[row])
            .await?;
        Ok(true)
    }
}
