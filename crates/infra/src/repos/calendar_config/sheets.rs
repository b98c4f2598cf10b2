use super::ICalendarConfigRepo;
use crate::repos::shared::{cell_text, optional_cell};
use crate::services::google_sheets::ITableStore;
use calendar_notifier_domain::CalendarRuleConfig;
use std::sync::Arc;

pub const CALENDARS_SHEET: &str = "Calendars";
const COLUMN_COUNT: usize = 5;

pub struct SheetsCalendarConfigRepo {
    store: Arc<dyn ITableStore>,
}

impl SheetsCalendarConfigRepo {
    pub fn new(store: Arc<dyn ITableStore>) -> Self {
        Self { store }
    }
}

fn decode(row: &[String]) -> Option<CalendarRuleConfig> {
    let calendar_id = cell_text(&row[0]);
    if calendar_id.is_empty() {
        return None;
    }
    Some(CalendarRuleConfig {
        calendar_id: calendar_id.to_string(),
        channel: cell_text(&row[1]).to_string(),
        daily: optional_cell(&row[2]),
        weekly: optional_cell(&row[3]),
        before: optional_cell(&row[4]),
    })
}

#[async_trait::async_trait]
impl ICalendarConfigRepo for SheetsCalendarConfigRepo {
    async fn find_all(&self) -> anyhow::Result<Vec<CalendarRuleConfig>> {
        let rows = self.store.read_rows(CALENDARS_SHEET, COLUMN_COUNT).await?;
        Ok(rows.iter().filter_map(|row| decode(row)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::google_sheets::InMemoryTableStore;

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    #[tokio::test]
    async fn it_reads_calendar_configs() {
        let store = Arc::new(InMemoryTableStore::new());
        store.set_rows(
            CALENDARS_SHEET,
            vec![
                row(&["cal1@group.calendar.google.com", "#general", "09:00", "", "10"]),
                row(&["", "#ignored", "09:00"]),
                row(&[" cal2 ", "#dev", "", "'08:30"]),
            ],
        );
        let repo = SheetsCalendarConfigRepo::new(store);

        let configs = repo.find_all().await.unwrap();
        assert_eq!(
            configs,
            vec![
                CalendarRuleConfig {
                    calendar_id: "cal1@group.calendar.google.com".into(),
                    channel: "#general".into(),
                    daily: Some("09:00".into()),
                    weekly: None,
                    before: Some("10".into()),
                },
                CalendarRuleConfig {
                    calendar_id: "cal2".into(),
                    channel: "#dev".into(),
                    daily: None,
                    weekly: Some("08:30".into()),
                    before: None,
                },
            ]
        );
    }
}
