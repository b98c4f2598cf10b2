use super::INotificationRuleRepo;
use crate::repos::shared::{
    cell_text, decode_instant, encode_instant, required_cell, RowDecodeError,
};
use crate::services::google_sheets::ITableStore;
use calendar_notifier_domain::{CalendarEvent, NotificationRule, RuleKind};
use chrono_tz::Tz;
use std::sync::Arc;
use tracing::warn;

pub const NOTIFICATIONS_SHEET: &str = "Notifications";
const HEADER: [&str; 12] = [
    "Rule Set ID",
    "Type",
    "Config",
    "Slack Channel",
    "Calendar ID",
    "Calendar Title",
    "Event ID",
    "Title",
    "Start",
    "End",
    "Eid",
    "URL",
];

pub struct SheetsNotificationRuleRepo {
    store: Arc<dyn ITableStore>,
    timezone: Tz,
}

impl SheetsNotificationRuleRepo {
    pub fn new(store: Arc<dyn ITableStore>, timezone: Tz) -> Self {
        Self { store, timezone }
    }

    fn encode(&self, rule: &NotificationRule) -> Vec<String> {
        let eid = rule.eid();
        let url = calendar_notifier_domain::event_url(&eid);
        vec![
            rule.rule_set_id.to_string(),
            rule.kind.to_string(),
            // Quoted so that editing the sheet by hand does not turn values
            // like `09:00` into times
            format!("'{}", rule.config),
            rule.channel.clone(),
            rule.calendar_id.clone(),
            rule.calendar_title.clone(),
            rule.event.id.clone(),
            rule.event.title.clone(),
            encode_instant(&rule.event.start, &self.timezone),
            encode_instant(&rule.event.end, &self.timezone),
            eid,
            url,
        ]
    }
}

/// The `eid` and `url` columns are derived and ignored when reading.
/// Titles and channels are user content and read back verbatim.
fn decode(row: &[String]) -> Result<NotificationRule, RowDecodeError> {
    Ok(NotificationRule {
        rule_set_id: required_cell(&row[0], "ruleSetId")?.into(),
        kind: RuleKind::from(cell_text(&row[1])),
        config: cell_text(&row[2]).to_string(),
        channel: row[3].clone(),
        calendar_id: required_cell(&row[4], "calendarId")?,
        calendar_title: row[5].clone(),
        event: CalendarEvent {
            id: required_cell(&row[6], "eventId")?,
            title: row[7].clone(),
            start: decode_instant(&row[8], "start")?,
            end: decode_instant(&row[9], "end")?,
        },
    })
}

#[async_trait::async_trait]
impl INotificationRuleRepo for SheetsNotificationRuleRepo {
    async fn replace_all(&self, rules: &[NotificationRule]) -> anyhow::Result<()> {
        let rows = rules.iter().map(|rule| self.encode(rule)).collect::<Vec<_>>();
        self.store
            .clear_and_write_rows(NOTIFICATIONS_SHEET, &HEADER, &rows)
            .await
    }

    async fn find_all(&self) -> anyhow::Result<Vec<NotificationRule>> {
        let rows = self
            .store
            .read_rows(NOTIFICATIONS_SHEET, HEADER.len())
            .await?;
        let mut rules = Vec::with_capacity(rows.len());
        for (index, row) in rows.iter().enumerate() {
            match decode(row) {
                Ok(rule) => rules.push(rule),
                Err(e) => warn!(
                    "Skipping notification row: {} that could not be read. Error: {}",
                    index + 2,
                    e
                ),
            }
        }
        Ok(rules)
    }
}
