use crate::shared::usecase::UseCase;
use calendar_notifier_domain::{
    expand_calendar_rules, CalendarEvent, CalendarRuleConfig, RuleSetId, ScheduleHorizon,
};
use calendar_notifier_infra::NotifierContext;
use thiserror::Error;
use tracing::{error, info};

/// Rebuilds the notification schedule from the configured calendars,
/// replacing the previously stored schedule
#[derive(Debug)]
pub struct RebuildScheduleUseCase;

#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleSummary {
    /// Number of calendars with at least one rule
    pub calendars: usize,
    /// Number of stored notification rules
    pub rules: usize,
}

#[derive(Error, Debug, PartialEq)]
pub enum UseCaseError {
    #[error("Failed to read or write the notification tables")]
    StorageError,
    #[error("Failed to fetch the events of calendar: {calendar_id}")]
    CalendarFetchError { calendar_id: String },
}

fn storage_error(e: anyhow::Error) -> UseCaseError {
    error!("Failed to read or write the notification tables. Error: {:?}", e);
    UseCaseError::StorageError
}

struct FetchedCalendar<'a> {
    config: &'a CalendarRuleConfig,
    title: String,
    events: Vec<CalendarEvent>,
}

async fn fetch_calendar<'a>(
    config: &'a CalendarRuleConfig,
    horizon: &ScheduleHorizon,
    ctx: &NotifierContext,
) -> Result<FetchedCalendar<'a>, UseCaseError> {
    let calendar_id = &config.calendar_id;
    let fetch_error = |e: anyhow::Error| {
        error!(
            "Failed to fetch calendar: {}. Error message: {:?}",
            calendar_id, e
        );
        UseCaseError::CalendarFetchError {
            calendar_id: calendar_id.clone(),
        }
    };

    let title = ctx
        .calendars
        .get_calendar_title(calendar_id)
        .await
        .map_err(fetch_error)?;
    let (start, end) = horizon.fetch_range();
    let events = ctx
        .calendars
        .get_events(calendar_id, start, end)
        .await
        .map_err(fetch_error)?;

    Ok(FetchedCalendar {
        config,
        title,
        events,
    })
}

#[async_trait::async_trait(?Send)]
impl UseCase for RebuildScheduleUseCase {
    type Response = ScheduleSummary;
    type Errors = UseCaseError;

    const NAME: &'static str = "RebuildSchedule";

    async fn execute(&mut self, ctx: &NotifierContext) -> Result<Self::Response, Self::Errors> {
        let configs = ctx
            .repos
            .calendar_config_repo
            .find_all()
            .await
            .map_err(storage_error)?;

        let horizon = ScheduleHorizon {
            now: ctx.sys.now(),
            timezone: ctx.config.display_timezone,
            lookahead: ctx.config.lookahead,
            weekly_policy: ctx.config.weekly_policy,
        };

        // Any failed calendar aborts the rebuild before the stored schedule
        // is touched
        let mut calendars = Vec::new();
        for config in configs.iter().filter(|config| !config.rules().is_empty()) {
            calendars.push(fetch_calendar(config, &horizon, ctx).await?);
        }

        let mut rules = Vec::new();
        for calendar in &calendars {
            let rule_set_id = RuleSetId::generate();
            rules.extend(expand_calendar_rules(
                calendar.config,
                &calendar.title,
                &calendar.events,
                &rule_set_id,
                &horizon,
            ));
        }

        ctx.repos
            .notification_rule_repo
            .replace_all(&rules)
            .await
            .map_err(storage_error)?;

        info!(
            "Rebuilt the notification schedule with {} rules from {} calendars",
            rules.len(),
            calendars.len()
        );
        Ok(ScheduleSummary {
            calendars: calendars.len(),
            rules: rules.len(),
        })
    }
}
