use super::render::render_matches;
use crate::shared::usecase::UseCase;
use calendar_notifier_domain::{match_rules, LeaseDecision, Moment, TickLease, TickWindow};
use calendar_notifier_infra::NotifierContext;
use thiserror::Error;
use tracing::{error, info, warn};

/// Dispatches the notifications due in the tick window the current time
/// falls into
#[derive(Debug)]
pub struct RunTickUseCase;

#[derive(Debug, Clone, PartialEq)]
pub enum TickReport {
    /// Nothing was dispatched because of the tick lease
    Skipped {
        tick_start: Moment,
        reason: LeaseDecision,
    },
    Dispatched {
        tick_start: Moment,
        /// Number of matched rules
        matched: usize,
        /// Number of messages delivered and failed
        delivered: usize,
        failed: usize,
    },
}

#[derive(Error, Debug, PartialEq)]
pub enum UseCaseError {
    #[error("Failed to read or write the notification tables")]
    StorageError,
}

fn storage_error(e: anyhow::Error) -> UseCaseError {
    error!("Failed to read the notification schedule. Error: {:?}", e);
    UseCaseError::StorageError
}

#[async_trait::async_trait(?Send)]
impl UseCase for RunTickUseCase {
    type Response = TickReport;
    type Errors = UseCaseError;

    const NAME: &'static str = "RunTick";

    async fn execute(&mut self, ctx: &NotifierContext) -> Result<Self::Response, Self::Errors> {
        let now = ctx.sys.now();
        let timezone = ctx.config.display_timezone;
        let window = TickWindow::containing(now, ctx.config.tick_length, timezone);
        let tick_start = window.start();

        let lease_repo = &ctx.repos.tick_lease_repo;
        // The lease only guards against duplicates, without it every tick is
        // dispatched
        let current = lease_repo.find().await.unwrap_or_else(|e| {
            warn!(
                "The tick lease could not be read, dispatching without it. Error: {:?}",
                e
            );
            None
        });
        let decision = TickLease::decide(
            current.as_ref(),
            tick_start,
            now,
            ctx.config.tick_lease_timeout,
        );
        if decision != LeaseDecision::Proceed {
            info!(
                "Skipping the tick starting at {}: {:?}",
                tick_start, decision
            );
            return Ok(TickReport::Skipped {
                tick_start,
                reason: decision,
            });
        }
        if let Err(e) = lease_repo.save(&TickLease::in_progress(tick_start, now)).await {
            warn!(
                "The tick starting at {} could not be marked as in progress. Error: {:?}",
                tick_start, e
            );
        }

        // On failure the in progress lease is left behind. It only holds back
        // this tick, and only until the lease timeout.
        let rules = ctx
            .repos
            .notification_rule_repo
            .find_all()
            .await
            .map_err(storage_error)?;

        let matches = match_rules(&window, &rules, window.is_monday());
        let matched = matches.total();
        let messages = render_matches(&matches, timezone);

        let mut delivered = 0;
        let mut failed = 0;
        for message in &messages {
            match ctx
                .messenger
                .post_message(&message.channel, &message.display_name, &message.blocks)
                .await
            {
                Ok(()) => delivered += 1,
                Err(e) => {
                    failed += 1;
                    error!(
                        "Failed to deliver the notification to channel: {}. Error: {}",
                        message.channel, e
                    );
                }
            }
        }

        match lease_repo
            .save(&TickLease::done(tick_start, ctx.sys.now()))
            .await
        {
            Ok(true) => (),
            Ok(false) => info!(
                "The tick starting at {} finished after a later tick started",
                tick_start
            ),
            Err(e) => warn!(
                "The tick starting at {} was dispatched but could not be marked as done. Error: {:?}",
                tick_start, e
            ),
        }

        info!(
            "Dispatched the tick starting at {}: {} matched rules, {} delivered and {} failed messages",
            tick_start, matched, delivered, failed
        );
        Ok(TickReport::Dispatched {
            tick_start,
            matched,
            delivered,
            failed,
        })
    }
}
