use crate::{
    schedule::rebuild_schedule::RebuildScheduleUseCase, shared::usecase::execute,
    tick::run_tick::RunTickUseCase,
};
use actix_web::rt::time::{interval, sleep_until, Instant};
use calendar_notifier_infra::NotifierContext;
use std::time::Duration;
use tracing::info;

const DEFAULT_REBUILD_INTERVAL: Duration = Duration::from_secs(60 * 60);

/// Seconds until the start of the next tick
pub fn get_start_delay(now_ts: u64, tick_secs: u64) -> u64 {
    let secs_into_tick = (now_ts / 1000) % tick_secs;
    tick_secs - secs_into_tick
}

pub fn start_rebuild_schedule_job(ctx: NotifierContext) {
    actix_web::rt::spawn(async move {
        let period = ctx
            .config
            .rebuild_interval
            .to_std()
            .unwrap_or(DEFAULT_REBUILD_INTERVAL);
        let mut interval = interval(period);
        loop {
            interval.tick().await;

            let _ = execute(RebuildScheduleUseCase, &ctx).await;
        }
    });
}

pub fn start_tick_job(ctx: NotifierContext) {
    actix_web::rt::spawn(async move {
        let tick_secs = ctx.config.tick_length.minutes() as u64 * 60;
        let now = ctx.sys.get_timestamp_millis();
        let secs_to_next_tick = get_start_delay(now as u64, tick_secs);
        info!("First tick is dispatched in {} seconds", secs_to_next_tick);
        let start = Instant::now() + Duration::from_secs(secs_to_next_tick);

        sleep_until(start).await;
        let mut tick_interval = interval(Duration::from_secs(tick_secs));
        loop {
            tick_interval.tick().await;
            let context = ctx.clone();
            // A slow tick must not delay the next one, overlapping ticks are
            // handled by the tick lease
            actix_web::rt::spawn(async move {
                let _ = execute(RunTickUseCase, &context).await;
            });
        }
    });
}
