use calendar_notifier_api::Application;
use calendar_notifier_domain::{CalendarEvent, Moment};
use calendar_notifier_infra::{
    Config, InMemoryHandles, NotifierContext, StaticTimeSys, CALENDARS_SHEET,
};
use chrono::{TimeZone, Utc};
use chrono_tz::{Asia::Tokyo, Tz};
use std::sync::Arc;

pub const TIMEZONE: Tz = Tokyo;

pub struct TestApp {
    pub ctx: NotifierContext,
    pub handles: InMemoryHandles,
}

impl TestApp {
    /// The context with its clock frozen at `now`
    pub fn at(&self, now: Moment) -> NotifierContext {
        let mut ctx = self.ctx.clone();
        ctx.sys = Arc::new(StaticTimeSys { now });
        ctx
    }

    pub fn set_calendar_rows(&self, rows: &[[&str; 5]]) {
        self.handles.store.set_rows(
            CALENDARS_SHEET,
            rows.iter()
                .map(|row| row.iter().map(|c| c.to_string()).collect())
                .collect(),
        );
    }
}

pub fn config() -> Config {
    let mut config = Config::with_secrets(
        "spreadsheet".into(),
        "xoxb-test".into(),
        "ya29.test".into(),
    );
    config.display_timezone = TIMEZONE;
    config
}

/// App where every collaborator is kept in memory
pub fn setup_app() -> TestApp {
    let (ctx, handles) = NotifierContext::create_inmemory(config());
    TestApp { ctx, handles }
}

/// Local time in the display timezone
pub fn local(day: u32, hour: u32, minute: u32) -> Moment {
    TIMEZONE
        .with_ymd_and_hms(2024, 1, day, hour, minute, 0)
        .unwrap()
        .with_timezone(&Utc)
}

pub fn event(id: &str, title: &str, start: Moment, minutes: i64) -> CalendarEvent {
    CalendarEvent {
        id: format!("{}@google.com", id),
        title: title.into(),
        start,
        end: start + chrono::Duration::minutes(minutes),
    }
}

// Launch the application as a background task
pub async fn spawn_app() -> (TestApp, String) {
    let app = setup_app();
    let mut ctx = app.ctx.clone();
    ctx.config.port = 0; // Random port

    let application = Application::new(ctx)
        .await
        .expect("Failed to build application.");

    let address = format!("http://127.0.0.1:{}", application.port());
    let _ = actix_web::rt::spawn(async move {
        application
            .start()
            .await
            .expect("Expected application to start");
    });

    (app, address)
}
