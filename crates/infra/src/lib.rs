mod config;
mod repos;
mod services;
mod system;

pub use config::{parse_spreadsheet_id, Config, ConfigError};
pub use repos::*;
pub use services::google_calendar::{
    GoogleCalendarProvider, ICalendarProvider, InMemoryCalendarProvider,
};
pub use services::google_sheets::{
    column_letter, GoogleSheetsTableStore, ITableStore, InMemoryTableStore,
};
pub use services::slack::{
    escape_mrkdwn, Block, DeliveryError, IMessenger, InMemoryMessenger, SentMessage,
    SlackMessenger, Text,
};
use std::sync::Arc;
pub use system::{ISys, RealSys, StaticTimeSys};

#[derive(Clone)]
pub struct NotifierContext {
    pub repos: Repos,
    pub calendars: Arc<dyn ICalendarProvider>,
    pub messenger: Arc<dyn IMessenger>,
    pub config: Config,
    pub sys: Arc<dyn ISys>,
}

impl NotifierContext {
    fn create(config: Config) -> Self {
        let store = Arc::new(GoogleSheetsTableStore::new(
            config.spreadsheet_id.clone(),
            config.google_access_token.clone(),
        ));
        Self {
            repos: Repos::create_sheets(store, config.display_timezone),
            calendars: Arc::new(GoogleCalendarProvider::new(
                config.google_access_token.clone(),
                config.display_timezone,
            )),
            messenger: Arc::new(SlackMessenger::new(config.slack_token.clone())),
            config,
            sys: Arc::new(RealSys {}),
        }
    }

    /// Context where every collaborator is kept in memory. The returned
    /// handles can be used to seed and inspect the collaborators.
    pub fn create_inmemory(config: Config) -> (Self, InMemoryHandles) {
        let handles = InMemoryHandles {
            store: Arc::new(InMemoryTableStore::new()),
            calendars: Arc::new(InMemoryCalendarProvider::new()),
            messenger: Arc::new(InMemoryMessenger::new()),
        };
        let ctx = Self {
            repos: Repos::create_sheets(handles.store.clone(), config.display_timezone),
            calendars: handles.calendars.clone(),
            messenger: handles.messenger.clone(),
            config,
            sys: Arc::new(RealSys {}),
        };
        (ctx, handles)
    }
}

#[derive(Clone)]
pub struct InMemoryHandles {
    pub store: Arc<InMemoryTableStore>,
    pub calendars: Arc<InMemoryCalendarProvider>,
    pub messenger: Arc<InMemoryMessenger>,
}

/// Will setup the infrastructure context given the environment
pub fn setup_context() -> Result<NotifierContext, ConfigError> {
    Ok(NotifierContext::create(Config::new()?))
}
