mod config;
mod repos;
mod services;
mod system;

pub use config::{AirtableConfig, Config, OAuthClientConfig, TwilioConfig, MAX_CALENDAR_SYNC_DAYS};
pub use repos::{
    fields, IAppointmentRepo, IBusinessRepo, InMemoryAppointmentRepo, InMemoryBusinessRepo, Repos,
};
pub use services::*;
use std::sync::Arc;
pub use system::{ISys, RealSys, StaticTimeSys};
use tracing::warn;

#[derive(Clone)]
pub struct FrontdeskContext {
    pub repos: Repos,
    pub config: Config,
    pub sys: Arc<dyn ISys>,
    pub messenger: Arc<dyn IMessenger>,
    pub calendar_providers: CalendarProviders,
}

impl FrontdeskContext {
    fn create(config: Config) -> Self {
        let repos = match &config.airtable {
            Some(airtable) => Repos::create_airtable(airtable),
            None => {
                warn!("Running with in-memory repositories. Nothing will be persisted.");
                Repos::create_inmemory()
            }
        };
        let messenger: Arc<dyn IMessenger> = match &config.twilio {
            Some(twilio) => Arc::new(TwilioMessenger::new(twilio)),
            None => {
                warn!("Running with an in-memory messenger. No text messages will be delivered.");
                Arc::new(InMemoryMessenger::new())
            }
        };
        let calendar_providers = CalendarProviders {
            google: config.google.clone().map(|c| {
                Arc::new(GoogleCalendarProvider::new(c)) as Arc<dyn ICalendarProvider>
            }),
            outlook: config.outlook.clone().map(|c| {
                Arc::new(OutlookCalendarProvider::new(c)) as Arc<dyn ICalendarProvider>
            }),
        };

        Self {
            repos,
            config,
            sys: Arc::new(RealSys {}),
            messenger,
            calendar_providers,
        }
    }

    /// Context without any external dependencies
    pub fn create_inmemory() -> Self {
        Self {
            repos: Repos::create_inmemory(),
            config: Config::from_lookup(|_| None),
            sys: Arc::new(RealSys {}),
            messenger: Arc::new(InMemoryMessenger::new()),
            calendar_providers: CalendarProviders::default(),
        }
    }
}

/// Will setup the infrastructure context given the environment
pub async fn setup_context() -> FrontdeskContext {
    FrontdeskContext::create(Config::new())
}
