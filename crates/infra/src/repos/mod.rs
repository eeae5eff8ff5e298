mod appointment;
mod business;
mod shared;

use crate::config::AirtableConfig;
pub use appointment::IAppointmentRepo;
use appointment::AirtableAppointmentRepo;
pub use appointment::InMemoryAppointmentRepo;
pub use business::IBusinessRepo;
use business::AirtableBusinessRepo;
pub use business::InMemoryBusinessRepo;
use shared::airtable::AirtableClient;
pub use shared::fields;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub struct Repos {
    pub appointments: Arc<dyn IAppointmentRepo>,
    pub businesses: Arc<dyn IBusinessRepo>,
}

impl Repos {
    pub fn create_airtable(config: &AirtableConfig) -> Self {
        info!(
            "Using airtable base: {} with tables: {} and {}",
            config.base_id, config.businesses_table, config.appointments_table
        );
        let client = Arc::new(AirtableClient::new(config));
        Self {
            appointments: Arc::new(AirtableAppointmentRepo::new(
                client.clone(),
                config.appointments_table.clone(),
            )),
            businesses: Arc::new(AirtableBusinessRepo::new(
                client,
                config.businesses_table.clone(),
            )),
        }
    }

    pub fn create_inmemory() -> Self {
        Self {
            appointments: Arc::new(InMemoryAppointmentRepo::new()),
            businesses: Arc::new(InMemoryBusinessRepo::new()),
        }
    }
}
