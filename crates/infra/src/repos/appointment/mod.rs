mod airtable;
mod inmemory;

pub use airtable::AirtableAppointmentRepo;
use chrono::NaiveDate;
use frontdesk_domain::{
    Appointment, AppointmentStatus, IntegrationProvider, ReminderWindow, SyncedAppointmentFields,
    ID,
};
pub use inmemory::InMemoryAppointmentRepo;

#[async_trait::async_trait]
pub trait IAppointmentRepo: Send + Sync {
    /// Stores the appointment and returns the id it is stored under
    async fn insert(&self, appointment: &Appointment) -> anyhow::Result<ID>;
    async fn find(&self, appointment_id: &ID) -> anyhow::Result<Option<Appointment>>;
    /// Scheduled appointments with a phone number on one of the `dates`
    /// that have not been reminded for `window` yet
    async fn find_due_reminders(
        &self,
        window: ReminderWindow,
        dates: &[NaiveDate],
    ) -> anyhow::Result<Vec<Appointment>>;
    /// The soonest Scheduled or Confirmed appointment of the customer
    async fn find_upcoming_by_phone(&self, phone: &str) -> anyhow::Result<Option<Appointment>>;
    /// Id of the record synced from the provider event, whatever state
    /// the rest of the record is in
    async fn find_id_by_external_event(
        &self,
        provider: IntegrationProvider,
        event_id: &str,
    ) -> anyhow::Result<Option<ID>>;
    async fn mark_reminder_sent(&self, appointment_id: &ID, window: ReminderWindow)
        -> anyhow::Result<()>;
    async fn update_status(
        &self,
        appointment_id: &ID,
        status: AppointmentStatus,
        customer_response: &str,
    ) -> anyhow::Result<()>;
    async fn save_customer_response(
        &self,
        appointment_id: &ID,
        customer_response: &str,
    ) -> anyhow::Result<()>;
    async fn save_synced_fields(
        &self,
        appointment_id: &ID,
        fields: &SyncedAppointmentFields,
    ) -> anyhow::Result<()>;
}
