use super::IAppointmentRepo;
use crate::repos::shared::inmemory_repo::*;
use anyhow::anyhow;
use chrono::NaiveDate;
use frontdesk_domain::{
    soonest_upcoming, Appointment, AppointmentStatus, IntegrationProvider, ReminderWindow,
    SyncedAppointmentFields, ID,
};

pub struct InMemoryAppointmentRepo {
    appointments: std::sync::Mutex<Vec<Appointment>>,
    failing: FailureToggle,
}

impl InMemoryAppointmentRepo {
    pub fn new() -> Self {
        Self {
            appointments: std::sync::Mutex::new(vec![]),
            failing: FailureToggle::default(),
        }
    }

    /// Makes all following calls fail
    pub fn set_failing(&self, failing: bool) {
        self.failing.set(failing);
    }

    /// Makes all following inserts and updates fail
    pub fn set_failing_writes(&self, failing: bool) {
        self.failing.set_writes(failing);
    }

    fn update_existing<U: FnOnce(&mut Appointment)>(
        &self,
        appointment_id: &ID,
        change: U,
    ) -> anyhow::Result<()> {
        if update(appointment_id, &self.appointments, change) {
            Ok(())
        } else {
            Err(anyhow!("Appointment: {} not found", appointment_id))
        }
    }
}

#[async_trait::async_trait]
impl IAppointmentRepo for InMemoryAppointmentRepo {
    async fn insert(&self, appointment: &Appointment) -> anyhow::Result<ID> {
        self.failing.check_write("appointments")?;
        insert(appointment, &self.appointments);
        Ok(appointment.id.clone())
    }

    async fn find(&self, appointment_id: &ID) -> anyhow::Result<Option<Appointment>> {
        self.failing.check_read("appointments")?;
        Ok(find(appointment_id, &self.appointments))
    }

    async fn find_due_reminders(
        &self,
        window: ReminderWindow,
        dates: &[NaiveDate],
    ) -> anyhow::Result<Vec<Appointment>> {
        self.failing.check_read("appointments")?;
        Ok(find_by(&self.appointments, |a| {
            dates.contains(&a.date) && a.is_reminder_due(window)
        }))
    }

    async fn find_upcoming_by_phone(&self, phone: &str) -> anyhow::Result<Option<Appointment>> {
        self.failing.check_read("appointments")?;
        let appointments = find_by(&self.appointments, |a| a.customer_phone == phone);
        Ok(soonest_upcoming(appointments.iter()).cloned())
    }

    async fn find_id_by_external_event(
        &self,
        provider: IntegrationProvider,
        event_id: &str,
    ) -> anyhow::Result<Option<ID>> {
        self.failing.check_read("appointments")?;
        Ok(
            find_by(&self.appointments, |a| a.is_synced_from(provider, event_id))
                .into_iter()
                .next()
                .map(|a| a.id),
        )
    }

    async fn mark_reminder_sent(
        &self,
        appointment_id: &ID,
        window: ReminderWindow,
    ) -> anyhow::Result<()> {
        self.failing.check_write("appointments")?;
        self.update_existing(appointment_id, |a| a.mark_reminder_sent(window))
    }

    async fn update_status(
        &self,
        appointment_id: &ID,
        status: AppointmentStatus,
        customer_response: &str,
    ) -> anyhow::Result<()> {
        self.failing.check_write("appointments")?;
        self.update_existing(appointment_id, |a| {
            a.status = status;
            a.customer_response = Some(customer_response.to_string());
        })
    }

    async fn save_customer_response(
        &self,
        appointment_id: &ID,
        customer_response: &str,
    ) -> anyhow::Result<()> {
        self.failing.check_write("appointments")?;
        self.update_existing(appointment_id, |a| {
            a.customer_response = Some(customer_response.to_string());
        })
    }

    async fn save_synced_fields(
        &self,
        appointment_id: &ID,
        fields: &SyncedAppointmentFields,
    ) -> anyhow::Result<()> {
        self.failing.check_write("appointments")?;
        self.update_existing(appointment_id, |a| a.apply_synced_fields(fields.clone()))
    }
}
