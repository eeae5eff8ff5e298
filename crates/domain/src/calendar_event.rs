use crate::{
    date::format_time_12h, Appointment, AppointmentStatus, ExternalEventRef, IntegrationProvider,
    ID,
};
use chrono::prelude::*;
use chrono_tz::Tz;
use once_cell::sync::Lazy;
use regex::Regex;

static PHONE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\+?\d{1,3}[-.\s]?)?\(?\d{3}\)?[-.\s]?\d{3}[-.\s]?\d{4}")
        .expect("phone regex to be valid")
});

/// Best effort extraction of a phone number from free text.
/// Returns an empty string when no phone number is found.
pub fn extract_phone(text: &str) -> String {
    PHONE_REGEX
        .find(text)
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default()
}

#[derive(Debug, Clone, PartialEq)]
pub enum EventStart {
    DateTime(DateTime<Utc>),
    AllDay(NaiveDate),
}

/// A calendar event as returned by any of the calendar providers
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderCalendarEvent {
    pub id: String,
    pub title: Option<String>,
    pub start: EventStart,
    pub attendee_name: Option<String>,
    pub attendee_email: Option<String>,
    /// Free text of the event (body / description) that might contain a phone number
    pub description: Option<String>,
}

/// The `Appointment` fields that are owned by the calendar. Status,
/// sent reminders and customer responses are owned by this system.
#[derive(Debug, Clone, PartialEq)]
pub struct SyncedAppointmentFields {
    pub business_id: ID,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub date: NaiveDate,
    pub time: String,
    pub service: String,
    pub external_event: ExternalEventRef,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

impl ProviderCalendarEvent {
    pub fn appointment_fields(
        &self,
        provider: IntegrationProvider,
        business_id: &ID,
        timezone: Tz,
    ) -> SyncedAppointmentFields {
        let (date, time) = match &self.start {
            EventStart::DateTime(start) => {
                let local = start.with_timezone(&timezone);
                (local.date_naive(), format_time_12h(local.time()))
            }
            EventStart::AllDay(date) => (*date, "All day".to_string()),
        };

        let customer_name = non_empty(&self.attendee_name)
            .or_else(|| non_empty(&self.title))
            .unwrap_or("Unknown")
            .to_string();
        let phone_source = self.description.as_deref().unwrap_or_default();

        SyncedAppointmentFields {
            business_id: business_id.clone(),
            customer_name,
            customer_email: non_empty(&self.attendee_email)
                .unwrap_or_default()
                .to_string(),
            customer_phone: extract_phone(phone_source),
            date,
            time,
            service: non_empty(&self.title).unwrap_or("Meeting").to_string(),
            external_event: ExternalEventRef {
                provider,
                event_id: self.id.clone(),
            },
        }
    }
}

impl SyncedAppointmentFields {
    pub fn into_appointment(self, id: ID) -> Appointment {
        Appointment {
            id,
            business_id: Some(self.business_id),
            customer_name: self.customer_name,
            customer_phone: self.customer_phone,
            customer_email: self.customer_email,
            date: self.date,
            time: self.time,
            service: self.service,
            status: AppointmentStatus::Scheduled,
            reminders_sent: Default::default(),
            customer_response: None,
            external_event: Some(self.external_event),
        }
    }
}

impl Appointment {
    /// Overwrites the calendar owned fields with the latest synced values
    pub fn apply_synced_fields(&mut self, fields: SyncedAppointmentFields) {
        self.business_id = Some(fields.business_id);
        self.customer_name = fields.customer_name;
        self.customer_email = fields.customer_email;
        self.customer_phone = fields.customer_phone;
        self.date = fields.date;
        self.time = fields.time;
        self.service = fields.service;
        self.external_event = Some(fields.external_event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event() -> ProviderCalendarEvent {
        ProviderCalendarEvent {
            id: "evt_1".into(),
            title: Some("Consultation".into()),
            start: EventStart::DateTime(Utc.with_ymd_and_hms(2024, 3, 15, 15, 30, 0).unwrap()),
            attendee_name: Some("Grace Hopper".into()),
            attendee_email: Some("grace@example.com".into()),
            description: Some("Call me at (555) 123-4567 if late".into()),
        }
    }

    #[test]
    fn extracts_phone_numbers() {
        assert_eq!(extract_phone("reach me on +1 555-123-4567 pls"), "+1 555-123-4567");
        assert_eq!(extract_phone("555.123.4567"), "555.123.4567");
        assert_eq!(extract_phone("no number in here"), "");
        assert_eq!(extract_phone("room 12"), "");
    }

    #[test]
    fn maps_event_to_appointment_fields() {
        let business_id = ID::new();
        let fields = event().appointment_fields(
            IntegrationProvider::Google,
            &business_id,
            chrono_tz::UTC,
        );
        assert_eq!(fields.business_id, business_id);
        assert_eq!(fields.customer_name, "Grace Hopper");
        assert_eq!(fields.customer_email, "grace@example.com");
        assert_eq!(fields.customer_phone, "(555) 123-4567");
        assert_eq!(fields.date, NaiveDate::from_ymd_opt(2024, 3, 15).unwrap());
        assert_eq!(fields.time, "3:30 PM");
        assert_eq!(fields.service, "Consultation");
        assert_eq!(fields.external_event.event_id, "evt_1");
    }

    #[test]
    fn uses_timezone_for_date_and_time() {
        let fields = event().appointment_fields(
            IntegrationProvider::Outlook,
            &ID::new(),
            chrono_tz::Australia::Sydney,
        );
        // 15:30 UTC is 02:30 the next day in Sydney (AEDT)
        assert_eq!(fields.date, NaiveDate::from_ymd_opt(2024, 3, 16).unwrap());
        assert_eq!(fields.time, "2:30 AM");
    }

    #[test]
    fn falls_back_when_event_has_little_info() {
        let mut event = event();
        event.attendee_name = None;
        event.attendee_email = None;
        event.description = None;
        let fields = event.appointment_fields(IntegrationProvider::Google, &ID::new(), chrono_tz::UTC);
        assert_eq!(fields.customer_name, "Consultation");
        assert_eq!(fields.customer_phone, "");

        event.title = Some("  ".into());
        event.start = EventStart::AllDay(NaiveDate::from_ymd_opt(2024, 3, 18).unwrap());
        let fields = event.appointment_fields(IntegrationProvider::Google, &ID::new(), chrono_tz::UTC);
        assert_eq!(fields.customer_name, "Unknown");
        assert_eq!(fields.service, "Meeting");
        assert_eq!(fields.time, "All day");
    }

    #[test]
    fn applying_synced_fields_keeps_lifecycle() {
        let fields = event().appointment_fields(IntegrationProvider::Google, &ID::new(), chrono_tz::UTC);
        let mut appointment = fields.clone().into_appointment(ID::new());
        assert_eq!(appointment.status, AppointmentStatus::Scheduled);
        appointment.status = AppointmentStatus::Confirmed;
        appointment.mark_reminder_sent(crate::ReminderWindow::TwentyFourHours);

        let mut updated = fields;
        updated.service = "Follow up".into();
        appointment.apply_synced_fields(updated);
        assert_eq!(appointment.service, "Follow up");
        assert_eq!(appointment.status, AppointmentStatus::Confirmed);
        assert!(appointment.reminder_sent(crate::ReminderWindow::TwentyFourHours));
    }
}
