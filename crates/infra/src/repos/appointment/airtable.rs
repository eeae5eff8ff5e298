use super::IAppointmentRepo;
use crate::repos::shared::{
    airtable::{formula, AirtableClient, AirtableRecord, ListQuery, SortDirection},
    fields::{self, appointment as field},
};
use chrono::NaiveDate;
use frontdesk_domain::{
    date::{format_record_date, parse_record_date},
    soonest_upcoming, Appointment, AppointmentStatus, ExternalEventRef, IntegrationProvider,
    ReminderWindow, SyncedAppointmentFields, ID,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::sync::Arc;
use tracing::warn;

#[derive(Debug, Default, Deserialize, Serialize)]
struct AppointmentRecordFields {
    #[serde(rename = "Appointment Date", default, skip_serializing_if = "Option::is_none")]
    date: Option<String>,
    #[serde(rename = "Appointment Time", default)]
    time: String,
    #[serde(rename = "Customer Name", default)]
    customer_name: String,
    #[serde(rename = "Customer Phone", default)]
    customer_phone: String,
    #[serde(rename = "Customer Email", default)]
    customer_email: String,
    #[serde(rename = "Service/Meeting Title", default)]
    service: String,
    #[serde(rename = "Status", default, skip_serializing_if = "Option::is_none")]
    status: Option<String>,
    #[serde(rename = "Customer Response", default, skip_serializing_if = "Option::is_none")]
    customer_response: Option<String>,
    #[serde(rename = "Business Name", default, skip_serializing_if = "Vec::is_empty")]
    business: Vec<String>,
    #[serde(rename = "Google Event ID", default, skip_serializing_if = "Option::is_none")]
    google_event_id: Option<String>,
    #[serde(rename = "Microsoft Event ID", default, skip_serializing_if = "Option::is_none")]
    microsoft_event_id: Option<String>,
    #[serde(rename = "Reminder 48h Sent", default)]
    reminder_48h_sent: bool,
    #[serde(rename = "Reminder 24h Sent", default)]
    reminder_24h_sent: bool,
    #[serde(rename = "Reminder 2h Sent", default)]
    reminder_2h_sent: bool,
    #[serde(rename = "Reminder 1h Sent", default)]
    reminder_1h_sent: bool,
}

impl AppointmentRecordFields {
    fn from_appointment(a: &Appointment) -> Self {
        let (google_event_id, microsoft_event_id) = match &a.external_event {
            Some(ext) => match ext.provider {
                IntegrationProvider::Google => (Some(ext.event_id.clone()), None),
                IntegrationProvider::Outlook => (None, Some(ext.event_id.clone())),
            },
            None => (None, None),
        };
        Self {
            date: Some(format_record_date(a.date)),
            time: a.time.clone(),
            customer_name: a.customer_name.clone(),
            customer_phone: a.customer_phone.clone(),
            customer_email: a.customer_email.clone(),
            service: a.service.clone(),
            status: Some(a.status.to_string()),
            customer_response: a.customer_response.clone(),
            business: a
                .business_id
                .iter()
                .map(|id| id.as_str().to_string())
                .collect(),
            google_event_id,
            microsoft_event_id,
            reminder_48h_sent: a.reminder_sent(ReminderWindow::FortyEightHours),
            reminder_24h_sent: a.reminder_sent(ReminderWindow::TwentyFourHours),
            reminder_2h_sent: a.reminder_sent(ReminderWindow::TwoHours),
            reminder_1h_sent: a.reminder_sent(ReminderWindow::OneHour),
        }
    }
}

fn parse_id(raw: &str) -> Option<ID> {
    raw.parse().ok()
}

/// Converts a record into an `Appointment`. Rows that are missing a valid
/// date or carry an unknown status are hand-edited leftovers and skipped.
fn to_appointment(record: AirtableRecord<AppointmentRecordFields>) -> Option<Appointment> {
    let AirtableRecord { id, fields: f } = record;
    let id = match parse_id(&id) {
        Some(id) => id,
        None => {
            warn!("Skipping appointment record with malformed id: {}", id);
            return None;
        }
    };
    let date = match f.date.as_deref().and_then(parse_record_date) {
        Some(date) => date,
        None => {
            warn!("Skipping appointment record: {} without a valid date", id);
            return None;
        }
    };
    let status = match f.status.as_deref() {
        None | Some("") => AppointmentStatus::Scheduled,
        Some(status) => match status.parse::<AppointmentStatus>() {
            Ok(status) => status,
            Err(e) => {
                warn!("Skipping appointment record: {}. {}", id, e);
                return None;
            }
        },
    };
    let external_event = match (f.google_event_id, f.microsoft_event_id) {
        (Some(event_id), _) if !event_id.is_empty() => Some(ExternalEventRef {
            provider: IntegrationProvider::Google,
            event_id,
        }),
        (_, Some(event_id)) if !event_id.is_empty() => Some(ExternalEventRef {
            provider: IntegrationProvider::Outlook,
            event_id,
        }),
        _ => None,
    };
    let sent = [
        (ReminderWindow::FortyEightHours, f.reminder_48h_sent),
        (ReminderWindow::TwentyFourHours, f.reminder_24h_sent),
        (ReminderWindow::TwoHours, f.reminder_2h_sent),
        (ReminderWindow::OneHour, f.reminder_1h_sent),
    ];

    Some(Appointment {
        id,
        business_id: f.business.first().and_then(|id| parse_id(id)),
        customer_name: f.customer_name,
        customer_phone: f.customer_phone,
        customer_email: f.customer_email,
        date,
        time: f.time,
        service: f.service,
        status,
        reminders_sent: sent
            .iter()
            .filter(|(_, sent)| *sent)
            .map(|(window, _)| *window)
            .collect(),
        customer_response: f.customer_response,
        external_event,
    })
}

fn fields_patch(values: Vec<(&str, Value)>) -> Value {
    Value::Object(
        values
            .into_iter()
            .map(|(name, value)| (name.to_string(), value))
            .collect::<Map<String, Value>>(),
    )
}

fn synced_fields_patch(synced: &SyncedAppointmentFields) -> Value {
    fields_patch(vec![
        (field::BUSINESS, json!([synced.business_id.as_str()])),
        (field::CUSTOMER_NAME, json!(synced.customer_name)),
        (field::CUSTOMER_EMAIL, json!(synced.customer_email)),
        (field::CUSTOMER_PHONE, json!(synced.customer_phone)),
        (field::DATE, json!(format_record_date(synced.date))),
        (field::TIME, json!(synced.time)),
        (field::SERVICE, json!(synced.service)),
        (
            fields::event_id_field(synced.external_event.provider),
            json!(synced.external_event.event_id),
        ),
    ])
}

pub struct AirtableAppointmentRepo {
    client: Arc<AirtableClient>,
    table: String,
}

impl AirtableAppointmentRepo {
    pub fn new(client: Arc<AirtableClient>, table: String) -> Self {
        Self { client, table }
    }

    async fn list(&self, query: ListQuery) -> anyhow::Result<Vec<Appointment>> {
        let records = self
            .client
            .list::<AppointmentRecordFields>(&self.table, &query)
            .await?;
        Ok(records.into_iter().filter_map(to_appointment).collect())
    }

    async fn patch(&self, appointment_id: &ID, patch: Value) -> anyhow::Result<()> {
        self.client
            .update(&self.table, appointment_id.as_str(), &patch)
            .await
    }
}

#[async_trait::async_trait]
impl IAppointmentRepo for AirtableAppointmentRepo {
    async fn insert(&self, appointment: &Appointment) -> anyhow::Result<ID> {
        let record_id = self
            .client
            .create(&self.table, &AppointmentRecordFields::from_appointment(appointment))
            .await?;
        Ok(record_id.parse()?)
    }

    async fn find(&self, appointment_id: &ID) -> anyhow::Result<Option<Appointment>> {
        let record = self
            .client
            .find::<AppointmentRecordFields>(&self.table, appointment_id.as_str())
            .await?;
        Ok(record.and_then(to_appointment))
    }

    async fn find_due_reminders(
        &self,
        window: ReminderWindow,
        dates: &[NaiveDate],
    ) -> anyhow::Result<Vec<Appointment>> {
        if dates.is_empty() {
            return Ok(Vec::new());
        }
        let date_clauses = dates
            .iter()
            .map(|date| formula::eq(field::DATE, &format_record_date(*date)))
            .collect::<Vec<_>>();
        let query = ListQuery::filter(formula::and(&[
            formula::or(&date_clauses),
            formula::eq(field::STATUS, AppointmentStatus::Scheduled.as_str()),
            formula::is_false(fields::reminder_sent_field(window)),
            formula::not_empty(field::CUSTOMER_PHONE),
        ]));
        let appointments = self.list(query).await?;
        // The formula already filters, this guards against loosely typed columns
        Ok(appointments
            .into_iter()
            .filter(|a| dates.contains(&a.date) && a.is_reminder_due(window))
            .collect())
    }

    async fn find_upcoming_by_phone(&self, phone: &str) -> anyhow::Result<Option<Appointment>> {
        let query = ListQuery::filter(formula::and(&[
            formula::eq(field::CUSTOMER_PHONE, phone),
            formula::or(&[
                formula::eq(field::STATUS, AppointmentStatus::Scheduled.as_str()),
                formula::eq(field::STATUS, AppointmentStatus::Confirmed.as_str()),
            ]),
        ]))
        .sorted_by(field::DATE, SortDirection::Asc);
        let appointments = self.list(query).await?;
        Ok(soonest_upcoming(appointments.iter()).cloned())
    }

    async fn find_id_by_external_event(
        &self,
        provider: IntegrationProvider,
        event_id: &str,
    ) -> anyhow::Result<Option<ID>> {
        let query = ListQuery::filter(formula::eq(fields::event_id_field(provider), event_id));
        // Matched on the record id alone so a row with a broken date still gets resynced
        let records = self
            .client
            .list::<AppointmentRecordFields>(&self.table, &query)
            .await?;
        Ok(records.into_iter().find_map(|record| parse_id(&record.id)))
    }

    async fn mark_reminder_sent(
        &self,
        appointment_id: &ID,
        window: ReminderWindow,
    ) -> anyhow::Result<()> {
        self.patch(
            appointment_id,
            fields_patch(vec![(fields::reminder_sent_field(window), json!(true))]),
        )
        .await
    }

    async fn update_status(
        &self,
        appointment_id: &ID,
        status: AppointmentStatus,
        customer_response: &str,
    ) -> anyhow::Result<()> {
        self.patch(
            appointment_id,
            fields_patch(vec![
                (field::STATUS, json!(status.as_str())),
                (field::CUSTOMER_RESPONSE, json!(customer_response)),
            ]),
        )
        .await
    }

    async fn save_customer_response(
        &self,
        appointment_id: &ID,
        customer_response: &str,
    ) -> anyhow::Result<()> {
        self.patch(
            appointment_id,
            fields_patch(vec![(field::CUSTOMER_RESPONSE, json!(customer_response))]),
        )
        .await
    }

    async fn save_synced_fields(
        &self,
        appointment_id: &ID,
        fields: &SyncedAppointmentFields,
    ) -> anyhow::Result<()> {
        self.patch(appointment_id, synced_fields_patch(fields))
            .await
    }
}
