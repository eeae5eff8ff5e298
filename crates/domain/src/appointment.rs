use crate::{
    shared::entity::{Entity, ID},
    IntegrationProvider, ReminderWindow,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::{collections::BTreeSet, fmt::Display, str::FromStr};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum AppointmentStatus {
    Scheduled,
    Confirmed,
    Cancelled,
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Scheduled => "Scheduled",
            Self::Confirmed => "Confirmed",
            Self::Cancelled => "Cancelled",
        }
    }

    /// Whether the appointment is still going to happen
    pub fn is_upcoming(&self) -> bool {
        matches!(self, Self::Scheduled | Self::Confirmed)
    }
}

impl Default for AppointmentStatus {
    fn default() -> Self {
        Self::Scheduled
    }
}

impl Display for AppointmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Error, Debug, PartialEq)]
#[error("Invalid appointment status: `{0}`")]
pub struct InvalidStatusError(String);

impl FromStr for AppointmentStatus {
    type Err = InvalidStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Scheduled" => Ok(Self::Scheduled),
            "Confirmed" => Ok(Self::Confirmed),
            "Cancelled" => Ok(Self::Cancelled),
            other => Err(InvalidStatusError(other.to_string())),
        }
    }
}

/// Reference to the calendar event an `Appointment` was synced from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalEventRef {
    pub provider: IntegrationProvider,
    pub event_id: String,
}

/// An `Appointment` a customer has with a `Business`
#[derive(Debug, Clone)]
pub struct Appointment {
    pub id: ID,
    pub business_id: Option<ID>,
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_email: String,
    pub date: NaiveDate,
    /// Time of day as shown to the customer, e.g. `3:30 PM`
    pub time: String,
    pub service: String,
    pub status: AppointmentStatus,
    /// The `ReminderWindow`s that have already been sent.
    /// A window is only ever added, never removed.
    pub reminders_sent: BTreeSet<ReminderWindow>,
    /// Latest text the customer sent regarding this appointment
    pub customer_response: Option<String>,
    pub external_event: Option<ExternalEventRef>,
}

impl Appointment {
    pub fn reminder_sent(&self, window: ReminderWindow) -> bool {
        self.reminders_sent.contains(&window)
    }

    /// Whether a reminder for `window` should go out for this appointment,
    /// ignoring the date which is decided by the reminder sweep.
    pub fn is_reminder_due(&self, window: ReminderWindow) -> bool {
        self.status == AppointmentStatus::Scheduled
            && !self.customer_phone.trim().is_empty()
            && !self.reminder_sent(window)
    }

    pub fn mark_reminder_sent(&mut self, window: ReminderWindow) {
        self.reminders_sent.insert(window);
    }

    pub fn is_synced_from(&self, provider: IntegrationProvider, event_id: &str) -> bool {
        match &self.external_event {
            Some(ext) => ext.provider == provider && ext.event_id == event_id,
            None => false,
        }
    }
}

impl Entity for Appointment {
    fn id(&self) -> &ID {
        &self.id
    }
}

/// Orders upcoming appointments with the earliest date first
pub fn soonest_upcoming<'a, I>(appointments: I) -> Option<&'a Appointment>
where
    I: IntoIterator<Item = &'a Appointment>,
{
    appointments
        .into_iter()
        .filter(|a| a.status.is_upcoming())
        .min_by_key(|a| a.date)
}
