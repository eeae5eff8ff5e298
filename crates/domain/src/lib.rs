mod appointment;
mod business;
mod calendar_event;
pub mod date;
mod provider;
mod reminder;
mod reply;
mod shared;
mod tokens;

pub use appointment::{
    soonest_upcoming, Appointment, AppointmentStatus, ExternalEventRef, InvalidStatusError,
};
pub use business::{Business, BusinessCalendarSettings};
pub use calendar_event::{extract_phone, EventStart, ProviderCalendarEvent, SyncedAppointmentFields};
pub use chrono_tz::Tz;
pub use provider::IntegrationProvider;
pub use reminder::{
    parse_reminder_windows, reminder_target_dates, DateMatchStrategy, ReminderWindow,
};
pub use reply::{normalize_reply, ReplyIntent, APPOINTMENT_NOT_FOUND_REPLY};
pub use shared::entity::{Entity, InvalidIDError, ID};
pub use tokens::OAuthTokens;
