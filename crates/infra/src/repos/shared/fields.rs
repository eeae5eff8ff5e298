//! Column names of the Airtable tables. These are the wire contract with the
//! base the business owners edit by hand.

use frontdesk_domain::{IntegrationProvider, ReminderWindow};

pub mod appointment {
    pub const DATE: &str = "Appointment Date";
    pub const TIME: &str = "Appointment Time";
    pub const CUSTOMER_NAME: &str = "Customer Name";
    pub const CUSTOMER_PHONE: &str = "Customer Phone";
    pub const CUSTOMER_EMAIL: &str = "Customer Email";
    pub const SERVICE: &str = "Service/Meeting Title";
    pub const STATUS: &str = "Status";
    pub const CUSTOMER_RESPONSE: &str = "Customer Response";
    /// Link to the `Businesses` table
    pub const BUSINESS: &str = "Business Name";
    pub const GOOGLE_EVENT_ID: &str = "Google Event ID";
    pub const MICROSOFT_EVENT_ID: &str = "Microsoft Event ID";
    pub const REMINDER_48H_SENT: &str = "Reminder 48h Sent";
    pub const REMINDER_24H_SENT: &str = "Reminder 24h Sent";
    pub const REMINDER_2H_SENT: &str = "Reminder 2h Sent";
    pub const REMINDER_1H_SENT: &str = "Reminder 1h Sent";
}

pub mod business {
    pub const NAME: &str = "Business Name";
    pub const OWNER_PHONE: &str = "Owner Phone Number";
    pub const PHONE_NUMBER: &str = "Twilio Phone Number";
    pub const BOOKING_LINK: &str = "Booking Link";
    pub const SMS_TEMPLATE: &str = "SMS Template";
    pub const CALENDAR_TYPE: &str = "Calendar Type";
    pub const CALENDAR_EMAIL: &str = "Calendar Email";
    pub const CALENDAR_SYNC_ENABLED: &str = "Calendar Sync Enabled";
    pub const GOOGLE_ACCESS_TOKEN: &str = "Google Access Token";
    pub const GOOGLE_REFRESH_TOKEN: &str = "Google Refresh Token";
    pub const GOOGLE_TOKEN_EXPIRY: &str = "Google Token Expiry";
    pub const MICROSOFT_ACCESS_TOKEN: &str = "Microsoft Access Token";
    pub const MICROSOFT_REFRESH_TOKEN: &str = "Microsoft Refresh Token";
    pub const MICROSOFT_TOKEN_EXPIRY: &str = "Microsoft Token Expiry";
}

pub fn reminder_sent_field(window: ReminderWindow) -> &'static str {
    match window {
        ReminderWindow::FortyEightHours => appointment::REMINDER_48H_SENT,
        ReminderWindow::TwentyFourHours => appointment::REMINDER_24H_SENT,
        ReminderWindow::TwoHours => appointment::REMINDER_2H_SENT,
        ReminderWindow::OneHour => appointment::REMINDER_1H_SENT,
    }
}

pub fn event_id_field(provider: IntegrationProvider) -> &'static str {
    match provider {
        IntegrationProvider::Google => appointment::GOOGLE_EVENT_ID,
        IntegrationProvider::Outlook => appointment::MICROSOFT_EVENT_ID,
    }
}

/// Access token, refresh token and expiry columns of the provider
pub fn token_fields(provider: IntegrationProvider) -> (&'static str, &'static str, &'static str) {
    match provider {
        IntegrationProvider::Google => (
            business::GOOGLE_ACCESS_TOKEN,
            business::GOOGLE_REFRESH_TOKEN,
            business::GOOGLE_TOKEN_EXPIRY,
        ),
        IntegrationProvider::Outlook => (
            business::MICROSOFT_ACCESS_TOKEN,
            business::MICROSOFT_REFRESH_TOKEN,
            business::MICROSOFT_TOKEN_EXPIRY,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sent_flag_columns_follow_window_labels() {
        for window in ReminderWindow::all().iter() {
            assert_eq!(
                reminder_sent_field(*window),
                format!("Reminder {} Sent", window.label())
            );
        }
    }
}
