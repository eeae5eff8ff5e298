mod calendar_provider;
mod google_calendar;
mod messaging;
mod outlook_calendar;

pub use calendar_provider::{
    get_access_token, CalendarProviders, ICalendarProvider, OAuthError, TokenGrant,
};
pub use google_calendar::{GoogleCalendarProvider, GoogleEndpoints};
pub use messaging::{IMessenger, InMemoryMessenger, OutboundSms, TwilioMessenger};
pub use outlook_calendar::{OutlookCalendarProvider, OutlookEndpoints};
