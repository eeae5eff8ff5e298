mod base;
mod calendar;
mod reminder;
mod status;
mod webhook;

pub(crate) use base::BaseClient;
pub use base::{APIError, APIResponse, RawResponse};
use calendar::CalendarClient;
pub use calendar::OAuthCallbackInput;
pub use frontdesk_api_structs::*;
pub use frontdesk_domain::{IntegrationProvider, ID};
use reminder::ReminderClient;
pub use reqwest::StatusCode;
use status::StatusClient;
use std::sync::Arc;
use webhook::WebhookClient;
pub use webhook::InboundSmsInput;

/// Frontdesk Server SDK
///
/// The SDK contains methods for interacting with the Frontdesk server
/// API the way its triggers and webhooks do.
#[derive(Clone)]
pub struct FrontdeskSDK {
    pub calendar: CalendarClient,
    pub reminder: ReminderClient,
    pub status: StatusClient,
    pub webhook: WebhookClient,
}

impl FrontdeskSDK {
    pub fn new(address: String) -> Self {
        let base = Arc::new(BaseClient::new(address));
        let calendar = CalendarClient::new(base.clone());
        let reminder = ReminderClient::new(base.clone());
        let status = StatusClient::new(base.clone());
        let webhook = WebhookClient::new(base);

        Self {
            calendar,
            reminder,
            status,
            webhook,
        }
    }
}
