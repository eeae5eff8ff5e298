use crate::{
    shared::entity::{Entity, ID},
    IntegrationProvider, OAuthTokens,
};

const BOOKING_LINK_PLACEHOLDER: &str = "{booking_link}";

/// A `Business` owns a telephony number. Calls and texts to that number are
/// answered on behalf of the business and the owner is kept in the loop.
#[derive(Debug, Clone, Default)]
pub struct Business {
    pub id: ID,
    pub name: String,
    pub owner_phone: Option<String>,
    /// The number customers dial or text. Outbound messages are sent from it.
    pub phone_number: Option<String>,
    pub booking_link: Option<String>,
    /// Custom text sent to callers instead of the default one. May contain
    /// the `{booking_link}` placeholder.
    pub sms_template: Option<String>,
    pub calendar: BusinessCalendarSettings,
}

#[derive(Debug, Clone, Default)]
pub struct BusinessCalendarSettings {
    pub provider: Option<IntegrationProvider>,
    pub email: Option<String>,
    pub sync_enabled: bool,
    pub google: Option<OAuthTokens>,
    pub outlook: Option<OAuthTokens>,
}

impl BusinessCalendarSettings {
    pub fn tokens(&self, provider: IntegrationProvider) -> Option<&OAuthTokens> {
        match provider {
            IntegrationProvider::Google => self.google.as_ref(),
            IntegrationProvider::Outlook => self.outlook.as_ref(),
        }
    }

    pub fn set_tokens(&mut self, provider: IntegrationProvider, tokens: OAuthTokens) {
        match provider {
            IntegrationProvider::Google => self.google = Some(tokens),
            IntegrationProvider::Outlook => self.outlook = Some(tokens),
        }
    }

    /// Marks the provider as the active calendar of the business and enables syncing
    pub fn connect(&mut self, provider: IntegrationProvider, email: String, tokens: OAuthTokens) {
        self.provider = Some(provider);
        self.email = Some(email);
        self.sync_enabled = true;
        self.set_tokens(provider, tokens);
    }

    pub fn syncs_with(&self, provider: IntegrationProvider) -> bool {
        self.sync_enabled && self.provider == Some(provider)
    }
}

impl Business {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Text sent to someone who called the business number
    pub fn caller_autoresponse(&self) -> String {
        let booking_link = self.booking_link.as_deref().unwrap_or_default();
        match self.sms_template.as_deref().filter(|t| !t.trim().is_empty()) {
            Some(template) => {
                if booking_link.is_empty() {
                    template.to_string()
                } else {
                    template.replace(BOOKING_LINK_PLACEHOLDER, booking_link)
                }
            }
            None => format!(
                "Hi! Thanks for calling {}. We can't answer right now, but we can help!\n\n\u{1F4C5} Book an appointment: {}\n\u{1F4AC} Or reply to this text with your question\n\nWe'll respond within 1 hour!",
                self.name, booking_link
            ),
        }
    }

    /// Alert sent to the owner when a call was answered automatically
    pub fn missed_call_alert(&self, caller: &str) -> String {
        format!(
            "\u{1F4DE} Missed call for {} from {}. They were sent your booking link by text.",
            self.name, caller
        )
    }

    /// Customer text forwarded to the owner when it is not tied to an appointment
    pub fn forwarded_message(&self, customer_phone: &str, body: &str) -> String {
        format!(
            "[CUSTOMER MESSAGE] {}\n\nFrom: {}\n\nMessage: {}\n\nReply to this thread to respond to the customer.",
            self.name, customer_phone, body
        )
    }

    pub fn forward_ack(&self) -> String {
        format!("Thanks for your message! {} will respond soon.", self.name)
    }
}

impl Entity for Business {
    fn id(&self) -> &ID {
        &self.id
    }
}
