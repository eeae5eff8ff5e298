mod inmemory;
mod twilio;

pub use inmemory::InMemoryMessenger;
pub use twilio::TwilioMessenger;

/// A text message to be delivered to a phone
#[derive(Debug, Clone, PartialEq)]
pub struct OutboundSms {
    pub to: String,
    pub from: String,
    pub body: String,
}

impl OutboundSms {
    pub fn new(to: impl Into<String>, from: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            from: from.into(),
            body: body.into(),
        }
    }
}

#[async_trait::async_trait]
pub trait IMessenger: Send + Sync {
    /// Sends the message and returns the id the provider assigned to it
    async fn send_sms(&self, sms: &OutboundSms) -> anyhow::Result<String>;
}
