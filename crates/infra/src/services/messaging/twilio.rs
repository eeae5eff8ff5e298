use super::{IMessenger, OutboundSms};
use crate::config::TwilioConfig;
use anyhow::anyhow;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::info;

// https://www.twilio.com/docs/messaging/api/message-resource#create-a-message-resource

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct CreateMessageForm<'a> {
    to: &'a str,
    from: &'a str,
    body: &'a str,
}

#[derive(Debug, Deserialize)]
struct CreateMessageResponse {
    sid: String,
}

pub struct TwilioMessenger {
    client: Client,
    account_sid: String,
    auth_token: String,
    api_url: String,
}

impl TwilioMessenger {
    pub fn new(config: &TwilioConfig) -> Self {
        Self {
            client: Client::new(),
            account_sid: config.account_sid.clone(),
            auth_token: config.auth_token.clone(),
            api_url: config.api_url.trim_end_matches('/').to_string(),
        }
    }

    fn messages_url(&self) -> String {
        format!("{}/Accounts/{}/Messages.json", self.api_url, self.account_sid)
    }
}

#[async_trait::async_trait]
impl IMessenger for TwilioMessenger {
    async fn send_sms(&self, sms: &OutboundSms) -> anyhow::Result<String> {
        let res = self
            .client
            .post(&self.messages_url())
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .form(&CreateMessageForm {
                to: &sms.to,
                from: &sms.from,
                body: &sms.body,
            })
            .send()
            .await?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            return Err(anyhow!(
                "Twilio rejected message to: {} with status: {}. Response: {}",
                sms.to,
                status,
                text
            ));
        }

        let created = res.json::<CreateMessageResponse>().await?;
        info!("Sent text message: {} to: {}", created.sid, sms.to);
        Ok(created.sid)
    }
}
