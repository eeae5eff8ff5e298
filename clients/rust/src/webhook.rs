use crate::{base::RawResponse, APIResponse, BaseClient};
use frontdesk_api_structs::{appointment_reply, incoming_call};
use std::sync::Arc;

/// Posts the forms Twilio would post on inbound calls and texts
#[derive(Clone)]
pub struct WebhookClient {
    base: Arc<BaseClient>,
}

pub struct InboundSmsInput {
    pub from: String,
    pub to: String,
    pub body: String,
}

impl InboundSmsInput {
    fn into_form(self) -> appointment_reply::RequestBody {
        appointment_reply::RequestBody {
            from: self.from,
            to: self.to,
            body: self.body,
        }
    }
}

impl WebhookClient {
    pub(crate) fn new(base: Arc<BaseClient>) -> Self {
        Self { base }
    }

    pub async fn incoming_call(&self, from: String, to: String) -> APIResponse<RawResponse> {
        let body = incoming_call::RequestBody { to, from };
        self.base.post_form(&body, "api/call-status".into()).await
    }

    pub async fn appointment_reply(&self, input: InboundSmsInput) -> APIResponse<RawResponse> {
        self.base
            .post_form(&input.into_form(), "api/appointment-reply".into())
            .await
    }

    pub async fn sms_reply(&self, input: InboundSmsInput) -> APIResponse<RawResponse> {
        self.base
            .post_form(&input.into_form(), "api/sms-reply".into())
            .await
    }
}
