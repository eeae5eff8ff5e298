use crate::shared::{
    messaging::send_sms,
    twiml::TwimlResponse,
    usecase::{execute, UseCase},
};
use actix_web::{web, HttpResponse};
use frontdesk_api_structs::sms_reply::RequestBody;
use frontdesk_domain::Business;
use frontdesk_infra::{FrontdeskContext, OutboundSms};
use tracing::{info, warn};

pub async fn sms_reply_controller(
    body: web::Form<RequestBody>,
    ctx: web::Data<FrontdeskContext>,
) -> HttpResponse {
    let body = body.0;
    let usecase = ForwardSmsUseCase {
        from: body.from,
        to: body.to,
        body: body.body,
    };

    match execute(usecase, &ctx).await {
        Ok(business) => TwimlResponse::new()
            .message(&business.forward_ack())
            .into_http_response(),
        Err(_) => HttpResponse::Ok().finish(),
    }
}

#[derive(Debug)]
pub enum UseCaseError {
    BusinessNotFound(String),
    StorageError(anyhow::Error),
}

/// Passes a text sent to a business number on to the owner of the business
#[derive(Debug)]
pub struct ForwardSmsUseCase {
    pub from: String,
    /// The business number that was texted
    pub to: String,
    pub body: String,
}

#[async_trait::async_trait(?Send)]
impl UseCase for ForwardSmsUseCase {
    type Response = Business;

    type Error = UseCaseError;

    const NAME: &'static str = "ForwardSms";

    async fn execute(&mut self, ctx: &FrontdeskContext) -> Result<Self::Response, Self::Error> {
        info!("Text from: {} to: {}", self.from, self.to);

        let business = ctx
            .repos
            .businesses
            .find_by_phone_number(&self.to)
            .await
            .map_err(UseCaseError::StorageError)?
            .ok_or_else(|| UseCaseError::BusinessNotFound(self.to.clone()))?;

        match (&business.owner_phone, &ctx.config.default_from_number) {
            (Some(owner_phone), Some(from)) => {
                let sms = OutboundSms::new(
                    owner_phone.clone(),
                    from.clone(),
                    business.forwarded_message(&self.from, &self.body),
                );
                let _ = send_sms(&sms, ctx).await;
            }
            (None, _) => warn!("Business: {} has no owner phone to forward to", business.id),
            (_, None) => warn!("TWILIO_FROM_NUMBER is not set, unable to forward text message"),
        }

        Ok(business)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use frontdesk_infra::InMemoryMessenger;
    use std::sync::Arc;

    const CUSTOMER: &str = "+15550001111";
    const OWNER: &str = "+15550002222";
    const BUSINESS_NUMBER: &str = "+15550009999";
    const DEFAULT_SENDER: &str = "+15550004444";

    async fn setup() -> (FrontdeskContext, Arc<InMemoryMessenger>) {
        let mut ctx = FrontdeskContext::create_inmemory();
        let messenger = Arc::new(InMemoryMessenger::new());
        ctx.messenger = messenger.clone();
        ctx.config.default_from_number = Some(DEFAULT_SENDER.into());

        let mut business = Business::new("Bloom Salon");
        business.phone_number = Some(BUSINESS_NUMBER.into());
        business.owner_phone = Some(OWNER.into());
        ctx.repos.businesses.insert(&business).await.unwrap();

        (ctx, messenger)
    }

    fn text(to: &str) -> ForwardSmsUseCase {
        ForwardSmsUseCase {
            from: CUSTOMER.into(),
            to: to.into(),
            body: "Are you open on Sunday?".into(),
        }
    }

    #[actix_web::main]
    #[test]
    async fn forwards_text_to_owner() {
        let (ctx, messenger) = setup().await;

        let business = execute(text(BUSINESS_NUMBER), &ctx).await.unwrap();
        assert_eq!(
            business.forward_ack(),
            "Thanks for your message! Bloom Salon will respond soon."
        );

        let forwarded = messenger.sent_to(OWNER);
        assert_eq!(forwarded.len(), 1);
        assert_eq!(forwarded[0].from, DEFAULT_SENDER);
        assert!(forwarded[0].body.starts_with("[CUSTOMER MESSAGE] Bloom Salon"));
        assert!(forwarded[0].body.contains("From: +15550001111"));
        assert!(forwarded[0].body.contains("Message: Are you open on Sunday?"));
    }

    #[actix_web::main]
    #[test]
    async fn unknown_business_number_is_rejected() {
        let (ctx, messenger) = setup().await;

        let res = execute(text("+15550000000"), &ctx).await;
        assert!(matches!(res, Err(UseCaseError::BusinessNotFound(_))));
        assert!(messenger.sent().is_empty());
    }
}
