use crate::shared::{
    messaging::send_sms,
    twiml::TwimlResponse,
    usecase::{execute, UseCase},
};
use actix_web::{web, HttpResponse};
use frontdesk_api_structs::incoming_call::RequestBody;
use frontdesk_domain::Business;
use frontdesk_infra::{FrontdeskContext, OutboundSms};
use tracing::{error, info, warn};

const NOT_CONFIGURED: &str = "This number is not configured yet.";
const CALL_ANSWERED: &str = "Thanks for calling! We've sent you a text message with information on how to book an appointment or get in touch.";
const CALL_FAILED: &str = "An error occurred. Please try again later.";

pub async fn incoming_call_controller(
    body: Result<web::Form<RequestBody>, actix_web::Error>,
    ctx: web::Data<FrontdeskContext>,
) -> HttpResponse {
    let body = match body {
        Ok(body) => body.0,
        Err(e) => {
            error!("Unreadable call webhook: {}", e);
            return TwimlResponse::new().say(CALL_FAILED).into_http_response();
        }
    };
    let usecase = IncomingCallUseCase {
        to: body.to,
        from: body.from,
    };

    let twiml = match execute(usecase, &ctx).await {
        Ok(CallHandled::Answered(_)) => TwimlResponse::new().say(CALL_ANSWERED).hangup(),
        // A number that can not be looked up is treated as unknown
        Ok(CallHandled::NotConfigured) | Err(UseCaseError::StorageError(_)) => {
            TwimlResponse::new().say(NOT_CONFIGURED)
        }
    };
    twiml.into_http_response()
}

#[derive(Debug)]
pub enum UseCaseError {
    StorageError(anyhow::Error),
}

/// Someone called a business number that nobody picks up. The caller gets
/// a text with the booking link and the owner is alerted.
#[derive(Debug)]
pub struct IncomingCallUseCase {
    /// The business number that was dialed
    pub to: String,
    pub from: String,
}

#[derive(Debug)]
pub enum CallHandled {
    Answered(Business),
    NotConfigured,
}

#[async_trait::async_trait(?Send)]
impl UseCase for IncomingCallUseCase {
    type Response = CallHandled;

    type Error = UseCaseError;

    const NAME: &'static str = "IncomingCall";

    async fn execute(&mut self, ctx: &FrontdeskContext) -> Result<Self::Response, Self::Error> {
        info!("Call from: {} to: {}", self.from, self.to);

        let business = ctx
            .repos
            .businesses
            .find_by_phone_number(&self.to)
            .await
            .map_err(UseCaseError::StorageError)?;
        let business = match business {
            Some(business) => business,
            None => {
                warn!("No business found for number: {}", self.to);
                return Ok(CallHandled::NotConfigured);
            }
        };

        let autoresponse = OutboundSms::new(
            self.from.clone(),
            self.to.clone(),
            business.caller_autoresponse(),
        );
        let _ = send_sms(&autoresponse, ctx).await;

        match &business.owner_phone {
            Some(owner_phone) => {
                let alert = OutboundSms::new(
                    owner_phone.clone(),
                    self.to.clone(),
                    business.missed_call_alert(&self.from),
                );
                let _ = send_sms(&alert, ctx).await;
            }
            None => info!("Business: {} has no owner phone to alert", business.id),
        }

        Ok(CallHandled::Answered(business))
    }
}
