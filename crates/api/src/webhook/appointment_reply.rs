use crate::shared::{
    messaging::send_sms,
    twiml::TwimlResponse,
    usecase::{execute, Subscriber, UseCase},
};
use actix_web::{web, HttpResponse};
use frontdesk_api_structs::appointment_reply::RequestBody;
use frontdesk_domain::{normalize_reply, Appointment, ReplyIntent, APPOINTMENT_NOT_FOUND_REPLY};
use frontdesk_infra::{FrontdeskContext, OutboundSms};
use tracing::{info, warn};

pub async fn appointment_reply_controller(
    body: web::Form<RequestBody>,
    ctx: web::Data<FrontdeskContext>,
) -> HttpResponse {
    let body = body.0;
    let usecase = AppointmentReplyUseCase {
        from: body.from,
        to: body.to,
        body: body.body,
    };

    match execute(usecase, &ctx).await {
        Ok(res) => TwimlResponse::new()
            .message(&res.customer_reply())
            .into_http_response(),
        // Twilio retries on anything but a 200
        Err(_) => HttpResponse::Ok().finish(),
    }
}

#[derive(Debug)]
pub enum UseCaseError {
    StorageError(anyhow::Error),
}

/// A customer texted back on a reminder. The reply either confirms or
/// cancels the soonest upcoming appointment or is passed on to the owner.
#[derive(Debug)]
pub struct AppointmentReplyUseCase {
    /// The customer
    pub from: String,
    /// The business number the customer texted
    pub to: String,
    pub body: String,
}

#[derive(Debug)]
pub struct AppointmentReply {
    /// `None` when the customer has no upcoming appointment
    pub appointment: Option<Appointment>,
    pub intent: ReplyIntent,
    pub customer_phone: String,
    pub business_number: String,
    pub body: String,
}

impl AppointmentReply {
    pub fn customer_reply(&self) -> String {
        match &self.appointment {
            Some(appointment) => self.intent.customer_reply(appointment),
            None => APPOINTMENT_NOT_FOUND_REPLY.to_string(),
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for AppointmentReplyUseCase {
    type Response = AppointmentReply;

    type Error = UseCaseError;

    const NAME: &'static str = "AppointmentReply";

    async fn execute(&mut self, ctx: &FrontdeskContext) -> Result<Self::Response, Self::Error> {
        let intent = ReplyIntent::classify(&self.body);
        let body = self.body.trim().to_string();
        info!("Appointment reply from: {} classified as {:?}", self.from, intent);

        let appointment = match ctx
            .repos
            .appointments
            .find_upcoming_by_phone(&self.from)
            .await
        {
            Ok(appointment) => appointment,
            Err(e) => {
                warn!(
                    "Unable to look up the appointment of: {}. Error: {:?}",
                    self.from, e
                );
                None
            }
        };

        let mut reply = AppointmentReply {
            appointment: None,
            intent,
            customer_phone: self.from.clone(),
            business_number: self.to.clone(),
            body,
        };
        let mut appointment = match appointment {
            Some(appointment) => appointment,
            None => {
                info!("No upcoming appointment found for: {}", self.from);
                return Ok(reply);
            }
        };

        let stored_response = normalize_reply(&self.body);
        let update = match reply.intent.target_status() {
            Some(status) => {
                appointment.status = status;
                ctx.repos
                    .appointments
                    .update_status(&appointment.id, status, &stored_response)
                    .await
            }
            None => {
                ctx.repos
                    .appointments
                    .save_customer_response(&appointment.id, &stored_response)
                    .await
            }
        };
        update.map_err(UseCaseError::StorageError)?;
        appointment.customer_response = Some(stored_response);

        reply.appointment = Some(appointment);
        Ok(reply)
    }

    fn subscribers() -> Vec<Box<dyn Subscriber<Self>>> {
        vec![Box::new(NotifyOwnerOfReply)]
    }
}

/// Keeps the business owner in the loop about confirmations, cancellations
/// and questions of customers
pub struct NotifyOwnerOfReply;

#[async_trait::async_trait(?Send)]
impl Subscriber<AppointmentReplyUseCase> for NotifyOwnerOfReply {
    async fn notify(&self, e: &AppointmentReply, ctx: &FrontdeskContext) {
        let appointment = match &e.appointment {
            Some(appointment) => appointment,
            None => return,
        };
        let business_id = match &appointment.business_id {
            Some(business_id) => business_id,
            None => {
                warn!("Appointment: {} is not linked to a business", appointment.id);
                return;
            }
        };
        let business = match ctx.repos.businesses.find(business_id).await {
            Ok(Some(business)) => business,
            Ok(None) => {
                warn!("Business: {} was not found", business_id);
                return;
            }
            Err(e) => {
                warn!("Unable to look up business: {}. Error: {:?}", business_id, e);
                return;
            }
        };
        let owner_phone = match business.owner_phone {
            Some(owner_phone) => owner_phone,
            None => {
                info!("Business: {} has no owner phone, skipping owner notification", business.id);
                return;
            }
        };

        let sms = OutboundSms::new(
            owner_phone,
            business
                .phone_number
                .unwrap_or_else(|| e.business_number.clone()),
            e.intent
                .owner_notification(appointment, &e.customer_phone, &e.body),
        );
        // Side effect, ignore result
        let _ = send_sms(&sms, ctx).await;
    }
}
