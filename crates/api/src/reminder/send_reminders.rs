use crate::{
    error::FrontdeskError,
    shared::{
        messaging::send_sms,
        usecase::{execute, UseCase},
    },
};
use actix_web::{web, HttpResponse};
use chrono::{DateTime, SecondsFormat, Utc};
use frontdesk_api_structs::send_reminders::APIResponse;
use frontdesk_domain::{
    date::timestamp_to_datetime, reminder_target_dates, Appointment, ReminderWindow,
};
use frontdesk_infra::{FrontdeskContext, OutboundSms};
use tracing::{info, warn};

pub async fn send_reminders_controller(
    ctx: web::Data<FrontdeskContext>,
) -> Result<HttpResponse, FrontdeskError> {
    let usecase = SendRemindersUseCase {
        windows: ctx.config.reminder_windows.clone(),
    };

    execute(usecase, &ctx)
        .await
        .map(|res| HttpResponse::Ok().json(res.into_api_response()))
        .map_err(FrontdeskError::from)
}

#[derive(Debug)]
pub enum UseCaseError {
    StorageError(anyhow::Error),
}

impl From<UseCaseError> for FrontdeskError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::StorageError(e) => Self::trigger_failed("Failed to send reminders", e),
        }
    }
}

/// Texts every customer whose appointment falls inside one of the reminder
/// windows and who has not been reminded for that window yet.
#[derive(Debug)]
pub struct SendRemindersUseCase {
    pub windows: Vec<ReminderWindow>,
}

#[derive(Debug)]
pub struct SweepResult {
    /// Appointments that were due per window, in sweep order
    pub found: Vec<(ReminderWindow, usize)>,
    pub timestamp: DateTime<Utc>,
}

impl SweepResult {
    fn into_api_response(self) -> APIResponse {
        APIResponse {
            success: true,
            message: "Reminders checked".into(),
            found: self
                .found
                .iter()
                .map(|(window, count)| (APIResponse::found_key(window.label()), *count))
                .collect(),
            timestamp: self.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for SendRemindersUseCase {
    type Response = SweepResult;

    type Error = UseCaseError;

    const NAME: &'static str = "SendReminders";

    async fn execute(&mut self, ctx: &FrontdeskContext) -> Result<Self::Response, Self::Error> {
        let now = timestamp_to_datetime(ctx.sys.get_timestamp_millis());

        let mut found = Vec::with_capacity(self.windows.len());
        for window in &self.windows {
            let dates = reminder_target_dates(
                now,
                *window,
                ctx.config.timezone,
                ctx.config.reminder_match_strategy,
            );
            let appointments = ctx
                .repos
                .appointments
                .find_due_reminders(*window, &dates)
                .await
                .map_err(UseCaseError::StorageError)?;
            info!(
                "Found {} appointments needing the {} reminder",
                appointments.len(),
                window
            );

            for appointment in &appointments {
                send_reminder(appointment, *window, ctx).await;
                // The flag is set even when the text could not be delivered
                ctx.repos
                    .appointments
                    .mark_reminder_sent(&appointment.id, *window)
                    .await
                    .map_err(UseCaseError::StorageError)?;
            }
            found.push((*window, appointments.len()));
        }

        Ok(SweepResult {
            found,
            timestamp: now,
        })
    }
}

async fn send_reminder(appointment: &Appointment, window: ReminderWindow, ctx: &FrontdeskContext) {
    let from = match sender_number(appointment, ctx).await {
        Some(from) => from,
        None => {
            warn!(
                "No number to send the {} reminder of appointment: {} from",
                window, appointment.id
            );
            return;
        }
    };
    let sms = OutboundSms::new(
        appointment.customer_phone.clone(),
        from,
        window.render(appointment),
    );
    let _ = send_sms(&sms, ctx).await;
}

/// The telephony number of the business that owns the appointment, or the
/// default sender when the business can not be resolved
async fn sender_number(appointment: &Appointment, ctx: &FrontdeskContext) -> Option<String> {
    let business = match &appointment.business_id {
        Some(business_id) => match ctx.repos.businesses.find(business_id).await {
            Ok(business) => business,
            Err(e) => {
                warn!(
                    "Unable to look up business: {} of appointment: {}. Error: {:?}",
                    business_id, appointment.id, e
                );
                None
            }
        },
        None => None,
    };

    business
        .and_then(|business| business.phone_number)
        .or_else(|| ctx.config.default_from_number.clone())
}
