use frontdesk_infra::{FrontdeskContext, OutboundSms};
use tracing::{error, info};

/// Sends a text message. Failures are logged and handed back so the caller
/// can decide to carry on without it.
pub async fn send_sms(sms: &OutboundSms, ctx: &FrontdeskContext) -> anyhow::Result<String> {
    match ctx.messenger.send_sms(sms).await {
        Ok(message_id) => {
            info!("Sent text message: {} to: {}", message_id, sms.to);
            Ok(message_id)
        }
        Err(e) => {
            error!("Unable to send text message to: {}. Error: {:?}", sms.to, e);
            Err(e)
        }
    }
}
